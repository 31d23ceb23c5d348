//! Bearer-token authentication and the access rules built on top of it.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;
use safecampus_shared::types::{Principal, PrincipalKind};

use crate::api::AppState;
use crate::error::ServerError;

/// The principal behind a request, taken from `Authorization: Bearer <token>`.
///
/// Handlers that take this extractor reject anonymous requests with 401.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated(pub Principal);

#[axum::async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ServerError::Unauthorized("Authentication required".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ServerError::Unauthorized("Authentication required".into()))?;

        let claims = state.tokens.verify(token, Utc::now()).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            ServerError::Unauthorized(e.to_string())
        })?;

        Ok(Authenticated(claims.principal()))
    }
}

pub fn require_admin(principal: &Principal) -> Result<(), ServerError> {
    require_kind(principal, PrincipalKind::Admin)
}

pub fn require_kind(principal: &Principal, kind: PrincipalKind) -> Result<(), ServerError> {
    if principal.kind == kind {
        Ok(())
    } else {
        Err(ServerError::Forbidden(format!("{} access required", kind.label())))
    }
}

/// Admins pass; anyone else must be the owner recorded on the resource.
pub fn require_owner_or_admin(principal: &Principal, owner_id: &str) -> Result<(), ServerError> {
    if principal.is_admin() || principal.owner_id() == owner_id {
        Ok(())
    } else {
        Err(ServerError::Forbidden(
            "You do not have access to this record".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_require_kind() {
        let student = Principal::student(Uuid::new_v4());
        let admin = Principal::admin(Uuid::new_v4());

        assert!(require_admin(&admin).is_ok());
        assert!(matches!(require_admin(&student), Err(ServerError::Forbidden(_))));
        assert!(require_kind(&student, PrincipalKind::Student).is_ok());
        assert!(require_kind(&admin, PrincipalKind::Student).is_err());
    }

    #[test]
    fn test_require_owner_or_admin() {
        let owner = Principal::student(Uuid::new_v4());
        let other = Principal::student(Uuid::new_v4());
        let admin = Principal::admin(Uuid::new_v4());
        let owner_id = owner.owner_id();

        assert!(require_owner_or_admin(&owner, &owner_id).is_ok());
        assert!(require_owner_or_admin(&admin, &owner_id).is_ok());
        assert!(matches!(
            require_owner_or_admin(&other, &owner_id),
            Err(ServerError::Forbidden(_))
        ));
    }
}
