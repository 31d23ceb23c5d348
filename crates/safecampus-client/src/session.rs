//! The signed-in state of the app.
//!
//! A [`Session`] is resolved once at startup from secure storage and then
//! passed explicitly to the API and navigation layers. Only the bearer token
//! is persisted; the account id and kind are read back out of its claims.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use safecampus_shared::protocol::AuthResponse;
use safecampus_shared::token::decode_claims_unverified;
use safecampus_shared::types::{Principal, PrincipalKind};
use uuid::Uuid;

use crate::error::{ClientError, Result};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "sessionToken";

/// Device key-value store for secrets (keychain, keystore...).
pub trait SecureStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process storage, for tests and for platforms without a keychain.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|e| ClientError::Storage(format!("Lock poisoned: {e}")))
    }
}

impl SecureStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Student { id: Uuid, token: String },
    Admin { id: Uuid, token: String },
}

impl Session {
    pub fn signed_in(principal: Principal, token: String) -> Self {
        match principal.kind {
            PrincipalKind::Student => Session::Student {
                id: principal.id,
                token,
            },
            PrincipalKind::Admin => Session::Admin {
                id: principal.id,
                token,
            },
        }
    }

    pub fn from_auth(response: &AuthResponse) -> Self {
        Self::signed_in(
            Principal {
                kind: response.kind,
                id: response.user_id,
            },
            response.token.clone(),
        )
    }

    pub fn principal(&self) -> Option<Principal> {
        match self {
            Session::Anonymous => None,
            Session::Student { id, .. } => Some(Principal::student(*id)),
            Session::Admin { id, .. } => Some(Principal::admin(*id)),
        }
    }

    pub fn kind(&self) -> Option<PrincipalKind> {
        self.principal().map(|p| p.kind)
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Student { token, .. } | Session::Admin { token, .. } => Some(token),
        }
    }

    pub fn require_token(&self) -> Result<&str> {
        self.token().ok_or(ClientError::NotSignedIn)
    }

    pub fn require_principal(&self) -> Result<Principal> {
        self.principal().ok_or(ClientError::NotSignedIn)
    }

    pub fn is_signed_in(&self) -> bool {
        !matches!(self, Session::Anonymous)
    }

    /// Read the stored token. A missing, unreadable or expired token yields
    /// `Anonymous`, and a stale one is removed from storage.
    pub fn restore(storage: &dyn SecureStorage, now: DateTime<Utc>) -> Result<Self> {
        let Some(token) = storage.get(TOKEN_KEY)? else {
            return Ok(Session::Anonymous);
        };

        match decode_claims_unverified(&token) {
            Ok(claims) if !claims.is_expired(now) => {
                tracing::debug!(id = %claims.sub, kind = %claims.kind, "session restored");
                Ok(Self::signed_in(claims.principal(), token))
            }
            Ok(_) => {
                tracing::info!("stored session expired");
                storage.remove(TOKEN_KEY)?;
                Ok(Session::Anonymous)
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable stored session");
                storage.remove(TOKEN_KEY)?;
                Ok(Session::Anonymous)
            }
        }
    }

    pub fn persist(&self, storage: &dyn SecureStorage) -> Result<()> {
        match self.token() {
            Some(token) => storage.set(TOKEN_KEY, token),
            None => storage.remove(TOKEN_KEY),
        }
    }

    /// Forget the stored token.
    pub fn logout(storage: &dyn SecureStorage) -> Result<Self> {
        storage.remove(TOKEN_KEY)?;
        Ok(Session::Anonymous)
    }
}
