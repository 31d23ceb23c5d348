use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use safecampus_shared::error::ValidationError;
use safecampus_shared::protocol::MessageResponse;
use safecampus_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Media storage error: {0}")]
    MediaStorage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Give a `NotFound` a message naming the missing record.
    pub fn or_not_found(self, message: &str) -> Self {
        match self {
            ServerError::NotFound(_) => ServerError::NotFound(message.to_string()),
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::MediaStorage(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Closure for `map_err` that names the missing record.
pub fn not_found(message: &'static str) -> impl Fn(ServerError) -> ServerError {
    move |e| e.or_not_found(message)
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(v) => ServerError::BadRequest(v.to_string()),
            StoreError::Conflict(message) => ServerError::Conflict(message),
            StoreError::NotFound => ServerError::NotFound("Record not found".to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<ValidationError> for ServerError {
    fn from(e: ValidationError) -> Self {
        ServerError::BadRequest(e.to_string())
    }
}

impl From<MultipartError> for ServerError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge(format!("Upload too large: {}", e.body_text()))
        } else {
            ServerError::BadRequest(format!("Multipart error: {}", e.body_text()))
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ServerError::MediaStorage(detail) | ServerError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, axum::Json(MessageResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let e: ServerError = StoreError::Conflict("Contact number must be unique.".into()).into();
        assert_eq!(e.status(), StatusCode::CONFLICT);
        assert_eq!(e.to_string(), "Contact number must be unique.");

        let e: ServerError = StoreError::NotFound.into();
        assert_eq!(e.status(), StatusCode::NOT_FOUND);
        assert_eq!(e.or_not_found("Incident not found").to_string(), "Incident not found");

        let e: ServerError = StoreError::Validation(ValidationError::PasswordMismatch).into();
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);

        let e: ServerError = StoreError::Migration("boom".into()).into();
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_or_not_found_leaves_other_errors() {
        let e = ServerError::Conflict("dup".into()).or_not_found("x");
        assert!(matches!(e, ServerError::Conflict(ref m) if m == "dup"));
    }

    #[tokio::test]
    async fn test_internal_error_body_is_generic() {
        let response = ServerError::Internal("disk on fire at /var/lib".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let msg: MessageResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(msg.message, "Internal server error");
    }
}
