use safecampus_shared::error::ValidationError;
use thiserror::Error;

/// Errors surfaced to the user interface. `Display` is what goes in the
/// alert dialog.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Could not reach the server: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Secure storage error: {0}")]
    Storage(String),

    #[error("Location unavailable: {0}")]
    Location(String),

    #[error("Please sign in first")]
    NotSignedIn,
}

impl ClientError {
    /// Message shown when a failed response carries no usable body.
    pub const GENERIC_FAILURE: &'static str = "Something went wrong. Please try again.";

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
