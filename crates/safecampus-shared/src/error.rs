use thiserror::Error;

/// A field failed a presence or format rule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{value} is not a valid contact number!")]
    InvalidPhone { value: String },

    #[error("{field} must be between {min} and {max} characters long")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("Email must be a valid email")]
    InvalidEmail,

    #[error("Passwords must match")]
    PasswordMismatch,

    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token lifetime out of range")]
    Lifetime,
}
