//! # safecampus-shared
//!
//! Types shared by every SafeCampus crate: the public record models, the
//! wire protocol spoken between the client and the API gateway, input
//! validation rules, GeoJSON points and signed session tokens.

pub mod constants;
pub mod error;
pub mod geo;
pub mod models;
pub mod protocol;
pub mod token;
pub mod types;
pub mod validation;
