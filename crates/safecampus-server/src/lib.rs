//! # safecampus-server
//!
//! REST API for the SafeCampus application.
//!
//! - **Identity**: student and admin accounts, Argon2id password hashes and
//!   signed bearer tokens
//! - **Contacts**: per-student emergency contacts and admin-managed helplines
//! - **Incidents, posts and articles**: records backed by an uploaded media
//!   file, served back under `/uploads`
//! - **Location alerts**: emergency-button presses stored as GeoJSON points

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod identity;
pub mod media_store;
pub mod multipart;

pub use api::{build_router, serve, serve_on, AppState};
pub use config::ServerConfig;
pub use error::ServerError;
