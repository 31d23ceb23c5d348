//! # safecampus-client
//!
//! Client-side core of the SafeCampus app: a typed API client, the explicit
//! session, navigation rules, form validation and the actions behind each
//! screen. Rendering is left to the platform shell.

pub mod api;
pub mod error;
pub mod forms;
pub mod location;
pub mod navigation;
pub mod screens;
pub mod session;
pub mod state;

pub use api::ApiClient;
pub use error::ClientError;
pub use session::{MemoryStorage, SecureStorage, Session};
pub use state::ClientState;
