//! Screen actions.
//!
//! Each submodule groups what one family of screens does: validate the form,
//! call the API with the current session, and hand back what the screen
//! renders. Errors are [`ClientError`](crate::error::ClientError)s whose
//! `Display` is the alert text.

pub mod articles;
pub mod auth;
pub mod contacts;
pub mod helplines;
pub mod incidents;
pub mod posts;
pub mod profile;
pub mod safety;

#[cfg(test)]
mod tests;
