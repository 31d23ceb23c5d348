//! # safecampus-store
//!
//! Persistence for SafeCampus, backed by SQLite.
//!
//! The crate exposes a synchronous `Database` handle that wraps a
//! `rusqlite::Connection` and provides typed CRUD helpers for accounts,
//! contacts, incidents, posts, articles and location alerts. Format and
//! presence rules are enforced here so every caller gets the same
//! `Validation` / `Conflict` / `NotFound` outcomes.

pub mod accounts;
pub mod articles;
pub mod contacts;
pub mod database;
pub mod incidents;
pub mod locations;
pub mod migrations;
pub mod models;
pub mod posts;

mod error;
mod rows;

pub use database::Database;
pub use error::{Result, StoreError};
pub use models::*;
