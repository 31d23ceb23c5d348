//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use safecampus_shared::constants::{
    DEFAULT_HTTP_PORT, DEFAULT_TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS, MAX_UPLOAD_SIZE,
};

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:3000`
    pub http_addr: SocketAddr,

    /// SQLite database file.
    /// Env: `DATABASE_PATH`
    /// Default: `./safecampus.db`
    pub database_path: PathBuf,

    /// Directory where uploaded media is written and served from.
    /// Env: `UPLOAD_PATH`
    /// Default: `./uploads`
    pub upload_path: PathBuf,

    /// Maximum size of a single uploaded file in bytes.
    /// Env: `MAX_UPLOAD_SIZE`
    /// Default: 50 MiB
    pub max_upload_size: usize,

    /// Ed25519 secret used to sign session tokens (hex-encoded, 64 chars).
    /// Env: `TOKEN_SIGNING_KEY`
    /// Default: none, a random key is generated at startup and every
    /// session is lost on restart.
    pub token_signing_key: Option<[u8; 32]>,

    /// Lifetime of a session token in hours, at most ten years.
    /// Env: `TOKEN_TTL_HOURS`
    /// Default: `24`
    pub token_ttl_hours: i64,

    /// Human-readable name for this deployment.
    /// Env: `INSTANCE_NAME`
    /// Default: `"SafeCampus"`
    pub instance_name: String,

    /// Whether `POST /api/accounts/admin/signup` is accepted.
    /// Env: `ADMIN_REGISTRATION_OPEN` (true/false)
    /// Default: `false`
    pub admin_registration_open: bool,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("http_addr", &self.http_addr)
            .field("database_path", &self.database_path)
            .field("upload_path", &self.upload_path)
            .field("max_upload_size", &self.max_upload_size)
            .field("token_signing_key", &self.token_signing_key.map(|_| "<redacted>"))
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("instance_name", &self.instance_name)
            .field("admin_registration_open", &self.admin_registration_open)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: PathBuf::from("./safecampus.db"),
            upload_path: PathBuf::from("./uploads"),
            max_upload_size: MAX_UPLOAD_SIZE,
            token_signing_key: None,
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            instance_name: "SafeCampus".to_string(),
            admin_registration_open: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Some(path) = lookup("DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }

        if let Some(path) = lookup("UPLOAD_PATH") {
            config.upload_path = PathBuf::from(path);
        }

        if let Some(val) = lookup("MAX_UPLOAD_SIZE") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.max_upload_size = n,
                _ => tracing::warn!(value = %val, "Invalid MAX_UPLOAD_SIZE, using default"),
            }
        }

        if let Some(hex_key) = lookup("TOKEN_SIGNING_KEY") {
            match parse_hex_key(&hex_key) {
                Ok(key) => config.token_signing_key = Some(key),
                Err(e) => {
                    tracing::warn!(error = %e, "Invalid TOKEN_SIGNING_KEY, using a random key");
                }
            }
        }

        if let Some(val) = lookup("TOKEN_TTL_HOURS") {
            match val.parse::<i64>() {
                Ok(h) if (1..=MAX_TOKEN_TTL_HOURS).contains(&h) => config.token_ttl_hours = h,
                _ => tracing::warn!(value = %val, "Invalid TOKEN_TTL_HOURS, using default"),
            }
        }

        if let Some(name) = lookup("INSTANCE_NAME") {
            config.instance_name = name;
        }

        if let Some(val) = lookup("ADMIN_REGISTRATION_OPEN") {
            config.admin_registration_open = val == "true" || val == "1";
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

/// Parse a 64-character hex string into a 32-byte array.
fn parse_hex_key(value: &str) -> Result<[u8; 32], String> {
    let value = value.trim();
    if value.len() != 64 {
        return Err(format!("expected 64 hex chars, got {}", value.len()));
    }
    let bytes = hex::decode(value).map_err(|e| format!("invalid hex: {e}"))?;
    let mut key = [0u8; 32];
    key.copy_from_slice(&bytes);
    Ok(key)
}
