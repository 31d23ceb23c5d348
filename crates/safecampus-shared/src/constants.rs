/// Application name
pub const APP_NAME: &str = "SafeCampus";

/// Phone numbers: optional leading `+`, then 10 to 15 digits.
pub const PHONE_PATTERN: &str = r"^\+?\d{10,15}$";

/// Contact name length bounds (characters, after trimming)
pub const CONTACT_NAME_MIN: usize = 3;
pub const CONTACT_NAME_MAX: usize = 100;

/// Maximum upload size in bytes (50 MiB)
pub const MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Route prefix under which uploaded media is served
pub const UPLOADS_PREFIX: &str = "uploads";

/// Default lifetime of a session token
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Longest accepted session token lifetime (ten years)
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

/// Zoom level used when building map links for location alerts
pub const MAP_LINK_ZOOM: u8 = 15;

/// Mean Earth radius in metres, used for haversine distances
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;
