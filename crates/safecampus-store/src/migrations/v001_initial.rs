//! v001 -- Initial schema creation.
//!
//! Students and admins live in separate tables; a contact's phone number is
//! unique across emergency contacts and helpline numbers alike.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Accounts
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS students (
    id            TEXT PRIMARY KEY NOT NULL,  -- UUID v4
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,       -- lower-cased on write
    mobile        TEXT NOT NULL,
    password_hash TEXT NOT NULL,              -- Argon2id PHC string
    created_at    TEXT NOT NULL               -- RFC-3339
);

CREATE TABLE IF NOT EXISTS admins (
    id            TEXT PRIMARY KEY NOT NULL,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    mobile        TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Contacts (emergency contacts + helpline numbers)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS contacts (
    id         TEXT PRIMARY KEY NOT NULL,
    kind       TEXT NOT NULL,                 -- 'emergency' | 'helpline'
    name       TEXT NOT NULL,
    phone      TEXT NOT NULL UNIQUE,
    owner_id   TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_contacts_kind_owner ON contacts(kind, owner_id);

-- ----------------------------------------------------------------
-- Incidents
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS incidents (
    id            TEXT PRIMARY KEY NOT NULL,
    description   TEXT NOT NULL,
    location      TEXT NOT NULL,
    reported_by   TEXT NOT NULL,
    incident_date TEXT NOT NULL,
    image_path    TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_incidents_reported_by ON incidents(reported_by);

-- ----------------------------------------------------------------
-- Posts
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS posts (
    id          TEXT PRIMARY KEY NOT NULL,
    description TEXT NOT NULL,
    media_path  TEXT NOT NULL,
    author_id   TEXT NOT NULL,
    author_name TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_posts_author_id ON posts(author_id);

-- ----------------------------------------------------------------
-- Articles
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS articles (
    id          TEXT PRIMARY KEY NOT NULL,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    image_path  TEXT NOT NULL,
    posted_by   TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_articles_posted_by ON articles(posted_by);

-- ----------------------------------------------------------------
-- Location alerts
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS location_alerts (
    id         TEXT PRIMARY KEY NOT NULL,
    name       TEXT NOT NULL,
    phone      TEXT NOT NULL,
    longitude  REAL NOT NULL,
    latitude   REAL NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_location_alerts_point
    ON location_alerts(latitude, longitude);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
