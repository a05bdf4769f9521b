//! Nivaran Database Library
//!
//! Postgres repositories for users and reports. Queries are dynamic SQLx
//! queries so builds never require DATABASE_URL or `sqlx prepare`.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE users (
//!     id            UUID PRIMARY KEY,
//!     name          TEXT NOT NULL,
//!     email         TEXT NOT NULL UNIQUE,
//!     password_hash TEXT NOT NULL,
//!     phone         TEXT NOT NULL,
//!     role          TEXT NOT NULL DEFAULT 'user',
//!     department    TEXT,
//!     created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//!
//! CREATE TABLE reports (
//!     id          UUID PRIMARY KEY,
//!     title       TEXT NOT NULL,
//!     description TEXT NOT NULL,
//!     image_url   TEXT,
//!     media_urls  TEXT[] NOT NULL DEFAULT '{}',
//!     location    TEXT NOT NULL,
//!     department  TEXT NOT NULL,
//!     status      TEXT NOT NULL DEFAULT 'pending',
//!     flag        BOOLEAN NOT NULL DEFAULT FALSE,
//!     created_by  UUID NOT NULL REFERENCES users(id),
//!     created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

pub mod reports;
pub mod users;

pub use reports::{JoinedReport, ReportRepository};
pub use users::UserRepository;
