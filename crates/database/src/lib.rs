//! # Welhome Database Crate
//!
//! This crate is the high-level, application-specific interface to the
//! relational store behind the properties API. It is the only place in
//! the system that speaks SQL.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** Encapsulates all database-specific logic behind a
//!   small API, hiding the SQL and the engine differences from the rest
//!   of the application.
//! - **Engine-agnostic:** Queries go through `sqlx`'s `Any` driver, so
//!   the same code path serves managed PostgreSQL in production and
//!   SQLite in tests; the connection URL scheme selects the engine.
//! - **Lazy & Self-healing Pool:** Connections open on first use, and a
//!   pool closed by an earlier teardown is reopened transparently on
//!   the next acquisition.
//!
//! ## Public API
//!
//! - `Database`: The pool handle with the lazy-open and reopen-on-closed
//!   acquisition behavior.
//! - `ensure_schema`: Idempotent creation of the properties table.
//! - `PropertyRepository`: The high-level data access methods, one
//!   transaction per call.
//! - `DbError`: The specific error types that can be returned from this
//!   crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;
pub mod schema;

// Re-export the key components to create a clean, public-facing API.
pub use connection::Database;
pub use error::DbError;
pub use repository::PropertyRepository;
pub use schema::ensure_schema;
