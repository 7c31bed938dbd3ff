//! # lanche-db: Database Layer for Lanche POS
//!
//! This crate persists the terminal's [`AppState`](lanche_core::AppState)
//! in SQLite, using sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Lanche POS Data Flow                             │
//! │                                                                         │
//! │  Terminal command (record_sale)                                        │
//! │       │  mutate AppState in memory, then spawn a save                  │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     lanche-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories   │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │   (state.rs)    │   │  (embedded)  │  │   │
//! │  │   │               │    │                 │   │              │  │   │
//! │  │   │ SqlitePool    │◄───│ StateRepository │   │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └─────────────────┘   └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/lanche.db  (or LANCHE_DB_PATH)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Opening the database and restoring the saved state
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lanche_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/lanche.db")).await?;
//!
//! let state = db.load_state().await?;
//! db.state().save(&state).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::state::StateRepository;
