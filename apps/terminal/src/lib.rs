//! # Lanche Terminal Library
//!
//! Orchestration layer of the Lanche POS: configuration, logging, the
//! single-writer coordinator, permission-checked commands and the advisory
//! client. Business rules live in `lanche-core`; storage in `lanche-db`.
//!
//! ## Module Organization
//! ```text
//! lanche_terminal/
//! ├── lib.rs          ◄─── You are here (tracing, boot, run)
//! ├── auth.rs         ◄─── Role → permission table, Session
//! ├── advisory.rs     ◄─── AdvisoryClient trait + HTTP implementation
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── TerminalConfig (LANCHE_* env vars)
//! │   └── coordinator.rs ◄─ Mutex<AppState> + background persistence
//! ├── commands/       ◄─── One module per area (sale, comanda, ...)
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let coordinator = lanche_terminal::boot(&TerminalConfig::from_env()).await?;
//! let session = Session::new("u1", "Ana", Role::Caixa);
//! let sale = commands::sale::record_sale(&coordinator, &session, request)?;
//! ```

pub mod advisory;
pub mod auth;
pub mod commands;
pub mod error;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use lanche_core::report::dashboard_metrics;
use lanche_db::{Database, DbConfig};
use state::{Coordinator, TerminalConfig};

/// Restores the persisted state and wraps it in a [`Coordinator`].
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Resolve database path (LANCHE_DB_PATH or platform data dir)       │
/// │  2. Connect (WAL, foreign keys) and run pending migrations            │
/// │  3. Load the saved AppState, or start empty on first boot             │
/// │  4. Apply the configured stock policy                                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn boot(config: &TerminalConfig) -> Result<Coordinator, ApiError> {
    let db_path = config.resolve_database_path()?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    boot_with(config, db).await
}

/// Same as [`boot`] over an already opened database.
pub async fn boot_with(config: &TerminalConfig, db: Database) -> Result<Coordinator, ApiError> {
    let mut state = db.load_state().await?;
    state.set_stock_policy(config.stock_policy);
    info!(policy = ?config.stock_policy, "Stock policy applied");

    Ok(Coordinator::new(state, Some(db)))
}

/// Boots the terminal, logs a status summary and shuts down cleanly.
pub async fn run() -> Result<(), ApiError> {
    init_tracing();

    let config = TerminalConfig::from_env();
    info!(store = %config.store_name, "Starting Lanche POS terminal");

    let coordinator = boot(&config).await?;

    let metrics = coordinator.read(dashboard_metrics);
    info!(
        sales = metrics.sale_count,
        revenue = %metrics.total_sales,
        purchases = %metrics.total_purchases,
        average_ticket = %metrics.average_ticket,
        low_stock = metrics.low_stock_count,
        "Status"
    );

    coordinator.flush().await?;
    if let Some(db) = coordinator.database() {
        db.close().await;
    }
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=lanche=trace` - Show trace for lanche crates only
/// - Default: `info,lanche=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lanche=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
