//! # Database Handle
//!
//! Opens the terminal's SQLite file and restores the saved [`AppState`].
//!
//! ```text
//! boot
//!  │
//!  ▼
//! Database::new(DbConfig::new(path))   WAL, foreign keys, migrations
//!  │
//!  ▼
//! db.load_state()  ──► saved AppState, or empty on first boot
//!  │
//!  ▼
//! Coordinator ── after every mutation ──► db.state().save(&snapshot)   (spawned)
//! ```
//!
//! The coordinator is the only writer, so the pool stays small: one
//! connection for the background save plus a few for report reads. WAL keeps
//! those reads from waiting on a save in progress.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use lanche_core::AppState;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::state::StateRepository;

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the terminal database lives and how the pool is sized.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,
    /// Default 4.
    pub max_connections: u32,
    /// How long a report read waits for a save to release the file.
    pub busy_timeout: Duration,
    pub run_migrations: bool,
}

impl DbConfig {
    /// The file is created on first boot.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 4,
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Isolated database for tests; the single connection holds all data.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            ..DbConfig::new(IN_MEMORY)
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }
}

// =============================================================================
// Database
// =============================================================================

/// Cheap to clone: the coordinator hands a clone to every spawned save.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening terminal database");

        let connect_options =
            SqliteConnectOptions::from_str(&format!("sqlite://{}", config.database_path.display()))
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .busy_timeout(config.busy_timeout)
                .foreign_keys(true)
                .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
        if config.is_in_memory() {
            // dropping the last connection would drop the data with it
            pool_options = pool_options.min_connections(1).idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        debug!(max_connections = config.max_connections, "Pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn state(&self) -> StateRepository {
        StateRepository::new(self.pool.clone())
    }

    /// The saved state, or an empty one when nothing was ever saved.
    pub async fn load_state(&self) -> DbResult<AppState> {
        match self.state().load().await? {
            Some(state) => {
                info!(
                    products = state.products().len(),
                    customers = state.customers().len(),
                    sales = state.sales().len(),
                    open_comandas = state.active_comandas().len(),
                    cash_register_open = state.current_cash_register().is_some(),
                    "State restored"
                );
                Ok(state)
            }
            None => {
                info!("No saved state, starting empty");
                Ok(AppState::new())
            }
        }
    }

    /// After closing, every save and load fails.
    pub async fn close(&self) {
        info!("Closing terminal database");
        self.pool.close().await;
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
