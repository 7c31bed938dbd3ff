//! # Coordinator
//!
//! Single writer over the terminal's [`AppState`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Mutation Flow                                        │
//! │                                                                         │
//! │  command ──► coordinator.mutate(|state| state.record_sale(req))        │
//! │                  │                                                      │
//! │                  ├── lock Mutex<AppState>                              │
//! │                  ├── run the core operation                            │
//! │                  │     Err ──► unlock, nothing persisted               │
//! │                  ├── Ok: revision += 1, clone snapshot                 │
//! │                  └── unlock                                            │
//! │                          │                                              │
//! │                          ▼                                              │
//! │            tokio::spawn(save snapshot @ revision)                      │
//! │                          │                                              │
//! │                          ├── older than last saved revision? skip      │
//! │                          └── failure ──► tracing::error!, no rollback  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Background saves may finish out of order; the saved-revision gate keeps
//! an older snapshot from overwriting a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, warn};

use crate::error::ApiError;
use lanche_core::{AppState, CoreResult};
use lanche_db::{Database, DbResult};

/// Owns the application state and its persistence.
#[derive(Debug)]
pub struct Coordinator {
    state: Mutex<AppState>,
    revision: AtomicU64,
    db: Option<Database>,
    saved_revision: Arc<AsyncMutex<u64>>,
}

impl Coordinator {
    /// Wraps `state`; with `db`, every successful mutation is saved.
    pub fn new(state: AppState, db: Option<Database>) -> Self {
        Coordinator {
            state: Mutex::new(state),
            revision: AtomicU64::new(0),
            db,
            saved_revision: Arc::new(AsyncMutex::new(0)),
        }
    }

    /// Coordinator without persistence.
    pub fn in_memory(state: AppState) -> Self {
        Self::new(state, None)
    }

    pub fn database(&self) -> Option<&Database> {
        self.db.as_ref()
    }

    /// Number of committed mutations since startup.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        // a panic mid-operation cannot leave a half-applied change: core
        // operations validate before they mutate
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `f` against the current state under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        let state = self.lock();
        f(&*state)
    }

    /// Clone of the current state, for work done outside the lock.
    pub fn snapshot(&self) -> AppState {
        self.lock().clone()
    }

    /// Runs a core operation and schedules a save when it succeeds.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut AppState) -> CoreResult<R>) -> Result<R, ApiError> {
        let (result, revision, snapshot) = {
            let mut state = self.lock();
            let result = f(&mut *state)?;
            let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
            let snapshot = self.db.is_some().then(|| state.clone());
            (result, revision, snapshot)
        };

        if let Some(snapshot) = snapshot {
            self.persist(revision, snapshot);
        }

        Ok(result)
    }

    fn persist(&self, revision: u64, snapshot: AppState) {
        let Some(db) = self.db.clone() else {
            return;
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(revision, "No async runtime; snapshot not persisted");
            return;
        };

        let saved_revision = Arc::clone(&self.saved_revision);
        runtime.spawn(async move {
            if let Err(e) = save_revision(&db, &saved_revision, revision, &snapshot).await {
                error!(revision, error = %e, "Failed to persist state");
            }
        });
    }

    /// Saves the current state now and waits for it.
    ///
    /// Used at shutdown so pending background saves cannot be lost.
    pub async fn flush(&self) -> Result<(), ApiError> {
        let Some(db) = &self.db else {
            return Ok(());
        };
        let (revision, snapshot) = {
            let state = self.lock();
            (self.revision(), state.clone())
        };
        save_revision(db, &self.saved_revision, revision, &snapshot).await?;
        Ok(())
    }
}

async fn save_revision(
    db: &Database,
    saved_revision: &AsyncMutex<u64>,
    revision: u64,
    snapshot: &AppState,
) -> DbResult<()> {
    let mut saved = saved_revision.lock().await;
    if revision < *saved {
        debug!(revision, saved = *saved, "Skipping stale snapshot");
        return Ok(());
    }
    db.state().save(snapshot).await?;
    *saved = revision;
    debug!(revision, "Snapshot persisted");
    Ok(())
}
