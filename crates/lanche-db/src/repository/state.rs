//! # State Repository
//!
//! Persists the whole [`AppState`] as one JSON document per concern.
//!
//! ## Save / Load
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Document Layout                                   │
//! │                                                                         │
//! │  AppState ──serde_json──► { "products": [...], "sales": [...], ... }    │
//! │                                   │                                     │
//! │                                   ▼  one row per top-level key          │
//! │  state_documents                                                        │
//! │  ┌────────────────┬─────────────────────────┬──────────────────────┐   │
//! │  │ concern (PK)   │ payload (json_valid)    │ updated_at           │   │
//! │  ├────────────────┼─────────────────────────┼──────────────────────┤   │
//! │  │ products       │ [{"id":..,"type":..}]   │ 2025-01-01T12:00:00Z │   │
//! │  │ shoppingList   │ [...]                   │ ...                  │   │
//! │  └────────────────┴─────────────────────────┴──────────────────────┘   │
//! │                                                                         │
//! │  save: every concern upserted inside ONE transaction                   │
//! │  load: rows reassembled into an object, then deserialized              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A concern missing on disk falls back to its empty default, so a database
//! written before a concern existed still loads.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use lanche_core::AppState;

/// Repository for the persisted application state.
#[derive(Debug, Clone)]
pub struct StateRepository {
    pool: SqlitePool,
}

impl StateRepository {
    /// Creates a new StateRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StateRepository { pool }
    }

    /// Loads the last saved state.
    ///
    /// Returns `None` when nothing has ever been saved (first boot).
    /// Rows whose key is not a known concern are skipped with a warning.
    pub async fn load(&self) -> DbResult<Option<AppState>> {
        let rows = sqlx::query("SELECT concern, payload FROM state_documents")
            .fetch_all(&self.pool)
            .await?;

        if rows.is_empty() {
            debug!("No persisted state found");
            return Ok(None);
        }

        let mut document = Map::new();
        for row in rows {
            let concern: String = row.try_get("concern")?;
            let payload: String = row.try_get("payload")?;

            if !AppState::CONCERNS.contains(&concern.as_str()) {
                warn!(concern = %concern, "Ignoring unknown persisted concern");
                continue;
            }

            let value: Value =
                serde_json::from_str(&payload).map_err(|e| DbError::malformed(&concern, e))?;
            document.insert(concern, value);
        }

        let state: AppState = serde_json::from_value(Value::Object(document))
            .map_err(|e| DbError::malformed("state", e))?;

        debug!(
            products = state.products().len(),
            sales = state.sales().len(),
            "Loaded persisted state"
        );

        Ok(Some(state))
    }

    /// Loads a single concern without deserializing the rest.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let sales: Option<Vec<Sale>> = db.state().load_concern("sales").await?;
    /// ```
    pub async fn load_concern<T: DeserializeOwned>(&self, concern: &str) -> DbResult<Option<T>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM state_documents WHERE concern = ?1")
                .bind(concern)
                .fetch_optional(&self.pool)
                .await?;

        payload
            .map(|p| serde_json::from_str(&p).map_err(|e| DbError::malformed(concern, e)))
            .transpose()
    }

    /// Saves every concern of `state` atomically.
    ///
    /// Either all concerns are written or none are.
    pub async fn save(&self, state: &AppState) -> DbResult<()> {
        let document = match serde_json::to_value(state) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(DbError::malformed("state", "expected a JSON object")),
            Err(e) => return Err(DbError::malformed("state", e)),
        };

        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        for concern in AppState::CONCERNS {
            let payload = document.get(concern).cloned().unwrap_or(Value::Array(Vec::new()));
            let payload =
                serde_json::to_string(&payload).map_err(|e| DbError::malformed(concern, e))?;

            sqlx::query(
                r#"
                INSERT INTO state_documents (concern, payload, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(concern) DO UPDATE SET
                    payload = excluded.payload,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(concern)
            .bind(&payload)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(concerns = AppState::CONCERNS.len(), "State saved");
        Ok(())
    }

    /// Lists the concerns currently on disk, sorted.
    pub async fn stored_concerns(&self) -> DbResult<Vec<String>> {
        let concerns: Vec<String> =
            sqlx::query_scalar("SELECT concern FROM state_documents ORDER BY concern")
                .fetch_all(&self.pool)
                .await?;
        Ok(concerns)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
