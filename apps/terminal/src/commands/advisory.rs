//! # Advisory Commands
//!
//! Prompts are built from a cloned snapshot so the state lock is released
//! before any network I/O. Every failure degrades to fixed text; advisory
//! output never changes state.

use tracing::{debug, warn};

use crate::advisory::{AdvisoryClient, AdvisoryError};
use crate::auth::{Permission, Session};
use crate::error::ApiError;
use crate::state::Coordinator;
use lanche_core::advisory::{
    insight_prompt, restock_prompt, INSIGHT_EMPTY_MESSAGE, INSIGHT_FAILURE_MESSAGE,
    MISSING_KEY_MESSAGE, RESTOCK_FAILURE_MESSAGE,
};

/// Executive summary of stock, revenue and recent sales.
pub async fn business_insight(
    coordinator: &Coordinator,
    session: &Session,
    client: &dyn AdvisoryClient,
) -> Result<String, ApiError> {
    debug!("business_insight command");
    session.require(Permission::ViewReports)?;

    let prompt = coordinator.read(|state| insight_prompt(state.products(), state.sales()));

    Ok(match client.generate(&prompt).await {
        Ok(text) => text,
        Err(AdvisoryError::MissingApiKey) => MISSING_KEY_MESSAGE.to_string(),
        Err(AdvisoryError::EmptyReply) => INSIGHT_EMPTY_MESSAGE.to_string(),
        Err(e) => {
            warn!(error = %e, "Business insight unavailable");
            INSIGHT_FAILURE_MESSAGE.to_string()
        }
    })
}

/// Suggested order for the products bought from `supplier_id`.
///
/// Empty text when advisory is not configured or has nothing to say.
pub async fn restock_suggestion(
    coordinator: &Coordinator,
    session: &Session,
    client: &dyn AdvisoryClient,
    supplier_id: &str,
) -> Result<String, ApiError> {
    debug!(supplier_id = %supplier_id, "restock_suggestion command");
    session.require(Permission::ViewPurchases)?;

    let prompt = coordinator
        .read(|state| {
            state
                .supplier(supplier_id)
                .map(|supplier| restock_prompt(state.products(), supplier))
        })
        .ok_or_else(|| ApiError::not_found("Supplier", supplier_id))?;

    Ok(match client.generate(&prompt).await {
        Ok(text) => text,
        Err(AdvisoryError::MissingApiKey | AdvisoryError::EmptyReply) => String::new(),
        Err(e) => {
            warn!(error = %e, "Restock suggestion unavailable");
            RESTOCK_FAILURE_MESSAGE.to_string()
        }
    })
}
