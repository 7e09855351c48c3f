//! Marketplace business rules on top of the `db` query layer.

pub mod gigs;
pub mod hire;
pub mod ledger;

use sea_orm::DatabaseTransaction;

use crate::error::{MarketError, Result};

pub use hire::{HireEngine, HireOutcome};

/// Roll back, logging (not returning) a failed rollback: the caller already
/// has the error that caused it, and the server aborts an orphaned
/// transaction when the connection is reset.
pub(crate) async fn rollback(txn: DatabaseTransaction) {
    if let Err(e) = txn.rollback().await {
        tracing::warn!("Rollback failed: {e}");
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MarketError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

pub(crate) fn require_positive_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(MarketError::Validation(format!(
            "{field} must be a positive amount"
        )));
    }
    Ok(())
}
