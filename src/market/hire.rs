//! The hire transaction: one bid wins, its gig closes, every other pending
//! bid on the gig is rejected, all in one atomic unit.

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde::Serialize;
use uuid::Uuid;

use super::rollback;
use crate::db::bids as bid_db;
use crate::db::gigs as gig_db;
use crate::error::{MarketError, Result};
use crate::notify::{NotificationDispatcher, NotificationEvent};

/// What a successful hire changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HireOutcome {
    pub gig_id: Uuid,
    pub bid_id: Uuid,
    pub freelancer_id: Uuid,
    /// Pending bids flipped to rejected by this hire.
    pub rejected_bids: u64,
}

#[derive(Clone)]
pub struct HireEngine {
    db: DatabaseConnection,
    dispatcher: NotificationDispatcher,
}

impl HireEngine {
    pub fn new(db: DatabaseConnection, dispatcher: NotificationDispatcher) -> Self {
        Self { db, dispatcher }
    }

    /// Hire `bid_id` on behalf of `requested_by`, who must own the bid's gig.
    ///
    /// Exactly one of any number of concurrent hires on the same gig
    /// succeeds; the rest get `GigAlreadyAssigned`. The gig's
    /// `open -> assigned` compare-and-swap is the serialization point. On any
    /// error the transaction is rolled back and nothing is notified. Storage
    /// failures are not retried here, since a retry after an unseen commit
    /// would notify twice.
    pub async fn hire(&self, bid_id: Uuid, requested_by: Uuid) -> Result<HireOutcome> {
        let txn = self.db.begin().await?;

        let (outcome, gig_title) = match assign(&txn, bid_id, requested_by).await {
            Ok(assigned) => assigned,
            Err(e) => {
                rollback(txn).await;
                tracing::info!(%bid_id, "Hire refused: {e}");
                return Err(e);
            }
        };

        txn.commit().await?;

        tracing::info!(
            gig_id = %outcome.gig_id,
            %bid_id,
            freelancer_id = %outcome.freelancer_id,
            rejected = outcome.rejected_bids,
            "Freelancer hired"
        );

        // Outside the atomic unit: delivery can no longer affect the hire.
        self.dispatcher.notify_hired(
            outcome.freelancer_id,
            NotificationEvent::hired(outcome.gig_id, bid_id, &gig_title),
        );

        Ok(outcome)
    }
}

async fn assign(
    txn: &DatabaseTransaction,
    bid_id: Uuid,
    requested_by: Uuid,
) -> Result<(HireOutcome, String)> {
    let bid = bid_db::get_bid_by_id(txn, bid_id)
        .await?
        .ok_or(MarketError::BidNotFound(bid_id))?;

    let gig = gig_db::get_gig_by_id(txn, bid.gig_id)
        .await?
        .ok_or(MarketError::GigNotFound(bid.gig_id))?;

    if gig.owner_id != requested_by {
        return Err(MarketError::Forbidden(
            "Only the gig owner can hire a bid".to_string(),
        ));
    }

    // `gig.status` may already be stale. Only the guarded update decides.
    if !gig_db::assign_if_open(txn, gig.id).await? {
        return Err(MarketError::GigAlreadyAssigned(gig.id));
    }

    if !bid_db::mark_hired_if_pending(txn, bid.id).await? {
        return Err(MarketError::BidNotPending(bid.id));
    }

    let rejected_bids = bid_db::reject_pending_siblings(txn, gig.id, bid.id).await?;

    Ok((
        HireOutcome {
            gig_id: gig.id,
            bid_id: bid.id,
            freelancer_id: bid.freelancer_id,
            rejected_bids,
        },
        gig.title,
    ))
}
