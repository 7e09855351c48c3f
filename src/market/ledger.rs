//! Bid creation, listing and withdrawal.

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, SqlErr, TransactionTrait};
use uuid::Uuid;

use super::{require_positive_amount, require_text, rollback};
use crate::db::bids as bid_db;
use crate::db::gigs as gig_db;
use crate::error::{MarketError, Result};
use crate::models::bids::{self, NewBid};

/// Place a pending bid on an open gig.
///
/// Runs in one transaction holding the gig's row guard, so a submit that
/// races a hire on the same gig is ordered against it: once the hire has
/// committed, the guard matches no row and the submit fails with
/// `GigNotOpen`.
pub async fn submit_bid(db: &DatabaseConnection, input: NewBid) -> Result<bids::Model> {
    require_text("message", &input.message)?;
    require_positive_amount("price", input.price)?;

    let input = NewBid {
        message: input.message.trim().to_string(),
        ..input
    };

    let txn = db.begin().await?;
    match insert_pending_bid(&txn, input).await {
        Ok(bid) => {
            txn.commit().await?;
            tracing::info!(bid_id = %bid.id, gig_id = %bid.gig_id, freelancer_id = %bid.freelancer_id, "Bid submitted");
            Ok(bid)
        }
        Err(e) => {
            rollback(txn).await;
            Err(e)
        }
    }
}

async fn insert_pending_bid(txn: &DatabaseTransaction, input: NewBid) -> Result<bids::Model> {
    let gig_id = input.gig_id;

    let gig = gig_db::get_gig_by_id(txn, gig_id)
        .await?
        .ok_or(MarketError::GigNotFound(gig_id))?;

    if gig.owner_id == input.freelancer_id {
        return Err(MarketError::Validation(
            "You cannot bid on your own gig".to_string(),
        ));
    }

    if !gig_db::lock_if_open(txn, gig_id).await? {
        return Err(MarketError::GigNotOpen(gig_id));
    }

    if bid_db::get_bid_for_gig_and_freelancer(txn, gig_id, input.freelancer_id)
        .await?
        .is_some()
    {
        return Err(MarketError::DuplicateBid(gig_id));
    }

    bid_db::insert_bid(txn, input).await.map_err(|e| match e.sql_err() {
        // Two submits from the same freelancer that passed the check together.
        Some(SqlErr::UniqueConstraintViolation(_)) => MarketError::DuplicateBid(gig_id),
        _ => MarketError::Transaction(e),
    })
}

/// All bids for a gig, any status, in submission order.
pub async fn list_bids_for_gig<C: ConnectionTrait>(db: &C, gig_id: Uuid) -> Result<Vec<bids::Model>> {
    Ok(bid_db::get_bids_by_gig_id(db, gig_id).await?)
}

/// Delete the caller's own bid while it is still pending.
pub async fn withdraw_bid<C: ConnectionTrait>(db: &C, bid_id: Uuid, freelancer_id: Uuid) -> Result<()> {
    let bid = bid_db::get_bid_by_id(db, bid_id)
        .await?
        .ok_or(MarketError::BidNotFound(bid_id))?;

    if bid.freelancer_id != freelancer_id {
        return Err(MarketError::Forbidden(
            "You can only withdraw your own bids".to_string(),
        ));
    }

    // Guarded delete: a hire that committed since the read above wins.
    if !bid_db::delete_pending_bid(db, bid_id).await? {
        return Err(MarketError::BidNotPending(bid_id));
    }

    tracing::info!(%bid_id, gig_id = %bid.gig_id, "Bid withdrawn");
    Ok(())
}
