use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::bids::{self, BidStatus, BidWithGig, NewBid};
use crate::models::gigs;

/// Insert a new bid (always Pending).
pub async fn insert_bid<C: ConnectionTrait>(db: &C, input: NewBid) -> Result<bids::Model, DbErr> {
    let new_bid = bids::ActiveModel {
        id: Set(Uuid::new_v4()),
        gig_id: Set(input.gig_id),
        freelancer_id: Set(input.freelancer_id),
        message: Set(input.message),
        price: Set(input.price),
        status: Set(BidStatus::Pending),
        created_at: Set(chrono::Utc::now()),
    };

    new_bid.insert(db).await
}

/// Fetch a single bid by ID.
pub async fn get_bid_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<bids::Model>, DbErr> {
    bids::Entity::find_by_id(id).one(db).await
}

/// Find the bid a freelancer placed on a gig, if any.
pub async fn get_bid_for_gig_and_freelancer<C: ConnectionTrait>(
    db: &C,
    gig_id: Uuid,
    freelancer_id: Uuid,
) -> Result<Option<bids::Model>, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::GigId.eq(gig_id))
        .filter(bids::Column::FreelancerId.eq(freelancer_id))
        .one(db)
        .await
}

/// All bids on a gig, any status, in submission order.
pub async fn get_bids_by_gig_id<C: ConnectionTrait>(
    db: &C,
    gig_id: Uuid,
) -> Result<Vec<bids::Model>, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::GigId.eq(gig_id))
        .order_by_asc(bids::Column::CreatedAt)
        .all(db)
        .await
}

/// All bids a freelancer has placed, newest first, each with its gig.
pub async fn get_bids_by_freelancer_id<C: ConnectionTrait>(
    db: &C,
    freelancer_id: Uuid,
) -> Result<Vec<BidWithGig>, DbErr> {
    let rows = bids::Entity::find()
        .filter(bids::Column::FreelancerId.eq(freelancer_id))
        .order_by_desc(bids::Column::CreatedAt)
        .find_also_related(gigs::Entity)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(bid, gig)| BidWithGig { bid, gig })
        .collect())
}

/// `pending -> hired` for one bid. Returns `false` if the bid is not pending.
pub async fn mark_hired_if_pending<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = bids::Entity::update_many()
        .col_expr(bids::Column::Status, Expr::value(BidStatus::Hired))
        .filter(bids::Column::Id.eq(id))
        .filter(bids::Column::Status.eq(BidStatus::Pending))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Reject every still-pending bid on a gig except `keep`. Already-rejected
/// bids are untouched. Returns how many bids were rejected.
pub async fn reject_pending_siblings<C: ConnectionTrait>(
    db: &C,
    gig_id: Uuid,
    keep: Uuid,
) -> Result<u64, DbErr> {
    let result = bids::Entity::update_many()
        .col_expr(bids::Column::Status, Expr::value(BidStatus::Rejected))
        .filter(bids::Column::GigId.eq(gig_id))
        .filter(bids::Column::Id.ne(keep))
        .filter(bids::Column::Status.eq(BidStatus::Pending))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Delete a bid only while it is still pending.
pub async fn delete_pending_bid<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = bids::Entity::delete_many()
        .filter(bids::Column::Id.eq(id))
        .filter(bids::Column::Status.eq(BidStatus::Pending))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}
