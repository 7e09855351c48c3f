use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::bids as bid_db;
use crate::error::Result;
use crate::market::{HireEngine, gigs as gig_service, ledger};
use crate::models::bids::NewBid;

/// POST /api/bids: a freelancer bids on an open gig.
///
/// The freelancer is the authenticated user. One bid per freelancer per gig.
pub async fn create_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateBidRequest>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    let input = NewBid {
        gig_id: body.gig_id,
        freelancer_id: user.0.id,
        message: body.message,
        price: body.price,
    };

    let bid = ledger::submit_bid(db.get_ref(), input).await?;
    Ok(HttpResponse::Created().json(bid))
}

/// GET /api/bids?gig_id=...: bids on a gig in submission order.
///
/// The gig owner sees every bid; anyone else sees only their own.
pub async fn get_bids_for_gig(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<GigBidsQuery>,
) -> Result<HttpResponse> {
    let gig = gig_service::get_gig(db.get_ref(), query.gig_id).await?;
    let mut bids = ledger::list_bids_for_gig(db.get_ref(), gig.id).await?;

    if gig.owner_id != user.0.id {
        bids.retain(|b| b.freelancer_id == user.0.id);
    }

    Ok(HttpResponse::Ok().json(bids))
}

/// GET /api/bids/mine: the authenticated user's bids, each with its gig.
pub async fn get_my_bids(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse> {
    let bids = bid_db::get_bids_by_freelancer_id(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(bids))
}

/// DELETE /api/bids/{id}: withdraw one's own pending bid.
pub async fn withdraw_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let bid_id = path.into_inner();
    ledger::withdraw_bid(db.get_ref(), bid_id, user.0.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Bid {bid_id} withdrawn"),
    })))
}

/// PATCH /api/bids/{id}/hire: the gig owner hires a bid.
pub async fn hire_bid(
    user: AuthenticatedUser,
    engine: web::Data<HireEngine>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    hire(&engine, path.into_inner(), user.0.id).await
}

/// PATCH /api/bids/hire: same as above with the bid id in the body.
pub async fn hire_bid_from_body(
    user: AuthenticatedUser,
    engine: web::Data<HireEngine>,
    body: web::Json<HireRequest>,
) -> Result<HttpResponse> {
    hire(&engine, body.bid_id, user.0.id).await
}

async fn hire(engine: &HireEngine, bid_id: Uuid, requested_by: Uuid) -> Result<HttpResponse> {
    let outcome = engine.hire(bid_id, requested_by).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Freelancer hired successfully",
        "hire": outcome,
    })))
}

// ── Request DTOs ──

/// Request body for POST /api/bids.
/// `freelancer_id` comes from the JWT.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CreateBidRequest {
    #[serde(alias = "gigId")]
    pub gig_id: Uuid,
    pub message: String,
    pub price: f64,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct GigBidsQuery {
    #[serde(alias = "gigId")]
    pub gig_id: Uuid,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct HireRequest {
    #[serde(alias = "bidId")]
    pub bid_id: Uuid,
}
