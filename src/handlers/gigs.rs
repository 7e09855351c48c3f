use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::gigs as gig_db;
use crate::error::Result;
use crate::market::gigs as gig_service;
use crate::models::gigs::{CreateGig, GigListQuery};

/// GET /api/gigs?status=open&search=logo&page=1&limit=20: browse gigs.
pub async fn get_gigs(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<GigListQuery>,
) -> Result<HttpResponse> {
    let gigs = gig_db::list_gigs(db.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(gigs))
}

/// GET /api/gigs/mine: gigs posted by the authenticated user.
pub async fn get_my_gigs(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse> {
    let gigs = gig_db::get_gigs_by_owner_id(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(gigs))
}

/// GET /api/gigs/{id}: a single gig.
pub async fn get_gig(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let gig = gig_service::get_gig(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(gig))
}

/// POST /api/gigs: post a new gig owned by the authenticated user.
pub async fn create_gig(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateGig>,
) -> Result<HttpResponse> {
    let gig = gig_service::create_gig(db.get_ref(), user.0.id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(gig))
}
