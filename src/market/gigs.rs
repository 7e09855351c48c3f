use sea_orm::ConnectionTrait;
use uuid::Uuid;

use super::{require_positive_amount, require_text};
use crate::db::gigs as gig_db;
use crate::error::{MarketError, Result};
use crate::models::gigs::{self, CreateGig};

/// Post a new open gig for `owner_id`.
pub async fn create_gig<C: ConnectionTrait>(
    db: &C,
    owner_id: Uuid,
    input: CreateGig,
) -> Result<gigs::Model> {
    require_text("title", &input.title)?;
    require_text("description", &input.description)?;
    require_positive_amount("budget", input.budget)?;

    let input = CreateGig {
        title: input.title.trim().to_string(),
        description: input.description.trim().to_string(),
        budget: input.budget,
    };

    let gig = gig_db::insert_gig(db, input, owner_id).await?;
    tracing::info!(gig_id = %gig.id, %owner_id, "Gig posted");
    Ok(gig)
}

pub async fn get_gig<C: ConnectionTrait>(db: &C, gig_id: Uuid) -> Result<gigs::Model> {
    gig_db::get_gig_by_id(db, gig_id)
        .await?
        .ok_or(MarketError::GigNotFound(gig_id))
}
