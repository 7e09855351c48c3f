use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::*;
use uuid::Uuid;

use crate::models::gigs::{self, CreateGig, GigListQuery, GigStatus};

/// Insert a new gig. New gigs are always open.
pub async fn insert_gig<C: ConnectionTrait>(
    db: &C,
    input: CreateGig,
    owner_id: Uuid,
) -> Result<gigs::Model, DbErr> {
    let new_gig = gigs::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title),
        description: Set(input.description),
        budget: Set(input.budget),
        owner_id: Set(owner_id),
        status: Set(GigStatus::Open),
        created_at: Set(chrono::Utc::now()),
    };

    new_gig.insert(db).await
}

/// Fetch a single gig by ID.
pub async fn get_gig_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<gigs::Model>, DbErr> {
    gigs::Entity::find_by_id(id).one(db).await
}

/// Fetch one page of gigs, newest first, filtered by status and search term.
pub async fn list_gigs<C: ConnectionTrait>(
    db: &C,
    query: &GigListQuery,
) -> Result<Vec<gigs::Model>, DbErr> {
    let mut select = gigs::Entity::find();

    if let Some(status) = query.status {
        select = select.filter(gigs::Column::Status.eq(status));
    }

    if let Some(term) = query.search_term() {
        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        select = select.filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col(gigs::Column::Title)))
                        .like(LikeExpr::new(pattern.clone()).escape('\\')),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col(gigs::Column::Description)))
                        .like(LikeExpr::new(pattern).escape('\\')),
                ),
        );
    }

    select
        .order_by_desc(gigs::Column::CreatedAt)
        .paginate(db, query.limit())
        .fetch_page(query.page() - 1)
        .await
}

/// Make `%` and `_` in a search term match literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Fetch all gigs posted by one owner, newest first.
pub async fn get_gigs_by_owner_id<C: ConnectionTrait>(
    db: &C,
    owner_id: Uuid,
) -> Result<Vec<gigs::Model>, DbErr> {
    gigs::Entity::find()
        .filter(gigs::Column::OwnerId.eq(owner_id))
        .order_by_desc(gigs::Column::CreatedAt)
        .all(db)
        .await
}

/// Take the row guard on an open gig without changing it.
///
/// The no-op `UPDATE ... WHERE status = 'open'` holds the row lock until the
/// surrounding transaction ends, so it is ordered against a concurrent
/// [`assign_if_open`]. Returns `false` if the gig is missing or not open.
pub async fn lock_if_open<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = gigs::Entity::update_many()
        .col_expr(gigs::Column::Status, Expr::col(gigs::Column::Status))
        .filter(gigs::Column::Id.eq(id))
        .filter(gigs::Column::Status.eq(GigStatus::Open))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Compare-and-swap `open -> assigned`. Returns `false` if another writer got
/// there first (or the gig is gone).
pub async fn assign_if_open<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = gigs::Entity::update_many()
        .col_expr(gigs::Column::Status, Expr::value(GigStatus::Assigned))
        .filter(gigs::Column::Id.eq(id))
        .filter(gigs::Column::Status.eq(GigStatus::Open))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}
