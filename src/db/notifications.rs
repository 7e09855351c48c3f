use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::notifications::{self, NotificationKind};

/// Insert a new unread notification.
pub async fn insert_notification<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    kind: NotificationKind,
    gig_id: Uuid,
    bid_id: Uuid,
    message: String,
) -> Result<notifications::Model, DbErr> {
    let new_notification = notifications::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        kind: Set(kind),
        gig_id: Set(gig_id),
        bid_id: Set(bid_id),
        message: Set(message),
        is_read: Set(false),
        created_at: Set(chrono::Utc::now()),
    };

    new_notification.insert(db).await
}

/// A user's notifications, newest first.
pub async fn get_notifications_by_user_id<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Vec<notifications::Model>, DbErr> {
    notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(user_id))
        .order_by_desc(notifications::Column::CreatedAt)
        .all(db)
        .await
}

/// Mark one of the user's notifications as read. Returns `false` if it does
/// not exist or belongs to someone else.
pub async fn mark_as_read<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    user_id: Uuid,
) -> Result<bool, DbErr> {
    let result = notifications::Entity::update_many()
        .col_expr(notifications::Column::IsRead, Expr::value(true))
        .filter(notifications::Column::Id.eq(id))
        .filter(notifications::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Mark every unread notification of a user as read.
pub async fn mark_all_as_read<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<u64, DbErr> {
    let result = notifications::Entity::update_many()
        .col_expr(notifications::Column::IsRead, Expr::value(true))
        .filter(notifications::Column::UserId.eq(user_id))
        .filter(notifications::Column::IsRead.eq(false))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Delete all of a user's notifications.
pub async fn clear_for_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<u64, DbErr> {
    let result = notifications::Entity::delete_many()
        .filter(notifications::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
