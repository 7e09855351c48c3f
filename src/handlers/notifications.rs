use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::notifications as notification_db;
use crate::error::{MarketError, Result};
use crate::models::notifications::NotificationList;

/// GET /api/notifications: the caller's notification log, newest first.
pub async fn get_notifications(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse> {
    let notifications = notification_db::get_notifications_by_user_id(db.get_ref(), user.0.id).await?;
    let unread_count = notifications.iter().filter(|n| !n.is_read).count() as u64;

    Ok(HttpResponse::Ok().json(NotificationList {
        notifications,
        unread_count,
    }))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if !notification_db::mark_as_read(db.get_ref(), id, user.0.id).await? {
        return Err(MarketError::NotificationNotFound(id));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Notification {id} marked as read"),
    })))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse> {
    let updated = notification_db::mark_all_as_read(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "updated": updated })))
}

/// DELETE /api/notifications: clear the caller's notification log.
pub async fn clear_notifications(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse> {
    let deleted = notification_db::clear_for_user(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted })))
}
