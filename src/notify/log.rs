use futures_util::future::BoxFuture;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use super::{NotificationEvent, Notifier, NotifyError};
use crate::db::notifications as notification_db;

/// Persists events to the `notifications` table for clients that poll.
#[derive(Clone)]
pub struct NotificationLog {
    db: DatabaseConnection,
}

impl NotificationLog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl Notifier for NotificationLog {
    fn name(&self) -> &'static str {
        "log"
    }

    fn deliver<'a>(
        &'a self,
        user_id: Uuid,
        event: &'a NotificationEvent,
    ) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async move {
            notification_db::insert_notification(
                &self.db,
                user_id,
                event.kind,
                event.gig_id,
                event.bid_id,
                event.message.clone(),
            )
            .await?;
            Ok(())
        })
    }
}
