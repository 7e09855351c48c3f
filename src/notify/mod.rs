//! Post-commit notification of hired freelancers.
//!
//! The hire engine hands a [`NotificationEvent`] to the
//! [`NotificationDispatcher`], which delivers it to every configured
//! [`Notifier`] sink on a background task. Delivery is best-effort: failures
//! are logged and dropped.

pub mod dispatcher;
pub mod hub;
pub mod log;
pub mod session;

use futures_util::future::BoxFuture;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::notifications::NotificationKind;

pub use dispatcher::NotificationDispatcher;
pub use hub::NotificationHub;
pub use log::NotificationLog;

/// Payload delivered to a user. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub gig_id: Uuid,
    pub bid_id: Uuid,
    pub message: String,
}

impl NotificationEvent {
    pub fn hired(gig_id: Uuid, bid_id: Uuid, gig_title: &str) -> Self {
        Self {
            kind: NotificationKind::Hired,
            gig_id,
            bid_id,
            message: format!("You have been hired for \"{gig_title}\"!"),
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to persist notification: {0}")]
    Store(#[from] sea_orm::DbErr),

    #[error("notification channel closed")]
    Closed,
}

/// A delivery sink. Implementations must not block the caller for long:
/// the dispatcher already runs them off the request path, but it awaits
/// each sink in turn.
pub trait Notifier: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    fn deliver<'a>(
        &'a self,
        user_id: Uuid,
        event: &'a NotificationEvent,
    ) -> BoxFuture<'a, Result<(), NotifyError>>;
}
