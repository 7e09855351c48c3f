use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::future::BoxFuture;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use super::{NotificationEvent, Notifier, NotifyError};

/// A handle to push events to one connected client.
#[derive(Debug, Clone)]
struct Subscriber {
    id: u64,
    sender: mpsc::UnboundedSender<NotificationEvent>,
}

/// Live push channels, keyed by user.
///
/// A user may hold several connections (tabs, devices); an event is sent to
/// all of them. Users with no connection simply miss the push and rely on
/// the notification log.
#[derive(Default)]
pub struct NotificationHub {
    subscribers: RwLock<HashMap<Uuid, Vec<Subscriber>>>,
    next_id: AtomicU64,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection for `user_id`. Returns the subscription id to
    /// pass to [`unsubscribe`](Self::unsubscribe) and the receiving end.
    pub async fn subscribe(
        &self,
        user_id: Uuid,
    ) -> (u64, mpsc::UnboundedReceiver<NotificationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.subscribers
            .write()
            .await
            .entry(user_id)
            .or_default()
            .push(Subscriber { id, sender: tx });

        (id, rx)
    }

    pub async fn unsubscribe(&self, user_id: Uuid, subscription_id: u64) {
        let mut subscribers = self.subscribers.write().await;

        if let Some(list) = subscribers.get_mut(&user_id) {
            list.retain(|s| s.id != subscription_id);
            if list.is_empty() {
                subscribers.remove(&user_id);
            }
        }
    }

    pub async fn connection_count(&self, user_id: Uuid) -> usize {
        self.subscribers
            .read()
            .await
            .get(&user_id)
            .map_or(0, Vec::len)
    }

    /// Push to every live connection of `user_id`, pruning closed ones.
    /// Returns how many connections received the event.
    pub async fn push(&self, user_id: Uuid, event: &NotificationEvent) -> usize {
        let mut subscribers = self.subscribers.write().await;
        let Some(list) = subscribers.get_mut(&user_id) else {
            return 0;
        };

        list.retain(|s| s.sender.send(event.clone()).is_ok());
        let delivered = list.len();
        if list.is_empty() {
            subscribers.remove(&user_id);
        }

        delivered
    }
}

impl Notifier for NotificationHub {
    fn name(&self) -> &'static str {
        "push"
    }

    fn deliver<'a>(
        &'a self,
        user_id: Uuid,
        event: &'a NotificationEvent,
    ) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async move {
            let delivered = self.push(user_id, event).await;
            if delivered == 0 {
                tracing::debug!(%user_id, "No live connection for push notification");
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> NotificationEvent {
        NotificationEvent::hired(Uuid::new_v4(), Uuid::new_v4(), "Landing page")
    }

    #[tokio::test]
    async fn push_reaches_every_connection_of_the_user() {
        let hub = NotificationHub::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let (_, mut tab1) = hub.subscribe(alice).await;
        let (_, mut tab2) = hub.subscribe(alice).await;
        let (_, mut other) = hub.subscribe(bob).await;

        let sent = event();
        assert_eq!(hub.push(alice, &sent).await, 2);

        assert_eq!(tab1.recv().await.unwrap(), sent);
        assert_eq!(tab2.recv().await.unwrap(), sent);
        assert!(other.try_recv().is_err());
    }

    #[tokio::test]
    async fn closed_connections_are_pruned() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();

        let (_, rx) = hub.subscribe(user).await;
        drop(rx);

        assert_eq!(hub.push(user, &event()).await, 0);
        assert_eq!(hub.connection_count(user).await, 0);
    }

    #[tokio::test]
    async fn unsubscribe_removes_only_that_connection() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();

        let (first, _rx1) = hub.subscribe(user).await;
        let (_second, _rx2) = hub.subscribe(user).await;

        hub.unsubscribe(user, first).await;
        assert_eq!(hub.connection_count(user).await, 1);
    }

    #[tokio::test]
    async fn offline_user_is_not_a_delivery_failure() {
        let hub = NotificationHub::new();
        assert!(hub.deliver(Uuid::new_v4(), &event()).await.is_ok());
    }
}
