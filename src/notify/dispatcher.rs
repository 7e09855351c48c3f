use std::sync::Arc;

use tokio::task::JoinHandle;
use uuid::Uuid;

use super::{NotificationEvent, Notifier};

/// Fans a committed hire out to every sink on a background task.
#[derive(Clone, Default)]
pub struct NotificationDispatcher {
    sinks: Arc<[Arc<dyn Notifier>]>,
}

impl NotificationDispatcher {
    pub fn new(sinks: Vec<Arc<dyn Notifier>>) -> Self {
        Self {
            sinks: sinks.into(),
        }
    }

    /// A dispatcher with no sinks; every event is dropped.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Tell `freelancer_id` they were hired.
    ///
    /// Returns immediately. The returned handle is only useful to callers that
    /// want to wait for delivery (tests); dropping it does not cancel the task.
    /// Sink failures are logged, never returned or retried.
    pub fn notify_hired(&self, freelancer_id: Uuid, event: NotificationEvent) -> JoinHandle<()> {
        let sinks = Arc::clone(&self.sinks);

        tokio::spawn(async move {
            for sink in sinks.iter() {
                match sink.deliver(freelancer_id, &event).await {
                    Ok(()) => tracing::debug!(
                        sink = sink.name(),
                        %freelancer_id,
                        gig_id = %event.gig_id,
                        "Delivered hire notification"
                    ),
                    Err(e) => tracing::warn!(
                        sink = sink.name(),
                        %freelancer_id,
                        gig_id = %event.gig_id,
                        "Failed to deliver hire notification: {e}"
                    ),
                }
            }
        })
    }
}
