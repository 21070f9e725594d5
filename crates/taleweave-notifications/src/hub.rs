//! In-process broadcast hub.
//!
//! Every published notification goes onto one broadcast channel; each
//! subscription filters for its own user.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::notification::{Notification, Notifier};

/// Default number of notifications buffered per subscriber before it lags.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out point for notifications to connected clients.
#[derive(Debug, Clone)]
pub struct NotificationHub {
    sender: broadcast::Sender<Notification>,
}

impl NotificationHub {
    /// Creates a hub buffering up to `capacity` notifications per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to the notifications addressed to `user_id`.
    #[must_use]
    pub fn subscribe(&self, user_id: Uuid) -> Subscription {
        Subscription {
            user_id,
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Notifier for NotificationHub {
    fn notify(&self, notification: Notification) {
        let kind = notification.kind.name();
        let recipient_id = notification.recipient_id;
        if self.sender.send(notification).is_err() {
            debug!(%recipient_id, kind, "no subscribers, notification dropped");
        }
    }
}

/// One user's view of the hub.
#[derive(Debug)]
pub struct Subscription {
    user_id: Uuid,
    receiver: broadcast::Receiver<Notification>,
}

impl Subscription {
    /// The user this subscription delivers to.
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Waits for the next notification addressed to this user.
    ///
    /// Returns `None` once the hub is gone. Notifications lost to lag are
    /// skipped.
    pub async fn recv(&mut self) -> Option<Notification> {
        loop {
            match self.receiver.recv().await {
                Ok(notification) if notification.recipient_id == self.user_id => {
                    return Some(notification);
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(user_id = %self.user_id, skipped, "notification subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
