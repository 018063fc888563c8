//! Delivery of player notifications.
//!
//! The ledger never talks to the notifier directly. It queues [`Notification`]s on an unbounded channel and
//! returns immediately; a detached dispatcher task drains the queue and logs any delivery failure.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A message for one numeric notification channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: u64,
    pub title: String,
    pub body: String,
}

#[derive(thiserror::Error, Debug)]
pub enum NotifyError {
    #[error("Delivery to {recipient} failed: {reason}")]
    Delivery { recipient: u64, reason: String },

    #[error("Notification queue closed")]
    Closed,
}

#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    // Delivers one notification to the given channel.
    async fn notify(&self, recipient: u64, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Notifier that only writes each notification to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, recipient: u64, title: &str, body: &str) -> Result<(), NotifyError> {
        info!(recipient, title, body, "Notification");
        Ok(())
    }
}

pub type NotificationSender = UnboundedSender<Notification>;
pub type NotificationReceiver = UnboundedReceiver<Notification>;

/// Creates the queue between the ledger and the dispatcher.
pub fn notification_channel() -> (NotificationSender, NotificationReceiver) {
    mpsc::unbounded_channel()
}

/// Delivers queued notifications until every sender is dropped.
///
/// Failures are logged and skipped. Returns how many notifications were delivered.
pub async fn dispatch(notifier: Arc<dyn Notifier>, mut receiver: NotificationReceiver) -> usize {
    let mut delivered = 0;
    while let Some(notification) = receiver.recv().await {
        match notifier
            .notify(notification.recipient, &notification.title, &notification.body)
            .await
        {
            Ok(()) => {
                delivered += 1;
                debug!(recipient = notification.recipient, title = %notification.title, "Notification delivered");
            }
            Err(error) => {
                warn!(recipient = notification.recipient, %error, "Notification delivery failed");
            }
        }
    }
    debug!(delivered, "Notification queue closed");
    delivered
}

/// Spawns [`dispatch`] as a detached task on the current tokio runtime.
pub fn spawn_dispatcher(notifier: Arc<dyn Notifier>, receiver: NotificationReceiver) -> JoinHandle<usize> {
    tokio::spawn(dispatch(notifier, receiver))
}
