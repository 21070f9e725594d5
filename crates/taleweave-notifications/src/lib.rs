//! Taleweave notifications: pushes story state changes to connected users.
//!
//! Delivery is fire-and-forget: a notification published while its recipient
//! is not subscribed, or while the recipient's receiver has fallen behind, is
//! dropped.

pub mod hub;
pub mod notification;

pub use hub::{NotificationHub, Subscription};
pub use notification::{Notification, NotificationKind, Notifier};
