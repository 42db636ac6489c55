// Lock-free channels between the editor core and its collaborators

pub mod channels;
pub mod notification;

pub use channels::{create_notification_channel, create_trigger_channel};
pub use notification::{Notification, NotificationKind};
