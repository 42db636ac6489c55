// Notifications raised by the editor core

use std::time::{SystemTime, UNIX_EPOCH};

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A committed mutation changed the document; consumed by autosave
    DocumentChanged,
    /// Undo or redo replaced the document from history
    HistoryRestored,
    /// A new or loaded document replaced the current one
    DocumentReplaced,
}

/// Notification with timestamp and document revision
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Store revision after the change
    pub revision: u64,
    pub message: String,
    pub timestamp: u64, // Unix timestamp in milliseconds
}

impl Notification {
    /// Creates a notification stamped with the current time
    pub fn new(kind: NotificationKind, revision: u64, message: String) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Self {
            kind,
            revision,
            message,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_creation() {
        let notif = Notification::new(NotificationKind::DocumentChanged, 3, "Edited Intro/guitar".to_string());

        assert_eq!(notif.kind, NotificationKind::DocumentChanged);
        assert_eq!(notif.revision, 3);
        assert_eq!(notif.message, "Edited Intro/guitar");
        assert!(notif.timestamp > 0);
    }
}
