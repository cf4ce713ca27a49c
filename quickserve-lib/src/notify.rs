//! User-facing notifications raised by mutations.
//!
//! Services push onto a shared [`Notifications`] queue; front ends drain it and show the entries
//! as toasts or console lines.

use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;
use strum::Display;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Notifications {
    queue: Arc<Mutex<VecDeque<Notification>>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.push(Level::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.push(Level::Error, message);
    }

    /// Take every pending notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        self.queue.lock().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    fn push(&self, level: Level, message: String) {
        self.queue.lock().push_back(Notification { level, message });
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_drain_in_order() {
        let notifications = Notifications::new();
        let shared = notifications.clone();

        notifications.success("saved");
        shared.error("failed");

        let drained = notifications.drain();
        assert_eq!(
            drained,
            vec![
                Notification {
                    level: Level::Success,
                    message: "saved".into()
                },
                Notification {
                    level: Level::Error,
                    message: "failed".into()
                },
            ]
        );
        assert!(shared.is_empty());
    }
}
