//! Outbound notification seam.
//!
//! Progression events (achievements, rank advances, path completions,
//! level-ups) are surfaced through a trait so the host can route them to
//! whatever UI it has. Delivery is fire-and-forget: a sink must never
//! fail the mutation that produced the event.

use regent_types::NotificationKind;

/// A sink for progression event notifications.
pub trait Notifier: Send + Sync {
    /// Deliver one event. Infallible by contract; sinks swallow and log
    /// their own delivery problems.
    fn notify(&self, kind: NotificationKind, title: &str, message: &str);
}

/// A sink that drops every event. The default when the host wires none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, kind: NotificationKind, title: &str, message: &str) {
        tracing::debug!(?kind, title, message, "notification dropped (no sink)");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{NotificationKind, Notifier};
    use std::sync::Mutex;

    /// Records every delivered event for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        events: Mutex<Vec<(NotificationKind, String, String)>>,
    }

    impl RecordingNotifier {
        pub fn events(&self) -> Vec<(NotificationKind, String, String)> {
            self.events.lock().map(|e| e.clone()).unwrap_or_default()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, kind: NotificationKind, title: &str, message: &str) {
            if let Ok(mut events) = self.events.lock() {
                events.push((kind, String::from(title), String::from(message)));
            }
        }
    }
}
