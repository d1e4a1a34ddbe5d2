use std::sync::Mutex;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    /// An operation has started and is still pending.
    Loading,
    Success,
    Error,
}

/// A single user-facing notification message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn loading(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Loading,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

/// The three messages bound to one deferred operation: what to show while it
/// is pending and what to show for each outcome.
#[derive(Debug, Clone, Copy)]
pub struct ToastMessages {
    pub loading: &'static str,
    pub success: &'static str,
    pub error: &'static str,
}

impl ToastMessages {
    pub const PUBLISH: Self = Self {
        loading: "Publishing...",
        success: "Note published!",
        error: "Failed to publish note.",
    };

    pub const UNPUBLISH: Self = Self {
        loading: "Unpublishing...",
        success: "Note unpublished!",
        error: "Failed to unpublish note.",
    };
}

/// Sink for user-facing notifications.
///
/// The controllers only emit messages; rendering is up to the implementation
/// (a signal-backed toaster in the browser, a log in tests).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// In-memory sink that records every toast in order.
///
/// Used by unit tests to assert on exact notification sequences.
#[derive(Debug, Default)]
pub struct ToastLog {
    entries: Mutex<Vec<Toast>>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded toasts, oldest first.
    pub fn entries(&self) -> Vec<Toast> {
        self.entries.lock().expect("toast log poisoned").clone()
    }
}

impl NotificationSink for ToastLog {
    fn notify(&self, toast: Toast) {
        self.entries.lock().expect("toast log poisoned").push(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_records_in_order() {
        let log = ToastLog::new();
        log.notify(Toast::loading("Publishing..."));
        log.notify(Toast::success("Note published!"));

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, ToastLevel::Loading);
        assert_eq!(entries[1], Toast::success("Note published!"));
    }
}
