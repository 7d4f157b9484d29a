//! Transient user-facing notifications and busy-state toggling
//!
//! Independent of the chart layer. `NotificationCenter` owns the list of
//! live toasts (the lazily-created toast container of the original UI turned
//! into an injected service); `BusyState` tracks a control's busy label and
//! hands out RAII guards so the control is restored on every exit path.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
    Info,
}

/// Single transient notification
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    /// Default display duration
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            created_at: Instant::now(),
            duration: Self::DEFAULT_DURATION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }
}

/// Service owning live notifications, with automatic expiry
#[derive(Debug, Default)]
pub struct NotificationCenter {
    items: Mutex<Vec<Notification>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a notification
    pub fn notify(&self, message: impl Into<String>, severity: Severity, duration: Duration) {
        self.push(Notification::new(message, severity).with_duration(duration));
    }

    pub fn push(&self, notification: Notification) {
        self.items.lock().push(notification);
    }

    /// Drop expired notifications
    pub fn clear_expired(&self) {
        self.items.lock().retain(|n| !n.is_expired());
    }

    /// Snapshot of currently visible notifications, oldest first
    pub fn active(&self) -> Vec<Notification> {
        let mut items = self.items.lock();
        items.retain(|n| !n.is_expired());
        items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

/// Busy/spinner state for one control (e.g. a submit button)
#[derive(Debug, Default)]
pub struct BusyState {
    busy: AtomicBool,
    label: Mutex<Option<String>>,
}

impl BusyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Label to show while busy (e.g. "Saving...")
    pub fn label(&self) -> Option<String> {
        self.label.lock().clone()
    }

    /// Mark the control busy until the returned guard is dropped
    ///
    /// The guard restores the control on drop, so early returns and unwinds
    /// cannot leave it disabled.
    pub fn busy(&self, label: impl Into<String>) -> BusyGuard<'_> {
        *self.label.lock() = Some(label.into());
        self.busy.store(true, Ordering::Release);
        BusyGuard { state: self }
    }
}

/// RAII guard restoring a control's idle state
#[must_use = "the control stays busy only while the guard is alive"]
pub struct BusyGuard<'a> {
    state: &'a BusyState,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.busy.store(false, Ordering::Release);
        *self.state.label.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_expiry() {
        let center = NotificationCenter::new();
        center.push(Notification::success("Saved").with_duration(Duration::ZERO));
        center.push(Notification::info("Still here"));

        std::thread::sleep(Duration::from_millis(5));
        let active = center.active();

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "Still here");
        assert_eq!(center.len(), 1);
    }

    #[test]
    fn test_notify_stores_severity() {
        let center = NotificationCenter::new();
        center.notify("Invalid", Severity::Error, Duration::from_secs(3));

        let active = center.active();
        assert_eq!(active[0].severity, Severity::Error);
    }

    #[test]
    fn test_busy_guard_restores_on_drop() {
        let state = BusyState::new();
        assert!(!state.is_busy());

        {
            let _guard = state.busy("Saving...");
            assert!(state.is_busy());
            assert_eq!(state.label().as_deref(), Some("Saving..."));
        }

        assert!(!state.is_busy());
        assert_eq!(state.label(), None);
    }

    #[test]
    fn test_busy_guard_restores_on_early_return() {
        fn might_fail(state: &BusyState, fail: bool) -> Result<(), ()> {
            let _guard = state.busy("Working...");
            if fail {
                return Err(());
            }
            Ok(())
        }

        let state = BusyState::new();
        assert!(might_fail(&state, true).is_err());
        assert!(!state.is_busy());
    }
}
