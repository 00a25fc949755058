//! Toast notifications.
//!
//! A single toast slot is published through a watch channel. Each post
//! replaces the current toast and schedules it to hide after the configured
//! time to live; a newer post cancels the older hide timer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const NEW_CONTENT_TEMPLATE: &str = "✨ {n} new titles added since your last visit!";
pub const SAVED_MESSAGE: &str = "Saved in Saved List";
pub const REMOVED_MESSAGE: &str = "Removed from Saved list";
pub const PROFILE_UPDATED_MESSAGE: &str = "Profile updated successfully!";
pub const WATCH_HISTORY_CLEARED_MESSAGE: &str = "Watch history cleared";

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Success,
    Info,
}

/// Current content of the toast slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub visible: bool,
}

/// Message announcing titles released since the last visit.
pub fn new_content_message(count: usize) -> String {
    NEW_CONTENT_TEMPLATE.replace("{n}", &count.to_string())
}

#[derive(Debug)]
struct Shared {
    sender: watch::Sender<Toast>,
    ttl: Duration,
    enabled: AtomicBool,
    generation: AtomicU64,
    hide_timer: Mutex<Option<JoinHandle<()>>>,
}

/// Publishes toasts to any number of subscribers.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    shared: Arc<Shared>,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        let (sender, _) = watch::channel(Toast::default());
        Self {
            shared: Arc::new(Shared {
                sender,
                ttl,
                enabled: AtomicBool::new(true),
                generation: AtomicU64::new(0),
                hide_timer: Mutex::new(None),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Toast> {
        self.shared.sender.subscribe()
    }

    /// Snapshot of the toast slot.
    pub fn current(&self) -> Toast {
        self.shared.sender.borrow().clone()
    }

    /// Disabled centers drop posts silently.
    pub fn set_enabled(&self, enabled: bool) {
        self.shared.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.enabled.load(Ordering::SeqCst)
    }

    /// Shows `message` now, replacing any visible toast.
    pub fn post(&self, message: impl Into<String>, kind: ToastKind) {
        if !self.is_enabled() {
            return;
        }

        let message = message.into();
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(%message, ?kind, "Notification posted");
        self.shared.sender.send_replace(Toast {
            message,
            kind,
            visible: true,
        });

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No runtime for hide timer, toast stays visible");
            return;
        };
        let shared = Arc::clone(&self.shared);
        let timer = runtime.spawn(async move {
            tokio::time::sleep(shared.ttl).await;
            if shared.generation.load(Ordering::SeqCst) == generation {
                shared.sender.send_modify(|toast| toast.visible = false);
            }
        });

        if let Some(previous) = self.shared.hide_timer.lock().replace(timer) {
            previous.abort();
        }
    }

    /// Shows `message` after `delay`.
    pub fn post_after(&self, message: impl Into<String>, kind: ToastKind, delay: Duration) {
        if delay.is_zero() {
            self.post(message, kind);
            return;
        }

        let center = self.clone();
        let message = message.into();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            center.post(message, kind);
        });
    }

    /// Hides the visible toast immediately.
    pub fn dismiss(&self) {
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(timer) = self.shared.hide_timer.lock().take() {
            timer.abort();
        }
        self.shared.sender.send_modify(|toast| toast.visible = false);
    }
}
