//! User-visible notifications and the generation progress indicator.
//!
//! Commands never surface backend failures as unhandled faults; they convert
//! them into one non-blocking notification through this port. The Tauri
//! implementation emits webview events consumed by the page's toast area.

use serde::Serialize;
use tauri::Emitter;

pub const NOTIFICATION_EVENT: &str = "notification";
pub const GENERATION_PROGRESS_EVENT: &str = "generation-progress";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GenerationProgress {
    pub active: bool,
}

/// Port for non-blocking user notifications (toasts).
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);

    fn success(&self, message: &str) {
        self.notify(NotificationKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotificationKind::Error, message);
    }

    fn info(&self, message: &str) {
        self.notify(NotificationKind::Info, message);
    }
}

/// Emits notifications as webview events.
pub struct EventNotifier {
    app: tauri::AppHandle,
}

impl EventNotifier {
    pub fn new(app: tauri::AppHandle) -> Self {
        Self { app }
    }
}

impl Notifier for EventNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        let payload = Notification {
            kind,
            message: message.to_string(),
        };
        if let Err(error) = self.app.emit(NOTIFICATION_EVENT, payload) {
            log::warn!("Failed to emit notification event: {}", error);
        }
    }
}

/// Raises or dismisses the generation-in-progress indicator.
pub fn emit_generation_progress(app: &tauri::AppHandle, active: bool) {
    if let Err(error) = app.emit(GENERATION_PROGRESS_EVENT, GenerationProgress { active }) {
        log::warn!("Failed to emit generation progress event: {}", error);
    }
}
