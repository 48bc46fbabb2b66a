//! Capabilities the widget renders onto. A browser page, a terminal or a
//! test harness each provide their own implementation.

use shared::domain::citation;
use tracing::{error, info};

/// Quote and author as currently shown, which may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayedQuote {
    pub text: String,
    pub author: String,
}

impl DisplayedQuote {
    pub fn citation(&self) -> String {
        citation(&self.text, &self.author)
    }
}

pub trait DisplaySurface: Send + Sync {
    /// 0.0 is fully faded out, 1.0 fully visible.
    fn set_opacity(&self, opacity: f32);
    fn set_content(&self, text: &str, author: &str);
    fn content(&self) -> DisplayedQuote;
    /// Status slot for fetch errors; `None` clears it.
    fn set_status(&self, message: Option<&str>);
}

pub trait ControlSurface: Send + Sync {
    fn set_busy(&self, busy: bool, label: &str);

    fn set_speaking(&self, _speaking: bool) {}

    fn flash_copied(&self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, kind: NotificationKind);
}

/// Used when the host has no toast area of its own.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Error => error!(text = message, "notification"),
            NotificationKind::Info | NotificationKind::Success => {
                info!(text = message, ?kind, "notification")
            }
        }
    }
}
