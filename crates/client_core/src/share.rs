use std::{fmt, str::FromStr, sync::Arc, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

use crate::surface::{ControlSurface, DisplaySurface, DisplayedQuote, NotificationKind, Notifier};

pub const COPY_SUCCESS_MESSAGE: &str = "Quote copied!";
pub const COPY_ERROR_MESSAGE: &str = "Failed to copy. Try again.";
const OPENING_PLATFORM_MESSAGE: &str = "Quote copied! Opening";

#[derive(Debug, Error)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str);
}

/// Fallback opener for hosts without a browser: the URL only reaches the log.
pub struct LogUrlOpener;

impl UrlOpener for LogUrlOpener {
    fn open(&self, url: &str) {
        info!(url, "share link");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SharePlatform {
    Twitter,
    Facebook,
    Instagram,
    Tiktok,
}

impl SharePlatform {
    pub const ALL: [SharePlatform; 4] = [
        SharePlatform::Twitter,
        SharePlatform::Facebook,
        SharePlatform::Instagram,
        SharePlatform::Tiktok,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Twitter => "Twitter",
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
            Self::Tiktok => "Tiktok",
        }
    }
}

impl fmt::Display for SharePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name().to_ascii_lowercase())
    }
}

#[derive(Debug, Error)]
#[error("unknown share platform '{0}'")]
pub struct UnknownPlatform(pub String);

impl FromStr for SharePlatform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twitter" | "x" => Ok(Self::Twitter),
            "facebook" | "fb" => Ok(Self::Facebook),
            "instagram" | "ig" => Ok(Self::Instagram),
            "tiktok" => Ok(Self::Tiktok),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareTarget {
    /// Platform accepts a prefilled share link.
    Intent(String),
    /// No share intent; copy the quote, then open the platform home page.
    CopyThenOpen(&'static str),
}

pub fn share_target(
    platform: SharePlatform,
    content: &DisplayedQuote,
    share_url: &str,
) -> ShareTarget {
    match platform {
        SharePlatform::Twitter => ShareTarget::Intent(format!(
            "https://twitter.com/intent/tweet?text={}",
            urlencoding::encode(&content.citation())
        )),
        SharePlatform::Facebook => ShareTarget::Intent(format!(
            "https://www.facebook.com/sharer/sharer.php?u={}",
            urlencoding::encode(share_url)
        )),
        SharePlatform::Instagram => ShareTarget::CopyThenOpen("https://www.instagram.com"),
        SharePlatform::Tiktok => ShareTarget::CopyThenOpen("https://www.tiktok.com"),
    }
}

pub struct ShareActions {
    display: Arc<dyn DisplaySurface>,
    control: Arc<dyn ControlSurface>,
    notifier: Arc<dyn Notifier>,
    clipboard: Option<Arc<dyn Clipboard>>,
    opener: Arc<dyn UrlOpener>,
    share_url: String,
    open_delay: Duration,
}

impl ShareActions {
    pub fn new(
        display: Arc<dyn DisplaySurface>,
        control: Arc<dyn ControlSurface>,
        notifier: Arc<dyn Notifier>,
        clipboard: Option<Arc<dyn Clipboard>>,
        opener: Arc<dyn UrlOpener>,
        share_url: impl Into<String>,
        open_delay: Duration,
    ) -> Self {
        Self {
            display,
            control,
            notifier,
            clipboard,
            opener,
            share_url: share_url.into(),
            open_delay,
        }
    }

    /// Copies the displayed quote as `"<quote>" — <author>`.
    pub fn copy_quote(&self, notify: bool) -> bool {
        let text = self.display.content().citation();
        let result = match &self.clipboard {
            Some(clipboard) => clipboard.write_text(&text),
            None => Err(ClipboardError("no clipboard available".into())),
        };

        match result {
            Ok(()) => {
                info!(text = %text, "quote copied");
                self.control.flash_copied();
                if notify {
                    self.notifier
                        .notify(COPY_SUCCESS_MESSAGE, NotificationKind::Success);
                }
                true
            }
            Err(err) => {
                warn!(error = %err, "copy failed");
                if notify {
                    self.notifier
                        .notify(COPY_ERROR_MESSAGE, NotificationKind::Error);
                }
                false
            }
        }
    }

    pub async fn share_to(&self, platform: SharePlatform) -> bool {
        match share_target(platform, &self.display.content(), &self.share_url) {
            ShareTarget::Intent(url) => {
                self.opener.open(&url);
                true
            }
            ShareTarget::CopyThenOpen(home) => {
                if !self.copy_quote(false) {
                    self.notifier
                        .notify(COPY_ERROR_MESSAGE, NotificationKind::Error);
                    return false;
                }
                self.notifier.notify(
                    &format!("{OPENING_PLATFORM_MESSAGE} {}...", platform.display_name()),
                    NotificationKind::Info,
                );
                tokio::time::sleep(self.open_delay).await;
                self.opener.open(home);
                true
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/share_tests.rs"]
mod tests;
