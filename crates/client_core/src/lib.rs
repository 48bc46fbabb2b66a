use std::time::Duration;

pub mod controller;
pub mod debounce;
pub mod display;
pub mod error;
pub mod library;
pub mod share;
pub mod source;
pub mod speech;
pub mod surface;
pub mod widget;

pub use controller::{FetchOutcome, FetchState, QuoteFetchController, SelectionMode};
pub use debounce::Debouncer;
pub use error::{FetchError, WidgetError};
pub use shared::domain::Quote;
pub use share::{Clipboard, ClipboardError, SharePlatform, UrlOpener};
pub use source::{HttpQuoteSource, QuoteSource};
pub use speech::{SpeechEngine, SpeechError, Speaker, Utterance, VoiceInfo};
pub use surface::{ControlSurface, DisplaySurface, DisplayedQuote, NotificationKind, Notifier};
pub use widget::{Key, KeyChord, QuoteWidget, QuoteWidgetBuilder, UiEvent, UiEventSource};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/api/quotes";
pub const DEFAULT_SHARE_URL: &str = "https://ahmadridho01.github.io/projectQuoteGenerator/";

/// Trigger control labels.
pub const READY_LABEL: &str = "New Quote";
pub const LOADING_LABEL: &str = "Loading...";

#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub api_url: String,
    pub share_url: String,
    /// Quiet period before a burst of clicks turns into one fetch.
    pub debounce_delay: Duration,
    pub fetch_timeout: Duration,
    /// Time the display stays faded out while its content is swapped.
    pub fade_delay: Duration,
    /// Pause between copying and opening a platform that has no share intent.
    pub share_open_delay: Duration,
    pub selection: SelectionMode,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            share_url: DEFAULT_SHARE_URL.to_string(),
            debounce_delay: Duration::from_millis(500),
            fetch_timeout: Duration::from_millis(10_000),
            fade_delay: Duration::from_millis(200),
            share_open_delay: Duration::from_millis(500),
            selection: SelectionMode::First,
        }
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
