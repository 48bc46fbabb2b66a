use std::{fmt, str::FromStr, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    controller::{FetchOutcome, QuoteFetchController},
    debounce::Debouncer,
    error::WidgetError,
    share::{Clipboard, LogUrlOpener, ShareActions, SharePlatform, UrlOpener},
    source::{HttpQuoteSource, QuoteSource},
    speech::{Speaker, SpeechEngine, SpeechToggle, UnsupportedSpeech},
    surface::{ControlSurface, DisplaySurface, Notifier, TracingNotifier},
    WidgetConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub ctrl: bool,
    pub shift: bool,
    pub key: Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    NewQuote,
    Copy,
    Speak,
}

impl KeyChord {
    /// Ctrl+Space, Ctrl+Shift+C and Ctrl+Shift+S.
    pub fn shortcut(&self) -> Option<Shortcut> {
        match (self.ctrl, self.shift, self.key) {
            (true, _, Key::Space) => Some(Shortcut::NewQuote),
            (true, true, Key::Char(c)) if c.eq_ignore_ascii_case(&'c') => Some(Shortcut::Copy),
            (true, true, Key::Char(c)) if c.eq_ignore_ascii_case(&'s') => Some(Shortcut::Speak),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
#[error("unrecognised key chord '{0}'")]
pub struct InvalidKeyChord(String);

impl FromStr for KeyChord {
    type Err = InvalidKeyChord;

    /// Parses chords written like `ctrl+shift+c` or `Ctrl+Space`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chord = KeyChord {
            ctrl: false,
            shift: false,
            key: Key::Space,
        };
        let mut key = None;
        for part in s.split('+').map(|p| p.trim().to_ascii_lowercase()) {
            match part.as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "shift" => chord.shift = true,
                "space" => key = Some(Key::Space),
                single if single.chars().count() == 1 => {
                    key = single.chars().next().map(Key::Char);
                }
                _ => return Err(InvalidKeyChord(s.to_string())),
            }
        }
        chord.key = key.ok_or_else(|| InvalidKeyChord(s.to_string()))?;
        Ok(chord)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        match self.key {
            Key::Space => f.write_str("Space"),
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    NewQuoteClicked,
    SpeakClicked,
    CopyClicked,
    ShareClicked(SharePlatform),
    Key(KeyChord),
}

/// Anything that produces user interaction: a DOM binding, a terminal, or
/// a scripted test harness. `None` means the surface has gone away.
#[async_trait]
pub trait UiEventSource: Send {
    async fn next_event(&mut self) -> Option<UiEvent>;
}

#[derive(Default)]
pub struct QuoteWidgetBuilder {
    config: WidgetConfig,
    source: Option<Arc<dyn QuoteSource>>,
    display: Option<Arc<dyn DisplaySurface>>,
    control: Option<Arc<dyn ControlSurface>>,
    notifier: Option<Arc<dyn Notifier>>,
    clipboard: Option<Arc<dyn Clipboard>>,
    opener: Option<Arc<dyn UrlOpener>>,
    speech: Option<Arc<dyn SpeechEngine>>,
}

impl QuoteWidgetBuilder {
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn source(mut self, source: Arc<dyn QuoteSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn display(mut self, display: Arc<dyn DisplaySurface>) -> Self {
        self.display = Some(display);
        self
    }

    pub fn control(mut self, control: Arc<dyn ControlSurface>) -> Self {
        self.control = Some(control);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn opener(mut self, opener: Arc<dyn UrlOpener>) -> Self {
        self.opener = Some(opener);
        self
    }

    pub fn speech(mut self, speech: Arc<dyn SpeechEngine>) -> Self {
        self.speech = Some(speech);
        self
    }

    /// Fails fast when the display or control surface is missing. The quote
    /// source defaults to HTTP against `config.api_url`.
    pub fn build(self) -> Result<QuoteWidget, WidgetError> {
        let display = self.display.ok_or(WidgetError::MissingSurface("display"))?;
        let control = self.control.ok_or(WidgetError::MissingSurface("control"))?;
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(TracingNotifier));
        let source = match self.source {
            Some(source) => source,
            None => Arc::new(HttpQuoteSource::new(self.config.api_url.clone())?),
        };

        let controller = Arc::new(QuoteFetchController::new(
            &self.config,
            source,
            display.clone(),
            control.clone(),
            notifier.clone(),
        ));

        let debounced = controller.clone();
        let debouncer = Debouncer::new(self.config.debounce_delay, move || {
            let controller = debounced.clone();
            async move {
                controller.request_quote().await;
            }
        });

        let speaker = Speaker::new(
            self.speech.unwrap_or_else(|| Arc::new(UnsupportedSpeech)),
            control.clone(),
            notifier.clone(),
        );

        let share = Arc::new(ShareActions::new(
            display.clone(),
            control,
            notifier,
            self.clipboard,
            self.opener.unwrap_or_else(|| Arc::new(LogUrlOpener)),
            self.config.share_url.clone(),
            self.config.share_open_delay,
        ));

        Ok(QuoteWidget {
            controller,
            debouncer,
            speaker,
            share,
            display,
        })
    }
}

pub struct QuoteWidget {
    controller: Arc<QuoteFetchController>,
    debouncer: Debouncer,
    speaker: Speaker,
    share: Arc<ShareActions>,
    display: Arc<dyn DisplaySurface>,
}

impl QuoteWidget {
    pub fn builder(config: WidgetConfig) -> QuoteWidgetBuilder {
        QuoteWidgetBuilder::new(config)
    }

    pub fn controller(&self) -> &Arc<QuoteFetchController> {
        &self.controller
    }

    pub fn speaker(&self) -> &Speaker {
        &self.speaker
    }

    pub fn share(&self) -> &Arc<ShareActions> {
        &self.share
    }

    /// Page-load fetch, then dispatch events until the source ends.
    pub async fn run(&self, events: &mut dyn UiEventSource) -> FetchOutcome {
        info!("quote widget starting");
        let initial = self.controller.request_quote().await;
        while let Some(event) = events.next_event().await {
            self.handle(event);
        }
        self.debouncer.cancel();
        info!("quote widget event source closed");
        initial
    }

    pub fn handle(&self, event: UiEvent) {
        debug!(?event, "ui event");
        match event {
            UiEvent::NewQuoteClicked => self.debouncer.trigger(),
            UiEvent::SpeakClicked => {
                self.speak();
            }
            UiEvent::CopyClicked => {
                self.share.copy_quote(true);
            }
            UiEvent::ShareClicked(platform) => {
                let share = self.share.clone();
                tokio::spawn(async move {
                    share.share_to(platform).await;
                });
            }
            UiEvent::Key(chord) => match chord.shortcut() {
                Some(Shortcut::NewQuote) => {
                    let controller = self.controller.clone();
                    tokio::spawn(async move {
                        controller.request_quote().await;
                    });
                }
                Some(Shortcut::Copy) => {
                    self.share.copy_quote(true);
                }
                Some(Shortcut::Speak) => {
                    self.speak();
                }
                None => {}
            },
        }
    }

    pub fn speak(&self) -> SpeechToggle {
        self.speaker.toggle(&self.display.content())
    }
}

#[cfg(test)]
#[path = "tests/widget_tests.rs"]
mod tests;
