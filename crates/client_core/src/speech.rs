//! Read-aloud support. The engine is platform speech synthesis; this module
//! owns the toggle state, the voice cache and the English voice ladder.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError, RwLock,
};

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::surface::{ControlSurface, DisplayedQuote, NotificationKind, Notifier};

pub const NO_SPEECH_MESSAGE: &str = "Speech not supported on this system.";

pub const SPEECH_LANG: &str = "en-US";
const SPEECH_RATE: f32 = 0.9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    pub name: String,
    /// BCP 47 tag such as `en-US`.
    pub lang: String,
}

impl VoiceInfo {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }

    fn name_has(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

/// Best English voice available, by descending preference.
pub fn select_english_voice(voices: &[VoiceInfo]) -> Option<&VoiceInfo> {
    let ladder: [fn(&VoiceInfo) -> bool; 6] = [
        |v| v.lang == "en-US" && v.name_has("google"),
        |v| v.lang == "en-US" && v.name_has("microsoft"),
        |v| v.lang == "en-GB" && v.name_has("google"),
        |v| v.lang == "en-US",
        |v| v.lang == "en-GB",
        |v| v.lang.starts_with("en-"),
    ];
    ladder
        .iter()
        .find_map(|rung| voices.iter().find(|v| rung(v)))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub voice: Option<VoiceInfo>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Utterance {
    pub fn for_quote(content: &DisplayedQuote, voice: Option<VoiceInfo>) -> Self {
        Self {
            text: format!("{} by {}", content.text, content.author),
            lang: SPEECH_LANG.to_string(),
            voice,
            rate: SPEECH_RATE,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech engine unavailable")]
    Unavailable,
    #[error("{0}")]
    Engine(String),
}

#[async_trait]
pub trait SpeechEngine: Send + Sync {
    fn is_supported(&self) -> bool {
        true
    }

    fn voices(&self) -> Vec<VoiceInfo>;

    /// Resolves when the utterance has finished or was cancelled.
    async fn speak(&self, utterance: Utterance) -> Result<(), SpeechError>;

    fn cancel(&self);
}

/// Stand-in when the host has no speech synthesis at all.
pub struct UnsupportedSpeech;

#[async_trait]
impl SpeechEngine for UnsupportedSpeech {
    fn is_supported(&self) -> bool {
        false
    }

    fn voices(&self) -> Vec<VoiceInfo> {
        Vec::new()
    }

    async fn speak(&self, _utterance: Utterance) -> Result<(), SpeechError> {
        Err(SpeechError::Unavailable)
    }

    fn cancel(&self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechToggle {
    Started,
    Stopped,
    Unsupported,
}

pub struct Speaker {
    engine: Arc<dyn SpeechEngine>,
    control: Arc<dyn ControlSurface>,
    notifier: Arc<dyn Notifier>,
    speaking: Arc<AtomicBool>,
    voices: RwLock<Vec<VoiceInfo>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Speaker {
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        control: Arc<dyn ControlSurface>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let speaker = Self {
            engine,
            control,
            notifier,
            speaking: Arc::new(AtomicBool::new(false)),
            voices: RwLock::new(Vec::new()),
            task: Mutex::new(None),
        };
        speaker.refresh_voices();
        speaker
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::Acquire)
    }

    /// Reloads the voice cache; call again when the engine reports new voices.
    pub fn refresh_voices(&self) -> usize {
        let voices = self.engine.voices();
        let english = voices.iter().filter(|v| v.lang.starts_with("en")).count();
        if !voices.is_empty() {
            debug!(total = voices.len(), english, "speech voices loaded");
        }
        let count = voices.len();
        *self.voices.write().unwrap_or_else(PoisonError::into_inner) = voices;
        count
    }

    pub fn best_voice(&self) -> Option<VoiceInfo> {
        if self.cached_voice_count() == 0 {
            self.refresh_voices();
        }
        let voices = self.voices.read().unwrap_or_else(PoisonError::into_inner);
        let voice = select_english_voice(&voices).cloned();
        match &voice {
            Some(v) => debug!(name = %v.name, lang = %v.lang, "selected voice"),
            None => warn!("no English voice found, using engine default"),
        }
        voice
    }

    fn cached_voice_count(&self) -> usize {
        self.voices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Starts reading `content` aloud, or stops if already speaking.
    pub fn toggle(&self, content: &DisplayedQuote) -> SpeechToggle {
        if !self.engine.is_supported() {
            self.notifier
                .notify(NO_SPEECH_MESSAGE, NotificationKind::Error);
            return SpeechToggle::Unsupported;
        }

        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if self.speaking.swap(false, Ordering::AcqRel) {
            if let Some(handle) = task.take() {
                handle.abort();
            }
            self.engine.cancel();
            self.control.set_speaking(false);
            info!("speech cancelled");
            return SpeechToggle::Stopped;
        }

        let utterance = Utterance::for_quote(content, self.best_voice());
        self.speaking.store(true, Ordering::Release);
        self.control.set_speaking(true);

        let engine = self.engine.clone();
        let control = self.control.clone();
        let notifier = self.notifier.clone();
        let speaking = self.speaking.clone();
        *task = Some(tokio::spawn(async move {
            let result = engine.speak(utterance).await;
            speaking.store(false, Ordering::Release);
            control.set_speaking(false);
            match result {
                Ok(()) => debug!("speech ended"),
                Err(err) => {
                    warn!(error = %err, "speech failed");
                    notifier.notify(&format!("Speech error: {err}"), NotificationKind::Error);
                }
            }
        }));
        SpeechToggle::Started
    }
}

#[cfg(test)]
#[path = "tests/speech_tests.rs"]
mod tests;
