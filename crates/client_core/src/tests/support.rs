//! Fake surfaces and sources shared by the unit tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::{
    controller::QuoteFetchController,
    error::FetchError,
    share::{Clipboard, ClipboardError, UrlOpener},
    source::QuoteSource,
    speech::{SpeechEngine, SpeechError, Utterance, VoiceInfo},
    surface::{ControlSurface, DisplaySurface, DisplayedQuote, NotificationKind, Notifier},
    WidgetConfig,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DisplayEvent {
    Opacity(f32),
    Content(String, String),
    Status(Option<String>),
}

#[derive(Default)]
pub(crate) struct RecordingDisplay {
    current: Mutex<DisplayedQuote>,
    status: Mutex<Option<String>>,
    log: Mutex<Vec<DisplayEvent>>,
}

impl RecordingDisplay {
    pub(crate) fn showing(text: &str, author: &str) -> Arc<Self> {
        let display = Arc::new(Self::default());
        *display.current.lock().expect("lock") = DisplayedQuote {
            text: text.to_string(),
            author: author.to_string(),
        };
        display
    }

    pub(crate) fn status(&self) -> Option<String> {
        self.status.lock().expect("lock").clone()
    }

    pub(crate) fn log(&self) -> Vec<DisplayEvent> {
        self.log.lock().expect("lock").clone()
    }

    pub(crate) fn contents_shown(&self) -> Vec<(String, String)> {
        self.log()
            .into_iter()
            .filter_map(|event| match event {
                DisplayEvent::Content(text, author) => Some((text, author)),
                _ => None,
            })
            .collect()
    }
}

impl DisplaySurface for RecordingDisplay {
    fn set_opacity(&self, opacity: f32) {
        self.log.lock().expect("lock").push(DisplayEvent::Opacity(opacity));
    }

    fn set_content(&self, text: &str, author: &str) {
        *self.current.lock().expect("lock") = DisplayedQuote {
            text: text.to_string(),
            author: author.to_string(),
        };
        self.log
            .lock()
            .expect("lock")
            .push(DisplayEvent::Content(text.to_string(), author.to_string()));
    }

    fn content(&self) -> DisplayedQuote {
        self.current.lock().expect("lock").clone()
    }

    fn set_status(&self, message: Option<&str>) {
        let message = message.map(str::to_string);
        *self.status.lock().expect("lock") = message.clone();
        self.log.lock().expect("lock").push(DisplayEvent::Status(message));
    }
}

#[derive(Default)]
pub(crate) struct RecordingControl {
    busy: Mutex<Vec<(bool, String)>>,
    speaking: Mutex<Vec<bool>>,
    copied: AtomicUsize,
}

impl RecordingControl {
    pub(crate) fn busy_log(&self) -> Vec<(bool, String)> {
        self.busy.lock().expect("lock").clone()
    }

    pub(crate) fn last_busy(&self) -> Option<(bool, String)> {
        self.busy.lock().expect("lock").last().cloned()
    }

    pub(crate) fn speaking_log(&self) -> Vec<bool> {
        self.speaking.lock().expect("lock").clone()
    }

    pub(crate) fn copied(&self) -> usize {
        self.copied.load(Ordering::SeqCst)
    }
}

impl ControlSurface for RecordingControl {
    fn set_busy(&self, busy: bool, label: &str) {
        self.busy
            .lock()
            .expect("lock")
            .push((busy, label.to_string()));
    }

    fn set_speaking(&self, speaking: bool) {
        self.speaking.lock().expect("lock").push(speaking);
    }

    fn flash_copied(&self) {
        self.copied.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    seen: Mutex<Vec<(String, NotificationKind)>>,
}

impl RecordingNotifier {
    pub(crate) fn seen(&self) -> Vec<(String, NotificationKind)> {
        self.seen.lock().expect("lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        self.seen
            .lock()
            .expect("lock")
            .push((message.to_string(), kind));
    }
}

pub(crate) enum Scripted {
    Reply(Result<Value, FetchError>),
    Delayed(Duration, Result<Value, FetchError>),
    Hang,
}

/// Replays scripted responses in order; an empty script answers `[]`.
#[derive(Default)]
pub(crate) struct ScriptedSource {
    script: Mutex<VecDeque<Scripted>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub(crate) fn new(script: impl IntoIterator<Item = Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteSource for ScriptedSource {
    async fn fetch(&self) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().expect("lock").pop_front();
        match next {
            None => Ok(json!([])),
            Some(Scripted::Reply(result)) => result,
            Some(Scripted::Delayed(delay, result)) => {
                tokio::time::sleep(delay).await;
                result
            }
            Some(Scripted::Hang) => futures::future::pending().await,
        }
    }
}

pub(crate) fn wilde() -> Value {
    json!([{ "quote": "Be yourself.", "author": "Oscar Wilde" }])
}

pub(crate) struct Harness {
    pub(crate) controller: Arc<QuoteFetchController>,
    pub(crate) source: Arc<ScriptedSource>,
    pub(crate) display: Arc<RecordingDisplay>,
    pub(crate) control: Arc<RecordingControl>,
    pub(crate) notifier: Arc<RecordingNotifier>,
}

pub(crate) fn harness(config: WidgetConfig, script: impl IntoIterator<Item = Scripted>) -> Harness {
    let source = ScriptedSource::new(script);
    let display = RecordingDisplay::showing("Stale quote.", "Stale Author");
    let control = Arc::new(RecordingControl::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let controller = Arc::new(QuoteFetchController::new(
        &config,
        source.clone(),
        display.clone(),
        control.clone(),
        notifier.clone(),
    ));
    Harness {
        controller,
        source,
        display,
        control,
        notifier,
    }
}

#[derive(Default)]
pub(crate) struct FakeClipboard {
    written: Mutex<Vec<String>>,
    fail: bool,
}

impl FakeClipboard {
    pub(crate) fn failing() -> Self {
        Self {
            written: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(crate) fn written(&self) -> Vec<String> {
        self.written.lock().expect("lock").clone()
    }
}

impl Clipboard for FakeClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError("permission denied".into()));
        }
        self.written.lock().expect("lock").push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingOpener {
    opened: Mutex<Vec<String>>,
}

impl RecordingOpener {
    pub(crate) fn opened(&self) -> Vec<String> {
        self.opened.lock().expect("lock").clone()
    }
}

impl UrlOpener for RecordingOpener {
    fn open(&self, url: &str) {
        self.opened.lock().expect("lock").push(url.to_string());
    }
}

/// Speaks until `finish` or `cancel` is called.
#[derive(Default)]
pub(crate) struct FakeSpeech {
    voices: Vec<VoiceInfo>,
    fail_with: Option<String>,
    utterances: Mutex<Vec<Utterance>>,
    stop: Notify,
    cancelled: AtomicUsize,
}

impl FakeSpeech {
    pub(crate) fn with_voices(voices: Vec<VoiceInfo>) -> Self {
        Self {
            voices,
            ..Self::default()
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn utterances(&self) -> Vec<Utterance> {
        self.utterances.lock().expect("lock").clone()
    }

    pub(crate) fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub(crate) fn finish(&self) {
        self.stop.notify_one();
    }
}

#[async_trait]
impl SpeechEngine for FakeSpeech {
    fn voices(&self) -> Vec<VoiceInfo> {
        self.voices.clone()
    }

    async fn speak(&self, utterance: Utterance) -> Result<(), SpeechError> {
        self.utterances.lock().expect("lock").push(utterance);
        if let Some(err) = &self.fail_with {
            return Err(SpeechError::Engine(err.clone()));
        }
        self.stop.notified().await;
        Ok(())
    }

    fn cancel(&self) {
        self.cancelled.fetch_add(1, Ordering::SeqCst);
        self.stop.notify_waiters();
    }
}

pub(crate) async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
