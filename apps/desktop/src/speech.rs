//! Speech through the host's command-line synthesiser: `say` on macOS,
//! `espeak-ng` or `espeak` elsewhere.

use std::path::PathBuf;

use async_trait::async_trait;
use client_core::{SpeechEngine, SpeechError, Utterance, VoiceInfo};
use tokio::{process::Command, sync::Notify};
use tracing::{debug, warn};

use crate::blocking::run_blocking;

/// Words per minute at rate 1.0 for both synthesisers.
const BASE_WPM: f32 = 175.0;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Backend {
    Say(PathBuf),
    Espeak(PathBuf),
}

pub struct CommandSpeech {
    backend: Backend,
    cancel: Notify,
}

impl CommandSpeech {
    pub fn detect() -> Option<Self> {
        let backend = which::which("say")
            .map(Backend::Say)
            .or_else(|_| which::which("espeak-ng").map(Backend::Espeak))
            .or_else(|_| which::which("espeak").map(Backend::Espeak))
            .ok()?;
        debug!(?backend, "speech backend found");
        Some(Self {
            backend,
            cancel: Notify::new(),
        })
    }

    fn program(&self) -> &PathBuf {
        match &self.backend {
            Backend::Say(path) | Backend::Espeak(path) => path,
        }
    }

    fn speak_args(&self, utterance: &Utterance) -> Vec<String> {
        let wpm = (BASE_WPM * utterance.rate).round() as u32;
        match &self.backend {
            Backend::Say(_) => {
                let mut args = vec!["-r".to_string(), wpm.to_string()];
                if let Some(voice) = &utterance.voice {
                    args.extend(["-v".to_string(), voice.name.clone()]);
                }
                args.push(utterance.text.clone());
                args
            }
            Backend::Espeak(_) => {
                let voice = utterance
                    .voice
                    .as_ref()
                    .map(|v| v.lang.as_str())
                    .unwrap_or(utterance.lang.as_str())
                    .to_ascii_lowercase();
                vec![
                    "-v".to_string(),
                    voice,
                    "-s".to_string(),
                    wpm.to_string(),
                    "-p".to_string(),
                    ((utterance.pitch * 50.0).round() as u32).min(99).to_string(),
                    "-a".to_string(),
                    ((utterance.volume * 100.0).round() as u32).min(200).to_string(),
                    utterance.text.clone(),
                ]
            }
        }
    }
}

#[async_trait]
impl SpeechEngine for CommandSpeech {
    fn voices(&self) -> Vec<VoiceInfo> {
        let list_args: &[&str] = match self.backend {
            Backend::Say(_) => &["-v", "?"],
            Backend::Espeak(_) => &["--voices"],
        };
        let output = match run_blocking(|| {
            std::process::Command::new(self.program())
                .args(list_args)
                .output()
        }) {
            Ok(output) => output,
            Err(err) => {
                warn!(%err, "listing voices failed");
                return Vec::new();
            }
        };
        let listing = String::from_utf8_lossy(&output.stdout);
        match self.backend {
            Backend::Say(_) => parse_say_voices(&listing),
            Backend::Espeak(_) => parse_espeak_voices(&listing),
        }
    }

    async fn speak(&self, utterance: Utterance) -> Result<(), SpeechError> {
        let mut child = Command::new(self.program())
            .args(self.speak_args(&utterance))
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Engine(e.to_string()))?;

        tokio::select! {
            status = child.wait() => {
                let status = status.map_err(|e| SpeechError::Engine(e.to_string()))?;
                if status.success() {
                    Ok(())
                } else {
                    Err(SpeechError::Engine(format!("synthesiser exited with {status}")))
                }
            }
            _ = self.cancel.notified() => {
                if let Err(err) = child.kill().await {
                    debug!(%err, "synthesiser already gone");
                }
                Ok(())
            }
        }
    }

    fn cancel(&self) {
        self.cancel.notify_waiters();
    }
}

/// `en_US`, `en-us` and `EN-us` all become `en-US`. Only the subtag right
/// after the language is treated as a region.
fn normalize_lang(raw: &str) -> String {
    let mut parts = raw.split(['_', '-']);
    let mut tag = parts.next().unwrap_or_default().to_ascii_lowercase();
    for (index, part) in parts.enumerate() {
        tag.push('-');
        if index == 0 && part.len() == 2 {
            tag.push_str(&part.to_ascii_uppercase());
        } else {
            tag.push_str(part);
        }
    }
    tag
}

/// Lines look like `Samantha            en_US    # Hello, my name is Samantha.`
fn parse_say_voices(listing: &str) -> Vec<VoiceInfo> {
    listing
        .lines()
        .filter_map(|line| {
            let head = line.split('#').next()?.trim();
            let (name, lang) = head.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            (!name.is_empty()).then(|| VoiceInfo::new(name, normalize_lang(lang)))
        })
        .collect()
}

/// Columns are `Pty Language Age/Gender VoiceName File Other`.
fn parse_espeak_voices(listing: &str) -> Vec<VoiceInfo> {
    listing
        .lines()
        .skip_while(|line| line.trim_start().starts_with("Pty"))
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            match cols.as_slice() {
                [_, lang, _, name, ..] => Some(VoiceInfo::new(*name, normalize_lang(lang))),
                _ => None,
            }
        })
        .collect()
}
