//! Terminal rendition of the widget surfaces and a line-based event source.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use client_core::{
    share::UrlOpener, ControlSurface, DisplaySurface, DisplayedQuote, KeyChord,
    NotificationKind, Notifier, SharePlatform, UiEvent, UiEventSource,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, trace};

pub const HELP: &str = "\
Commands:
  <enter>, n            new quote
  s                     speak / stop speaking
  c                     copy quote
  share <platform>      twitter, facebook, instagram, tiktok
  ctrl+space            new quote (no debounce)
  ctrl+shift+c          copy quote
  ctrl+shift+s          speak quote
  h                     this help
  q                     quit";

#[derive(Default)]
pub struct TerminalDisplay {
    current: Mutex<DisplayedQuote>,
}

impl DisplaySurface for TerminalDisplay {
    fn set_opacity(&self, opacity: f32) {
        trace!(opacity, "display opacity");
    }

    fn set_content(&self, text: &str, author: &str) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = DisplayedQuote {
            text: text.to_string(),
            author: author.to_string(),
        };
        if !text.is_empty() {
            println!("\n  \u{201c}{text}\u{201d}\n      — {author}\n");
        }
    }

    fn content(&self) -> DisplayedQuote {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_status(&self, message: Option<&str>) {
        if let Some(message) = message {
            println!("\n  ! {message}\n");
        }
    }
}

pub struct TerminalControl;

impl ControlSurface for TerminalControl {
    fn set_busy(&self, busy: bool, label: &str) {
        if busy {
            println!("  [{label}]");
        } else {
            debug!(label, "trigger ready");
        }
    }

    fn set_speaking(&self, speaking: bool) {
        println!("  [{}]", if speaking { "speaking" } else { "speech stopped" });
    }
}

pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        let tag = match kind {
            NotificationKind::Info => "info",
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
        };
        println!("  ({tag}) {message}");
    }
}

pub struct ConsoleOpener;

impl UrlOpener for ConsoleOpener {
    fn open(&self, url: &str) {
        println!("  open in your browser: {url}");
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Event(UiEvent),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let lower = line.to_ascii_lowercase();
    match lower.as_str() {
        "" | "n" | "new" => return Command::Event(UiEvent::NewQuoteClicked),
        "s" | "speak" => return Command::Event(UiEvent::SpeakClicked),
        "c" | "copy" => return Command::Event(UiEvent::CopyClicked),
        "h" | "help" | "?" => return Command::Help,
        "q" | "quit" | "exit" => return Command::Quit,
        _ => {}
    }

    if lower.starts_with("ctrl+") {
        return match lower.parse::<KeyChord>() {
            Ok(chord) => Command::Event(UiEvent::Key(chord)),
            Err(_) => Command::Unknown(line.to_string()),
        };
    }

    let platform = lower.strip_prefix("share").unwrap_or(&lower);
    match platform.parse::<SharePlatform>() {
        Ok(platform) => Command::Event(UiEvent::ShareClicked(platform)),
        Err(_) => Command::Unknown(line.to_string()),
    }
}

pub struct StdinEvents {
    lines: Lines<BufReader<Stdin>>,
}

impl Default for StdinEvents {
    fn default() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait]
impl UiEventSource for StdinEvents {
    async fn next_event(&mut self) -> Option<UiEvent> {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(err) => {
                    debug!(%err, "stdin closed");
                    return None;
                }
            };
            match parse_command(&line) {
                Command::Event(event) => return Some(event),
                Command::Quit => return None,
                Command::Help => println!("{HELP}"),
                Command::Unknown(input) => println!("  unknown command '{input}' (h for help)"),
            }
        }
    }
}
