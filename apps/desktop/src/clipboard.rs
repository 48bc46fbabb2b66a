use std::{
    sync::mpsc::{self, Sender},
    thread,
};

use client_core::{Clipboard, ClipboardError};
use tracing::debug;

use crate::blocking::run_blocking;

type Request = (String, Sender<Result<(), String>>);

/// System clipboard owned by a dedicated thread, so the handle (and on X11
/// the copied text) lives for the whole session.
pub struct ArboardClipboard {
    requests: Sender<Request>,
}

impl Default for ArboardClipboard {
    fn default() -> Self {
        let (requests, inbox) = mpsc::channel::<Request>();
        thread::spawn(move || {
            let mut handle: Option<arboard::Clipboard> = None;
            for (text, reply) in inbox {
                let result = match handle.as_mut() {
                    Some(clipboard) => clipboard.set_text(text),
                    None => arboard::Clipboard::new().and_then(|mut clipboard| {
                        let result = clipboard.set_text(text);
                        handle = Some(clipboard);
                        result
                    }),
                };
                let _ = reply.send(result.map_err(|e| e.to_string()));
            }
        });
        Self { requests }
    }
}

impl Clipboard for ArboardClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let (reply, outcome) = mpsc::channel();
        self.requests
            .send((text.to_owned(), reply))
            .map_err(|_| ClipboardError("clipboard thread stopped".into()))?;
        run_blocking(|| outcome.recv())
            .map_err(|_| ClipboardError("clipboard thread stopped".into()))?
            .map_err(ClipboardError)?;
        debug!(chars = text.chars().count(), "clipboard written");
        Ok(())
    }
}
