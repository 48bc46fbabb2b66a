use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

/// A validated quote. Both fields are guaranteed non-blank; the strings are
/// kept exactly as the upstream sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuote")]
pub struct Quote {
    text: String,
    author: String,
}

#[derive(Deserialize)]
struct RawQuote {
    text: String,
    author: String,
}

impl TryFrom<RawQuote> for Quote {
    type Error = ShapeError;

    fn try_from(raw: RawQuote) -> Result<Self, Self::Error> {
        Quote::new(raw.text, raw.author)
    }
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Result<Self, ShapeError> {
        let text = text.into();
        let author = author.into();
        if text.trim().is_empty() {
            return Err(ShapeError::InvalidQuoteShape { field: "text" });
        }
        if author.trim().is_empty() {
            return Err(ShapeError::InvalidQuoteShape { field: "author" });
        }
        Ok(Self { text, author })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Clipboard/share form: `"<quote>" — <author>`.
    pub fn citation(&self) -> String {
        citation(&self.text, &self.author)
    }
}

pub fn citation(text: &str, author: &str) -> String {
    format!("\"{text}\" — {author}")
}
