//! Upstream payload contract: a JSON array of records shaped
//! `{ "quote": "...", "author": "..." }` (some providers use `text` instead
//! of `quote`). Extra fields such as `category` are ignored.

use serde_json::Value;

use crate::{domain::Quote, error::ShapeError};

pub const QUOTES_ROUTE: &str = "/api/quotes";
pub const HEALTH_ROUTE: &str = "/healthz";

const TEXT_FIELDS: [&str; 2] = ["quote", "text"];

/// Returns the candidate records of a payload; fails unless it is a
/// non-empty array.
pub fn records(payload: &Value) -> Result<&[Value], ShapeError> {
    match payload.as_array() {
        Some(items) if !items.is_empty() => Ok(items.as_slice()),
        _ => Err(ShapeError::EmptyPayload),
    }
}

/// Only element 0 is consumed.
pub fn first_quote(payload: &Value) -> Result<Quote, ShapeError> {
    let items = records(payload)?;
    quote_from_record(&items[0])
}

/// Every valid record of a payload, in order. Invalid records are skipped;
/// a payload with none valid reports the first record's shape error.
pub fn all_quotes(payload: &Value) -> Result<Vec<Quote>, ShapeError> {
    let items = records(payload)?;
    let mut first_err = None;
    let mut quotes = Vec::with_capacity(items.len());
    for item in items {
        match quote_from_record(item) {
            Ok(quote) => quotes.push(quote),
            Err(err) => {
                first_err.get_or_insert(err);
            }
        }
    }
    match (quotes.is_empty(), first_err) {
        (true, Some(err)) => Err(err),
        _ => Ok(quotes),
    }
}

pub fn quote_from_record(record: &Value) -> Result<Quote, ShapeError> {
    let text = TEXT_FIELDS
        .iter()
        .find_map(|field| non_blank_str(record, field))
        .ok_or(ShapeError::InvalidQuoteShape { field: "text" })?;
    let author = non_blank_str(record, "author")
        .ok_or(ShapeError::InvalidQuoteShape { field: "author" })?;
    Quote::new(text, author)
}

fn non_blank_str<'a>(record: &'a Value, field: &str) -> Option<&'a str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
}
