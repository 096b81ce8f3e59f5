//! Recovering JSON payloads from model replies.
//!
//! Models often wrap the requested JSON in a fenced code block or add a line
//! of explanation. The payload is taken from the first fence tagged `json`,
//! else the first untagged fence, else the whole trimmed reply.

use serde::de::DeserializeOwned;
use serde_json::Value;

use fittrack_core::{Error, Result};

/// Return the JSON text inside the reply.
pub fn extract_json_block(reply: &str) -> &str {
    let reply = reply.trim();
    let body = if let Some((_, rest)) = reply.split_once("```json") {
        rest
    } else if let Some((_, rest)) = reply.split_once("```") {
        rest
    } else {
        return reply;
    };
    body.split("```").next().unwrap_or(body).trim()
}

/// Parse the reply as a list of `T`. A single object is treated as a
/// one-element list.
pub fn parse_json_list<T: DeserializeOwned>(reply: &str) -> Result<Vec<T>> {
    let payload = extract_json_block(reply);
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| Error::Inference(format!("Reply is not valid JSON: {e}")))?;
    let items = match value {
        Value::Array(items) => items,
        other => vec![other],
    };
    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item)
                .map_err(|e| Error::Inference(format!("Unexpected item shape: {e}")))
        })
        .collect()
}

/// Split a suggestion reply into trimmed lines, dropping blanks and
/// markdown headings, capped at `limit`.
pub fn suggestion_lines(reply: &str, limit: usize) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .take(limit)
        .map(String::from)
        .collect()
}
