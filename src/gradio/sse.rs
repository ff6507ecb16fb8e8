//! # Result Stream
//!
//! `GET /call/{api}/{event_id}` answers with Server-Sent Events. The stream
//! closes after a `complete` or `error` event, so the whole body is read and
//! then scanned here.

use serde_json::Value;

use crate::error::{Error, Result};

/// One `event:`/`data:` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    pub data: String,
}

/// Split an event-stream body into events.
pub fn parse_events(body: &str) -> Vec<Event> {
    let mut events = Vec::new();
    let mut name = String::new();
    let mut data: Vec<&str> = Vec::new();

    // A trailing blank line flushes the last block even without one in the body
    for line in body.lines().chain(std::iter::once("")) {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.is_empty() {
            if !name.is_empty() || !data.is_empty() {
                events.push(Event {
                    name: if name.is_empty() { "message".to_string() } else { std::mem::take(&mut name) },
                    data: data.join("\n"),
                });
                data.clear();
            }
            continue;
        }

        if line.starts_with(':') {
            continue;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => name = value.to_string(),
            "data" => data.push(value),
            _ => {}
        }
    }

    events
}

/// Find the outcome of a call: the outputs array, or the remote error.
pub fn parse_outcome(body: &str) -> Result<Value> {
    for event in parse_events(body) {
        match event.name.as_str() {
            "complete" => return Ok(serde_json::from_str(&event.data)?),
            "error" => return Err(Error::Remote(error_message(&event.data))),
            other => tracing::debug!(event = other, "Skipping event"),
        }
    }

    Err(Error::MalformedResponse(
        "event stream ended without a result".to_string(),
    ))
}

fn error_message(data: &str) -> String {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::String(message)) => message,
        Ok(Value::Null) => "the service did not say why".to_string(),
        _ if data.trim().is_empty() => "the service did not say why".to_string(),
        _ => data.trim().to_string(),
    }
}
