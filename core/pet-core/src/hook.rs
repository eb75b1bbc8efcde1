//! Writer side of the event file: turns a Claude Code hook payload into an
//! [`ActivityEvent`] and publishes it for the watcher.
//!
//! The current-event file is replaced atomically (temp file in the same directory +
//! rename) so the watcher never reads a half-written event. Every event is also
//! appended to `events.jsonl` for daily statistics.

use chrono::{DateTime, Utc};
use fs_err::{self as fs, OpenOptions};
use serde::Deserialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{PetError, Result};
use crate::event::ActivityEvent;

/// Subset of the JSON Claude Code sends to hooks on stdin. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub hook_event_name: Option<String>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl HookInput {
    /// Parses stdin content. Blank input yields `None`.
    pub fn parse(input: &str) -> Result<Option<HookInput>> {
        if input.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(input)
            .map(Some)
            .map_err(|e| PetError::json("parsing hook input", e))
    }

    pub fn to_event(&self, at: DateTime<Utc>) -> Result<ActivityEvent> {
        let kind = self
            .hook_event_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(PetError::MissingEventName)?;

        Ok(ActivityEvent {
            kind: kind.to_string(),
            tool: self.tool_name.clone().filter(|tool| !tool.is_empty()),
            timestamp: Some(at.timestamp_millis() as f64 / 1000.0),
            session_id: self.session_id.clone(),
        })
    }
}

/// Atomically replaces the current-event file with `event`.
pub fn write_current_event(path: &Path, event: &ActivityEvent) -> Result<()> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| PetError::io("creating event directory", e))?;

    let content =
        serde_json::to_vec(event).map_err(|e| PetError::json("serializing event", e))?;
    let mut temp_file =
        NamedTempFile::new_in(dir).map_err(|e| PetError::io("creating temp event file", e))?;
    temp_file
        .write_all(&content)
        .map_err(|e| PetError::io("writing event", e))?;
    temp_file
        .persist(path)
        .map_err(|e| PetError::io("persisting event", e.error))?;
    Ok(())
}

/// Appends `event` as one JSON line to the event log.
pub fn append_event_log(path: &Path, event: &ActivityEvent) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PetError::io("creating log directory", e))?;
    }

    let mut line =
        serde_json::to_string(event).map_err(|e| PetError::json("serializing event", e))?;
    line.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| PetError::io("opening event log", e))?;
    file.write_all(line.as_bytes())
        .map_err(|e| PetError::io("appending event", e))
}

/// Handles one hook invocation: parse, publish, log. Returns the published event.
pub fn record_hook_input(
    input: &str,
    event_file: &Path,
    event_log: &Path,
    at: DateTime<Utc>,
) -> Result<Option<ActivityEvent>> {
    let Some(hook_input) = HookInput::parse(input)? else {
        return Ok(None);
    };
    let event = hook_input.to_event(at)?;

    write_current_event(event_file, &event)?;
    append_event_log(event_log, &event)?;
    tracing::debug!(
        event = %event.kind,
        tool = event.tool.as_deref().unwrap_or("-"),
        "Published hook event"
    );
    Ok(Some(event))
}
