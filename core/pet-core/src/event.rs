//! Activity events written by the Claude Code hook and their mapping to pet states.
//!
//! ```text
//! PreToolUse  (Bash | Edit | Write)     → working
//! PreToolUse  (Read | Grep | Glob)      → thinking
//! PreToolUse  (no tool / unknown tool)  → thinking
//! PostToolUse                           → happy
//! Stop                                  → celebrating
//! anything else                         → no transition
//! ```

use serde::{Deserialize, Serialize};

use crate::state::PetState;

/// One signal from the external process, as stored in the current-event file.
///
/// ```json
/// { "event": "PreToolUse", "tool": "Bash", "timestamp": 1767225600.5, "sessionId": "abc" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    #[serde(rename = "event")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(default, rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ActivityEvent {
    pub fn new(kind: impl Into<String>) -> Self {
        ActivityEvent {
            kind: kind.into(),
            tool: None,
            timestamp: None,
            session_id: None,
        }
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    pub fn event_kind(&self) -> EventKind {
        EventKind::parse(&self.kind)
    }

    pub fn tool_class(&self) -> ToolClass {
        ToolClass::of(self.tool.as_deref())
    }
}

/// Known event kinds. Unrecognized kinds are kept, never rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    PreToolUse,
    PostToolUse,
    Stop,
    Notification,
    Unknown { event_name: String },
}

impl EventKind {
    pub fn parse(name: &str) -> Self {
        match name {
            "PreToolUse" => EventKind::PreToolUse,
            "PostToolUse" => EventKind::PostToolUse,
            "Stop" => EventKind::Stop,
            "Notification" => EventKind::Notification,
            other => EventKind::Unknown {
                event_name: other.to_string(),
            },
        }
    }
}

/// Coarse classification of the tool that triggered a `PreToolUse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolClass {
    /// Operations that change the workspace.
    Mutating,
    /// Operations that only look at the workspace.
    Inspecting,
    Unrecognized,
}

impl ToolClass {
    pub fn of(tool: Option<&str>) -> Self {
        match tool {
            Some("Bash" | "Edit" | "Write") => ToolClass::Mutating,
            Some("Read" | "Grep" | "Glob") => ToolClass::Inspecting,
            _ => ToolClass::Unrecognized,
        }
    }
}

/// Returns the state an event should move the pet to, or `None` when the
/// event only counts as activity.
pub fn target_state(event: &ActivityEvent) -> Option<PetState> {
    match event.event_kind() {
        EventKind::PreToolUse => match event.tool_class() {
            ToolClass::Mutating => Some(PetState::Working),
            ToolClass::Inspecting | ToolClass::Unrecognized => Some(PetState::Thinking),
        },
        EventKind::PostToolUse => Some(PetState::Happy),
        EventKind::Stop => Some(PetState::Celebrating),
        EventKind::Notification | EventKind::Unknown { .. } => None,
    }
}
