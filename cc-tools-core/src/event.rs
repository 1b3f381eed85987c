//! Typed representation of the hook events the host emits on stdin.

use std::io::Read;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::CcToolsError;

/// The closed set of event names the host is documented to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEventKind {
    SessionStart,
    SessionEnd,
    PreToolUse,
    PostToolUse,
    PostToolUseFailure,
    PreCompact,
    Notification,
    UserPromptSubmit,
    PermissionRequest,
    Stop,
    SubagentStart,
    SubagentStop,
    TeammateIdle,
    TaskCompleted,
}

impl HookEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HookEventKind::SessionStart => "SessionStart",
            HookEventKind::SessionEnd => "SessionEnd",
            HookEventKind::PreToolUse => "PreToolUse",
            HookEventKind::PostToolUse => "PostToolUse",
            HookEventKind::PostToolUseFailure => "PostToolUseFailure",
            HookEventKind::PreCompact => "PreCompact",
            HookEventKind::Notification => "Notification",
            HookEventKind::UserPromptSubmit => "UserPromptSubmit",
            HookEventKind::PermissionRequest => "PermissionRequest",
            HookEventKind::Stop => "Stop",
            HookEventKind::SubagentStart => "SubagentStart",
            HookEventKind::SubagentStop => "SubagentStop",
            HookEventKind::TeammateIdle => "TeammateIdle",
            HookEventKind::TaskCompleted => "TaskCompleted",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "SessionStart" => HookEventKind::SessionStart,
            "SessionEnd" => HookEventKind::SessionEnd,
            "PreToolUse" => HookEventKind::PreToolUse,
            "PostToolUse" => HookEventKind::PostToolUse,
            "PostToolUseFailure" => HookEventKind::PostToolUseFailure,
            "PreCompact" => HookEventKind::PreCompact,
            "Notification" => HookEventKind::Notification,
            "UserPromptSubmit" => HookEventKind::UserPromptSubmit,
            "PermissionRequest" => HookEventKind::PermissionRequest,
            "Stop" => HookEventKind::Stop,
            "SubagentStart" => HookEventKind::SubagentStart,
            "SubagentStop" => HookEventKind::SubagentStop,
            "TeammateIdle" => HookEventKind::TeammateIdle,
            "TaskCompleted" => HookEventKind::TaskCompleted,
            _ => return None,
        })
    }
}

/// The tool names that count as an "edit" for the validation gate.
const EDIT_TOOLS: [&str; 4] = ["Edit", "MultiEdit", "Write", "NotebookEdit"];

/// A single hook event, parsed from the JSON document on stdin.
///
/// Unknown JSON keys are ignored (forward compatibility with the host);
/// variant-specific fields that don't apply to the current event are simply
/// absent. The struct is immutable for the lifetime of a dispatch: handlers
/// receive a shared reference, never a mutable one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookEvent {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub transcript_path: String,
    #[serde(default)]
    pub cwd: String,
    #[serde(default)]
    pub permission_mode: String,
    #[serde(default)]
    pub hook_event_name: String,

    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_input: Option<Value>,
    #[serde(default)]
    pub tool_response: Option<Value>,
    #[serde(default)]
    pub tool_use_id: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub is_interrupt: Option<bool>,

    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default)]
    pub stop_hook_active: Option<bool>,

    #[serde(default)]
    pub prompt: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub notification_type: Option<String>,

    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub custom_instructions: Option<String>,
}

impl HookEvent {
    /// Read the full body from `reader`, then parse. Empty input is valid
    /// and yields a default event; malformed (non-empty) JSON is an error.
    pub fn parse<R: Read>(mut reader: R) -> Result<Self, CcToolsError> {
        let mut raw = String::new();
        reader
            .read_to_string(&mut raw)
            .map_err(|err| CcToolsError::ParseError(serde_json::Error::io(err)))?;
        Self::parse_str(&raw)
    }

    pub fn parse_str(raw: &str) -> Result<Self, CcToolsError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw).map_err(CcToolsError::ParseError)
    }

    pub fn kind(&self) -> Option<HookEventKind> {
        HookEventKind::parse(&self.hook_event_name)
    }

    /// True when `tool_name` names one of the four file-edit tools.
    pub fn is_edit_tool(&self) -> bool {
        self.tool_name
            .as_deref()
            .is_some_and(|name| EDIT_TOOLS.contains(&name))
    }

    /// The tool's target file path, or empty if not applicable/present.
    /// `NotebookEdit` reads `notebook_path`; everything else reads `file_path`.
    pub fn file_path(&self) -> String {
        let Some(input) = self.tool_input.as_ref() else {
            return String::new();
        };
        let key = if self.tool_name.as_deref() == Some("NotebookEdit") {
            "notebook_path"
        } else {
            "file_path"
        };
        input
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

static SAFE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("static pattern is valid"));

/// Sanitize a session id for use as a filesystem path segment.
///
/// Ids that already look like a safe token (`[A-Za-z0-9-]+`) pass through
/// unchanged; anything else is collapsed to the first 16 hex characters of
/// its SHA-256 digest, so a hostile or unusual id can never escape the
/// directory it's placed in.
pub fn file_key(session_id: &str) -> String {
    if SAFE_ID_PATTERN.is_match(session_id) {
        return session_id.to_string();
    }
    let digest = Sha256::digest(session_id.as_bytes());
    let hex = digest.iter().map(|b| format!("{b:02x}")).collect::<String>();
    hex[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_is_not_an_error() {
        let event = HookEvent::parse_str("").unwrap();
        assert!(event.hook_event_name.is_empty());
        assert_eq!(event.kind(), None);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(HookEvent::parse_str("{not json").is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let event = HookEvent::parse_str(r#"{"hook_event_name":"Stop","wibble":123}"#).unwrap();
        assert_eq!(event.kind(), Some(HookEventKind::Stop));
    }

    #[test]
    fn is_edit_tool_is_exactly_the_four_tools() {
        for tool in ["Edit", "MultiEdit", "Write", "NotebookEdit"] {
            let event = HookEvent {
                tool_name: Some(tool.to_string()),
                ..Default::default()
            };
            assert!(event.is_edit_tool(), "{tool} should count as an edit tool");
        }
        for tool in ["Read", "Bash", "Grep"] {
            let event = HookEvent {
                tool_name: Some(tool.to_string()),
                ..Default::default()
            };
            assert!(!event.is_edit_tool());
        }
    }

    #[test]
    fn file_path_reads_notebook_path_for_notebook_edit() {
        let event = HookEvent {
            tool_name: Some("NotebookEdit".to_string()),
            tool_input: Some(serde_json::json!({"notebook_path": "/a/b.ipynb", "file_path": "wrong"})),
            ..Default::default()
        };
        assert_eq!(event.file_path(), "/a/b.ipynb");
    }

    #[test]
    fn file_path_reads_file_path_otherwise() {
        let event = HookEvent {
            tool_name: Some("Edit".to_string()),
            tool_input: Some(serde_json::json!({"file_path": "/a/b.rs"})),
            ..Default::default()
        };
        assert_eq!(event.file_path(), "/a/b.rs");
    }

    #[test]
    fn file_path_absent_is_empty() {
        let event = HookEvent::default();
        assert_eq!(event.file_path(), "");
    }

    #[test]
    fn file_key_passes_through_safe_ids() {
        assert_eq!(file_key("abc-123"), "abc-123");
    }

    #[test]
    fn file_key_hashes_unsafe_ids_stably() {
        let first = file_key("../../etc/passwd");
        let second = file_key("../../etc/passwd");
        assert_eq!(first, second);
        assert_eq!(first.len(), 16);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
