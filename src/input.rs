use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;

/// Input JSON from Claude Code hook system.
///
/// Every field is optional: the shape depends on the event, and a missing
/// or unparseable payload is treated as the empty object.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HookPayload {
    pub hook_event_name: Option<String>,
    pub transcript_path: Option<String>,
    /// Notification events only
    pub notification_type: Option<String>,
    pub message: Option<String>,
    /// PreToolUse / PermissionRequest events
    pub tool_name: Option<String>,
    pub tool_input: Option<Value>,
    /// Subagent lifecycle events
    pub agent_type: Option<String>,
    /// TaskCompleted events
    pub task_subject: Option<String>,
    pub task_description: Option<String>,
    /// Stop events from newer hosts carry the final message inline
    pub last_assistant_message: Option<String>,
    /// UserPromptSubmit events
    pub prompt: Option<String>,
}

/// Sub-kind of a `Notification` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationKind {
    PermissionPrompt,
    IdlePrompt,
    AuthSuccess,
    ElicitationDialog,
    Other,
}

impl NotificationKind {
    fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("permission_prompt") => NotificationKind::PermissionPrompt,
            Some("idle_prompt") => NotificationKind::IdlePrompt,
            Some("auth_success") => NotificationKind::AuthSuccess,
            Some("elicitation_dialog") => NotificationKind::ElicitationDialog,
            _ => NotificationKind::Other,
        }
    }
}

/// A hook event, validated per kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    Notification {
        kind: NotificationKind,
        message: Option<String>,
    },
    PermissionRequest {
        tool_name: Option<String>,
    },
    Stop {
        last_assistant_message: Option<String>,
        transcript_path: Option<PathBuf>,
    },
    SubagentStart {
        agent_type: Option<String>,
    },
    SubagentStop {
        agent_type: Option<String>,
    },
    TaskCompleted {
        subject: Option<String>,
        description: Option<String>,
    },
    PreCompact,
    PreToolUse {
        tool_name: Option<String>,
        file_path: Option<PathBuf>,
    },
    UserPromptSubmit {
        prompt: Option<String>,
    },
    /// Any other event name, including a missing one
    Unknown(String),
}

/// Keep only strings with visible content
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl HookPayload {
    /// Parse a payload, falling back to the empty payload on blank or invalid input.
    pub fn parse(input: &str) -> HookPayload {
        if input.trim().is_empty() {
            return HookPayload::default();
        }
        match serde_json::from_str(input) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!("failed to parse hook payload: {e}");
                HookPayload::default()
            }
        }
    }

    /// Read and parse the payload from a reader (stdin in production).
    pub fn read_from(mut reader: impl Read) -> HookPayload {
        let mut buffer = String::new();
        if let Err(e) = reader.read_to_string(&mut buffer) {
            tracing::debug!("failed to read hook payload: {e}");
            return HookPayload::default();
        }
        HookPayload::parse(&buffer)
    }

    pub fn into_event(self) -> HookEvent {
        let name = self.hook_event_name.unwrap_or_default();
        match name.as_str() {
            "Notification" => HookEvent::Notification {
                kind: NotificationKind::from_name(self.notification_type.as_deref()),
                message: present(self.message),
            },
            "PermissionRequest" => HookEvent::PermissionRequest {
                tool_name: present(self.tool_name),
            },
            "Stop" => HookEvent::Stop {
                last_assistant_message: present(self.last_assistant_message),
                transcript_path: present(self.transcript_path).map(PathBuf::from),
            },
            "SubagentStart" => HookEvent::SubagentStart {
                agent_type: present(self.agent_type),
            },
            "SubagentStop" => HookEvent::SubagentStop {
                agent_type: present(self.agent_type),
            },
            "TaskCompleted" => HookEvent::TaskCompleted {
                subject: present(self.task_subject),
                description: present(self.task_description),
            },
            "PreCompact" => HookEvent::PreCompact,
            "PreToolUse" => HookEvent::PreToolUse {
                tool_name: present(self.tool_name),
                file_path: self
                    .tool_input
                    .as_ref()
                    .and_then(|input| input.get("file_path"))
                    .and_then(Value::as_str)
                    .filter(|p| !p.is_empty())
                    .map(PathBuf::from),
            },
            "UserPromptSubmit" => HookEvent::UserPromptSubmit {
                prompt: self.prompt,
            },
            _ => HookEvent::Unknown(name),
        }
    }
}
