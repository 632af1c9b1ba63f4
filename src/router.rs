use crate::input::{HookEvent, NotificationKind};
use crate::messages::Messages;
use crate::notify::{DispatchOutcome, Dispatcher, NotificationEvent};
use crate::transcript;

/// Build the notification for a hook event, or `None` if the event does not
/// notify. A `Stop` event without an inline message reads the transcript
/// before returning.
pub fn notification_for(event: &HookEvent, messages: &Messages) -> Option<NotificationEvent> {
    let (title, message) = match event {
        HookEvent::Notification { kind, message } => {
            let title = match kind {
                NotificationKind::PermissionPrompt => messages.permission_prompt_title,
                NotificationKind::IdlePrompt => messages.idle_prompt_title,
                NotificationKind::AuthSuccess => messages.auth_success_title,
                NotificationKind::ElicitationDialog => messages.elicitation_dialog_title,
                NotificationKind::Other => messages.notification_title,
            };
            let message = message
                .clone()
                .unwrap_or_else(|| messages.notification_message.to_string());
            (title.to_string(), message)
        }
        HookEvent::PermissionRequest { tool_name } => (
            messages.permission_request_title.to_string(),
            messages.permission_request(tool_name.as_deref().unwrap_or(messages.unknown)),
        ),
        HookEvent::Stop {
            last_assistant_message,
            transcript_path,
        } => {
            let message = match (last_assistant_message, transcript_path) {
                (Some(message), _) => message.trim().to_string(),
                (None, Some(path)) => transcript::last_message(path, messages.stop_default_message),
                (None, None) => messages.stop_default_message.to_string(),
            };
            (messages.stop_title.to_string(), message)
        }
        HookEvent::SubagentStart { agent_type } => (
            messages.subagent_start_title.to_string(),
            messages.subagent_start(agent_type.as_deref().unwrap_or(messages.unknown)),
        ),
        HookEvent::SubagentStop { agent_type } => {
            let agent_type = agent_type.as_deref()?;
            (
                messages.subagent_stop_title.to_string(),
                messages.subagent_stop(agent_type),
            )
        }
        HookEvent::TaskCompleted {
            subject,
            description,
        } => (
            messages.task_completed(subject.as_deref().unwrap_or_default()),
            description
                .clone()
                .unwrap_or_else(|| messages.task_completed_message.to_string()),
        ),
        HookEvent::PreCompact => (
            messages.pre_compact_title.to_string(),
            messages.pre_compact_message.to_string(),
        ),
        HookEvent::PreToolUse { .. }
        | HookEvent::UserPromptSubmit { .. }
        | HookEvent::Unknown(_) => return None,
    };

    Some(NotificationEvent {
        title,
        message,
        mobile: true,
    })
}

/// Route a hook event to the dispatcher. Returns `None` when the event
/// produces no notification.
pub async fn route(
    event: &HookEvent,
    messages: &Messages,
    dispatcher: &Dispatcher,
) -> Option<DispatchOutcome> {
    let Some(notification) = notification_for(event, messages) else {
        tracing::debug!(?event, "no notification for event");
        return None;
    };
    Some(dispatcher.dispatch(&notification).await)
}
