use serde::Serialize;
use std::collections::BTreeMap;

use crate::messages::Messages;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: &'static str,
    pub additional_context: String,
}

/// UserPromptSubmit hook output
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PromptOutput {
    #[serde(rename = "continue")]
    pub continue_: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_specific_output: Option<HookSpecificOutput>,
}

/// Skills whose keyword appears in the prompt, deduplicated, in keyword order
pub fn match_skills<'a>(prompt: &str, skills: &'a BTreeMap<String, String>) -> Vec<&'a str> {
    let mut matched: Vec<&str> = Vec::new();
    for (keyword, skill) in skills {
        if !keyword.is_empty() && prompt.contains(keyword.as_str()) && !matched.contains(&skill.as_str()) {
            matched.push(skill);
        }
    }
    matched
}

/// Build the hook output for a submitted prompt. The prompt always
/// continues; matched skills are added as extra context.
pub fn prompt_output(
    prompt: Option<&str>,
    skills: &BTreeMap<String, String>,
    messages: &Messages,
) -> PromptOutput {
    let matched = match_skills(prompt.unwrap_or_default(), skills);
    if matched.is_empty() {
        return PromptOutput {
            continue_: true,
            system_message: None,
            hook_specific_output: None,
        };
    }

    let list = matched.join(", ");
    tracing::debug!(skills = %list, "adding skills to prompt");
    PromptOutput {
        continue_: true,
        system_message: Some(messages.skills_system_message(&list)),
        hook_specific_output: Some(HookSpecificOutput {
            hook_event_name: "UserPromptSubmit",
            additional_context: messages.skills_context(&list),
        }),
    }
}
