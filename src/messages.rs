/// Language for notification and hook output text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Ko,
}

impl Locale {
    /// Parse a locale tag such as `ko`, `ko_KR.UTF-8` or `en-US`.
    pub fn parse(tag: &str) -> Option<Self> {
        let lang = tag
            .split(['_', '-', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match lang.as_str() {
            "en" => Some(Locale::En),
            "ko" => Some(Locale::Ko),
            _ => None,
        }
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::En => &EN,
            Locale::Ko => &KO,
        }
    }
}

/// Fixed strings used for notifications and hook output.
///
/// Templates use `{}` as the placeholder and are filled by the helper
/// methods below.
pub struct Messages {
    pub notification_title: &'static str,
    pub notification_message: &'static str,
    pub permission_prompt_title: &'static str,
    pub idle_prompt_title: &'static str,
    pub auth_success_title: &'static str,
    pub elicitation_dialog_title: &'static str,
    pub permission_request_title: &'static str,
    permission_request_message: &'static str,
    pub stop_title: &'static str,
    pub stop_default_message: &'static str,
    pub subagent_start_title: &'static str,
    subagent_start_message: &'static str,
    pub subagent_stop_title: &'static str,
    subagent_stop_message: &'static str,
    task_completed_title: &'static str,
    pub task_completed_message: &'static str,
    pub pre_compact_title: &'static str,
    pub pre_compact_message: &'static str,
    pub unknown: &'static str,
    skills_context: &'static str,
    skills_system_message: &'static str,
    gate_read_reason: &'static str,
    gate_write_reason: &'static str,
}

fn fill(template: &str, value: &str) -> String {
    template.replacen("{}", value, 1)
}

impl Messages {
    pub fn permission_request(&self, tool_name: &str) -> String {
        fill(self.permission_request_message, tool_name)
    }

    pub fn subagent_start(&self, agent_type: &str) -> String {
        fill(self.subagent_start_message, agent_type)
    }

    pub fn subagent_stop(&self, agent_type: &str) -> String {
        fill(self.subagent_stop_message, agent_type)
    }

    pub fn task_completed(&self, subject: &str) -> String {
        fill(self.task_completed_title, subject)
    }

    pub fn skills_context(&self, skills: &str) -> String {
        fill(self.skills_context, skills)
    }

    pub fn skills_system_message(&self, skills: &str) -> String {
        fill(self.skills_system_message, skills)
    }

    pub fn gate_read_reason(&self, encoding: &str) -> String {
        fill(self.gate_read_reason, encoding)
    }

    pub fn gate_write_reason(&self, encoding: &str) -> String {
        fill(self.gate_write_reason, encoding)
    }
}

static EN: Messages = Messages {
    notification_title: "Notification",
    notification_message: "Message",
    permission_prompt_title: "Permission request",
    idle_prompt_title: "Waiting for input",
    auth_success_title: "Authentication succeeded",
    elicitation_dialog_title: "MCP input requested",
    permission_request_title: "Permission request",
    permission_request_message: "Permission was requested to use the tool \"{}\".",
    stop_title: "Stopped",
    stop_default_message: "The task was stopped.",
    subagent_start_title: "Subagent started",
    subagent_start_message: "Subagent {} has started.",
    subagent_stop_title: "Subagent stopped",
    subagent_stop_message: "Subagent {} has finished.",
    task_completed_title: "Task completed: {}",
    task_completed_message: "The task was completed.",
    pre_compact_title: "Compacting conversation",
    pre_compact_message: "Conversation compaction has started.",
    unknown: "unknown",
    skills_context: "Refer to the {} skills.",
    skills_system_message: "Added skills by keyword match: {}",
    gate_read_reason: "File encoding is {}. Use the Read MCP server.",
    gate_write_reason: "This file must be written in {} encoding. Use the Write MCP server.",
};

static KO: Messages = Messages {
    notification_title: "알림",
    notification_message: "메시지",
    permission_prompt_title: "권한 요청",
    idle_prompt_title: "입력 대기",
    auth_success_title: "인증 성공",
    elicitation_dialog_title: "MCP 도구 추출",
    permission_request_title: "권한 요청",
    permission_request_message: "도구 \"{}\" 사용 권한이 요청되었습니다.",
    stop_title: "종료",
    stop_default_message: "작업이 중지되었습니다.",
    subagent_start_title: "서브 에이전트 시작",
    subagent_start_message: "서브 에이전트 {}가 시작되었습니다.",
    subagent_stop_title: "서브 에이전트 종료",
    subagent_stop_message: "서브 에이전트 {}가 종료되었습니다.",
    task_completed_title: "작업 완료: {}",
    task_completed_message: "작업이 완료되었습니다.",
    pre_compact_title: "대화 압축 시작",
    pre_compact_message: "대화 압축이 시작되었습니다.",
    unknown: "알 수 없음",
    skills_context: "{} 스킬 참고해줘.",
    skills_system_message: "키워드 매칭으로 {} 스킬 추가되었습니다.",
    gate_read_reason: "파일 인코딩이 {}입니다. Read MCP 서버를 사용하세요.",
    gate_write_reason: "이 파일은 {} 인코딩으로 작성해야 합니다. Write MCP 서버를 사용하세요.",
};
