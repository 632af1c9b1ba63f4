use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// A desktop notification request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub app_id: &'a str,
    pub icon: Option<&'a Path>,
    pub sound: bool,
}

/// Local notification channel. Resolves once the OS has accepted or
/// rejected the toast.
#[async_trait]
pub trait Toaster: Send + Sync {
    async fn show(&self, toast: &Toast<'_>) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    pub fn current() -> Platform {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }
}

/// A fully prepared notifier invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastCommand {
    pub program: &'static str,
    pub args: Vec<String>,
    pub envs: Vec<(&'static str, String)>,
}

/// Shows toasts by running the platform's notifier:
/// `notify-send` on Linux, `osascript` on macOS, PowerShell on Windows.
pub struct SystemToaster {
    platform: Platform,
}

impl SystemToaster {
    pub fn new() -> Self {
        Self {
            platform: Platform::current(),
        }
    }
}

impl Default for SystemToaster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Toaster for SystemToaster {
    async fn show(&self, toast: &Toast<'_>) -> Result<()> {
        let toast = Toast {
            icon: existing_icon(toast.icon),
            ..toast.clone()
        };
        let prepared = build_command(self.platform, &toast);

        let output = Command::new(prepared.program)
            .args(&prepared.args)
            .envs(prepared.envs.iter().map(|(k, v)| (*k, v.as_str())))
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to run {}", prepared.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} exited with {}: {}",
                prepared.program,
                output.status,
                stderr.trim()
            );
        }
        Ok(())
    }
}

/// Drop an icon path that does not exist; the toast is shown without it
fn existing_icon(icon: Option<&Path>) -> Option<&Path> {
    icon.filter(|icon| {
        let exists = icon.exists();
        if !exists {
            tracing::debug!(icon = %icon.display(), "toast icon not found, showing without it");
        }
        exists
    })
}

/// Escape a value for an AppleScript string literal
fn applescript_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

// Values travel through environment variables so nothing needs quoting.
const WINDOWS_SCRIPT: &str = r#"
[Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime] > $null
$template = [Windows.UI.Notifications.ToastTemplateType]::ToastImageAndText02
$xml = [Windows.UI.Notifications.ToastNotificationManager]::GetTemplateContent($template)
$text = $xml.GetElementsByTagName('text')
$text.Item(0).AppendChild($xml.CreateTextNode($env:CHIME_TOAST_TITLE)) > $null
$text.Item(1).AppendChild($xml.CreateTextNode($env:CHIME_TOAST_MESSAGE)) > $null
if ($env:CHIME_TOAST_ICON) {
    $xml.GetElementsByTagName('image').Item(0).SetAttribute('src', $env:CHIME_TOAST_ICON)
}
if ($env:CHIME_TOAST_SOUND -ne '1') {
    $audio = $xml.CreateElement('audio')
    $audio.SetAttribute('silent', 'true')
    $xml.DocumentElement.AppendChild($audio) > $null
}
$toast = [Windows.UI.Notifications.ToastNotification]::new($xml)
[Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier($env:CHIME_TOAST_APP_ID).Show($toast)
"#;

pub fn build_command(platform: Platform, toast: &Toast<'_>) -> ToastCommand {
    match platform {
        Platform::Linux => {
            let mut args = vec![format!("--app-name={}", toast.app_id)];
            if let Some(icon) = toast.icon {
                args.push(format!("--icon={}", icon.display()));
            }
            if toast.sound {
                args.push("--hint=string:sound-name:message-new-instant".to_string());
            }
            args.push("--".to_string());
            args.push(toast.title.to_string());
            args.push(toast.message.to_string());
            ToastCommand {
                program: "notify-send",
                args,
                envs: Vec::new(),
            }
        }
        Platform::MacOs => {
            let mut script = format!(
                "display notification {} with title {}",
                applescript_string(toast.message),
                applescript_string(toast.title)
            );
            if toast.sound {
                script.push_str(" sound name \"default\"");
            }
            ToastCommand {
                program: "osascript",
                args: vec!["-e".to_string(), script],
                envs: Vec::new(),
            }
        }
        Platform::Windows => {
            let mut envs = vec![
                ("CHIME_TOAST_TITLE", toast.title.to_string()),
                ("CHIME_TOAST_MESSAGE", toast.message.to_string()),
                ("CHIME_TOAST_APP_ID", toast.app_id.to_string()),
                ("CHIME_TOAST_SOUND", if toast.sound { "1" } else { "0" }.to_string()),
            ];
            if let Some(icon) = toast.icon {
                envs.push(("CHIME_TOAST_ICON", icon.display().to_string()));
            }
            ToastCommand {
                program: "powershell",
                args: vec![
                    "-NoProfile".to_string(),
                    "-NonInteractive".to_string(),
                    "-Command".to_string(),
                    WINDOWS_SCRIPT.to_string(),
                ],
                envs,
            }
        }
    }
}
