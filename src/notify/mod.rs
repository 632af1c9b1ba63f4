//! Dual-channel notification dispatch.
//!
//! Every notification goes to the desktop toast and, for mobile events, to
//! the remote push endpoint. The two channels run concurrently and fail
//! independently; `dispatch` always reports both outcomes and never errors.

pub mod error_log;
pub mod push;
pub mod toast;

use std::path::PathBuf;

use crate::config::Config;
use error_log::ErrorLog;
use push::PushClient;
use toast::{SystemToaster, Toast, Toaster};

/// What to tell the user, built per hook invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub title: String,
    pub message: String,
    /// Also send to the remote push endpoint
    pub mobile: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    Delivered,
    Failed(String),
    /// Channel not attempted (not requested, or not configured)
    Skipped,
}

impl ChannelOutcome {
    fn from_result(result: anyhow::Result<()>) -> Self {
        match result {
            Ok(()) => ChannelOutcome::Delivered,
            Err(e) => ChannelOutcome::Failed(format!("{:#}", e)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub local: ChannelOutcome,
    pub remote: ChannelOutcome,
}

pub struct Dispatcher {
    toaster: Box<dyn Toaster>,
    push: Option<PushClient>,
    error_log: ErrorLog,
    app_id: String,
    icon_path: Option<PathBuf>,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Self {
        Self::with_toaster(config, Box::new(SystemToaster::new()))
    }

    pub fn with_toaster(config: &Config, toaster: Box<dyn Toaster>) -> Self {
        Self {
            toaster,
            push: config.ntfy_url.as_deref().map(PushClient::new),
            error_log: ErrorLog::new(&config.error_log),
            app_id: config.app_id.clone(),
            icon_path: config.icon_path.clone(),
        }
    }

    /// Deliver `event` on both channels and wait for both to settle.
    pub async fn dispatch(&self, event: &NotificationEvent) -> DispatchOutcome {
        let (local, remote) = tokio::join!(self.show_toast(event), self.send_push(event));
        DispatchOutcome { local, remote }
    }

    async fn show_toast(&self, event: &NotificationEvent) -> ChannelOutcome {
        let toast = Toast {
            title: &event.title,
            message: &event.message,
            app_id: &self.app_id,
            icon: self.icon_path.as_deref(),
            sound: true,
        };
        let outcome = ChannelOutcome::from_result(self.toaster.show(&toast).await);
        match &outcome {
            ChannelOutcome::Failed(reason) => tracing::warn!("desktop notification failed: {reason}"),
            _ => tracing::info!(title = %event.title, "desktop notification shown"),
        }
        outcome
    }

    async fn send_push(&self, event: &NotificationEvent) -> ChannelOutcome {
        if !event.mobile {
            return ChannelOutcome::Skipped;
        }
        let Some(push) = &self.push else {
            tracing::debug!("no push endpoint configured, skipping mobile notification");
            return ChannelOutcome::Skipped;
        };

        let outcome = ChannelOutcome::from_result(push.send(&event.title, &event.message).await);
        match &outcome {
            ChannelOutcome::Failed(reason) => {
                tracing::warn!("mobile notification failed: {reason}");
                if let Err(e) = self
                    .error_log
                    .append(&format!("mobile push failed: {}", reason))
                {
                    tracing::warn!("{e:#}");
                }
            }
            _ => tracing::info!(url = push.url(), title = %event.title, "mobile notification sent"),
        }
        outcome
    }
}


#[cfg(test)]
mod tests {
    use super::testing::CollectToaster;
    use super::*;
    use tempfile::TempDir;

    fn config(temp: &TempDir, ntfy_url: Option<String>) -> Config {
        Config {
            ntfy_url,
            error_log: temp.path().join("error.log"),
            ..Config::fallback()
        }
    }

    fn event(mobile: bool) -> NotificationEvent {
        NotificationEvent {
            title: "작업 완료: build".to_string(),
            message: "All green".to_string(),
            mobile,
        }
    }

    #[tokio::test]
    async fn test_unreachable_push_does_not_block_toast() {
        let temp = TempDir::new().unwrap();
        let toaster = CollectToaster::default();
        let config = config(&temp, Some("http://127.0.0.1:9/topic".to_string()));
        let dispatcher = Dispatcher::with_toaster(&config, Box::new(toaster.clone()));

        let outcome = dispatcher.dispatch(&event(true)).await;

        assert_eq!(outcome.local, ChannelOutcome::Delivered);
        assert!(matches!(outcome.remote, ChannelOutcome::Failed(_)));
        assert_eq!(toaster.shown().len(), 1);

        let log = std::fs::read_to_string(temp.path().join("error.log")).unwrap();
        assert_eq!(log.lines().count(), 1);
        assert!(log.contains(" - mobile push failed: "));
    }

    #[tokio::test]
    async fn test_toast_failure_does_not_block_push() {
        let temp = TempDir::new().unwrap();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/topic")
            .match_header("Title", push::encode_title("작업 완료: build").as_str())
            .match_body("All green")
            .with_status(200)
            .create_async()
            .await;
        let config = config(&temp, Some(format!("{}/topic", server.url())));
        let dispatcher = Dispatcher::with_toaster(&config, Box::new(CollectToaster::failing()));

        let outcome = dispatcher.dispatch(&event(true)).await;

        assert!(matches!(outcome.local, ChannelOutcome::Failed(ref r) if r.contains("unavailable")));
        assert_eq!(outcome.remote, ChannelOutcome::Delivered);
        mock.assert_async().await;
        assert!(!temp.path().join("error.log").exists());
    }

    #[tokio::test]
    async fn test_both_channels_fail_independently() {
        let temp = TempDir::new().unwrap();
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/topic")
            .with_status(503)
            .create_async()
            .await;
        let config = config(&temp, Some(format!("{}/topic", server.url())));
        let dispatcher = Dispatcher::with_toaster(&config, Box::new(CollectToaster::failing()));

        let outcome = dispatcher.dispatch(&event(true)).await;

        assert!(matches!(outcome.local, ChannelOutcome::Failed(_)));
        assert!(matches!(outcome.remote, ChannelOutcome::Failed(ref r) if r.contains("503")));
    }

    #[tokio::test]
    async fn test_non_mobile_event_skips_push() {
        let temp = TempDir::new().unwrap();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/topic")
            .expect(0)
            .create_async()
            .await;
        let config = config(&temp, Some(format!("{}/topic", server.url())));
        let dispatcher = Dispatcher::with_toaster(&config, Box::new(CollectToaster::default()));

        let outcome = dispatcher.dispatch(&event(false)).await;

        assert_eq!(outcome.local, ChannelOutcome::Delivered);
        assert_eq!(outcome.remote, ChannelOutcome::Skipped);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_endpoint_skips_push() {
        let temp = TempDir::new().unwrap();
        let dispatcher =
            Dispatcher::with_toaster(&config(&temp, None), Box::new(CollectToaster::default()));

        let outcome = dispatcher.dispatch(&event(true)).await;

        assert_eq!(outcome.remote, ChannelOutcome::Skipped);
        assert!(!temp.path().join("error.log").exists());
    }
}
