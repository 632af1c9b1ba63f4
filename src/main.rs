use anyhow::Result;
use serde::Serialize;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod config;
mod gate;
mod input;
mod messages;
mod notify;
mod router;
mod skills;
mod tail;
mod transcript;

use config::Config;
use input::{HookEvent, HookPayload};
use notify::Dispatcher;

/// Reads one hook event from stdin and notifies, gates or annotates it.
///
/// Always exits 0: a notification failure must never surface as a failed
/// hook in the host.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // stdout carries hook output, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("CHIME_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .compact()
        .init();

    if let Err(e) = run().await {
        tracing::warn!("chime: {e:#}");
    }

    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let config = Config::load();
    let messages = config.locale.messages();

    let event = HookPayload::read_from(io::stdin()).into_event();
    tracing::debug!(?event, "received hook event");

    match &event {
        HookEvent::PreToolUse {
            tool_name,
            file_path,
        } => {
            let decision = gate::evaluate(
                tool_name.as_deref(),
                file_path.as_deref(),
                &config.gate,
                messages,
            );
            if let Some(output) = decision.output() {
                emit(&output)?;
            }
        }
        HookEvent::UserPromptSubmit { prompt } => {
            let output = skills::prompt_output(prompt.as_deref(), &config.skills, messages);
            emit(&output)?;
        }
        _ => {
            let dispatcher = Dispatcher::new(&config);
            if let Some(outcome) = router::route(&event, messages, &dispatcher).await {
                tracing::debug!(local = ?outcome.local, remote = ?outcome.remote, "dispatch settled");
            }
        }
    }

    Ok(())
}

/// Print hook output as a single JSON line on stdout
fn emit(output: &impl Serialize) -> Result<()> {
    let line = serde_json::to_string(output)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{}", line);
    }
    Ok(())
}
