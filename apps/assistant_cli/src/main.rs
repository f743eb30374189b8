mod commands;
mod config;
mod render;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use assistant_core::{
    AssistantBridge, AssistantPanel, HttpChatBackend, PageKind, ScriptLibrary,
};
use clap::Parser;
use serde_json::json;
use shared::domain::ExecutionMode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    commands::{parse_command, ReplCommand, HELP},
    config::{load_settings, DEFAULT_CONFIG_PATH},
    render::{describe_event, format_actions, TranscriptPrinter},
};

#[derive(Parser, Debug)]
#[command(name = "assistant-cli", about = "Terminal front end for the dashboard assistant")]
struct Args {
    /// Page the assistant opens on, e.g. `strategy` or `/app/team`.
    #[arg(long, default_value = "dashboard")]
    page: String,
    #[arg(long)]
    backend_url: Option<String>,
    #[arg(long)]
    execution_mode: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(url) = args.backend_url {
        settings.backend_url = assistant_core::settings::normalize_backend_url(&url)?;
    }
    if let Some(mode) = args.execution_mode {
        settings.execution_mode = ExecutionMode::new(mode);
    }
    info!(backend = %settings.backend_url, mode = %settings.execution_mode, "starting assistant");

    let backend = HttpChatBackend::new(&settings)?;
    let mut panel = AssistantPanel::new(Arc::new(backend), settings, ScriptLibrary::builtin());

    let mut events = panel.subscribe_events();
    let status = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Some(line) = describe_event(&event) {
                        println!("{line}");
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "status printer lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut printer = TranscriptPrinter::default();
    panel.open(&args.page).await;
    println!("{}: {}", panel.page_context().name, panel.page_context().description);
    printer.print_new(&panel);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = parse_command(&line);
                debug!(command = command.name(), "repl command");
                if !run_command(&mut panel, command).await {
                    break;
                }
            }
            Some(event) = panel.next_inbound() => panel.handle_inbound(event),
        }
        printer.print_new(&panel);
    }

    panel.close();
    drop(panel);
    if let Err(err) = status.await {
        warn!(%err, "status printer task failed");
    }
    Ok(())
}

/// Applies one REPL command. Returns `false` when the user asked to quit.
async fn run_command(panel: &mut AssistantPanel, command: ReplCommand) -> bool {
    match command {
        ReplCommand::Say(text) => panel.submit_input(&text).await,
        ReplCommand::Demo => report(panel.enter_demo(), "demo is only available from live chat"),
        ReplCommand::Guided => report(panel.enter_guided(), "guided walkthrough unavailable"),
        ReplCommand::Autoplay => report(panel.start_autoplay(), "autoplay not started"),
        ReplCommand::Stop => report(panel.stop_autoplay(), "autoplay is not running"),
        ReplCommand::Next => report(panel.guided_next(), "not in a guided walkthrough"),
        ReplCommand::Reset => report(panel.guided_reset(), "not in a guided walkthrough"),
        ReplCommand::ExitGuided => report(panel.exit_guided(), "not in a guided walkthrough"),
        ReplCommand::NewConversation => {
            report(panel.start_new_conversation(), "assistant is not open")
        }
        ReplCommand::Actions => println!("{}", format_actions(&panel.quick_actions())),
        ReplCommand::Action(token) => panel.quick_action(&token).await,
        ReplCommand::Chip(index) => {
            let chip = panel.transcript().latest().and_then(|message| {
                message
                    .suggestions
                    .get(index - 1)
                    .map(|text| (message.id, text.clone()))
            });
            match chip {
                Some((message_id, text)) => panel.click_suggestion(message_id, &text).await,
                None => println!("no suggestion ({index}) on the latest message"),
            }
        }
        ReplCommand::Page(identifier) => {
            panel.close();
            panel.open(&identifier).await;
            if identifier.parse::<PageKind>().is_err() {
                println!("unknown page '{identifier}', showing the dashboard");
            }
            println!("{}: {}", panel.page_context().name, panel.page_context().description);
        }
        ReplCommand::Objective(active) => panel.bridge().set_objective_creation_active(active),
        ReplCommand::Team(summary) => {
            let payload = if summary.is_empty() {
                json!({ "members": [] })
            } else {
                json!({ "summary": summary, "members": [] })
            };
            panel.bridge().set_team_suggestion(payload);
        }
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::Quit => return false,
        ReplCommand::Empty => {}
        ReplCommand::Invalid(reason) => println!("{reason} (try /help)"),
    }
    true
}

fn report(applied: bool, refusal: &str) {
    if !applied {
        println!("{refusal}");
    }
}
