//! Addarr - conversational front end for Radarr and Sonarr
//!
//! Entry point wiring the config, catalogs, conversation core, and the
//! console transport together.

use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info};

use addarr::cli::{Cli, Command};
use addarr::config::Config;
use addarr::conversation::{ConversationMachine, Conversations};
use addarr::presenter::ConsolePresenter;
use addarr::{Authenticator, CatalogClient, Dispatcher, RadarrClient, SonarrClient, Transcript};

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    let level = match cli_log_level.map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("Addarr loaded config: language={}", config.language);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Check) => cmd_check(&config).await,
        Some(Command::Run) | None => cmd_run(&config).await,
    }
}

/// Validate the config and probe both backends
async fn cmd_check(config: &Config) -> Result<()> {
    config.validate().context("Configuration is invalid")?;
    println!("{} configuration is valid", "ok:".green());

    let radarr = RadarrClient::from_config(&config.radarr)?;
    let folders = radarr.root_folders().await.context("Radarr probe failed")?;
    println!("{} radarr reachable, {} root folder(s)", "ok:".green(), folders.len());

    let sonarr = SonarrClient::from_config(&config.sonarr)?;
    let folders = sonarr.root_folders().await.context("Sonarr probe failed")?;
    println!("{} sonarr reachable, {} root folder(s)", "ok:".green(), folders.len());

    Ok(())
}

/// Run the conversation loop on the console transport
///
/// Input lines are `<chat id>: <text>`; a bare line talks as chat id 1.
async fn cmd_run(config: &Config) -> Result<()> {
    config.validate().context("Configuration is invalid")?;

    let transcript = Arc::new(Transcript::load(&config.transcript_path, &config.language)?);
    let dispatcher = Dispatcher::new(&config.entrypoints, &transcript)?;
    let auth = Arc::new(Authenticator::new(&config.auth));

    let radarr = Arc::new(RadarrClient::from_config(&config.radarr)?);
    let sonarr = Arc::new(SonarrClient::from_config(&config.sonarr)?);

    let machine = Arc::new(ConversationMachine::new(
        radarr,
        sonarr.clone(),
        sonarr,
        transcript.clone(),
        auth,
    ));
    let conversations = Conversations::new(machine, Arc::new(ConsolePresenter));

    println!("{}", transcript.resolve("Start chatting")?.bold());
    info!("Console transport started");

    let mut editor = DefaultEditor::new().context("Failed to initialize line editor")?;
    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line).ok();

                let (user, text) = parse_line(line);
                conversations.dispatch(user, dispatcher.dispatch(text)).await;

                // Let the worker print before the next prompt draws
                tokio::task::yield_now().await;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                info!("Console transport stopped");
                break;
            }
            Err(e) => return Err(e).context("Failed to read input"),
        }
    }

    Ok(())
}

/// Split `<chat id>: <text>` input; lines without an id prefix are chat 1
fn parse_line(line: &str) -> (i64, &str) {
    if let Some((id, rest)) = line.split_once(':')
        && let Ok(user) = id.trim().parse::<i64>()
    {
        return (user, rest.trim());
    }
    (1, line)
}
