//! Interactive chat REPL for Mentora.
//!
//! Wires the conversation store, the external-service clients and the chat
//! orchestrator together behind a rustyline prompt. Slash commands manage
//! sessions; everything else is sent through the pipeline as a turn.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::time::timeout;
use tracing_subscriber::EnvFilter;

use mentora_application::{ChatOrchestrator, SessionUsecase};
use mentora_core::{ConversationStore, Sender, TurnRequest};
use mentora_infrastructure::{DirConversationStore, MentoraPaths};
use mentora_interaction::{
    BackendConfig, CompletionModel, DetectorStrategy, GenerativeDetector, HttpCompletionClient,
    HttpGroundingClient, LanguageDetector, ScriptDetector,
};

/// Upper bound on one full turn, over and above the per-call client timeouts.
const TURN_TIMEOUT: Duration = Duration::from_secs(90);

const COMMANDS: &[&str] = &[
    "/new",
    "/sessions",
    "/switch",
    "/delete",
    "/history",
    "/quit",
];

#[derive(Parser)]
#[command(name = "mentora")]
#[command(about = "Mentora - multilingual student-advisory chat", long_about = None)]
struct Cli {
    /// Storage directory (defaults to ~/.mentora)
    #[arg(long)]
    base_dir: Option<std::path::PathBuf>,

    /// Owner recorded on sessions created from this REPL
    #[arg(long, default_value = "student")]
    owner: String,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper;

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.to_string(),
                    replacement: cmd.to_string(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn build_detector(
    strategy: DetectorStrategy,
    model: Arc<dyn CompletionModel>,
) -> Arc<dyn LanguageDetector> {
    match strategy {
        DetectorStrategy::Script => Arc::new(ScriptDetector::new()),
        DetectorStrategy::Generative => Arc::new(GenerativeDetector::new(model)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // ===== Backend Initialization =====
    let config = BackendConfig::load().context("failed to load backend configuration")?;

    let completion: Arc<dyn CompletionModel> = {
        let endpoint = config.completion_endpoint()?;
        let mut client = HttpCompletionClient::with_timeout(
            endpoint,
            Duration::from_secs(config.completion.timeout_secs),
        );
        if let Some(api_key) = &config.completion.api_key {
            client = client.with_api_key(api_key);
        }
        Arc::new(client)
    };

    let grounding = Arc::new(HttpGroundingClient::with_timeout(
        config.grounding_endpoint()?,
        Duration::from_secs(config.grounding.timeout_secs),
    ));

    let detector = build_detector(config.detector.strategy, completion.clone());

    let paths = match &cli.base_dir {
        Some(dir) => MentoraPaths::new(dir),
        None => MentoraPaths::default_location()?,
    };
    let store: Arc<dyn ConversationStore> = Arc::new(
        DirConversationStore::new(paths)
            .await
            .context("failed to open conversation store")?,
    );

    let sessions = SessionUsecase::new(store.clone());
    let orchestrator = ChatOrchestrator::new(detector, completion, grounding, store);

    let mut active_session = sessions.create_session(&cli.owner).await?;

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    println!("{}", "=== Mentora ===".bright_magenta().bold());
    println!(
        "{}",
        "Ask anything about studying abroad. '/sessions' lists sessions, '/quit' exits."
            .bright_black()
    );
    println!(
        "{}",
        format!("Session {}", &active_session.id[..8]).bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if trimmed == "/quit" || trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if let Some(rest) = trimmed.strip_prefix('/') {
                    if let Err(err) =
                        handle_command(rest, &sessions, &mut active_session, &cli.owner).await
                    {
                        eprintln!("{}", format!("Error: {err}").red());
                    }
                    continue;
                }

                let request = TurnRequest::new(active_session.id.clone(), trimmed);
                match timeout(TURN_TIMEOUT, orchestrator.handle_turn(request)).await {
                    Ok(Ok(response)) => {
                        if !response.detected_language.eq_ignore_ascii_case("english") {
                            println!(
                                "{}",
                                format!("[detected: {}]", response.detected_language)
                                    .bright_black()
                            );
                        }
                        for line in response.answer.lines() {
                            println!("{}", line.bright_blue());
                        }
                        println!();
                    }
                    Ok(Err(err)) => {
                        eprintln!("{}", format!("Error: {err}").red());
                    }
                    Err(_) => {
                        eprintln!("{}", "Error: the turn timed out.".red());
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}

async fn handle_command(
    command: &str,
    sessions: &SessionUsecase,
    active_session: &mut mentora_core::ConversationSession,
    owner: &str,
) -> Result<()> {
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or("");
    let argument = parts.next();

    match name {
        "new" => {
            *active_session = sessions.create_session(owner).await?;
            println!(
                "{}",
                format!("Started session {}", &active_session.id[..8]).green()
            );
        }
        "sessions" => {
            let all = sessions.list_sessions().await?;
            if all.is_empty() {
                println!("{}", "No sessions yet.".bright_black());
            }
            for session in all {
                let marker = if session.id == active_session.id { "*" } else { " " };
                println!(
                    "{} {}  {}  {}",
                    marker.bright_yellow(),
                    session.id.bright_cyan(),
                    session.preferred_language.as_str().bright_black(),
                    session
                        .created_at
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                        .bright_black()
                );
            }
        }
        "switch" => {
            let id = argument.context("usage: /switch <session-id>")?;
            *active_session = sessions.ensure_session(id, owner).await?;
            println!("{}", format!("Switched to session {id}").green());
        }
        "delete" => {
            let id = argument.unwrap_or(active_session.id.as_str()).to_string();
            sessions.delete_session(&id).await?;
            println!("{}", format!("Deleted session {id}").green());
            if id == active_session.id {
                *active_session = sessions.create_session(owner).await?;
                println!(
                    "{}",
                    format!("Started session {}", &active_session.id[..8]).green()
                );
            }
        }
        "history" => {
            for message in sessions.history(&active_session.id).await? {
                let prefix = match message.sender {
                    Sender::User => format!("> {}", message.text).green(),
                    Sender::Bot => message.text.bright_blue(),
                };
                println!("{prefix}");
            }
        }
        _ => {
            println!("{}", "Unknown command".bright_black());
        }
    }

    Ok(())
}
