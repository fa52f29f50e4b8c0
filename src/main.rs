use std::process::ExitCode;

use clap::{Parser, Subcommand};
use env_logger::Env;

use question_poll::{app_state::AppState, config::Config, errors::AppResult};

/// Generates a group question with Gemini and posts it as a Telegram poll.
#[derive(Debug, Parser)]
#[command(name = "question-poll", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Generate a new question and store it
    Generate,
    /// Post the most recent stored question as a poll
    Publish,
    /// Generate, store and publish in one go
    Run,
}

async fn run(command: Command) -> AppResult<()> {
    let config = Config::from_env()?;
    let state = AppState::new(config).await?;

    if matches!(command, Command::Generate | Command::Run) {
        let record = state.pipeline.generate_question().await?;
        log::info!("Stored question {}: {}", record.id, record.question);
    }
    if matches!(command, Command::Publish | Command::Run) {
        let poll = state.pipeline.publish_latest().await?;
        log::info!(
            "Published question {} with {} options",
            poll.question_id,
            poll.options.len()
        );
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    log::info!("Starting {:?}", cli.command);
    match run(cli.command).await {
        Ok(()) => {
            log::info!("Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("[{}] {}", e.error_code(), e);
            ExitCode::FAILURE
        }
    }
}
