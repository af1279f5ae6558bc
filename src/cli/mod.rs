// src/cli/mod.rs
//
// Host CLI
//
// One subcommand per user action. `shell` keeps a single session alive so
// search results, the open detail and pending deletes carry over between
// lines, the way they do in an interactive UI.

pub mod args;
pub mod output;

pub use args::{Cli, Commands, ShellLine};
pub use output::{OutputFormat, PlainText};

use anyhow::Context;
use clap::Parser;
use std::io::Write as _;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::commands::*;
use crate::application::{AppState, ErrorResponse};
use crate::error::AppResult;
use crate::services::LogSink;

/// Install env_logger; `RUST_LOG` wins over `--log-level`
pub fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let format = OutputFormat::from_name(&cli.format);
    let config = cli.config();

    let mut state = AppState::initialize(&config, Arc::new(LogSink))
        .context("failed to open the movie collection")?;

    if cli.command == Commands::Shell {
        run_shell(&mut state, format).await?;
        return Ok(ExitCode::SUCCESS);
    }

    match execute(&mut state, cli.command, format, false).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            output::print_error(format, &ErrorResponse::from_app_error(e));
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Run one command against the session
///
/// Outside the shell a delete waits for its delay and applies right away;
/// inside it the delete is only queued and applied between lines.
pub async fn execute(
    state: &mut AppState,
    command: Commands,
    format: OutputFormat,
    interactive: bool,
) -> AppResult<()> {
    match command {
        Commands::Search { query } => {
            let result = search_movies(state, &query.join(" ")).await;
            output::print(format, &result)
        }

        Commands::Add { id } => output::print(format, &add_movie(state, &id).await?),

        Commands::Open {
            id,
            no_fetch,
            fav,
            wish,
            rate,
        } => {
            let mut detail = open_detail(state, &id, !no_fetch).await;

            if fav {
                toggle_favorite(state, &id)?;
            }
            if wish {
                toggle_wishlist(state, &id)?;
            }
            if let Some(rating) = rate {
                set_rating(state, &id, rating)?;
            }
            if fav || wish || rate.is_some() {
                detail = open_detail(state, &id, false).await;
            }

            output::print(format, &detail)
        }

        Commands::Close => output::print(format, &close_detail(state)),

        Commands::Fav { id } => output::print(format, &toggle_favorite(state, &id)?),

        Commands::Wish { id } => output::print(format, &toggle_wishlist(state, &id)?),

        Commands::Rate { id, rating } => output::print(format, &set_rating(state, &id, rating)?),

        Commands::Unrate { id } => output::print(format, &clear_rating(state, &id)?),

        Commands::Delete { index } if interactive => {
            output::print(format, &request_delete(state, index)?)
        }

        Commands::Delete { index } => output::print(format, &delete_movie(state, index).await?),

        Commands::List { filter } => {
            if let Some(filter) = filter {
                set_filter(state, &filter)?;
            }
            output::print(format, &list_movies(state))
        }

        Commands::Page { name } => output::print(format, &set_page(state, &name)?),

        Commands::Theme => output::print(format, &toggle_theme(state)?),

        Commands::Info => output::print(format, &database_info(state)?),

        Commands::Shell => {
            log::warn!("already in a shell");
            Ok(())
        }
    }
}

/// Apply due deletes, then run one shell line
///
/// Deletes go first so a line typed after the delay never sees a record
/// that is already due for removal.
pub async fn run_shell_line(
    state: &mut AppState,
    line: &str,
    format: OutputFormat,
) -> AppResult<()> {
    apply_due_deletes(state, format)?;

    match ShellLine::try_parse_from(line.split_whitespace()) {
        Ok(parsed) => execute(state, parsed.command, format, true).await,
        Err(e) => {
            if let Err(write_err) = e.print() {
                log::warn!("could not print usage: {}", write_err);
            }
            Ok(())
        }
    }
}

fn apply_due_deletes(state: &mut AppState, format: OutputFormat) -> AppResult<()> {
    let removed = flush_deletes(state)?;
    if !removed.is_empty() {
        output::print(format, &removed)?;
    }
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}

async fn run_shell(state: &mut AppState, format: OutputFormat) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    // Disarmed after a failed flush until the next line, so a failing save
    // does not retry in a tight loop
    let mut timer_armed = true;

    prompt()?;
    loop {
        let wait = next_delete_wait(state).filter(|_| timer_armed);

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let line = line.trim();
                if matches!(line, "quit" | "exit") {
                    break;
                }
                if !line.is_empty() {
                    if let Err(e) = run_shell_line(state, line, format).await {
                        output::print_error(format, &ErrorResponse::from_app_error(e));
                    }
                }
                timer_armed = true;
                prompt()?;
            }
            _ = tokio::time::sleep(wait.unwrap_or_default()), if wait.is_some() => {
                if let Err(e) = apply_due_deletes(state, format) {
                    output::print_error(format, &ErrorResponse::from_app_error(e));
                    timer_armed = false;
                }
            }
        }
    }

    let removed = drain_deletes(state)
        .await
        .context("failed to apply pending deletes")?;
    if !removed.is_empty() {
        output::print(format, &removed)?;
    }

    Ok(())
}
