mod actions;
mod app;
mod config;
mod executor;
mod history;
mod i18n;
mod storage;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;

use actions::GitAction;
use app::App;
use config::Config;
use executor::CommandRunner;
use history::{ConnectionState, HistoryStore};
use i18n::I18n;

#[derive(Parser)]
#[command(name = "gt")]
#[command(about = "Minimal git terminal front-end")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single git action and print the result
    Run {
        /// Action to run
        #[arg(value_enum)]
        action: RunAction,
        /// Commit message (required for commit)
        #[arg(short = 'm', long = "message")]
        message: Option<String>,
    },
    /// Print the most recent command history
    History,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RunAction {
    Status,
    Add,
    Diff,
    Log,
    Commit,
    Push,
    Pull,
}

impl RunAction {
    fn to_action(self, message: Option<&str>) -> Option<GitAction> {
        match self {
            Self::Status => Some(GitAction::Status),
            Self::Add => Some(GitAction::AddAll),
            Self::Diff => Some(GitAction::Diff),
            Self::Log => Some(GitAction::Log),
            Self::Commit => GitAction::commit(message.unwrap_or("")),
            Self::Push => Some(GitAction::Push),
            Self::Pull => Some(GitAction::Pull),
        }
    }
}

fn main() -> Result<()> {
    // Diagnostics go to stderr, filtered by RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::new()?;
    let i18n = I18n::new(&config.get_effective_language());
    let mut store = HistoryStore::open(&config);

    match cli.command {
        None => App::new(config, i18n, store).run(),
        Some(Commands::Run { action, message }) => {
            let Some(action) = action.to_action(message.as_deref()) else {
                println!("{}", i18n.t("commit_message_required").red());
                std::process::exit(2);
            };
            let invocation = action.invocation();
            let result = CommandRunner::execute_and_record(&invocation, &mut store);

            print!("{}", result.display_text);
            if !result.display_text.ends_with('\n') {
                println!();
            }
            let completed = i18n.t_format("command_completed", &[&result.exit_code.to_string()]);
            if result.exit_code == 0 {
                println!("{}", completed.green().bold());
            } else {
                println!("{}", completed.red().bold());
            }
            Ok(())
        }
        Some(Commands::History) => {
            if store.state() == ConnectionState::Unavailable {
                println!("{}", i18n.t("history_unavailable").yellow());
                return Ok(());
            }
            match store.list_recent(config.display.max_history_shown) {
                Ok(records) if records.is_empty() => {
                    println!("{}", i18n.t("no_history"));
                }
                Ok(records) => {
                    println!("{}", i18n.t("history_header").cyan().bold());
                    for record in records {
                        let local_time = record.timestamp.with_timezone(&chrono::Local);
                        println!(
                            "{}: {}",
                            local_time
                                .format("%Y-%m-%d %H:%M:%S")
                                .to_string()
                                .yellow(),
                            record.command
                        );
                    }
                }
                Err(err) => {
                    println!("{}", i18n.t_format("history_error", &[&err.to_string()]).red());
                }
            }
            Ok(())
        }
    }
}
