//! `Taskdeck`: session-scoped personal task tracker.
//!
//! Runs a line-oriented shell on stdin/stdout. Tasks live only for the
//! lifetime of the process. Configuration via CLI flags, environment
//! variables, or config file (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! # Start signed out
//! cargo run --bin taskdeck
//!
//! # Sign in straight away and list by priority
//! cargo run --bin taskdeck -- --owner alice --sort priority
//!
//! # Or via environment variables
//! TASKDECK_OWNER=alice cargo run
//! ```

use std::io;
use std::path::Path;

use clap::Parser;
use taskdeck_model::OwnerId;
use tracing_appender::non_blocking::WorkerGuard;

use taskdeck::config::{CliArgs, TaskdeckConfig};
use taskdeck::session::Session;
use taskdeck::shell;
use taskdeck::tasks::TaskStore;

fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match TaskdeckConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config: {e}");
            TaskdeckConfig::default()
        }
    };

    // Logs go to a file; stdout carries shell output.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(sort = %config.default_sort, "taskdeck starting");

    let mut session = Session::new(TaskStore::new())
        .with_limits(config.limits)
        .with_sort(config.default_sort);
    if let Some(owner) = config.owner {
        session.sign_in(OwnerId::new(owner));
    }

    let result = shell::run(&mut session, io::stdin().lock(), io::stdout().lock());

    session.sign_out();
    tracing::info!("taskdeck exiting");
    result
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskdeck.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}
