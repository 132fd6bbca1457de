//! itemsync - terminal front-end for the offline-first item cache.
//!
//! Shows the locally cached items immediately, refreshes them from the
//! configured endpoint, and keeps the list up to date as the cache changes.

mod app;
mod remote;
mod render;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use itemsync_core::Config;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;

// ============================================================================
// Constants
// ============================================================================

/// Log file name prefix inside `<cache_dir>/logs`
const LOG_FILE_PREFIX: &str = "itemsync.log";

const USAGE: &str = "\
Usage: itemsync [COMMAND]

Commands:
  (none)          Watch the item list; type r to refresh, q to quit
  --once          Refresh once, print the list and exit
  --clear-cache   Remove all cached items
  --show-config   Print the effective configuration
  --help          Show this message";

enum Command {
    Watch,
    Once,
    ClearCache,
    ShowConfig,
    Help,
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        match args.get(1).map(String::as_str) {
            None => Ok(Command::Watch),
            Some("--once") => Ok(Command::Once),
            Some("--clear-cache") => Ok(Command::ClearCache),
            Some("--show-config") => Ok(Command::ShowConfig),
            Some("--help") | Some("-h") => Ok(Command::Help),
            Some(other) => Err(anyhow::anyhow!("Unknown argument: {}\n\n{}", other, USAGE)),
        }
    }
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr and, when a log directory is available, to a daily
/// rolling file. The returned guard flushes the file writer on drop.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer().with_writer(io::stderr);

    let appender = log_dir.map(|dir| {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .build(dir)
    });

    match appender {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        Some(Err(e)) => {
            tracing_subscriber::registry().with(filter).with(stderr_layer).init();
            warn!(error = %e, "File logging disabled");
            None
        }
        None => {
            tracing_subscriber::registry().with(filter).with(stderr_layer).init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    let command = Command::parse(&args)?;
    if let Command::Help = command {
        println!("{}", USAGE);
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load()?;

    let log_dir = config.cache_dir().ok().map(|dir| dir.join("logs"));
    let _log_guard = init_tracing(log_dir.as_deref());
    info!("itemsync starting");

    let mut exit = ExitCode::SUCCESS;
    match command {
        Command::ShowConfig => show_config(&config)?,
        Command::ClearCache => App::new(&config).await?.clear_cache().await?,
        Command::Once => {
            if !App::new(&config).await?.run_once().await? {
                exit = ExitCode::FAILURE;
            }
        }
        Command::Watch => App::new(&config).await?.run_watch().await?,
        Command::Help => {}
    }

    info!("itemsync shutting down");
    Ok(exit)
}

fn show_config(config: &Config) -> Result<()> {
    println!("Config file: {}", Config::config_path()?.display());
    println!("Item store:  {}", config.store_path()?.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command> {
        let args: Vec<String> = std::iter::once("itemsync")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        Command::parse(&args)
    }

    #[test]
    fn test_parse_commands() {
        assert!(matches!(parse(&[]).unwrap(), Command::Watch));
        assert!(matches!(parse(&["--once"]).unwrap(), Command::Once));
        assert!(matches!(parse(&["--clear-cache"]).unwrap(), Command::ClearCache));
        assert!(matches!(parse(&["--show-config"]).unwrap(), Command::ShowConfig));
        assert!(matches!(parse(&["-h"]).unwrap(), Command::Help));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = parse(&["--bogus"]).err().unwrap();
        assert!(err.to_string().starts_with("Unknown argument: --bogus"));
    }
}
