//! bounty-watch CLI
//!
//! Local / cron execution entry point. For AWS Lambda, use `bounty-watch-lambda`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use bounty_watch::{
    error::Result,
    models::Config,
    pipeline::Monitor,
    storage::{LocalSnapshotStore, MemorySnapshotStore, SnapshotStore},
    trigger,
};

/// bounty-watch - Bug bounty scope monitor
#[derive(Parser, Debug)]
#[command(
    name = "bounty-watch",
    version,
    about = "Announces newly eligible bug bounty scope assets"
)]

struct Cli {
    /// Path to storage directory holding config.toml and the snapshot
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one monitoring pass and print the result as JSON
    Run {
        /// Diff against the stored snapshot without sending alerts or writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Print health information as JSON
    Health,

    /// Validate configuration
    Validate,

    /// Show current snapshot info
    Info,
}

/// Initialize logging before anything else can log.
///
/// Returns whether the level is pinned by `--verbose` or `RUST_LOG`. When it
/// isn't, output starts at info and `logging.level` applies once the config
/// is loaded.
fn init_logging(verbose: bool) -> bool {
    let pinned = verbose || std::env::var_os("RUST_LOG").is_some();
    let level = if verbose { "debug" } else { "trace" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
    if !pinned {
        log::set_max_level(log::LevelFilter::Info);
    }
    pinned
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let level_pinned = init_logging(cli.verbose);

    // Load configurations
    let config_path = cli.storage_dir.join("config.toml");
    let mut config = Config::load_or_default(&config_path);
    config.apply_env();

    if !level_pinned {
        log::set_max_level(config.logging.level_filter());
    }
    log::debug!("Loaded configuration from {}", config_path.display());

    let store = LocalSnapshotStore::in_dir(&cli.storage_dir, &config.storage.snapshot_file);

    match cli.command {
        Command::Run { dry_run } => {
            let monitor = if dry_run {
                log::info!("Dry run: alerts disabled, snapshot left untouched");
                config.notifier.bot_token = None;
                config.notifier.chat_id = None;
                let seeded = MemorySnapshotStore::seeded(store.get().await);
                Monitor::from_config(&config, Arc::new(seeded))?
            } else {
                Monitor::from_config(&config, Arc::new(store))?
            };

            let response = trigger::run_now(&monitor).await;
            println!("{}", serde_json::to_string_pretty(&response)?);

            if !response.result.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Command::Health => {
            let report = trigger::health(&config);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
            log::info!(
                "Telegram: {}",
                if config.notifier.is_configured() {
                    "configured"
                } else {
                    "not configured"
                }
            );
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());
            match store.load().await {
                Ok(Some(snapshot)) => {
                    log::info!("Snapshot: {}", store.location());
                    log::info!("Assets: {}", snapshot.count);
                    log::info!("Last updated: {}", snapshot.updated_at);
                }
                Ok(None) => log::info!("No snapshot found yet."),
                Err(e) => log::warn!("Snapshot at {} is unreadable: {}", store.location(), e),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
