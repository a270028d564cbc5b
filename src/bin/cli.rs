//! pagewatch CLI
//!
//! Loads the watch list and runs the scan loop until every page changed.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pagewatch::{error::Result, models::Config, pipeline};

/// pagewatch - Web Page Change Notifier
#[derive(Parser, Debug)]
#[command(
    name = "pagewatch",
    version,
    about = "Watches web pages and announces the first change on each"
)]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "pagewatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture baselines and scan until every page has changed
    Watch,

    /// Validate the configuration file
    Validate,

    /// Send a test message to the webhook
    Ping {
        /// Message text (default: notifier.ready_message)
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show the configured watch list
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(&cli.config)?;
    log::info!("Loaded configuration from {}", cli.config.display());

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    match cli.command {
        Command::Watch => {
            log::info!("pagewatch starting...");
            let summary = pipeline::run_watcher(Arc::new(config)).await?;
            log::info!(
                "{} of {} pages changed after {} ticks ({}s)",
                summary.changed,
                summary.total,
                summary.ticks,
                (summary.finished_at - summary.started_at).num_seconds()
            );
            for page in &summary.pages {
                if let Some(at) = page.changed_at {
                    log::info!("    {} changed at {}", page.label, at.format("%Y-%m-%d %H:%M:%S UTC"));
                }
            }
        }

        Command::Validate => {
            log::info!("✓ Config OK ({} pages)", config.pages.len());
        }

        Command::Ping { message } => {
            pipeline::send_ping(&config, message.as_deref()).await?;
            log::info!("✓ Webhook accepted the test message");
        }

        Command::Info => {
            log::info!("User-Agent: {}", config.watcher.user_agent);
            log::info!("Check every {}s", config.watcher.interval_secs);
            log::info!(
                "Ignoring text in: {}",
                config.normalizer.ignore_elements.join(", ")
            );
            for page in &config.pages {
                log::info!("    {} -> {}", page.label, page.url);
            }
        }
    }

    Ok(())
}
