//! `guildpulse` — terminal dashboard for community stats feeds.
//!
//! Polls the collector's two static JSON feeds (member-count history and
//! message-rate history), renders them as line charts, and shows the latest
//! values in a status bar. Refresh is manual (`r`) with an optional
//! 30-second auto-refresh timer (`a`); the display window is selectable
//! (`1`-`5` or `t`) without affecting stored data.
//!
//! Logs are written to a file (default `/tmp/guildpulse.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app
//! launch.

mod action;
mod app;
mod event;
mod theme;
mod tui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use guildpulse_api::{DEFAULT_MEMBER_FEED, DEFAULT_MESSAGE_FEED, FeedClient, FeedConfig};
use guildpulse_core::Controller;

use crate::app::App;

/// Terminal dashboard for community member and message stats.
#[derive(Parser, Debug)]
#[command(name = "guildpulse", version, about)]
struct Cli {
    /// Member-count feed URL (JSON array of samples)
    #[arg(long, default_value = DEFAULT_MEMBER_FEED, env = "GUILDPULSE_MEMBER_URL")]
    member_url: String,

    /// Message-rate feed URL (JSON array of samples)
    #[arg(long, default_value = DEFAULT_MESSAGE_FEED, env = "GUILDPULSE_MESSAGE_URL")]
    message_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Log file path
    #[arg(long, default_value = "/tmp/guildpulse.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "guildpulse={log_level},guildpulse_core={log_level},guildpulse_api={log_level}"
            ))
        });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("guildpulse.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    info!(
        member_url = %cli.member_url,
        message_url = %cli.message_url,
        "starting guildpulse"
    );

    let config = FeedConfig::new(
        &cli.member_url,
        &cli.message_url,
        Duration::from_secs(cli.timeout_secs),
    )?;
    let controller = Controller::new(FeedClient::new(config)?);

    let mut app = App::new(controller);
    app.run().await?;

    Ok(())
}
