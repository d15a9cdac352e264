//! Cubelytics - look up a player's statistics across many sources.
//!
//! # Usage
//!
//! ```bash
//! # Interactive console
//! cubelytics
//! cubelytics Notch
//!
//! # One-shot output
//! cubelytics Notch --plain
//! cubelytics Notch --json
//!
//! # Offline, from a recorded stream
//! cubelytics Notch --plain --replay notch.sse
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use cubelytics_client::{HttpTransport, ReplayTransport, Transport};
use cubelytics_console::logging::{init_logging, LogSink};
use cubelytics_console::{console, oneshot, output, Config};

/// Player statistics search client.
///
/// Streams results for a username or UUID from the search backend and shows
/// one card per data source.
#[derive(Parser)]
#[command(name = "cubelytics", version, about)]
struct Cli {
    /// Username or UUID to search for
    query: Option<String>,

    /// Print the results as text instead of starting the console
    #[arg(long, conflicts_with = "json")]
    plain: bool,

    /// Print the results as JSON
    #[arg(long)]
    json: bool,

    /// Read events from a recorded stream (SSE text or JSON lines)
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Delay between replayed events, in milliseconds
    #[arg(long, default_value = "0", requires = "replay")]
    replay_delay_ms: u64,

    /// Search backend base URL (overrides the config file)
    #[arg(long)]
    server: Option<String>,

    /// Config file (default: platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(cli.server.clone(), cli.log_file.clone());

    let one_shot = cli.plain || cli.json;
    let sink = if one_shot {
        match &config.logging.file {
            Some(path) => LogSink::File(path.clone()),
            None => LogSink::Stderr,
        }
    } else {
        LogSink::for_console(config.logging.file.as_deref())
    };
    init_logging(&config.logging.filter, cli.verbose, sink)?;

    let transport: Arc<dyn Transport> = match &cli.replay {
        Some(path) => Arc::new(
            ReplayTransport::load(path)
                .await?
                .with_delay(Duration::from_millis(cli.replay_delay_ms)),
        ),
        None => Arc::new(
            HttpTransport::new(config.server.base_url.clone(), config.connect_timeout())?
                .with_search_path(config.server.search_path.clone()),
        ),
    };

    if !one_shot {
        return console::run_console(
            transport,
            config.progress_linger(),
            config.display.expand_cards,
            cli.query,
        )
        .await;
    }

    let Some(query) = cli.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        eprintln!("No search query provided. Use --help for usage information.");
        std::process::exit(1);
    };

    tracing::info!(query = %query, "Running one-shot search");
    let outcome = oneshot::run_search(transport, query).await?;
    let text = if cli.json {
        output::format_json(query, &outcome)
    } else {
        output::format_human(query, &outcome)
    };
    print!("{}", text);
    if cli.json {
        println!();
    }

    if outcome.is_failure() {
        std::process::exit(1);
    }
    Ok(())
}
