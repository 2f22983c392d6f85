//! form-capture CLI
//!
//! Runs mapping files against a live page in Chrome or a static HTML file and
//! prints every captured value as a JSON line on stdout.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use form_capture::{
    BrowserSession, CaptureEngine, ConnectionOptions, HtmlPage, InitSummary, JsonLinesReporter, LaunchOptions,
    MappingSet,
};
use std::{
    path::PathBuf,
    rc::Rc,
    time::{Duration, Instant},
};

#[derive(Parser)]
#[command(name = "form-capture")]
#[command(version)]
#[command(about = "Capture form field values described by declarative mappings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a page in Chrome, capture on load, then watch for changes
    Capture {
        /// Page to open
        #[arg(long)]
        url: String,

        /// Mapping file (JSON)
        #[arg(long, short = 'm', value_name = "FILE")]
        mappings: PathBuf,

        /// Launch browser in headed mode (default: headless)
        #[arg(long, short = 'H')]
        headed: bool,

        /// Path to custom browser executable
        #[arg(long, value_name = "PATH")]
        chrome_path: Option<PathBuf>,

        /// Persistent browser profile directory
        #[arg(long, value_name = "DIR")]
        user_data_dir: Option<PathBuf>,

        /// WebSocket endpoint of a running browser to attach to instead of launching one
        #[arg(long, value_name = "URL")]
        ws_endpoint: Option<String>,

        /// How long to keep reporting change events, in seconds (0 = load captures only)
        #[arg(long, default_value = "60")]
        watch_secs: u64,

        /// Interval between change event polls, in milliseconds
        #[arg(long, default_value = "250")]
        poll_ms: u64,
    },

    /// Run load-triggered mappings against a static HTML file
    Html {
        /// HTML file to read
        #[arg(long, short = 'f', value_name = "FILE")]
        file: PathBuf,

        /// Mapping file (JSON)
        #[arg(long, short = 'm', value_name = "FILE")]
        mappings: PathBuf,
    },

    /// Print the JSON schema of mapping files
    Schema,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match Cli::parse().command {
        Command::Capture {
            url,
            mappings,
            headed,
            chrome_path,
            user_data_dir,
            ws_endpoint,
            watch_secs,
            poll_ms,
        } => {
            let mappings = MappingSet::load(&mappings)?;

            let session = match ws_endpoint {
                Some(endpoint) => BrowserSession::connect(ConnectionOptions::new(endpoint))?,
                None => {
                    let mut options = LaunchOptions::new().headless(!headed);
                    options.chrome_path = chrome_path;
                    options.user_data_dir = user_data_dir;
                    BrowserSession::launch(options)?
                }
            };

            let page = session.open(&url).with_context(|| format!("Failed to open {}", url))?;
            let engine = CaptureEngine::new(page, Rc::new(JsonLinesReporter::stdout()));
            report(&engine.initialize(mappings.as_slice()));

            let deadline = Instant::now() + Duration::from_secs(watch_secs);
            let mut delivered = 0;
            while Instant::now() < deadline {
                delivered += engine.page().pump_events()?;
                std::thread::sleep(Duration::from_millis(poll_ms));
            }

            log::info!("Delivered {} change events", delivered);
            session.close()?;
        }
        Command::Html { file, mappings } => {
            let mappings = MappingSet::load(&mappings)?;
            let page = HtmlPage::load(&file).with_context(|| format!("Failed to read {}", file.display()))?;

            let engine = CaptureEngine::new(page, Rc::new(JsonLinesReporter::stdout()));
            let summary = engine.initialize(mappings.as_slice());
            report(&summary);

            if !summary.is_clean() {
                bail!("{} of {} mappings failed", summary.failures.len(), mappings.len());
            }
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&MappingSet::json_schema())?);
        }
    }

    Ok(())
}

fn report(summary: &InitSummary) {
    eprintln!(
        "Sent {} values on load, watching {} elements",
        summary.sent, summary.listeners
    );

    for failure in &summary.failures {
        eprintln!("  mapping {} ({}): {}", failure.id, failure.selector, failure.error);
    }
}
