//! Pagewalk main entry point
//!
//! This is the command-line interface for the Pagewalk site auditor.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use pagewalk::config::{load_config, resolve_options, CrawlerSettings};
use pagewalk::output::{log_statistics, CrawlStatistics};
use pagewalk::run_crawl;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Pagewalk: a concurrent site auditor
///
/// Pagewalk crawls a website from a root URL, staying on the root's domain,
/// and prints a JSON report of page status, SEO signals, broken links and
/// asset health.
#[derive(Parser, Debug)]
#[command(name = "pagewalk")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent site auditor", long_about = None)]
struct Cli {
    /// Root URL to crawl (https:// is assumed when no scheme is given)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Maximum crawl depth [default: 10]
    #[arg(long)]
    depth: Option<u32>,

    /// Retries for failed page requests [default: 1]
    #[arg(long)]
    retries: Option<u32>,

    /// Delay between requests, e.g. 200ms or 1s [default: 0s]
    #[arg(long, value_name = "DURATION")]
    delay: Option<String>,

    /// Per-request timeout [default: 15s]
    #[arg(long, value_name = "DURATION")]
    timeout: Option<String>,

    /// Requests per second; overrides --delay
    #[arg(long, value_name = "N")]
    rps: Option<u32>,

    /// User-Agent header sent with every request
    #[arg(long, value_name = "STRING")]
    user_agent: Option<String>,

    /// Concurrent page workers [default: 4]
    #[arg(long)]
    workers: Option<usize>,

    /// Path to a TOML file with a [crawler] table of defaults
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the report on a single line
    #[arg(long)]
    compact: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Settings given explicitly on the command line
    fn settings(&self) -> CrawlerSettings {
        CrawlerSettings {
            depth: self.depth,
            retries: self.retries,
            delay: self.delay.clone(),
            timeout: self.timeout.clone(),
            rps: self.rps,
            user_agent: self.user_agent.clone(),
            workers: self.workers,
            indent: self.compact.then_some(false),
        }
    }
}

// Every path exits 0; failures are reported on stderr.
#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return;
        }
    };

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = handle_crawl(cli).await {
        tracing::error!("Crawl failed: {:#}", e);
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagewalk=info,warn"),
            1 => EnvFilter::new("pagewalk=debug,info"),
            2 => EnvFilter::new("pagewalk=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Resolves options, runs the crawl and prints the report
async fn handle_crawl(cli: Cli) -> anyhow::Result<()> {
    let Some(url) = cli.url.clone() else {
        let mut stderr = std::io::stderr();
        Cli::command()
            .write_help(&mut stderr)
            .context("Failed to print usage")?;
        return Ok(());
    };

    let file_settings = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
                .crawler
        }
        None => CrawlerSettings::default(),
    };

    let options = resolve_options(&url, cli.settings().or(file_settings))?;
    tracing::debug!("Resolved options: {:?}", options);

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, waiting for in-flight requests");
            interrupt.cancel();
        }
    });

    let indent = options.indent_json;
    let report = run_crawl(options, cancel).await?;

    log_statistics(&CrawlStatistics::from_report(&report));

    let json = report.to_json(indent).context("Failed to encode report")?;
    println!("{}", json);

    Ok(())
}
