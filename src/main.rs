//! Email-Finder main entry point
//!
//! This is the command-line interface for the Email-Finder batch crawler.

use anyhow::{bail, Context};
use clap::Parser;
use email_finder::batch::BatchOrchestrator;
use email_finder::config::{load_config_with_hash, validate, Config};
use email_finder::crawler::crawl_one;
use email_finder::output::{print_summary, read_table, summarize, write_table};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Email-Finder: contact address discovery for organization websites
///
/// Email-Finder reads a CSV of organizations, crawls a bounded slice of
/// each website and writes the table back with an email column listing the
/// addresses found.
#[derive(Parser, Debug)]
#[command(name = "email-finder")]
#[command(version = "1.0.0")]
#[command(about = "Find contact emails on organization websites", long_about = None)]
struct Cli {
    /// Input CSV with a header row and a URL column
    #[arg(value_name = "INPUT", required_unless_present = "url")]
    input: Option<PathBuf>,

    /// Output CSV (defaults to <INPUT>_with_emails.csv)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Crawl a single website and print its addresses
    #[arg(long, value_name = "URL", conflicts_with = "input")]
    url: Option<String>,

    /// Maximum pages visited per site
    #[arg(long)]
    max_pages: Option<u32>,

    /// Timeout per request in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum number of sites crawled at the same time
    #[arg(long)]
    concurrency: Option<u32>,

    /// Add email_status and email_error columns to the output
    #[arg(long)]
    with_status: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&cli, &config)?;
    } else if let Some(url) = &cli.url {
        handle_single(&config, url).await?;
    } else if let Some(input) = &cli.input {
        handle_batch(&cli, config, input).await?;
    } else {
        bail!("either an INPUT file or --url is required");
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("email_finder=info,warn"),
            1 => EnvFilter::new("email_finder=debug,info"),
            2 => EnvFilter::new("email_finder=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file (or defaults) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.request_timeout = timeout;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrency = concurrency;
    }

    validate(&config).context("invalid settings")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective settings and input
fn handle_dry_run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    println!("=== Email-Finder Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages per site: {}", config.crawler.max_pages);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Max concurrency: {}", config.crawler.max_concurrency);
    match config.crawler.row_timeout {
        Some(secs) => println!("  Row timeout: {}s", secs),
        None => println!("  Row timeout: none"),
    }
    if config.crawler.prioritize_contact_pages {
        println!(
            "  Priority keywords: {}",
            config.crawler.priority_keywords.join(", ")
        );
    } else {
        println!("  Priority keywords: disabled (strict FIFO)");
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.value);

    println!(
        "\nPlaceholder Domains ({}):",
        config.extractor.placeholder_domains.len()
    );
    for domain in &config.extractor.placeholder_domains {
        println!("  - {}", domain);
    }

    if let Some(url) = &cli.url {
        println!("\n✓ Would crawl {}", url);
    } else if let Some(input) = &cli.input {
        let table = read_table(input)
            .with_context(|| format!("failed to read {}", input.display()))?;
        let rows = table.input_rows(&config.table)?;
        println!("\n✓ Configuration is valid");
        println!("✓ Would crawl {} rows from {}", rows.len(), input.display());
        println!("✓ Output: {}", output_path(cli, input).display());
    }

    Ok(())
}

/// Handles --url: crawls one site and prints its addresses
async fn handle_single(config: &Config, url: &str) -> anyhow::Result<()> {
    let outcome = crawl_one(config, url).await?;

    match &outcome.error {
        Some(error) => println!("{}: failed ({})", outcome.seed, error),
        None => {
            println!(
                "{}: {} ({} pages)",
                outcome.seed,
                outcome.status(),
                outcome.stats.pages_fetched
            );
            for candidate in &outcome.emails {
                println!("  {}  (found on {})", candidate.address, candidate.found_on);
            }
            if !outcome.stats.important_pages.is_empty() {
                println!("Important pages:");
                for page in &outcome.stats.important_pages {
                    println!("  {}", page);
                }
            }
        }
    }

    Ok(())
}

/// Handles the main batch operation
async fn handle_batch(cli: &Cli, config: Config, input: &Path) -> anyhow::Result<()> {
    let table =
        read_table(input).with_context(|| format!("failed to read {}", input.display()))?;
    let rows = table.input_rows(&config.table)?;
    let output = output_path(cli, input);

    tracing::info!("Read {} rows from {}", rows.len(), input.display());

    let started_at = chrono::Utc::now();
    let orchestrator = BatchOrchestrator::from_config(&config)?;
    let results = orchestrator.process(rows).await;
    let finished_at = chrono::Utc::now();

    write_table(&output, &table, &results, &config.table, cli.with_status)
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!("Results written to {}", output.display());

    if !cli.quiet {
        print_summary(&summarize(&results, started_at, finished_at));
        println!("\n✓ Results written to: {}", output.display());
    }

    Ok(())
}

fn output_path(cli: &Cli, input: &Path) -> PathBuf {
    cli.output.clone().unwrap_or_else(|| {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        input.with_file_name(format!("{}_with_emails.csv", stem))
    })
}
