//! Blog-Harvest main entry point
//!
//! This is the command-line interface for the Blog-Harvest post harvester.

use blog_harvest::config::{read_config_with_hash, validate, Config};
use blog_harvest::crawler::Coordinator;
use blog_harvest::output::print_summary;
use blog_harvest::url::SiteUrls;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Blog-Harvest: a blogfa.com post and comment harvester
///
/// Blog-Harvest pages through a blog's post listing, fetches every post and
/// its comments with a pool of workers, and writes the posts to chunked JSON
/// files.
#[derive(Parser, Debug)]
#[command(name = "blog-harvest")]
#[command(version)]
#[command(about = "A blogfa.com post and comment harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Override the last listing page to fetch (<= 0 means unbounded)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    page_limit: Option<i64>,

    /// Override the number of concurrent post workers
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Override the directory receiving the chunk files
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load configuration, apply overrides, then validate
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match read_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    apply_overrides(&mut config, &cli);
    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(config, config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("blog_harvest=info,warn"),
            1 => EnvFilter::new("blog_harvest=debug,info"),
            2 => EnvFilter::new("blog_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides on top of the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(limit) = cli.page_limit {
        config.crawler.page_limit = limit;
    }
    if let Some(workers) = cli.workers {
        config.crawler.worker_count = workers;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let urls = SiteUrls::from_config(&config.site)?;

    println!("=== Blog-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", urls.base());
    println!("  Blog id: {}", urls.blog_id());
    println!("  UTC offset: {} minutes", config.site.utc_offset_minutes);

    println!("\nCrawler Configuration:");
    println!("  Start page: {}", config.crawler.start_page);
    match config.crawler.page_limit() {
        Some(limit) => println!("  Page limit: {}", limit),
        None => println!("  Page limit: none"),
    }
    println!("  Workers: {}", config.crawler.worker_count);
    println!("  Stop on empty page: {}", config.crawler.stop_on_empty_page);
    println!(
        "  Fetch attempts: {} (backoff {}ms..{}ms)",
        config.crawler.max_fetch_attempts,
        config.crawler.retry_initial_delay_ms,
        config.crawler.retry_max_delay_ms
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!(
        "  Files: {}<n>.json, {} posts each ({} mode)",
        config.output.file_prefix,
        config.output.chunk_size,
        config.output.chunk_mode.as_str()
    );
    if let Some(path) = &config.output.summary_path {
        println!("  Summary: {}", path);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start at {}",
        urls.listing_url(config.crawler.start_page)?
    );

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    config_hash: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut coordinator = Coordinator::new(config)?.with_config_hash(config_hash);

    match coordinator.run().await {
        Ok(summary) => {
            tracing::info!("Crawl completed");
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
