//! Jobsift main entry point
//!
//! This is the command-line interface for the Jobsift job-listing harvester.

use clap::Parser;
use jobsift::classify::{BlacklistRules, Classifier};
use jobsift::config::{load_config_with_hash, Config};
use jobsift::crawler::{browser_user_agent, refresh_dataset};
use jobsift::output::{print_statistics, write_report, DatasetStatistics};
use jobsift::storage::RecordStore;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Jobsift: an incremental job-listing harvester
///
/// Jobsift crawls a newest-first job listing site, keeps every job it has
/// ever seen in a CSV dataset, and writes the blacklist-filtered jobs as a
/// spreadsheet with one sheet per category.
#[derive(Parser, Debug)]
#[command(name = "jobsift")]
#[command(version = "0.1.0")]
#[command(about = "An incremental job-listing harvester", long_about = None)]
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

    /// Crawl for new jobs before writing the report
    #[arg(short, long)]
    refresh: bool,

    /// Maximum number of listing pages to fetch (overrides the config)
    #[arg(short = 'n', long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: Option<u32>,

    /// Report every job, ignoring the category and company blacklists
    #[arg(long)]
    no_filter: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["stats", "refresh"])]
    dry_run: bool,

    /// Show statistics for the stored dataset and exit
    #[arg(long, conflicts_with_all = ["dry_run", "refresh"])]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let max_pages = cli.max_pages.unwrap_or(config.crawler.max_pages);

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config, max_pages)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_run(&config, cli.refresh, max_pages, !cli.no_filter).await?;
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
            0 => EnvFilter::new("jobsift=info,warn"),
            1 => EnvFilter::new("jobsift=debug,info"),
            2 => EnvFilter::new("jobsift=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, max_pages: u32) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Jobsift Dry Run ===\n");

    println!("Site:");
    println!("  Origin: {}", config.site.origin);
    println!("  Start URL: {}", config.site.start_url);

    println!("\nCrawler Configuration:");
    println!("  Max pages: {}", max_pages);
    println!(
        "  Delay between pages: {}ms (+ up to {}ms jitter)",
        config.crawler.delay_ms, config.crawler.delay_jitter_ms
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!(
        "  User agent: {}",
        browser_user_agent(chrono::Local::now().date_naive())
    );

    println!("\nExtractor Signatures:");
    for (name, sig) in [
        ("job", &config.extractor.job),
        ("title", &config.extractor.title),
        ("posted", &config.extractor.posted),
        ("next-page", &config.extractor.next_page),
    ] {
        println!("  {}: <{} {}=\"{}\">", name, sig.tag, sig.attribute, sig.value);
    }
    println!("\nAttribute Fields ({}):", config.extractor.fields.len());
    for (attribute, field) in &config.extractor.fields {
        println!("  - {} -> {:?}", attribute, field);
    }

    println!("\nOutput:");
    println!("  Dataset: {}", config.output.dataset_path);
    println!("  Report: {}", config.output.report_path);
    println!("  Rules: {}", config.output.rules_path);

    let rules = BlacklistRules::load(Path::new(&config.output.rules_path))?;
    println!("\nRules:");
    println!("  Excluded categories: {}", rules.categories().len());
    println!("  Excluded companies: {}", rules.companies().len());
    println!(
        "  Buzzwords: {} (matched against {:?}, delimiter \"{}\")",
        rules.buzzwords().len(),
        config.classifier.buzz_field,
        config.classifier.buzz_delimiter
    );

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would fetch at most {} pages starting at {}",
        max_pages, config.site.start_url
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics for the stored dataset
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Dataset: {}\n", config.output.dataset_path);

    let store = RecordStore::load(Path::new(&config.output.dataset_path))?;
    let rules = BlacklistRules::load(Path::new(&config.output.rules_path))?;
    let view = Classifier::new(rules, &config.classifier).classify(&store);

    print_statistics(&DatasetStatistics::collect(&store, &view));

    Ok(())
}

/// Handles the main operation: optional refresh, then the report
async fn handle_run(
    config: &Config,
    refresh: bool,
    max_pages: u32,
    filter: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Rules are required before anything is crawled or written
    let rules = match BlacklistRules::load(Path::new(&config.output.rules_path)) {
        Ok(rules) => rules,
        Err(e) => {
            tracing::error!("Failed to load rules: {}", e);
            return Err(e.into());
        }
    };

    let store = if refresh {
        let cancel = CancellationToken::new();
        spawn_interrupt_handler(cancel.clone());

        tracing::info!(
            "Refreshing from {} (at most {} pages)",
            config.site.start_url,
            max_pages
        );
        match refresh_dataset(config, max_pages, cancel).await {
            Ok((store, outcome)) => {
                if !outcome.yielded_output() {
                    tracing::info!("No new jobs since the last refresh");
                }
                store
            }
            Err(e) => {
                tracing::error!("Refresh failed: {}", e);
                return Err(e.into());
            }
        }
    } else {
        RecordStore::load(Path::new(&config.output.dataset_path))?
    };

    if store.is_empty() {
        tracing::warn!(
            "No job data in {}; run with --refresh to crawl first",
            config.output.dataset_path
        );
        return Ok(());
    }

    let classifier = Classifier::new(rules, &config.classifier);
    let view = if filter {
        classifier.classify(&store)
    } else {
        classifier.tag_all(&store)
    };
    tracing::info!(
        "{} jobs kept, {} excluded, {} buzz tagged",
        view.len(),
        view.excluded(),
        view.buzz_count()
    );

    let path = write_report(&view, Path::new(&config.output.report_path))?;
    println!("✓ Report written to: {}", path.display());

    Ok(())
}

/// Cancels the crawl delay on Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current page");
            cancel.cancel();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_pages_override() {
        let cli = Cli::try_parse_from(["jobsift", "jobsift.toml", "--refresh", "-n", "3"]).unwrap();
        assert_eq!(cli.max_pages, Some(3));
        assert!(cli.refresh);
    }

    #[test]
    fn test_max_pages_rejects_zero() {
        let result = Cli::try_parse_from(["jobsift", "jobsift.toml", "--max-pages", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_max_pages_defaults_to_config() {
        let cli = Cli::try_parse_from(["jobsift", "jobsift.toml"]).unwrap();
        assert_eq!(cli.max_pages, None);
    }
}
