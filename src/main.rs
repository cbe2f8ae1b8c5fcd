//! Archive-Harvest main entry point
//!
//! This is the command-line interface for the Archive-Harvest article harvester.

use anyhow::Context;
use archive_harvest::config::{load_config_with_hash, Config};
use archive_harvest::crawler::{run_harvest, HarvestOptions, Harvester};
use archive_harvest::output::print_statistics;
use archive_harvest::profile::FieldSelectorProfile;
use archive_harvest::{ArticleField, PageOutcome};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Archive-Harvest: a resumable news archive harvester
///
/// Archive-Harvest walks a numerically-addressed article archive one ID at a
/// time, extracts title, time, author, content and tags with a site profile,
/// and appends the records to a CSV or SQLite table. Progress is checkpointed
/// so an interrupted run resumes where it stopped.
#[derive(Parser, Debug)]
#[command(name = "archive-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A resumable news archive harvester", long_about = None)]
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

    /// Ignore the stored checkpoint and start from the configured start ID
    #[arg(long)]
    fresh: bool,

    /// Start at this ID regardless of checkpoint and config
    #[arg(long, value_name = "ID")]
    start_id: Option<u64>,

    /// Stop at this ID instead of the configured end ID
    #[arg(long, value_name = "ID")]
    end_id: Option<u64>,

    /// Validate config and show what would be harvested without fetching
    #[arg(long, conflicts_with = "probe")]
    dry_run: bool,

    /// Fetch and extract a single ID, print the result and exit
    #[arg(long, value_name = "ID", conflicts_with = "dry_run")]
    probe: Option<u64>,
}

impl Cli {
    fn harvest_options(&self) -> HarvestOptions {
        HarvestOptions {
            fresh: self.fresh,
            start_id: self.start_id,
            end_id: self.end_id,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config, cli.harvest_options())?;
    } else if let Some(id) = cli.probe {
        handle_probe(config, id).await?;
    } else {
        handle_harvest(config, cli.harvest_options()).await?;
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
            0 => EnvFilter::new("archive_harvest=info,warn"),
            1 => EnvFilter::new("archive_harvest=debug,info"),
            2 => EnvFilter::new("archive_harvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be harvested
fn handle_dry_run(config: &Config, options: HarvestOptions) -> anyhow::Result<()> {
    let harvester = Harvester::new(config.clone(), options)?;

    println!("=== Archive-Harvest Dry Run ===\n");

    println!("Source:");
    println!("  Name: {}", config.source.name);
    println!("  URL template: {}", config.source.url_template);
    println!(
        "  First URL: {}",
        config.source.article_url(harvester.start_id())?
    );

    println!("\nRange:");
    println!("  Start ID: {}", harvester.start_id());
    println!("  End ID: {}", harvester.end_id());
    println!("  Batch size: {}", config.crawler.batch_size);
    println!("  Checkpoint interval: {}", config.crawler.checkpoint_interval);
    println!(
        "  Pacing: {}..{}ms",
        config.crawler.pacing_min_ms, config.crawler.pacing_max_ms
    );

    print_profile(harvester.profile());

    println!("\nOutput:");
    println!("  Format: {:?}", config.output.format);
    println!("  Path: {}", config.output.path);
    println!("  Checkpoint: {}", config.output.checkpoint_path);

    println!("\n✓ Configuration is valid");
    let count = harvester
        .end_id()
        .saturating_sub(harvester.start_id())
        .saturating_add(1);
    if harvester.start_id() > harvester.end_id() {
        println!("✓ Range already complete, nothing to harvest");
    } else {
        println!("✓ Would harvest {} IDs", count);
    }

    Ok(())
}

fn print_profile(profile: &FieldSelectorProfile) {
    println!("\nProfile ({}):", profile.name);
    for field in ArticleField::ALL {
        let rule = profile.rule(field);
        let marker = if rule.is_required() { "" } else { " (optional)" };
        println!("  {}{}: {}", field, marker, rule.sources().join(" | "));
    }
    println!("  Drop trailing content: {}", profile.drop_trailing_content);
}

/// Handles the --probe mode: fetches and extracts one ID
async fn handle_probe(config: Config, id: u64) -> anyhow::Result<()> {
    let url = config.source.article_url(id)?;
    let harvester = Harvester::new(config, HarvestOptions::default())?;

    println!("=== Probe {} ===\n", url);

    match harvester.process_id(id).await? {
        PageOutcome::Harvested(record) => {
            for (field, value) in ArticleField::ALL.iter().zip(record.as_row()) {
                println!("{}: {}", field, value);
            }
        }
        PageOutcome::Skipped(reason) => {
            println!("Skipped: {}", reason);
        }
    }

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, options: HarvestOptions) -> anyhow::Result<()> {
    if options.fresh {
        tracing::info!("Starting fresh harvest (ignoring checkpoint)");
    } else {
        tracing::info!("Starting harvest (will resume from checkpoint if present)");
    }

    let stats = run_harvest(config, options).await.context("harvest failed")?;

    if stats.interrupted {
        tracing::warn!("Harvest interrupted; rerun to resume from the checkpoint");
    } else {
        tracing::info!("Harvest completed successfully");
    }

    println!();
    print_statistics(&stats);

    Ok(())
}
