use crate::classifier::{ModelArtifact, TrainingOptions};
use crate::config::Config;
use crate::errors::AppError;
use crate::notion::{NotionClient, RemoteStore, UpdatePolicy, UpsertOutcome};
use crate::request::RequestClient;
use crate::scraper::{DocumentSource, ListingCollector, ScraperError};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use url::Url;

mod classifier;
mod config;
mod domain;
mod errors;
mod notion;
mod request;
mod scraper;
mod spreadsheets;

#[cfg(test)]
mod tests;

#[derive(Parser)]
#[command(name = "listing-sync", about = "Sync property listings into a Notion database")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the latest listings and add or update them in the database
    GetListings {
        /// Saved search-results HTML to use instead of fetching the query page
        #[arg(long)]
        document: Option<PathBuf>,
        /// Maximum number of listings to analyze
        #[arg(short = 'n', long, default_value_t = 10)]
        max_listings: usize,
        /// When an existing listing page gets rewritten
        #[arg(long, value_enum, default_value_t = UpdatePolicy::AnyChange)]
        update_policy: UpdatePolicy,
        /// Also write the collected listings to this .xlsx file
        #[arg(long)]
        export: Option<PathBuf>,
        /// Print the collected listings instead of writing them to the database
        #[arg(long)]
        dry_run: bool,
        /// Skip the random wait before each listing request
        #[arg(long)]
        no_delay: bool,
    },
    /// Train the like/dislike classifier on the database contents
    TrainClassifier {
        /// Where to write the trained model
        #[arg(long, default_value = "model.json")]
        output: PathBuf,
        /// Share of listings held out for evaluation
        #[arg(long, default_value_t = 0.25)]
        test_fraction: f64,
        /// Shuffle seed for the train/test split
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Predict every listing in the database and write the predictions back
    ClassifyListings {
        /// Model written by train-classifier
        #[arg(long, default_value = "model.json")]
        model_path: PathBuf,
        /// Also write the address -> prediction map to this JSON file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!(error = %e, "Run aborted");
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut cfg = Config::from_env()?;

    match cli.command {
        Commands::GetListings {
            document,
            max_listings,
            update_policy,
            export,
            dry_run,
            no_delay,
        } => {
            if no_delay {
                cfg.delay_secs = 0..=0;
            }
            get_listings(&cfg, document, max_listings, update_policy, export, dry_run)
        }
        Commands::TrainClassifier {
            output,
            test_fraction,
            seed,
        } => train(&cfg, &output, TrainingOptions { test_fraction, seed }),
        Commands::ClassifyListings { model_path, output } => {
            classify_listings(&cfg, &model_path, output)
        }
    }
}

fn connect_store(cfg: &Config) -> Result<RemoteStore<NotionClient>, AppError> {
    let store = RemoteStore::new(NotionClient::new(cfg)?, cfg.notion_database_id.clone());
    store.verify()?;
    Ok(store)
}

fn get_listings(
    cfg: &Config,
    document: Option<PathBuf>,
    max_listings: usize,
    policy: UpdatePolicy,
    export: Option<PathBuf>,
    dry_run: bool,
) -> Result<(), AppError> {
    let store = if dry_run {
        None
    } else {
        Some(connect_store(cfg)?.with_policy(policy))
    };

    let base_url = Url::parse(&cfg.listing_base_url)
        .map_err(|e| AppError::Config(format!("LISTING_BASE_URL is not a URL: {e}")))?;
    let http = RequestClient::new(cfg.request_timeout, cfg.delay_secs.clone())
        .map_err(ScraperError::from)?;
    let collector = ListingCollector::new(http, base_url)?;

    let query = match document {
        Some(path) => DocumentSource::Local(path),
        None => DocumentSource::Remote(cfg.query_url()),
    };
    let report = collector.collect(&query, max_listings)?;

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(record) => println!("✅ {} (${:.0})", record.address, record.list_price),
            Err(e) => println!("⚠️  skipped {}: {}", outcome.link, e),
        }
    }

    if let Some(path) = export {
        let records: Vec<_> = report.records().cloned().collect();
        spreadsheets::export_listings_xlsx(&records, &path)?;
        info!(path = %path.display(), count = records.len(), "Exported listings");
    }

    let records = report.into_records();

    let Some(store) = store else {
        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| AppError::Io(format!("Failed to serialize listings: {e}")))?;
        println!("{json}");
        return Ok(());
    };

    let (mut created, mut updated, mut unchanged, mut failed) = (0, 0, 0, 0);
    for record in &records {
        match store.upsert(record) {
            Ok(UpsertOutcome::Created { .. }) => created += 1,
            Ok(UpsertOutcome::Updated { .. }) => updated += 1,
            Ok(UpsertOutcome::Unchanged { .. }) => unchanged += 1,
            Err(e) => {
                failed += 1;
                error!(address = %record.address, error = %e, "Failed to sync listing");
                println!("⚠️  not synced {}: {}", record.address, e);
            }
        }
    }

    println!(
        "Synced {} listings: {created} created, {updated} updated, {unchanged} unchanged, {failed} failed",
        records.len()
    );
    Ok(())
}

fn train(cfg: &Config, output: &Path, options: TrainingOptions) -> Result<(), AppError> {
    let store = connect_store(cfg)?;
    let listings = store.list_listings()?;
    let samples = classifier::build_samples(&listings);
    info!(listings = listings.len(), samples = samples.len(), "Loaded training data");

    let (artifact, report) = classifier::train_classifier(&samples, options)?;
    println!("{report}");

    artifact.save(output)?;
    info!(path = %output.display(), "Saved model");
    Ok(())
}

fn classify_listings(
    cfg: &Config,
    model_path: &Path,
    output: Option<PathBuf>,
) -> Result<(), AppError> {
    let artifact = ModelArtifact::load(model_path)?;
    let store = connect_store(cfg)?;

    let listings = store.list_listings()?;
    let predictions = classifier::classify(&artifact, &listings)?;
    let changed = classifier::changed_predictions(&listings, &predictions);
    info!(count = predictions.len(), changed, "Classified listings");

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&predictions)
            .map_err(|e| AppError::Io(format!("Failed to serialize predictions: {e}")))?;
        std::fs::write(&path, json)?;
        info!(path = %path.display(), "Wrote predictions");
    }

    let summary = classifier::push_classifications(&store, &predictions);
    for (address, e) in &summary.failed {
        println!("⚠️  prediction not written for {address}: {e}");
    }
    println!(
        "Predicted {} listings ({changed} changed): {} written, {} without a page, {} failed",
        predictions.len(),
        summary.updated,
        summary.missing.len(),
        summary.failed.len()
    );
    Ok(())
}
