//! # Keyword Distance
//!
//! Collects news articles for a list of keywords and measures how semantically
//! close the keywords are, based on the text of those articles.
//!
//! ## Usage
//!
//! ```sh
//! keyword_distance --collect -k keywords.txt -s stopwords.txt -o ./out
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Searching**: page through a news search listing per keyword
//! 2. **Fetching**: download each article, normalize its text, append it to a CSV store
//! 3. **Aggregating**: join every stored article of a keyword into one document
//! 4. **Vectorizing**: TF-IDF over the keyword documents
//! 5. **Output**: pairwise cosine distances written as a labelled matrix
//!
//! Everything runs sequentially on a single thread; network calls are the
//! only waits.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod collect;
mod config;
mod corpus;
mod distance;
mod error;
mod inputs;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;
mod vectorize;

use cli::Cli;
use collect::CollectionReport;
use config::SourcesConfig;
use outputs::{MatrixFormat, json, matrix};
use pipeline::{CollectionSettings, collect_until_shutdown, distances_from_stores};
use scrapers::HttpClient;
use utils::{ensure_writable_dir, run_stamp};

/// Log what one collection phase produced.
fn log_collection_report(report: &CollectionReport, store_path: &str) {
    let empty = report
        .keywords
        .iter()
        .filter(|k| k.has_no_usable_articles())
        .map(|k| k.keyword.as_str())
        .collect::<Vec<_>>();
    if !empty.is_empty() {
        warn!(keywords = %empty.join(", "), "Keywords without usable articles");
    }
    info!(
        records = report.records_written(),
        store = %store_path,
        "Articles downloaded and saved"
    );
}

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("keyword_distance starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Fail before any network traffic if the output can't be written.
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let keywords = inputs::load_keywords(&args.keywords).inspect_err(|e| {
        error!(error = %e, "Cannot continue without keywords");
    })?;
    let sources = SourcesConfig::load(args.config.as_deref())?;

    // ---- Collection ----
    let mut phases = Vec::new();
    if args.collect {
        phases.push(CollectionSettings {
            source: &sources.primary,
            store_path: &args.primary_store,
            max_results: args.max_results,
            fresh: args.fresh,
        });
    }
    if args.collect_secondary {
        phases.push(CollectionSettings {
            source: &sources.secondary,
            store_path: &args.secondary_store,
            max_results: args.max_results,
            fresh: args.fresh,
        });
    }
    if !phases.is_empty() {
        let client = HttpClient::new()?;
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Cannot listen for Ctrl-C; collection can't be interrupted");
                std::future::pending::<()>().await;
            }
        };
        let run = collect_until_shutdown(&client, &keywords, &phases, shutdown).await?;
        for (report, settings) in run.reports.iter().zip(&phases) {
            log_collection_report(report, settings.store_path);
        }
        if run.interrupted {
            info!(
                completed = run.reports.len(),
                planned = phases.len(),
                "Collection stopped early"
            );
        }
    }

    // ---- Distances ----
    info!("Processing saved data");
    let stopwords = inputs::load_stopwords(&args.stopwords).inspect_err(|e| {
        error!(error = %e, "Cannot continue without stopwords");
    })?;
    let secondary = args.use_secondary.then_some(args.secondary_store.as_str());
    let distances = distances_from_stores(&keywords, &args.primary_store, secondary, stopwords)
        .inspect_err(|e| {
            error!(
                error = %e,
                store = %args.primary_store,
                "Could not compute distances; rerun with --collect if the store does not exist yet"
            );
        })?;

    // ---- Output ----
    let output_path = format!(
        "{}/distances_{}.{}",
        args.output_dir.trim_end_matches('/'),
        run_stamp(chrono::Local::now()),
        args.format.extension()
    );
    match args.format {
        MatrixFormat::Csv => matrix::save_matrix_csv(&distances, &output_path)?,
        MatrixFormat::Json => json::write_matrix_json(&distances, &output_path).await?,
    }
    info!(path = %output_path, "Results saved");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
