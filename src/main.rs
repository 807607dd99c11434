use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use newsbuzz::articles::ArticleBatch;
use newsbuzz::collector::{self, NewsClient};
use newsbuzz::config::Config;
use newsbuzz::error::{EngineError, EngineResult};
use newsbuzz::output::{json, terminal};
use newsbuzz::pipeline::{find_hottest_topic, ReportCache, TopicReport};
use newsbuzz::sentiment::lazy::LazyClassifier;

/// NewsBuzz: the hottest news topic in Ghana today.
///
/// Collects headlines and summaries from Ghanaian news sites, groups them
/// into topics, and reports the biggest topic with a star-rated sentiment
/// for each of its articles.
#[derive(Parser)]
#[command(name = "newsbuzz", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect today's articles and list them
    Fetch {
        /// Print the batch as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Find the hottest topic and rate its sentiment
    Hottest {
        /// Read the article batch from a JSON file instead of collecting
        #[arg(long)]
        input: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-collect on an interval and report when the hottest topic changes
    Watch {
        /// Minutes between rounds (default: 30)
        #[arg(long, default_value = "30")]
        interval_minutes: u64,

        /// Stop after this many rounds (default: run until interrupted)
        #[arg(long)]
        rounds: Option<u32>,

        /// Drop the sentiment model from memory between rounds
        #[arg(long)]
        release_model: bool,
    },

    /// Download the ONNX sentiment model (~170 MB)
    DownloadModel,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("newsbuzz=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { json } => {
            let config = Config::load()?;
            let batch = collect(&config).await?;

            if json {
                println!("{}", json::batch_to_json(&batch)?);
            } else {
                terminal::display_articles(&batch);
            }
        }

        Commands::Hottest { input, json } => {
            let config = Config::load()?;
            config.engine.validate()?;
            warn_if_model_missing(&config);

            let batch = match input {
                Some(path) => read_batch_file(&path)?,
                None => collect(&config).await?,
            };

            let classifier = Arc::new(LazyClassifier::onnx(config.model_dir.clone()));
            let params = config.engine.clone();
            let report = run_engine(move || {
                find_hottest_topic(&batch, &params, &*classifier).map(Arc::new)
            })
            .await?;

            if json {
                println!("{}", json::report_to_json(&report)?);
            } else {
                terminal::display_report(&report);
            }
        }

        Commands::Watch {
            interval_minutes,
            rounds,
            release_model,
        } => {
            let config = Config::load()?;
            config.engine.validate()?;
            warn_if_model_missing(&config);

            let mut classifier = Arc::new(LazyClassifier::onnx(config.model_dir.clone()));
            let cache = Arc::new(ReportCache::default());
            let interval = Duration::from_secs(interval_minutes.max(1) * 60);
            let mut last: Option<Arc<TopicReport>> = None;
            let mut round: u32 = 0;

            loop {
                round += 1;
                println!(
                    "\n{}",
                    format!(
                        "=== Round {round} ({}) ===",
                        chrono::Local::now().format("%Y-%m-%d %H:%M")
                    )
                    .bold()
                );

                let batch = collect(&config).await?;
                let params = config.engine.clone();
                let round_cache = Arc::clone(&cache);
                let round_classifier = Arc::clone(&classifier);
                let report = run_engine(move || {
                    round_cache.get_or_compute(&batch, &params, &*round_classifier)
                })
                .await?;

                match &last {
                    Some(previous) if Arc::ptr_eq(previous, &report) => {
                        println!("  {}", "No new articles since the last round.".dimmed());
                    }
                    _ => terminal::display_report(&report),
                }
                last = Some(report);

                let (hits, misses) = cache.stats();
                info!(round = round, cache_hits = hits, cache_misses = misses, "Round finished");

                if release_model {
                    if let Some(lazy) = Arc::get_mut(&mut classifier) {
                        lazy.release();
                    }
                }

                if rounds.is_some_and(|limit| round >= limit) {
                    break;
                }
                tokio::time::sleep(interval).await;
            }
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            let model_dir = &config.model_dir;

            println!("Downloading ONNX sentiment model...");
            println!("  Destination: {}", model_dir.display());

            newsbuzz::sentiment::download::download_model(model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `newsbuzz hottest`.");
        }
    }

    Ok(())
}

/// Run every configured site adapter and merge the results.
async fn collect(config: &Config) -> Result<ArticleBatch> {
    let adapters = collector::adapters_for(&config.sources)?;
    let client = NewsClient::new()?;

    eprintln!("Collecting articles from {}...", config.sources.join(", "));
    let batch = collector::collect_all(&adapters, &client, config.max_articles_per_source).await;
    Ok(batch)
}

fn read_batch_file(path: &Path) -> Result<ArticleBatch> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let batch = json::batch_from_json(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    info!(path = %path.display(), articles = batch.len(), "Loaded article batch");
    Ok(batch)
}

/// The model is loaded only when a dominant topic exists, so a missing
/// model is a warning here and an error later if it is actually needed.
fn warn_if_model_missing(config: &Config) {
    if let Err(e) = config.require_model() {
        warn!(model_dir = %config.model_dir.display(), "Sentiment model not downloaded");
        eprintln!("{}", format!("Note: {e}").dimmed());
    }
}

/// Run the CPU-bound engine off the async runtime.
async fn run_engine<F>(job: F) -> Result<Arc<TopicReport>>
where
    F: FnOnce() -> EngineResult<Arc<TopicReport>> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(job)
        .await
        .context("Engine task failed")?;
    result.map_err(explain_engine_error)
}

/// Classifier failures get their own message so they are never mistaken
/// for a day without a trend.
fn explain_engine_error(e: EngineError) -> anyhow::Error {
    let context = if e.is_dependency_failure() {
        "Sentiment analysis is unavailable. If the model is missing, run `newsbuzz download-model`."
    } else if matches!(e, EngineError::ClassifierContractViolation { .. }) {
        "Sentiment model returned an unexpected label"
    } else {
        "Invalid NEWSBUZZ_* configuration"
    };
    anyhow::Error::new(e).context(context)
}
