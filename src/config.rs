use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::collector::KNOWN_SOURCES;
use crate::pipeline::hottest::EngineParams;
use crate::sentiment::download;
use crate::topics::cluster::DbscanParams;
use crate::topics::tfidf::TfIdfVectorizer;

/// Central configuration loaded from environment variables.
///
/// Every value has a default. The .env file is loaded automatically at
/// startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Vocabulary, clustering and truncation settings for the engine
    pub engine: EngineParams,
    /// Directory containing the ONNX sentiment model files
    pub model_dir: PathBuf,
    /// Site adapters to collect from, in merge order
    pub sources: Vec<String>,
    /// Cap on article pages fetched per source
    pub max_articles_per_source: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let defaults = EngineParams::default();

        let engine = EngineParams {
            vectorizer: TfIdfVectorizer {
                min_df: parse_var("NEWSBUZZ_MIN_DF", defaults.vectorizer.min_df)?,
                max_df: parse_var("NEWSBUZZ_MAX_DF", defaults.vectorizer.max_df)?,
            },
            clustering: DbscanParams {
                eps: parse_var("NEWSBUZZ_EPS", defaults.clustering.eps)?,
                min_samples: parse_var(
                    "NEWSBUZZ_MIN_CLUSTER_SIZE",
                    defaults.clustering.min_samples,
                )?,
            },
            sentiment_max_chars: parse_var(
                "NEWSBUZZ_TRUNCATE_CHARS",
                defaults.sentiment_max_chars,
            )?,
        };

        let model_dir = env::var("NEWSBUZZ_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| download::default_model_dir());

        let sources = match env::var("NEWSBUZZ_SOURCES") {
            Ok(raw) => parse_sources(&raw)?,
            Err(_) => KNOWN_SOURCES.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            engine,
            model_dir,
            sources,
            max_articles_per_source: parse_var("NEWSBUZZ_MAX_ARTICLES_PER_SOURCE", 30)?,
        })
    }

    /// Check that the sentiment model has been downloaded.
    /// Call this before any operation that may need sentiment scoring.
    pub fn require_model(&self) -> Result<()> {
        if !download::model_files_present(&self.model_dir) {
            anyhow::bail!(
                "Sentiment model files not found in {}\n\
                 Run `newsbuzz download-model` to download them.",
                self.model_dir.display()
            );
        }
        Ok(())
    }
}

/// Read and parse an optional variable, falling back to `default` when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("{name} has an invalid value: {raw:?}"))
}

/// Split a comma-separated source list, rejecting unknown names.
fn parse_sources(raw: &str) -> Result<Vec<String>> {
    let sources: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    if let Some(unknown) = sources.iter().find(|s| !KNOWN_SOURCES.contains(&s.as_str())) {
        anyhow::bail!(
            "NEWSBUZZ_SOURCES contains unknown source '{unknown}'. Known sources: {}",
            KNOWN_SOURCES.join(", ")
        );
    }
    if sources.is_empty() {
        anyhow::bail!("NEWSBUZZ_SOURCES is set but names no sources");
    }
    Ok(sources)
}
