// JSON rendering of batches and reports, and reading batch files back.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::articles::ArticleBatch;
use crate::pipeline::hottest::TopicReport;

#[derive(Serialize)]
struct BatchEnvelope<'a> {
    generated_at: DateTime<Utc>,
    articles: &'a ArticleBatch,
}

#[derive(Serialize)]
struct ReportEnvelope<'a> {
    generated_at: DateTime<Utc>,
    report: &'a TopicReport,
    /// Mean star rating of the hottest topic, when there is one.
    mean_stars: Option<f64>,
}

/// Accepted batch file shapes: the `fetch --json` envelope, or a bare
/// `title -> {link, summary}` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum BatchFile {
    Envelope { articles: ArticleBatch },
    Bare(ArticleBatch),
}

pub fn batch_to_json(batch: &ArticleBatch) -> Result<String> {
    let envelope = BatchEnvelope {
        generated_at: Utc::now(),
        articles: batch,
    };
    serde_json::to_string_pretty(&envelope).context("Failed to serialize articles")
}

pub fn report_to_json(report: &TopicReport) -> Result<String> {
    let envelope = ReportEnvelope {
        generated_at: Utc::now(),
        report,
        mean_stars: report.hottest.dominant().map(|t| t.mean_stars()),
    };
    serde_json::to_string_pretty(&envelope).context("Failed to serialize report")
}

/// Parse a batch file, keeping the document order of its titles.
pub fn batch_from_json(text: &str) -> Result<ArticleBatch> {
    let file: BatchFile = serde_json::from_str(text).context("Invalid article batch JSON")?;
    Ok(match file {
        BatchFile::Envelope { articles } => articles,
        BatchFile::Bare(batch) => batch,
    })
}
