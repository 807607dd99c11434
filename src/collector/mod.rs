// News collection — one adapter per site, merged into a single batch.
//
// Each adapter knows two pages: the site's index, which yields
// (title, link) pairs, and an article page, which yields the summary
// paragraphs. The shared `collect` flow fetches the index, then every
// article page with bounded concurrency, keeping index order.
//
// Collection never fails the whole batch: a source whose index cannot be
// fetched is skipped, and an article page that fails keeps an empty summary.

pub mod client;
pub mod gbc;
pub mod myjoyonline;
pub mod pulse;
pub mod yen;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};
use url::Url;

use crate::articles::{ArticleBatch, ArticleRecord};
pub use client::NewsClient;

/// Article pages fetched concurrently per source.
const ARTICLE_CONCURRENCY: usize = 6;

/// Source names accepted in configuration, in default order.
pub const KNOWN_SOURCES: [&str; 4] = ["myjoyonline", "pulse", "yen", "gbc"];

#[async_trait]
pub trait SiteAdapter: Send + Sync {
    /// Short name used in configuration and logs.
    fn name(&self) -> &'static str;

    fn index_url(&self) -> &'static str;

    /// Extract (title, absolute link) pairs from the index page, in page order.
    fn parse_index(&self, html: &str) -> Vec<(String, String)>;

    /// Extract the summary text from an article page. Empty when the page
    /// has no summary markup.
    fn parse_summary(&self, html: &str) -> String;

    /// Fetch the index and up to `max_articles` article pages.
    async fn collect(&self, client: &NewsClient, max_articles: usize) -> Result<Vec<ArticleRecord>> {
        let html = client
            .get_html(self.index_url())
            .await
            .with_context(|| format!("Failed to fetch {} index", self.name()))?;

        let mut entries = self.parse_index(&html);
        entries.truncate(max_articles);

        let records: Vec<ArticleRecord> = stream::iter(entries.into_iter().map(
            |(title, link)| async move {
                let summary = match client.get_html(&link).await {
                    Ok(page) => self.parse_summary(&page),
                    Err(e) => {
                        warn!(source = self.name(), link = %link, error = %e, "Article fetch failed");
                        String::new()
                    }
                };
                ArticleRecord {
                    title,
                    link,
                    summary,
                }
            },
        ))
        .buffered(ARTICLE_CONCURRENCY)
        .collect()
        .await;

        Ok(records)
    }
}

/// Look up an adapter by its configuration name.
pub fn adapter_for(name: &str) -> Option<Box<dyn SiteAdapter>> {
    match name {
        "myjoyonline" => Some(Box::new(myjoyonline::MyJoyOnline)),
        "pulse" => Some(Box::new(pulse::PulseGhana)),
        "yen" => Some(Box::new(yen::YenGhana)),
        "gbc" => Some(Box::new(gbc::GbcGhana)),
        _ => None,
    }
}

/// Build adapters for the configured source names, keeping their order.
pub fn adapters_for(names: &[String]) -> Result<Vec<Box<dyn SiteAdapter>>> {
    names
        .iter()
        .map(|name| {
            adapter_for(name).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown news source '{name}'. Known sources: {}",
                    KNOWN_SOURCES.join(", ")
                )
            })
        })
        .collect()
}

/// Merge per-source records in order. A title seen again replaces the
/// earlier record but keeps its position.
pub fn merge_sources<I>(per_source: I) -> ArticleBatch
where
    I: IntoIterator<Item = (&'static str, Vec<ArticleRecord>)>,
{
    let mut batch = ArticleBatch::default();
    for (source, records) in per_source {
        let count = records.len();
        let replaced = records
            .into_iter()
            .filter_map(|record| batch.insert(record))
            .count();
        info!(source = source, articles = count, replaced = replaced, "Merged source");
    }
    batch
}

/// Collect every source in order and merge the results.
pub async fn collect_all(
    adapters: &[Box<dyn SiteAdapter>],
    client: &NewsClient,
    max_per_source: usize,
) -> ArticleBatch {
    let pb = ProgressBar::new(adapters.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Sources [{bar:30}] {pos}/{len} {msg}")
            .unwrap(),
    );

    let mut per_source = Vec::with_capacity(adapters.len());
    for adapter in adapters {
        pb.set_message(adapter.name());
        match adapter.collect(client, max_per_source).await {
            Ok(records) => per_source.push((adapter.name(), records)),
            Err(e) => {
                warn!(source = adapter.name(), error = %format_args!("{e:#}"), "Skipping source");
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let batch = merge_sources(per_source);
    info!(articles = batch.len(), "Collection finished");
    batch
}

// ---------------------------------------------------------------------------
// Markup helpers shared by the adapters
// ---------------------------------------------------------------------------

/// Trimmed text of every element matching `css`, joined with single spaces.
/// Elements with no text are skipped.
pub(crate) fn joined_paragraphs(html: &str, css: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(css) else {
        return String::new();
    };
    document
        .select(&selector)
        .map(|p| element_text(&p))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolve `href` against the page it came from.
pub(crate) fn resolve_link(base: &str, href: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    base.join(href.trim()).ok().map(|u| u.to_string())
}
