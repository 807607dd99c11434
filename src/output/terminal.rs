// Colored terminal output for article lists and hottest-topic reports.
//
// This module handles all terminal-specific formatting. The main.rs
// command handlers delegate here.

use colored::Colorize;

use crate::articles::ArticleBatch;
use crate::pipeline::hottest::{DominantTopic, HottestTopic, NoTrendReason, TopicReport};
use crate::sentiment::labels::StarRating;

const SUMMARY_PREVIEW_CHARS: usize = 280;

/// Shown when no dominant topic exists.
pub const NO_TREND_MESSAGE: &str =
    "No distinct hottest topic found. Please try with more websites or different URLs.";

/// List every collected article.
pub fn display_articles(batch: &ArticleBatch) {
    if batch.is_empty() {
        println!("No articles collected. Check your network connection or NEWSBUZZ_SOURCES.");
        return;
    }

    println!(
        "\n{}",
        format!("=== News in Ghana for Today ({} articles) ===", batch.len()).bold()
    );

    for record in batch {
        println!();
        println!("  {} {}", "Title:".dimmed(), record.title.bold());
        println!("  {} {}", "Link:".dimmed(), record.link);
        if record.summary.is_empty() {
            println!("  {} {}", "Summary:".dimmed(), "No summary available.".dimmed());
        } else {
            println!(
                "  {} {}",
                "Summary:".dimmed(),
                super::truncate_chars(&record.summary, SUMMARY_PREVIEW_CHARS)
            );
        }
    }
    println!();
}

/// Show the outcome of one engine run.
pub fn display_report(report: &TopicReport) {
    println!(
        "  {}",
        format!(
            "{} articles, {} topic clusters, {} unclustered, {} terms",
            report.assignments.len(),
            report.cluster_count(),
            report.noise_count(),
            report.vocabulary_size,
        )
        .dimmed()
    );

    match &report.hottest {
        HottestTopic::Found(topic) => display_hottest(topic),
        HottestTopic::Absent { reason } => display_no_trend(*reason),
    }
}

fn display_hottest(topic: &DominantTopic) {
    println!("\n{}", "Hottest Topic Found!".green().bold());
    println!(
        "  {} ({} articles, mean sentiment {:.1}/5)",
        topic.label.to_string().bold(),
        topic.members.len(),
        topic.mean_stars(),
    );

    for member in &topic.members {
        println!();
        println!("  {} {}", "Title:".dimmed(), member.article.title.bold());
        println!("  {} {}", "Link:".dimmed(), member.article.link);
        println!(
            "  {} {}",
            "Summary:".dimmed(),
            super::truncate_chars(&member.article.summary, SUMMARY_PREVIEW_CHARS)
        );
        println!(
            "  {} {} {}",
            "Sentiment:".dimmed(),
            member.stars.glyphs(),
            colorize_stars(member.stars),
        );
    }
    println!();
}

pub fn display_no_trend(reason: NoTrendReason) {
    println!("\n{}", NO_TREND_MESSAGE.yellow());
    println!("  {}", format!("({})", reason.describe()).dimmed());
}

fn colorize_stars(stars: StarRating) -> colored::ColoredString {
    let text = stars.to_string();
    match stars.value() {
        1 | 2 => text.red(),
        3 => text.yellow(),
        _ => text.green(),
    }
}
