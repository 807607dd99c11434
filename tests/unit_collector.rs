// Unit tests for the site adapters' markup rules and source merging.
//
// Every test parses inline HTML fixtures; nothing touches the network.

use newsbuzz::articles::ArticleRecord;
use newsbuzz::collector::gbc::GbcGhana;
use newsbuzz::collector::myjoyonline::MyJoyOnline;
use newsbuzz::collector::pulse::PulseGhana;
use newsbuzz::collector::yen::YenGhana;
use newsbuzz::collector::{adapter_for, adapters_for, merge_sources, SiteAdapter, KNOWN_SOURCES};

fn pair(title: &str, link: &str) -> (String, String) {
    (title.to_string(), link.to_string())
}

// ============================================================
// MyJoyOnline
// ============================================================

#[test]
fn myjoyonline_index_reads_h4_headlines() {
    let html = r#"
        <div class="home-post-list-title">
          <a href="https://www.myjoyonline.com/parliament-approves-budget/"><h4>Parliament approves budget</h4></a>
        </div>
        <div class="home-post-list-title">
          <a href="/cedi-gains/"><h4>  Cedi gains against dollar </h4></a>
        </div>
        <div class="home-post-list-title"><a href="/no-heading/">Missing heading</a></div>
        <div class="other"><a href="/elsewhere/"><h4>Not a headline</h4></a></div>
    "#;

    assert_eq!(
        MyJoyOnline.parse_index(html),
        vec![
            pair(
                "Parliament approves budget",
                "https://www.myjoyonline.com/parliament-approves-budget/"
            ),
            pair("Cedi gains against dollar", "https://www.myjoyonline.com/cedi-gains/"),
        ]
    );
}

#[test]
fn myjoyonline_summary_joins_article_paragraphs() {
    let html = r#"
        <div id="article-text" class="mt-3 article-text">
          <p>  The budget passed on Tuesday. </p>
          <p>Debate lasted six hours.</p>
        </div>
        <div class="sidebar"><p>Advertisement</p></div>
    "#;
    assert_eq!(
        MyJoyOnline.parse_summary(html),
        "The budget passed on Tuesday. Debate lasted six hours."
    );
}

// ============================================================
// Pulse
// ============================================================

#[test]
fn pulse_index_takes_absolute_links_with_titles() {
    let html = r#"
        <a href="https://www.pulse.com.gh/news/flood" title="Flood hits Accra">Flood</a>
        <a href="/relative" title="Relative link">skip</a>
        <a href="https://www.pulse.com.gh/untitled">no title attribute</a>
        <a href="https://www.pulse.com.gh/blank" title="   ">blank title</a>
        <a href="http://pulse.com.gh/old" title="Plain http story">old</a>
    "#;

    assert_eq!(
        PulseGhana.parse_index(html),
        vec![
            pair("Flood hits Accra", "https://www.pulse.com.gh/news/flood"),
            pair("Plain http story", "http://pulse.com.gh/old"),
        ]
    );
}

#[test]
fn pulse_summary_missing_lead_is_empty() {
    let html = r#"<div class="article-body"><p>Body without a lead block.</p></div>"#;
    assert_eq!(PulseGhana.parse_summary(html), "");

    let html = r#"<div id="lead" class="article-perex"><p>Heavy rain flooded Kaneshie.</p></div>"#;
    assert_eq!(PulseGhana.parse_summary(html), "Heavy rain flooded Kaneshie.");
}

// ============================================================
// Yen
// ============================================================

#[test]
fn yen_index_reads_card_spans() {
    let html = r#"
        <article class="c-article-card">
          <a href="https://yen.com.gh/123-teachers-strike/"><span>Teachers begin strike</span></a>
        </article>
        <article class="c-article-card">
          <a href="/456-relative/"><span> Relative story </span></a>
        </article>
        <article class="c-article-card"><a href="/no-span/">No span</a></article>
    "#;

    assert_eq!(
        YenGhana.parse_index(html),
        vec![
            pair("Teachers begin strike", "https://yen.com.gh/123-teachers-strike/"),
            pair("Relative story", "https://yen.com.gh/456-relative/"),
        ]
    );
}

#[test]
fn yen_summary_reads_justified_paragraphs() {
    let html = r#"
        <p class="align-justify">Teachers walked out on Monday.</p>
        <p>Unrelated caption.</p>
        <p class="align-justify">Talks resume next week.</p>
    "#;
    assert_eq!(
        YenGhana.parse_summary(html),
        "Teachers walked out on Monday. Talks resume next week."
    );
}

// ============================================================
// GBC
// ============================================================

#[test]
fn gbc_index_trims_link_text() {
    let html = r#"
        <div class="elementor-post__text">
          <h3 class="elementor-post__title">
            <a href="https://www.gbcghanaonline.com/news/rain-forecast/">  Rain forecast for Volta  </a>
          </h3>
        </div>
        <div class="elementor-post__text"><a href="/news/empty/">   </a></div>
    "#;

    assert_eq!(
        GbcGhana.parse_index(html),
        vec![pair(
            "Rain forecast for Volta",
            "https://www.gbcghanaonline.com/news/rain-forecast/"
        )]
    );
}

#[test]
fn gbc_summary_counts_nested_paragraphs_once() {
    let html = r#"
        <div class="elementor-widget-container">
          <div class="elementor-widget-container"><p>Inner paragraph.</p></div>
          <p>Outer paragraph.</p>
        </div>
    "#;
    assert_eq!(GbcGhana.parse_summary(html), "Inner paragraph. Outer paragraph.");
}

// ============================================================
// Adapter registry and merging
// ============================================================

#[test]
fn every_known_source_has_an_adapter() {
    for name in KNOWN_SOURCES {
        let adapter = adapter_for(name).unwrap();
        assert_eq!(adapter.name(), name);
        assert!(adapter.index_url().starts_with("https://"));
    }
    assert!(adapter_for("bbc").is_none());
}

#[test]
fn adapters_keep_configured_order() {
    let names = vec!["gbc".to_string(), "pulse".to_string()];
    let adapters = adapters_for(&names).unwrap();
    let order: Vec<&str> = adapters.iter().map(|a| a.name()).collect();
    assert_eq!(order, vec!["gbc", "pulse"]);
}

#[test]
fn merge_keeps_first_position_and_last_record() {
    let batch = merge_sources(vec![
        (
            "myjoyonline",
            vec![
                ArticleRecord::new("Budget passed", "https://a.example/1", "first version"),
                ArticleRecord::new("Cedi gains", "https://a.example/2", ""),
            ],
        ),
        (
            "pulse",
            vec![
                ArticleRecord::new("Flood in Accra", "https://b.example/1", "rain"),
                ArticleRecord::new("Budget passed", "https://b.example/2", "second version"),
            ],
        ),
    ]);

    let titles: Vec<&str> = batch.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Budget passed", "Cedi gains", "Flood in Accra"]);

    let budget = batch.get("Budget passed").unwrap();
    assert_eq!(budget.link, "https://b.example/2");
    assert_eq!(budget.summary, "second version");
}

#[test]
fn merge_of_nothing_is_empty() {
    let none: Vec<(&'static str, Vec<ArticleRecord>)> = Vec::new();
    assert!(merge_sources(none).is_empty());
}
