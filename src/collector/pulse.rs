// Pulse Ghana adapter.
//
// Index: any absolute link carrying a `title` attribute is a headline.
// Article: the lead block `div#lead.article-perex`; many pages have none.

use scraper::{Html, Selector};

use super::{joined_paragraphs, SiteAdapter};

pub const INDEX_URL: &str = "https://www.pulse.com.gh/";

pub struct PulseGhana;

impl SiteAdapter for PulseGhana {
    fn name(&self) -> &'static str {
        "pulse"
    }

    fn index_url(&self) -> &'static str {
        INDEX_URL
    }

    fn parse_index(&self, html: &str) -> Vec<(String, String)> {
        let document = Html::parse_document(html);
        let link_selector = Selector::parse(r#"a[href^="http"][title]"#).unwrap();

        document
            .select(&link_selector)
            .filter_map(|anchor| {
                let title = anchor.value().attr("title")?.trim();
                let link = anchor.value().attr("href")?.trim();
                (!title.is_empty()).then(|| (title.to_string(), link.to_string()))
            })
            .collect()
    }

    fn parse_summary(&self, html: &str) -> String {
        joined_paragraphs(html, "div#lead.article-perex p")
    }
}
