// Yen Ghana adapter.
//
// Index: `article.c-article-card` cards; the headline is the link's `span`.
// Article: justified body paragraphs, read from the article page itself.

use scraper::{Html, Selector};

use super::{element_text, joined_paragraphs, resolve_link, SiteAdapter};

pub const INDEX_URL: &str = "https://yen.com.gh/ghana/";

pub struct YenGhana;

impl SiteAdapter for YenGhana {
    fn name(&self) -> &'static str {
        "yen"
    }

    fn index_url(&self) -> &'static str {
        INDEX_URL
    }

    fn parse_index(&self, html: &str) -> Vec<(String, String)> {
        let document = Html::parse_document(html);
        let card_selector = Selector::parse("article.c-article-card").unwrap();
        let link_selector = Selector::parse("a[href]").unwrap();
        let span_selector = Selector::parse("span").unwrap();

        document
            .select(&card_selector)
            .filter_map(|card| {
                let anchor = card.select(&link_selector).next()?;
                let title = element_text(&anchor.select(&span_selector).next()?);
                let link = resolve_link(INDEX_URL, anchor.value().attr("href")?)?;
                (!title.is_empty()).then_some((title, link))
            })
            .collect()
    }

    fn parse_summary(&self, html: &str) -> String {
        joined_paragraphs(html, "p.align-justify")
    }
}
