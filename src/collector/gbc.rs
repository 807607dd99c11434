// GBC Ghana adapter (Elementor-built site).

use scraper::{Html, Selector};

use super::{element_text, joined_paragraphs, resolve_link, SiteAdapter};

pub const INDEX_URL: &str = "https://www.gbcghanaonline.com/";

pub struct GbcGhana;

impl SiteAdapter for GbcGhana {
    fn name(&self) -> &'static str {
        "gbc"
    }

    fn index_url(&self) -> &'static str {
        INDEX_URL
    }

    fn parse_index(&self, html: &str) -> Vec<(String, String)> {
        let document = Html::parse_document(html);
        let post_selector = Selector::parse("div.elementor-post__text").unwrap();
        let link_selector = Selector::parse("a[href]").unwrap();

        document
            .select(&post_selector)
            .filter_map(|post| {
                let anchor = post.select(&link_selector).next()?;
                let title = element_text(&anchor);
                let link = resolve_link(INDEX_URL, anchor.value().attr("href")?)?;
                (!title.is_empty()).then_some((title, link))
            })
            .collect()
    }

    // Widget containers nest, but each paragraph is matched once.
    fn parse_summary(&self, html: &str) -> String {
        joined_paragraphs(html, "div.elementor-widget-container p")
    }
}
