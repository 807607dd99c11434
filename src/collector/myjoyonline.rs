// MyJoyOnline adapter.
//
// Index: each `div.home-post-list-title` holds a link whose `h4` is the
// headline. Article: lead paragraphs live in `div#article-text`.

use scraper::{Html, Selector};

use super::{element_text, joined_paragraphs, resolve_link, SiteAdapter};

pub const INDEX_URL: &str = "https://www.myjoyonline.com/";

pub struct MyJoyOnline;

impl SiteAdapter for MyJoyOnline {
    fn name(&self) -> &'static str {
        "myjoyonline"
    }

    fn index_url(&self) -> &'static str {
        INDEX_URL
    }

    fn parse_index(&self, html: &str) -> Vec<(String, String)> {
        let document = Html::parse_document(html);
        let item_selector = Selector::parse("div.home-post-list-title").unwrap();
        let link_selector = Selector::parse("a[href]").unwrap();
        let heading_selector = Selector::parse("h4").unwrap();

        document
            .select(&item_selector)
            .filter_map(|item| {
                let anchor = item.select(&link_selector).next()?;
                let title = element_text(&anchor.select(&heading_selector).next()?);
                let link = resolve_link(INDEX_URL, anchor.value().attr("href")?)?;
                (!title.is_empty()).then_some((title, link))
            })
            .collect()
    }

    fn parse_summary(&self, html: &str) -> String {
        joined_paragraphs(html, "div#article-text.article-text p")
    }
}
