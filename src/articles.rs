// Article records and the per-run batch the engine consumes.
//
// A batch behaves like an insertion-ordered map keyed by title. Inserting a
// title that already exists replaces the record but keeps its original
// position, so re-scraping a headline from a second source does not move it.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One scraped article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub link: String,
    /// Lead text of the article; empty when the page had none.
    #[serde(default)]
    pub summary: String,
}

impl ArticleRecord {
    pub fn new(title: impl Into<String>, link: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            summary: summary.into(),
        }
    }
}

/// The full set of articles for one run, unique by title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleBatch {
    records: Vec<ArticleRecord>,
    index: HashMap<String, usize>,
}

impl ArticleBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. Returns the record it replaced, if the title was
    /// already present.
    pub fn insert(&mut self, record: ArticleRecord) -> Option<ArticleRecord> {
        match self.index.get(&record.title) {
            Some(&pos) => Some(std::mem::replace(&mut self.records[pos], record)),
            None => {
                self.index.insert(record.title.clone(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    /// Merge another batch into this one; its records win on title clashes.
    pub fn extend(&mut self, other: ArticleBatch) -> usize {
        let mut replaced = 0;
        for record in other.records {
            if self.insert(record).is_some() {
                replaced += 1;
            }
        }
        replaced
    }

    pub fn get(&self, title: &str) -> Option<&ArticleRecord> {
        self.index.get(title).map(|&pos| &self.records[pos])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArticleRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    /// Summaries in batch order, the vectorizer's input.
    pub fn summaries(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.summary.as_str()).collect()
    }
}

impl FromIterator<ArticleRecord> for ArticleBatch {
    fn from_iter<I: IntoIterator<Item = ArticleRecord>>(iter: I) -> Self {
        let mut batch = ArticleBatch::new();
        for record in iter {
            batch.insert(record);
        }
        batch
    }
}

impl<'a> IntoIterator for &'a ArticleBatch {
    type Item = &'a ArticleRecord;
    type IntoIter = std::slice::Iter<'a, ArticleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// --- JSON form: {"<title>": {"link": "...", "summary": "..."}, ...} ---

#[derive(Serialize, Deserialize)]
struct RecordBody {
    link: String,
    #[serde(default)]
    summary: Option<String>,
}

impl Serialize for ArticleBatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(
                &record.title,
                &RecordBody {
                    link: record.link.clone(),
                    summary: Some(record.summary.clone()),
                },
            )?;
        }
        map.end()
    }
}

struct BatchVisitor;

impl<'de> Visitor<'de> for BatchVisitor {
    type Value = ArticleBatch;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of article title to {link, summary}")
    }

    // Entries are visited in document order, which becomes batch order.
    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut batch = ArticleBatch::new();
        while let Some((title, body)) = access.next_entry::<String, RecordBody>()? {
            batch.insert(ArticleRecord {
                title,
                link: body.link,
                summary: body.summary.unwrap_or_default(),
            });
        }
        Ok(batch)
    }
}

impl<'de> Deserialize<'de> for ArticleBatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(BatchVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_title_keeps_position_and_last_value() {
        let mut batch = ArticleBatch::new();
        batch.insert(ArticleRecord::new("a", "https://one/a", "first"));
        batch.insert(ArticleRecord::new("b", "https://one/b", ""));
        let replaced = batch.insert(ArticleRecord::new("a", "https://two/a", "second"));

        assert_eq!(replaced.unwrap().summary, "first");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.records()[0].title, "a");
        assert_eq!(batch.records()[0].link, "https://two/a");
        assert_eq!(batch.get("a").unwrap().summary, "second");
    }

    #[test]
    fn test_json_preserves_document_order() {
        let json = r#"{
            "zeta": {"link": "https://x/z", "summary": "last letter"},
            "alpha": {"link": "https://x/a"},
            "mid": {"link": "https://x/m", "summary": null}
        }"#;
        let batch: ArticleBatch = serde_json::from_str(json).unwrap();
        let titles: Vec<&str> = batch.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["zeta", "alpha", "mid"]);
        assert_eq!(batch.get("alpha").unwrap().summary, "");
        assert_eq!(batch.get("mid").unwrap().summary, "");
    }

    #[test]
    fn test_json_roundtrip_keeps_order() {
        let batch: ArticleBatch = vec![
            ArticleRecord::new("second", "l2", "s2"),
            ArticleRecord::new("first", "l1", "s1"),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&batch).unwrap();
        assert!(json.find("second").unwrap() < json.find("first").unwrap());
        let back: ArticleBatch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, batch);
    }

    #[test]
    fn test_extend_counts_replacements() {
        let mut a: ArticleBatch = vec![ArticleRecord::new("t", "l", "old")].into_iter().collect();
        let b: ArticleBatch = vec![
            ArticleRecord::new("t", "l", "new"),
            ArticleRecord::new("u", "l", ""),
        ]
        .into_iter()
        .collect();
        assert_eq!(a.extend(b), 1);
        assert_eq!(a.len(), 2);
        assert_eq!(a.get("t").unwrap().summary, "new");
    }
}
