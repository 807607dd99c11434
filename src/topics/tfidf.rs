// TF-IDF vectorization of article summaries.
//
// Each summary is one document. Terms are lowercase word tokens of two or
// more characters with English stop words removed. The vocabulary keeps terms
// whose document count is at least `min_df` and whose document fraction is at
// most `max_df`, sorted alphabetically so column order is independent of the
// batch order.
//
// Weights: raw term count * smoothed idf, where
//   idf(t) = ln((1 + n) / (1 + df(t))) + 1
// and every row is scaled to unit L2 length. Rows with no vocabulary terms
// (including empty summaries) stay all-zero.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use stop_words::{get, LANGUAGE};
use tracing::debug;

use crate::error::{EngineError, EngineResult};

/// Word tokens of at least two characters; `\w` is Unicode-aware.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

static ENGLISH_STOP_WORDS: LazyLock<HashSet<String>> = LazyLock::new(|| {
    let words: Vec<String> = get(LANGUAGE::English);
    words.into_iter().map(|w| w.to_lowercase()).collect()
});

/// A sparse row: `(column, weight)` pairs in ascending column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn from_entries(mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|&(_, w)| w != 0.0);
        entries.sort_by_key(|&(col, _)| col);
        Self { entries }
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product by merging the two sorted entry lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ci, wi) = self.entries[i];
            let (cj, wj) = other.entries[j];
            match ci.cmp(&cj) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wi * wj;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
    }
}

/// Output of `fit_transform`: the learned vocabulary and one row per document.
#[derive(Debug, Clone, Default)]
pub struct TermMatrix {
    pub vocabulary: Vec<String>,
    pub rows: Vec<SparseVector>,
}

impl TermMatrix {
    /// Number of columns shared by every row.
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    /// True when no term survived pruning; every row is then the zero vector.
    pub fn is_collapsed(&self) -> bool {
        self.vocabulary.is_empty()
    }
}

/// Batch TF-IDF vectorizer with document-frequency pruning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TfIdfVectorizer {
    /// Terms in fewer documents than this are dropped.
    pub min_df: usize,
    /// Terms in more than this fraction of documents are dropped.
    pub max_df: f64,
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self {
            min_df: 2,
            max_df: 0.95,
        }
    }
}

impl TfIdfVectorizer {
    pub fn validate(&self) -> EngineResult<()> {
        if self.min_df < 1 {
            return Err(EngineError::InvalidParameter(format!(
                "min_df must be at least 1, got {}",
                self.min_df
            )));
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(EngineError::InvalidParameter(format!(
                "max_df must be in (0, 1], got {}",
                self.max_df
            )));
        }
        Ok(())
    }

    /// Learn the vocabulary from `documents` and weight each of them.
    ///
    /// Never fails on content: a batch too small or too uniform to keep any
    /// term yields a collapsed matrix of zero rows, one per document.
    pub fn fit_transform(&self, documents: &[&str]) -> EngineResult<TermMatrix> {
        self.validate()?;

        let n_docs = documents.len();
        let counts: Vec<HashMap<String, usize>> =
            documents.iter().map(|doc| term_counts(doc)).collect();

        // Document frequency per term, kept sorted for stable column order
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let max_doc_count = self.max_df * n_docs as f64;
        let vocabulary: Vec<String> = doc_freq
            .iter()
            .filter(|(_, &df)| df >= self.min_df && (df as f64) <= max_doc_count)
            .map(|(term, _)| term.to_string())
            .collect();

        if vocabulary.is_empty() {
            debug!(
                documents = n_docs,
                candidate_terms = doc_freq.len(),
                "No terms survived document-frequency pruning"
            );
            return Ok(TermMatrix {
                vocabulary,
                rows: vec![SparseVector::default(); n_docs],
            });
        }

        let columns: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|t| smoothed_idf(n_docs, doc_freq[t.as_str()]))
            .collect();

        let rows = counts
            .iter()
            .map(|doc| {
                let entries = doc
                    .iter()
                    .filter_map(|(term, &tf)| {
                        columns
                            .get(term.as_str())
                            .map(|&col| (col, tf as f64 * idf[col]))
                    })
                    .collect();
                let mut row = SparseVector::from_entries(entries);
                row.normalize();
                row
            })
            .collect();

        debug!(
            documents = n_docs,
            vocabulary = vocabulary.len(),
            "Fitted TF-IDF vocabulary"
        );

        Ok(TermMatrix { vocabulary, rows })
    }
}

/// Lowercased, stop-word-filtered token counts for one document.
fn term_counts(document: &str) -> HashMap<String, usize> {
    let lower = document.to_lowercase();
    let mut counts = HashMap::new();
    for token in TOKEN_RE.find_iter(&lower) {
        let token = token.as_str();
        if ENGLISH_STOP_WORDS.contains(token) {
            continue;
        }
        *counts.entry(token.to_string()).or_insert(0) += 1;
    }
    counts
}

fn smoothed_idf(n_docs: usize, df: usize) -> f64 {
    ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0
}
