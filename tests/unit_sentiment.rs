// Unit tests for the star scale, truncation, scoring and the lazy classifier.
//
// All classifiers here are in-process fakes; no model files are needed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use newsbuzz::error::{EngineError, EngineResult};
use newsbuzz::sentiment::labels::{star_glyphs, StarRating, STAR_LABELS};
use newsbuzz::sentiment::lazy::LazyClassifier;
use newsbuzz::sentiment::scorer::{prefix_chars, score_texts, DEFAULT_MAX_CHARS};
use newsbuzz::sentiment::traits::SentimentClassifier;

/// Answers every text with the same label and remembers what it saw.
struct RecordingClassifier {
    label: &'static str,
    seen: Mutex<Vec<String>>,
}

impl RecordingClassifier {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl SentimentClassifier for RecordingClassifier {
    fn classify_batch(&self, texts: &[String]) -> EngineResult<Vec<String>> {
        self.seen.lock().unwrap().extend(texts.iter().cloned());
        Ok(texts.iter().map(|_| self.label.to_string()).collect())
    }
}

/// Returns one label fewer than it was asked for.
struct ShortClassifier;

impl SentimentClassifier for ShortClassifier {
    fn classify_batch(&self, texts: &[String]) -> EngineResult<Vec<String>> {
        Ok(texts.iter().skip(1).map(|_| "3 stars".to_string()).collect())
    }
}

// ============================================================
// Label table
// ============================================================

#[test]
fn every_label_maps_to_its_star_count() {
    for (i, label) in STAR_LABELS.iter().enumerate() {
        let rating = StarRating::from_label(label).unwrap();
        assert_eq!(usize::from(rating.value()), i + 1);
        assert_eq!(rating.label(), *label);
    }
}

#[test]
fn unknown_labels_violate_the_contract() {
    for label in ["6 stars", "0 stars", "5 Stars", "POSITIVE", "", "1 stars"] {
        match StarRating::from_label(label) {
            Err(EngineError::ClassifierContractViolation { label: got }) => assert_eq!(got, label),
            other => panic!("expected contract violation for {label:?}, got {other:?}"),
        }
    }
}

#[test]
fn star_glyphs_repeat() {
    assert_eq!(star_glyphs(0), "");
    assert_eq!(star_glyphs(3), "⭐⭐⭐");
    assert_eq!(StarRating::MAX.glyphs().chars().count(), 5);
    assert_eq!(StarRating::new(4).unwrap().to_string(), "4/5");
    assert!(StarRating::new(0).is_none());
    assert!(StarRating::new(6).is_none());
}

#[test]
fn star_rating_serializes_as_number() {
    let rating = StarRating::new(2).unwrap();
    assert_eq!(serde_json::to_string(&rating).unwrap(), "2");
    assert!(serde_json::from_str::<StarRating>("7").is_err());
}

// ============================================================
// Truncation
// ============================================================

#[test]
fn truncation_is_idempotent_and_bounded() {
    let texts = [
        String::new(),
        "short summary".to_string(),
        "é".repeat(600),
        "🇬🇭".repeat(400),
        "a".repeat(DEFAULT_MAX_CHARS),
    ];
    for text in &texts {
        let once = prefix_chars(text, DEFAULT_MAX_CHARS);
        assert!(once.chars().count() <= DEFAULT_MAX_CHARS);
        assert_eq!(prefix_chars(once, DEFAULT_MAX_CHARS), once);
        assert!(text.starts_with(once));
    }
}

#[test]
fn classifier_sees_only_the_prefix() {
    let classifier = RecordingClassifier::new("4 stars");
    let long = "ö".repeat(DEFAULT_MAX_CHARS + 100);
    let ratings = score_texts(&classifier, &[long.as_str(), "brief"], DEFAULT_MAX_CHARS).unwrap();

    assert_eq!(ratings, vec![StarRating::new(4).unwrap(); 2]);
    let seen = classifier.seen.lock().unwrap();
    assert_eq!(seen[0].chars().count(), DEFAULT_MAX_CHARS);
    assert_eq!(seen[1], "brief");
}

// ============================================================
// score_texts
// ============================================================

#[test]
fn score_texts_rejects_out_of_table_label() {
    let classifier = RecordingClassifier::new("6 stars");
    let err = score_texts(&classifier, &["anything"], DEFAULT_MAX_CHARS).unwrap_err();
    assert!(matches!(err, EngineError::ClassifierContractViolation { .. }));
}

#[test]
fn score_texts_rejects_label_count_mismatch() {
    let err = score_texts(&ShortClassifier, &["one", "two"], DEFAULT_MAX_CHARS).unwrap_err();
    assert!(matches!(err, EngineError::Inference(_)));
}

#[test]
fn score_texts_rejects_zero_truncation() {
    let classifier = RecordingClassifier::new("3 stars");
    let err = score_texts(&classifier, &["text"], 0).unwrap_err();
    assert!(matches!(err, EngineError::InvalidParameter(_)));
}

#[test]
fn score_texts_empty_input_skips_classifier() {
    let classifier = RecordingClassifier::new("3 stars");
    assert!(score_texts(&classifier, &[], DEFAULT_MAX_CHARS).unwrap().is_empty());
    assert!(classifier.seen.lock().unwrap().is_empty());
}

// ============================================================
// LazyClassifier
// ============================================================

#[test]
fn concurrent_first_use_loads_once() {
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&loads);
    let lazy = LazyClassifier::with_loader(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(std::time::Duration::from_millis(20));
        Ok(Arc::new(RecordingClassifier::new("5 stars")) as Arc<dyn SentimentClassifier>)
    });

    std::thread::scope(|scope| {
        for i in 0..8 {
            let lazy = &lazy;
            scope.spawn(move || {
                let labels = lazy.classify_batch(&[format!("story {i}")]).unwrap();
                assert_eq!(labels, vec!["5 stars".to_string()]);
            });
        }
    });

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert!(lazy.is_loaded());
}

#[test]
fn lazy_empty_batch_does_not_load() {
    let lazy = LazyClassifier::with_loader(|| {
        Err(EngineError::ClassifierUnavailable("not installed".to_string()))
    });
    assert!(lazy.classify_batch(&[]).unwrap().is_empty());
    assert!(!lazy.is_loaded());
}

#[test]
fn lazy_load_failure_is_unavailable() {
    let lazy = LazyClassifier::with_loader(|| {
        Err(EngineError::ClassifierUnavailable("not installed".to_string()))
    });
    let err = lazy.classify_batch(&["text".to_string()]).unwrap_err();
    assert!(err.is_dependency_failure());
    assert!(matches!(err, EngineError::ClassifierUnavailable(_)));
}
