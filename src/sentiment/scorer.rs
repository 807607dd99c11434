// Turning article summaries into star ratings.
//
// Each summary is cut to a fixed character prefix before classification,
// which bounds model cost. The raw label then goes through the closed star
// table; an unknown label fails the whole run.

use tracing::debug;

use super::labels::StarRating;
use super::traits::SentimentClassifier;
use crate::error::{EngineError, EngineResult};

/// Default classifier input length, in characters.
pub const DEFAULT_MAX_CHARS: usize = 512;

/// The first `max_chars` characters of `text`, cut on a char boundary.
pub fn prefix_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Rate each text on the five-star scale, in input order.
pub fn score_texts(
    classifier: &dyn SentimentClassifier,
    texts: &[&str],
    max_chars: usize,
) -> EngineResult<Vec<StarRating>> {
    if max_chars < 1 {
        return Err(EngineError::InvalidParameter(
            "sentiment truncation length must be at least 1".to_string(),
        ));
    }
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let inputs: Vec<String> = texts
        .iter()
        .map(|t| prefix_chars(t, max_chars).to_string())
        .collect();

    let labels = classifier.classify_batch(&inputs)?;
    if labels.len() != inputs.len() {
        return Err(EngineError::Inference(format!(
            "classifier returned {} labels for {} texts",
            labels.len(),
            inputs.len()
        )));
    }

    labels
        .iter()
        .map(|label| {
            let rating = StarRating::from_label(label)?;
            debug!(label = %label, stars = rating.value(), "Mapped sentiment label");
            Ok(rating)
        })
        .collect()
}
