// Sentiment classifier trait — the swap-ready abstraction.
//
// The engine only needs "text in, one of five star labels out". The default
// implementation runs a local ONNX model; tests plug in deterministic fakes.
// Classification is synchronous: the engine is a CPU-bound pure pass and the
// caller decides which thread it runs on.

use crate::error::EngineResult;

/// Trait for ordinal five-class sentiment classification.
pub trait SentimentClassifier: Send + Sync {
    /// Classify each text, returning raw labels such as `"4 stars"` in input
    /// order. Labels are checked against the star table by the caller.
    fn classify_batch(&self, texts: &[String]) -> EngineResult<Vec<String>>;

    /// Classify a single text.
    fn classify(&self, text: &str) -> EngineResult<String> {
        let mut labels = self.classify_batch(&[text.to_string()])?;
        labels.pop().ok_or_else(|| {
            crate::error::EngineError::Inference("classifier returned no label".to_string())
        })
    }
}

impl<T: SentimentClassifier + ?Sized> SentimentClassifier for std::sync::Arc<T> {
    fn classify_batch(&self, texts: &[String]) -> EngineResult<Vec<String>> {
        (**self).classify_batch(texts)
    }
}
