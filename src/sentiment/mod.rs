// Sentiment scoring — trait-based abstraction over a five-star classifier.
//
// The SentimentClassifier trait defines the interface. OnnxSentimentClassifier
// implements it with a local model, and LazyClassifier defers loading that
// model until a run actually has something to score.

pub mod download;
pub mod labels;
pub mod lazy;
pub mod onnx;
pub mod scorer;
pub mod traits;
