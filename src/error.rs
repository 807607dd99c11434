// Error taxonomy for the topic engine.
//
// Degenerate input (empty batch, collapsed vocabulary, too few clusters) is
// not an error: it comes back as `HottestTopic::Absent`. Everything here is
// fatal to the current run and reaches the caller unchanged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A tuning parameter is outside its legal range.
    #[error("invalid engine parameter: {0}")]
    InvalidParameter(String),

    /// The sentiment classifier produced a label outside the five-star scale.
    #[error("sentiment classifier returned unrecognized label {label:?}")]
    ClassifierContractViolation { label: String },

    /// The sentiment model could not be found or loaded.
    #[error("sentiment model unavailable: {0}")]
    ClassifierUnavailable(String),

    /// The sentiment model loaded but failed while scoring.
    #[error("sentiment inference failed: {0}")]
    Inference(String),
}

impl EngineError {
    /// True when the failure comes from the external sentiment model rather
    /// than from a broken label contract or bad configuration.
    pub fn is_dependency_failure(&self) -> bool {
        matches!(
            self,
            EngineError::ClassifierUnavailable(_) | EngineError::Inference(_)
        )
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
