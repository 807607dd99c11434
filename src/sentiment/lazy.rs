// Lazily constructed, shared sentiment classifier.
//
// Loading the model costs seconds and hundreds of megabytes, and most runs
// never need it (no dominant topic means no sentiment). The classifier is
// therefore built on first use. `OnceCell::get_or_try_init` blocks concurrent
// first callers until one construction finishes, so the model is loaded at
// most once; a failed load leaves the cell empty and the next call retries.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use super::onnx::OnnxSentimentClassifier;
use super::traits::SentimentClassifier;
use crate::error::EngineResult;

type Loader = dyn Fn() -> EngineResult<Arc<dyn SentimentClassifier>> + Send + Sync;

pub struct LazyClassifier {
    loader: Box<Loader>,
    cell: OnceCell<Arc<dyn SentimentClassifier>>,
}

impl LazyClassifier {
    /// Build the ONNX classifier from `model_dir` on first use.
    pub fn onnx(model_dir: PathBuf) -> Self {
        Self::with_loader(move || {
            info!(model_dir = %model_dir.display(), "Loading sentiment model");
            let classifier = OnnxSentimentClassifier::load(&model_dir)?;
            Ok(Arc::new(classifier) as Arc<dyn SentimentClassifier>)
        })
    }

    /// Build the classifier with an arbitrary constructor on first use.
    pub fn with_loader<F>(loader: F) -> Self
    where
        F: Fn() -> EngineResult<Arc<dyn SentimentClassifier>> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            cell: OnceCell::new(),
        }
    }

    /// The shared classifier, constructing it if this is the first use.
    pub fn get(&self) -> EngineResult<&Arc<dyn SentimentClassifier>> {
        self.cell.get_or_try_init(|| (self.loader)())
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Drop the loaded model. The next use loads it again.
    pub fn release(&mut self) -> bool {
        let released = self.cell.take().is_some();
        if released {
            info!("Released sentiment model");
        }
        released
    }
}

impl SentimentClassifier for LazyClassifier {
    fn classify_batch(&self, texts: &[String]) -> EngineResult<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.get()?.classify_batch(texts)
    }
}
