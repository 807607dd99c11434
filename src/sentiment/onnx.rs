// Local ONNX sentiment classifier using bert-base-multilingual-uncased-sentiment.
//
// The model rates text on a five-star review scale. It runs entirely on the
// local CPU; no API calls and no network after the one-time download.
//
// Output: one logit per class. The arg-max class id is turned into its label
// through the id2label table shipped in the model's config.json, so the
// label strings checked by the star table are exactly what the model emits.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use ort::session::Session;
use ort::value::Tensor;
use serde::Deserialize;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::debug;

use super::download::{CONFIG_FILE, MODEL_FILE, TOKENIZER_FILE};
use super::traits::SentimentClassifier;
use crate::error::{EngineError, EngineResult};

/// BERT's positional limit; longer inputs are cut by the tokenizer.
const MAX_TOKENS: usize = 512;

/// Local ONNX-based sentiment classifier. Holds the model session behind a
/// Mutex because `Session::run` takes `&mut self`.
pub struct OnnxSentimentClassifier {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    /// Class id -> label, e.g. 0 -> "1 star".
    labels: Vec<String>,
}

#[derive(Deserialize)]
struct ModelConfig {
    id2label: HashMap<String, String>,
}

impl OnnxSentimentClassifier {
    /// Load the model, tokenizer and label table from `model_dir`.
    ///
    /// Any missing or unreadable file is reported as
    /// `EngineError::ClassifierUnavailable`.
    pub fn load(model_dir: &Path) -> EngineResult<Self> {
        Self::open(model_dir)
            .map_err(|e| EngineError::ClassifierUnavailable(format!("{e:#}")))
    }

    fn open(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join(MODEL_FILE);
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);
        let config_path = model_dir.join(CONFIG_FILE);

        for path in [&model_path, &tokenizer_path, &config_path] {
            if !path.exists() {
                anyhow::bail!(
                    "Model file not found: {}\nRun `newsbuzz download-model` to download it.",
                    path.display()
                );
            }
        }

        let config_json = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let labels = labels_from_config(&config_json)?;

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure tokenizer truncation: {}", e))?;

        debug!(
            labels = ?labels,
            "Loaded ONNX sentiment model from {}",
            model_dir.display()
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            labels,
        })
    }

    /// Tokenize, run one forward pass over the whole batch, and pick the
    /// highest-scoring class for each text.
    fn classify_sync(&self, texts: &[String]) -> Result<Vec<String>> {
        let encodings: Vec<_> = texts
            .iter()
            .map(|t| {
                self.tokenizer
                    .encode(t.as_str(), true)
                    .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
            })
            .collect::<Result<Vec<_>>>()?;

        let batch_size = encodings.len();
        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        // Right-pad to max_len. BERT: pad id 0, mask 0, segment 0.
        let mut input_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
        let mut attention_mask_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
        let mut token_type_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);

        for enc in &encodings {
            let ids = enc.get_ids();
            let pad_len = max_len - ids.len();

            input_ids_flat.extend(ids.iter().map(|&id| id as i64));
            attention_mask_flat.extend(enc.get_attention_mask().iter().map(|&m| m as i64));
            token_type_ids_flat.extend(enc.get_type_ids().iter().map(|&t| t as i64));

            input_ids_flat.extend(std::iter::repeat_n(0i64, pad_len));
            attention_mask_flat.extend(std::iter::repeat_n(0i64, pad_len));
            token_type_ids_flat.extend(std::iter::repeat_n(0i64, pad_len));
        }

        let shape = [batch_size as i64, max_len as i64];

        let input_ids_tensor = Tensor::from_array((shape, input_ids_flat))
            .context("Failed to create input_ids tensor")?;
        let attention_mask_tensor = Tensor::from_array((shape, attention_mask_flat))
            .context("Failed to create attention_mask tensor")?;
        let token_type_ids_tensor = Tensor::from_array((shape, token_type_ids_flat))
            .context("Failed to create token_type_ids tensor")?;

        let logits = {
            let mut session = self
                .session
                .lock()
                .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

            let outputs = session
                .run(ort::inputs! {
                    "input_ids" => input_ids_tensor,
                    "attention_mask" => attention_mask_tensor,
                    "token_type_ids" => token_type_ids_tensor
                })
                .context("ONNX inference failed")?;

            // Output shape: [batch_size, num_labels]
            let (_shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .context("Failed to extract logits tensor")?;

            data.to_vec()
        };

        let num_labels = self.labels.len();
        if logits.len() != batch_size * num_labels {
            anyhow::bail!(
                "Model returned {} logits for {} texts and {} labels",
                logits.len(),
                batch_size,
                num_labels
            );
        }

        let labels = logits
            .chunks(num_labels)
            .zip(texts)
            .map(|(row, text)| {
                let class = argmax(row);
                debug!(
                    class = class,
                    label = %self.labels[class],
                    text_preview = %crate::output::truncate_chars(text, 50),
                    "ONNX classified text"
                );
                self.labels[class].clone()
            })
            .collect();

        Ok(labels)
    }
}

impl SentimentClassifier for OnnxSentimentClassifier {
    fn classify_batch(&self, texts: &[String]) -> EngineResult<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.classify_sync(texts)
            .map_err(|e| EngineError::Inference(format!("{e:#}")))
    }
}

/// Parse config.json's id2label into a dense, id-ordered label list.
fn labels_from_config(json: &str) -> Result<Vec<String>> {
    let config: ModelConfig =
        serde_json::from_str(json).context("Failed to parse model config.json")?;

    let mut by_id: Vec<(usize, String)> = config
        .id2label
        .into_iter()
        .map(|(id, label)| {
            id.parse::<usize>()
                .map(|id| (id, label))
                .with_context(|| format!("Non-numeric class id in id2label: {id}"))
        })
        .collect::<Result<_>>()?;
    by_id.sort_by_key(|(id, _)| *id);

    if by_id.is_empty() {
        anyhow::bail!("Model config.json has an empty id2label table");
    }
    if by_id.iter().enumerate().any(|(i, (id, _))| i != *id) {
        anyhow::bail!("Model config.json id2label ids are not contiguous from 0");
    }

    Ok(by_id.into_iter().map(|(_, label)| label).collect())
}

/// Index of the largest value; the first one wins on ties.
fn argmax(row: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in row.iter().enumerate() {
        if v > row[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_from_config_orders_by_id() {
        let json = r#"{"id2label": {"4": "5 stars", "0": "1 star", "2": "3 stars", "1": "2 stars", "3": "4 stars"}, "model_type": "bert"}"#;
        let labels = labels_from_config(json).unwrap();
        assert_eq!(labels, vec!["1 star", "2 stars", "3 stars", "4 stars", "5 stars"]);
    }

    #[test]
    fn test_labels_from_config_rejects_gaps() {
        let json = r#"{"id2label": {"0": "1 star", "2": "3 stars"}}"#;
        assert!(labels_from_config(json).is_err());
    }

    #[test]
    fn test_labels_from_config_rejects_missing_table() {
        assert!(labels_from_config(r#"{"model_type": "bert"}"#).is_err());
    }

    #[test]
    fn test_argmax_first_wins_on_tie() {
        assert_eq!(argmax(&[0.1, 0.9, 0.9, 0.2]), 1);
        assert_eq!(argmax(&[-3.0, -1.0, -2.0]), 1);
    }

    #[test]
    fn test_load_missing_dir_is_unavailable() {
        let dir = std::env::temp_dir().join("newsbuzz-onnx-missing");
        match OnnxSentimentClassifier::load(&dir) {
            Err(EngineError::ClassifierUnavailable(msg)) => {
                assert!(msg.contains("download-model"), "unexpected message: {msg}")
            }
            other => panic!("expected ClassifierUnavailable, got {:?}", other.err()),
        }
    }
}
