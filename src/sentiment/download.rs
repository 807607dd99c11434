// Model download helper for the ONNX sentiment model.
//
// The model is the ONNX export of bert-base-multilingual-uncased-sentiment,
// a five-class review classifier whose labels are "1 star" ... "5 stars".
// Three files are needed: the quantized graph, the tokenizer and config.json
// (which carries the id -> label table).
//
// Files are stored in a platform-appropriate directory
// (~/.local/share/newsbuzz/models/ on Linux) so they persist across runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// HuggingFace repo for the sentiment model.
const SENTIMENT_HF_URL: &str =
    "https://huggingface.co/Xenova/bert-base-multilingual-uncased-sentiment/resolve/main";

/// Local file names inside the model directory.
pub const MODEL_FILE: &str = "model_quantized.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const CONFIG_FILE: &str = "config.json";

/// (remote path, local name, size hint for the progress line)
const MODEL_FILES: [(&str, &str, Option<&str>); 3] = [
    ("config.json", CONFIG_FILE, None),
    ("tokenizer.json", TOKENIZER_FILE, None),
    ("onnx/model_quantized.onnx", MODEL_FILE, Some("~170 MB")),
];

/// Returns the default directory for storing model files.
/// Uses the platform data directory: ~/.local/share/newsbuzz/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("newsbuzz")
        .join("models")
}

/// Check whether every required model file exists.
pub fn model_files_present(dir: &Path) -> bool {
    MODEL_FILES
        .iter()
        .all(|(_, local, _)| dir.join(local).exists())
}

/// Download the sentiment model files into `dir`.
///
/// Skips files that already exist and creates the directory as needed.
pub async fn download_model(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    println!("\nSentiment model (bert-base-multilingual-uncased-sentiment):");

    let client = reqwest::Client::new();
    for (remote, local, size_hint) in MODEL_FILES {
        let dest = dir.join(local);
        if dest.exists() {
            info!(file = local, "Model file already exists, skipping");
            println!("  {} (already exists)", local);
            continue;
        }

        match size_hint {
            Some(hint) => println!("  Downloading {} ({})...", local, hint),
            None => println!("  Downloading {}...", local),
        }
        download_file(
            &client,
            &format!("{}/{}", SENTIMENT_HF_URL, remote),
            &dest,
            size_hint.is_some(),
        )
        .await?;
    }

    Ok(())
}

/// Download a single file from a URL to a local path.
/// If `show_progress` is true, display a progress bar.
async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    show_progress: bool,
) -> Result<()> {
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = show_progress.then(|| match response.content_length() {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .expect("valid template")
                    .progress_chars("=> "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("    {spinner} {bytes}")
                    .expect("valid template"),
            );
            pb
        }
    });

    // Written in one step: a failed download leaves no partial file behind
    // for `model_files_present` to accept.
    let mut bytes = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read response body")?
    {
        bytes.extend_from_slice(&chunk);
        if let Some(ref pb) = pb {
            pb.set_position(bytes.len() as u64);
        }
    }

    std::fs::write(dest, &bytes).with_context(|| format!("Failed to write {}", dest.display()))?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_dir_is_under_newsbuzz() {
        let dir = default_model_dir();
        let path_str = dir.to_string_lossy();
        assert!(
            path_str.contains("newsbuzz") && path_str.contains("models"),
            "Expected path containing newsbuzz/models, got: {path_str}"
        );
    }

    #[test]
    fn test_model_files_present_false_when_empty() {
        let dir = std::env::temp_dir().join("newsbuzz-test-nonexistent");
        assert!(!model_files_present(&dir));
    }

    #[test]
    fn test_model_files_present_requires_all_three() {
        let dir = std::env::temp_dir().join("newsbuzz-download-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(MODEL_FILE), b"fake").unwrap();
        std::fs::write(dir.join(TOKENIZER_FILE), b"fake").unwrap();
        assert!(!model_files_present(&dir));

        std::fs::write(dir.join(CONFIG_FILE), b"{}").unwrap();
        assert!(model_files_present(&dir));

        // Cleanup
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
