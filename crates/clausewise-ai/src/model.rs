//! Model-directory loading shared by the ONNX pipelines.
//!
//! Each pipeline loads from a directory containing `model.onnx` (or an
//! encoder/decoder pair) plus `tokenizer.json`, and optionally the model's
//! `config.json` for label maps and generation token ids.

use std::collections::HashMap;
use std::path::Path;

use ort::session::Session;
use ort::value::Tensor;
use serde::Deserialize;
use tokenizers::{Tokenizer, TruncationParams, TruncationStrategy};

/// Open an ONNX session, insisting the file exists first for a clearer error.
pub fn load_session(path: &Path) -> anyhow::Result<Session> {
    anyhow::ensure!(path.exists(), "{} not found", path.display());
    Ok(Session::builder()?.commit_from_file(path)?)
}

/// Load `tokenizer.json` from a model directory with truncation configured.
pub fn load_tokenizer(
    dir: &Path,
    max_length: usize,
    strategy: TruncationStrategy,
) -> anyhow::Result<Tokenizer> {
    let tokenizer_path = dir.join("tokenizer.json");
    anyhow::ensure!(
        tokenizer_path.exists(),
        "tokenizer.json not found in {}",
        dir.display()
    );

    let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
        .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            strategy,
            ..Default::default()
        }))
        .map_err(|e| anyhow::anyhow!("set truncation: {e}"))?;
    Ok(tokenizer)
}

/// Build a `[1, len]` i64 input tensor from tokenizer output.
pub fn i64_tensor(values: &[u32]) -> anyhow::Result<Tensor<i64>> {
    let data: Vec<i64> = values.iter().map(|&v| v as i64).collect();
    let shape = [1i64, data.len() as i64];
    Ok(Tensor::from_array((shape, data.into_boxed_slice()))?)
}

/// The subset of a model's `config.json` the pipelines read.
#[derive(Debug, Default, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub id2label: HashMap<String, String>,
    #[serde(default)]
    pub label2id: HashMap<String, usize>,
    pub decoder_start_token_id: Option<u32>,
    pub eos_token_id: Option<u32>,
}

impl PipelineConfig {
    /// Read `config.json` from a model directory; absent file means defaults.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let path = dir.join("config.json");
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)?;
        let config = serde_json::from_str(&text)
            .map_err(|e| anyhow::anyhow!("parse {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Classification labels ordered by numeric id.
    pub fn labels_by_id(&self) -> anyhow::Result<Vec<String>> {
        anyhow::ensure!(!self.id2label.is_empty(), "config.json has no id2label map");
        let mut pairs: Vec<(usize, &String)> = self
            .id2label
            .iter()
            .map(|(k, v)| {
                k.parse::<usize>()
                    .map(|id| (id, v))
                    .map_err(|_| anyhow::anyhow!("non-numeric label id {k:?}"))
            })
            .collect::<anyhow::Result<_>>()?;
        pairs.sort_by_key(|(id, _)| *id);

        let mut labels = vec![String::from("O"); pairs.last().map(|(id, _)| id + 1).unwrap_or(0)];
        for (id, label) in pairs {
            labels[id] = label.clone();
        }
        Ok(labels)
    }
}
