//! Seq2seq clause simplification with greedy decoding.
//!
//! Runs a T5-style encoder/decoder pair exported to ONNX (the model
//! directory must contain `encoder_model.onnx`, `decoder_model.onnx`, and
//! `tokenizer.json`). Decoding is plain argmax with no sampling, so the
//! same input always yields the same output, capped at
//! [`MAX_NEW_TOKENS`] generated tokens.

use std::path::Path;
use std::sync::Mutex;

use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationStrategy};
use tracing::info;

use crate::Simplification;
use crate::decode::argmax;
use crate::model::{PipelineConfig, i64_tensor, load_session, load_tokenizer};

/// Generation budget per clause.
const MAX_NEW_TOKENS: usize = 100;

/// Encoder input window.
const MAX_SEQ_LEN: usize = 512;

pub struct Seq2SeqSimplifier {
    encoder: Mutex<ort::session::Session>,
    decoder: Mutex<ort::session::Session>,
    tokenizer: Tokenizer,
    start_token: u32,
    eos_token: u32,
}

impl Seq2SeqSimplifier {
    /// Load an encoder/decoder pair from a model directory.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let encoder = load_session(&model_dir.join("encoder_model.onnx"))?;
        let decoder = load_session(&model_dir.join("decoder_model.onnx"))?;
        let tokenizer = load_tokenizer(model_dir, MAX_SEQ_LEN, TruncationStrategy::LongestFirst)?;

        let config = PipelineConfig::load(model_dir)?;
        let start_token = config.decoder_start_token_id.unwrap_or(0);
        let eos_token = config.eos_token_id.unwrap_or(1);

        info!(model = %model_dir.display(), "loaded simplifier model");
        Ok(Self {
            encoder: Mutex::new(encoder),
            decoder: Mutex::new(decoder),
            tokenizer,
            start_token,
            eos_token,
        })
    }
}

impl Simplification for Seq2SeqSimplifier {
    fn simplify(&self, text: &str) -> anyhow::Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        // One encoder pass; its hidden states feed every decoder step.
        let (hidden_shape, hidden): ([i64; 3], Vec<f32>) = {
            let mut encoder = self
                .encoder
                .lock()
                .map_err(|_| anyhow::anyhow!("encoder session lock poisoned"))?;
            let outputs = encoder.run(ort::inputs![
                "input_ids" => i64_tensor(encoding.get_ids())?,
                "attention_mask" => i64_tensor(encoding.get_attention_mask())?,
            ])?;
            let (shape, data) = outputs[0].try_extract_tensor::<f32>()?;
            let dims: &[i64] = shape;
            anyhow::ensure!(dims.len() == 3, "unexpected encoder output shape: {dims:?}");
            ([dims[0], dims[1], dims[2]], data.to_vec())
        };

        let mut decoder = self
            .decoder
            .lock()
            .map_err(|_| anyhow::anyhow!("decoder session lock poisoned"))?;

        // Greedy loop: re-run the decoder over the growing prefix and take
        // the argmax of the final position each step.
        let mut generated: Vec<u32> = vec![self.start_token];
        for _ in 0..MAX_NEW_TOKENS {
            let hidden_tensor =
                Tensor::from_array((hidden_shape, hidden.clone().into_boxed_slice()))?;
            let outputs = decoder.run(ort::inputs![
                "input_ids" => i64_tensor(&generated)?,
                "encoder_attention_mask" => i64_tensor(encoding.get_attention_mask())?,
                "encoder_hidden_states" => hidden_tensor,
            ])?;

            let (shape, logits) = outputs[0].try_extract_tensor::<f32>()?;
            let dims: &[i64] = shape;
            anyhow::ensure!(dims.len() == 3, "unexpected decoder output shape: {dims:?}");
            let vocab = dims[2] as usize;
            let last = &logits[(generated.len() - 1) * vocab..generated.len() * vocab];

            let next = argmax(last).ok_or_else(|| anyhow::anyhow!("empty decoder logits"))? as u32;
            if next == self.eos_token {
                break;
            }
            generated.push(next);
        }

        let text = self
            .tokenizer
            .decode(&generated[1..], true)
            .map_err(|e| anyhow::anyhow!("decode: {e}"))?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn model_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("models")
            .join("simplifier")
    }

    fn require_model() -> PathBuf {
        let dir = model_dir();
        if !dir.join("encoder_model.onnx").exists() {
            panic!(
                "Simplifier model not found. Export from HuggingFace:\n  \
                 optimum-cli export onnx --model t5-small models/simplifier/"
            );
        }
        dir
    }

    #[test]
    fn repeated_calls_are_identical() {
        let simplifier = Seq2SeqSimplifier::load(&require_model()).unwrap();
        let clause = "The party of the first part shall indemnify and hold harmless the party \
                      of the second part against all claims arising hereunder.";
        let a = simplifier.simplify(clause).unwrap();
        let b = simplifier.simplify(clause).unwrap();
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let simplifier = Seq2SeqSimplifier::load(&require_model()).unwrap();
        assert_eq!(simplifier.simplify("   ").unwrap(), "");
    }
}
