//! Grouped named-entity recognition over a token-classification model.
//!
//! The model directory must contain `model.onnx`, `tokenizer.json`, and a
//! `config.json` with the `id2label` map. Adjacent tokens sharing an entity
//! type are merged into one span ([`crate::decode::group_entities`]); the
//! merge itself is the standard pass-through aggregation, not a custom rule.

use std::path::Path;
use std::sync::Mutex;

use tokenizers::{Tokenizer, TruncationStrategy};
use tracing::info;

use crate::decode::{TaggedToken, argmax, group_entities, softmax};
use crate::model::{PipelineConfig, i64_tensor, load_session, load_tokenizer};
use crate::{Entity, EntityRecognition};

const MAX_SEQ_LEN: usize = 512;

pub struct EntityTagger {
    session: Mutex<ort::session::Session>,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    wants_token_types: bool,
}

impl EntityTagger {
    /// Load a token-classification model from a directory containing
    /// `model.onnx`, `tokenizer.json`, and `config.json`.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let session = load_session(&model_dir.join("model.onnx"))?;
        let tokenizer = load_tokenizer(model_dir, MAX_SEQ_LEN, TruncationStrategy::LongestFirst)?;
        let labels = PipelineConfig::load(model_dir)?.labels_by_id()?;

        let wants_token_types = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        info!(
            model = %model_dir.display(),
            labels = labels.len(),
            "loaded entity-recognition model"
        );
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            labels,
            wants_token_types,
        })
    }
}

impl EntityRecognition for EntityTagger {
    fn entities(&self, text: &str) -> anyhow::Result<Vec<Entity>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        let ids = i64_tensor(encoding.get_ids())?;
        let mask = i64_tensor(encoding.get_attention_mask())?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("NER session lock poisoned"))?;
        let outputs = if self.wants_token_types {
            let type_ids = i64_tensor(encoding.get_type_ids())?;
            session.run(ort::inputs![
                "input_ids" => ids,
                "attention_mask" => mask,
                "token_type_ids" => type_ids,
            ])?
        } else {
            session.run(ort::inputs![
                "input_ids" => ids,
                "attention_mask" => mask,
            ])?
        };

        let (shape, logits) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = shape;
        anyhow::ensure!(
            dims.len() == 3 && dims[2] as usize == self.labels.len(),
            "unexpected NER output shape: {dims:?}, expected [1, seq, {}]",
            self.labels.len()
        );
        let seq_len = dims[1] as usize;
        let num_labels = dims[2] as usize;

        // Classify each real token; specials and padding drop out here.
        let offsets = encoding.get_offsets();
        let specials = encoding.get_special_tokens_mask();
        let attention = encoding.get_attention_mask();

        let mut tagged: Vec<TaggedToken> = Vec::new();
        for i in 0..seq_len.min(offsets.len()) {
            if specials[i] == 1 || attention[i] == 0 {
                continue;
            }
            let row = &logits[i * num_labels..(i + 1) * num_labels];
            let probs = softmax(row);
            let Some(best) = argmax(&probs) else { continue };
            tagged.push(TaggedToken {
                tag: &self.labels[best],
                score: probs[best],
                start: offsets[i].0,
                end: offsets[i].1,
            });
        }

        let entities = group_entities(&tagged)
            .into_iter()
            .filter_map(|span| {
                text.get(span.start..span.end).map(|surface| Entity {
                    group: span.group,
                    text: surface.to_string(),
                    score: span.score,
                })
            })
            .collect();
        Ok(entities)
    }
}
