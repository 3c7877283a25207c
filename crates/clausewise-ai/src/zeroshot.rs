//! Zero-shot classification through natural-language inference.
//!
//! Each candidate label becomes the hypothesis `"This example is {label}."`
//! paired with the document as premise; the label's score is the NLI
//! model's entailment probability. Labels are scored independently — the
//! result is not a distribution over the label set.

use std::path::Path;
use std::sync::Mutex;

use tokenizers::{Tokenizer, TruncationStrategy};
use tracing::info;

use crate::decode::entailment_score;
use crate::model::{PipelineConfig, i64_tensor, load_session, load_tokenizer};
use crate::{LabelScore, ZeroShotClassification};

const MAX_SEQ_LEN: usize = 512;

pub struct NliClassifier {
    session: Mutex<ort::session::Session>,
    tokenizer: Tokenizer,
    contradiction_idx: usize,
    entailment_idx: usize,
    wants_token_types: bool,
}

impl NliClassifier {
    /// Load an NLI model (e.g. an ONNX export of facebook/bart-large-mnli)
    /// from a directory containing `model.onnx` and `tokenizer.json`.
    ///
    /// Class positions come from `config.json`'s `label2id`; the standard
    /// MNLI layout (contradiction=0, entailment=2) is the fallback.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let session = load_session(&model_dir.join("model.onnx"))?;
        let tokenizer = load_tokenizer(model_dir, MAX_SEQ_LEN, TruncationStrategy::OnlyFirst)?;

        let config = PipelineConfig::load(model_dir)?;
        let class_idx = |name: &str, fallback: usize| {
            config
                .label2id
                .iter()
                .find(|(label, _)| label.eq_ignore_ascii_case(name))
                .map(|(_, &id)| id)
                .unwrap_or(fallback)
        };
        let contradiction_idx = class_idx("contradiction", 0);
        let entailment_idx = class_idx("entailment", 2);

        let wants_token_types = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        info!(model = %model_dir.display(), "loaded zero-shot classification model");
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            contradiction_idx,
            entailment_idx,
            wants_token_types,
        })
    }

    fn score_label(&self, text: &str, label: &str) -> anyhow::Result<f32> {
        let hypothesis = format!("This example is {label}.");
        let encoding = self
            .tokenizer
            .encode((text, hypothesis.as_str()), true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        let ids = i64_tensor(encoding.get_ids())?;
        let mask = i64_tensor(encoding.get_attention_mask())?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("NLI session lock poisoned"))?;
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

        let (_, logits) = outputs[0].try_extract_tensor::<f32>()?;
        Ok(entailment_score(
            logits,
            self.contradiction_idx,
            self.entailment_idx,
        ))
    }
}

impl ZeroShotClassification for NliClassifier {
    fn classify(&self, text: &str, labels: &[&str]) -> anyhow::Result<Vec<LabelScore>> {
        anyhow::ensure!(!text.trim().is_empty(), "empty text");
        anyhow::ensure!(!labels.is_empty(), "no candidate labels");

        // One NLI pass per label.
        let mut scores = Vec::with_capacity(labels.len());
        for &label in labels {
            scores.push(LabelScore {
                label: label.to_string(),
                score: self.score_label(text, label)?,
            });
        }

        scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scores)
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
            .join("classifier")
    }

    fn require_model() -> PathBuf {
        let dir = model_dir();
        if !dir.join("model.onnx").exists() {
            panic!(
                "NLI model not found. Export from HuggingFace:\n  \
                 optimum-cli export onnx --model facebook/bart-large-mnli models/classifier/"
            );
        }
        dir
    }

    #[test]
    fn lease_text_scores_lease_highest() {
        let clf = NliClassifier::load(&require_model()).unwrap();
        let text = "The landlord leases the premises to the tenant for a term of twelve months \
                    at a monthly rent of 1,200 dollars.";
        let labels = ["NDA", "lease", "employment contract", "service agreement"];
        let scores = clf.classify(text, &labels).unwrap();
        assert_eq!(scores.len(), labels.len());
        assert_eq!(scores[0].label, "lease");
    }

    #[test]
    fn scores_are_independent_probabilities() {
        let clf = NliClassifier::load(&require_model()).unwrap();
        let scores = clf
            .classify("Some neutral text.", &["NDA", "lease"])
            .unwrap();
        for s in &scores {
            assert!(s.score >= 0.0 && s.score <= 1.0);
        }
    }

    #[test]
    fn empty_label_set_is_an_error() {
        let clf = NliClassifier::load(&require_model()).unwrap();
        assert!(clf.classify("text", &[]).is_err());
    }
}
