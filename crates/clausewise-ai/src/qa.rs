//! Extractive question answering over a SQuAD-style span model.
//!
//! The model directory must contain `model.onnx` and `tokenizer.json`
//! (e.g. an ONNX export of deepset/roberta-base-squad2). The answer is a
//! verbatim span of the supplied context, recovered through token offsets.

use std::path::Path;
use std::sync::Mutex;

use tokenizers::{Tokenizer, TruncationStrategy};
use tracing::info;

use crate::decode::best_span;
use crate::model::{i64_tensor, load_session, load_tokenizer};
use crate::{QueryAnswer, QuestionAnswering};

/// Model window for question + context; the context is the sequence that
/// gets truncated when the pair runs over.
const MAX_SEQ_LEN: usize = 384;

/// Span length cap, in tokens.
const MAX_ANSWER_TOKENS: usize = 30;

pub struct ExtractiveQa {
    session: Mutex<ort::session::Session>,
    tokenizer: Tokenizer,
    wants_token_types: bool,
}

impl ExtractiveQa {
    /// Load a span-prediction model from a directory containing `model.onnx`
    /// and `tokenizer.json`.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let session = load_session(&model_dir.join("model.onnx"))?;
        let tokenizer = load_tokenizer(model_dir, MAX_SEQ_LEN, TruncationStrategy::OnlySecond)?;

        // BERT-style models take segment ids; RoBERTa-style models don't.
        let wants_token_types = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        info!(model = %model_dir.display(), "loaded question-answering model");
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            wants_token_types,
        })
    }
}

impl QuestionAnswering for ExtractiveQa {
    fn answer(&self, question: &str, context: &str) -> anyhow::Result<QueryAnswer> {
        anyhow::ensure!(!question.trim().is_empty(), "empty question");
        anyhow::ensure!(!context.trim().is_empty(), "empty context");

        let encoding = self
            .tokenizer
            .encode((question, context), true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        let ids = i64_tensor(encoding.get_ids())?;
        let mask = i64_tensor(encoding.get_attention_mask())?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("QA session lock poisoned"))?;
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

        let (_, start_logits) = outputs["start_logits"].try_extract_tensor::<f32>()?;
        let (_, end_logits) = outputs["end_logits"].try_extract_tensor::<f32>()?;

        // Only context tokens may carry the answer.
        let sequence_ids = encoding.get_sequence_ids();
        let specials = encoding.get_special_tokens_mask();
        let allowed: Vec<bool> = sequence_ids
            .iter()
            .zip(specials)
            .map(|(seq, &special)| *seq == Some(1) && special == 0)
            .collect();

        let span = best_span(start_logits, end_logits, &allowed, MAX_ANSWER_TOKENS)
            .ok_or_else(|| anyhow::anyhow!("no answer span in context window"))?;

        let offsets = encoding.get_offsets();
        let byte_start = offsets[span.start].0;
        let byte_end = offsets[span.end].1;
        let text = context
            .get(byte_start..byte_end)
            .ok_or_else(|| anyhow::anyhow!("answer span offsets out of bounds"))?
            .trim()
            .to_string();

        Ok(QueryAnswer {
            text,
            score: span.score,
        })
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
            .join("qa")
    }

    fn require_model() -> PathBuf {
        let dir = model_dir();
        if !dir.join("model.onnx").exists() {
            panic!(
                "QA model not found. Export from HuggingFace:\n  \
                 optimum-cli export onnx --model deepset/roberta-base-squad2 models/qa/"
            );
        }
        dir
    }

    #[test]
    fn answer_is_a_span_of_the_context() {
        let qa = ExtractiveQa::load(&require_model()).unwrap();
        let context = "The tenant shall pay rent of 1,200 dollars on the first day of each month.";
        let answer = qa.answer("How much is the rent?", context).unwrap();
        assert!(!answer.text.is_empty());
        assert!(context.contains(&answer.text));
        assert!(answer.score > 0.0 && answer.score <= 1.0);
    }

    #[test]
    fn empty_context_is_an_error() {
        let qa = ExtractiveQa::load(&require_model()).unwrap();
        assert!(qa.answer("Anything?", "   ").is_err());
    }
}
