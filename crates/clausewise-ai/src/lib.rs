//! AI inference layer: four pre-trained capabilities behind uniform traits,
//! with ONNX Runtime implementations gated behind the `onnx` feature.
//!
//! The capabilities are selected by model directory at process start and
//! loaded exactly once; nothing here re-instantiates a model per request.
//! Pure decoding logic (softmax, span selection, entity grouping) lives in
//! [`decode`] and compiles without the `onnx` feature so it can be tested
//! anywhere.

pub mod decode;

#[cfg(feature = "onnx")]
mod model;
#[cfg(feature = "onnx")]
mod ner;
#[cfg(feature = "onnx")]
mod qa;
#[cfg(feature = "onnx")]
mod simplifier;
#[cfg(feature = "onnx")]
mod zeroshot;

#[cfg(feature = "onnx")]
pub use ner::EntityTagger;
#[cfg(feature = "onnx")]
pub use qa::ExtractiveQa;
#[cfg(feature = "onnx")]
pub use simplifier::Seq2SeqSimplifier;
#[cfg(feature = "onnx")]
pub use zeroshot::NliClassifier;

use serde::Serialize;

/// Result of extractive question answering: a verbatim span of the context
/// plus the model's confidence in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAnswer {
    pub text: String,
    pub score: f32,
}

/// One recognised entity: grouped type label, surface text, confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub group: String,
    pub text: String,
    pub score: f32,
}

/// Zero-shot score for one candidate label.
///
/// Scores are reported exactly as the capability produced them; they are not
/// renormalised across labels and need not sum to one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

/// Extractive question answering over a caller-supplied context.
///
/// Fails when the context is empty or the underlying model errors; callers
/// own the containment boundary.
pub trait QuestionAnswering: Send + Sync {
    fn answer(&self, question: &str, context: &str) -> anyhow::Result<QueryAnswer>;
}

/// Generative rewriting of legal prose into plain language.
///
/// Bounded to at most 100 generated tokens, greedy decoding — repeated calls
/// on identical input return identical output.
pub trait Simplification: Send + Sync {
    fn simplify(&self, text: &str) -> anyhow::Result<String>;
}

/// Grouped named-entity recognition: adjacent tokens of the same entity type
/// are merged into one reported span, in source order.
pub trait EntityRecognition: Send + Sync {
    fn entities(&self, text: &str) -> anyhow::Result<Vec<Entity>>;
}

/// Zero-shot classification of text against caller-supplied labels.
pub trait ZeroShotClassification: Send + Sync {
    fn classify(&self, text: &str, labels: &[&str]) -> anyhow::Result<Vec<LabelScore>>;
}
