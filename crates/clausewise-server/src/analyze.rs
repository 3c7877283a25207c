//! The document analysis pipeline.
//!
//! One submission runs extract → split → (QA) → simplify → NER → classify
//! synchronously. Any failure stops the pipeline at that step; sections
//! produced before the failure stay in the report alongside the error, so
//! the page shows partial results rather than rolling back.

use clausewise_ai::{Entity, LabelScore, QueryAnswer};
use clausewise_core::{CANDIDATE_LABELS, CLAUSE_DISPLAY_LIMIT, SIMPLIFY_LIMIT, split_clauses};
use clausewise_extract::extract_text;
use tracing::warn;

use crate::state::Inference;

/// Everything one document submission produced, in render order.
#[derive(Debug, Default)]
pub struct AnalysisReport {
    /// The user's question, echoed back when one was asked.
    pub query: Option<String>,
    pub answer: Option<QueryAnswer>,
    /// First clauses of the breakdown section; `None` until that stage runs.
    pub clauses: Option<Vec<String>>,
    pub simplified: Option<Vec<String>>,
    pub entities: Option<Vec<Entity>>,
    pub classification: Option<Vec<LabelScore>>,
    /// Set when the pipeline aborted; earlier sections remain valid.
    pub error: Option<String>,
}

impl AnalysisReport {
    fn abort(mut self, stage: &str, err: impl std::fmt::Display) -> Self {
        warn!(stage, error = %err, "analysis aborted");
        self.error = Some(format!("An error occurred: {err}"));
        self
    }
}

/// Analyse one uploaded document. Blocking: model inference runs inline, so
/// call this from a blocking task.
pub fn run_analysis(
    inference: &Inference,
    bytes: &[u8],
    file_name: &str,
    query: &str,
) -> AnalysisReport {
    let mut report = AnalysisReport::default();

    let text = match extract_text(bytes, file_name) {
        Ok(text) => text,
        Err(e) => return report.abort("extract", e),
    };

    // Document-grounded QA runs first, and only when a question was asked.
    let query = query.trim();
    if !query.is_empty() {
        report.query = Some(query.to_string());
        match inference.qa.answer(query, &text) {
            Ok(answer) => report.answer = Some(answer),
            Err(e) => return report.abort("qa", e),
        }
    }

    let clauses = split_clauses(&text);
    report.clauses = Some(
        clauses
            .iter()
            .take(CLAUSE_DISPLAY_LIMIT)
            .map(|c| c.to_string())
            .collect(),
    );

    let mut simplified = Vec::new();
    for clause in clauses.iter().take(SIMPLIFY_LIMIT) {
        match inference.simplifier.simplify(clause) {
            Ok(simple) => simplified.push(simple),
            Err(e) => {
                report.simplified = Some(simplified);
                return report.abort("simplify", e);
            }
        }
    }
    report.simplified = Some(simplified);

    match inference.ner.entities(&text) {
        Ok(entities) => report.entities = Some(entities),
        Err(e) => return report.abort("ner", e),
    }

    match inference.classifier.classify(&text, CANDIDATE_LABELS) {
        Ok(scores) => report.classification = Some(scores),
        Err(e) => return report.abort("classify", e),
    }

    report
}
