pub mod chat;
pub mod clause;

pub use chat::{ChatMessage, DEFAULT_LEGAL_CONTEXT, FALLBACK_ANSWER, Speaker, Transcript};
pub use clause::{CLAUSE_DISPLAY_LIMIT, MIN_CLAUSE_CHARS, SIMPLIFY_LIMIT, split_clauses};

/// Candidate document-type labels scored by zero-shot classification.
///
/// Fixed at build time; classification scores each label independently and
/// does not force the set to be mutually exclusive.
pub const CANDIDATE_LABELS: &[&str] = &["NDA", "lease", "employment contract", "service agreement"];
