//! Shared application state: the four inference capabilities loaded at
//! startup, plus the per-session store.

use std::sync::Arc;

use clausewise_ai::{EntityRecognition, QuestionAnswering, Simplification, ZeroShotClassification};

use crate::session::SessionStore;

/// The four pre-trained capabilities, loaded once per process and shared by
/// every request. Each implementation serialises its own model access, so
/// the bundle is freely cloneable across handlers.
#[derive(Clone)]
pub struct Inference {
    pub qa: Arc<dyn QuestionAnswering>,
    pub simplifier: Arc<dyn Simplification>,
    pub ner: Arc<dyn EntityRecognition>,
    pub classifier: Arc<dyn ZeroShotClassification>,
}

#[derive(Clone)]
pub struct AppState {
    pub inference: Inference,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(inference: Inference) -> Self {
        Self {
            inference,
            sessions: SessionStore::default(),
        }
    }
}
