//! HTTP routes and handlers.
//!
//! Every form posts back to the same page; handlers resolve the session,
//! run their step, and re-render the whole page. Inference runs on the
//! blocking pool — model calls are CPU-bound and each submission is one
//! synchronous sequence with no internal parallelism.

use axum::extract::{DefaultBodyLimit, Form, Multipart, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use clausewise_core::{DEFAULT_LEGAL_CONTEXT, FALLBACK_ANSWER};
use serde::{Deserialize, Serialize};
use tokio::task;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::analyze::run_analysis;
use crate::error::ServerError;
use crate::page::render_page;
use crate::state::AppState;

const MISSING_FILE_WARNING: &str = "Please upload a legal document to proceed.";

/// Uploads above this size are rejected outright.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze))
        .route("/chat", post(chat))
        .route("/logo", post(logo))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "clausewise",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let id = state.sessions.resolve(None).await;
    let session = state.sessions.view(id).await;
    Html(render_page(id, &session, None, None))
}

/// POST /analyze — multipart `document` + `query` + `session`.
async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, ServerError> {
    let mut session_field: Option<String> = None;
    let mut query = String::new();
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "session" => session_field = Some(field.text().await?),
            "query" => query = field.text().await?,
            "document" => {
                // Browsers send an empty part when no file was chosen.
                let file_name = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await?;
                if bytes.len() > MAX_UPLOAD_BYTES {
                    return Err(ServerError::InvalidRequest("upload too large".into()));
                }
                if !file_name.is_empty() {
                    file = Some((file_name, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }

    let id = state.sessions.resolve(session_field.as_deref()).await;
    let session = state.sessions.view(id).await;

    let Some((file_name, bytes)) = file else {
        return Ok(Html(render_page(
            id,
            &session,
            None,
            Some(MISSING_FILE_WARNING),
        )));
    };

    let inference = state.inference.clone();
    let report =
        task::spawn_blocking(move || run_analysis(&inference, &bytes, &file_name, &query)).await?;

    Ok(Html(render_page(id, &session, Some(&report), None)))
}

#[derive(Deserialize)]
struct ChatForm {
    session: Option<String>,
    message: Option<String>,
}

/// POST /chat — general legal chat against the fixed context paragraph,
/// never against an uploaded document.
async fn chat(
    State(state): State<AppState>,
    Form(form): Form<ChatForm>,
) -> Result<Html<String>, ServerError> {
    let id = state.sessions.resolve(form.session.as_deref()).await;
    let message = form.message.unwrap_or_default().trim().to_string();

    if !message.is_empty() {
        let qa = state.inference.qa.clone();
        let question = message.clone();
        let answer = match task::spawn_blocking(move || {
            qa.answer(&question, DEFAULT_LEGAL_CONTEXT)
        })
        .await
        {
            Ok(Ok(answer)) => answer.text.trim().to_string(),
            Ok(Err(e)) => {
                warn!(error = %e, "chat inference failed");
                FALLBACK_ANSWER.to_string()
            }
            Err(e) => {
                warn!(error = %e, "chat task failed");
                FALLBACK_ANSWER.to_string()
            }
        };
        state.sessions.push_chat_turn(id, &message, &answer).await;
    }

    let session = state.sessions.view(id).await;
    Ok(Html(render_page(id, &session, None, None)))
}

/// POST /logo — cosmetic per-session logo, stored as a data URI.
async fn logo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, ServerError> {
    let mut session_field: Option<String> = None;
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "session" => session_field = Some(field.text().await?),
            "logo" => {
                let file_name = field.file_name().unwrap_or("").to_lowercase();
                let bytes = field.bytes().await?;
                if bytes.len() > MAX_UPLOAD_BYTES {
                    return Err(ServerError::InvalidRequest("upload too large".into()));
                }
                if !file_name.is_empty() && !bytes.is_empty() {
                    image = Some((file_name, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }

    let id = state.sessions.resolve(session_field.as_deref()).await;

    if let Some((file_name, bytes)) = image {
        let mime = match file_name.rsplit('.').next() {
            Some("png") => Some("image/png"),
            Some("jpg") | Some("jpeg") => Some("image/jpeg"),
            _ => None,
        };
        match mime {
            Some(mime) => {
                let uri = format!("data:{mime};base64,{}", BASE64.encode(&bytes));
                state.sessions.set_logo(id, uri).await;
            }
            None => warn!(file = %file_name, "ignoring logo with unsupported extension"),
        }
    }

    let session = state.sessions.view(id).await;
    Ok(Html(render_page(id, &session, None, None)))
}
