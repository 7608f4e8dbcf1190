//! Route handlers: rule-based feedback classification and LLM action reports.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use bloom_core::{generate_action_report, process_batch, ActionReport, FeedbackResult};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ProcessFeedbackRequest {
    #[serde(default)]
    pub feedbacks: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcessFeedbackResponse {
    pub results: Vec<FeedbackResult>,
}

pub async fn health() -> &'static str {
    "OK"
}

/// POST /process_feedback: one keyword-rule result per feedback string, in input order.
pub async fn process_feedback(
    Json(body): Json<ProcessFeedbackRequest>,
) -> Json<ProcessFeedbackResponse> {
    let results = process_batch(&body.feedbacks);
    tracing::info!("[FEEDBACK] Classified {} feedback item(s)", results.len());
    Json(ProcessFeedbackResponse { results })
}

/// POST /generate_report: raw JSON body -> summary, report and action plan from the completion model.
/// Undecodable JSON is the caller's fault (400); a failing model is upstream's (502).
pub async fn generate_report(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<ActionReport>, (StatusCode, String)> {
    generate_action_report(&body, state.model.as_ref())
        .await
        .map(Json)
        .map_err(|e| {
            if e.is_client_error() {
                (StatusCode::BAD_REQUEST, e.to_string())
            } else {
                tracing::error!("[REPORT] {}", e);
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
        })
}
