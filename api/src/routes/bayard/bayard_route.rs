//! POST /api/bayard: retrieval-augmented answer for one query.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use chrono::Utc;
use composer::compose_answer;
use doc_search::retrieve_documents;
use tracing::{debug, error, info};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::bayard::bayard_request::{BayardRequest, BayardResponse},
};

/// Handler: POST /api/bayard
///
/// Validates the input, then runs search and composition in sequence. Input
/// validation happens before any outbound call.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/bayard \
///   -H 'content-type: application/json' \
///   -d '{"input_text":"queer theory in literature"}'
/// ```
pub async fn bayard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<BayardRequest>, JsonRejection>,
) -> AppResult<Json<BayardResponse>> {
    let Json(body) = payload?;
    let input = body
        .input_text
        .filter(|s| !s.is_empty())
        .ok_or(AppError::MissingInput)?;

    let request_id = request_id(&headers);
    info!(request_id = %request_id, input_text = %input, "bayard: received input");

    let docs = retrieve_documents(state.search.as_ref(), &input)
        .await
        .ok_or(AppError::RetrievalFailed)?;

    debug!(
        request_id = %request_id,
        titles = ?docs.iter().map(|d| d.title.as_str()).collect::<Vec<_>>(),
        "bayard: filtered documents"
    );

    let answer = compose_answer(state.generator.as_ref(), &input, &docs, &state.composer)
        .await
        .map_err(|err| {
            error!(request_id = %request_id, error = %err, "bayard: generation failed");
            AppError::GenerationFailed(err)
        })?;

    info!(
        request_id = %request_id,
        documents = docs.len(),
        prompt_documents = answer.prompt_documents,
        "bayard: answered"
    );
    debug!(request_id = %request_id, model_output = %answer.formatted, "bayard: output");

    Ok(Json(BayardResponse {
        model_output: answer.formatted,
    }))
}

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            let nanos = Utc::now()
                .timestamp_nanos_opt()
                .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
            format!("req-{nanos}")
        })
}
