use ai_llm_service::AiLlmError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use composer::ComposerError;
use doc_search::SearchError;
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error(transparent)]
    Composer(#[from] ComposerError),

    // --- IO / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("User input is required.")]
    MissingInput,

    #[error("{0}")]
    BadRequest(String),

    // --- Pipeline ---
    #[error("Error occurred while searching Elasticsearch.")]
    RetrievalFailed,

    #[error("Error occurred while generating model output.")]
    GenerationFailed(#[source] ComposerError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::MissingInput | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,

            // 5xx
            AppError::RetrievalFailed | AppError::GenerationFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // startup-only
            AppError::Config(_)
            | AppError::Search(_)
            | AppError::Llm(_)
            | AppError::Composer(_)
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Flat error body: `{"error": "<message>"}`.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_errors_are_client_errors() {
        assert_eq!(AppError::MissingInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::BadRequest("bad json".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn pipeline_errors_carry_fixed_messages() {
        assert_eq!(
            AppError::RetrievalFailed.to_string(),
            "Error occurred while searching Elasticsearch."
        );
        let timeout = AiLlmError::Timeout(std::time::Duration::from_secs(1));
        let gen_err = AppError::GenerationFailed(ComposerError::Generation(timeout));
        assert_eq!(gen_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            gen_err.to_string(),
            "Error occurred while generating model output."
        );
    }
}
