//! Unified error type for the doc-search crate.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced while configuring or querying the search index.
#[derive(Debug, Error)]
pub enum SearchError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Required environment variable is missing.
    #[error("missing env variable: {key}")]
    EnvMissing { key: String },

    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration combination is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Transport ───────────────────────────────────────────────────────────
    /// Network / client error while talking to the index.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The index answered with a non-successful status.
    #[error("HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    // ── Payload ─────────────────────────────────────────────────────────────
    /// Response body did not have the expected `hits.hits` shape.
    #[error("decode error: {0}")]
    Decode(String),
}
