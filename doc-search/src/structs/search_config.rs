//! Configuration layer: reads search settings from environment variables.

use serde::{Deserialize, Serialize};

use crate::errors::search_error::SearchError;

/// Upper bound on hits requested per search.
pub const MAX_RESULT_SIZE: usize = 10;

/// Connection and query-shape settings for the annotations index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the cluster (e.g. "https://my-deployment.es.io:443").
    pub es_url: String,
    /// Optional API key sent as `Authorization: ApiKey <key>`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Index to query.
    pub index: String,
    /// Text-expansion model id.
    pub model_id: String,
    /// Field holding the expanded token weights.
    pub expansion_field: String,
    /// Number of hits requested.
    pub size: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            es_url: "http://localhost:9200".to_string(),
            api_key: None,
            index: "annotations".to_string(),
            model_id: ".elser_model_2_linux-x86_64".to_string(),
            expansion_field: "content_embedding".to_string(),
            size: 10,
            timeout_secs: 30,
        }
    }
}

impl SearchConfig {
    /// Build configuration from environment variables.
    ///
    /// Environment variables used:
    /// - `ES_URL` (required)
    /// - `ES_API_KEY` (optional)
    /// - `ES_INDEX` (default: "annotations")
    /// - `ES_MODEL_ID` (default: ".elser_model_2_linux-x86_64")
    /// - `ES_EXPANSION_FIELD` (default: "content_embedding")
    /// - `ES_RESULT_SIZE` (default: 10, at most [`MAX_RESULT_SIZE`])
    /// - `ES_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, SearchError> {
        let defaults = Self::default();

        let es_url = read_string_env("ES_URL")?;
        if !(es_url.starts_with("http://") || es_url.starts_with("https://")) {
            return Err(SearchError::InvalidConfig(
                "ES_URL must start with http:// or https://".into(),
            ));
        }

        let cfg = Self {
            es_url: es_url.trim_end_matches('/').to_string(),
            api_key: read_string_env("ES_API_KEY").ok(),
            index: read_string_env("ES_INDEX").unwrap_or(defaults.index),
            model_id: read_string_env("ES_MODEL_ID").unwrap_or(defaults.model_id),
            expansion_field: read_string_env("ES_EXPANSION_FIELD")
                .unwrap_or(defaults.expansion_field),
            size: optional(read_usize_env("ES_RESULT_SIZE"))?.unwrap_or(defaults.size),
            timeout_secs: optional(read_usize_env("ES_TIMEOUT_SECS"))?
                .map(|v| v as u64)
                .unwrap_or(defaults.timeout_secs),
        };

        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks value ranges that the environment parser cannot express.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.size == 0 || self.size > MAX_RESULT_SIZE {
            return Err(SearchError::InvalidConfig(format!(
                "ES_RESULT_SIZE must be in 1..={MAX_RESULT_SIZE}, got {}",
                self.size
            )));
        }
        Ok(())
    }
}

/// Read a non-empty string from env.
fn read_string_env(key: &str) -> Result<String, SearchError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(SearchError::EnvMissing { key: key.into() }),
    }
}

/// Read a `usize` from env, with error mapped to `SearchError`.
fn read_usize_env(key: &str) -> Result<usize, SearchError> {
    let v = read_string_env(key)?;
    v.trim().parse::<usize>().map_err(|_| SearchError::EnvParse {
        key: key.into(),
        value: v,
    })
}

/// Treat a missing variable as `None`, keep parse errors.
fn optional<T>(r: Result<T, SearchError>) -> Result<Option<T>, SearchError> {
    match r {
        Ok(v) => Ok(Some(v)),
        Err(SearchError::EnvMissing { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_annotations_index() {
        let cfg = SearchConfig::default();
        assert_eq!(cfg.index, "annotations");
        assert_eq!(cfg.size, 10);
        assert_eq!(cfg.expansion_field, "content_embedding");
    }

    #[test]
    fn result_size_is_capped_at_ten() {
        let ok = SearchConfig {
            size: MAX_RESULT_SIZE,
            ..SearchConfig::default()
        };
        assert!(ok.validate().is_ok());

        for size in [0, 11, 50] {
            let cfg = SearchConfig {
                size,
                ..SearchConfig::default()
            };
            assert!(
                matches!(cfg.validate(), Err(SearchError::InvalidConfig(_))),
                "size {size} accepted"
            );
        }
    }

    #[test]
    fn optional_keeps_parse_errors() {
        let missing: Result<usize, _> = Err(SearchError::EnvMissing { key: "X".into() });
        assert!(matches!(optional(missing), Ok(None)));

        let bad: Result<usize, _> = Err(SearchError::EnvParse {
            key: "X".into(),
            value: "ten".into(),
        });
        assert!(optional(bad).is_err());
    }
}
