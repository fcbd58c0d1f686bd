use std::sync::Arc;

use ai_llm_service::{CredentialSource, VertexService, config_vertex_tuned, load_credentials};
use composer::{ComposerConfig, TextGenerator};
use doc_search::{DocumentSearch, ElasticClient, SearchConfig};
use tracing::info;

use crate::error_handler::AppError;

const DEFAULT_PORT: u16 = 8080;

/// Shared state for all HTTP handlers.
///
/// Built once before the listener accepts traffic; read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Ranked search against the annotations index.
    pub search: Arc<dyn DocumentSearch>,
    /// Tuned-model text generation.
    pub generator: Arc<dyn TextGenerator>,
    /// Prompt budget knobs.
    pub composer: ComposerConfig,
}

impl AppState {
    pub fn new(
        search: Arc<dyn DocumentSearch>,
        generator: Arc<dyn TextGenerator>,
        composer: ComposerConfig,
    ) -> Self {
        Self {
            search,
            generator,
            composer,
        }
    }

    /// Load shared state from environment variables.
    ///
    /// Credential problems are logged and tolerated; missing search or model
    /// configuration fails startup.
    pub async fn from_env() -> Result<Self, AppError> {
        let search = ElasticClient::new(SearchConfig::from_env()?)?;

        let credentials = load_credentials(&CredentialSource::from_env()).await;
        let llm_cfg = config_vertex_tuned(credentials.project_id())?;
        let generator = VertexService::new(llm_cfg, &credentials)?;

        let composer = ComposerConfig::from_env()?;
        info!(
            max_hits = composer.max_hits,
            max_tokens = composer.max_tokens,
            "composer configured"
        );

        Ok(Self::new(Arc::new(search), Arc::new(generator), composer))
    }
}

/// Listener address `0.0.0.0:{PORT}`.
pub fn bind_address() -> Result<String, AppError> {
    let port = parse_port(std::env::var("PORT").ok().as_deref())?;
    Ok(format!("0.0.0.0:{port}"))
}

fn parse_port(raw: Option<&str>) -> Result<u16, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(DEFAULT_PORT),
        Some(s) => s
            .parse()
            .map_err(|_| AppError::Config(format!("PORT must be a port number, got `{s}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_to_8080() {
        assert_eq!(parse_port(None).unwrap(), 8080);
        assert_eq!(parse_port(Some("  ")).unwrap(), 8080);
    }

    #[test]
    fn port_is_parsed_or_rejected() {
        assert_eq!(parse_port(Some("9000")).unwrap(), 9000);
        assert!(matches!(parse_port(Some("http")), Err(AppError::Config(_))));
        assert!(parse_port(Some("70000")).is_err());
    }
}
