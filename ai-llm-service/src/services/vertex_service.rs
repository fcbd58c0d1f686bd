//! Vertex AI service for tuned-model text generation.
//!
//! Minimal, non-streaming client around the Vertex AI REST API. URLs are
//! derived from [`LlmModelConfig::api_base`]:
//! - GET  {base}/v1/projects/{p}/locations/{l}/tuningJobs/{id}  tuning job lookup
//! - POST {base}/v1/{endpoint}:generateContent                   text generation
//!
//! The tuning job is looked up on every call to [`VertexService::tuned_model`];
//! nothing is cached between requests.
//!
//! # Examples
//!
//! ```no_run
//! use ai_llm_service::{Credentials, LlmModelConfig, VertexService};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = LlmModelConfig {
//!     project_id: "my-project".into(),
//!     location: "us-central1".into(),
//!     tuning_job_id: "42".into(),
//!     api_base: "https://us-central1-aiplatform.googleapis.com".into(),
//!     access_token: None,
//!     max_output_tokens: None,
//!     temperature: None,
//!     top_p: None,
//!     timeout_secs: Some(120),
//! };
//! let svc = VertexService::new(cfg, &Credentials::default())?;
//! let model = svc.tuned_model("You are terse.").await?;
//! println!("{}", model.generate_content("Hello").await?);
//! # Ok(()) }
//! ```

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    config::llm_model_config::LlmModelConfig,
    credentials::Credentials,
    error_handler::{AiLlmError, HttpError, ProviderError, make_snippet},
};

/// Thin client for the Vertex AI REST API.
///
/// Keeps a preconfigured `reqwest::Client` (timeout and auth header).
#[derive(Debug)]
pub struct VertexService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_tuning_job: String,
    timeout: Duration,
}

/// A generative model bound to a deployed endpoint and a system instruction.
#[derive(Debug)]
pub struct TunedModel<'a> {
    svc: &'a VertexService,
    endpoint: String,
    system_instruction: String,
}

impl VertexService {
    /// Creates a new [`VertexService`].
    ///
    /// The bearer token comes from `cfg.access_token`, falling back to the
    /// process-wide credentials.
    ///
    /// # Errors
    /// - [`ProviderError::Decode`] if the token cannot be used as a header value
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig, credentials: &Credentials) -> Result<Self, AiLlmError> {
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(120));

        let mut headers = header::HeaderMap::new();
        if let Some(token) = cfg.access_token.as_ref().or(credentials.access_token.as_ref()) {
            let value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ProviderError::Decode(format!("invalid access token header: {e}")))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = cfg.api_base.trim_end_matches('/').to_string();
        let url_tuning_job = format!("{base}/v1/{}", cfg.tuning_job_name());

        info!(
            project = %cfg.project_id,
            location = %cfg.location,
            tuning_job = %cfg.tuning_job_id,
            timeout_secs = timeout.as_secs(),
            "VertexService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_tuning_job,
            timeout,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> AiLlmError {
        if e.is_timeout() {
            AiLlmError::Timeout(self.timeout)
        } else {
            AiLlmError::HttpTransport(e)
        }
    }

    /// Looks up the tuning job and returns its deployed endpoint resource name.
    ///
    /// # Errors
    /// - [`ProviderError::HttpStatus`] for non-2xx responses
    /// - [`ProviderError::Decode`] if the body is not a tuning job
    /// - [`ProviderError::MissingTunedEndpoint`] if the job has no endpoint yet
    #[instrument(skip_all, fields(tuning_job = %self.cfg.tuning_job_id))]
    pub async fn resolve_tuned_endpoint(&self) -> Result<String, AiLlmError> {
        debug!("GET {}", self.url_tuning_job);
        let resp = self
            .client
            .get(&self.url_tuning_job)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::HttpStatus(HttpError {
                status,
                url: self.url_tuning_job.clone(),
                snippet: make_snippet(&text),
            })
            .into());
        }

        let job: TuningJob = resp.json().await.map_err(|e| {
            ProviderError::Decode(format!("serde error: {e}; expected `tunedModel.endpoint`"))
        })?;

        job.tuned_model
            .and_then(|m| m.endpoint)
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingTunedEndpoint(self.cfg.tuning_job_name()).into())
    }

    /// Resolves the tuned endpoint and binds it to `system_instruction`.
    pub async fn tuned_model(&self, system_instruction: &str) -> Result<TunedModel<'_>, AiLlmError> {
        let endpoint = self.resolve_tuned_endpoint().await?;
        info!(%endpoint, "resolved tuned model endpoint");
        Ok(TunedModel {
            svc: self,
            endpoint,
            system_instruction: system_instruction.to_string(),
        })
    }

    /// Performs a **non-streaming** `generateContent` call on `endpoint`.
    ///
    /// # Errors
    /// - [`ProviderError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - [`AiLlmError::Timeout`] if the call exceeds the client timeout
    /// - [`ProviderError::Decode`] if the JSON cannot be parsed
    /// - [`ProviderError::EmptyCandidates`] if no text is returned
    pub async fn generate(
        &self,
        endpoint: &str,
        system: Option<&str>,
        prompt: &str,
    ) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let url = format!(
            "{}/v1/{}:generateContent",
            self.cfg.api_base.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        let body = GenerateContentRequest::from_cfg(&self.cfg, prompt, system);

        debug!(
            prompt_len = prompt.len(),
            has_system = system.is_some(),
            "POST {}", url
        );

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "generateContent returned non-success status"
            );

            return Err(ProviderError::HttpStatus(HttpError {
                status,
                url,
                snippet,
            })
            .into());
        }

        let out: GenerateContentResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode generateContent response"
                );
                return Err(ProviderError::Decode(format!(
                    "serde error: {e}; expected `candidates[0].content.parts[].text`"
                ))
                .into());
            }
        };

        let text = out.first_text().ok_or(ProviderError::EmptyCandidates)?;

        info!(
            latency_ms = started.elapsed().as_millis(),
            output_len = text.len(),
            "generateContent completed"
        );

        Ok(text)
    }
}

impl TunedModel<'_> {
    /// Endpoint resource name this model is bound to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Generates text for `prompt` with the bound system instruction.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, AiLlmError> {
        self.svc
            .generate(&self.endpoint, Some(&self.system_instruction), prompt)
            .await
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TuningJob {
    #[serde(default)]
    tuned_model: Option<TunedModelRef>,
}

#[derive(Debug, Deserialize)]
struct TunedModelRef {
    #[serde(default)]
    endpoint: Option<String>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_cfg(cfg: &LlmModelConfig, prompt: &'a str, system: Option<&'a str>) -> Self {
        let generation_config = if cfg.max_output_tokens.is_some()
            || cfg.temperature.is_some()
            || cfg.top_p.is_some()
        {
            Some(GenerationConfig {
                max_output_tokens: cfg.max_output_tokens,
                temperature: cfg.temperature,
                top_p: cfg.top_p,
            })
        } else {
            None
        };

        Self {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: system.map(|s| Content {
                role: None,
                parts: vec![Part { text: s }],
            }),
            generation_config,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate that has any.
    fn first_text(self) -> Option<String> {
        self.candidates.into_iter().find_map(|c| {
            let parts = c.content?.parts;
            let text: String = parts.into_iter().filter_map(|p| p.text).collect();
            (!text.is_empty()).then_some(text)
        })
    }
}
