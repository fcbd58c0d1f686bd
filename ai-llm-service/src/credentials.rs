//! Credential resolution: secret store, key file and bearer token.
//!
//! Credentials are resolved once at process start. Failures never abort the
//! process: they are logged and the returned [`Credentials`] is simply
//! incomplete, so later calls to the model platform fail on their own.
//!
//! - `SECRET_URI` → `GET {SECRET_MANAGER_API_BASE}/v1/{SECRET_URI}:access`,
//!   `payload.data` is base64 of a service-account key JSON.
//! - `KEY_PATH`   → the same key JSON read from disk.
//! - `GOOGLE_ACCESS_TOKEN` → bearer token used for every outbound call.

use std::{path::PathBuf, time::Duration};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error_handler::{AiLlmError, HttpError, SecretError, make_snippet, opt_env};

const DEFAULT_SECRET_API_BASE: &str = "https://secretmanager.googleapis.com";

/// Subset of a service-account key file that this service reads.
///
/// Only the project and the identity are kept; key material is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServiceAccountKey {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
}

impl ServiceAccountKey {
    /// Parses a key from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, SecretError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Process-wide credentials, immutable after startup.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Bearer token attached to outbound requests.
    pub access_token: Option<String>,
    /// Service-account identity, when one could be loaded.
    pub service_account: Option<ServiceAccountKey>,
}

impl Credentials {
    /// Project id carried by the service-account key, if any.
    pub fn project_id(&self) -> Option<&str> {
        self.service_account
            .as_ref()
            .and_then(|k| k.project_id.as_deref())
    }
}

/// Where credentials may come from.
#[derive(Debug, Clone, Default)]
pub struct CredentialSource {
    pub secret_uri: Option<String>,
    pub secret_api_base: String,
    pub key_path: Option<PathBuf>,
    pub access_token: Option<String>,
}

impl CredentialSource {
    /// Reads `SECRET_URI`, `SECRET_MANAGER_API_BASE`, `KEY_PATH`, `GOOGLE_ACCESS_TOKEN`.
    pub fn from_env() -> Self {
        Self {
            secret_uri: opt_env("SECRET_URI"),
            secret_api_base: opt_env("SECRET_MANAGER_API_BASE")
                .unwrap_or_else(|| DEFAULT_SECRET_API_BASE.to_string()),
            key_path: opt_env("KEY_PATH").map(PathBuf::from),
            access_token: opt_env("GOOGLE_ACCESS_TOKEN"),
        }
    }
}

/// Minimal client for the secret store `:access` call.
pub struct SecretStore {
    client: reqwest::Client,
    base: String,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccessSecretResponse {
    payload: SecretPayload,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    data: String,
}

impl SecretStore {
    /// Builds a client for `base` (e.g. `https://secretmanager.googleapis.com`).
    pub fn new(base: &str, access_token: Option<String>) -> Result<Self, AiLlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    /// Accesses a secret version by resource name and returns its UTF-8 payload.
    ///
    /// # Errors
    /// - [`SecretError::HttpStatus`] for non-2xx responses
    /// - [`SecretError::Payload`] if the payload is not base64 UTF-8 text
    /// - [`AiLlmError::HttpTransport`] for network failures
    pub async fn access(&self, secret_uri: &str) -> Result<String, AiLlmError> {
        let url = format!("{}/v1/{}:access", self.base, secret_uri.trim_start_matches('/'));
        debug!("GET {}", url);

        let mut req = self.client.get(&url);
        if let Some(token) = &self.access_token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(SecretError::HttpStatus(HttpError {
                status,
                url,
                snippet: make_snippet(&text),
            })
            .into());
        }

        let body: AccessSecretResponse = resp
            .json()
            .await
            .map_err(|e| SecretError::Payload(format!("unexpected response shape: {e}")))?;
        decode_payload(&body.payload.data).map_err(AiLlmError::from)
    }
}

/// Decodes a base64 secret payload into text.
fn decode_payload(data: &str) -> Result<String, SecretError> {
    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| SecretError::Payload(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SecretError::Payload(e.to_string()))
}

/// Resolves credentials from all configured sources.
///
/// Order: key from the secret store, then key from `KEY_PATH`. Every failure
/// is logged and skipped.
pub async fn load_credentials(source: &CredentialSource) -> Credentials {
    let mut creds = Credentials {
        access_token: source.access_token.clone(),
        service_account: None,
    };

    if let Some(uri) = &source.secret_uri {
        match fetch_key_from_secret(source, uri).await {
            Ok(key) => {
                info!(
                    client_email = key.client_email.as_deref().unwrap_or("-"),
                    "loaded service account key from secret store"
                );
                creds.service_account = Some(key);
            }
            Err(e) => warn!(error = %e, "could not load credentials from secret store"),
        }
    } else {
        warn!("SECRET_URI is not set; skipping secret store credentials");
    }

    if creds.service_account.is_none() {
        if let Some(path) = &source.key_path {
            match read_key_file(path).await {
                Ok(key) => {
                    info!(path = %path.display(), "loaded service account key from file");
                    creds.service_account = Some(key);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "could not read key file"),
            }
        }
    }

    if creds.access_token.is_none() {
        warn!("GOOGLE_ACCESS_TOKEN is not set; model platform calls are sent unauthenticated");
    }

    creds
}

async fn fetch_key_from_secret(
    source: &CredentialSource,
    uri: &str,
) -> Result<ServiceAccountKey, AiLlmError> {
    let store = SecretStore::new(&source.secret_api_base, source.access_token.clone())?;
    let text = store.access(uri).await?;
    Ok(ServiceAccountKey::from_json(&text)?)
}

async fn read_key_file(path: &PathBuf) -> Result<ServiceAccountKey, SecretError> {
    let text = tokio::fs::read_to_string(path).await?;
    ServiceAccountKey::from_json(&text)
}
