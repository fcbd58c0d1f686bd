//! Generative model platform client.
//!
//! - [`VertexService`] resolves a supervised tuning job to its deployed
//!   endpoint and calls `generateContent` on it.
//! - [`credentials`] loads the service identity from the secret store or a
//!   key file at startup.
//! - [`telemetry`] provides the tracing layer shared by the whole service.

pub mod config;
pub mod credentials;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use config::default_config::config_vertex_tuned;
pub use config::llm_model_config::LlmModelConfig;
pub use credentials::{CredentialSource, Credentials, load_credentials};
pub use error_handler::{AiLlmError, ConfigError, ProviderError, SecretError};
pub use services::vertex_service::{TunedModel, VertexService};
