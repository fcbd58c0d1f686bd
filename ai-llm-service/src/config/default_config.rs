//! Default model config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `PROJECT_ID`        = cloud project (required unless supplied by credentials)
//! - `LOCATION`          = region of the tuning job (required)
//! - `TUNING_JOB_ID`     = supervised tuning job id (required)
//! - `VERTEX_API_BASE`   = REST base (optional, defaults to the regional host)
//! - `GOOGLE_ACCESS_TOKEN` = bearer token (optional)
//! - `LLM_MAX_TOKENS`    = optional `maxOutputTokens` (u32)
//! - `LLM_TEMPERATURE`   = optional temperature, `0.0..=2.0`
//! - `LLM_TOP_P`         = optional top-p, `0.0..=1.0`
//! - `LLM_TIMEOUT_SECS`  = request timeout (default 120)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, ConfigError, env_opt_f32, env_opt_u32, must_env, opt_env,
        validate_http_endpoint, validate_range_f32,
    },
};

/// Constructs the config for the tuned model.
///
/// `fallback_project` is used when `PROJECT_ID` is unset, typically the
/// `project_id` of the loaded service-account key.
///
/// # Errors
/// - [`ConfigError::MissingVar`] for missing `LOCATION`/`TUNING_JOB_ID`/`PROJECT_ID`
/// - [`ConfigError::InvalidNumber`] / [`ConfigError::OutOfRange`] for bad knobs
/// - [`ConfigError::InvalidFormat`] if `VERTEX_API_BASE` has no http(s) scheme
pub fn config_vertex_tuned(fallback_project: Option<&str>) -> Result<LlmModelConfig, AiLlmError> {
    let project_id = match opt_env("PROJECT_ID") {
        Some(p) => p,
        None => fallback_project
            .map(str::to_string)
            .ok_or(ConfigError::MissingVar("PROJECT_ID"))?,
    };
    let location = must_env("LOCATION")?;
    let tuning_job_id = must_env("TUNING_JOB_ID")?;

    let api_base = opt_env("VERTEX_API_BASE")
        .unwrap_or_else(|| LlmModelConfig::default_api_base(&location))
        .trim_end_matches('/')
        .to_string();
    validate_http_endpoint("VERTEX_API_BASE", &api_base)?;

    let temperature = env_opt_f32("LLM_TEMPERATURE")?;
    if let Some(t) = temperature {
        validate_range_f32("temperature", t, 0.0, 2.0)?;
    }
    let top_p = env_opt_f32("LLM_TOP_P")?;
    if let Some(p) = top_p {
        validate_range_f32("top_p", p, 0.0, 1.0)?;
    }

    let timeout_secs = env_opt_u32("LLM_TIMEOUT_SECS")?.map(u64::from).or(Some(120));

    Ok(LlmModelConfig {
        project_id,
        location,
        tuning_job_id,
        api_base,
        access_token: opt_env("GOOGLE_ACCESS_TOKEN"),
        max_output_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature,
        top_p,
        timeout_secs,
    })
}
