/// Configuration for the tuned Vertex AI model invocation.
///
/// The tuning job is referenced only by id; its deployed endpoint is resolved
/// through the tuning-job registry before each generation.
///
/// # Fields
///
/// - `project_id`, `location`, `tuning_job_id`: identify the tuning job.
/// - `api_base`: REST base URL (regional `aiplatform.googleapis.com` host).
/// - `access_token`: optional bearer token sent with every request.
/// - `max_output_tokens`: maximum number of tokens to generate.
/// - `temperature`, `top_p`: sampling knobs forwarded as `generationConfig`.
/// - `timeout_secs`: optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_model_config::LlmModelConfig;
///
/// let cfg = LlmModelConfig {
///     project_id: "my-project".into(),
///     location: "us-central1".into(),
///     tuning_job_id: "1234567890".into(),
///     api_base: "https://us-central1-aiplatform.googleapis.com".into(),
///     access_token: None,
///     max_output_tokens: Some(2048),
///     temperature: None,
///     top_p: None,
///     timeout_secs: Some(120),
/// };
/// assert!(cfg.tuning_job_name().ends_with("/tuningJobs/1234567890"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Cloud project that owns the tuning job.
    pub project_id: String,

    /// Region of the tuning job and its endpoint (e.g. `us-central1`).
    pub location: String,

    /// Identifier of a completed supervised tuning job.
    pub tuning_job_id: String,

    /// REST base URL without trailing slash.
    pub api_base: String,

    /// Optional OAuth bearer token.
    pub access_token: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_output_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Full resource name of the tuning job.
    pub fn tuning_job_name(&self) -> String {
        format!(
            "projects/{}/locations/{}/tuningJobs/{}",
            self.project_id, self.location, self.tuning_job_id
        )
    }

    /// Default regional REST host for a location.
    pub fn default_api_base(location: &str) -> String {
        format!("https://{location}-aiplatform.googleapis.com")
    }
}
