use serde::{Deserialize, Serialize};

/// Request payload for /api/bayard.
#[derive(Debug, Deserialize)]
pub struct BayardRequest {
    /// The user's query. Absent and empty are both rejected.
    #[serde(default)]
    pub input_text: Option<String>,
}

/// Response payload for /api/bayard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BayardResponse {
    /// Markdown answer with the `## Response` and `## Relevant Documents` sections.
    pub model_output: String,
}
