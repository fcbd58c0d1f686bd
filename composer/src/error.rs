//! Typed error for the composer crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposerError {
    /// A budget variable is unparsable or out of range.
    #[error("invalid composer config {key} = '{value}': {reason}")]
    Config {
        key: &'static str,
        value: String,
        reason: &'static str,
    },

    /// The model platform failed to resolve the tuned model or to generate text.
    #[error("generation error: {0}")]
    Generation(#[from] ai_llm_service::AiLlmError),
}
