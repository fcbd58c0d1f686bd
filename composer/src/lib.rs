//! Answer composition with a single public entry point.
//!
//! Public API: [`compose_answer`]. It assembles a word-budgeted prompt from the
//! query and the retrieved documents, asks the tuned model under the fixed
//! system instruction, and formats the text with a list of source links.

mod api_types;
mod cfg;
mod error;
pub mod format;
mod generator;
pub mod prompt;

pub use api_types::ModelAnswer;
pub use cfg::ComposerConfig;
pub use error::ComposerError;
pub use generator::TextGenerator;

use doc_search::DocumentSummary;
use tracing::{debug, info};

/// Compose the final answer for `query` over ranked `docs`.
///
/// # Errors
/// Returns [`ComposerError::Generation`] if the model call fails; nothing is
/// recovered locally.
///
/// # Example
/// ```no_run
/// # use composer::{ComposerConfig, TextGenerator, compose_answer};
/// # async fn run(generator: &dyn TextGenerator) -> Result<(), composer::ComposerError> {
/// let answer = compose_answer(generator, "queer theory", &[], &ComposerConfig::default()).await?;
/// assert!(answer.formatted.starts_with("## Response"));
/// # Ok(()) }
/// ```
pub async fn compose_answer(
    generator: &dyn TextGenerator,
    query: &str,
    docs: &[DocumentSummary],
    cfg: &ComposerConfig,
) -> Result<ModelAnswer, ComposerError> {
    let input = prompt::build_model_input(query, docs, cfg);
    info!(
        retrieved = docs.len(),
        included = input.included,
        words = input.word_total,
        "assembled model input"
    );
    debug!(model_input = %input.text, "model input");

    let raw_output = generator
        .generate(prompt::SYSTEM_INSTRUCTIONS, &input.text)
        .await?;
    debug!(model_output = %raw_output, "model output");

    let formatted = format::format_answer(&raw_output, docs, cfg.max_hits);

    Ok(ModelAnswer {
        formatted,
        raw_output,
        prompt_documents: input.included,
    })
}
