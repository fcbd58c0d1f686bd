//! Text generation seam between the composer and the model platform.

use std::{future::Future, pin::Pin};

use ai_llm_service::{AiLlmError, VertexService};

/// Generates text for a prompt under a system instruction.
///
/// Implement this trait to plug in another model backend.
pub trait TextGenerator: Send + Sync {
    fn generate<'a>(
        &'a self,
        system: &'a str,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>>;
}

/// Resolves the tuned model on every call, then generates.
impl TextGenerator for VertexService {
    fn generate<'a>(
        &'a self,
        system: &'a str,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>> {
        Box::pin(async move {
            let model = self.tuned_model(system).await?;
            model.generate_content(prompt).await
        })
    }
}
