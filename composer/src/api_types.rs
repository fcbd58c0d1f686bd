//! Public API types re-used by external crates (e.g., the HTTP API layer).

/// Final answer for one request.
///
/// # Example
/// ```
/// use composer::ModelAnswer;
/// let a = ModelAnswer {
///     formatted: "## Response\n\nHello\n\n".into(),
///     raw_output: "Hello".into(),
///     prompt_documents: 0,
/// };
/// assert!(a.formatted.contains(&a.raw_output));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ModelAnswer {
    /// Markdown text returned to the caller.
    pub formatted: String,
    /// Model text before formatting.
    pub raw_output: String,
    /// Number of documents that fit into the prompt budget.
    pub prompt_documents: usize,
}
