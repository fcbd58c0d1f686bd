//! Prompt builder: fixed system instruction + word-budgeted document block.

use doc_search::DocumentSummary;

use crate::cfg::ComposerConfig;

/// Persona, citation style and tone constraints sent with every request.
pub const SYSTEM_INSTRUCTIONS: &str = r#"You are an AI assistant designed to help users explore and understand an extensive academic corpus on LGBTQ+ topics. Your primary objective is to provide relevant information, insights, and perspectives from the documents in the corpus, while maintaining a natural, conversational tone that avoids explicitly referring to the documents themselves or your artificial nature.

When responding:
<rewrite>Seamlessly weave key findings, data points, analyses, and arguments from the documents into your responses. Internalize and synthesize the knowledge, presenting it as if it were your own expertise on the subject matter. There is no need to directly cite or name the sources within your responses.</rewrite>

<avoid>Any direct references to "documents", "studies", "authors", URLs, links, or other meta-information about the sources. Your role is to share the substantive content fluidly, without breaking the conversational flow by calling attention to the retrieval process.</avoid>

<maintain>An informative yet accessible tone that elucidates complex academic concepts with clarity, while offering practical advice, guidance, and real-world applications where appropriate. Strike a balance between intellectual rigor and conversational accessibility.</maintain>

<focus>On directly and comprehensively addressing the user's query or information need, drawing upon the full breadth of relevant knowledge within the corpus. Do not provide unnecessary background about your own capabilities, the document retrieval process, or your artificial nature unless explicitly prompted.</focus>

The overarching goal is to facilitate a rich, substantive dialogue where the academic knowledge from the corpus is seamlessly integrated, enhancing the conversation organically and fostering a deeper understanding of LGBTQ+ topics for the user.

<directive>When you derive information from a specific source within the corpus, cite it using the following format: \[{authors}, {yearPublished}\]. For example: \[Smith & Jones, 2021\]. However, do not include these citations within your actual response text. Instead, maintain a separate list of citations that you can provide upon request, allowing the conversation to flow naturally without interruption.</directive>
"#;

/// Note given to the model when retrieval found nothing.
pub const NO_DOCUMENTS_NOTE: &str = "No relevant documents found.";

const CLOSING_INSTRUCTION: &str = "Based on the user's query and the retrieved documents, provide a helpful response. Consider the content, concepts, emotions, sentiments, and categories of the documents to formulate your response.";

/// Assembled prompt plus how many documents made it in.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInput {
    pub text: String,
    /// Number of leading documents appended to the prompt.
    pub included: usize,
    /// Running word count when assembly stopped.
    pub word_total: usize,
}

/// Whitespace-split word count used as a token proxy.
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

fn joined(items: &[String]) -> String {
    items.join(", ")
}

/// Word count of every field that is written into the prompt for `doc`.
pub fn document_word_count(doc: &DocumentSummary) -> usize {
    [
        word_count(&doc.title),
        word_count(&doc.abstract_text),
        word_count(&joined(&doc.authors)),
        word_count(&doc.classification),
        word_count(&joined(&doc.concepts)),
        word_count(&doc.emotion),
        word_count(&doc.sentiment),
        word_count(&joined(&doc.categories)),
        word_count(&doc.id),
        word_count(&doc.year_published),
        word_count(&doc.download_url),
    ]
    .iter()
    .sum()
}

fn push_document(out: &mut String, n: usize, doc: &DocumentSummary) {
    out.push_str(&format!("Document {n}:\n"));
    out.push_str(&format!("Title: {}\n", doc.title));
    out.push_str(&format!("Authors: {}\n", joined(&doc.authors)));
    out.push_str(&format!("Content: {}\n", doc.abstract_text));
    out.push_str(&format!("Classification: {}\n", doc.classification));
    out.push_str(&format!("Concepts: {}\n", joined(&doc.concepts)));
    out.push_str(&format!("Emotion: {}\n", doc.emotion));
    out.push_str(&format!("Year Published: {}\n", doc.year_published));
    out.push_str(&format!("Download URL: {}\n", doc.download_url));
    out.push_str(&format!("Sentiment: {}\n", doc.sentiment));
    out.push_str(&format!("Categories: {}\n", joined(&doc.categories)));
    out.push_str(&format!("ID: {}\n\n", doc.id));
}

/// Build the user prompt for `query` over ranked `docs`.
///
/// The running total starts with the query's word count. Documents are taken
/// in rank order, at most `cfg.max_hits`; the first document that pushes the
/// total past `cfg.max_tokens` is dropped and stops the loop.
///
/// # Example
/// ```
/// # use composer::{ComposerConfig, prompt::build_model_input};
/// let input = build_model_input("hello", &[], &ComposerConfig::default());
/// assert!(input.text.contains("No relevant documents found."));
/// assert_eq!(input.included, 0);
/// ```
pub fn build_model_input(query: &str, docs: &[DocumentSummary], cfg: &ComposerConfig) -> ModelInput {
    let mut out = String::new();
    out.push_str(&format!("User Query: {query}\n\n"));
    out.push_str("Retrieved Documents:\n");

    let mut total = word_count(query);
    let mut included = 0;

    if docs.is_empty() {
        out.push_str(NO_DOCUMENTS_NOTE);
        out.push('\n');
    } else {
        for (i, doc) in docs.iter().take(cfg.max_hits).enumerate() {
            total += document_word_count(doc);
            if total > cfg.max_tokens {
                break;
            }
            push_document(&mut out, i + 1, doc);
            included += 1;
        }
    }

    out.push_str(CLOSING_INSTRUCTION);
    out.push_str("\n\nResponse:");

    ModelInput {
        text: out,
        included,
        word_total: total,
    }
}
