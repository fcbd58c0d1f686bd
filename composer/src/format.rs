//! Markdown answer formatting.

use doc_search::DocumentSummary;

/// Wraps the model text under `## Response` and lists the first `max_hits`
/// documents as links under `## Relevant Documents`.
///
/// The documents section is omitted when `docs` is empty.
pub fn format_answer(model_output: &str, docs: &[DocumentSummary], max_hits: usize) -> String {
    let mut out = format!("## Response\n\n{model_output}\n\n");

    if !docs.is_empty() {
        out.push_str("## Relevant Documents\n\n");
        for doc in docs.iter().take(max_hits) {
            out.push_str(&format!("- [{}]({})\n", doc.title, doc.download_url));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_search::SearchHit;
    use serde_json::json;

    fn doc(title: &str, url: Option<&str>) -> DocumentSummary {
        let mut source = json!({ "title": title });
        if let Some(u) = url {
            source["downloadUrl"] = json!(u);
        }
        DocumentSummary::from_hit(&SearchHit {
            id: None,
            score: None,
            source,
        })
    }

    #[test]
    fn no_documents_means_no_documents_section() {
        let out = format_answer("Hi there.", &[], 10);
        assert_eq!(out, "## Response\n\nHi there.\n\n");
    }

    #[test]
    fn documents_become_markdown_links() {
        let docs = vec![
            doc("One", Some("https://a.org/1.pdf")),
            doc("Two", None),
        ];
        let out = format_answer("Text", &docs, 10);
        assert!(out.starts_with("## Response\n\nText\n\n## Relevant Documents\n\n"));
        assert!(out.contains("- [One](https://a.org/1.pdf)\n"));
        assert!(out.contains("- [Two](No download URL provided)\n"));
    }

    #[test]
    fn citations_are_capped_by_max_hits() {
        let docs: Vec<_> = (0..5).map(|i| doc(&format!("D{i}"), None)).collect();
        let out = format_answer("x", &docs, 3);
        assert_eq!(out.matches("- [").count(), 3);
    }
}
