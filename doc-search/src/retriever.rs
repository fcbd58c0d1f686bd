//! Retrieval stage: search, deduplicate by title, project into summaries.

use std::{collections::HashSet, future::Future, pin::Pin};

use tracing::{debug, error, info};

use crate::{
    errors::search_error::SearchError,
    structs::{document_summary::DocumentSummary, search_hit::SearchHit},
};

/// Ranked documents for one request, in index order, unique by title.
pub type RetrievalResult = Vec<DocumentSummary>;

/// Search backend interface.
///
/// Implementations return hits in the order the index ranked them.
pub trait DocumentSearch: Send + Sync {
    fn search<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SearchHit>, SearchError>> + Send + 'a>>;
}

/// Projects hits into summaries, keeping only the first hit per title.
pub fn project_hits(hits: &[SearchHit]) -> RetrievalResult {
    let mut seen_titles: HashSet<String> = HashSet::new();
    let mut docs = Vec::with_capacity(hits.len());

    for hit in hits {
        let doc = DocumentSummary::from_hit(hit);
        if !seen_titles.insert(doc.title.clone()) {
            debug!(title = %doc.title, "skipping duplicate title");
            continue;
        }
        debug!(score = ?hit.score, title = %doc.title, "kept hit");
        docs.push(doc);
    }

    docs
}

/// Retrieves documents for `query`.
///
/// Returns `None` when the search fails for any reason; the error is logged
/// here and not retried. An empty index answer yields `Some(vec![])`.
pub async fn retrieve_documents(search: &dyn DocumentSearch, query: &str) -> Option<RetrievalResult> {
    match search.search(query).await {
        Ok(hits) => {
            if hits.is_empty() {
                info!(%query, "no documents found");
            }
            let docs = project_hits(&hits);
            info!(%query, hits = hits.len(), kept = docs.len(), "retrieved documents");
            Some(docs)
        }
        Err(e) => {
            error!(%query, error = %e, "search failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedSearch(Result<Vec<SearchHit>, ()>);

    impl DocumentSearch for FixedSearch {
        fn search<'a>(
            &'a self,
            _query: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<SearchHit>, SearchError>> + Send + 'a>>
        {
            let out = match &self.0 {
                Ok(hits) => Ok(hits.clone()),
                Err(()) => Err(SearchError::Decode("boom".into())),
            };
            Box::pin(async move { out })
        }
    }

    fn titled(id: &str, title: &str, score: f64) -> SearchHit {
        SearchHit {
            id: Some(id.into()),
            score: Some(score),
            source: json!({ "title": title }),
        }
    }

    #[test]
    fn duplicate_titles_keep_first_occurrence() {
        let hits = vec![
            titled("1", "Alpha", 9.0),
            titled("2", "Beta", 8.0),
            titled("3", "Alpha", 7.0),
            titled("4", "Gamma", 6.0),
            titled("5", "Beta", 5.0),
        ];
        let docs = project_hits(&hits);
        let titles: Vec<_> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, ["Alpha", "Beta", "Gamma"]);
        assert_eq!(docs[0].id, "1");
        assert_eq!(docs[1].id, "2");
    }

    #[test]
    fn untitled_hits_share_the_placeholder_title() {
        let hits = vec![
            SearchHit { id: None, score: None, source: json!({}) },
            SearchHit { id: None, score: None, source: json!({ "abstract": "x" }) },
        ];
        assert_eq!(project_hits(&hits).len(), 1);
    }

    #[tokio::test]
    async fn empty_index_answer_is_some_empty() {
        let search = FixedSearch(Ok(vec![]));
        let docs = retrieve_documents(&search, "anything").await;
        assert_eq!(docs, Some(vec![]));
    }

    #[tokio::test]
    async fn search_failure_is_absent() {
        let search = FixedSearch(Err(()));
        assert!(retrieve_documents(&search, "anything").await.is_none());
    }
}
