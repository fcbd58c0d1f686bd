//! HTTP client for the Elasticsearch `_search` endpoint.

use std::{future::Future, pin::Pin, time::Duration, time::Instant};

use reqwest::header;
use tracing::{debug, error, info};

use crate::{
    errors::search_error::SearchError,
    query::text_expansion_body,
    retriever::DocumentSearch,
    structs::{
        search_config::SearchConfig,
        search_hit::{SearchHit, SearchResponse},
    },
};

/// Elasticsearch client bound to one index.
///
/// Built once at startup and shared read-only by all requests.
#[derive(Debug, Clone)]
pub struct ElasticClient {
    http: reqwest::Client,
    cfg: SearchConfig,
    url_search: String,
}

impl ElasticClient {
    /// Creates a client with the API key installed as a default header.
    ///
    /// # Errors
    /// [`SearchError::InvalidConfig`] if the config is out of range or the key
    /// is not a valid header value.
    pub fn new(cfg: SearchConfig) -> Result<Self, SearchError> {
        cfg.validate()?;

        let mut headers = header::HeaderMap::new();
        if let Some(key) = &cfg.api_key {
            let value = header::HeaderValue::from_str(&format!("ApiKey {key}"))
                .map_err(|e| SearchError::InvalidConfig(format!("invalid ES_API_KEY: {e}")))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .default_headers(headers)
            .build()?;

        let url_search = format!("{}/{}/_search", cfg.es_url.trim_end_matches('/'), cfg.index);

        info!(
            index = %cfg.index,
            url = %cfg.es_url,
            size = cfg.size,
            "ElasticClient initialized"
        );

        Ok(Self {
            http,
            cfg,
            url_search,
        })
    }

    /// Runs one ranked text-expansion search and returns hits in index order.
    ///
    /// # Errors
    /// - [`SearchError::Transport`] for network failures
    /// - [`SearchError::HttpStatus`] for non-2xx responses
    /// - [`SearchError::Decode`] if the body has no `hits.hits`
    pub async fn search_hits(&self, user_input: &str) -> Result<Vec<SearchHit>, SearchError> {
        let started = Instant::now();
        let body = text_expansion_body(&self.cfg, user_input);

        debug!(query = %user_input, "POST {}", self.url_search);
        let resp = self.http.post(&self.url_search).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(240).collect();
            error!(
                %status,
                url = %self.url_search,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "search returned non-success status"
            );
            return Err(SearchError::HttpStatus {
                status,
                url: self.url_search.clone(),
                snippet,
            });
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| SearchError::Decode(format!("serde error: {e}; expected `hits.hits`")))?;

        debug!(
            hits = parsed.hits.hits.len(),
            latency_ms = started.elapsed().as_millis(),
            "search completed"
        );

        Ok(parsed.hits.hits)
    }
}

impl DocumentSearch for ElasticClient {
    fn search<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SearchHit>, SearchError>> + Send + 'a>> {
        Box::pin(self.search_hits(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use serde_json::{Value, json};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn cfg(url: String) -> SearchConfig {
        SearchConfig {
            es_url: url,
            api_key: Some("secret".into()),
            timeout_secs: 5,
            ..SearchConfig::default()
        }
    }

    #[tokio::test]
    async fn posts_query_to_index_and_parses_hits() {
        let app = Router::new().route(
            "/annotations/_search",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "ApiKey secret");
                assert_eq!(body["size"], 10);
                Json(json!({
                    "took": 3,
                    "hits": { "hits": [
                        { "_id": "a", "_score": 9.1, "_source": { "title": "One" } },
                        { "_id": "b", "_score": 4.0, "_source": { "title": "Two" } }
                    ]}
                }))
            }),
        );
        let client = ElasticClient::new(cfg(serve(app).await)).unwrap();

        let hits = client.search_hits("q").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id.as_deref(), Some("a"));
        assert_eq!(hits[1].source["title"], "Two");
    }

    #[tokio::test]
    async fn error_status_is_surfaced() {
        let app = Router::new().route(
            "/annotations/_search",
            post(|| async { (StatusCode::UNAUTHORIZED, "bad key") }),
        );
        let client = ElasticClient::new(cfg(serve(app).await)).unwrap();

        let err = client.search_hits("q").await.unwrap_err();
        assert!(matches!(err, SearchError::HttpStatus { status, .. } if status == StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn closed_port_is_a_transport_error_and_absent_result() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ElasticClient::new(cfg(format!("http://{addr}"))).unwrap();

        let err = client.search_hits("q").await.unwrap_err();
        assert!(matches!(err, SearchError::Transport(_)), "got {err:?}");
        assert!(crate::retrieve_documents(&client, "q").await.is_none());
    }

    #[test]
    fn oversized_config_is_rejected_at_construction() {
        let mut c = cfg("http://localhost:9200".into());
        c.size = 50;
        assert!(matches!(
            ElasticClient::new(c),
            Err(SearchError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn unexpected_body_is_a_decode_error() {
        let app = Router::new().route(
            "/annotations/_search",
            post(|| async { Json(json!({ "error": "nope" })) }),
        );
        let client = ElasticClient::new(cfg(serve(app).await)).unwrap();

        let err = client.search_hits("q").await.unwrap_err();
        assert!(matches!(err, SearchError::Decode(_)));
    }
}
