//! HTTP gateway: `GET /health-check` and `POST /api/bayard`.

use std::sync::Arc;

mod core;
mod error_handler;
mod routes;

pub use crate::core::app_state::AppState;
pub use crate::error_handler::{AppError, AppResult};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::{
    core::app_state::bind_address,
    routes::{bayard::bayard_route::bayard, health_check_route::health_check},
};

/// Builds the router over prepared state.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health-check", get(health_check))
        .route("/api/bayard", post(bayard))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Loads state from the environment and serves until Ctrl+C.
pub async fn start() -> AppResult<()> {
    let state = Arc::new(AppState::from_env().await?);
    let addr = bind_address()?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(AppError::Bind)?;
    info!(%addr, "listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::{AiLlmError, ProviderError};
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        response::Response,
    };
    use composer::{ComposerConfig, TextGenerator};
    use doc_search::{DocumentSearch, SearchError, SearchHit};
    use serde_json::{Value, json};
    use std::{
        future::Future,
        pin::Pin,
        sync::atomic::{AtomicUsize, Ordering},
    };
    use tower::ServiceExt;

    #[derive(Default)]
    struct FakeSearch {
        hits: Vec<SearchHit>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl DocumentSearch for FakeSearch {
        fn search<'a>(
            &'a self,
            _query: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<SearchHit>, SearchError>> + Send + 'a>>
        {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if self.fail {
                    Err(SearchError::Decode("connection refused".into()))
                } else {
                    Ok(self.hits.clone())
                }
            })
        }
    }

    #[derive(Default)]
    struct FakeGenerator {
        fail: bool,
        calls: AtomicUsize,
    }

    impl TextGenerator for FakeGenerator {
        fn generate<'a>(
            &'a self,
            _system: &'a str,
            _prompt: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if self.fail {
                    Err(AiLlmError::Provider(ProviderError::EmptyCandidates))
                } else {
                    Ok("Queer readings unsettle fixed identities.".to_string())
                }
            })
        }
    }

    fn hit(title: &str) -> SearchHit {
        SearchHit {
            id: Some(format!("id-{title}")),
            score: Some(1.0),
            source: json!({
                "title": title,
                "downloadUrl": format!("https://docs.example.org/{title}.pdf"),
            }),
        }
    }

    fn router(search: Arc<FakeSearch>, generator: Arc<FakeGenerator>) -> Router {
        app(Arc::new(AppState::new(
            search,
            generator,
            ComposerConfig::default(),
        )))
    }

    async fn post_bayard(router: Router, body: &str) -> Response {
        router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/bayard")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn json_body(res: Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_check_says_ok() {
        let res = router(Default::default(), Default::default())
            .oneshot(
                Request::builder()
                    .uri("/health-check")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn empty_input_is_rejected_before_search() {
        let search = Arc::new(FakeSearch::default());
        let generator = Arc::new(FakeGenerator::default());

        let res = post_bayard(router(search.clone(), generator.clone()), r#"{"input_text": ""}"#).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await, json!({ "error": "User input is required." }));
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_input_is_rejected_before_search() {
        let search = Arc::new(FakeSearch::default());

        let res = post_bayard(router(search.clone(), Default::default()), "{}").await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["error"], "User input is required.");
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let res = post_bayard(router(Default::default(), Default::default()), "{not json").await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(res).await["error"].is_string());
    }

    #[tokio::test]
    async fn search_failure_is_a_server_error() {
        let search = Arc::new(FakeSearch {
            fail: true,
            ..Default::default()
        });
        let generator = Arc::new(FakeGenerator::default());

        let res = post_bayard(
            router(search, generator.clone()),
            r#"{"input_text": "queer theory in literature"}"#,
        )
        .await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(res).await,
            json!({ "error": "Error occurred while searching Elasticsearch." })
        );
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn three_distinct_hits_yield_three_links() {
        let search = Arc::new(FakeSearch {
            hits: vec![hit("Alpha"), hit("Beta"), hit("Gamma")],
            ..Default::default()
        });

        let res = post_bayard(
            router(search, Default::default()),
            r#"{"input_text": "queer theory in literature"}"#,
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        let output = body["modelOutput"].as_str().unwrap();
        assert!(output.starts_with("## Response\n\nQueer readings unsettle fixed identities."));
        assert!(output.contains("## Relevant Documents"));
        assert_eq!(output.matches("- [").count(), 3);
        assert!(output.contains("- [Beta](https://docs.example.org/Beta.pdf)"));
    }

    #[tokio::test]
    async fn zero_hits_answer_without_documents_section() {
        let res = post_bayard(
            router(Default::default(), Default::default()),
            r#"{"input_text": "anything"}"#,
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        let output = body["modelOutput"].as_str().unwrap();
        assert!(output.starts_with("## Response"));
        assert!(!output.contains("## Relevant Documents"));
    }

    #[tokio::test]
    async fn generation_failure_is_a_server_error() {
        let search = Arc::new(FakeSearch {
            hits: vec![hit("Alpha")],
            ..Default::default()
        });
        let generator = Arc::new(FakeGenerator {
            fail: true,
            ..Default::default()
        });

        let res = post_bayard(router(search, generator), r#"{"input_text": "q"}"#).await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(res).await,
            json!({ "error": "Error occurred while generating model output." })
        );
    }
}
