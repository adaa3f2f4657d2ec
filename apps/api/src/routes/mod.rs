pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::document::MAX_UPLOAD_BYTES;
use crate::analysis::handlers as analysis;
use crate::state::AppState;
use crate::stats::handlers as stats;

/// Headroom over the document cap for the text fields and multipart framing,
/// so oversize documents reach the upload validator instead of the transport.
const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        .route("/api/v1/stats", get(stats::handle_get_stats))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt; // for `oneshot`

    use super::*;
    use crate::analysis::document::DocumentKind;
    use crate::analysis::estimator::{
        AtsScorer, FixedJitter, MockAtsScorer, ScoreEstimator, ScoreResult,
    };
    use crate::stats::aggregator::StatsAggregator;
    use crate::stats::store::{KeyValueStore, MemoryStore, StoreError};

    const BOUNDARY: &str = "atscheck-test-boundary";

    struct Part<'a> {
        name: &'a str,
        file: Option<(&'a str, &'a str)>, // (file name, content type)
        data: Vec<u8>,
    }

    fn text(name: &'static str, value: &str) -> Part<'static> {
        Part {
            name,
            file: None,
            data: value.as_bytes().to_vec(),
        }
    }

    fn file<'a>(file_name: &'a str, content_type: &'a str, size: usize) -> Part<'a> {
        Part {
            name: "document",
            file: Some((file_name, content_type)),
            data: vec![b'x'; size],
        }
    }

    fn multipart_request(parts: Vec<Part<'_>>) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part.file {
                Some((file_name, content_type)) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n",
                        part.name
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                        part.name
                    )
                    .as_bytes(),
                ),
            }
            body.extend_from_slice(&part.data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    struct PanickingScorer;

    #[async_trait]
    impl AtsScorer for PanickingScorer {
        async fn analyze(&self, _: &str, _: &str, _: DocumentKind) -> ScoreResult {
            panic!("scorer crashed");
        }
    }

    /// Memory store whose every call blocks the calling thread.
    struct SlowStore {
        inner: MemoryStore,
        delay: Duration,
    }

    impl KeyValueStore for SlowStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            std::thread::sleep(self.delay);
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            std::thread::sleep(self.delay);
            self.inner.set(key, value)
        }
    }

    fn zero_jitter_scorer() -> Arc<dyn AtsScorer> {
        Arc::new(MockAtsScorer::new(
            ScoreEstimator::new(Arc::new(FixedJitter(0))),
            Duration::ZERO,
        ))
    }

    fn app_with(scorer: Arc<dyn AtsScorer>, store: Arc<dyn KeyValueStore>) -> Router {
        build_router(AppState {
            scorer,
            stats: Arc::new(StatsAggregator::new(store)),
        })
    }

    fn test_app() -> Router {
        app_with(zero_jitter_scorer(), Arc::new(MemoryStore::new()))
    }

    fn valid_submission() -> Request<Body> {
        multipart_request(vec![
            text("job_title", "Software Engineer"),
            text("experience", "5"),
            file("cv.pdf", "application/pdf", 2048),
        ])
    }

    /// Counts 10ms ticks of a task sharing the runtime until aborted.
    fn spawn_ticker() -> (Arc<AtomicU32>, tokio::task::JoinHandle<()>) {
        let ticks = Arc::new(AtomicU32::new(0));
        let counter = ticks.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(10)).await;
                counter.fetch_add(1, Ordering::Relaxed);
            }
        });
        (ticks, handle)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn current_stats(app: &Router) -> Value {
        let response = app
            .clone()
            .oneshot(get_request("/api/v1/stats"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = test_app().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "atscheck-api");
    }

    #[tokio::test]
    async fn test_stats_start_at_zero() {
        let body = current_stats(&test_app()).await;
        assert_eq!(body["stats"]["resumesAnalyzed"], 0);
        assert_eq!(body["stats"]["averageScoreImprovement"], 0);
        assert_eq!(body["stats"]["successRate"], 0);
        assert_eq!(body["display"]["success_rate"], "0%");
    }

    #[tokio::test]
    async fn test_analyze_scores_and_updates_stats() {
        let app = test_app();
        let response = app.clone().oneshot(valid_submission()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["score"], 95);
        assert_eq!(body["band"], "excellent");
        assert_eq!(body["band_label"], "Excellent");
        assert_eq!(
            body["summary_lines"][0],
            "Resume analyzed for Software Engineer position"
        );
        assert_eq!(body["summary_lines"][2], "Document format: PDF");
        assert_eq!(body["notice"]["description"], "Your ATS score is 95%");
        assert_eq!(body["upload_notice"]["title"], "File uploaded");
        assert_eq!(
            body["upload_notice"]["description"],
            "cv.pdf uploaded successfully."
        );
        assert_eq!(body["stats"]["resumesAnalyzed"], 1);
        assert_eq!(body["stats"]["averageScoreImprovement"], 45);
        assert_eq!(body["stats"]["successRate"], 100);

        let stats = current_stats(&app).await;
        assert_eq!(stats["stats"]["resumesAnalyzed"], 1);
        assert_eq!(stats["display"]["average_score_improvement"], "45%");
    }

    #[tokio::test]
    async fn test_analyze_plain_text_without_bonuses() {
        let app = test_app();
        let request = multipart_request(vec![
            text("job_title", "Pastry Chef"),
            text("experience", "one"),
            file("cv.txt", "text/plain", 16),
        ]);

        let body = body_json(app.oneshot(request).await.unwrap()).await;
        assert_eq!(body["score"], 65);
        assert_eq!(body["band"], "good");
        assert_eq!(body["summary_lines"][1], "Experience level: 0 years");
        assert_eq!(body["stats"]["successRate"], 0);
    }

    #[tokio::test]
    async fn test_missing_field_rejected_without_counting() {
        let app = test_app();
        let request = multipart_request(vec![
            text("job_title", "Engineer"),
            file("cv.pdf", "application/pdf", 16),
        ]);

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["notice"]["title"], "Missing information");
        assert_eq!(current_stats(&app).await["stats"]["resumesAnalyzed"], 0);
    }

    #[tokio::test]
    async fn test_unsupported_type_rejected() {
        let app = test_app();
        let request = multipart_request(vec![
            text("job_title", "Engineer"),
            text("experience", "4"),
            file("cv.png", "image/png", 16),
        ]);

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(current_stats(&app).await["stats"]["resumesAnalyzed"], 0);
    }

    #[tokio::test]
    async fn test_oversize_document_rejected_by_validator() {
        let app = test_app();
        let request = multipart_request(vec![
            text("job_title", "Engineer"),
            text("experience", "4"),
            file("cv.txt", "text/plain", MAX_UPLOAD_BYTES + 1),
        ]);

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "FILE_TOO_LARGE");
        assert_eq!(body["error"]["notice"]["title"], "File too large");
        assert_eq!(current_stats(&app).await["stats"]["resumesAnalyzed"], 0);
    }

    #[tokio::test]
    async fn test_two_analyses_average_into_stats() {
        let app = test_app();
        // 95 then 65: improvement (45 + 15) / 2 = 30, success (100 + 0) / 2 = 50
        for (title, years, kind) in [
            ("Engineer", "5", "application/pdf"),
            ("Chef", "1", "text/plain"),
        ] {
            let request = multipart_request(vec![
                text("job_title", title),
                text("experience", years),
                file("cv", kind, 8),
            ]);
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let stats = current_stats(&app).await;
        assert_eq!(stats["stats"]["resumesAnalyzed"], 2);
        assert_eq!(stats["stats"]["averageScoreImprovement"], 30);
        assert_eq!(stats["stats"]["successRate"], 50);
    }

    #[tokio::test]
    async fn test_panicking_scorer_reports_analysis_failed() {
        let app = app_with(Arc::new(PanickingScorer), Arc::new(MemoryStore::new()));

        let response = app.clone().oneshot(valid_submission()).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["notice"]["title"], "Analysis failed");
        assert_eq!(current_stats(&app).await["stats"]["resumesAnalyzed"], 0);
    }

    #[tokio::test]
    async fn test_non_multipart_request_gets_json_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"job_title":"Engineer"}"#))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "MALFORMED_UPLOAD");
        assert_eq!(body["error"]["notice"]["severity"], "destructive");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_slow_store_does_not_stall_runtime_during_analyze() {
        // update() reads then writes: two 100ms blocking calls.
        let store = Arc::new(SlowStore {
            inner: MemoryStore::new(),
            delay: Duration::from_millis(100),
        });
        let app = app_with(zero_jitter_scorer(), store);

        let (ticks, ticker) = spawn_ticker();
        let response = app.oneshot(valid_submission()).await.unwrap();
        ticker.abort();

        assert_eq!(response.status(), StatusCode::OK);
        // Blocking on the runtime thread would starve the ticker entirely.
        assert!(ticks.load(Ordering::Relaxed) >= 5);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_slow_store_does_not_stall_runtime_during_stats_query() {
        let store = Arc::new(SlowStore {
            inner: MemoryStore::new(),
            delay: Duration::from_millis(100),
        });
        let app = app_with(zero_jitter_scorer(), store);

        let (ticks, ticker) = spawn_ticker();
        let response = app.oneshot(get_request("/api/v1/stats")).await.unwrap();
        ticker.abort();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(ticks.load(Ordering::Relaxed) >= 3);
    }
}
