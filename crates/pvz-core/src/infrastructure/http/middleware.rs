//! HTTP middleware for panic recovery and request metrics

use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::infrastructure::http::dto::ErrorBody;

/// Turn a handler panic into a 500 with the usual error body.
///
/// Installed through `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn recover_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    error!(panic = detail, "handler panicked");

    let body = Json(ErrorBody {
        message: "Internal server error".to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

#[cfg(feature = "metrics")]
pub use request_metrics::{HttpMetricsLayer, HttpMetricsService};

#[cfg(feature = "metrics")]
mod request_metrics {
    use std::{
        future::Future,
        pin::Pin,
        task::{Context, Poll},
        time::{Duration, Instant},
    };

    use axum::{
        extract::{MatchedPath, Request},
        http::StatusCode,
        response::Response,
    };
    use tower::{Layer, Service};

    pub const REQUESTS_TOTAL: &str = "http_requests_total";
    pub const REQUEST_DURATION: &str = "http_request_duration_seconds";

    /// Path label for requests no route matched
    pub const UNMATCHED_PATH: &str = "unmatched";

    /// Counts requests and records their latency, labelled by method, route
    /// template and status.
    ///
    /// The route template (`/pvz/{pvz_id}/receptions`) is used instead of
    /// the raw path so ids do not explode label cardinality. Add it with
    /// `Router::layer` so [`MatchedPath`] is available.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct HttpMetricsLayer;

    impl HttpMetricsLayer {
        pub fn new() -> Self {
            Self
        }
    }

    impl<S> Layer<S> for HttpMetricsLayer {
        type Service = HttpMetricsService<S>;

        fn layer(&self, inner: S) -> Self::Service {
            HttpMetricsService { inner }
        }
    }

    #[derive(Debug, Clone)]
    pub struct HttpMetricsService<S> {
        inner: S,
    }

    impl<S> Service<Request> for HttpMetricsService<S>
    where
        S: Service<Request, Response = Response> + Clone + Send + 'static,
        S::Future: Send + 'static,
    {
        type Response = Response;
        type Error = S::Error;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

        fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            self.inner.poll_ready(cx)
        }

        fn call(&mut self, request: Request) -> Self::Future {
            let method = request.method().to_string();
            let path = request
                .extensions()
                .get::<MatchedPath>()
                .map(|matched| matched.as_str().to_owned())
                .unwrap_or_else(|| UNMATCHED_PATH.to_owned());

            // The clone may not be ready; swap so the polled service handles this call.
            let clone = self.inner.clone();
            let mut inner = std::mem::replace(&mut self.inner, clone);

            Box::pin(async move {
                let start = Instant::now();
                let response = inner.call(request).await?;
                record(method, path, response.status(), start.elapsed());
                Ok(response)
            })
        }
    }

    fn record(method: String, path: String, status: StatusCode, elapsed: Duration) {
        let status = status.as_u16().to_string();
        metrics::counter!(
            REQUESTS_TOTAL,
            "method" => method.clone(),
            "path" => path.clone(),
            "status" => status.clone()
        )
        .increment(1);
        metrics::histogram!(
            REQUEST_DURATION,
            "method" => method,
            "path" => path,
            "status" => status
        )
        .record(elapsed.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    #[tokio::test]
    async fn test_panicking_handler_answers_500() {
        async fn explode() -> &'static str {
            panic!("registry exploded")
        }

        let app = Router::new()
            .route("/explode", get(explode))
            .layer(CatchPanicLayer::custom(recover_panic));

        let response = app
            .oneshot(Request::get("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Internal server error");
    }

    #[cfg(feature = "metrics")]
    mod metrics_layer {
        use std::sync::Arc;

        use metrics::{
            Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
        };
        use parking_lot::Mutex;

        use super::*;
        use crate::infrastructure::http::middleware::{
            HttpMetricsLayer,
            request_metrics::{REQUEST_DURATION, REQUESTS_TOTAL},
        };

        type Sample = (String, Vec<(String, String)>);

        /// Keeps every metric registration with its labels
        #[derive(Clone, Default)]
        struct CapturingRecorder {
            samples: Arc<Mutex<Vec<Sample>>>,
        }

        impl CapturingRecorder {
            fn capture(&self, key: &Key) {
                let labels = key
                    .labels()
                    .map(|label| (label.key().to_string(), label.value().to_string()))
                    .collect();
                self.samples.lock().push((key.name().to_string(), labels));
            }

            fn samples_named(&self, name: &str) -> Vec<Vec<(String, String)>> {
                self.samples
                    .lock()
                    .iter()
                    .filter(|(sample, _)| sample == name)
                    .map(|(_, labels)| labels.clone())
                    .collect()
            }
        }

        impl Recorder for CapturingRecorder {
            fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
            fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
            fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

            fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
                self.capture(key);
                Counter::noop()
            }

            fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
                Gauge::noop()
            }

            fn register_histogram(&self, key: &Key, _: &Metadata<'_>) -> Histogram {
                self.capture(key);
                Histogram::noop()
            }
        }

        fn labels(method: &str, path: &str, status: &str) -> Vec<(String, String)> {
            vec![
                ("method".to_string(), method.to_string()),
                ("path".to_string(), path.to_string()),
                ("status".to_string(), status.to_string()),
            ]
        }

        #[tokio::test]
        async fn test_requests_are_counted_by_route_template() {
            let recorder = CapturingRecorder::default();
            let _guard = metrics::set_default_local_recorder(&recorder);

            let app = Router::new()
                .route("/pvz/{pvz_id}/receptions", get(|| async { "[]" }))
                .route(
                    "/products",
                    get(|| async { (StatusCode::BAD_REQUEST, "no open reception") }),
                )
                .layer(HttpMetricsLayer::new());

            for uri in ["/pvz/first/receptions", "/pvz/second/receptions", "/products"] {
                app.clone()
                    .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                    .await
                    .unwrap();
            }

            let counted = recorder.samples_named(REQUESTS_TOTAL);
            assert_eq!(
                counted,
                vec![
                    labels("GET", "/pvz/{pvz_id}/receptions", "200"),
                    labels("GET", "/pvz/{pvz_id}/receptions", "200"),
                    labels("GET", "/products", "400"),
                ]
            );
            assert_eq!(recorder.samples_named(REQUEST_DURATION), counted);
        }
    }
}
