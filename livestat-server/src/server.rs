//! Axum server setup and router configuration.

use crate::api;
use crate::state::AppState;
use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the main application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .merge(api::stats::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // Add state to all routes
        .with_state(state)
}

/// Build the static dashboard router serving `dir`.
pub fn build_dashboard_router(dir: impl AsRef<Path>) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Simple health check - returns OK if the process is running, whether or
/// not the feed has attached.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run the server with graceful shutdown support.
///
/// In-flight requests finish before this returns.
pub async fn run_server(
    router: Router,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::header::{
        ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, CONTENT_TYPE, ORIGIN,
    };
    use axum::http::{Method, Request, StatusCode};
    use livestat_core::events::FeedEvent;
    use livestat_core::lifecycle::Lifecycle;
    use livestat_core::reducer::reduce;
    use livestat_core::store::SnapshotStore;
    use livestat_sdk::client::{ClientError, StatsClient};
    use livestat_sdk::objects::StatsResponse;
    use time::OffsetDateTime;
    use tokio::sync::watch;
    use tower::ServiceExt;
    use url::Url;

    fn fixture() -> (SnapshotStore, Lifecycle, Router) {
        let store = SnapshotStore::default();
        let lifecycle = Lifecycle::new();
        let router = build_router(AppState::new(store.reader(), lifecycle.clone()));
        (store, lifecycle, router)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn feed(store: &SnapshotStore, events: Vec<FeedEvent>) {
        for event in events {
            store.apply(reduce(event, OffsetDateTime::now_utc())).await;
        }
    }

    #[tokio::test]
    async fn test_not_ready_before_attach() {
        let (_store, _lifecycle, router) = fixture();

        for uri in ["/", "/stats"] {
            let response = router.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert!(body.is_empty());
        }
    }

    #[tokio::test]
    async fn test_stats_after_attach() {
        let (store, lifecycle, router) = fixture();
        lifecycle.mark_running();
        feed(
            &store,
            vec![
                FeedEvent::Connect { viewers: 120 },
                FeedEvent::Like {
                    author: "ana".into(),
                    count: 5,
                },
                FeedEvent::Like {
                    author: "bo".into(),
                    count: 3,
                },
            ],
        )
        .await;

        for uri in ["/", "/stats"] {
            let response = router.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
            assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");

            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let stats: StatsResponse = serde_json::from_slice(&body).unwrap();
            assert_eq!(stats.viewers, 120);
            assert_eq!(stats.likes, 8);
            assert_eq!((stats.follows, stats.shares), (0, 0));
            assert!(stats.comments.is_empty());
            assert!(stats.live);
        }
    }

    #[tokio::test]
    async fn test_ready_while_draining_then_stopped() {
        let (_store, lifecycle, router) = fixture();
        lifecycle.mark_running();
        lifecycle.begin_shutdown();

        let response = router.clone().oneshot(get("/stats")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        lifecycle.mark_stopped();
        let response = router.oneshot(get("/stats")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_ignores_readiness() {
        let (_store, _lifecycle, router) = fixture();
        let response = router.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let (_store, _lifecycle, router) = fixture();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/stats")
            .header(ORIGIN, "https://overlay.example")
            .header(ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let (_store, lifecycle, router) = fixture();
        lifecycle.mark_running();
        let response = router.oneshot(get("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sdk_client_against_live_server() {
        let (store, lifecycle, router) = fixture();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = stop_rx.wait_for(|stop| *stop).await;
                })
                .await
        });

        let client = StatsClient::new(Url::parse(&format!("http://{addr}")).unwrap());
        assert!(matches!(client.stats().await, Err(ClientError::NotReady)));

        lifecycle.mark_running();
        let comments = (0..12)
            .map(|i| FeedEvent::Comment {
                author: "ana".into(),
                text: format!("c{i}"),
            })
            .collect();
        feed(&store, comments).await;

        let stats = client.stats().await.unwrap();
        let texts: Vec<_> = stats.comments.iter().map(|c| c.comment.as_str()).collect();
        let expected: Vec<_> = (2..12).map(|i| format!("c{i}")).collect();
        assert_eq!(texts, expected);
        assert!(stats.last_update >= stats.comments[9].timestamp);

        stop_tx.send(true).unwrap();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_dashboard_serves_directory() {
        let dir = std::env::temp_dir().join(format!("livestat-dashboard-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<h1>live</h1>").unwrap();

        let router = build_dashboard_router(&dir);
        let response = router.clone().oneshot(get("/index.html")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<h1>live</h1>");

        let response = router.oneshot(get("/missing.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
