//! Stats API handlers.
//!
//! These endpoints are polled by dashboards and overlays. No authentication.
//!
//! # Endpoints
//!
//! - `GET /`      – current aggregate snapshot
//! - `GET /stats` – same snapshot under an explicit path

use axum::{
    Router,
    extract::State,
    http::{
        StatusCode,
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE},
    },
    response::IntoResponse,
    routing::get,
};
use livestat_core::store::{StateView, unix_seconds};
use livestat_sdk::objects::{CommentEntry, StatsResponse};

use crate::state::AppState;

/// Build the Stats API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_stats))
        .route("/stats", get(get_stats))
}

/// Convert a `StateView` (store model) into a `StatsResponse` (API model).
pub(crate) fn to_response(view: &StateView) -> StatsResponse {
    StatsResponse {
        viewers: view.viewers,
        likes: view.likes,
        follows: view.follows,
        shares: view.shares,
        comments: view
            .comments
            .iter()
            .map(|c| CommentEntry {
                user: c.author.to_string(),
                comment: c.text.clone(),
                timestamp: unix_seconds(c.received_at),
            })
            .collect(),
        last_update: unix_seconds(view.last_update),
        live: view.live,
    }
}

/// `GET /stats` - return the current snapshot.
///
/// The body is serialized in full before any byte is sent, so a failure
/// yields a bare 500 rather than a truncated document.
async fn get_stats(state: State<AppState>) -> Result<impl IntoResponse, StatsApiError> {
    if !state.lifecycle.is_ready() {
        return Err(StatsApiError::NotReady);
    }

    let view = state.reader.snapshot().await;
    let body = serde_json::to_vec(&to_response(&view)).map_err(StatsApiError::Serialization)?;

    Ok((
        [
            (CONTENT_TYPE, "application/json"),
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        body,
    ))
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in Stats API handlers.
#[derive(Debug)]
enum StatsApiError {
    /// The feed has not attached yet, or the process has stopped.
    NotReady,
    /// The snapshot could not be encoded.
    Serialization(serde_json::Error),
}

impl IntoResponse for StatsApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            StatsApiError::NotReady => StatusCode::SERVICE_UNAVAILABLE.into_response(),
            StatsApiError::Serialization(e) => {
                tracing::error!(error = %e, "Failed to serialize stats snapshot");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livestat_core::events::FeedEvent;
    use livestat_core::reducer::reduce;
    use livestat_core::store::{DEFAULT_COMMENT_CAPACITY, SnapshotStore};
    use time::{Duration, OffsetDateTime};

    fn t0() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    #[tokio::test]
    async fn test_to_response_shape() {
        let store = SnapshotStore::starting_at(DEFAULT_COMMENT_CAPACITY, t0());
        let events = [
            FeedEvent::Connect { viewers: 120 },
            FeedEvent::Like {
                author: "ana".into(),
                count: 5,
            },
            FeedEvent::Comment {
                author: "ana".into(),
                text: "hola".to_string(),
            },
        ];
        for (i, event) in events.into_iter().enumerate() {
            let at = t0() + Duration::milliseconds(250 * (i as i64 + 1));
            store.apply(reduce(event, at)).await;
        }

        let response = to_response(&store.snapshot().await);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "viewers": 120,
                "likes": 5,
                "follows": 0,
                "shares": 0,
                "comments": [
                    {"user": "ana", "comment": "hola", "timestamp": 1_700_000_000.75}
                ],
                "last_update": 1_700_000_000.75,
                "live": true
            })
        );
    }

    #[tokio::test]
    async fn test_empty_snapshot_uses_start_time() {
        let store = SnapshotStore::starting_at(DEFAULT_COMMENT_CAPACITY, t0());
        let response = to_response(&store.snapshot().await);
        assert_eq!(response.last_update, 1_700_000_000.0);
        assert!(response.comments.is_empty());
        assert!(!response.live);
    }

    #[test]
    fn test_not_ready_has_empty_body() {
        let response = StatsApiError::NotReady.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().get(CONTENT_TYPE).is_none());
    }
}
