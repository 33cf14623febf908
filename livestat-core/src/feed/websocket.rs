//! WebSocket relay connector.

use super::{FeedError, FeedStream, LiveFeed};
use crate::events::FeedEvent;
use async_trait::async_trait;
use futures_util::{StreamExt, future};
use livestat_sdk::objects::FeedMessage;
use std::time::Duration;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info};
use url::Url;

/// Connects to a relay that re-publishes a live session as JSON frames.
///
/// The session is selected with a `session` query parameter, e.g.
/// `wss://relay.example/live?session=some_streamer`.
#[derive(Debug, Clone)]
pub struct WebSocketFeed {
    relay_url: Url,
    connect_timeout: Duration,
}

impl WebSocketFeed {
    pub fn new(relay_url: Url, connect_timeout: Duration) -> Self {
        Self {
            relay_url,
            connect_timeout,
        }
    }

    /// The relay URL for a specific session.
    pub fn session_url(&self, session_id: &str) -> Url {
        let mut url = self.relay_url.clone();
        url.query_pairs_mut().append_pair("session", session_id);
        url
    }
}

#[async_trait]
impl LiveFeed for WebSocketFeed {
    async fn connect(&self, session_id: &str) -> Result<FeedStream, FeedError> {
        let url = self.session_url(session_id);
        debug!(%url, "Connecting to feed relay");

        let (socket, response) =
            tokio::time::timeout(self.connect_timeout, connect_async(url.as_str()))
                .await
                .map_err(|_| FeedError::Timeout(self.connect_timeout))?
                .map_err(|e| match e {
                    tungstenite::Error::Http(response) => FeedError::Rejected {
                        session: session_id.to_string(),
                        reason: format!("relay answered {}", response.status()),
                    },
                    other => FeedError::Transport(other),
                })?;

        info!(session = session_id, status = %response.status(), "Feed relay connected");

        let stream = socket
            .take_while(|frame| future::ready(!matches!(frame, Ok(Message::Close(_)))))
            .filter_map(|frame| future::ready(decode_frame(frame)));
        Ok(stream.boxed())
    }
}

/// Decode one WebSocket frame. Control and binary frames carry no event.
fn decode_frame(frame: Result<Message, tungstenite::Error>) -> Option<Result<FeedEvent, FeedError>> {
    match frame {
        Ok(Message::Text(text)) => Some(
            serde_json::from_str::<FeedMessage>(&text)
                .map(FeedEvent::from)
                .map_err(FeedError::from),
        ),
        Ok(_) => None,
        Err(e) => Some(Err(FeedError::Transport(e))),
    }
}
