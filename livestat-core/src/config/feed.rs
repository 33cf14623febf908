use crate::feed::{LiveFeed, SimulatedFeed, SimulatorConfig, WebSocketFeed};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Which feed connector to run.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedConfig {
    /// A WebSocket relay publishing JSON frames.
    WebSocket { url: Url, connect_timeout: Duration },
    /// Synthetic traffic.
    Simulated(SimulatorConfig),
}

impl FeedConfig {
    /// Build the configured connector.
    pub fn build(&self) -> Arc<dyn LiveFeed> {
        match self {
            FeedConfig::WebSocket {
                url,
                connect_timeout,
            } => Arc::new(WebSocketFeed::new(url.clone(), *connect_timeout)),
            FeedConfig::Simulated(config) => Arc::new(SimulatedFeed::new(config.clone())),
        }
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedConfig::WebSocket { .. } => "websocket",
            FeedConfig::Simulated(_) => "simulated",
        }
    }
}
