//! TOML file configuration structures.
//!
//! These structs directly map to the `livestat.toml` file format. Every
//! section is optional; absent sections take their defaults.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
    /// The dashboard listener only starts when this section is present.
    pub dashboard: Option<DashboardConfig>,
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

/// Query endpoint section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "127.0.0.1:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 8080))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Live session to attach to. Can also come from the CLI or environment.
    pub id: Option<String>,
}

/// Which connector feeds the aggregator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    #[default]
    WebSocket,
    Simulated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub kind: FeedKind,
    /// Relay endpoint. Required for the websocket feed.
    pub url: Option<Url>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            kind: FeedKind::default(),
            url: None,
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    #[serde(default = "default_comment_capacity")]
    pub comment_capacity: usize,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            comment_capacity: default_comment_capacity(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_secs: default_max_backoff_secs(),
        }
    }
}

fn default_comment_capacity() -> usize {
    10
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

fn default_max_backoff_secs() -> u64 {
    60
}

/// Static dashboard listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_dashboard_listen")]
    pub listen: SocketAddr,
    #[serde(default = "default_dashboard_dir")]
    pub dir: PathBuf,
}

fn default_dashboard_listen() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 8000))
}

fn default_dashboard_dir() -> PathBuf {
    PathBuf::from("./dashboard")
}

/// Synthetic traffic settings, used when `feed.kind = "simulated"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_base_viewers")]
    pub base_viewers: u64,
    #[serde(default = "default_viewer_range")]
    pub viewer_range: [i64; 2],
    #[serde(default = "default_likes_range")]
    pub likes_range: [u64; 2],
    #[serde(default = "default_follow_chance")]
    pub follow_chance: f64,
    #[serde(default = "default_share_chance")]
    pub share_chance: f64,
    #[serde(default = "default_comment_chance")]
    pub comment_chance: f64,
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            base_viewers: default_base_viewers(),
            viewer_range: default_viewer_range(),
            likes_range: default_likes_range(),
            follow_chance: default_follow_chance(),
            share_chance: default_share_chance(),
            comment_chance: default_comment_chance(),
            seed: None,
        }
    }
}

fn default_tick_ms() -> u64 {
    3000
}

fn default_base_viewers() -> u64 {
    45
}

fn default_viewer_range() -> [i64; 2] {
    [-15, 25]
}

fn default_likes_range() -> [u64; 2] {
    [1, 8]
}

fn default_follow_chance() -> f64 {
    0.05
}

fn default_share_chance() -> f64 {
    0.02
}

fn default_comment_chance() -> f64 {
    0.3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[session]
id = "some_streamer"

[feed]
kind = "websocket"
url = "wss://relay.example/live"
connect_timeout_secs = 5

[intake]
comment_capacity = 20
initial_backoff_ms = 250
max_backoff_secs = 30

[dashboard]
listen = "127.0.0.1:8001"
dir = "./public"

[simulator]
tick_ms = 500
seed = 7
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.session.id.as_deref(), Some("some_streamer"));
        assert_eq!(config.feed.kind, FeedKind::WebSocket);
        assert_eq!(
            config.feed.url.as_ref().map(Url::as_str),
            Some("wss://relay.example/live")
        );
        assert_eq!(config.feed.connect_timeout_secs, 5);
        assert_eq!(config.intake.comment_capacity, 20);
        assert_eq!(config.intake.initial_backoff_ms, 250);

        let dashboard = config.dashboard.unwrap();
        assert_eq!(dashboard.listen.port(), 8001);
        assert_eq!(dashboard.dir, PathBuf::from("./public"));

        assert_eq!(config.simulator.tick_ms, 500);
        assert_eq!(config.simulator.seed, Some(7));
        assert_eq!(config.simulator.base_viewers, 45);
    }

    #[test]
    fn test_empty_file_takes_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.listen, default_listen_addr());
        assert!(config.session.id.is_none());
        assert_eq!(config.feed.kind, FeedKind::WebSocket);
        assert_eq!(config.feed.connect_timeout_secs, 10);
        assert_eq!(config.intake.comment_capacity, 10);
        assert_eq!(config.intake.max_backoff_secs, 60);
        assert!(config.dashboard.is_none());
        assert_eq!(config.simulator.viewer_range, [-15, 25]);
        assert_eq!(config.simulator.likes_range, [1, 8]);
    }

    #[test]
    fn test_simulated_kind() {
        let config: FileConfig = toml::from_str("[feed]\nkind = \"simulated\"\n").unwrap();
        assert_eq!(config.feed.kind, FeedKind::Simulated);
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let result = toml::from_str::<FileConfig>("[metrics]\nenabled = true\n");
        assert!(result.is_err());
    }
}
