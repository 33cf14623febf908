//! Configuration module for livestat-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;
pub mod runtime;

use crate::config::file::{FeedKind, FileConfig, SimulatorConfig as FileSimulatorConfig};
use crate::config::runtime::{DashboardConfig, FeedConfig, IntakeConfig, ServerConfig};
use livestat_core::feed::SimulatorConfig;
use livestat_core::utils::backoff::ReconnectPolicy;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("no session id: set [session] id, LIVESTAT_SESSION_ID or --session")]
    MissingSession,
}

/// Loaded configuration result containing all parts.
#[derive(Debug)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub intake: IntakeConfig,
    pub feed: FeedConfig,
    pub dashboard: Option<DashboardConfig>,
}

/// Values from the command line or environment that replace file values.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub listen: Option<SocketAddr>,
    pub session: Option<String>,
    pub feed_url: Option<Url>,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    overrides: Overrides,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, overrides: Overrides) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            overrides,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file (a missing file means all defaults)
    /// 2. Apply CLI and environment overrides
    /// 3. Validate the configuration
    /// 4. Build the loaded configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(
                    path = %self.config_path.display(),
                    "Config file not found, using defaults"
                );
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };
        self.resolve(file_config)
    }

    /// Apply overrides to a parsed file, validate it, and build the runtime
    /// configuration.
    pub fn resolve(&self, mut file_config: FileConfig) -> Result<LoadedConfig, ConfigError> {
        if let Some(listen) = self.overrides.listen {
            file_config.server.listen = listen;
        }
        if let Some(session) = &self.overrides.session {
            file_config.session.id = Some(session.clone());
        }
        if let Some(url) = &self.overrides.feed_url {
            file_config.feed.url = Some(url.clone());
        }

        self.validate(&file_config)?;
        build_loaded_config(file_config)
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        match config.session.id.as_deref().map(str::trim) {
            None => return Err(ConfigError::MissingSession),
            Some("") => {
                return Err(ConfigError::ValidationError(
                    "session id must not be empty".to_string(),
                ));
            }
            Some(_) => {}
        }

        if config.feed.kind == FeedKind::WebSocket && config.feed.url.is_none() {
            return Err(ConfigError::ValidationError(
                "feed.url is required for the websocket feed".to_string(),
            ));
        }
        if config.intake.comment_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "intake.comment_capacity must be at least 1".to_string(),
            ));
        }
        if config.intake.initial_backoff_ms == 0 {
            return Err(ConfigError::ValidationError(
                "intake.initial_backoff_ms must be at least 1".to_string(),
            ));
        }
        if config.intake.max_backoff_secs == 0 {
            return Err(ConfigError::ValidationError(
                "intake.max_backoff_secs must be at least 1".to_string(),
            ));
        }
        if config.intake.max_backoff_secs.saturating_mul(1000) < config.intake.initial_backoff_ms {
            return Err(ConfigError::ValidationError(format!(
                "intake.max_backoff_secs ({}s) is below intake.initial_backoff_ms ({}ms)",
                config.intake.max_backoff_secs, config.intake.initial_backoff_ms
            )));
        }

        let sim = &config.simulator;
        if sim.viewer_range[0] > sim.viewer_range[1] {
            return Err(ConfigError::ValidationError(format!(
                "simulator.viewer_range is inverted: {:?}",
                sim.viewer_range
            )));
        }
        if sim.likes_range[0] > sim.likes_range[1] {
            return Err(ConfigError::ValidationError(format!(
                "simulator.likes_range is inverted: {:?}",
                sim.likes_range
            )));
        }
        for (name, chance) in [
            ("follow_chance", sim.follow_chance),
            ("share_chance", sim.share_chance),
            ("comment_chance", sim.comment_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::ValidationError(format!(
                    "simulator.{name} must be within [0, 1], got {chance}"
                )));
            }
        }
        if sim.tick_ms == 0 {
            return Err(ConfigError::ValidationError(
                "simulator.tick_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn build_loaded_config(file_config: FileConfig) -> Result<LoadedConfig, ConfigError> {
    let session_id = file_config
        .session
        .id
        .map(|id| id.trim().to_string())
        .ok_or(ConfigError::MissingSession)?;
    let comment_capacity = NonZeroUsize::new(file_config.intake.comment_capacity).ok_or_else(
        || ConfigError::ValidationError("intake.comment_capacity must be at least 1".to_string()),
    )?;

    let intake = IntakeConfig {
        session_id,
        comment_capacity,
        reconnect: ReconnectPolicy::new(
            Duration::from_millis(file_config.intake.initial_backoff_ms),
            Duration::from_secs(file_config.intake.max_backoff_secs),
        ),
    };

    let feed = match file_config.feed.kind {
        FeedKind::WebSocket => {
            let url = file_config.feed.url.ok_or_else(|| {
                ConfigError::ValidationError(
                    "feed.url is required for the websocket feed".to_string(),
                )
            })?;
            FeedConfig::WebSocket {
                url,
                connect_timeout: Duration::from_secs(file_config.feed.connect_timeout_secs),
            }
        }
        FeedKind::Simulated => FeedConfig::Simulated(convert_simulator(file_config.simulator)),
    };

    Ok(LoadedConfig {
        server: ServerConfig {
            listen: file_config.server.listen,
        },
        intake,
        feed,
        dashboard: file_config.dashboard.map(|d| DashboardConfig {
            listen: d.listen,
            dir: d.dir,
        }),
    })
}

fn convert_simulator(s: FileSimulatorConfig) -> SimulatorConfig {
    SimulatorConfig {
        tick: Duration::from_millis(s.tick_ms),
        base_viewers: s.base_viewers,
        viewer_range: (s.viewer_range[0], s.viewer_range[1]),
        likes_range: (s.likes_range[0], s.likes_range[1]),
        follow_chance: s.follow_chance,
        share_chance: s.share_chance,
        comment_chance: s.comment_chance,
        seed: s.seed,
        ..SimulatorConfig::default()
    }
}
