//! Simulated live session.
//!
//! Produces plausible traffic without any upstream: a connect event, then
//! on every tick a viewer fluctuation, a like burst, and occasionally a
//! follow, share, or comment. Useful for dashboard work and demos.

use super::{FeedError, FeedStream, LiveFeed};
use crate::events::FeedEvent;
use async_trait::async_trait;
use compact_str::CompactString;
use futures_util::{StreamExt, stream};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::info;

/// Tuning knobs for [`SimulatedFeed`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Time between simulated batches.
    pub tick: Duration,
    /// Viewer count reported on connect.
    pub base_viewers: u64,
    /// Inclusive per-tick viewer change.
    pub viewer_range: (i64, i64),
    /// Inclusive per-tick like burst size.
    pub likes_range: (u64, u64),
    pub follow_chance: f64,
    pub share_chance: f64,
    pub comment_chance: f64,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
    pub sample_users: Vec<CompactString>,
    pub sample_comments: Vec<String>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(3),
            base_viewers: 45,
            viewer_range: (-15, 25),
            likes_range: (1, 8),
            follow_chance: 0.05,
            share_chance: 0.02,
            comment_chance: 0.3,
            seed: None,
            sample_users: [
                "musicfan2024",
                "streamer_pro",
                "contentlover",
                "tiktoker_mx",
                "livefan",
                "viewer_123",
                "music_addict",
                "live_watcher",
            ]
            .into_iter()
            .map(CompactString::from)
            .collect(),
            sample_comments: [
                "Amazing content! 🔥",
                "Love this stream",
                "Saludos desde México 🇲🇽",
                "When is the next live?",
                "Tutorial please! 🙏",
                "From Spain! 🇪🇸",
                "Keep it up! 💪",
                "Amazing skills! 👏",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// A [`LiveFeed`] that invents its own events.
#[derive(Debug)]
pub struct SimulatedFeed {
    config: SimulatorConfig,
    connections: AtomicU64,
}

impl SimulatedFeed {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config,
            connections: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl LiveFeed for SimulatedFeed {
    async fn connect(&self, session_id: &str) -> Result<FeedStream, FeedError> {
        let connection = self.connections.fetch_add(1, Ordering::Relaxed);
        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(connection)),
            None => StdRng::from_os_rng(),
        };
        info!(session = session_id, connection, "Simulated feed connected");

        let session = Simulation::new(self.config.clone(), rng);
        let hello = stream::iter([Ok(FeedEvent::Connect {
            viewers: session.viewers,
        })]);
        let ticks = stream::unfold(session, |mut session| async move {
            tokio::time::sleep(session.config.tick).await;
            let batch = session.next_batch();
            Some((stream::iter(batch.into_iter().map(Ok)), session))
        })
        .flatten();

        Ok(hello.chain(ticks).boxed())
    }
}

/// State of one simulated connection.
struct Simulation {
    config: SimulatorConfig,
    rng: StdRng,
    viewers: u64,
}

impl Simulation {
    fn new(config: SimulatorConfig, rng: StdRng) -> Self {
        Self {
            viewers: config.base_viewers,
            config,
            rng,
        }
    }

    /// Events for one tick, in emission order.
    fn next_batch(&mut self) -> Vec<FeedEvent> {
        let mut batch = Vec::new();

        let (low, high) = ordered(self.config.viewer_range);
        let change = self.rng.random_range(low..=high);
        self.viewers = self.viewers.saturating_add_signed(change);
        batch.push(FeedEvent::ViewerUpdate {
            viewers: self.viewers,
        });

        let (low, high) = ordered(self.config.likes_range);
        let count = self.rng.random_range(low..=high);
        if count > 0 {
            batch.push(FeedEvent::Like {
                author: self.pick_user(),
                count,
            });
        }

        if self.chance(self.config.follow_chance) {
            for _ in 0..self.rng.random_range(1..=3) {
                batch.push(FeedEvent::Follow {
                    author: self.pick_user(),
                });
            }
        }

        if self.chance(self.config.share_chance) {
            batch.push(FeedEvent::Share {
                author: self.pick_user(),
            });
        }

        if self.chance(self.config.comment_chance) {
            let text = self
                .config
                .sample_comments
                .choose(&mut self.rng)
                .cloned()
                .unwrap_or_else(|| "👋".to_string());
            batch.push(FeedEvent::Comment {
                author: self.pick_user(),
                text,
            });
        }

        batch
    }

    /// `NaN` never fires.
    fn chance(&mut self, probability: f64) -> bool {
        self.rng.random::<f64>() < probability
    }

    fn pick_user(&mut self) -> CompactString {
        self.config
            .sample_users
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| CompactString::from("anonymous"))
    }
}

fn ordered<T: PartialOrd>((a, b): (T, T)) -> (T, T) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(config: SimulatorConfig) -> Simulation {
        Simulation::new(config, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_batches_respect_ranges() {
        let config = SimulatorConfig::default();
        let mut sim = seeded(config.clone());

        for _ in 0..500 {
            let before = sim.viewers;
            let batch = sim.next_batch();

            let FeedEvent::ViewerUpdate { viewers } = batch[0] else {
                panic!("first event of a batch must be a viewer update");
            };
            let change = viewers as i64 - before as i64;
            assert!(viewers == 0 || (-15..=25).contains(&change));

            for event in &batch[1..] {
                match event {
                    FeedEvent::Like { count, .. } => assert!((1..=8).contains(count)),
                    FeedEvent::Comment { text, author } => {
                        assert!(config.sample_comments.contains(text));
                        assert!(config.sample_users.contains(author));
                    }
                    FeedEvent::Follow { .. } | FeedEvent::Share { .. } => {}
                    other => panic!("unexpected simulated event {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_viewers_never_underflow() {
        let config = SimulatorConfig {
            base_viewers: 3,
            viewer_range: (-50, -10),
            ..SimulatorConfig::default()
        };
        let mut sim = seeded(config);
        sim.next_batch();
        assert_eq!(sim.viewers, 0);
    }

    #[test]
    fn test_certain_and_impossible_chances() {
        let config = SimulatorConfig {
            follow_chance: 0.0,
            share_chance: 1.0,
            comment_chance: 1.0,
            likes_range: (0, 0),
            ..SimulatorConfig::default()
        };
        let mut sim = seeded(config);
        let batch = sim.next_batch();

        assert!(!batch.iter().any(|e| matches!(e, FeedEvent::Follow { .. })));
        assert!(!batch.iter().any(|e| matches!(e, FeedEvent::Like { .. })));
        assert!(batch.iter().any(|e| matches!(e, FeedEvent::Share { .. })));
        assert!(batch.iter().any(|e| matches!(e, FeedEvent::Comment { .. })));
    }

    #[test]
    fn test_out_of_range_chances_do_not_panic() {
        let config = SimulatorConfig {
            follow_chance: f64::NAN,
            share_chance: 7.0,
            comment_chance: -1.0,
            ..SimulatorConfig::default()
        };
        let mut sim = seeded(config);
        for _ in 0..50 {
            let batch = sim.next_batch();
            assert!(!batch.iter().any(|e| matches!(e, FeedEvent::Follow { .. })));
            assert!(batch.iter().any(|e| matches!(e, FeedEvent::Share { .. })));
            assert!(!batch.iter().any(|e| matches!(e, FeedEvent::Comment { .. })));
        }
    }

    #[test]
    fn test_same_seed_same_traffic() {
        let mut a = seeded(SimulatorConfig::default());
        let mut b = seeded(SimulatorConfig::default());
        for _ in 0..50 {
            assert_eq!(a.next_batch(), b.next_batch());
        }
    }

    #[tokio::test]
    async fn test_stream_starts_with_connect() {
        let feed = SimulatedFeed::new(SimulatorConfig {
            tick: Duration::from_millis(1),
            seed: Some(1),
            ..SimulatorConfig::default()
        });
        let mut stream = feed.connect("demo").await.unwrap();

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first, FeedEvent::Connect { viewers: 45 });

        let second = stream.next().await.unwrap().unwrap();
        assert!(matches!(second, FeedEvent::ViewerUpdate { .. }));
    }
}
