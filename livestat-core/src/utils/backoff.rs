use std::time::Duration;

/// Exponential reconnect backoff.
///
/// The first retry after a drop is immediate; after that the delay is
/// `initial * 2^(attempt - 1)`, capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub initial: Duration,
    pub max: Duration,
}

impl ReconnectPolicy {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { initial, max }
    }

    /// Returns the delay before reconnect attempt number `attempt` (0-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.pow((attempt - 1).min(31));
        self.initial.saturating_mul(factor).min(self.max)
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            max: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_calculation() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay(0), Duration::ZERO);
        assert_eq!(policy.delay(1), Duration::from_secs(1));
        assert_eq!(policy.delay(2), Duration::from_secs(2));
        assert_eq!(policy.delay(3), Duration::from_secs(4));
        assert_eq!(policy.delay(6), Duration::from_secs(32));
        // Capped at max
        assert_eq!(policy.delay(7), Duration::from_secs(60));
        assert_eq!(policy.delay(40), Duration::from_secs(60));
        assert_eq!(policy.delay(u32::MAX), Duration::from_secs(60));
    }

    #[test]
    fn test_sub_second_initial_delay() {
        let policy = ReconnectPolicy::new(Duration::from_millis(250), Duration::from_secs(2));
        assert_eq!(policy.delay(1), Duration::from_millis(250));
        assert_eq!(policy.delay(3), Duration::from_millis(1000));
        assert_eq!(policy.delay(5), Duration::from_secs(2));
    }
}
