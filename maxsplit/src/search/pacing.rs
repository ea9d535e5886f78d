//! Politeness pacing between external fetches.
//!
//! The booking site's usage policy requires a pause between successive
//! requests; issuing them back-to-back trips the anti-bot layer and gets
//! the session cookie invalidated. The delay is jittered so the request
//! rhythm does not look mechanical. This is a hard requirement of the
//! collaborator, not a tunable performance knob.

use std::ops::RangeInclusive;

use rand::Rng;
use tracing::trace;

/// Jittered delay inserted between page fetches and between leg fetches.
#[derive(Debug, Clone)]
pub struct Pacing {
    delay_ms: Option<RangeInclusive<u64>>,
}

impl Pacing {
    /// The production delay: 2 to 4 seconds.
    pub fn polite() -> Self {
        Self {
            delay_ms: Some(2_000..=4_000),
        }
    }

    /// No delay at all, for tests.
    pub fn none() -> Self {
        Self { delay_ms: None }
    }

    /// Fixed short millisecond range, for tests that assert a pause
    /// actually happens.
    #[cfg(test)]
    pub(crate) fn millis(range: RangeInclusive<u64>) -> Self {
        Self {
            delay_ms: Some(range),
        }
    }

    /// Pause for one jittered delay.
    pub async fn pause(&self) {
        if let Some(range) = &self.delay_ms {
            let millis = rand::rng().random_range(range.clone());
            trace!(millis, "pacing before next fetch");
            tokio::time::sleep(std::time::Duration::from_millis(millis)).await;
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::polite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn none_returns_immediately() {
        let start = std::time::Instant::now();
        Pacing::none().pause().await;
        assert!(start.elapsed() < std::time::Duration::from_millis(50));
    }

    #[test]
    fn polite_range_is_seconds() {
        let pacing = Pacing::polite();
        assert_eq!(pacing.delay_ms, Some(2_000..=4_000));
    }
}
