// Demo Pacing
// Optional fixed pauses between protocol steps so a human can follow along

use std::time::Duration;

/// Delay inserted between protocol steps; zero disables it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pacing {
    delay: Duration,
}

impl Pacing {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn is_enabled(&self) -> bool {
        !self.delay.is_zero()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn pause(&self) {
        if self.is_enabled() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_by_default() {
        assert!(!Pacing::default().is_enabled());
        assert!(!Pacing::from_millis(0).is_enabled());
        assert!(Pacing::from_millis(5).is_enabled());
        assert_eq!(Pacing::from_millis(5).delay(), Duration::from_millis(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_waits_for_delay() {
        let pacing = Pacing::new(Duration::from_secs(2));
        let start = tokio::time::Instant::now();
        pacing.pause().await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
