use std::time::Duration;

use rand::Rng;
use rand_distr::StandardNormal;

const JITTER_STD_DEV_SECS: f64 = 0.1;
const JITTER_MIN_SECS: f64 = -0.1;
const JITTER_MAX_SECS: f64 = 0.15;

/// Delay before each request: `wait`, then `wait` again with gaussian jitter
/// (sd 0.1 s, clamped to -0.1..=0.15 s) and never below zero.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    wait: Duration,
}

impl Throttle {
    pub fn new(wait: Duration) -> Self {
        Self { wait }
    }

    pub fn next_delay<R: Rng>(&self, rng: &mut R) -> Duration {
        let noise: f64 = rng.sample::<f64, _>(StandardNormal) * JITTER_STD_DEV_SECS;
        let jitter = noise.clamp(JITTER_MIN_SECS, JITTER_MAX_SECS);
        let jittered = (self.wait.as_secs_f64() + jitter).max(0.0);

        let jittered = Duration::try_from_secs_f64(jittered).unwrap_or(Duration::MAX);
        self.wait.saturating_add(jittered)
    }

    pub async fn pause(&self) {
        let delay = self.next_delay(&mut rand::thread_rng());
        log::debug!("Waiting {:.2}s before next request", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
    }
}
