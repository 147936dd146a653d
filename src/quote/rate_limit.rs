//! Token-bucket limiter shared by every call to the quote service

use crate::config::QuoteConfig;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::time::Instant;
use tracing::{debug, trace};

/// Process-wide throttle for the 1inch API request ceiling
pub struct QuoteRateLimiter {
    limiter: DefaultDirectRateLimiter,
}

impl QuoteRateLimiter {
    pub fn new(requests_per_second: u32, burst: u32) -> Self {
        let rps = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: RateLimiter::direct(Quota::per_second(rps).allow_burst(burst)),
        }
    }

    pub fn from_config(config: &QuoteConfig) -> Self {
        Self::new(config.requests_per_second, config.burst)
    }

    /// Wait for a permit before calling `endpoint`
    pub async fn acquire(&self, endpoint: &str) {
        let wait_start = Instant::now();
        self.limiter.until_ready().await;
        let waited = wait_start.elapsed();

        if waited.as_millis() > 1000 {
            debug!(
                endpoint = endpoint,
                wait_ms = waited.as_millis() as u64,
                "Long rate limit wait detected"
            );
        }
        trace!(endpoint = endpoint, wait_ms = waited.as_millis() as u64, "Rate limit check passed");
        crate::metrics::record_rate_limit_wait(waited.as_secs_f64());
    }
}
