//! Fixed-spacing rate limiter for market data providers.
//!
//! Each provider gets a slot holding the earliest instant at which its next
//! request may start. Acquiring a slot reserves it and pushes it forward by the
//! provider's configured delay, so concurrent callers queue up one delay apart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::provider::RateLimit;

/// Rate limiter enforcing a minimum delay between requests per provider.
pub struct RateLimiter {
    /// Per-provider earliest start of the next request.
    next_slots: Mutex<HashMap<String, Instant>>,
    /// Per-provider configuration overrides.
    configs: Mutex<HashMap<String, RateLimit>>,
    /// Delay used for providers without an explicit configuration.
    default_delay: Duration,
}

impl RateLimiter {
    /// Create a new rate limiter with the default provider delay.
    pub fn new() -> Self {
        Self::with_default_delay(RateLimit::default().min_delay)
    }

    /// Create a rate limiter whose unconfigured providers use `delay`.
    pub fn with_default_delay(delay: Duration) -> Self {
        Self {
            next_slots: Mutex::new(HashMap::new()),
            configs: Mutex::new(HashMap::new()),
            default_delay: delay,
        }
    }

    /// Lock the slots mutex, recovering from poison if necessary.
    ///
    /// The worst case after recovery is slightly incorrect pacing.
    fn lock_slots(&self) -> MutexGuard<'_, HashMap<String, Instant>> {
        self.next_slots.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter slots mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn lock_configs(&self) -> MutexGuard<'_, HashMap<String, RateLimit>> {
        self.configs.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter configs mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Configure the delay for a specific provider and clear its pending slot.
    pub fn configure(&self, provider: &str, config: RateLimit) {
        let mut configs = self.lock_configs();
        configs.insert(provider.to_string(), config);
        drop(configs);

        self.lock_slots().remove(provider);
    }

    fn delay_for(&self, provider: &str) -> Duration {
        self.lock_configs()
            .get(provider)
            .map(|c| c.min_delay)
            .unwrap_or(self.default_delay)
    }

    /// Wait until the provider may be called again, then reserve the slot.
    pub async fn acquire(&self, provider: &str) {
        let delay = self.delay_for(provider);
        let wait_time = {
            let mut slots = self.lock_slots();
            let now = Instant::now();
            let start = slots
                .get(provider)
                .copied()
                .filter(|next| *next > now)
                .unwrap_or(now);
            slots.insert(provider.to_string(), start + delay);
            start - now
        };

        if wait_time > Duration::ZERO {
            debug!(
                "Rate limiter: waiting {:?} for provider '{}'",
                wait_time, provider
            );
            tokio::time::sleep(wait_time).await;
        }
    }

    /// Reserve the slot only if the provider may be called right now.
    pub fn try_acquire(&self, provider: &str) -> bool {
        let delay = self.delay_for(provider);
        let mut slots = self.lock_slots();
        let now = Instant::now();

        match slots.get(provider) {
            Some(next) if *next > now => false,
            _ => {
                slots.insert(provider.to_string(), now + delay);
                true
            }
        }
    }

    /// Forget the pending slot of a provider.
    pub fn reset(&self, provider: &str) {
        self.lock_slots().remove(provider);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
