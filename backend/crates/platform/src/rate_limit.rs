//! Rate Limiting Infrastructure
//!
//! Sliding-window request counting per client key: an exact count of
//! requests in the trailing window, not a fixed-bucket approximation.
//! Memory per key is O(requests in window); abandoned keys are removed by
//! a periodic sweep.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    /// Time until the oldest counted request leaves the window.
    /// Only set on rejection.
    pub retry_after: Option<Duration>,
}

/// In-memory sliding-window rate limiter
///
/// Owns a key → timestamps map behind a single mutex. The critical section
/// is the in-memory prune/check/append for one key; no I/O ever happens
/// under the lock. Construct one instance and share it via [`Arc`] — there
/// is deliberately no global.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    config: RateLimitConfig,
    entries: Mutex<HashMap<String, Vec<Instant>>>,
}

impl SlidingWindowLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Check and record a request for `key`
    ///
    /// Prunes timestamps older than the window, rejects when the pruned
    /// count has reached the limit, otherwise records the request and
    /// admits it.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        let stamps = entries.entry(key.to_string()).or_default();
        stamps.retain(|t| now.duration_since(*t) < self.config.window);

        if stamps.len() >= self.config.max_requests as usize {
            // Timestamps are appended in order, so the first one is the
            // oldest and the one whose expiry reopens the window.
            let retry_after = stamps
                .first()
                .map(|oldest| self.config.window - now.duration_since(*oldest));

            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                retry_after,
            };
        }

        stamps.push(now);
        let remaining = self.config.max_requests - stamps.len() as u32;

        RateLimitDecision {
            allowed: true,
            remaining,
            retry_after: None,
        }
    }

    /// Remove expired timestamps and abandoned keys
    ///
    /// Takes the lock once per key rather than once for the whole map, so
    /// a large map cannot starve request-path checks.
    pub fn sweep(&self) {
        self.sweep_at(Instant::now())
    }

    fn sweep_at(&self, now: Instant) {
        let keys: Vec<String> = {
            let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries.keys().cloned().collect()
        };

        let mut removed = 0usize;
        for key in keys {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(stamps) = entries.get_mut(&key) {
                stamps.retain(|t| now.duration_since(*t) < self.config.window);
                if stamps.is_empty() {
                    entries.remove(&key);
                    removed += 1;
                }
            }
        }

        if removed > 0 {
            tracing::debug!(keys_removed = removed, "Rate limiter sweep completed");
        }
    }

    /// Number of keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

/// Spawn the periodic sweep task for a shared limiter
///
/// Runs [`SlidingWindowLimiter::sweep`] every `period` on its own tokio
/// task, independent of request traffic.
pub fn spawn_sweeper(
    limiter: Arc<SlidingWindowLimiter>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick fires immediately; skip it so the sweep cadence
        // starts one period after startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            limiter.sweep();
        }
    })
}
