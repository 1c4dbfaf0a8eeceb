//! Login rate limiting
//!
//! Attempts are counted per username. Going over the limit inside the window
//! bans the key for a fixed duration; a successful login clears it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::info;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of attempts allowed
    pub max_attempts: u32,
    /// Time window in seconds
    pub window_seconds: u64,
    /// Ban duration in seconds
    pub ban_duration_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,        // 5 minutes
            ban_duration_seconds: 3600, // 1 hour
        }
    }
}

#[derive(Debug)]
struct Attempts {
    count: u32,
    window_start: Instant,
    banned_until: Option<Instant>,
}

/// Per-key attempt counter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, Attempts>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record an attempt for `key`; false when the key is banned
    pub async fn is_allowed(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let window = Duration::from_secs(self.config.window_seconds);

        // keys whose window and ban have both run out hold nothing worth keeping
        entries.retain(|_, attempts| {
            attempts.banned_until.is_some_and(|until| now < until)
                || now.duration_since(attempts.window_start) < window
        });

        let entry = entries.entry(key.to_string()).or_insert(Attempts {
            count: 0,
            window_start: now,
            banned_until: None,
        });

        if let Some(banned_until) = entry.banned_until {
            if now < banned_until {
                return false;
            }
            entry.banned_until = None;
            entry.count = 0;
            entry.window_start = now;
        }

        if now.duration_since(entry.window_start) >= window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= self.config.max_attempts {
            entry.banned_until = Some(now + Duration::from_secs(self.config.ban_duration_seconds));
            info!(
                "Banned key {} for {} seconds",
                key, self.config.ban_duration_seconds
            );
            return false;
        }

        entry.count += 1;
        true
    }

    /// Forget every attempt recorded for `key`
    pub async fn reset(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_attempts: u32) -> RateLimiter {
        RateLimiter::new(RateLimiterConfig {
            max_attempts,
            window_seconds: 300,
            ban_duration_seconds: 3600,
        })
    }

    #[tokio::test]
    async fn test_bans_after_max_attempts() {
        let limiter = limiter(3);
        for _ in 0..3 {
            assert!(limiter.is_allowed("alice").await);
        }
        assert!(!limiter.is_allowed("alice").await);
        assert!(!limiter.is_allowed("alice").await);
        assert!(limiter.is_allowed("bob").await);
    }

    #[tokio::test]
    async fn test_reset_clears_attempts() {
        let limiter = limiter(1);
        assert!(limiter.is_allowed("alice").await);
        limiter.reset("alice").await;
        assert!(limiter.is_allowed("alice").await);
    }

    #[tokio::test]
    async fn test_expired_window_starts_over() {
        let limiter = RateLimiter::new(RateLimiterConfig {
            max_attempts: 1,
            window_seconds: 0,
            ban_duration_seconds: 3600,
        });
        assert!(limiter.is_allowed("alice").await);
        assert!(limiter.is_allowed("alice").await);
    }

    #[tokio::test]
    async fn test_expired_entries_are_evicted() {
        let limiter = RateLimiter::new(RateLimiterConfig {
            max_attempts: 5,
            window_seconds: 0,
            ban_duration_seconds: 0,
        });
        for i in 0..100 {
            assert!(limiter.is_allowed(&format!("ghost-{}", i)).await);
        }
        assert_eq!(limiter.entries.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_live_entries_are_kept() {
        let limiter = limiter(5);
        for i in 0..10 {
            limiter.is_allowed(&format!("user-{}", i)).await;
        }
        assert_eq!(limiter.entries.lock().await.len(), 10);
    }

    #[test]
    fn test_default_config() {
        let config = RateLimiterConfig::default();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.window_seconds, 300);
        assert_eq!(config.ban_duration_seconds, 3600);
    }
}
