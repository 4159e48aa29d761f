//! Per-client sliding-window rate limiting
//!
//! In-memory, per-process gate in front of the notification pipeline. Each
//! client key gets a fixed window anchored at its first request; expired
//! entries are swept lazily on every check, so no background task is needed.
//!
//! The limiter is an explicit, injectable store: the service owns one behind
//! a `Mutex` in app state. Under horizontal scaling the effective limit is
//! per warm instance, a documented imprecision.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default maximum requests per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 5;

/// Default window length in milliseconds.
pub const DEFAULT_WINDOW_MS: u64 = 60_000;

/// Tracking record for a single client key.
#[derive(Debug, Clone)]
struct WindowEntry {
    /// Requests counted in the current window
    count: u32,
    /// Epoch milliseconds at which the window expires
    reset_at_ms: u64,
}

/// Outcome of a rate-limit check.
///
/// Denial is a reportable decision, not an error: the caller turns it into a
/// 429 and stamps the `X-RateLimit-*` headers from these fields on every
/// response, allowed or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Configured maximum for the window
    pub limit: u32,
    /// Requests left in the current window (0 when denied)
    pub remaining: u32,
    /// Epoch milliseconds at which the current window expires
    pub reset_at_ms: u64,
    /// Populated only on denial
    pub retry_after_ms: Option<u64>,
}

/// In-memory rate limiter keyed by client identity.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window_ms: u64,
    entries: HashMap<String, WindowEntry>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_MS)
    }
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_ms: u64) -> Self {
        Self {
            max_requests,
            window_ms,
            entries: HashMap::new(),
        }
    }

    /// Check a request from `key` against the limit, counting it if allowed.
    pub fn check(&mut self, key: &str) -> RateLimitDecision {
        self.check_at(key, epoch_ms())
    }

    /// Clock-injected variant of [`check`](Self::check).
    ///
    /// All window arithmetic lives here so expiry is testable without
    /// sleeping.
    pub fn check_at(&mut self, key: &str, now_ms: u64) -> RateLimitDecision {
        // Lazy GC: drop every expired window on each invocation.
        self.entries.retain(|_, entry| entry.reset_at_ms > now_ms);

        let limit = self.max_requests;

        match self.entries.get_mut(key) {
            Some(entry) if entry.count >= limit => RateLimitDecision {
                allowed: false,
                limit,
                remaining: 0,
                reset_at_ms: entry.reset_at_ms,
                retry_after_ms: Some(entry.reset_at_ms.saturating_sub(now_ms)),
            },
            Some(entry) => {
                entry.count += 1;
                RateLimitDecision {
                    allowed: true,
                    limit,
                    remaining: limit - entry.count,
                    reset_at_ms: entry.reset_at_ms,
                    retry_after_ms: None,
                }
            }
            None => {
                let reset_at_ms = now_ms + self.window_ms;
                self.entries
                    .insert(key.to_string(), WindowEntry { count: 1, reset_at_ms });
                RateLimitDecision {
                    allowed: true,
                    limit,
                    remaining: limit - 1,
                    reset_at_ms,
                    retry_after_ms: None,
                }
            }
        }
    }

    /// Current request count for a key (0 when untracked or expired).
    pub fn count(&self, key: &str) -> u32 {
        self.entries.get(key).map_or(0, |e| e.count)
    }

    /// Number of tracked keys (post-sweep snapshot).
    pub fn tracked_count(&self) -> usize {
        self.entries.len()
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_limit() {
        let mut limiter = RateLimiter::new(5, 60_000);
        for i in 0..5 {
            let decision = limiter.check_at("10.0.0.1", 1_000);
            assert!(decision.allowed, "request {} should pass", i + 1);
        }
    }

    #[test]
    fn denies_sixth_request_in_window() {
        let mut limiter = RateLimiter::new(5, 60_000);
        for _ in 0..5 {
            assert!(limiter.check_at("10.0.0.1", 1_000).allowed);
        }
        let denied = limiter.check_at("10.0.0.1", 2_000);
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.retry_after_ms, Some(59_000));
    }

    #[test]
    fn fresh_window_after_reset_time() {
        let mut limiter = RateLimiter::new(5, 60_000);
        for _ in 0..6 {
            limiter.check_at("10.0.0.1", 1_000);
        }
        // Past reset_at_ms (1_000 + 60_000) the key starts over at count 1.
        let decision = limiter.check_at("10.0.0.1", 61_001);
        assert!(decision.allowed);
        assert_eq!(limiter.count("10.0.0.1"), 1);
        assert_eq!(decision.remaining, 4);
        assert_eq!(decision.reset_at_ms, 61_001 + 60_000);
    }

    #[test]
    fn remaining_counts_down() {
        let mut limiter = RateLimiter::new(3, 60_000);
        assert_eq!(limiter.check_at("k", 0).remaining, 2);
        assert_eq!(limiter.check_at("k", 1).remaining, 1);
        assert_eq!(limiter.check_at("k", 2).remaining, 0);
        assert!(!limiter.check_at("k", 3).allowed);
    }

    #[test]
    fn keys_are_independent() {
        let mut limiter = RateLimiter::new(2, 60_000);
        limiter.check_at("a", 0);
        limiter.check_at("a", 0);
        assert!(!limiter.check_at("a", 0).allowed);
        assert!(limiter.check_at("b", 0).allowed);
    }

    #[test]
    fn expired_entries_are_swept_on_check() {
        let mut limiter = RateLimiter::new(5, 60_000);
        limiter.check_at("a", 0);
        limiter.check_at("b", 0);
        assert_eq!(limiter.tracked_count(), 2);

        // A check for any key past both resets sweeps the stale records.
        limiter.check_at("c", 70_000);
        assert_eq!(limiter.tracked_count(), 1);
        assert_eq!(limiter.count("a"), 0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the first N requests in a window are always allowed.
        #[test]
        fn first_n_requests_allowed(limit in 1u32..100, key in "[a-z0-9.]{5,15}") {
            let mut limiter = RateLimiter::new(limit, 60_000);
            for i in 0..limit {
                prop_assert!(
                    limiter.check_at(&key, 1_000).allowed,
                    "request {} should be allowed", i + 1
                );
            }
        }

        /// Property: request N+1 within the window is always denied.
        #[test]
        fn request_after_limit_denied(limit in 1u32..50, key in "[a-z0-9.]{5,15}") {
            let mut limiter = RateLimiter::new(limit, 60_000);
            for _ in 0..limit {
                limiter.check_at(&key, 1_000);
            }
            prop_assert!(!limiter.check_at(&key, 1_000).allowed);
        }

        /// Property: remaining + count == limit while the window is open.
        #[test]
        fn remaining_is_complement_of_count(
            limit in 1u32..50,
            requests in 1u32..50,
        ) {
            let mut limiter = RateLimiter::new(limit, 60_000);
            let mut last = None;
            for _ in 0..requests.min(limit) {
                last = Some(limiter.check_at("key", 1_000));
            }
            let decision = last.unwrap();
            prop_assert_eq!(decision.remaining + limiter.count("key"), limit);
        }

        /// Property: a denial always reports a retry interval bounded by the
        /// window length.
        #[test]
        fn denial_reports_bounded_retry(limit in 1u32..10, extra in 1u32..10) {
            let mut limiter = RateLimiter::new(limit, 60_000);
            for _ in 0..(limit + extra) {
                limiter.check_at("key", 500);
            }
            let denied = limiter.check_at("key", 500);
            prop_assert!(!denied.allowed);
            let retry = denied.retry_after_ms.unwrap();
            prop_assert!(retry <= 60_000);
        }

        /// Property: after the window expires, any key is back to a full
        /// allowance regardless of prior history.
        #[test]
        fn window_expiry_resets_allowance(
            limit in 1u32..20,
            prior in 0u32..60,
        ) {
            let mut limiter = RateLimiter::new(limit, 60_000);
            for _ in 0..prior {
                limiter.check_at("key", 1_000);
            }
            let decision = limiter.check_at("key", 61_001);
            prop_assert!(decision.allowed);
            prop_assert_eq!(decision.remaining, limit - 1);
        }
    }
}
