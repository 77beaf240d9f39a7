//! Backoff tracking for the external listings API.
//!
//! Bulk fetchers (sitemap aggregation, catalog sync, cache warming) walk
//! dozens of API pages in a row; when the upstream starts failing they must
//! not hammer it. Each host gets an exponential backoff window that doubles
//! on consecutive errors and resets on success or after a quiet period.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Minimum backoff delay in seconds
const MIN_BACKOFF_SECS: u64 = 5;
/// Maximum backoff delay in seconds
const MAX_BACKOFF_SECS: u64 = 60;
/// Time after which to reset backoff if no errors occur
const RESET_AFTER_QUIET_SECS: u64 = 120;

#[derive(Debug, Clone)]
struct BackoffState {
    /// Current backoff delay in seconds
    current_delay: u64,
    /// When the last error occurred
    last_error_at: Instant,
    /// Number of consecutive errors
    error_count: u32,
}

impl Default for BackoffState {
    fn default() -> Self {
        BackoffState {
            current_delay: MIN_BACKOFF_SECS,
            last_error_at: Instant::now(),
            error_count: 0,
        }
    }
}

/// Per-host backoff state for upstream requests.
pub struct BackoffTracker {
    states: RwLock<HashMap<String, BackoffState>>,
}

impl BackoffTracker {
    pub fn new() -> Self {
        BackoffTracker {
            states: RwLock::new(HashMap::new()),
        }
    }

    /// Record a successful request, clearing any backoff for the host.
    pub fn record_success(&self, key: &str) {
        if let Ok(mut states) = self.states.write() {
            states.remove(key);
        }
    }

    /// Record a failed request and get the new backoff delay in seconds.
    pub fn record_error(&self, key: &str) -> u64 {
        let mut states = match self.states.write() {
            Ok(s) => s,
            Err(_) => return MIN_BACKOFF_SECS,
        };

        let state = states.entry(key.to_string()).or_default();
        let now = Instant::now();

        let elapsed = now.duration_since(state.last_error_at);
        if elapsed > Duration::from_secs(RESET_AFTER_QUIET_SECS) {
            state.current_delay = MIN_BACKOFF_SECS;
            state.error_count = 1;
        } else {
            state.error_count += 1;
            if state.error_count > 1 {
                state.current_delay = (state.current_delay * 2).min(MAX_BACKOFF_SECS);
            }
        }

        state.last_error_at = now;
        let delay = state.current_delay;

        log::warn!(
            "Upstream error #{} for '{}', backoff {}s",
            state.error_count,
            key,
            delay
        );

        delay
    }

    /// Current backoff delay for the host, without recording anything.
    pub fn current_delay(&self, key: &str) -> Option<u64> {
        self.states
            .read()
            .ok()
            .and_then(|states| states.get(key).map(|s| s.current_delay))
    }

    /// Whether the host is still inside its backoff window. Bulk fetchers
    /// skip pages instead of waiting it out.
    pub fn in_backoff(&self, key: &str) -> bool {
        if let Ok(states) = self.states.read() {
            if let Some(state) = states.get(key) {
                return state.error_count > 0
                    && state.last_error_at.elapsed() < Duration::from_secs(state.current_delay);
            }
        }
        false
    }

    /// Check if an HTTP status code indicates a retryable error
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(
            status,
            408 | // Request Timeout
            429 | // Too Many Requests
            500 | // Internal Server Error (sometimes transient)
            502 | // Bad Gateway
            503 | // Service Unavailable
            504 | // Gateway Timeout
            520..=524 // Cloudflare edge errors
        )
    }
}

impl Default for BackoffTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper function to check if a reqwest error is retryable
pub fn is_retryable_reqwest_error(err: &reqwest::Error) -> bool {
    err.is_timeout()
        || err.is_connect()
        || err.is_request()
        || err
            .status()
            .map(|s| BackoffTracker::is_retryable_status(s.as_u16()))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_backoff_doubles_to_the_cap() {
        let tracker = BackoffTracker::new();

        assert_eq!(tracker.record_error("api"), 5);
        assert_eq!(tracker.record_error("api"), 10);
        assert_eq!(tracker.record_error("api"), 20);
        assert_eq!(tracker.record_error("api"), 40);
        assert_eq!(tracker.record_error("api"), 60);
        assert_eq!(tracker.record_error("api"), 60);
    }

    #[test]
    fn success_resets_backoff() {
        let tracker = BackoffTracker::new();

        tracker.record_error("api");
        tracker.record_error("api");
        assert_eq!(tracker.current_delay("api"), Some(10));

        tracker.record_success("api");
        assert_eq!(tracker.current_delay("api"), None);
        assert!(!tracker.in_backoff("api"));

        assert_eq!(tracker.record_error("api"), 5);
    }

    #[test]
    fn backoff_window_is_per_host() {
        let tracker = BackoffTracker::new();

        tracker.record_error("listings.example.com");
        assert!(tracker.in_backoff("listings.example.com"));
        assert!(!tracker.in_backoff("cities.example.com"));
    }

    #[test]
    fn retryable_status_codes() {
        assert!(BackoffTracker::is_retryable_status(502));
        assert!(BackoffTracker::is_retryable_status(503));
        assert!(BackoffTracker::is_retryable_status(429));
        assert!(BackoffTracker::is_retryable_status(522));
        assert!(!BackoffTracker::is_retryable_status(404));
        assert!(!BackoffTracker::is_retryable_status(401));
        assert!(!BackoffTracker::is_retryable_status(200));
    }
}
