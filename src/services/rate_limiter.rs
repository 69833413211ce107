//! Per-client sliding-window rate limiter.
//!
//! Each client keeps the timestamps of its admitted requests inside the
//! trailing window. A request is admitted while fewer than `limit` timestamps
//! remain after dropping the stale ones; throttled attempts are not recorded.
//! Bursts of up to `limit` requests are allowed anywhere inside the window.
//!
//! State lives in a `DashMap`, so the drop-then-append bookkeeping for one
//! client runs under that client's shard lock.
//!
//! # Memory bounds
//!
//! A client's stale timestamps are dropped whenever it is looked up. Clients
//! that went quiet are forgotten by a full sweep, which runs at most once per
//! window. When `max_clients` are tracked, a new client displaces the one
//! whose latest request is oldest.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Request admitted; `remaining` more fit into the current window.
    Admitted { remaining: usize },
    /// Request rejected; the oldest timestamp leaves the window after `retry_after`.
    Throttled { retry_after: Duration },
}

impl RateLimitDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }
}

#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<String, VecDeque<Instant>>,
    limit: usize,
    window: Duration,
    max_clients: usize,
    /// Reference point for `last_sweep_ms`.
    started: Instant,
    /// Milliseconds after `started` of the last full sweep.
    last_sweep_ms: AtomicU64,
}

impl RateLimiter {
    const DEFAULT_MAX_CLIENTS: usize = 100_000;

    #[must_use]
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            limit,
            window,
            max_clients: Self::DEFAULT_MAX_CLIENTS,
            started: Instant::now(),
            last_sweep_ms: AtomicU64::new(0),
        }
    }

    /// Track at most `max_clients` clients, displacing the least recently
    /// active one when a new client arrives at the cap.
    #[must_use]
    pub fn with_max_clients(mut self, max_clients: usize) -> Self {
        self.max_clients = max_clients.max(1);
        self
    }

    pub fn check(&self, client: &str) -> RateLimitDecision {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> RateLimitDecision {
        self.sweep_if_due(now);

        if !self.windows.contains_key(client) && self.windows.len() >= self.max_clients {
            self.make_room(now);
        }

        let mut timestamps = self.windows.entry(client.to_string()).or_default();
        drop_expired(&mut timestamps, now, self.window);

        if timestamps.len() >= self.limit {
            let retry_after = timestamps
                .front()
                .map(|oldest| (*oldest + self.window).saturating_duration_since(now))
                .unwrap_or(self.window);
            return RateLimitDecision::Throttled { retry_after };
        }

        timestamps.push_back(now);
        RateLimitDecision::Admitted {
            remaining: self.limit - timestamps.len(),
        }
    }

    /// Sweep every client, unless another sweep ran less than a window ago.
    fn sweep_if_due(&self, now: Instant) {
        let now_ms = self.millis_since_start(now);
        let last = self.last_sweep_ms.load(Ordering::Acquire);
        if now_ms.saturating_sub(last) < duration_millis(self.window) {
            return;
        }

        // Only the thread that moves the marker sweeps.
        if self
            .last_sweep_ms
            .compare_exchange(last, now_ms, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.evict_stale(now);
        }
    }

    /// Drop stale timestamps of every client and forget clients left empty.
    fn evict_stale(&self, now: Instant) {
        let window = self.window;
        self.windows.retain(|_, timestamps| {
            drop_expired(timestamps, now, window);
            !timestamps.is_empty()
        });
    }

    /// Free a slot for a new client: forget idle clients, then if still full
    /// the client whose latest request is oldest.
    fn make_room(&self, now: Instant) {
        self.evict_stale(now);
        if self.windows.len() < self.max_clients {
            return;
        }

        let least_recent = self
            .windows
            .iter()
            .min_by_key(|entry| entry.value().back().copied())
            .map(|entry| entry.key().clone());

        if let Some(client) = least_recent {
            tracing::debug!(client = %client, "Rate limiter full, evicting least recent client");
            self.windows.remove(&client);
        }
    }

    fn millis_since_start(&self, now: Instant) -> u64 {
        duration_millis(now.saturating_duration_since(self.started))
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn drop_expired(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = timestamps.front() {
        if now.saturating_duration_since(*oldest) >= window {
            timestamps.pop_front();
        } else {
            break;
        }
    }
}
