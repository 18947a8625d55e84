//! Global atomic counters for engine observability.
//!
//! Counters are bumped by the pipeline entry points ([`crate::resolve_cumulative`],
//! [`crate::refresh_cumulative`], [`crate::evaluate_event`]); the pure scoring
//! and aggregation functions never touch them. Call [`Metrics::flush`] to emit
//! current values as a single `tracing::info!` event.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    sessions_scored: AtomicU64,
    aggregations_computed: AtomicU64,
    deltas_applied: AtomicU64,
    recomputes_forced: AtomicU64,
    skip_overrides_applied: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            sessions_scored: AtomicU64::new(0),
            aggregations_computed: AtomicU64::new(0),
            deltas_applied: AtomicU64::new(0),
            recomputes_forced: AtomicU64::new(0),
            skip_overrides_applied: AtomicU64::new(0),
        }
    }

    pub fn add_sessions_scored(&self, n: u64) {
        self.sessions_scored.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "sessions_scored", n, "counter incremented");
    }

    pub fn inc_aggregations(&self) {
        self.aggregations_computed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "aggregations_computed", "counter incremented");
    }

    pub fn inc_deltas(&self) {
        self.deltas_applied.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "deltas_applied", "counter incremented");
    }

    pub fn inc_recomputes_forced(&self) {
        self.recomputes_forced.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "recomputes_forced", "counter incremented");
    }

    pub fn inc_skip_overrides(&self) {
        self.skip_overrides_applied.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "skip_overrides_applied", "counter incremented");
    }

    /// Emit all current counter values as one `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            sessions_scored = self.sessions_scored(),
            aggregations_computed = self.aggregations_computed(),
            deltas_applied = self.deltas_applied(),
            recomputes_forced = self.recomputes_forced(),
            skip_overrides_applied = self.skip_overrides_applied(),
        );
    }

    pub fn sessions_scored(&self) -> u64 {
        self.sessions_scored.load(Ordering::Relaxed)
    }

    pub fn aggregations_computed(&self) -> u64 {
        self.aggregations_computed.load(Ordering::Relaxed)
    }

    pub fn deltas_applied(&self) -> u64 {
        self.deltas_applied.load(Ordering::Relaxed)
    }

    pub fn recomputes_forced(&self) -> u64 {
        self.recomputes_forced.load(Ordering::Relaxed)
    }

    pub fn skip_overrides_applied(&self) -> u64 {
        self.skip_overrides_applied.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.sessions_scored.store(0, Ordering::Relaxed);
        self.aggregations_computed.store(0, Ordering::Relaxed);
        self.deltas_applied.store(0, Ordering::Relaxed);
        self.recomputes_forced.store(0, Ordering::Relaxed);
        self.skip_overrides_applied.store(0, Ordering::Relaxed);
    }
}
