//! Cooldown-gated edge latch for one digital input
//!
//! An interrupt latches an edge; the polling loop consumes it at most
//! once, then the channel is deaf until the cooldown elapses. Timestamps
//! are milliseconds supplied by the caller; this crate owns no clock.

use portable_atomic::{AtomicBool, AtomicU64, Ordering};

use super::router::InputChannel;

/// Cooldown armed after an action is consumed
pub const DEBOUNCE_COOLDOWN_MS: u64 = 50;

/// Default suppression window for deliberate post-transition muting
pub const DEFAULT_SUPPRESS_MS: u64 = 500;

/// One debounced input channel.
///
/// Field ownership is strictly split between contexts: the interrupt
/// side is the sole writer of `pending` (set) and `triggered_at_ms`;
/// the polling loop is the sole writer of `cooldown_until_ms` and the
/// sole clearer of `pending`. No locks; the atomics are plain
/// store/load plus one `swap` on the consumer side.
pub struct DebouncedInput {
    channel: InputChannel,
    pending: AtomicBool,
    triggered_at_ms: AtomicU64,
    cooldown_until_ms: AtomicU64,
}

impl DebouncedInput {
    /// Create an idle channel; `const` so routers can live in statics
    pub const fn new(channel: InputChannel) -> Self {
        Self {
            channel,
            pending: AtomicBool::new(false),
            triggered_at_ms: AtomicU64::new(0),
            cooldown_until_ms: AtomicU64::new(0),
        }
    }

    /// Get the logical channel this input serves
    pub fn channel(&self) -> InputChannel {
        self.channel
    }

    /// Latch an edge.
    ///
    /// Interrupt context only. Two atomic stores and nothing else - no
    /// locking, no unbounded work.
    pub fn trigger(&self, now_ms: u64) {
        // Timestamp first so a consumer that observes the flag also
        // observes a timestamp at least as fresh as the flag's edge.
        self.triggered_at_ms.store(now_ms, Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
    }

    /// Consume the latched edge if one is present and the cooldown has
    /// elapsed.
    ///
    /// Polling loop only. Returns `true` at most once per latched edge;
    /// a `true` arms a [`DEBOUNCE_COOLDOWN_MS`] window during which this
    /// returns `false` even if another edge re-arms the channel. The
    /// pending edge survives the window and is reported once it closes.
    pub fn take_action_if_possible(&self, now_ms: u64) -> bool {
        if now_ms < self.cooldown_until_ms.load(Ordering::Relaxed) {
            return false;
        }

        if self.pending.swap(false, Ordering::AcqRel) {
            self.cooldown_until_ms
                .store(now_ms + DEBOUNCE_COOLDOWN_MS, Ordering::Relaxed);
            return true;
        }

        false
    }

    /// Impose a forward cooldown without consuming an edge.
    ///
    /// Used to ignore spurious re-triggers right after a deliberate
    /// transition, e.g. the button press that caused the transition.
    pub fn prevent_trigger_for(&self, now_ms: u64, duration_ms: u64) {
        self.cooldown_until_ms
            .store(now_ms + duration_ms, Ordering::Relaxed);
    }

    /// Timestamp of the most recent edge, for status reporting
    pub fn last_triggered_at(&self) -> u64 {
        self.triggered_at_ms.load(Ordering::Relaxed)
    }
}
