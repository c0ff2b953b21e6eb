//! Debounced digital inputs
//!
//! Decouples interrupt-time edge capture from main-loop consumption.
//! Interrupt handlers perform exactly one atomic store; everything else
//! happens in the polling loop.

pub mod debounce;
pub mod router;

pub use debounce::{DebouncedInput, DEBOUNCE_COOLDOWN_MS, DEFAULT_SUPPRESS_MS};
pub use router::{EdgeLatch, InputChannel, InputRouter};
