//! Interrupt-to-loop handoff statics
//!
//! The edge watcher tasks are the firmware's interrupt layer; these
//! statics are the only state they share with the motion task. Both
//! types are built from atomics, so plain statics suffice - no mutex.

use autograph_core::input::{EdgeLatch, InputRouter};

/// Edge flags raised in interrupt context, drained once per polling tick
pub static EDGE_LATCH: EdgeLatch = EdgeLatch::new();

/// The arm's three debounced inputs
pub static INPUTS: InputRouter = InputRouter::new();
