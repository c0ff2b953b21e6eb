//! Board-agnostic motion control core for the Autograph drawing arm
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (pen actuator, step pulse driver, diagnostics)
//! - Debounced input channels and interrupt edge routing
//! - Per-axis actuator with soft travel limits
//! - The homing / path-playback state machine
//! - Configuration type definitions
//!
//! Everything here runs on a single cooperative polling loop; the only
//! concurrency boundary is the interrupt layer, crossed exclusively
//! through the atomic types in [`input`].

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod input;
pub mod motion;
pub mod traits;
