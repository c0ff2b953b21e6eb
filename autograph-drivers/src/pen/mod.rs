//! Pen lift implementations

pub mod servo;

pub use servo::{PenServo, PenServoConfig};
