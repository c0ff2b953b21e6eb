//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in autograph-core against `embedded-hal` 1.0 peripherals:
//!
//! - Pen lift: hobby servo on a 50 Hz PWM channel
//! - Step pulses: step/dir GPIO pairs

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod pen;
pub mod stepper;
