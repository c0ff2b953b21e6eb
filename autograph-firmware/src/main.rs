//! Autograph - Dual-axis drawing arm firmware
//!
//! Firmware binary for RP2040-based arm controllers. Two stepper axes
//! self-calibrate against limit switches, then replay an embedded
//! waypoint path with a servo pen lift.
//!
//! Named after the Greek "autographos" meaning "written with one's own
//! hand" - the machine signs for itself.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use {defmt_rtt as _, panic_probe as _};

use autograph_core::config::{ArmConfig, SpeedProfile};
use autograph_core::input::InputChannel;
use autograph_core::motion::{AxisActuator, AxisId, MotionCoordinator};
use autograph_drivers::pen::{PenServo, PenServoConfig};
use autograph_drivers::stepper::StepDir;

mod artwork;
mod channels;
mod diagnostics;
mod tasks;

use crate::tasks::inputs::edge_watcher;
use crate::tasks::motion::motion_task;

// Servo PWM: 125 MHz system clock / 125 -> 1 MHz count, 20 000 counts
// per frame, so duty units are microseconds at 50 Hz.
const SERVO_CLOCK_DIVIDER: u8 = 125;
const SERVO_FRAME_TOP: u16 = 19_999;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Autograph firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Limit switches and the mode button pull to 3V3 when they close;
    // rising edges latch in interrupt context and drain in the motion
    // task's polling loop.
    let limit_a = Input::new(p.PIN_14, Pull::Down);
    let limit_b = Input::new(p.PIN_15, Pull::Down);
    let mode_button = Input::new(p.PIN_12, Pull::Down);

    // Rotary encoder, polled by the motion task for manual jogging
    let encoder_clk = Input::new(p.PIN_10, Pull::Up);
    let encoder_dt = Input::new(p.PIN_11, Pull::Up);

    // Stepper driver modules: DIR level plus STEP rising edge. The two
    // motors face each other, so axis B runs with inverted direction.
    let axis_a_driver = StepDir::new(
        Output::new(p.PIN_3, Level::Low),
        Output::new(p.PIN_2, Level::Low),
        false,
    );
    let axis_b_driver = StepDir::new(
        Output::new(p.PIN_5, Level::Low),
        Output::new(p.PIN_4, Level::Low),
        true,
    );

    let profile = SpeedProfile::default();
    let axis_a = AxisActuator::new(AxisId::A, profile, axis_a_driver);
    let axis_b = AxisActuator::new(AxisId::B, profile, axis_b_driver);
    let coordinator =
        MotionCoordinator::new(ArmConfig::default(), artwork::DEMO_PATH, axis_a, axis_b);

    // Pen servo on PWM slice 3 channel A (GPIO 22), 50 Hz hobby timing
    let mut pwm_config = PwmConfig::default();
    pwm_config.divider = SERVO_CLOCK_DIVIDER.into();
    pwm_config.top = SERVO_FRAME_TOP;
    let pwm = Pwm::new_output_a(p.PWM_SLICE3, p.PIN_22, pwm_config);
    let (pwm_out, _) = pwm.split();
    let mut pen = PenServo::new(unwrap!(pwm_out), PenServoConfig::default());
    pen.begin().ok();

    unwrap!(spawner.spawn(edge_watcher(limit_a, InputChannel::LimitA)));
    unwrap!(spawner.spawn(edge_watcher(limit_b, InputChannel::LimitB)));
    unwrap!(spawner.spawn(edge_watcher(mode_button, InputChannel::ModeButton)));
    unwrap!(spawner.spawn(motion_task(coordinator, pen, encoder_clk, encoder_dt)));
}
