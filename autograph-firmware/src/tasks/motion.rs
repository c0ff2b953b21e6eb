//! Motion polling loop task
//!
//! One iteration per tick: drain the edge latch, advance the
//! coordinator one state-machine step (which services both step
//! generators), then handle the manual jog controls. Nothing here
//! blocks; the tick spacing bounds the step rate.

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_rp::pwm::PwmOutput;
use embassy_time::{Duration, Instant, Ticker};

use autograph_core::motion::{AxisId, MotionCoordinator};
use autograph_drivers::pen::PenServo;
use autograph_drivers::stepper::StepDir;

use crate::channels::{EDGE_LATCH, INPUTS};
use crate::diagnostics::DefmtDiagnostics;

/// Polling interval; twice the default cruise step rate
const TICK_US: u64 = 500;

/// Steps per encoder detent when jogging
const JOG_STEP: i32 = 32;

/// Ignore the mode button briefly after consuming a press
const MODE_BUTTON_SUPPRESS_MS: u64 = 250;

/// Minimum spacing of status lines
const STATUS_INTERVAL_MS: u64 = 500;

pub type ArmStepDir = StepDir<Output<'static>, Output<'static>>;
pub type ArmCoordinator = MotionCoordinator<ArmStepDir, ArmStepDir>;
pub type ArmPen = PenServo<PwmOutput<'static>>;

/// The arm's single polling loop
#[embassy_executor::task]
pub async fn motion_task(
    mut coordinator: ArmCoordinator,
    mut pen: ArmPen,
    encoder_clk: Input<'static>,
    encoder_dt: Input<'static>,
) {
    info!("motion task started; homing");
    let mut diag = DefmtDiagnostics;
    coordinator.home();

    let mut ticker = Ticker::every(Duration::from_micros(TICK_US));
    let mut jog_axis = AxisId::A;
    let mut last_clk = encoder_clk.is_high();
    let mut last_status_ms = 0u64;

    loop {
        let now = Instant::now();
        let now_ms = now.as_millis();
        let now_us = now.as_micros();

        INPUTS.dispatch(&EDGE_LATCH, now_ms);
        coordinator.run(&INPUTS, &mut pen, &mut diag, now_ms, now_us);

        // Encoder rotation jogs the selected axis, once homed
        let clk = encoder_clk.is_high();
        if clk != last_clk && !clk && coordinator.is_homed() {
            let delta = if encoder_dt.is_high() != clk {
                -JOG_STEP
            } else {
                JOG_STEP
            };
            coordinator.jog(jog_axis, delta, &mut diag);
        }
        last_clk = clk;

        // Mode button toggles which axis the encoder jogs
        if INPUTS.mode_button.take_action_if_possible(now_ms) {
            jog_axis = match jog_axis {
                AxisId::A => AxisId::B,
                AxisId::B => AxisId::A,
            };
            INPUTS
                .mode_button
                .prevent_trigger_for(now_ms, MODE_BUTTON_SUPPRESS_MS);
            info!("jog axis: {}", jog_axis);
        }

        if now_ms >= last_status_ms + STATUS_INTERVAL_MS {
            last_status_ms = now_ms;
            info!(
                "A {} [{}..{}] -> {}, B {} [{}..{}] -> {}, phase {}",
                coordinator.axis_a().position(),
                coordinator.axis_a().min_position(),
                coordinator.axis_a().max_position(),
                coordinator.axis_a().target_position(),
                coordinator.axis_b().position(),
                coordinator.axis_b().min_position(),
                coordinator.axis_b().max_position(),
                coordinator.axis_b().target_position(),
                coordinator.phase(),
            );
        }

        ticker.next().await;
    }
}
