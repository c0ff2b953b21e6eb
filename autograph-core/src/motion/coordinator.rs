//! Dual-axis motion coordinator
//!
//! Sequences homing against the two limit switches, zeroes the shared
//! coordinate frame on the arm's geometric center, and replays the
//! waypoint path with pen-lift synchronization. One `run` call advances
//! the state machine by exactly one bounded, non-blocking step and then
//! services both step generators.
//!
//! There is deliberately no timeout on the homing phases: if a limit
//! switch never fires the machine stays in that phase. The physical
//! switches are the safety backstop for the unclamped homing moves.

use crate::config::ArmConfig;
use crate::input::InputRouter;
use crate::motion::axis::{AxisActuator, AxisId};
use crate::motion::path::Waypoint;
use crate::traits::{DiagnosticSink, PenActuator, StepDriver};

/// Coordinator phase.
///
/// `Idle` is entered both at power-on (never homed) and after a
/// completed draw; the coordinator's `homed` flag distinguishes the
/// two origins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Both axes creep toward axis A's limit switch
    SeekLimitA,
    /// Both axes back off axis A's switch
    RetreatA,
    /// Axis B creeps toward its limit switch
    SeekLimitB,
    /// Axis B backs off its switch; ends with the shared re-zeroing
    RetreatB,
    /// Waypoint playback with pen-lift synchronization
    Draw,
    /// Standard operation: watch the switches, accept jogs
    Idle,
}

/// The homing / draw state machine over both axes.
pub struct MotionCoordinator<DA, DB> {
    config: ArmConfig,
    path: &'static [Waypoint],
    axis_a: AxisActuator<DA>,
    axis_b: AxisActuator<DB>,
    phase: Phase,
    path_cursor: usize,
    /// Lower step already handled for the approach in progress
    pen_lowered: bool,
    homed: bool,
}

impl<DA: StepDriver, DB: StepDriver> MotionCoordinator<DA, DB> {
    /// Create a coordinator in `Idle`, not yet homed
    pub fn new(
        config: ArmConfig,
        path: &'static [Waypoint],
        axis_a: AxisActuator<DA>,
        axis_b: AxisActuator<DB>,
    ) -> Self {
        Self {
            config,
            path,
            axis_a,
            axis_b,
            phase: Phase::Idle,
            path_cursor: 0,
            pen_lowered: false,
            homed: false,
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the next waypoint to dispatch
    pub fn path_cursor(&self) -> usize {
        self.path_cursor
    }

    /// True only in `Idle` after a completed calibration+draw sequence.
    /// Gates manual jogging.
    pub fn is_homed(&self) -> bool {
        self.phase == Phase::Idle && self.homed
    }

    /// Axis A, read-only
    pub fn axis_a(&self) -> &AxisActuator<DA> {
        &self.axis_a
    }

    /// Axis B, read-only
    pub fn axis_b(&self) -> &AxisActuator<DB> {
        &self.axis_b
    }

    /// (Re)start the calibration + draw sequence.
    ///
    /// Any in-flight motion is stopped dead before the seek phase takes
    /// over; a previous draw's cursor is discarded.
    pub fn home(&mut self) {
        self.axis_a.halt();
        self.axis_b.halt();
        self.path_cursor = 0;
        self.pen_lowered = false;
        self.homed = false;
        self.phase = Phase::SeekLimitA;
    }

    /// Manually offset one axis, clamped to its calibrated limits.
    ///
    /// Ignored until homed; the soft limits are meaningless before
    /// calibration.
    pub fn jog<S: DiagnosticSink>(&mut self, axis: AxisId, delta: i32, diag: &mut S) {
        if !self.is_homed() {
            return;
        }
        match axis {
            AxisId::A => {
                let target = self.axis_a.position().saturating_add(delta);
                self.axis_a.move_to_position(target, diag);
            }
            AxisId::B => {
                let target = self.axis_b.position().saturating_add(delta);
                self.axis_b.move_to_position(target, diag);
            }
        }
    }

    /// Advance the state machine one step and service both axes.
    ///
    /// `inputs` must have been dispatched for this tick already. Never
    /// blocks; call every loop iteration.
    pub fn run<P: PenActuator, S: DiagnosticSink>(
        &mut self,
        inputs: &InputRouter,
        pen: &mut P,
        diag: &mut S,
        now_ms: u64,
        now_us: u64,
    ) {
        match self.phase {
            Phase::SeekLimitA => self.run_seek_a(inputs, pen, diag, now_ms),
            Phase::RetreatA => self.run_retreat_a(diag),
            Phase::SeekLimitB => self.run_seek_b(inputs, diag, now_ms),
            Phase::RetreatB => self.run_retreat_b(diag),
            Phase::Draw => self.run_draw(pen, diag),
            Phase::Idle => self.run_idle(inputs, diag, now_ms),
        }

        self.axis_a.run(now_us);
        self.axis_b.run(now_us);
    }

    fn set_phase<S: DiagnosticSink>(&mut self, phase: Phase, diag: &mut S) {
        self.phase = phase;
        diag.phase_changed(phase);
    }

    fn run_seek_a<P: PenActuator, S: DiagnosticSink>(
        &mut self,
        inputs: &InputRouter,
        pen: &mut P,
        diag: &mut S,
        now_ms: u64,
    ) {
        if !pen.is_up() {
            pen.up();
        }

        if inputs.limit_a.take_action_if_possible(now_ms) {
            self.axis_a.trigger_min_limit_hit(diag);
            self.axis_a.set_zero_position(0);
            self.axis_a.set_travel_limits(0, self.config.arm_range);
            // A switch already closed at power-on leaves a stale B edge
            // latched; it must not satisfy the B seek later.
            let _ = inputs.limit_b.take_action_if_possible(now_ms);
            self.set_phase(Phase::RetreatA, diag);
            return;
        }

        self.axis_a.move_offset(-self.config.homing_step);
        self.axis_b.move_offset(-self.config.homing_step);
    }

    fn run_retreat_a<S: DiagnosticSink>(&mut self, diag: &mut S) {
        if self.axis_a.position() > self.config.retreat_offset {
            self.set_phase(Phase::SeekLimitB, diag);
            return;
        }

        self.axis_a.move_offset(self.config.homing_step);
        self.axis_b.move_offset(self.config.homing_step);
    }

    fn run_seek_b<S: DiagnosticSink>(&mut self, inputs: &InputRouter, diag: &mut S, now_ms: u64) {
        if inputs.limit_b.take_action_if_possible(now_ms) {
            self.axis_b.trigger_max_limit_hit(diag);
            self.axis_b.set_zero_position(0);
            self.axis_b.set_travel_limits(-self.config.arm_range, 0);
            self.axis_a.set_travel_limits(0, self.config.arm_range);
            self.set_phase(Phase::RetreatB, diag);
            return;
        }

        self.axis_b.move_offset(self.config.homing_step);
    }

    fn run_retreat_b<S: DiagnosticSink>(&mut self, diag: &mut S) {
        if self.axis_b.position() < -self.config.retreat_offset {
            // Re-zero both frames onto the geometric center of travel.
            // A homes against its minimum, B against its maximum (the
            // motors rotate in opposite sense), so the switches end up
            // at -range/2 and +range/2 respectively.
            let half = self.config.half_range();
            let a_pos = self.axis_a.position();
            self.axis_a.set_zero_position(a_pos - half);
            self.axis_a.set_travel_limits(-half, half);
            let b_pos = self.axis_b.position();
            self.axis_b.set_zero_position(b_pos + half);
            self.axis_b.set_travel_limits(-half, half);

            self.path_cursor = 0;
            // The first waypoint is approached from the origin with the
            // pen up; mark the lower step handled so the first dispatch
            // happens immediately.
            self.pen_lowered = true;
            self.set_phase(Phase::Draw, diag);
            return;
        }

        self.axis_b.move_offset(-self.config.homing_step);
    }

    fn run_draw<P: PenActuator, S: DiagnosticSink>(&mut self, pen: &mut P, diag: &mut S) {
        let tolerance = self.config.target_tolerance;
        if !(self.axis_a.is_within(tolerance) && self.axis_b.is_within(tolerance)) {
            // still traveling
            return;
        }

        if !self.pen_lowered {
            // Settle-before-lower: the pen touches the surface only
            // once the arm has stopped at the waypoint.
            pen.down();
            self.pen_lowered = true;
            return;
        }

        // Dispatch the next waypoint. Sentinels resolve inline with the
        // dispatch so they can never stall the cursor: the pen rises and
        // the arm is already moving toward the next real target.
        while let Some(waypoint) = self.path.get(self.path_cursor) {
            if waypoint.is_pen_lift() {
                pen.up();
                self.path_cursor += 1;
                continue;
            }

            self.axis_a.move_to_position(waypoint.a, diag);
            self.axis_b.move_to_position(waypoint.b, diag);
            self.path_cursor += 1;
            self.pen_lowered = false;
            return;
        }

        // Path exhausted: lift, park at the shared origin, and hand
        // over to standard operation.
        pen.up();
        self.axis_a.move_to_position(0, diag);
        self.axis_b.move_to_position(0, diag);
        self.homed = true;
        self.set_phase(Phase::Idle, diag);
    }

    fn run_idle<S: DiagnosticSink>(&mut self, inputs: &InputRouter, diag: &mut S, now_ms: u64) {
        // Safety re-calibration only: a switch closing re-zeros that
        // axis's own bound. No re-homing, no cursor change.
        if inputs.limit_a.take_action_if_possible(now_ms) {
            self.axis_a.trigger_min_limit_hit(diag);
        }

        if inputs.limit_b.take_action_if_possible(now_ms) {
            self.axis_b.trigger_max_limit_hit(diag);
        }
    }
}
