//! Soft-limited axis actuator
//!
//! Wraps one step generator and its pulse driver, and enforces the
//! axis's soft travel limits on absolute moves. Relative moves bypass
//! the limits on purpose: during homing the true limits are unknown and
//! the physical switches are the safety backstop.

use crate::config::SpeedProfile;
use crate::motion::stepper::StepGenerator;
use crate::traits::{DiagnosticSink, StepDriver};

/// Axis identifier, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisId {
    /// Shoulder motor; limit switch at the minimum end of travel
    A,
    /// Elbow motor; limit switch at the maximum end of travel
    B,
}

/// One stepper axis with soft travel limits.
///
/// Until homing discovers the real travel, the limits default to a
/// tight placeholder window around the power-on position.
pub struct AxisActuator<D> {
    id: AxisId,
    stepper: StepGenerator,
    driver: D,
    min_position: i32,
    max_position: i32,
}

impl<D: StepDriver> AxisActuator<D> {
    /// Create an axis at position 0 with placeholder limits
    pub fn new(id: AxisId, profile: SpeedProfile, driver: D) -> Self {
        Self {
            id,
            stepper: StepGenerator::new(profile),
            driver,
            min_position: -10,
            max_position: 10,
        }
    }

    /// Axis identifier
    pub fn id(&self) -> AxisId {
        self.id
    }

    /// Current position in steps
    pub fn position(&self) -> i32 {
        self.stepper.current_position()
    }

    /// Commanded target in steps
    pub fn target_position(&self) -> i32 {
        self.stepper.target_position()
    }

    /// Sign of pending travel: -1, 0, or 1
    pub fn direction(&self) -> i32 {
        self.stepper.direction()
    }

    /// Soft minimum travel bound
    pub fn min_position(&self) -> i32 {
        self.min_position
    }

    /// Soft maximum travel bound
    pub fn max_position(&self) -> i32 {
        self.max_position
    }

    /// Whether motion is pending
    pub fn is_running(&self) -> bool {
        self.stepper.is_running()
    }

    /// Whether the axis is within `tolerance` steps of its commanded target
    pub fn is_within(&self, tolerance: i32) -> bool {
        self.stepper.distance_to_go().abs() <= tolerance
    }

    /// Command an absolute move, clamped to the soft limits.
    ///
    /// A clamped command is a diagnostic, not an error: motion proceeds
    /// to the clamped value.
    pub fn move_to_position<S: DiagnosticSink>(&mut self, target: i32, diag: &mut S) {
        let clamped = target.clamp(self.min_position, self.max_position);
        if clamped != target {
            diag.move_clamped(self.id, target, clamped);
        }
        self.stepper.move_to(clamped);
    }

    /// Command a relative move, **unclamped**.
    ///
    /// Homing and calibration only; anything else must go through
    /// [`Self::move_to_position`].
    pub fn move_offset(&mut self, delta: i32) {
        self.stepper.move_by(delta);
    }

    /// The minimum-end limit switch fired.
    ///
    /// Stops motion dead where the switch closed (an in-flight target
    /// past the edge thereby lands on the edge) and adopts the current
    /// position as the soft minimum.
    pub fn trigger_min_limit_hit<S: DiagnosticSink>(&mut self, diag: &mut S) {
        self.stepper.halt();
        self.min_position = self.stepper.current_position();
        diag.limit_reached(self.id, self.min_position);
    }

    /// The maximum-end limit switch fired; mirror of the minimum case.
    pub fn trigger_max_limit_hit<S: DiagnosticSink>(&mut self, diag: &mut S) {
        self.stepper.halt();
        self.max_position = self.stepper.current_position();
        diag.limit_reached(self.id, self.max_position);
    }

    /// Redefine the current physical position as `offset` without moving
    pub fn set_zero_position(&mut self, offset: i32) {
        self.stepper.set_current_position(offset);
    }

    /// Replace both soft limits. Coordinator use, during calibration.
    pub fn set_travel_limits(&mut self, min: i32, max: i32) {
        debug_assert!(min <= max);
        self.min_position = min;
        self.max_position = max;
    }

    /// Stop dead, discarding any pending target
    pub fn halt(&mut self) {
        self.stepper.halt();
    }

    /// Service the step generator; call every loop iteration
    pub fn run(&mut self, now_us: u64) -> bool {
        self.stepper.run(now_us, &mut self.driver)
    }

    /// Access the pulse driver (test instrumentation)
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
