//! Motion control
//!
//! Per-axis trapezoidal step generation, soft-limited axis actuators,
//! waypoint paths, and the homing / draw coordinator.

pub mod axis;
pub mod coordinator;
pub mod path;
pub mod stepper;

pub use axis::{AxisActuator, AxisId};
pub use coordinator::{MotionCoordinator, Phase};
pub use path::{Waypoint, PEN_LIFT_SENTINEL};
pub use stepper::StepGenerator;
