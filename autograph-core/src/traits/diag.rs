//! Diagnostic sink trait
//!
//! Structured, fire-and-forget progress and fault reporting for a human
//! operator. A sink must never block the caller; losing a message is
//! not observable by the state machine.

use crate::motion::axis::AxisId;
use crate::motion::coordinator::Phase;

/// Fire-and-forget diagnostic reporting.
pub trait DiagnosticSink {
    /// A physical limit switch was consumed and the axis stopped there
    fn limit_reached(&mut self, axis: AxisId, position: i32);

    /// A commanded move fell outside the soft limits and was clamped
    fn move_clamped(&mut self, axis: AxisId, requested: i32, clamped: i32);

    /// The coordinator entered a new phase
    fn phase_changed(&mut self, phase: Phase);
}

/// Sink that drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiagnostics;

impl DiagnosticSink for NoopDiagnostics {
    fn limit_reached(&mut self, _axis: AxisId, _position: i32) {}
    fn move_clamped(&mut self, _axis: AxisId, _requested: i32, _clamped: i32) {}
    fn phase_changed(&mut self, _phase: Phase) {}
}
