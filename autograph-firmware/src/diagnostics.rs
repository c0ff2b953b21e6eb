//! defmt-backed diagnostic sink

use defmt::{info, warn};

use autograph_core::motion::{AxisId, Phase};
use autograph_core::traits::DiagnosticSink;

/// Routes coordinator diagnostics to the defmt log.
///
/// Fire-and-forget by construction: defmt never blocks the caller.
pub struct DefmtDiagnostics;

impl DiagnosticSink for DefmtDiagnostics {
    fn limit_reached(&mut self, axis: AxisId, position: i32) {
        info!("limit hit: axis {} at {}", axis, position);
    }

    fn move_clamped(&mut self, axis: AxisId, requested: i32, clamped: i32) {
        warn!(
            "move beyond limit: axis {} target {} clamped to {}",
            axis, requested, clamped
        );
    }

    fn phase_changed(&mut self, phase: Phase) {
        info!("phase: {}", phase);
    }
}
