//! Embedded demo path
//!
//! Exported from the web slicer, which emits rows as (B, A) step pairs
//! in the post-calibration frame. A (4096, 4096) row lifts the pen
//! before the next segment.

use autograph_core::motion::Waypoint;

/// A square with a lifted-pen diagonal across it
pub static DEMO_PATH: &[Waypoint] = &[
    Waypoint::from_row(-150, -150),
    Waypoint::from_row(-150, 150),
    Waypoint::from_row(150, 150),
    Waypoint::from_row(150, -150),
    Waypoint::from_row(-150, -150),
    Waypoint::PEN_LIFT,
    Waypoint::from_row(-220, -220),
    Waypoint::from_row(220, 220),
];
