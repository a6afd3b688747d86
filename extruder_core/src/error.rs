//! Move rejection errors surfaced to the planner.
//!
//! All variants are terminal for the move that triggered them: the move is
//! never queued and nothing here is retried.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MoveError {
    #[error("extrude below minimum temp; see the 'min_extrude_temp' config option for details")]
    NotHot,
    #[error(
        "extrude only move too long ({distance:.3}mm vs {max:.3}mm); \
         see the 'max_extrude_only_distance' config option for details"
    )]
    ExtrudeOnlyTooLong { distance: f64, max: f64 },
    #[error(
        "move exceeds maximum extrusion ({area:.3}mm^2 vs {max:.3}mm^2); \
         see the 'max_extrude_cross_section' config option for details"
    )]
    CrossSectionExceeded { area: f64, max: f64 },
    #[error("extrude when no extruder present")]
    NoExtruderConfigured,
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
