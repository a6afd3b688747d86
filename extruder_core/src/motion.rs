//! Planned move data model at the planner boundary.
//!
//! A `PlannedMove` is produced by the upstream trapezoidal planner; this
//! crate reads it during limiting/junction passes and consumes its final
//! trapezoid during projection. `limit_speed` is the one mutation the
//! limiter is allowed to perform on it.

pub const X_AXIS: usize = 0;
pub const Y_AXIS: usize = 1;
pub const Z_AXIS: usize = 2;
pub const E_AXIS: usize = 3;

/// Cartesian distances below this are treated as zero.
const MIN_KINEMATIC_MOVE_D: f64 = 1e-9;

/// Acceleration stand-in for extrude-only moves; the limiter clamps it to
/// the configured extrude-only accel before the move is accepted.
const EXTRUDE_ONLY_ACCEL: f64 = 99_999_999.9;

/// One planned segment with its multi-axis geometry and trapezoidal
/// velocity profile. Axis order is `[x, y, z, e]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMove {
    pub start_pos: [f64; 4],
    pub end_pos: [f64; 4],
    /// Per-axis displacement, `end_pos - start_pos`.
    pub axes_d: [f64; 4],
    /// Total Cartesian distance; for extrude-only moves this is the
    /// absolute extruder displacement instead.
    pub move_d: f64,
    /// False for extrude-only moves (no toolhead motion).
    pub is_kinematic_move: bool,
    /// Maximum squared cruise velocity, lowered by axis limiters.
    pub max_cruise_v2: f64,
    /// Minimum duration implied by `max_cruise_v2`.
    pub min_move_t: f64,
    pub accel: f64,
    // Trapezoid filled in by the planner's lookahead pass.
    pub start_v: f64,
    pub cruise_v: f64,
    pub accel_t: f64,
    pub cruise_t: f64,
    pub decel_t: f64,
}

impl PlannedMove {
    /// Build a move from endpoint positions, requested speed and
    /// acceleration. A sub-epsilon Cartesian distance turns the move into
    /// an extrude-only move: lateral displacement is zeroed and `move_d`
    /// becomes the absolute extruder displacement.
    pub fn new(start_pos: [f64; 4], end_pos: [f64; 4], speed: f64, accel: f64) -> Self {
        let mut end_pos = end_pos;
        let mut axes_d = [
            end_pos[0] - start_pos[0],
            end_pos[1] - start_pos[1],
            end_pos[2] - start_pos[2],
            end_pos[3] - start_pos[3],
        ];
        let mut move_d =
            (axes_d[0] * axes_d[0] + axes_d[1] * axes_d[1] + axes_d[2] * axes_d[2]).sqrt();
        let mut accel = accel;
        let mut is_kinematic_move = true;
        if move_d < MIN_KINEMATIC_MOVE_D {
            end_pos[X_AXIS] = start_pos[X_AXIS];
            end_pos[Y_AXIS] = start_pos[Y_AXIS];
            end_pos[Z_AXIS] = start_pos[Z_AXIS];
            axes_d[X_AXIS] = 0.0;
            axes_d[Y_AXIS] = 0.0;
            axes_d[Z_AXIS] = 0.0;
            move_d = axes_d[E_AXIS].abs();
            accel = EXTRUDE_ONLY_ACCEL;
            is_kinematic_move = false;
        }
        let min_move_t = if speed > 0.0 && move_d > 0.0 {
            move_d / speed
        } else {
            0.0
        };
        Self {
            start_pos,
            end_pos,
            axes_d,
            move_d,
            is_kinematic_move,
            max_cruise_v2: speed * speed,
            min_move_t,
            accel,
            start_v: 0.0,
            cruise_v: 0.0,
            accel_t: 0.0,
            cruise_t: 0.0,
            decel_t: 0.0,
        }
    }

    /// Lower this move's speed limits. Called by per-axis limiters before
    /// the planner finalizes velocities; only ever tightens.
    pub fn limit_speed(&mut self, speed: f64, accel: f64) {
        let speed2 = speed * speed;
        if speed2 < self.max_cruise_v2 {
            self.max_cruise_v2 = speed2;
            self.min_move_t = self.move_d / speed;
        }
        self.accel = self.accel.min(accel);
    }

    /// Extruder displacement as a fraction of the total distance. Zero for
    /// zero-distance moves.
    pub fn extrude_ratio(&self) -> f64 {
        if self.move_d > 0.0 {
            self.axes_d[E_AXIS] / self.move_d
        } else {
            0.0
        }
    }
}
