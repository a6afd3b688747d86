//! A configured extruder instance.
//!
//! Owns the validated limits, the pressure-advance state and the running
//! position counters; talks to its collaborators only through the injected
//! `extruder_traits` handles. All methods run on the single control loop
//! that also drives planning and step compression.

use extruder_config::ExtruderConfig;
use extruder_traits::{
    ExtrusionSegment, ExtrusionSolver, Heater, LookaheadQueue, StepperEnable,
};
use eyre::WrapErr;

use crate::error::{MoveError, Result};
use crate::motion::{E_AXIS, PlannedMove, X_AXIS, Y_AXIS};

/// Current pressure-advance parameters as configured. The effective
/// smoothing time sent downstream is zero whenever the gain is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PressureAdvance {
    pub pressure_advance: f64,
    pub smooth_time: f64,
}

/// Collaborator handles injected at construction.
pub struct ExtruderHandles {
    pub heater: Box<dyn Heater>,
    pub planner: Box<dyn LookaheadQueue>,
    pub solver: Box<dyn ExtrusionSolver>,
    pub enable: Box<dyn StepperEnable>,
}

/// Operator-facing status snapshot: the heater's own status merged with
/// the pressure-advance parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtruderStatus {
    pub temperature: f64,
    pub target: f64,
    pub can_extrude: bool,
    pub pressure_advance: f64,
    pub smooth_time: f64,
}

pub struct Extruder {
    cfg: ExtruderConfig,
    heater: Box<dyn Heater>,
    planner: Box<dyn LookaheadQueue>,
    solver: Box<dyn ExtrusionSolver>,
    enable: Box<dyn StepperEnable>,
    pa: PressureAdvance,
    // One-shot latch: enable the motor on the first move after idle.
    need_motor_enable: bool,
    // Cumulative unmodified extrude position.
    extrude_pos: f64,
    // Cumulative position of pressure-advance-coupled displacement only.
    extrude_pa_pos: f64,
}

impl core::fmt::Debug for Extruder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Extruder")
            .field("name", &self.cfg.name)
            .field("pressure_advance", &self.pa.pressure_advance)
            .field("smooth_time", &self.pa.smooth_time)
            .field("extrude_pos", &self.extrude_pos)
            .finish()
    }
}

impl Extruder {
    /// Build an extruder from a validated config and its collaborator
    /// handles. Publishes the configured pressure-advance parameters to the
    /// planner and solver before the first move.
    pub fn new(cfg: ExtruderConfig, handles: ExtruderHandles) -> Self {
        tracing::info!(
            extruder = %cfg.name,
            max_extrude_ratio = format_args!("{:.6}", cfg.max_extrude_ratio),
            "extruder configured"
        );
        let pressure_advance = cfg.pressure_advance;
        let smooth_time = cfg.pressure_advance_smooth_time;
        let mut extruder = Self {
            heater: handles.heater,
            planner: handles.planner,
            solver: handles.solver,
            enable: handles.enable,
            pa: PressureAdvance::default(),
            need_motor_enable: true,
            extrude_pos: 0.0,
            extrude_pa_pos: 0.0,
            cfg,
        };
        extruder.set_pressure_advance(pressure_advance, smooth_time);
        extruder
    }

    pub fn name(&self) -> &str {
        &self.cfg.name
    }

    /// Validate a candidate move against the physical extrusion limits.
    /// May tighten the move's speed limits as a side effect; a returned
    /// error is terminal for the move.
    ///
    /// Check order is load-bearing: temperature gate, then the
    /// extrude-only/retraction branch, then the cross-section ratio with
    /// its tiny-extrusion exception.
    pub fn check_move(&self, mv: &mut PlannedMove) -> std::result::Result<(), MoveError> {
        if !self.heater.can_extrude() {
            return Err(MoveError::NotHot);
        }
        let extrude_r = mv.extrude_ratio();
        if !mv.is_kinematic_move || extrude_r < 0.0 {
            // Extrude only move (or retraction) - limit accel and velocity
            if mv.axes_d[E_AXIS].abs() > self.cfg.max_e_dist {
                return Err(MoveError::ExtrudeOnlyTooLong {
                    distance: mv.axes_d[E_AXIS],
                    max: self.cfg.max_e_dist,
                });
            }
            if extrude_r != 0.0 {
                let inv_extrude_r = 1.0 / extrude_r.abs();
                mv.limit_speed(
                    self.cfg.max_e_velocity * inv_extrude_r,
                    self.cfg.max_e_accel * inv_extrude_r,
                );
            }
        } else if extrude_r > self.cfg.max_extrude_ratio {
            if mv.axes_d[E_AXIS] <= self.cfg.nozzle_diameter * self.cfg.max_extrude_ratio {
                // Permit extrusion if amount extruded is tiny
                return Ok(());
            }
            let area = mv.axes_d[E_AXIS] * self.cfg.filament_area / mv.move_d;
            tracing::debug!(
                extrude_r,
                max_extrude_ratio = self.cfg.max_extrude_ratio,
                area,
                dist = mv.move_d,
                "overextrude"
            );
            return Err(MoveError::CrossSectionExceeded {
                area,
                max: self.cfg.max_extrude_ratio * self.cfg.filament_area,
            });
        }
        Ok(())
    }

    /// Maximum squared cruise velocity at the junction between two
    /// consecutive moves. Advisory: the planner combines this with the
    /// other axes' junction constraints and takes the minimum.
    pub fn calc_junction(&self, prev_move: &PlannedMove, mv: &PlannedMove) -> f64 {
        let diff_r = mv.extrude_ratio() - prev_move.extrude_ratio();
        if diff_r != 0.0 {
            let v = self.cfg.instant_corner_v / diff_r.abs();
            v * v
        } else {
            mv.max_cruise_v2
        }
    }

    /// Update the pressure-advance gain and smoothing time.
    ///
    /// The flush-delay negotiation with the planner happens first so that
    /// no already-queued move ever sits inside a smoothing window the
    /// planner does not know about. A zero gain forces the effective
    /// smoothing time to zero on the corresponding side of the
    /// negotiation; the stored smooth time keeps the configured value.
    pub fn set_pressure_advance(&mut self, pressure_advance: f64, smooth_time: f64) {
        let mut old_smooth_time = self.pa.smooth_time;
        if self.pa.pressure_advance == 0.0 {
            old_smooth_time = 0.0;
        }
        let mut new_smooth_time = smooth_time;
        if pressure_advance == 0.0 {
            new_smooth_time = 0.0;
        }
        self.planner.note_flush_delay(new_smooth_time, old_smooth_time);
        self.solver.set_pressure(pressure_advance, new_smooth_time);
        self.pa.pressure_advance = pressure_advance;
        self.pa.smooth_time = smooth_time;
    }

    /// Current configured pressure-advance parameters.
    pub fn pressure_advance(&self) -> PressureAdvance {
        self.pa
    }

    /// Project an accepted move's trapezoid onto the extruder axis and
    /// queue it with the solver. Called exactly once per accepted move, in
    /// execution order, immediately before step compression.
    pub fn apply(&mut self, print_time: f64, mv: &PlannedMove) -> Result<()> {
        if self.need_motor_enable {
            self.enable
                .set_enabled(print_time, true)
                .map_err(|e| eyre::eyre!(e))
                .wrap_err("enabling extruder stepper")?;
            self.need_motor_enable = false;
        }
        let axis_d = mv.axes_d[E_AXIS];
        let axis_r = if mv.move_d > 0.0 { axis_d / mv.move_d } else { 0.0 };
        // Pressure advance couples only to forward extrusion with
        // simultaneous lateral travel.
        let is_pa_move =
            axis_d >= 0.0 && (mv.axes_d[X_AXIS] != 0.0 || mv.axes_d[Y_AXIS] != 0.0);
        self.solver.submit_segment(&ExtrusionSegment {
            print_time,
            accel_t: mv.accel_t,
            cruise_t: mv.cruise_t,
            decel_t: mv.decel_t,
            start_pos: mv.start_pos[E_AXIS],
            pa_start_pos: self.extrude_pa_pos,
            start_v: mv.start_v * axis_r,
            cruise_v: mv.cruise_v * axis_r,
            accel: mv.accel * axis_r,
            is_pa_move,
        });
        self.extrude_pos = mv.end_pos[E_AXIS];
        if is_pa_move {
            self.extrude_pa_pos += axis_d;
        }
        Ok(())
    }

    /// Disable the stepper and re-arm the enable latch; the next `apply`
    /// re-enables the motor.
    pub fn motor_off(&mut self, print_time: f64) -> Result<()> {
        self.enable
            .set_enabled(print_time, false)
            .map_err(|e| eyre::eyre!(e))
            .wrap_err("disabling extruder stepper")?;
        self.need_motor_enable = true;
        Ok(())
    }

    /// Cumulative unmodified extrude position.
    pub fn extrude_position(&self) -> f64 {
        self.extrude_pos
    }

    /// Cumulative pressure-advance-coupled position.
    pub fn pa_position(&self) -> f64 {
        self.extrude_pa_pos
    }

    /// Status report: heater status merged with pressure-advance state.
    pub fn status(&self) -> ExtruderStatus {
        let heater = self.heater.status();
        ExtruderStatus {
            temperature: heater.temperature,
            target: heater.target,
            can_extrude: heater.can_extrude,
            pressure_advance: self.pa.pressure_advance,
            smooth_time: self.pa.smooth_time,
        }
    }
}
