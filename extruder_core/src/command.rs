//! SET_PRESSURE_ADVANCE command surface.
//!
//! Parameter validation lives here, at the command layer; out-of-range
//! values never reach the pressure-advance controller.

use thiserror::Error;

use crate::extruder::Extruder;

/// Upper bound accepted for SMOOTH_TIME by the command surface.
pub const CMD_SMOOTH_TIME_MAX: f64 = 0.105;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CommandError {
    #[error("{param} must be a finite number")]
    NotFinite { param: &'static str },
    #[error("{param} must be at least {min}, got {value}")]
    BelowMinimum {
        param: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{param} must be at most {max}, got {value}")]
    AboveMaximum {
        param: &'static str,
        max: f64,
        value: f64,
    },
}

/// Parameters of the mux-style SET_PRESSURE_ADVANCE operation, keyed by
/// extruder name upstream. Missing parameters default to the extruder's
/// current values.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetPressureAdvance {
    /// ADVANCE: pressure-advance gain, >= 0.
    pub advance: Option<f64>,
    /// SMOOTH_TIME: smoothing window in seconds, in [0, 0.105].
    pub smooth_time: Option<f64>,
}

fn check_range(
    param: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, CommandError> {
    if !value.is_finite() {
        return Err(CommandError::NotFinite { param });
    }
    if value < min {
        return Err(CommandError::BelowMinimum { param, min, value });
    }
    if value > max {
        return Err(CommandError::AboveMaximum { param, max, value });
    }
    Ok(value)
}

impl Extruder {
    /// Validate the command parameters, update the controller and return
    /// the human-readable status lines for operator feedback and rollover
    /// info.
    pub fn cmd_set_pressure_advance(
        &mut self,
        params: &SetPressureAdvance,
    ) -> Result<String, CommandError> {
        let current = self.pressure_advance();
        let advance = check_range(
            "ADVANCE",
            params.advance.unwrap_or(current.pressure_advance),
            0.0,
            f64::INFINITY,
        )?;
        let smooth_time = check_range(
            "SMOOTH_TIME",
            params.smooth_time.unwrap_or(current.smooth_time),
            0.0,
            CMD_SMOOTH_TIME_MAX,
        )?;
        self.set_pressure_advance(advance, smooth_time);
        Ok(format!(
            "pressure_advance: {advance:.6}\npressure_advance_smooth_time: {smooth_time:.6}"
        ))
    }
}
