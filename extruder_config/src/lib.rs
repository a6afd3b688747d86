#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and validation for the extruder kinematics workspace.
//!
//! - `Config` holds one TOML table per extruder section (`[extruder]`,
//!   `[extruder0]`, `[extruder1]`, ...), deserialized with serde.
//! - `RawExtruderCfg::validate` turns a raw section into a typed
//!   `ExtruderConfig` with derived constants; every range check is a
//!   constructor-time `ConfigError`, never a runtime surprise.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use eyre::WrapErr;
use serde::Deserialize;
use thiserror::Error;

/// Default maximum extrude-only distance in mm.
pub const DEFAULT_MAX_E_DIST: f64 = 50.0;
/// Default instantaneous corner velocity in mm/s.
pub const DEFAULT_INSTANT_CORNER_V: f64 = 1.0;
/// Default pressure-advance smoothing time in seconds.
pub const DEFAULT_SMOOTH_TIME: f64 = 0.020;
/// Upper bound on the configured smoothing time in seconds.
pub const SMOOTH_TIME_MAX: f64 = 0.100;

/// Range/validity failure for a single config option.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{option} must be above {min}, got {value}")]
    NotAbove {
        option: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{option} must be at least {min}, got {value}")]
    BelowMinimum {
        option: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{option} must be at most {max}, got {value}")]
    AboveMaximum {
        option: &'static str,
        max: f64,
        value: f64,
    },
    #[error("{option} must be a finite number")]
    NotFinite { option: &'static str },
}

/// One `[extruderN]` TOML section as written by the user. Optional fields
/// fall back to defaults derived at validation time.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct RawExtruderCfg {
    /// Nozzle orifice diameter in mm. Required, > 0.
    pub nozzle_diameter: f64,
    /// Filament diameter in mm. Required, >= nozzle_diameter.
    pub filament_diameter: f64,
    /// Maximum extrusion cross-section in mm^2.
    /// Default: 4 * nozzle_diameter^2.
    pub max_extrude_cross_section: Option<f64>,
    /// Maximum velocity for extrude-only moves in mm/s.
    /// Default: toolhead max velocity scaled by the default extrude ratio.
    pub max_extrude_only_velocity: Option<f64>,
    /// Maximum acceleration for extrude-only moves in mm/s^2.
    /// Default: toolhead max accel scaled by the default extrude ratio.
    pub max_extrude_only_accel: Option<f64>,
    /// Maximum distance of a single extrude-only move in mm. Default 50.
    pub max_extrude_only_distance: Option<f64>,
    /// Instantaneous corner velocity between moves in mm/s. Default 1.
    pub instantaneous_corner_velocity: Option<f64>,
    /// Pressure-advance gain in seconds of extruder lead per mm/s. Default 0.
    pub pressure_advance: Option<f64>,
    /// Pressure-advance smoothing time in seconds, in (0, 0.100]. Default 0.020.
    pub pressure_advance_smooth_time: Option<f64>,
}

/// Validated per-extruder configuration with derived constants.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtruderConfig {
    pub name: String,
    pub nozzle_diameter: f64,
    /// pi * (filament_diameter / 2)^2
    pub filament_area: f64,
    /// max_extrude_cross_section / filament_area
    pub max_extrude_ratio: f64,
    pub max_e_velocity: f64,
    pub max_e_accel: f64,
    pub max_e_dist: f64,
    pub instant_corner_v: f64,
    pub pressure_advance: f64,
    pub pressure_advance_smooth_time: f64,
}

fn require_finite(option: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NotFinite { option })
    }
}

fn require_above(option: &'static str, value: f64, min: f64) -> Result<f64, ConfigError> {
    let value = require_finite(option, value)?;
    if value > min {
        Ok(value)
    } else {
        Err(ConfigError::NotAbove { option, min, value })
    }
}

fn require_min(option: &'static str, value: f64, min: f64) -> Result<f64, ConfigError> {
    let value = require_finite(option, value)?;
    if value >= min {
        Ok(value)
    } else {
        Err(ConfigError::BelowMinimum { option, min, value })
    }
}

fn require_max(option: &'static str, value: f64, max: f64) -> Result<f64, ConfigError> {
    if value <= max {
        Ok(value)
    } else {
        Err(ConfigError::AboveMaximum { option, max, value })
    }
}

impl RawExtruderCfg {
    /// Validate this section against the toolhead's Cartesian limits and
    /// derive the runtime constants. `max_velocity`/`max_accel` seed the
    /// extrude-only defaults, matching how the toolhead section scales them.
    pub fn validate(
        &self,
        name: &str,
        max_velocity: f64,
        max_accel: f64,
    ) -> Result<ExtruderConfig, ConfigError> {
        let nozzle_diameter = require_above("nozzle_diameter", self.nozzle_diameter, 0.0)?;
        let filament_diameter = require_min(
            "filament_diameter",
            self.filament_diameter,
            nozzle_diameter,
        )?;
        let filament_area = PI * (filament_diameter * 0.5).powi(2);
        let def_max_cross_section = 4.0 * nozzle_diameter.powi(2);
        let def_max_extrude_ratio = def_max_cross_section / filament_area;

        let max_cross_section = require_above(
            "max_extrude_cross_section",
            self.max_extrude_cross_section
                .unwrap_or(def_max_cross_section),
            0.0,
        )?;
        let max_e_velocity = require_above(
            "max_extrude_only_velocity",
            self.max_extrude_only_velocity
                .unwrap_or(max_velocity * def_max_extrude_ratio),
            0.0,
        )?;
        let max_e_accel = require_above(
            "max_extrude_only_accel",
            self.max_extrude_only_accel
                .unwrap_or(max_accel * def_max_extrude_ratio),
            0.0,
        )?;
        let max_e_dist = require_min(
            "max_extrude_only_distance",
            self.max_extrude_only_distance.unwrap_or(DEFAULT_MAX_E_DIST),
            0.0,
        )?;
        let instant_corner_v = require_min(
            "instantaneous_corner_velocity",
            self.instantaneous_corner_velocity
                .unwrap_or(DEFAULT_INSTANT_CORNER_V),
            0.0,
        )?;
        let pressure_advance = require_min(
            "pressure_advance",
            self.pressure_advance.unwrap_or(0.0),
            0.0,
        )?;
        let smooth_time = require_above(
            "pressure_advance_smooth_time",
            self.pressure_advance_smooth_time
                .unwrap_or(DEFAULT_SMOOTH_TIME),
            0.0,
        )?;
        let smooth_time = require_max(
            "pressure_advance_smooth_time",
            smooth_time,
            SMOOTH_TIME_MAX,
        )?;

        Ok(ExtruderConfig {
            name: name.to_string(),
            nozzle_diameter,
            filament_area,
            max_extrude_ratio: max_cross_section / filament_area,
            max_e_velocity,
            max_e_accel,
            max_e_dist,
            instant_corner_v,
            pressure_advance,
            pressure_advance_smooth_time: smooth_time,
        })
    }
}

/// Whole-file config: one table per extruder section, keyed by section name.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(flatten)]
    sections: BTreeMap<String, RawExtruderCfg>,
}

impl Config {
    /// Look up an extruder section by its exact name.
    pub fn section(&self, name: &str) -> Option<&RawExtruderCfg> {
        self.sections.get(name)
    }

    /// True when any extruder section is present.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a config file from disk.
pub fn load_file(path: &std::path::Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading config file {}", path.display()))?;
    load_toml(&text).wrap_err_with(|| format!("parsing config file {}", path.display()))
}
