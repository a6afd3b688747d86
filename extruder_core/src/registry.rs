//! Extruder registry and the no-extruder stand-in.
//!
//! Extruder sections are enumerated in index order starting at 0
//! (`[extruder0]`, `[extruder1]`, ... with the legacy unnamed `[extruder]`
//! accepted for index 0); the scan stops at the first unconfigured index.

use extruder_config::Config;
use eyre::WrapErr;

use crate::error::{MoveError, Result};
use crate::extruder::{Extruder, ExtruderHandles};
use crate::motion::PlannedMove;

/// Upper bound on the section scan.
pub const MAX_EXTRUDERS: usize = 99;

/// Closed variant over "an extruder is configured here" and the stand-in
/// used when the active toolhead has no extruder. All call sites go
/// through this type; `Absent` rejects extrusion, defers junctions fully
/// to the move's own limit and contributes zero position.
#[derive(Debug)]
pub enum ExtruderSlot {
    Configured(Extruder),
    Absent,
}

impl ExtruderSlot {
    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }

    pub fn check_move(&self, mv: &mut PlannedMove) -> std::result::Result<(), MoveError> {
        match self {
            Self::Configured(e) => e.check_move(mv),
            Self::Absent => Err(MoveError::NoExtruderConfigured),
        }
    }

    pub fn calc_junction(&self, prev_move: &PlannedMove, mv: &PlannedMove) -> f64 {
        match self {
            Self::Configured(e) => e.calc_junction(prev_move, mv),
            Self::Absent => mv.max_cruise_v2,
        }
    }

    pub fn apply(&mut self, print_time: f64, mv: &PlannedMove) -> Result<()> {
        match self {
            Self::Configured(e) => e.apply(print_time, mv),
            Self::Absent => Ok(()),
        }
    }

    pub fn motor_off(&mut self, print_time: f64) -> Result<()> {
        match self {
            Self::Configured(e) => e.motor_off(print_time),
            Self::Absent => Ok(()),
        }
    }

    pub fn extrude_position(&self) -> f64 {
        match self {
            Self::Configured(e) => e.extrude_position(),
            Self::Absent => 0.0,
        }
    }
}

/// Index-ordered extruder instances for the process lifetime.
#[derive(Debug)]
pub struct ExtruderRegistry {
    slots: Vec<ExtruderSlot>,
    absent: ExtruderSlot,
}

impl ExtruderRegistry {
    /// Construct one extruder per configured section. `handles` supplies
    /// the collaborator handles for each index (dependency injection; the
    /// registry never looks collaborators up by name).
    pub fn from_config<F>(
        config: &Config,
        max_velocity: f64,
        max_accel: f64,
        mut handles: F,
    ) -> Result<Self>
    where
        F: FnMut(usize) -> ExtruderHandles,
    {
        let mut slots = Vec::new();
        for index in 0..MAX_EXTRUDERS {
            let indexed = format!("extruder{index}");
            let section = match config.section(&indexed) {
                Some(raw) => Some((indexed, raw)),
                // Legacy single-unnamed-section alias for index 0.
                None if index == 0 => config
                    .section("extruder")
                    .map(|raw| ("extruder".to_string(), raw)),
                None => None,
            };
            let Some((name, raw)) = section else {
                break;
            };
            let cfg = raw
                .validate(&name, max_velocity, max_accel)
                .wrap_err_with(|| format!("in section [{name}]"))?;
            slots.push(ExtruderSlot::Configured(Extruder::new(cfg, handles(index))));
        }
        Ok(Self {
            slots,
            absent: ExtruderSlot::Absent,
        })
    }

    /// Number of configured extruders.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Look up by index; out-of-range indices get the `Absent` stand-in.
    pub fn get(&self, index: usize) -> &ExtruderSlot {
        self.slots.get(index).unwrap_or(&self.absent)
    }

    pub fn get_mut(&mut self, index: usize) -> &mut ExtruderSlot {
        if index < self.slots.len() {
            &mut self.slots[index]
        } else {
            &mut self.absent
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtruderSlot> {
        self.slots.iter()
    }
}
