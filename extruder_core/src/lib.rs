#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Extruder-axis kinematics (planner- and hardware-agnostic).
//!
//! This crate converts planned Cartesian/extruder moves into extrusion
//! trajectories. All collaborator interactions go through the
//! `extruder_traits` seams (heater gate, lookahead queue, iterative
//! solver, stepper enable line).
//!
//! ## Architecture
//!
//! - **Move model**: the planner-owned trapezoid segment (`motion` module)
//! - **Limiting**: physical extrusion limits checked before a move is
//!   committed to step compression (`Extruder::check_move`)
//! - **Junction**: cornering velocity bound from the change in extrusion
//!   ratio (`Extruder::calc_junction`)
//! - **Pressure advance**: gain/smoothing state with flush-delay
//!   negotiation against the planner (`Extruder::set_pressure_advance`)
//! - **Projection**: per-move trapezoid projection onto the extruder axis
//!   (`Extruder::apply`)
//! - **Registry**: index-ordered extruder instances plus the `Absent`
//!   stand-in (`registry` module)

pub mod command;
pub mod error;
pub mod extruder;
pub mod mocks;
pub mod motion;
pub mod registry;

pub use command::{CMD_SMOOTH_TIME_MAX, CommandError, SetPressureAdvance};
pub use error::{MoveError, Result};
pub use extruder::{Extruder, ExtruderHandles, ExtruderStatus, PressureAdvance};
pub use motion::{E_AXIS, PlannedMove, X_AXIS, Y_AXIS};
pub use registry::{ExtruderRegistry, ExtruderSlot, MAX_EXTRUDERS};
