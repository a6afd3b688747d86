//! Collaborator interfaces for the extruder kinematics core.
//!
//! The core never talks to the heater subsystem, the lookahead planner,
//! the iterative solver or the stepper enable line directly; it holds
//! handles to these traits, injected at construction.

/// Snapshot of a heater's externally visible state, merged into the
/// extruder status report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaterStatus {
    /// Current temperature in degrees Celsius.
    pub temperature: f64,
    /// Commanded target temperature in degrees Celsius.
    pub target: f64,
    /// Whether the heater is above its minimum extrude temperature.
    pub can_extrude: bool,
}

/// Temperature gate consulted before any extrusion move is accepted.
pub trait Heater {
    /// True when the hotend is hot enough to extrude right now.
    fn can_extrude(&self) -> bool;
    /// Status snapshot for operator-facing reports.
    fn status(&self) -> HeaterStatus;
}

/// The planner's delay-negotiation capability.
///
/// The planner must never flush moves that fall inside a still-open
/// smoothing window; this call lets it grow or shrink its mandatory
/// lookahead buffer when an extruder's smoothing time changes. Delay
/// bookkeeping downstream is cumulative across calls, so identical
/// re-publishes must still be routed through here.
pub trait LookaheadQueue {
    fn note_flush_delay(&mut self, new_delay: f64, old_delay: f64);
}

/// One move's trapezoidal profile projected onto the extruder axis,
/// handed to the iterative solver as a time-windowed segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrusionSegment {
    /// Absolute print time at which the segment starts.
    pub print_time: f64,
    /// Acceleration phase duration (shared across axes).
    pub accel_t: f64,
    /// Cruise phase duration.
    pub cruise_t: f64,
    /// Deceleration phase duration.
    pub decel_t: f64,
    /// Extruder start position of the move.
    pub start_pos: f64,
    /// Running pressure-advance position accumulator at segment start.
    pub pa_start_pos: f64,
    /// Start velocity projected onto the extruder axis.
    pub start_v: f64,
    /// Cruise velocity projected onto the extruder axis.
    pub cruise_v: f64,
    /// Acceleration projected onto the extruder axis.
    pub accel: f64,
    /// Whether pressure advance couples to this segment.
    pub is_pa_move: bool,
}

/// Opaque iterative-solver capability. Segments submitted here are later
/// turned into a continuous position function for step compression.
pub trait ExtrusionSolver {
    /// Queue one projected segment.
    fn submit_segment(&mut self, segment: &ExtrusionSegment);
    /// Publish new pressure-advance parameters. `smooth_time` here is the
    /// effective smoothing time (zero when the gain is zero).
    fn set_pressure(&mut self, pressure_advance: f64, smooth_time: f64);
}

/// Motor-enable line of the extruder stepper.
pub trait StepperEnable {
    fn set_enabled(
        &mut self,
        print_time: f64,
        on: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
