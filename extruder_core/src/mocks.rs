//! Test and helper mocks for extruder_core.
//!
//! The recording mocks hold `Arc<Mutex<_>>` spies so a test can keep a
//! clone of the buffer after moving the mock into an extruder.

// Spy buffers only; a poisoned lock means the test already panicked.
#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use extruder_traits::{
    ExtrusionSegment, ExtrusionSolver, Heater, HeaterStatus, LookaheadQueue, StepperEnable,
};

/// Heater with a fixed can-extrude gate.
#[derive(Debug, Clone, Copy)]
pub struct StaticHeater {
    pub temperature: f64,
    pub target: f64,
    pub can_extrude: bool,
}

impl StaticHeater {
    /// A heater at temperature, ready to extrude.
    pub fn hot() -> Self {
        Self {
            temperature: 210.0,
            target: 210.0,
            can_extrude: true,
        }
    }

    /// A cold heater that blocks extrusion.
    pub fn cold() -> Self {
        Self {
            temperature: 23.0,
            target: 0.0,
            can_extrude: false,
        }
    }
}

impl Heater for StaticHeater {
    fn can_extrude(&self) -> bool {
        self.can_extrude
    }

    fn status(&self) -> HeaterStatus {
        HeaterStatus {
            temperature: self.temperature,
            target: self.target,
            can_extrude: self.can_extrude,
        }
    }
}

/// Lookahead queue spy recording every `(new_delay, old_delay)` pair.
#[derive(Default, Clone)]
pub struct RecordingQueue {
    pub delays: Arc<Mutex<Vec<(f64, f64)>>>,
}

impl LookaheadQueue for RecordingQueue {
    fn note_flush_delay(&mut self, new_delay: f64, old_delay: f64) {
        self.delays.lock().unwrap().push((new_delay, old_delay));
    }
}

/// Solver spy recording submitted segments and published pressure params.
#[derive(Default, Clone)]
pub struct RecordingSolver {
    pub segments: Arc<Mutex<Vec<ExtrusionSegment>>>,
    pub pressure: Arc<Mutex<Vec<(f64, f64)>>>,
}

impl ExtrusionSolver for RecordingSolver {
    fn submit_segment(&mut self, segment: &ExtrusionSegment) {
        self.segments.lock().unwrap().push(*segment);
    }

    fn set_pressure(&mut self, pressure_advance: f64, smooth_time: f64) {
        self.pressure
            .lock()
            .unwrap()
            .push((pressure_advance, smooth_time));
    }
}

/// Enable-line spy recording every `(print_time, on)` transition.
#[derive(Default, Clone)]
pub struct RecordingEnable {
    pub events: Arc<Mutex<Vec<(f64, bool)>>>,
}

impl StepperEnable for RecordingEnable {
    fn set_enabled(
        &mut self,
        print_time: f64,
        on: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.events.lock().unwrap().push((print_time, on));
        Ok(())
    }
}

/// Enable line that always faults; exercises the hardware error path.
pub struct FailingEnable;

impl StepperEnable for FailingEnable {
    fn set_enabled(
        &mut self,
        _print_time: f64,
        _on: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err("enable line fault".into())
    }
}
