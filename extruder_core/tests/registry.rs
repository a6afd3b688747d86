use extruder_config::load_toml;
use extruder_core::mocks::{RecordingEnable, RecordingQueue, RecordingSolver, StaticHeater};
use extruder_core::{ExtruderHandles, ExtruderRegistry, MoveError, PlannedMove};

fn handles(_index: usize) -> ExtruderHandles {
    ExtruderHandles {
        heater: Box::new(StaticHeater::hot()),
        planner: Box::new(RecordingQueue::default()),
        solver: Box::new(RecordingSolver::default()),
        enable: Box::new(RecordingEnable::default()),
    }
}

fn registry_from(toml: &str) -> ExtruderRegistry {
    let config = load_toml(toml).unwrap();
    ExtruderRegistry::from_config(&config, 300.0, 3000.0, handles).unwrap()
}

const SECTION: &str = "nozzle_diameter = 0.4\nfilament_diameter = 1.75\n";

#[test]
fn legacy_unnamed_section_maps_to_index_zero() {
    let registry = registry_from(&format!("[extruder]\n{SECTION}"));
    assert_eq!(registry.len(), 1);
    assert!(registry.get(0).is_configured());
    assert!(!registry.get(1).is_configured());
}

#[test]
fn indexed_sections_enumerate_in_order() {
    let registry = registry_from(&format!("[extruder0]\n{SECTION}\n[extruder1]\n{SECTION}"));
    assert_eq!(registry.len(), 2);
    assert!(registry.get(0).is_configured());
    assert!(registry.get(1).is_configured());
    assert!(!registry.get(2).is_configured());
}

#[test]
fn scan_stops_at_the_first_gap() {
    // extruder2 without extruder1 is unreachable by the bounded scan.
    let registry = registry_from(&format!("[extruder0]\n{SECTION}\n[extruder2]\n{SECTION}"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn empty_config_yields_no_extruders() {
    let registry = registry_from("");
    assert!(registry.is_empty());
    assert_eq!(registry.iter().count(), 0);
}

#[test]
fn absent_slot_rejects_extrusion_with_a_fixed_error() {
    let mut registry = registry_from("");
    let mut mv = PlannedMove::new([0.0; 4], [1.0, 0.0, 0.0, 0.1], 100.0, 3000.0);
    assert_eq!(
        registry.get(0).check_move(&mut mv),
        Err(MoveError::NoExtruderConfigured)
    );
    // Junction defers fully to the move's own limit.
    let prev = PlannedMove::new([0.0; 4], [1.0, 0.0, 0.0, 0.2], 100.0, 3000.0);
    assert_eq!(registry.get(0).calc_junction(&prev, &mv), mv.max_cruise_v2);
    // Zero position contribution, no-op motion hooks.
    assert_eq!(registry.get(0).extrude_position(), 0.0);
    registry.get_mut(0).apply(1.0, &mv).unwrap();
    registry.get_mut(0).motor_off(2.0).unwrap();
}

#[test]
fn invalid_section_fails_with_its_name() {
    let config = load_toml(
        "[extruder]\nnozzle_diameter = 0.4\nfilament_diameter = 0.2\n",
    )
    .unwrap();
    let err = ExtruderRegistry::from_config(&config, 300.0, 3000.0, handles)
        .expect_err("filament below nozzle must fail validation");
    let msg = format!("{err:#}");
    assert!(msg.contains("[extruder]"), "unexpected error: {msg}");
    assert!(msg.contains("filament_diameter"), "unexpected error: {msg}");
}
