use extruder_config::{
    ConfigError, DEFAULT_SMOOTH_TIME, RawExtruderCfg, SMOOTH_TIME_MAX, load_file, load_toml,
};
use rstest::rstest;
use std::io::Write;

fn base_raw() -> RawExtruderCfg {
    RawExtruderCfg {
        nozzle_diameter: 0.4,
        filament_diameter: 1.75,
        ..Default::default()
    }
}

#[test]
fn defaults_are_derived_from_the_nozzle_and_filament() {
    let cfg = base_raw().validate("extruder", 300.0, 3000.0).unwrap();
    let filament_area = std::f64::consts::PI * (1.75_f64 / 2.0).powi(2);
    assert!((cfg.filament_area - filament_area).abs() < 1e-12);
    // Default cross-section is 4 * nozzle^2.
    let def_ratio = 4.0 * 0.4_f64.powi(2) / filament_area;
    assert!((cfg.max_extrude_ratio - def_ratio).abs() < 1e-12);
    assert!((cfg.max_e_velocity - 300.0 * def_ratio).abs() < 1e-9);
    assert!((cfg.max_e_accel - 3000.0 * def_ratio).abs() < 1e-9);
    assert_eq!(cfg.max_e_dist, 50.0);
    assert_eq!(cfg.instant_corner_v, 1.0);
    assert_eq!(cfg.pressure_advance, 0.0);
    assert_eq!(cfg.pressure_advance_smooth_time, DEFAULT_SMOOTH_TIME);
    assert_eq!(cfg.name, "extruder");
}

#[test]
fn explicit_values_override_the_defaults() {
    let raw = RawExtruderCfg {
        max_extrude_cross_section: Some(1.2),
        max_extrude_only_velocity: Some(75.0),
        max_extrude_only_accel: Some(1500.0),
        max_extrude_only_distance: Some(100.0),
        instantaneous_corner_velocity: Some(2.5),
        pressure_advance: Some(0.06),
        pressure_advance_smooth_time: Some(0.01),
        ..base_raw()
    };
    let cfg = raw.validate("extruder0", 300.0, 3000.0).unwrap();
    let filament_area = std::f64::consts::PI * (1.75_f64 / 2.0).powi(2);
    assert!((cfg.max_extrude_ratio - 1.2 / filament_area).abs() < 1e-12);
    assert_eq!(cfg.max_e_velocity, 75.0);
    assert_eq!(cfg.max_e_accel, 1500.0);
    assert_eq!(cfg.max_e_dist, 100.0);
    assert_eq!(cfg.instant_corner_v, 2.5);
    assert_eq!(cfg.pressure_advance, 0.06);
    assert_eq!(cfg.pressure_advance_smooth_time, 0.01);
}

#[test]
fn nozzle_diameter_must_be_positive() {
    let raw = RawExtruderCfg {
        nozzle_diameter: 0.0,
        ..base_raw()
    };
    assert_eq!(
        raw.validate("extruder", 300.0, 3000.0),
        Err(ConfigError::NotAbove {
            option: "nozzle_diameter",
            min: 0.0,
            value: 0.0,
        })
    );
}

#[test]
fn filament_diameter_must_cover_the_nozzle() {
    let raw = RawExtruderCfg {
        filament_diameter: 0.2,
        ..base_raw()
    };
    assert_eq!(
        raw.validate("extruder", 300.0, 3000.0),
        Err(ConfigError::BelowMinimum {
            option: "filament_diameter",
            min: 0.4,
            value: 0.2,
        })
    );
}

#[rstest]
#[case(Some(0.0))]
#[case(Some(-0.01))]
fn smooth_time_must_be_above_zero(#[case] smooth_time: Option<f64>) {
    let raw = RawExtruderCfg {
        pressure_advance_smooth_time: smooth_time,
        ..base_raw()
    };
    assert!(matches!(
        raw.validate("extruder", 300.0, 3000.0),
        Err(ConfigError::NotAbove {
            option: "pressure_advance_smooth_time",
            ..
        })
    ));
}

#[test]
fn smooth_time_is_capped_by_the_config_bound() {
    let raw = RawExtruderCfg {
        pressure_advance_smooth_time: Some(0.15),
        ..base_raw()
    };
    assert_eq!(
        raw.validate("extruder", 300.0, 3000.0),
        Err(ConfigError::AboveMaximum {
            option: "pressure_advance_smooth_time",
            max: SMOOTH_TIME_MAX,
            value: 0.15,
        })
    );
}

#[test]
fn pressure_advance_must_not_be_negative() {
    let raw = RawExtruderCfg {
        pressure_advance: Some(-0.5),
        ..base_raw()
    };
    assert!(matches!(
        raw.validate("extruder", 300.0, 3000.0),
        Err(ConfigError::BelowMinimum {
            option: "pressure_advance",
            ..
        })
    ));
}

#[test]
fn non_finite_values_are_rejected() {
    let raw = RawExtruderCfg {
        max_extrude_only_velocity: Some(f64::NAN),
        ..base_raw()
    };
    assert_eq!(
        raw.validate("extruder", 300.0, 3000.0),
        Err(ConfigError::NotFinite {
            option: "max_extrude_only_velocity",
        })
    );
}

#[test]
fn toml_sections_parse_by_name() {
    let config = load_toml(
        "[extruder]\nnozzle_diameter = 0.4\nfilament_diameter = 1.75\n\
         [extruder1]\nnozzle_diameter = 0.6\nfilament_diameter = 1.75\n",
    )
    .unwrap();
    assert!(config.section("extruder").is_some());
    assert!(config.section("extruder1").is_some());
    assert!(config.section("extruder2").is_none());
    assert_eq!(config.section("extruder1").unwrap().nozzle_diameter, 0.6);
}

#[test]
fn unknown_options_are_rejected() {
    let result = load_toml(
        "[extruder]\nnozzle_diameter = 0.4\nfilament_diameter = 1.75\nnozle_diametr = 0.4\n",
    );
    assert!(result.is_err());
}

#[test]
fn load_file_reads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[extruder]\nnozzle_diameter = 0.4\nfilament_diameter = 1.75"
    )
    .unwrap();
    let config = load_file(file.path()).unwrap();
    assert!(config.section("extruder").is_some());
    assert!(!config.is_empty());
}
