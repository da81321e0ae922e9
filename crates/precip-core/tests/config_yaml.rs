use std::fs;

use precip_core::{PrecipError, PrecipitateSelection, SimulationConfig, Species};
use tempfile::tempdir;

#[test]
fn empty_yaml_yields_defaults() {
    let config = SimulationConfig::from_yaml_str("{}").expect("defaults parse");
    assert_eq!(config, SimulationConfig::default());
    assert_eq!(config.grid.nx, 128);
    assert_eq!(config.species_names(), vec![Species::new("zn"), Species::new("mg")]);
    assert_eq!(
        config.thermo.precipitate_selection,
        PrecipitateSelection::LargestAmount
    );
    let mg = &config.species[1];
    assert_eq!(mg.fd_step, 1e-3);
    assert_eq!(mg.zero_fd_step, 1e-4);
    assert_eq!(config.species[0].zero_fd_step, 1e-3);
}

#[test]
fn partial_yaml_overrides_selected_fields() {
    let text = r#"
grid:
  nx: 32
  ny: 32
temperature: 400.0
species:
  - name: zn
    bulk_fraction: 0.06
    activation_energy: 130000.0
thermo:
  precipitate_selection: first-reported
run:
  steps: 200
  snapshot_interval: 10
"#;
    let config = SimulationConfig::from_yaml_str(text).expect("parse");
    assert_eq!(config.grid.nx, 32);
    assert_eq!(config.grid.dx, 1e-9);
    assert_eq!(config.species.len(), 1);
    assert_eq!(config.species[0].name.as_str(), "ZN");
    assert_eq!(config.species[0].activation_energy, 130e3);
    assert_eq!(config.species[0].diffusion_prefactor, 1e-5);
    assert_eq!(config.species[0].zero_fd_step, 1e-3);
    assert_eq!(
        config.thermo.precipitate_selection,
        PrecipitateSelection::FirstReported
    );
    assert_eq!(config.run.steps, 200);
    assert_eq!(config.bulk_composition().get(&Species::new("ZN")), Some(0.06));
}

#[test]
fn validation_rejects_bad_values() {
    let mut config = SimulationConfig::default();
    config.dt = 0.0;
    assert!(matches!(config.validate(), Err(PrecipError::Config(_))));

    let mut config = SimulationConfig::default();
    config.species[0].bulk_fraction = 1.5;
    let err = config.validate().unwrap_err();
    assert_eq!(err.info().code, "fraction-range");

    let mut config = SimulationConfig::default();
    config.grid.nx = 16;
    config.nucleation.margin = 8;
    let err = config.validate().unwrap_err();
    assert_eq!(err.info().code, "nucleation-margin");

    let mut config = SimulationConfig::default();
    config.species.push(config.species[0].clone());
    let err = config.validate().unwrap_err();
    assert_eq!(err.info().code, "species-duplicate");

    let mut config = SimulationConfig::default();
    config.run.snapshot_interval = 0;
    assert!(config.validate().is_err());
}

#[test]
fn load_reports_path_on_parse_failure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "grid: [not, a, map]").unwrap();
    let err = SimulationConfig::load(&path).unwrap_err();
    match err {
        PrecipError::Serde(info) => {
            assert_eq!(info.code, "config-parse");
            assert!(info.context.contains_key("path"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}
