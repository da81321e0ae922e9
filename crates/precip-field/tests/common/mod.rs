#![allow(dead_code)]

use std::collections::BTreeMap;

use precip_core::{Composition, SimulationConfig, Species, SpeciesConfig};
use precip_field::{Field, FieldState, SpeciesField};
use precip_thermo::{ChemicalPotentialSlope, ThermodynamicParameters};

/// Hand-built bundle for `(species, ∂G/∂c, c_eq, c_precipitate)` entries.
pub fn parameters(entries: &[(&str, f64, f64, f64)], driving_force: f64) -> ThermodynamicParameters {
    let mut matrix = Composition::new();
    let mut precipitate = Composition::new();
    let mut slopes = BTreeMap::new();
    for &(name, slope, c_eq, c_p) in entries {
        matrix.set(Species::new(name), c_eq);
        precipitate.set(Species::new(name), c_p);
        slopes.insert(
            Species::new(name),
            ChemicalPotentialSlope {
                dg_dc: slope,
                step_width: 2e-3,
            },
        );
    }
    ThermodynamicParameters {
        matrix_phase: "FCC_A1".into(),
        precipitate_phase: "MGZN2".into(),
        matrix_composition: matrix,
        precipitate_composition: precipitate,
        g_matrix: 0.0,
        g_precipitate: -driving_force,
        driving_force,
        slopes,
        temperature: 393.15,
        pressure: 101_325.0,
        stable_phases: Vec::new(),
    }
}

/// Single-solute configuration on an `n × n` grid.
pub fn zn_config(n: usize) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.grid.nx = n;
    config.grid.ny = n;
    config.species = vec![SpeciesConfig::new("ZN", 0.06)];
    config
}

pub fn uniform_state(n: usize, eta: f64, zn: f64) -> FieldState {
    FieldState::from_parts(
        Field::filled(n, n, eta),
        vec![SpeciesField {
            species: Species::new("ZN"),
            field: Field::filled(n, n, zn),
        }],
    )
    .expect("consistent state")
}

pub fn in_unit_interval(field: &Field) -> bool {
    field.values().iter().all(|v| (0.0..=1.0).contains(v))
}
