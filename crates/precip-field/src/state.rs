//! Spatial state of one simulation: order parameter plus one field per solute.

use std::fs;
use std::path::Path;

use precip_core::errors::ErrorInfo;
use precip_core::{PrecipError, SimulationConfig, Species};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::grid::Field;

/// Mole-fraction field of a single tracked solute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesField {
    /// Solute the field belongs to.
    pub species: Species,
    /// Mole fraction per cell.
    pub field: Field,
}

/// Order parameter η and composition fields sharing one grid.
///
/// Mutated only by the seeder before evolution and by the engine afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldState {
    eta: Field,
    compositions: Vec<SpeciesField>,
    time: f64,
    step: u64,
}

impl FieldState {
    /// Assembles a state at time zero, checking that all fields share a shape.
    pub fn from_parts(eta: Field, compositions: Vec<SpeciesField>) -> Result<Self, PrecipError> {
        let state = Self {
            eta,
            compositions,
            time: 0.0,
            step: 0,
        };
        state.check_consistency()?;
        Ok(state)
    }

    /// η drawn uniformly from `[0, noise_amplitude)` in row-major order and
    /// every composition at its nominal bulk fraction.
    pub fn initial<R: Rng + ?Sized>(
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Result<Self, PrecipError> {
        let (nx, ny) = (config.grid.nx, config.grid.ny);
        let amplitude = config.initial.noise_amplitude;
        let eta = Field::from_fn(nx, ny, |_, _| rng.gen::<f64>() * amplitude);
        let compositions = config
            .species
            .iter()
            .map(|species| SpeciesField {
                species: species.name.clone(),
                field: Field::filled(nx, ny, species.bulk_fraction),
            })
            .collect();
        Self::from_parts(eta, compositions)
    }

    /// Order parameter field.
    pub fn eta(&self) -> &Field {
        &self.eta
    }

    /// Composition fields in configuration order.
    pub fn compositions(&self) -> &[SpeciesField] {
        &self.compositions
    }

    /// Composition field of `species`.
    pub fn composition(&self, species: &Species) -> Option<&Field> {
        self.compositions
            .iter()
            .find(|entry| &entry.species == species)
            .map(|entry| &entry.field)
    }

    /// Simulated time (s).
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of completed steps.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Grid columns.
    pub fn nx(&self) -> usize {
        self.eta.nx()
    }

    /// Grid rows.
    pub fn ny(&self) -> usize {
        self.eta.ny()
    }

    pub(crate) fn eta_mut(&mut self) -> &mut Field {
        &mut self.eta
    }

    pub(crate) fn compositions_mut(&mut self) -> &mut [SpeciesField] {
        &mut self.compositions
    }

    pub(crate) fn replace(&mut self, eta: Field, compositions: Vec<Field>, dt: f64) {
        self.eta = eta;
        for (entry, field) in self.compositions.iter_mut().zip(compositions) {
            entry.field = field;
        }
        self.time += dt;
        self.step += 1;
    }

    fn check_consistency(&self) -> Result<(), PrecipError> {
        self.eta.check_shape()?;
        for entry in &self.compositions {
            entry.field.check_shape()?;
            if !entry.field.same_shape(&self.eta) {
                return Err(PrecipError::Config(
                    ErrorInfo::new("state-shape", "composition field does not match η")
                        .with_context("species", entry.species.to_string()),
                ));
            }
        }
        Ok(())
    }

    /// Restores a state from its JSON form.
    pub fn load_json(path: &Path) -> Result<Self, PrecipError> {
        let contents =
            fs::read_to_string(path).map_err(|err| PrecipError::serde_at("state-read", err, path))?;
        let state: FieldState = serde_json::from_str(&contents)
            .map_err(|err| PrecipError::serde_at("state-parse", err, path))?;
        state.check_consistency()?;
        Ok(state)
    }

    /// Writes the state as JSON, creating parent directories as needed.
    pub fn store_json(&self, path: &Path) -> Result<(), PrecipError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| PrecipError::serde_at("state-mkdir", err, parent))?;
        }
        let json = serde_json::to_string(self)
            .map_err(|err| PrecipError::serde_at("state-serialize", err, path))?;
        fs::write(path, json).map_err(|err| PrecipError::serde_at("state-write", err, path))
    }
}
