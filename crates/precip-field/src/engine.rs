//! Explicit time integration of the coupled Allen-Cahn / Cahn-Hilliard system.

use log::warn;
use precip_core::errors::ErrorInfo;
use precip_core::{PrecipError, SimulationConfig, Species};
use precip_thermo::ThermodynamicParameters;

use crate::grid::Field;
use crate::kinetics::{arrhenius_diffusivity, order_parameter_force};
use crate::state::FieldState;

/// Frozen per-species coefficients of the Cahn-Hilliard update.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SpeciesKinetics {
    /// Solute.
    pub species: Species,
    /// Matrix ∂G/∂c.
    pub slope: f64,
    /// Matrix equilibrium mole fraction c_eq.
    pub equilibrium: f64,
    /// Arrhenius diffusivity D.
    pub diffusivity: f64,
}

/// Owns the field state and advances it one explicit Euler step at a time.
pub struct FieldEngine<'a> {
    config: &'a SimulationConfig,
    params: &'a ThermodynamicParameters,
    kinetics: Vec<SpeciesKinetics>,
    state: FieldState,
}

impl<'a> FieldEngine<'a> {
    /// Takes ownership of a seeded `state`.
    ///
    /// Every composition field must match a configured species with a
    /// derived slope and a matrix equilibrium composition.
    pub fn new(
        config: &'a SimulationConfig,
        params: &'a ThermodynamicParameters,
        state: FieldState,
    ) -> Result<Self, PrecipError> {
        if state.nx() != config.grid.nx || state.ny() != config.grid.ny {
            return Err(PrecipError::Config(
                ErrorInfo::new("state-grid", "state shape differs from the configured grid")
                    .with_context("state", format!("{}x{}", state.nx(), state.ny()))
                    .with_context("grid", format!("{}x{}", config.grid.nx, config.grid.ny)),
            ));
        }
        if state.compositions().len() != config.species.len() {
            return Err(PrecipError::config(
                "state-species",
                "state tracks a different number of species than configured",
            ));
        }

        let mut kinetics = Vec::with_capacity(config.species.len());
        for (entry, species) in state.compositions().iter().zip(&config.species) {
            if entry.species != species.name {
                return Err(PrecipError::Config(
                    ErrorInfo::new("state-species", "composition fields out of configured order")
                        .with_context("expected", species.name.to_string())
                        .with_context("found", entry.species.to_string()),
                ));
            }
            let slope = params.slope(&species.name).ok_or_else(|| {
                PrecipError::Config(
                    ErrorInfo::new("slope-missing", "no chemical potential slope for species")
                        .with_context("species", species.name.to_string()),
                )
            })?;
            let equilibrium = params.matrix_composition.get(&species.name).ok_or_else(|| {
                PrecipError::PhaseInstability(
                    ErrorInfo::new("composition-missing", "matrix composition lacks species")
                        .with_context("species", species.name.to_string()),
                )
            })?;
            kinetics.push(SpeciesKinetics {
                species: species.name.clone(),
                slope,
                equilibrium,
                diffusivity: arrhenius_diffusivity(
                    species.diffusion_prefactor,
                    species.activation_energy,
                    config.temperature,
                ),
            });
        }

        Ok(Self {
            config,
            params,
            kinetics,
            state,
        })
    }

    /// Advances every field by one step of `config.dt`.
    ///
    /// All new fields are computed from the start-of-step state before any
    /// of them replaces its predecessor.
    pub fn step(&mut self) {
        let dx = self.config.grid.dx;
        let dt = self.config.dt;
        let model = &self.config.model;
        let driving_force = self.params.driving_force;

        let eta = self.state.eta();
        let eta_lap = eta.laplacian(dx);
        let next_eta = eta.zip_map(&eta_lap, |value, lap| {
            let force = order_parameter_force(value, lap, model, driving_force).total();
            (value - model.m_eta * force * dt).clamp(0.0, 1.0)
        });

        let next_compositions: Vec<Field> = self
            .state
            .compositions()
            .iter()
            .zip(&self.kinetics)
            .map(|(entry, kinetics)| {
                let c = &entry.field;
                let c_lap = c.laplacian(dx);
                let potential = c.zip_map(&c_lap, |value, lap| {
                    kinetics.slope * (value - kinetics.equilibrium) - kinetics.diffusivity * lap
                });
                let flux = potential.laplacian(dx);
                c.zip_map(&flux, |value, div| (value + model.m_c * div * dt).clamp(0.0, 1.0))
            })
            .collect();

        self.state.replace(next_eta, next_compositions, dt);
    }

    /// Performs `steps` consecutive steps.
    pub fn run_steps(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Largest time step the explicit scheme is expected to tolerate:
    /// `dx² / (4·max(D, M_c·|∂G/∂c|, M_η·κ))` over all species.
    pub fn advisory_time_step(&self) -> f64 {
        let model = &self.config.model;
        let stiffest = self
            .kinetics
            .iter()
            .flat_map(|k| [k.diffusivity, model.m_c * k.slope.abs()])
            .fold(model.m_eta * model.kappa, f64::max);
        if stiffest > 0.0 {
            self.config.grid.dx.powi(2) / (4.0 * stiffest)
        } else {
            f64::INFINITY
        }
    }

    /// Logs a warning when the configured `dt` exceeds [`Self::advisory_time_step`].
    pub fn warn_if_unstable(&self) -> bool {
        let advisory = self.advisory_time_step();
        let exceeds = self.config.dt > advisory;
        if exceeds {
            warn!(
                "dt = {:.3e} s exceeds the advisory explicit limit {:.3e} s; fields are clamped but may oscillate",
                self.config.dt, advisory
            );
        }
        exceeds
    }

    /// Current state.
    pub fn state(&self) -> &FieldState {
        &self.state
    }

    /// Releases the state.
    pub fn into_state(self) -> FieldState {
        self.state
    }

    /// Parameter bundle driving the evolution.
    pub fn parameters(&self) -> &ThermodynamicParameters {
        self.params
    }

    /// Configuration driving the evolution.
    pub fn config(&self) -> &SimulationConfig {
        self.config
    }
}
