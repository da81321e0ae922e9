//! One-time extraction of the fixed thermodynamic parameter bundle.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use precip_core::errors::ErrorInfo;
use precip_core::{
    Composition, PhaseName, PrecipError, PrecipitateSelection, SimulationConfig, Species,
    SpeciesConfig,
};
use serde::{Deserialize, Serialize};

use crate::oracle::{Conditions, PhaseInstance, ThermoOracle};
use crate::phases::{check_required_elements, select_relevant_phases};

/// Matrix chemical potential slope for one species.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChemicalPotentialSlope {
    /// Central-difference estimate of ∂G/∂c of the matrix (J/mol).
    pub dg_dc: f64,
    /// Composition width actually spanned by the two evaluations.
    pub step_width: f64,
}

/// Frozen parameter bundle consumed by the field engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermodynamicParameters {
    /// Matrix phase name.
    pub matrix_phase: PhaseName,
    /// Precipitate phase modelled by this run.
    pub precipitate_phase: PhaseName,
    /// Matrix equilibrium composition per solute.
    pub matrix_composition: Composition,
    /// Precipitate equilibrium composition per solute.
    pub precipitate_composition: Composition,
    /// Molar Gibbs energy of the matrix at its equilibrium composition.
    pub g_matrix: f64,
    /// Molar Gibbs energy of the precipitate at its equilibrium composition.
    pub g_precipitate: f64,
    /// ΔG = G_matrix − G_precipitate (J/mol).
    pub driving_force: f64,
    /// Matrix ∂G/∂c per solute.
    pub slopes: BTreeMap<Species, ChemicalPotentialSlope>,
    /// Temperature of the equilibrium query (K).
    pub temperature: f64,
    /// Pressure of the equilibrium query (Pa).
    pub pressure: f64,
    /// Stable assemblage the bundle was derived from.
    #[serde(default)]
    pub stable_phases: Vec<PhaseInstance>,
}

impl ThermodynamicParameters {
    /// True when the selected phase pair does not favour precipitation.
    pub fn has_negative_driving_force(&self) -> bool {
        self.driving_force < 0.0
    }

    /// Matrix ∂G/∂c of `species`.
    pub fn slope(&self, species: &Species) -> Option<f64> {
        self.slopes.get(species).map(|slope| slope.dg_dc)
    }
}

/// Queries an oracle once and freezes the result.
///
/// The oracle is injected; the extractor holds no other state.
pub struct DrivingForceExtractor<'a, O: ?Sized> {
    oracle: &'a O,
}

impl<'a, O> DrivingForceExtractor<'a, O>
where
    O: ThermoOracle + ?Sized,
{
    /// Wraps `oracle`.
    pub fn new(oracle: &'a O) -> Self {
        Self { oracle }
    }

    /// Derives the parameter bundle for `config`.
    pub fn derive(&self, config: &SimulationConfig) -> Result<ThermodynamicParameters, PrecipError> {
        config.validate()?;
        let settings = &config.thermo;
        let solutes = config.species_names();

        let mut required = solutes.clone();
        required.push(settings.host_element.clone());
        check_required_elements(self.oracle, &required)?;

        let mut components = required;
        components.push(Species::new("VA"));

        let phases = select_relevant_phases(&self.oracle.phases(), settings)?;
        info!(
            "equilibrium query at T={:.2} K over phases [{}]",
            config.temperature,
            join_names(phases.iter().map(PhaseName::as_str))
        );

        let conditions =
            Conditions::mole_fractions(config.temperature, config.pressure, config.bulk_composition());
        let equilibrium = self.oracle.equilibrium(&components, &phases, &conditions)?;
        let stable = equilibrium.stable_phases(settings.stability_threshold);
        if stable.is_empty() {
            return Err(PrecipError::PhaseInstability(
                ErrorInfo::new("no-stable-phases", "equilibrium reported no stable phases")
                    .with_context("temperature", config.temperature.to_string()),
            ));
        }
        for phase in &stable {
            info!(
                "stable phase {:<15} amount = {:.6}",
                phase.name.as_str(),
                phase.amount
            );
        }

        let matrix = stable
            .iter()
            .copied()
            .find(|phase| phase.name == settings.matrix_phase)
            .ok_or_else(|| {
                PrecipError::PhaseInstability(
                    ErrorInfo::new("matrix-unstable", "matrix phase is not stable at these conditions")
                        .with_context("phase", settings.matrix_phase.to_string())
                        .with_context("temperature", config.temperature.to_string())
                        .with_context("stable", join_names(stable.iter().map(|p| p.name.as_str()))),
                )
            })?;

        let candidates: Vec<&PhaseInstance> = stable
            .iter()
            .copied()
            .filter(|phase| phase.name != settings.matrix_phase && phase.name != settings.liquid_phase)
            .collect();
        let precipitate = select_precipitate(&candidates, settings.precipitate_selection)
            .ok_or_else(|| {
                PrecipError::PhaseInstability(
                    ErrorInfo::new("no-precipitate", "no secondary phase is stable")
                        .with_context("temperature", config.temperature.to_string())
                        .with_context("stable", join_names(stable.iter().map(|p| p.name.as_str())))
                        .with_hint("adjust temperature or composition; no placeholder phase is used"),
                )
            })?;

        let matrix_composition = phase_composition(matrix, &solutes)?;
        let precipitate_composition = phase_composition(precipitate, &solutes)?;
        info!(
            "matrix {} composition {}",
            matrix.name,
            format_composition(&matrix_composition)
        );
        info!(
            "precipitate {} composition {}",
            precipitate.name,
            format_composition(&precipitate_composition)
        );

        let g_matrix = self.oracle.gibbs_energy(
            &components,
            &matrix.name,
            config.temperature,
            config.pressure,
            &matrix_composition,
        )?;
        let g_precipitate = self.oracle.gibbs_energy(
            &components,
            &precipitate.name,
            config.temperature,
            config.pressure,
            &precipitate_composition,
        )?;
        let driving_force = g_matrix - g_precipitate;
        info!(
            "G(matrix) = {:.2} J/mol, G(precipitate) = {:.2} J/mol, ΔG = {:.2} J/mol",
            g_matrix, g_precipitate, driving_force
        );
        if driving_force < 0.0 {
            warn!(
                "negative driving force ΔG = {:.2} J/mol: {} is not favoured over {} at {:.2} K; continuing",
                driving_force, precipitate.name, matrix.name, config.temperature
            );
        }

        let mut slopes = BTreeMap::new();
        for species in &config.species {
            let slope = self.matrix_slope(
                config,
                &components,
                &matrix.name,
                &matrix_composition,
                species,
            )?;
            slopes.insert(species.name.clone(), slope);
        }

        Ok(ThermodynamicParameters {
            matrix_phase: matrix.name.clone(),
            precipitate_phase: precipitate.name.clone(),
            matrix_composition,
            precipitate_composition,
            g_matrix,
            g_precipitate,
            driving_force,
            slopes,
            temperature: config.temperature,
            pressure: config.pressure,
            stable_phases: stable.into_iter().cloned().collect(),
        })
    }

    fn matrix_slope(
        &self,
        config: &SimulationConfig,
        components: &[Species],
        matrix: &PhaseName,
        equilibrium: &Composition,
        species: &SpeciesConfig,
    ) -> Result<ChemicalPotentialSlope, PrecipError> {
        let settings = &config.thermo;
        let x = equilibrium.get(&species.name).unwrap_or(0.0);
        let requested = if x > 0.0 {
            species.fd_step.min(settings.relative_step * x)
        } else {
            species.zero_fd_step
        };
        let plus = (x + requested).min(settings.composition_ceiling);
        let minus = (x - requested).max(0.0);
        let width = plus - minus;
        // Clamping shrinks the step near the bounds; divide by what was achieved.
        if width.is_nan() || width <= settings.degenerate_step_tolerance {
            return Err(PrecipError::DegenerateStep(
                ErrorInfo::new("step-collapsed", "composition range too small for ∂G/∂c")
                    .with_context("species", species.name.to_string())
                    .with_context("composition", x.to_string())
                    .with_context("width", width.to_string()),
            ));
        }

        let mut upper = equilibrium.clone();
        upper.set(species.name.clone(), plus);
        let mut lower = equilibrium.clone();
        lower.set(species.name.clone(), minus);
        let g_plus =
            self.oracle
                .gibbs_energy(components, matrix, config.temperature, config.pressure, &upper)?;
        let g_minus =
            self.oracle
                .gibbs_energy(components, matrix, config.temperature, config.pressure, &lower)?;
        let dg_dc = (g_plus - g_minus) / width;
        debug!(
            "dG/dX_{} = {:.2} J/mol (step={:.6}, requested={:.6})",
            species.name, dg_dc, width, requested
        );
        Ok(ChemicalPotentialSlope {
            dg_dc,
            step_width: width,
        })
    }
}

/// Convenience wrapper around [`DrivingForceExtractor::derive`].
pub fn derive<O>(oracle: &O, config: &SimulationConfig) -> Result<ThermodynamicParameters, PrecipError>
where
    O: ThermoOracle + ?Sized,
{
    DrivingForceExtractor::new(oracle).derive(config)
}

fn select_precipitate<'p>(
    candidates: &[&'p PhaseInstance],
    policy: PrecipitateSelection,
) -> Option<&'p PhaseInstance> {
    match policy {
        PrecipitateSelection::FirstReported => candidates.first().copied(),
        PrecipitateSelection::LargestAmount => candidates.iter().copied().min_by(|a, b| {
            b.amount
                .total_cmp(&a.amount)
                .then_with(|| a.name.cmp(&b.name))
        }),
        PrecipitateSelection::LexicalName => {
            candidates.iter().copied().min_by(|a, b| a.name.cmp(&b.name))
        }
    }
}

fn phase_composition(phase: &PhaseInstance, solutes: &[Species]) -> Result<Composition, PrecipError> {
    let mut composition = Composition::new();
    for species in solutes {
        let fraction = phase.composition.get(species).ok_or_else(|| {
            PrecipError::PhaseInstability(
                ErrorInfo::new("composition-missing", "phase composition lacks a tracked species")
                    .with_context("phase", phase.name.to_string())
                    .with_context("species", species.to_string()),
            )
        })?;
        composition.set(species.clone(), fraction);
    }
    Ok(composition)
}

fn join_names<'s>(names: impl Iterator<Item = &'s str>) -> String {
    names.collect::<Vec<_>>().join(",")
}

fn format_composition(composition: &Composition) -> String {
    composition
        .iter()
        .map(|(species, x)| format!("{species}={x:.6}"))
        .collect::<Vec<_>>()
        .join(" ")
}
