//! Narrow interface onto the external thermodynamic database.

use precip_core::{Composition, PhaseName, PrecipError, Species};
use serde::{Deserialize, Serialize};

/// How the composition in [`Conditions`] is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CompositionBasis {
    /// Mole fractions (the extractor always uses this basis).
    #[default]
    MoleFraction,
    /// Weight fractions. Backends without mass data reject this basis.
    WeightFraction,
}

/// State variables of one equilibrium query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    /// Temperature (K).
    pub temperature: f64,
    /// Pressure (Pa).
    pub pressure: f64,
    /// Overall system composition of the listed solutes.
    pub composition: Composition,
    /// Basis of `composition`.
    #[serde(default)]
    pub basis: CompositionBasis,
}

impl Conditions {
    /// Mole-fraction conditions at `temperature` and `pressure`.
    pub fn mole_fractions(temperature: f64, pressure: f64, composition: Composition) -> Self {
        Self {
            temperature,
            pressure,
            composition,
            basis: CompositionBasis::MoleFraction,
        }
    }
}

/// One phase instance present in an equilibrium answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseInstance {
    /// Phase name as reported by the database.
    pub name: PhaseName,
    /// Phase amount as a mole fraction of the whole system.
    pub amount: f64,
    /// Constituent mole fractions inside the phase.
    pub composition: Composition,
}

/// Equilibrium answer for a single set of conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EquilibriumResult {
    /// Phase instances in the order the oracle enumerated them.
    pub phases: Vec<PhaseInstance>,
}

impl EquilibriumResult {
    /// Instances with a non-blank name and an amount above `threshold`,
    /// preserving oracle order.
    pub fn stable_phases(&self, threshold: f64) -> Vec<&PhaseInstance> {
        self.phases
            .iter()
            .filter(|phase| !phase.name.is_blank() && phase.amount > threshold)
            .collect()
    }
}

/// Thermodynamic backend consulted once, during setup.
///
/// Implementations must be deterministic: the same inputs always give the
/// same answer, so callers never retry.
pub trait ThermoOracle: Send + Sync {
    /// Elements defined by the loaded database.
    fn elements(&self) -> Vec<Species>;

    /// Phases defined by the loaded database, in database order.
    fn phases(&self) -> Vec<PhaseName>;

    /// Computes the stable phase assemblage under `conditions`.
    fn equilibrium(
        &self,
        components: &[Species],
        phases: &[PhaseName],
        conditions: &Conditions,
    ) -> Result<EquilibriumResult, PrecipError>;

    /// Molar Gibbs energy (J/mol) of `phase` at `composition`.
    fn gibbs_energy(
        &self,
        components: &[Species],
        phase: &PhaseName,
        temperature: f64,
        pressure: f64,
        composition: &Composition,
    ) -> Result<f64, PrecipError>;
}
