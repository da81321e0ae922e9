//! Deterministic in-process oracle with polynomial Gibbs energies.
//!
//! Each phase carries `G(x) = a + Σ bᵢ·xᵢ + Σ cᵢ·xᵢ²` and the equilibrium
//! answer is a fixed, declared assemblage. The oracle is loaded from YAML by
//! the CLI and built programmatically in tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use precip_core::errors::ErrorInfo;
use precip_core::{Composition, PhaseName, PrecipError, Species};
use serde::{Deserialize, Serialize};

use crate::oracle::{CompositionBasis, Conditions, EquilibriumResult, PhaseInstance, ThermoOracle};

/// Quadratic molar Gibbs energy model of one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GibbsPolynomial {
    /// Constant term a (J/mol).
    #[serde(default)]
    pub constant: f64,
    /// Linear coefficients bᵢ keyed by species.
    #[serde(default)]
    pub linear: BTreeMap<Species, f64>,
    /// Quadratic coefficients cᵢ keyed by species.
    #[serde(default)]
    pub quadratic: BTreeMap<Species, f64>,
}

impl GibbsPolynomial {
    /// Polynomial `a + b·x + c·x²` in a single species.
    pub fn single(species: impl Into<Species>, a: f64, b: f64, c: f64) -> Self {
        let species = species.into();
        let mut linear = BTreeMap::new();
        let mut quadratic = BTreeMap::new();
        linear.insert(species.clone(), b);
        quadratic.insert(species, c);
        Self {
            constant: a,
            linear,
            quadratic,
        }
    }

    /// Evaluates G at `composition`; unlisted species contribute nothing.
    pub fn evaluate(&self, composition: &Composition) -> f64 {
        let mut total = self.constant;
        for (species, x) in composition.iter() {
            if let Some(b) = self.linear.get(species) {
                total += b * x;
            }
            if let Some(c) = self.quadratic.get(species) {
                total += c * x * x;
            }
        }
        total
    }

    /// Analytic ∂G/∂xᵢ at `composition`.
    pub fn derivative(&self, species: &Species, composition: &Composition) -> f64 {
        let x = composition.get(species).unwrap_or(0.0);
        let b = self.linear.get(species).copied().unwrap_or(0.0);
        let c = self.quadratic.get(species).copied().unwrap_or(0.0);
        b + 2.0 * c * x
    }
}

/// Phase definition held by the oracle's database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseModel {
    /// Phase name.
    pub name: PhaseName,
    /// Gibbs energy model.
    #[serde(default)]
    pub gibbs: GibbsPolynomial,
}

/// Declared equilibrium assemblage returned for every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredPhase {
    /// Phase name; must match a [`PhaseModel`].
    pub name: PhaseName,
    /// Phase amount (mole fraction of the system).
    pub amount: f64,
    /// Constituent mole fractions.
    pub composition: Composition,
}

/// Oracle answering from polynomial models and a declared assemblage.
#[derive(Debug, Serialize, Deserialize)]
pub struct PolynomialOracle {
    /// Elements defined by the database.
    pub elements: Vec<Species>,
    /// Phase models in database order.
    pub phases: Vec<PhaseModel>,
    /// Assemblage returned by [`ThermoOracle::equilibrium`], in this order.
    #[serde(default)]
    pub equilibrium: Vec<DeclaredPhase>,
    #[serde(skip)]
    gibbs_calls: AtomicUsize,
    #[serde(skip)]
    equilibrium_calls: AtomicUsize,
}

impl PolynomialOracle {
    /// Creates an oracle over `elements` with no phases.
    pub fn new<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Species>,
    {
        Self {
            elements: elements.into_iter().map(Into::into).collect(),
            phases: Vec::new(),
            equilibrium: Vec::new(),
            gibbs_calls: AtomicUsize::new(0),
            equilibrium_calls: AtomicUsize::new(0),
        }
    }

    /// Adds a phase model to the database.
    pub fn with_phase(mut self, name: impl Into<PhaseName>, gibbs: GibbsPolynomial) -> Self {
        self.phases.push(PhaseModel {
            name: name.into(),
            gibbs,
        });
        self
    }

    /// Appends an instance to the declared equilibrium assemblage.
    pub fn with_equilibrium_phase(
        mut self,
        name: impl Into<PhaseName>,
        amount: f64,
        composition: Composition,
    ) -> Self {
        self.equilibrium.push(DeclaredPhase {
            name: name.into(),
            amount,
            composition,
        });
        self
    }

    /// Parses an oracle description from YAML.
    pub fn from_yaml_str(text: &str) -> Result<Self, PrecipError> {
        let oracle: PolynomialOracle = serde_yaml::from_str(text)
            .map_err(|err| PrecipError::Serde(ErrorInfo::new("oracle-parse", err.to_string())))?;
        oracle.check_declarations()?;
        Ok(oracle)
    }

    /// Loads an oracle description from a YAML file.
    pub fn load(path: &Path) -> Result<Self, PrecipError> {
        let text =
            fs::read_to_string(path).map_err(|err| PrecipError::serde_at("oracle-read", err, path))?;
        Self::from_yaml_str(&text).map_err(|err| match err {
            PrecipError::Serde(info) => {
                PrecipError::Serde(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }

    /// Model of `name`, if the database defines it.
    pub fn model(&self, name: &PhaseName) -> Option<&GibbsPolynomial> {
        self.phases
            .iter()
            .find(|model| &model.name == name)
            .map(|model| &model.gibbs)
    }

    /// Number of Gibbs energy evaluations served so far.
    pub fn gibbs_calls(&self) -> usize {
        self.gibbs_calls.load(Ordering::Relaxed)
    }

    /// Number of equilibrium queries served so far.
    pub fn equilibrium_calls(&self) -> usize {
        self.equilibrium_calls.load(Ordering::Relaxed)
    }

    fn check_declarations(&self) -> Result<(), PrecipError> {
        for declared in &self.equilibrium {
            if self.model(&declared.name).is_none() {
                return Err(unknown_phase(&declared.name));
            }
        }
        Ok(())
    }
}

fn unknown_phase(name: &PhaseName) -> PrecipError {
    PrecipError::Oracle(
        ErrorInfo::new("phase-unknown", "phase is not defined in the loaded database")
            .with_context("phase", name.to_string()),
    )
}

fn check_components(known: &[Species], components: &[Species]) -> Result<(), PrecipError> {
    for component in components {
        if component.as_str() == "VA" {
            continue;
        }
        if !known.contains(component) {
            return Err(PrecipError::Oracle(
                ErrorInfo::new("component-unknown", "component is not defined in the database")
                    .with_context("component", component.to_string()),
            ));
        }
    }
    Ok(())
}

impl ThermoOracle for PolynomialOracle {
    fn elements(&self) -> Vec<Species> {
        self.elements.clone()
    }

    fn phases(&self) -> Vec<PhaseName> {
        self.phases.iter().map(|model| model.name.clone()).collect()
    }

    fn equilibrium(
        &self,
        components: &[Species],
        phases: &[PhaseName],
        conditions: &Conditions,
    ) -> Result<EquilibriumResult, PrecipError> {
        self.equilibrium_calls.fetch_add(1, Ordering::Relaxed);
        check_components(&self.elements, components)?;
        if conditions.basis != CompositionBasis::MoleFraction {
            return Err(PrecipError::Oracle(
                ErrorInfo::new("basis-unsupported", "database compositions are mole fractions")
                    .with_context("basis", format!("{:?}", conditions.basis)),
            ));
        }
        if conditions.temperature.is_nan() || conditions.temperature <= 0.0 {
            return Err(PrecipError::Oracle(
                ErrorInfo::new("temperature", "temperature must be positive")
                    .with_context("temperature", conditions.temperature.to_string()),
            ));
        }
        for phase in phases {
            if self.model(phase).is_none() {
                return Err(unknown_phase(phase));
            }
        }
        let instances = self
            .equilibrium
            .iter()
            .filter(|declared| phases.contains(&declared.name))
            .map(|declared| PhaseInstance {
                name: declared.name.clone(),
                amount: declared.amount,
                composition: declared.composition.clone(),
            })
            .collect();
        Ok(EquilibriumResult { phases: instances })
    }

    fn gibbs_energy(
        &self,
        components: &[Species],
        phase: &PhaseName,
        _temperature: f64,
        _pressure: f64,
        composition: &Composition,
    ) -> Result<f64, PrecipError> {
        self.gibbs_calls.fetch_add(1, Ordering::Relaxed);
        check_components(&self.elements, components)?;
        let model = self.model(phase).ok_or_else(|| unknown_phase(phase))?;
        Ok(model.evaluate(composition))
    }
}
