//! YAML configuration schema and validation for simulation runs.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::composition::{Composition, PhaseName, Species};
use crate::constants::STANDARD_PRESSURE;
use crate::errors::{ErrorInfo, PrecipError};

/// YAML-configurable parameters for one precipitation run.
///
/// Created once at startup and only ever read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid dimensions and spacing.
    #[serde(default)]
    pub grid: GridConfig,
    /// Explicit Euler time step (s). Tightly coupled to `grid.dx`.
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Isothermal ageing temperature (K).
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Pressure passed to the oracle (Pa).
    #[serde(default = "default_pressure")]
    pub pressure: f64,
    /// Tracked solute species, in field order.
    #[serde(default = "default_species")]
    pub species: Vec<SpeciesConfig>,
    /// Numerical model constants.
    #[serde(default)]
    pub model: ModelConstants,
    /// Nucleation seeding parameters.
    #[serde(default)]
    pub nucleation: NucleationConfig,
    /// Initial field conditions prior to seeding.
    #[serde(default)]
    pub initial: InitialConditions,
    /// Step count and snapshot cadence.
    #[serde(default)]
    pub run: RunControl,
    /// Master seed and substream policy.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Phase identities and extraction tolerances.
    #[serde(default)]
    pub thermo: ThermoSettings,
}

fn default_dt() -> f64 {
    1e-3
}

fn default_temperature() -> f64 {
    393.15
}

fn default_pressure() -> f64 {
    STANDARD_PRESSURE
}

fn default_species() -> Vec<SpeciesConfig> {
    vec![
        SpeciesConfig::new("ZN", 0.06),
        SpeciesConfig::new("MG", 0.02).with_zero_fd_step(1e-4),
    ]
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            dt: default_dt(),
            temperature: default_temperature(),
            pressure: default_pressure(),
            species: default_species(),
            model: ModelConstants::default(),
            nucleation: NucleationConfig::default(),
            initial: InitialConditions::default(),
            run: RunControl::default(),
            seed_policy: SeedPolicy::default(),
            thermo: ThermoSettings::default(),
        }
    }
}

/// Periodic grid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of columns.
    #[serde(default = "default_extent")]
    pub nx: usize,
    /// Number of rows.
    #[serde(default = "default_extent")]
    pub ny: usize,
    /// Grid spacing (m).
    #[serde(default = "default_dx")]
    pub dx: f64,
}

fn default_extent() -> usize {
    128
}

fn default_dx() -> f64 {
    1e-9
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            nx: default_extent(),
            ny: default_extent(),
            dx: default_dx(),
        }
    }
}

/// Per-species composition and kinetic constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesConfig {
    /// Species symbol.
    pub name: Species,
    /// Nominal bulk mole fraction.
    pub bulk_fraction: f64,
    /// Arrhenius pre-exponential factor D0 (m²/s).
    #[serde(default = "default_d0")]
    pub diffusion_prefactor: f64,
    /// Arrhenius activation energy Q (J/mol).
    #[serde(default = "default_activation_energy")]
    pub activation_energy: f64,
    /// Absolute finite-difference step for the chemical potential slope.
    #[serde(default = "default_fd_step")]
    pub fd_step: f64,
    /// Step used instead of `fd_step` when the matrix holds none of the species.
    #[serde(default = "default_fd_step")]
    pub zero_fd_step: f64,
}

fn default_d0() -> f64 {
    1e-5
}

fn default_activation_energy() -> f64 {
    120e3
}

fn default_fd_step() -> f64 {
    1e-3
}

impl SpeciesConfig {
    /// Creates a species entry with default kinetics.
    pub fn new(name: impl Into<Species>, bulk_fraction: f64) -> Self {
        Self {
            name: name.into(),
            bulk_fraction,
            diffusion_prefactor: default_d0(),
            activation_energy: default_activation_energy(),
            fd_step: default_fd_step(),
            zero_fd_step: default_fd_step(),
        }
    }

    /// Overrides the step taken at a zero matrix composition.
    pub fn with_zero_fd_step(mut self, step: f64) -> Self {
        self.zero_fd_step = step;
        self
    }
}

/// Numeric constants of the coupled Allen-Cahn / Cahn-Hilliard model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelConstants {
    /// Gradient energy coefficient κ.
    #[serde(default = "default_kappa")]
    pub kappa: f64,
    /// Order parameter mobility M_η.
    #[serde(default = "default_m_eta")]
    pub m_eta: f64,
    /// Composition mobility M_c.
    #[serde(default = "default_m_c")]
    pub m_c: f64,
    /// Double-well height W.
    #[serde(default = "default_w")]
    pub w: f64,
    /// Normalisation dividing ΔG in the order-parameter equation.
    ///
    /// Empirically tuned for dx = 1 nm, dt = 1 ms; recalibrate when either changes.
    #[serde(default = "default_chemical_scale")]
    pub chemical_scale: f64,
}

fn default_kappa() -> f64 {
    1e-14
}

fn default_m_eta() -> f64 {
    1e-10
}

fn default_m_c() -> f64 {
    1e-15
}

fn default_w() -> f64 {
    1e7
}

fn default_chemical_scale() -> f64 {
    1e9
}

impl Default for ModelConstants {
    fn default() -> Self {
        Self {
            kappa: default_kappa(),
            m_eta: default_m_eta(),
            m_c: default_m_c(),
            w: default_w(),
            chemical_scale: default_chemical_scale(),
        }
    }
}

/// Nucleation seeding parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NucleationConfig {
    /// Number of seeds painted before evolution.
    #[serde(default = "default_sites")]
    pub sites: usize,
    /// Disk radius in grid cells.
    #[serde(default = "default_radius")]
    pub radius: usize,
    /// Border excluded from seed centres, in grid cells.
    #[serde(default = "default_margin")]
    pub margin: usize,
    /// Lower bound of seeded η values (inclusive).
    #[serde(default = "default_eta_min")]
    pub eta_min: f64,
    /// Upper bound of seeded η values (exclusive).
    #[serde(default = "default_eta_max")]
    pub eta_max: f64,
}

fn default_sites() -> usize {
    15
}

fn default_radius() -> usize {
    3
}

fn default_margin() -> usize {
    10
}

fn default_eta_min() -> f64 {
    0.8
}

fn default_eta_max() -> f64 {
    1.0
}

impl Default for NucleationConfig {
    fn default() -> Self {
        Self {
            sites: default_sites(),
            radius: default_radius(),
            margin: default_margin(),
            eta_min: default_eta_min(),
            eta_max: default_eta_max(),
        }
    }
}

/// Initial field conditions applied before seeding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialConditions {
    /// η is drawn uniformly from `[0, noise_amplitude)`.
    #[serde(default = "default_noise_amplitude")]
    pub noise_amplitude: f64,
}

fn default_noise_amplitude() -> f64 {
    0.01
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self {
            noise_amplitude: default_noise_amplitude(),
        }
    }
}

/// Step count and snapshot cadence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunControl {
    /// Total number of steps to integrate.
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// A snapshot is taken after step `i` whenever `i % snapshot_interval == 0`.
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval: usize,
}

fn default_steps() -> usize {
    1000
}

fn default_snapshot_interval() -> usize {
    50
}

impl Default for RunControl {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            snapshot_interval: default_snapshot_interval(),
        }
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed used for the run.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded in run summaries.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x7A11_0DE5_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

/// How the modelled precipitate is chosen among the stable candidate phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PrecipitateSelection {
    /// First candidate in the order the oracle reported.
    FirstReported,
    /// Candidate with the largest equilibrium amount; ties broken by name.
    #[default]
    LargestAmount,
    /// Lexically smallest candidate name.
    LexicalName,
}

/// Phase identities and extraction tolerances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermoSettings {
    /// Balance element of the alloy.
    #[serde(default = "default_host")]
    pub host_element: Species,
    /// Matrix phase name.
    #[serde(default = "default_matrix")]
    pub matrix_phase: PhaseName,
    /// Liquid phase name, excluded from precipitate candidates.
    #[serde(default = "default_liquid")]
    pub liquid_phase: PhaseName,
    /// Precipitate selection policy.
    #[serde(default)]
    pub precipitate_selection: PrecipitateSelection,
    /// Phases always offered to the oracle when the database defines them.
    #[serde(default = "default_always_include")]
    pub always_include: Vec<PhaseName>,
    /// Substrings marking intermetallic compound phases of interest.
    #[serde(default = "default_compound_keywords")]
    pub compound_keywords: Vec<String>,
    /// Minimum phase amount counted as stable.
    #[serde(default = "default_stability_threshold")]
    pub stability_threshold: f64,
    /// Upper clamp for perturbed compositions.
    #[serde(default = "default_composition_ceiling")]
    pub composition_ceiling: f64,
    /// Fraction of the local composition bounding the finite-difference step.
    #[serde(default = "default_relative_step")]
    pub relative_step: f64,
    /// Achieved step widths at or below this value are degenerate.
    #[serde(default = "default_degenerate_tolerance")]
    pub degenerate_step_tolerance: f64,
}

fn default_host() -> Species {
    Species::new("AL")
}

fn default_matrix() -> PhaseName {
    PhaseName::new("FCC_A1")
}

fn default_liquid() -> PhaseName {
    PhaseName::new("LIQUID")
}

fn default_always_include() -> Vec<PhaseName> {
    vec![PhaseName::new("HCP_A3")]
}

fn default_compound_keywords() -> Vec<String> {
    vec!["MGZN".into(), "MG2ZN".into(), "MG_ZN".into()]
}

fn default_stability_threshold() -> f64 {
    1e-10
}

fn default_composition_ceiling() -> f64 {
    0.99
}

fn default_relative_step() -> f64 {
    0.1
}

fn default_degenerate_tolerance() -> f64 {
    1e-10
}

impl Default for ThermoSettings {
    fn default() -> Self {
        Self {
            host_element: default_host(),
            matrix_phase: default_matrix(),
            liquid_phase: default_liquid(),
            precipitate_selection: PrecipitateSelection::default(),
            always_include: default_always_include(),
            compound_keywords: default_compound_keywords(),
            stability_threshold: default_stability_threshold(),
            composition_ceiling: default_composition_ceiling(),
            relative_step: default_relative_step(),
            degenerate_step_tolerance: default_degenerate_tolerance(),
        }
    }
}

impl SimulationConfig {
    /// Parses a configuration from YAML text and validates it.
    pub fn from_yaml_str(text: &str) -> Result<Self, PrecipError> {
        let config: SimulationConfig = serde_yaml::from_str(text)
            .map_err(|err| PrecipError::Serde(ErrorInfo::new("config-parse", err.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, PrecipError> {
        let text =
            fs::read_to_string(path).map_err(|err| PrecipError::serde_at("config-read", err, path))?;
        Self::from_yaml_str(&text).map_err(|err| match err {
            PrecipError::Serde(info) => {
                PrecipError::Serde(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }

    /// Nominal bulk composition of the tracked solutes.
    pub fn bulk_composition(&self) -> Composition {
        self.species
            .iter()
            .map(|species| (species.name.clone(), species.bulk_fraction))
            .collect()
    }

    /// Tracked solute symbols in field order.
    pub fn species_names(&self) -> Vec<Species> {
        self.species.iter().map(|species| species.name.clone()).collect()
    }

    /// Checks every value the engine and extractor rely on.
    pub fn validate(&self) -> Result<(), PrecipError> {
        let grid = &self.grid;
        if grid.nx < 3 || grid.ny < 3 {
            return Err(invalid("grid-extent", "grid must be at least 3x3")
                .with_context("nx", grid.nx.to_string())
                .with_context("ny", grid.ny.to_string())
                .into_config());
        }
        require_positive("dx", grid.dx)?;
        require_positive("dt", self.dt)?;
        require_positive("temperature", self.temperature)?;
        require_positive("pressure", self.pressure)?;

        if self.species.is_empty() {
            return Err(PrecipError::config(
                "species-empty",
                "at least one solute species is required",
            ));
        }
        let mut seen = BTreeSet::new();
        for species in &self.species {
            if !seen.insert(species.name.clone()) {
                return Err(invalid("species-duplicate", "species listed twice")
                    .with_context("species", species.name.to_string())
                    .into_config());
            }
            if species.name == self.thermo.host_element {
                return Err(invalid("species-host", "host element cannot be a tracked solute")
                    .with_context("species", species.name.to_string())
                    .into_config());
            }
            require_fraction(&species.name, species.bulk_fraction)?;
            require_non_negative("diffusion_prefactor", species.diffusion_prefactor)?;
            require_non_negative("activation_energy", species.activation_energy)?;
            require_positive("fd_step", species.fd_step)?;
            require_positive("zero_fd_step", species.zero_fd_step)?;
        }
        let total: f64 = self.species.iter().map(|s| s.bulk_fraction).sum();
        if total >= 1.0 {
            return Err(invalid("species-total", "solute fractions must leave a host balance")
                .with_context("total", total.to_string())
                .into_config());
        }

        let model = &self.model;
        require_non_negative("kappa", model.kappa)?;
        require_non_negative("m_eta", model.m_eta)?;
        require_non_negative("m_c", model.m_c)?;
        require_non_negative("w", model.w)?;
        require_positive("chemical_scale", model.chemical_scale)?;

        let nucleation = &self.nucleation;
        if !(0.0..=1.0).contains(&nucleation.eta_min)
            || !(0.0..=1.0).contains(&nucleation.eta_max)
            || nucleation.eta_min >= nucleation.eta_max
        {
            return Err(invalid("nucleation-eta", "seed η range must satisfy 0 <= min < max <= 1")
                .with_context("eta_min", nucleation.eta_min.to_string())
                .with_context("eta_max", nucleation.eta_max.to_string())
                .into_config());
        }
        if nucleation.sites > 0
            && (2 * nucleation.margin >= grid.nx || 2 * nucleation.margin >= grid.ny)
        {
            return Err(invalid("nucleation-margin", "margin leaves no interior cells")
                .with_context("margin", nucleation.margin.to_string())
                .with_hint("reduce nucleation.margin or enlarge the grid")
                .into_config());
        }

        if !(0.0..=1.0).contains(&self.initial.noise_amplitude) {
            return Err(invalid("noise-amplitude", "noise amplitude must lie in [0, 1]")
                .with_context("noise_amplitude", self.initial.noise_amplitude.to_string())
                .into_config());
        }
        if self.run.snapshot_interval == 0 {
            return Err(PrecipError::config(
                "snapshot-interval",
                "snapshot interval must be at least 1",
            ));
        }

        let thermo = &self.thermo;
        require_positive("composition_ceiling", thermo.composition_ceiling)?;
        require_positive("relative_step", thermo.relative_step)?;
        require_non_negative("stability_threshold", thermo.stability_threshold)?;
        require_non_negative("degenerate_step_tolerance", thermo.degenerate_step_tolerance)?;
        Ok(())
    }
}

fn invalid(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
}

trait IntoConfig {
    fn into_config(self) -> PrecipError;
}

impl IntoConfig for ErrorInfo {
    fn into_config(self) -> PrecipError {
        PrecipError::Config(self)
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), PrecipError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid("not-positive", "value must be finite and positive")
            .with_context("field", name)
            .with_context("value", value.to_string())
            .into_config())
    }
}

fn require_non_negative(name: &str, value: f64) -> Result<(), PrecipError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid("negative", "value must be finite and non-negative")
            .with_context("field", name)
            .with_context("value", value.to_string())
            .into_config())
    }
}

fn require_fraction(species: &Species, value: f64) -> Result<(), PrecipError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid("fraction-range", "bulk fraction must lie in [0, 1]")
            .with_context("species", species.to_string())
            .with_context("value", value.to_string())
            .into_config())
    }
}
