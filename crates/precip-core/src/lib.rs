#![deny(missing_docs)]
#![doc = "Shared errors, configuration, composition types and deterministic RNG for the precipitation simulator."]

mod composition;
pub mod config;
pub mod errors;
pub mod provenance;
pub mod rng;

pub use composition::{Composition, PhaseName, Species};
pub use config::{
    GridConfig, InitialConditions, ModelConstants, NucleationConfig, PrecipitateSelection,
    RunControl, SeedPolicy, SimulationConfig, SpeciesConfig, ThermoSettings,
};
pub use errors::{ErrorInfo, PrecipError};
pub use provenance::{stable_hash_string, RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};

/// Physical constants used by the extractor and the engine.
pub mod constants {
    /// Molar gas constant R (J/(mol·K)).
    pub const GAS_CONSTANT: f64 = 8.314;
    /// Standard pressure (Pa).
    pub const STANDARD_PRESSURE: f64 = 101_325.0;
}
