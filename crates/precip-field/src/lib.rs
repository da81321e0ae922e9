#![deny(missing_docs)]
#![doc = "Phase-field grid, nucleation seeding and explicit evolution of the precipitation model."]

pub mod diagnostics;
pub mod engine;
pub mod grid;
pub mod kinetics;
pub mod runner;
pub mod seeder;
pub mod snapshot;
pub mod state;

pub use diagnostics::{summarize, CompositionStats, Stats, PRECIPITATE_THRESHOLD};
pub use engine::FieldEngine;
pub use grid::Field;
pub use kinetics::{
    arrhenius_diffusivity, double_well, double_well_derivative, interpolation,
    interpolation_derivative, order_parameter_force, OrderParameterForce,
};
pub use runner::{run, simulate, RunSummary};
pub use seeder::{seed, NucleationSite};
pub use snapshot::{snapshot_path, Snapshot, StatsRecorder};
pub use state::{FieldState, SpeciesField};
