//! Scalar summaries of a field state.

use precip_core::Species;
use serde::{Deserialize, Serialize};

use crate::state::FieldState;

/// η above which a cell counts as precipitate.
pub const PRECIPITATE_THRESHOLD: f64 = 0.5;

/// Mean and range of one composition field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionStats {
    /// Solute.
    pub species: Species,
    /// Mean mole fraction.
    pub mean: f64,
    /// Minimum mole fraction.
    pub min: f64,
    /// Maximum mole fraction.
    pub max: f64,
}

/// Snapshot statistics of a [`FieldState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Simulated time (s).
    pub time: f64,
    /// Completed steps.
    pub step: u64,
    /// Share of cells with η > 0.5.
    pub precipitate_fraction: f64,
    /// Mean η.
    pub mean_eta: f64,
    /// Maximum η.
    pub max_eta: f64,
    /// Minimum η.
    pub min_eta: f64,
    /// Per-species composition statistics in state order.
    pub compositions: Vec<CompositionStats>,
}

/// Computes [`Stats`] for `state`.
pub fn summarize(state: &FieldState) -> Stats {
    let eta = state.eta();
    Stats {
        time: state.time(),
        step: state.step(),
        precipitate_fraction: eta.fraction_above(PRECIPITATE_THRESHOLD),
        mean_eta: eta.mean(),
        max_eta: eta.max(),
        min_eta: eta.min(),
        compositions: state
            .compositions()
            .iter()
            .map(|entry| CompositionStats {
                species: entry.species.clone(),
                mean: entry.field.mean(),
                min: entry.field.min(),
                max: entry.field.max(),
            })
            .collect(),
    }
}
