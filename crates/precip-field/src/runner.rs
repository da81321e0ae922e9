//! Full simulation: initial state, seeding, evolution and snapshots.

use log::info;
use precip_core::rng::{NOISE_SUBSTREAM, NUCLEATION_SUBSTREAM};
use precip_core::{PrecipError, RngHandle, RunProvenance, SimulationConfig};
use precip_thermo::{derive, ThermoOracle, ThermodynamicParameters};
use serde::{Deserialize, Serialize};

use crate::diagnostics::{summarize, Stats};
use crate::engine::FieldEngine;
use crate::seeder::{seed, NucleationSite};
use crate::snapshot::{Snapshot, StatsRecorder};
use crate::state::FieldState;

/// Everything a completed run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Parameter bundle the run was driven by.
    pub parameters: ThermodynamicParameters,
    /// Statistics right after seeding.
    pub initial_stats: Stats,
    /// Statistics after the last step.
    pub final_stats: Stats,
    /// Snapshots in step order.
    pub snapshots: Vec<Snapshot>,
    /// Painted nuclei in placement order.
    pub sites: Vec<NucleationSite>,
    /// Seed, config hash and tool versions.
    pub provenance: RunProvenance,
    /// State after the last step.
    pub final_state: FieldState,
}

impl RunSummary {
    /// Snapshot statistics ready for CSV export.
    pub fn recorder(&self) -> StatsRecorder {
        let mut recorder = StatsRecorder::new();
        for snapshot in &self.snapshots {
            recorder.push(snapshot.stats.clone());
        }
        recorder
    }
}

/// Runs `config.run.steps` steps from a freshly seeded state.
///
/// After step `i` (0-based) a snapshot is recorded whenever
/// `i % snapshot_interval == 0`.
pub fn run(
    config: &SimulationConfig,
    params: &ThermodynamicParameters,
    seed_value: u64,
) -> Result<RunSummary, PrecipError> {
    config.validate()?;
    let provenance = RunProvenance::capture(config, seed_value)?;

    let mut noise = RngHandle::substream(seed_value, NOISE_SUBSTREAM);
    let mut state = FieldState::initial(config, &mut noise)?;
    let mut nucleation = RngHandle::substream(seed_value, NUCLEATION_SUBSTREAM);
    let sites = seed(
        &mut state,
        params,
        config.nucleation.sites,
        &config.nucleation,
        &mut nucleation,
    )?;
    let initial_stats = summarize(&state);
    log_stats("initial", &initial_stats);

    let mut engine = FieldEngine::new(config, params, state)?;
    engine.warn_if_unstable();

    let interval = config.run.snapshot_interval;
    let mut snapshots = Vec::new();
    for i in 0..config.run.steps {
        engine.step();
        if i % interval == 0 {
            let state = engine.state().clone();
            let stats = summarize(&state);
            log_stats("step", &stats);
            snapshots.push(Snapshot {
                step: state.step(),
                time: state.time(),
                stats,
                state,
            });
        }
    }

    let final_state = engine.into_state();
    let final_stats = summarize(&final_state);
    log_stats("final", &final_stats);
    Ok(RunSummary {
        parameters: params.clone(),
        initial_stats,
        final_stats,
        snapshots,
        sites,
        provenance,
        final_state,
    })
}

/// Derives parameters from `oracle` and runs with the configured master seed.
pub fn simulate<O>(
    oracle: &O,
    config: &SimulationConfig,
) -> Result<(ThermodynamicParameters, RunSummary), PrecipError>
where
    O: ThermoOracle + ?Sized,
{
    let params = derive(oracle, config)?;
    let summary = run(config, &params, config.seed_policy.master_seed)?;
    Ok((params, summary))
}

fn log_stats(label: &str, stats: &Stats) {
    info!(
        "{label} step={} t={:.3e}s precipitate={:.4} η∈[{:.4}, {:.4}] mean η={:.4}",
        stats.step,
        stats.time,
        stats.precipitate_fraction,
        stats.min_eta,
        stats.max_eta,
        stats.mean_eta
    );
}
