use std::error::Error;

use clap::Args;
use log::warn;
use precip_core::rng::NOISE_SUBSTREAM;
use precip_core::RngHandle;
use precip_field::{FieldEngine, FieldState};
use precip_thermo::derive;
use serde::Serialize;

use super::InputArgs;

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
    /// Fail when dt exceeds the advisory stability limit.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CheckReport {
    pub matrix_phase: String,
    pub precipitate_phase: String,
    pub driving_force: f64,
    pub dt: f64,
    pub advisory_dt: f64,
    pub within_advisory: bool,
}

pub(crate) fn build_report(inputs: &InputArgs) -> Result<CheckReport, Box<dyn Error>> {
    let (config, oracle) = inputs.load()?;
    let params = derive(&oracle, &config)?;
    let state = FieldState::initial(
        &config,
        &mut RngHandle::substream(config.seed_policy.master_seed, NOISE_SUBSTREAM),
    )?;
    let engine = FieldEngine::new(&config, &params, state)?;
    let advisory_dt = engine.advisory_time_step();
    Ok(CheckReport {
        matrix_phase: params.matrix_phase.to_string(),
        precipitate_phase: params.precipitate_phase.to_string(),
        driving_force: params.driving_force,
        dt: config.dt,
        advisory_dt,
        within_advisory: config.dt <= advisory_dt,
    })
}

pub fn run(args: &CheckArgs) -> Result<(), Box<dyn Error>> {
    let report = build_report(&args.inputs)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.within_advisory {
        warn!(
            "dt = {:.3e} s exceeds the advisory limit {:.3e} s",
            report.dt, report.advisory_dt
        );
        if args.strict {
            return Err("time step exceeds the advisory stability limit".into());
        }
    }
    Ok(())
}
