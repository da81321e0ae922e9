use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use log::info;
use precip_core::RunProvenance;
use precip_field::{run as run_fields, snapshot_path, NucleationSite, RunSummary, Stats};
use precip_thermo::{derive, ThermodynamicParameters};
use serde::Serialize;

use super::{write_json, InputArgs};

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
    /// Output directory for run artefacts.
    #[arg(long)]
    pub out: PathBuf,
    /// Overrides `seed_policy.master_seed`.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Also write every snapshot state under `snapshots/`.
    #[arg(long)]
    pub snapshots: bool,
}

/// `summary.json` contents; full states live in their own files.
#[derive(Debug, Serialize)]
struct SummaryReport<'a> {
    provenance: &'a RunProvenance,
    seed_label: Option<&'a str>,
    parameters: &'a ThermodynamicParameters,
    initial_stats: &'a Stats,
    final_stats: &'a Stats,
    sites: &'a [NucleationSite],
    snapshot_steps: Vec<u64>,
}

pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let (config, oracle) = args.inputs.load()?;
    fs::create_dir_all(&args.out)?;
    let seed = args.seed.unwrap_or(config.seed_policy.master_seed);

    let params = derive(&oracle, &config)?;
    write_json(&args.out.join("parameters.json"), &params)?;

    let summary = run_fields(&config, &params, seed)?;
    write_artefacts(args, &summary, config.seed_policy.label.as_deref())?;
    fs::copy(&args.inputs.config, args.out.join("config.yaml"))?;
    info!(
        "run complete: {} steps, precipitate fraction {:.4} -> {:.4}; artefacts in {}",
        summary.final_stats.step,
        summary.initial_stats.precipitate_fraction,
        summary.final_stats.precipitate_fraction,
        args.out.display()
    );
    Ok(())
}

fn write_artefacts(
    args: &RunArgs,
    summary: &RunSummary,
    seed_label: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let report = SummaryReport {
        provenance: &summary.provenance,
        seed_label,
        parameters: &summary.parameters,
        initial_stats: &summary.initial_stats,
        final_stats: &summary.final_stats,
        sites: &summary.sites,
        snapshot_steps: summary.snapshots.iter().map(|s| s.step).collect(),
    };
    write_json(&args.out.join("summary.json"), &report)?;
    summary.recorder().write_csv(args.out.join("stats.csv"))?;
    summary
        .final_state
        .store_json(&args.out.join("final_state.json"))?;
    if args.snapshots {
        let dir = args.out.join("snapshots");
        for snapshot in &summary.snapshots {
            snapshot.state.store_json(&snapshot_path(&dir, snapshot.step))?;
        }
    }
    Ok(())
}
