use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    check::{self, CheckArgs},
    derive::{self, DeriveArgs},
    run::{self, RunArgs},
};

mod commands;
mod logger;

#[derive(Parser, Debug)]
#[command(name = "precip-sim", about = "Phase-field precipitation simulator CLI")]
struct Cli {
    /// Emit debug records (per-species finite-difference details).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive the thermodynamic parameter bundle without evolving fields.
    Derive(DeriveArgs),
    /// Derive parameters, seed nuclei and evolve the fields.
    Run(RunArgs),
    /// Validate inputs and compare dt against the advisory stability limit.
    Check(CheckArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logger::init(cli.verbose)?;
    match cli.command {
        Command::Derive(args) => derive::run(&args),
        Command::Run(args) => run::run(&args),
        Command::Check(args) => check::run(&args),
    }
}
