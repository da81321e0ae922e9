use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use precip_core::SimulationConfig;
use precip_thermo::PolynomialOracle;
use serde::Serialize;

pub mod check;
pub mod derive;
pub mod run;

/// Input files shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// YAML simulation configuration.
    #[arg(long)]
    pub config: PathBuf,
    /// YAML description of the polynomial thermodynamic database.
    #[arg(long)]
    pub oracle: PathBuf,
}

impl InputArgs {
    pub fn load(&self) -> Result<(SimulationConfig, PolynomialOracle), Box<dyn Error>> {
        let config = SimulationConfig::load(&self.config)?;
        let oracle = PolynomialOracle::load(&self.oracle)?;
        Ok((config, oracle))
    }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::PathBuf;

    use super::InputArgs;

    pub fn demo_inputs() -> InputArgs {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../configs");
        InputArgs {
            config: root.join("al_zn_mg_small.yaml"),
            oracle: root.join("al_zn_mg_oracle.yaml"),
        }
    }
}
