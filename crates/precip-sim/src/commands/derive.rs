use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use log::info;
use precip_thermo::derive;

use super::{write_json, InputArgs};

#[derive(Args, Debug)]
pub struct DeriveArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
    /// Directory receiving `parameters.json`; printed to stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &DeriveArgs) -> Result<(), Box<dyn Error>> {
    let (config, oracle) = args.inputs.load()?;
    let params = derive(&oracle, &config)?;
    match &args.out {
        Some(dir) => {
            let path = dir.join("parameters.json");
            write_json(&path, &params)?;
            info!("wrote {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&params)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::demo_inputs;
    use precip_thermo::ThermodynamicParameters;

    #[test]
    fn writes_parameter_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let args = DeriveArgs {
            inputs: demo_inputs(),
            out: Some(dir.path().to_path_buf()),
        };
        run(&args).unwrap();
        let text = std::fs::read_to_string(dir.path().join("parameters.json")).unwrap();
        let params: ThermodynamicParameters = serde_json::from_str(&text).unwrap();
        assert_eq!(params.matrix_phase.as_str(), "FCC_A1");
        assert_eq!(params.precipitate_phase.as_str(), "MGZN2");
        assert!(params.driving_force > 0.0);
    }
}
