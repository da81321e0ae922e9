#![allow(dead_code)]

use precip_core::{Composition, SimulationConfig, SpeciesConfig};
use precip_thermo::{GibbsPolynomial, PolynomialOracle};

pub const B_ZN: f64 = -1200.0;
pub const C_ZN: f64 = 2500.0;
pub const B_MG: f64 = -800.0;
pub const C_MG: f64 = 4000.0;

pub fn matrix_gibbs() -> GibbsPolynomial {
    let mut gibbs = GibbsPolynomial::single("ZN", -20_000.0, B_ZN, C_ZN);
    gibbs.linear.insert("MG".into(), B_MG);
    gibbs.quadratic.insert("MG".into(), C_MG);
    gibbs
}

pub fn matrix_at(zn: f64, mg: f64) -> Composition {
    Composition::new().with("ZN", zn).with("MG", mg)
}

/// Database with the usual Al-Zn-Mg phase list and an FCC + MgZn2 assemblage.
pub fn al_zn_mg_oracle(matrix: Composition, precipitate_g: f64) -> PolynomialOracle {
    PolynomialOracle::new(["AL", "ZN", "MG"])
        .with_phase("FCC_A1", matrix_gibbs())
        .with_phase("LIQUID", GibbsPolynomial::single("ZN", -15_000.0, 0.0, 0.0))
        .with_phase("HCP_A3", GibbsPolynomial::single("ZN", -18_000.0, 0.0, 0.0))
        .with_phase("MGZN2", GibbsPolynomial::single("ZN", precipitate_g, 0.0, 0.0))
        .with_phase("SIGMA", GibbsPolynomial::single("ZN", -1.0, 0.0, 0.0))
        .with_equilibrium_phase("FCC_A1", 0.9, matrix)
        .with_equilibrium_phase("MGZN2", 0.1, matrix_at(0.5, 0.33))
}

pub fn ternary_config() -> SimulationConfig {
    SimulationConfig {
        species: vec![SpeciesConfig::new("ZN", 0.06), SpeciesConfig::new("MG", 0.02)],
        ..SimulationConfig::default()
    }
}
