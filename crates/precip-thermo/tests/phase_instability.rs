mod common;

use common::*;
use precip_core::errors::ErrorInfo;
use precip_core::{Composition, PhaseName, PrecipError, Species};
use precip_thermo::{
    derive, CompositionBasis, Conditions, EquilibriumResult, GibbsPolynomial, PolynomialOracle, ThermoOracle,
};

fn code(err: &PrecipError) -> &str {
    err.info().code.as_str()
}

#[test]
fn matrix_absent_from_stable_set_fails() {
    let oracle = PolynomialOracle::new(["AL", "ZN", "MG"])
        .with_phase("FCC_A1", matrix_gibbs())
        .with_phase("MGZN2", GibbsPolynomial::default())
        .with_equilibrium_phase("FCC_A1", 0.0, matrix_at(0.04, 0.01))
        .with_equilibrium_phase("MGZN2", 1.0, matrix_at(0.5, 0.33));
    let err = derive(&oracle, &ternary_config()).unwrap_err();
    assert!(matches!(err, PrecipError::PhaseInstability(_)));
    assert_eq!(code(&err), "matrix-unstable");
}

#[test]
fn liquid_is_not_a_precipitate_candidate() {
    let oracle = PolynomialOracle::new(["AL", "ZN", "MG"])
        .with_phase("FCC_A1", matrix_gibbs())
        .with_phase("LIQUID", GibbsPolynomial::default())
        .with_equilibrium_phase("FCC_A1", 0.7, matrix_at(0.04, 0.01))
        .with_equilibrium_phase("LIQUID", 0.3, matrix_at(0.2, 0.1));
    let err = derive(&oracle, &ternary_config()).unwrap_err();
    assert!(matches!(err, PrecipError::PhaseInstability(_)));
    assert_eq!(code(&err), "no-precipitate");
}

#[test]
fn matrix_missing_from_database_fails() {
    let oracle = PolynomialOracle::new(["AL", "ZN", "MG"])
        .with_phase("BCC_A2", GibbsPolynomial::default())
        .with_equilibrium_phase("BCC_A2", 1.0, matrix_at(0.04, 0.01));
    let err = derive(&oracle, &ternary_config()).unwrap_err();
    assert_eq!(code(&err), "matrix-undefined");
}

#[test]
fn missing_element_is_an_oracle_error() {
    let oracle = PolynomialOracle::new(["AL", "ZN"]).with_phase("FCC_A1", matrix_gibbs());
    let err = derive(&oracle, &ternary_config()).unwrap_err();
    assert!(matches!(err, PrecipError::Oracle(_)));
    assert_eq!(code(&err), "element-missing");
    assert_eq!(err.info().context["element"], "MG");
}

#[test]
fn weight_fraction_queries_are_rejected() {
    let oracle = al_zn_mg_oracle(matrix_at(0.04, 0.01), -25_000.0);
    let components = [Species::new("AL"), Species::new("ZN"), Species::new("MG")];
    let mut conditions = Conditions {
        temperature: 393.15,
        pressure: 101_325.0,
        composition: matrix_at(0.06, 0.02),
        basis: CompositionBasis::WeightFraction,
    };
    let phases = [PhaseName::new("FCC_A1")];
    let err = oracle.equilibrium(&components, &phases, &conditions).unwrap_err();
    assert!(matches!(err, PrecipError::Oracle(_)));
    assert_eq!(code(&err), "basis-unsupported");

    conditions.basis = CompositionBasis::MoleFraction;
    let result = oracle.equilibrium(&components, &phases, &conditions).unwrap();
    assert_eq!(result.phases.len(), 1);
}

#[test]
fn collapsed_step_is_degenerate() {
    // Above the 0.99 ceiling the perturbed interval inverts.
    let oracle = al_zn_mg_oracle(matrix_at(0.995, 0.001), -25_000.0);
    let err = derive(&oracle, &ternary_config()).unwrap_err();
    assert!(matches!(err, PrecipError::DegenerateStep(_)));
    assert_eq!(err.info().context["species"], "ZN");
}

#[test]
fn missing_species_in_phase_composition_fails() {
    let oracle = al_zn_mg_oracle(Composition::new().with("ZN", 0.04), -25_000.0);
    let err = derive(&oracle, &ternary_config()).unwrap_err();
    assert_eq!(code(&err), "composition-missing");
}

struct FailingGibbs {
    inner: PolynomialOracle,
}

impl ThermoOracle for FailingGibbs {
    fn elements(&self) -> Vec<Species> {
        self.inner.elements()
    }

    fn phases(&self) -> Vec<PhaseName> {
        self.inner.phases()
    }

    fn equilibrium(
        &self,
        components: &[Species],
        phases: &[PhaseName],
        conditions: &Conditions,
    ) -> Result<EquilibriumResult, PrecipError> {
        self.inner.equilibrium(components, phases, conditions)
    }

    fn gibbs_energy(
        &self,
        _components: &[Species],
        phase: &PhaseName,
        _temperature: f64,
        _pressure: f64,
        _composition: &Composition,
    ) -> Result<f64, PrecipError> {
        Err(PrecipError::Oracle(
            ErrorInfo::new("no-convergence", "minimizer did not converge")
                .with_context("phase", phase.to_string()),
        ))
    }
}

#[test]
fn oracle_errors_propagate_unchanged() {
    let oracle = FailingGibbs {
        inner: al_zn_mg_oracle(matrix_at(0.04, 0.01), -25_000.0),
    };
    let err = derive(&oracle as &dyn ThermoOracle, &ternary_config()).unwrap_err();
    assert_eq!(
        err,
        PrecipError::Oracle(
            ErrorInfo::new("no-convergence", "minimizer did not converge")
                .with_context("phase", "FCC_A1"),
        )
    );
}

#[test]
fn invalid_config_is_rejected_before_querying() {
    let oracle = al_zn_mg_oracle(matrix_at(0.04, 0.01), -25_000.0);
    let mut config = ternary_config();
    config.temperature = -1.0;
    let err = derive(&oracle, &config).unwrap_err();
    assert!(matches!(err, PrecipError::Config(_)));
    assert_eq!(oracle.equilibrium_calls(), 0);
}
