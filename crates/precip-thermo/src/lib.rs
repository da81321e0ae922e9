#![deny(missing_docs)]
#![doc = "Thermodynamic oracle interface, phase selection and one-time driving-force extraction."]

pub mod extractor;
pub mod oracle;
pub mod phases;
pub mod polynomial;

pub use extractor::{derive, ChemicalPotentialSlope, DrivingForceExtractor, ThermodynamicParameters};
pub use oracle::{Conditions, CompositionBasis, EquilibriumResult, PhaseInstance, ThermoOracle};
pub use phases::{check_required_elements, select_relevant_phases};
pub use polynomial::{DeclaredPhase, GibbsPolynomial, PhaseModel, PolynomialOracle};
