//! Pointwise free-energy terms of the coupled model.

use precip_core::constants::GAS_CONSTANT;
use precip_core::ModelConstants;
use serde::{Deserialize, Serialize};

/// Double-well barrier g(η) = W·η²·(1 − η)².
pub fn double_well(eta: f64, w: f64) -> f64 {
    let tail = 1.0 - eta;
    w * eta * eta * tail * tail
}

/// g'(η) = 2W·η·(1 − η)·(1 − 2η).
pub fn double_well_derivative(eta: f64, w: f64) -> f64 {
    2.0 * w * eta * (1.0 - eta) * (1.0 - 2.0 * eta)
}

/// Interpolation h(η) = 3η² − 2η³, with h(0) = 0 and h(1) = 1.
pub fn interpolation(eta: f64) -> f64 {
    eta * eta * (3.0 - 2.0 * eta)
}

/// h'(η) = 6η − 6η².
pub fn interpolation_derivative(eta: f64) -> f64 {
    6.0 * eta - 6.0 * eta * eta
}

/// Arrhenius diffusivity D = D0·exp(−Q / (R·T)).
pub fn arrhenius_diffusivity(prefactor: f64, activation_energy: f64, temperature: f64) -> f64 {
    prefactor * (-activation_energy / (GAS_CONSTANT * temperature)).exp()
}

/// Contributions to the Allen-Cahn force F_η at one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderParameterForce {
    /// g'(η).
    pub double_well: f64,
    /// −κ∇²η.
    pub gradient: f64,
    /// −h'(η)·ΔG / chemical_scale.
    pub chemical: f64,
}

impl OrderParameterForce {
    /// F_η.
    pub fn total(&self) -> f64 {
        self.double_well + self.gradient + self.chemical
    }
}

/// Splits F_η at a cell with value `eta` and Laplacian `laplacian`.
pub fn order_parameter_force(
    eta: f64,
    laplacian: f64,
    model: &ModelConstants,
    driving_force: f64,
) -> OrderParameterForce {
    OrderParameterForce {
        double_well: double_well_derivative(eta, model.w),
        gradient: -model.kappa * laplacian,
        chemical: -interpolation_derivative(eta) * driving_force / model.chemical_scale,
    }
}
