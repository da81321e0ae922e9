//! Database checks and selection of the phases offered to the oracle.

use precip_core::errors::ErrorInfo;
use precip_core::{PhaseName, PrecipError, Species, ThermoSettings};

use crate::oracle::ThermoOracle;

/// Fails with an oracle error naming the first element missing from the database.
pub fn check_required_elements<O>(oracle: &O, required: &[Species]) -> Result<(), PrecipError>
where
    O: ThermoOracle + ?Sized,
{
    let available = oracle.elements();
    for element in required {
        if !available.contains(element) {
            return Err(PrecipError::Oracle(
                ErrorInfo::new("element-missing", "required element not found in database")
                    .with_context("element", element.to_string())
                    .with_context(
                        "available",
                        available
                            .iter()
                            .map(Species::to_string)
                            .collect::<Vec<_>>()
                            .join(","),
                    ),
            ));
        }
    }
    Ok(())
}

/// Chooses the phases passed to the equilibrium query.
///
/// Order: matrix, liquid, `always_include`, then compound phases in database
/// order. Only phases the database defines are kept.
pub fn select_relevant_phases(
    available: &[PhaseName],
    settings: &ThermoSettings,
) -> Result<Vec<PhaseName>, PrecipError> {
    if !available.contains(&settings.matrix_phase) {
        return Err(PrecipError::PhaseInstability(
            ErrorInfo::new("matrix-undefined", "matrix phase not found in database")
                .with_context("phase", settings.matrix_phase.to_string())
                .with_hint("the matrix phase is mandatory; no substitute is used"),
        ));
    }

    let mut selected: Vec<PhaseName> = Vec::new();
    let mut push = |phase: &PhaseName| {
        if available.contains(phase) && !selected.contains(phase) {
            selected.push(phase.clone());
        }
    };
    push(&settings.matrix_phase);
    push(&settings.liquid_phase);
    for phase in &settings.always_include {
        push(phase);
    }
    let keywords: Vec<String> = settings
        .compound_keywords
        .iter()
        .map(|keyword| keyword.to_ascii_uppercase())
        .collect();
    for phase in available {
        if keywords
            .iter()
            .any(|keyword| phase.as_str().contains(keyword.as_str()))
        {
            push(phase);
        }
    }
    Ok(selected)
}
