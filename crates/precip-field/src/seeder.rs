//! Placement of circular precipitate nuclei before evolution starts.

use log::info;
use precip_core::errors::ErrorInfo;
use precip_core::{NucleationConfig, PrecipError};
use precip_thermo::ThermodynamicParameters;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::state::FieldState;

/// Centre of one painted nucleus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NucleationSite {
    /// Column of the disk centre.
    pub col: usize,
    /// Row of the disk centre.
    pub row: usize,
    /// Cells painted for this site (after clipping at the grid edge).
    pub cells: usize,
}

/// Paints `n_sites` disks into `state`.
///
/// Each centre draws its column, then its row, uniformly from
/// `[margin, n − margin)`. Cells with `Δcol² + Δrow² <= radius²` receive η
/// from `[eta_min, eta_max)` in row-major order and the precipitate
/// equilibrium composition. Disks are clipped at the edges, never wrapped,
/// and may overlap; later sites overwrite earlier ones.
pub fn seed<R: Rng + ?Sized>(
    state: &mut FieldState,
    params: &ThermodynamicParameters,
    n_sites: usize,
    geometry: &NucleationConfig,
    rng: &mut R,
) -> Result<Vec<NucleationSite>, PrecipError> {
    if n_sites == 0 {
        return Ok(Vec::new());
    }
    let (nx, ny) = (state.nx(), state.ny());
    let margin = geometry.margin;
    if 2 * margin >= nx || 2 * margin >= ny {
        return Err(PrecipError::Config(
            ErrorInfo::new("nucleation-margin", "margin leaves no interior cells")
                .with_context("margin", margin.to_string())
                .with_context("grid", format!("{nx}x{ny}")),
        ));
    }
    if geometry.eta_min.is_nan() || !(geometry.eta_min < geometry.eta_max) {
        return Err(PrecipError::Config(
            ErrorInfo::new("nucleation-eta", "seed η range is empty")
                .with_context("eta_min", geometry.eta_min.to_string())
                .with_context("eta_max", geometry.eta_max.to_string()),
        ));
    }

    let mut targets = Vec::with_capacity(state.compositions().len());
    for entry in state.compositions() {
        let fraction = params
            .precipitate_composition
            .get(&entry.species)
            .ok_or_else(|| {
                PrecipError::PhaseInstability(
                    ErrorInfo::new("composition-missing", "precipitate composition lacks species")
                        .with_context("phase", params.precipitate_phase.to_string())
                        .with_context("species", entry.species.to_string()),
                )
            })?;
        targets.push(fraction);
    }

    let radius = geometry.radius as i64;
    let radius_sq = radius * radius;
    let mut sites = Vec::with_capacity(n_sites);
    for _ in 0..n_sites {
        let col = rng.gen_range(margin..nx - margin);
        let row = rng.gen_range(margin..ny - margin);

        let row_lo = (row as i64 - radius).max(0) as usize;
        let row_hi = (row as i64 + radius).min(ny as i64 - 1) as usize;
        let col_lo = (col as i64 - radius).max(0) as usize;
        let col_hi = (col as i64 + radius).min(nx as i64 - 1) as usize;

        let mut cells = 0;
        for r in row_lo..=row_hi {
            for c in col_lo..=col_hi {
                let d_col = c as i64 - col as i64;
                let d_row = r as i64 - row as i64;
                if d_col * d_col + d_row * d_row > radius_sq {
                    continue;
                }
                let eta = rng.gen_range(geometry.eta_min..geometry.eta_max);
                state.eta_mut().set(c, r, eta);
                for (entry, &fraction) in state.compositions_mut().iter_mut().zip(&targets) {
                    entry.field.set(c, r, fraction);
                }
                cells += 1;
            }
        }
        sites.push(NucleationSite { col, row, cells });
    }
    info!(
        "seeded {} nuclei of radius {} with {}",
        sites.len(),
        geometry.radius,
        params.precipitate_phase
    );
    Ok(sites)
}
