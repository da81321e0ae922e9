mod common;

use common::*;
use precip_core::{NucleationConfig, PrecipError, RngHandle, Species};
use precip_field::{seed, FieldState};

fn seeded(master: u64) -> (FieldState, Vec<precip_field::NucleationSite>) {
    let config = zn_config(32);
    let params = parameters(&[("ZN", -1000.0, 0.04, 0.5)], 5_000.0);
    let mut noise = RngHandle::substream(master, 0);
    let mut state = FieldState::initial(&config, &mut noise).unwrap();
    let mut rng = RngHandle::substream(master, 1);
    let geometry = NucleationConfig {
        sites: 5,
        ..NucleationConfig::default()
    };
    let sites = seed(&mut state, &params, 5, &geometry, &mut rng).unwrap();
    (state, sites)
}

#[test]
fn same_seed_gives_bit_identical_fields() {
    let (a, sites_a) = seeded(2024);
    let (b, sites_b) = seeded(2024);
    assert_eq!(sites_a, sites_b);
    let bits = |state: &FieldState| -> Vec<u64> {
        state.eta().values().iter().map(|v| v.to_bits()).collect()
    };
    assert_eq!(bits(&a), bits(&b));
    assert_eq!(a, b);
}

#[test]
fn different_seeds_place_different_nuclei() {
    let (_, sites_a) = seeded(1);
    let (_, sites_b) = seeded(2);
    assert_ne!(sites_a, sites_b);
}

#[test]
fn nuclei_respect_margin_and_paint_full_disks() {
    let (state, sites) = seeded(7);
    assert_eq!(sites.len(), 5);
    let zn = state.composition(&Species::new("ZN")).unwrap();
    for site in &sites {
        assert!((10..22).contains(&site.col));
        assert!((10..22).contains(&site.row));
        // Lattice points with Δx² + Δy² <= 9.
        assert_eq!(site.cells, 29);
        let eta = state.eta().get(site.col, site.row);
        assert!((0.8..1.0).contains(&eta));
        assert_eq!(zn.get(site.col, site.row), 0.5);
    }
    // Outside every disk the initial noise and bulk composition remain.
    assert!(state.eta().get(0, 0) < 0.01);
    assert_eq!(zn.get(0, 0), 0.06);
}

#[test]
fn margin_leaving_no_interior_is_rejected() {
    let params = parameters(&[("ZN", -1000.0, 0.04, 0.5)], 5_000.0);
    let mut state = uniform_state(16, 0.0, 0.06);
    let geometry = NucleationConfig {
        margin: 8,
        ..NucleationConfig::default()
    };
    let err = seed(&mut state, &params, 3, &geometry, &mut RngHandle::from_seed(1)).unwrap_err();
    assert!(matches!(err, PrecipError::Config(_)));
    assert_eq!(err.info().code, "nucleation-margin");
}

#[test]
fn missing_precipitate_species_leaves_state_untouched() {
    let params = parameters(&[("MG", -1000.0, 0.01, 0.3)], 5_000.0);
    let mut state = uniform_state(32, 0.0, 0.06);
    let before = state.clone();
    let err = seed(
        &mut state,
        &params,
        2,
        &NucleationConfig::default(),
        &mut RngHandle::from_seed(3),
    )
    .unwrap_err();
    assert!(matches!(err, PrecipError::PhaseInstability(_)));
    assert_eq!(state, before);
}

#[test]
fn zero_sites_is_a_no_op() {
    let params = parameters(&[("ZN", -1000.0, 0.04, 0.5)], 5_000.0);
    let mut state = uniform_state(8, 0.0, 0.06);
    let sites = seed(
        &mut state,
        &params,
        0,
        &NucleationConfig::default(),
        &mut RngHandle::from_seed(3),
    )
    .unwrap();
    assert!(sites.is_empty());
    assert_eq!(state, uniform_state(8, 0.0, 0.06));
}
