mod common;

use common::*;
use precip_core::{RngHandle, Species};
use precip_field::{Field, FieldEngine, FieldState, SpeciesField};
use proptest::prelude::*;
use rand::Rng;

#[test]
fn strongly_unfavourable_driving_force_clamps_eta_at_zero() {
    let mut config = zn_config(8);
    config.model.m_eta = 1.0;
    config.dt = 1.0;
    let params = parameters(&[("ZN", 0.0, 0.04, 0.5)], -1e12);
    let mut engine = FieldEngine::new(&config, &params, uniform_state(8, 0.5, 0.04)).unwrap();

    engine.step();

    assert!(engine.state().eta().values().iter().all(|&v| v == 0.0));
}

#[test]
fn strongly_favourable_driving_force_clamps_eta_at_one() {
    let mut config = zn_config(8);
    config.model.m_eta = 1.0;
    config.dt = 1.0;
    let params = parameters(&[("ZN", 0.0, 0.04, 0.5)], 1e12);
    let mut engine = FieldEngine::new(&config, &params, uniform_state(8, 0.5, 0.04)).unwrap();

    engine.step();

    assert!(engine.state().eta().values().iter().all(|&v| v == 1.0));
}

#[test]
fn composition_spike_stays_within_unit_interval() {
    let mut config = zn_config(9);
    config.grid.dx = 1.0;
    config.dt = 1.0;
    config.model.m_c = 1.0;
    let params = parameters(&[("ZN", 1e6, 0.04, 0.5)], 5_000.0);
    let mut zn = Field::filled(9, 9, 0.0);
    zn.set(4, 4, 1.0);
    let state = FieldState::from_parts(
        Field::filled(9, 9, 0.0),
        vec![SpeciesField {
            species: Species::new("ZN"),
            field: zn,
        }],
    )
    .unwrap();
    let mut engine = FieldEngine::new(&config, &params, state).unwrap();

    for _ in 0..5 {
        engine.step();
        let zn = &engine.state().compositions()[0].field;
        assert!(in_unit_interval(zn));
        assert!(zn.values().contains(&0.0) || zn.values().contains(&1.0));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_step_keeps_fields_in_bounds(
        seed in any::<u64>(),
        driving_force in -1e13f64..1e13,
        slope in -1e5f64..1e5,
        m_eta in 0.0f64..10.0,
        m_c in 0.0f64..10.0,
    ) {
        let mut config = zn_config(8);
        config.grid.dx = 1.0;
        config.dt = 1.0;
        config.model.m_eta = m_eta;
        config.model.m_c = m_c;
        let params = parameters(&[("ZN", slope, 0.04, 0.5)], driving_force);
        let mut rng = RngHandle::from_seed(seed);
        let eta = Field::from_fn(8, 8, |_, _| rng.gen::<f64>());
        let zn = Field::from_fn(8, 8, |_, _| rng.gen::<f64>());
        let state = FieldState::from_parts(
            eta,
            vec![SpeciesField { species: Species::new("ZN"), field: zn }],
        )
        .unwrap();
        let mut engine = FieldEngine::new(&config, &params, state).unwrap();

        for _ in 0..3 {
            engine.step();
            prop_assert!(in_unit_interval(engine.state().eta()));
            prop_assert!(in_unit_interval(&engine.state().compositions()[0].field));
        }
    }
}
