use precip_core::RngHandle;
use precip_field::Field;
use proptest::prelude::*;
use rand::Rng;

proptest! {
    #[test]
    fn laplacian_of_constant_is_zero(
        nx in 1usize..12,
        ny in 1usize..12,
        value in -1e3f64..1e3,
        dx in 1e-9f64..10.0,
    ) {
        let lap = Field::filled(nx, ny, value).laplacian(dx);
        prop_assert!(lap.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn periodic_laplacian_sums_to_zero(seed in any::<u64>(), nx in 3usize..16, ny in 3usize..16) {
        let mut rng = RngHandle::from_seed(seed);
        let field = Field::from_fn(nx, ny, |_, _| rng.gen_range(-1.0..1.0));
        let lap = field.laplacian(1.0);
        let total: f64 = lap.values().iter().sum();
        prop_assert!(total.abs() < 1e-10);
    }

    #[test]
    fn laplacian_commutes_with_periodic_shift(seed in any::<u64>(), shift in 0usize..7) {
        let (nx, ny) = (7, 5);
        let mut rng = RngHandle::from_seed(seed);
        let field = Field::from_fn(nx, ny, |_, _| rng.gen::<f64>());
        let shifted = Field::from_fn(nx, ny, |col, row| field.get((col + shift) % nx, row));
        let lap = field.laplacian(1.0);
        let lap_shifted = shifted.laplacian(1.0);
        for row in 0..ny {
            for col in 0..nx {
                prop_assert_eq!(lap_shifted.get(col, row), lap.get((col + shift) % nx, row));
            }
        }
    }
}
