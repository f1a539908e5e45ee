//! Property tests: roulette draws respect weights.

use mend_ga::Roulette;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

proptest! {
    /// A single item is always drawn.
    #[test]
    fn single_item_always_drawn(seed in any::<u64>(), weight in -1.0f64..10.0) {
        let roulette = Roulette::new(vec!["only"], move |_| weight);
        let mut rng = StdRng::seed_from_u64(seed);
        prop_assert_eq!(roulette.exec(&mut rng), Some(&"only"));
    }

    /// Only the item with positive weight is ever drawn.
    #[test]
    fn zero_weights_are_never_drawn(seed in any::<u64>(), weight in 0.001f64..100.0, others in 1usize..10) {
        let items: Vec<usize> = (0..=others).collect();
        let roulette = Roulette::new(items, move |i| if *i == 0 { weight } else { 0.0 });
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..20 {
            prop_assert_eq!(roulette.exec(&mut rng), Some(&0));
        }
    }

    /// With no usable weight the draw is still one of the items.
    #[test]
    fn all_zero_weights_draw_uniformly(seed in any::<u64>(), len in 1usize..10) {
        let roulette = Roulette::new((0..len).collect::<Vec<_>>(), |_| 0.0);
        let mut rng = StdRng::seed_from_u64(seed);
        let drawn = *roulette.exec(&mut rng).unwrap();
        prop_assert!(drawn < len);
    }

    /// Equal seeds give equal draw sequences.
    #[test]
    fn draws_are_reproducible(seed in any::<u64>(), weights in prop::collection::vec(0.0f64..5.0, 1..8)) {
        let roulette = Roulette::new((0..weights.len()).collect::<Vec<_>>(), move |i| weights[*i]);
        let mut a = StdRng::seed_from_u64(seed);
        let mut b = StdRng::seed_from_u64(seed);
        for _ in 0..10 {
            prop_assert_eq!(roulette.exec(&mut a), roulette.exec(&mut b));
        }
    }
}
