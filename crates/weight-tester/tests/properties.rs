use std::collections::BTreeMap;

use approx::assert_relative_eq;
use proptest::prelude::*;
use weight_types::{
    from_binary, to_binary, Adder, DivideType, DivisibleSemiring, LeftStringWeight, LogWeight,
    ProductWeight, RealWeight, Semiring, SignedLogWeight, SparsePowerWeight, TextFormat,
    TropicalWeight, UnionIntersectSetWeight, DELTA,
};

fn labels() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(1..6i32, 0..6)
}

fn set() -> impl Strategy<Value = UnionIntersectSetWeight> {
    prop::collection::vec(1..8i32, 0..5).prop_map(UnionIntersectSetWeight::from_elements)
}

proptest! {
    #[test]
    fn tropical_plus_is_min_and_times_is_add(a in -1000i32..1000, b in -1000i32..1000) {
        let (wa, wb) = (TropicalWeight::new(a as f32), TropicalWeight::new(b as f32));
        prop_assert_eq!(wa.plus(&wb).value(), a.min(b) as f32);
        prop_assert_eq!(wa.times(&wb).value(), (a + b) as f32);
    }

    #[test]
    fn tropical_distributes_exactly(a in -100i32..100, b in -100i32..100, c in -100i32..100) {
        let [wa, wb, wc] = [a, b, c].map(|v| TropicalWeight::new(v as f32));
        prop_assert_eq!(wa.times(&wb.plus(&wc)), wa.times(&wb).plus(&wa.times(&wc)));
    }

    #[test]
    fn float_text_and_binary_round_trip(v in -1.0e6f32..1.0e6f32) {
        let w = LogWeight::new(v);
        let text = TextFormat::new().print(&w);
        prop_assert_eq!(TextFormat::new().parse::<LogWeight>(&text).unwrap(), w);
        prop_assert_eq!(from_binary::<LogWeight>(&to_binary(&w)).unwrap(), w);
    }

    #[test]
    fn log_plus_is_below_both_operands(a in -20.0f64..20.0, b in -20.0f64..20.0) {
        let (wa, wb) = (LogWeight::new(a), LogWeight::new(b));
        let sum = wa.plus(&wb);
        prop_assert!(sum.value() <= a.min(b));
        prop_assert!(sum.approx_eq(&wb.plus(&wa), DELTA));
        let expected = -((-a).exp() + (-b).exp()).ln();
        assert_relative_eq!(sum.value(), expected, epsilon = 1e-9);
    }

    #[test]
    fn signed_log_cancels_its_negation(positive in any::<bool>(), v in -10.0f32..10.0) {
        let w = SignedLogWeight::new(positive, v);
        prop_assert!(w.plus(&w.negate()).is_zero());
        prop_assert_eq!(w.negate().negate(), w);
    }

    #[test]
    fn real_adder_tracks_exact_sum(values in prop::collection::vec(0.0f64..1.0, 1..200)) {
        let mut adder = Adder::<RealWeight<f64>>::new();
        for &v in &values {
            adder.add(&RealWeight::new(v));
        }
        let exact: f64 = values.iter().sum();
        assert_relative_eq!(adder.sum().value(), exact, max_relative = 1e-12);
    }

    #[test]
    fn left_string_plus_is_common_prefix(a in labels(), b in labels()) {
        let (wa, wb) = (
            LeftStringWeight::from_labels(a.clone()),
            LeftStringWeight::from_labels(b.clone()),
        );
        let prefix = wa.plus(&wb);
        let prefix = prefix.labels().unwrap();
        prop_assert!(a.starts_with(prefix) && b.starts_with(prefix));
        if prefix.len() < a.len().min(b.len()) {
            prop_assert_ne!(a[prefix.len()], b[prefix.len()]);
        }
    }

    #[test]
    fn left_string_division_undoes_times(a in labels(), b in labels()) {
        let (wa, wb) = (LeftStringWeight::from_labels(a), LeftStringWeight::from_labels(b));
        let product = wa.times(&wb);
        prop_assert_eq!(product.divide(&wa, DivideType::Left), wb);
    }

    #[test]
    fn union_intersect_sets_distribute(a in set(), b in set(), c in set()) {
        prop_assert_eq!(a.times(&b.plus(&c)), a.times(&b).plus(&a.times(&c)));
        prop_assert_eq!(a.plus(&a), a.clone());
    }

    #[test]
    fn product_text_round_trip(a in 0i32..50, b in 0i32..50, parentheses in any::<bool>()) {
        let w = ProductWeight::new(TropicalWeight::new(a as f32), LogWeight::new(b as f32));
        let format = TextFormat { parentheses };
        let back: ProductWeight<TropicalWeight, LogWeight> =
            format.parse(&format.print(&w)).unwrap();
        prop_assert_eq!(back, w);
    }

    #[test]
    fn sparse_power_matches_map(ops in prop::collection::vec((0usize..20, 0i32..4), 0..40)) {
        let default = LogWeight::new(3.0f32);
        let mut weight = SparsePowerWeight::with_default(default);
        let mut model = BTreeMap::new();
        for (index, value) in ops {
            let value = LogWeight::new(value as f32);
            weight.set_value(index, value);
            if value == default {
                model.remove(&index);
            } else {
                model.insert(index, value);
            }
        }
        prop_assert_eq!(weight.len(), model.len());
        for index in 0..20 {
            prop_assert_eq!(*weight.value(index), model.get(&index).copied().unwrap_or(default));
        }
        let stored: Vec<usize> = weight.iter().map(|(index, _)| index).collect();
        prop_assert_eq!(stored, model.keys().copied().collect::<Vec<_>>());
    }
}
