//! Semiring weights for weighted automata.
//!
//! A weight kind is a semiring `(K, ⊕, ⊗, 0, 1)` implementing [`Semiring`].
//! Scalar kernels, label-string and label-set kernels are combined by the
//! composites into arbitrarily nested kinds, all checked at the type level.
//!
//! # Scalar Kernels
//!
//! | Type | ⊕ (plus) | ⊗ (times) | Zero | One | Idempotent |
//! |------|----------|-----------|------|-----|------------|
//! | [`TropicalWeight<T>`] | min | + | +∞ | 0 | yes |
//! | [`LogWeight<T>`] | -log(e^-a + e^-b) | + | +∞ | 0 | no |
//! | [`RealWeight<T>`] | + | × | 0 | 1 | no |
//! | [`MinMaxWeight<T>`] | min | max | +∞ | -∞ | yes |
//! | [`SignedLogWeight<T>`] | signed log-sum | + | (+, +∞) | (+, 0) | no |
//!
//! `T` is `f32` (the default) or `f64`. The two precisions have distinct
//! type names and never compare equal.
//!
//! # Label Kernels
//!
//! | Type | ⊕ (plus) | ⊗ (times) | Zero | One |
//! |------|----------|-----------|------|-----|
//! | [`LeftStringWeight`] | longest common prefix | concat | ∞ | ε |
//! | [`RightStringWeight`] | longest common suffix | concat | ∞ | ε |
//! | [`RestrictStringWeight`] | equal operands only | concat | ∞ | ε |
//! | [`UnionIntersectSetWeight`] | ∪ | ∩ | ∅ | universal |
//! | [`IntersectUnionSetWeight`] | ∩ | ∪ | universal | ∅ |
//! | [`BooleanSetWeight`] | ∪ | ∩ | ∅ | universal |
//!
//! # Composites
//!
//! [`ProductWeight`], [`PowerWeight`], [`SparsePowerWeight`],
//! [`LexicographicWeight`], [`UnionWeight`], [`GallicWeight`],
//! [`GeneralGallicWeight`] and [`ExpectationWeight`].
//!
//! # Example
//!
//! ```
//! use weight_types::{Semiring, TropicalWeight};
//!
//! let a = TropicalWeight::new(3.0f32);
//! let b = TropicalWeight::new(5.0f32);
//!
//! // Tropical addition: min(3, 5) = 3
//! assert_eq!(a.plus(&b), 3.0f32);
//!
//! // Tropical multiplication: 3 + 5 = 8
//! assert_eq!(a.times(&b), 8.0f32);
//! ```
//!
//! # Text and Binary I/O
//!
//! ```
//! use weight_types::{LogWeight, ProductWeight, TextFormat, TropicalWeight};
//!
//! let w = ProductWeight::new(TropicalWeight::new(1.0f32), LogWeight::new(2.0f32));
//! let text = TextFormat::with_parentheses().print(&w);
//! assert_eq!(text, "(1,2)");
//!
//! let back: ProductWeight<TropicalWeight, LogWeight> =
//!     TextFormat::with_parentheses().parse(&text).unwrap();
//! assert_eq!(back, w);
//! ```

mod adder;
mod convert;
mod error;
mod io;
mod scalar;
mod set;
mod string;
mod traits;

pub mod composite;
pub mod float;

pub use adder::{
    Accumulate, Adder, LogAccumulator, PlusAccumulator, RealAccumulator, SignedLogAccumulator,
    Summable,
};
pub use composite::{
    ExpectationWeight, GallicUnionOptions, GallicWeight, GeneralGallicWeight, LexicographicWeight,
    Lift, NaturalLess, PowerWeight, ProductWeight, SparsePowerWeight, UnionOptions, UnionWeight,
};
pub use convert::{LosslessConvert, WeightConvert};
pub use error::{ParseWeightError, Result, WeightError};
pub use float::{LogWeight, MinMaxWeight, RealWeight, SignedLogWeight, TropicalWeight};
pub use io::{
    from_binary, read_binary_or_no_weight, to_binary, TextFormat, TextReader, TextWriter,
    COMPOSITE_SEPARATOR, LABEL_SEPARATOR, UNION_SEPARATOR,
};
pub use scalar::{FloatScalar, Label};
pub use set::{
    BooleanSet, BooleanSetWeight, IntersectUnion, IntersectUnionSetWeight, SetKind, SetPolicy,
    SetWeight, UnionIntersect, UnionIntersectSetWeight,
};
pub use string::{
    LeftString, LeftStringWeight, RestrictString, RestrictStringWeight, RightString,
    RightStringWeight, StringKind, StringPolicy, StringWeight,
};
pub use traits::{
    natural_less, DivideType, DivisibleSemiring, Properties, Semiring, Weight, WeightIo, DELTA,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use super::{
        Adder, DivideType, DivisibleSemiring, LogWeight, MinMaxWeight, ProductWeight,
        RealWeight, Semiring, SignedLogWeight, TextFormat, TropicalWeight, Weight,
        WeightConvert, WeightIo,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_distinct_per_precision() {
        assert_eq!(TropicalWeight::<f32>::type_name(), "tropical");
        assert_eq!(TropicalWeight::<f64>::type_name(), "tropical64");
        assert_ne!(LogWeight::<f32>::type_name(), LogWeight::<f64>::type_name());
        assert_ne!(RealWeight::<f32>::type_name(), RealWeight::<f64>::type_name());
    }

    #[test]
    fn test_weights_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TropicalWeight>();
        assert_send_sync::<SparsePowerWeight<LogWeight>>();
        assert_send_sync::<GeneralGallicWeight<i32, TropicalWeight>>();
        assert_send_sync::<Adder<LogWeight>>();
    }
}
