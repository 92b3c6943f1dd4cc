use crate::error::WeightError;
use crate::float::{approx_scalar, impl_float_weight, quantize_scalar};
use crate::scalar::FloatScalar;
use crate::traits::{DivideType, DivisibleSemiring, Properties, Semiring};

/// Tropical semiring: (ℝ ∪ {+∞}, min, +)
///
/// - Addition (⊕) = min
/// - Multiplication (⊗) = +
/// - Zero = +∞
/// - One = 0
///
/// This is used for:
/// - Shortest path algorithms (Dijkstra, Floyd-Warshall)
/// - Viterbi decoding with negated log probabilities
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct TropicalWeight<T: FloatScalar = f32>(T);

impl_float_weight!(TropicalWeight);

impl<T: FloatScalar> Semiring for TropicalWeight<T> {
    type Reverse = Self;

    #[inline(always)]
    fn zero() -> Self {
        Self(T::pos_infinity())
    }

    #[inline(always)]
    fn one() -> Self {
        Self(T::scalar_zero())
    }

    #[inline(always)]
    fn no_weight() -> Self {
        Self(T::nan())
    }

    #[inline(always)]
    fn plus(&self, rhs: &Self) -> Self {
        if !self.is_member() || !rhs.is_member() {
            return Self::no_weight();
        }
        Self(self.0.scalar_min(rhs.0))
    }

    #[inline(always)]
    fn times(&self, rhs: &Self) -> Self {
        if !self.is_member() || !rhs.is_member() {
            return Self::no_weight();
        }
        Self::new(self.0.scalar_add(rhs.0))
    }

    #[inline(always)]
    fn is_member(&self) -> bool {
        !self.0.is_nan() && self.0 != T::neg_infinity()
    }

    fn quantize(&self, delta: f32) -> Self {
        Self::new(quantize_scalar(self.0, delta))
    }

    fn approx_eq(&self, other: &Self, delta: f32) -> bool {
        approx_scalar(self.0, other.0, delta)
    }

    fn reverse(&self) -> Self {
        *self
    }

    fn properties() -> Properties {
        Properties::SEMIRING | Properties::COMMUTATIVE | Properties::IDEMPOTENT | Properties::PATH
    }

    fn type_name() -> String {
        format!("tropical{}", T::TYPE_SUFFIX)
    }
}

impl<T: FloatScalar> DivisibleSemiring for TropicalWeight<T> {
    fn try_divide(&self, rhs: &Self, _divide: DivideType) -> Result<Self, WeightError> {
        if !self.is_member() || !rhs.is_member() {
            return Ok(Self::no_weight());
        }
        if rhs.is_zero() {
            return Err(WeightError::DivideByZero(Self::type_name()));
        }
        if self.is_zero() {
            return Ok(Self::zero());
        }
        Ok(Self::new(self.0.scalar_sub(rhs.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::TextFormat;

    #[test]
    fn test_semiring_identity() {
        let a = TropicalWeight::new(5.0f64);
        let zero = TropicalWeight::zero();
        let one = TropicalWeight::one();

        // a ⊕ 0 = a
        assert_eq!(a.plus(&zero), a);
        // a ⊗ 1 = a
        assert_eq!(a.times(&one), a);
        // a ⊗ 0 = 0
        assert_eq!(a.times(&zero), zero);
    }

    #[test]
    fn test_operations() {
        let a = TropicalWeight::new(3.0f32);
        let b = TropicalWeight::new(5.0f32);

        // min(3, 5) = 3
        assert_eq!(a.plus(&b), 3.0f32);
        // 3 + 5 = 8
        assert_eq!(a.times(&b), 8.0f32);
        assert_eq!(a + b, a.plus(&b));
        assert_eq!(a * b, a.times(&b));
        assert_eq!(TropicalWeight::<f32>::zero().value(), f32::INFINITY);
        assert_eq!(TropicalWeight::<f32>::one().value(), 0.0);
    }

    #[test]
    fn test_divide() {
        let a = TropicalWeight::new(8.0f32);
        let b = TropicalWeight::new(5.0f32);
        assert_eq!(a.divide(&b, DivideType::Any), 3.0f32);
        assert_eq!(
            TropicalWeight::<f32>::zero().divide(&b, DivideType::Left),
            TropicalWeight::zero()
        );
        assert!(matches!(
            a.try_divide(&TropicalWeight::zero(), DivideType::Any),
            Err(WeightError::DivideByZero(_))
        ));
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn test_divide_by_zero_panics() {
        let a = TropicalWeight::new(1.0f32);
        let _ = a.divide(&TropicalWeight::zero(), DivideType::Any);
    }

    #[test]
    fn test_membership() {
        assert!(TropicalWeight::<f32>::zero().is_member());
        assert!(!TropicalWeight::<f32>::no_weight().is_member());
        assert!(!TropicalWeight::new(f32::NEG_INFINITY).is_member());
        // NaN is not swallowed by min.
        let bad = TropicalWeight::<f32>::no_weight();
        assert!(!bad.plus(&TropicalWeight::new(1.0f32)).is_member());
        assert!(!TropicalWeight::new(1.0f32).plus(&bad).is_member());
    }

    #[test]
    fn test_reflexive_equality() {
        let bad = TropicalWeight::<f32>::no_weight();
        assert_eq!(bad, bad);
        assert_eq!(TropicalWeight::new(-0.0f32), TropicalWeight::new(0.0f32));
    }

    #[test]
    fn test_scalar_comparison_tolerance() {
        let w = TropicalWeight::new(1.0f32);
        assert!(w == 1.0005f32);
        assert!(1.0005f32 == w);
        assert!(w != 1.01f32);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(TropicalWeight::<f32>::type_name(), "tropical");
        assert_eq!(TropicalWeight::<f64>::type_name(), "tropical64");
    }

    #[test]
    fn test_text() {
        let format = TextFormat::default();
        assert_eq!(format.print(&TropicalWeight::<f32>::zero()), "Infinity");
        assert_eq!(format.print(&TropicalWeight::new(2.5f32)), "2.5");
        let w: TropicalWeight = format.parse("2.5").unwrap();
        assert_eq!(w, TropicalWeight::new(2.5));
        let bad: TropicalWeight = format.parse_or_no_weight("x2");
        assert!(!bad.is_member());
    }

    #[test]
    fn test_quantize() {
        let w = TropicalWeight::new(1.3f32);
        assert_eq!(w.quantize(0.5).value(), 1.5);
        assert_eq!(TropicalWeight::<f32>::zero().quantize(0.5), TropicalWeight::zero());
    }
}
