use crate::error::WeightError;
use crate::float::{approx_scalar, impl_float_weight, quantize_scalar, scalar_token};
use crate::scalar::FloatScalar;
use crate::traits::{DivideType, DivisibleSemiring, Properties, Semiring};

/// MinMax semiring: (ℝ ∪ {±∞}, min, max)
///
/// - Addition (⊕) = min
/// - Multiplication (⊗) = max
/// - Zero = +∞
/// - One = -∞
///
/// Used for bottleneck (minimax) path problems.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct MinMaxWeight<T: FloatScalar = f32>(T);

impl_float_weight!(MinMaxWeight);

impl<T: FloatScalar> Semiring for MinMaxWeight<T> {
    type Reverse = Self;

    #[inline(always)]
    fn zero() -> Self {
        Self(T::pos_infinity())
    }

    #[inline(always)]
    fn one() -> Self {
        Self(T::neg_infinity())
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
        Self(self.0.scalar_max(rhs.0))
    }

    #[inline(always)]
    fn is_member(&self) -> bool {
        !self.0.is_nan()
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
        format!("minmax{}", T::TYPE_SUFFIX)
    }
}

/// `a / b` is `a` whenever `max(b, a) = a`, i.e. `a >= b`.
impl<T: FloatScalar> DivisibleSemiring for MinMaxWeight<T> {
    fn try_divide(&self, rhs: &Self, _divide: DivideType) -> Result<Self, WeightError> {
        if !self.is_member() || !rhs.is_member() {
            return Ok(Self::no_weight());
        }
        if self.0 >= rhs.0 {
            Ok(*self)
        } else {
            Err(WeightError::NoQuotient {
                kind: Self::type_name(),
                lhs: scalar_token(self.0),
                rhs: scalar_token(rhs.0),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations() {
        let a = MinMaxWeight::new(3.0f32);
        let b = MinMaxWeight::new(5.0f32);
        assert_eq!(a.plus(&b), a);
        assert_eq!(a.times(&b), b);
        assert_eq!(a.times(&MinMaxWeight::one()), a);
        assert_eq!(a.times(&MinMaxWeight::zero()), MinMaxWeight::zero());
    }

    #[test]
    fn test_one_is_negative_infinity_member() {
        let one = MinMaxWeight::<f64>::one();
        assert!(one.is_member());
        assert_eq!(one.value(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_divide() {
        let a = MinMaxWeight::new(5.0f32);
        let b = MinMaxWeight::new(3.0f32);
        assert_eq!(a.divide(&b, DivideType::Any), a);
        assert_eq!(b.times(&a.divide(&b, DivideType::Any)), a);
        assert!(matches!(
            b.try_divide(&a, DivideType::Any),
            Err(WeightError::NoQuotient { .. })
        ));
    }
}
