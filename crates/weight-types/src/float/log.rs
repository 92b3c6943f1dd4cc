use crate::error::WeightError;
use crate::float::{approx_scalar, impl_float_weight, log_plus_f64, quantize_scalar};
use crate::scalar::FloatScalar;
use crate::traits::{DivideType, DivisibleSemiring, Properties, Semiring};

/// Log semiring: (ℝ ∪ {+∞}, ⊕log, +)
///
/// - Addition (⊕) = -log(e^-a + e^-b)
/// - Multiplication (⊗) = +
/// - Zero = +∞
/// - One = 0
///
/// Values are negated natural-log probabilities, so ⊕ sums probabilities
/// and ⊗ multiplies them. The log-sum-exp is evaluated in `f64`.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct LogWeight<T: FloatScalar = f32>(T);

impl_float_weight!(LogWeight);

impl<T: FloatScalar> Semiring for LogWeight<T> {
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

    fn plus(&self, rhs: &Self) -> Self {
        if !self.is_member() || !rhs.is_member() {
            return Self::no_weight();
        }
        Self::new(T::from_f64(log_plus_f64(self.0.to_f64(), rhs.0.to_f64())))
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
        Properties::SEMIRING | Properties::COMMUTATIVE
    }

    fn type_name() -> String {
        format!("log{}", T::TYPE_SUFFIX)
    }
}

impl<T: FloatScalar> DivisibleSemiring for LogWeight<T> {
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
    use approx::assert_relative_eq;

    #[test]
    fn test_plus_of_ones() {
        let one = LogWeight::<f32>::one();
        let sum = one.plus(&one);
        assert_relative_eq!(sum.value(), -std::f32::consts::LN_2, epsilon = 1e-6);
        assert!(sum.approx_eq(&LogWeight::new(-0.693), 1e-3));
    }

    #[test]
    fn test_plus_is_probability_sum() {
        // -ln(0.25) ⊕ -ln(0.5) = -ln(0.75)
        let a = LogWeight::new(-(0.25f64).ln());
        let b = LogWeight::new(-(0.5f64).ln());
        assert_relative_eq!(a.plus(&b).value(), -(0.75f64).ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_identity() {
        let a = LogWeight::new(2.0f32);
        assert_eq!(a.plus(&LogWeight::zero()), a);
        assert_eq!(LogWeight::zero().plus(&a), a);
        assert_eq!(a.times(&LogWeight::zero()), LogWeight::zero());
    }

    #[test]
    fn test_divide_inverts_times() {
        let a = LogWeight::new(2.5f32);
        let b = LogWeight::new(1.0f32);
        let q = a.times(&b).divide(&b, DivideType::Any);
        assert!(q.approx_eq(&a, crate::traits::DELTA));
        assert!(a.try_divide(&LogWeight::zero(), DivideType::Any).is_err());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(LogWeight::<f32>::type_name(), "log");
        assert_eq!(LogWeight::<f64>::type_name(), "log64");
    }
}
