use crate::error::WeightError;
use crate::float::{approx_scalar, impl_float_weight, quantize_scalar};
use crate::scalar::FloatScalar;
use crate::traits::{DivideType, DivisibleSemiring, Properties, Semiring};

/// Real semiring: (ℝ, +, ×)
///
/// - Addition (⊕) = +
/// - Multiplication (⊗) = ×
/// - Zero = 0
/// - One = 1
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct RealWeight<T: FloatScalar = f32>(T);

impl_float_weight!(RealWeight);

impl<T: FloatScalar> RealWeight<T> {
    /// Standard subtraction, the inverse of ⊕.
    pub fn minus(&self, rhs: &Self) -> Self {
        if !self.is_member() || !rhs.is_member() {
            return Self::no_weight();
        }
        Self::new(self.0.scalar_sub(rhs.0))
    }
}

impl<T: FloatScalar> Semiring for RealWeight<T> {
    type Reverse = Self;

    #[inline(always)]
    fn zero() -> Self {
        Self(T::scalar_zero())
    }

    #[inline(always)]
    fn one() -> Self {
        Self(T::scalar_one())
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
        Self::new(self.0.scalar_add(rhs.0))
    }

    #[inline(always)]
    fn times(&self, rhs: &Self) -> Self {
        if !self.is_member() || !rhs.is_member() {
            return Self::no_weight();
        }
        Self::new(self.0.scalar_mul(rhs.0))
    }

    #[inline(always)]
    fn is_member(&self) -> bool {
        !self.0.is_nan() && !crate::float::is_infinite(self.0)
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
        format!("real{}", T::TYPE_SUFFIX)
    }
}

impl<T: FloatScalar> DivisibleSemiring for RealWeight<T> {
    fn try_divide(&self, rhs: &Self, _divide: DivideType) -> Result<Self, WeightError> {
        if !self.is_member() || !rhs.is_member() {
            return Ok(Self::no_weight());
        }
        if rhs.is_zero() {
            return Err(WeightError::DivideByZero(Self::type_name()));
        }
        Ok(Self::new(self.0.scalar_div(rhs.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations() {
        let a = RealWeight::new(3.0f64);
        let b = RealWeight::new(5.0f64);
        assert_eq!(a.plus(&b).value(), 8.0);
        assert_eq!(a.times(&b).value(), 15.0);
        assert_eq!(b.minus(&a).value(), 2.0);
        assert_eq!(a.times(&b).divide(&b, DivideType::Any), a);
    }

    #[test]
    fn test_identities() {
        let a = RealWeight::new(-4.5f32);
        assert_eq!(a.plus(&RealWeight::zero()), a);
        assert_eq!(a.times(&RealWeight::one()), a);
        assert_eq!(a.times(&RealWeight::zero()), RealWeight::zero());
    }

    #[test]
    fn test_infinity_is_not_member() {
        assert!(!RealWeight::new(f32::INFINITY).is_member());
        assert!(!RealWeight::<f32>::no_weight().is_member());
    }

    #[test]
    fn test_divide_by_zero() {
        let a = RealWeight::new(1.0f32);
        assert!(matches!(
            a.try_divide(&RealWeight::zero(), DivideType::Any),
            Err(WeightError::DivideByZero(_))
        ));
    }
}
