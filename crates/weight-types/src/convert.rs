//! Typed conversions between weight kinds.
//!
//! A conversion is an impl of [`WeightConvert`] for an ordered pair of
//! kinds. Pairs that never lose information also implement
//! [`LosslessConvert`], which promises `back(there(w)) == w`. The remaining
//! pairs are checked: a value with no counterpart in the target kind is an
//! error from [`WeightConvert::try_convert`] and a panic from
//! [`WeightConvert::convert`].
//!
//! | From | To | |
//! |------|----|---|
//! | Tropical | Log (same precision) | lossless, both ways |
//! | any float kind, `f32` | same kind, `f64` | lossless |
//! | any float kind, `f64` | same kind, `f32` | checked: exact values only |
//! | Log | SignedLog | lossless |
//! | SignedLog | Log | checked: non-negative only |
//! | union-intersect set | intersect-union set | lossless, both ways |
//! | boolean set | union-intersect / intersect-union set | lossless |
//! | union-intersect / intersect-union set | boolean set | checked: ∅ or universal only |

use crate::error::WeightError;
use crate::float::{LogWeight, MinMaxWeight, RealWeight, SignedLogWeight, TropicalWeight};
use crate::scalar::{FloatScalar, Label};
use crate::set::{BooleanSet, IntersectUnion, SetPolicy, SetWeight, UnionIntersect};
use crate::traits::Semiring;

/// Conversion of `self` into the weight kind `To`.
pub trait WeightConvert<To> {
    /// Convert, reporting values with no counterpart in `To`.
    fn try_convert(&self) -> Result<To, WeightError>;

    /// Convert.
    ///
    /// # Panics
    ///
    /// Panics if the value has no counterpart in `To`.
    fn convert(&self) -> To {
        self.try_convert().unwrap_or_else(|err| panic!("{err}"))
    }
}

/// Marker for conversions that never fail and can be undone exactly.
pub trait LosslessConvert<To>: WeightConvert<To> {}

impl<T: FloatScalar> WeightConvert<LogWeight<T>> for TropicalWeight<T> {
    fn try_convert(&self) -> Result<LogWeight<T>, WeightError> {
        Ok(LogWeight::new(self.value()))
    }
}

impl<T: FloatScalar> LosslessConvert<LogWeight<T>> for TropicalWeight<T> {}

impl<T: FloatScalar> WeightConvert<TropicalWeight<T>> for LogWeight<T> {
    fn try_convert(&self) -> Result<TropicalWeight<T>, WeightError> {
        Ok(TropicalWeight::new(self.value()))
    }
}

impl<T: FloatScalar> LosslessConvert<TropicalWeight<T>> for LogWeight<T> {}

impl<T: FloatScalar> WeightConvert<SignedLogWeight<T>> for LogWeight<T> {
    fn try_convert(&self) -> Result<SignedLogWeight<T>, WeightError> {
        Ok(SignedLogWeight::new(true, self.value()))
    }
}

impl<T: FloatScalar> LosslessConvert<SignedLogWeight<T>> for LogWeight<T> {}

impl<T: FloatScalar> WeightConvert<LogWeight<T>> for SignedLogWeight<T> {
    fn try_convert(&self) -> Result<LogWeight<T>, WeightError> {
        if !self.is_positive() {
            return Err(WeightError::NotRepresentable {
                kind: LogWeight::<T>::type_name(),
                value: format!("{self}"),
            });
        }
        Ok(LogWeight::new(self.value()))
    }
}

/// Narrow to `f32`, accepting only values that survive the round trip.
fn narrow<To: Semiring>(value: f64) -> Result<f32, WeightError> {
    let narrowed = value as f32;
    if value.is_nan() || f64::from(narrowed) == value {
        Ok(narrowed)
    } else {
        Err(WeightError::NotRepresentable {
            kind: To::type_name(),
            value: value.to_string(),
        })
    }
}

macro_rules! impl_precision_convert {
    ($($name:ident),*) => {
        $(
            impl WeightConvert<$name<f64>> for $name<f32> {
                fn try_convert(&self) -> Result<$name<f64>, WeightError> {
                    Ok($name::new(f64::from(self.value())))
                }
            }

            impl LosslessConvert<$name<f64>> for $name<f32> {}

            impl WeightConvert<$name<f32>> for $name<f64> {
                fn try_convert(&self) -> Result<$name<f32>, WeightError> {
                    narrow::<$name<f32>>(self.value()).map($name::new)
                }
            }
        )*
    };
}

impl_precision_convert!(TropicalWeight, LogWeight, RealWeight, MinMaxWeight);

impl WeightConvert<SignedLogWeight<f64>> for SignedLogWeight<f32> {
    fn try_convert(&self) -> Result<SignedLogWeight<f64>, WeightError> {
        Ok(SignedLogWeight::new(
            self.is_positive(),
            f64::from(self.value()),
        ))
    }
}

impl LosslessConvert<SignedLogWeight<f64>> for SignedLogWeight<f32> {}

impl WeightConvert<SignedLogWeight<f32>> for SignedLogWeight<f64> {
    fn try_convert(&self) -> Result<SignedLogWeight<f32>, WeightError> {
        let value = narrow::<SignedLogWeight<f32>>(self.value())?;
        Ok(SignedLogWeight::new(self.is_positive(), value))
    }
}

fn relabel<L: Label, From: SetPolicy, To: SetPolicy>(set: &SetWeight<L, From>) -> SetWeight<L, To> {
    SetWeight::from_repr(set.repr().clone())
}

impl<L: Label> WeightConvert<SetWeight<L, IntersectUnion>> for SetWeight<L, UnionIntersect> {
    fn try_convert(&self) -> Result<SetWeight<L, IntersectUnion>, WeightError> {
        Ok(relabel(self))
    }
}

impl<L: Label> LosslessConvert<SetWeight<L, IntersectUnion>> for SetWeight<L, UnionIntersect> {}

impl<L: Label> WeightConvert<SetWeight<L, UnionIntersect>> for SetWeight<L, IntersectUnion> {
    fn try_convert(&self) -> Result<SetWeight<L, UnionIntersect>, WeightError> {
        Ok(relabel(self))
    }
}

impl<L: Label> LosslessConvert<SetWeight<L, UnionIntersect>> for SetWeight<L, IntersectUnion> {}

impl<L: Label, P: SetPolicy> WeightConvert<SetWeight<L, P>> for SetWeight<L, BooleanSet> {
    fn try_convert(&self) -> Result<SetWeight<L, P>, WeightError> {
        Ok(relabel(self))
    }
}

impl<L: Label, P: SetPolicy> LosslessConvert<SetWeight<L, P>> for SetWeight<L, BooleanSet> {}

macro_rules! impl_to_boolean {
    ($($policy:ident),*) => {
        $(
            impl<L: Label> WeightConvert<SetWeight<L, BooleanSet>> for SetWeight<L, $policy> {
                fn try_convert(&self) -> Result<SetWeight<L, BooleanSet>, WeightError> {
                    if self.is_member() && !self.is_empty_set() && !self.is_universal() {
                        return Err(WeightError::NotRepresentable {
                            kind: SetWeight::<L, BooleanSet>::type_name(),
                            value: self.to_string(),
                        });
                    }
                    Ok(relabel(self))
                }
            }
        )*
    };
}

impl_to_boolean!(UnionIntersect, IntersectUnion);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set::{BooleanSetWeight, IntersectUnionSetWeight, UnionIntersectSetWeight};

    fn round_trip<A, B>(w: &A)
    where
        A: LosslessConvert<B> + PartialEq + std::fmt::Debug,
        B: LosslessConvert<A>,
    {
        let there: B = w.convert();
        let back: A = there.convert();
        assert_eq!(&back, w);
    }

    #[test]
    fn test_tropical_log_lossless() {
        for value in [0.0f32, 1.5, -2.0, f32::INFINITY] {
            round_trip::<TropicalWeight, LogWeight>(&TropicalWeight::new(value));
            round_trip::<LogWeight<f64>, TropicalWeight<f64>>(&LogWeight::new(f64::from(value)));
        }
        let log: LogWeight = TropicalWeight::<f32>::zero().convert();
        assert_eq!(log, LogWeight::<f32>::zero());
    }

    #[test]
    fn test_precision_widening_and_narrowing() {
        let wide: TropicalWeight<f64> = TropicalWeight::new(0.25f32).convert();
        assert_eq!(wide.value(), 0.25);
        let narrow: TropicalWeight<f32> = wide.convert();
        assert_eq!(narrow.value(), 0.25);

        let inexact = RealWeight::new(0.1f64);
        let result: Result<RealWeight<f32>, _> = inexact.try_convert();
        assert!(matches!(result, Err(WeightError::NotRepresentable { .. })));

        let zero: MinMaxWeight<f32> = MinMaxWeight::<f64>::zero().convert();
        assert_eq!(zero, MinMaxWeight::<f32>::zero());
    }

    #[test]
    fn test_signed_log() {
        let signed: SignedLogWeight = LogWeight::new(2.0f32).convert();
        assert!(signed.is_positive());
        let back: LogWeight = signed.convert();
        assert_eq!(back, LogWeight::new(2.0f32));

        let negative = SignedLogWeight::new(false, 2.0f32);
        let result: Result<LogWeight, _> = negative.try_convert();
        assert!(result.is_err());
    }

    #[test]
    #[should_panic(expected = "not representable")]
    fn test_checked_conversion_panics() {
        let _: LogWeight = SignedLogWeight::new(false, 1.0f32).convert();
    }

    #[test]
    fn test_set_conversions() {
        let w = UnionIntersectSetWeight::from_elements([1, 3]);
        round_trip::<UnionIntersectSetWeight, IntersectUnionSetWeight>(&w);

        let universal: UnionIntersectSetWeight = BooleanSetWeight::universal().convert();
        assert!(universal.is_universal());
        let empty: IntersectUnionSetWeight = BooleanSetWeight::empty().convert();
        assert!(empty.is_empty_set());

        let result: Result<BooleanSetWeight, _> = w.try_convert();
        assert!(result.is_err());
        let boolean: BooleanSetWeight = UnionIntersectSetWeight::universal().convert();
        assert!(boolean.is_universal());
    }
}
