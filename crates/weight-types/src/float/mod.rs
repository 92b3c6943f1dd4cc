//! Single-scalar weight kernels over `f32`/`f64`.

mod log;
mod min_max;
mod real;
mod signed_log;
mod tropical;

pub use log::LogWeight;
pub use min_max::MinMaxWeight;
pub use real::RealWeight;
pub use signed_log::SignedLogWeight;
pub use tropical::TropicalWeight;

use crate::error::ParseWeightError;
use crate::scalar::FloatScalar;

pub(crate) const INFINITY_TOKEN: &str = "Infinity";
pub(crate) const NEG_INFINITY_TOKEN: &str = "-Infinity";
pub(crate) const BAD_NUMBER_TOKEN: &str = "BadNumber";

pub(crate) fn is_infinite<T: FloatScalar>(value: T) -> bool {
    value == T::pos_infinity() || value == T::neg_infinity()
}

/// Text token for a scalar: the shortest decimal that reads back exactly,
/// or one of the reserved infinity/NaN tokens.
pub(crate) fn scalar_token<T: FloatScalar>(value: T) -> String {
    if value.is_nan() {
        BAD_NUMBER_TOKEN.to_string()
    } else if value == T::pos_infinity() {
        INFINITY_TOKEN.to_string()
    } else if value == T::neg_infinity() {
        NEG_INFINITY_TOKEN.to_string()
    } else {
        value.canonical().to_string()
    }
}

pub(crate) fn parse_scalar_token<T: FloatScalar>(
    token: &str,
    kind: &str,
) -> Result<T, ParseWeightError> {
    match token {
        INFINITY_TOKEN => Ok(T::pos_infinity()),
        NEG_INFINITY_TOKEN => Ok(T::neg_infinity()),
        BAD_NUMBER_TOKEN => Ok(T::nan()),
        _ => token
            .trim()
            .parse::<T>()
            .map_err(|_| ParseWeightError::InvalidToken {
                kind: kind.to_string(),
                token: token.to_string(),
            }),
    }
}

/// Round to the nearest multiple of `delta`. Infinities and NaN pass through.
pub(crate) fn quantize_scalar<T: FloatScalar>(value: T, delta: f32) -> T {
    if value.is_nan() || is_infinite(value) {
        return value;
    }
    let delta = f64::from(delta);
    T::from_f64((value.to_f64() / delta + 0.5).floor() * delta)
}

pub(crate) fn approx_scalar<T: FloatScalar>(lhs: T, rhs: T, delta: f32) -> bool {
    if lhs.canonical_bits() == rhs.canonical_bits() {
        return true;
    }
    let (a, b, d) = (lhs.to_f64(), rhs.to_f64(), f64::from(delta));
    a <= b + d && b <= a + d
}

/// `-log(e^-a + e^-b)` evaluated in `f64`.
pub(crate) fn log_plus_f64(a: f64, b: f64) -> f64 {
    if a == f64::INFINITY {
        return b;
    }
    if b == f64::INFINITY {
        return a;
    }
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    lo - (-(hi - lo)).exp().ln_1p()
}

/// `-log(e^-a - e^-b)` for `a < b`, evaluated in `f64`.
pub(crate) fn log_minus_f64(a: f64, b: f64) -> f64 {
    if b == f64::INFINITY {
        return a;
    }
    a - (-(-(b - a)).exp()).ln_1p()
}

/// Shared plumbing for the newtype float kernels: canonicalising
/// construction, bitwise `Eq`/`Hash`, tolerance-aware comparison against raw
/// scalars, text/binary I/O and the `+`/`*` operators.
macro_rules! impl_float_weight {
    ($name:ident) => {
        impl<T: FloatScalar> $name<T> {
            /// Create a weight from a raw scalar.
            #[inline(always)]
            pub fn new(value: T) -> Self {
                Self(value.canonical())
            }

            /// The underlying scalar.
            #[inline(always)]
            pub fn value(&self) -> T {
                self.0
            }
        }

        impl<T: FloatScalar> PartialEq for $name<T> {
            #[inline(always)]
            fn eq(&self, other: &Self) -> bool {
                self.0.canonical_bits() == other.0.canonical_bits()
            }
        }

        impl<T: FloatScalar> Eq for $name<T> {}

        impl<T: FloatScalar> std::hash::Hash for $name<T> {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                state.write_u64(self.0.canonical_bits());
            }
        }

        /// Comparison with a raw scalar uses the default tolerance.
        impl<T: FloatScalar> PartialEq<T> for $name<T> {
            #[inline(always)]
            fn eq(&self, other: &T) -> bool {
                $crate::float::approx_scalar(self.0, other.canonical(), $crate::traits::DELTA)
            }
        }

        impl PartialEq<$name<f32>> for f32 {
            #[inline(always)]
            fn eq(&self, other: &$name<f32>) -> bool {
                other == self
            }
        }

        impl PartialEq<$name<f64>> for f64 {
            #[inline(always)]
            fn eq(&self, other: &$name<f64>) -> bool {
                other == self
            }
        }

        impl<T: FloatScalar> From<T> for $name<T> {
            #[inline(always)]
            fn from(value: T) -> Self {
                Self::new(value)
            }
        }

        impl<T: FloatScalar> Default for $name<T> {
            #[inline(always)]
            fn default() -> Self {
                <Self as $crate::traits::Semiring>::zero()
            }
        }

        impl<T: FloatScalar> std::fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl<T: FloatScalar> std::fmt::Display for $name<T> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&$crate::float::scalar_token(self.0))
            }
        }

        impl<T: FloatScalar> $crate::traits::WeightIo for $name<T> {
            fn write_text(&self, out: &mut $crate::io::TextWriter<'_>) {
                out.token(&$crate::float::scalar_token(self.0));
            }

            fn read_text(
                input: &mut $crate::io::TextReader<'_>,
            ) -> Result<Self, $crate::error::ParseWeightError> {
                let token = input.token()?;
                let kind = <Self as $crate::traits::Semiring>::type_name();
                Ok(Self::new($crate::float::parse_scalar_token(token, &kind)?))
            }

            fn write_binary<W: std::io::Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
                self.0.write_le(out)
            }

            fn read_binary<R: std::io::Read + ?Sized>(
                input: &mut R,
            ) -> Result<Self, $crate::error::ParseWeightError> {
                Ok(Self::new(T::read_le(input)?))
            }
        }

        impl<T: FloatScalar> std::ops::Add for $name<T> {
            type Output = Self;

            #[inline(always)]
            fn add(self, rhs: Self) -> Self::Output {
                $crate::traits::Semiring::plus(&self, &rhs)
            }
        }

        impl<T: FloatScalar> std::ops::Mul for $name<T> {
            type Output = Self;

            #[inline(always)]
            fn mul(self, rhs: Self) -> Self::Output {
                $crate::traits::Semiring::times(&self, &rhs)
            }
        }
    };
}

pub(crate) use impl_float_weight;
