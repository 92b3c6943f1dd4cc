use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::io::{self, Read, Write};
use std::str::FromStr;

/// Trait for the floating-point element types underneath the float weights.
///
/// Arithmetic that needs extra headroom (log-sum-exp, Kahan compensation,
/// quantization) goes through `f64` and is rounded back with [`from_f64`].
///
/// [`from_f64`]: FloatScalar::from_f64
pub trait FloatScalar:
    Copy + Clone + Send + Sync + Debug + Display + PartialOrd + FromStr + 'static + Sized
{
    /// Suffix appended to a family name to form its type name.
    ///
    /// Single precision keeps the bare family name (`"tropical"`), double
    /// precision appends `"64"` so the two are never confused.
    const TYPE_SUFFIX: &'static str;

    /// Width of the binary encoding in bytes.
    const BYTES: usize;

    /// The additive identity (standard arithmetic).
    fn scalar_zero() -> Self;

    /// The multiplicative identity (standard arithmetic).
    fn scalar_one() -> Self;

    /// Positive infinity.
    fn pos_infinity() -> Self;

    /// Negative infinity.
    fn neg_infinity() -> Self;

    /// Quiet NaN used for the no-weight sentinel.
    fn nan() -> Self;

    /// Standard arithmetic addition.
    fn scalar_add(self, rhs: Self) -> Self;

    /// Standard arithmetic subtraction.
    fn scalar_sub(self, rhs: Self) -> Self;

    /// Standard arithmetic multiplication.
    fn scalar_mul(self, rhs: Self) -> Self;

    /// Standard arithmetic division.
    fn scalar_div(self, rhs: Self) -> Self;

    /// Minimum of two values.
    fn scalar_min(self, rhs: Self) -> Self;

    /// Maximum of two values.
    fn scalar_max(self, rhs: Self) -> Self;

    /// Widen to `f64`.
    fn to_f64(self) -> f64;

    /// Round from `f64`.
    fn from_f64(value: f64) -> Self;

    /// Whether the value is NaN.
    fn is_nan(self) -> bool;

    /// Canonical form: `-0.0` becomes `0.0` and every NaN payload collapses
    /// to [`nan`](FloatScalar::nan).
    ///
    /// Values are canonicalised when a weight is constructed, so bitwise
    /// comparison of two weights is reflexive even after a store/reload.
    fn canonical(self) -> Self;

    /// Raw bit pattern of the canonical value, widened to `u64`.
    fn canonical_bits(self) -> u64;

    /// Write the little-endian bit pattern.
    fn write_le<W: Write + ?Sized>(self, out: &mut W) -> io::Result<()>;

    /// Read a little-endian bit pattern.
    fn read_le<R: Read + ?Sized>(input: &mut R) -> io::Result<Self>;
}

macro_rules! impl_float_scalar {
    ($($t:ty => $suffix:literal),*) => {
        $(
            impl FloatScalar for $t {
                const TYPE_SUFFIX: &'static str = $suffix;
                const BYTES: usize = std::mem::size_of::<$t>();

                #[inline(always)]
                fn scalar_zero() -> Self {
                    0.0
                }

                #[inline(always)]
                fn scalar_one() -> Self {
                    1.0
                }

                #[inline(always)]
                fn pos_infinity() -> Self {
                    <$t>::INFINITY
                }

                #[inline(always)]
                fn neg_infinity() -> Self {
                    <$t>::NEG_INFINITY
                }

                #[inline(always)]
                fn nan() -> Self {
                    <$t>::NAN
                }

                #[inline(always)]
                fn scalar_add(self, rhs: Self) -> Self {
                    self + rhs
                }

                #[inline(always)]
                fn scalar_sub(self, rhs: Self) -> Self {
                    self - rhs
                }

                #[inline(always)]
                fn scalar_mul(self, rhs: Self) -> Self {
                    self * rhs
                }

                #[inline(always)]
                fn scalar_div(self, rhs: Self) -> Self {
                    self / rhs
                }

                #[inline(always)]
                fn scalar_min(self, rhs: Self) -> Self {
                    if self <= rhs { self } else { rhs }
                }

                #[inline(always)]
                fn scalar_max(self, rhs: Self) -> Self {
                    if self >= rhs { self } else { rhs }
                }

                #[inline(always)]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline(always)]
                fn from_f64(value: f64) -> Self {
                    value as $t
                }

                #[inline(always)]
                fn is_nan(self) -> bool {
                    <$t>::is_nan(self)
                }

                #[inline(always)]
                fn canonical(self) -> Self {
                    if <$t>::is_nan(self) {
                        <$t>::NAN
                    } else if self == 0.0 {
                        0.0
                    } else {
                        self
                    }
                }

                #[inline(always)]
                fn canonical_bits(self) -> u64 {
                    self.canonical().to_bits() as u64
                }

                fn write_le<W: Write + ?Sized>(self, out: &mut W) -> io::Result<()> {
                    out.write_all(&self.to_le_bytes())
                }

                fn read_le<R: Read + ?Sized>(input: &mut R) -> io::Result<Self> {
                    let mut bytes = [0u8; <$t as FloatScalar>::BYTES];
                    input.read_exact(&mut bytes)?;
                    Ok(<$t>::from_le_bytes(bytes))
                }
            }
        )*
    };
}

impl_float_scalar!(f32 => "", f64 => "64");

/// Trait for the symbol type of string weights and the element type of set
/// weights.
pub trait Label:
    Copy + Clone + Send + Sync + Debug + Display + Ord + Hash + FromStr + 'static + Sized
{
    /// Build a label from a small non-negative index (used by generators).
    fn from_usize(value: usize) -> Self;

    /// Widen to `i64` for the binary encoding.
    fn to_i64(self) -> i64;

    /// Narrow from the binary encoding, `None` when out of range.
    fn from_i64(value: i64) -> Option<Self>;
}

macro_rules! impl_label {
    ($($t:ty),*) => {
        $(
            impl Label for $t {
                #[inline(always)]
                fn from_usize(value: usize) -> Self {
                    value as $t
                }

                #[inline(always)]
                fn to_i64(self) -> i64 {
                    self as i64
                }

                #[inline(always)]
                fn from_i64(value: i64) -> Option<Self> {
                    <$t>::try_from(value).ok()
                }
            }
        )*
    };
}

impl_label!(i32, i64, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_negative_zero() {
        assert_eq!((-0.0f32).canonical_bits(), 0.0f32.canonical_bits());
        assert_eq!((-0.0f64).canonical_bits(), 0.0f64.canonical_bits());
    }

    #[test]
    fn test_canonical_nan_is_reflexive() {
        let a = f32::from_bits(0x7fc0_0001);
        let b = f32::NAN;
        assert_eq!(a.canonical_bits(), b.canonical_bits());
    }

    #[test]
    fn test_binary_roundtrip() {
        let mut buf = Vec::new();
        1.25f64.write_le(&mut buf).unwrap();
        assert_eq!(buf.len(), <f64 as FloatScalar>::BYTES);
        let back = f64::read_le(&mut buf.as_slice()).unwrap();
        assert_eq!(back, 1.25);
    }

    #[test]
    fn test_truncated_binary_fails() {
        let buf = [0u8; 3];
        assert!(f32::read_le(&mut &buf[..]).is_err());
    }

    #[test]
    fn test_label_range() {
        assert_eq!(i32::from_i64(-7), Some(-7));
        assert_eq!(u32::from_i64(-1), None);
        assert_eq!(usize::from_usize(4).to_i64(), 4);
    }
}
