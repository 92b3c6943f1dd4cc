use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{self, Read, Write};

use crate::error::{ParseWeightError, WeightError};
use crate::float::{
    approx_scalar, log_minus_f64, log_plus_f64, parse_scalar_token, quantize_scalar, scalar_token,
};
use crate::io::{read_u8, write_u8, TextReader, TextWriter, COMPOSITE_SEPARATOR};
use crate::scalar::FloatScalar;
use crate::traits::{DivideType, DivisibleSemiring, Properties, Semiring, WeightIo};

/// Signed log semiring: a log-domain magnitude with an explicit sign.
///
/// Represents the real number `±e^-value`, so unlike [`LogWeight`] it can
/// hold negative quantities and supports [`minus`](Self::minus).
///
/// - Addition (⊕) = signed log-sum-exp
/// - Multiplication (⊗) = (sign xor, +)
/// - Zero = (+, +∞)
/// - One = (+, 0)
///
/// [`LogWeight`]: crate::LogWeight
#[derive(Copy, Clone)]
pub struct SignedLogWeight<T: FloatScalar = f32> {
    positive: bool,
    value: T,
}

impl<T: FloatScalar> SignedLogWeight<T> {
    /// Create a weight from a sign and a log-domain magnitude.
    ///
    /// Zero is always stored with a positive sign.
    pub fn new(positive: bool, value: T) -> Self {
        let value = value.canonical();
        Self {
            positive: positive || value == T::pos_infinity(),
            value,
        }
    }

    /// Whether the represented quantity is non-negative.
    #[inline(always)]
    pub fn is_positive(&self) -> bool {
        self.positive
    }

    /// The log-domain magnitude.
    #[inline(always)]
    pub fn value(&self) -> T {
        self.value
    }

    /// The additive inverse.
    pub fn negate(&self) -> Self {
        Self::new(!self.positive, self.value)
    }

    /// `self ⊕ (-rhs)`.
    pub fn minus(&self, rhs: &Self) -> Self {
        self.plus(&rhs.negate())
    }

    fn sign_token(&self) -> &'static str {
        if self.positive {
            "1"
        } else {
            "-1"
        }
    }
}

impl<T: FloatScalar> Semiring for SignedLogWeight<T> {
    type Reverse = Self;

    fn zero() -> Self {
        Self::new(true, T::pos_infinity())
    }

    fn one() -> Self {
        Self::new(true, T::scalar_zero())
    }

    fn no_weight() -> Self {
        Self::new(true, T::nan())
    }

    fn plus(&self, rhs: &Self) -> Self {
        if !self.is_member() || !rhs.is_member() {
            return Self::no_weight();
        }
        if self.is_zero() {
            return *rhs;
        }
        if rhs.is_zero() {
            return *self;
        }
        let (a, b) = (self.value.to_f64(), rhs.value.to_f64());
        if self.positive == rhs.positive {
            return Self::new(self.positive, T::from_f64(log_plus_f64(a, b)));
        }
        if self.value == rhs.value {
            return Self::zero();
        }
        // The operand with the smaller log value has the larger magnitude.
        if a < b {
            Self::new(self.positive, T::from_f64(log_minus_f64(a, b)))
        } else {
            Self::new(rhs.positive, T::from_f64(log_minus_f64(b, a)))
        }
    }

    fn times(&self, rhs: &Self) -> Self {
        if !self.is_member() || !rhs.is_member() {
            return Self::no_weight();
        }
        Self::new(
            self.positive == rhs.positive,
            self.value.scalar_add(rhs.value),
        )
    }

    fn is_member(&self) -> bool {
        !self.value.is_nan() && self.value != T::neg_infinity()
    }

    fn quantize(&self, delta: f32) -> Self {
        Self::new(self.positive, quantize_scalar(self.value, delta))
    }

    fn approx_eq(&self, other: &Self, delta: f32) -> bool {
        self.positive == other.positive && approx_scalar(self.value, other.value, delta)
    }

    fn reverse(&self) -> Self {
        *self
    }

    fn properties() -> Properties {
        Properties::SEMIRING | Properties::COMMUTATIVE
    }

    fn type_name() -> String {
        format!("signed_log{}", T::TYPE_SUFFIX)
    }
}

impl<T: FloatScalar> DivisibleSemiring for SignedLogWeight<T> {
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
        Ok(Self::new(
            self.positive == rhs.positive,
            self.value.scalar_sub(rhs.value),
        ))
    }
}

impl<T: FloatScalar> PartialEq for SignedLogWeight<T> {
    fn eq(&self, other: &Self) -> bool {
        self.positive == other.positive
            && self.value.canonical_bits() == other.value.canonical_bits()
    }
}

impl<T: FloatScalar> Eq for SignedLogWeight<T> {}

impl<T: FloatScalar> Hash for SignedLogWeight<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.positive.hash(state);
        state.write_u64(self.value.canonical_bits());
    }
}

impl<T: FloatScalar> From<T> for SignedLogWeight<T> {
    fn from(value: T) -> Self {
        Self::new(true, value)
    }
}

impl<T: FloatScalar> Default for SignedLogWeight<T> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: FloatScalar> fmt::Debug for SignedLogWeight<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignedLogWeight({}, {})", self.sign_token(), self.value)
    }
}

impl<T: FloatScalar> fmt::Display for SignedLogWeight<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.sign_token(),
            COMPOSITE_SEPARATOR,
            scalar_token(self.value)
        )
    }
}

impl<T: FloatScalar> WeightIo for SignedLogWeight<T> {
    fn write_text(&self, out: &mut TextWriter<'_>) {
        out.open();
        out.token(self.sign_token());
        out.separator(COMPOSITE_SEPARATOR);
        out.token(&scalar_token(self.value));
        out.close();
    }

    fn read_text(input: &mut TextReader<'_>) -> Result<Self, ParseWeightError> {
        input.open()?;
        let positive = match input.token()? {
            "1" => true,
            "-1" => false,
            token => {
                return Err(ParseWeightError::InvalidToken {
                    kind: Self::type_name(),
                    token: token.to_string(),
                })
            }
        };
        input.separator(COMPOSITE_SEPARATOR)?;
        let value = parse_scalar_token(input.token()?, &Self::type_name())?;
        input.close()?;
        Ok(Self::new(positive, value))
    }

    fn write_binary<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        write_u8(out, u8::from(self.positive))?;
        self.value.write_le(out)
    }

    fn read_binary<R: Read + ?Sized>(input: &mut R) -> Result<Self, ParseWeightError> {
        let positive = match read_u8(input)? {
            0 => false,
            1 => true,
            other => {
                return Err(ParseWeightError::InvalidBinary {
                    kind: Self::type_name(),
                    reason: format!("sign byte {other}"),
                })
            }
        };
        Ok(Self::new(positive, T::read_le(input)?))
    }
}
