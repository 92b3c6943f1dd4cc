use std::io::{self, Read, Write};

use crate::composite::{read_pair, read_pair_binary, write_pair, write_pair_binary};
use crate::error::{ParseWeightError, WeightError};
use crate::io::{TextReader, TextWriter};
use crate::traits::{natural_less, DivideType, DivisibleSemiring, Properties, Semiring, WeightIo};

/// Lexicographic semiring: (W1, W2) ordered with W1 as the primary key.
///
/// ⊕ returns whichever operand is smaller in the natural order of W1,
/// breaking ties with W2; ⊗ is componentwise. Both components must be
/// path semirings (idempotent with a total natural order).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LexicographicWeight<W1, W2> {
    value1: W1,
    value2: W2,
}

impl<W1: Semiring, W2: Semiring> LexicographicWeight<W1, W2> {
    /// Create from components, checking that both kinds are path-ordered.
    pub fn try_new(value1: W1, value2: W2) -> Result<Self, WeightError> {
        if !Self::components_are_path() {
            return Err(WeightError::NotPathOrdered(Self::type_name()));
        }
        Ok(Self { value1, value2 })
    }

    /// Create from components.
    ///
    /// # Panics
    ///
    /// Panics if either component kind is not a path semiring.
    pub fn new(value1: W1, value2: W2) -> Self {
        Self::try_new(value1, value2).unwrap_or_else(|err| panic!("{err}"))
    }

    /// The primary component.
    #[inline(always)]
    pub fn value1(&self) -> &W1 {
        &self.value1
    }

    /// The tie-breaking component.
    #[inline(always)]
    pub fn value2(&self) -> &W2 {
        &self.value2
    }

    fn components_are_path() -> bool {
        let path = Properties::PATH | Properties::IDEMPOTENT;
        W1::properties().contains(path) && W2::properties().contains(path)
    }
}

impl<W1: Semiring, W2: Semiring> Semiring for LexicographicWeight<W1, W2> {
    type Reverse = LexicographicWeight<W1::Reverse, W2::Reverse>;

    fn zero() -> Self {
        Self::new(W1::zero(), W2::zero())
    }

    fn one() -> Self {
        Self::new(W1::one(), W2::one())
    }

    fn no_weight() -> Self {
        Self::new(W1::no_weight(), W2::no_weight())
    }

    fn plus(&self, rhs: &Self) -> Self {
        if !self.is_member() || !rhs.is_member() {
            return Self::no_weight();
        }
        if natural_less(&self.value1, &rhs.value1) {
            return self.clone();
        }
        if natural_less(&rhs.value1, &self.value1) {
            return rhs.clone();
        }
        if natural_less(&rhs.value2, &self.value2) {
            return rhs.clone();
        }
        self.clone()
    }

    fn times(&self, rhs: &Self) -> Self {
        Self::new(
            self.value1.times(&rhs.value1),
            self.value2.times(&rhs.value2),
        )
    }

    fn is_member(&self) -> bool {
        self.value1.is_member() && self.value2.is_member()
    }

    fn quantize(&self, delta: f32) -> Self {
        Self::new(self.value1.quantize(delta), self.value2.quantize(delta))
    }

    fn approx_eq(&self, other: &Self, delta: f32) -> bool {
        self.value1.approx_eq(&other.value1, delta) && self.value2.approx_eq(&other.value2, delta)
    }

    fn reverse(&self) -> Self::Reverse {
        LexicographicWeight::new(self.value1.reverse(), self.value2.reverse())
    }

    fn properties() -> Properties {
        W1::properties()
            & W2::properties()
            & (Properties::SEMIRING
                | Properties::PATH
                | Properties::IDEMPOTENT
                | Properties::COMMUTATIVE)
    }

    fn type_name() -> String {
        format!("lexicographic_{}_{}", W1::type_name(), W2::type_name())
    }
}

impl<W1: DivisibleSemiring, W2: DivisibleSemiring> DivisibleSemiring
    for LexicographicWeight<W1, W2>
{
    fn try_divide(&self, rhs: &Self, divide: DivideType) -> Result<Self, WeightError> {
        Self::try_new(
            self.value1.try_divide(&rhs.value1, divide)?,
            self.value2.try_divide(&rhs.value2, divide)?,
        )
    }
}

impl<W1: Semiring + WeightIo, W2: Semiring + WeightIo> WeightIo for LexicographicWeight<W1, W2> {
    fn write_text(&self, out: &mut TextWriter<'_>) {
        write_pair(out, &self.value1, &self.value2);
    }

    fn read_text(input: &mut TextReader<'_>) -> Result<Self, ParseWeightError> {
        let (value1, value2) = read_pair(input)?;
        Ok(Self::new(value1, value2))
    }

    fn write_binary<Out: Write + ?Sized>(&self, out: &mut Out) -> io::Result<()> {
        write_pair_binary(out, &self.value1, &self.value2)
    }

    fn read_binary<R: Read + ?Sized>(input: &mut R) -> Result<Self, ParseWeightError> {
        let (value1, value2) = read_pair_binary(input)?;
        Ok(Self::new(value1, value2))
    }
}
