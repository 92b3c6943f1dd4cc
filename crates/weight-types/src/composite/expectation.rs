use std::io::{self, Read, Write};

use crate::composite::{
    read_pair, read_pair_binary, write_pair, write_pair_binary, PowerWeight, SparsePowerWeight,
};
use crate::error::ParseWeightError;
use crate::io::{TextReader, TextWriter};
use crate::traits::{Properties, Semiring, WeightIo};

/// Embedding of a primary weight into the companion semiring.
pub trait Lift<From> {
    fn lift(value: &From) -> Self;
}

impl<W: Semiring> Lift<W> for W {
    fn lift(value: &W) -> Self {
        value.clone()
    }
}

impl<W: Semiring> Lift<W> for SparsePowerWeight<W> {
    fn lift(value: &W) -> Self {
        SparsePowerWeight::with_default(value.clone())
    }
}

impl<W: Semiring, const N: usize> Lift<W> for PowerWeight<W, N> {
    fn lift(value: &W) -> Self {
        PowerWeight::splat(value.clone())
    }
}

/// Expectation semiring: a primary weight with a companion statistic.
///
/// With `ι` the lift of W1 into W2:
///
/// - Addition (⊕) = (a1 ⊕ b1, a2 ⊕ b2 ⊕ ι(a1) ⊗ ι(b1))
/// - Multiplication (⊗) = (a1 ⊗ b1, ι(a1) ⊗ b2 ⊕ a2 ⊗ ι(b1))
/// - Zero = (0, 0)
/// - One = (1, 0)
///
/// The cross term in ⊕ breaks distributivity, so only commutativity is
/// declared.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExpectationWeight<W1, W2> {
    value1: W1,
    value2: W2,
}

impl<W1, W2> ExpectationWeight<W1, W2> {
    #[inline(always)]
    pub fn new(value1: W1, value2: W2) -> Self {
        Self { value1, value2 }
    }

    /// The primary weight.
    #[inline(always)]
    pub fn value1(&self) -> &W1 {
        &self.value1
    }

    /// The companion weight.
    #[inline(always)]
    pub fn value2(&self) -> &W2 {
        &self.value2
    }
}

impl<W1, W2> Semiring for ExpectationWeight<W1, W2>
where
    W1: Semiring<Reverse = W1>,
    W2: Semiring<Reverse = W2> + Lift<W1>,
{
    type Reverse = Self;

    fn zero() -> Self {
        Self::new(W1::zero(), W2::zero())
    }

    fn one() -> Self {
        Self::new(W1::one(), W2::zero())
    }

    fn no_weight() -> Self {
        Self::new(W1::no_weight(), W2::no_weight())
    }

    fn plus(&self, rhs: &Self) -> Self {
        let cross = W2::lift(&self.value1).times(&W2::lift(&rhs.value1));
        Self::new(
            self.value1.plus(&rhs.value1),
            self.value2.plus(&rhs.value2).plus(&cross),
        )
    }

    fn times(&self, rhs: &Self) -> Self {
        let left = W2::lift(&self.value1).times(&rhs.value2);
        let right = self.value2.times(&W2::lift(&rhs.value1));
        Self::new(self.value1.times(&rhs.value1), left.plus(&right))
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
        self.clone()
    }

    fn properties() -> Properties {
        W1::properties() & W2::properties() & Properties::COMMUTATIVE
    }

    fn type_name() -> String {
        format!("expectation_{}_{}", W1::type_name(), W2::type_name())
    }
}

impl<W1: WeightIo, W2: WeightIo> WeightIo for ExpectationWeight<W1, W2> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::{LogWeight, RealWeight};
    use crate::io::{from_binary, to_binary, TextFormat};
    use crate::traits::DELTA;

    type RealExpectation = ExpectationWeight<RealWeight, RealWeight>;

    fn real(a: f32, b: f32) -> RealExpectation {
        ExpectationWeight::new(RealWeight::new(a), RealWeight::new(b))
    }

    #[test]
    fn test_plus_adds_cross_term() {
        // (2, 1) ⊕ (3, 4) = (5, 1 + 4 + 2·3)
        assert_eq!(real(2.0, 1.0).plus(&real(3.0, 4.0)), real(5.0, 11.0));
        assert_eq!(real(2.0, 1.0).plus(&RealExpectation::zero()), real(2.0, 1.0));
    }

    #[test]
    fn test_times() {
        // (2, 1) ⊗ (3, 4) = (6, 2·4 + 1·3)
        assert_eq!(real(2.0, 1.0).times(&real(3.0, 4.0)), real(6.0, 11.0));
        assert_eq!(real(2.0, 1.0).times(&RealExpectation::one()), real(2.0, 1.0));
        assert_eq!(
            real(2.0, 1.0).times(&RealExpectation::zero()),
            RealExpectation::zero()
        );
    }

    #[test]
    fn test_plus_is_associative() {
        let (a, b, c) = (real(1.0, 2.0), real(0.5, 1.0), real(3.0, 0.25));
        let lhs = a.plus(&b).plus(&c);
        let rhs = a.plus(&b.plus(&c));
        assert!(lhs.approx_eq(&rhs, DELTA));
    }

    #[test]
    fn test_sparse_companion() {
        type SparseExpectation = ExpectationWeight<LogWeight, SparsePowerWeight<LogWeight>>;
        let mut companion = SparsePowerWeight::with_default(LogWeight::zero());
        companion.set_value(1, LogWeight::new(2.0));
        let w = SparseExpectation::new(LogWeight::new(1.0), companion);
        assert!(w.times(&SparseExpectation::one()).approx_eq(&w, DELTA));
        assert_eq!(SparseExpectation::type_name(), "expectation_log_log_^n");
    }

    #[test]
    fn test_io() {
        let w = real(2.0, 0.5);
        assert_eq!(TextFormat::default().print(&w), "2,0.5");
        assert_eq!(TextFormat::default().parse::<RealExpectation>("2,0.5").unwrap(), w);
        assert_eq!(from_binary::<RealExpectation>(&to_binary(&w)).unwrap(), w);
        assert_eq!(RealExpectation::properties(), Properties::COMMUTATIVE);
    }
}
