use std::io::{self, Read, Write};

use crate::composite::{
    read_pair, read_pair_binary, write_pair, write_pair_binary, COMPONENTWISE_PROPERTIES,
};
use crate::error::{ParseWeightError, WeightError};
use crate::io::{TextReader, TextWriter};
use crate::traits::{DivideType, DivisibleSemiring, Properties, Semiring, WeightIo};

/// Product semiring: W1 × W2 with componentwise operations.
///
/// - Addition (⊕) = (a1 ⊕ b1, a2 ⊕ b2)
/// - Multiplication (⊗) = (a1 ⊗ b1, a2 ⊗ b2)
/// - Zero = (0, 0)
/// - One = (1, 1)
///
/// # Example
///
/// ```
/// use weight_types::{ProductWeight, Semiring, TropicalWeight};
///
/// let a = ProductWeight::new(TropicalWeight::new(1.0f32), TropicalWeight::new(4.0f32));
/// let b = ProductWeight::new(TropicalWeight::new(2.0f32), TropicalWeight::new(3.0f32));
///
/// let sum = a.plus(&b);
/// assert_eq!(sum.value1().value(), 1.0);
/// assert_eq!(sum.value2().value(), 3.0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProductWeight<W1, W2> {
    value1: W1,
    value2: W2,
}

impl<W1, W2> ProductWeight<W1, W2> {
    /// Create a product from its components.
    #[inline(always)]
    pub fn new(value1: W1, value2: W2) -> Self {
        Self { value1, value2 }
    }

    /// The first component.
    #[inline(always)]
    pub fn value1(&self) -> &W1 {
        &self.value1
    }

    /// The second component.
    #[inline(always)]
    pub fn value2(&self) -> &W2 {
        &self.value2
    }
}

impl<W1: Semiring, W2: Semiring> Semiring for ProductWeight<W1, W2> {
    type Reverse = ProductWeight<W1::Reverse, W2::Reverse>;

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
        Self::new(self.value1.plus(&rhs.value1), self.value2.plus(&rhs.value2))
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
        ProductWeight::new(self.value1.reverse(), self.value2.reverse())
    }

    fn properties() -> Properties {
        W1::properties() & W2::properties() & COMPONENTWISE_PROPERTIES
    }

    fn type_name() -> String {
        format!("{}_X_{}", W1::type_name(), W2::type_name())
    }
}

impl<W1: DivisibleSemiring, W2: DivisibleSemiring> DivisibleSemiring for ProductWeight<W1, W2> {
    fn try_divide(&self, rhs: &Self, divide: DivideType) -> Result<Self, WeightError> {
        Ok(Self::new(
            self.value1.try_divide(&rhs.value1, divide)?,
            self.value2.try_divide(&rhs.value2, divide)?,
        ))
    }
}

impl<W1: WeightIo, W2: WeightIo> WeightIo for ProductWeight<W1, W2> {
    fn write_text(&self, out: &mut TextWriter<'_>) {
        write_pair(out, &self.value1, &self.value2);
    }

    fn read_text(input: &mut TextReader<'_>) -> Result<Self, ParseWeightError> {
        let (value1, value2) = read_pair(input)?;
        Ok(Self::new(value1, value2))
    }

    fn write_binary<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
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
    use crate::float::{LogWeight, TropicalWeight};
    use crate::io::TextFormat;
    use crate::string::LeftStringWeight;

    type TropicalPair = ProductWeight<TropicalWeight, TropicalWeight>;

    fn pair(a: f32, b: f32) -> TropicalPair {
        ProductWeight::new(TropicalWeight::new(a), TropicalWeight::new(b))
    }

    #[test]
    fn test_componentwise_operations() {
        let a = pair(1.0, 4.0);
        let b = pair(2.0, 3.0);
        assert_eq!(a.plus(&b), pair(1.0, 3.0));
        assert_eq!(a.times(&b), pair(3.0, 7.0));
        assert_eq!(a.plus(&TropicalPair::zero()), a);
        assert_eq!(a.times(&TropicalPair::one()), a);
        assert_eq!(a.times(&TropicalPair::zero()), TropicalPair::zero());
    }

    #[test]
    fn test_properties_intersect() {
        assert_eq!(
            TropicalPair::properties(),
            Properties::SEMIRING | Properties::COMMUTATIVE | Properties::IDEMPOTENT
        );
        assert_eq!(
            ProductWeight::<LeftStringWeight, LogWeight>::properties(),
            Properties::LEFT_SEMIRING
        );
        assert_eq!(TropicalPair::type_name(), "tropical_X_tropical");
    }

    #[test]
    fn test_divide() {
        let a = pair(5.0, 7.0);
        let b = pair(2.0, 3.0);
        assert_eq!(a.divide(&b, DivideType::Any), pair(3.0, 4.0));
    }

    #[test]
    fn test_nested_text() {
        let w = ProductWeight::new(pair(1.0, 2.0), TropicalWeight::new(3.0f32));
        assert_eq!(TextFormat::default().print(&w), "1,2,3");
        assert_eq!(TextFormat::with_parentheses().print(&w), "((1,2),3)");
        for format in [TextFormat::default(), TextFormat::with_parentheses()] {
            let text = format.print(&w);
            assert_eq!(format.parse::<ProductWeight<TropicalPair, TropicalWeight>>(&text).unwrap(), w);
        }
    }

    #[test]
    fn test_missing_component_is_error() {
        assert!(TextFormat::default().parse::<TropicalPair>("1").is_err());
        assert!(TextFormat::with_parentheses().parse::<TropicalPair>("(1,2").is_err());
        let bad: TropicalPair = TextFormat::default().parse_or_no_weight("1;2");
        assert!(!bad.is_member());
    }
}
