use std::cmp::Ordering;
use std::io::{self, Read, Write};
use std::marker::PhantomData;

use crate::composite::{ProductWeight, UnionOptions, UnionWeight};
use crate::error::{ParseWeightError, WeightError};
use crate::io::{TextReader, TextWriter};
use crate::scalar::Label;
use crate::string::{LeftString, RestrictString, StringPolicy, StringWeight};
use crate::traits::{DivideType, DivisibleSemiring, Properties, Semiring, WeightIo};

/// Gallic semiring: an output label string paired with a weight.
///
/// The string policy `P` selects the mode. Under [`RestrictString`] ⊕ of
/// two weights with different strings is a contract violation; use
/// [`GeneralGallicWeight`] to keep diverging strings as separate terms.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GallicWeight<L: Label, W, P: StringPolicy = LeftString>(
    ProductWeight<StringWeight<L, P>, W>,
);

impl<L: Label, W, P: StringPolicy> GallicWeight<L, W, P> {
    /// Pair `string` with `weight`.
    #[inline(always)]
    pub fn new(string: StringWeight<L, P>, weight: W) -> Self {
        Self(ProductWeight::new(string, weight))
    }

    /// The label string.
    #[inline(always)]
    pub fn string(&self) -> &StringWeight<L, P> {
        self.0.value1()
    }

    /// The companion weight.
    #[inline(always)]
    pub fn weight(&self) -> &W {
        self.0.value2()
    }
}

impl<L: Label, W: Semiring, P: StringPolicy> Semiring for GallicWeight<L, W, P> {
    type Reverse = GallicWeight<L, W::Reverse, P::Reverse>;

    fn zero() -> Self {
        Self(ProductWeight::zero())
    }

    fn one() -> Self {
        Self(ProductWeight::one())
    }

    fn no_weight() -> Self {
        Self(ProductWeight::no_weight())
    }

    /// # Panics
    ///
    /// Panics under [`RestrictString`] when the strings differ.
    fn plus(&self, rhs: &Self) -> Self {
        Self(self.0.plus(&rhs.0))
    }

    fn times(&self, rhs: &Self) -> Self {
        Self(self.0.times(&rhs.0))
    }

    fn is_member(&self) -> bool {
        self.0.is_member()
    }

    fn quantize(&self, delta: f32) -> Self {
        Self(self.0.quantize(delta))
    }

    fn approx_eq(&self, other: &Self, delta: f32) -> bool {
        self.0.approx_eq(&other.0, delta)
    }

    fn reverse(&self) -> Self::Reverse {
        GallicWeight(self.0.reverse())
    }

    fn properties() -> Properties {
        ProductWeight::<StringWeight<L, P>, W>::properties()
    }

    fn type_name() -> String {
        format!("gallic_{}_{}", P::NAME, W::type_name())
    }
}

impl<L: Label, W: DivisibleSemiring, P: StringPolicy> DivisibleSemiring for GallicWeight<L, W, P> {
    fn try_divide(&self, rhs: &Self, divide: DivideType) -> Result<Self, WeightError> {
        self.0.try_divide(&rhs.0, divide).map(Self)
    }
}

impl<L: Label, W: WeightIo, P: StringPolicy> WeightIo for GallicWeight<L, W, P> {
    fn write_text(&self, out: &mut TextWriter<'_>) {
        self.0.write_text(out);
    }

    fn read_text(input: &mut TextReader<'_>) -> Result<Self, ParseWeightError> {
        ProductWeight::read_text(input).map(Self)
    }

    fn write_binary<Out: Write + ?Sized>(&self, out: &mut Out) -> io::Result<()> {
        self.0.write_binary(out)
    }

    fn read_binary<R: Read + ?Sized>(input: &mut R) -> Result<Self, ParseWeightError> {
        ProductWeight::read_binary(input).map(Self)
    }
}

/// Groups restricted Gallic terms by string and sums the weights of terms
/// sharing one.
///
/// Strings are ordered by length, then label by label; Zero sorts last.
pub struct GallicUnionOptions<L, W>(PhantomData<fn() -> (L, W)>);

impl<L: Label, W: Semiring> UnionOptions<GallicWeight<L, W, RestrictString>>
    for GallicUnionOptions<L, W>
{
    type ReverseOptions = GallicUnionOptions<L, W::Reverse>;

    fn compare(
        lhs: &GallicWeight<L, W, RestrictString>,
        rhs: &GallicWeight<L, W, RestrictString>,
    ) -> Ordering {
        match (lhs.string().labels(), rhs.string().labels()) {
            (Some(a), Some(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    fn merge(
        lhs: &GallicWeight<L, W, RestrictString>,
        rhs: &GallicWeight<L, W, RestrictString>,
    ) -> GallicWeight<L, W, RestrictString> {
        GallicWeight::new(lhs.string().clone(), lhs.weight().plus(rhs.weight()))
    }
}

/// Gallic weight whose ⊕ keeps terms with different strings apart.
pub type GeneralGallicWeight<L, W> =
    UnionWeight<GallicWeight<L, W, RestrictString>, GallicUnionOptions<L, W>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::TropicalWeight;
    use crate::io::{from_binary, to_binary, TextFormat};

    type LeftGallic = GallicWeight<i32, TropicalWeight>;
    type RestrictGallic = GallicWeight<i32, TropicalWeight, RestrictString>;
    type General = GeneralGallicWeight<i32, TropicalWeight>;

    fn left(labels: &[i32], w: f32) -> LeftGallic {
        GallicWeight::new(
            StringWeight::from_labels(labels.iter().copied()),
            TropicalWeight::new(w),
        )
    }

    fn restrict(labels: &[i32], w: f32) -> RestrictGallic {
        GallicWeight::new(
            StringWeight::from_labels(labels.iter().copied()),
            TropicalWeight::new(w),
        )
    }

    #[test]
    fn test_left_gallic_operations() {
        let a = left(&[1, 2], 3.0);
        let b = left(&[1, 3], 1.0);
        assert_eq!(a.plus(&b), left(&[1], 1.0));
        assert_eq!(a.times(&b), left(&[1, 2, 1, 3], 4.0));
        assert_eq!(a.times(&LeftGallic::one()), a);
        assert_eq!(LeftGallic::type_name(), "gallic_left_string_tropical");
    }

    #[test]
    fn test_restrict_plus_of_equal_strings() {
        let a = restrict(&[4], 3.0);
        let b = restrict(&[4], 1.0);
        assert_eq!(a.plus(&b), restrict(&[4], 1.0));
    }

    #[test]
    #[should_panic(expected = "restricted operands differ")]
    fn test_restrict_plus_of_different_strings_panics() {
        let _ = restrict(&[1], 1.0).plus(&restrict(&[2], 1.0));
    }

    #[test]
    fn test_general_keeps_diverging_strings() {
        let a = General::from_term(restrict(&[2], 3.0));
        let b = General::from_term(restrict(&[1], 5.0));
        let c = General::from_term(restrict(&[2], 1.0));
        let sum = a.plus(&b).plus(&c);
        let terms: Vec<_> = sum.iter().cloned().collect();
        assert_eq!(terms, vec![restrict(&[1], 5.0), restrict(&[2], 1.0)]);
    }

    #[test]
    fn test_general_times_distributes() {
        let a = General::from_terms([restrict(&[1], 1.0), restrict(&[2], 2.0)]);
        let b = General::from_term(restrict(&[3], 10.0));
        let product = a.times(&b);
        let terms: Vec<_> = product.iter().cloned().collect();
        assert_eq!(terms, vec![restrict(&[1, 3], 11.0), restrict(&[2, 3], 12.0)]);
    }

    #[test]
    fn test_io() {
        let w = left(&[1, 2], 2.5);
        assert_eq!(TextFormat::default().print(&w), "1_2,2.5");
        assert_eq!(TextFormat::default().parse::<LeftGallic>("1_2,2.5").unwrap(), w);
        assert_eq!(from_binary::<LeftGallic>(&to_binary(&w)).unwrap(), w);

        let general = General::from_terms([restrict(&[1], 1.0), restrict(&[2], 2.0)]);
        for format in [TextFormat::default(), TextFormat::with_parentheses()] {
            let text = format.print(&general);
            assert_eq!(format.parse::<General>(&text).unwrap(), general);
        }
        assert_eq!(TextFormat::default().print(&general), "1,1;2,2");
    }

    #[test]
    fn test_reverse() {
        let w = left(&[1, 2], 2.0);
        let r: GallicWeight<i32, TropicalWeight, crate::string::RightString> = w.reverse();
        assert_eq!(r.string().labels(), Some(&[2, 1][..]));
        assert_eq!(r.weight().value(), 2.0);
    }
}
