use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{self, Read, Write};
use std::marker::PhantomData;

use crate::composite::COMPONENTWISE_PROPERTIES;
use crate::error::ParseWeightError;
use crate::io::{read_u64, write_u64, TextReader, TextWriter, UNION_SEPARATOR};
use crate::traits::{natural_less, Properties, Semiring, WeightIo};

/// Ordering and merge policy of a [`UnionWeight`].
pub trait UnionOptions<W: Semiring>: Send + Sync + 'static {
    /// Options of the reversed union.
    type ReverseOptions: UnionOptions<W::Reverse>;

    /// Total order on terms. Terms comparing `Equal` are merged.
    fn compare(lhs: &W, rhs: &W) -> Ordering;

    /// Combine two terms that compare `Equal`.
    fn merge(lhs: &W, rhs: &W) -> W;
}

/// Orders terms by the natural order of an idempotent `W` and keeps the
/// first of two equal terms.
pub struct NaturalLess<W>(PhantomData<fn() -> W>);

impl<W: Semiring> UnionOptions<W> for NaturalLess<W> {
    type ReverseOptions = NaturalLess<W::Reverse>;

    fn compare(lhs: &W, rhs: &W) -> Ordering {
        if natural_less(lhs, rhs) {
            Ordering::Less
        } else if natural_less(rhs, lhs) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    fn merge(lhs: &W, _rhs: &W) -> W {
        lhs.clone()
    }
}

/// Union semiring: a sorted set of W terms.
///
/// - Addition (⊕) = union, merging terms that compare equal
/// - Multiplication (⊗) = pairwise ⊗ of all terms
/// - Zero = no terms
/// - One = {W::one()}
///
/// Zero terms are never stored. The empty union renders as `W::zero()`.
pub struct UnionWeight<W, O> {
    terms: Vec<W>,
    _options: PhantomData<fn() -> O>,
}

impl<W: Semiring, O: UnionOptions<W>> UnionWeight<W, O> {
    /// A union of `terms`: zero terms are dropped, the rest sorted and
    /// merged.
    pub fn from_terms<I: IntoIterator<Item = W>>(terms: I) -> Self {
        let mut terms: Vec<W> = terms.into_iter().filter(|term| !term.is_zero()).collect();
        if terms.iter().any(|term| !term.is_member()) {
            return Self::no_weight();
        }
        terms.sort_by(O::compare);
        let mut merged: Vec<W> = Vec::with_capacity(terms.len());
        for term in terms {
            match merged.last_mut() {
                Some(last) if O::compare(last, &term) == Ordering::Equal => {
                    *last = O::merge(last, &term);
                }
                _ => merged.push(term),
            }
        }
        merged.retain(|term| !term.is_zero());
        Self::with_terms(merged)
    }

    /// A single-term union.
    pub fn from_term(term: W) -> Self {
        Self::from_terms([term])
    }

    fn with_terms(terms: Vec<W>) -> Self {
        Self {
            terms,
            _options: PhantomData,
        }
    }

    /// Terms in order.
    pub fn iter(&self) -> impl Iterator<Item = &W> + '_ {
        self.terms.iter()
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether this is Zero.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<W: Semiring, O: UnionOptions<W>> Semiring for UnionWeight<W, O> {
    type Reverse = UnionWeight<W::Reverse, O::ReverseOptions>;

    fn zero() -> Self {
        Self::with_terms(Vec::new())
    }

    fn one() -> Self {
        Self::with_terms(vec![W::one()])
    }

    fn no_weight() -> Self {
        Self::with_terms(vec![W::no_weight()])
    }

    fn plus(&self, rhs: &Self) -> Self {
        if !self.is_member() || !rhs.is_member() {
            return Self::no_weight();
        }
        Self::from_terms(self.terms.iter().chain(rhs.terms.iter()).cloned())
    }

    fn times(&self, rhs: &Self) -> Self {
        if !self.is_member() || !rhs.is_member() {
            return Self::no_weight();
        }
        Self::from_terms(
            self.terms
                .iter()
                .flat_map(|a| rhs.terms.iter().map(move |b| a.times(b))),
        )
    }

    fn is_member(&self) -> bool {
        self.terms.iter().all(W::is_member)
    }

    fn quantize(&self, delta: f32) -> Self {
        Self::from_terms(self.terms.iter().map(|term| term.quantize(delta)))
    }

    fn approx_eq(&self, other: &Self, delta: f32) -> bool {
        self.terms.len() == other.terms.len()
            && self
                .terms
                .iter()
                .zip(other.terms.iter())
                .all(|(a, b)| a.approx_eq(b, delta))
    }

    fn reverse(&self) -> Self::Reverse {
        UnionWeight::from_terms(self.terms.iter().map(W::reverse))
    }

    fn properties() -> Properties {
        W::properties() & COMPONENTWISE_PROPERTIES
    }

    fn type_name() -> String {
        format!("{}_union", W::type_name())
    }
}

impl<W: Semiring + WeightIo, O: UnionOptions<W>> WeightIo for UnionWeight<W, O> {
    fn write_text(&self, out: &mut TextWriter<'_>) {
        out.open();
        if self.terms.is_empty() {
            out.element(&W::zero());
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                out.separator(UNION_SEPARATOR);
            }
            out.element(term);
        }
        out.close();
    }

    fn read_text(input: &mut TextReader<'_>) -> Result<Self, ParseWeightError> {
        input.open()?;
        let mut terms = vec![input.element::<W>()?];
        while input.try_separator(UNION_SEPARATOR) {
            terms.push(input.element()?);
        }
        input.close()?;
        Ok(Self::from_terms(terms))
    }

    fn write_binary<Out: Write + ?Sized>(&self, out: &mut Out) -> io::Result<()> {
        write_u64(out, self.terms.len() as u64)?;
        self.terms.iter().try_for_each(|term| term.write_binary(out))
    }

    fn read_binary<R: Read + ?Sized>(input: &mut R) -> Result<Self, ParseWeightError> {
        let count = read_u64(input)?;
        let terms = (0..count)
            .map(|_| W::read_binary(input))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_terms(terms))
    }
}

impl<W: Clone, O> Clone for UnionWeight<W, O> {
    fn clone(&self) -> Self {
        Self {
            terms: self.terms.clone(),
            _options: PhantomData,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.terms.clone_from(&source.terms);
    }
}

impl<W: PartialEq, O> PartialEq for UnionWeight<W, O> {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}

impl<W: Eq, O> Eq for UnionWeight<W, O> {}

impl<W: Hash, O> Hash for UnionWeight<W, O> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.terms.hash(state);
    }
}

impl<W: fmt::Debug, O> fmt::Debug for UnionWeight<W, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.terms.iter()).finish()
    }
}
