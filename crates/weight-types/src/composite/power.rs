use std::array;
use std::io::{self, Read, Write};

use crate::composite::COMPONENTWISE_PROPERTIES;
use crate::error::{ParseWeightError, WeightError};
use crate::io::{TextReader, TextWriter, COMPOSITE_SEPARATOR};
use crate::traits::{DivideType, DivisibleSemiring, Properties, Semiring, WeightIo};

/// Power semiring: Wᴺ with componentwise operations.
///
/// The arity is part of the type; indexing outside `0..N` is a contract
/// violation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PowerWeight<W, const N: usize> {
    values: [W; N],
}

impl<W, const N: usize> PowerWeight<W, N> {
    /// Create from exactly `N` components.
    #[inline(always)]
    pub fn from_array(values: [W; N]) -> Self {
        Self { values }
    }

    /// Create with every component equal to `value`.
    pub fn splat(value: W) -> Self
    where
        W: Clone,
    {
        Self::from_array(array::from_fn(|_| value.clone()))
    }

    /// Create from a vector whose length must be `N`.
    pub fn try_from_vec(values: Vec<W>) -> Result<Self, WeightError>
    where
        W: Semiring,
    {
        let found = values.len();
        values
            .try_into()
            .map(Self::from_array)
            .map_err(|_| WeightError::ArityMismatch {
                kind: Self::type_name(),
                expected: N,
                found,
            })
    }

    /// Create from a vector whose length must be `N`.
    ///
    /// # Panics
    ///
    /// Panics if the length differs from `N`.
    pub fn from_vec(values: Vec<W>) -> Self
    where
        W: Semiring,
    {
        Self::try_from_vec(values).unwrap_or_else(|err| panic!("{err}"))
    }

    /// All components in order.
    #[inline(always)]
    pub fn values(&self) -> &[W; N] {
        &self.values
    }

    /// The component at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    pub fn value(&self, index: usize) -> &W
    where
        W: Semiring,
    {
        match self.values.get(index) {
            Some(value) => value,
            None => panic!("{}", Self::out_of_range(index)),
        }
    }

    /// Replace the component at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    pub fn set_value(&mut self, index: usize, value: W)
    where
        W: Semiring,
    {
        match self.values.get_mut(index) {
            Some(slot) => *slot = value,
            None => panic!("{}", Self::out_of_range(index)),
        }
    }

    fn out_of_range(index: usize) -> WeightError
    where
        W: Semiring,
    {
        WeightError::IndexOutOfRange {
            kind: Self::type_name(),
            index,
            arity: N,
        }
    }

    fn zip_with(&self, rhs: &Self, op: impl Fn(&W, &W) -> W) -> Self {
        Self::from_array(array::from_fn(|i| op(&self.values[i], &rhs.values[i])))
    }
}

impl<W: Semiring, const N: usize> Semiring for PowerWeight<W, N> {
    type Reverse = PowerWeight<W::Reverse, N>;

    fn zero() -> Self {
        Self::from_array(array::from_fn(|_| W::zero()))
    }

    fn one() -> Self {
        Self::from_array(array::from_fn(|_| W::one()))
    }

    fn no_weight() -> Self {
        Self::from_array(array::from_fn(|_| W::no_weight()))
    }

    fn plus(&self, rhs: &Self) -> Self {
        self.zip_with(rhs, W::plus)
    }

    fn times(&self, rhs: &Self) -> Self {
        self.zip_with(rhs, W::times)
    }

    fn is_member(&self) -> bool {
        self.values.iter().all(W::is_member)
    }

    fn quantize(&self, delta: f32) -> Self {
        Self::from_array(array::from_fn(|i| self.values[i].quantize(delta)))
    }

    fn approx_eq(&self, other: &Self, delta: f32) -> bool {
        self.values
            .iter()
            .zip(other.values.iter())
            .all(|(a, b)| a.approx_eq(b, delta))
    }

    fn reverse(&self) -> Self::Reverse {
        PowerWeight::from_array(array::from_fn(|i| self.values[i].reverse()))
    }

    fn properties() -> Properties {
        W::properties() & COMPONENTWISE_PROPERTIES
    }

    fn type_name() -> String {
        format!("{}_^{}", W::type_name(), N)
    }
}

impl<W: DivisibleSemiring, const N: usize> DivisibleSemiring for PowerWeight<W, N> {
    fn try_divide(&self, rhs: &Self, divide: DivideType) -> Result<Self, WeightError> {
        let values = self
            .values
            .iter()
            .zip(rhs.values.iter())
            .map(|(a, b)| a.try_divide(b, divide))
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from_vec(values)
    }
}

impl<W: WeightIo, const N: usize> WeightIo for PowerWeight<W, N> {
    fn write_text(&self, out: &mut TextWriter<'_>) {
        out.open();
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                out.separator(COMPOSITE_SEPARATOR);
            }
            out.element(value);
        }
        out.close();
    }

    fn read_text(input: &mut TextReader<'_>) -> Result<Self, ParseWeightError> {
        input.open()?;
        let mut values = Vec::with_capacity(N);
        for i in 0..N {
            if i > 0 {
                input.separator(COMPOSITE_SEPARATOR)?;
            }
            values.push(input.element()?);
        }
        input.close()?;
        Ok(Self::from_array(collect_array(values)?))
    }

    fn write_binary<Out: Write + ?Sized>(&self, out: &mut Out) -> io::Result<()> {
        self.values.iter().try_for_each(|value| value.write_binary(out))
    }

    fn read_binary<R: Read + ?Sized>(input: &mut R) -> Result<Self, ParseWeightError> {
        let values = (0..N)
            .map(|_| W::read_binary(input))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_array(collect_array(values)?))
    }
}

fn collect_array<W, const N: usize>(values: Vec<W>) -> Result<[W; N], ParseWeightError> {
    values
        .try_into()
        .map_err(|values: Vec<W>| ParseWeightError::InvalidBinary {
            kind: format!("power weight of arity {N}"),
            reason: format!("{} components", values.len()),
        })
}
