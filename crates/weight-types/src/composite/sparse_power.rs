use std::cmp::Ordering;
use std::io::{self, Read, Write};

use crate::composite::COMPONENTWISE_PROPERTIES;
use crate::error::{ParseWeightError, WeightError};
use crate::io::{read_u64, write_u64, TextReader, TextWriter, COMPOSITE_SEPARATOR};
use crate::traits::{DivideType, DivisibleSemiring, Properties, Semiring, WeightIo};

/// Sparse power semiring: an unbounded index → W map with a default value.
///
/// Only entries that differ from the default are stored, sorted by index
/// with no duplicates. Operations run over the union of stored indices,
/// reading absent entries as the default; the result's default is the
/// operation applied to both defaults.
///
/// # Example
///
/// ```
/// use weight_types::{LogWeight, SparsePowerWeight};
///
/// let mut w = SparsePowerWeight::with_default(LogWeight::new(17.0f32));
/// w.set_value(10, LogWeight::new(10.0));
/// assert_eq!(*w.value(10), LogWeight::new(10.0));
/// assert_eq!(*w.value(0), LogWeight::new(17.0));
///
/// w.set_value(10, LogWeight::new(17.0));
/// assert_eq!(w.len(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SparsePowerWeight<W> {
    default: W,
    entries: Vec<(usize, W)>,
}

impl<W: Semiring> SparsePowerWeight<W> {
    /// An empty map reading `default` at every index.
    pub fn with_default(default: W) -> Self {
        Self {
            default,
            entries: Vec::new(),
        }
    }

    /// The value read at unset indices.
    #[inline(always)]
    pub fn default_value(&self) -> &W {
        &self.default
    }

    /// Change the default; stored entries equal to it are dropped.
    pub fn set_default_value(&mut self, default: W) {
        self.entries.retain(|(_, value)| *value != default);
        self.default = default;
    }

    /// The value at `index`, or the default when unset.
    pub fn value(&self, index: usize) -> &W {
        match self.position(index) {
            Ok(pos) => &self.entries[pos].1,
            Err(_) => &self.default,
        }
    }

    /// Insert, update or (when `value` equals the default) remove the
    /// entry at `index`.
    pub fn set_value(&mut self, index: usize, value: W) {
        match self.position(index) {
            Ok(pos) if value == self.default => {
                self.entries.remove(pos);
            }
            Ok(pos) => self.entries[pos].1 = value,
            Err(_) if value == self.default => {}
            Err(pos) => self.entries.insert(pos, (index, value)),
        }
    }

    /// Number of stored (non-default) entries.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether every index reads the default.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &W)> + '_ {
        self.entries.iter().map(|(index, value)| (*index, value))
    }

    fn position(&self, index: usize) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&index, |(i, _)| *i)
    }

    fn from_parts<I: IntoIterator<Item = (usize, W)>>(default: W, entries: I) -> Self {
        let mut weight = Self::with_default(default);
        weight.entries = entries
            .into_iter()
            .filter(|(_, value)| *value != weight.default)
            .collect();
        weight
    }

    /// Combine two maps index by index over the union of their entries.
    fn try_merge_with<E>(
        &self,
        rhs: &Self,
        mut op: impl FnMut(&W, &W) -> Result<W, E>,
    ) -> Result<Self, E> {
        let default = op(&self.default, &rhs.default)?;
        let mut entries = Vec::with_capacity(self.len().max(rhs.len()));
        let mut lhs_iter = self.entries.iter().peekable();
        let mut rhs_iter = rhs.entries.iter().peekable();
        loop {
            let (index, value) = match (lhs_iter.peek(), rhs_iter.peek()) {
                (None, None) => break,
                (Some((i, a)), None) => {
                    let merged = (*i, op(a, &rhs.default)?);
                    lhs_iter.next();
                    merged
                }
                (None, Some((j, b))) => {
                    let merged = (*j, op(&self.default, b)?);
                    rhs_iter.next();
                    merged
                }
                (Some((i, a)), Some((j, b))) => match i.cmp(j) {
                    Ordering::Less => {
                        let merged = (*i, op(a, &rhs.default)?);
                        lhs_iter.next();
                        merged
                    }
                    Ordering::Greater => {
                        let merged = (*j, op(&self.default, b)?);
                        rhs_iter.next();
                        merged
                    }
                    Ordering::Equal => {
                        let merged = (*i, op(a, b)?);
                        lhs_iter.next();
                        rhs_iter.next();
                        merged
                    }
                },
            };
            if value != default {
                entries.push((index, value));
            }
        }
        Ok(Self { default, entries })
    }

    fn merge_with(&self, rhs: &Self, op: impl Fn(&W, &W) -> W) -> Self {
        match self.try_merge_with(rhs, |a, b| Ok::<W, std::convert::Infallible>(op(a, b))) {
            Ok(weight) => weight,
            Err(never) => match never {},
        }
    }
}

impl<W: Semiring> Semiring for SparsePowerWeight<W> {
    type Reverse = SparsePowerWeight<W::Reverse>;

    fn zero() -> Self {
        Self::with_default(W::zero())
    }

    fn one() -> Self {
        Self::with_default(W::one())
    }

    fn no_weight() -> Self {
        Self::with_default(W::no_weight())
    }

    fn plus(&self, rhs: &Self) -> Self {
        self.merge_with(rhs, W::plus)
    }

    fn times(&self, rhs: &Self) -> Self {
        self.merge_with(rhs, W::times)
    }

    fn is_member(&self) -> bool {
        self.default.is_member() && self.entries.iter().all(|(_, value)| value.is_member())
    }

    fn quantize(&self, delta: f32) -> Self {
        Self::from_parts(
            self.default.quantize(delta),
            self.iter().map(|(index, value)| (index, value.quantize(delta))),
        )
    }

    fn approx_eq(&self, other: &Self, delta: f32) -> bool {
        self.try_merge_with(other, |a, b| {
            if a.approx_eq(b, delta) {
                Ok(a.clone())
            } else {
                Err(())
            }
        })
        .is_ok()
    }

    fn reverse(&self) -> Self::Reverse {
        SparsePowerWeight::from_parts(
            self.default.reverse(),
            self.iter().map(|(index, value)| (index, value.reverse())),
        )
    }

    fn properties() -> Properties {
        W::properties() & COMPONENTWISE_PROPERTIES
    }

    fn type_name() -> String {
        format!("{}_^n", W::type_name())
    }
}

impl<W: DivisibleSemiring> DivisibleSemiring for SparsePowerWeight<W> {
    fn try_divide(&self, rhs: &Self, divide: DivideType) -> Result<Self, WeightError> {
        self.try_merge_with(rhs, |a, b| a.try_divide(b, divide))
    }
}

impl<W: Semiring + WeightIo> WeightIo for SparsePowerWeight<W> {
    fn write_text(&self, out: &mut TextWriter<'_>) {
        out.open();
        out.element(&self.default);
        for (index, value) in self.iter() {
            out.separator(COMPOSITE_SEPARATOR);
            out.token(&index.to_string());
            out.separator(COMPOSITE_SEPARATOR);
            out.element(value);
        }
        out.close();
    }

    fn read_text(input: &mut TextReader<'_>) -> Result<Self, ParseWeightError> {
        input.open()?;
        let mut weight = Self::with_default(input.element()?);
        while !input.at_group_end() {
            input.separator(COMPOSITE_SEPARATOR)?;
            let token = input.token()?;
            let index = token
                .parse::<usize>()
                .map_err(|_| ParseWeightError::InvalidToken {
                    kind: Self::type_name(),
                    token: token.to_string(),
                })?;
            input.separator(COMPOSITE_SEPARATOR)?;
            let value = input.element()?;
            weight.set_value(index, value);
        }
        input.close()?;
        Ok(weight)
    }

    fn write_binary<Out: Write + ?Sized>(&self, out: &mut Out) -> io::Result<()> {
        self.default.write_binary(out)?;
        write_u64(out, self.entries.len() as u64)?;
        for (index, value) in self.iter() {
            write_u64(out, index as u64)?;
            value.write_binary(out)?;
        }
        Ok(())
    }

    fn read_binary<R: Read + ?Sized>(input: &mut R) -> Result<Self, ParseWeightError> {
        let mut weight = Self::with_default(W::read_binary(input)?);
        let count = read_u64(input)?;
        for _ in 0..count {
            let raw = read_u64(input)?;
            let index = usize::try_from(raw).map_err(|_| ParseWeightError::InvalidBinary {
                kind: Self::type_name(),
                reason: format!("index {raw} out of range"),
            })?;
            let value = W::read_binary(input)?;
            weight.set_value(index, value);
        }
        Ok(weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::{LogWeight, TropicalWeight};
    use crate::io::{from_binary, to_binary, TextFormat};

    fn log(value: f32) -> LogWeight {
        LogWeight::new(value)
    }

    #[test]
    fn test_get_set_value_sequence() {
        let default = log(17.0);
        let mut w = SparsePowerWeight::with_default(log(0.0));
        w.set_default_value(default);

        assert_eq!(*w.value(0), default);
        assert_eq!(*w.value(100), default);

        w.set_value(10, log(10.0));
        assert_eq!(*w.value(10), log(10.0));
        w.set_value(10, log(20.0));
        assert_eq!(*w.value(10), log(20.0));

        w.set_value(5, log(5.0));
        assert_eq!(*w.value(5), log(5.0));
        assert_eq!(*w.value(10), log(20.0));

        w.set_value(30, log(30.0));
        w.set_value(29, log(29.0));
        w.set_value(31, log(31.0));
        assert_eq!(*w.value(5), log(5.0));
        assert_eq!(*w.value(10), log(20.0));
        assert_eq!(*w.value(29), log(29.0));
        assert_eq!(*w.value(30), log(30.0));
        assert_eq!(*w.value(31), log(31.0));

        w.set_value(30, log(60.0));
        assert_eq!(*w.value(30), log(60.0));

        assert_eq!(w.len(), 5);
        w.set_value(30, default);
        assert_eq!(*w.value(30), default);
        assert_eq!(w.len(), 4);

        w.set_value(5, default);
        assert_eq!(*w.value(5), default);
        assert_eq!(w.len(), 3);

        w.set_value(31, default);
        w.set_value(29, default);
        w.set_value(10, default);
        assert!(w.is_empty());
        for index in [5, 10, 29, 30, 31] {
            assert_eq!(*w.value(index), default);
        }
    }

    #[test]
    fn test_entries_stay_sorted() {
        let mut w = SparsePowerWeight::with_default(TropicalWeight::<f32>::zero());
        for index in [7, 3, 9, 1] {
            w.set_value(index, TropicalWeight::new(index as f32));
        }
        let indices: Vec<usize> = w.iter().map(|(index, _)| index).collect();
        assert_eq!(indices, vec![1, 3, 7, 9]);
    }

    #[test]
    fn test_plus_over_union_of_indices() {
        let mut a = SparsePowerWeight::<TropicalWeight>::zero();
        a.set_value(1, TropicalWeight::new(2.0));
        a.set_value(2, TropicalWeight::new(5.0));
        let mut b = SparsePowerWeight::<TropicalWeight>::zero();
        b.set_value(2, TropicalWeight::new(3.0));
        b.set_value(4, TropicalWeight::new(1.0));

        let sum = a.plus(&b);
        assert_eq!(sum.len(), 3);
        assert_eq!(*sum.value(1), TropicalWeight::new(2.0));
        assert_eq!(*sum.value(2), TropicalWeight::new(3.0));
        assert_eq!(*sum.value(4), TropicalWeight::new(1.0));
        assert_eq!(*sum.default_value(), TropicalWeight::zero());

        // Entries that become the new default are dropped.
        let product = a.times(&SparsePowerWeight::zero());
        assert!(product.is_empty());
        assert_eq!(product, SparsePowerWeight::zero());
    }

    #[test]
    fn test_one_times_is_identity() {
        let mut a = SparsePowerWeight::<LogWeight>::zero();
        a.set_value(3, log(1.5));
        assert_eq!(a.times(&SparsePowerWeight::one()), a);
        assert_eq!(a.plus(&SparsePowerWeight::zero()), a);
    }

    #[test]
    fn test_text() {
        let mut w = SparsePowerWeight::<TropicalWeight>::zero();
        w.set_value(2, TropicalWeight::new(1.5));
        w.set_value(0, TropicalWeight::new(3.0));
        assert_eq!(TextFormat::default().print(&w), "Infinity,0,3,2,1.5");
        assert_eq!(TextFormat::with_parentheses().print(&w), "(Infinity,0,3,2,1.5)");
        for format in [TextFormat::default(), TextFormat::with_parentheses()] {
            let text = format.print(&w);
            assert_eq!(format.parse::<SparsePowerWeight<TropicalWeight>>(&text).unwrap(), w);
        }
        let zero = SparsePowerWeight::<TropicalWeight>::zero();
        assert_eq!(TextFormat::default().print(&zero), "Infinity");
    }

    #[test]
    fn test_binary() {
        let mut w = SparsePowerWeight::<LogWeight>::one();
        w.set_value(8, log(0.25));
        assert_eq!(from_binary::<SparsePowerWeight<LogWeight>>(&to_binary(&w)).unwrap(), w);
    }

    #[test]
    fn test_type_name() {
        assert_eq!(SparsePowerWeight::<LogWeight>::type_name(), "log_^n");
    }

    mod merge {
        use super::*;
        use proptest::prelude::*;

        fn sparse(default: i32) -> impl Strategy<Value = SparsePowerWeight<TropicalWeight>> {
            prop::collection::vec((0usize..16, 0i32..6), 0..12).prop_map(move |entries| {
                let mut w = SparsePowerWeight::with_default(TropicalWeight::new(default as f32));
                for (index, value) in entries {
                    w.set_value(index, TropicalWeight::new(value as f32));
                }
                w
            })
        }

        fn assert_canonical(w: &SparsePowerWeight<TropicalWeight>) {
            let indices: Vec<usize> = w.iter().map(|(index, _)| index).collect();
            assert!(indices.windows(2).all(|pair| pair[0] < pair[1]), "{indices:?}");
            assert!(w.iter().all(|(_, value)| value != w.default_value()));
        }

        proptest! {
            #[test]
            fn plus_and_times_are_indexwise(
                (a, b) in (0i32..3, 0i32..3).prop_flat_map(|(da, db)| (sparse(da), sparse(db)))
            ) {
                let sum = a.plus(&b);
                let product = a.times(&b);
                assert_canonical(&sum);
                assert_canonical(&product);
                prop_assert_eq!(*sum.default_value(), a.default_value().plus(b.default_value()));
                prop_assert_eq!(*product.default_value(), a.default_value().times(b.default_value()));
                // Index 100 is past every generated entry and reads the defaults.
                for index in (0..16).chain([100]) {
                    prop_assert_eq!(*sum.value(index), a.value(index).plus(b.value(index)));
                    prop_assert_eq!(*product.value(index), a.value(index).times(b.value(index)));
                }
            }

            #[test]
            fn set_default_value_drops_matching_entries(a in sparse(0), default in 0i32..6) {
                let mut w = a.clone();
                let default = TropicalWeight::new(default as f32);
                w.set_default_value(default);
                assert_canonical(&w);
                for index in 0..16 {
                    if a.iter().any(|(i, _)| i == index) {
                        prop_assert_eq!(w.value(index), a.value(index));
                    } else {
                        prop_assert_eq!(*w.value(index), default);
                    }
                }
            }
        }
    }
}
