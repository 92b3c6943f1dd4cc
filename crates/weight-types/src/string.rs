//! Weights over label sequences.

use std::fmt;
use std::hash::Hash;
use std::io::{self, Read, Write};
use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::error::{ParseWeightError, WeightError};
use crate::io::{read_i64, write_i64, TextReader, TextWriter, LABEL_SEPARATOR};
use crate::scalar::Label;
use crate::traits::{DivideType, DivisibleSemiring, Properties, Semiring, WeightIo};

const ZERO_TOKEN: &str = "Infinity";
const ONE_TOKEN: &str = "Epsilon";
const BAD_TOKEN: &str = "BadString";

const ZERO_COUNT: i64 = -1;
const BAD_COUNT: i64 = -2;

/// How ⊕ combines two label sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    /// Longest common prefix.
    Left,
    /// Longest common suffix.
    Right,
    /// Operands must be identical.
    Restrict,
}

/// Type-level selector of a [`StringKind`].
pub trait StringPolicy: Copy + Clone + fmt::Debug + Default + Eq + Hash + Send + Sync + 'static {
    /// Type name of the string weight under this policy.
    const NAME: &'static str;

    /// The combination rule.
    const KIND: StringKind;

    /// Policy of the reversed weight.
    type Reverse: StringPolicy;
}

/// ⊕ is the longest common prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LeftString;

/// ⊕ is the longest common suffix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RightString;

/// ⊕ requires identical operands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RestrictString;

impl StringPolicy for LeftString {
    const NAME: &'static str = "left_string";
    const KIND: StringKind = StringKind::Left;
    type Reverse = RightString;
}

impl StringPolicy for RightString {
    const NAME: &'static str = "right_string";
    const KIND: StringKind = StringKind::Right;
    type Reverse = LeftString;
}

impl StringPolicy for RestrictString {
    const NAME: &'static str = "restricted_string";
    const KIND: StringKind = StringKind::Restrict;
    type Reverse = RestrictString;
}

#[derive(Clone, PartialEq, Eq, Hash)]
enum Repr<L: Label> {
    Labels(SmallVec<[L; 4]>),
    Infinity,
    Bad,
}

/// String semiring over labels `L`.
///
/// - Addition (⊕) = longest common prefix / suffix, or restrict
/// - Multiplication (⊗) = concatenation (not commutative)
/// - Zero = the infinite string, absorbing under ⊗
/// - One = the empty string
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StringWeight<L: Label = i32, P: StringPolicy = LeftString> {
    repr: Repr<L>,
    _policy: PhantomData<P>,
}

/// [`StringWeight`] with longest-common-prefix ⊕.
pub type LeftStringWeight<L = i32> = StringWeight<L, LeftString>;

/// [`StringWeight`] with longest-common-suffix ⊕.
pub type RightStringWeight<L = i32> = StringWeight<L, RightString>;

/// [`StringWeight`] with restricted ⊕.
pub type RestrictStringWeight<L = i32> = StringWeight<L, RestrictString>;

impl<L: Label, P: StringPolicy> StringWeight<L, P> {
    fn from_repr(repr: Repr<L>) -> Self {
        Self {
            repr,
            _policy: PhantomData,
        }
    }

    /// A weight holding `labels` in order.
    pub fn from_labels<I: IntoIterator<Item = L>>(labels: I) -> Self {
        Self::from_repr(Repr::Labels(labels.into_iter().collect()))
    }

    /// A single-label weight.
    pub fn from_label(label: L) -> Self {
        Self::from_labels([label])
    }

    /// The labels, or `None` for Zero and the no-weight sentinel.
    pub fn labels(&self) -> Option<&[L]> {
        match &self.repr {
            Repr::Labels(labels) => Some(labels),
            _ => None,
        }
    }

    /// Number of labels; Zero and the no-weight sentinel have none.
    pub fn len(&self) -> usize {
        self.labels().map_or(0, <[L]>::len)
    }

    /// Whether this is the empty string (One).
    pub fn is_empty(&self) -> bool {
        self.labels().is_some_and(<[L]>::is_empty)
    }

    /// `⊕` reporting a restrict-mode mismatch instead of panicking.
    pub fn try_plus(&self, rhs: &Self) -> Result<Self, WeightError> {
        let (lhs_labels, rhs_labels) = match (&self.repr, &rhs.repr) {
            (Repr::Bad, _) | (_, Repr::Bad) => return Ok(Self::no_weight()),
            (Repr::Infinity, _) => return Ok(rhs.clone()),
            (_, Repr::Infinity) => return Ok(self.clone()),
            (Repr::Labels(a), Repr::Labels(b)) => (a, b),
        };
        let labels = match P::KIND {
            StringKind::Left => lhs_labels
                .iter()
                .zip(rhs_labels.iter())
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| *a)
                .collect(),
            StringKind::Right => {
                let mut suffix: SmallVec<[L; 4]> = lhs_labels
                    .iter()
                    .rev()
                    .zip(rhs_labels.iter().rev())
                    .take_while(|(a, b)| a == b)
                    .map(|(a, _)| *a)
                    .collect();
                suffix.reverse();
                suffix
            }
            StringKind::Restrict => {
                if lhs_labels != rhs_labels {
                    return Err(WeightError::RestrictMismatch {
                        kind: Self::type_name(),
                        lhs: self.to_string(),
                        rhs: rhs.to_string(),
                    });
                }
                lhs_labels.clone()
            }
        };
        Ok(Self::from_repr(Repr::Labels(labels)))
    }
}

impl<L: Label, P: StringPolicy> Semiring for StringWeight<L, P> {
    type Reverse = StringWeight<L, P::Reverse>;

    fn zero() -> Self {
        Self::from_repr(Repr::Infinity)
    }

    fn one() -> Self {
        Self::from_repr(Repr::Labels(SmallVec::new()))
    }

    fn no_weight() -> Self {
        Self::from_repr(Repr::Bad)
    }

    /// # Panics
    ///
    /// Panics under [`RestrictString`] when the operands differ.
    fn plus(&self, rhs: &Self) -> Self {
        self.try_plus(rhs).unwrap_or_else(|err| panic!("{err}"))
    }

    fn times(&self, rhs: &Self) -> Self {
        match (&self.repr, &rhs.repr) {
            (Repr::Bad, _) | (_, Repr::Bad) => Self::no_weight(),
            (Repr::Infinity, _) | (_, Repr::Infinity) => Self::zero(),
            (Repr::Labels(a), Repr::Labels(b)) => {
                Self::from_labels(a.iter().chain(b.iter()).copied())
            }
        }
    }

    fn is_member(&self) -> bool {
        !matches!(self.repr, Repr::Bad)
    }

    fn quantize(&self, _delta: f32) -> Self {
        self.clone()
    }

    fn approx_eq(&self, other: &Self, _delta: f32) -> bool {
        self == other
    }

    fn reverse(&self) -> Self::Reverse {
        match &self.repr {
            Repr::Labels(labels) => StringWeight::from_labels(labels.iter().rev().copied()),
            Repr::Infinity => StringWeight::zero(),
            Repr::Bad => StringWeight::no_weight(),
        }
    }

    fn properties() -> Properties {
        let side = match P::KIND {
            StringKind::Left => Properties::LEFT_SEMIRING,
            StringKind::Right => Properties::RIGHT_SEMIRING,
            StringKind::Restrict => Properties::SEMIRING,
        };
        side | Properties::IDEMPOTENT
    }

    fn type_name() -> String {
        P::NAME.to_string()
    }
}

impl<L: Label, P: StringPolicy> DivisibleSemiring for StringWeight<L, P> {
    fn try_divide(&self, rhs: &Self, divide: DivideType) -> Result<Self, WeightError> {
        let side = match (P::KIND, divide) {
            (StringKind::Left, DivideType::Right) | (StringKind::Right, DivideType::Left) => {
                return Err(WeightError::UnsupportedDivide {
                    kind: Self::type_name(),
                    divide,
                })
            }
            (StringKind::Right, _) | (StringKind::Restrict, DivideType::Right) => {
                DivideType::Right
            }
            _ => DivideType::Left,
        };
        let (lhs_labels, rhs_labels) = match (&self.repr, &rhs.repr) {
            (Repr::Bad, _) | (_, Repr::Bad) => return Ok(Self::no_weight()),
            (_, Repr::Infinity) => return Err(WeightError::DivideByZero(Self::type_name())),
            (Repr::Infinity, _) => return Ok(Self::zero()),
            (Repr::Labels(a), Repr::Labels(b)) => (a, b),
        };
        let quotient = if side == DivideType::Left {
            lhs_labels.strip_prefix(rhs_labels.as_slice())
        } else {
            lhs_labels.strip_suffix(rhs_labels.as_slice())
        };
        quotient
            .map(|labels| Self::from_labels(labels.iter().copied()))
            .ok_or_else(|| WeightError::NoQuotient {
                kind: Self::type_name(),
                lhs: self.to_string(),
                rhs: rhs.to_string(),
            })
    }
}

impl<L: Label, P: StringPolicy> Default for StringWeight<L, P> {
    fn default() -> Self {
        Self::one()
    }
}

impl<L: Label, P: StringPolicy> fmt::Display for StringWeight<L, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Infinity => f.write_str(ZERO_TOKEN),
            Repr::Bad => f.write_str(BAD_TOKEN),
            Repr::Labels(labels) if labels.is_empty() => f.write_str(ONE_TOKEN),
            Repr::Labels(labels) => {
                for (i, label) in labels.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{LABEL_SEPARATOR}")?;
                    }
                    write!(f, "{label}")?;
                }
                Ok(())
            }
        }
    }
}

impl<L: Label, P: StringPolicy> fmt::Debug for StringWeight<L, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringWeight<{}>({})", P::NAME, self)
    }
}

impl<L: Label, P: StringPolicy> WeightIo for StringWeight<L, P> {
    fn write_text(&self, out: &mut TextWriter<'_>) {
        out.token(&self.to_string());
    }

    fn read_text(input: &mut TextReader<'_>) -> Result<Self, ParseWeightError> {
        let token = input.token()?;
        match token {
            ZERO_TOKEN => Ok(Self::zero()),
            ONE_TOKEN => Ok(Self::one()),
            BAD_TOKEN => Ok(Self::no_weight()),
            _ => token
                .split(LABEL_SEPARATOR)
                .map(|label| label.parse::<L>())
                .collect::<Result<SmallVec<[L; 4]>, _>>()
                .map(|labels| Self::from_repr(Repr::Labels(labels)))
                .map_err(|_| ParseWeightError::InvalidToken {
                    kind: Self::type_name(),
                    token: token.to_string(),
                }),
        }
    }

    fn write_binary<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        match &self.repr {
            Repr::Infinity => write_i64(out, ZERO_COUNT),
            Repr::Bad => write_i64(out, BAD_COUNT),
            Repr::Labels(labels) => {
                write_i64(out, labels.len() as i64)?;
                for label in labels {
                    write_i64(out, label.to_i64())?;
                }
                Ok(())
            }
        }
    }

    fn read_binary<R: Read + ?Sized>(input: &mut R) -> Result<Self, ParseWeightError> {
        match read_i64(input)? {
            ZERO_COUNT => Ok(Self::zero()),
            BAD_COUNT => Ok(Self::no_weight()),
            count if count < 0 => Err(ParseWeightError::InvalidBinary {
                kind: Self::type_name(),
                reason: format!("label count {count}"),
            }),
            count => {
                let mut labels = SmallVec::new();
                for _ in 0..count {
                    let raw = read_i64(input)?;
                    let label = L::from_i64(raw).ok_or_else(|| ParseWeightError::InvalidBinary {
                        kind: Self::type_name(),
                        reason: format!("label {raw} out of range"),
                    })?;
                    labels.push(label);
                }
                Ok(Self::from_repr(Repr::Labels(labels)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{from_binary, to_binary, TextFormat};

    #[test]
    fn test_left_plus_is_common_prefix() {
        let a = LeftStringWeight::from_labels([1, 2, 3]);
        let b = LeftStringWeight::from_labels([1, 2, 4]);
        assert_eq!(a.plus(&b), LeftStringWeight::from_labels([1, 2]));
        assert_eq!(a.plus(&LeftStringWeight::zero()), a);
    }

    #[test]
    fn test_right_plus_is_common_suffix() {
        let a = RightStringWeight::from_labels([1, 2, 3]);
        let b = RightStringWeight::from_labels([4, 2, 3]);
        assert_eq!(a.plus(&b), RightStringWeight::from_labels([2, 3]));
    }

    #[test]
    fn test_times_concatenates() {
        let a = LeftStringWeight::from_labels([1, 2]);
        let b = LeftStringWeight::from_labels([3]);
        assert_eq!(a.times(&b), LeftStringWeight::from_labels([1, 2, 3]));
        assert_eq!(b.times(&a), LeftStringWeight::from_labels([3, 1, 2]));
        assert_eq!(a.times(&LeftStringWeight::zero()), LeftStringWeight::zero());
        assert_eq!(a.times(&LeftStringWeight::one()), a);
    }

    #[test]
    fn test_restrict_plus_requires_equal() {
        let a = RestrictStringWeight::from_labels([1, 2]);
        assert_eq!(a.plus(&a), a);
        let b = RestrictStringWeight::from_labels([1]);
        assert!(matches!(
            a.try_plus(&b),
            Err(WeightError::RestrictMismatch { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "restricted operands differ")]
    fn test_restrict_plus_panics() {
        let a = RestrictStringWeight::from_labels([1, 2]);
        let b = RestrictStringWeight::from_labels([2, 1]);
        let _ = a.plus(&b);
    }

    #[test]
    fn test_divide() {
        let w = LeftStringWeight::from_labels([1, 2, 3]);
        let prefix = LeftStringWeight::from_labels([1]);
        assert_eq!(
            w.divide(&prefix, DivideType::Left),
            LeftStringWeight::from_labels([2, 3])
        );
        assert!(matches!(
            w.try_divide(&LeftStringWeight::from_label(2), DivideType::Left),
            Err(WeightError::NoQuotient { .. })
        ));
        assert!(matches!(
            w.try_divide(&prefix, DivideType::Right),
            Err(WeightError::UnsupportedDivide { .. })
        ));

        let w = RightStringWeight::from_labels([1, 2, 3]);
        assert_eq!(
            w.divide(&RightStringWeight::from_labels([2, 3]), DivideType::Any),
            RightStringWeight::from_label(1)
        );
    }

    #[test]
    fn test_reverse() {
        let w = LeftStringWeight::from_labels([1, 2, 3]);
        let r: RightStringWeight = w.reverse();
        assert_eq!(r, RightStringWeight::from_labels([3, 2, 1]));
        assert_eq!(r.reverse(), w);
    }

    #[test]
    fn test_text() {
        let format = TextFormat::default();
        assert_eq!(format.print(&LeftStringWeight::<i32>::zero()), "Infinity");
        assert_eq!(format.print(&LeftStringWeight::<i32>::one()), "Epsilon");
        let w = LeftStringWeight::from_labels([1, 22, 3]);
        assert_eq!(format.print(&w), "1_22_3");
        assert_eq!(format.parse::<LeftStringWeight>("1_22_3").unwrap(), w);
        assert!(format.parse::<LeftStringWeight>("1__3").is_err());
    }

    #[test]
    fn test_binary() {
        for w in [
            LeftStringWeight::from_labels([5, 6]),
            LeftStringWeight::zero(),
            LeftStringWeight::one(),
            LeftStringWeight::no_weight(),
        ] {
            assert_eq!(from_binary::<LeftStringWeight>(&to_binary(&w)).unwrap(), w);
        }
    }

    #[test]
    fn test_properties_and_names() {
        assert_eq!(
            LeftStringWeight::<i32>::properties(),
            Properties::LEFT_SEMIRING | Properties::IDEMPOTENT
        );
        assert_eq!(RightStringWeight::<i32>::type_name(), "right_string");
        assert_eq!(RestrictStringWeight::<i32>::type_name(), "restricted_string");
    }
}
