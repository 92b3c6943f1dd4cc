//! Weights over finite label sets.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;
use std::io::{self, Read, Write};
use std::marker::PhantomData;

use crate::error::ParseWeightError;
use crate::io::{read_i64, write_i64, TextReader, TextWriter, LABEL_SEPARATOR};
use crate::scalar::Label;
use crate::traits::{Properties, Semiring, WeightIo};

const EMPTY_TOKEN: &str = "EmptySet";
const UNIVERSAL_TOKEN: &str = "UnivSet";
const BAD_TOKEN: &str = "BadSet";

const UNIVERSAL_COUNT: i64 = -1;
const BAD_COUNT: i64 = -2;

/// How ⊕ and ⊗ act on sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetKind {
    /// ⊕ = ∪, ⊗ = ∩; Zero = ∅, One = universal.
    UnionIntersect,
    /// ⊕ = ∩, ⊗ = ∪; Zero = universal, One = ∅.
    IntersectUnion,
    /// ∪/∩ restricted to {∅, universal}.
    Boolean,
}

/// Type-level selector of a [`SetKind`].
pub trait SetPolicy: Copy + Clone + fmt::Debug + Default + Eq + Hash + Send + Sync + 'static {
    /// Type name of the set weight under this policy.
    const NAME: &'static str;

    /// The combination rule.
    const KIND: SetKind;
}

/// ⊕ = ∪, ⊗ = ∩.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct UnionIntersect;

/// ⊕ = ∩, ⊗ = ∪.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IntersectUnion;

/// ∪/∩ over the two-element lattice {∅, universal}.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BooleanSet;

impl SetPolicy for UnionIntersect {
    const NAME: &'static str = "union_intersect_set";
    const KIND: SetKind = SetKind::UnionIntersect;
}

impl SetPolicy for IntersectUnion {
    const NAME: &'static str = "intersect_union_set";
    const KIND: SetKind = SetKind::IntersectUnion;
}

impl SetPolicy for BooleanSet {
    const NAME: &'static str = "boolean_set";
    const KIND: SetKind = SetKind::Boolean;
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) enum SetRepr<L: Label> {
    Finite(BTreeSet<L>),
    Universal,
    Bad,
}

impl<L: Label> SetRepr<L> {
    fn union(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            (Self::Bad, _) | (_, Self::Bad) => Self::Bad,
            (Self::Universal, _) | (_, Self::Universal) => Self::Universal,
            (Self::Finite(a), Self::Finite(b)) => Self::Finite(a.union(b).copied().collect()),
        }
    }

    fn intersection(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            (Self::Bad, _) | (_, Self::Bad) => Self::Bad,
            (Self::Universal, other) | (other, Self::Universal) => other.clone(),
            (Self::Finite(a), Self::Finite(b)) => {
                Self::Finite(a.intersection(b).copied().collect())
            }
        }
    }
}

/// Set semiring over labels `L`.
///
/// Zero and One are the identities of the policy's ⊕ and ⊗. Equality is
/// exact set equality.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SetWeight<L: Label = i32, P: SetPolicy = UnionIntersect> {
    repr: SetRepr<L>,
    _policy: PhantomData<P>,
}

/// [`SetWeight`] with ⊕ = ∪.
pub type UnionIntersectSetWeight<L = i32> = SetWeight<L, UnionIntersect>;

/// [`SetWeight`] with ⊕ = ∩.
pub type IntersectUnionSetWeight<L = i32> = SetWeight<L, IntersectUnion>;

/// [`SetWeight`] restricted to {∅, universal}.
pub type BooleanSetWeight<L = i32> = SetWeight<L, BooleanSet>;

impl<L: Label, P: SetPolicy> SetWeight<L, P> {
    pub(crate) fn from_repr(repr: SetRepr<L>) -> Self {
        Self {
            repr,
            _policy: PhantomData,
        }
    }

    pub(crate) fn repr(&self) -> &SetRepr<L> {
        &self.repr
    }

    /// A finite set.
    pub fn from_elements<I: IntoIterator<Item = L>>(elements: I) -> Self {
        Self::from_repr(SetRepr::Finite(elements.into_iter().collect()))
    }

    /// The empty set.
    pub fn empty() -> Self {
        Self::from_repr(SetRepr::Finite(BTreeSet::new()))
    }

    /// The universal set.
    pub fn universal() -> Self {
        Self::from_repr(SetRepr::Universal)
    }

    /// The elements of a finite set, `None` for the universal set and the
    /// no-weight sentinel.
    pub fn elements(&self) -> Option<&BTreeSet<L>> {
        match &self.repr {
            SetRepr::Finite(elements) => Some(elements),
            _ => None,
        }
    }

    /// Whether this is the universal set.
    pub fn is_universal(&self) -> bool {
        matches!(self.repr, SetRepr::Universal)
    }

    /// Whether this is the empty set.
    pub fn is_empty_set(&self) -> bool {
        self.elements().is_some_and(BTreeSet::is_empty)
    }
}

impl<L: Label, P: SetPolicy> Semiring for SetWeight<L, P> {
    type Reverse = Self;

    fn zero() -> Self {
        match P::KIND {
            SetKind::IntersectUnion => Self::universal(),
            SetKind::UnionIntersect | SetKind::Boolean => Self::empty(),
        }
    }

    fn one() -> Self {
        match P::KIND {
            SetKind::IntersectUnion => Self::empty(),
            SetKind::UnionIntersect | SetKind::Boolean => Self::universal(),
        }
    }

    fn no_weight() -> Self {
        Self::from_repr(SetRepr::Bad)
    }

    fn plus(&self, rhs: &Self) -> Self {
        match P::KIND {
            SetKind::IntersectUnion => Self::from_repr(self.repr.intersection(&rhs.repr)),
            SetKind::UnionIntersect | SetKind::Boolean => {
                Self::from_repr(self.repr.union(&rhs.repr))
            }
        }
    }

    fn times(&self, rhs: &Self) -> Self {
        match P::KIND {
            SetKind::IntersectUnion => Self::from_repr(self.repr.union(&rhs.repr)),
            SetKind::UnionIntersect | SetKind::Boolean => {
                Self::from_repr(self.repr.intersection(&rhs.repr))
            }
        }
    }

    fn is_member(&self) -> bool {
        match &self.repr {
            SetRepr::Bad => false,
            SetRepr::Universal => true,
            SetRepr::Finite(elements) => P::KIND != SetKind::Boolean || elements.is_empty(),
        }
    }

    fn quantize(&self, _delta: f32) -> Self {
        self.clone()
    }

    fn approx_eq(&self, other: &Self, _delta: f32) -> bool {
        self == other
    }

    fn reverse(&self) -> Self {
        self.clone()
    }

    fn properties() -> Properties {
        let props = Properties::SEMIRING | Properties::COMMUTATIVE | Properties::IDEMPOTENT;
        if P::KIND == SetKind::Boolean {
            props | Properties::PATH
        } else {
            props
        }
    }

    fn type_name() -> String {
        P::NAME.to_string()
    }
}

impl<L: Label, P: SetPolicy> Default for SetWeight<L, P> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<L: Label, P: SetPolicy> fmt::Display for SetWeight<L, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            SetRepr::Universal => f.write_str(UNIVERSAL_TOKEN),
            SetRepr::Bad => f.write_str(BAD_TOKEN),
            SetRepr::Finite(elements) if elements.is_empty() => f.write_str(EMPTY_TOKEN),
            SetRepr::Finite(elements) => {
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{LABEL_SEPARATOR}")?;
                    }
                    write!(f, "{element}")?;
                }
                Ok(())
            }
        }
    }
}

impl<L: Label, P: SetPolicy> fmt::Debug for SetWeight<L, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SetWeight<{}>({})", P::NAME, self)
    }
}

impl<L: Label, P: SetPolicy> WeightIo for SetWeight<L, P> {
    fn write_text(&self, out: &mut TextWriter<'_>) {
        out.token(&self.to_string());
    }

    fn read_text(input: &mut TextReader<'_>) -> Result<Self, ParseWeightError> {
        let token = input.token()?;
        match token {
            EMPTY_TOKEN => Ok(Self::empty()),
            UNIVERSAL_TOKEN => Ok(Self::universal()),
            BAD_TOKEN => Ok(Self::no_weight()),
            _ => token
                .split(LABEL_SEPARATOR)
                .map(|element| element.parse::<L>())
                .collect::<Result<BTreeSet<L>, _>>()
                .map(|elements| Self::from_repr(SetRepr::Finite(elements)))
                .map_err(|_| ParseWeightError::InvalidToken {
                    kind: Self::type_name(),
                    token: token.to_string(),
                }),
        }
    }

    fn write_binary<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        match &self.repr {
            SetRepr::Universal => write_i64(out, UNIVERSAL_COUNT),
            SetRepr::Bad => write_i64(out, BAD_COUNT),
            SetRepr::Finite(elements) => {
                write_i64(out, elements.len() as i64)?;
                for element in elements {
                    write_i64(out, element.to_i64())?;
                }
                Ok(())
            }
        }
    }

    fn read_binary<R: Read + ?Sized>(input: &mut R) -> Result<Self, ParseWeightError> {
        match read_i64(input)? {
            UNIVERSAL_COUNT => Ok(Self::universal()),
            BAD_COUNT => Ok(Self::no_weight()),
            count if count < 0 => Err(ParseWeightError::InvalidBinary {
                kind: Self::type_name(),
                reason: format!("element count {count}"),
            }),
            count => {
                let mut elements = BTreeSet::new();
                for _ in 0..count {
                    let raw = read_i64(input)?;
                    let element = L::from_i64(raw).ok_or_else(|| ParseWeightError::InvalidBinary {
                        kind: Self::type_name(),
                        reason: format!("element {raw} out of range"),
                    })?;
                    elements.insert(element);
                }
                Ok(Self::from_repr(SetRepr::Finite(elements)))
            }
        }
    }
}
