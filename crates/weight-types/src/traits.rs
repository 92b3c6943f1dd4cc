use std::fmt::Debug;
use std::hash::Hash;
use std::io::{self, Read, Write};

use bitflags::bitflags;

use crate::error::{ParseWeightError, WeightError};
use crate::io::{TextReader, TextWriter};

/// Default tolerance for [`Semiring::approx_eq`] and [`Semiring::quantize`].
pub const DELTA: f32 = 1.0 / 1024.0;

bitflags! {
    /// Algebraic properties a weight kind declares about itself.
    ///
    /// The conformance tester checks exactly the axioms a kind declares.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Properties: u32 {
        /// ⊗ distributes over ⊕ from the left: a ⊗ (b ⊕ c) = a ⊗ b ⊕ a ⊗ c.
        const LEFT_SEMIRING  = 1 << 0;
        /// ⊗ distributes over ⊕ from the right: (a ⊕ b) ⊗ c = a ⊗ c ⊕ b ⊗ c.
        const RIGHT_SEMIRING = 1 << 1;
        /// ⊗ is commutative.
        const COMMUTATIVE    = 1 << 2;
        /// a ⊕ a = a.
        const IDEMPOTENT     = 1 << 3;
        /// a ⊕ b ∈ {a, b}: the natural order is total.
        const PATH           = 1 << 4;

        const SEMIRING = Self::LEFT_SEMIRING.bits() | Self::RIGHT_SEMIRING.bits();
    }
}

/// Which side a divisor is removed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DivideType {
    /// `q` such that `rhs ⊗ q = lhs`.
    Left,
    /// `q` such that `q ⊗ rhs = lhs`.
    Right,
    /// Either side; only meaningful for commutative kinds.
    Any,
}

/// A semiring `(K, ⊕, ⊗, 0, 1)` of weight values.
///
/// Properties required:
/// - `(K, ⊕, 0)` is a commutative monoid
/// - `(K, ⊗, 1)` is a monoid
/// - `0` annihilates: `a ⊗ 0 = 0 ⊗ a = 0`
/// - distributivity as declared by [`Semiring::properties`]
///
/// `PartialEq` is exact equality on canonicalised values, which keeps it
/// reflexive and consistent with `Hash`. Tolerance-based comparison is
/// [`Semiring::approx_eq`].
pub trait Semiring: Clone + Debug + Eq + Hash + Send + Sync + 'static {
    /// The kind holding reversed values (identical for commutative kinds).
    type Reverse: Semiring;

    /// Additive identity.
    fn zero() -> Self;

    /// Multiplicative identity.
    fn one() -> Self;

    /// Sentinel for invalid values, e.g. the result of a failed parse.
    fn no_weight() -> Self;

    /// Semiring addition (⊕).
    fn plus(&self, rhs: &Self) -> Self;

    /// Semiring multiplication (⊗). Argument order matters for
    /// non-commutative kinds.
    fn times(&self, rhs: &Self) -> Self;

    /// Whether this is a valid element (not the no-weight sentinel).
    fn is_member(&self) -> bool;

    /// Whether this is the additive identity.
    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Whether this is the multiplicative identity.
    fn is_one(&self) -> bool {
        *self == Self::one()
    }

    /// Round to a representative of the `delta`-sized bucket.
    fn quantize(&self, delta: f32) -> Self;

    /// Equality up to `delta`.
    fn approx_eq(&self, other: &Self, delta: f32) -> bool;

    /// The reversed value, used when reading paths right to left.
    fn reverse(&self) -> Self::Reverse;

    /// The algebraic properties this kind satisfies.
    fn properties() -> Properties;

    /// Canonical name, unique per family and element precision.
    fn type_name() -> String;
}

/// Kinds where ⊗ can be undone.
pub trait DivisibleSemiring: Semiring {
    /// Divide `self` by `rhs`, reporting contract violations.
    fn try_divide(&self, rhs: &Self, divide: DivideType) -> Result<Self, WeightError>;

    /// Divide `self` by `rhs`.
    ///
    /// # Panics
    ///
    /// Panics on a contract violation (division by zero, no quotient, or an
    /// unsupported division side).
    fn divide(&self, rhs: &Self, divide: DivideType) -> Self {
        self.try_divide(rhs, divide)
            .unwrap_or_else(|err| panic!("{err}"))
    }
}

/// Text and binary serialization.
pub trait WeightIo: Sized {
    /// Render as text.
    fn write_text(&self, out: &mut TextWriter<'_>);

    /// Parse from text.
    fn read_text(input: &mut TextReader<'_>) -> Result<Self, ParseWeightError>;

    /// Fixed-order binary encoding.
    fn write_binary<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()>;

    /// Decode the binary encoding.
    fn read_binary<R: Read + ?Sized>(input: &mut R) -> Result<Self, ParseWeightError>;
}

/// Everything a weight kind needs to plug into composites and the tester.
pub trait Weight: Semiring + WeightIo {}

impl<W: Semiring + WeightIo> Weight for W {}

/// The order induced by an idempotent ⊕: `a < b ⇔ a ⊕ b = a ∧ a ≠ b`.
///
/// # Panics
///
/// Panics if `W` does not declare [`Properties::IDEMPOTENT`].
pub fn natural_less<W: Semiring>(lhs: &W, rhs: &W) -> bool {
    assert!(
        W::properties().contains(Properties::IDEMPOTENT),
        "natural order requires an idempotent semiring, {} is not",
        W::type_name()
    );
    lhs != rhs && lhs.plus(rhs) == *lhs
}
