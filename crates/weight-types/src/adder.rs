//! Running ⊕-reduction with compensated summation.
//!
//! [`Adder`] reduces a stream of weights one [`add`](Adder::add) at a time.
//! Kinds whose ⊕ is exact (min, max, prefix, union, ...) accumulate with
//! plain ⊕. [`RealWeight`], [`LogWeight`] and [`SignedLogWeight`] carry the
//! running sum in `f64` together with a Kahan error term, so thousands of
//! additions stay within [`DELTA`] of the exact result.
//!
//! # Example
//!
//! ```
//! use weight_types::{Adder, LogWeight, Semiring};
//!
//! let mut adder = Adder::<LogWeight>::new();
//! for _ in 0..1000 {
//!     adder.add(&LogWeight::one());
//! }
//! let expected = -(1000.0f32).ln();
//! assert!((adder.sum().value() - expected).abs() < 1e-4);
//! ```
//!
//! [`DELTA`]: crate::DELTA

use crate::composite::{
    ExpectationWeight, GallicWeight, Lift, LexicographicWeight, PowerWeight,
    ProductWeight, SparsePowerWeight, UnionOptions, UnionWeight,
};
use crate::float::{LogWeight, MinMaxWeight, RealWeight, SignedLogWeight, TropicalWeight};
use crate::scalar::{FloatScalar, Label};
use crate::set::{SetPolicy, SetWeight};
use crate::string::{StringPolicy, StringWeight};
use crate::traits::Semiring;

/// Running state of a reduction over `W`.
pub trait Accumulate<W>: Send {
    /// A reduction holding `initial`.
    fn start(initial: &W) -> Self;

    /// Fold `weight` into the reduction.
    fn add(&mut self, weight: &W);

    /// The current reduction.
    fn sum(&self) -> W;
}

/// Kinds an [`Adder`] can reduce.
pub trait Summable: Semiring {
    type Accumulator: Accumulate<Self>;
}

/// Accumulator applying ⊕ directly.
#[derive(Debug, Clone)]
pub struct PlusAccumulator<W>(W);

impl<W: Semiring> Accumulate<W> for PlusAccumulator<W> {
    fn start(initial: &W) -> Self {
        Self(initial.clone())
    }

    fn add(&mut self, weight: &W) {
        self.0 = self.0.plus(weight);
    }

    fn sum(&self) -> W {
        self.0.clone()
    }
}

/// Kahan summation of [`RealWeight`] values in `f64`.
#[derive(Debug, Clone, Copy)]
pub struct RealAccumulator {
    sum: f64,
    compensation: f64,
}

impl<T: FloatScalar> Accumulate<RealWeight<T>> for RealAccumulator {
    fn start(initial: &RealWeight<T>) -> Self {
        Self {
            sum: initial.value().to_f64(),
            compensation: 0.0,
        }
    }

    fn add(&mut self, weight: &RealWeight<T>) {
        let y = weight.value().to_f64() - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    fn sum(&self) -> RealWeight<T> {
        RealWeight::new(T::from_f64(self.sum))
    }
}

/// Compensated log-sum-exp of [`LogWeight`] values in `f64`.
#[derive(Debug, Clone, Copy)]
pub struct LogAccumulator {
    sum: f64,
    compensation: f64,
}

impl LogAccumulator {
    fn add_value(&mut self, value: f64) {
        if self.sum.is_nan() || value.is_nan() || value == f64::NEG_INFINITY {
            self.sum = f64::NAN;
            return;
        }
        let (lo, hi) = if self.sum <= value {
            (self.sum, value)
        } else {
            (value, self.sum)
        };
        if hi == f64::INFINITY {
            self.sum = lo;
            return;
        }
        let y = -(-(hi - lo)).exp().ln_1p() - self.compensation;
        let t = lo + y;
        self.compensation = (t - lo) - y;
        self.sum = t;
    }
}

impl<T: FloatScalar> Accumulate<LogWeight<T>> for LogAccumulator {
    fn start(initial: &LogWeight<T>) -> Self {
        Self {
            sum: initial.value().to_f64(),
            compensation: 0.0,
        }
    }

    fn add(&mut self, weight: &LogWeight<T>) {
        self.add_value(weight.value().to_f64());
    }

    fn sum(&self) -> LogWeight<T> {
        LogWeight::new(T::from_f64(self.sum))
    }
}

/// Compensated signed log-sum-exp of [`SignedLogWeight`] values in `f64`.
#[derive(Debug, Clone, Copy)]
pub struct SignedLogAccumulator {
    positive: bool,
    sum: f64,
    compensation: f64,
}

impl SignedLogAccumulator {
    fn add_value(&mut self, positive: bool, value: f64) {
        if self.sum.is_nan() || value.is_nan() || value == f64::NEG_INFINITY {
            self.sum = f64::NAN;
            return;
        }
        if value == f64::INFINITY {
            return;
        }
        if self.sum == f64::INFINITY {
            self.positive = positive;
            self.sum = value;
            self.compensation = 0.0;
            return;
        }
        if positive != self.positive && value == self.sum {
            self.positive = true;
            self.sum = f64::INFINITY;
            self.compensation = 0.0;
            return;
        }
        // The smaller log value is the larger magnitude and keeps its sign.
        let (lo, hi, sign) = if self.sum <= value {
            (self.sum, value, self.positive)
        } else {
            (value, self.sum, positive)
        };
        let tail = (-(hi - lo)).exp();
        let y = if positive == self.positive {
            -tail.ln_1p()
        } else {
            -(-tail).ln_1p()
        } - self.compensation;
        let t = lo + y;
        self.compensation = (t - lo) - y;
        self.positive = sign;
        self.sum = t;
    }
}

impl<T: FloatScalar> Accumulate<SignedLogWeight<T>> for SignedLogAccumulator {
    fn start(initial: &SignedLogWeight<T>) -> Self {
        Self {
            positive: initial.is_positive(),
            sum: initial.value().to_f64(),
            compensation: 0.0,
        }
    }

    fn add(&mut self, weight: &SignedLogWeight<T>) {
        self.add_value(weight.is_positive(), weight.value().to_f64());
    }

    fn sum(&self) -> SignedLogWeight<T> {
        SignedLogWeight::new(self.positive, T::from_f64(self.sum))
    }
}

impl<T: FloatScalar> Summable for RealWeight<T> {
    type Accumulator = RealAccumulator;
}

impl<T: FloatScalar> Summable for LogWeight<T> {
    type Accumulator = LogAccumulator;
}

impl<T: FloatScalar> Summable for SignedLogWeight<T> {
    type Accumulator = SignedLogAccumulator;
}

impl<T: FloatScalar> Summable for TropicalWeight<T> {
    type Accumulator = PlusAccumulator<Self>;
}

impl<T: FloatScalar> Summable for MinMaxWeight<T> {
    type Accumulator = PlusAccumulator<Self>;
}

impl<L: Label, P: StringPolicy> Summable for StringWeight<L, P> {
    type Accumulator = PlusAccumulator<Self>;
}

impl<L: Label, P: SetPolicy> Summable for SetWeight<L, P> {
    type Accumulator = PlusAccumulator<Self>;
}

impl<W1: Semiring, W2: Semiring> Summable for ProductWeight<W1, W2> {
    type Accumulator = PlusAccumulator<Self>;
}

impl<W: Semiring, const N: usize> Summable for PowerWeight<W, N> {
    type Accumulator = PlusAccumulator<Self>;
}

impl<W: Semiring> Summable for SparsePowerWeight<W> {
    type Accumulator = PlusAccumulator<Self>;
}

impl<W1: Semiring, W2: Semiring> Summable for LexicographicWeight<W1, W2> {
    type Accumulator = PlusAccumulator<Self>;
}

impl<W: Semiring, O: UnionOptions<W>> Summable for UnionWeight<W, O> {
    type Accumulator = PlusAccumulator<Self>;
}

impl<L: Label, W: Semiring, P: StringPolicy> Summable for GallicWeight<L, W, P> {
    type Accumulator = PlusAccumulator<Self>;
}

impl<W1, W2> Summable for ExpectationWeight<W1, W2>
where
    W1: Semiring<Reverse = W1>,
    W2: Semiring<Reverse = W2> + Lift<W1>,
{
    type Accumulator = PlusAccumulator<Self>;
}

/// Accumulates a ⊕-reduction one weight at a time.
///
/// One adder serves one reduction; partial sums from several adders
/// combine with ⊕.
pub struct Adder<W: Summable> {
    accumulator: W::Accumulator,
}

impl<W: Summable> Adder<W> {
    /// An adder holding Zero.
    pub fn new() -> Self {
        Self::with_initial(&W::zero())
    }

    /// An adder holding `initial`.
    pub fn with_initial(initial: &W) -> Self {
        Self {
            accumulator: W::Accumulator::start(initial),
        }
    }

    /// Fold `weight` into the sum and return the new sum.
    pub fn add(&mut self, weight: &W) -> W {
        self.accumulator.add(weight);
        self.accumulator.sum()
    }

    /// The current sum.
    pub fn sum(&self) -> W {
        self.accumulator.sum()
    }

    /// Restart from `initial`, dropping any accumulated error term.
    pub fn reset(&mut self, initial: &W) {
        tracing::trace!(kind = %W::type_name(), "adder reset");
        self.accumulator = W::Accumulator::start(initial);
    }
}

impl<W: Summable> Default for Adder<W> {
    fn default() -> Self {
        Self::new()
    }
}
