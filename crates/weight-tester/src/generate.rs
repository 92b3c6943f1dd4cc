//! Seeded random weights.
//!
//! Every weight kind gets a [`RandomWeight`] impl; composites draw their
//! components recursively. A [`WeightGenerator`] owns its own `StdRng`, so a
//! given seed always produces the same sequence.

use std::array;
use std::marker::PhantomData;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use weight_types::{
    ExpectationWeight, FloatScalar, GallicWeight, Label, LexicographicWeight, Lift, LogWeight,
    MinMaxWeight, PowerWeight, ProductWeight, RealWeight, Semiring, SetKind, SetPolicy,
    SetWeight, SignedLogWeight, SparsePowerWeight, StringPolicy, StringWeight, TropicalWeight,
    UnionOptions, UnionWeight,
};

/// Shape of the generated weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Whether Zero may be drawn.
    pub allow_zero: bool,
    /// Number of distinct scalar values and labels.
    pub num_random_weights: usize,
    /// Longest generated label string.
    pub max_string_length: usize,
    /// Number of indices populated in a sparse power weight.
    pub sparse_power_rank: usize,
    /// Most terms in a generated union.
    pub max_union_terms: usize,
    /// Largest generated finite set.
    pub max_set_length: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            allow_zero: true,
            num_random_weights: 5,
            max_string_length: 5,
            sparse_power_rank: 3,
            max_union_terms: 3,
            max_set_length: 5,
        }
    }
}

impl GenerateOptions {
    /// The same options with Zero excluded.
    pub fn without_zero(self) -> Self {
        Self {
            allow_zero: false,
            ..self
        }
    }

    /// The same options with Zero allowed or not.
    pub fn with_allow_zero(self, allow_zero: bool) -> Self {
        Self { allow_zero, ..self }
    }

    /// Draw from `0..=max`; `None` stands for Zero when it is allowed and
    /// the top value came up.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, max: usize) -> Option<usize> {
        let sample = rng.gen_range(0..=max);
        if self.allow_zero && sample == max {
            None
        } else {
            Some(sample)
        }
    }

    fn label<L: Label, R: Rng + ?Sized>(&self, rng: &mut R) -> L {
        L::from_usize(rng.gen_range(1..=self.num_random_weights.max(1)))
    }
}

/// A weight kind that can be drawn at random.
pub trait RandomWeight: Semiring {
    fn random<R: Rng + ?Sized>(rng: &mut R, options: &GenerateOptions) -> Self;
}

/// Deterministic stream of random weights of kind `W`.
pub struct WeightGenerator<W> {
    rng: StdRng,
    seed: u64,
    options: GenerateOptions,
    _weight: PhantomData<fn() -> W>,
}

impl<W: RandomWeight> WeightGenerator<W> {
    /// Generator with default options.
    pub fn new(seed: u64) -> Self {
        Self::with_options(seed, GenerateOptions::default())
    }

    pub fn with_options(seed: u64, options: GenerateOptions) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            options,
            _weight: PhantomData,
        }
    }

    /// Seed the stream started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Draw the next weight.
    pub fn generate(&mut self) -> W {
        W::random(&mut self.rng, &self.options)
    }
}

impl<W: RandomWeight> Iterator for WeightGenerator<W> {
    type Item = W;

    fn next(&mut self) -> Option<W> {
        Some(self.generate())
    }
}

macro_rules! impl_random_float {
    ($($name:ident),*) => {
        $(
            impl<T: FloatScalar> RandomWeight for $name<T> {
                fn random<R: Rng + ?Sized>(rng: &mut R, options: &GenerateOptions) -> Self {
                    match options.sample(rng, options.num_random_weights) {
                        Some(sample) => Self::new(T::from_f64(sample as f64)),
                        None => Self::zero(),
                    }
                }
            }
        )*
    };
}

impl_random_float!(TropicalWeight, LogWeight, RealWeight);

impl<T: FloatScalar> RandomWeight for MinMaxWeight<T> {
    fn random<R: Rng + ?Sized>(rng: &mut R, options: &GenerateOptions) -> Self {
        let n = options.num_random_weights as i64;
        let sample = rng.gen_range(-n..=n);
        if options.allow_zero && sample == n {
            return Self::zero();
        }
        Self::new(T::from_f64(sample as f64))
    }
}

impl<T: FloatScalar> RandomWeight for SignedLogWeight<T> {
    fn random<R: Rng + ?Sized>(rng: &mut R, options: &GenerateOptions) -> Self {
        let positive = rng.gen_bool(0.5);
        match options.sample(rng, options.num_random_weights) {
            Some(sample) => Self::new(positive, T::from_f64(sample as f64)),
            None => Self::zero(),
        }
    }
}

impl<L: Label, P: StringPolicy> RandomWeight for StringWeight<L, P> {
    fn random<R: Rng + ?Sized>(rng: &mut R, options: &GenerateOptions) -> Self {
        match options.sample(rng, options.max_string_length) {
            Some(len) => Self::from_labels((0..len).map(|_| options.label::<L, R>(rng))),
            None => Self::zero(),
        }
    }
}

impl<L: Label, P: SetPolicy> RandomWeight for SetWeight<L, P> {
    fn random<R: Rng + ?Sized>(rng: &mut R, options: &GenerateOptions) -> Self {
        if P::KIND == SetKind::Boolean {
            return if rng.gen_bool(0.5) {
                Self::universal()
            } else {
                Self::empty()
            };
        }
        match options.sample(rng, options.max_set_length) {
            Some(len) => Self::from_elements((0..len).map(|_| options.label::<L, R>(rng))),
            None => Self::zero(),
        }
    }
}

impl<W1: RandomWeight, W2: RandomWeight> RandomWeight for ProductWeight<W1, W2> {
    fn random<R: Rng + ?Sized>(rng: &mut R, options: &GenerateOptions) -> Self {
        let value1 = W1::random(rng, options);
        Self::new(value1, W2::random(rng, options))
    }
}

impl<W: RandomWeight, const N: usize> RandomWeight for PowerWeight<W, N> {
    fn random<R: Rng + ?Sized>(rng: &mut R, options: &GenerateOptions) -> Self {
        Self::from_array(array::from_fn(|_| W::random(rng, options)))
    }
}

impl<W: RandomWeight> RandomWeight for SparsePowerWeight<W> {
    fn random<R: Rng + ?Sized>(rng: &mut R, options: &GenerateOptions) -> Self {
        let mut weight = Self::with_default(W::zero());
        for index in 1..=options.sparse_power_rank {
            weight.set_value(index, W::random(rng, options));
        }
        weight
    }
}

/// Components are drawn without Zero; Zero itself comes up as a whole.
///
/// A pair with only one Zero component breaks distributivity of the
/// lexicographic order, so such pairs are never generated.
impl<W1: RandomWeight, W2: RandomWeight> RandomWeight for LexicographicWeight<W1, W2> {
    fn random<R: Rng + ?Sized>(rng: &mut R, options: &GenerateOptions) -> Self {
        if options.sample(rng, options.num_random_weights).is_none() {
            return Self::zero();
        }
        let inner = options.without_zero();
        let value1 = W1::random(rng, &inner);
        Self::new(value1, W2::random(rng, &inner))
    }
}

impl<W: RandomWeight, O: UnionOptions<W>> RandomWeight for UnionWeight<W, O> {
    fn random<R: Rng + ?Sized>(rng: &mut R, options: &GenerateOptions) -> Self {
        let terms = rng.gen_range(0..=options.max_union_terms);
        let inner = options.without_zero();
        Self::from_terms((0..terms).map(|_| W::random(rng, &inner)).collect::<Vec<_>>())
    }
}

impl<L: Label, W: RandomWeight, P: StringPolicy> RandomWeight for GallicWeight<L, W, P> {
    fn random<R: Rng + ?Sized>(rng: &mut R, options: &GenerateOptions) -> Self {
        let string = StringWeight::random(rng, options);
        Self::new(string, W::random(rng, options))
    }
}

impl<W1, W2> RandomWeight for ExpectationWeight<W1, W2>
where
    W1: RandomWeight + Semiring<Reverse = W1>,
    W2: RandomWeight + Semiring<Reverse = W2> + Lift<W1>,
{
    fn random<R: Rng + ?Sized>(rng: &mut R, options: &GenerateOptions) -> Self {
        let value1 = W1::random(rng, options);
        Self::new(value1, W2::random(rng, options))
    }
}
