//! Randomized semiring conformance checks.
//!
//! [`WeightTester`] draws weights from a [`WeightGenerator`] and checks the
//! laws each kind declares through [`Semiring::properties`]. Laws that hold
//! only up to rounding are compared with [`Semiring::approx_eq`] at
//! [`DELTA`]; identities, annihilation and serialization are exact.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use thiserror::Error;
use tracing::{debug, warn};
use weight_types::{
    from_binary, natural_less, to_binary, DivideType, DivisibleSemiring, Properties, Semiring,
    TextFormat, Weight, DELTA,
};

use crate::generate::{GenerateOptions, RandomWeight, WeightGenerator};

/// A law that failed for a concrete set of operands.
#[derive(Debug, Error)]
pub enum ConformanceError {
    #[error("{kind}: {axiom} does not hold for {operands}")]
    Axiom {
        kind: String,
        axiom: &'static str,
        operands: String,
    },

    #[error("{kind}: {encoding} round trip of {weight} failed: {reason}")]
    RoundTrip {
        kind: String,
        encoding: &'static str,
        weight: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ConformanceError>;

/// Checks the declared laws of `W` on random operands.
pub struct WeightTester<W> {
    generator: WeightGenerator<W>,
    format: TextFormat,
}

impl<W> WeightTester<W>
where
    W: Weight + RandomWeight,
    W::Reverse: Weight + Semiring<Reverse = W>,
{
    /// Tester drawing from a default generator seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self::with_generator(WeightGenerator::new(seed))
    }

    pub fn with_generator(generator: WeightGenerator<W>) -> Self {
        Self {
            generator,
            format: TextFormat::default(),
        }
    }

    /// Tester with custom generator options.
    pub fn with_options(seed: u64, options: GenerateOptions) -> Self {
        Self::with_generator(WeightGenerator::with_options(seed, options))
    }

    /// Use `format` for the text round trip.
    pub fn with_format(mut self, format: TextFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> TextFormat {
        self.format
    }

    /// Run every applicable check on `repeat` random triples.
    pub fn test(&mut self, repeat: usize) -> Result<()> {
        debug!(
            kind = %W::type_name(),
            seed = self.generator.seed(),
            repeat,
            parentheses = self.format.parentheses,
            "weight conformance run started"
        );
        for _ in 0..repeat {
            let w1 = self.generator.generate();
            let w2 = self.generator.generate();
            let w3 = self.generator.generate();
            self.test_semiring(&w1, &w2, &w3)?;
            self.test_natural_order(&w1, &w2, &w3)?;
            self.test_reverse(&w1, &w2)?;
            self.test_equality(&w1, &w2)?;
            self.test_copy(&w1)?;
            self.test_quantize(&w1)?;
            self.test_io(&w1)?;
        }
        debug!(kind = %W::type_name(), repeat, "weight conformance run finished");
        Ok(())
    }

    fn test_semiring(&self, w1: &W, w2: &W, w3: &W) -> Result<()> {
        let props = W::properties();
        let zero = W::zero();
        let one = W::one();

        check(
            w1.plus(w2).is_member() && w1.times(w2).is_member(),
            "closure",
            &[w1, w2],
        )?;

        check(
            w1.plus(w2)
                .plus(w3)
                .approx_eq(&w1.plus(&w2.plus(w3)), DELTA),
            "plus associativity",
            &[w1, w2, w3],
        )?;
        check(
            w1.times(w2)
                .times(w3)
                .approx_eq(&w1.times(&w2.times(w3)), DELTA),
            "times associativity",
            &[w1, w2, w3],
        )?;

        check(
            w1.plus(&zero) == *w1 && zero.plus(w1) == *w1,
            "additive identity",
            &[w1],
        )?;
        check(
            w1.times(&one) == *w1 && one.times(w1) == *w1,
            "multiplicative identity",
            &[w1],
        )?;
        check(
            w1.times(&zero) == zero && zero.times(w1) == zero,
            "zero annihilation",
            &[w1],
        )?;

        let bad = W::no_weight();
        check(
            !bad.is_member() && !w1.plus(&bad).is_member() && !w1.times(&bad).is_member(),
            "no-weight propagation",
            &[w1],
        )?;

        check(
            w1.plus(w2).approx_eq(&w2.plus(w1), DELTA),
            "plus commutativity",
            &[w1, w2],
        )?;
        if props.contains(Properties::COMMUTATIVE) {
            check(
                w1.times(w2).approx_eq(&w2.times(w1), DELTA),
                "times commutativity",
                &[w1, w2],
            )?;
        }

        if props.contains(Properties::LEFT_SEMIRING) {
            check(
                w1.times(&w2.plus(w3))
                    .approx_eq(&w1.times(w2).plus(&w1.times(w3)), DELTA),
                "left distributivity",
                &[w1, w2, w3],
            )?;
        }
        if props.contains(Properties::RIGHT_SEMIRING) {
            check(
                w2.plus(w3)
                    .times(w1)
                    .approx_eq(&w2.times(w1).plus(&w3.times(w1)), DELTA),
                "right distributivity",
                &[w1, w2, w3],
            )?;
        }

        if props.contains(Properties::IDEMPOTENT) {
            check(w1.plus(w1) == *w1, "idempotence", &[w1])?;
        }
        if props.contains(Properties::PATH) {
            let sum = w1.plus(w2);
            check(sum == *w1 || sum == *w2, "path property", &[w1, w2])?;
        }
        Ok(())
    }

    fn test_natural_order(&self, w1: &W, w2: &W, w3: &W) -> Result<()> {
        let props = W::properties();
        if !props.contains(Properties::IDEMPOTENT) {
            return Ok(());
        }
        check(!natural_less(w1, w1), "natural order irreflexivity", &[w1])?;
        check(
            !(natural_less(w1, w2) && natural_less(w2, w1)),
            "natural order antisymmetry",
            &[w1, w2],
        )?;
        check(
            !(natural_less(w1, w2) && natural_less(w2, w3)) || natural_less(w1, w3),
            "natural order transitivity",
            &[w1, w2, w3],
        )?;
        if props.contains(Properties::PATH) {
            check(
                w1 == w2 || natural_less(w1, w2) || natural_less(w2, w1),
                "natural order totality",
                &[w1, w2],
            )?;
        }
        Ok(())
    }

    fn test_reverse(&self, w1: &W, w2: &W) -> Result<()> {
        let rw1 = w1.reverse();
        let rw2 = w2.reverse();

        check(rw1.reverse() == *w1, "reverse involution", &[w1])?;
        check(
            w1.plus(w2).reverse().approx_eq(&rw1.plus(&rw2), DELTA),
            "reverse of plus",
            &[w1, w2],
        )?;
        check(
            w1.times(w2).reverse().approx_eq(&rw2.times(&rw1), DELTA),
            "reverse of times",
            &[w1, w2],
        )?;
        Ok(())
    }

    fn test_equality(&self, w1: &W, w2: &W) -> Result<()> {
        check(
            w1.eq(w1) && w1.approx_eq(w1, DELTA),
            "equality reflexivity",
            &[w1],
        )?;
        check(
            (w1 == w2) == (w2 == w1) && w1.approx_eq(w2, DELTA) == w2.approx_eq(w1, DELTA),
            "equality symmetry",
            &[w1, w2],
        )?;
        if w1 == w2 {
            check(hash_of(w1) == hash_of(w2), "hash consistency", &[w1, w2])?;
        }
        Ok(())
    }

    fn test_copy(&self, w1: &W) -> Result<()> {
        let copy = w1.clone();
        check(copy == *w1 && hash_of(&copy) == hash_of(w1), "clone", &[w1])?;

        let mut assigned = W::one();
        assigned.clone_from(w1);
        check(assigned == *w1, "clone_from", &[w1])?;

        let moved = copy;
        check(moved == *w1, "move", &[w1])?;
        Ok(())
    }

    fn test_quantize(&self, w1: &W) -> Result<()> {
        let quantized = w1.quantize(DELTA);
        check(
            quantized.quantize(DELTA) == quantized,
            "quantize idempotence",
            &[w1],
        )
    }

    /// Text formats exercised by the round trip: the configured one, plus
    /// the parenthesized one, which every kind must read back.
    fn text_formats(&self) -> Vec<TextFormat> {
        let mut formats = vec![self.format()];
        if !self.format.parentheses {
            formats.push(TextFormat::with_parentheses());
        }
        formats
    }

    fn test_io(&self, w1: &W) -> Result<()> {
        for format in self.text_formats() {
            let text = format.print(w1);
            let parsed = format
                .parse::<W>(&text)
                .map_err(|err| round_trip_error(w1, "text", err.to_string()))?;
            if !parsed.approx_eq(w1, DELTA) {
                return Err(round_trip_error(
                    w1,
                    "text",
                    format!("{text:?} read back as {parsed:?}"),
                ));
            }
        }

        let bytes = to_binary(w1);
        let decoded = from_binary::<W>(&bytes)
            .map_err(|err| round_trip_error(w1, "binary", err.to_string()))?;
        if decoded != *w1 {
            return Err(round_trip_error(
                w1,
                "binary",
                format!("read back as {decoded:?}"),
            ));
        }
        Ok(())
    }
}

impl<W> WeightTester<W>
where
    W: Weight + RandomWeight + DivisibleSemiring,
    W::Reverse: Weight + Semiring<Reverse = W>,
{
    /// Check that quotients undo products on `repeat` random pairs.
    ///
    /// A division the kind reports as an error is skipped; a quotient
    /// that is returned must multiply back to the dividend.
    pub fn test_division(&mut self, repeat: usize) -> Result<()> {
        let props = W::properties();
        debug!(
            kind = %W::type_name(),
            seed = self.generator.seed(),
            repeat,
            "weight division run started"
        );
        for _ in 0..repeat {
            let w1 = self.generator.generate();
            let w2 = self.generator.generate();
            let product = w1.times(&w2);

            if props.contains(Properties::LEFT_SEMIRING) {
                if let Ok(quotient) = product.try_divide(&w1, DivideType::Left) {
                    if quotient.is_member() {
                        check(
                            product.approx_eq(&w1.times(&quotient), DELTA),
                            "left division",
                            &[&w1, &w2],
                        )?;
                    }
                }
            }
            if props.contains(Properties::RIGHT_SEMIRING) {
                if let Ok(quotient) = product.try_divide(&w2, DivideType::Right) {
                    if quotient.is_member() {
                        check(
                            product.approx_eq(&quotient.times(&w2), DELTA),
                            "right division",
                            &[&w1, &w2],
                        )?;
                    }
                }
            }
            if props.contains(Properties::COMMUTATIVE) {
                if let Ok(quotient) = product.try_divide(&w1, DivideType::Any) {
                    if quotient.is_member() {
                        check(
                            product.approx_eq(&w1.times(&quotient), DELTA),
                            "commutative division",
                            &[&w1, &w2],
                        )?;
                    }
                }
            }

            let by_bad = w1.try_divide(&W::no_weight(), DivideType::Any);
            check(
                by_bad.map_or(true, |quotient| !quotient.is_member()),
                "division by no-weight",
                &[&w1],
            )?;
        }
        debug!(kind = %W::type_name(), repeat, "weight division run finished");
        Ok(())
    }
}

fn check<W: Semiring>(holds: bool, axiom: &'static str, operands: &[&W]) -> Result<()> {
    if holds {
        return Ok(());
    }
    let operands = operands
        .iter()
        .map(|w| format!("{w:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    warn!(kind = %W::type_name(), axiom, %operands, "weight law violated");
    Err(ConformanceError::Axiom {
        kind: W::type_name(),
        axiom,
        operands,
    })
}

fn round_trip_error<W: Semiring>(weight: &W, encoding: &'static str, reason: String) -> ConformanceError {
    warn!(kind = %W::type_name(), encoding, %reason, "weight round trip failed");
    ConformanceError::RoundTrip {
        kind: W::type_name(),
        encoding,
        weight: format!("{weight:?}"),
        reason,
    }
}

fn hash_of<W: Hash>(weight: &W) -> u64 {
    let mut hasher = DefaultHasher::new();
    weight.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use weight_types::{
        LeftStringWeight, LogWeight, MinMaxWeight, ProductWeight, RealWeight, TropicalWeight,
    };

    #[test]
    fn test_float_kinds_conform() {
        WeightTester::<TropicalWeight>::new(1).test(300).unwrap();
        WeightTester::<LogWeight>::new(2).test(300).unwrap();
        WeightTester::<RealWeight<f64>>::new(3).test(300).unwrap();
        WeightTester::<MinMaxWeight>::new(4).test(300).unwrap();
    }

    #[test]
    fn test_division_conforms() {
        WeightTester::<TropicalWeight>::new(5).test_division(300).unwrap();
        WeightTester::<LeftStringWeight>::new(6).test_division(300).unwrap();
        WeightTester::<ProductWeight<TropicalWeight, LogWeight>>::new(7)
            .test_division(300)
            .unwrap();
    }

    #[test]
    fn test_parenthesized_round_trip() {
        WeightTester::<ProductWeight<TropicalWeight, TropicalWeight>>::new(8)
            .with_format(TextFormat::with_parentheses())
            .test(200)
            .unwrap();
    }

    #[test]
    fn test_text_checked_under_both_settings() {
        let tester = WeightTester::<ProductWeight<TropicalWeight, LogWeight>>::new(9);
        assert_eq!(
            tester.text_formats(),
            vec![TextFormat::new(), TextFormat::with_parentheses()]
        );
        let tester = tester.with_format(TextFormat::with_parentheses());
        assert_eq!(tester.text_formats(), vec![TextFormat::with_parentheses()]);

        let mut tester = WeightTester::<ProductWeight<TropicalWeight, LogWeight>>::new(9);
        tester.test(100).unwrap();
    }

    #[test]
    fn test_violation_is_reported() {
        let err = check::<TropicalWeight>(false, "idempotence", &[&TropicalWeight::new(1.0f32)])
            .unwrap_err();
        assert!(matches!(
            err,
            ConformanceError::Axiom { axiom: "idempotence", .. }
        ));
        assert!(err.to_string().starts_with("tropical: idempotence does not hold"));
    }
}
