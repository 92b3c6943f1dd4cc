//! Weights built out of other weights.

mod expectation;
mod gallic;
mod lexicographic;
mod power;
mod product;
mod sparse_power;
mod union;

pub use expectation::{ExpectationWeight, Lift};
pub use gallic::{GallicUnionOptions, GallicWeight, GeneralGallicWeight};
pub use lexicographic::LexicographicWeight;
pub use power::PowerWeight;
pub use product::ProductWeight;
pub use sparse_power::SparsePowerWeight;
pub use union::{NaturalLess, UnionOptions, UnionWeight};

use std::io::{self, Read, Write};

use crate::error::ParseWeightError;
use crate::io::{TextReader, TextWriter, COMPOSITE_SEPARATOR};
use crate::traits::{Properties, WeightIo};

/// Properties that survive componentwise combination.
pub(crate) const COMPONENTWISE_PROPERTIES: Properties = Properties::LEFT_SEMIRING
    .union(Properties::RIGHT_SEMIRING)
    .union(Properties::COMMUTATIVE)
    .union(Properties::IDEMPOTENT);

pub(crate) fn write_pair<A: WeightIo, B: WeightIo>(out: &mut TextWriter<'_>, first: &A, second: &B) {
    out.open();
    out.element(first);
    out.separator(COMPOSITE_SEPARATOR);
    out.element(second);
    out.close();
}

pub(crate) fn read_pair<A: WeightIo, B: WeightIo>(
    input: &mut TextReader<'_>,
) -> Result<(A, B), ParseWeightError> {
    input.open()?;
    let first = input.element()?;
    input.separator(COMPOSITE_SEPARATOR)?;
    let second = input.element()?;
    input.close()?;
    Ok((first, second))
}

pub(crate) fn write_pair_binary<A: WeightIo, B: WeightIo, W: Write + ?Sized>(
    out: &mut W,
    first: &A,
    second: &B,
) -> io::Result<()> {
    first.write_binary(out)?;
    second.write_binary(out)
}

pub(crate) fn read_pair_binary<A: WeightIo, B: WeightIo, R: Read + ?Sized>(
    input: &mut R,
) -> Result<(A, B), ParseWeightError> {
    let first = A::read_binary(input)?;
    let second = B::read_binary(input)?;
    Ok((first, second))
}
