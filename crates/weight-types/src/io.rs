//! Text and binary serialization plumbing.
//!
//! Text rendering is controlled by an explicit [`TextFormat`] value that the
//! caller passes to every print/parse call; there is no process-wide state.
//! Composite weights bracket their rendering with parentheses only when the
//! format asks for it:
//!
//! ```
//! use weight_types::{ProductWeight, TextFormat, TropicalWeight};
//!
//! let w = ProductWeight::new(TropicalWeight::new(1.0f32), TropicalWeight::new(2.5f32));
//! assert_eq!(TextFormat::default().print(&w), "1,2.5");
//! assert_eq!(TextFormat::with_parentheses().print(&w), "(1,2.5)");
//! ```

use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::ParseWeightError;
use crate::traits::{Semiring, WeightIo};

/// Separator between the fields of Product, Power, SparsePower,
/// Lexicographic, Expectation, Gallic and SignedLog renderings.
pub const COMPOSITE_SEPARATOR: char = ',';

/// Separator between the terms of a Union rendering.
pub const UNION_SEPARATOR: char = ';';

/// Separator between the symbols of string and set renderings.
pub const LABEL_SEPARATOR: char = '_';

const OPEN_PAREN: char = '(';
const CLOSE_PAREN: char = ')';

fn is_reserved(c: char) -> bool {
    matches!(c, COMPOSITE_SEPARATOR | UNION_SEPARATOR | OPEN_PAREN | CLOSE_PAREN)
}

/// Rendering configuration for text serialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextFormat {
    /// Bracket every composite rendering with `(` and `)`.
    #[serde(default)]
    pub parentheses: bool,
}

impl TextFormat {
    /// Format without parentheses (the default).
    pub const fn new() -> Self {
        Self { parentheses: false }
    }

    /// Format bracketing every composite rendering.
    pub const fn with_parentheses() -> Self {
        Self { parentheses: true }
    }

    /// Render a weight.
    pub fn print<W: WeightIo>(&self, weight: &W) -> String {
        let mut buf = String::new();
        weight.write_text(&mut TextWriter::new(&mut buf, *self));
        buf
    }

    /// Parse a complete weight; trailing input is an error.
    pub fn parse<W: WeightIo>(&self, text: &str) -> Result<W, ParseWeightError> {
        let mut reader = TextReader::new(text, *self);
        let weight = W::read_text(&mut reader)?;
        reader.finish()?;
        Ok(weight)
    }

    /// Parse a weight, substituting the no-weight sentinel on failure.
    pub fn parse_or_no_weight<W: WeightIo + Semiring>(&self, text: &str) -> W {
        self.parse(text).unwrap_or_else(|err| {
            tracing::warn!(
                kind = %W::type_name(),
                error = %err,
                "unparsable weight text, using the no-weight sentinel"
            );
            W::no_weight()
        })
    }
}

/// Sink for a text rendering.
pub struct TextWriter<'a> {
    buf: &'a mut String,
    format: TextFormat,
}

impl<'a> TextWriter<'a> {
    /// Render into `buf` using `format`.
    pub fn new(buf: &'a mut String, format: TextFormat) -> Self {
        Self { buf, format }
    }

    /// Append an atomic token.
    pub fn token(&mut self, token: &str) {
        self.buf.push_str(token);
    }

    /// Start a composite rendering.
    pub fn open(&mut self) {
        if self.format.parentheses {
            self.buf.push(OPEN_PAREN);
        }
    }

    /// Finish a composite rendering.
    pub fn close(&mut self) {
        if self.format.parentheses {
            self.buf.push(CLOSE_PAREN);
        }
    }

    /// Append a field separator.
    pub fn separator(&mut self, separator: char) {
        self.buf.push(separator);
    }

    /// Render a nested weight.
    pub fn element<W: WeightIo>(&mut self, weight: &W) {
        weight.write_text(self);
    }
}

/// Cursor over a text rendering.
pub struct TextReader<'a> {
    input: &'a str,
    pos: usize,
    format: TextFormat,
}

impl<'a> TextReader<'a> {
    /// Read from `input` using `format`.
    pub fn new(input: &'a str, format: TextFormat) -> Self {
        Self {
            input,
            pos: 0,
            format,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseWeightError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(_) => Err(ParseWeightError::Expected {
                expected,
                offset: self.pos,
            }),
            None => Err(ParseWeightError::UnexpectedEnd(self.pos)),
        }
    }

    /// Read a non-empty atomic token, stopping at a structural character.
    pub fn token(&mut self) -> Result<&'a str, ParseWeightError> {
        let rest = &self.input[self.pos..];
        let len = rest.find(is_reserved).unwrap_or(rest.len());
        if len == 0 {
            return match self.peek() {
                None => Err(ParseWeightError::UnexpectedEnd(self.pos)),
                Some(c) => Err(ParseWeightError::InvalidToken {
                    kind: "atom".to_string(),
                    token: c.to_string(),
                }),
            };
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    /// Consume the opening bracket of a composite, if the format uses them.
    pub fn open(&mut self) -> Result<(), ParseWeightError> {
        if self.format.parentheses {
            self.expect(OPEN_PAREN)?;
        }
        Ok(())
    }

    /// Consume the closing bracket of a composite, if the format uses them.
    pub fn close(&mut self) -> Result<(), ParseWeightError> {
        if self.format.parentheses {
            self.expect(CLOSE_PAREN)?;
        }
        Ok(())
    }

    /// Consume a field separator.
    pub fn separator(&mut self, separator: char) -> Result<(), ParseWeightError> {
        self.expect(separator)
    }

    /// Consume `separator` if it is the next character.
    pub fn try_separator(&mut self, separator: char) -> bool {
        if self.peek() == Some(separator) {
            self.pos += separator.len_utf8();
            true
        } else {
            false
        }
    }

    /// Whether the enclosing group has no more fields.
    ///
    /// Variable-length composites (SparsePower, Union) read until this
    /// holds. A group ends at a closing bracket, at a union term boundary,
    /// or at the end of input. Without parentheses a variable-length
    /// composite nested inside a fixed-arity one must be its last field.
    pub fn at_group_end(&self) -> bool {
        matches!(self.peek(), None | Some(CLOSE_PAREN) | Some(UNION_SEPARATOR))
    }

    /// Parse a nested weight.
    pub fn element<W: WeightIo>(&mut self) -> Result<W, ParseWeightError> {
        W::read_text(self)
    }

    /// Ensure the whole input was consumed.
    pub fn finish(self) -> Result<(), ParseWeightError> {
        if self.pos == self.input.len() {
            Ok(())
        } else {
            Err(ParseWeightError::TrailingInput(self.pos))
        }
    }
}

/// Binary encoding of a weight.
pub fn to_binary<W: WeightIo>(weight: &W) -> Vec<u8> {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = weight.write_binary(&mut buf);
    buf
}

/// Decode a complete binary encoding; trailing bytes are an error.
pub fn from_binary<W: WeightIo>(bytes: &[u8]) -> Result<W, ParseWeightError> {
    let mut input = bytes;
    let weight = W::read_binary(&mut input)?;
    if input.is_empty() {
        Ok(weight)
    } else {
        Err(ParseWeightError::TrailingInput(bytes.len() - input.len()))
    }
}

/// Decode a binary encoding, substituting the no-weight sentinel on failure.
pub fn read_binary_or_no_weight<W: WeightIo + Semiring, R: Read + ?Sized>(input: &mut R) -> W {
    W::read_binary(input).unwrap_or_else(|err| {
        tracing::warn!(
            kind = %W::type_name(),
            error = %err,
            "unreadable binary weight, using the no-weight sentinel"
        );
        W::no_weight()
    })
}

pub(crate) fn write_i64<W: Write + ?Sized>(out: &mut W, value: i64) -> io::Result<()> {
    out.write_all(&value.to_le_bytes())
}

pub(crate) fn read_i64<R: Read + ?Sized>(input: &mut R) -> io::Result<i64> {
    let mut bytes = [0u8; 8];
    input.read_exact(&mut bytes)?;
    Ok(i64::from_le_bytes(bytes))
}

pub(crate) fn write_u64<W: Write + ?Sized>(out: &mut W, value: u64) -> io::Result<()> {
    out.write_all(&value.to_le_bytes())
}

pub(crate) fn read_u64<R: Read + ?Sized>(input: &mut R) -> io::Result<u64> {
    let mut bytes = [0u8; 8];
    input.read_exact(&mut bytes)?;
    Ok(u64::from_le_bytes(bytes))
}

pub(crate) fn write_u8<W: Write + ?Sized>(out: &mut W, value: u8) -> io::Result<()> {
    out.write_all(&[value])
}

pub(crate) fn read_u8<R: Read + ?Sized>(input: &mut R) -> io::Result<u8> {
    let mut byte = [0u8; 1];
    input.read_exact(&mut byte)?;
    Ok(byte[0])
}
