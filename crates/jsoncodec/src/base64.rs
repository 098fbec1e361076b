//! Variant-driven base64 encoding and decoding.
//!
//! The reader uses [`decode`] to materialize binary values embedded in
//! string tokens; decoding runs over the *decoded* string content, so
//! escape sequences interleaved with the base64 alphabet have already been
//! resolved by the time the codec sees them. Whitespace is accepted between
//! 4-character units (line-wrapped MIME/PEM content) but never inside one.

use alloc::{string::String, vec::Vec};
use core::fmt;

use thiserror::Error;

/// A base64 dialect: alphabet, padding policy, and line wrapping.
#[derive(Debug, Clone, Copy)]
pub struct Base64Variant {
    name: &'static str,
    alphabet: &'static [u8; 64],
    decode_table: [i8; 128],
    uses_padding: bool,
    line_length: Option<usize>,
}

const STANDARD_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const URL_SAFE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

const fn build_decode_table(alphabet: &[u8; 64]) -> [i8; 128] {
    let mut table = [-1i8; 128];
    let mut i = 0;
    while i < 64 {
        table[alphabet[i] as usize] = i as i8;
        i += 1;
    }
    table
}

/// The standard alphabet, padded, no line wrapping.
pub static STANDARD: Base64Variant = Base64Variant::new("standard", STANDARD_ALPHABET, true, None);

/// The MIME transfer encoding: standard alphabet, padded, 76-character
/// lines.
pub static MIME: Base64Variant = Base64Variant::new("mime", STANDARD_ALPHABET, true, Some(76));

/// PEM armor: standard alphabet, padded, 64-character lines.
pub static PEM: Base64Variant = Base64Variant::new("pem", STANDARD_ALPHABET, true, Some(64));

/// The URL- and filename-safe alphabet (`-` and `_`), unpadded, no line
/// wrapping.
pub static URL_SAFE: Base64Variant = Base64Variant::new("url-safe", URL_SAFE_ALPHABET, false, None);

impl Base64Variant {
    const fn new(
        name: &'static str,
        alphabet: &'static [u8; 64],
        uses_padding: bool,
        line_length: Option<usize>,
    ) -> Self {
        Self {
            name,
            alphabet,
            decode_table: build_decode_table(alphabet),
            uses_padding,
            line_length,
        }
    }

    /// The variant's display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn value_of(&self, c: char) -> Option<u8> {
        let index = u32::from(c);
        if index < 128 {
            let v = self.decode_table[index as usize];
            u8::try_from(v).ok()
        } else {
            None
        }
    }
}

impl fmt::Display for Base64Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A character the decoder could not accept, with its position inside the
/// current 4-character unit.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{kind} (offset {offset}, position {unit_pos} in a 4-character unit)")]
pub struct Base64Error {
    /// What was wrong with the character.
    pub kind: Base64ErrorKind,
    /// Character offset of the fault within the base64 text.
    pub offset: usize,
    /// Position 0–3 within the 4-character unit being decoded.
    pub unit_pos: u8,
}

/// Classification of a [`Base64Error`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Base64ErrorKind {
    /// A character outside the variant's alphabet.
    #[error("illegal base64 character {0:?}")]
    IllegalCharacter(char),

    /// Whitespace inside a 4-character unit; it is only accepted between
    /// units.
    #[error("whitespace {0:?} inside a base64 unit")]
    WhitespaceInUnit(char),

    /// A padding character under a variant that does not pad.
    #[error("padding character '=' is not allowed by this variant")]
    DisallowedPadding,

    /// A padding character at unit position 0 or 1, or excess padding.
    #[error("padding character '=' in an illegal position")]
    MisplacedPadding,

    /// The input ended inside a 4-character unit.
    #[error("base64 input ends inside a unit")]
    UnexpectedEnd,
}

fn fault(kind: Base64ErrorKind, offset: usize, unit_pos: u8) -> Base64Error {
    Base64Error {
        kind,
        offset,
        unit_pos,
    }
}

/// Decodes base64 `text` into bytes under `variant`'s rules.
///
/// # Errors
///
/// Fails with a [`Base64Error`] identifying the offending character, its
/// position within the current 4-character unit, and whether it was
/// whitespace, a disallowed padding character, or simply illegal.
pub fn decode(text: &str, variant: &Base64Variant) -> Result<Vec<u8>, Base64Error> {
    let mut out = Vec::with_capacity(text.len() / 4 * 3);
    let mut unit = [0u8; 4];
    let mut unit_pos: u8 = 0;
    let mut padding = 0u8;
    let mut last_offset = 0;

    for (offset, c) in text.chars().enumerate() {
        last_offset = offset;
        if c.is_whitespace() {
            if unit_pos == 0 {
                continue;
            }
            return Err(fault(
                Base64ErrorKind::WhitespaceInUnit(c),
                offset,
                unit_pos,
            ));
        }
        if c == '=' {
            if !variant.uses_padding {
                return Err(fault(Base64ErrorKind::DisallowedPadding, offset, unit_pos));
            }
            // Padding is only legal in the last one or two slots of a unit.
            if unit_pos < 2 || padding == 2 {
                return Err(fault(Base64ErrorKind::MisplacedPadding, offset, unit_pos));
            }
            padding += 1;
            unit_pos += 1;
        } else {
            if padding > 0 {
                // Data after '=' within the unit.
                return Err(fault(Base64ErrorKind::MisplacedPadding, offset, unit_pos));
            }
            let Some(v) = variant.value_of(c) else {
                return Err(fault(
                    Base64ErrorKind::IllegalCharacter(c),
                    offset,
                    unit_pos,
                ));
            };
            unit[unit_pos as usize] = v;
            unit_pos += 1;
        }

        if unit_pos == 4 {
            emit_unit(&mut out, unit, padding);
            unit_pos = 0;
            padding = 0;
        }
    }

    match unit_pos {
        0 => Ok(out),
        1 => Err(fault(
            Base64ErrorKind::UnexpectedEnd,
            last_offset + 1,
            unit_pos,
        )),
        _ if variant.uses_padding => Err(fault(
            Base64ErrorKind::UnexpectedEnd,
            last_offset + 1,
            unit_pos,
        )),
        // Unpadded variants may end with a 2- or 3-character tail.
        _ => {
            emit_unit(&mut out, unit, 4 - unit_pos);
            Ok(out)
        }
    }
}

fn emit_unit(out: &mut Vec<u8>, unit: [u8; 4], padding: u8) {
    let triple = (u32::from(unit[0]) << 18)
        | (u32::from(unit[1]) << 12)
        | (u32::from(unit[2]) << 6)
        | u32::from(unit[3]);
    out.push((triple >> 16) as u8);
    if padding < 2 {
        out.push((triple >> 8) as u8);
    }
    if padding < 1 {
        out.push(triple as u8);
    }
}

/// Encodes `bytes` as base64 text under `variant`'s rules, inserting line
/// breaks per the variant's line length.
#[must_use]
pub fn encode(bytes: &[u8], variant: &Base64Variant) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    let mut line = 0usize;
    let mut push = |out: &mut String, c: char, line: &mut usize| {
        if let Some(limit) = variant.line_length {
            if *line == limit {
                out.push('\n');
                *line = 0;
            }
        }
        out.push(c);
        *line += 1;
    };

    for chunk in bytes.chunks(3) {
        let mut triple = u32::from(chunk[0]) << 16;
        if chunk.len() > 1 {
            triple |= u32::from(chunk[1]) << 8;
        }
        if chunk.len() > 2 {
            triple |= u32::from(chunk[2]);
        }

        let chars = 1 + chunk.len();
        for i in 0..4 {
            if i < chars {
                let v = ((triple >> (18 - 6 * i)) & 0x3F) as usize;
                push(&mut out, variant.alphabet[v] as char, &mut line);
            } else if variant.uses_padding {
                push(&mut out, '=', &mut line);
            }
        }
    }
    out
}
