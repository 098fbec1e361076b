//! Accumulator for `\uXXXX` escape sequences, including surrogate pairs.
//!
//! Four hexadecimal digits decode to a code unit. Basic-plane units resolve
//! directly to a character; a high surrogate parks until the following
//! `\uXXXX` supplies the low half. An unpaired half in either direction is
//! a lexical error naming the offending unit.

use crate::error::SyntaxError;

/// Result of feeding one character into the escape buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EscapeStep {
    /// More hex digits are required.
    NeedMore,
    /// The escape resolved to a character.
    Complete(char),
    /// A high surrogate was read; the next `\uXXXX` must follow.
    HighSurrogate,
}

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    digits: [u8; 4],
    len: u8,
    pending_high: Option<u16>,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Discards accumulated digits and any parked surrogate half.
    pub(crate) fn reset(&mut self) {
        self.len = 0;
        self.pending_high = None;
    }

    pub(crate) fn pending_surrogate(&self) -> Option<u16> {
        self.pending_high
    }

    /// Feeds one hex digit of the current `\uXXXX` sequence.
    pub(crate) fn feed(&mut self, c: char) -> Result<EscapeStep, SyntaxError> {
        let Some(digit) = c.to_digit(16) else {
            return Err(SyntaxError::InvalidUnicodeEscape(c));
        };
        self.digits[usize::from(self.len)] = digit as u8;
        self.len += 1;
        if self.len < 4 {
            return Ok(EscapeStep::NeedMore);
        }

        let unit = self
            .digits
            .iter()
            .fold(0u16, |acc, d| (acc << 4) | u16::from(*d));
        self.len = 0;

        match self.pending_high.take() {
            Some(high) => {
                if !(0xDC00..=0xDFFF).contains(&unit) {
                    return Err(SyntaxError::UnpairedSurrogate(u32::from(high)));
                }
                let scalar = 0x10000
                    + ((u32::from(high) - 0xD800) << 10)
                    + (u32::from(unit) - 0xDC00);
                // Pairing a high and a low half always yields a valid scalar.
                char::from_u32(scalar)
                    .map(EscapeStep::Complete)
                    .ok_or(SyntaxError::UnpairedSurrogate(scalar))
            }
            None => {
                if (0xD800..=0xDBFF).contains(&unit) {
                    self.pending_high = Some(unit);
                    return Ok(EscapeStep::HighSurrogate);
                }
                if (0xDC00..=0xDFFF).contains(&unit) {
                    return Err(SyntaxError::UnpairedSurrogate(u32::from(unit)));
                }
                char::from_u32(u32::from(unit))
                    .map(EscapeStep::Complete)
                    .ok_or(SyntaxError::UnpairedSurrogate(u32::from(unit)))
            }
        }
    }
}
