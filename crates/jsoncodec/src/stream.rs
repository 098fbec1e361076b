//! Capability seams between the engines and higher layers.
//!
//! A higher layer (an object mapper, a transcoder) consumes tokens through
//! [`TokenSource`] and produces them through [`TokenSink`], never naming the
//! concrete format engine. Optional capabilities carry trait defaults that
//! report an unsupported operation instead of being silently ignored.

use alloc::vec::Vec;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::{
    base64::{self, Base64Variant},
    error::{ReadError, ReadErrorKind, WriteError},
    location::Location,
    numbers::{Number, NumberKind},
    token::Token,
};

/// A pull-based producer of tokens.
///
/// Exactly one token is current at a time; scalar accessors materialize the
/// current token's payload lazily and fail with a type-mismatch error
/// against an incompatible token kind.
pub trait TokenSource {
    /// Advances to and returns the next token. `Ok(None)` is the terminal
    /// "no more tokens" marker.
    ///
    /// # Errors
    ///
    /// Fails when the input is lexically or structurally invalid at the
    /// current position; the failure is fatal and re-reported by subsequent
    /// calls.
    fn next_token(&mut self) -> Result<Option<Token>, ReadError>;

    /// The last token produced, without advancing.
    fn current_token(&self) -> Option<Token>;

    /// The field name most recently read at the current nesting level, if
    /// any.
    fn current_name(&self) -> Option<&str>;

    /// The textual payload of the current token: decoded string content,
    /// the field name, raw number text, the literal or punctuator text.
    ///
    /// # Errors
    ///
    /// Fails when no token is current or the current token is
    /// [`Token::NotAvailable`].
    fn text(&mut self) -> Result<&str, ReadError>;

    /// The current numeric token in its narrowest faithful representation.
    ///
    /// # Errors
    ///
    /// Fails with a type mismatch on non-numeric tokens.
    fn number_value(&mut self) -> Result<Number, ReadError>;

    /// The representation [`Self::number_value`] would choose for the
    /// current numeric token.
    ///
    /// # Errors
    ///
    /// Fails with a type mismatch on non-numeric tokens.
    fn number_type(&mut self) -> Result<NumberKind, ReadError>;

    /// The current numeric token as `i32`.
    ///
    /// # Errors
    ///
    /// Fails with a type mismatch on non-numeric tokens, or a coercion
    /// error when the value cannot exactly fit; the token stays current and
    /// a wider accessor may still succeed.
    fn int_value(&mut self) -> Result<i32, ReadError>;

    /// The current numeric token as `i64`.
    ///
    /// # Errors
    ///
    /// See [`Self::int_value`].
    fn long_value(&mut self) -> Result<i64, ReadError>;

    /// The current numeric token as an arbitrary-precision integer.
    ///
    /// # Errors
    ///
    /// Fails with a type mismatch on non-numeric tokens, or a coercion
    /// error when the value has a fractional part.
    fn bigint_value(&mut self) -> Result<BigInt, ReadError>;

    /// The current numeric token as a binary double, by the fast lossy
    /// parse.
    ///
    /// # Errors
    ///
    /// Fails with a type mismatch on non-numeric tokens.
    fn double_value(&mut self) -> Result<f64, ReadError>;

    /// The current numeric token as an exact arbitrary-precision decimal.
    ///
    /// # Errors
    ///
    /// Fails with a type mismatch on non-numeric tokens.
    fn decimal_value(&mut self) -> Result<BigDecimal, ReadError>;

    /// Decodes the current string token's content as standard base64.
    ///
    /// # Errors
    ///
    /// Fails with a type mismatch on non-string tokens or a base64 error
    /// for invalid content.
    fn binary_value(&mut self) -> Result<Vec<u8>, ReadError> {
        self.binary_value_with(&base64::STANDARD)
    }

    /// Decodes the current string token's content as base64 under an
    /// explicit variant.
    ///
    /// # Errors
    ///
    /// Reports an unsupported operation unless the source implements
    /// binary decoding.
    fn binary_value_with(&mut self, variant: &Base64Variant) -> Result<Vec<u8>, ReadError> {
        let _ = variant;
        Err(ReadError::new(
            ReadErrorKind::Unsupported("binary value decoding"),
            Location::start(),
        ))
    }

    /// When positioned on a container start, advances past the matching
    /// container end without materializing contents. A no-op on other
    /// tokens.
    ///
    /// Returns `Ok(false)` when the input ran dry mid-skip; feed more input
    /// and call again to resume.
    ///
    /// # Errors
    ///
    /// Fails when end-of-input is reached before the matching container
    /// end.
    fn skip_children(&mut self) -> Result<bool, ReadError>;

    /// The position of the cursor.
    fn current_location(&self) -> Location;

    /// The position of the first character of the current token.
    fn token_location(&self) -> Location;

    /// Releases internal buffers and marks the source closed. Idempotent,
    /// and safe to call from cleanup paths after any error.
    fn close(&mut self);
}

/// A push-based consumer of tokens that emits serialized output.
///
/// Every write validates legality against the current nesting context
/// before emitting; structural misuse fails synchronously at the offending
/// call.
pub trait TokenSink {
    /// Opens an object.
    ///
    /// # Errors
    ///
    /// Fails on an illegal call sequence or a sink fault.
    fn write_start_object(&mut self) -> Result<(), WriteError>;

    /// Closes the innermost object.
    ///
    /// # Errors
    ///
    /// Fails when the innermost open container is not an object, or a
    /// field name still awaits its value.
    fn write_end_object(&mut self) -> Result<(), WriteError>;

    /// Opens an array.
    ///
    /// # Errors
    ///
    /// Fails on an illegal call sequence or a sink fault.
    fn write_start_array(&mut self) -> Result<(), WriteError>;

    /// Closes the innermost array.
    ///
    /// # Errors
    ///
    /// Fails when the innermost open container is not an array.
    fn write_end_array(&mut self) -> Result<(), WriteError>;

    /// Writes an object member name, associating it with the next value.
    ///
    /// # Errors
    ///
    /// Fails outside an object context or while a previous name still
    /// awaits its value.
    fn write_field_name(&mut self, name: &str) -> Result<(), WriteError>;

    /// Writes a string value.
    ///
    /// # Errors
    ///
    /// Fails on an illegal call sequence or a sink fault.
    fn write_string(&mut self, value: &str) -> Result<(), WriteError>;

    /// Writes `true` or `false`.
    ///
    /// # Errors
    ///
    /// Fails on an illegal call sequence or a sink fault.
    fn write_bool(&mut self, value: bool) -> Result<(), WriteError>;

    /// Writes `null`.
    ///
    /// # Errors
    ///
    /// Fails on an illegal call sequence or a sink fault.
    fn write_null(&mut self) -> Result<(), WriteError>;

    /// Writes an `i32` number.
    ///
    /// # Errors
    ///
    /// Fails on an illegal call sequence or a sink fault.
    fn write_int(&mut self, value: i32) -> Result<(), WriteError>;

    /// Writes an `i64` number.
    ///
    /// # Errors
    ///
    /// Fails on an illegal call sequence or a sink fault.
    fn write_long(&mut self, value: i64) -> Result<(), WriteError>;

    /// Writes an arbitrary-precision integer.
    ///
    /// # Errors
    ///
    /// Fails on an illegal call sequence or a sink fault.
    fn write_bigint(&mut self, value: &BigInt) -> Result<(), WriteError>;

    /// Writes a binary double.
    ///
    /// # Errors
    ///
    /// Fails on NaN or infinite values, an illegal call sequence, or a
    /// sink fault.
    fn write_double(&mut self, value: f64) -> Result<(), WriteError>;

    /// Writes an arbitrary-precision decimal.
    ///
    /// # Errors
    ///
    /// Fails when plain notation is requested for a scale beyond ±9999, on
    /// an illegal call sequence, or a sink fault.
    fn write_decimal(&mut self, value: &BigDecimal) -> Result<(), WriteError>;

    /// Writes pre-rendered number text after validating it against the
    /// JSON number grammar.
    ///
    /// # Errors
    ///
    /// Fails on text outside the number grammar, an illegal call sequence,
    /// or a sink fault.
    fn write_number_text(&mut self, text: &str) -> Result<(), WriteError>;

    /// Writes `bytes` as a standard base64 string value.
    ///
    /// # Errors
    ///
    /// Fails on an illegal call sequence or a sink fault.
    fn write_binary(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        self.write_binary_with(bytes, &base64::STANDARD)
    }

    /// Writes `bytes` as a base64 string value under an explicit variant.
    ///
    /// # Errors
    ///
    /// Reports an unsupported operation unless the sink implements binary
    /// encoding.
    fn write_binary_with(
        &mut self,
        bytes: &[u8],
        variant: &Base64Variant,
    ) -> Result<(), WriteError> {
        let _ = (bytes, variant);
        Err(WriteError::Unsupported("binary value encoding"))
    }

    /// Writes a raw pre-serialized value verbatim, still subject to the
    /// context legality check and separator placement.
    ///
    /// # Errors
    ///
    /// Reports an unsupported operation unless the sink implements raw
    /// writes.
    fn write_raw_value(&mut self, raw: &str) -> Result<(), WriteError> {
        let _ = raw;
        Err(WriteError::Unsupported("raw value writes"))
    }

    /// Flushes buffered output to the underlying sink without changing
    /// logical state.
    ///
    /// # Errors
    ///
    /// Fails on a sink fault.
    fn flush(&mut self) -> Result<(), WriteError>;

    /// Flushes and marks the sink closed. Idempotent; writes after close
    /// are usage errors.
    ///
    /// # Errors
    ///
    /// Fails on a sink fault during the final flush.
    fn close(&mut self) -> Result<(), WriteError>;

    /// Writes a field name and a string value in one call.
    ///
    /// # Errors
    ///
    /// See [`Self::write_field_name`] and [`Self::write_string`].
    fn write_string_field(&mut self, name: &str, value: &str) -> Result<(), WriteError> {
        self.write_field_name(name)?;
        self.write_string(value)
    }

    /// Writes a field name and a boolean value in one call.
    ///
    /// # Errors
    ///
    /// See [`Self::write_field_name`] and [`Self::write_bool`].
    fn write_bool_field(&mut self, name: &str, value: bool) -> Result<(), WriteError> {
        self.write_field_name(name)?;
        self.write_bool(value)
    }

    /// Writes a field name and `null` in one call.
    ///
    /// # Errors
    ///
    /// See [`Self::write_field_name`] and [`Self::write_null`].
    fn write_null_field(&mut self, name: &str) -> Result<(), WriteError> {
        self.write_field_name(name)?;
        self.write_null()
    }

    /// Writes a field name and an `i32` value in one call.
    ///
    /// # Errors
    ///
    /// See [`Self::write_field_name`] and [`Self::write_int`].
    fn write_int_field(&mut self, name: &str, value: i32) -> Result<(), WriteError> {
        self.write_field_name(name)?;
        self.write_int(value)
    }

    /// Writes a field name and an `i64` value in one call.
    ///
    /// # Errors
    ///
    /// See [`Self::write_field_name`] and [`Self::write_long`].
    fn write_long_field(&mut self, name: &str, value: i64) -> Result<(), WriteError> {
        self.write_field_name(name)?;
        self.write_long(value)
    }

    /// Writes a field name and a double value in one call.
    ///
    /// # Errors
    ///
    /// See [`Self::write_field_name`] and [`Self::write_double`].
    fn write_double_field(&mut self, name: &str, value: f64) -> Result<(), WriteError> {
        self.write_field_name(name)?;
        self.write_double(value)
    }
}
