//! Error types shared by the reader and the writer.
//!
//! Reader-side failures pair an error kind with the [`Location`] at which
//! they were detected and render as `{kind} at {line}:{column}`. Writer-side
//! failures are pure call-sequence errors and carry no location; the
//! offending call is the location.

use alloc::string::String;

use thiserror::Error;

use crate::{
    base64::Base64Error, context::ContextKind, location::Location, numbers::CoercionError,
    token::Token,
};

/// A reader failure: what went wrong, and where in the input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} at {location}")]
pub struct ReadError {
    /// What went wrong.
    pub kind: ReadErrorKind,
    /// Where in the input it was detected.
    pub location: Location,
}

impl ReadError {
    pub(crate) fn new(kind: impl Into<ReadErrorKind>, location: Location) -> Self {
        Self {
            kind: kind.into(),
            location,
        }
    }
}

/// The kind of a [`ReadError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReadErrorKind {
    /// The input is not well-formed JSON. Fatal: every subsequent
    /// `next_token` call reports the same error.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// An object repeated a field name at one nesting level while
    /// [`crate::ReaderOptions::strict_duplicate_detection`] is enabled.
    /// Fatal, raised at the second occurrence of the name.
    #[error("duplicate field name {0:?}")]
    DuplicateField(String),

    /// The requested numeric representation cannot exactly hold the parsed
    /// value. Not fatal: the token stays current and a wider accessor may
    /// still succeed.
    #[error("{0}")]
    Coercion(#[from] CoercionError),

    /// The current string token is not valid base64 content.
    #[error("invalid base64 content: {0}")]
    Base64(#[from] Base64Error),

    /// A scalar accessor was called against an incompatible token kind.
    #[error("expected a {expected} token, but the current token is {token}")]
    TypeMismatch {
        /// What the accessor needed.
        expected: &'static str,
        /// What is actually current.
        token: Token,
    },

    /// A scalar accessor was called before the first `next_token` or after
    /// end-of-input.
    #[error("no token is current")]
    NoToken,

    /// The reader has been closed.
    #[error("reader is closed")]
    Closed,

    /// `feed` was called after `end_input` signaled true end-of-input.
    #[error("input supplied after end of input was signaled")]
    InputAfterEnd,

    /// An optional capability is not implemented by this token source.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

/// A lexical or structural fault in the input text.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SyntaxError {
    /// A character that cannot start or continue a token here.
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),

    /// A backslash escape with an unrecognized escape character.
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    /// A non-hexadecimal digit inside a `\u` escape.
    #[error("invalid unicode escape digit {0:?}")]
    InvalidUnicodeEscape(char),

    /// A `\u` escape produced a surrogate code unit without its partner.
    #[error("unpaired surrogate escape \\u{0:04X}")]
    UnpairedSurrogate(u32),

    /// A raw control character inside a string, without
    /// [`crate::ReaderOptions::allow_unquoted_control_chars`].
    #[error("unescaped control character U+{0:04X} in string")]
    UnescapedControl(u32),

    /// A number literal with a superfluous leading zero.
    #[error("leading zeros are not allowed in numbers")]
    LeadingZero,

    /// A number literal that stops where a digit is required (after a sign,
    /// a decimal point, or an exponent marker).
    #[error("malformed number literal")]
    InvalidNumber,

    /// A comma directly before a closing bracket.
    #[error("trailing comma before {0:?}")]
    TrailingComma(char),

    /// Something other than `:` followed an object member name.
    #[error("expected ':' after field name, found {0:?}")]
    ExpectedColon(char),

    /// Something other than a comma or the matching close bracket followed
    /// a value inside a container.
    #[error("expected ',' or {close:?}, found {found:?}")]
    ExpectedCommaOr {
        /// The close bracket of the innermost open container.
        close: char,
        /// What was actually read.
        found: char,
    },

    /// A close bracket that does not match the innermost open container.
    #[error("mismatched {found:?}: the open container ends with {expected:?}")]
    MismatchedClose {
        /// The close bracket the innermost open container requires.
        expected: char,
        /// What was actually read.
        found: char,
    },

    /// Non-whitespace input after a complete document, without
    /// [`crate::ReaderOptions::allow_multiple_documents`].
    #[error("unexpected {0:?} after the end of the document")]
    TrailingData(char),

    /// The input ended inside a token or with open containers.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

/// A writer failure: an illegal call sequence, an unencodable value, or a
/// sink fault. Raised synchronously at the offending call, never deferred
/// to `flush`/`close`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WriteError {
    /// A value write directly inside an object, with no field name pending.
    #[error("a field name must be written before a value in an object context")]
    ValueWithoutFieldName,

    /// `write_field_name` outside an object context.
    #[error("field names are only legal inside an object")]
    FieldNameOutsideObject,

    /// `write_field_name` while a previous name still awaits its value.
    #[error("field name {0:?} already awaits its value")]
    FieldNameAlreadyPending(String),

    /// The object was ended while a field name still awaits its value.
    #[error("object ended while field name {0:?} awaits its value")]
    DanglingFieldName(String),

    /// An end call that does not match the innermost open container.
    #[error("attempted to end an {attempted} but the current context is {open}")]
    MismatchedEnd {
        /// The container kind the end call would close.
        attempted: ContextKind,
        /// The kind of the current context.
        open: ContextKind,
    },

    /// A second root value without
    /// [`crate::WriterOptions::allow_multiple_documents`].
    #[error("multiple root values are not enabled")]
    SecondRootValue,

    /// `write_double` was given a NaN or infinite value.
    #[error("NaN and infinite values cannot be written as JSON numbers")]
    NonFiniteNumber,

    /// `write_number_text` was given text outside the JSON number grammar.
    #[error("not a valid JSON number: {0:?}")]
    InvalidNumberText(String),

    /// A decimal's scale exceeds the plain-notation guard of
    /// [`crate::WriterOptions::write_bigdecimal_as_plain`].
    #[error("decimal scale {0} exceeds the plain-notation limit of 9999")]
    DecimalScaleOutOfRange(i64),

    /// The writer has been closed.
    #[error("writer is closed")]
    Closed,

    /// An optional capability is not implemented by this token sink.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// The underlying text sink reported a failure.
    #[error("{0}")]
    Sink(#[from] crate::writer::SinkError),
}
