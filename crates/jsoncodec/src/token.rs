//! The lexical unit of the token stream.

use core::fmt;

/// One lexical unit of a JSON document.
///
/// A [`crate::JsonReader`] produces exactly one current token per successful
/// [`crate::TokenSource::next_token`] call; scalar payloads (string content,
/// number text, decoded binary) are materialized lazily through the accessor
/// methods rather than carried in the token itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Token {
    /// `{` — an object was opened.
    StartObject,
    /// `}` — the innermost object was closed.
    EndObject,
    /// `[` — an array was opened.
    StartArray,
    /// `]` — the innermost array was closed.
    EndArray,
    /// An object member name. The decoded name is available via
    /// [`crate::TokenSource::text`].
    FieldName,
    /// A string value. The decoded content is available via
    /// [`crate::TokenSource::text`].
    String,
    /// A numeric literal with no fraction and no exponent.
    Int,
    /// A numeric literal with a fraction and/or an exponent.
    Float,
    /// The literal `true`.
    True,
    /// The literal `false`.
    False,
    /// The literal `null`.
    Null,
    /// More input is required before the next token can be produced.
    ///
    /// Only returned while [`crate::JsonReader::end_input`] has not been
    /// called; feeding another chunk and calling `next_token` again resumes
    /// lexing exactly where it stopped, including mid-string and mid-number.
    NotAvailable,
}

impl Token {
    /// Returns `true` for [`Token::StartObject`] and [`Token::StartArray`].
    #[must_use]
    pub fn is_structural_start(self) -> bool {
        matches!(self, Self::StartObject | Self::StartArray)
    }

    /// Returns `true` for [`Token::EndObject`] and [`Token::EndArray`].
    #[must_use]
    pub fn is_structural_end(self) -> bool {
        matches!(self, Self::EndObject | Self::EndArray)
    }

    /// Returns `true` for [`Token::Int`] and [`Token::Float`].
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Returns `true` for scalar value tokens (string, numbers, booleans,
    /// null). Field names and structural tokens are not scalar values.
    #[must_use]
    pub fn is_scalar_value(self) -> bool {
        matches!(
            self,
            Self::String | Self::Int | Self::Float | Self::True | Self::False | Self::Null
        )
    }

    /// The fixed source text of the token, for tokens that have one: the
    /// punctuator for structural tokens and the literal text for
    /// `true`/`false`/`null`. `None` for tokens with a variable payload.
    #[must_use]
    pub fn fixed_text(self) -> Option<&'static str> {
        match self {
            Self::StartObject => Some("{"),
            Self::EndObject => Some("}"),
            Self::StartArray => Some("["),
            Self::EndArray => Some("]"),
            Self::True => Some("true"),
            Self::False => Some("false"),
            Self::Null => Some("null"),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StartObject => "start-object",
            Self::EndObject => "end-object",
            Self::StartArray => "start-array",
            Self::EndArray => "end-array",
            Self::FieldName => "field-name",
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
            Self::NotAvailable => "not-available",
        })
    }
}
