#![allow(clippy::struct_excessive_bools)]

//! Immutable per-instance configuration.

/// Configuration options for [`crate::JsonReader`].
///
/// Constructed once per reader and never mutated afterwards.
///
/// # Examples
///
/// ```rust
/// use jsoncodec::{JsonReader, ReaderOptions};
///
/// let reader = JsonReader::with_options(ReaderOptions {
///     strict_duplicate_detection: true,
///     ..Default::default()
/// });
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ReaderOptions {
    /// Whether to fail when an object repeats a field name at the same
    /// nesting level.
    ///
    /// The failure is raised at the point the second occurrence of the name
    /// is read. When `false`, both occurrences are exposed in order.
    ///
    /// # Default
    ///
    /// `false`
    pub strict_duplicate_detection: bool,

    /// Whether to accept raw control characters (U+0000..U+001F) inside
    /// string literals instead of requiring escapes.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unquoted_control_chars: bool,

    /// Whether to accept a backslash before any character, passing the
    /// escaped character through verbatim when it has no defined meaning.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_backslash_escaping_any: bool,

    /// Whether to accept single-quoted string literals.
    ///
    /// Inside a single-quoted string the `\'` escape is recognized and a
    /// bare `"` needs no escape.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_single_quotes: bool,

    /// Whether to allow any Unicode whitespace between tokens.
    ///
    /// By default only the four whitespace characters defined by the JSON
    /// specification are recognized: space (U+0020), line feed (U+000A),
    /// carriage return (U+000D), and horizontal tab (U+0009).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unicode_whitespace: bool,

    /// Whether to parse multiple whitespace-delimited JSON documents from
    /// one input stream.
    ///
    /// When `false`, non-whitespace input after the first complete document
    /// is a syntax error.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_multiple_documents: bool,

    /// Whether [`crate::TokenSource::number_value`] materializes literals
    /// with a fraction or exponent as exact arbitrary-precision decimals
    /// instead of lossy binary doubles.
    ///
    /// The explicit accessors are unaffected:
    /// [`crate::TokenSource::double_value`] always takes the fast lossy
    /// path and [`crate::TokenSource::decimal_value`] always takes the
    /// exact path.
    ///
    /// # Default
    ///
    /// `false`
    pub use_big_decimal_for_floats: bool,
}

/// Configuration options for [`crate::JsonWriter`].
///
/// # Examples
///
/// ```rust
/// use jsoncodec::{JsonWriter, WriterOptions};
///
/// let writer = JsonWriter::with_options(
///     String::new(),
///     WriterOptions {
///         pretty: true,
///         ..Default::default()
///     },
/// );
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct WriterOptions {
    /// Whether to escape every non-ASCII character as `\uXXXX` (with
    /// surrogate pairs for characters outside the basic plane), producing
    /// pure-ASCII output.
    ///
    /// # Default
    ///
    /// `false`
    pub escape_non_ascii: bool,

    /// Whether to emit all numbers as quoted strings.
    ///
    /// Useful for consumers that cannot represent 64-bit or
    /// arbitrary-precision values without loss.
    ///
    /// # Default
    ///
    /// `false`
    pub write_numbers_as_strings: bool,

    /// Whether to emit arbitrary-precision decimals in plain (non-scientific)
    /// notation.
    ///
    /// Plain notation expands the exponent into written-out digits, so it is
    /// only allowed for decimal scales within ±9999; a value outside that
    /// range fails with [`crate::WriteError::DecimalScaleOutOfRange`] rather
    /// than amplifying pathologically small or large exponents into
    /// megabytes of zeros.
    ///
    /// # Default
    ///
    /// `false`
    pub write_bigdecimal_as_plain: bool,

    /// Whether to pretty-print: two-space indentation, `": "` after field
    /// names, one element per line, `{}`/`[]` compact when empty.
    ///
    /// # Default
    ///
    /// `false`
    pub pretty: bool,

    /// Whether to allow multiple root values in one output stream,
    /// separated by a space (a newline when `pretty` is set).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_multiple_documents: bool,
}
