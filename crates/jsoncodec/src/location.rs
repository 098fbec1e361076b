//! Input positions for diagnostics.

use core::fmt;

/// An immutable snapshot of a position in the input stream.
///
/// Captured by the reader both at the current cursor
/// ([`crate::TokenSource::current_location`]) and at the first character of
/// the current token ([`crate::TokenSource::token_location`]). Purely
/// diagnostic; nothing in the engine seeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Location {
    /// Characters consumed since the start of the input, 0-based.
    pub offset: usize,
    /// Line number, 1-based.
    pub line: usize,
    /// Column number, 1-based; `None` when column tracking does not apply.
    pub column: Option<usize>,
}

impl Location {
    /// The position before any input has been consumed.
    #[must_use]
    pub const fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: Some(1),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "{}:{column}", self.line),
            None => write!(f, "{}:?", self.line),
        }
    }
}
