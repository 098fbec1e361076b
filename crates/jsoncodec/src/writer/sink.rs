//! The character sink the writer emits into.

use alloc::string::String;
use core::fmt;

use thiserror::Error;

/// A failure reported by a [`TextSink`] implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("sink error: {message}")]
pub struct SinkError {
    /// Human-readable description of the fault.
    pub message: String,
}

impl SinkError {
    /// Creates a sink error from any displayable cause.
    pub fn new(cause: impl fmt::Display) -> Self {
        use alloc::string::ToString;
        Self {
            message: cause.to_string(),
        }
    }
}

/// An ordered character sink supporting sequential writes and an explicit
/// flush.
///
/// The engine performs no buffering of its own beyond per-call scratch
/// space; a sink wrapping an expensive destination should buffer
/// internally and honor [`TextSink::flush`].
pub trait TextSink {
    /// Appends `text` to the sink.
    ///
    /// # Errors
    ///
    /// Implementations report their own failures; the in-memory
    /// implementations never fail.
    fn write_str(&mut self, text: &str) -> Result<(), SinkError>;

    /// Pushes buffered output toward the final destination.
    ///
    /// # Errors
    ///
    /// Implementations report their own failures.
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl TextSink for String {
    fn write_str(&mut self, text: &str) -> Result<(), SinkError> {
        self.push_str(text);
        Ok(())
    }
}

/// UTF-8 bytes into a growable buffer.
impl TextSink for alloc::vec::Vec<u8> {
    fn write_str(&mut self, text: &str) -> Result<(), SinkError> {
        self.extend_from_slice(text.as_bytes());
        Ok(())
    }
}

impl<S: TextSink + ?Sized> TextSink for &mut S {
    fn write_str(&mut self, text: &str) -> Result<(), SinkError> {
        (**self).write_str(text)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}
