//! The incremental token writer.
//!
//! [`JsonWriter`] validates every call against the write-context stack
//! before emitting anything, so structural misuse fails synchronously at
//! the offending call and the output is well-formed by construction.
//! Separator placement is driven by the per-level values-written counter;
//! field names are emitted immediately (with their separator and colon),
//! leaving the value slot pending until the matching value write.

mod sink;

use alloc::string::{String, ToString};
use core::fmt::Write as _;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

pub use sink::{SinkError, TextSink};

use crate::{
    base64::{self, Base64Variant},
    context::{ContextKind, WriteContextStack},
    error::WriteError,
    options::WriterOptions,
    stream::TokenSink,
};

/// Largest decimal scale magnitude expanded into plain notation.
const MAX_PLAIN_DECIMAL_SCALE: i64 = 9999;

/// The incremental JSON token writer.
///
/// # Examples
///
/// ```rust
/// use jsoncodec::{JsonWriter, TokenSink};
///
/// let mut writer = JsonWriter::new(String::new());
/// writer.write_start_object()?;
/// writer.write_field_name("x")?;
/// writer.write_int(1)?;
/// writer.write_end_object()?;
/// writer.close()?;
/// assert_eq!(writer.into_inner(), r#"{"x":1}"#);
/// # Ok::<(), jsoncodec::WriteError>(())
/// ```
pub struct JsonWriter<S: TextSink> {
    sink: S,
    options: WriterOptions,
    context: WriteContextStack,
    /// Reused per-call staging buffer for escaping and number formatting.
    scratch: String,
    closed: bool,
}

impl<S: TextSink> JsonWriter<S> {
    /// Creates a writer with default options emitting into `sink`.
    pub fn new(sink: S) -> Self {
        Self::with_options(sink, WriterOptions::default())
    }

    /// Creates a writer with the given options emitting into `sink`.
    pub fn with_options(sink: S, options: WriterOptions) -> Self {
        Self {
            sink,
            options,
            context: WriteContextStack::new(),
            scratch: String::new(),
            closed: false,
        }
    }

    /// Consumes the writer and returns the sink.
    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Borrows the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn emit(&mut self, text: &str) -> Result<(), WriteError> {
        self.sink.write_str(text)?;
        Ok(())
    }

    fn emit_indent(&mut self, depth: usize) -> Result<(), WriteError> {
        self.sink.write_str("\n")?;
        for _ in 0..depth {
            self.sink.write_str("  ")?;
        }
        Ok(())
    }

    /// Verifies a value is expected here and emits any separator owed
    /// before it. Does not bump the counter; [`Self::committed`] does.
    fn before_value(&mut self) -> Result<(), WriteError> {
        if self.closed {
            return Err(WriteError::Closed);
        }
        match self.context.kind() {
            ContextKind::Root => {
                if self.context.entry_count() > 0 {
                    if !self.options.allow_multiple_documents {
                        return Err(WriteError::SecondRootValue);
                    }
                    self.emit(if self.options.pretty { "\n" } else { " " })?;
                }
            }
            ContextKind::Array => {
                if self.context.entry_count() > 0 {
                    self.emit(",")?;
                }
                if self.options.pretty {
                    let depth = self.context.depth();
                    self.emit_indent(depth)?;
                }
            }
            ContextKind::Object => {
                if self.context.pending_name().is_none() {
                    return Err(WriteError::ValueWithoutFieldName);
                }
            }
        }
        Ok(())
    }

    fn committed(&mut self) {
        self.context.note_value();
    }

    fn write_escaped(&mut self, value: &str) -> Result<(), WriteError> {
        let mut staged = core::mem::take(&mut self.scratch);
        staged.clear();
        escape_into(&mut staged, value, self.options.escape_non_ascii);
        let result = self.emit(&staged);
        self.scratch = staged;
        result
    }

    /// Emits already-rendered number text, quoting it when numbers are
    /// written as strings.
    fn emit_number(&mut self, text: &str) -> Result<(), WriteError> {
        self.before_value()?;
        if self.options.write_numbers_as_strings {
            self.emit("\"")?;
            self.emit(text)?;
            self.emit("\"")?;
        } else {
            self.emit(text)?;
        }
        self.committed();
        Ok(())
    }

    fn render_decimal(&self, value: &BigDecimal) -> Result<String, WriteError> {
        if self.options.write_bigdecimal_as_plain {
            let (_, scale) = value.as_bigint_and_exponent();
            if scale.abs() > MAX_PLAIN_DECIMAL_SCALE {
                return Err(WriteError::DecimalScaleOutOfRange(scale));
            }
            // Display renders plain notation.
            return Ok(value.to_string());
        }
        Ok(value.to_scientific_notation())
    }
}

impl<S: TextSink> TokenSink for JsonWriter<S> {
    fn write_start_object(&mut self) -> Result<(), WriteError> {
        self.before_value()?;
        self.emit("{")?;
        self.committed();
        self.context.push(ContextKind::Object);
        Ok(())
    }

    fn write_end_object(&mut self) -> Result<(), WriteError> {
        if self.closed {
            return Err(WriteError::Closed);
        }
        if self.context.kind() != ContextKind::Object {
            return Err(WriteError::MismatchedEnd {
                attempted: ContextKind::Object,
                open: self.context.kind(),
            });
        }
        if let Some(name) = self.context.pending_name() {
            return Err(WriteError::DanglingFieldName(name.to_string()));
        }
        if self.options.pretty && self.context.entry_count() > 0 {
            let depth = self.context.depth() - 1;
            self.emit_indent(depth)?;
        }
        self.emit("}")?;
        self.context.pop();
        Ok(())
    }

    fn write_start_array(&mut self) -> Result<(), WriteError> {
        self.before_value()?;
        self.emit("[")?;
        self.committed();
        self.context.push(ContextKind::Array);
        Ok(())
    }

    fn write_end_array(&mut self) -> Result<(), WriteError> {
        if self.closed {
            return Err(WriteError::Closed);
        }
        if self.context.kind() != ContextKind::Array {
            return Err(WriteError::MismatchedEnd {
                attempted: ContextKind::Array,
                open: self.context.kind(),
            });
        }
        if self.options.pretty && self.context.entry_count() > 0 {
            let depth = self.context.depth() - 1;
            self.emit_indent(depth)?;
        }
        self.emit("]")?;
        self.context.pop();
        Ok(())
    }

    fn write_field_name(&mut self, name: &str) -> Result<(), WriteError> {
        if self.closed {
            return Err(WriteError::Closed);
        }
        if self.context.kind() != ContextKind::Object {
            return Err(WriteError::FieldNameOutsideObject);
        }
        if let Some(pending) = self.context.pending_name() {
            return Err(WriteError::FieldNameAlreadyPending(pending.to_string()));
        }
        if self.context.entry_count() > 0 {
            self.emit(",")?;
        }
        if self.options.pretty {
            let depth = self.context.depth();
            self.emit_indent(depth)?;
        }
        self.write_escaped(name)?;
        self.emit(if self.options.pretty { ": " } else { ":" })?;
        self.context.set_pending_name(name);
        Ok(())
    }

    fn write_string(&mut self, value: &str) -> Result<(), WriteError> {
        self.before_value()?;
        self.write_escaped(value)?;
        self.committed();
        Ok(())
    }

    fn write_bool(&mut self, value: bool) -> Result<(), WriteError> {
        self.before_value()?;
        self.emit(if value { "true" } else { "false" })?;
        self.committed();
        Ok(())
    }

    fn write_null(&mut self) -> Result<(), WriteError> {
        self.before_value()?;
        self.emit("null")?;
        self.committed();
        Ok(())
    }

    fn write_int(&mut self, value: i32) -> Result<(), WriteError> {
        let mut buf = itoa::Buffer::new();
        let text = buf.format(value);
        self.emit_number(text)
    }

    fn write_long(&mut self, value: i64) -> Result<(), WriteError> {
        let mut buf = itoa::Buffer::new();
        let text = buf.format(value);
        self.emit_number(text)
    }

    fn write_bigint(&mut self, value: &BigInt) -> Result<(), WriteError> {
        self.emit_number(&value.to_string())
    }

    fn write_double(&mut self, value: f64) -> Result<(), WriteError> {
        if !value.is_finite() {
            return Err(WriteError::NonFiniteNumber);
        }
        let mut buf = ryu::Buffer::new();
        let text = buf.format_finite(value);
        self.emit_number(text)
    }

    fn write_decimal(&mut self, value: &BigDecimal) -> Result<(), WriteError> {
        let text = self.render_decimal(value)?;
        self.emit_number(&text)
    }

    fn write_number_text(&mut self, text: &str) -> Result<(), WriteError> {
        if !is_valid_json_number(text) {
            return Err(WriteError::InvalidNumberText(text.to_string()));
        }
        self.emit_number(text)
    }

    fn write_binary_with(
        &mut self,
        bytes: &[u8],
        variant: &Base64Variant,
    ) -> Result<(), WriteError> {
        // Line-wrapped variants produce newlines; routing through the
        // string escaper keeps the emitted JSON well-formed.
        let encoded = base64::encode(bytes, variant);
        self.write_string(&encoded)
    }

    fn write_raw_value(&mut self, raw: &str) -> Result<(), WriteError> {
        self.before_value()?;
        self.emit(raw)?;
        self.committed();
        Ok(())
    }

    fn flush(&mut self) -> Result<(), WriteError> {
        self.sink.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), WriteError> {
        if self.closed {
            return Ok(());
        }
        self.sink.flush()?;
        self.closed = true;
        Ok(())
    }
}

fn escape_into(out: &mut String, value: &str, escape_non_ascii: bool) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c if escape_non_ascii && !c.is_ascii() => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{unit:04x}");
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Validates `text` against the JSON number grammar.
fn is_valid_json_number(text: &str) -> bool {
    let mut rest = text.strip_prefix('-').unwrap_or(text).as_bytes();
    // Integer part: `0` or a nonzero-led digit run.
    match rest {
        [b'0', tail @ ..] => rest = tail,
        [b'1'..=b'9', tail @ ..] => {
            rest = tail;
            while let [b'0'..=b'9', tail @ ..] = rest {
                rest = tail;
            }
        }
        _ => return false,
    }
    if let [b'.', tail @ ..] = rest {
        rest = tail;
        let mut digits = 0;
        while let [b'0'..=b'9', tail @ ..] = rest {
            rest = tail;
            digits += 1;
        }
        if digits == 0 {
            return false;
        }
    }
    if let [b'e' | b'E', tail @ ..] = rest {
        rest = tail;
        if let [b'+' | b'-', tail @ ..] = rest {
            rest = tail;
        }
        let mut digits = 0;
        while let [b'0'..=b'9', tail @ ..] = rest {
            rest = tail;
            digits += 1;
        }
        if digits == 0 {
            return false;
        }
    }
    rest.is_empty()
}

#[cfg(test)]
mod tests {
    use super::is_valid_json_number;

    #[test]
    fn number_grammar() {
        for good in ["0", "-0", "1", "-123", "1.5", "0.25", "1e3", "1E+3", "2.5e-10"] {
            assert!(is_valid_json_number(good), "{good} should be valid");
        }
        for bad in ["", "-", "01", "1.", ".5", "1e", "1e+", "+1", "0x1", "1.5.2", "NaN"] {
            assert!(!is_valid_json_number(bad), "{bad} should be invalid");
        }
    }
}
