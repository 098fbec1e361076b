//! Incremental JSON token reader and writer.
//!
//! Two symmetric engines over one token vocabulary: [`JsonReader`] pulls
//! [`Token`]s out of chunked character input, [`JsonWriter`] pushes them
//! into a character sink, and both validate structure against a context
//! stack as they go. Numeric literals are classified by digit shape and
//! materialized lazily in the narrowest faithful representation (`i32`,
//! `i64`, [`num_bigint::BigInt`], `f64`, [`bigdecimal::BigDecimal`]), with
//! every conversion between representations either exact or an explicit
//! overflow error.
//!
//! Higher layers consume the engines through the [`TokenSource`] and
//! [`TokenSink`] traits; nothing here builds value trees, maps objects, or
//! touches I/O beyond the fed chunks and the [`TextSink`].
//!
//! ```rust
//! use jsoncodec::{JsonReader, JsonWriter, Token, TokenSink, TokenSource};
//!
//! let mut writer = JsonWriter::new(String::new());
//! writer.write_start_array()?;
//! writer.write_string("streaming")?;
//! writer.write_long(1 << 40)?;
//! writer.write_end_array()?;
//! writer.close()?;
//! let text = writer.into_inner();
//! assert_eq!(text, r#"["streaming",1099511627776]"#);
//!
//! let mut reader = JsonReader::new();
//! reader.feed(&text)?;
//! reader.end_input();
//! assert_eq!(reader.next_token()?, Some(Token::StartArray));
//! assert_eq!(reader.next_token()?, Some(Token::String));
//! assert_eq!(reader.text()?, "streaming");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod base64;
mod context;
mod error;
mod location;
mod numbers;
mod options;
mod reader;
mod stream;
mod token;
mod writer;

#[cfg(test)]
mod tests;

pub use base64::{decode as base64_decode, encode as base64_encode};
pub use base64::{Base64Error, Base64ErrorKind, Base64Variant, MIME, PEM, STANDARD, URL_SAFE};
pub use context::ContextKind;
pub use error::{ReadError, ReadErrorKind, SyntaxError, WriteError};
pub use location::Location;
pub use numbers::{coerce, CoercionError, Number, NumberKind};
pub use options::{ReaderOptions, WriterOptions};
pub use reader::JsonReader;
pub use stream::{TokenSink, TokenSource};
pub use token::Token;
pub use writer::{JsonWriter, SinkError, TextSink};
