#![no_main]

use jsoncodec::{JsonReader, ReadError, ReaderOptions, Token, TokenSource};
use libfuzzer_sys::fuzz_target;

// 1 flag byte + 4-byte chunk-split seed.
const HEADER: usize = 5;

fuzz_target!(|data: &[u8]| run(data));

fn run(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let flags = data[0];
    let split_seed = u64::from(u32::from_le_bytes(data[1..5].try_into().unwrap()));
    let text = String::from_utf8_lossy(&data[HEADER..]);
    if text.is_empty() {
        return;
    }

    let options = ReaderOptions {
        strict_duplicate_detection: flags & 1 != 0,
        allow_unquoted_control_chars: flags & 2 != 0,
        allow_backslash_escaping_any: flags & 4 != 0,
        allow_single_quotes: flags & 8 != 0,
        allow_unicode_whitespace: flags & 16 != 0,
        allow_multiple_documents: flags & 32 != 0,
        use_big_decimal_for_floats: flags & 64 != 0,
    };

    let mut reader = JsonReader::with_options(options);
    for chunk in split_into_safe_chunks(&text, split_seed) {
        if reader.feed(chunk).is_err() || drain(&mut reader).is_err() {
            return;
        }
    }
    reader.end_input();
    let _ = drain(&mut reader);
}

/// Pulls tokens until a pause or the end, poking every accessor so lazy
/// materialization runs on fuzzer-shaped payloads. Errors from accessors
/// are expected on hostile input; only `next_token` errors stop the walk.
fn drain(reader: &mut JsonReader) -> Result<(), ReadError> {
    loop {
        match reader.next_token()? {
            Some(Token::NotAvailable) | None => return Ok(()),
            Some(token) => {
                let _ = reader.text();
                let _ = reader.current_name();
                if token.is_numeric() {
                    let _ = reader.number_type();
                    let _ = reader.number_value();
                    let _ = reader.int_value();
                    let _ = reader.long_value();
                    let _ = reader.bigint_value();
                    let _ = reader.double_value();
                    let _ = reader.decimal_value();
                }
                if token == Token::String {
                    let _ = reader.binary_value();
                }
            }
        }
    }
}

/// Splits the input into deterministic chunks that always end on a char
/// boundary, so feeding never panics regardless of the seed.
fn split_into_safe_chunks(text: &str, split_seed: u64) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let len = text.len();
    while start < len {
        let remaining = len - start;
        let mut size = (split_seed as usize % remaining) + 1;
        while start + size < len && !text.is_char_boundary(start + size) {
            size += 1;
        }
        chunks.push(&text[start..start + size]);
        start += size;
    }
    chunks
}
