mod parse_good;
mod writer;

use alloc::{string::String, vec::Vec};

use crate::{JsonReader, ReaderOptions, Token, TokenSource};

/// Feeds the whole input at once and collects the produced tokens.
pub(crate) fn tokens_with(input: &str, options: ReaderOptions) -> Vec<Token> {
    let mut reader = reader_over(input, options);
    let mut out = Vec::new();
    while let Some(token) = reader.next_token().unwrap() {
        out.push(token);
    }
    out
}

pub(crate) fn tokens(input: &str) -> Vec<Token> {
    tokens_with(input, ReaderOptions::default())
}

/// A reader with the input fully fed and end-of-input signaled.
pub(crate) fn reader_over(input: &str, options: ReaderOptions) -> JsonReader {
    let mut reader = JsonReader::with_options(options);
    reader.feed(input).unwrap();
    reader.end_input();
    reader
}

/// A reader positioned on the first token of the input.
pub(crate) fn reader_on_first(input: &str) -> JsonReader {
    let mut reader = reader_over(input, ReaderOptions::default());
    reader.next_token().unwrap().expect("input has a token");
    reader
}

/// Feeds the input in chunks of the given sizes (the final chunk takes the
/// remainder) and collects tokens, dropping `NotAvailable` pauses.
pub(crate) fn tokens_chunked(input: &str, chunk_len: usize) -> Vec<Token> {
    let chars: Vec<char> = input.chars().collect();
    let mut reader = JsonReader::new();
    let mut out = Vec::new();
    for chunk in chars.chunks(chunk_len.max(1)) {
        let chunk: String = chunk.iter().collect();
        reader.feed(&chunk).unwrap();
        drain(&mut reader, &mut out);
    }
    reader.end_input();
    drain(&mut reader, &mut out);
    out
}

fn drain(reader: &mut JsonReader, out: &mut Vec<Token>) {
    loop {
        match reader.next_token().unwrap() {
            Some(Token::NotAvailable) | None => break,
            Some(token) => out.push(token),
        }
    }
}
