use alloc::{string::ToString, vec, vec::Vec};

use super::{reader_over, tokens, tokens_chunked, tokens_with};
use crate::{
    JsonReader, ReaderOptions, Token,
    Token::{
        EndArray, EndObject, FieldName, Float, Int, NotAvailable, Null, StartArray, StartObject,
        String, True,
    },
    TokenSource,
};

#[test]
fn object_token_walk() {
    assert_eq!(
        tokens(r#"{"name":"value","tags":[1,2.5,true,null],"empty":{}}"#),
        vec![
            StartObject,
            FieldName,
            String,
            FieldName,
            StartArray,
            Int,
            Float,
            True,
            Null,
            EndArray,
            FieldName,
            StartObject,
            EndObject,
            EndObject,
        ]
    );
}

#[test]
fn scalar_documents() {
    assert_eq!(tokens("42"), vec![Int]);
    assert_eq!(tokens("-0"), vec![Int]);
    assert_eq!(tokens("3.25e2"), vec![Float]);
    assert_eq!(tokens(r#""hi""#), vec![String]);
    assert_eq!(tokens("false"), vec![Token::False]);
    assert_eq!(tokens("  null  "), vec![Null]);
    assert_eq!(tokens(""), vec![]);
    assert_eq!(tokens("   "), vec![]);
}

#[test]
fn text_exposes_decoded_payloads() {
    let mut reader = reader_over(
        r#"{"aé":"line\nbreak 😀","n":-12.5}"#,
        ReaderOptions::default(),
    );
    let mut seen = Vec::new();
    while let Some(token) = reader.next_token().unwrap() {
        seen.push((token, reader.text().unwrap().to_string()));
    }
    assert_eq!(
        seen,
        vec![
            (StartObject, "{".to_string()),
            (FieldName, "a\u{e9}".to_string()),
            (String, "line\nbreak \u{1F600}".to_string()),
            (FieldName, "n".to_string()),
            (Float, "-12.5".to_string()),
            (EndObject, "}".to_string()),
        ]
    );
}

#[test]
fn current_name_follows_nesting() {
    let mut reader = reader_over(r#"{"a":{"b":1},"c":2}"#, ReaderOptions::default());
    reader.next_token().unwrap(); // {
    assert_eq!(reader.current_name(), None);
    reader.next_token().unwrap(); // "a"
    assert_eq!(reader.current_name(), Some("a"));
    reader.next_token().unwrap(); // inner {
    reader.next_token().unwrap(); // "b"
    assert_eq!(reader.current_name(), Some("b"));
    reader.next_token().unwrap(); // 1
    reader.next_token().unwrap(); // inner }
    assert_eq!(reader.current_name(), Some("a"));
    reader.next_token().unwrap(); // "c"
    assert_eq!(reader.current_name(), Some("c"));
}

#[test]
fn chunked_input_produces_the_same_tokens() {
    let input = r#"{"key":"a é 😀 b","nums":[-123,45.0e-1,1000000000],"t":true}"#;
    let whole = tokens(input);
    for chunk_len in 1..8 {
        assert_eq!(tokens_chunked(input, chunk_len), whole, "chunk {chunk_len}");
    }
}

#[test]
fn pauses_mid_token_and_resumes() {
    let mut reader = JsonReader::new();
    reader.feed(r#"["abc"#).unwrap();
    assert_eq!(reader.next_token().unwrap(), Some(StartArray));
    assert_eq!(reader.next_token().unwrap(), Some(NotAvailable));
    // Still paused: nothing new arrived.
    assert_eq!(reader.next_token().unwrap(), Some(NotAvailable));
    reader.feed(r#"def"]"#).unwrap();
    reader.end_input();
    assert_eq!(reader.next_token().unwrap(), Some(String));
    assert_eq!(reader.text().unwrap(), "abcdef");
    assert_eq!(reader.next_token().unwrap(), Some(EndArray));
    assert_eq!(reader.next_token().unwrap(), None);
}

#[test]
fn multiple_documents_when_enabled() {
    let options = ReaderOptions {
        allow_multiple_documents: true,
        ..Default::default()
    };
    assert_eq!(
        tokens_with("1 \"two\" [3]\n{}", options),
        vec![Int, String, StartArray, Int, EndArray, StartObject, EndObject]
    );
}

#[test]
fn skip_children_lands_on_the_container_end() {
    let mut reader = reader_over(r#"{"a":{"b":[1,2]},"c":3}"#, ReaderOptions::default());
    reader.next_token().unwrap(); // {
    reader.next_token().unwrap(); // "a"
    reader.next_token().unwrap(); // inner {
    assert!(reader.skip_children().unwrap());
    assert_eq!(reader.current_token(), Some(EndObject));
    assert_eq!(reader.next_token().unwrap(), Some(FieldName));
    assert_eq!(reader.text().unwrap(), "c");
}

#[test]
fn skip_children_is_a_noop_on_scalars() {
    let mut reader = reader_over("[1,2]", ReaderOptions::default());
    reader.next_token().unwrap(); // [
    reader.next_token().unwrap(); // 1
    assert!(reader.skip_children().unwrap());
    assert_eq!(reader.current_token(), Some(Int));
    assert_eq!(reader.next_token().unwrap(), Some(Int));
}

#[test]
fn skip_children_suspends_and_resumes_across_chunks() {
    let mut reader = JsonReader::new();
    reader.feed(r#"{"a":[1,"#).unwrap();
    assert_eq!(reader.next_token().unwrap(), Some(StartObject));
    assert!(!reader.skip_children().unwrap());
    reader.feed("2]}").unwrap();
    reader.end_input();
    assert!(reader.skip_children().unwrap());
    assert_eq!(reader.current_token(), Some(EndObject));
    assert_eq!(reader.next_token().unwrap(), None);
}

#[test]
fn single_quotes_option() {
    let options = ReaderOptions {
        allow_single_quotes: true,
        ..Default::default()
    };
    let mut reader = reader_over(r#"{'it\'s':'a "quote"'}"#, options);
    reader.next_token().unwrap();
    assert_eq!(reader.next_token().unwrap(), Some(FieldName));
    assert_eq!(reader.text().unwrap(), "it's");
    assert_eq!(reader.next_token().unwrap(), Some(String));
    assert_eq!(reader.text().unwrap(), "a \"quote\"");
}

#[test]
fn lenient_escape_and_control_char_options() {
    let options = ReaderOptions {
        allow_backslash_escaping_any: true,
        allow_unquoted_control_chars: true,
        ..Default::default()
    };
    let mut reader = reader_over("\"a\\qb\u{0001}c\"", options);
    assert_eq!(reader.next_token().unwrap(), Some(String));
    assert_eq!(reader.text().unwrap(), "aqb\u{0001}c");
}

#[test]
fn unicode_whitespace_option() {
    let options = ReaderOptions {
        allow_unicode_whitespace: true,
        ..Default::default()
    };
    assert_eq!(
        tokens_with("\u{00A0}[1,\u{2028}2]\u{3000}", options),
        vec![StartArray, Int, Int, EndArray]
    );
}

#[test]
fn lenient_mode_surfaces_duplicate_names_in_order() {
    let mut reader = reader_over(r#"{"a":1,"a":2}"#, ReaderOptions::default());
    reader.next_token().unwrap();
    let mut values = Vec::new();
    while let Some(token) = reader.next_token().unwrap() {
        if token == Int {
            values.push((reader.current_name().unwrap().to_string(), reader.int_value().unwrap()));
        }
    }
    assert_eq!(values, vec![("a".to_string(), 1), ("a".to_string(), 2)]);
}

#[test]
fn locations_track_lines_and_columns() {
    let mut reader = reader_over("[\n  10,\n  20\n]", ReaderOptions::default());
    reader.next_token().unwrap(); // [
    assert_eq!(reader.token_location().line, 1);
    assert_eq!(reader.token_location().column, Some(1));
    reader.next_token().unwrap(); // 10
    assert_eq!(reader.token_location().line, 2);
    assert_eq!(reader.token_location().column, Some(3));
    assert_eq!(reader.token_location().offset, 4);
    reader.next_token().unwrap(); // 20
    assert_eq!(reader.token_location().line, 3);
    assert_eq!(reader.token_location().column, Some(3));
}

#[test]
fn close_releases_the_reader() {
    let mut reader = reader_over("[1]", ReaderOptions::default());
    reader.next_token().unwrap();
    reader.close();
    reader.close(); // idempotent
    assert_eq!(reader.next_token().unwrap(), None);
    assert!(reader.text().is_err());
    assert!(reader.feed("more").is_err());
}

#[test]
fn close_abandons_a_suspended_skip() {
    let mut reader = JsonReader::new();
    reader.feed(r#"{"a":[1,"#).unwrap();
    assert_eq!(reader.next_token().unwrap(), Some(StartObject));
    assert!(!reader.skip_children().unwrap());
    reader.close();
    // No token is current after close, so the skip is a finished no-op.
    assert!(reader.skip_children().unwrap());
    assert_eq!(reader.next_token().unwrap(), None);
}

#[test]
fn binary_value_decodes_the_current_string() {
    let mut reader = reader_over(r#""Zm9vYmFy""#, ReaderOptions::default());
    reader.next_token().unwrap();
    assert_eq!(reader.binary_value().unwrap(), b"foobar");
    // Escapes are resolved before decoding.
    let mut reader = reader_over("\"Zm9\\u0076\"", ReaderOptions::default());
    reader.next_token().unwrap();
    assert_eq!(reader.binary_value().unwrap(), b"foo");
}

#[test]
fn binary_value_with_url_safe_variant() {
    let mut reader = reader_over(r#""--8""#, ReaderOptions::default());
    reader.next_token().unwrap();
    assert_eq!(
        reader.binary_value_with(&crate::URL_SAFE).unwrap(),
        vec![0xFB, 0xEF]
    );
}
