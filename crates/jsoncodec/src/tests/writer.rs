use alloc::string::{String, ToString};
use core::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::{ContextKind, JsonWriter, TokenSink, WriteError, WriterOptions};

fn writer() -> JsonWriter<String> {
    JsonWriter::new(String::new())
}

fn writer_with(options: WriterOptions) -> JsonWriter<String> {
    JsonWriter::with_options(String::new(), options)
}

#[test]
fn object_with_every_scalar_kind() {
    let mut w = writer();
    w.write_start_object().unwrap();
    w.write_string_field("s", "hi").unwrap();
    w.write_int_field("i", -3).unwrap();
    w.write_long_field("l", 1 << 40).unwrap();
    w.write_double_field("d", 2.5).unwrap();
    w.write_bool_field("b", false).unwrap();
    w.write_null_field("n").unwrap();
    w.write_end_object().unwrap();
    w.close().unwrap();
    assert_eq!(
        w.into_inner(),
        r#"{"s":"hi","i":-3,"l":1099511627776,"d":2.5,"b":false,"n":null}"#
    );
}

#[test]
fn nested_containers_place_separators() {
    let mut w = writer();
    w.write_start_array().unwrap();
    w.write_int(1).unwrap();
    w.write_start_array().unwrap();
    w.write_end_array().unwrap();
    w.write_start_object().unwrap();
    w.write_field_name("a").unwrap();
    w.write_start_array().unwrap();
    w.write_int(2).unwrap();
    w.write_int(3).unwrap();
    w.write_end_array().unwrap();
    w.write_end_object().unwrap();
    w.write_end_array().unwrap();
    assert_eq!(w.into_inner(), r#"[1,[],{"a":[2,3]}]"#);
}

#[test]
fn strings_are_escaped() {
    let mut w = writer();
    w.write_string("a\"b\\c\n\t\u{0001}é").unwrap();
    assert_eq!(w.into_inner(), "\"a\\\"b\\\\c\\n\\t\\u0001\u{e9}\"");
}

#[test]
fn escape_non_ascii_produces_pure_ascii() {
    let mut w = writer_with(WriterOptions {
        escape_non_ascii: true,
        ..Default::default()
    });
    w.write_string("héllo 😀").unwrap();
    assert_eq!(w.into_inner(), "\"h\\u00e9llo \\ud83d\\ude00\"");
}

#[test]
fn field_names_are_escaped_too() {
    let mut w = writer();
    w.write_start_object().unwrap();
    w.write_string_field("tab\there", "v").unwrap();
    w.write_end_object().unwrap();
    assert_eq!(w.into_inner(), r#"{"tab\there":"v"}"#);
}

#[test]
fn pretty_printing_layout() {
    let mut w = writer_with(WriterOptions {
        pretty: true,
        ..Default::default()
    });
    w.write_start_object().unwrap();
    w.write_string_field("name", "streaming").unwrap();
    w.write_field_name("tags").unwrap();
    w.write_start_array().unwrap();
    w.write_int(1).unwrap();
    w.write_int(2).unwrap();
    w.write_end_array().unwrap();
    w.write_field_name("empty").unwrap();
    w.write_start_object().unwrap();
    w.write_end_object().unwrap();
    w.write_end_object().unwrap();
    assert_eq!(
        w.into_inner(),
        "{\n  \"name\": \"streaming\",\n  \"tags\": [\n    1,\n    2\n  ],\n  \"empty\": {}\n}"
    );
}

#[test]
fn numbers_as_strings_quote_every_number() {
    let mut w = writer_with(WriterOptions {
        write_numbers_as_strings: true,
        ..Default::default()
    });
    w.write_start_array().unwrap();
    w.write_int(1).unwrap();
    w.write_double(2.5).unwrap();
    w.write_bigint(&BigInt::from_str("123456789012345678901234567890").unwrap())
        .unwrap();
    w.write_end_array().unwrap();
    assert_eq!(
        w.into_inner(),
        r#"["1","2.5","123456789012345678901234567890"]"#
    );
}

#[test]
fn doubles_render_shortest_and_reject_non_finite() {
    let mut w = writer();
    w.write_start_array().unwrap();
    w.write_double(0.1).unwrap();
    w.write_double(-0.0).unwrap();
    w.write_double(1e300).unwrap();
    assert_eq!(w.write_double(f64::NAN), Err(WriteError::NonFiniteNumber));
    assert_eq!(
        w.write_double(f64::INFINITY),
        Err(WriteError::NonFiniteNumber)
    );
    w.write_end_array().unwrap();
    assert_eq!(w.into_inner(), "[0.1,-0.0,1e300]");
}

#[test]
fn decimals_render_scientific_by_default() {
    let mut w = writer();
    w.write_decimal(&BigDecimal::from_str("12.5").unwrap()).unwrap();
    assert_eq!(w.into_inner(), "1.25e1");
}

#[test]
fn plain_decimal_notation_with_scale_guard() {
    let options = WriterOptions {
        write_bigdecimal_as_plain: true,
        ..Default::default()
    };
    let mut w = writer_with(options);
    w.write_decimal(&BigDecimal::from_str("12.5").unwrap()).unwrap();
    assert_eq!(w.into_inner(), "12.5");

    let mut w = writer_with(options);
    let err = w
        .write_decimal(&BigDecimal::from_str("1e10000").unwrap())
        .unwrap_err();
    assert_eq!(err, WriteError::DecimalScaleOutOfRange(-10000));
    assert_eq!(
        err.to_string(),
        "decimal scale -10000 exceeds the plain-notation limit of 9999"
    );
}

#[test]
fn number_text_is_validated() {
    let mut w = writer();
    w.write_start_array().unwrap();
    w.write_number_text("1.25e-7").unwrap();
    assert_eq!(
        w.write_number_text("0x1f"),
        Err(WriteError::InvalidNumberText("0x1f".to_string()))
    );
    w.write_end_array().unwrap();
    assert_eq!(w.into_inner(), "[1.25e-7]");
}

#[test]
fn binary_values_are_base64_strings() {
    let mut w = writer();
    w.write_binary(b"foobar").unwrap();
    assert_eq!(w.into_inner(), r#""Zm9vYmFy""#);

    // Line-wrapped variants keep the JSON well-formed via escapes.
    let mut w = writer();
    w.write_binary_with(&[0u8; 60], &crate::MIME).unwrap();
    let out = w.into_inner();
    assert!(out.contains("\\n"));
    assert!(!out.contains('\n'));
}

#[test]
fn raw_values_pass_through_with_separators() {
    let mut w = writer();
    w.write_start_array().unwrap();
    w.write_int(1).unwrap();
    w.write_raw_value("{\"pre\":\"rendered\"}").unwrap();
    w.write_end_array().unwrap();
    assert_eq!(w.into_inner(), r#"[1,{"pre":"rendered"}]"#);
}

#[test]
fn value_without_field_name_is_rejected() {
    let mut w = writer();
    w.write_start_object().unwrap();
    assert_eq!(w.write_int(1), Err(WriteError::ValueWithoutFieldName));
}

#[test]
fn field_name_misuse_is_rejected() {
    let mut w = writer();
    assert_eq!(
        w.write_field_name("x"),
        Err(WriteError::FieldNameOutsideObject)
    );
    w.write_start_object().unwrap();
    w.write_field_name("x").unwrap();
    assert_eq!(
        w.write_field_name("y"),
        Err(WriteError::FieldNameAlreadyPending("x".to_string()))
    );
}

#[test]
fn dangling_field_name_blocks_end_object() {
    let mut w = writer();
    w.write_start_object().unwrap();
    w.write_field_name("x").unwrap();
    assert_eq!(
        w.write_end_object(),
        Err(WriteError::DanglingFieldName("x".to_string()))
    );
    // Supplying the value unblocks the close.
    w.write_int(1).unwrap();
    w.write_end_object().unwrap();
    assert_eq!(w.into_inner(), r#"{"x":1}"#);
}

#[test]
fn mismatched_ends_are_rejected() {
    let mut w = writer();
    w.write_start_object().unwrap();
    assert_eq!(
        w.write_end_array(),
        Err(WriteError::MismatchedEnd {
            attempted: ContextKind::Array,
            open: ContextKind::Object,
        })
    );
    let mut w = writer();
    assert_eq!(
        w.write_end_object(),
        Err(WriteError::MismatchedEnd {
            attempted: ContextKind::Object,
            open: ContextKind::Root,
        })
    );
}

#[test]
fn second_root_value_requires_the_option() {
    let mut w = writer();
    w.write_int(1).unwrap();
    assert_eq!(w.write_int(2), Err(WriteError::SecondRootValue));

    let mut w = writer_with(WriterOptions {
        allow_multiple_documents: true,
        ..Default::default()
    });
    w.write_int(1).unwrap();
    w.write_string("two").unwrap();
    assert_eq!(w.into_inner(), "1 \"two\"");
}

#[test]
fn close_is_idempotent_and_blocks_further_writes() {
    let mut w = writer();
    w.write_null().unwrap();
    w.close().unwrap();
    w.close().unwrap();
    assert_eq!(w.write_int(1), Err(WriteError::Closed));
    assert_eq!(w.into_inner(), "null");
}
