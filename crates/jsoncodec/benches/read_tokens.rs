#![expect(missing_docs)]

//! Throughput of the token reader over generated documents, whole-input and
//! chunked.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jsoncodec::{JsonReader, JsonWriter, Token, TokenSink, TokenSource};

/// An object of `members` members mixing strings, numbers, and small
/// arrays.
fn build_document(members: usize) -> String {
    let mut writer = JsonWriter::new(String::new());
    writer.write_start_object().unwrap();
    for i in 0..members {
        let name = format!("member_{i}");
        match i % 4 {
            0 => writer.write_string_field(&name, "a short string value").unwrap(),
            1 => writer.write_int_field(&name, i as i32 * 37).unwrap(),
            2 => writer.write_double_field(&name, i as f64 * 0.125).unwrap(),
            _ => {
                writer.write_field_name(&name).unwrap();
                writer.write_start_array().unwrap();
                writer.write_long(i as i64).unwrap();
                writer.write_null().unwrap();
                writer.write_bool(true).unwrap();
                writer.write_end_array().unwrap();
            }
        }
    }
    writer.write_end_object().unwrap();
    writer.into_inner()
}

fn walk(reader: &mut JsonReader) -> usize {
    let mut count = 0;
    while let Some(token) = reader.next_token().unwrap() {
        if token == Token::NotAvailable {
            break;
        }
        count += 1;
    }
    count
}

fn bench_whole_input(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_tokens/whole");
    for members in [16usize, 256, 4096] {
        let doc = build_document(members);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(members), &doc, |b, doc| {
            b.iter(|| {
                let mut reader = JsonReader::new();
                reader.feed(doc).unwrap();
                reader.end_input();
                black_box(walk(&mut reader))
            });
        });
    }
    group.finish();
}

fn bench_chunked_input(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_tokens/chunked_64");
    for members in [16usize, 256, 4096] {
        let doc = build_document(members);
        let chunks: Vec<String> = doc
            .chars()
            .collect::<Vec<_>>()
            .chunks(64)
            .map(|c| c.iter().collect())
            .collect();
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(members), &chunks, |b, chunks| {
            b.iter(|| {
                let mut reader = JsonReader::new();
                let mut count = 0;
                for chunk in chunks {
                    reader.feed(chunk).unwrap();
                    count += walk(&mut reader);
                }
                reader.end_input();
                count += walk(&mut reader);
                black_box(count)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_whole_input, bench_chunked_input);
criterion_main!(benches);
