use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::Value;
use slicejson::Reader;

const PASS1: &str = "\
{
    \"JSON Test Pattern pass1\": [
        \"this string has at least 4 different unicode characters: abcd\",
        {\"object with 1 member\": [\"array with 1 element\"]},
        {},
        [],
        -42,
        true,
        false,
        null,
        {
            \"integer\": 1234567890,
            \"real\": -9876.543210,
            \"e\": 0.123456789e-12,
            \"E\": 1.234567890E+34,
            \"zero\": 0,
            \"one\": 1,
            \"space\": \" \",
            \"quote\": \"\\\"\",
            \"backslash\": \"\\\\\",
            \"controls\": \"\\b\\f\\n\\r\\t\",
            \"slash\": \"/ & \\/\",
            \"alpha\": \"abcdefghijklmnopqrstuvwyz\",
            \"ALPHA\": \"ABCDEFGHIJKLMNOPQRSTUVWYZ\",
            \"digit\": \"0123456789\",
            \"true\": true,
            \"false\": false,
            \"null\": null,
            \"array\": [],
            \"object\": {},
            \"address\": \"50 St. James Street\",
            \"url\": \"http://www.example.com/\",
            \"comment\": \"// /* not a real comment */\",
            \"spaced\": [1, 2, 3, 4, 5, 6, 7],
            \"compact\": [1,2,3,4,5,6,7],
            \"jsontext\": \"{\\\"object with 1 member\\\":[\\\"array with 1 element\\\"]}\",
            \"key\": \"value\"
        },
        0.5, 98.6, 99.44, 1066,
        1e1, 0.1e1, 1e-1, 1e00, 2e+00, 2e-00,
        \"rosebud\"
    ]
}";

fn make_large(json: &str) -> String {
    let mut large = String::from("{");
    for i in 0..10000 {
        if large.len() > 1 {
            large.push(',');
        }
        large.push_str(&format!(r#""{}":"#, i));
        large.push_str(json);
    }
    large.push('}');
    large
}

fn slicejson_parse(json_bytes: &[u8]) {
    let mut reader = Reader::new(json_bytes, true);
    while reader.advance().unwrap() {
        // touching the value slice forces the recognizer's work to be
        // observable instead of optimized away
        let _ = reader.value_slice();
    }
}

fn slicejson_benchmark(c: &mut Criterion) {
    let json_bytes = PASS1.as_bytes();

    let json_large = make_large(PASS1);
    let json_large_bytes = json_large.as_bytes();

    c.bench_function("slicejson", |b| {
        b.iter(|| {
            slicejson_parse(json_bytes);
        })
    });

    c.bench_function("slicejson_large", |b| {
        b.iter(|| {
            slicejson_parse(json_large_bytes);
        })
    });

    c.bench_function("serde", |b| {
        b.iter(|| {
            let _: Value = serde_json::from_str(PASS1).unwrap();
        })
    });

    c.bench_function("serde_large", |b| {
        b.iter(|| {
            let _: Value = serde_json::from_str(&json_large).unwrap();
        })
    });
}

criterion_group!(benches, slicejson_benchmark);
criterion_main!(benches);
