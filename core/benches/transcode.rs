//! Decode/encode throughput over a cached field plan.

#![allow(missing_docs, clippy::expect_used)]

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use recast_core::{
    decode, encode, ConvertError, ElementCategory, FieldSpec, Namespace, RawValue, Record, Sink,
    SinkError, Source, TypeCategory, Value,
};

#[derive(Default)]
struct Search {
    term: String,
    page: u32,
    tags: Vec<String>,
    exact: bool,
}

impl Record for Search {
    fn field_specs() -> &'static [FieldSpec] {
        &[
            FieldSpec {
                name: "term",
                index: 0,
                category: TypeCategory::Str,
                keys: &[(Namespace::Query, "q")],
                attributes: &[],
            },
            FieldSpec {
                name: "page",
                index: 1,
                category: TypeCategory::UInt,
                keys: &[(Namespace::Query, "page")],
                attributes: &[],
            },
            FieldSpec {
                name: "tags",
                index: 2,
                category: TypeCategory::List(ElementCategory::Str),
                keys: &[(Namespace::Query, "tags")],
                attributes: &[],
            },
            FieldSpec {
                name: "exact",
                index: 3,
                category: TypeCategory::Bool,
                keys: &[(Namespace::Query, "exact")],
                attributes: &[],
            },
        ]
    }

    fn write_field(&mut self, index: usize, value: Value) -> Result<(), ConvertError> {
        match index {
            0 => {
                self.term = value.into_text()?;
                Ok(())
            },
            1 => {
                let wide = value.into_uint()?;
                self.page = u32::try_from(wide).map_err(|_| ConvertError::out_of_range(wide))?;
                Ok(())
            },
            2 => {
                let mut tags = Vec::new();
                for item in value.into_list()? {
                    tags.push(item.into_text()?);
                }
                self.tags = tags;
                Ok(())
            },
            3 => {
                self.exact = value.into_bool()?;
                Ok(())
            },
            other => Err(ConvertError::UnknownField(other)),
        }
    }

    fn read_field(&self, index: usize) -> Option<Value> {
        match index {
            0 => Some(Value::Str(self.term.clone())),
            1 => Some(Value::UInt(u64::from(self.page))),
            2 => Some(Value::List(
                self.tags.iter().cloned().map(Value::Str).collect(),
            )),
            3 => Some(Value::Bool(self.exact)),
            _ => None,
        }
    }
}

struct MapSource(HashMap<&'static str, &'static str>);

impl Source for MapSource {
    fn get(&self, key: &str) -> Option<RawValue<'_>> {
        self.0.get(key).map(|text| RawValue::text(text))
    }
}

#[derive(Default)]
struct NullSink(usize);

impl Sink for NullSink {
    fn set(&mut self, _key: &str, value: &Value) -> Result<(), SinkError> {
        self.0 += value.render().map_or(0, |text| text.len());
        Ok(())
    }
}

fn bench_decode(c: &mut Criterion) {
    let source = MapSource(
        [
            ("q", "rust transcoding"),
            ("page", "7"),
            ("tags", "systems,web,codec"),
            ("exact", "true"),
        ]
        .into_iter()
        .collect(),
    );

    c.bench_function("decode_query_record", |b| {
        b.iter(|| {
            let mut record = Search::default();
            decode(black_box(&source), &mut record, Namespace::Query)
                .expect("benchmark input decodes");
            black_box(record.page)
        });
    });
}

fn bench_encode(c: &mut Criterion) {
    let record = Search {
        term: "rust transcoding".to_string(),
        page: 7,
        tags: vec!["systems".to_string(), "web".to_string(), "codec".to_string()],
        exact: true,
    };

    c.bench_function("encode_query_record", |b| {
        b.iter(|| {
            let mut sink = NullSink::default();
            encode(&mut sink, black_box(&record), Namespace::Query)
                .expect("benchmark record encodes");
            black_box(sink.0)
        });
    });
}

criterion_group!(benches, bench_decode, bench_encode);
criterion_main!(benches);
