use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_fluent::{Fluent, Mode};

#[derive(Serialize, Deserialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct Order {
    id: u64,
    customer: User,
    lines: Vec<Line>,
}

#[derive(Serialize, Deserialize, Clone)]
struct Line {
    sku: String,
    quantity: u32,
}

fn user() -> User {
    User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    }
}

fn order(lines: usize) -> Order {
    Order {
        id: 9,
        customer: user(),
        lines: (0..lines)
            .map(|i| Line {
                sku: format!("SKU-{:04}", i),
                quantity: i as u32,
            })
            .collect(),
    }
}

fn benchmark_text_to_object(c: &mut Criterion) {
    let fluent = Fluent::new();
    let json = r#"{"id":123,"name":"Alice","email":"alice@example.com","active":true}"#;

    c.bench_function("fluent_text_to_object", |b| {
        b.iter(|| {
            fluent
                .text(black_box(json))
                .and_then(|text| text.as_type::<User>())
                .and_then(|object| object.get())
        })
    });

    let converter = fluent.converter(Mode::Json);
    c.bench_function("converter_decode", |b| {
        b.iter(|| converter.decode::<User>(black_box(json)))
    });
}

fn benchmark_object_to_text(c: &mut Criterion) {
    let fluent = Fluent::new();
    let user = user();

    c.bench_function("fluent_object_to_text", |b| {
        b.iter(|| {
            fluent
                .object(black_box(user.clone()))
                .and_then(|object| object.as_text())
                .and_then(|text| text.get())
        })
    });
}

fn benchmark_transcode(c: &mut Criterion) {
    let fluent = Fluent::new();
    let mut group = c.benchmark_group("json_to_yaml");

    for size in [1, 10, 100].iter() {
        let json = fluent.converter(Mode::Json).encode(&order(*size)).unwrap_or_default();
        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| {
                fluent
                    .text(json.as_str())
                    .and_then(|text| text.as_tree())
                    .and_then(|tree| tree.as_text_in(Mode::Yaml))
                    .and_then(|text| text.get())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_text_to_object,
    benchmark_object_to_text,
    benchmark_transcode
);
criterion_main!(benches);
