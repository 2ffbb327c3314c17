//! Benchmarks for the formatting-pass hot path
//!
//! This benchmark measures:
//! - JSON extraction from fenced and plain replies
//! - Validation of a full itinerary document
//! - Provider schema rendering

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tripgen::operations::schemas::ITINERARY;
use tripgen::structured::{parse_json, OutputValidator, StructuredOutput};

fn itinerary_document(days: usize) -> String {
    let days: Vec<serde_json::Value> = (1..=days)
        .map(|day| {
            serde_json::json!({
                "day": day,
                "title": format!("Day {day}"),
                "activities": (0..4).map(|i| serde_json::json!({
                    "time": format!("{:02}:00", 9 + i * 2),
                    "name": format!("Stop {i}"),
                    "description": "A short walk between two viewpoints.",
                    "location": "Old town",
                    "estimated_cost": "EUR 10"
                })).collect::<Vec<_>>()
            })
        })
        .collect();
    serde_json::json!({
        "destination": "Lisbon",
        "summary": "Hills, trams and tiles.",
        "days": days,
        "tips": ["Wear flat shoes", "Buy a Viva Viagem card"]
    })
    .to_string()
}

fn bench_parse(c: &mut Criterion) {
    let plain = itinerary_document(5);
    let fenced = format!("Here is the plan:\n```json\n{}\n```", plain);

    let mut group = c.benchmark_group("parse_json");
    group.throughput(Throughput::Bytes(plain.len() as u64));
    group.bench_function("plain", |b| b.iter(|| parse_json(black_box(&plain))));
    group.bench_function("fenced", |b| b.iter(|| parse_json(black_box(&fenced))));
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let validator = OutputValidator::for_schema(&ITINERARY);
    let mut group = c.benchmark_group("validate_itinerary");
    for days in [1usize, 7, 30] {
        let doc = itinerary_document(days);
        group.bench_with_input(BenchmarkId::from_parameter(days), &doc, |b, doc| {
            b.iter(|| {
                StructuredOutput::from_response(black_box(doc.as_str()), "itinerary", &validator)
            })
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    c.bench_function("render_response_schema", |b| {
        b.iter(|| black_box(&ITINERARY).to_response_schema())
    });
}

criterion_group!(benches, bench_parse, bench_validate, bench_render);
criterion_main!(benches);
