//! Parser benchmarks for filter and order-by clause compilation.
//!
//! Measures parse performance for different clause shapes:
//! - simple comparisons
//! - logical chains
//! - function calls and typed literals
//! - order-by clauses

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use odaq::parser;

/// Benchmark a single comparison
fn bench_parse_simple_comparison(c: &mut Criterion) {
    let clause = "Age gt 18";

    c.bench_function("parse_simple_comparison", |b| {
        b.iter(|| parser::parse_filter_expression(black_box(clause)).unwrap());
    });
}

/// Benchmark a chained logical filter
fn bench_parse_logical_chain(c: &mut Criterion) {
    let clause = "Age gt 18 and Age lt 65 and startswith(LastName, 'S') or Salary ge 100000.0";

    c.bench_function("parse_logical_chain", |b| {
        b.iter(|| parser::parse_filter_expression(black_box(clause)).unwrap());
    });
}

/// Benchmark typed literal forms
fn bench_parse_typed_literals(c: &mut Criterion) {
    let clause = "Hired gt datetime'2015-01-01T00:00:00' and Id ne guid'12345678-aaaa-bbbb-cccc-ddddeeeeffff'";

    c.bench_function("parse_typed_literals", |b| {
        b.iter(|| parser::parse_filter_expression(black_box(clause)).unwrap());
    });
}

/// Benchmark order-by clause parsing
fn bench_parse_order_by(c: &mut Criterion) {
    let clause = "LastName asc,Age desc,length(FirstName)";

    c.bench_function("parse_order_by", |b| {
        b.iter(|| parser::parse_order_by(black_box(clause)).unwrap());
    });
}

/// Benchmark parsing with varying clause complexity
fn bench_parse_varying_complexity(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_complexity");

    let simple = "Age gt 18";
    group.bench_with_input(BenchmarkId::new("filter", "simple"), simple, |b, q| {
        b.iter(|| parser::parse_filter_expression(black_box(q)).unwrap());
    });

    let nested = "((Age gt 18 and Age lt 65) or (Salary ge 50000.0 and Salary lt 150000.0)) and not (LastName eq 'Smith')";
    group.bench_with_input(BenchmarkId::new("filter", "nested"), nested, |b, q| {
        b.iter(|| parser::parse_filter_expression(black_box(q)).unwrap());
    });

    let functions = "substringof('son', tolower(LastName)) and year(Hired) ge 2015 and round(Salary) gt 1000";
    group.bench_with_input(BenchmarkId::new("filter", "functions"), functions, |b, q| {
        b.iter(|| parser::parse_filter_expression(black_box(q)).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_simple_comparison,
    bench_parse_logical_chain,
    bench_parse_typed_literals,
    bench_parse_order_by,
    bench_parse_varying_complexity
);
criterion_main!(benches);
