//! Query evaluation benchmarks
//!
//! Measures a full pass of `RoleQuery::results` over generated policies for
//! each set matching mode.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use policyq_core::{MemoryPolicy, TypeDef};
use policyq_query::{ComponentQuery, NameOptions, RoleQuery, SetOptions};

fn create_test_policy(role_count: usize) -> MemoryPolicy {
    let type_count = 200;
    let mut builder = MemoryPolicy::builder();

    for i in 0..type_count {
        builder = builder.add_type(TypeDef::new(format!("type{}_t", i)));
    }

    for i in 0..role_count {
        let types: Vec<String> = (0..8)
            .map(|j| format!("type{}_t", (i * 7 + j * 13) % type_count))
            .collect();
        builder = builder.role(format!("role{}_r", i), types);
    }

    builder.build().unwrap()
}

fn bench_set_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("role_types");

    for role_count in [10, 100, 1000].iter() {
        let policy = create_test_policy(*role_count);

        group.bench_with_input(
            BenchmarkId::new("intersect", role_count),
            &policy,
            |b, policy| {
                let mut query = RoleQuery::new(policy);
                query
                    .set_types(["type3_t", "type42_t"], SetOptions::intersect())
                    .unwrap();
                b.iter(|| black_box(query.results().count()));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("equal", role_count),
            &policy,
            |b, policy| {
                let mut query = RoleQuery::new(policy);
                query
                    .set_types(["type3_t", "type42_t"], SetOptions::equal())
                    .unwrap();
                b.iter(|| black_box(query.results().count()));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("regex", role_count),
            &policy,
            |b, policy| {
                let mut query = RoleQuery::new(policy);
                query.set_types(["^type1[0-9]_t$"], SetOptions::regex()).unwrap();
                b.iter(|| black_box(query.results().count()));
            },
        );
    }

    group.finish();
}

fn bench_name_regex(c: &mut Criterion) {
    let policy = create_test_policy(1000);
    let mut query = RoleQuery::new(&policy);
    query.set_name(Some("9_r$"), NameOptions::regex()).unwrap();

    c.bench_function("role_name_regex_1000", |b| {
        b.iter(|| black_box(query.results().count()))
    });
}

criterion_group!(benches, bench_set_modes, bench_name_regex);
criterion_main!(benches);
