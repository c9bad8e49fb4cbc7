use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rope_editor::Rope;
use std::hint::black_box;

fn generate_document(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("    let variable_{i} = process({}, {});\n", i * 2, i * 3))
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [100, 1_000, 10_000, 100_000] {
        let rope = Rope::from(generate_document(size));

        group.bench_with_input(BenchmarkId::new("middle", size), &rope, |b, rope| {
            let mut rope = rope.clone();
            let mut offset = rope.len() / 2;
            b.iter(|| {
                rope.insert(black_box(offset), "x").unwrap();
                offset += 1;
            });
        });
    }

    group.finish();
}

fn bench_typing(c: &mut Criterion) {
    c.bench_function("type_1000_chars_from_empty", |b| {
        b.iter(|| {
            let mut rope = Rope::new();
            for i in 0..1_000 {
                rope.insert(i, black_box("a")).unwrap();
            }
            rope
        });
    });
}

fn bench_delete(c: &mut Criterion) {
    let document = Rope::from(generate_document(10_000));

    c.bench_function("delete_range_10k_lines", |b| {
        b.iter_batched(
            || document.clone(),
            |mut rope| {
                let start = rope.len() / 4;
                rope.delete(start, rope.len() / 2).unwrap();
                rope
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

fn bench_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_string");

    for size in [1_000, 10_000, 100_000] {
        let rope = Rope::from(generate_document(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &rope, |b, rope| {
            b.iter(|| rope.to_string())
        });
    }

    group.finish();
}

fn bench_slice(c: &mut Criterion) {
    let rope = Rope::from(generate_document(100_000));
    let middle = rope.len() / 2;

    c.bench_function("slice_80_chars_100k_lines", |b| {
        b.iter(|| rope.slice(black_box(middle), middle + 80).unwrap())
    });
}

criterion_group!(
    benches,
    bench_insert,
    bench_typing,
    bench_delete,
    bench_reconstruct,
    bench_slice
);
criterion_main!(benches);
