use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use lcpsort::prelude::*;
use rand::Rng;

fn bench_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("String Sort");
    group.sample_size(10);

    let mut rng = rand::rng();
    let count = 10_000;
    let bufs: Vec<Vec<u8>> = (0..count)
        .map(|_| {
            let len = rng.random_range(5..20);
            (0..len).map(|_| rng.random::<u8>()).collect()
        })
        .collect();

    group.bench_function("lcpsort::sort", |b| {
        b.iter_batched(
            || bufs.iter().map(|v| v.as_slice()).collect::<Vec<&[u8]>>(),
            |mut data| sort(black_box(&mut data)),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("lcpsort::sort_with_lcp", |b| {
        b.iter_batched(
            || (bufs.iter().map(|v| v.as_slice()).collect::<Vec<&[u8]>>(), vec![0usize; count]),
            |(mut data, mut lcp)| sort_with_lcp(black_box(&mut data), &mut lcp).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("slice::sort (stable)", |b| {
        b.iter_batched(
            || bufs.iter().map(|v| v.as_slice()).collect::<Vec<&[u8]>>(),
            |mut data| data.sort(),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("slice::sort_unstable", |b| {
        b.iter_batched(
            || bufs.iter().map(|v| v.as_slice()).collect::<Vec<&[u8]>>(),
            |mut data| data.sort_unstable(),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_long_prefix(c: &mut Criterion) {
    let mut group = c.benchmark_group("Long Common Prefix");
    group.sample_size(10);

    let mut rng = rand::rng();
    let count = 10_000;
    let prefix = b"common_prefix_which_is_quite_long_indeed_";

    let bufs: Vec<Vec<u8>> = (0..count)
        .map(|_| {
            let suffix: Vec<u8> = (0..5).map(|_| rng.random::<u8>()).collect();
            [prefix.as_slice(), suffix.as_slice()].concat()
        })
        .collect();

    group.bench_function("lcpsort::sort", |b| {
        b.iter_batched(
            || bufs.iter().map(|v| v.as_slice()).collect::<Vec<&[u8]>>(),
            |mut data| sort(black_box(&mut data)),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("slice::sort (stable)", |b| {
        b.iter_batched(
            || bufs.iter().map(|v| v.as_slice()).collect::<Vec<&[u8]>>(),
            |mut data| data.sort(),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_strings, bench_long_prefix);
criterion_main!(benches);
