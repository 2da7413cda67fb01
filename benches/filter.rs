use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::distributions::Alphanumeric;
use rand::{rngs::StdRng, Rng, SeedableRng};
use triad_bloom::hash::{djb2, polynomial_hash, sdbm, DEFAULT_MODULUS, DEFAULT_MULTIPLIER};
use triad_bloom::utils::optimal_capacity;
use triad_bloom::BloomFilter;

fn random_keys(count: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(4..24);
            (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(len)
                .map(char::from)
                .collect()
        })
        .collect()
}

fn bench_hashes(c: &mut Criterion) {
    let key = "a-moderately-long-malware-signature";
    let mut group = c.benchmark_group("hash");
    group.bench_function("polynomial", |b| {
        b.iter(|| polynomial_hash(black_box(key), DEFAULT_MULTIPLIER, DEFAULT_MODULUS))
    });
    group.bench_function("djb2", |b| b.iter(|| djb2(black_box(key))));
    group.bench_function("sdbm", |b| b.iter(|| sdbm(black_box(key))));
    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    for &n in &[1_000usize, 100_000] {
        let keys = random_keys(n, 42);
        let probes = random_keys(n, 7);
        let capacity = optimal_capacity(n, 0.01);

        group.bench_with_input(BenchmarkId::new("insert", n), &keys, |b, keys| {
            b.iter(|| {
                let mut filter = BloomFilter::new(capacity).unwrap();
                for key in keys {
                    filter.insert(key);
                }
                filter
            })
        });

        let mut filter = BloomFilter::new(capacity).unwrap();
        for key in &keys {
            filter.insert(key);
        }
        group.bench_with_input(BenchmarkId::new("contains", n), &probes, |b, probes| {
            b.iter(|| probes.iter().filter(|key| filter.contains(key)).count())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hashes, bench_filter);
criterion_main!(benches);
