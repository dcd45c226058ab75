use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use vellum_codec::{
    compact_vec, option, public_key, string, struct_codec, uint64, vec, Codec, PublicKey,
};

#[derive(Debug, Clone, PartialEq)]
struct Payment {
    from: PublicKey,
    to: PublicKey,
    lamports: u64,
    memo: Option<String>,
}

fn payment_codec() -> Codec<Payment> {
    struct_codec!(Payment {
        from: public_key(),
        to: public_key(),
        lamports: uint64(),
        memo: option(string()),
    })
}

fn random_payment(rng: &mut StdRng) -> Payment {
    let mut from = [0u8; 32];
    rng.fill(&mut from[..]);
    let mut to = [0u8; 32];
    rng.fill(&mut to[..]);
    Payment {
        from: PublicKey::new(from),
        to: PublicKey::new(to),
        lamports: rng.gen(),
        memo: Some("transfer".into()),
    }
}

fn bench_payment(c: &mut Criterion) {
    let codec = payment_codec();
    let mut rng = StdRng::seed_from_u64(42);
    let payment = random_payment(&mut rng);
    let encoded = codec.encode(&payment).unwrap();

    let mut group = c.benchmark_group("payment");
    group.bench_function("encode", |b| {
        b.iter(|| codec.encode(black_box(&payment)).unwrap())
    });
    group.bench_function("decode", |b| {
        b.iter(|| codec.decode(black_box(&encoded)).unwrap())
    });
    group.finish();
}

fn bench_vec_u64(c: &mut Criterion) {
    let codec = vec(uint64());
    let mut group = c.benchmark_group("vec_u64");
    for &n in &[16usize, 1024, 65_536] {
        let values: Vec<u64> = (0..n as u64).collect();
        let encoded = codec.encode(&values).unwrap();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("encode", n), &values, |b, values| {
            b.iter(|| codec.encode(black_box(values)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("decode", n), &encoded, |b, encoded| {
            b.iter(|| codec.decode(black_box(encoded)).unwrap());
        });
    }
    group.finish();
}

fn bench_compact_vec_u64(c: &mut Criterion) {
    let codec = compact_vec(uint64());
    let mut group = c.benchmark_group("compact_vec_u64");
    for &n in &[16usize, 1024, 65_535] {
        let values: Vec<u64> = (0..n as u64).collect();
        let encoded = codec.encode(&values).unwrap();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("decode", n), &encoded, |b, encoded| {
            b.iter(|| codec.decode(black_box(encoded)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_payment,
    bench_vec_u64,
    bench_compact_vec_u64
);
criterion_main!(benches);
