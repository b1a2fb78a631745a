use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use ringlwe_kex::kem::{IdentityKdf, KeyPair, encapsulate};
use ringlwe_kex::params::{ParamId, ParamSet};
use ringlwe_kex::{BluesteinEngine, TwistedEngine};

use std::hint::black_box;

fn bench_twisted_forward(c: &mut Criterion) {
    let engine = TwistedEngine::new(1024, 40961);
    let mut x: Vec<u64> = (0..1024u64).collect();

    c.bench_function("twisted forward, n=1024", |b| {
        b.iter(|| engine.forward(black_box(&mut x)));
    });
}

fn bench_bluestein_forward(c: &mut Criterion) {
    let engine = BluesteinEngine::new(821, 49261);
    let mut x: Vec<u64> = (0..821u64).collect();

    c.bench_function("bluestein forward, n=821", |b| {
        b.iter(|| engine.forward(black_box(&mut x)));
    });
}

fn bench_generate(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(123);
    c.bench_function("key pair generate, n=1024", |b| {
        b.iter(|| black_box(KeyPair::generate(ParamId::N1024Q40961, &mut rng)));
    });
}

fn bench_encapsulate(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(123);
    let kp = KeyPair::generate(ParamId::N1024Q40961, &mut rng);
    let p = ParamSet::get(ParamId::N1024Q40961);

    c.bench_function("encapsulate, n=1024", |b| {
        b.iter(|| black_box(encapsulate(&kp.public, &mut rng, &IdentityKdf, p.muwords * 8).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_twisted_forward,
    bench_bluestein_forward,
    bench_generate,
    bench_encapsulate,
);
criterion_main!(benches);
