use criterion::{Criterion, criterion_group, criterion_main};
use rand::{Rng, rng};

use ringlwe_kex::CongruenceClass;
use ringlwe_kex::arith::{find_first_prime_up, modadd_naive, modmul_naive};

use std::hint::black_box;

const N: usize = 1024;

fn benchmark_modmul_naive(c: &mut Criterion) {
    let q = find_first_prime_up(40, N);
    let mut generator = rng();
    let in1: u64 = generator.random_range(1..q);
    let in2: u64 = generator.random_range(1..q);

    c.bench_function("modmul naive", |b| {
        b.iter(|| modmul_naive(black_box(in1), black_box(in2), black_box(q)))
    });
}

fn benchmark_modmul_barrett(c: &mut Criterion) {
    let q = find_first_prime_up(40, N);
    let class = CongruenceClass::new(q);
    let mut generator = rng();
    let in1: u64 = generator.random_range(1..q);
    let in2: u64 = generator.random_range(1..q);

    c.bench_function("modmul barrett", |b| {
        b.iter(|| class.modmul(black_box(in1), black_box(in2)))
    });
}

fn benchmark_modadd(c: &mut Criterion) {
    let q = find_first_prime_up(40, N);
    let class = CongruenceClass::new(q);
    let mut generator = rng();
    let in1: u64 = generator.random_range(1..q);
    let in2: u64 = generator.random_range(1..q);

    c.bench_function("modadd", |b| {
        b.iter(|| modadd_naive(black_box(in1), black_box(in2), black_box(q)))
    });
    c.bench_function("modadd struct", |b| {
        b.iter(|| class.modadd(black_box(in1), black_box(in2)))
    });
}

fn benchmark_modinv(c: &mut Criterion) {
    let q = find_first_prime_up(40, N);
    let class = CongruenceClass::new(q);
    let mut generator = rng();
    let in1: u64 = generator.random_range(1..q);

    c.bench_function("modinv", |b| b.iter(|| class.modinv(black_box(in1))));
}

criterion_group!(
    benches,
    benchmark_modmul_naive,
    benchmark_modmul_barrett,
    benchmark_modadd,
    benchmark_modinv,
);
criterion_main!(benches);
