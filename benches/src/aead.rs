//! GCM/CCM and GHASH benchmarks.
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use aes_aead::{Ccm, Gcm};
use ghash::GHash;

const KB: usize = 1024;

fn bench_gcm(c: &mut Criterion) {
    let mut group = c.benchmark_group("gcm");

    for size in &[KB, 4 * KB, 16 * KB] {
        let mut buf = vec![0u8; *size];
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_function(BenchmarkId::new("seal", size), |b| {
            let gcm = Gcm::new(&[0u8; 16]).unwrap();
            b.iter(|| gcm.seal(&[0u8; 12], &[], &mut buf, 16).unwrap());
        });
    }

    group.finish();
}

fn bench_ccm(c: &mut Criterion) {
    let mut group = c.benchmark_group("ccm");

    for size in &[KB, 4 * KB, 16 * KB] {
        let mut buf = vec![0u8; *size];
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_function(BenchmarkId::new("seal", size), |b| {
            let ccm = Ccm::new(&[0u8; 16]).unwrap();
            b.iter(|| ccm.seal(&[0u8; 13], &[], &mut buf, 16).unwrap());
        });
    }

    group.finish();
}

fn bench_ghash(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghash");

    for size in &[KB, 4 * KB, 16 * KB] {
        let data = vec![0u8; *size];
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_function(BenchmarkId::new("update", size), |b| {
            let key = [0x42u8; 16];
            b.iter(|| {
                let mut hasher = GHash::new(&key);
                hasher.update(&data);
                hasher.finalize(0, (data.len() as u64) * 8)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gcm, bench_ccm, bench_ghash);
criterion_main!(benches);
