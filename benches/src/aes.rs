//! Block core and CTR benchmarks.
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use aes_core::AesEnc;
use block_modes::Ctr;

const KB: usize = 1024;

fn bench_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("aes-core");

    for size in &[KB, 4 * KB, 16 * KB] {
        let blocks = size / 16;
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_function(BenchmarkId::new("encrypt_blocks", size), |b| {
            let enc = AesEnc::new(&[0u8; 16]).unwrap();
            let mut buf = vec![[0u8; 16]; blocks];
            b.iter(|| enc.encrypt_blocks(&mut buf));
        });
    }

    group.finish();
}

fn bench_ctr(c: &mut Criterion) {
    let mut group = c.benchmark_group("ctr");

    for size in &[KB, 4 * KB, 16 * KB] {
        let mut buf = vec![0u8; *size];
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_function(BenchmarkId::new("apply_keystream", size), |b| {
            let mut ctr = Ctr::new(&[0u8; 16], &[0u8; 16]).unwrap();
            b.iter(|| ctr.apply_keystream(&mut buf));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_blocks, bench_ctr);
criterion_main!(benches);
