//! crates/signature/benches/engine_benchmark.rs
//!
//! Throughput of the signature engine over an in-memory source.
//!
//! Run with: `cargo bench -p signature`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use checksums::DigestAlgorithm;
use fast_io::MemorySource;
use signature::{EngineConfig, SignatureEngine};

const INPUT_LEN: usize = 32 << 20;

fn bench_engine(c: &mut Criterion) {
    let data: Vec<u8> = (0..INPUT_LEN).map(|i| (i % 251) as u8).collect();
    let mut group = c.benchmark_group("signature_engine");
    group.throughput(Throughput::Bytes(INPUT_LEN as u64));
    group.sample_size(10);

    for algorithm in [DigestAlgorithm::Md5, DigestAlgorithm::Crc32] {
        for threads in [1, 2, 4, 8] {
            let id = BenchmarkId::new(algorithm.as_str(), threads);
            group.bench_with_input(id, &threads, |b, &threads| {
                b.iter(|| {
                    let mut engine = SignatureEngine::builder(
                        EngineConfig::new(1 << 20).with_parallelism(threads),
                    )
                    .digest(algorithm.into_digest())
                    .source(MemorySource::new(data.clone()))
                    .sink(|digest: &str| {
                        black_box(digest);
                        Ok(())
                    })
                    .build()
                    .expect("build engine");
                    black_box(engine.run().expect("run"))
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);
