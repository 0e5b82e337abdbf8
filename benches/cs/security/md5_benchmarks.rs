use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qzoke::{md5_digest, md5_digest_batch, md5_hex, md5_hex_into, Md5};

fn inputs() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("small", b"Hello, World!".to_vec()),
        ("medium", vec![b'a'; 1_000]),
        ("large", vec![b'b'; 10_000]),
    ]
}

fn bench_one_shot(c: &mut Criterion) {
    let mut group = c.benchmark_group("md5_one_shot");

    for (label, data) in inputs() {
        group.throughput(Throughput::Bytes(data.len() as u64));

        group.bench_with_input(BenchmarkId::new("digest", label), &data, |b, data| {
            b.iter(|| md5_digest(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("hex", label), &data, |b, data| {
            b.iter(|| md5_hex(black_box(data)))
        });

        // Distinct input per call, suffixed with a counter.
        group.bench_with_input(BenchmarkId::new("hex_into_suffixed", label), &data, |b, data| {
            let mut out = [0u8; 33];
            let mut i = 0u64;
            b.iter(|| {
                let mut message = data.clone();
                message.extend_from_slice(i.to_string().as_bytes());
                i += 1;
                md5_hex_into(black_box(&message), &mut out)
            })
        });
    }

    group.finish();
}

fn bench_streaming(c: &mut Criterion) {
    let data = vec![b'b'; 10_000];
    let mut group = c.benchmark_group("md5_streaming");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for chunk in [16usize, 64, 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &chunk, |b, &chunk| {
            b.iter(|| {
                let mut hasher = Md5::new();
                for piece in data.chunks(chunk) {
                    hasher.update(black_box(piece));
                }
                hasher.finalize()
            })
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let owned: Vec<Vec<u8>> = (0..1_000u32)
        .map(|i| format!("Hello, World!{}", i).into_bytes())
        .collect();
    let messages: Vec<&[u8]> = owned.iter().map(|m| m.as_slice()).collect();

    c.bench_function("md5_batch_1000_small", |b| {
        b.iter(|| md5_digest_batch(black_box(&messages)))
    });
}

criterion_group!(benches, bench_one_shot, bench_streaming, bench_batch);
criterion_main!(benches);
