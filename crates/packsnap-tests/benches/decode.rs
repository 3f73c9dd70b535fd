use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use packsnap_decoder::{ReaderSource, Unpacker, UnpackerConfig, Value};
use packsnap_tests::{encode, encode_all};

fn record(i: u32) -> Value {
    Value::Map(vec![
        (Value::str("id"), Value::from(i)),
        (Value::str("name"), Value::str("packsnap")),
        (Value::str("score"), Value::from(f64::from(i) * 0.5)),
        (Value::str("tags"), Value::from(vec!["a", "bb", "ccc"])),
        (Value::str("blob"), Value::Bin(vec![0xab; 64])),
        (Value::str("missing"), Value::Nil),
    ])
}

fn records(n: u32) -> Vec<u8> {
    let values: Vec<Value> = (0..n).map(record).collect();
    encode_all(&values)
}

fn bench_read_vs_skip(c: &mut Criterion) {
    let payload = records(1_000);
    let mut group = c.benchmark_group("read_vs_skip");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    group.bench_function("read", |b| {
        b.iter(|| {
            let mut unpacker = Unpacker::new();
            unpacker.feed(&payload).unwrap();
            let mut count = 0;
            unpacker.each(|_| count += 1).unwrap();
            count
        });
    });
    group.bench_function("skip", |b| {
        b.iter(|| {
            let mut unpacker = Unpacker::new();
            unpacker.feed(&payload).unwrap();
            let mut count = 0;
            while unpacker.skip().is_ok() {
                count += 1;
            }
            count
        });
    });

    group.finish();
}

fn bench_feed_chunk_size(c: &mut Criterion) {
    let payload = records(1_000);
    let mut group = c.benchmark_group("feed_chunk_size");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    for chunk in [16, 256, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &chunk, |b, &chunk| {
            b.iter(|| {
                let mut unpacker = Unpacker::new();
                let mut count = 0;
                for piece in payload.chunks(chunk) {
                    unpacker.feed_each(piece, |_| count += 1).unwrap();
                }
                count
            });
        });
    }

    group.finish();
}

fn bench_source_pull(c: &mut Criterion) {
    let payload = records(1_000);
    let mut group = c.benchmark_group("source_pull");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    for read_chunk_size in [512, 32 * 1024] {
        group.bench_with_input(
            BenchmarkId::from_parameter(read_chunk_size),
            &read_chunk_size,
            |b, &read_chunk_size| {
                b.iter(|| {
                    let config = UnpackerConfig {
                        read_chunk_size,
                        ..UnpackerConfig::default()
                    };
                    let source = ReaderSource::new(Cursor::new(payload.clone()));
                    let mut unpacker = Unpacker::with_source(source, config).unwrap();
                    unpacker.values().count()
                });
            },
        );
    }

    group.finish();
}

fn bench_chunked_large_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunked_large_array");

    for len in [50_000u32, 100_000, 200_000] {
        let payload = encode(&Value::Array((0..len).map(|i| Value::from(i % 128)).collect()));
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &payload, |b, payload| {
            b.iter(|| {
                let mut unpacker = Unpacker::new();
                let mut count = 0;
                for piece in payload.chunks(256) {
                    unpacker.feed_each(piece, |_| count += 1).unwrap();
                }
                count
            });
        });
    }

    group.finish();
}

fn bench_deep_nesting(c: &mut Criterion) {
    let payload = packsnap_tests::nested_arrays(100, &Value::Nil);
    c.bench_function("deep_nesting_100", |b| {
        b.iter(|| {
            let mut unpacker = Unpacker::new();
            unpacker.feed(&payload).unwrap();
            unpacker.read().unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_read_vs_skip,
    bench_feed_chunk_size,
    bench_source_pull,
    bench_chunked_large_array,
    bench_deep_nesting
);
criterion_main!(benches);
