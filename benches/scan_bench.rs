//! Benchmarks for flowscan record decoding and scanning

use std::fs;
use std::path::PathBuf;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use tempfile::TempDir;

use flowscan::filter::{FilterExpr, Literal};
use flowscan::format::{layout_for, FormatVersion};
use flowscan::scan::{ByteOrder, RecordDecoder};
use flowscan::{ScanConfig, ScanEngine};

const RECORD_COUNT: u32 = 50_000;

/// Write a v5 file with `RECORD_COUNT` synthetic records
fn write_fixture(dir: &TempDir) -> PathBuf {
    let layout = layout_for(FormatVersion::V5).unwrap();
    let path = dir.path().join("bench.dat");

    let mut bytes = Vec::with_capacity(26 + RECORD_COUNT as usize * layout.record_width);
    bytes.extend_from_slice(&[0xCA, 0xD5, 1, 0]);
    bytes.extend_from_slice(&5u16.to_be_bytes());
    bytes.extend_from_slice(&26u16.to_be_bytes());
    bytes.extend_from_slice(&RECORD_COUNT.to_be_bytes());
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes());

    for i in 0..RECORD_COUNT {
        let mut block = vec![0u8; layout.record_width];
        for spec in layout.fields {
            let value: u64 = match spec.name {
                "protocol" => u64::from(if i % 3 == 0 { 6 } else { 17 }),
                "octets" => u64::from(i) * 37 % 100_000,
                "unix_secs" => u64::from(1_000_000 + i),
                "srcport" => u64::from(i % 65_536),
                _ => u64::from(i % 251),
            };
            let be = value.to_be_bytes();
            block[spec.offset..spec.offset + spec.width]
                .copy_from_slice(&be[8 - spec.width..]);
        }
        bytes.extend_from_slice(&block);
    }

    fs::write(&path, bytes).unwrap();
    path
}

fn decode_benchmark(c: &mut Criterion) {
    let layout = layout_for(FormatVersion::V5).unwrap();
    let decoder = RecordDecoder::new(layout, ByteOrder::Big);
    let block = vec![0xABu8; layout.record_width];

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(layout.record_width as u64));
    group.bench_function("v5_record", |b| {
        b.iter(|| decoder.decode(&block).unwrap());
    });
    group.finish();
}

fn scan_benchmark(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    let path = write_fixture(&temp);
    let layout = layout_for(FormatVersion::V5).unwrap();
    let engine = ScanEngine::new(ScanConfig::builder().version(FormatVersion::V5).build());

    let mut group = c.benchmark_group("scan");
    group.sample_size(20);
    group.throughput(Throughput::Bytes(
        RECORD_COUNT as u64 * layout.record_width as u64,
    ));

    group.bench_function("full", |b| {
        b.iter(|| {
            let plan = engine
                .plan_scan(std::slice::from_ref(&path), None)
                .unwrap();
            engine.scan_collect(&plan).unwrap().len()
        });
    });

    group.bench_function("filtered", |b| {
        b.iter(|| {
            let filter = FilterExpr::eq("protocol", Literal::Unsigned(6));
            let plan = engine
                .plan_scan(std::slice::from_ref(&path), Some(filter))
                .unwrap();
            engine.scan_collect(&plan).unwrap().len()
        });
    });

    group.finish();
}

criterion_group!(benches, decode_benchmark, scan_benchmark);
criterion_main!(benches);
