// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::cast_possible_truncation)] // Bench parameters
#![allow(clippy::semicolon_if_nothing_returned)] // Benchmark code formatting

//! Payload compression benchmarks
//!
//! Measures:
//! - Binary encode/decode of a birth-sized payload
//! - Envelope compress/decompress per algorithm

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sparkplug::message::{
    MetricBuilder, MetricDataType, MetricDataTypeMap, PropertyDataType, PropertySetBuilder,
    PropertyValue, SparkplugBPayload, SparkplugBPayloadBuilder,
};
use sparkplug::{CompressionAlgorithm, PayloadDecoder, PayloadEncoder, PayloadUtil, SparkplugBCodec};

fn birth_payload(metric_count: usize) -> SparkplugBPayload {
    let metrics = (0..metric_count).map(|i| {
        let props = PropertySetBuilder::new()
            .add_property(
                "engUnit",
                PropertyValue::new(PropertyDataType::String, Some("degC".into())).unwrap(),
            )
            .add_property(
                "scale",
                PropertyValue::new(PropertyDataType::Double, Some(0.1f64.into())).unwrap(),
            )
            .build();
        MetricBuilder::new(
            format!("line/{}/temperature", i),
            MetricDataType::Double,
            Some((20.0 + i as f64 / 10.0).into()),
        )
        .alias(i as u64)
        .properties(props)
        .build()
        .unwrap()
    });
    SparkplugBPayloadBuilder::new().seq(0).add_metrics(metrics).build()
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    for count in [10, 100, 1000] {
        let payload = birth_payload(count);
        let bytes = SparkplugBCodec.encode(&payload, false).unwrap();
        let hints = MetricDataTypeMap::new();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", count), &payload, |b, p| {
            b.iter(|| SparkplugBCodec.encode(black_box(p), false).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", count), &bytes, |b, bytes| {
            b.iter(|| SparkplugBCodec.decode(black_box(bytes), &hints).unwrap())
        });
    }
    group.finish();
}

fn bench_envelope(c: &mut Criterion) {
    let util = PayloadUtil::new();
    let payload = birth_payload(200);
    let hints = MetricDataTypeMap::new();

    let mut group = c.benchmark_group("envelope");
    for algorithm in CompressionAlgorithm::ALL {
        let envelope = util.compress(&payload, Some(algorithm), false).unwrap();

        group.bench_function(BenchmarkId::new("compress", algorithm), |b| {
            b.iter(|| util.compress(black_box(&payload), Some(algorithm), false).unwrap())
        });
        group.bench_function(BenchmarkId::new("decompress", algorithm), |b| {
            b.iter(|| util.decompress(black_box(&envelope), &hints).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_codec, bench_envelope);
criterion_main!(benches);
