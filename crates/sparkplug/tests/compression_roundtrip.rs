// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compressed envelope round trips over randomized payloads.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::float_cmp)]

use chrono::DateTime;
use sparkplug::compression::CompressionAlgorithm;
use sparkplug::message::{
    Metric, MetricBuilder, MetricDataType, MetricDataTypeMap, PropertyDataType, PropertySet,
    PropertySetBuilder, PropertyValue, SparkplugBPayload, SparkplugBPayloadBuilder, Value,
};
use sparkplug::{payload_util, CompressionConfig, Error, PayloadUtil, UUID_COMPRESSED};

const SEED: u64 = 0x5350_4256_312E_30;

fn random_string(rng: &mut fastrand::Rng) -> String {
    let len = rng.usize(0..24);
    (0..len).map(|_| rng.alphanumeric()).collect()
}

fn random_bytes(rng: &mut fastrand::Rng, max: usize) -> Vec<u8> {
    let len = rng.usize(0..max);
    (0..len).map(|_| rng.u8(..)).collect()
}

/// A random, valid value for `data_type`, or null.
fn random_value(rng: &mut fastrand::Rng, data_type: MetricDataType) -> Option<Value> {
    if rng.u8(0..10) == 0 {
        return None;
    }
    let value = match data_type {
        MetricDataType::Int8 => Value::I8(rng.i8(..)),
        MetricDataType::Int16 => Value::I16(rng.i16(..)),
        MetricDataType::Int32 => Value::I32(rng.i32(..)),
        MetricDataType::Int64 => Value::I64(rng.i64(..)),
        MetricDataType::UInt8 => Value::U8(rng.u8(..)),
        MetricDataType::UInt16 => Value::U16(rng.u16(..)),
        MetricDataType::UInt32 => Value::U32(rng.u32(..)),
        MetricDataType::UInt64 => Value::U64(rng.u64(..)),
        MetricDataType::Float => Value::F32(rng.f32() * 1000.0 - 500.0),
        MetricDataType::Double => Value::F64(rng.f64() * 1e9 - 5e8),
        MetricDataType::Boolean => Value::Bool(rng.bool()),
        MetricDataType::String | MetricDataType::Text | MetricDataType::UUID => {
            Value::String(random_string(rng))
        }
        MetricDataType::DateTime => {
            let ms = rng.i64(0..4_102_444_800_000);
            Value::DateTime(DateTime::from_timestamp_millis(ms)?)
        }
        MetricDataType::Bytes | MetricDataType::File => Value::Bytes(random_bytes(rng, 300)),
        _ => return None,
    };
    Some(value)
}

fn random_properties(rng: &mut fastrand::Rng, depth: usize) -> PropertySet {
    let mut builder = PropertySetBuilder::new();
    for i in 0..rng.usize(0..4) {
        let name = format!("p{}_{}", depth, i);
        let value = if depth < 2 && rng.bool() {
            PropertyValue::new(
                PropertyDataType::PropertySet,
                Some(random_properties(rng, depth + 1).into()),
            )
        } else {
            PropertyValue::new(PropertyDataType::Int32, Some(rng.i32(..).into()))
        };
        builder = builder.add_property(name, value.unwrap());
    }
    builder.build()
}

fn random_metric(rng: &mut fastrand::Rng, index: usize) -> Metric {
    let scalar_types: Vec<MetricDataType> = MetricDataType::ALL
        .into_iter()
        .filter(|t| {
            !matches!(
                t,
                MetricDataType::Unknown
                    | MetricDataType::DataSet
                    | MetricDataType::Template
                    | MetricDataType::PropertySet
                    | MetricDataType::PropertySetList
            )
        })
        .collect();
    let data_type = scalar_types[rng.usize(0..scalar_types.len())];

    let mut builder = MetricBuilder::new(
        format!("metric/{}", index),
        data_type,
        random_value(rng, data_type),
    )
    .alias(index as u64);
    if rng.bool() {
        builder = builder.properties(random_properties(rng, 0));
    }
    if rng.bool() {
        builder = builder.historical(rng.bool());
    }
    builder.build().unwrap()
}

fn random_payload(rng: &mut fastrand::Rng) -> SparkplugBPayload {
    let metrics: Vec<Metric> = (0..rng.usize(0..40))
        .map(|i| random_metric(rng, i))
        .collect();
    let mut builder = SparkplugBPayloadBuilder::new()
        .seq(rng.u64(0..256))
        .add_metrics(metrics);
    if rng.bool() {
        builder = builder.timestamp(DateTime::from_timestamp_millis(1_700_000_000_000).unwrap());
    }
    if rng.bool() {
        builder = builder.body(random_bytes(rng, 64));
    }
    builder.build()
}

#[test]
fn test_random_payloads_roundtrip_every_algorithm() {
    let mut rng = fastrand::Rng::with_seed(SEED);
    let util = PayloadUtil::new();

    for _ in 0..50 {
        let payload = random_payload(&mut rng);
        let hints: MetricDataTypeMap = payload.metrics().iter().collect();

        for strip in [false, true] {
            let envelope = util.compress(&payload, None, strip).unwrap();
            assert_eq!(util.decompress(&envelope, &hints).unwrap(), payload);

            for algorithm in CompressionAlgorithm::ALL {
                let envelope = util.compress(&payload, Some(algorithm), strip).unwrap();
                assert_eq!(envelope.seq(), payload.seq());
                assert_eq!(util.decompress(&envelope, &hints).unwrap(), payload);
            }
        }
    }
}

#[test]
fn test_small_buffer_config_interoperates() {
    let mut rng = fastrand::Rng::with_seed(SEED ^ 1);
    let tiny = PayloadUtil::with_config(
        CompressionConfig::default()
            .with_buffer_size(3)
            .with_deflate_level(9),
    );
    let standard = PayloadUtil::new();

    for _ in 0..10 {
        let payload = random_payload(&mut rng);
        let hints = MetricDataTypeMap::new();
        for algorithm in CompressionAlgorithm::ALL {
            let envelope = tiny.compress(&payload, Some(algorithm), false).unwrap();
            assert_eq!(standard.decompress(&envelope, &hints).unwrap(), payload);
        }
    }
}

#[test]
fn test_seq_seven_scenario() {
    let payload = SparkplugBPayloadBuilder::new().seq(7).build();
    let envelope = payload_util::compress(&payload, false).unwrap();

    assert_eq!(envelope.seq(), Some(7));
    assert_eq!(envelope.uuid(), Some(UUID_COMPRESSED));
    assert!(envelope.metrics().is_empty());

    let restored = payload_util::decompress(&envelope, &MetricDataTypeMap::new()).unwrap();
    assert_eq!(restored.seq(), Some(7));
    assert!(restored.metrics().is_empty());
    assert_eq!(restored, payload);
}

#[test]
fn test_body_is_not_a_compressed_stream() {
    let mut rng = fastrand::Rng::with_seed(SEED ^ 2);
    for algorithm in CompressionAlgorithm::ALL {
        let algorithm_metric = MetricBuilder::new(
            "algorithm",
            MetricDataType::String,
            Some(algorithm.as_str().into()),
        )
        .build()
        .unwrap();
        let envelope = SparkplugBPayloadBuilder::new()
            .uuid(UUID_COMPRESSED)
            // 0x00 is neither a zlib CMF byte nor the gzip magic
            .body([0x00].into_iter().chain(random_bytes(&mut rng, 128)).collect())
            .add_metric(algorithm_metric)
            .build();
        let err = payload_util::decompress(&envelope, &MetricDataTypeMap::new()).unwrap_err();
        assert!(matches!(err, Error::Format(_)), "{:?}", err);
    }
}
