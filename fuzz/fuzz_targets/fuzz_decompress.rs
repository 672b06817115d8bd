// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use sparkplug::compression::{Codec, Deflate, Gzip};
use sparkplug::message::{MetricBuilder, MetricDataType, MetricDataTypeMap, SparkplugBPayloadBuilder};
use sparkplug::{payload_util, CompressionAlgorithm, UUID_COMPRESSED};

fuzz_target!(|data: &[u8]| {
    // Raw codecs
    let _ = Deflate::default().decompress(data);
    let _ = Gzip::default().decompress(data);

    // Envelope with and without an algorithm metric
    let implicit = SparkplugBPayloadBuilder::new()
        .uuid(UUID_COMPRESSED)
        .body(data.to_vec())
        .build();
    let _ = payload_util::decompress(&implicit, &MetricDataTypeMap::new());

    if let Ok(metric) = MetricBuilder::new(
        "algorithm",
        MetricDataType::String,
        Some(CompressionAlgorithm::Gzip.as_str().into()),
    )
    .build()
    {
        let explicit = SparkplugBPayloadBuilder::new()
            .uuid(UUID_COMPRESSED)
            .body(data.to_vec())
            .add_metric(metric)
            .build();
        let _ = payload_util::decompress(&explicit, &MetricDataTypeMap::new());
    }
});
