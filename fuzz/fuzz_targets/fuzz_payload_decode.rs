// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use sparkplug::message::{MetricDataType, MetricDataTypeMap};
use sparkplug::{PayloadDecoder, PayloadEncoder, SparkplugBCodec};

fuzz_target!(|data: &[u8]| {
    // Without hints, stripped metrics must fail cleanly
    let _ = SparkplugBCodec.decode(data, &MetricDataTypeMap::new());

    // With hints for the low aliases
    let mut hints = MetricDataTypeMap::new();
    for (alias, data_type) in MetricDataType::ALL.into_iter().enumerate() {
        hints.add_alias(alias as u64, data_type);
    }

    // Anything that decodes must encode again
    if let Ok(payload) = SparkplugBCodec.decode(data, &hints) {
        let _ = SparkplugBCodec.encode(&payload, false);
    }
});
