// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use sparkplug::payload_util::{from_json_string, to_json_string};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parsed payloads went through the type checks, so they serialize again
    if let Ok(payload) = from_json_string(text) {
        let _ = to_json_string(&payload);
    }
});
