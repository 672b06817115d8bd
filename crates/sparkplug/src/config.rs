// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sparkplug compression constants and configuration.
//!
//! - **Wire constants**: the envelope marker and metric name shared with every
//!   Sparkplug B peer. Never hardcode them elsewhere.
//! - **`CompressionConfig`**: per-instance tuning for [`PayloadUtil`](crate::PayloadUtil).

use crate::compression::CompressionAlgorithm;

/// `uuid` of a payload whose `body` holds a compressed payload.
pub const UUID_COMPRESSED: &str = "SPBV1.0_COMPRESSED";

/// Name of the metric that names the compression algorithm.
pub const METRIC_ALGORITHM: &str = "algorithm";

/// Default zlib/gzip compression level.
pub const DEFAULT_DEFLATE_LEVEL: u32 = 6;

/// Default size of the intermediate (de)compression buffer.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Highest compression level accepted by flate2.
pub const MAX_DEFLATE_LEVEL: u32 = 9;

/// Compression configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionConfig {
    /// Algorithm used when none is requested (default: DEFLATE). Anything but DEFLATE
    /// is named in the envelope, since receivers read a missing `algorithm` metric as
    /// DEFLATE.
    pub default_algorithm: CompressionAlgorithm,
    /// Compression level, 0-9 (default: 6).
    pub deflate_level: u32,
    /// Intermediate buffer size in bytes (default: 1024).
    pub buffer_size: usize,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            default_algorithm: CompressionAlgorithm::Deflate,
            deflate_level: DEFAULT_DEFLATE_LEVEL,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl CompressionConfig {
    pub fn with_default_algorithm(mut self, algorithm: CompressionAlgorithm) -> Self {
        self.default_algorithm = algorithm;
        self
    }

    /// Set the compression level, clamped to 0-9.
    pub fn with_deflate_level(mut self, level: u32) -> Self {
        self.deflate_level = level.min(MAX_DEFLATE_LEVEL);
        self
    }

    /// Set the buffer size (at least 1 byte).
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompressionConfig::default();
        assert_eq!(config.default_algorithm, CompressionAlgorithm::Deflate);
        assert_eq!(config.deflate_level, 6);
        assert_eq!(config.buffer_size, 1024);
    }

    #[test]
    fn test_setters_clamp() {
        let config = CompressionConfig::default()
            .with_deflate_level(42)
            .with_buffer_size(0)
            .with_default_algorithm(CompressionAlgorithm::Gzip);
        assert_eq!(config.deflate_level, MAX_DEFLATE_LEVEL);
        assert_eq!(config.buffer_size, 1);
        assert_eq!(config.default_algorithm, CompressionAlgorithm::Gzip);
    }
}
