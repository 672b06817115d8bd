// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Byte compression for Sparkplug payload bodies.
//!
//! # Algorithms
//!
//! - **DEFLATE**: zlib-wrapped deflate stream, the implicit default
//! - **GZIP**: gzip member
//!
//! Both are backed by flate2. Codecs are looked up through a [`CodecRegistry`], so
//! another implementation can be registered for either algorithm.

mod deflate;
mod gzip;

pub use deflate::Deflate;
pub use gzip::Gzip;

use crate::config::CompressionConfig;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Compression algorithms named in the `algorithm` metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionAlgorithm {
    Gzip,
    Deflate,
}

impl CompressionAlgorithm {
    pub const ALL: [CompressionAlgorithm; 2] = [Self::Gzip, Self::Deflate];

    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gzip => "GZIP",
            Self::Deflate => "DEFLATE",
        }
    }
}

impl fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = CompressionError;

    /// Case-sensitive: only `GZIP` and `DEFLATE` are recognized.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| CompressionError::UnsupportedAlgorithm(s.to_string()))
    }
}

/// Error type for compression operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionError {
    /// Algorithm unknown or not registered.
    UnsupportedAlgorithm(String),
    /// Corrupt, truncated, or empty compressed stream.
    Format(String),
}

impl fmt::Display for CompressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedAlgorithm(name) => {
                write!(f, "Unsupported compression algorithm: {}", name)
            }
            Self::Format(msg) => write!(f, "Invalid compressed data: {}", msg),
        }
    }
}

impl std::error::Error for CompressionError {}

/// A byte compression algorithm.
pub trait Codec: fmt::Debug + Send + Sync {
    /// Algorithm implemented by this codec.
    fn algorithm(&self) -> CompressionAlgorithm;

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError>;

    /// Decompress a complete stream. Never returns partial output.
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError>;
}

/// Compression codecs keyed by algorithm.
#[derive(Debug, Clone, Default)]
pub struct CodecRegistry {
    codecs: HashMap<CompressionAlgorithm, Arc<dyn Codec>>,
}

impl CodecRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the flate2-backed DEFLATE and GZIP codecs.
    pub fn with_defaults(config: &CompressionConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(Deflate::new(config)));
        registry.register(Arc::new(Gzip::new(config)));
        registry
    }

    /// Register a codec, replacing any codec for the same algorithm.
    pub fn register(&mut self, codec: Arc<dyn Codec>) -> Option<Arc<dyn Codec>> {
        self.codecs.insert(codec.algorithm(), codec)
    }

    /// Look up the codec for `algorithm`.
    pub fn get(&self, algorithm: CompressionAlgorithm) -> Result<&Arc<dyn Codec>, CompressionError> {
        self.codecs
            .get(&algorithm)
            .ok_or_else(|| CompressionError::UnsupportedAlgorithm(algorithm.to_string()))
    }

    pub fn contains(&self, algorithm: CompressionAlgorithm) -> bool {
        self.codecs.contains_key(&algorithm)
    }
}
