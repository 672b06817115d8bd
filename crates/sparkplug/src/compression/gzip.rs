// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! GZIP codec.

use super::{Codec, CompressionAlgorithm, CompressionError};
use crate::config::CompressionConfig;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Single-member gzip codec.
#[derive(Debug, Clone)]
pub struct Gzip {
    level: u32,
    buffer_size: usize,
}

impl Gzip {
    pub fn new(config: &CompressionConfig) -> Self {
        Self {
            level: config.deflate_level,
            buffer_size: config.buffer_size.max(1),
        }
    }
}

impl Default for Gzip {
    fn default() -> Self {
        Self::new(&CompressionConfig::default())
    }
}

fn format_error(e: std::io::Error) -> CompressionError {
    CompressionError::Format(e.to_string())
}

impl Codec for Gzip {
    fn algorithm(&self) -> CompressionAlgorithm {
        CompressionAlgorithm::Gzip
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::new(self.level));
        encoder.write_all(input).map_err(format_error)?;
        let output = encoder.finish().map_err(format_error)?;

        log::trace!("[Gzip::compress] {} -> {} bytes", input.len(), output.len());
        Ok(output)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        // GzDecoder reads an empty source as an empty stream
        if input.is_empty() {
            return Err(CompressionError::Format("empty gzip stream".into()));
        }

        let mut decoder = GzDecoder::new(input);
        let mut buffer = vec![0u8; self.buffer_size];
        let mut output = Vec::with_capacity(input.len() * 2);
        loop {
            let n = decoder.read(&mut buffer).map_err(format_error)?;
            if n == 0 {
                break;
            }
            output.extend_from_slice(&buffer[..n]);
        }

        log::trace!("[Gzip::decompress] {} -> {} bytes", input.len(), output.len());
        Ok(output)
    }
}
