// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DEFLATE codec.
//!
//! Produces a zlib-wrapped stream (2-byte header, Adler-32 trailer), which is what
//! other Sparkplug B hosts emit for `DEFLATE` bodies.

use super::{Codec, CompressionAlgorithm, CompressionError};
use crate::config::CompressionConfig;
use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

/// zlib DEFLATE codec streaming through a fixed-size buffer.
#[derive(Debug, Clone)]
pub struct Deflate {
    level: u32,
    buffer_size: usize,
}

impl Deflate {
    pub fn new(config: &CompressionConfig) -> Self {
        Self {
            level: config.deflate_level,
            buffer_size: config.buffer_size.max(1),
        }
    }
}

impl Default for Deflate {
    fn default() -> Self {
        Self::new(&CompressionConfig::default())
    }
}

impl Codec for Deflate {
    fn algorithm(&self) -> CompressionAlgorithm {
        CompressionAlgorithm::Deflate
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let mut stream = Compress::new(Compression::new(self.level), true);
        let mut buffer = vec![0u8; self.buffer_size];
        let mut output = Vec::with_capacity(input.len() / 2 + 16);

        loop {
            let consumed = stream.total_in() as usize;
            let before = stream.total_out();
            let status = stream
                .compress(&input[consumed..], &mut buffer, FlushCompress::Finish)
                .map_err(|e| CompressionError::Format(e.to_string()))?;
            let produced = (stream.total_out() - before) as usize;
            output.extend_from_slice(&buffer[..produced]);

            match status {
                Status::StreamEnd => break,
                Status::Ok | Status::BufError => {
                    if produced == 0 && stream.total_in() as usize == consumed {
                        return Err(CompressionError::Format("deflate stream stalled".into()));
                    }
                }
            }
        }

        log::trace!(
            "[Deflate::compress] {} -> {} bytes",
            input.len(),
            output.len()
        );
        Ok(output)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        if input.is_empty() {
            return Err(CompressionError::Format("empty deflate stream".into()));
        }

        let mut stream = Decompress::new(true);
        let mut buffer = vec![0u8; self.buffer_size];
        let mut output = Vec::with_capacity(input.len() * 2);

        loop {
            let consumed = stream.total_in() as usize;
            let before = stream.total_out();
            let status = stream
                .decompress(&input[consumed..], &mut buffer, FlushDecompress::None)
                .map_err(|e| CompressionError::Format(e.to_string()))?;
            let produced = (stream.total_out() - before) as usize;
            output.extend_from_slice(&buffer[..produced]);

            match status {
                // bytes after the zlib trailer are ignored
                Status::StreamEnd => break,
                Status::Ok | Status::BufError => {
                    if produced == 0 && stream.total_in() as usize == consumed {
                        return Err(CompressionError::Format("truncated deflate stream".into()));
                    }
                }
            }
        }

        log::trace!(
            "[Deflate::decompress] {} -> {} bytes",
            input.len(),
            output.len()
        );
        Ok(output)
    }
}
