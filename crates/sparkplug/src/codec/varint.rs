// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Protobuf base-128 varints.
//!
//! # Encoding Rules
//!
//! - Each byte uses 7 bits for data, bit 7 indicates continuation
//! - Bytes are emitted least-significant group first
//! - Maximum encoded length for u64 is 10 bytes
//!
//! Sparkplug B declares its integer slots as `uint32`/`uint64`; signed values travel
//! as their two's-complement bit pattern, with no zig-zag mapping.

use std::fmt;

/// Maximum bytes needed to encode a u64.
pub const MAX_VARINT_LEN: usize = 10;

const CONTINUATION_BIT: u8 = 0x80;
const DATA_MASK: u8 = 0x7F;

/// Error returned when varint decoding fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarintError {
    /// Buffer is empty or truncated mid-varint.
    UnexpectedEof,
    /// Varint is too long (overflow for u64).
    Overflow,
}

impl fmt::Display for VarintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of buffer while reading varint"),
            Self::Overflow => write!(f, "varint overflow (too many bytes for u64)"),
        }
    }
}

impl std::error::Error for VarintError {}

/// Append `value` to `buf` as a varint. Returns the number of bytes written.
#[inline]
pub fn put_varint(buf: &mut Vec<u8>, mut value: u64) -> usize {
    let mut written = 0;
    loop {
        let byte = (value & u64::from(DATA_MASK)) as u8;
        value >>= 7;
        written += 1;
        if value == 0 {
            buf.push(byte);
            return written;
        }
        buf.push(byte | CONTINUATION_BIT);
    }
}

/// Number of bytes needed to encode a value.
#[inline]
#[must_use]
pub const fn varint_len(value: u64) -> usize {
    if value == 0 {
        return 1;
    }
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Decode a varint from the front of `buf`.
///
/// Returns `(value, bytes_consumed)`.
#[inline]
pub fn decode_varint(buf: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    for (i, &byte) in buf.iter().enumerate() {
        if i >= MAX_VARINT_LEN {
            return Err(VarintError::Overflow);
        }

        let data = u64::from(byte & DATA_MASK);

        // 10th byte: only bit 0 still fits in a u64
        if shift == 63 && data > 1 {
            return Err(VarintError::Overflow);
        }

        result |= data << shift;

        if byte & CONTINUATION_BIT == 0 {
            return Ok((result, i + 1));
        }

        shift += 7;
    }

    Err(VarintError::UnexpectedEof)
}
