// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Protobuf field framing.
//!
//! ```text
//! field  = key(varint) | body
//! key    = (field_number << 3) | wire_type
//! body   = varint | fixed64 (LE) | len(varint) bytes | fixed32 (LE)
//! ```

use super::varint::{decode_varint, put_varint};
use super::CodecError;

const WIRE_VARINT: u8 = 0;
const WIRE_FIXED64: u8 = 1;
const WIRE_LEN: u8 = 2;
const WIRE_FIXED32: u8 = 5;

/// Decoded field body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Field<'a> {
    Varint(u64),
    Fixed64(u64),
    Len(&'a [u8]),
    Fixed32(u32),
}

impl<'a> Field<'a> {
    pub(crate) fn varint(self) -> Result<u64, CodecError> {
        match self {
            Self::Varint(v) => Ok(v),
            _ => Err(CodecError::Malformed("expected varint field".into())),
        }
    }

    pub(crate) fn bool(self) -> Result<bool, CodecError> {
        self.varint().map(|v| v != 0)
    }

    pub(crate) fn bytes(self) -> Result<&'a [u8], CodecError> {
        match self {
            Self::Len(b) => Ok(b),
            _ => Err(CodecError::Malformed(
                "expected length-delimited field".into(),
            )),
        }
    }

    pub(crate) fn string(self) -> Result<String, CodecError> {
        let bytes = self.bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8)
    }

    pub(crate) fn f32(self) -> Result<f32, CodecError> {
        match self {
            Self::Fixed32(bits) => Ok(f32::from_bits(bits)),
            _ => Err(CodecError::Malformed("expected fixed32 field".into())),
        }
    }

    pub(crate) fn f64(self) -> Result<f64, CodecError> {
        match self {
            Self::Fixed64(bits) => Ok(f64::from_bits(bits)),
            _ => Err(CodecError::Malformed("expected fixed64 field".into())),
        }
    }
}

/// Append-only protobuf writer.
#[derive(Debug, Default)]
pub(crate) struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn key(&mut self, field: u32, wire_type: u8) {
        put_varint(&mut self.buf, (u64::from(field) << 3) | u64::from(wire_type));
    }

    pub(crate) fn varint(&mut self, field: u32, value: u64) {
        self.key(field, WIRE_VARINT);
        put_varint(&mut self.buf, value);
    }

    pub(crate) fn bool(&mut self, field: u32, value: bool) {
        self.varint(field, u64::from(value));
    }

    pub(crate) fn f32(&mut self, field: u32, value: f32) {
        self.key(field, WIRE_FIXED32);
        self.buf.extend_from_slice(&value.to_bits().to_le_bytes());
    }

    pub(crate) fn f64(&mut self, field: u32, value: f64) {
        self.key(field, WIRE_FIXED64);
        self.buf.extend_from_slice(&value.to_bits().to_le_bytes());
    }

    pub(crate) fn bytes(&mut self, field: u32, value: &[u8]) {
        self.key(field, WIRE_LEN);
        put_varint(&mut self.buf, value.len() as u64);
        self.buf.extend_from_slice(value);
    }

    pub(crate) fn string(&mut self, field: u32, value: &str) {
        self.bytes(field, value.as_bytes());
    }

    /// Write a nested message produced by `build`.
    pub(crate) fn message<F>(&mut self, field: u32, build: F) -> Result<(), CodecError>
    where
        F: FnOnce(&mut WireWriter) -> Result<(), CodecError>,
    {
        let mut nested = WireWriter::new();
        build(&mut nested)?;
        self.bytes(field, &nested.buf);
        Ok(())
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Sequential protobuf field reader over a borrowed buffer.
#[derive(Debug)]
pub(crate) struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn read_varint(&mut self) -> Result<u64, CodecError> {
        let (value, len) = decode_varint(&self.buf[self.pos..])?;
        self.pos += len;
        Ok(value)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or(CodecError::UnexpectedEof)?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Read the next `(field_number, body)`, or `None` at end of buffer.
    pub(crate) fn next_field(&mut self) -> Result<Option<(u32, Field<'a>)>, CodecError> {
        if self.pos >= self.buf.len() {
            return Ok(None);
        }

        let key = self.read_varint()?;
        let wire_type = (key & 0x07) as u8;
        let field = u32::try_from(key >> 3)
            .ok()
            .filter(|f| *f != 0)
            .ok_or_else(|| CodecError::Malformed(format!("invalid field key {}", key)))?;

        let body = match wire_type {
            WIRE_VARINT => Field::Varint(self.read_varint()?),
            WIRE_FIXED64 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(self.take(8)?);
                Field::Fixed64(u64::from_le_bytes(raw))
            }
            WIRE_LEN => {
                let len = usize::try_from(self.read_varint()?)
                    .map_err(|_| CodecError::UnexpectedEof)?;
                Field::Len(self.take(len)?)
            }
            WIRE_FIXED32 => {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(self.take(4)?);
                Field::Fixed32(u32::from_le_bytes(raw))
            }
            other => return Err(CodecError::InvalidWireType(other)),
        };

        Ok(Some((field, body)))
    }
}
