// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Payload to protobuf bytes.

use super::wire::WireWriter;
use super::{CodecError, ValueFields, METRIC_VALUE_FIELDS, PROPERTY_VALUE_FIELDS};
use crate::message::{Metric, PropertySet, PropertyValue, SparkplugBPayload, Value};
use chrono::{DateTime, Utc};

/// Sparkplug B payload encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct SparkplugBPayloadEncoder {
    strip_data_types: bool,
}

impl SparkplugBPayloadEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Omit the `datatype` field of every metric.
    pub fn strip_data_types(mut self, strip: bool) -> Self {
        self.strip_data_types = strip;
        self
    }

    /// Encode a payload.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::UnsupportedValue` for a value kind the message has no
    /// slot for.
    pub fn encode(&self, payload: &SparkplugBPayload) -> Result<Vec<u8>, CodecError> {
        let mut w = WireWriter::new();

        if let Some(ts) = payload.timestamp() {
            w.varint(1, millis(ts));
        }
        for metric in payload.metrics() {
            w.message(2, |m| self.encode_metric(m, metric))?;
        }
        if let Some(seq) = payload.seq() {
            w.varint(3, seq);
        }
        if let Some(uuid) = payload.uuid() {
            w.string(4, uuid);
        }
        if let Some(body) = payload.body() {
            w.bytes(5, body);
        }

        let bytes = w.into_bytes();
        log::trace!(
            "[SparkplugBPayloadEncoder::encode] {} metrics -> {} bytes",
            payload.metrics().len(),
            bytes.len()
        );
        Ok(bytes)
    }

    fn encode_metric(&self, w: &mut WireWriter, metric: &Metric) -> Result<(), CodecError> {
        if let Some(name) = metric.name() {
            w.string(1, name);
        }
        if let Some(alias) = metric.alias() {
            w.varint(2, alias);
        }
        if let Some(ts) = metric.timestamp() {
            w.varint(3, millis(ts));
        }
        if !self.strip_data_types {
            w.varint(4, u64::from(metric.data_type().code()));
        }
        if let Some(hist) = metric.is_historical() {
            w.bool(5, hist);
        }
        if let Some(transient) = metric.is_transient() {
            w.bool(6, transient);
        }
        if let Some(props) = metric.properties() {
            w.message(9, |p| encode_property_set(p, props))?;
        }
        match metric.value() {
            Some(value) => encode_value(w, value, &METRIC_VALUE_FIELDS)?,
            None => w.bool(7, true),
        }
        Ok(())
    }
}

fn millis(ts: DateTime<Utc>) -> u64 {
    ts.timestamp_millis() as u64
}

fn encode_property_set(w: &mut WireWriter, set: &PropertySet) -> Result<(), CodecError> {
    // keys and values are parallel lists; iterate once so their order matches
    let entries: Vec<(&String, &PropertyValue)> = set.iter().collect();
    for (key, _) in &entries {
        w.string(1, key);
    }
    for (_, value) in &entries {
        w.message(2, |p| encode_property_value(p, value))?;
    }
    Ok(())
}

fn encode_property_value(w: &mut WireWriter, pv: &PropertyValue) -> Result<(), CodecError> {
    w.varint(1, u64::from(pv.data_type().code()));
    match pv.value() {
        Some(value) => encode_value(w, value, &PROPERTY_VALUE_FIELDS),
        None => {
            w.bool(2, true);
            Ok(())
        }
    }
}

/// Write `value` into the slot of `fields` that carries its kind.
///
/// Signed integers travel as their two's-complement bit pattern.
fn encode_value(w: &mut WireWriter, value: &Value, fields: &ValueFields) -> Result<(), CodecError> {
    match value {
        Value::I8(v) => w.varint(fields.int, u64::from(i32::from(*v) as u32)),
        Value::I16(v) => w.varint(fields.int, u64::from(i32::from(*v) as u32)),
        Value::I32(v) => w.varint(fields.int, u64::from(*v as u32)),
        Value::U8(v) => w.varint(fields.int, u64::from(*v)),
        Value::U16(v) => w.varint(fields.int, u64::from(*v)),
        Value::U32(v) => w.varint(fields.int, u64::from(*v)),
        Value::I64(v) => w.varint(fields.long, *v as u64),
        Value::U64(v) => w.varint(fields.long, *v),
        Value::DateTime(ts) => w.varint(fields.long, millis(*ts)),
        Value::F32(v) => w.f32(fields.float, *v),
        Value::F64(v) => w.f64(fields.double, *v),
        Value::Bool(v) => w.bool(fields.boolean, *v),
        Value::String(v) => w.string(fields.string, v),
        Value::Bytes(v) => {
            let field = fields
                .bytes
                .ok_or(CodecError::UnsupportedValue(value.kind_name()))?;
            w.bytes(field, v);
        }
        Value::PropertySet(set) => {
            let field = fields
                .property_set
                .ok_or(CodecError::UnsupportedValue(value.kind_name()))?;
            w.message(field, |p| encode_property_set(p, set))?;
        }
        Value::PropertySetList(list) => {
            let field = fields
                .property_sets
                .ok_or(CodecError::UnsupportedValue(value.kind_name()))?;
            w.message(field, |l| {
                for set in list {
                    l.message(1, |p| encode_property_set(p, set))?;
                }
                Ok(())
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MetricBuilder, MetricDataType, SparkplugBPayloadBuilder};

    #[test]
    fn test_seq_only_payload() {
        let payload = SparkplugBPayloadBuilder::new().seq(7).build();
        let bytes = SparkplugBPayloadEncoder::new().encode(&payload).unwrap();
        assert_eq!(bytes, vec![0x18, 0x07]);
    }

    #[test]
    fn test_int32_metric_layout() {
        let metric = MetricBuilder::new("a", MetricDataType::Int32, Some((-1i32).into()))
            .build()
            .unwrap();
        let payload = SparkplugBPayloadBuilder::new().add_metric(metric).build();
        let bytes = SparkplugBPayloadEncoder::new().encode(&payload).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x12, 0x0B, // metrics, 11 bytes
                0x0A, 0x01, b'a', // name
                0x20, 0x03, // datatype Int32
                0x50, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F, // int_value
            ]
        );
    }

    #[test]
    fn test_strip_data_types_and_null() {
        let metric = MetricBuilder::with_alias(5, MetricDataType::Double, None)
            .build()
            .unwrap();
        let payload = SparkplugBPayloadBuilder::new().add_metric(metric).build();
        let bytes = SparkplugBPayloadEncoder::new()
            .strip_data_types(true)
            .encode(&payload)
            .unwrap();
        // alias 5, is_null true; no datatype key (0x20)
        assert_eq!(bytes, vec![0x12, 0x04, 0x10, 0x05, 0x38, 0x01]);
    }
}
