// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Protobuf bytes to payload.
//!
//! Unknown fields are skipped. A metric without a `datatype` is resolved through the
//! decoder's [`MetricDataTypeMap`]; every decoded value is validated against its type.

use super::wire::{Field, WireReader};
use super::{CodecError, ValueFields, MAX_NESTING_DEPTH, METRIC_VALUE_FIELDS, PROPERTY_VALUE_FIELDS};
use crate::message::{
    Metric, MetricBuilder, MetricDataType, MetricDataTypeMap, PropertyDataType, PropertySet,
    PropertyValue, SparkplugBPayload, SparkplugBPayloadBuilder, Value,
};
use chrono::{DateTime, Utc};

/// Sparkplug B payload decoder.
#[derive(Debug, Clone, Copy)]
pub struct SparkplugBPayloadDecoder<'a> {
    data_types: &'a MetricDataTypeMap,
}

impl<'a> SparkplugBPayloadDecoder<'a> {
    pub fn new(data_types: &'a MetricDataTypeMap) -> Self {
        Self { data_types }
    }

    /// Decode a payload.
    pub fn decode(&self, bytes: &[u8]) -> Result<SparkplugBPayload, CodecError> {
        let mut builder = SparkplugBPayloadBuilder::new();
        let mut reader = WireReader::new(bytes);

        while let Some((field, body)) = reader.next_field()? {
            builder = match field {
                1 => builder.timestamp(timestamp(body.varint()?)?),
                2 => builder.add_metric(self.decode_metric(body.bytes()?)?),
                3 => builder.seq(body.varint()?),
                4 => builder.uuid(body.string()?),
                5 => builder.body(body.bytes()?.to_vec()),
                other => {
                    log::trace!("[SparkplugBPayloadDecoder::decode] skipping field {}", other);
                    builder
                }
            };
        }

        let payload = builder.build();
        log::trace!(
            "[SparkplugBPayloadDecoder::decode] {} bytes -> {} metrics",
            bytes.len(),
            payload.metrics().len()
        );
        Ok(payload)
    }

    fn decode_metric(&self, bytes: &[u8]) -> Result<Metric, CodecError> {
        let mut name = None;
        let mut alias = None;
        let mut ts = None;
        let mut code = None;
        let mut is_historical = None;
        let mut is_transient = None;
        let mut is_null = false;
        let mut properties = None;
        let mut raw_value = None;

        let mut reader = WireReader::new(bytes);
        while let Some((field, body)) = reader.next_field()? {
            match field {
                1 => name = Some(body.string()?),
                2 => alias = Some(body.varint()?),
                3 => ts = Some(timestamp(body.varint()?)?),
                4 => code = Some(data_type_code(body.varint()?)?),
                5 => is_historical = Some(body.bool()?),
                6 => is_transient = Some(body.bool()?),
                7 => is_null = body.bool()?,
                9 => properties = Some(decode_property_set(body.bytes()?, 1)?),
                10..=16 => raw_value = Some((field, body)),
                _ => {}
            }
        }

        let data_type = match code {
            Some(code) => {
                MetricDataType::from_code(code).ok_or(CodecError::UnknownDataType(code))?
            }
            None => self
                .data_types
                .resolve(alias, name.as_deref())
                .ok_or_else(|| CodecError::MissingDataType(metric_label(name.as_deref(), alias)))?,
        };

        let value = match raw_value {
            Some((field, body)) if !is_null => {
                decode_value(data_type, field, body, &METRIC_VALUE_FIELDS, 1)?
            }
            _ => None,
        };

        let mut builder = match (name, alias) {
            (Some(name), alias) => {
                let b = MetricBuilder::new(name, data_type, value);
                match alias {
                    Some(alias) => b.alias(alias),
                    None => b,
                }
            }
            (None, Some(alias)) => MetricBuilder::with_alias(alias, data_type, value),
            (None, None) => {
                return Err(CodecError::Malformed(
                    "metric has neither name nor alias".into(),
                ))
            }
        };
        if let Some(ts) = ts {
            builder = builder.timestamp(ts);
        }
        if let Some(hist) = is_historical {
            builder = builder.historical(hist);
        }
        if let Some(transient) = is_transient {
            builder = builder.transient(transient);
        }
        if let Some(props) = properties {
            builder = builder.properties(props);
        }
        Ok(builder.build()?)
    }
}

fn metric_label(name: Option<&str>, alias: Option<u64>) -> String {
    match (name, alias) {
        (Some(name), _) => name.to_string(),
        (None, Some(alias)) => format!("alias {}", alias),
        (None, None) => "<unnamed>".to_string(),
    }
}

fn data_type_code(raw: u64) -> Result<u32, CodecError> {
    u32::try_from(raw).map_err(|_| CodecError::UnknownDataType(u32::MAX))
}

fn timestamp(ms: u64) -> Result<DateTime<Utc>, CodecError> {
    DateTime::from_timestamp_millis(ms as i64).ok_or(CodecError::InvalidTimestamp(ms))
}

fn decode_property_set(bytes: &[u8], depth: usize) -> Result<PropertySet, CodecError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CodecError::NestingTooDeep);
    }

    let mut keys = Vec::new();
    let mut values = Vec::new();
    let mut reader = WireReader::new(bytes);
    while let Some((field, body)) = reader.next_field()? {
        match field {
            1 => keys.push(body.string()?),
            2 => values.push(decode_property_value(body.bytes()?, depth)?),
            _ => {}
        }
    }

    if keys.len() != values.len() {
        return Err(CodecError::Malformed(format!(
            "property set has {} keys and {} values",
            keys.len(),
            values.len()
        )));
    }

    let mut set = PropertySet::new();
    for (key, value) in keys.into_iter().zip(values) {
        set.set(key, value);
    }
    Ok(set)
}

fn decode_property_value(bytes: &[u8], depth: usize) -> Result<PropertyValue, CodecError> {
    let mut code = 0;
    let mut is_null = false;
    let mut raw_value = None;

    let mut reader = WireReader::new(bytes);
    while let Some((field, body)) = reader.next_field()? {
        match field {
            1 => code = data_type_code(body.varint()?)?,
            2 => is_null = body.bool()?,
            3..=10 => raw_value = Some((field, body)),
            _ => {}
        }
    }

    let data_type = PropertyDataType::from_code(code).ok_or(CodecError::UnknownDataType(code))?;
    let value = match raw_value {
        Some((field, body)) if !is_null => {
            // property codes are a subset of metric codes
            let kind = MetricDataType::from_code(code).ok_or(CodecError::UnknownDataType(code))?;
            decode_value(kind, field, body, &PROPERTY_VALUE_FIELDS, depth)?
        }
        _ => None,
    };
    Ok(PropertyValue::new(data_type, value)?)
}

/// Read the value in `field` as an instance of `kind`.
///
/// Integer kinds accept either the 32-bit or the 64-bit slot and are narrowed with a
/// range check. Kinds without a modeled value (DataSet, Template) decode as null.
fn decode_value(
    kind: MetricDataType,
    field: u32,
    body: Field<'_>,
    fields: &ValueFields,
    depth: usize,
) -> Result<Option<Value>, CodecError> {
    let mismatch = || CodecError::ValueMismatch {
        data_type: kind.to_string(),
        field,
    };
    let out_of_range = |value: i128| CodecError::ValueOutOfRange {
        data_type: kind.to_string(),
        value,
    };

    let signed = |raw: u64| -> Result<i64, CodecError> {
        if field == fields.int {
            Ok(i64::from(raw as u32 as i32))
        } else if field == fields.long {
            Ok(raw as i64)
        } else {
            Err(mismatch())
        }
    };
    let unsigned = |raw: u64| -> Result<u64, CodecError> {
        if field == fields.int {
            Ok(u64::from(raw as u32))
        } else if field == fields.long {
            Ok(raw)
        } else {
            Err(mismatch())
        }
    };

    let value = match kind {
        MetricDataType::Int8 => {
            let v = signed(body.varint()?)?;
            Value::I8(i8::try_from(v).map_err(|_| out_of_range(i128::from(v)))?)
        }
        MetricDataType::Int16 => {
            let v = signed(body.varint()?)?;
            Value::I16(i16::try_from(v).map_err(|_| out_of_range(i128::from(v)))?)
        }
        MetricDataType::Int32 => {
            let v = signed(body.varint()?)?;
            Value::I32(i32::try_from(v).map_err(|_| out_of_range(i128::from(v)))?)
        }
        MetricDataType::Int64 => Value::I64(signed(body.varint()?)?),
        MetricDataType::UInt8 => {
            let v = unsigned(body.varint()?)?;
            Value::U8(u8::try_from(v).map_err(|_| out_of_range(i128::from(v)))?)
        }
        MetricDataType::UInt16 => {
            let v = unsigned(body.varint()?)?;
            Value::U16(u16::try_from(v).map_err(|_| out_of_range(i128::from(v)))?)
        }
        MetricDataType::UInt32 => {
            let v = unsigned(body.varint()?)?;
            Value::U32(u32::try_from(v).map_err(|_| out_of_range(i128::from(v)))?)
        }
        MetricDataType::UInt64 => Value::U64(unsigned(body.varint()?)?),
        MetricDataType::Float if field == fields.float => Value::F32(body.f32()?),
        MetricDataType::Double if field == fields.double => Value::F64(body.f64()?),
        MetricDataType::Boolean if field == fields.boolean => Value::Bool(body.bool()?),
        MetricDataType::String | MetricDataType::Text | MetricDataType::UUID
            if field == fields.string =>
        {
            Value::String(body.string()?)
        }
        MetricDataType::DateTime if field == fields.long => {
            Value::DateTime(timestamp(body.varint()?)?)
        }
        MetricDataType::Bytes | MetricDataType::File if Some(field) == fields.bytes => {
            Value::Bytes(body.bytes()?.to_vec())
        }
        MetricDataType::PropertySet if Some(field) == fields.property_set => {
            Value::PropertySet(decode_property_set(body.bytes()?, depth + 1)?)
        }
        MetricDataType::PropertySetList if Some(field) == fields.property_sets => {
            Value::PropertySetList(decode_property_set_list(body.bytes()?, depth + 1)?)
        }
        MetricDataType::DataSet | MetricDataType::Template => {
            log::debug!(
                "[SparkplugBPayloadDecoder::decode_value] {} value not modeled, decoding as null",
                kind
            );
            return Ok(None);
        }
        _ => return Err(mismatch()),
    };
    Ok(Some(value))
}

fn decode_property_set_list(bytes: &[u8], depth: usize) -> Result<Vec<PropertySet>, CodecError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CodecError::NestingTooDeep);
    }
    let mut sets = Vec::new();
    let mut reader = WireReader::new(bytes);
    while let Some((field, body)) = reader.next_field()? {
        if field == 1 {
            sets.push(decode_property_set(body.bytes()?, depth)?);
        }
    }
    Ok(sets)
}
