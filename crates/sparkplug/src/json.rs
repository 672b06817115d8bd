// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON text form of a payload.
//!
//! # Shape
//!
//! ```text
//! payload  = { "timestamp": ms, "metrics": [metric], "seq": n, "uuid": s, "body": base64 }
//! metric   = { "name", "alias", "timestamp", "dataType", "isHistorical", "isTransient",
//!              "isNull", "properties": { name: property }, "value" }
//! property = { "type": "Int32", "value": ... }
//! ```
//!
//! Values are untyped in JSON. On input, each value is rebuilt from its sibling
//! `dataType`/`type` and then passes through the validating constructors, so JSON
//! payloads obey the same type rules as programmatic ones. DateTime values are epoch
//! milliseconds; Bytes and File values are base64. Non-finite floats are written as
//! `null`.

use crate::message::{
    InvalidTypeError, Metric, MetricBuilder, MetricDataType, PropertyDataType, PropertySet,
    PropertyValue, SparkplugBPayload, SparkplugBPayloadBuilder, Value,
};
use crate::{Error, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as Json};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayloadRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
    #[serde(default)]
    metrics: Vec<MetricRepr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seq: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetricRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
    data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_historical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_transient: Option<bool>,
    #[serde(default)]
    is_null: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<BTreeMap<String, PropertyRepr>>,
    #[serde(default)]
    value: Json,
}

#[derive(Debug, Serialize, Deserialize)]
struct PropertyRepr {
    #[serde(rename = "type")]
    data_type: String,
    #[serde(default)]
    value: Json,
}

/// Serialize a payload to JSON text.
pub fn to_json_string(payload: &SparkplugBPayload) -> Result<String> {
    let repr = PayloadRepr {
        timestamp: payload.timestamp().map(|ts| ts.timestamp_millis()),
        metrics: payload.metrics().iter().map(metric_repr).collect(),
        seq: payload.seq(),
        uuid: payload.uuid().map(str::to_string),
        body: payload.body().map(|b| general_purpose::STANDARD.encode(b)),
    };
    Ok(serde_json::to_string(&repr)?)
}

/// Parse a payload from JSON text.
///
/// # Errors
///
/// - `Error::Json` for malformed JSON or an unknown data type name
/// - `Error::InvalidType` if a value does not fit its declared type
pub fn from_json_string(json: &str) -> Result<SparkplugBPayload> {
    let repr: PayloadRepr = serde_json::from_str(json)?;

    let mut builder = SparkplugBPayloadBuilder::new();
    if let Some(ms) = repr.timestamp {
        builder = builder.timestamp(millis_to_datetime(ms, "Payload")?);
    }
    if let Some(seq) = repr.seq {
        builder = builder.seq(seq);
    }
    if let Some(uuid) = repr.uuid {
        builder = builder.uuid(uuid);
    }
    if let Some(body) = repr.body {
        let bytes = general_purpose::STANDARD
            .decode(body)
            .map_err(|e| json_error(format!("invalid base64 body: {}", e)))?;
        builder = builder.body(bytes);
    }
    for metric in repr.metrics {
        builder = builder.add_metric(metric_from_repr(metric)?);
    }
    Ok(builder.build())
}

fn json_error(msg: impl std::fmt::Display) -> Error {
    Error::Json(<serde_json::Error as serde::de::Error>::custom(msg))
}

fn metric_repr(metric: &Metric) -> MetricRepr {
    MetricRepr {
        name: metric.name().map(str::to_string),
        alias: metric.alias(),
        timestamp: metric.timestamp().map(|ts| ts.timestamp_millis()),
        data_type: metric.data_type().to_string(),
        is_historical: metric.is_historical(),
        is_transient: metric.is_transient(),
        is_null: metric.is_null(),
        properties: metric.properties().map(property_set_repr),
        value: metric.value().map_or(Json::Null, value_to_json),
    }
}

fn property_set_repr(set: &PropertySet) -> BTreeMap<String, PropertyRepr> {
    set.iter()
        .map(|(name, pv)| {
            let repr = PropertyRepr {
                data_type: pv.data_type().to_string(),
                value: pv.value().map_or(Json::Null, value_to_json),
            };
            (name.clone(), repr)
        })
        .collect()
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::I8(v) => Json::from(*v),
        Value::I16(v) => Json::from(*v),
        Value::I32(v) => Json::from(*v),
        Value::I64(v) => Json::from(*v),
        Value::U8(v) => Json::from(*v),
        Value::U16(v) => Json::from(*v),
        Value::U32(v) => Json::from(*v),
        Value::U64(v) => Json::from(*v),
        Value::F32(v) => Number::from_f64(f64::from(*v)).map_or(Json::Null, Json::Number),
        Value::F64(v) => Number::from_f64(*v).map_or(Json::Null, Json::Number),
        Value::Bool(v) => Json::Bool(*v),
        Value::String(v) => Json::String(v.clone()),
        Value::DateTime(ts) => Json::from(ts.timestamp_millis()),
        Value::Bytes(v) => Json::String(general_purpose::STANDARD.encode(v)),
        Value::PropertySet(set) => property_set_json(set),
        Value::PropertySetList(list) => Json::Array(list.iter().map(property_set_json).collect()),
    }
}

fn property_set_json(set: &PropertySet) -> Json {
    let map: Map<String, Json> = property_set_repr(set)
        .into_iter()
        .map(|(name, repr)| {
            let mut entry = Map::new();
            entry.insert("type".into(), Json::String(repr.data_type));
            entry.insert("value".into(), repr.value);
            (name, Json::Object(entry))
        })
        .collect();
    Json::Object(map)
}

fn metric_from_repr(repr: MetricRepr) -> Result<Metric> {
    let data_type: MetricDataType = repr.data_type.parse().map_err(json_error)?;
    let value = if repr.is_null {
        None
    } else {
        json_to_value(data_type, repr.value)?
    };

    let mut builder = match (repr.name, repr.alias) {
        (Some(name), Some(alias)) => MetricBuilder::new(name, data_type, value).alias(alias),
        (Some(name), None) => MetricBuilder::new(name, data_type, value),
        (None, Some(alias)) => MetricBuilder::with_alias(alias, data_type, value),
        (None, None) => return Err(json_error("metric has neither name nor alias")),
    };
    if let Some(ms) = repr.timestamp {
        builder = builder.timestamp(millis_to_datetime(ms, data_type)?);
    }
    if let Some(hist) = repr.is_historical {
        builder = builder.historical(hist);
    }
    if let Some(transient) = repr.is_transient {
        builder = builder.transient(transient);
    }
    if let Some(props) = repr.properties {
        builder = builder.properties(property_set_from_repr(props)?);
    }
    Ok(builder.build()?)
}

fn property_set_from_repr(repr: BTreeMap<String, PropertyRepr>) -> Result<PropertySet> {
    let mut set = PropertySet::new();
    for (name, prop) in repr {
        let data_type: PropertyDataType = prop.data_type.parse().map_err(json_error)?;
        // property codes are a subset of metric codes
        let kind = MetricDataType::from_code(data_type.code()).unwrap_or_default();
        let value = json_to_value(kind, prop.value)?;
        set.set(name, PropertyValue::new(data_type, value)?);
    }
    Ok(set)
}

fn property_set_from_json(json: Json) -> Result<PropertySet> {
    let repr: BTreeMap<String, PropertyRepr> = serde_json::from_value(json)?;
    property_set_from_repr(repr)
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn millis_to_datetime(ms: i64, context: impl std::fmt::Display) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| Error::InvalidType(InvalidTypeError::new(context, "out-of-range timestamp")))
}

/// Rebuild a typed value from untyped JSON, guided by `kind`.
fn json_to_value(kind: MetricDataType, json: Json) -> Result<Option<Value>> {
    if json.is_null() {
        return Ok(None);
    }
    let reject = |json: &Json| Error::InvalidType(InvalidTypeError::new(kind, json_kind(json)));

    macro_rules! integer {
        ($variant:ident, $ty:ty, $read:ident) => {
            json.$read()
                .and_then(|v| <$ty>::try_from(v).ok())
                .map(Value::$variant)
                .ok_or_else(|| reject(&json))?
        };
    }

    let value = match kind {
        MetricDataType::Int8 => integer!(I8, i8, as_i64),
        MetricDataType::Int16 => integer!(I16, i16, as_i64),
        MetricDataType::Int32 => integer!(I32, i32, as_i64),
        MetricDataType::Int64 => integer!(I64, i64, as_i64),
        MetricDataType::UInt8 => integer!(U8, u8, as_u64),
        MetricDataType::UInt16 => integer!(U16, u16, as_u64),
        MetricDataType::UInt32 => integer!(U32, u32, as_u64),
        MetricDataType::UInt64 => integer!(U64, u64, as_u64),
        MetricDataType::Float => Value::F32(json.as_f64().ok_or_else(|| reject(&json))? as f32),
        MetricDataType::Double => Value::F64(json.as_f64().ok_or_else(|| reject(&json))?),
        MetricDataType::Boolean => Value::Bool(json.as_bool().ok_or_else(|| reject(&json))?),
        MetricDataType::String | MetricDataType::Text | MetricDataType::UUID => match json {
            Json::String(s) => Value::String(s),
            other => return Err(reject(&other)),
        },
        MetricDataType::DateTime => {
            let ms = json.as_i64().ok_or_else(|| reject(&json))?;
            Value::DateTime(millis_to_datetime(ms, kind)?)
        }
        MetricDataType::Bytes | MetricDataType::File => {
            let bytes = json
                .as_str()
                .and_then(|s| general_purpose::STANDARD.decode(s).ok())
                .ok_or_else(|| reject(&json))?;
            Value::Bytes(bytes)
        }
        MetricDataType::PropertySet => match json {
            Json::Object(_) => Value::PropertySet(property_set_from_json(json)?),
            other => return Err(reject(&other)),
        },
        MetricDataType::PropertySetList => match json {
            Json::Array(items) => Value::PropertySetList(
                items
                    .into_iter()
                    .map(property_set_from_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            other => return Err(reject(&other)),
        },
        MetricDataType::DataSet | MetricDataType::Template | MetricDataType::Unknown => {
            return Err(reject(&json))
        }
    };
    Ok(Some(value))
}
