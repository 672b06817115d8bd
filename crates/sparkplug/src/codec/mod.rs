// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sparkplug B binary payload codec.
//!
//! Encodes a [`SparkplugBPayload`] to the Sparkplug B protobuf wire layout and back,
//! without generated code.
//!
//! # Wire Layout
//!
//! ```text
//! Payload       = 1:timestamp u64 | 2:metrics Metric* | 3:seq u64 | 4:uuid string | 5:body bytes
//! Metric        = 1:name | 2:alias | 3:timestamp | 4:datatype | 5:is_historical
//!               | 6:is_transient | 7:is_null | 9:properties PropertySet
//!               | 10:int u32 | 11:long u64 | 12:float | 13:double | 14:bool
//!               | 15:string | 16:bytes
//! PropertySet   = 1:keys string* | 2:values PropertyValue*
//! PropertyValue = 1:type | 2:is_null | 3:int | 4:long | 5:float | 6:double
//!               | 7:bool | 8:string | 9:propertyset | 10:propertysets
//! ```
//!
//! With `strip_data_types` the metric `datatype` is omitted; the decoder then
//! resolves it through a [`MetricDataTypeMap`].

mod decoder;
mod encoder;
pub mod varint;
mod wire;

use crate::message::{InvalidTypeError, MetricDataTypeMap, SparkplugBPayload};
use std::fmt;
use varint::VarintError;

pub use decoder::SparkplugBPayloadDecoder;
pub use encoder::SparkplugBPayloadEncoder;

/// Maximum nesting of property sets accepted by the decoder.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Errors for binary payload encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input ended inside a field.
    UnexpectedEof,
    /// Varint longer than 10 bytes.
    InvalidVarint,
    /// Unsupported protobuf wire type (groups).
    InvalidWireType(u8),
    /// String field is not valid UTF-8.
    InvalidUtf8,
    /// Data type code not defined by Sparkplug B.
    UnknownDataType(u32),
    /// Metric carries no data type and none was hinted.
    MissingDataType(String),
    /// Wire value does not fit the declared data type.
    ValueOutOfRange { data_type: String, value: i128 },
    /// DateTime outside the representable range.
    InvalidTimestamp(u64),
    /// Value kind cannot be expressed in this message.
    UnsupportedValue(&'static str),
    /// Value travels in a field that does not carry the declared data type.
    ValueMismatch { data_type: String, field: u32 },
    /// Property sets nested deeper than [`MAX_NESTING_DEPTH`].
    NestingTooDeep,
    /// Structurally invalid message.
    Malformed(String),
    /// Decoded value rejected by its data type.
    InvalidType(InvalidTypeError),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "Unexpected end of payload"),
            Self::InvalidVarint => write!(f, "Invalid varint"),
            Self::InvalidWireType(t) => write!(f, "Invalid wire type: {}", t),
            Self::InvalidUtf8 => write!(f, "Invalid UTF-8 in string field"),
            Self::UnknownDataType(code) => write!(f, "Unknown data type code: {}", code),
            Self::MissingDataType(metric) => {
                write!(f, "No data type for metric {}", metric)
            }
            Self::ValueOutOfRange { data_type, value } => {
                write!(f, "Value {} out of range for {}", value, data_type)
            }
            Self::InvalidTimestamp(ms) => write!(f, "Invalid timestamp: {} ms", ms),
            Self::UnsupportedValue(kind) => write!(f, "Unsupported value: {}", kind),
            Self::ValueMismatch { data_type, field } => {
                write!(f, "Field {} cannot carry a {} value", field, data_type)
            }
            Self::NestingTooDeep => write!(
                f,
                "Property sets nested deeper than {}",
                MAX_NESTING_DEPTH
            ),
            Self::Malformed(msg) => write!(f, "Malformed payload: {}", msg),
            Self::InvalidType(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidType(e) => Some(e),
            _ => None,
        }
    }
}

impl From<VarintError> for CodecError {
    fn from(e: VarintError) -> Self {
        match e {
            VarintError::UnexpectedEof => Self::UnexpectedEof,
            VarintError::Overflow => Self::InvalidVarint,
        }
    }
}

impl From<InvalidTypeError> for CodecError {
    fn from(e: InvalidTypeError) -> Self {
        Self::InvalidType(e)
    }
}

/// Payload to bytes.
pub trait PayloadEncoder {
    /// Encode `payload`. `strip_data_types` omits metric data types from the output.
    fn encode(
        &self,
        payload: &SparkplugBPayload,
        strip_data_types: bool,
    ) -> Result<Vec<u8>, CodecError>;
}

/// Bytes to payload.
pub trait PayloadDecoder {
    /// Decode `bytes`, resolving omitted metric data types through `data_types`.
    fn decode(
        &self,
        bytes: &[u8],
        data_types: &MetricDataTypeMap,
    ) -> Result<SparkplugBPayload, CodecError>;
}

/// Both directions of a payload codec.
pub trait PayloadCodec: PayloadEncoder + PayloadDecoder + Send + Sync {}

impl<T: PayloadEncoder + PayloadDecoder + Send + Sync> PayloadCodec for T {}

/// The Sparkplug B protobuf codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct SparkplugBCodec;

impl PayloadEncoder for SparkplugBCodec {
    fn encode(
        &self,
        payload: &SparkplugBPayload,
        strip_data_types: bool,
    ) -> Result<Vec<u8>, CodecError> {
        SparkplugBPayloadEncoder::new()
            .strip_data_types(strip_data_types)
            .encode(payload)
    }
}

impl PayloadDecoder for SparkplugBCodec {
    fn decode(
        &self,
        bytes: &[u8],
        data_types: &MetricDataTypeMap,
    ) -> Result<SparkplugBPayload, CodecError> {
        SparkplugBPayloadDecoder::new(data_types).decode(bytes)
    }
}

/// Field numbers of the `oneof value` slots, which differ between Metric and
/// PropertyValue.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ValueFields {
    pub int: u32,
    pub long: u32,
    pub float: u32,
    pub double: u32,
    pub boolean: u32,
    pub string: u32,
    pub bytes: Option<u32>,
    pub property_set: Option<u32>,
    pub property_sets: Option<u32>,
}

pub(crate) const METRIC_VALUE_FIELDS: ValueFields = ValueFields {
    int: 10,
    long: 11,
    float: 12,
    double: 13,
    boolean: 14,
    string: 15,
    bytes: Some(16),
    property_set: None,
    property_sets: None,
};

pub(crate) const PROPERTY_VALUE_FIELDS: ValueFields = ValueFields {
    int: 3,
    long: 4,
    float: 5,
    double: 6,
    boolean: 7,
    string: 8,
    bytes: None,
    property_set: Some(9),
    property_sets: Some(10),
};
