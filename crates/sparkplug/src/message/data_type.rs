// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sparkplug B data types for property values and metrics.
//!
//! Each data type owns its validation rule: [`PropertyDataType::check_type`] and
//! [`MetricDataType::check_type`] decide whether a [`Value`] is a legal instance
//! of the kind. `None` (null) is always legal.
//!
//! Numeric codes match the `DataType` enum of the Sparkplug B protobuf schema.

use crate::message::Value;
use std::fmt;
use std::str::FromStr;

/// Value/type mismatch raised by `check_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTypeError {
    /// Name of the declared data type.
    pub data_type: String,
    /// Name of the `Value` variant that was rejected.
    pub found: &'static str,
}

impl InvalidTypeError {
    pub(crate) fn new(data_type: impl fmt::Display, found: &'static str) -> Self {
        Self {
            data_type: data_type.to_string(),
            found,
        }
    }
}

impl fmt::Display for InvalidTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid value for data type {}: got {}",
            self.data_type, self.found
        )
    }
}

impl std::error::Error for InvalidTypeError {}

/// Unknown data type name or wire code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDataTypeError(pub String);

impl fmt::Display for UnknownDataTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown data type: {}", self.0)
    }
}

impl std::error::Error for UnknownDataTypeError {}

/// Data types allowed for property values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PropertyDataType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
    Boolean,
    String,
    DateTime,
    Text,
    PropertySet,
    PropertySetList,
    #[default]
    Unknown,
}

impl PropertyDataType {
    /// All property data types, in wire-code order.
    pub const ALL: [PropertyDataType; 17] = [
        Self::Unknown,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Float,
        Self::Double,
        Self::Boolean,
        Self::String,
        Self::DateTime,
        Self::Text,
        Self::PropertySet,
        Self::PropertySetList,
    ];

    /// Sparkplug B wire code.
    pub const fn code(self) -> u32 {
        match self {
            Self::Unknown => 0,
            Self::Int8 => 1,
            Self::Int16 => 2,
            Self::Int32 => 3,
            Self::Int64 => 4,
            Self::UInt8 => 5,
            Self::UInt16 => 6,
            Self::UInt32 => 7,
            Self::UInt64 => 8,
            Self::Float => 9,
            Self::Double => 10,
            Self::Boolean => 11,
            Self::String => 12,
            Self::DateTime => 13,
            Self::Text => 14,
            Self::PropertySet => 20,
            Self::PropertySetList => 21,
        }
    }

    /// Look up a data type by wire code.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }

    /// Textual name, as used in JSON.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::DateTime => "DateTime",
            Self::Text => "Text",
            Self::PropertySet => "PropertySet",
            Self::PropertySetList => "PropertySetList",
        }
    }

    /// Check that `value` is a legal instance of this type.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTypeError` if the value's variant does not belong to this kind.
    /// `Unknown` accepts only null.
    pub fn check_type(self, value: Option<&Value>) -> Result<(), InvalidTypeError> {
        let Some(value) = value else {
            return Ok(());
        };
        let ok = match self {
            Self::Int8 => matches!(value, Value::I8(_)),
            Self::Int16 => matches!(value, Value::I16(_)),
            Self::Int32 => matches!(value, Value::I32(_)),
            Self::Int64 => matches!(value, Value::I64(_)),
            Self::UInt8 => matches!(value, Value::U8(_)),
            Self::UInt16 => matches!(value, Value::U16(_)),
            Self::UInt32 => matches!(value, Value::U32(_)),
            Self::UInt64 => matches!(value, Value::U64(_)),
            Self::Float => matches!(value, Value::F32(_)),
            Self::Double => matches!(value, Value::F64(_)),
            Self::Boolean => matches!(value, Value::Bool(_)),
            Self::String | Self::Text => matches!(value, Value::String(_)),
            Self::DateTime => matches!(value, Value::DateTime(_)),
            Self::PropertySet => matches!(value, Value::PropertySet(_)),
            Self::PropertySetList => matches!(value, Value::PropertySetList(_)),
            Self::Unknown => false,
        };
        if ok {
            Ok(())
        } else {
            Err(InvalidTypeError::new(self, value.kind_name()))
        }
    }
}

impl fmt::Display for PropertyDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyDataType {
    type Err = UnknownDataTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownDataTypeError(s.to_string()))
    }
}

/// Data types allowed for metrics.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MetricDataType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
    Boolean,
    String,
    DateTime,
    Text,
    UUID,
    DataSet,
    Bytes,
    File,
    Template,
    PropertySet,
    PropertySetList,
    #[default]
    Unknown,
}

impl MetricDataType {
    /// All metric data types, in wire-code order.
    pub const ALL: [MetricDataType; 22] = [
        Self::Unknown,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Float,
        Self::Double,
        Self::Boolean,
        Self::String,
        Self::DateTime,
        Self::Text,
        Self::UUID,
        Self::DataSet,
        Self::Bytes,
        Self::File,
        Self::Template,
        Self::PropertySet,
        Self::PropertySetList,
    ];

    /// Sparkplug B wire code.
    pub const fn code(self) -> u32 {
        match self {
            Self::Unknown => 0,
            Self::Int8 => 1,
            Self::Int16 => 2,
            Self::Int32 => 3,
            Self::Int64 => 4,
            Self::UInt8 => 5,
            Self::UInt16 => 6,
            Self::UInt32 => 7,
            Self::UInt64 => 8,
            Self::Float => 9,
            Self::Double => 10,
            Self::Boolean => 11,
            Self::String => 12,
            Self::DateTime => 13,
            Self::Text => 14,
            Self::UUID => 15,
            Self::DataSet => 16,
            Self::Bytes => 17,
            Self::File => 18,
            Self::Template => 19,
            Self::PropertySet => 20,
            Self::PropertySetList => 21,
        }
    }

    /// Look up a data type by wire code.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }

    /// Textual name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::DateTime => "DateTime",
            Self::Text => "Text",
            Self::UUID => "UUID",
            Self::DataSet => "DataSet",
            Self::Bytes => "Bytes",
            Self::File => "File",
            Self::Template => "Template",
            Self::PropertySet => "PropertySet",
            Self::PropertySetList => "PropertySetList",
        }
    }

    /// Check that `value` is a legal instance of this type.
    ///
    /// DataSet and Template values are not modeled, and a metric has no wire slot for
    /// property sets, so those kinds (like `Unknown`) accept only null.
    pub fn check_type(self, value: Option<&Value>) -> Result<(), InvalidTypeError> {
        let Some(value) = value else {
            return Ok(());
        };
        let ok = match self {
            Self::Int8 => matches!(value, Value::I8(_)),
            Self::Int16 => matches!(value, Value::I16(_)),
            Self::Int32 => matches!(value, Value::I32(_)),
            Self::Int64 => matches!(value, Value::I64(_)),
            Self::UInt8 => matches!(value, Value::U8(_)),
            Self::UInt16 => matches!(value, Value::U16(_)),
            Self::UInt32 => matches!(value, Value::U32(_)),
            Self::UInt64 => matches!(value, Value::U64(_)),
            Self::Float => matches!(value, Value::F32(_)),
            Self::Double => matches!(value, Value::F64(_)),
            Self::Boolean => matches!(value, Value::Bool(_)),
            Self::String | Self::Text | Self::UUID => matches!(value, Value::String(_)),
            Self::DateTime => matches!(value, Value::DateTime(_)),
            Self::Bytes | Self::File => matches!(value, Value::Bytes(_)),
            Self::DataSet
            | Self::Template
            | Self::PropertySet
            | Self::PropertySetList
            | Self::Unknown => false,
        };
        if ok {
            Ok(())
        } else {
            Err(InvalidTypeError::new(self, value.kind_name()))
        }
    }
}

impl fmt::Display for MetricDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricDataType {
    type Err = UnknownDataTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownDataTypeError(s.to_string()))
    }
}
