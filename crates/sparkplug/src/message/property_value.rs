// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed, validated, nullable property values.
//!
//! A [`PropertyValue`] pairs a [`PropertyDataType`] with an optional [`Value`].
//! Every construction, copy, and mutation re-runs the type's validation, so a
//! stored value always matches its declared type.

use crate::message::{InvalidTypeError, PropertyDataType, PropertySet, Value};
use std::fmt;

/// Post-copy validation failure.
///
/// A copy of a well-formed value always validates; this signals a source that
/// bypassed the validating constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyError(pub InvalidTypeError);

impl fmt::Display for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Copied value failed validation: {}", self.0)
    }
}

impl std::error::Error for CopyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<InvalidTypeError> for CopyError {
    fn from(e: InvalidTypeError) -> Self {
        Self(e)
    }
}

/// The value of a property in a [`PropertySet`].
#[derive(Debug, Clone)]
pub struct PropertyValue {
    data_type: PropertyDataType,
    value: Option<Value>,
    is_null: bool,
}

impl PropertyValue {
    /// Create a validated property value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTypeError` if `value` is not a legal instance of `data_type`.
    pub fn new(data_type: PropertyDataType, value: Option<Value>) -> Result<Self, InvalidTypeError> {
        let is_null = value.is_none();
        data_type.check_type(value.as_ref())?;
        Ok(Self {
            data_type,
            value,
            is_null,
        })
    }

    /// Create a null value of the given type.
    pub fn null(data_type: PropertyDataType) -> Self {
        Self {
            data_type,
            value: None,
            is_null: true,
        }
    }

    /// Type-directed deep copy.
    ///
    /// Nested property sets are copied entry by entry, so mutating the copy never
    /// reaches the original. The copied value is validated against the type.
    pub fn deep_copy(&self) -> Result<Self, CopyError> {
        let value = match &self.value {
            None => None,
            Some(value) => Some(match (self.data_type, value) {
                (PropertyDataType::DateTime, Value::DateTime(instant)) => Value::DateTime(*instant),
                (PropertyDataType::PropertySet, Value::PropertySet(set)) => {
                    Value::PropertySet(set.deep_copy()?)
                }
                (PropertyDataType::PropertySetList, Value::PropertySetList(sets)) => {
                    let mut copied = Vec::with_capacity(sets.len());
                    for set in sets {
                        copied.push(set.deep_copy()?);
                    }
                    Value::PropertySetList(copied)
                }
                (
                    PropertyDataType::DateTime
                    | PropertyDataType::PropertySet
                    | PropertyDataType::PropertySetList,
                    other,
                ) => {
                    return Err(CopyError(InvalidTypeError::new(
                        self.data_type,
                        other.kind_name(),
                    )))
                }
                (_, other) => other.clone(),
            }),
        };

        self.data_type.check_type(value.as_ref())?;

        let copy = Self {
            data_type: self.data_type,
            value,
            is_null: self.is_null,
        };
        log::trace!("[PropertyValue::deep_copy] {} -> {}", self, copy);
        Ok(copy)
    }

    /// Get the data type.
    pub fn data_type(&self) -> PropertyDataType {
        self.data_type
    }

    /// Change the data type. The current value must be legal for the new type.
    pub fn set_type(&mut self, data_type: PropertyDataType) -> Result<(), InvalidTypeError> {
        data_type.check_type(self.value.as_ref())?;
        self.data_type = data_type;
        Ok(())
    }

    /// Get the value (`None` when null).
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Mutable access to a nested property set.
    ///
    /// Replacing the whole value goes through [`PropertyValue::set_value`] so the
    /// type stays checked.
    pub fn property_set_mut(&mut self) -> Option<&mut PropertySet> {
        self.value.as_mut().and_then(Value::as_property_set_mut)
    }

    /// Replace the value; `is_null` is updated in the same step.
    ///
    /// On error the previous value is kept.
    pub fn set_value(&mut self, value: Option<Value>) -> Result<(), InvalidTypeError> {
        self.data_type.check_type(value.as_ref())?;
        self.is_null = value.is_none();
        self.value = value;
        Ok(())
    }

    /// Whether the value is null.
    pub fn is_null(&self) -> bool {
        self.is_null
    }

    /// Consume and return the value.
    pub fn into_value(self) -> Option<Value> {
        self.value
    }
}

impl Default for PropertyValue {
    /// An empty value whose type and value are assigned later.
    fn default() -> Self {
        Self::null(PropertyDataType::Unknown)
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        self.data_type == other.data_type && self.value == other.value
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyValue [type={}, value=", self.data_type)?;
        match &self.value {
            Some(v) => write!(f, "{}", v)?,
            None => f.write_str("null")?,
        }
        write!(f, ", isNull={}]", self.is_null)
    }
}
