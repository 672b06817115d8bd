// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Metrics carried in a Sparkplug B payload.

use crate::message::{InvalidTypeError, MetricDataType, PropertySet, Value};
use chrono::{DateTime, Utc};

/// A single metric.
///
/// Built through [`MetricBuilder`], which validates the value against the data type.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    name: Option<String>,
    alias: Option<u64>,
    timestamp: Option<DateTime<Utc>>,
    data_type: MetricDataType,
    is_historical: Option<bool>,
    is_transient: Option<bool>,
    properties: Option<PropertySet>,
    value: Option<Value>,
}

impl Metric {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn alias(&self) -> Option<u64> {
        self.alias
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn data_type(&self) -> MetricDataType {
        self.data_type
    }

    pub fn is_historical(&self) -> Option<bool> {
        self.is_historical
    }

    pub fn is_transient(&self) -> Option<bool> {
        self.is_transient
    }

    pub fn properties(&self) -> Option<&PropertySet> {
        self.properties.as_ref()
    }

    pub fn properties_mut(&mut self) -> Option<&mut PropertySet> {
        self.properties.as_mut()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Whether the metric value is null.
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Replace the value, validating it against the metric's data type.
    pub fn set_value(&mut self, value: Option<Value>) -> Result<(), InvalidTypeError> {
        self.data_type.check_type(value.as_ref())?;
        self.value = value;
        Ok(())
    }
}

/// Builder for [`Metric`].
#[derive(Debug, Clone)]
pub struct MetricBuilder {
    name: Option<String>,
    alias: Option<u64>,
    timestamp: Option<DateTime<Utc>>,
    data_type: MetricDataType,
    is_historical: Option<bool>,
    is_transient: Option<bool>,
    properties: Option<PropertySet>,
    value: Option<Value>,
}

impl MetricBuilder {
    /// Start a named metric.
    pub fn new(name: impl Into<String>, data_type: MetricDataType, value: Option<Value>) -> Self {
        Self {
            name: Some(name.into()),
            alias: None,
            timestamp: None,
            data_type,
            is_historical: None,
            is_transient: None,
            properties: None,
            value,
        }
    }

    /// Start an alias-only metric (no name on the wire).
    pub fn with_alias(alias: u64, data_type: MetricDataType, value: Option<Value>) -> Self {
        Self {
            name: None,
            alias: Some(alias),
            timestamp: None,
            data_type,
            is_historical: None,
            is_transient: None,
            properties: None,
            value,
        }
    }

    pub fn alias(mut self, alias: u64) -> Self {
        self.alias = Some(alias);
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn historical(mut self, is_historical: bool) -> Self {
        self.is_historical = Some(is_historical);
        self
    }

    pub fn transient(mut self, is_transient: bool) -> Self {
        self.is_transient = Some(is_transient);
        self
    }

    pub fn properties(mut self, properties: PropertySet) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Validate and build the metric.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTypeError` if the value is not legal for the data type.
    pub fn build(self) -> Result<Metric, InvalidTypeError> {
        self.data_type.check_type(self.value.as_ref())?;
        Ok(Metric {
            name: self.name,
            alias: self.alias,
            timestamp: self.timestamp,
            data_type: self.data_type,
            is_historical: self.is_historical,
            is_transient: self.is_transient,
            properties: self.properties,
            value: self.value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{PropertyDataType, PropertyValue};

    #[test]
    fn test_build_valid() {
        let metric = MetricBuilder::new("temp", MetricDataType::Double, Some(21.5f64.into()))
            .alias(4)
            .build()
            .unwrap();
        assert_eq!(metric.name(), Some("temp"));
        assert_eq!(metric.alias(), Some(4));
        assert_eq!(metric.value().and_then(Value::as_f64), Some(21.5));
        assert!(!metric.is_null());
    }

    #[test]
    fn test_build_mismatch() {
        let result = MetricBuilder::new("temp", MetricDataType::Int32, Some("hot".into())).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_alias_only_null() {
        let metric = MetricBuilder::with_alias(9, MetricDataType::Int64, None)
            .build()
            .unwrap();
        assert_eq!(metric.name(), None);
        assert!(metric.is_null());
    }

    #[test]
    fn test_properties_and_set_value() {
        let mut props = PropertySet::new();
        props.set(
            "quality",
            PropertyValue::new(PropertyDataType::Int32, Some(192i32.into())).unwrap(),
        );
        let mut metric = MetricBuilder::new("flag", MetricDataType::Boolean, Some(true.into()))
            .properties(props)
            .build()
            .unwrap();
        assert_eq!(metric.properties().map(PropertySet::len), Some(1));

        assert!(metric.set_value(Some(1i32.into())).is_err());
        assert_eq!(metric.value().and_then(Value::as_bool), Some(true));
        metric.set_value(None).unwrap();
        assert!(metric.is_null());
    }
}
