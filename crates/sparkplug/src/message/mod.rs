// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sparkplug B message model.
//!
//! # Features
//!
//! - **Data types**: [`PropertyDataType`] and [`MetricDataType`] with per-kind validation
//! - **PropertyValue**: typed, nullable value that is validated on every change
//! - **PropertySet**: named property values, nestable inside a `PropertyValue`
//! - **Metric / SparkplugBPayload**: the payload object graph and its builders
//!
//! # Example
//!
//! ```rust
//! use sparkplug::message::{
//!     MetricBuilder, MetricDataType, PropertyDataType, PropertySet, PropertyValue,
//!     SparkplugBPayloadBuilder,
//! };
//!
//! let mut props = PropertySet::new();
//! props.set(
//!     "engUnit",
//!     PropertyValue::new(PropertyDataType::String, Some("degC".into())).unwrap(),
//! );
//!
//! let metric = MetricBuilder::new("temperature", MetricDataType::Double, Some(21.5f64.into()))
//!     .properties(props)
//!     .build()
//!     .unwrap();
//!
//! let payload = SparkplugBPayloadBuilder::new().seq(0).add_metric(metric).build();
//! assert_eq!(payload.metrics().len(), 1);
//!
//! // Values are checked against their declared type.
//! assert!(PropertyValue::new(PropertyDataType::Int32, Some("hello".into())).is_err());
//! ```

mod data_type;
mod data_type_map;
mod metric;
mod payload;
mod property_set;
mod property_value;
mod value;

pub use data_type::{InvalidTypeError, MetricDataType, PropertyDataType, UnknownDataTypeError};
pub use data_type_map::MetricDataTypeMap;
pub use metric::{Metric, MetricBuilder};
pub use payload::{SparkplugBPayload, SparkplugBPayloadBuilder};
pub use property_set::{PropertySet, PropertySetBuilder};
pub use property_value::{CopyError, PropertyValue};
pub use value::Value;
