// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Sparkplug B payloads
//!
//! The typed value model of Sparkplug B (property values, property sets, metrics,
//! payloads), its protobuf wire codec, and the compressed payload envelope.
//!
//! ## Quick Start
//!
//! ```rust
//! use sparkplug::message::{
//!     MetricBuilder, MetricDataType, MetricDataTypeMap, PropertyDataType, PropertySetBuilder,
//!     PropertyValue, SparkplugBPayloadBuilder,
//! };
//! use sparkplug::{PayloadUtil, Result};
//!
//! fn main() -> Result<()> {
//!     let props = PropertySetBuilder::new()
//!         .add_property("engUnit", PropertyValue::new(PropertyDataType::String, Some("degC".into()))?)
//!         .build();
//!
//!     let payload = SparkplugBPayloadBuilder::new()
//!         .seq(1)
//!         .add_metric(
//!             MetricBuilder::new("temperature", MetricDataType::Double, Some(21.5f64.into()))
//!                 .properties(props)
//!                 .build()?,
//!         )
//!         .build();
//!
//!     let util = PayloadUtil::new();
//!     let envelope = util.compress(&payload, None, false)?;
//!     let restored = util.decompress(&envelope, &MetricDataTypeMap::new())?;
//!     assert_eq!(restored, payload);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |  payload_util    PayloadUtil: envelope { uuid, algorithm, body }    |
//! +---------------------------------------------------------------------+
//! |  codec           protobuf encoder / decoder     |  json (feature)   |
//! +---------------------------------------------------------------------+
//! |  compression     CodecRegistry -> Deflate | Gzip (flate2)           |
//! +---------------------------------------------------------------------+
//! |  message         PropertyValue | PropertySet | Metric | Payload     |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Features
//!
//! - `json` (default): JSON text form via serde
//!
//! ## Logging
//!
//! The crate logs through the `log` facade (`trace` for copies and compression,
//! `debug` for algorithm selection). Install any logger to see it.

pub mod codec;
pub mod compression;
pub mod config;
mod error;
#[cfg(feature = "json")]
pub mod json;
pub mod message;
pub mod payload_util;

pub use codec::{CodecError, PayloadCodec, PayloadDecoder, PayloadEncoder, SparkplugBCodec};
pub use compression::{Codec, CodecRegistry, CompressionAlgorithm, CompressionError};
pub use config::{CompressionConfig, METRIC_ALGORITHM, UUID_COMPRESSED};
pub use error::{Error, Result};
pub use message::{
    CopyError, InvalidTypeError, Metric, MetricBuilder, MetricDataType, MetricDataTypeMap,
    PropertyDataType, PropertySet, PropertySetBuilder, PropertyValue, SparkplugBPayload,
    SparkplugBPayloadBuilder, Value,
};
pub use payload_util::PayloadUtil;
