// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compressed payload envelopes.
//!
//! A compressed payload is an ordinary [`SparkplugBPayload`] whose `uuid` is
//! [`UUID_COMPRESSED`] and whose `body` holds the compressed binary encoding of the
//! original payload:
//!
//! ```text
//! envelope = { seq: original.seq, uuid: "SPBV1.0_COMPRESSED", body: compress(encode(original)),
//!              metrics: [] | [ { name: "algorithm", type: String, value: "GZIP" | "DEFLATE" } ] }
//! ```
//!
//! An envelope without an `algorithm` metric is always DEFLATE, so any algorithm other
//! than DEFLATE is named in the envelope.
//!
//! # Example
//!
//! ```rust
//! use sparkplug::compression::CompressionAlgorithm;
//! use sparkplug::message::{MetricBuilder, MetricDataType, MetricDataTypeMap, SparkplugBPayloadBuilder};
//! use sparkplug::payload_util;
//!
//! let payload = SparkplugBPayloadBuilder::new()
//!     .seq(7)
//!     .add_metric(MetricBuilder::new("rpm", MetricDataType::UInt32, Some(1200u32.into())).build()?)
//!     .build();
//!
//! let envelope = payload_util::compress_with(&payload, CompressionAlgorithm::Gzip, false)?;
//! assert_eq!(envelope.uuid(), Some("SPBV1.0_COMPRESSED"));
//!
//! let restored = payload_util::decompress(&envelope, &MetricDataTypeMap::new())?;
//! assert_eq!(restored, payload);
//! # Ok::<(), sparkplug::Error>(())
//! ```

use crate::codec::{PayloadCodec, SparkplugBCodec};
use crate::compression::{CodecRegistry, CompressionAlgorithm};
use crate::config::{CompressionConfig, METRIC_ALGORITHM, UUID_COMPRESSED};
use crate::message::{
    Metric, MetricBuilder, MetricDataType, MetricDataTypeMap, SparkplugBPayload,
    SparkplugBPayloadBuilder, Value,
};
use crate::{Error, Result};

#[cfg(feature = "json")]
pub use crate::json::{from_json_string, to_json_string};

/// Compresses payloads into envelopes and back.
///
/// Stateless between calls; one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct PayloadUtil<C = SparkplugBCodec> {
    codec: C,
    registry: CodecRegistry,
    config: CompressionConfig,
}

impl Default for PayloadUtil<SparkplugBCodec> {
    fn default() -> Self {
        Self::with_config(CompressionConfig::default())
    }
}

impl PayloadUtil<SparkplugBCodec> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sparkplug B codec with the default compression codecs tuned by `config`.
    pub fn with_config(config: CompressionConfig) -> Self {
        Self::with_codec(SparkplugBCodec, CodecRegistry::with_defaults(&config), config)
    }
}

impl<C: PayloadCodec> PayloadUtil<C> {
    pub fn with_codec(codec: C, registry: CodecRegistry, config: CompressionConfig) -> Self {
        Self {
            codec,
            registry,
            config,
        }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CodecRegistry {
        &mut self.registry
    }

    /// Encode and compress `payload` into an envelope.
    ///
    /// With `algorithm = None` the configured default is used. The `algorithm` metric
    /// is written for an explicit algorithm and for any algorithm other than DEFLATE;
    /// only an implicit DEFLATE envelope goes without it.
    ///
    /// # Errors
    ///
    /// - `Error::UnsupportedAlgorithm` if no codec is registered for the algorithm
    /// - `Error::Codec` if the payload cannot be encoded
    /// - `Error::Format` if compression fails
    pub fn compress(
        &self,
        payload: &SparkplugBPayload,
        algorithm: Option<CompressionAlgorithm>,
        strip_data_types: bool,
    ) -> Result<SparkplugBPayload> {
        log::trace!("[PayloadUtil::compress] Compressing payload");

        let selected = algorithm.unwrap_or(self.config.default_algorithm);
        let compressor = self.registry.get(selected)?;
        log::debug!(
            "[PayloadUtil::compress] algorithm={} explicit={} strip_data_types={}",
            selected,
            algorithm.is_some(),
            strip_data_types
        );

        let encoded = self.codec.encode(payload, strip_data_types)?;
        let compressed = compressor.compress(&encoded)?;
        log::trace!(
            "[PayloadUtil::compress] {} -> {} bytes",
            encoded.len(),
            compressed.len()
        );

        let mut builder = SparkplugBPayloadBuilder::with_seq(payload.seq())
            .body(compressed)
            .uuid(UUID_COMPRESSED);
        if algorithm.is_some() || selected != CompressionAlgorithm::Deflate {
            builder = builder.add_metric(algorithm_metric(selected)?);
        }
        Ok(builder.build())
    }

    /// Restore the payload carried by an envelope.
    ///
    /// A payload whose `uuid` is not [`UUID_COMPRESSED`] is returned unchanged.
    /// `data_types` resolves metric types that were stripped at compression time.
    ///
    /// # Errors
    ///
    /// - `Error::UnsupportedAlgorithm` if the `algorithm` metric names no registered codec
    /// - `Error::Format` if the body is not a valid compressed stream
    /// - `Error::Codec` / `Error::InvalidType` if the decompressed bytes do not decode
    pub fn decompress(
        &self,
        payload: &SparkplugBPayload,
        data_types: &MetricDataTypeMap,
    ) -> Result<SparkplugBPayload> {
        if payload.uuid() != Some(UUID_COMPRESSED) {
            log::trace!("[PayloadUtil::decompress] Not decompressing payload");
            return Ok(payload.clone());
        }
        log::trace!("[PayloadUtil::decompress] Decompressing payload");

        let algorithm = self.envelope_algorithm(payload)?;
        let decompressor = self.registry.get(algorithm)?;
        log::debug!("[PayloadUtil::decompress] algorithm={}", algorithm);

        let body = payload.body().unwrap_or_default();
        let decompressed = decompressor.decompress(body)?;
        Ok(self.codec.decode(&decompressed, data_types)?)
    }

    fn envelope_algorithm(&self, payload: &SparkplugBPayload) -> Result<CompressionAlgorithm> {
        // the last `algorithm` metric wins
        let Some(metric) = payload
            .metrics()
            .iter()
            .rev()
            .find(|m| m.name() == Some(METRIC_ALGORITHM))
        else {
            return Ok(CompressionAlgorithm::Deflate);
        };

        match metric.value() {
            Some(Value::String(name)) => Ok(name.parse()?),
            Some(other) => Err(Error::UnsupportedAlgorithm(other.to_string())),
            None => Err(Error::UnsupportedAlgorithm("null".to_string())),
        }
    }
}

fn algorithm_metric(algorithm: CompressionAlgorithm) -> Result<Metric> {
    Ok(MetricBuilder::new(
        METRIC_ALGORITHM,
        MetricDataType::String,
        Some(algorithm.as_str().into()),
    )
    .build()?)
}

/// Compress with the default algorithm, writing no `algorithm` metric.
pub fn compress(payload: &SparkplugBPayload, strip_data_types: bool) -> Result<SparkplugBPayload> {
    PayloadUtil::new().compress(payload, None, strip_data_types)
}

/// Compress with `algorithm`, naming it in the envelope.
pub fn compress_with(
    payload: &SparkplugBPayload,
    algorithm: CompressionAlgorithm,
    strip_data_types: bool,
) -> Result<SparkplugBPayload> {
    PayloadUtil::new().compress(payload, Some(algorithm), strip_data_types)
}

/// Restore the payload carried by an envelope; other payloads pass through.
pub fn decompress(
    payload: &SparkplugBPayload,
    data_types: &MetricDataTypeMap,
) -> Result<SparkplugBPayload> {
    PayloadUtil::new().decompress(payload, data_types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::PayloadEncoder;
    use crate::compression::{Codec, CompressionError, Deflate};
    use crate::message::{PropertyDataType, PropertySetBuilder, PropertyValue};
    use std::sync::Arc;

    fn sample_payload() -> SparkplugBPayload {
        let props = PropertySetBuilder::new()
            .add_property(
                "engUnit",
                PropertyValue::new(PropertyDataType::String, Some("degC".into())).unwrap(),
            )
            .build();
        SparkplugBPayloadBuilder::new()
            .seq(7)
            .add_metric(
                MetricBuilder::new("temperature", MetricDataType::Double, Some(21.5f64.into()))
                    .alias(3)
                    .properties(props)
                    .build()
                    .unwrap(),
            )
            .add_metric(
                MetricBuilder::new("running", MetricDataType::Boolean, Some(true.into()))
                    .build()
                    .unwrap(),
            )
            .build()
    }

    fn envelope_with_algorithm(value: Option<Value>, data_type: MetricDataType) -> SparkplugBPayload {
        SparkplugBPayloadBuilder::new()
            .uuid(UUID_COMPRESSED)
            .body(Deflate::default().compress(&[]).unwrap())
            .add_metric(
                MetricBuilder::new(METRIC_ALGORITHM, data_type, value)
                    .build()
                    .unwrap(),
            )
            .build()
    }

    #[test]
    fn test_default_deflate_roundtrip() {
        let payload = sample_payload();
        let envelope = compress(&payload, false).unwrap();

        assert_eq!(envelope.seq(), Some(7));
        assert_eq!(envelope.uuid(), Some(UUID_COMPRESSED));
        assert!(envelope.metrics().is_empty());
        assert!(envelope.body().is_some_and(|b| !b.is_empty()));

        let restored = decompress(&envelope, &MetricDataTypeMap::new()).unwrap();
        assert_eq!(restored, payload);
    }

    #[test]
    fn test_gzip_names_algorithm() {
        let payload = sample_payload();
        let envelope = compress_with(&payload, CompressionAlgorithm::Gzip, false).unwrap();

        assert_eq!(envelope.metrics().len(), 1);
        let metric = &envelope.metrics()[0];
        assert_eq!(metric.name(), Some(METRIC_ALGORITHM));
        assert_eq!(metric.data_type(), MetricDataType::String);
        assert_eq!(metric.value().and_then(Value::as_str), Some("GZIP"));
        assert_eq!(envelope.body().map(|b| &b[..2]), Some(&[0x1F, 0x8B][..]));

        let restored = decompress(&envelope, &MetricDataTypeMap::new()).unwrap();
        assert_eq!(restored, payload);
    }

    #[test]
    fn test_explicit_deflate_names_algorithm() {
        let envelope = compress_with(&sample_payload(), CompressionAlgorithm::Deflate, false).unwrap();
        let metric = &envelope.metrics()[0];
        assert_eq!(metric.value().and_then(Value::as_str), Some("DEFLATE"));
    }

    #[test]
    fn test_uncompressed_passes_through() {
        let payload = sample_payload();
        let out = decompress(&payload, &MetricDataTypeMap::new()).unwrap();
        assert_eq!(out, payload);

        let other_uuid = SparkplugBPayloadBuilder::new()
            .uuid("something-else")
            .body(vec![1, 2, 3])
            .build();
        assert_eq!(
            decompress(&other_uuid, &MetricDataTypeMap::new()).unwrap(),
            other_uuid
        );
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let envelope = envelope_with_algorithm(Some("LZMA".into()), MetricDataType::String);
        let err = decompress(&envelope, &MetricDataTypeMap::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedAlgorithm(ref n) if n == "LZMA"));

        let envelope = envelope_with_algorithm(Some(3i32.into()), MetricDataType::Int32);
        let err = decompress(&envelope, &MetricDataTypeMap::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedAlgorithm(_)));

        let envelope = envelope_with_algorithm(None, MetricDataType::String);
        let err = decompress(&envelope, &MetricDataTypeMap::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedAlgorithm(_)));
    }

    #[test]
    fn test_corrupt_body_is_format_error() {
        let mut envelope = compress(&sample_payload(), false).unwrap();
        let body = envelope.body().unwrap().to_vec();
        envelope = SparkplugBPayloadBuilder::with_seq(envelope.seq())
            .uuid(UUID_COMPRESSED)
            .body(body[..body.len() / 2].to_vec())
            .build();
        let err = decompress(&envelope, &MetricDataTypeMap::new()).unwrap_err();
        assert!(matches!(err, Error::Format(_)));

        let no_body = SparkplugBPayloadBuilder::new().uuid(UUID_COMPRESSED).build();
        assert!(matches!(
            decompress(&no_body, &MetricDataTypeMap::new()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_strip_data_types_with_hints() {
        let payload = sample_payload();
        let envelope = compress(&payload, true).unwrap();

        assert!(matches!(
            decompress(&envelope, &MetricDataTypeMap::new()),
            Err(Error::Codec(_))
        ));

        let hints: MetricDataTypeMap = payload.metrics().iter().collect();
        assert_eq!(decompress(&envelope, &hints).unwrap(), payload);
    }

    #[test]
    fn test_unregistered_algorithm_fails_before_encoding() {
        let mut util = PayloadUtil::new();
        *util.registry_mut() = CodecRegistry::new();
        let err = util
            .compress(&sample_payload(), Some(CompressionAlgorithm::Gzip), false)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedAlgorithm(ref n) if n == "GZIP"));
    }

    #[derive(Debug)]
    struct Identity;

    impl Codec for Identity {
        fn algorithm(&self) -> CompressionAlgorithm {
            CompressionAlgorithm::Gzip
        }

        fn compress(&self, input: &[u8]) -> std::result::Result<Vec<u8>, CompressionError> {
            Ok(input.to_vec())
        }

        fn decompress(&self, input: &[u8]) -> std::result::Result<Vec<u8>, CompressionError> {
            Ok(input.to_vec())
        }
    }

    #[test]
    fn test_registered_codec_replaces_default() {
        let mut util = PayloadUtil::new();
        util.registry_mut().register(Arc::new(Identity));

        let payload = sample_payload();
        let envelope = util
            .compress(&payload, Some(CompressionAlgorithm::Gzip), false)
            .unwrap();
        let encoded = SparkplugBCodec.encode(&payload, false).unwrap();
        assert_eq!(envelope.body(), Some(encoded.as_slice()));
        assert_eq!(util.decompress(&envelope, &MetricDataTypeMap::new()).unwrap(), payload);
    }

    #[test]
    fn test_configured_gzip_readable_by_default_receiver() {
        let sender = PayloadUtil::with_config(
            CompressionConfig::default().with_default_algorithm(CompressionAlgorithm::Gzip),
        );
        let envelope = sender.compress(&sample_payload(), None, false).unwrap();
        assert_eq!(envelope.body().map(|b| b[0]), Some(0x1F));
        assert_eq!(envelope.metrics().len(), 1);
        assert_eq!(
            envelope.metrics()[0].value().and_then(Value::as_str),
            Some("GZIP")
        );

        let receiver = PayloadUtil::new();
        assert_eq!(
            receiver
                .decompress(&envelope, &MetricDataTypeMap::new())
                .unwrap(),
            sample_payload()
        );
    }

    #[test]
    fn test_missing_metric_is_deflate_whatever_the_config() {
        let envelope = compress(&sample_payload(), false).unwrap();
        assert!(envelope.metrics().is_empty());

        let receiver = PayloadUtil::with_config(
            CompressionConfig::default().with_default_algorithm(CompressionAlgorithm::Gzip),
        );
        assert_eq!(
            receiver
                .decompress(&envelope, &MetricDataTypeMap::new())
                .unwrap(),
            sample_payload()
        );
    }

    #[test]
    fn test_last_algorithm_metric_wins() {
        let payload = sample_payload();
        let gzip = compress_with(&payload, CompressionAlgorithm::Gzip, false).unwrap();
        let stale = MetricBuilder::new(
            METRIC_ALGORITHM,
            MetricDataType::String,
            Some(CompressionAlgorithm::Deflate.as_str().into()),
        )
        .build()
        .unwrap();
        let envelope = SparkplugBPayloadBuilder::with_seq(gzip.seq())
            .uuid(UUID_COMPRESSED)
            .body(gzip.body().unwrap().to_vec())
            .add_metric(stale)
            .add_metrics(gzip.metrics().iter().cloned())
            .build();

        assert_eq!(
            decompress(&envelope, &MetricDataTypeMap::new()).unwrap(),
            payload
        );
    }
}
