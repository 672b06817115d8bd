// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sparkplug B payload object graph.

use crate::message::Metric;
use chrono::{DateTime, Utc};

/// A Sparkplug B payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparkplugBPayload {
    timestamp: Option<DateTime<Utc>>,
    metrics: Vec<Metric>,
    seq: Option<u64>,
    uuid: Option<String>,
    body: Option<Vec<u8>>,
}

impl SparkplugBPayload {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut Vec<Metric> {
        &mut self.metrics
    }

    /// Find the first metric with the given name.
    pub fn metric(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name() == Some(name))
    }

    pub fn seq(&self) -> Option<u64> {
        self.seq
    }

    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Builder for [`SparkplugBPayload`].
#[derive(Debug, Clone, Default)]
pub struct SparkplugBPayloadBuilder {
    payload: SparkplugBPayload,
}

impl SparkplugBPayloadBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder carrying a sequence number.
    pub fn with_seq(seq: Option<u64>) -> Self {
        let mut builder = Self::default();
        builder.payload.seq = seq;
        builder
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.payload.timestamp = Some(timestamp);
        self
    }

    pub fn seq(mut self, seq: u64) -> Self {
        self.payload.seq = Some(seq);
        self
    }

    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.payload.uuid = Some(uuid.into());
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.payload.body = Some(body);
        self
    }

    pub fn add_metric(mut self, metric: Metric) -> Self {
        self.payload.metrics.push(metric);
        self
    }

    pub fn add_metrics(mut self, metrics: impl IntoIterator<Item = Metric>) -> Self {
        self.payload.metrics.extend(metrics);
        self
    }

    pub fn build(self) -> SparkplugBPayload {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MetricBuilder, MetricDataType};

    #[test]
    fn test_builder() {
        let metric = MetricBuilder::new("a", MetricDataType::Int32, Some(1i32.into()))
            .build()
            .unwrap();
        let payload = SparkplugBPayloadBuilder::with_seq(Some(7))
            .uuid("id")
            .body(vec![1, 2])
            .add_metric(metric)
            .build();
        assert_eq!(payload.seq(), Some(7));
        assert_eq!(payload.uuid(), Some("id"));
        assert_eq!(payload.body(), Some(&[1u8, 2][..]));
        assert!(payload.metric("a").is_some());
        assert!(payload.metric("b").is_none());
    }

    #[test]
    fn test_default_is_empty() {
        let payload = SparkplugBPayloadBuilder::new().build();
        assert!(payload.metrics().is_empty());
        assert_eq!(payload.seq(), None);
        assert_eq!(payload.timestamp(), None);
    }
}
