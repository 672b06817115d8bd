// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decode-time metric type hints.
//!
//! Payloads encoded with stripped data types carry no `datatype` on their metrics.
//! A receiver that saw the birth certificate records each metric's type here and
//! hands the map to the decoder.

use crate::message::{Metric, MetricDataType};
use std::collections::HashMap;

/// Metric data types keyed by alias and by name.
#[derive(Debug, Clone, Default)]
pub struct MetricDataTypeMap {
    by_alias: HashMap<u64, MetricDataType>,
    by_name: HashMap<String, MetricDataType>,
}

impl MetricDataTypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the type for an alias.
    pub fn add_alias(&mut self, alias: u64, data_type: MetricDataType) {
        self.by_alias.insert(alias, data_type);
    }

    /// Record the type for a metric name.
    pub fn add_name(&mut self, name: impl Into<String>, data_type: MetricDataType) {
        self.by_name.insert(name.into(), data_type);
    }

    /// Record a metric's type under its alias and name (whichever it has).
    pub fn add_metric(&mut self, metric: &Metric) {
        if let Some(alias) = metric.alias() {
            self.add_alias(alias, metric.data_type());
        }
        if let Some(name) = metric.name() {
            self.add_name(name, metric.data_type());
        }
    }

    /// Resolve a type, preferring the alias.
    pub fn resolve(&self, alias: Option<u64>, name: Option<&str>) -> Option<MetricDataType> {
        alias
            .and_then(|a| self.by_alias.get(&a).copied())
            .or_else(|| name.and_then(|n| self.by_name.get(n).copied()))
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty() && self.by_name.is_empty()
    }
}

impl<'a> FromIterator<&'a Metric> for MetricDataTypeMap {
    fn from_iter<I: IntoIterator<Item = &'a Metric>>(iter: I) -> Self {
        let mut map = Self::new();
        for metric in iter {
            map.add_metric(metric);
        }
        map
    }
}
