// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Named collections of property values.
//!
//! A [`PropertySet`] exclusively owns its [`PropertyValue`]s, which in turn own any
//! nested sets, so the structure is an acyclic tree and a deep copy never shares
//! subtrees with its source.

use crate::message::{CopyError, InvalidTypeError, PropertyValue};
use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;

/// A set of properties associated with a metric (or nested in another property).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySet {
    map: HashMap<String, PropertyValue>,
}

impl PropertySet {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-copy every entry into a freshly allocated set.
    ///
    /// Fails as a whole if any entry fails to copy.
    pub fn deep_copy(&self) -> Result<Self, CopyError> {
        let mut map = HashMap::with_capacity(self.map.len());
        for (name, value) in &self.map {
            map.insert(name.clone(), value.deep_copy()?);
        }
        let copy = Self { map };
        log::trace!("[PropertySet::deep_copy] {} -> {}", self, copy);
        Ok(copy)
    }

    /// Get the property value for `name`.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.map.get(name)
    }

    /// Get the property value for `name` mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut PropertyValue> {
        self.map.get_mut(name)
    }

    /// Set the property value for `name`, returning the value it replaced.
    pub fn set(&mut self, name: impl Into<String>, value: PropertyValue) -> Option<PropertyValue> {
        self.map.insert(name.into(), value)
    }

    /// Remove a property. Removing a missing name is a no-op.
    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.map.remove(name)
    }

    /// Remove all properties.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Property names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// Property values, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &PropertyValue> {
        self.map.values()
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> hash_map::Iter<'_, String, PropertyValue> {
        self.map.iter()
    }

    /// Whether a property named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the set holds no properties.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<'a> IntoIterator for &'a PropertySet {
    type Item = (&'a String, &'a PropertyValue);
    type IntoIter = hash_map::Iter<'a, String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

impl fmt::Display for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PropertySet [propertyMap={")?;
        for (i, (name, value)) in self.map.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str("}]")
    }
}

/// Builder for [`PropertySet`].
///
/// # Example
///
/// ```rust
/// use sparkplug::message::{PropertyDataType, PropertySetBuilder, PropertyValue};
///
/// let props = PropertySetBuilder::new()
///     .add_property(
///         "engUnit",
///         PropertyValue::new(PropertyDataType::String, Some("degC".into())).unwrap(),
///     )
///     .build();
/// assert_eq!(props.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct PropertySetBuilder {
    map: HashMap<String, PropertyValue>,
}

impl PropertySetBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing map.
    pub fn from_map(map: HashMap<String, PropertyValue>) -> Self {
        Self { map }
    }

    /// Start from an existing set.
    ///
    /// Each entry is rebuilt through [`PropertyValue::new`] from its type and a clone
    /// of its raw value. Unlike [`PropertySet::deep_copy`] this does not run the
    /// type-directed copy of nested sets.
    pub fn from_property_set(set: &PropertySet) -> Result<Self, InvalidTypeError> {
        let mut map = HashMap::with_capacity(set.len());
        for (name, value) in set {
            let rebuilt = PropertyValue::new(value.data_type(), value.value().cloned())?;
            map.insert(name.clone(), rebuilt);
        }
        Ok(Self { map })
    }

    /// Add (or replace) one property.
    pub fn add_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.map.insert(name.into(), value);
        self
    }

    /// Merge many properties; later entries win on name collisions.
    pub fn add_properties<I, K>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, PropertyValue)>,
        K: Into<String>,
    {
        self.map
            .extend(properties.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Freeze into a [`PropertySet`].
    pub fn build(self) -> PropertySet {
        PropertySet { map: self.map }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{PropertyDataType, Value};

    fn int(v: i32) -> PropertyValue {
        PropertyValue::new(PropertyDataType::Int32, Some(v.into())).unwrap()
    }

    fn string(v: &str) -> PropertyValue {
        PropertyValue::new(PropertyDataType::String, Some(v.into())).unwrap()
    }

    #[test]
    fn test_set_overwrites() {
        let mut set = PropertySet::new();
        assert!(set.set("a", int(1)).is_none());
        let old = set.set("a", int(2));
        assert_eq!(old, Some(int(1)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a"), Some(&int(2)));
    }

    #[test]
    fn test_missing_keys() {
        let mut set = PropertySet::new();
        assert!(set.get("nope").is_none());
        assert!(set.remove("nope").is_none());
        assert!(set.is_empty());
    }

    #[test]
    fn test_names_values_clear() {
        let mut set = PropertySet::new();
        set.set("a", int(1));
        set.set("b", string("x"));
        let mut names: Vec<&str> = set.names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(set.values().count(), 2);
        assert!(set.contains("b"));

        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let mut inner = PropertySet::new();
        inner.set("depth", int(2));
        let mut outer = PropertySet::new();
        outer.set(
            "nested",
            PropertyValue::new(PropertyDataType::PropertySet, Some(inner.into())).unwrap(),
        );

        let mut copy = outer.deep_copy().unwrap();
        assert_eq!(copy, outer);

        copy.get_mut("nested")
            .and_then(PropertyValue::property_set_mut)
            .unwrap()
            .set("depth", int(99));

        let original_depth = outer
            .get("nested")
            .and_then(PropertyValue::value)
            .and_then(Value::as_property_set)
            .and_then(|s| s.get("depth"))
            .cloned();
        assert_eq!(original_depth, Some(int(2)));
        assert_ne!(copy, outer);
    }

    #[test]
    fn test_builder_merge_later_wins() {
        let set = PropertySetBuilder::new()
            .add_property("a", int(1))
            .add_properties(vec![("a", int(2)), ("b", int(3))])
            .add_properties(vec![("b".to_string(), int(4))])
            .build();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("a"), Some(&int(2)));
        assert_eq!(set.get("b"), Some(&int(4)));
    }

    #[test]
    fn test_builder_from_map() {
        let mut map = HashMap::new();
        map.insert("k".to_string(), string("v"));
        let set = PropertySetBuilder::from_map(map).build();
        assert_eq!(set.get("k"), Some(&string("v")));
    }

    #[test]
    fn test_builder_from_set_matches_deep_copy() {
        let mut inner = PropertySet::new();
        inner.set("x", int(1));
        let mut set = PropertySet::new();
        set.set("plain", string("v"));
        set.set(
            "nested",
            PropertyValue::new(PropertyDataType::PropertySet, Some(inner.into())).unwrap(),
        );

        // The builder path rebuilds through `PropertyValue::new`, not `deep_copy`;
        // for an owned tree the results are still equal and unshared.
        let rebuilt = PropertySetBuilder::from_property_set(&set)
            .unwrap()
            .build();
        assert_eq!(rebuilt, set.deep_copy().unwrap());

        let mut rebuilt = rebuilt;
        rebuilt
            .get_mut("nested")
            .and_then(PropertyValue::property_set_mut)
            .unwrap()
            .clear();
        assert_ne!(rebuilt, set);
    }

    #[test]
    fn test_display() {
        let mut set = PropertySet::new();
        set.set("a", int(1));
        assert_eq!(
            set.to_string(),
            "PropertySet [propertyMap={a=PropertyValue [type=Int32, value=1, isNull=false]}]"
        );
    }
}
