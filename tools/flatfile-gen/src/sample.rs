// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Flat-file sample record and its ordered label set
//! OWNERS: @runtime
//! STATUS: Experimental
//! API_STABILITY: Unstable
//! TEST_COVERAGE: Unit tests below (record shape, label order)
//!
//! The record field names (`TimestampMs`, `Value`, `Labels`) are what the
//! downstream indexer reads; keep them stable.

use std::collections::HashSet;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Single `name=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Label name.
    pub name: String,
    /// Label value.
    pub value: String,
}

impl From<&hostsim::Label> for Label {
    fn from(value: &hostsim::Label) -> Self {
        Self { name: value.name.clone(), value: value.value.clone() }
    }
}

/// Labels in insertion order. Serialized as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels(Vec<Label>);

impl Labels {
    /// Creates an empty set with room for `capacity` labels.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Appends a label. Callers are responsible for name uniqueness.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push(Label { name: name.into(), value: value.into() });
    }

    /// Returns the value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|l| l.name == name).map(|l| l.value.as_str())
    }

    /// Whether a label called `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the first name that appears more than once, if any.
    pub fn first_duplicate(&self) -> Option<&str> {
        let mut seen = HashSet::with_capacity(self.len());
        self.0.iter().map(|l| l.name.as_str()).find(|name| !seen.insert(*name))
    }

    /// Iterates labels in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.0.iter()
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[hostsim::Label]> for Labels {
    fn from(value: &[hostsim::Label]) -> Self {
        // One extra slot for the identity label appended by the accumulator.
        let mut labels = Self::with_capacity(value.len() + 1);
        labels.0.extend(value.iter().map(Label::from));
        labels
    }
}

impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, label) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={:?}", label.name, label.value)?;
        }
        Ok(())
    }
}

impl Serialize for Labels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for label in &self.0 {
            map.serialize_entry(&label.name, &label.value)?;
        }
        map.end()
    }
}

/// One generated observation. Immutable once accumulated.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricSample {
    /// Unix epoch milliseconds.
    pub timestamp_ms: i64,
    /// Observed value.
    pub value: f64,
    /// Collaborator labels followed by the identity label.
    pub labels: Labels,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MetricSample {
        let mut labels = Labels::default();
        labels.push("zone", "b");
        labels.push("host", "h0");
        labels.push("pod", "00-ff");
        MetricSample { timestamp_ms: 1_700_000_005_000, value: 0.5, labels }
    }

    #[test]
    fn record_shape_matches_indexer_contract() {
        let line = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            line,
            r#"{"TimestampMs":1700000005000,"Value":0.5,"Labels":{"zone":"b","host":"h0","pod":"00-ff"}}"#
        );
    }

    #[test]
    fn copies_collaborator_labels_in_order() {
        let src = vec![hostsim::Label::new("b", "2"), hostsim::Label::new("a", "1")];
        let labels = Labels::from(src.as_slice());
        let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(labels.get("a"), Some("1"));
        assert!(!labels.contains("pod"));
    }

    #[test]
    fn display_renders_pairs() {
        assert_eq!(sample().labels.to_string(), r#"zone="b", host="h0", pod="00-ff""#);
        assert_eq!(Labels::default().to_string(), "");
        assert!(Labels::default().is_empty());
        assert_eq!(sample().labels.len(), 3);
    }

    #[test]
    fn first_duplicate_reports_repeated_name() {
        let mut labels = Labels::default();
        labels.push("a", "1");
        labels.push("b", "2");
        assert_eq!(labels.first_duplicate(), None);
        labels.push("a", "3");
        assert_eq!(labels.first_duplicate(), Some("a"));
    }
}
