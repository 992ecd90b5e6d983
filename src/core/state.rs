//! UI state snapshots supplied by the automation environment.
//!
//! The snapshot is read-only to the assignment core. Only the hierarchy
//! depth and the element type labels matter; any other field present in
//! the source JSON is ignored on deserialization.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Type label used for elements that arrive without one.
pub const UNKNOWN_ELEMENT_TYPE: &str = "unknown";

fn unknown_type() -> String {
    UNKNOWN_ELEMENT_TYPE.to_string()
}

/// A single UI element in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Element type label (e.g. "button", "slider").
    #[serde(rename = "type", default = "unknown_type")]
    pub kind: String,
}

impl Element {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
        }
    }
}

/// A point-in-time description of the UI a task runs against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Depth of the view hierarchy. Absent is treated the same as zero.
    #[serde(default)]
    pub hierarchy_depth: Option<u32>,
    /// Elements in document order.
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl StateSnapshot {
    /// Build a snapshot from a depth and a list of element type labels.
    pub fn new(hierarchy_depth: u32, kinds: &[&str]) -> Self {
        Self {
            hierarchy_depth: Some(hierarchy_depth),
            elements: kinds.iter().map(|k| Element::new(k)).collect(),
        }
    }

    /// Hierarchy depth coerced to at least 1.
    pub fn effective_depth(&self) -> u32 {
        self.hierarchy_depth.unwrap_or(0).max(1)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Number of distinct element type labels.
    pub fn distinct_type_count(&self) -> usize {
        self.elements
            .iter()
            .map(|e| e.kind.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}
