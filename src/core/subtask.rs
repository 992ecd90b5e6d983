//! Subtasks and the policies that generate them from a complexity vector.

use crate::core::complexity::ComplexityVector;
use crate::core::specialization::Facet;
use serde::{Deserialize, Serialize};

/// Default mean-complexity threshold for fine-grained decomposition.
pub const DEFAULT_ADAPTIVE_THRESHOLD: f64 = 2.0;

/// A unit of work targeting one complexity facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    /// Index of the targeted facet in the complexity vector.
    pub facet: usize,
    /// Human-readable label, e.g. "execute_gesture".
    pub label: String,
    /// 1-based position in generation order.
    pub priority: u32,
}

impl Subtask {
    pub fn new(facet: Facet, label: &str, priority: u32) -> Self {
        Self {
            facet: facet.index(),
            label: label.to_string(),
            priority,
        }
    }

    /// The targeted facet, if the index names one.
    pub fn facet(&self) -> Option<Facet> {
        Facet::from_index(self.facet)
    }
}

fn default_label(facet: Facet) -> &'static str {
    match facet {
        Facet::Planning => "plan_actions",
        Facet::Execution => "execute_gesture",
        Facet::Verification => "verify_state",
    }
}

/// Rule for turning a complexity vector into subtasks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SubtaskPolicy {
    /// One subtask per facet, in facet order.
    #[default]
    PerFacet,
    /// One subtask per facet whose complexity is at least `epsilon`.
    SkipBelow { epsilon: f64 },
    /// Fine-grained split when the mean complexity exceeds `threshold`,
    /// a coarse execute-then-verify split otherwise.
    Adaptive { threshold: f64 },
}

impl SubtaskPolicy {
    /// Generate subtasks for a task with the given complexity.
    ///
    /// May return an empty list under `SkipBelow`; callers decide whether
    /// that is an error.
    pub fn generate(&self, complexity: &ComplexityVector) -> Vec<Subtask> {
        let plan: Vec<(Facet, &str)> = match *self {
            SubtaskPolicy::PerFacet => Facet::ALL.iter().map(|&f| (f, default_label(f))).collect(),
            SubtaskPolicy::SkipBelow { epsilon } => Facet::ALL
                .iter()
                .filter(|&&f| complexity[f] >= epsilon)
                .map(|&f| (f, default_label(f)))
                .collect(),
            SubtaskPolicy::Adaptive { threshold } => {
                if complexity.mean() > threshold {
                    vec![
                        (Facet::Planning, "analyze_ui"),
                        (Facet::Planning, "plan_actions"),
                        (Facet::Execution, "execute_gesture"),
                        (Facet::Verification, "verify_state"),
                    ]
                } else {
                    vec![
                        (Facet::Execution, "direct_execution"),
                        (Facet::Verification, "verify_completion"),
                    ]
                }
            }
        };

        plan.into_iter()
            .enumerate()
            .map(|(i, (facet, label))| Subtask::new(facet, label, i as u32 + 1))
            .collect()
    }
}
