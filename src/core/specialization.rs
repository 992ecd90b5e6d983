//! Worker roles, complexity facets, and the competence table linking them.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of complexity facets (and worker roles).
pub const FACET_COUNT: usize = 3;

/// One dimension of task complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Planning,
    Execution,
    Verification,
}

impl Facet {
    pub const ALL: [Facet; FACET_COUNT] = [Facet::Planning, Facet::Execution, Facet::Verification];

    pub fn index(self) -> usize {
        match self {
            Facet::Planning => 0,
            Facet::Execution => 1,
            Facet::Verification => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The worker role whose specialty this facet is.
    pub fn owner(self) -> WorkerRole {
        WorkerRole::ALL[self.index()]
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Facet::Planning => write!(f, "planning"),
            Facet::Execution => write!(f, "execution"),
            Facet::Verification => write!(f, "verification"),
        }
    }
}

/// A specialized assignee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WorkerRole {
    Planner,
    Executor,
    Verifier,
}

impl WorkerRole {
    pub const ALL: [WorkerRole; FACET_COUNT] =
        [WorkerRole::Planner, WorkerRole::Executor, WorkerRole::Verifier];

    pub fn index(self) -> usize {
        match self {
            WorkerRole::Planner => 0,
            WorkerRole::Executor => 1,
            WorkerRole::Verifier => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The facet this role is best at.
    pub fn specialty(self) -> Facet {
        Facet::ALL[self.index()]
    }
}

impl std::fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerRole::Planner => write!(f, "Planner"),
            WorkerRole::Executor => write!(f, "Executor"),
            WorkerRole::Verifier => write!(f, "Verifier"),
        }
    }
}

/// Baseline proficiency table. Rows are roles, columns are facets.
pub const DEFAULT_PROFICIENCY: [[f64; FACET_COUNT]; FACET_COUNT] = [
    [0.9, 0.3, 0.2], // Planner
    [0.2, 0.9, 0.3], // Executor
    [0.3, 0.2, 0.9], // Verifier
];

/// Immutable role x facet proficiency table.
///
/// Every entry lies in `[0, 1]` and each row's diagonal entry is strictly
/// greater than the other entries in that row. The table has no mutators;
/// a different profile means constructing a new table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SpecializationMatrix([[f64; FACET_COUNT]; FACET_COUNT]);

impl SpecializationMatrix {
    /// Build a table, checking the range and diagonal-dominance invariants.
    pub fn new(rows: [[f64; FACET_COUNT]; FACET_COUNT]) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            for (j, &p) in row.iter().enumerate() {
                if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                    return Err(Error::InvalidSpecialization(format!(
                        "proficiency[{}][{}] = {} is outside [0, 1]",
                        i, j, p
                    )));
                }
            }
            let diagonal = row[i];
            if row
                .iter()
                .enumerate()
                .any(|(j, &p)| j != i && p >= diagonal)
            {
                return Err(Error::InvalidSpecialization(format!(
                    "row {} is not dominated by its diagonal entry {}",
                    i, diagonal
                )));
            }
        }
        Ok(Self(rows))
    }

    pub fn proficiency(&self, role: WorkerRole, facet: Facet) -> f64 {
        self.0[role.index()][facet.index()]
    }

    /// Number of worker rows in the table.
    pub fn worker_count(&self) -> usize {
        FACET_COUNT
    }

    pub fn rows(&self) -> &[[f64; FACET_COUNT]; FACET_COUNT] {
        &self.0
    }
}

impl Default for SpecializationMatrix {
    fn default() -> Self {
        Self(DEFAULT_PROFICIENCY)
    }
}

impl<'de> Deserialize<'de> for SpecializationMatrix {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = <[[f64; FACET_COUNT]; FACET_COUNT]>::deserialize(deserializer)?;
        Self::new(rows).map_err(serde::de::Error::custom)
    }
}
