//! Cost matrix construction.
//!
//! For worker `i` and subtask `j` targeting facet `f`:
//!
//! ```text
//! cost[i][j] = (1 - proficiency(i, f)) * complexity[f] + overhead(i, j)
//! ```
//!
//! The mismatch part and the overhead part are stored separately so that
//! the solver can report the coordination share of each chosen cell.

use crate::core::specialization::{Facet, SpecializationMatrix, WorkerRole, FACET_COUNT};
use crate::core::subtask::Subtask;
use crate::log::LogLevel;
use crate::{alog_trace, Error, Result};

/// Default uniform communication overhead per assignment.
pub const DEFAULT_OVERHEAD: f64 = 0.05;

/// Coordination friction of handing a subtask to a worker.
///
/// Implementations must be deterministic and return finite, non-negative
/// values. Any `Fn(worker_index, subtask_index) -> f64` closure qualifies.
pub trait CommunicationOverhead {
    fn overhead(&self, worker: usize, subtask_index: usize, subtask: &Subtask) -> f64;
}

impl<F> CommunicationOverhead for F
where
    F: Fn(usize, usize) -> f64,
{
    fn overhead(&self, worker: usize, subtask_index: usize, _subtask: &Subtask) -> f64 {
        self(worker, subtask_index)
    }
}

/// The same overhead for every (worker, subtask) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformOverhead(pub f64);

impl Default for UniformOverhead {
    fn default() -> Self {
        Self(DEFAULT_OVERHEAD)
    }
}

impl CommunicationOverhead for UniformOverhead {
    fn overhead(&self, _worker: usize, _subtask_index: usize, _subtask: &Subtask) -> f64 {
        self.0
    }
}

/// Hand-off cost between the role owning a subtask's facet and the worker
/// that receives it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RolePairOverhead;

impl RolePairOverhead {
    /// Cost of handing work from `from` to `to`.
    pub fn pair_cost(from: WorkerRole, to: WorkerRole) -> f64 {
        use WorkerRole::*;
        match (from, to) {
            (a, b) if a == b => 0.0,
            (Planner, Executor) => 0.1,
            (Executor, Verifier) => 0.05,
            (Verifier, Planner) => 0.15,
            _ => 0.2,
        }
    }
}

impl CommunicationOverhead for RolePairOverhead {
    fn overhead(&self, worker: usize, _subtask_index: usize, subtask: &Subtask) -> f64 {
        match (
            subtask.facet().map(Facet::owner),
            WorkerRole::from_index(worker),
        ) {
            (Some(owner), Some(to)) => Self::pair_cost(owner, to),
            _ => 0.2,
        }
    }
}

/// A fully populated worker x subtask cost matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    workers: usize,
    subtasks: usize,
    /// Row-major specialization mismatch costs.
    base: Vec<f64>,
    /// Row-major coordination overhead costs.
    overhead: Vec<f64>,
}

impl CostMatrix {
    /// Build from plain rows with zero overhead.
    ///
    /// Rows are workers, columns are subtasks. Ragged input is rejected.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let zeros = vec![vec![0.0; cols]; rows.len()];
        Self::with_overhead(rows, zeros)
    }

    /// Build from separate mismatch and overhead rows of identical shape.
    pub fn with_overhead(base: Vec<Vec<f64>>, overhead: Vec<Vec<f64>>) -> Result<Self> {
        let workers = base.len();
        let subtasks = base.first().map_or(0, Vec::len);
        if overhead.len() != workers {
            return Err(Error::ShapeMismatch {
                expected: workers,
                found: overhead.len(),
            });
        }
        for row in base.iter().chain(overhead.iter()) {
            if row.len() != subtasks {
                return Err(Error::ShapeMismatch {
                    expected: subtasks,
                    found: row.len(),
                });
            }
        }
        Ok(Self {
            workers,
            subtasks,
            base: base.into_iter().flatten().collect(),
            overhead: overhead.into_iter().flatten().collect(),
        })
    }

    pub fn worker_count(&self) -> usize {
        self.workers
    }

    pub fn subtask_count(&self) -> usize {
        self.subtasks
    }

    pub fn is_empty(&self) -> bool {
        self.workers == 0 || self.subtasks == 0
    }

    /// Specialization mismatch part of a cell.
    pub fn base(&self, worker: usize, subtask: usize) -> f64 {
        self.base[worker * self.subtasks + subtask]
    }

    /// Coordination overhead part of a cell.
    pub fn overhead(&self, worker: usize, subtask: usize) -> f64 {
        self.overhead[worker * self.subtasks + subtask]
    }

    /// Total cost of a cell.
    pub fn cost(&self, worker: usize, subtask: usize) -> f64 {
        self.base(worker, subtask) + self.overhead(worker, subtask)
    }

    /// Largest total cost in a subtask's column.
    pub fn column_max(&self, subtask: usize) -> f64 {
        (0..self.workers)
            .map(|i| self.cost(i, subtask))
            .fold(0.0, f64::max)
    }

    /// Check that the matrix is non-empty and every cell is finite and >= 0.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::EmptyInput {
                rows: self.workers,
                cols: self.subtasks,
            });
        }
        for i in 0..self.workers {
            for j in 0..self.subtasks {
                for value in [self.base(i, j), self.overhead(i, j), self.cost(i, j)] {
                    if !value.is_finite() || value < 0.0 {
                        return Err(Error::InvalidMatrix {
                            row: i,
                            col: j,
                            value,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for CostMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.workers {
            let row: Vec<String> = (0..self.subtasks)
                .map(|j| format!("{:.3}", self.cost(i, j)))
                .collect();
            writeln!(f, "[{}]", row.join(", "))?;
        }
        Ok(())
    }
}

/// Build the cost matrix for a set of subtasks.
///
/// `complexity` must hold exactly one entry per facet, and every subtask
/// must reference a facet inside it.
pub fn build_cost_matrix(
    complexity: &[f64],
    subtasks: &[Subtask],
    specialization: &SpecializationMatrix,
    overhead: &dyn CommunicationOverhead,
) -> Result<CostMatrix> {
    if let Some(max_facet) = subtasks.iter().map(|s| s.facet).max() {
        if max_facet >= complexity.len() {
            return Err(Error::ShapeMismatch {
                expected: max_facet + 1,
                found: complexity.len(),
            });
        }
    }
    if complexity.len() != FACET_COUNT {
        return Err(Error::ShapeMismatch {
            expected: FACET_COUNT,
            found: complexity.len(),
        });
    }

    let workers = specialization.worker_count();
    let mut base = Vec::with_capacity(workers);
    let mut extra = Vec::with_capacity(workers);

    for role in WorkerRole::ALL.into_iter().take(workers) {
        let mut base_row = Vec::with_capacity(subtasks.len());
        let mut extra_row = Vec::with_capacity(subtasks.len());
        for (j, subtask) in subtasks.iter().enumerate() {
            let facet = subtask.facet().ok_or(Error::ShapeMismatch {
                expected: FACET_COUNT,
                found: subtask.facet + 1,
            })?;
            let mismatch = (1.0 - specialization.proficiency(role, facet)) * complexity[facet.index()];
            base_row.push(mismatch);
            extra_row.push(overhead.overhead(role.index(), j, subtask));
        }
        base.push(base_row);
        extra.push(extra_row);
    }

    let matrix = CostMatrix::with_overhead(base, extra)?;
    // Display renders every cell; skip it unless trace output is on.
    if crate::log::get_level() >= LogLevel::Trace {
        alog_trace!("cost matrix {}x{}:\n{}", workers, subtasks.len(), matrix);
    }
    Ok(matrix)
}
