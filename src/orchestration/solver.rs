//! Optimal assignment of subtasks to workers.
//!
//! The solver runs the potentials form of the Hungarian algorithm on a
//! square matrix. Rectangular inputs are padded with zero-cost dummy rows
//! or columns up to `k = max(slots, subtasks)`, which keeps the running
//! time at O(k^3).
//!
//! When a worker may take more than one subtask ([`AssignmentPolicy::Bounded`])
//! each worker row is replicated into that many slots before solving, so
//! the costs of a worker's subtasks add up.
//!
//! The Hungarian pass alone does not prefer low worker indices: augmenting
//! paths for later subtasks can push earlier ones onto higher workers. A
//! second pass walks the subtasks in order and moves each one onto the
//! lowest worker that still admits an optimal completion, re-solving the
//! remaining subtasks to check. The result is the lexicographically
//! smallest optimal worker sequence, so the same matrix always yields the
//! same assignment. That pass costs O(n * m * k^3) for n subtasks and m
//! workers, which is negligible at the handful of workers this serves.

use crate::orchestration::cost::CostMatrix;
use crate::{alog_trace, Error, Result};
use serde::{Deserialize, Serialize};

/// Costs within this relative distance of the optimum count as ties.
const TIE_TOLERANCE: f64 = 1e-9;

/// How many subtasks a single worker may receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AssignmentPolicy {
    /// Each worker takes at most one subtask. More subtasks than workers
    /// is an error.
    #[default]
    OneToOne,
    /// Each worker takes at most `max_per_worker` subtasks.
    Bounded { max_per_worker: usize },
}

impl AssignmentPolicy {
    pub fn max_per_worker(&self) -> usize {
        match *self {
            AssignmentPolicy::OneToOne => 1,
            AssignmentPolicy::Bounded { max_per_worker } => max_per_worker,
        }
    }
}

/// One solved cell: a subtask and the worker it went to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Column index in the cost matrix.
    pub subtask: usize,
    /// Row index in the cost matrix.
    pub worker: usize,
    /// Total cost of the chosen cell.
    pub cost: f64,
    /// Overhead share of the chosen cell.
    pub coordination_cost: f64,
    /// `1 - cost / column_max`, clamped to `[0, 1]`.
    pub confidence: f64,
}

/// Hungarian-algorithm solver under a fixed assignment policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Solver {
    policy: AssignmentPolicy,
}

impl Solver {
    pub fn new(policy: AssignmentPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AssignmentPolicy {
        self.policy
    }

    /// Solve the assignment problem for `matrix`.
    ///
    /// Returns one assignment per subtask, ordered by subtask index.
    ///
    /// # Errors
    /// - `EmptyInput` when the matrix has no workers or no subtasks
    /// - `InvalidMatrix` when any cell is negative or non-finite
    /// - `UnsupportedAssignmentPolicy` when the policy cannot host every subtask
    pub fn solve(&self, matrix: &CostMatrix) -> Result<Vec<Assignment>> {
        matrix.validate()?;

        let workers = matrix.worker_count();
        let subtasks = matrix.subtask_count();
        let capacity = self.policy.max_per_worker();
        if capacity == 0 || workers.saturating_mul(capacity) < subtasks {
            return Err(Error::UnsupportedAssignmentPolicy {
                workers,
                subtasks,
                max_per_worker: capacity,
            });
        }

        let all: Vec<usize> = (0..subtasks).collect();
        let mut remaining = vec![capacity.min(subtasks); workers];
        let (optimum, mut worker_of) = match_subtasks(matrix, &all, &remaining);
        let tolerance = TIE_TOLERANCE * (1.0 + optimum);

        // Walk subtasks in order and move each onto the lowest worker that
        // still admits an optimal completion of the rest.
        let mut fixed = 0.0;
        for j in 0..subtasks {
            let rest = &all[j + 1..];
            for w in 0..worker_of[j] {
                if remaining[w] == 0 {
                    continue;
                }
                remaining[w] -= 1;
                if remaining.iter().sum::<usize>() >= rest.len() {
                    let (tail_cost, tail) = match_subtasks(matrix, rest, &remaining);
                    if fixed + matrix.cost(w, j) + tail_cost <= optimum + tolerance {
                        worker_of[j] = w;
                        worker_of[j + 1..].copy_from_slice(&tail);
                        remaining[w] += 1;
                        break;
                    }
                }
                remaining[w] += 1;
            }
            remaining[worker_of[j]] -= 1;
            fixed += matrix.cost(worker_of[j], j);
        }
        alog_trace!("solver optimum={} workers={:?}", optimum, worker_of);

        let assignments = worker_of
            .into_iter()
            .enumerate()
            .map(|(j, worker)| {
                let cost = matrix.cost(worker, j);
                Assignment {
                    subtask: j,
                    worker,
                    cost,
                    coordination_cost: matrix.overhead(worker, j),
                    confidence: confidence(cost, matrix.column_max(j)),
                }
            })
            .collect();

        Ok(assignments)
    }
}

/// Solve with the default one-to-one policy.
pub fn solve(matrix: &CostMatrix) -> Result<Vec<Assignment>> {
    Solver::default().solve(matrix)
}

/// Total cost of a set of assignments.
pub fn total_cost(assignments: &[Assignment]) -> f64 {
    assignments.iter().map(|a| a.cost).sum()
}

/// Optimal matching of `subtasks` (column indices of `matrix`) onto workers
/// with the given remaining capacities.
///
/// Returns the total cost and the worker chosen for each listed subtask.
/// The capacities must cover every listed subtask.
fn match_subtasks(matrix: &CostMatrix, subtasks: &[usize], capacity: &[usize]) -> (f64, Vec<usize>) {
    if subtasks.is_empty() {
        return (0.0, Vec::new());
    }

    // Worker-major slots; a worker never needs more slots than there are subtasks.
    let slot_worker: Vec<usize> = capacity
        .iter()
        .enumerate()
        .flat_map(|(w, &c)| std::iter::repeat(w).take(c.min(subtasks.len())))
        .collect();
    let k = slot_worker.len().max(subtasks.len());

    // Rows are subtasks, columns are worker slots.
    let mut square = vec![vec![0.0; k]; k];
    for (row, &j) in square.iter_mut().zip(subtasks) {
        for (cell, &w) in row.iter_mut().zip(&slot_worker) {
            *cell = matrix.cost(w, j);
        }
    }

    let workers: Vec<usize> = hungarian(&square)
        .into_iter()
        .take(subtasks.len())
        .map(|slot| slot_worker[slot])
        .collect();
    let total = subtasks
        .iter()
        .zip(&workers)
        .map(|(&j, &w)| matrix.cost(w, j))
        .sum();
    (total, workers)
}

fn confidence(cost: f64, column_max: f64) -> f64 {
    if column_max <= 0.0 {
        return 1.0;
    }
    (1.0 - cost / column_max).clamp(0.0, 1.0)
}

/// Minimum-cost perfect matching on a square matrix.
///
/// Returns, for each row, the column it is matched to. Uses row and
/// column potentials with 1-based bookkeeping; index 0 is the virtual
/// source column.
fn hungarian(a: &[Vec<f64>]) -> Vec<usize> {
    let n = a.len();
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; n + 1];
    // owner[j]: row matched to column j, 0 when free
    let mut owner = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];
    let mut minv = vec![f64::INFINITY; n + 1];
    let mut used = vec![false; n + 1];

    for i in 1..=n {
        owner[0] = i;
        let mut j0 = 0;
        minv.iter_mut().for_each(|m| *m = f64::INFINITY);
        used.iter_mut().for_each(|flag| *flag = false);

        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = a[i0 - 1][j - 1] - u[i0] - v[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[owner[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }

        // Flip the augmenting path back to the source.
        while j0 != 0 {
            let prev = way[j0];
            owner[j0] = owner[prev];
            j0 = prev;
        }
    }

    let mut col_of = vec![0; n];
    for j in 1..=n {
        if owner[j] != 0 {
            col_of[owner[j] - 1] = j - 1;
        }
    }
    col_of
}
