//! Task decomposition: from a state snapshot to an assignment plan.
//!
//! The decomposer wires the pieces together for a single task:
//!
//! 1. compute the complexity vector of the snapshot
//! 2. generate subtasks under the configured [`SubtaskPolicy`]
//! 3. build the cost matrix from the specialization table and overhead model
//! 4. solve it under the configured [`AssignmentPolicy`]
//!
//! There is no retry or recovery. Any failure is returned unchanged.
//! A decomposer holds only immutable configuration, so one instance can
//! serve concurrent callers behind an `Arc`.

use crate::core::complexity::{compute_complexity_vector, ComplexityVector};
use crate::core::specialization::{SpecializationMatrix, WorkerRole};
use crate::core::state::StateSnapshot;
use crate::core::subtask::{Subtask, SubtaskPolicy};
use crate::orchestration::cost::{build_cost_matrix, CommunicationOverhead, UniformOverhead};
use crate::orchestration::solver::{AssignmentPolicy, Solver};
use crate::{alog_debug, alog_warn, Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for a decomposition plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(pub Uuid);

impl PlanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return first 8 characters of the UUID for display.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for PlanId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A subtask together with the worker chosen for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtaskAssignment {
    /// Identifier of the task the subtask came from.
    pub task: String,
    pub subtask: Subtask,
    pub worker: WorkerRole,
    /// In `[0, 1]`; 1 means the cheapest possible fit for this subtask.
    pub confidence: f64,
    /// Overhead share of the assignment's cost.
    pub coordination_cost: f64,
    /// Total cost (mismatch plus overhead).
    pub cost: f64,
}

/// The full result of decomposing one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub task: String,
    pub complexity: ComplexityVector,
    pub assignments: Vec<SubtaskAssignment>,
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Predicted number of steps: one per assigned subtask.
    pub fn predicted_steps(&self) -> usize {
        self.assignments.len()
    }

    pub fn coordination_cost(&self) -> f64 {
        self.assignments.iter().map(|a| a.coordination_cost).sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.assignments.iter().map(|a| a.cost).sum()
    }

    pub fn mean_confidence(&self) -> f64 {
        if self.assignments.is_empty() {
            return 0.0;
        }
        self.assignments.iter().map(|a| a.confidence).sum::<f64>() / self.assignments.len() as f64
    }

    /// Number of subtasks handed to each worker role.
    pub fn worker_distribution(&self) -> BTreeMap<WorkerRole, usize> {
        let mut counts = BTreeMap::new();
        for a in &self.assignments {
            *counts.entry(a.worker).or_insert(0) += 1;
        }
        counts
    }
}

/// Splits tasks into subtasks and assigns them to workers at minimum cost.
pub struct TaskDecomposer {
    specialization: SpecializationMatrix,
    overhead: Box<dyn CommunicationOverhead + Send + Sync>,
    subtask_policy: SubtaskPolicy,
    solver: Solver,
}

impl TaskDecomposer {
    /// Create a decomposer with the given specialization table, uniform
    /// default overhead, one subtask per facet, and one-to-one assignment.
    pub fn new(specialization: SpecializationMatrix) -> Self {
        Self {
            specialization,
            overhead: Box::new(UniformOverhead::default()),
            subtask_policy: SubtaskPolicy::default(),
            solver: Solver::default(),
        }
    }

    /// Replace the communication overhead model.
    pub fn with_overhead<O>(mut self, overhead: O) -> Self
    where
        O: CommunicationOverhead + Send + Sync + 'static,
    {
        self.overhead = Box::new(overhead);
        self
    }

    pub fn with_subtask_policy(mut self, policy: SubtaskPolicy) -> Self {
        self.subtask_policy = policy;
        self
    }

    pub fn with_assignment_policy(mut self, policy: AssignmentPolicy) -> Self {
        self.solver = Solver::new(policy);
        self
    }

    pub fn specialization(&self) -> &SpecializationMatrix {
        &self.specialization
    }

    pub fn subtask_policy(&self) -> SubtaskPolicy {
        self.subtask_policy
    }

    pub fn assignment_policy(&self) -> AssignmentPolicy {
        self.solver.policy()
    }

    /// Decompose a task and return its assignments.
    pub fn decompose_task(&self, task: &str, state: &StateSnapshot) -> Result<Vec<SubtaskAssignment>> {
        self.plan(task, state).map(|plan| plan.assignments)
    }

    /// Decompose a task and return the full plan.
    pub fn plan(&self, task: &str, state: &StateSnapshot) -> Result<Plan> {
        let complexity = compute_complexity_vector(state);
        alog_debug!(
            "decompose task={} depth={} elements={} complexity={:?}",
            task,
            state.effective_depth(),
            state.element_count(),
            complexity.as_slice()
        );

        let result = self.assign(task, &complexity);
        match result {
            Ok(assignments) => {
                let plan = Plan {
                    id: PlanId::new(),
                    task: task.to_string(),
                    complexity,
                    assignments,
                    created_at: Utc::now(),
                };
                alog_debug!(
                    "plan {} task={} steps={} coordination_cost={:.3}",
                    plan.id.short(),
                    task,
                    plan.predicted_steps(),
                    plan.coordination_cost()
                );
                Ok(plan)
            }
            Err(e) => {
                alog_warn!("decompose task={} failed: {}", task, e);
                Err(e)
            }
        }
    }

    fn assign(&self, task: &str, complexity: &ComplexityVector) -> Result<Vec<SubtaskAssignment>> {
        let subtasks = self.subtask_policy.generate(complexity);
        if subtasks.is_empty() {
            return Err(Error::EmptyInput {
                rows: self.specialization.worker_count(),
                cols: 0,
            });
        }

        let matrix = build_cost_matrix(
            complexity.as_slice(),
            &subtasks,
            &self.specialization,
            self.overhead.as_ref(),
        )?;
        let solved = self.solver.solve(&matrix)?;

        solved
            .into_iter()
            .map(|a| {
                let worker = WorkerRole::from_index(a.worker).ok_or(Error::ShapeMismatch {
                    expected: self.specialization.worker_count(),
                    found: a.worker + 1,
                })?;
                let subtask = subtasks[a.subtask].clone();
                alog_debug!(
                    "  {} -> {} cost={:.3} confidence={:.3}",
                    subtask.label,
                    worker,
                    a.cost,
                    a.confidence
                );
                Ok(SubtaskAssignment {
                    task: task.to_string(),
                    subtask,
                    worker,
                    confidence: a.confidence,
                    coordination_cost: a.coordination_cost,
                    cost: a.cost,
                })
            })
            .collect()
    }
}

impl Default for TaskDecomposer {
    fn default() -> Self {
        Self::new(SpecializationMatrix::default())
    }
}

impl std::fmt::Debug for TaskDecomposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskDecomposer")
            .field("specialization", &self.specialization)
            .field("subtask_policy", &self.subtask_policy)
            .field("solver", &self.solver)
            .finish_non_exhaustive()
    }
}
