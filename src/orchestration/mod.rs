//! Assignment layer: cost matrices, the optimal solver, and the task
//! decomposer that drives them.

mod cost;
mod decomposer;
mod solver;

pub use cost::{
    build_cost_matrix, CommunicationOverhead, CostMatrix, RolePairOverhead, UniformOverhead,
    DEFAULT_OVERHEAD,
};
pub use decomposer::{Plan, PlanId, SubtaskAssignment, TaskDecomposer};
pub use solver::{solve, total_cost, Assignment, AssignmentPolicy, Solver};
