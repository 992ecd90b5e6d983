//! Cost-minimizing assignment of UI-automation subtasks to specialized
//! workers.
//!
//! A [`TaskDecomposer`] turns a [`StateSnapshot`] into a [`Plan`]: it measures
//! the snapshot's per-facet complexity, splits the task into subtasks,
//! prices every worker/subtask pair, and solves the resulting assignment
//! problem exactly.

pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod orchestration;
pub mod report;

pub use config::Config;
pub use crate::core::{
    compute_complexity_vector, ComplexityVector, Facet, SpecializationMatrix, StateSnapshot,
    Subtask, SubtaskPolicy, WorkerRole,
};
pub use error::{Error, Result};
pub use orchestration::{
    build_cost_matrix, solve, Assignment, AssignmentPolicy, CostMatrix, Plan, SubtaskAssignment,
    TaskDecomposer,
};
pub use report::{TaskRecord, ValidationReport};
