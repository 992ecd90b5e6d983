//! Core domain models for task assignment.
//!
//! This module contains the data every decomposition is computed from:
//! state snapshots, complexity vectors, the specialization table, and
//! subtasks.

pub mod complexity;
pub mod specialization;
pub mod state;
pub mod subtask;

pub use complexity::{compute_complexity_vector, ComplexityVector};
pub use specialization::{Facet, SpecializationMatrix, WorkerRole, FACET_COUNT};
pub use state::{Element, StateSnapshot};
pub use subtask::{Subtask, SubtaskPolicy};
