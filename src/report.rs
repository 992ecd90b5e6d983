//! Predicted-versus-actual records for evaluating plans.
//!
//! The assignment core supplies `predicted_steps` and `coordination_cost`;
//! the execution environment supplies `actual_steps` and `execution_time`.
//! A [`ValidationReport`] serializes to a JSON object keyed by task name:
//!
//! ```json
//! { "SystemBrightnessMax": { "actual_steps": 5, "predicted_steps": 3,
//!   "step_efficiency": 0.4, "coordination_cost": 0.15, "execution_time": 12.5 } }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::orchestration::Plan;
use crate::{alog, Result};

/// Outcome of one task compared against its plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub actual_steps: u32,
    pub predicted_steps: u32,
    /// `(actual - predicted) / actual`, or 0 when nothing was executed.
    pub step_efficiency: f64,
    pub coordination_cost: f64,
    /// Wall-clock seconds reported by the executor.
    pub execution_time: f64,
}

impl TaskRecord {
    pub fn from_plan(plan: &Plan, actual_steps: u32, execution_time: f64) -> Self {
        let predicted_steps = plan.predicted_steps() as u32;
        Self {
            actual_steps,
            predicted_steps,
            step_efficiency: step_efficiency(actual_steps, predicted_steps),
            coordination_cost: plan.coordination_cost(),
            execution_time,
        }
    }
}

/// Fraction of executed steps the plan would have saved.
pub fn step_efficiency(actual_steps: u32, predicted_steps: u32) -> f64 {
    if actual_steps == 0 {
        return 0.0;
    }
    (f64::from(actual_steps) - f64::from(predicted_steps)) / f64::from(actual_steps)
}

/// Records for a batch of tasks, keyed by task name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport {
    records: BTreeMap<String, TaskRecord>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the record for a task.
    pub fn insert(&mut self, task: &str, record: TaskRecord) {
        self.records.insert(task.to_string(), record);
    }

    /// Record a plan's outcome under the plan's task name.
    pub fn record_plan(&mut self, plan: &Plan, actual_steps: u32, execution_time: f64) {
        self.insert(
            &plan.task,
            TaskRecord::from_plan(plan, actual_steps, execution_time),
        );
    }

    pub fn get(&self, task: &str) -> Option<&TaskRecord> {
        self.records.get(task)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TaskRecord)> {
        self.records.iter()
    }

    pub fn mean_step_efficiency(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let sum: f64 = self.records.values().map(|r| r.step_efficiency).sum();
        Some(sum / self.records.len() as f64)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        alog!("Report with {} tasks saved to {}", self.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}
