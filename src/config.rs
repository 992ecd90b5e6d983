use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{SpecializationMatrix, SubtaskPolicy};
use crate::orchestration::{
    AssignmentPolicy, RolePairOverhead, TaskDecomposer, UniformOverhead, DEFAULT_OVERHEAD,
};
use crate::{alog, alog_debug, alog_warn, Error, Result};

/// Which communication overhead model the decomposer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverheadModel {
    /// `overhead` for every worker/subtask pair.
    #[default]
    Uniform,
    /// Hand-off cost between the facet's owning role and the worker.
    RolePair,
}

fn default_overhead() -> f64 {
    DEFAULT_OVERHEAD
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_overhead")]
    pub overhead: f64,
    #[serde(default)]
    pub overhead_model: OverheadModel,
    /// Replaces the built-in proficiency table when set.
    pub specialization: Option<SpecializationMatrix>,
    // Table-valued fields stay last so TOML output is valid.
    #[serde(default)]
    pub subtask_policy: SubtaskPolicy,
    #[serde(default)]
    pub assignment_policy: AssignmentPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            overhead: DEFAULT_OVERHEAD,
            overhead_model: OverheadModel::default(),
            specialization: None,
            subtask_policy: SubtaskPolicy::default(),
            assignment_policy: AssignmentPolicy::default(),
        }
    }
}

impl Config {
    pub fn allot_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".allot"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::allot_dir()?.join("allot.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from an explicit path, falling back to defaults when absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        alog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            alog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(path)?)?;
        config.validate()?;
        alog!(
            "Config loaded: overhead={} model={:?} subtasks={:?} assignment={:?} custom_table={}",
            config.overhead,
            config.overhead_model,
            config.subtask_policy,
            config.assignment_policy,
            config.specialization.is_some()
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                alog_debug!("Creating config directory: {}", parent.display());
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        alog!("Config saved to {}", path.display());
        Ok(())
    }

    /// Reject settings the decomposer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.overhead.is_finite() || self.overhead < 0.0 {
            alog_warn!("Config rejected: overhead={}", self.overhead);
            return Err(Error::Validation(format!(
                "overhead must be finite and non-negative, got {}",
                self.overhead
            )));
        }
        if let AssignmentPolicy::Bounded { max_per_worker: 0 } = self.assignment_policy {
            return Err(Error::Validation(
                "max_per_worker must be at least 1".to_string(),
            ));
        }
        match self.subtask_policy {
            SubtaskPolicy::SkipBelow { epsilon } if !epsilon.is_finite() => Err(
                Error::Validation(format!("epsilon must be finite, got {}", epsilon)),
            ),
            SubtaskPolicy::Adaptive { threshold } if !threshold.is_finite() => Err(
                Error::Validation(format!("threshold must be finite, got {}", threshold)),
            ),
            _ => Ok(()),
        }
    }

    /// Build a decomposer carrying this configuration.
    pub fn build_decomposer(&self) -> Result<TaskDecomposer> {
        self.validate()?;
        let decomposer = TaskDecomposer::new(self.specialization.unwrap_or_default())
            .with_subtask_policy(self.subtask_policy)
            .with_assignment_policy(self.assignment_policy);
        Ok(match self.overhead_model {
            OverheadModel::Uniform => decomposer.with_overhead(UniformOverhead(self.overhead)),
            OverheadModel::RolePair => decomposer.with_overhead(RolePairOverhead),
        })
    }
}
