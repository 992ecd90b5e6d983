use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("No home directory")]
    NoHomeDir,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Shape mismatch: expected {expected} facet entries, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("Invalid cost at ({row}, {col}): {value}")]
    InvalidMatrix { row: usize, col: usize, value: f64 },

    #[error("Empty input: {rows} workers x {cols} subtasks")]
    EmptyInput { rows: usize, cols: usize },

    #[error(
        "Unsupported assignment policy: {subtasks} subtasks for {workers} workers \
         (max {max_per_worker} per worker)"
    )]
    UnsupportedAssignmentPolicy {
        workers: usize,
        subtasks: usize,
        max_per_worker: usize,
    },

    #[error("Invalid specialization table: {0}")]
    InvalidSpecialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;
