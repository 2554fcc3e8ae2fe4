use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading data, training, recording or saving a model.
#[derive(Debug, Error)]
pub enum BoostError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: row {row}, column {column}: cannot parse {value:?} as a number")]
    ParseValue {
        path: PathBuf,
        row: usize,
        column: usize,
        value: String,
    },

    #[error("{path}: row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{0}: table has no rows")]
    EmptyTable(PathBuf),

    #[error("{path}: label file must have exactly one column, found {found}")]
    LabelColumns { path: PathBuf, found: usize },

    #[error("{role} data: features have {feature_rows} rows but labels have {label_rows}")]
    ShapeMismatch {
        role: String,
        feature_rows: usize,
        label_rows: usize,
    },

    #[error("{name} data has {found} feature columns, expected {expected}")]
    FeatureMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("label {value} at row {row} is not valid for objective {objective} (expected {expected})")]
    InvalidLabel {
        objective: String,
        row: usize,
        value: f32,
        expected: String,
    },

    #[error("unknown objective: {0}")]
    UnknownObjective(String),

    #[error("unknown evaluation metric: {0}")]
    UnknownMetric(String),

    #[error("unknown booster: {0}. To use xgboost, compile with `--features xgboost`")]
    UnknownBooster(String),

    #[error("objective {objective} is not supported by the {booster} booster")]
    UnsupportedObjective { objective: String, booster: String },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("debug hook configuration not found at {0}")]
    HookConfigMissing(PathBuf),

    #[error("invalid debug hook configuration {path}: {reason}")]
    HookConfig { path: PathBuf, reason: String },

    #[error("booster error: {0}")]
    Engine(String),

    #[error("booster has not been trained")]
    NotTrained,

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BoostError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BoostError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BoostError>;
