//! Labeled dataset handles passed to the trainer and the debug hook.
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::Objective;
use crate::error::{BoostError, Result};
use crate::math::{Array1, Array2};

/// Which split a dataset plays in a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetRole {
    Train,
    Validation,
}

impl DatasetRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetRole::Train => "train",
            DatasetRole::Validation => "validation",
        }
    }
}

impl fmt::Display for DatasetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static NEXT_DATASET_ID: AtomicU64 = AtomicU64::new(0);

/// A feature table paired with one label per row.
///
/// Datasets are immutable once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    id: u64,
    features: Array2<f32>,
    labels: Array1<f32>,
}

impl Dataset {
    /// Pair `features` with `labels`, failing if their row counts differ.
    pub fn new(role: DatasetRole, features: Array2<f32>, labels: Array1<f32>) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(BoostError::ShapeMismatch {
                role: role.to_string(),
                feature_rows: features.nrows(),
                label_rows: labels.len(),
            });
        }
        Ok(Self {
            id: NEXT_DATASET_ID.fetch_add(1, Ordering::Relaxed),
            features,
            labels,
        })
    }

    /// Identifies the contents of this dataset. Clones share it, so boosters
    /// can cache per-dataset state keyed on it.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn features(&self) -> &Array2<f32> {
        &self.features
    }

    pub fn labels(&self) -> &[f32] {
        self.labels.as_slice()
    }

    pub fn num_rows(&self) -> usize {
        self.features.nrows()
    }

    pub fn num_cols(&self) -> usize {
        self.features.ncols()
    }

    /// Check that labels are usable with `objective`. Binary objectives take
    /// labels in `[0, 1]`, which includes soft labels.
    pub fn check_labels(&self, objective: Objective) -> Result<()> {
        if !objective.is_binary() {
            return Ok(());
        }
        match self
            .labels
            .iter()
            .position(|y| !(0.0..=1.0).contains(y))
        {
            Some(row) => Err(BoostError::InvalidLabel {
                objective: objective.to_string(),
                row: row + 1,
                value: self.labels[row],
                expected: "a value in [0, 1]".to_string(),
            }),
            None => Ok(()),
        }
    }
}
