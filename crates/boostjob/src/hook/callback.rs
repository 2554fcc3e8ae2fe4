use std::sync::Arc;

use crate::config::HyperParameters;
use crate::dataset::{Dataset, DatasetRole};
use crate::error::Result;
use crate::metrics::Metric;

/// One evaluation result for one dataset of the watchlist.
#[derive(Debug, Clone)]
pub struct EvalEntry {
    /// Watchlist name of the dataset, e.g. `"validation"`.
    pub dataset: String,
    pub metric: Metric,
    pub value: f64,
    /// Predictions of the ensemble after this round, one per row.
    pub predictions: Vec<f32>,
}

impl EvalEntry {
    /// `"<dataset>-<metric>"`, the name used in progress lines and recorded tensors.
    pub fn metric_name(&self) -> String {
        format!("{}-{}", self.dataset, self.metric)
    }
}

/// Everything the trainer knows at the end of a boosting round.
#[derive(Debug, Clone)]
pub struct RoundEvaluation {
    pub round: u32,
    /// Entries in watchlist order.
    pub entries: Vec<EvalEntry>,
}

impl RoundEvaluation {
    /// Format as `[round]\tname:value\t...`.
    pub fn format_line(&self) -> String {
        let mut line = format!("[{}]", self.round);
        for entry in &self.entries {
            line.push_str(&format!("\t{}:{:.6}", entry.metric_name(), entry.value));
        }
        line
    }
}

/// Hooks invoked by [`crate::training::train`].
///
/// Callbacks run in the order they are passed to the trainer. An error from
/// any hook aborts training.
pub trait TrainingCallback {
    /// Give the callback a handle to one of the run's datasets.
    fn bind_dataset(&mut self, _role: DatasetRole, _dataset: Arc<Dataset>) {}

    fn before_training(&mut self, _params: &HyperParameters) -> Result<()> {
        Ok(())
    }

    fn on_round_end(&mut self, evaluation: &RoundEvaluation) -> Result<()>;

    fn after_training(&mut self) -> Result<()> {
        Ok(())
    }
}
