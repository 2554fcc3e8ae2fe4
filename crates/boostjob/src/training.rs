//! The boosting loop: one engine update per round, evaluation against the
//! watchlist, then the callbacks.
use std::time::Instant;

use log::{debug, info};
use serde::Serialize;

use crate::config::{BoosterKind, HyperParameters};
use crate::dataset::Dataset;
use crate::error::{BoostError, Result};
use crate::hook::callback::{EvalEntry, RoundEvaluation, TrainingCallback};
use crate::metrics::Metric;
use crate::models::factory::build_booster;
use crate::models::Booster;

/// Per-round metric values for one watchlist dataset.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EvalSeries {
    pub dataset: String,
    pub metric: Metric,
    pub values: Vec<f64>,
}

/// Metric values collected over a training run, in watchlist order.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct EvalHistory {
    pub series: Vec<EvalSeries>,
}

impl EvalHistory {
    fn record(&mut self, entry: &EvalEntry) {
        match self.series.iter_mut().find(|s| s.dataset == entry.dataset) {
            Some(series) => series.values.push(entry.value),
            None => self.series.push(EvalSeries {
                dataset: entry.dataset.clone(),
                metric: entry.metric,
                values: vec![entry.value],
            }),
        }
    }

    pub fn get(&self, dataset: &str) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|s| s.dataset == dataset)
            .map(|s| s.values.as_slice())
    }

    pub fn dataset_names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.dataset.as_str()).collect()
    }
}

/// The result of [`train`].
pub struct TrainedModel {
    pub booster: Box<dyn Booster>,
    pub history: EvalHistory,
}

impl TrainedModel {
    pub fn predict(&self, data: &Dataset) -> Result<Vec<f32>> {
        self.booster.predict(data)
    }
}

/// Train a booster of `kind` on `dtrain` for `num_boost_round` rounds.
///
/// After every round each `(dataset, name)` pair of `evals` is scored with
/// `params.eval_metric`, the scores are printed unless `params.silent` is
/// set, and every callback's `on_round_end` runs in order.
pub fn train(
    kind: BoosterKind,
    params: &HyperParameters,
    dtrain: &Dataset,
    evals: &[(&Dataset, &str)],
    num_boost_round: u32,
    callbacks: &mut [&mut dyn TrainingCallback],
) -> Result<TrainedModel> {
    if num_boost_round == 0 {
        return Err(BoostError::InvalidParameter {
            name: "num_round".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    for (data, name) in evals {
        if data.num_cols() != dtrain.num_cols() {
            return Err(BoostError::FeatureMismatch {
                name: name.to_string(),
                expected: dtrain.num_cols(),
                found: data.num_cols(),
            });
        }
        data.check_labels(params.objective)?;
    }

    let mut booster = build_booster(kind, params, dtrain.num_cols())?;
    info!(
        "Training {} booster for {} rounds on {} rows x {} features",
        booster.name(),
        num_boost_round,
        dtrain.num_rows(),
        dtrain.num_cols()
    );
    debug!("Booster parameters: {:?}", params.to_pairs());

    for callback in callbacks.iter_mut() {
        callback.before_training(params)?;
    }

    let start_time = Instant::now();
    let mut history = EvalHistory::default();
    for round in 0..num_boost_round {
        booster.update(dtrain, round)?;

        let mut entries = Vec::with_capacity(evals.len());
        for (data, name) in evals {
            let predictions = booster.predict(data)?;
            let value = params.eval_metric.evaluate(&predictions, data.labels());
            entries.push(EvalEntry {
                dataset: name.to_string(),
                metric: params.eval_metric,
                value,
                predictions,
            });
        }
        let evaluation = RoundEvaluation { round, entries };

        for entry in &evaluation.entries {
            history.record(entry);
        }
        if !evaluation.entries.is_empty() {
            if params.is_silent() {
                debug!("{}", evaluation.format_line());
            } else {
                println!("{}", evaluation.format_line());
            }
        }

        for callback in callbacks.iter_mut() {
            callback.on_round_end(&evaluation)?;
        }
    }

    for callback in callbacks.iter_mut() {
        callback.after_training()?;
    }
    info!("Training completed in {:?}", start_time.elapsed());
    if let Ok(json) = serde_json::to_string(&history) {
        debug!("Evaluation history: {}", json);
    }

    Ok(TrainedModel { booster, history })
}
