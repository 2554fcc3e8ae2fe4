use std::cell::RefCell;
use std::fs;
use std::path::Path;

use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec, VALUE_TYPE_UNKNOWN};
use gbdt::fitness::{label_average, weighted_label_median};
use gbdt::gradient_boost::GBDT;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::{HyperParameters, Objective};
use crate::dataset::Dataset;
use crate::error::{BoostError, Result};
use crate::models::booster_trait::Booster;

const LOG_LIKELIHOOD: &str = "LogLikelyhood";

/// Number of datasets whose margins are kept between `predict` calls.
const MARGIN_CACHE_SIZE: usize = 8;

/// Gradient Boosting Decision Tree booster backed by the pure-Rust `gbdt` crate.
///
/// Every round fits one single-tree `GBDT` stage whose initial guess is the
/// margin accumulated by the earlier stages, so a round costs one tree no
/// matter how many came before. Row and column sampling are disabled, which
/// makes training deterministic.
pub struct GbdtBooster {
    params: HyperParameters,
    loss: &'static str,
    num_features: usize,
    bias: f64,
    /// One single-tree model per round. Each returns its raw margin
    /// contribution from `predict` when given a zero initial guess.
    stages: Vec<GBDT>,
    train: Option<TrainState>,
    margin_cache: RefCell<Vec<CachedMargins>>,
}

/// Training rows and their running margins.
struct TrainState {
    dataset_id: u64,
    rows: DataVec,
    zero_rows: DataVec,
    margins: Vec<f64>,
}

struct CachedMargins {
    dataset_id: u64,
    stages: usize,
    margins: Vec<f64>,
}

#[derive(Serialize)]
struct SavedEnsemble<'a> {
    loss: &'a str,
    num_features: usize,
    bias: f64,
    stages: &'a [GBDT],
}

#[derive(Deserialize)]
struct LoadedEnsemble {
    loss: String,
    num_features: usize,
    bias: f64,
    stages: Vec<GBDT>,
}

/// Map an objective onto the loss names understood by `gbdt`.
fn loss_for(objective: Objective) -> Result<&'static str> {
    match objective {
        Objective::BinaryLogistic => Ok(LOG_LIKELIHOOD),
        Objective::RegSquaredError => Ok("SquaredError"),
        Objective::RegAbsoluteError => Ok("LAD"),
        Objective::RegLogistic => Err(BoostError::UnsupportedObjective {
            objective: objective.to_string(),
            booster: "gbdt".to_string(),
        }),
    }
}

impl GbdtBooster {
    pub fn new(params: &HyperParameters, num_features: usize) -> Result<Self> {
        let loss = loss_for(params.objective)?;
        for ignored in ignored_parameters(params) {
            warn!("The gbdt booster has no equivalent of {}; it has no effect", ignored);
        }
        Ok(GbdtBooster {
            params: params.clone(),
            loss,
            num_features,
            bias: 0.0,
            stages: Vec::new(),
            train: None,
            margin_cache: RefCell::new(Vec::new()),
        })
    }

    /// Restore a model written by [`Booster::save_buffer`] / `save_model`.
    pub fn load<P: AsRef<Path>>(path: P, params: &HyperParameters, num_features: usize) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| BoostError::io(path, e))?;
        let saved: LoadedEnsemble = serde_json::from_slice(&bytes)?;

        let mut booster = Self::new(params, num_features)?;
        if saved.loss != booster.loss {
            return Err(BoostError::Engine(format!(
                "{} holds a {} model, expected {}",
                path.display(),
                saved.loss,
                booster.loss
            )));
        }
        if saved.num_features != num_features {
            return Err(BoostError::FeatureMismatch {
                name: "saved model".to_string(),
                expected: num_features,
                found: saved.num_features,
            });
        }
        booster.bias = saved.bias;
        booster.stages = saved.stages;
        Ok(booster)
    }

    /// Number of boosting rounds in the ensemble.
    pub fn num_stages(&self) -> usize {
        self.stages.len()
    }

    fn stage_config(&self) -> Config {
        let mut config = Config::new();
        config.set_feature_size(self.num_features);
        config.set_shrinkage(self.params.eta);
        config.set_max_depth(self.params.max_depth);
        config.set_iterations(1);
        config.set_min_leaf_size(self.params.min_child_weight.max(1) as usize);
        config.set_data_sample_ratio(1.0);
        config.set_feature_sample_ratio(1.0);
        config.set_debug(false);
        config.set_training_optimization_level(2);
        config.enabled_initial_guess(true);
        config.set_loss(self.loss);
        config
    }

    fn check_features(&self, data: &Dataset) -> Result<()> {
        if data.num_cols() != self.num_features {
            return Err(BoostError::FeatureMismatch {
                name: "prediction".to_string(),
                expected: self.num_features,
                found: data.num_cols(),
            });
        }
        Ok(())
    }

    fn start_training(&mut self, dtrain: &Dataset) -> Result<()> {
        if self.params.objective.is_binary() {
            check_class_labels(dtrain, self.params.objective)?;
        }
        let rows = training_rows(dtrain, self.params.objective);
        self.bias = initial_margin(self.loss, &rows);
        self.stages.clear();
        self.margin_cache.borrow_mut().clear();
        self.train = Some(TrainState {
            dataset_id: dtrain.id(),
            zero_rows: prediction_rows(dtrain),
            margins: vec![self.bias; rows.len()],
            rows,
        });
        Ok(())
    }

    /// Margins of `data` under the current ensemble. Margins of recently
    /// seen datasets are cached, so only stages added since the last call
    /// are evaluated.
    fn margins(&self, data: &Dataset) -> Vec<f64> {
        let mut cache = self.margin_cache.borrow_mut();
        let mut entry = match cache
            .iter()
            .position(|c| c.dataset_id == data.id() && c.stages <= self.stages.len())
        {
            Some(i) => cache.remove(i),
            None => CachedMargins {
                dataset_id: data.id(),
                stages: 0,
                margins: vec![self.bias; data.num_rows()],
            },
        };

        if entry.stages < self.stages.len() {
            let rows = prediction_rows(data);
            for stage in &self.stages[entry.stages..] {
                add_stage(&mut entry.margins, stage, &rows);
            }
            entry.stages = self.stages.len();
        }

        let margins = entry.margins.clone();
        cache.push(entry);
        if cache.len() > MARGIN_CACHE_SIZE {
            cache.remove(0);
        }
        margins
    }

    fn link(&self, margin: f64) -> f32 {
        if self.loss == LOG_LIKELIHOOD {
            (1.0 / (1.0 + (-2.0 * margin).exp())) as f32
        } else {
            margin as f32
        }
    }
}

/// Hyperparameters set to a non-neutral value that `gbdt` cannot honour.
fn ignored_parameters(params: &HyperParameters) -> Vec<String> {
    let mut ignored = Vec::new();
    if params.gamma != 0 {
        ignored.push(format!("gamma={}", params.gamma));
    }
    ignored
}

/// The starting margin `gbdt` itself would estimate from the labels.
fn initial_margin(loss: &str, rows: &DataVec) -> f64 {
    let n = rows.len();
    match loss {
        LOG_LIKELIHOOD => {
            // single-class data would give an infinite log-odds
            let v = f64::from(label_average(rows, n)).clamp(-1.0 + 1e-6, 1.0 - 1e-6);
            ((1.0 + v) / (1.0 - v)).ln() / 2.0
        }
        "LAD" if n > 1 => f64::from(weighted_label_median(rows, n)),
        _ => f64::from(label_average(rows, n)),
    }
}

/// `gbdt` applies the link function inside `predict`; the same tree under
/// `SquaredError` returns its raw margin instead.
fn margin_model(stage: &GBDT) -> Result<GBDT> {
    let mut value = serde_json::to_value(stage)?;
    value["conf"]["loss"] = serde_json::Value::from("SquaredError");
    Ok(serde_json::from_value(value)?)
}

fn add_stage(margins: &mut [f64], stage: &GBDT, zero_rows: &DataVec) {
    for (m, delta) in margins.iter_mut().zip(stage.predict(zero_rows)) {
        *m += f64::from(delta);
    }
}

/// The ±1 label mapping below only makes sense for hard class labels.
fn check_class_labels(data: &Dataset, objective: Objective) -> Result<()> {
    match data.labels().iter().position(|&y| y != 0.0 && y != 1.0) {
        Some(row) => Err(BoostError::InvalidLabel {
            objective: objective.to_string(),
            row: row + 1,
            value: data.labels()[row],
            expected: "0 or 1 for the gbdt booster".to_string(),
        }),
        None => Ok(()),
    }
}

/// `gbdt` marks missing values with its own sentinel instead of NaN.
fn engine_row(row: &[f32]) -> Vec<f32> {
    row.iter()
        .map(|&v| if v.is_nan() { VALUE_TYPE_UNKNOWN } else { v })
        .collect()
}

fn training_rows(data: &Dataset, objective: Objective) -> DataVec {
    let mut rows = DataVec::new();
    for (row, &label) in data.features().rows().zip(data.labels()) {
        // LogLikelyhood expects labels in {-1, 1}
        let label = if objective.is_binary() { 2.0 * label - 1.0 } else { label };
        rows.push(Data::new_training_data(engine_row(row), 1.0, label, Some(0.0)));
    }
    rows
}

fn prediction_rows(data: &Dataset) -> DataVec {
    let mut rows = DataVec::new();
    for row in data.features().rows() {
        rows.push(Data::new_training_data(engine_row(row), 1.0, 0.0, Some(0.0)));
    }
    rows
}

impl Booster for GbdtBooster {
    fn update(&mut self, dtrain: &Dataset, round: u32) -> Result<()> {
        self.check_features(dtrain)?;
        let same_data = matches!(&self.train, Some(state) if state.dataset_id == dtrain.id());
        if round == 0 || !same_data {
            self.start_training(dtrain)?;
        }

        let config = self.stage_config();
        let needs_margin_copy = self.loss == LOG_LIKELIHOOD;
        let state = self.train.as_mut().ok_or(BoostError::NotTrained)?;
        for (row, &margin) in state.rows.iter_mut().zip(&state.margins) {
            row.initial_guess = margin as f32;
        }

        let mut stage = GBDT::new(&config);
        stage.fit(&mut state.rows);
        let stage = if needs_margin_copy { margin_model(&stage)? } else { stage };
        add_stage(&mut state.margins, &stage, &state.zero_rows);
        self.stages.push(stage);
        debug!("gbdt round {} done, {} stages", round, self.stages.len());
        Ok(())
    }

    fn predict(&self, data: &Dataset) -> Result<Vec<f32>> {
        self.check_features(data)?;
        if self.stages.is_empty() {
            return Err(BoostError::NotTrained);
        }
        if data.num_rows() == 0 {
            return Ok(Vec::new());
        }
        Ok(self.margins(data).into_iter().map(|m| self.link(m)).collect())
    }

    fn save_buffer(&self) -> Result<Vec<u8>> {
        if self.stages.is_empty() {
            return Err(BoostError::NotTrained);
        }
        let saved = SavedEnsemble {
            loss: self.loss,
            num_features: self.num_features,
            bias: self.bias,
            stages: &self.stages,
        };
        Ok(serde_json::to_vec(&saved)?)
    }

    fn name(&self) -> &str {
        "gbdt"
    }
}
