use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use boostjob::{BoosterKind, HyperParameters, Metric, Objective};

use crate::util::validate_csv_file;

pub const TRAIN_FEATURES_FILE: &str = "train_features.csv";
pub const TRAIN_LABELS_FILE: &str = "train_labels.csv";
pub const VALIDATION_FEATURES_FILE: &str = "val_features.csv";
pub const VALIDATION_LABELS_FILE: &str = "val_labels.csv";

/// Everything a training run needs, resolved once from flags and environment.
#[derive(Debug, Serialize, Clone)]
pub struct JobConfig {
    pub params: HyperParameters,
    pub num_round: u32,
    pub booster: BoosterKind,
    pub train: PathBuf,
    pub validation: PathBuf,
    pub model_dir: PathBuf,
    pub debug_hook_config: Option<PathBuf>,
}

impl JobConfig {
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let objective = required::<String>(matches, "objective")?;
        let objective = Objective::from_str(&objective)
            .with_context(|| format!("Invalid --objective: {}", objective))?;
        let eval_metric = required::<String>(matches, "eval_metric")?;
        let eval_metric = Metric::from_str(&eval_metric)
            .with_context(|| format!("Invalid --eval_metric: {}", eval_metric))?;
        let booster = required::<String>(matches, "booster")?;
        let booster = BoosterKind::from_str(&booster).with_context(|| {
            format!(
                "Booster '{}' is not available in this build (rebuild with `--features xgboost`)",
                booster
            )
        })?;

        let params = HyperParameters {
            max_depth: required(matches, "max_depth")?,
            eta: required(matches, "eta")?,
            gamma: required(matches, "gamma")?,
            min_child_weight: required(matches, "min_child_weight")?,
            silent: required(matches, "silent")?,
            objective,
            eval_metric,
        };
        params.validate().context("Invalid hyperparameters")?;

        let config = JobConfig {
            params,
            num_round: required(matches, "num_round")?,
            booster,
            train: required(matches, "train")?,
            validation: required(matches, "validation")?,
            model_dir: required(matches, "model_dir")?,
            debug_hook_config: matches.get_one::<PathBuf>("debug_hook_config").cloned(),
        };

        for path in config.input_files() {
            validate_csv_file(&path)?;
        }

        Ok(config)
    }

    pub fn train_features_path(&self) -> PathBuf {
        self.train.join(TRAIN_FEATURES_FILE)
    }

    pub fn train_labels_path(&self) -> PathBuf {
        self.train.join(TRAIN_LABELS_FILE)
    }

    pub fn validation_features_path(&self) -> PathBuf {
        self.validation.join(VALIDATION_FEATURES_FILE)
    }

    pub fn validation_labels_path(&self) -> PathBuf {
        self.validation.join(VALIDATION_LABELS_FILE)
    }

    pub fn input_files(&self) -> [PathBuf; 4] {
        [
            self.train_features_path(),
            self.train_labels_path(),
            self.validation_features_path(),
            self.validation_labels_path(),
        ]
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }
}

fn required<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Result<T> {
    matches
        .get_one::<T>(id)
        .cloned()
        .with_context(|| format!("Missing value for --{}", id))
}
