//! Debug hook that records training tensors to JSON event files.
//!
//! The hook is configured from a JSON descriptor supplied by the training
//! environment:
//!
//! ```json
//! {
//!   "LocalPath": "/opt/ml/output/tensors",
//!   "HookParameters": { "save_interval": "10" },
//!   "CollectionConfigurations": [
//!     { "CollectionName": "metrics", "CollectionParameters": { "save_interval": "1" } },
//!     { "CollectionName": "predictions" }
//!   ]
//! }
//! ```
//!
//! Every recorded step is written to `<LocalPath>/events/<step>.json`.
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::HyperParameters;
use crate::dataset::{Dataset, DatasetRole};
use crate::error::{BoostError, Result};
use crate::hook::callback::{RoundEvaluation, TrainingCallback};
use crate::hook::save_config::SaveConfig;

/// Environment variable naming the hook descriptor.
pub const CONFIG_PATH_ENV: &str = "SMDEBUG_CONFIG_FILE_PATH";
/// Descriptor location used when the environment variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "/opt/ml/input/config/debughookconfig.json";
/// Marker written once training has finished.
pub const END_OF_JOB_FILE: &str = "training_job_end.ts";

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct HookDescriptor {
    local_path: PathBuf,
    #[serde(default)]
    hook_parameters: HashMap<String, String>,
    #[serde(default)]
    collection_configurations: Vec<CollectionDescriptor>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct CollectionDescriptor {
    collection_name: String,
    #[serde(default)]
    collection_parameters: HashMap<String, String>,
}

/// Groups of tensors the hook knows how to record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Per-dataset evaluation metric values.
    Metrics,
    /// Per-dataset predictions of the current ensemble.
    Predictions,
    /// Labels of the bound train/validation datasets.
    Labels,
    /// Numeric hyperparameters, recorded at step 0.
    Hyperparameters,
}

impl Collection {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "metrics" => Some(Collection::Metrics),
            "predictions" => Some(Collection::Predictions),
            "labels" => Some(Collection::Labels),
            "hyperparameters" => Some(Collection::Hyperparameters),
            _ => None,
        }
    }
}

/// One recorded step as written to disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TensorEvent {
    pub step: u32,
    /// Seconds since the Unix epoch.
    pub wall_time: f64,
    pub tensors: BTreeMap<String, Vec<f64>>,
}

#[derive(Debug)]
pub struct DebugHook {
    out_dir: PathBuf,
    collections: Vec<(Collection, SaveConfig)>,
    train_data: Option<Arc<Dataset>>,
    validation_data: Option<Arc<Dataset>>,
    hyperparameters: Vec<(String, f64)>,
    saved_steps: Vec<u32>,
}

impl DebugHook {
    pub fn new(out_dir: impl Into<PathBuf>, collections: Vec<(Collection, SaveConfig)>) -> Self {
        Self {
            out_dir: out_dir.into(),
            collections,
            train_data: None,
            validation_data: None,
            hyperparameters: Vec::new(),
            saved_steps: Vec::new(),
        }
    }

    /// The descriptor path from `$SMDEBUG_CONFIG_FILE_PATH`, or the default location.
    pub fn default_config_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Build the hook from a JSON descriptor. With `None`, the path comes
    /// from [`DebugHook::default_config_path`].
    pub fn create_from_json_file(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);
        if !path.is_file() {
            return Err(BoostError::HookConfigMissing(path));
        }
        let content = fs::read_to_string(&path).map_err(|e| BoostError::io(&path, e))?;
        Self::from_json_str(&content, &path)
    }

    /// Build the hook from descriptor text; `origin` is only used in errors.
    pub fn from_json_str(content: &str, origin: &Path) -> Result<Self> {
        let descriptor: HookDescriptor =
            serde_json::from_str(content).map_err(|e| BoostError::HookConfig {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            })?;

        let base = SaveConfig::default().with_overrides(&descriptor.hook_parameters, origin)?;

        let mut collections = Vec::new();
        for entry in &descriptor.collection_configurations {
            match Collection::from_name(&entry.collection_name) {
                Some(collection) => {
                    let save_config = base.with_overrides(&entry.collection_parameters, origin)?;
                    collections.push((collection, save_config));
                }
                None => warn!(
                    "Ignoring unsupported debug hook collection: {}",
                    entry.collection_name
                ),
            }
        }
        if descriptor.collection_configurations.is_empty() {
            collections.push((Collection::Metrics, base));
        }

        debug!(
            "Debug hook writing to {} with collections {:?}",
            descriptor.local_path.display(),
            collections
        );
        Ok(Self::new(descriptor.local_path, collections))
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn collections(&self) -> &[(Collection, SaveConfig)] {
        &self.collections
    }

    /// Steps for which an event file was written, in order.
    pub fn saved_steps(&self) -> &[u32] {
        &self.saved_steps
    }

    pub fn validation_data(&self) -> Option<&Arc<Dataset>> {
        self.validation_data.as_ref()
    }

    pub fn event_path(&self, step: u32) -> PathBuf {
        self.out_dir.join("events").join(format!("{:012}.json", step))
    }

    fn collect_tensors(&self, evaluation: &RoundEvaluation) -> BTreeMap<String, Vec<f64>> {
        let step = evaluation.round;
        let mut tensors = BTreeMap::new();

        for (collection, save_config) in &self.collections {
            match collection {
                Collection::Hyperparameters => {
                    if step != 0 {
                        continue;
                    }
                    for (name, value) in &self.hyperparameters {
                        tensors.insert(format!("hyperparameters/{}", name), vec![*value]);
                    }
                }
                _ if !save_config.should_save(step) => {}
                Collection::Metrics => {
                    for entry in &evaluation.entries {
                        tensors.insert(entry.metric_name(), vec![entry.value]);
                    }
                }
                Collection::Predictions => {
                    for entry in &evaluation.entries {
                        tensors.insert(
                            format!("predictions/{}", entry.dataset),
                            entry.predictions.iter().map(|&p| p as f64).collect(),
                        );
                    }
                }
                Collection::Labels => {
                    let bound = [
                        (DatasetRole::Train, &self.train_data),
                        (DatasetRole::Validation, &self.validation_data),
                    ];
                    for (role, data) in bound {
                        if let Some(data) = data {
                            tensors.insert(
                                format!("labels/{}", role),
                                data.labels().iter().map(|&y| y as f64).collect(),
                            );
                        }
                    }
                }
            }
        }
        tensors
    }
}

impl TrainingCallback for DebugHook {
    fn bind_dataset(&mut self, role: DatasetRole, dataset: Arc<Dataset>) {
        match role {
            DatasetRole::Train => self.train_data = Some(dataset),
            DatasetRole::Validation => self.validation_data = Some(dataset),
        }
    }

    fn before_training(&mut self, params: &HyperParameters) -> Result<()> {
        self.hyperparameters = params
            .to_pairs()
            .into_iter()
            .filter_map(|(name, value)| value.parse::<f64>().ok().map(|v| (name.to_string(), v)))
            .collect();
        let events = self.out_dir.join("events");
        fs::create_dir_all(&events).map_err(|e| BoostError::io(&events, e))?;
        info!("Debug hook saving tensors to {}", self.out_dir.display());
        Ok(())
    }

    fn on_round_end(&mut self, evaluation: &RoundEvaluation) -> Result<()> {
        let tensors = self.collect_tensors(evaluation);
        if tensors.is_empty() {
            return Ok(());
        }

        let event = TensorEvent {
            step: evaluation.round,
            wall_time: chrono::Utc::now().timestamp_millis() as f64 / 1000.0,
            tensors,
        };
        let path = self.event_path(evaluation.round);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BoostError::io(parent, e))?;
        }
        let bytes = serde_json::to_vec_pretty(&event)?;
        fs::write(&path, bytes).map_err(|e| BoostError::io(&path, e))?;
        debug!("Saved {} tensors for step {}", event.tensors.len(), event.step);
        self.saved_steps.push(evaluation.round);
        Ok(())
    }

    fn after_training(&mut self) -> Result<()> {
        fs::create_dir_all(&self.out_dir).map_err(|e| BoostError::io(&self.out_dir, e))?;
        let marker = self.out_dir.join(END_OF_JOB_FILE);
        fs::write(&marker, b"").map_err(|e| BoostError::io(&marker, e))?;
        Ok(())
    }
}
