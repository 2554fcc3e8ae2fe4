use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use boostjob::artifact::save_model;
use boostjob::hook::{DebugHook, TrainingCallback};
use boostjob::io::{read_feature_table, read_label_vector};
use boostjob::{train, Dataset, DatasetRole};

use crate::train::input::JobConfig;
use crate::util::{format_len, format_shape};

/// The evaluation list reported every round: training data first, then validation.
pub fn watchlist<'a>(dtrain: &'a Dataset, dval: &'a Dataset) -> [(&'a Dataset, &'static str); 2] {
    [
        (dtrain, DatasetRole::Train.as_str()),
        (dval, DatasetRole::Validation.as_str()),
    ]
}

/// Load both channels, train with the debug hook attached and write `model.bin`.
///
/// Returns the path of the written model file.
pub fn run_training(config: &JobConfig) -> Result<PathBuf> {
    println!("Loading training dataframes...");
    let train_x = read_feature_table(config.train_features_path())
        .context("Failed to load training features")?;
    let train_y =
        read_label_vector(config.train_labels_path()).context("Failed to load training labels")?;

    println!("Loading validation dataframes...");
    let val_x = read_feature_table(config.validation_features_path())
        .context("Failed to load validation features")?;
    let val_y = read_label_vector(config.validation_labels_path())
        .context("Failed to load validation labels")?;

    println!("Train features shape: {}", format_shape(train_x.shape()));
    println!("Train labels shape: {}", format_len(train_y.len()));
    println!("Validation features shape: {}", format_shape(val_x.shape()));
    println!("Validation labels shape: {}", format_len(val_y.len()));

    let dtrain = Arc::new(Dataset::new(DatasetRole::Train, train_x, train_y)?);
    let dval = Arc::new(Dataset::new(DatasetRole::Validation, val_x, val_y)?);

    let mut hook = DebugHook::create_from_json_file(config.debug_hook_config.as_deref())
        .context("Failed to create debug hook")?;
    hook.bind_dataset(DatasetRole::Train, Arc::clone(&dtrain));
    hook.bind_dataset(DatasetRole::Validation, Arc::clone(&dval));

    fs::create_dir_all(config.model_dir()).with_context(|| {
        format!(
            "Failed to create model directory: {}",
            config.model_dir().display()
        )
    })?;

    let model = train(
        config.booster,
        &config.params,
        &dtrain,
        &watchlist(&dtrain, &dval),
        config.num_round,
        &mut [&mut hook],
    )
    .context("Boosting failed")?;

    let path = save_model(model.booster.as_ref(), config.model_dir())
        .context("Failed to save model")?;
    info!("Model saved to: {}", path.display());
    Ok(path)
}
