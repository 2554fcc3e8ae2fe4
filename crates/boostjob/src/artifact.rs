//! Writing and reading the trained model file.
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;

use crate::config::HyperParameters;
use crate::error::{BoostError, Result};
use crate::models::gbdt::GbdtBooster;
use crate::models::Booster;

/// File name of the model inside the model directory.
pub const MODEL_FILE_NAME: &str = "model.bin";

/// Serialize `booster` to `<model_dir>/model.bin`.
///
/// The bytes go to a temporary file in `model_dir` that is renamed into
/// place, so a failure never leaves a partial `model.bin` behind.
pub fn save_model(booster: &dyn Booster, model_dir: &Path) -> Result<PathBuf> {
    let bytes = booster.save_buffer()?;
    let path = model_dir.join(MODEL_FILE_NAME);

    let mut tmp = tempfile::NamedTempFile::new_in(model_dir).map_err(|e| BoostError::io(model_dir, e))?;
    tmp.write_all(&bytes).map_err(|e| BoostError::io(tmp.path(), e))?;
    tmp.persist(&path).map_err(|e| BoostError::io(&path, e.error))?;

    info!(
        "Saved {} model ({} bytes) to {}",
        booster.name(),
        bytes.len(),
        path.display()
    );
    Ok(path)
}

/// Load a model written by the `gbdt` booster so it can predict again.
pub fn load_gbdt_model<P: AsRef<Path>>(
    path: P,
    params: &HyperParameters,
    num_features: usize,
) -> Result<GbdtBooster> {
    GbdtBooster::load(path, params, num_features)
}
