use log::debug;
use xgb::{parameters::BoosterParametersBuilder, Booster as XgbBooster, DMatrix};

use crate::config::HyperParameters;
use crate::dataset::Dataset;
use crate::error::{BoostError, Result};
use crate::models::booster_trait::Booster;

fn engine_err(e: impl std::fmt::Display) -> BoostError {
    BoostError::Engine(e.to_string())
}

fn to_dmatrix(data: &Dataset) -> Result<DMatrix> {
    debug!(
        "Creating DMatrix from dense data: rows={}, cols={}",
        data.num_rows(),
        data.num_cols()
    );
    // `from_dense` expects the number of rows as the second argument.
    let mut dmat = DMatrix::from_dense(data.features().as_slice(), data.num_rows()).map_err(engine_err)?;
    dmat.set_labels(data.labels()).map_err(engine_err)?;
    Ok(dmat)
}

/// Native XGBoost booster, updated one round at a time.
///
/// The booster is created lazily on the first `update`, cached on the
/// training matrix, and configured by setting every hyperparameter by name.
pub struct XGBoostBooster {
    params: HyperParameters,
    num_features: usize,
    dtrain: Option<DMatrix>,
    booster: Option<XgbBooster>,
}

impl XGBoostBooster {
    pub fn new(params: &HyperParameters, num_features: usize) -> Result<Self> {
        Ok(XGBoostBooster {
            params: params.clone(),
            num_features,
            dtrain: None,
            booster: None,
        })
    }

    fn create_booster(&self, dtrain: &DMatrix) -> Result<XgbBooster> {
        let booster_params = BoosterParametersBuilder::default()
            .verbose(!self.params.is_silent())
            .build()
            .map_err(engine_err)?;
        let mut bst = XgbBooster::new_with_cached_dmats(&booster_params, &[dtrain]).map_err(engine_err)?;

        for (name, value) in self.params.to_pairs() {
            // `silent` was replaced by `verbosity` in current XGBoost releases
            let (name, value) = match name {
                "silent" => ("verbosity", if self.params.is_silent() { "0".to_string() } else { "1".to_string() }),
                _ => (name, value),
            };
            bst.set_param(name, &value).map_err(engine_err)?;
        }
        bst.set_param("num_feature", &self.num_features.to_string())
            .map_err(engine_err)?;
        Ok(bst)
    }
}

impl Booster for XGBoostBooster {
    fn update(&mut self, dtrain: &Dataset, round: u32) -> Result<()> {
        if dtrain.num_cols() != self.num_features {
            return Err(BoostError::FeatureMismatch {
                name: "train".to_string(),
                expected: self.num_features,
                found: dtrain.num_cols(),
            });
        }
        if self.dtrain.is_none() {
            dtrain.check_labels(self.params.objective)?;
            let dmat = to_dmatrix(dtrain)?;
            self.booster = Some(self.create_booster(&dmat)?);
            self.dtrain = Some(dmat);
        }

        match (self.booster.as_mut(), self.dtrain.as_ref()) {
            (Some(bst), Some(dmat)) => bst.update(dmat, round as i32).map_err(engine_err),
            _ => Err(BoostError::NotTrained),
        }
    }

    fn predict(&self, data: &Dataset) -> Result<Vec<f32>> {
        let bst = self.booster.as_ref().ok_or(BoostError::NotTrained)?;
        let dmat = to_dmatrix(data)?;
        bst.predict(&dmat).map_err(engine_err)
    }

    fn save_buffer(&self) -> Result<Vec<u8>> {
        let bst = self.booster.as_ref().ok_or(BoostError::NotTrained)?;
        // `true` selects UBJSON, XGBoost's binary model format
        let buf = bst.save_buffer(true).map_err(engine_err)?;
        debug!("model dump size after training = {} bytes", buf.len());
        Ok(buf)
    }

    fn name(&self) -> &str {
        "xgboost"
    }
}
