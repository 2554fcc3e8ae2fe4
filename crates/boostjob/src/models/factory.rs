use crate::config::{BoosterKind, HyperParameters};
use crate::error::Result;
use crate::models::booster_trait::Booster;

/// Build a boxed booster for `kind`, configured with `params`.
pub fn build_booster(
    kind: BoosterKind,
    params: &HyperParameters,
    num_features: usize,
) -> Result<Box<dyn Booster>> {
    params.validate()?;
    match kind {
        BoosterKind::Gbdt => Ok(Box::new(crate::models::gbdt::GbdtBooster::new(
            params,
            num_features,
        )?)),

        #[cfg(feature = "xgboost")]
        BoosterKind::XGBoost => Ok(Box::new(crate::models::xgboost::XGBoostBooster::new(
            params,
            num_features,
        )?)),
    }
}
