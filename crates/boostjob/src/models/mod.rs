pub mod gbdt;
#[cfg(feature = "xgboost")]
pub mod xgboost;

pub mod booster_trait;
pub mod factory;

pub use booster_trait::Booster;
