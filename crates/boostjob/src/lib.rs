//! boostjob: gradient-boosted tree training for managed training jobs.
//!
//! This crate loads headerless CSV feature/label tables, wraps them in
//! dataset handles, trains a boosted tree ensemble round by round (pure-Rust
//! `gbdt` by default, native XGBoost behind the `xgboost` feature), reports
//! per-round metrics to callbacks such as the tensor-recording debug hook, and
//! writes the trained model to disk.
pub mod artifact;
pub mod config;
pub mod dataset;
pub mod error;
pub mod hook;
pub mod io;
pub mod math;
pub mod metrics;
pub mod models;
pub mod training;

pub use config::{BoosterKind, HyperParameters, Objective};
pub use dataset::{Dataset, DatasetRole};
pub use error::BoostError;
pub use metrics::Metric;
pub use training::{train, EvalHistory, TrainedModel};
