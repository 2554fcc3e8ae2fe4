use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BoostError;
use crate::metrics::Metric;

/// Learning objective, named the way XGBoost names them.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    #[serde(rename = "binary:logistic")]
    BinaryLogistic,
    #[serde(rename = "reg:logistic")]
    RegLogistic,
    #[serde(rename = "reg:squarederror", alias = "reg:linear")]
    RegSquaredError,
    #[serde(rename = "reg:absoluteerror")]
    RegAbsoluteError,
}

impl Objective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::BinaryLogistic => "binary:logistic",
            Objective::RegLogistic => "reg:logistic",
            Objective::RegSquaredError => "reg:squarederror",
            Objective::RegAbsoluteError => "reg:absoluteerror",
        }
    }

    /// Objectives that require labels in {0, 1}.
    pub fn is_binary(&self) -> bool {
        matches!(self, Objective::BinaryLogistic)
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Objective {
    type Err = BoostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binary:logistic" => Ok(Objective::BinaryLogistic),
            "reg:logistic" => Ok(Objective::RegLogistic),
            "reg:squarederror" | "reg:linear" => Ok(Objective::RegSquaredError),
            "reg:absoluteerror" => Ok(Objective::RegAbsoluteError),
            _ => Err(BoostError::UnknownObjective(s.to_string())),
        }
    }
}

/// Which boosting engine trains the model.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoosterKind {
    /// Pure-Rust gradient boosted trees.
    #[default]
    Gbdt,
    /// Native XGBoost (requires the `xgboost` feature).
    #[cfg(feature = "xgboost")]
    XGBoost,
}

impl BoosterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoosterKind::Gbdt => "gbdt",
            #[cfg(feature = "xgboost")]
            BoosterKind::XGBoost => "xgboost",
        }
    }
}

impl FromStr for BoosterKind {
    type Err = BoostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gbdt" => Ok(BoosterKind::Gbdt),
            #[cfg(feature = "xgboost")]
            "xgboost" => Ok(BoosterKind::XGBoost),
            _ => Err(BoostError::UnknownBooster(s.to_string())),
        }
    }
}

/// Booster hyperparameters passed to the trainer.
///
/// The round count is not part of this mapping; it is handed to
/// [`crate::training::train`] separately.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HyperParameters {
    /// Maximum tree depth.
    pub max_depth: u32,
    /// Step size shrinkage.
    pub eta: f32,
    /// Minimum loss reduction required to split a node.
    pub gamma: u32,
    /// Minimum sum of instance weight in a child.
    pub min_child_weight: u32,
    /// 1 suppresses per-round output.
    pub silent: u8,
    pub objective: Objective,
    pub eval_metric: Metric,
}

impl Default for HyperParameters {
    fn default() -> Self {
        Self {
            max_depth: 5,
            eta: 0.05,
            gamma: 4,
            min_child_weight: 6,
            silent: 0,
            objective: Objective::BinaryLogistic,
            eval_metric: Metric::Auc,
        }
    }
}

impl HyperParameters {
    /// The parameters as `(name, value)` pairs, in the order the trainer
    /// receives them.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("max_depth", self.max_depth.to_string()),
            ("eta", self.eta.to_string()),
            ("gamma", self.gamma.to_string()),
            ("min_child_weight", self.min_child_weight.to_string()),
            ("silent", self.silent.to_string()),
            ("objective", self.objective.to_string()),
            ("eval_metric", self.eval_metric.to_string()),
        ]
    }

    pub fn is_silent(&self) -> bool {
        self.silent != 0
    }

    pub fn validate(&self) -> Result<(), BoostError> {
        if self.max_depth == 0 {
            return Err(BoostError::InvalidParameter {
                name: "max_depth".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if !(self.eta > 0.0 && self.eta <= 1.0) {
            return Err(BoostError::InvalidParameter {
                name: "eta".to_string(),
                reason: format!("{} is outside (0, 1]", self.eta),
            });
        }
        if self.silent > 1 {
            return Err(BoostError::InvalidParameter {
                name: "silent".to_string(),
                reason: "must be 0 or 1".to_string(),
            });
        }
        Ok(())
    }
}
