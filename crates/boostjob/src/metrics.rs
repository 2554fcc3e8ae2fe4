//! Evaluation metrics reported after every boosting round.
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BoostError;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Auc,
    LogLoss,
    Error,
    Rmse,
    Mae,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Auc => "auc",
            Metric::LogLoss => "logloss",
            Metric::Error => "error",
            Metric::Rmse => "rmse",
            Metric::Mae => "mae",
        }
    }

    /// Evaluate predictions against labels. Both slices must have the same
    /// length; an empty input yields `NaN`.
    pub fn evaluate(&self, preds: &[f32], labels: &[f32]) -> f64 {
        debug_assert_eq!(preds.len(), labels.len());
        if preds.is_empty() {
            return f64::NAN;
        }
        match self {
            Metric::Auc => auc(preds, labels),
            Metric::LogLoss => logloss(preds, labels),
            Metric::Error => binary_error(preds, labels),
            Metric::Rmse => rmse(preds, labels),
            Metric::Mae => mae(preds, labels),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = BoostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auc" => Ok(Metric::Auc),
            "logloss" => Ok(Metric::LogLoss),
            "error" => Ok(Metric::Error),
            "rmse" => Ok(Metric::Rmse),
            "mae" => Ok(Metric::Mae),
            _ => Err(BoostError::UnknownMetric(s.to_string())),
        }
    }
}

/// Area under the ROC curve via the rank-sum formulation. Tied scores share
/// their average rank. Returns 0.5 when only one class is present.
fn auc(preds: &[f32], labels: &[f32]) -> f64 {
    let mut order: Vec<usize> = (0..preds.len()).collect();
    order.sort_by(|&a, &b| preds[a].partial_cmp(&preds[b]).unwrap_or(Ordering::Equal));

    let total_pos = labels.iter().filter(|&&y| y > 0.5).count() as f64;
    let total_neg = labels.len() as f64 - total_pos;
    if total_pos == 0.0 || total_neg == 0.0 {
        return 0.5;
    }

    let mut pos_rank_sum = 0.0;
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && preds[order[j + 1]] == preds[order[i]] {
            j += 1;
        }
        // ranks are 1-based; the tie group i..=j shares the mean rank
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        let positives = order[i..=j].iter().filter(|&&k| labels[k] > 0.5).count();
        pos_rank_sum += avg_rank * positives as f64;
        i = j + 1;
    }

    (pos_rank_sum - total_pos * (total_pos + 1.0) / 2.0) / (total_pos * total_neg)
}

fn logloss(preds: &[f32], labels: &[f32]) -> f64 {
    const EPS: f64 = 1e-15;
    let sum: f64 = preds
        .iter()
        .zip(labels)
        .map(|(&p, &y)| {
            let p = (p as f64).clamp(EPS, 1.0 - EPS);
            let y = y as f64;
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum();
    sum / preds.len() as f64
}

fn binary_error(preds: &[f32], labels: &[f32]) -> f64 {
    let wrong = preds
        .iter()
        .zip(labels)
        .filter(|(p, y)| (**p > 0.5) != (**y > 0.5))
        .count();
    wrong as f64 / preds.len() as f64
}

fn rmse(preds: &[f32], labels: &[f32]) -> f64 {
    let sum: f64 = preds
        .iter()
        .zip(labels)
        .map(|(&p, &y)| (p as f64 - y as f64).powi(2))
        .sum();
    (sum / preds.len() as f64).sqrt()
}

fn mae(preds: &[f32], labels: &[f32]) -> f64 {
    let sum: f64 = preds
        .iter()
        .zip(labels)
        .map(|(&p, &y)| (p as f64 - y as f64).abs())
        .sum();
    sum / preds.len() as f64
}
