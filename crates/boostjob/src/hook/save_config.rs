use std::collections::HashMap;
use std::path::Path;

use crate::error::{BoostError, Result};

/// Default step interval between recorded steps.
pub const DEFAULT_SAVE_INTERVAL: u32 = 500;

/// Which training steps a collection is recorded at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveConfig {
    pub save_interval: u32,
    pub start_step: u32,
    /// Exclusive upper bound; `None` means no bound.
    pub end_step: Option<u32>,
    /// Steps that are always recorded.
    pub save_steps: Vec<u32>,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            save_interval: DEFAULT_SAVE_INTERVAL,
            start_step: 0,
            end_step: None,
            save_steps: Vec::new(),
        }
    }
}

impl SaveConfig {
    pub fn should_save(&self, step: u32) -> bool {
        if self.save_steps.contains(&step) {
            return true;
        }
        if step < self.start_step {
            return false;
        }
        if let Some(end) = self.end_step {
            if step >= end {
                return false;
            }
        }
        (step - self.start_step) % self.save_interval == 0
    }

    /// Apply string-valued parameters (`save_interval`, `start_step`,
    /// `end_step`, `save_steps`) on top of `self`. Other keys are ignored.
    pub fn with_overrides(&self, params: &HashMap<String, String>, origin: &Path) -> Result<Self> {
        let mut config = self.clone();
        if let Some(v) = params.get("save_interval") {
            config.save_interval = parse_step(origin, "save_interval", v)?;
            if config.save_interval == 0 {
                return Err(BoostError::HookConfig {
                    path: origin.to_path_buf(),
                    reason: "save_interval must be positive".to_string(),
                });
            }
        }
        if let Some(v) = params.get("start_step") {
            config.start_step = parse_step(origin, "start_step", v)?;
        }
        if let Some(v) = params.get("end_step") {
            config.end_step = Some(parse_step(origin, "end_step", v)?);
        }
        if let Some(v) = params.get("save_steps") {
            config.save_steps = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_step(origin, "save_steps", s))
                .collect::<Result<Vec<_>>>()?;
        }
        Ok(config)
    }
}

fn parse_step(origin: &Path, key: &str, value: &str) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|_| BoostError::HookConfig {
        path: origin.to_path_buf(),
        reason: format!("{} must be a non-negative integer, got {:?}", key, value),
    })
}
