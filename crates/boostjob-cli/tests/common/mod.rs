#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Scratch layout of a training job: two channels, a model dir and a hook descriptor.
pub struct JobDirs {
    pub root: tempfile::TempDir,
    pub train: PathBuf,
    pub validation: PathBuf,
    pub model_dir: PathBuf,
    pub tensors: PathBuf,
    pub hook_config: PathBuf,
}

pub fn job_dirs() -> JobDirs {
    let root = tempfile::tempdir().unwrap();
    let train = root.path().join("input/data/train");
    let validation = root.path().join("input/data/validation");
    let model_dir = root.path().join("model");
    let tensors = root.path().join("output/tensors");
    let hook_config = root.path().join("input/config/debughookconfig.json");
    fs::create_dir_all(&train).unwrap();
    fs::create_dir_all(&validation).unwrap();
    fs::create_dir_all(&model_dir).unwrap();
    fs::create_dir_all(hook_config.parent().unwrap()).unwrap();

    let descriptor = serde_json::json!({
        "LocalPath": tensors,
        "HookParameters": { "save_interval": "5" },
        "CollectionConfigurations": [{ "CollectionName": "metrics" }]
    });
    fs::write(&hook_config, serde_json::to_vec_pretty(&descriptor).unwrap()).unwrap();

    JobDirs {
        root,
        train,
        validation,
        model_dir,
        tensors,
        hook_config,
    }
}

/// Write `rows` x `cols` features and matching 0/1 labels.
pub fn write_channel(dir: &Path, prefix: &str, rows: usize, label_rows: usize, cols: usize) {
    let mut x = String::new();
    for r in 0..rows {
        let values: Vec<String> = (0..cols)
            .map(|c| format!("{:.3}", ((r * (c + 2) + c * 5) % 11) as f32 / 11.0))
            .collect();
        x.push_str(&values.join(","));
        x.push('\n');
    }
    let mut y = String::new();
    for r in 0..label_rows {
        let first = (r * 2 % 11) as f32 / 11.0;
        y.push_str(if first > 0.5 { "1\n" } else { "0\n" });
    }
    fs::write(dir.join(format!("{}_features.csv", prefix)), x).unwrap();
    fs::write(dir.join(format!("{}_labels.csv", prefix)), y).unwrap();
}

/// The standard job: 100 x 8 training rows, 20 x 8 validation rows.
pub fn standard_job() -> JobDirs {
    let dirs = job_dirs();
    write_channel(&dirs.train, "train", 100, 100, 8);
    write_channel(&dirs.validation, "val", 20, 20, 8);
    dirs
}
