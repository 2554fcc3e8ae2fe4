//! The debug hook records tensors at the configured steps during training.

use std::fs;
use std::sync::Arc;

use boostjob::hook::debug_hook::END_OF_JOB_FILE;
use boostjob::hook::{DebugHook, TensorEvent, TrainingCallback};
use boostjob::math::{Array1, Array2};
use boostjob::{train, BoosterKind, Dataset, DatasetRole, HyperParameters};

fn dataset(role: DatasetRole, rows: usize) -> Dataset {
    let x: Vec<f32> = (0..rows * 2).map(|i| ((i * 5) % 13) as f32).collect();
    let y: Vec<f32> = (0..rows).map(|r| if x[r * 2] > 6.0 { 1.0 } else { 0.0 }).collect();
    Dataset::new(
        role,
        Array2::from_shape_vec((rows, 2), x).unwrap(),
        Array1::from_vec(y),
    )
    .unwrap()
}

fn read_event(path: &std::path::Path) -> TensorEvent {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

#[test]
fn hook_writes_events_on_its_save_cadence() {
    let out = tempfile::tempdir().unwrap();
    let config_dir = tempfile::tempdir().unwrap();
    let config_path = config_dir.path().join("debughookconfig.json");
    let descriptor = serde_json::json!({
        "LocalPath": out.path(),
        "HookParameters": { "save_interval": "2" },
        "CollectionConfigurations": [
            { "CollectionName": "metrics" },
            { "CollectionName": "predictions", "CollectionParameters": { "save_steps": "3" } },
            { "CollectionName": "labels", "CollectionParameters": { "save_interval": "100" } },
            { "CollectionName": "hyperparameters" }
        ]
    });
    fs::write(&config_path, serde_json::to_vec(&descriptor).unwrap()).unwrap();

    let dtrain = Arc::new(dataset(DatasetRole::Train, 30));
    let dval = Arc::new(dataset(DatasetRole::Validation, 10));

    let mut hook = DebugHook::create_from_json_file(Some(&config_path)).unwrap();
    hook.bind_dataset(DatasetRole::Train, Arc::clone(&dtrain));
    hook.bind_dataset(DatasetRole::Validation, Arc::clone(&dval));
    assert_eq!(hook.validation_data().map(|d| d.num_rows()), Some(10));

    let params = HyperParameters {
        max_depth: 2,
        min_child_weight: 1,
        silent: 1,
        ..Default::default()
    };
    train(
        BoosterKind::Gbdt,
        &params,
        &dtrain,
        &[(&*dtrain, "train"), (&*dval, "validation")],
        5,
        &mut [&mut hook],
    )
    .unwrap();

    // metrics every 2 steps, predictions also at step 3
    assert_eq!(hook.saved_steps(), &[0, 2, 3, 4]);

    let step0 = read_event(&hook.event_path(0));
    assert_eq!(step0.step, 0);
    assert!(step0.tensors.contains_key("train-auc"));
    assert!(step0.tensors.contains_key("validation-auc"));
    assert_eq!(step0.tensors["predictions/validation"].len(), 10);
    assert_eq!(step0.tensors["labels/train"].len(), 30);
    assert_eq!(step0.tensors["labels/validation"].len(), 10);
    assert_eq!(step0.tensors["hyperparameters/max_depth"], vec![2.0]);
    assert!(!step0.tensors.contains_key("hyperparameters/objective"));

    let step3 = read_event(&hook.event_path(3));
    assert_eq!(
        step3.tensors.keys().collect::<Vec<_>>(),
        vec!["predictions/train", "predictions/validation"]
    );

    let step2 = read_event(&hook.event_path(2));
    assert!(step2.tensors.contains_key("validation-auc"));
    assert!(!step2.tensors.contains_key("labels/train"));

    assert!(!hook.event_path(1).exists());
    assert!(out.path().join(END_OF_JOB_FILE).exists());
}

#[test]
fn hook_path_falls_back_to_environment_variable() {
    let out = tempfile::tempdir().unwrap();
    let config_path = out.path().join("hook.json");
    fs::write(
        &config_path,
        format!(r#"{{"LocalPath": {:?}}}"#, out.path().join("tensors")),
    )
    .unwrap();

    std::env::set_var("SMDEBUG_CONFIG_FILE_PATH", &config_path);
    let hook = DebugHook::create_from_json_file(None);
    std::env::remove_var("SMDEBUG_CONFIG_FILE_PATH");

    let hook = hook.unwrap();
    assert_eq!(hook.out_dir(), out.path().join("tensors"));
}
