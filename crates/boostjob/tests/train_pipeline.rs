//! End-to-end training through the public API: CSV files in, model file out.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use boostjob::artifact::{load_gbdt_model, save_model, MODEL_FILE_NAME};
use boostjob::hook::{DebugHook, RoundEvaluation, TrainingCallback};
use boostjob::io::{read_feature_table, read_label_vector};
use boostjob::{train, BoostError, BoosterKind, Dataset, DatasetRole, HyperParameters};

/// Write `rows` x `cols` features where the label is 1 when the first two
/// features sum above the middle of their range.
fn write_split(dir: &Path, features: &str, labels: &str, rows: usize, cols: usize, offset: usize) {
    let mut x = String::new();
    let mut y = String::new();
    for r in 0..rows {
        let i = r + offset;
        let values: Vec<String> = (0..cols)
            .map(|c| format!("{:.3}", ((i * (c + 3) + c * 11) % 17) as f32 / 17.0))
            .collect();
        let a: f32 = values[0].parse().unwrap();
        let b: f32 = values[1].parse().unwrap();
        x.push_str(&values.join(","));
        x.push('\n');
        y.push_str(if a + b > 1.0 { "1\n" } else { "0\n" });
    }
    fs::write(dir.join(features), x).unwrap();
    fs::write(dir.join(labels), y).unwrap();
}

fn load(dir: &Path, features: &str, labels: &str, role: DatasetRole) -> Dataset {
    let x = read_feature_table(dir.join(features)).unwrap();
    let y = read_label_vector(dir.join(labels)).unwrap();
    Dataset::new(role, x, y).unwrap()
}

fn params() -> HyperParameters {
    HyperParameters {
        max_depth: 3,
        eta: 0.3,
        min_child_weight: 2,
        silent: 1,
        ..Default::default()
    }
}

struct WatchlistNames(Vec<Vec<String>>);

impl TrainingCallback for WatchlistNames {
    fn on_round_end(&mut self, evaluation: &RoundEvaluation) -> boostjob::error::Result<()> {
        self.0
            .push(evaluation.entries.iter().map(|e| e.dataset.clone()).collect());
        Ok(())
    }
}

#[test]
fn trains_saves_and_reloads_a_gbdt_model() {
    let _ = env_logger::builder().is_test(true).try_init();
    let data_dir = tempfile::tempdir().unwrap();
    let model_dir = tempfile::tempdir().unwrap();
    let tensor_dir = tempfile::tempdir().unwrap();
    write_split(data_dir.path(), "train_features.csv", "train_labels.csv", 100, 8, 0);
    write_split(data_dir.path(), "val_features.csv", "val_labels.csv", 20, 8, 1000);

    let dtrain = Arc::new(load(data_dir.path(), "train_features.csv", "train_labels.csv", DatasetRole::Train));
    let dval = Arc::new(load(data_dir.path(), "val_features.csv", "val_labels.csv", DatasetRole::Validation));
    assert_eq!((dtrain.num_rows(), dtrain.num_cols()), (100, 8));
    assert_eq!((dval.num_rows(), dval.num_cols()), (20, 8));

    let mut hook = DebugHook::new(tensor_dir.path(), vec![]);
    hook.bind_dataset(DatasetRole::Train, Arc::clone(&dtrain));
    hook.bind_dataset(DatasetRole::Validation, Arc::clone(&dval));
    let mut names = WatchlistNames(vec![]);

    let model = train(
        BoosterKind::Gbdt,
        &params(),
        &dtrain,
        &[(&*dtrain, "train"), (&*dval, "validation")],
        10,
        &mut [&mut hook, &mut names],
    )
    .unwrap();

    assert_eq!(names.0.len(), 10);
    assert!(names.0.iter().all(|round| round == &["train", "validation"]));
    assert_eq!(model.history.dataset_names(), vec!["train", "validation"]);
    let train_auc = model.history.get("train").unwrap();
    assert_eq!(train_auc.len(), 10);
    assert!(*train_auc.last().unwrap() > 0.8, "train auc {:?}", train_auc);

    let path = save_model(model.booster.as_ref(), model_dir.path()).unwrap();
    assert_eq!(path, model_dir.path().join(MODEL_FILE_NAME));
    assert!(fs::metadata(&path).unwrap().len() > 0);
    let entries: Vec<_> = fs::read_dir(model_dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "only model.bin is left in the model dir");

    let reloaded = load_gbdt_model(&path, &params(), 8).unwrap();
    use boostjob::models::Booster;
    let before = model.predict(&dval).unwrap();
    let after = reloaded.predict(&dval).unwrap();
    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(&after) {
        assert!((a - b).abs() < 1e-5, "{a} vs {b}");
    }
}

#[test]
fn identical_inputs_give_identical_histories() {
    let data_dir = tempfile::tempdir().unwrap();
    write_split(data_dir.path(), "train_features.csv", "train_labels.csv", 60, 4, 0);
    write_split(data_dir.path(), "val_features.csv", "val_labels.csv", 15, 4, 500);

    let run = || {
        let dtrain = load(data_dir.path(), "train_features.csv", "train_labels.csv", DatasetRole::Train);
        let dval = load(data_dir.path(), "val_features.csv", "val_labels.csv", DatasetRole::Validation);
        let model = train(
            BoosterKind::Gbdt,
            &params(),
            &dtrain,
            &[(&dtrain, "train"), (&dval, "validation")],
            4,
            &mut [],
        )
        .unwrap();
        let preds = model.predict(&dval).unwrap();
        (model.history, preds)
    };

    let (history_a, preds_a) = run();
    let (history_b, preds_b) = run();
    assert_eq!(history_a, history_b);
    assert_eq!(preds_a, preds_b);
}

#[test]
fn shape_mismatch_is_caught_before_training() {
    let data_dir = tempfile::tempdir().unwrap();
    write_split(data_dir.path(), "train_features.csv", "train_labels.csv", 10, 3, 0);
    fs::write(data_dir.path().join("train_labels.csv"), "0\n1\n").unwrap();

    let x = read_feature_table(data_dir.path().join("train_features.csv")).unwrap();
    let y = read_label_vector(data_dir.path().join("train_labels.csv")).unwrap();
    let err = Dataset::new(DatasetRole::Train, x, y).unwrap_err();
    assert!(matches!(
        err,
        BoostError::ShapeMismatch { feature_rows: 10, label_rows: 2, .. }
    ));
}

#[test]
fn validation_with_different_feature_count_is_rejected() {
    let data_dir = tempfile::tempdir().unwrap();
    write_split(data_dir.path(), "train_features.csv", "train_labels.csv", 20, 4, 0);
    write_split(data_dir.path(), "val_features.csv", "val_labels.csv", 5, 3, 0);
    let dtrain = load(data_dir.path(), "train_features.csv", "train_labels.csv", DatasetRole::Train);
    let dval = load(data_dir.path(), "val_features.csv", "val_labels.csv", DatasetRole::Validation);

    let result = train(
        BoosterKind::Gbdt,
        &params(),
        &dtrain,
        &[(&dtrain, "train"), (&dval, "validation")],
        2,
        &mut [],
    );
    assert!(matches!(
        result,
        Err(BoostError::FeatureMismatch { expected: 4, found: 3, .. })
    ));
}
