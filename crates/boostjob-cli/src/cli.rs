use clap::{Arg, Command, ValueHint};
use std::path::PathBuf;

/// Environment variable holding the training channel directory.
pub const TRAIN_CHANNEL_ENV: &str = "SM_CHANNEL_TRAIN";
/// Environment variable holding the validation channel directory.
pub const VALIDATION_CHANNEL_ENV: &str = "SM_CHANNEL_VALIDATION";
/// Environment variable holding the model output directory.
pub const MODEL_DIR_ENV: &str = "SM_MODEL_DIR";

pub fn build_cli() -> Command {
    Command::new("boostjob")
        .version(clap::crate_version!())
        .about("Train a gradient-boosted tree model from training-job channel CSVs")
        .arg(
            Arg::new("max_depth")
                .long("max_depth")
                .help("Maximum tree depth")
                .value_parser(clap::value_parser!(u32).range(1..))
                .default_value("5"),
        )
        .arg(
            Arg::new("eta")
                .long("eta")
                .help("Step size shrinkage")
                .value_parser(clap::value_parser!(f32))
                .default_value("0.05"),
        )
        .arg(
            Arg::new("gamma")
                .long("gamma")
                .help("Minimum loss reduction required to split a node")
                .value_parser(clap::value_parser!(u32))
                .default_value("4"),
        )
        .arg(
            Arg::new("min_child_weight")
                .long("min_child_weight")
                .help("Minimum sum of instance weight in a child")
                .value_parser(clap::value_parser!(u32))
                .default_value("6"),
        )
        .arg(
            Arg::new("silent")
                .long("silent")
                .help("Set to 1 to suppress per-round evaluation output")
                .value_parser(clap::value_parser!(u8).range(0..=1))
                .default_value("0"),
        )
        .arg(
            Arg::new("objective")
                .long("objective")
                .help("Learning objective, e.g. binary:logistic or reg:squarederror")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .default_value("binary:logistic"),
        )
        .arg(
            Arg::new("eval_metric")
                .long("eval_metric")
                .help("Evaluation metric reported every round")
                .value_parser(["auc", "logloss", "error", "rmse", "mae"])
                .default_value("auc"),
        )
        .arg(
            Arg::new("num_round")
                .long("num_round")
                .help("Number of boosting rounds")
                .value_parser(clap::value_parser!(u32).range(1..))
                .default_value("10"),
        )
        .arg(
            Arg::new("train")
                .long("train")
                .help("Training channel directory (train_features.csv, train_labels.csv)")
                .env(TRAIN_CHANNEL_ENV)
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("validation")
                .long("validation")
                .help("Validation channel directory (val_features.csv, val_labels.csv)")
                .env(VALIDATION_CHANNEL_ENV)
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("model_dir")
                .long("model_dir")
                .help("Directory the trained model.bin is written to")
                .env(MODEL_DIR_ENV)
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("debug_hook_config")
                .long("debug_hook_config")
                .help(
                    "Debug hook JSON descriptor. Defaults to $SMDEBUG_CONFIG_FILE_PATH, \
                     then /opt/ml/input/config/debughookconfig.json",
                )
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("booster")
                .long("booster")
                .help("Boosting engine. xgboost requires a build with `--features xgboost`")
                .value_parser(["gbdt", "xgboost"])
                .default_value("gbdt"),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
}
