use log::LevelFilter;

use boostjob_cli::cli::build_cli;
use boostjob_cli::train::driver::run_training;
use boostjob_cli::train::input::JobConfig;

fn main() {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("BOOSTJOB_LOG", "error,boostjob=info"))
        .init();

    let matches = build_cli().get_matches();

    let result = JobConfig::from_arguments(&matches).and_then(|config| {
        log::debug!(
            "Job configuration: {}",
            serde_json::to_string(&config).unwrap_or_default()
        );
        run_training(&config)
    });

    if let Err(e) = result {
        log::error!("Training failed: {:#}", e);
        std::process::exit(1);
    }
}
