mod config;
mod errors;
mod jobs;


use std::ffi::OsString;
use std::path::PathBuf;

use tracing::info;

use crate::config::{DEFAULT_CONFIG_FILE_NAME, load_config};
use crate::errors::GeneralError;
use crate::jobs::run_jobs;


fn run() -> Result<(), GeneralError> {
    // set up tracing
    let (stderr_non_blocking, _guard) = tracing_appender::non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(stderr_non_blocking)
        .init();

    // get config path and load config
    let args_os: Vec<OsString> = std::env::args_os().collect();
    let config_path = match args_os.get(1) {
        Some(cp) => PathBuf::from(cp),
        None => PathBuf::from(DEFAULT_CONFIG_FILE_NAME),
    };
    let config = load_config(&config_path)?;
    info!("loaded {} job(s) from {}", config.jobs.len(), config_path.display());

    let failed = run_jobs(&config);
    if failed > 0 {
        return Err(GeneralError::JobsFailed { failed, total: config.jobs.len() });
    }
    Ok(())
}

fn main() {
    let result = run();

    std::process::exit(
        match result {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{}", e);
                1
            },
        }
    )
}
