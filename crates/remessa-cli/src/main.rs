//! Unattended invoice dispatch over e-mail.
//!
//! The binary has no flags or subcommands: a run is the single implicit
//! "process the inbox directory" operation, driven by a JSON config file and
//! environment variables. Exit code is 0 on any completed run, including
//! runs with per-document failures; only fatal startup errors exit non-zero.

mod logging;
mod prompt;
mod run;

use std::path::Path;
use std::process::ExitCode;

use remessa_core::AppConfig;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.paths.log_file, config.limits.log_max_lines) {
        eprintln!("failed to set up logging: {e}");
        return ExitCode::FAILURE;
    }

    match run::execute(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("fatal: {e:#}");
            eprintln!();
            eprintln!("Run aborted: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> std::io::Result<AppConfig> {
    let path = std::env::var("REMESSA_CONFIG").unwrap_or_else(|_| "remessa.json".to_string());
    let path = Path::new(&path);

    let mut config = if path.exists() {
        AppConfig::from_file(path)?
    } else {
        AppConfig::default()
    };
    config.apply_env();
    Ok(config)
}
