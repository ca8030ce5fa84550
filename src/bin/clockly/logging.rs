//! tracing setup.
//!
//! Command-line runs log to stderr. The terminal UI owns the screen, so it
//! only logs when `--log-file` is given. `RUST_LOG` overrides the configured
//! filter.

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use std::{fs::File, path::Path, sync::Mutex};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(filter: &str, log_file: Option<&Path>, interactive: bool) -> EyreResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter)
            .wrap_err_with(|| format!("invalid log filter '{filter}'"))?,
    };

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true),
            )
        }
        None => None,
    };

    let stderr_layer = (!interactive).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(filter)
        .init();

    tracing::debug!(log_file = ?log_file, interactive, "logging initialized");
    Ok(())
}
