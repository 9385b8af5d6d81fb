// src/logging.rs

use color_eyre::eyre::Result;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::path::PathBuf;
use tracing_error::ErrorLayer;
use tracing_subscriber::{self, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub static LOG_ENV: Lazy<String> =
    Lazy::new(|| format!("{}_LOGLEVEL", env!("CARGO_CRATE_NAME").to_uppercase()));
pub static LOG_FILE: Lazy<String> = Lazy::new(|| format!("{}.log", env!("CARGO_PKG_NAME")));

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "tracelens", env!("CARGO_PKG_NAME"))
}

pub fn get_data_dir() -> PathBuf {
    if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

/// Where the file sink writes. The log panel tails this path.
pub fn log_file_path() -> PathBuf {
    get_data_dir().join(LOG_FILE.as_str())
}

/// Initializes file-based logging. The terminal is owned by the dashboard,
/// so nothing is ever written to stdout/stderr; level comes from `RUST_LOG`
/// or `TRACELENS_LOGLEVEL`.
pub fn initialize_logging() -> Result<()> {
    let directory = get_data_dir();
    std::fs::create_dir_all(&directory)?;
    let log_file = std::fs::File::create(log_file_path())?;

    let file_log_level = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_ENV.as_str()))
        .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")));

    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::new(file_log_level));

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
