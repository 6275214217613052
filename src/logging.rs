use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::path::Path;

/// Route log output to `log_path` so the terminal UI stays clean.
/// `RUST_LOG` takes precedence over `level`.
pub fn init_to_file(log_path: &Path, level: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    Builder::from_env(Env::default().default_filter_or(level))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .context("Logger already initialised")
}

/// Log to stderr, for one-shot CLI commands
pub fn init_to_stderr(level: &str) {
    let _ = Builder::from_env(Env::default().default_filter_or(level))
        .target(Target::Stderr)
        .try_init();
}
