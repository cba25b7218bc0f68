use thiserror::Error;
use tracing::metadata::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("init logging error: `{0}`")]
    TryInitError(String),
}

pub struct Logging;

impl Logging {
    /// Diagnostics go to stderr; stdout carries only the inventory.
    pub fn try_init() -> Result<(), LoggingError> {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(false)
            .with_env_filter(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::WARN.into())
                    .from_env_lossy(),
            )
            .try_init()
            .map_err(|err| LoggingError::TryInitError(err.to_string()))
    }
}
