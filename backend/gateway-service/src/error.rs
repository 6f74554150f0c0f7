#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("Invalid log filtering directive: {0}")]
    FilterDirectiveError(#[from] tracing_subscriber::filter::ParseError),
    #[error("Failed to initialize the logging subsystem: {0}")]
    LoggerInitError(#[from] tracing_subscriber::util::TryInitError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
