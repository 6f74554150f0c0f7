//! Consolidated constants for the gateway adapters

// =============================================================================
// Error Messages and Codes
// =============================================================================

/// No error message string const
pub const NO_ERROR_MESSAGE: &str = "No error message";
/// No error code string const
pub const NO_ERROR_CODE: &str = "No error code";
/// A string constant representing a redacted or masked value
pub const REDACTED: &str = "Redacted";
/// Marker written in place of every value removed by a transcript scrubber
pub const FILTERED: &str = "[FILTERED]";

// =============================================================================
// Card Validation Constants
// =============================================================================

/// Minimum limit of a card number will not be less than 8 by ISO standards
pub const MIN_CARD_NUMBER_LENGTH: usize = 8;
/// Maximum limit of a card number will not exceed 19 by ISO standards
pub const MAX_CARD_NUMBER_LENGTH: usize = 19;

/// Constant variable for name
pub const NAME: &str = "GATEWAY";
/// Service name used in log lines
pub const GATEWAY_SERVICE_NAME: &str = "gateway_service";

// =============================================================================
// Environment and Configuration
// =============================================================================

/// Environment variable selecting the configuration file
pub const ENV_VAR: &str = "GATEWAY_ENV";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    Development,
    Release,
}

impl Env {
    pub const fn current_env() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Release
        }
    }

    /// Resolves the environment from `GATEWAY_ENV`, falling back to the build profile.
    pub fn from_env_var() -> Self {
        match std::env::var(ENV_VAR).as_deref() {
            Ok("production") | Ok("release") => Self::Release,
            Ok("development") | Ok("sandbox") => Self::Development,
            _ => Self::current_env(),
        }
    }

    pub const fn config_path(self) -> &'static str {
        match self {
            Self::Development => "development.toml",
            Self::Release => "production.toml",
        }
    }
}

impl std::fmt::Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Release => write!(f, "release"),
        }
    }
}
