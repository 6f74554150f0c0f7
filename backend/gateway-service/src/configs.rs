use std::path::PathBuf;

use common_utils::consts;
use domain_types::types::{Connectors, Proxy};

use crate::logger::config::Log;

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Config {
    pub common: Common,
    pub log: Log,
    #[serde(default)]
    pub proxy: Proxy,
    pub connectors: Connectors,
    /// Sends every request to the gateways' sandbox endpoints.
    #[serde(default)]
    pub test_mode: bool,
}

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Common {
    pub environment: String,
}

impl Common {
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        match self.environment.as_str() {
            "development" | "production" => Ok(()),
            _ => Err(config::ConfigError::Message(format!(
                "Invalid environment '{}'. Must be 'development' or 'production'",
                self.environment
            ))),
        }
    }
}

/// Everything a [`crate::GatewayClient`] needs besides its credentials.
#[derive(Clone, Debug, Default)]
pub struct GatewayConfig {
    pub connectors: Connectors,
    pub test_mode: bool,
    pub proxy: Proxy,
    /// Logs a scrubbed request/response transcript of every call at debug level.
    pub log_transcripts: bool,
}

impl From<&Config> for GatewayConfig {
    fn from(config: &Config) -> Self {
        Self {
            connectors: config.connectors.clone(),
            test_mode: config.test_mode,
            proxy: config.proxy.clone(),
            log_transcripts: config.log.transcripts,
        }
    }
}

impl Config {
    /// Function to build the configuration by picking it from default locations
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::new_with_config_path(None)
    }

    /// Builds the configuration from `explicit_config_path`, or from the environment's file under
    /// `config/` when no path is given. `GATEWAY__`-prefixed variables override both.
    pub fn new_with_config_path(
        explicit_config_path: Option<PathBuf>,
    ) -> Result<Self, config::ConfigError> {
        let env = consts::Env::from_env_var();
        let config_path = Self::config_path(&env, explicit_config_path);

        let config = Self::builder(&env)?
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(consts::NAME)
                    .try_parsing(true)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("proxy.bypass_proxy_urls"),
            )
            .build()?;

        #[allow(clippy::print_stderr)]
        let config: Self = serde_path_to_error::deserialize(config).map_err(|error| {
            eprintln!("Unable to deserialize application configuration: {error}");
            error.into_inner()
        })?;

        config.validate()?;

        Ok(config)
    }

    pub fn builder(
        environment: &consts::Env,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            // Here, it should be `set_override()` not `set_default()`.
            // "env" can't be altered by config field.
            .set_override("env", environment.to_string())
    }

    /// Config path.
    pub fn config_path(
        environment: &consts::Env,
        explicit_config_path: Option<PathBuf>,
    ) -> PathBuf {
        let mut config_path = PathBuf::new();
        if let Some(explicit_config_path_val) = explicit_config_path {
            config_path.push(explicit_config_path_val);
        } else {
            let config_directory: String = "config".into();
            let config_file_name = environment.config_path();

            config_path.push(workspace_path());
            config_path.push(config_directory);
            config_path.push(config_file_name);
        }
        config_path
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        self.common.validate()?;
        self.connectors
            .iter()
            .find(|(_, params)| params.base_url.trim().is_empty())
            .map_or(Ok(()), |(name, _)| {
                Err(config::ConfigError::Message(format!(
                    "connectors.{name}.base_url must not be empty"
                )))
            })
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::from(self)
    }
}

pub fn workspace_path() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let mut path = PathBuf::from(manifest_dir);
        path.pop();
        path.pop();
        path
    } else {
        PathBuf::from(".")
    }
}
