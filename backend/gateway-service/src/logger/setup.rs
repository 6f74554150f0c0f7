//! Setup logging subsystem.
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use super::config;
use crate::error::ConfigurationError;

/// Crates of this workspace, logged at the configured level instead of the default `WARN`.
const WORKSPACE_CRATES: [&str; 8] = [
    "gateway_service",
    "connector_integration",
    "external_services",
    "domain_types",
    "interfaces",
    "gateway_common_utils",
    "gateway_common_enums",
    "gateway_cards",
];

/// Contains guards necessary for logging
#[derive(Debug)]
pub struct TelemetryGuard {
    _log_guards: Vec<WorkerGuard>,
}

/// Setup logging sub-system specifying the logging configuration, service (binary) name, and a
/// list of external crates for which a more verbose logging must be enabled. All crates within the
/// current cargo workspace are automatically considered for verbose logging.
pub fn setup(
    config: &config::Log,
    service_name: &str,
    crates_to_filter: impl AsRef<[&'static str]>,
) -> Result<TelemetryGuard, ConfigurationError> {
    let mut guards = Vec::new();
    let mut subscriber_layers = Vec::new();

    if config.console.enabled {
        let console_filter_directive =
            config
                .console
                .filtering_directive
                .clone()
                .unwrap_or_else(|| {
                    get_envfilter_directive(
                        tracing::Level::WARN,
                        config.console.level.into_level(),
                        crates_to_filter.as_ref(),
                    )
                });
        let console_filter = EnvFilter::builder()
            .with_default_directive(config.console.level.into_level().into())
            .parse(console_filter_directive)?;

        let (console_writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(guard);

        let console_layer = match config.console.log_format {
            config::LogFormat::Default => fmt::layer()
                .with_span_events(fmt::format::FmtSpan::CLOSE)
                .pretty()
                .with_writer(console_writer)
                .with_filter(console_filter)
                .boxed(),
            config::LogFormat::Json => {
                // Disable color or emphasis related ANSI escape codes for JSON formats
                error_stack::Report::set_color_mode(error_stack::fmt::ColorMode::None);

                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(console_writer)
                    .with_filter(console_filter)
                    .boxed()
            }
        };
        subscriber_layers.push(console_layer);
    }

    if config.file.enabled {
        let mut path = crate::configs::workspace_path();
        path.push(&config.file.path);
        std::fs::create_dir_all(&path)?;

        let file_appender = tracing_appender::rolling::hourly(&path, &config.file.file_name);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        guards.push(guard);

        let file_filter = EnvFilter::builder()
            .with_default_directive(config.file.level.into_level().into())
            .parse(get_envfilter_directive(
                tracing::Level::WARN,
                config.file.level.into_level(),
                crates_to_filter.as_ref(),
            ))?;
        subscriber_layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(file_writer)
                .with_filter(file_filter)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(subscriber_layers)
        .try_init()?;

    tracing::info!(
        service_name,
        transcripts = config.transcripts,
        "Logging subsystem initialized"
    );

    // Returning the TelemetryGuard for logs to be printed until it is dropped
    Ok(TelemetryGuard {
        _log_guards: guards,
    })
}

fn get_envfilter_directive(
    default_log_level: tracing::Level,
    filter_log_level: tracing::Level,
    crates_to_filter: impl AsRef<[&'static str]>,
) -> String {
    let mut explicitly_handled_targets = WORKSPACE_CRATES.to_vec();
    explicitly_handled_targets.extend(crates_to_filter.as_ref());

    // +1 for the default log level added as a directive
    let num_directives = explicitly_handled_targets.len() + 1;

    explicitly_handled_targets
        .into_iter()
        .map(|crate_name| crate_name.replace('-', "_"))
        .zip(std::iter::repeat(filter_log_level))
        .fold(
            {
                let mut directives = Vec::with_capacity(num_directives);
                directives.push(default_log_level.to_string());
                directives
            },
            |mut directives, (target, level)| {
                directives.push(format!("{target}={level}"));
                directives
            },
        )
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_raises_workspace_and_extra_crates() {
        let directive =
            get_envfilter_directive(tracing::Level::WARN, tracing::Level::DEBUG, ["reqwest"]);

        assert!(directive.starts_with("WARN,gateway_service=DEBUG,"));
        assert!(directive.contains("external_services=DEBUG"));
        assert!(directive.ends_with(",reqwest=DEBUG"));
    }

    #[test]
    fn directive_parses_as_env_filter() {
        let directive = get_envfilter_directive(tracing::Level::WARN, tracing::Level::INFO, ["hyper"]);
        assert!(EnvFilter::builder().parse(directive).is_ok());
    }
}
