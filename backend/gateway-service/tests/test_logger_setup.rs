#![allow(clippy::unwrap_used)]

use common_utils::consts::GATEWAY_SERVICE_NAME;
use gateway_service::{error::ConfigurationError, logger};

fn log_config(directive: Option<&str>) -> logger::config::Log {
    serde_json::from_value(serde_json::json!({
        "console": {
            "enabled": true,
            "level": "DEBUG",
            "log_format": "json",
            "filtering_directive": directive,
        },
        "transcripts": true,
    }))
    .unwrap()
}

// A global subscriber can be installed once per process, so the cases run in order in one test.
#[test]
fn subscriber_is_installed_once() {
    let error = logger::setup(
        &log_config(Some("gateway_service=loud")),
        GATEWAY_SERVICE_NAME,
        ["hyper"],
    )
    .unwrap_err();
    assert!(matches!(error, ConfigurationError::FilterDirectiveError(_)));

    let guard = logger::setup(&log_config(None), GATEWAY_SERVICE_NAME, ["hyper"]).unwrap();
    logger::info!(flow = "authorize", "logger ready");

    let error = logger::setup(&log_config(None), GATEWAY_SERVICE_NAME, ["hyper"]).unwrap_err();
    assert!(matches!(error, ConfigurationError::LoggerInitError(_)));
    drop(guard);
}
