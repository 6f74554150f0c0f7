#![allow(clippy::unwrap_used)]

use std::io::Write;

use gateway_service::{configs::Config, logger::config::LogFormat};

const CONNECTORS: &str = r#"
[connectors.airwallex]
base_url = "https://api.airwallex.com/"
test_base_url = "https://api-demo.airwallex.com/"

[connectors.authorizedotnet]
base_url = "https://api.authorize.net/xml/v1/request.api"

[connectors.bambora_apac]
base_url = "https://www.bambora.co.nz/interface/api/"

[connectors.checkout]
base_url = "https://api.checkout.com/"

[connectors.elavon]
base_url = "https://api.convergepay.com/VirtualMerchant/"

[connectors.nmi]
base_url = "https://secure.nmi.com/"

[connectors.worldpay]
base_url = "https://secure.worldpay.com/jsp/merchant/xml/paymentService.jsp"
"#;

fn write_config(head: &str) -> tempfile::NamedTempFile {
    write_config_with_connectors(head, CONNECTORS)
}

fn write_config_with_connectors(head: &str, connectors: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(file, "{head}\n{connectors}").unwrap();
    file
}

#[test]
fn explicit_config_file_is_loaded() {
    let file = write_config(
        r#"
test_mode = true

[common]
environment = "development"

[log]
transcripts = true

[log.console]
enabled = false
level = "DEBUG"
log_format = "default"

[proxy]
idle_pool_connection_timeout = 30
request_timeout_secs = 15
"#,
    );

    let config = Config::new_with_config_path(Some(file.path().to_path_buf())).unwrap();
    assert!(config.test_mode);
    assert_eq!(config.log.console.log_format, LogFormat::Default);
    assert!(!config.log.file.enabled);
    assert_eq!(config.proxy.request_timeout_secs, Some(15));
    assert_eq!(
        config.connectors.airwallex.url_for(true),
        "https://api-demo.airwallex.com/"
    );

    let gateway = config.gateway_config();
    assert!(gateway.test_mode);
    assert!(gateway.log_transcripts);
    assert_eq!(gateway.proxy.idle_pool_connection_timeout, Some(30));
}

#[test]
fn environment_variables_override_the_file() {
    let file = write_config(
        r#"
[common]
environment = "development"

[log.console]
enabled = false
"#,
    );
    std::env::set_var(
        "GATEWAY__CONNECTORS__NMI__BASE_URL",
        "https://override.nmi.test/",
    );
    std::env::set_var("GATEWAY__PROXY__BYPASS_PROXY_URLS", "https://a.test/,https://b.test/");

    let config = Config::new_with_config_path(Some(file.path().to_path_buf()));
    std::env::remove_var("GATEWAY__CONNECTORS__NMI__BASE_URL");
    std::env::remove_var("GATEWAY__PROXY__BYPASS_PROXY_URLS");

    let config = config.unwrap();
    assert_eq!(config.connectors.nmi.base_url, "https://override.nmi.test/");
    assert_eq!(
        config.proxy.bypass_proxy_urls,
        ["https://a.test/", "https://b.test/"]
    );
    assert!(!config.test_mode);
}

#[test]
fn invalid_environment_is_rejected() {
    let file = write_config(
        r#"
[common]
environment = "staging"

[log.console]
enabled = false
"#,
    );

    let error = Config::new_with_config_path(Some(file.path().to_path_buf())).unwrap_err();
    assert!(error.to_string().contains("Invalid environment 'staging'"));
}

#[test]
fn empty_base_url_is_rejected() {
    let file = write_config_with_connectors(
        r#"
[common]
environment = "production"

[log.console]
enabled = false
"#,
        &CONNECTORS.replace("https://api.checkout.com/", " "),
    );

    let error = Config::new_with_config_path(Some(file.path().to_path_buf())).unwrap_err();
    assert!(error
        .to_string()
        .contains("connectors.checkout.base_url must not be empty"));
}

#[test]
fn missing_connectors_are_rejected() {
    let file = write_config_with_connectors(
        r#"
[common]
environment = "development"

[log.console]
enabled = false
"#,
        "",
    );

    assert!(Config::new_with_config_path(Some(file.path().to_path_buf())).is_err());
}
