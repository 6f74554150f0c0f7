use serde::Deserialize;

/// Base URLs of every supported gateway.
#[derive(Clone, Deserialize, Debug, Default)]
pub struct Connectors {
    pub airwallex: ConnectorParams,
    pub authorizedotnet: ConnectorParams,
    pub bambora_apac: ConnectorParams,
    pub checkout: ConnectorParams,
    pub elavon: ConnectorParams,
    pub nmi: ConnectorParams,
    pub worldpay: ConnectorParams,
}

impl Connectors {
    /// `(name, params)` pairs, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ConnectorParams)> {
        [
            ("airwallex", &self.airwallex),
            ("authorizedotnet", &self.authorizedotnet),
            ("bambora_apac", &self.bambora_apac),
            ("checkout", &self.checkout),
            ("elavon", &self.elavon),
            ("nmi", &self.nmi),
            ("worldpay", &self.worldpay),
        ]
        .into_iter()
    }
}

#[derive(Clone, Deserialize, Debug, Default)]
pub struct ConnectorParams {
    /// base url
    pub base_url: String,
    /// sandbox url, used instead of `base_url` in test mode when present
    pub test_base_url: Option<String>,
}

impl ConnectorParams {
    pub fn url_for(&self, test_mode: bool) -> &str {
        match (&self.test_base_url, test_mode) {
            (Some(test_base_url), true) => test_base_url,
            _ => &self.base_url,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    pub idle_pool_connection_timeout: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub bypass_proxy_urls: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_is_preferred_in_test_mode() {
        let params = ConnectorParams {
            base_url: "https://live.example.com/".to_string(),
            test_base_url: Some("https://sandbox.example.com/".to_string()),
        };
        assert_eq!(params.url_for(true), "https://sandbox.example.com/");
        assert_eq!(params.url_for(false), "https://live.example.com/");

        let params = ConnectorParams {
            test_base_url: None,
            ..params
        };
        assert_eq!(params.url_for(true), "https://live.example.com/");
    }
}
