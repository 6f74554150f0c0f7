use bytes::Bytes;
use common_enums::{CurrencyUnit, ResponseFormat};
use common_utils::{
    consts::{NO_ERROR_CODE, NO_ERROR_MESSAGE},
    CustomResult,
};
use domain_types::{
    router_data::{ConnectorAuthType, ErrorResponse},
    types::Connectors,
};

pub trait ConnectorCommon {
    /// Name of the connector (in lowercase).
    fn id(&self) -> &'static str;

    /// Name used in messages shown to merchants, e.g. `Authorize.Net`.
    fn display_name(&self) -> &'static str;

    /// Connector accepted currency unit as either "Base" or "Minor"
    fn get_currency_unit(&self) -> CurrencyUnit {
        CurrencyUnit::Minor
    }

    /// HTTP header used for authorization.
    fn get_auth_header(
        &self,
        _auth_type: &ConnectorAuthType,
    ) -> CustomResult<
        Vec<(String, hyperswitch_masking::Maskable<String>)>,
        domain_types::errors::ConnectorError,
    > {
        Ok(Vec::new())
    }

    /// HTTP `Content-Type` to be used for POST requests.
    /// Defaults to `application/json`.
    fn common_get_content_type(&self) -> &'static str {
        "application/json"
    }

    /// The base URL for interacting with the connector's API.
    fn base_url<'a>(&self, connectors: &'a Connectors, test_mode: bool) -> &'a str;

    /// Encoding of the response bodies, used to parse them and to word parse failures.
    fn response_format(&self) -> ResponseFormat {
        ResponseFormat::Json
    }

    /// Hook run on the raw body before it is parsed, e.g. to unwrap a SOAP envelope.
    fn preprocess_response_bytes(
        &self,
        response_bytes: Bytes,
    ) -> CustomResult<Bytes, domain_types::errors::ConnectorError> {
        Ok(response_bytes)
    }

    /// common error response for a connector if it is same in all case
    fn build_error_response(
        &self,
        res: domain_types::router_response_types::Response,
    ) -> CustomResult<ErrorResponse, domain_types::errors::ConnectorError> {
        Ok(ErrorResponse {
            status_code: res.status_code,
            code: NO_ERROR_CODE.to_string(),
            message: NO_ERROR_MESSAGE.to_string(),
            reason: None,
            connector_transaction_id: None,
            params: serde_json::Value::Null,
        })
    }

    /// Message used when a 2xx body cannot be parsed.
    fn invalid_response_message(&self, raw_response: &str) -> String {
        let gateway = self.display_name();
        format!(
            "Invalid {} response received from {gateway}. Please contact {gateway} if you continue to receive this message. (The raw response returned by the API was {raw_response:?})",
            self.response_format()
        )
    }
}
