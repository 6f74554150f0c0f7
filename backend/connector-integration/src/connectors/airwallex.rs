pub mod transformers;

use std::sync::LazyLock;

use common_utils::{errors::CustomResult, StringMajorUnit};
use domain_types::{
    connector_flow::{
        Authorize, Capture, CreateAccessToken, CreateOrder, Refund, Store, Unstore, Verify, Void,
    },
    connector_types::PaymentFlowData,
    errors,
    router_data::{ConnectorAuthType, ErrorResponse},
    router_data_v2::RouterDataV2,
    router_request_types::{
        AccessTokenRequestData, AccessTokenResponseData, PaymentCreateOrderData,
        PaymentCreateOrderResponse, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData,
        RefundsData, StoreData, UnstoreData, VerifyData,
    },
    router_response_types::{GatewayResponse, Response},
    types::Connectors,
};
use hyperswitch_masking::{Mask, Maskable, PeekInterface};
use interfaces::{
    api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2, connector_types,
    scrubbing::TranscriptScrubber,
};
use regex::Regex;
use transformers::{
    self as airwallex, AirwallexAccessTokenResponse, AirwallexCaptureRequest,
    AirwallexCaptureResponse, AirwallexIntentRequest, AirwallexIntentResponse,
    AirwallexPaymentsRequest, AirwallexPaymentsResponse, AirwallexRefundRequest,
    AirwallexRefundResponse, AirwallexVoidRequest, AirwallexVoidResponse,
};

use super::macros;
use crate::utils;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const AUTHORIZATION: &str = "Authorization";
    pub(crate) const X_API_KEY: &str = "x-api-key";
    pub(crate) const X_CLIENT_ID: &str = "x-client-id";
}

static SCRUB_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    utils::compile_scrub_patterns(&[
        (r#"("number"\s*:\s*)(?:"[^"]*"|null|\d+)"#, r#"${1}"[FILTERED]""#),
        (r#"("cvc"\s*:\s*)(?:"[^"]*"|null|\d+)"#, r#"${1}"[FILTERED]""#),
        (r#"("token"\s*:\s*)(?:"[^"]*"|null)"#, r#"${1}"[FILTERED]""#),
        (r"(?im)(x-api-key:[ \t]*)[^\r\n]*", "${1}[FILTERED]"),
        (r"(?im)(x-client-id:[ \t]*)[^\r\n]*", "${1}[FILTERED]"),
        (r"(?im)(authorization:[ \t]*bearer[ \t]+)[^\r\n]*", "${1}[FILTERED]"),
    ])
});

impl connector_types::ConnectorServiceTrait for Airwallex {}
impl connector_types::PaymentAccessToken for Airwallex {}
impl connector_types::PaymentOrderCreate for Airwallex {}
impl connector_types::PaymentAuthorizeV2 for Airwallex {}
impl connector_types::PaymentCapture for Airwallex {}
impl connector_types::PaymentVoidV2 for Airwallex {}
impl connector_types::RefundV2 for Airwallex {}
impl connector_types::PaymentVerifyV2 for Airwallex {}
impl connector_types::PaymentMethodStore for Airwallex {}
impl connector_types::PaymentMethodUnstore for Airwallex {}

impl connector_types::ValidationTrait for Airwallex {
    fn should_do_access_token(&self) -> bool {
        true
    }

    fn should_do_order_create(&self) -> bool {
        true
    }

    fn supports_native_verify(&self) -> bool {
        false
    }

    fn validate_authorize_request(
        &self,
        request: &PaymentsAuthorizeData,
    ) -> CustomResult<(), errors::ConnectorError> {
        request.options.get_return_url()?;
        Ok(())
    }
}

impl TranscriptScrubber for Airwallex {
    fn scrub(&self, transcript: &str) -> String {
        utils::scrub_transcript(transcript, &SCRUB_PATTERNS)
    }
}

impl ConnectorCommon for Airwallex {
    fn id(&self) -> &'static str {
        "airwallex"
    }

    fn display_name(&self) -> &'static str {
        "Airwallex"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, test_mode: bool) -> &'a str {
        connectors.airwallex.url_for(test_mode)
    }

    fn get_auth_header(
        &self,
        auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        let auth = airwallex::AirwallexAuthType::try_from(auth_type)?;
        Ok(vec![
            (
                headers::X_API_KEY.to_string(),
                auth.x_api_key.peek().to_string().into_masked(),
            ),
            (
                headers::X_CLIENT_ID.to_string(),
                auth.x_client_id.peek().to_string().into_masked(),
            ),
        ])
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let Ok(params) = serde_json::from_slice::<serde_json::Value>(&res.response) else {
            return Ok(ErrorResponse::from_status_code(res.status_code));
        };
        let response: airwallex::AirwallexErrorResponse =
            serde_json::from_value(params.clone()).unwrap_or_default();
        let code = response
            .provider_original_response_code
            .or(response.code)
            .unwrap_or_else(|| res.status_code.to_string());
        let message = response
            .message
            .unwrap_or_else(|| res.status_code.to_string());

        Ok(ErrorResponse {
            code,
            message,
            params,
            ..ErrorResponse::from_status_code(res.status_code)
        })
    }
}

macros::create_all_prerequisites!(
    connector_name: Airwallex,
    api: [
        (
            flow: CreateAccessToken,
            response_body: AirwallexAccessTokenResponse,
            router_data: RouterDataV2<CreateAccessToken, PaymentFlowData, AccessTokenRequestData, AccessTokenResponseData>
        ),
        (
            flow: CreateOrder,
            request_body: AirwallexIntentRequest,
            response_body: AirwallexIntentResponse,
            router_data: RouterDataV2<CreateOrder, PaymentFlowData, PaymentCreateOrderData, PaymentCreateOrderResponse>
        ),
        (
            flow: Authorize,
            request_body: AirwallexPaymentsRequest,
            response_body: AirwallexPaymentsResponse,
            router_data: RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>
        ),
        (
            flow: Capture,
            request_body: AirwallexCaptureRequest,
            response_body: AirwallexCaptureResponse,
            router_data: RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>
        ),
        (
            flow: Void,
            request_body: AirwallexVoidRequest,
            response_body: AirwallexVoidResponse,
            router_data: RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>
        ),
        (
            flow: Refund,
            request_body: AirwallexRefundRequest,
            response_body: AirwallexRefundResponse,
            router_data: RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>
        )
    ],
    amount_converters: [
        amount_converter: StringMajorUnit
    ],
    member_functions: {
        pub fn build_headers<F, Req, Res>(
            &self,
            req: &RouterDataV2<F, PaymentFlowData, Req, Res>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            let access_token = req.resource_common_data.get_access_token()?;
            Ok(vec![
                (
                    headers::CONTENT_TYPE.to_string(),
                    self.common_get_content_type().to_string().into(),
                ),
                (
                    headers::AUTHORIZATION.to_string(),
                    format!("Bearer {}", access_token.access_token.peek()).into_masked(),
                ),
            ])
        }

        pub fn connector_base_url<'a, F, Req, Res>(
            &self,
            req: &'a RouterDataV2<F, PaymentFlowData, Req, Res>,
        ) -> &'a str {
            self.base_url(
                &req.resource_common_data.connectors,
                req.resource_common_data.test_mode,
            )
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_content_type, get_error_response_v2],
    connector: Airwallex,
    curl_response: AirwallexAccessTokenResponse,
    flow_name: CreateAccessToken,
    resource_common_data: PaymentFlowData,
    flow_request: AccessTokenRequestData,
    flow_response: AccessTokenResponseData,
    http_method: Post,
    other_functions: {
        fn get_headers(
            &self,
            req: &RouterDataV2<CreateAccessToken, PaymentFlowData, AccessTokenRequestData, AccessTokenResponseData>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            let mut header = vec![(
                headers::CONTENT_TYPE.to_string(),
                self.common_get_content_type().to_string().into(),
            )];
            header.extend(self.get_auth_header(&req.connector_auth_type)?);
            Ok(header)
        }

        fn get_url(
            &self,
            req: &RouterDataV2<CreateAccessToken, PaymentFlowData, AccessTokenRequestData, AccessTokenResponseData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!(
                "{}api/v1/authentication/login",
                self.connector_base_url(req)
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Airwallex,
    curl_request: Json(AirwallexIntentRequest),
    curl_response: AirwallexIntentResponse,
    flow_name: CreateOrder,
    resource_common_data: PaymentFlowData,
    flow_request: PaymentCreateOrderData,
    flow_response: PaymentCreateOrderResponse,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<CreateOrder, PaymentFlowData, PaymentCreateOrderData, PaymentCreateOrderResponse>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!(
                "{}api/v1/pa/payment_intents/create",
                self.connector_base_url(req)
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Airwallex,
    curl_request: Json(AirwallexPaymentsRequest),
    curl_response: AirwallexPaymentsResponse,
    flow_name: Authorize,
    resource_common_data: PaymentFlowData,
    flow_request: PaymentsAuthorizeData,
    flow_response: GatewayResponse,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>,
        ) -> CustomResult<String, errors::ConnectorError> {
            let intent_id = req.resource_common_data.get_reference_id()?;
            Ok(format!(
                "{}api/v1/pa/payment_intents/{intent_id}/confirm",
                self.connector_base_url(req)
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Airwallex,
    curl_request: Json(AirwallexCaptureRequest),
    curl_response: AirwallexCaptureResponse,
    flow_name: Capture,
    resource_common_data: PaymentFlowData,
    flow_request: PaymentsCaptureData,
    flow_response: GatewayResponse,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>,
        ) -> CustomResult<String, errors::ConnectorError> {
            let intent_id = domain_types::utils::require_authorization(&req.request.authorization)?;
            Ok(format!(
                "{}api/v1/pa/payment_intents/{intent_id}/capture",
                self.connector_base_url(req)
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Airwallex,
    curl_request: Json(AirwallexVoidRequest),
    curl_response: AirwallexVoidResponse,
    flow_name: Void,
    resource_common_data: PaymentFlowData,
    flow_request: PaymentVoidData,
    flow_response: GatewayResponse,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>,
        ) -> CustomResult<String, errors::ConnectorError> {
            let intent_id = domain_types::utils::require_authorization(&req.request.authorization)?;
            Ok(format!(
                "{}api/v1/pa/payment_intents/{intent_id}/cancel",
                self.connector_base_url(req)
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Airwallex,
    curl_request: Json(AirwallexRefundRequest),
    curl_response: AirwallexRefundResponse,
    flow_name: Refund,
    resource_common_data: PaymentFlowData,
    flow_request: RefundsData,
    flow_response: GatewayResponse,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!("{}api/v1/pa/refunds/create", self.connector_base_url(req)))
        }
    }
);

// Verify runs as authorize + void; store and unstore are not offered.
impl ConnectorIntegrationV2<Verify, PaymentFlowData, VerifyData, GatewayResponse> for Airwallex {}
impl ConnectorIntegrationV2<Store, PaymentFlowData, StoreData, GatewayResponse> for Airwallex {}
impl ConnectorIntegrationV2<Unstore, PaymentFlowData, UnstoreData, GatewayResponse> for Airwallex {}
