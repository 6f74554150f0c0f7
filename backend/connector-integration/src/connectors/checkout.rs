pub mod transformers;

use std::sync::LazyLock;

use common_utils::{errors::CustomResult, MinorUnit};
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
    utils::require_authorization,
};
use hyperswitch_masking::{Mask, Maskable, PeekInterface};
use interfaces::{
    api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2, connector_types,
    scrubbing::TranscriptScrubber,
};
use regex::Regex;
use transformers::{
    self as checkout, CheckoutCaptureRequest, CheckoutCaptureResponse, CheckoutIdempotency,
    CheckoutPaymentsRequest, CheckoutPaymentsResponse, CheckoutRefundRequest,
    CheckoutRefundResponse, CheckoutVerifyRequest, CheckoutVerifyResponse, CheckoutVoidRequest,
    CheckoutVoidResponse,
};

use super::macros;
use crate::utils;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const AUTHORIZATION: &str = "Authorization";
    pub(crate) const IDEMPOTENCY_KEY: &str = "Cko-Idempotency-Key";
}

static SCRUB_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    utils::compile_scrub_patterns(&[
        (r"(?im)(authorization:[ \t]*)[^\r\n]*", "${1}[FILTERED]"),
        (r#"("number"\s*:\s*)(?:"[^"]*"|null|\d+)"#, r#"${1}"[FILTERED]""#),
        (r#"("token"\s*:\s*)(?:"[^"]*"|null|\d+)"#, r#"${1}"[FILTERED]""#),
        (r#"("cvv"\s*:\s*)(?:"[^"]*"|null|\d+)"#, r#"${1}"[FILTERED]""#),
        (r#"("cryptogram"\s*:\s*)(?:"[^"]*"|null)"#, r#"${1}"[FILTERED]""#),
    ])
});

impl connector_types::ConnectorServiceTrait for Checkout {}
impl connector_types::PaymentAccessToken for Checkout {}
impl connector_types::PaymentOrderCreate for Checkout {}
impl connector_types::PaymentAuthorizeV2 for Checkout {}
impl connector_types::PaymentCapture for Checkout {}
impl connector_types::PaymentVoidV2 for Checkout {}
impl connector_types::RefundV2 for Checkout {}
impl connector_types::PaymentVerifyV2 for Checkout {}
impl connector_types::PaymentMethodStore for Checkout {}
impl connector_types::PaymentMethodUnstore for Checkout {}

impl connector_types::ValidationTrait for Checkout {}

impl TranscriptScrubber for Checkout {
    fn scrub(&self, transcript: &str) -> String {
        utils::scrub_transcript(transcript, &SCRUB_PATTERNS)
    }
}

impl ConnectorCommon for Checkout {
    fn id(&self) -> &'static str {
        "checkout"
    }

    fn display_name(&self) -> &'static str {
        "Checkout.com"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, test_mode: bool) -> &'a str {
        connectors.checkout.url_for(test_mode)
    }

    fn get_auth_header(
        &self,
        auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        let auth = checkout::CheckoutAuthType::try_from(auth_type)?;
        Ok(vec![(
            headers::AUTHORIZATION.to_string(),
            auth.secret_key.peek().to_string().into_masked(),
        )])
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let Ok(params) = serde_json::from_slice::<serde_json::Value>(&res.response) else {
            return Ok(ErrorResponse::from_status_code(res.status_code));
        };
        let response: checkout::CheckoutErrorResponse =
            serde_json::from_value(params.clone()).unwrap_or_default();
        let message = checkout::join_error(
            response.error_type.as_deref(),
            response.error_codes.as_deref(),
        );
        let code = response
            .error_codes
            .as_ref()
            .and_then(|codes| codes.first().cloned())
            .or(response.error_type)
            .unwrap_or_else(|| res.status_code.to_string());

        Ok(ErrorResponse {
            code,
            message: if message.is_empty() {
                res.status_code.to_string()
            } else {
                message
            },
            connector_transaction_id: response.request_id,
            params,
            ..ErrorResponse::from_status_code(res.status_code)
        })
    }
}

macros::create_all_prerequisites!(
    connector_name: Checkout,
    api: [
        (
            flow: Authorize,
            request_body: CheckoutPaymentsRequest,
            response_body: CheckoutPaymentsResponse,
            router_data: RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>
        ),
        (
            flow: Verify,
            request_body: CheckoutVerifyRequest,
            response_body: CheckoutVerifyResponse,
            router_data: RouterDataV2<Verify, PaymentFlowData, VerifyData, GatewayResponse>
        ),
        (
            flow: Capture,
            request_body: CheckoutCaptureRequest,
            response_body: CheckoutCaptureResponse,
            router_data: RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>
        ),
        (
            flow: Void,
            request_body: CheckoutVoidRequest,
            response_body: CheckoutVoidResponse,
            router_data: RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>
        ),
        (
            flow: Refund,
            request_body: CheckoutRefundRequest,
            response_body: CheckoutRefundResponse,
            router_data: RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>
        )
    ],
    amount_converters: [
        amount_converter: MinorUnit
    ],
    member_functions: {
        pub fn build_headers<F, Req: CheckoutIdempotency, Res>(
            &self,
            req: &RouterDataV2<F, PaymentFlowData, Req, Res>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            let mut header = vec![(
                headers::CONTENT_TYPE.to_string(),
                self.common_get_content_type().to_string().into(),
            )];
            header.extend(self.get_auth_header(&req.connector_auth_type)?);
            if let Some(key) = req.request.idempotency_key() {
                header.push((headers::IDEMPOTENCY_KEY.to_string(), key.to_string().into()));
            }
            Ok(header)
        }

        pub fn payment_url<F, Req, Res>(
            &self,
            req: &RouterDataV2<F, PaymentFlowData, Req, Res>,
            authorization: &str,
            action: &str,
        ) -> CustomResult<String, errors::ConnectorError> {
            let payment_id = require_authorization(authorization)?;
            Ok(format!(
                "{}payments/{payment_id}/{action}",
                self.base_url(
                    &req.resource_common_data.connectors,
                    req.resource_common_data.test_mode,
                )
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Checkout,
    curl_request: Json(CheckoutPaymentsRequest),
    curl_response: CheckoutPaymentsResponse,
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
            Ok(format!(
                "{}payments",
                self.base_url(&req.resource_common_data.connectors, req.resource_common_data.test_mode)
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Checkout,
    curl_request: Json(CheckoutVerifyRequest),
    curl_response: CheckoutVerifyResponse,
    flow_name: Verify,
    resource_common_data: PaymentFlowData,
    flow_request: VerifyData,
    flow_response: GatewayResponse,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Verify, PaymentFlowData, VerifyData, GatewayResponse>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!(
                "{}payments",
                self.base_url(&req.resource_common_data.connectors, req.resource_common_data.test_mode)
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Checkout,
    curl_request: Json(CheckoutCaptureRequest),
    curl_response: CheckoutCaptureResponse,
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
            self.payment_url(req, &req.request.authorization, "captures")
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Checkout,
    curl_request: Json(CheckoutVoidRequest),
    curl_response: CheckoutVoidResponse,
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
            self.payment_url(req, &req.request.authorization, "voids")
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Checkout,
    curl_request: Json(CheckoutRefundRequest),
    curl_response: CheckoutRefundResponse,
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
            self.payment_url(req, &req.request.authorization, "refunds")
        }
    }
);

impl
    ConnectorIntegrationV2<
        CreateAccessToken,
        PaymentFlowData,
        AccessTokenRequestData,
        AccessTokenResponseData,
    > for Checkout
{
}
impl
    ConnectorIntegrationV2<
        CreateOrder,
        PaymentFlowData,
        PaymentCreateOrderData,
        PaymentCreateOrderResponse,
    > for Checkout
{
}
impl ConnectorIntegrationV2<Store, PaymentFlowData, StoreData, GatewayResponse> for Checkout {}
impl ConnectorIntegrationV2<Unstore, PaymentFlowData, UnstoreData, GatewayResponse> for Checkout {}
