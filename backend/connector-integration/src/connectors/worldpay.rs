pub mod transformers;

use std::sync::LazyLock;

use base64::Engine;
use common_enums::ResponseFormat;
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
};
use hyperswitch_masking::{Mask, Maskable, PeekInterface};
use interfaces::{
    api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2, connector_types,
    scrubbing::TranscriptScrubber,
};
use regex::Regex;
use transformers::{
    self as worldpay, WorldpayCaptureRequest, WorldpayCaptureResponse, WorldpayPaymentsRequest,
    WorldpayPaymentsResponse, WorldpayRefundRequest, WorldpayRefundResponse, WorldpayVoidRequest,
    WorldpayVoidResponse,
};

use super::macros;
use crate::utils;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const AUTHORIZATION: &str = "Authorization";
}

pub const BASE64_ENGINE: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

static SCRUB_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    utils::compile_scrub_patterns(&[
        (r"(?im)(Authorization:[ \t]*Basic[ \t]+)[^\r\n]*", "${1}[FILTERED]"),
        (r"(<cardNumber>)[^<]*(</cardNumber>)", "${1}[FILTERED]${2}"),
        (r"(<cvc>)[^<]*(</cvc>)", "${1}[FILTERED]${2}"),
        (r"(<tokenNumber>)[^<]*(</tokenNumber>)", "${1}[FILTERED]${2}"),
        (r"(<cryptogram>)[^<]*(</cryptogram>)", "${1}[FILTERED]${2}"),
        (r"(<cavv>)[^<]*(</cavv>)", "${1}[FILTERED]${2}"),
    ])
});

impl connector_types::ConnectorServiceTrait for Worldpay {}
impl connector_types::PaymentAccessToken for Worldpay {}
impl connector_types::PaymentOrderCreate for Worldpay {}
impl connector_types::PaymentAuthorizeV2 for Worldpay {}
impl connector_types::PaymentCapture for Worldpay {}
impl connector_types::PaymentVoidV2 for Worldpay {}
impl connector_types::RefundV2 for Worldpay {}
impl connector_types::PaymentVerifyV2 for Worldpay {}
impl connector_types::PaymentMethodStore for Worldpay {}
impl connector_types::PaymentMethodUnstore for Worldpay {}

impl connector_types::ValidationTrait for Worldpay {
    fn supports_native_verify(&self) -> bool {
        false
    }

    fn validate_authorize_request(
        &self,
        request: &PaymentsAuthorizeData,
    ) -> CustomResult<(), errors::ConnectorError> {
        worldpay::order_code(&request.options)?;
        Ok(())
    }
}

impl TranscriptScrubber for Worldpay {
    fn scrub(&self, transcript: &str) -> String {
        utils::scrub_transcript(transcript, &SCRUB_PATTERNS)
    }
}

impl ConnectorCommon for Worldpay {
    fn id(&self) -> &'static str {
        "worldpay"
    }

    fn display_name(&self) -> &'static str {
        "Worldpay Global"
    }

    fn common_get_content_type(&self) -> &'static str {
        "text/xml"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, test_mode: bool) -> &'a str {
        connectors.worldpay.url_for(test_mode)
    }

    fn response_format(&self) -> ResponseFormat {
        ResponseFormat::Xml
    }

    fn get_auth_header(
        &self,
        auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        let auth = worldpay::WorldpayAuthType::try_from(auth_type)?;
        let credentials = BASE64_ENGINE.encode(format!(
            "{}:{}",
            auth.username.peek(),
            auth.password.peek()
        ));
        Ok(vec![(
            headers::AUTHORIZATION.to_string(),
            format!("Basic {credentials}").into_masked(),
        )])
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let Ok(params) = utils::parse_response(ResponseFormat::Xml, &res.response) else {
            return Ok(ErrorResponse::from_status_code(res.status_code));
        };
        let reply: worldpay::Reply = params
            .get("paymentService")
            .and_then(|service| service.get("reply"))
            .cloned()
            .and_then(|reply| serde_json::from_value(reply).ok())
            .unwrap_or_default();

        Ok(ErrorResponse {
            code: reply
                .error_code()
                .unwrap_or_else(|| res.status_code.to_string()),
            message: reply
                .error_message()
                .unwrap_or_else(|| res.status_code.to_string()),
            connector_transaction_id: reply.order_status.and_then(|status| status.order_code),
            params,
            ..ErrorResponse::from_status_code(res.status_code)
        })
    }
}

macros::create_all_prerequisites!(
    connector_name: Worldpay,
    api: [
        (
            flow: Authorize,
            request_body: WorldpayPaymentsRequest,
            response_body: WorldpayPaymentsResponse,
            router_data: RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>
        ),
        (
            flow: Capture,
            request_body: WorldpayCaptureRequest,
            response_body: WorldpayCaptureResponse,
            router_data: RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>
        ),
        (
            flow: Refund,
            request_body: WorldpayRefundRequest,
            response_body: WorldpayRefundResponse,
            router_data: RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>
        ),
        (
            flow: Void,
            request_body: WorldpayVoidRequest,
            response_body: WorldpayVoidResponse,
            router_data: RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>
        )
    ],
    amount_converters: [
        amount_converter: MinorUnit
    ],
    member_functions: {
        pub fn build_headers<F, Req, Res>(
            &self,
            req: &RouterDataV2<F, PaymentFlowData, Req, Res>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            let mut header = vec![(
                headers::CONTENT_TYPE.to_string(),
                self.common_get_content_type().to_string().into(),
            )];
            header.extend(self.get_auth_header(&req.connector_auth_type)?);
            Ok(header)
        }

        pub fn service_url<F, Req, Res>(
            &self,
            req: &RouterDataV2<F, PaymentFlowData, Req, Res>,
        ) -> String {
            self.base_url(
                &req.resource_common_data.connectors,
                req.resource_common_data.test_mode,
            )
            .to_string()
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Worldpay,
    curl_request: Xml(WorldpayPaymentsRequest),
    curl_response: WorldpayPaymentsResponse,
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
            Ok(self.service_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Worldpay,
    curl_request: Xml(WorldpayCaptureRequest),
    curl_response: WorldpayCaptureResponse,
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
            Ok(self.service_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Worldpay,
    curl_request: Xml(WorldpayRefundRequest),
    curl_response: WorldpayRefundResponse,
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
            Ok(self.service_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Worldpay,
    curl_request: Xml(WorldpayVoidRequest),
    curl_response: WorldpayVoidResponse,
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
            Ok(self.service_url(req))
        }
    }
);

impl
    ConnectorIntegrationV2<
        CreateAccessToken,
        PaymentFlowData,
        AccessTokenRequestData,
        AccessTokenResponseData,
    > for Worldpay
{
}
impl
    ConnectorIntegrationV2<
        CreateOrder,
        PaymentFlowData,
        PaymentCreateOrderData,
        PaymentCreateOrderResponse,
    > for Worldpay
{
}
// Stored credentials are not supported. Verify authorizes and then cancels.
impl ConnectorIntegrationV2<Verify, PaymentFlowData, VerifyData, GatewayResponse> for Worldpay {}
impl ConnectorIntegrationV2<Store, PaymentFlowData, StoreData, GatewayResponse> for Worldpay {}
impl ConnectorIntegrationV2<Unstore, PaymentFlowData, UnstoreData, GatewayResponse> for Worldpay {}

#[cfg(test)]
mod test;
