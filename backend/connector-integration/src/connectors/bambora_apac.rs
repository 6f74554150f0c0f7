pub mod transformers;

use std::sync::LazyLock;

use bytes::Bytes;
use common_enums::ResponseFormat;
use common_utils::{errors::CustomResult, MinorUnit};
use domain_types::{
    connector_flow::{
        Authorize, Capture, CreateAccessToken, CreateOrder, Refund, Store, Unstore, Verify, Void,
    },
    connector_types::PaymentFlowData,
    errors,
    router_data::ErrorResponse,
    router_data_v2::RouterDataV2,
    router_request_types::{
        AccessTokenRequestData, AccessTokenResponseData, PaymentCreateOrderData,
        PaymentCreateOrderResponse, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData,
        RefundsData, StoreData, UnstoreData, VerifyData,
    },
    router_response_types::{GatewayResponse, Response},
    types::Connectors,
};
use hyperswitch_masking::Maskable;
use interfaces::{
    api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2, connector_types,
    scrubbing::TranscriptScrubber,
};
use regex::Regex;
use transformers::{
    self as bambora_apac, BamboraApacCaptureRequest, BamboraApacCaptureResponse,
    BamboraApacOperation, BamboraApacPaymentsRequest, BamboraApacPaymentsResponse,
    BamboraApacRefundRequest, BamboraApacRefundResponse, BamboraApacStoreRequest,
    BamboraApacStoreResponse, BamboraApacVoidRequest, BamboraApacVoidResponse,
};

use super::macros;
use crate::utils;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const SOAP_ACTION: &str = "SOAPAction";
}

static SCRUB_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    utils::compile_scrub_patterns(&[
        (r"(<CardNumber>)[^<]*(</CardNumber>)", "${1}[FILTERED]${2}"),
        (r"(<CVN>)[^<]*(</CVN>)", "${1}[FILTERED]${2}"),
        (r"(<Password>)[^<]*(</Password>)", "${1}[FILTERED]${2}"),
    ])
});

impl connector_types::ConnectorServiceTrait for BamboraApac {}
impl connector_types::PaymentAccessToken for BamboraApac {}
impl connector_types::PaymentOrderCreate for BamboraApac {}
impl connector_types::PaymentAuthorizeV2 for BamboraApac {}
impl connector_types::PaymentCapture for BamboraApac {}
impl connector_types::PaymentVoidV2 for BamboraApac {}
impl connector_types::RefundV2 for BamboraApac {}
impl connector_types::PaymentVerifyV2 for BamboraApac {}
impl connector_types::PaymentMethodStore for BamboraApac {}
impl connector_types::PaymentMethodUnstore for BamboraApac {}

impl connector_types::ValidationTrait for BamboraApac {
    fn supports_native_verify(&self) -> bool {
        false
    }
}

impl TranscriptScrubber for BamboraApac {
    fn scrub(&self, transcript: &str) -> String {
        utils::scrub_transcript(transcript, &SCRUB_PATTERNS)
    }
}

impl ConnectorCommon for BamboraApac {
    fn id(&self) -> &'static str {
        "bambora_apac"
    }

    fn display_name(&self) -> &'static str {
        "Bambora Asia-Pacific"
    }

    fn common_get_content_type(&self) -> &'static str {
        "text/xml; charset=utf-8"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, test_mode: bool) -> &'a str {
        connectors.bambora_apac.url_for(test_mode)
    }

    fn response_format(&self) -> ResponseFormat {
        ResponseFormat::Xml
    }

    // The operation result is an escaped XML document inside the SOAP body.
    fn preprocess_response_bytes(
        &self,
        response_bytes: Bytes,
    ) -> CustomResult<Bytes, errors::ConnectorError> {
        utils::unwrap_soap_result(&response_bytes)
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let Ok(params) = utils::parse_response(ResponseFormat::Xml, &res.response) else {
            return Ok(ErrorResponse::from_status_code(res.status_code));
        };
        let fault = bambora_apac::soap_fault(&params).unwrap_or_default();

        Ok(ErrorResponse {
            code: fault.code.unwrap_or_else(|| res.status_code.to_string()),
            message: fault
                .message
                .unwrap_or_else(|| res.status_code.to_string()),
            params,
            ..ErrorResponse::from_status_code(res.status_code)
        })
    }
}

macros::create_all_prerequisites!(
    connector_name: BamboraApac,
    api: [
        (
            flow: Authorize,
            request_body: BamboraApacPaymentsRequest,
            response_body: BamboraApacPaymentsResponse,
            router_data: RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>
        ),
        (
            flow: Capture,
            request_body: BamboraApacCaptureRequest,
            response_body: BamboraApacCaptureResponse,
            router_data: RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>
        ),
        (
            flow: Void,
            request_body: BamboraApacVoidRequest,
            response_body: BamboraApacVoidResponse,
            router_data: RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>
        ),
        (
            flow: Refund,
            request_body: BamboraApacRefundRequest,
            response_body: BamboraApacRefundResponse,
            router_data: RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>
        ),
        (
            flow: Store,
            request_body: BamboraApacStoreRequest,
            response_body: BamboraApacStoreResponse,
            router_data: RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>
        )
    ],
    amount_converters: [
        amount_converter: MinorUnit
    ],
    member_functions: {
        pub fn build_headers<F, Req: BamboraApacOperation, Res>(
            &self,
            _req: &RouterDataV2<F, PaymentFlowData, Req, Res>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            Ok(vec![
                (
                    headers::CONTENT_TYPE.to_string(),
                    self.common_get_content_type().to_string().into(),
                ),
                (
                    headers::SOAP_ACTION.to_string(),
                    Req::OPERATION.soap_action().into(),
                ),
            ])
        }

        pub fn operation_url<F, Req: BamboraApacOperation, Res>(
            &self,
            req: &RouterDataV2<F, PaymentFlowData, Req, Res>,
        ) -> String {
            format!(
                "{}{}",
                self.base_url(
                    &req.resource_common_data.connectors,
                    req.resource_common_data.test_mode,
                ),
                Req::OPERATION.endpoint()
            )
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: BamboraApac,
    curl_request: Xml(BamboraApacPaymentsRequest),
    curl_response: BamboraApacPaymentsResponse,
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
            Ok(self.operation_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: BamboraApac,
    curl_request: Xml(BamboraApacCaptureRequest),
    curl_response: BamboraApacCaptureResponse,
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
            Ok(self.operation_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: BamboraApac,
    curl_request: Xml(BamboraApacVoidRequest),
    curl_response: BamboraApacVoidResponse,
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
            Ok(self.operation_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: BamboraApac,
    curl_request: Xml(BamboraApacRefundRequest),
    curl_response: BamboraApacRefundResponse,
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
            Ok(self.operation_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: BamboraApac,
    curl_request: Xml(BamboraApacStoreRequest),
    curl_response: BamboraApacStoreResponse,
    flow_name: Store,
    resource_common_data: PaymentFlowData,
    flow_request: StoreData,
    flow_response: GatewayResponse,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.operation_url(req))
        }
    }
);

impl
    ConnectorIntegrationV2<
        CreateAccessToken,
        PaymentFlowData,
        AccessTokenRequestData,
        AccessTokenResponseData,
    > for BamboraApac
{
}
impl
    ConnectorIntegrationV2<
        CreateOrder,
        PaymentFlowData,
        PaymentCreateOrderData,
        PaymentCreateOrderResponse,
    > for BamboraApac
{
}
// Verify runs as a 1.00 authorization followed by a void.
impl ConnectorIntegrationV2<Verify, PaymentFlowData, VerifyData, GatewayResponse> for BamboraApac {}
impl ConnectorIntegrationV2<Unstore, PaymentFlowData, UnstoreData, GatewayResponse> for BamboraApac {}

#[cfg(test)]
mod test;
