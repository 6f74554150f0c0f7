pub mod transformers;

use std::sync::LazyLock;

use bytes::Bytes;
use common_enums::ResponseFormat;
use common_utils::{errors::CustomResult, StringMajorUnit};
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
    self as authorizedotnet, AuthorizeDotNetCaptureRequest, AuthorizeDotNetCaptureResponse,
    AuthorizeDotNetPaymentsRequest, AuthorizeDotNetPaymentsResponse, AuthorizeDotNetRefundRequest,
    AuthorizeDotNetRefundResponse, AuthorizeDotNetStoreRequest, AuthorizeDotNetStoreResponse,
    AuthorizeDotNetUnstoreRequest, AuthorizeDotNetUnstoreResponse, AuthorizeDotNetVoidRequest,
    AuthorizeDotNetVoidResponse,
};

use super::macros;
use crate::utils;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

static SCRUB_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    utils::compile_scrub_patterns(&[
        (r"(<cardNumber>)[^<]*(</cardNumber>)", "${1}[FILTERED]${2}"),
        (r"(<cardCode>)[^<]*(</cardCode>)", "${1}[FILTERED]${2}"),
        (r"(<transactionKey>)[^<]*(</transactionKey>)", "${1}[FILTERED]${2}"),
        (r"(<accountNumber>)[^<]*(</accountNumber>)", "${1}[FILTERED]${2}"),
        (r"(<routingNumber>)[^<]*(</routingNumber>)", "${1}[FILTERED]${2}"),
        (r"(<cryptogram>)[^<]*(</cryptogram>)", "${1}[FILTERED]${2}"),
    ])
});

impl connector_types::ConnectorServiceTrait for AuthorizeDotNet {}
impl connector_types::PaymentAccessToken for AuthorizeDotNet {}
impl connector_types::PaymentOrderCreate for AuthorizeDotNet {}
impl connector_types::PaymentAuthorizeV2 for AuthorizeDotNet {}
impl connector_types::PaymentCapture for AuthorizeDotNet {}
impl connector_types::PaymentVoidV2 for AuthorizeDotNet {}
impl connector_types::RefundV2 for AuthorizeDotNet {}
impl connector_types::PaymentVerifyV2 for AuthorizeDotNet {}
impl connector_types::PaymentMethodStore for AuthorizeDotNet {}
impl connector_types::PaymentMethodUnstore for AuthorizeDotNet {}

impl connector_types::ValidationTrait for AuthorizeDotNet {
    fn supports_native_verify(&self) -> bool {
        false
    }
}

impl TranscriptScrubber for AuthorizeDotNet {
    fn scrub(&self, transcript: &str) -> String {
        utils::scrub_transcript(transcript, &SCRUB_PATTERNS)
    }
}

impl ConnectorCommon for AuthorizeDotNet {
    fn id(&self) -> &'static str {
        "authorizedotnet"
    }

    fn display_name(&self) -> &'static str {
        "Authorize.Net"
    }

    fn common_get_content_type(&self) -> &'static str {
        "text/xml"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, test_mode: bool) -> &'a str {
        connectors.authorizedotnet.url_for(test_mode)
    }

    fn response_format(&self) -> ResponseFormat {
        ResponseFormat::Xml
    }

    // Responses may start with a byte order mark.
    fn preprocess_response_bytes(
        &self,
        response_bytes: Bytes,
    ) -> CustomResult<Bytes, errors::ConnectorError> {
        if response_bytes.starts_with(UTF8_BOM) {
            Ok(response_bytes.slice(UTF8_BOM.len()..))
        } else {
            Ok(response_bytes)
        }
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let body = self.preprocess_response_bytes(res.response)?;
        let Ok(params) = utils::parse_response(ResponseFormat::Xml, &body) else {
            return Ok(ErrorResponse::from_status_code(res.status_code));
        };
        let message = authorizedotnet::first_root_message(&params).unwrap_or_default();

        Ok(ErrorResponse {
            code: message
                .code
                .unwrap_or_else(|| res.status_code.to_string()),
            message: message
                .text
                .unwrap_or_else(|| res.status_code.to_string()),
            params,
            ..ErrorResponse::from_status_code(res.status_code)
        })
    }
}

macros::create_all_prerequisites!(
    connector_name: AuthorizeDotNet,
    api: [
        (
            flow: Authorize,
            request_body: AuthorizeDotNetPaymentsRequest,
            response_body: AuthorizeDotNetPaymentsResponse,
            router_data: RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>
        ),
        (
            flow: Capture,
            request_body: AuthorizeDotNetCaptureRequest,
            response_body: AuthorizeDotNetCaptureResponse,
            router_data: RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>
        ),
        (
            flow: Void,
            request_body: AuthorizeDotNetVoidRequest,
            response_body: AuthorizeDotNetVoidResponse,
            router_data: RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>
        ),
        (
            flow: Refund,
            request_body: AuthorizeDotNetRefundRequest,
            response_body: AuthorizeDotNetRefundResponse,
            router_data: RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>
        ),
        (
            flow: Store,
            request_body: AuthorizeDotNetStoreRequest,
            response_body: AuthorizeDotNetStoreResponse,
            router_data: RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>
        ),
        (
            flow: Unstore,
            request_body: AuthorizeDotNetUnstoreRequest,
            response_body: AuthorizeDotNetUnstoreResponse,
            router_data: RouterDataV2<Unstore, PaymentFlowData, UnstoreData, GatewayResponse>
        )
    ],
    amount_converters: [
        amount_converter: StringMajorUnit
    ],
    member_functions: {
        pub fn build_headers<F, Req, Res>(
            &self,
            _req: &RouterDataV2<F, PaymentFlowData, Req, Res>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            Ok(vec![(
                headers::CONTENT_TYPE.to_string(),
                self.common_get_content_type().to_string().into(),
            )])
        }

        pub fn connector_base_url<F, Req, Res>(
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
    connector: AuthorizeDotNet,
    curl_request: Xml(AuthorizeDotNetPaymentsRequest),
    curl_response: AuthorizeDotNetPaymentsResponse,
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
            Ok(self.connector_base_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: AuthorizeDotNet,
    curl_request: Xml(AuthorizeDotNetCaptureRequest),
    curl_response: AuthorizeDotNetCaptureResponse,
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
            Ok(self.connector_base_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: AuthorizeDotNet,
    curl_request: Xml(AuthorizeDotNetVoidRequest),
    curl_response: AuthorizeDotNetVoidResponse,
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
            Ok(self.connector_base_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: AuthorizeDotNet,
    curl_request: Xml(AuthorizeDotNetRefundRequest),
    curl_response: AuthorizeDotNetRefundResponse,
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
            Ok(self.connector_base_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: AuthorizeDotNet,
    curl_request: Xml(AuthorizeDotNetStoreRequest),
    curl_response: AuthorizeDotNetStoreResponse,
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
            Ok(self.connector_base_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: AuthorizeDotNet,
    curl_request: Xml(AuthorizeDotNetUnstoreRequest),
    curl_response: AuthorizeDotNetUnstoreResponse,
    flow_name: Unstore,
    resource_common_data: PaymentFlowData,
    flow_request: UnstoreData,
    flow_response: GatewayResponse,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Unstore, PaymentFlowData, UnstoreData, GatewayResponse>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.connector_base_url(req))
        }
    }
);

impl
    ConnectorIntegrationV2<
        CreateAccessToken,
        PaymentFlowData,
        AccessTokenRequestData,
        AccessTokenResponseData,
    > for AuthorizeDotNet
{
}
impl
    ConnectorIntegrationV2<
        CreateOrder,
        PaymentFlowData,
        PaymentCreateOrderData,
        PaymentCreateOrderResponse,
    > for AuthorizeDotNet
{
}
// Verify runs as a 1.00 authorization followed by a void.
impl ConnectorIntegrationV2<Verify, PaymentFlowData, VerifyData, GatewayResponse>
    for AuthorizeDotNet
{
}
