pub mod transformers;

use std::sync::LazyLock;

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
    self as nmi, NmiCaptureRequest, NmiCaptureResponse, NmiPaymentsRequest, NmiPaymentsResponse,
    NmiRefundRequest, NmiRefundResponse, NmiStoreRequest, NmiStoreResponse, NmiUnstoreRequest,
    NmiUnstoreResponse, NmiVerifyRequest, NmiVerifyResponse, NmiVoidRequest, NmiVoidResponse,
};

use super::macros;
use crate::utils;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
}

static SCRUB_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    utils::compile_scrub_patterns(&[(
        r"(\b(?:security_key|password|ccnumber|cvv|checkaba|checkaccount|cavv)=)[^&\s]*",
        "${1}[FILTERED]",
    )])
});

impl connector_types::ConnectorServiceTrait for Nmi {}
impl connector_types::PaymentAccessToken for Nmi {}
impl connector_types::PaymentOrderCreate for Nmi {}
impl connector_types::PaymentAuthorizeV2 for Nmi {}
impl connector_types::PaymentCapture for Nmi {}
impl connector_types::PaymentVoidV2 for Nmi {}
impl connector_types::RefundV2 for Nmi {}
impl connector_types::PaymentVerifyV2 for Nmi {}
impl connector_types::PaymentMethodStore for Nmi {}
impl connector_types::PaymentMethodUnstore for Nmi {}

impl connector_types::ValidationTrait for Nmi {}

impl TranscriptScrubber for Nmi {
    fn scrub(&self, transcript: &str) -> String {
        utils::scrub_transcript(transcript, &SCRUB_PATTERNS)
    }
}

impl ConnectorCommon for Nmi {
    fn id(&self) -> &'static str {
        "nmi"
    }

    fn display_name(&self) -> &'static str {
        "NMI"
    }

    fn common_get_content_type(&self) -> &'static str {
        "application/x-www-form-urlencoded"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, test_mode: bool) -> &'a str {
        connectors.nmi.url_for(test_mode)
    }

    fn response_format(&self) -> ResponseFormat {
        ResponseFormat::FormUrlEncoded
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let Ok(params) = utils::parse_response(ResponseFormat::FormUrlEncoded, &res.response)
        else {
            return Ok(ErrorResponse::from_status_code(res.status_code));
        };
        let response: nmi::NmiResponse =
            serde_json::from_value(params.clone()).unwrap_or_default();

        Ok(ErrorResponse {
            code: response
                .response_code
                .filter(|code| !code.is_empty())
                .unwrap_or_else(|| res.status_code.to_string()),
            message: response
                .responsetext
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| res.status_code.to_string()),
            connector_transaction_id: response.transactionid.filter(|id| !id.is_empty()),
            params,
            ..ErrorResponse::from_status_code(res.status_code)
        })
    }
}

macros::create_all_prerequisites!(
    connector_name: Nmi,
    api: [
        (
            flow: Authorize,
            request_body: NmiPaymentsRequest,
            response_body: NmiPaymentsResponse,
            router_data: RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>
        ),
        (
            flow: Capture,
            request_body: NmiCaptureRequest,
            response_body: NmiCaptureResponse,
            router_data: RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>
        ),
        (
            flow: Refund,
            request_body: NmiRefundRequest,
            response_body: NmiRefundResponse,
            router_data: RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>
        ),
        (
            flow: Void,
            request_body: NmiVoidRequest,
            response_body: NmiVoidResponse,
            router_data: RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>
        ),
        (
            flow: Verify,
            request_body: NmiVerifyRequest,
            response_body: NmiVerifyResponse,
            router_data: RouterDataV2<Verify, PaymentFlowData, VerifyData, GatewayResponse>
        ),
        (
            flow: Store,
            request_body: NmiStoreRequest,
            response_body: NmiStoreResponse,
            router_data: RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>
        ),
        (
            flow: Unstore,
            request_body: NmiUnstoreRequest,
            response_body: NmiUnstoreResponse,
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

        pub fn transact_url<F, Req, Res>(
            &self,
            req: &RouterDataV2<F, PaymentFlowData, Req, Res>,
        ) -> String {
            format!(
                "{}api/transact.php",
                self.base_url(
                    &req.resource_common_data.connectors,
                    req.resource_common_data.test_mode,
                )
            )
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiPaymentsRequest),
    curl_response: NmiPaymentsResponse,
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
            Ok(self.transact_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiCaptureRequest),
    curl_response: NmiCaptureResponse,
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
            Ok(self.transact_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiRefundRequest),
    curl_response: NmiRefundResponse,
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
            Ok(self.transact_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiVoidRequest),
    curl_response: NmiVoidResponse,
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
            Ok(self.transact_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiVerifyRequest),
    curl_response: NmiVerifyResponse,
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
            Ok(self.transact_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiStoreRequest),
    curl_response: NmiStoreResponse,
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
            Ok(self.transact_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiUnstoreRequest),
    curl_response: NmiUnstoreResponse,
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
            Ok(self.transact_url(req))
        }
    }
);

impl
    ConnectorIntegrationV2<
        CreateAccessToken,
        PaymentFlowData,
        AccessTokenRequestData,
        AccessTokenResponseData,
    > for Nmi
{
}
impl
    ConnectorIntegrationV2<
        CreateOrder,
        PaymentFlowData,
        PaymentCreateOrderData,
        PaymentCreateOrderResponse,
    > for Nmi
{
}
