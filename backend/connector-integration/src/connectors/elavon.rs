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
    self as elavon, ElavonCaptureRequest, ElavonCaptureResponse, ElavonPaymentsRequest,
    ElavonPaymentsResponse, ElavonRefundRequest, ElavonRefundResponse, ElavonStoreRequest,
    ElavonStoreResponse, ElavonUnstoreRequest, ElavonUnstoreResponse, ElavonVerifyRequest,
    ElavonVerifyResponse, ElavonVoidRequest, ElavonVoidResponse,
};

use super::macros;
use crate::utils;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
}

const SENSITIVE_FIELDS: &str =
    "ssl_card_number|ssl_cvv2cvc2|ssl_pin|ssl_bank_account_number|ssl_account_number|ssl_3dsecure_value";

// Requests travel URL-encoded inside `xmldata`, responses come back as raw XML.
static SCRUB_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        format!(r"(?i)(%3C(?:{SENSITIVE_FIELDS})%3E).*?(%3C%2F(?:{SENSITIVE_FIELDS})%3E)"),
        format!(r"(<(?:{SENSITIVE_FIELDS})>)[^<]*(</(?:{SENSITIVE_FIELDS})>)"),
    ]
    .iter()
    .filter_map(|pattern| match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(error) => {
            tracing::error!(%pattern, %error, "invalid scrub pattern");
            None
        }
    })
    .collect()
});

impl connector_types::ConnectorServiceTrait for Elavon {}
impl connector_types::PaymentAccessToken for Elavon {}
impl connector_types::PaymentOrderCreate for Elavon {}
impl connector_types::PaymentAuthorizeV2 for Elavon {}
impl connector_types::PaymentCapture for Elavon {}
impl connector_types::PaymentVoidV2 for Elavon {}
impl connector_types::RefundV2 for Elavon {}
impl connector_types::PaymentVerifyV2 for Elavon {}
impl connector_types::PaymentMethodStore for Elavon {}
impl connector_types::PaymentMethodUnstore for Elavon {}

impl connector_types::ValidationTrait for Elavon {}

impl TranscriptScrubber for Elavon {
    fn scrub(&self, transcript: &str) -> String {
        SCRUB_PATTERNS
            .iter()
            .fold(transcript.to_string(), |scrubbed, pattern| {
                pattern
                    .replace_all(&scrubbed, "${1}[FILTERED]${2}")
                    .into_owned()
            })
    }
}

impl ConnectorCommon for Elavon {
    fn id(&self) -> &'static str {
        "elavon"
    }

    fn display_name(&self) -> &'static str {
        "Elavon MyVirtualMerchant"
    }

    fn common_get_content_type(&self) -> &'static str {
        "application/x-www-form-urlencoded"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, test_mode: bool) -> &'a str {
        connectors.elavon.url_for(test_mode)
    }

    fn response_format(&self) -> ResponseFormat {
        ResponseFormat::Xml
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let Ok(params) = utils::parse_response(ResponseFormat::Xml, &res.response) else {
            return Ok(ErrorResponse::from_status_code(res.status_code));
        };
        let txn: elavon::ElavonTxnResult = params
            .get("txn")
            .cloned()
            .and_then(|txn| serde_json::from_value(txn).ok())
            .unwrap_or_default();

        Ok(ErrorResponse {
            code: txn
                .error_code
                .unwrap_or_else(|| res.status_code.to_string()),
            message: txn
                .error_message
                .or(txn.ssl_result_message)
                .unwrap_or_else(|| res.status_code.to_string()),
            reason: txn.error_name,
            connector_transaction_id: txn.ssl_txn_id,
            params: elavon::response_params(&params),
            ..ErrorResponse::from_status_code(res.status_code)
        })
    }
}

macros::create_all_prerequisites!(
    connector_name: Elavon,
    api: [
        (
            flow: Authorize,
            request_body: ElavonPaymentsRequest,
            response_body: ElavonPaymentsResponse,
            router_data: RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>
        ),
        (
            flow: Capture,
            request_body: ElavonCaptureRequest,
            response_body: ElavonCaptureResponse,
            router_data: RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>
        ),
        (
            flow: Refund,
            request_body: ElavonRefundRequest,
            response_body: ElavonRefundResponse,
            router_data: RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>
        ),
        (
            flow: Void,
            request_body: ElavonVoidRequest,
            response_body: ElavonVoidResponse,
            router_data: RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>
        ),
        (
            flow: Verify,
            request_body: ElavonVerifyRequest,
            response_body: ElavonVerifyResponse,
            router_data: RouterDataV2<Verify, PaymentFlowData, VerifyData, GatewayResponse>
        ),
        (
            flow: Store,
            request_body: ElavonStoreRequest,
            response_body: ElavonStoreResponse,
            router_data: RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>
        ),
        (
            flow: Unstore,
            request_body: ElavonUnstoreRequest,
            response_body: ElavonUnstoreResponse,
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

        pub fn process_url<F, Req, Res>(
            &self,
            req: &RouterDataV2<F, PaymentFlowData, Req, Res>,
        ) -> String {
            format!(
                "{}processxml.do",
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
    connector: Elavon,
    curl_request: FormUrlEncoded(ElavonPaymentsRequest),
    curl_response: ElavonPaymentsResponse,
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
            Ok(self.process_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Elavon,
    curl_request: FormUrlEncoded(ElavonCaptureRequest),
    curl_response: ElavonCaptureResponse,
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
            Ok(self.process_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Elavon,
    curl_request: FormUrlEncoded(ElavonRefundRequest),
    curl_response: ElavonRefundResponse,
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
            Ok(self.process_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Elavon,
    curl_request: FormUrlEncoded(ElavonVoidRequest),
    curl_response: ElavonVoidResponse,
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
            Ok(self.process_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Elavon,
    curl_request: FormUrlEncoded(ElavonVerifyRequest),
    curl_response: ElavonVerifyResponse,
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
            Ok(self.process_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Elavon,
    curl_request: FormUrlEncoded(ElavonStoreRequest),
    curl_response: ElavonStoreResponse,
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
            Ok(self.process_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Elavon,
    curl_request: FormUrlEncoded(ElavonUnstoreRequest),
    curl_response: ElavonUnstoreResponse,
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
            Ok(self.process_url(req))
        }
    }
);

impl
    ConnectorIntegrationV2<
        CreateAccessToken,
        PaymentFlowData,
        AccessTokenRequestData,
        AccessTokenResponseData,
    > for Elavon
{
}
impl
    ConnectorIntegrationV2<
        CreateOrder,
        PaymentFlowData,
        PaymentCreateOrderData,
        PaymentCreateOrderResponse,
    > for Elavon
{
}
