use common_utils::CustomResult;
use domain_types::{
    connector_flow,
    connector_types::PaymentFlowData,
    errors::ConnectorError,
    router_request_types::{
        AccessTokenRequestData, AccessTokenResponseData, PaymentCreateOrderData,
        PaymentCreateOrderResponse, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData,
        RefundsData, StoreData, UnstoreData, VerifyData,
    },
    router_response_types::GatewayResponse,
};

use crate::{
    api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2,
    scrubbing::TranscriptScrubber,
};

pub trait ConnectorServiceTrait:
    ConnectorCommon
    + ValidationTrait
    + TranscriptScrubber
    + PaymentAccessToken
    + PaymentOrderCreate
    + PaymentAuthorizeV2
    + PaymentCapture
    + PaymentVoidV2
    + RefundV2
    + PaymentVerifyV2
    + PaymentMethodStore
    + PaymentMethodUnstore
{
}

pub type BoxedConnector = Box<&'static (dyn ConnectorServiceTrait + Sync)>;

/// Steps and checks the client runs around the core flows of a connector.
pub trait ValidationTrait {
    /// An access token is fetched before every flow.
    fn should_do_access_token(&self) -> bool {
        false
    }

    /// An order (payment intent) is created before authorize.
    fn should_do_order_create(&self) -> bool {
        false
    }

    /// `false` makes verify an authorize followed by a void.
    fn supports_native_verify(&self) -> bool {
        true
    }

    /// Checked before any request of a multi-step authorize is sent.
    fn validate_authorize_request(
        &self,
        _request: &PaymentsAuthorizeData,
    ) -> CustomResult<(), ConnectorError> {
        Ok(())
    }
}

pub trait PaymentAccessToken:
    ConnectorIntegrationV2<
    connector_flow::CreateAccessToken,
    PaymentFlowData,
    AccessTokenRequestData,
    AccessTokenResponseData,
>
{
}

pub trait PaymentOrderCreate:
    ConnectorIntegrationV2<
    connector_flow::CreateOrder,
    PaymentFlowData,
    PaymentCreateOrderData,
    PaymentCreateOrderResponse,
>
{
}

pub trait PaymentAuthorizeV2:
    ConnectorIntegrationV2<
    connector_flow::Authorize,
    PaymentFlowData,
    PaymentsAuthorizeData,
    GatewayResponse,
>
{
}

pub trait PaymentCapture:
    ConnectorIntegrationV2<connector_flow::Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>
{
}

pub trait PaymentVoidV2:
    ConnectorIntegrationV2<connector_flow::Void, PaymentFlowData, PaymentVoidData, GatewayResponse>
{
}

pub trait RefundV2:
    ConnectorIntegrationV2<connector_flow::Refund, PaymentFlowData, RefundsData, GatewayResponse>
{
}

pub trait PaymentVerifyV2:
    ConnectorIntegrationV2<connector_flow::Verify, PaymentFlowData, VerifyData, GatewayResponse>
{
}

pub trait PaymentMethodStore:
    ConnectorIntegrationV2<connector_flow::Store, PaymentFlowData, StoreData, GatewayResponse>
{
}

pub trait PaymentMethodUnstore:
    ConnectorIntegrationV2<connector_flow::Unstore, PaymentFlowData, UnstoreData, GatewayResponse>
{
}
