use std::{ops::ControlFlow, sync::Arc};

use common_enums::CaptureMethod;
use common_utils::{fp_utils, CustomResult, MinorUnit};
use connector_integration::types::{ConnectorData, ConnectorEnum};
use domain_types::{
    connector_flow::{
        Authorize, Capture, CreateAccessToken, CreateOrder, Refund, Store, Unstore, Verify, Void,
    },
    connector_types::PaymentFlowData,
    errors::ConnectorError,
    payment_method_data::PaymentMethod,
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    router_request_types::{
        AccessTokenRequestData, FollowUpOptions, PaymentCreateOrderData, PaymentVoidData,
        PaymentsAuthorizeData, PaymentsCaptureData, RefundsData, StoreData, TransactionOptions,
        UnstoreData, VerifyData,
    },
    router_response_types::GatewayResponse,
    utils,
};
use error_stack::Report;
use external_services::service::{
    execute_connector_processing_step, HttpTransport, InvalidResponseFallback,
};
use interfaces::{
    connector_integration_v2::ConnectorIntegrationV2, connector_types::ConnectorServiceTrait,
    transport::ConnectorTransport,
};

use crate::configs::GatewayConfig;

type Connector = dyn ConnectorServiceTrait + Sync;

pub type GatewayResult = CustomResult<GatewayResponse, ConnectorError>;

/// Amount authorized, then voided, by `verify` on gateways without a native verify.
const VERIFY_AMOUNT: i64 = 100;

/// One gateway bound to one set of credentials.
///
/// Every operation is a sequence of awaited transport calls. Validation failures are returned as
/// errors before anything is sent; gateway-reported failures are `Ok` results with `success`
/// unset.
pub struct GatewayClient {
    connector: ConnectorData,
    auth: ConnectorAuthType,
    config: GatewayConfig,
    transport: Arc<dyn ConnectorTransport>,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("connector", &self.connector.connector_name)
            .field("auth", &self.auth.get_masked_keys())
            .field("test_mode", &self.config.test_mode)
            .finish()
    }
}

impl GatewayClient {
    pub fn new(connector: ConnectorEnum, auth: ConnectorAuthType, config: GatewayConfig) -> Self {
        let transport = Arc::new(HttpTransport::new(config.proxy.clone()));
        Self {
            connector: ConnectorData::get_connector_by_name(&connector),
            auth,
            config,
            transport,
        }
    }

    /// Replaces the HTTP transport, e.g. with a recording one in tests.
    pub fn with_transport(mut self, transport: Arc<dyn ConnectorTransport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn connector_name(&self) -> ConnectorEnum {
        self.connector.connector_name
    }

    fn connector(&self) -> &'static Connector {
        *self.connector.connector
    }

    /// Authorizes and captures `amount` in one step.
    pub async fn purchase(
        &self,
        amount: MinorUnit,
        payment_method: PaymentMethod,
        options: TransactionOptions,
    ) -> GatewayResult {
        let options = TransactionOptions {
            capture_method: Some(CaptureMethod::Automatic),
            ..options
        };
        self.authorize_payment(amount, payment_method, options).await
    }

    /// Holds `amount` for a later [`Self::capture`].
    pub async fn authorize(
        &self,
        amount: MinorUnit,
        payment_method: PaymentMethod,
        options: TransactionOptions,
    ) -> GatewayResult {
        let options = TransactionOptions {
            capture_method: Some(CaptureMethod::Manual),
            ..options
        };
        self.authorize_payment(amount, payment_method, options).await
    }

    pub async fn capture(
        &self,
        amount: MinorUnit,
        authorization: &str,
        options: FollowUpOptions,
    ) -> GatewayResult {
        let authorization = utils::require_authorization(authorization)?;
        let flow_data = self.flow_data(options.request_id.as_deref());
        let request = PaymentsCaptureData {
            amount,
            authorization: authorization.to_string(),
            options,
        };
        self.follow_up::<Capture, _>(flow_data, request, "capture")
            .await
    }

    pub async fn refund(
        &self,
        amount: MinorUnit,
        authorization: &str,
        options: FollowUpOptions,
    ) -> GatewayResult {
        let authorization = utils::require_authorization(authorization)?;
        let flow_data = self.flow_data(options.request_id.as_deref());
        let request = RefundsData {
            amount,
            authorization: authorization.to_string(),
            options,
        };
        self.follow_up::<Refund, _>(flow_data, request, "refund").await
    }

    pub async fn void(&self, authorization: &str, options: FollowUpOptions) -> GatewayResult {
        let authorization = utils::require_authorization(authorization)?;
        let flow_data = self.flow_data(options.request_id.as_deref());
        let request = PaymentVoidData {
            authorization: authorization.to_string(),
            options,
        };
        self.follow_up::<Void, _>(flow_data, request, "void").await
    }

    /// Checks the payment method without moving funds.
    ///
    /// Gateways without a native verify authorize a small amount and void it. The result is the
    /// authorization's; a failed void is only logged.
    pub async fn verify(
        &self,
        payment_method: PaymentMethod,
        options: TransactionOptions,
    ) -> GatewayResult {
        let connector = self.connector();
        let flow_data = self.flow_data(options.request_id.as_deref());

        if connector.supports_native_verify() {
            let request = VerifyData {
                payment_method,
                options,
            };
            return self.follow_up::<Verify, _>(flow_data, request, "verify").await;
        }

        let currency = options.currency;
        let request = PaymentsAuthorizeData {
            amount: MinorUnit::new(VERIFY_AMOUNT),
            payment_method,
            options: TransactionOptions {
                capture_method: Some(CaptureMethod::Manual),
                ..options
            },
        };
        connector.validate_authorize_request(&request)?;

        let flow_data = match self.with_access_token(flow_data).await? {
            ControlFlow::Continue(flow_data) => flow_data,
            ControlFlow::Break(response) => return Ok(response),
        };
        let (flow_data, authorization) = self.authorize_with(flow_data, request).await?;

        let Some(authorized) = authorization
            .authorization()
            .filter(|_| authorization.is_success())
            .map(str::to_string)
        else {
            return Ok(authorization);
        };

        let void = PaymentVoidData {
            authorization: authorized,
            options: FollowUpOptions {
                amount: Some(MinorUnit::new(VERIFY_AMOUNT)),
                currency,
                ..Default::default()
            },
        };
        match self.run::<Void, _, _>(flow_data, void, "void").await {
            Ok(router_data) => {
                let voided = self.finish(router_data);
                if !voided.is_success() {
                    tracing::warn!(
                        connector = connector.id(),
                        message = %voided.message(),
                        "void after verify authorization failed"
                    );
                }
            }
            Err(error) => {
                tracing::warn!(
                    connector = connector.id(),
                    ?error,
                    "void after verify authorization could not be sent"
                );
            }
        }
        Ok(authorization)
    }

    /// Vaults the payment method; the result's authorization references it.
    pub async fn store(
        &self,
        payment_method: PaymentMethod,
        options: TransactionOptions,
    ) -> GatewayResult {
        let flow_data = self.flow_data(options.request_id.as_deref());
        let request = StoreData {
            payment_method,
            options,
        };
        self.follow_up::<Store, _>(flow_data, request, "store").await
    }

    pub async fn unstore(&self, authorization: &str, options: FollowUpOptions) -> GatewayResult {
        let authorization = utils::require_authorization(authorization)?;
        let flow_data = self.flow_data(options.request_id.as_deref());
        let request = UnstoreData {
            authorization: authorization.to_string(),
            options,
        };
        self.follow_up::<Unstore, _>(flow_data, request, "unstore")
            .await
    }

    pub fn supports_scrubbing(&self) -> bool {
        self.connector().supports_scrubbing()
    }

    pub fn scrub(&self, transcript: &str) -> String {
        self.connector().scrub(transcript)
    }

    async fn authorize_payment(
        &self,
        amount: MinorUnit,
        payment_method: PaymentMethod,
        options: TransactionOptions,
    ) -> GatewayResult {
        let request = PaymentsAuthorizeData {
            amount,
            payment_method,
            options,
        };
        self.connector().validate_authorize_request(&request)?;

        let flow_data = self.flow_data(request.options.request_id.as_deref());
        let flow_data = match self.with_access_token(flow_data).await? {
            ControlFlow::Continue(flow_data) => flow_data,
            ControlFlow::Break(response) => return Ok(response),
        };
        let (_, response) = self.authorize_with(flow_data, request).await?;
        Ok(response)
    }

    /// Creates the gateway order when required, then authorizes against it.
    async fn authorize_with(
        &self,
        flow_data: PaymentFlowData,
        request: PaymentsAuthorizeData,
    ) -> CustomResult<(PaymentFlowData, GatewayResponse), ConnectorError> {
        let flow_data = if self.connector().should_do_order_create() {
            let order = PaymentCreateOrderData {
                amount: request.amount,
                currency: request.currency(),
                options: request.options.clone(),
            };
            let router_data = self
                .run::<CreateOrder, _, _>(flow_data, order, "create_order")
                .await?;
            if let Err(error) = router_data.response {
                let test_mode = router_data.resource_common_data.test_mode;
                return Ok((
                    router_data.resource_common_data,
                    failed_response(error, test_mode),
                ));
            }
            router_data.resource_common_data
        } else {
            flow_data
        };

        let router_data = self
            .run::<Authorize, _, _>(flow_data, request, "authorize")
            .await?;
        let flow_data = router_data.resource_common_data.clone();
        Ok((flow_data, self.finish(router_data)))
    }

    async fn follow_up<F, Req>(
        &self,
        flow_data: PaymentFlowData,
        request: Req,
        operation: &'static str,
    ) -> GatewayResult
    where
        Connector: ConnectorIntegrationV2<F, PaymentFlowData, Req, GatewayResponse>,
        F: Clone,
        Req: Clone,
    {
        let flow_data = match self.with_access_token(flow_data).await? {
            ControlFlow::Continue(flow_data) => flow_data,
            ControlFlow::Break(response) => return Ok(response),
        };
        let router_data = self.run::<F, _, _>(flow_data, request, operation).await?;
        Ok(self.finish(router_data))
    }

    /// Fetches an access token for gateways that need one on every call.
    async fn with_access_token(
        &self,
        flow_data: PaymentFlowData,
    ) -> CustomResult<ControlFlow<GatewayResponse, PaymentFlowData>, ConnectorError> {
        if !self.connector().should_do_access_token() {
            return Ok(ControlFlow::Continue(flow_data));
        }

        let router_data = self
            .run::<CreateAccessToken, _, _>(
                flow_data,
                AccessTokenRequestData::default(),
                "access_token",
            )
            .await?;
        let mut flow_data = router_data.resource_common_data;
        match router_data.response {
            Ok(token) => {
                flow_data.access_token = Some(token);
                Ok(ControlFlow::Continue(flow_data))
            }
            Err(error) => Ok(ControlFlow::Break(failed_response(
                error,
                flow_data.test_mode,
            ))),
        }
    }

    async fn run<F, Req, Resp>(
        &self,
        flow_data: PaymentFlowData,
        request: Req,
        operation: &'static str,
    ) -> CustomResult<RouterDataV2<F, PaymentFlowData, Req, Resp>, ConnectorError>
    where
        Connector: ConnectorIntegrationV2<F, PaymentFlowData, Req, Resp>,
        F: Clone,
        Req: Clone,
        Resp: Clone + InvalidResponseFallback,
    {
        let connector = self.connector();
        let router_data = RouterDataV2::new(flow_data, self.auth.clone(), request);
        execute_connector_processing_step(
            self.transport.as_ref(),
            connector,
            router_data,
            self.config.log_transcripts,
        )
        .await
        .map_err(|report| unsupported_operation(report, operation, connector.display_name()))
    }

    fn flow_data(&self, request_id: Option<&str>) -> PaymentFlowData {
        let request_id = request_id
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| fp_utils::generate_id("req"));
        PaymentFlowData::new(
            request_id,
            self.config.test_mode,
            self.config.connectors.clone(),
        )
    }

    fn finish<F, Req>(
        &self,
        router_data: RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>,
    ) -> GatewayResponse {
        match router_data.response {
            Ok(response) => response,
            Err(error) => failed_response(error, router_data.resource_common_data.test_mode),
        }
    }
}

fn failed_response(
    error: domain_types::router_data::ErrorResponse,
    test_mode: bool,
) -> GatewayResponse {
    GatewayResponse {
        test_mode,
        ..GatewayResponse::from(error)
    }
}

/// A flow the connector leaves unimplemented surfaces as `NotSupported`.
fn unsupported_operation(
    report: Report<ConnectorError>,
    operation: &'static str,
    connector: &'static str,
) -> Report<ConnectorError> {
    if matches!(report.current_context(), ConnectorError::NotImplemented(_)) {
        report.change_context(ConnectorError::NotSupported {
            message: operation.to_string(),
            connector,
        })
    } else {
        report
    }
}

#[cfg(test)]
mod tests {
    use error_stack::report;

    use super::*;

    #[test]
    fn not_implemented_becomes_not_supported() {
        let report = unsupported_operation(
            report!(ConnectorError::NotImplemented("get_url".to_string())),
            "store",
            "Worldpay Global",
        );
        assert_eq!(
            report.current_context().to_string(),
            "store is not supported by Worldpay Global"
        );

        let report = unsupported_operation(
            report!(ConnectorError::MissingRequiredField {
                field_name: "return_url"
            }),
            "authorize",
            "Airwallex",
        );
        assert!(matches!(
            report.current_context(),
            ConnectorError::MissingRequiredField { .. }
        ));
    }

    #[test]
    fn request_id_falls_back_to_generated_id() {
        let client = GatewayClient::new(
            ConnectorEnum::Nmi,
            ConnectorAuthType::HeaderKey {
                api_key: "key".to_string().into(),
            },
            GatewayConfig::default(),
        );
        assert_eq!(
            client.flow_data(Some("order_1")).connector_request_reference_id,
            "order_1"
        );
        let generated = client.flow_data(Some(" ")).connector_request_reference_id;
        assert!(generated.starts_with("req_"));
        assert_ne!(generated, client.flow_data(None).connector_request_reference_id);
    }
}
