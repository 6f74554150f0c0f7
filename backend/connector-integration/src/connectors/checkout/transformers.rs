use common_enums::{CardBrand, Currency, StoredCredentialReason, TokenSource};
use common_utils::{
    pii::{Email, IpAddressValue},
    MinorUnit,
};
use domain_types::{
    connector_flow::{Authorize, Capture, Refund, Verify, Void},
    connector_types::PaymentFlowData,
    errors::ConnectorError,
    payment_address::Address,
    payment_method_data::{Card, NetworkTokenCard, PaymentMethod},
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    router_request_types::{
        FollowUpRequest, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData,
        RefundsData, StoredCredential, ThreeDSecure, TransactionOptions, VerifyData,
    },
    router_response_types::{AvsResult, CvvResult, GatewayResponse, Message},
    utils::{convert_amount, require_authorization, Error},
};
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::CheckoutRouterData;
use crate::types::ResponseRouterData;

const CONNECTOR: &str = "checkout";

pub struct CheckoutAuthType {
    pub(super) secret_key: Secret<String>,
    pub(super) processing_channel_id: Option<Secret<String>>,
}

impl TryFrom<&ConnectorAuthType> for CheckoutAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::HeaderKey { api_key } => Ok(Self {
                secret_key: api_key.clone(),
                processing_channel_id: None,
            }),
            // api_secret holds the public key, which server-side calls never use
            ConnectorAuthType::SignatureKey { api_key, key1, .. } => Ok(Self {
                secret_key: api_key.clone(),
                processing_channel_id: Some(key1.clone()),
            }),
            _ => Err(ConnectorError::FailedToObtainAuthType)?,
        }
    }
}

/// Request data that may carry a `Cko-Idempotency-Key`.
pub trait CheckoutIdempotency {
    fn idempotency_key(&self) -> Option<&str>;
}

impl CheckoutIdempotency for PaymentsAuthorizeData {
    fn idempotency_key(&self) -> Option<&str> {
        self.options.idempotency_key.as_deref()
    }
}

impl CheckoutIdempotency for VerifyData {
    fn idempotency_key(&self) -> Option<&str> {
        self.options.idempotency_key.as_deref()
    }
}

impl CheckoutIdempotency for PaymentsCaptureData {
    fn idempotency_key(&self) -> Option<&str> {
        self.options.idempotency_key.as_deref()
    }
}

impl CheckoutIdempotency for RefundsData {
    fn idempotency_key(&self) -> Option<&str> {
        self.options.idempotency_key.as_deref()
    }
}

impl CheckoutIdempotency for PaymentVoidData {
    fn idempotency_key(&self) -> Option<&str> {
        self.options.idempotency_key.as_deref()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutSourceType {
    Card,
    NetworkToken,
    Id,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct CheckoutAddress {
    address_line1: Option<Secret<String>>,
    address_line2: Option<Secret<String>>,
    city: Option<String>,
    state: Option<Secret<String>>,
    zip: Option<Secret<String>>,
    country: Option<String>,
}

impl From<&Address> for CheckoutAddress {
    fn from(address: &Address) -> Self {
        Self {
            address_line1: address.address1.clone(),
            address_line2: address.address2.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip: address.zip.clone(),
            country: address.country.clone(),
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct CardSource {
    #[serde(rename = "type")]
    source_type: CheckoutSourceType,
    number: cards::CardNumber,
    expiry_month: Secret<String>,
    expiry_year: Secret<String>,
    cvv: Option<Secret<String>>,
    name: Secret<String>,
    billing_address: Option<CheckoutAddress>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct NetworkTokenSource {
    #[serde(rename = "type")]
    source_type: CheckoutSourceType,
    token: cards::NetworkToken,
    expiry_month: Secret<String>,
    expiry_year: Secret<String>,
    token_type: CheckoutTokenType,
    cryptogram: Secret<String>,
    eci: Option<String>,
    billing_address: Option<CheckoutAddress>,
}

#[derive(Debug, Serialize)]
pub struct IdSource {
    #[serde(rename = "type")]
    source_type: CheckoutSourceType,
    id: Secret<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CheckoutSource {
    Card(CardSource),
    NetworkToken(NetworkTokenSource),
    Id(IdSource),
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutTokenType {
    Applepay,
    Googlepay,
    Vts,
    Mdes,
}

impl From<&NetworkTokenCard> for CheckoutTokenType {
    fn from(token: &NetworkTokenCard) -> Self {
        match (&token.source, &token.brand) {
            (TokenSource::ApplePay, _) => Self::Applepay,
            (TokenSource::GooglePay, _) => Self::Googlepay,
            (TokenSource::NetworkToken, Some(CardBrand::Mastercard)) => Self::Mdes,
            (TokenSource::NetworkToken, _) => Self::Vts,
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct CheckoutThreeDs {
    enabled: bool,
    eci: Option<String>,
    cryptogram: Option<Secret<String>>,
    xid: Option<String>,
    version: Option<String>,
}

impl From<&ThreeDSecure> for CheckoutThreeDs {
    fn from(three_d_secure: &ThreeDSecure) -> Self {
        Self {
            enabled: true,
            eci: three_d_secure.eci.clone(),
            cryptogram: three_d_secure.cavv.clone(),
            xid: three_d_secure
                .xid
                .clone()
                .or_else(|| three_d_secure.ds_transaction_id.clone()),
            version: three_d_secure.normalized_version(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub enum CheckoutPaymentType {
    Recurring,
    Installment,
    Unscheduled,
}

impl From<StoredCredentialReason> for CheckoutPaymentType {
    fn from(reason: StoredCredentialReason) -> Self {
        match reason {
            StoredCredentialReason::Recurring => Self::Recurring,
            StoredCredentialReason::Installment => Self::Installment,
            StoredCredentialReason::Unscheduled => Self::Unscheduled,
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct CheckoutCustomer {
    email: Option<Email>,
    name: Option<Secret<String>>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct CheckoutPaymentsRequest {
    source: CheckoutSource,
    amount: MinorUnit,
    currency: Currency,
    reference: String,
    capture: bool,
    description: Option<String>,
    processing_channel_id: Option<Secret<String>>,
    customer: Option<CheckoutCustomer>,
    payment_ip: Option<IpAddressValue>,
    #[serde(rename = "3ds")]
    three_ds: Option<CheckoutThreeDs>,
    payment_type: Option<CheckoutPaymentType>,
    merchant_initiated: Option<bool>,
    previous_payment_id: Option<String>,
    success_url: Option<String>,
    failure_url: Option<String>,
}

// Card verification is a zero-amount payment that is never captured.
pub type CheckoutVerifyRequest = CheckoutPaymentsRequest;

fn billing_address(options: &TransactionOptions) -> Option<CheckoutAddress> {
    options.get_billing_address().map(CheckoutAddress::from)
}

fn card_source(card: &Card, options: &TransactionOptions) -> Result<CheckoutSource, Error> {
    let expiration = card.expiration()?;
    Ok(CheckoutSource::Card(CardSource {
        source_type: CheckoutSourceType::Card,
        number: card.number.clone(),
        expiry_month: expiration.two_digit_month(),
        expiry_year: expiration.four_digit_year(),
        cvv: if options.should_send_cvv() {
            card.get_verification_value()
        } else {
            None
        },
        name: card.name.clone(),
        billing_address: billing_address(options),
    }))
}

fn network_token_source(
    token: &NetworkTokenCard,
    options: &TransactionOptions,
) -> Result<CheckoutSource, Error> {
    let expiration = token.expiration()?;
    Ok(CheckoutSource::NetworkToken(NetworkTokenSource {
        source_type: CheckoutSourceType::NetworkToken,
        token: token.number.clone(),
        expiry_month: expiration.two_digit_month(),
        expiry_year: expiration.four_digit_year(),
        token_type: CheckoutTokenType::from(token),
        cryptogram: token.payment_cryptogram.clone(),
        eci: token.eci.clone(),
        billing_address: billing_address(options),
    }))
}

fn payment_source(
    payment_method: &PaymentMethod,
    options: &TransactionOptions,
) -> Result<CheckoutSource, Error> {
    match payment_method {
        PaymentMethod::CreditCard(card) => card_source(card, options),
        PaymentMethod::NetworkToken(token) => network_token_source(token, options),
        PaymentMethod::StoredToken(id) => Ok(CheckoutSource::Id(IdSource {
            source_type: CheckoutSourceType::Id,
            id: id.clone(),
        })),
        PaymentMethod::Check(_) => Err(payment_method.not_supported(CONNECTOR)),
    }
}

fn previous_payment_id(stored_credential: &StoredCredential) -> Option<String> {
    if stored_credential.initial_transaction {
        None
    } else {
        stored_credential.network_transaction_id.clone()
    }
}

impl CheckoutPaymentsRequest {
    fn build(
        connector: &super::Checkout,
        router_data_common: &PaymentFlowData,
        auth_type: &ConnectorAuthType,
        amount: MinorUnit,
        payment_method: &PaymentMethod,
        options: &TransactionOptions,
        capture: bool,
    ) -> Result<Self, Error> {
        let auth = CheckoutAuthType::try_from(auth_type)?;
        let currency = options.get_currency();
        let stored_credential = options.stored_credential.as_ref();
        let three_ds = if options.wants_three_ds() {
            Some(
                options
                    .three_d_secure
                    .as_ref()
                    .map(CheckoutThreeDs::from)
                    .unwrap_or(CheckoutThreeDs {
                        enabled: true,
                        ..Default::default()
                    }),
            )
        } else {
            None
        };
        let customer = options.email.clone().map(|email| CheckoutCustomer {
            email: Some(email),
            name: options
                .get_billing_address()
                .and_then(Address::get_optional_full_name),
        });

        Ok(Self {
            source: payment_source(payment_method, options)?,
            amount: convert_amount(connector.amount_converter, amount, currency)?,
            currency,
            reference: options
                .order_id
                .clone()
                .unwrap_or_else(|| router_data_common.connector_request_reference_id.clone()),
            capture,
            description: options.description.clone(),
            processing_channel_id: auth.processing_channel_id,
            customer,
            payment_ip: options.ip.clone(),
            three_ds,
            payment_type: stored_credential
                .map(|stored_credential| CheckoutPaymentType::from(stored_credential.reason_type)),
            merchant_initiated: stored_credential.map(StoredCredential::is_merchant_initiated),
            previous_payment_id: stored_credential.and_then(previous_payment_id),
            success_url: options.return_url.clone(),
            failure_url: options.return_url.clone(),
        })
    }
}

impl
    TryFrom<
        CheckoutRouterData<
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>,
        >,
    > for CheckoutPaymentsRequest
{
    type Error = Error;

    fn try_from(
        item: CheckoutRouterData<
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        Self::build(
            &item.connector,
            &router_data.resource_common_data,
            &router_data.connector_auth_type,
            router_data.request.amount,
            &router_data.request.payment_method,
            &router_data.request.options,
            router_data.request.is_auto_capture(),
        )
    }
}

impl
    TryFrom<
        CheckoutRouterData<RouterDataV2<Verify, PaymentFlowData, VerifyData, GatewayResponse>>,
    > for CheckoutVerifyRequest
{
    type Error = Error;

    fn try_from(
        item: CheckoutRouterData<
            RouterDataV2<Verify, PaymentFlowData, VerifyData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        Self::build(
            &item.connector,
            &router_data.resource_common_data,
            &router_data.connector_auth_type,
            MinorUnit::new(0),
            &router_data.request.payment_method,
            &router_data.request.options,
            false,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, strum::Display)]
pub enum CheckoutPaymentStatus {
    Authorized,
    Pending,
    #[serde(rename = "Card Verified")]
    #[strum(serialize = "Card Verified")]
    CardVerified,
    Declined,
    Captured,
    #[serde(rename = "Partially Captured")]
    #[strum(serialize = "Partially Captured")]
    PartiallyCaptured,
    Voided,
    Refunded,
    Canceled,
    Expired,
    #[serde(other)]
    Unknown,
}

impl CheckoutPaymentStatus {
    fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Authorized | Self::Captured | Self::CardVerified | Self::Pending
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CheckoutSourceResult {
    pub id: Option<String>,
    pub avs_check: Option<String>,
    pub cvv_check: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CheckoutPaymentsResponse {
    pub id: Option<String>,
    pub status: Option<CheckoutPaymentStatus>,
    pub approved: Option<bool>,
    pub reference: Option<String>,
    pub response_code: Option<String>,
    pub response_summary: Option<String>,
    pub scheme_id: Option<String>,
    pub source: Option<CheckoutSourceResult>,
    pub error_type: Option<String>,
    pub error_codes: Option<Vec<String>>,
}

pub type CheckoutVerifyResponse = CheckoutPaymentsResponse;

impl<F, Req>
    TryFrom<
        ResponseRouterData<
            CheckoutPaymentsResponse,
            RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>,
        >,
    > for RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            CheckoutPaymentsResponse,
            RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            params,
            router_data,
            ..
        } = item;
        let success = response.approved == Some(true)
            && response
                .status
                .as_ref()
                .is_some_and(CheckoutPaymentStatus::is_success);
        let message = if success {
            "Succeeded".to_string()
        } else {
            response
                .response_summary
                .clone()
                .or_else(|| response.error_type.as_ref().map(|_| error_message(&response)))
                .or_else(|| response.status.as_ref().map(ToString::to_string))
                .unwrap_or_default()
        };
        let error_code = if success {
            None
        } else {
            response
                .response_code
                .clone()
                .or_else(|| first_error_code(&response.error_codes))
                .or_else(|| response.error_type.clone())
        };
        let source = response.source.unwrap_or_default();

        Ok(Self {
            response: Ok(GatewayResponse {
                success,
                message: Message::Text(message),
                authorization: response.id,
                params,
                test_mode: router_data.resource_common_data.test_mode,
                error_code,
                avs_result: source.avs_check.as_deref().and_then(AvsResult::from_code),
                cvv_result: source.cvv_check.as_deref().and_then(CvvResult::from_code),
                network_transaction_id: response.scheme_id,
                ..Default::default()
            }),
            ..router_data
        })
    }
}

fn first_error_code(error_codes: &Option<Vec<String>>) -> Option<String> {
    error_codes.as_ref().and_then(|codes| codes.first().cloned())
}

/// `error_type: code, code`, or the bare type when no codes are listed.
fn error_message(response: &CheckoutPaymentsResponse) -> String {
    join_error(response.error_type.as_deref(), response.error_codes.as_deref())
}

pub(super) fn join_error(error_type: Option<&str>, error_codes: Option<&[String]>) -> String {
    let codes = error_codes
        .filter(|codes| !codes.is_empty())
        .map(|codes| codes.join(", "));
    [error_type.map(str::to_string), codes]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(": ")
}

// Capture, refund and void
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct CheckoutCaptureRequest {
    amount: MinorUnit,
    reference: Option<String>,
}

impl
    TryFrom<
        CheckoutRouterData<
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>,
        >,
    > for CheckoutCaptureRequest
{
    type Error = Error;

    fn try_from(
        item: CheckoutRouterData<
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        require_authorization(&request.authorization)?;
        Ok(Self {
            amount: convert_amount(
                item.connector.amount_converter,
                request.amount,
                request.options.get_currency(),
            )?,
            reference: request.options.request_id.clone(),
        })
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct CheckoutRefundRequest {
    amount: MinorUnit,
    reference: Option<String>,
}

impl
    TryFrom<
        CheckoutRouterData<RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>>,
    > for CheckoutRefundRequest
{
    type Error = Error;

    fn try_from(
        item: CheckoutRouterData<
            RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        require_authorization(&request.authorization)?;
        Ok(Self {
            amount: convert_amount(
                item.connector.amount_converter,
                request.amount,
                request.options.get_currency(),
            )?,
            reference: request.options.request_id.clone(),
        })
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct CheckoutVoidRequest {
    reference: Option<String>,
}

impl
    TryFrom<
        CheckoutRouterData<RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>>,
    > for CheckoutVoidRequest
{
    type Error = Error;

    fn try_from(
        item: CheckoutRouterData<
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        require_authorization(&request.authorization)?;
        Ok(Self {
            reference: request.options.request_id.clone(),
        })
    }
}

/// Body of an accepted capture, refund or void.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CheckoutActionResponse {
    pub action_id: Option<String>,
    pub reference: Option<String>,
}

pub type CheckoutCaptureResponse = CheckoutActionResponse;
pub type CheckoutRefundResponse = CheckoutActionResponse;
pub type CheckoutVoidResponse = CheckoutActionResponse;

impl<F, Req: FollowUpRequest>
    TryFrom<
        ResponseRouterData<
            CheckoutActionResponse,
            RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>,
        >,
    > for RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            CheckoutActionResponse,
            RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            params,
            router_data,
            http_code,
        } = item;
        let success = http_code == 202 && response.action_id.is_some();
        let gateway_response = GatewayResponse {
            success,
            message: Message::Text(if success {
                "Succeeded".to_string()
            } else {
                format!("Unexpected status {http_code}")
            }),
            // actions do not return the payment id, keep the one the call was made with
            authorization: Some(router_data.request.authorization().to_string()),
            params,
            test_mode: router_data.resource_common_data.test_mode,
            error_code: (!success).then(|| http_code.to_string()),
            ..Default::default()
        };
        Ok(Self {
            response: Ok(gateway_response),
            ..router_data
        })
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CheckoutErrorResponse {
    pub request_id: Option<String>,
    pub error_type: Option<String>,
    pub error_codes: Option<Vec<String>>,
}
