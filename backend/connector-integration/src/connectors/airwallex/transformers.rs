use common_enums::{Currency, StoredCredentialInitiator};
use common_utils::{pii::Email, StringMajorUnit};
use domain_types::{
    connector_flow::{Authorize, Capture, Void},
    connector_types::PaymentFlowData,
    errors::ConnectorError,
    payment_address::Address,
    payment_method_data::{Card, PaymentMethod},
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    router_request_types::{
        AccessTokenRequestData, AccessTokenResponseData, PaymentCreateOrderData,
        PaymentCreateOrderResponse, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData,
        RefundsData, StoredCredential, ThreeDSecure, TransactionOptions,
    },
    router_response_types::{GatewayResponse, Message},
    utils::{convert_amount, require_authorization, Error},
};
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::AirwallexRouterData;
use crate::types::ResponseRouterData;

const CONNECTOR: &str = "airwallex";

pub struct AirwallexAuthType {
    pub x_api_key: Secret<String>,
    pub x_client_id: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for AirwallexAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        if let ConnectorAuthType::BodyKey { api_key, key1 } = auth_type {
            Ok(Self {
                x_api_key: api_key.clone(),
                x_client_id: key1.clone(),
            })
        } else {
            Err(ConnectorError::FailedToObtainAuthType)?
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AirwallexAccessTokenResponse {
    token: Secret<String>,
    expires_at: Option<String>,
}

impl
    TryFrom<
        ResponseRouterData<
            AirwallexAccessTokenResponse,
            RouterDataV2<
                domain_types::connector_flow::CreateAccessToken,
                PaymentFlowData,
                AccessTokenRequestData,
                AccessTokenResponseData,
            >,
        >,
    >
    for RouterDataV2<
        domain_types::connector_flow::CreateAccessToken,
        PaymentFlowData,
        AccessTokenRequestData,
        AccessTokenResponseData,
    >
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            AirwallexAccessTokenResponse,
            RouterDataV2<
                domain_types::connector_flow::CreateAccessToken,
                PaymentFlowData,
                AccessTokenRequestData,
                AccessTokenResponseData,
            >,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            response: Ok(AccessTokenResponseData {
                access_token: item.response.token,
                expires_at: item.response.expires_at,
            }),
            ..item.router_data
        })
    }
}

// Payment intent
#[derive(Debug, Serialize)]
pub struct AirwallexIntentRequest {
    // Unique ID to be sent for each transaction/operation request to the connector
    request_id: String,
    amount: StringMajorUnit,
    currency: Currency,
    //ID created in merchant's order system that corresponds to this PaymentIntent.
    merchant_order_id: String,
}

impl
    TryFrom<
        AirwallexRouterData<
            RouterDataV2<
                domain_types::connector_flow::CreateOrder,
                PaymentFlowData,
                PaymentCreateOrderData,
                PaymentCreateOrderResponse,
            >,
        >,
    > for AirwallexIntentRequest
{
    type Error = Error;

    fn try_from(
        item: AirwallexRouterData<
            RouterDataV2<
                domain_types::connector_flow::CreateOrder,
                PaymentFlowData,
                PaymentCreateOrderData,
                PaymentCreateOrderResponse,
            >,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let request_id = router_data
            .resource_common_data
            .connector_request_reference_id
            .clone();
        let amount = convert_amount(
            item.connector.amount_converter,
            router_data.request.amount,
            router_data.request.currency,
        )?;
        Ok(Self {
            merchant_order_id: router_data
                .request
                .options
                .order_id
                .clone()
                .unwrap_or_else(|| request_id.clone()),
            request_id,
            amount,
            currency: router_data.request.currency,
        })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AirwallexIntentResponse {
    //Unique identifier for the PaymentIntent
    id: String,
    status: Option<AirwallexPaymentStatus>,
}

impl
    TryFrom<
        ResponseRouterData<
            AirwallexIntentResponse,
            RouterDataV2<
                domain_types::connector_flow::CreateOrder,
                PaymentFlowData,
                PaymentCreateOrderData,
                PaymentCreateOrderResponse,
            >,
        >,
    >
    for RouterDataV2<
        domain_types::connector_flow::CreateOrder,
        PaymentFlowData,
        PaymentCreateOrderData,
        PaymentCreateOrderResponse,
    >
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            AirwallexIntentResponse,
            RouterDataV2<
                domain_types::connector_flow::CreateOrder,
                PaymentFlowData,
                PaymentCreateOrderData,
                PaymentCreateOrderResponse,
            >,
        >,
    ) -> Result<Self, Self::Error> {
        let mut resource_common_data = item.router_data.resource_common_data.clone();
        resource_common_data.reference_id = Some(item.response.id.clone());
        Ok(Self {
            resource_common_data,
            response: Ok(PaymentCreateOrderResponse {
                order_id: item.response.id,
            }),
            ..item.router_data
        })
    }
}

// Confirm
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct AirwallexPaymentsRequest {
    request_id: String,
    payment_method: AirwallexPaymentMethod,
    payment_method_options: AirwallexPaymentOptions,
    return_url: String,
    external_recurring_data: Option<AirwallexRecurringData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AirwallexPaymentType {
    Card,
}

#[derive(Debug, Serialize)]
pub struct AirwallexPaymentMethod {
    #[serde(rename = "type")]
    payment_type: AirwallexPaymentType,
    card: AirwallexCard,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct AirwallexCard {
    number: cards::CardNumber,
    expiry_month: Secret<String>,
    expiry_year: Secret<String>,
    cvc: Option<Secret<String>>,
    name: Secret<String>,
    billing: Option<AirwallexBilling>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct AirwallexBilling {
    first_name: Option<Secret<String>>,
    last_name: Option<Secret<String>>,
    email: Option<Email>,
    phone_number: Option<Secret<String>>,
    address: Option<AirwallexAddress>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct AirwallexAddress {
    country_code: String,
    city: Option<String>,
    street: Option<Secret<String>>,
    postcode: Option<Secret<String>>,
    state: Option<Secret<String>>,
}

#[derive(Debug, Serialize)]
pub struct AirwallexPaymentOptions {
    card: AirwallexCardPaymentOptions,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct AirwallexCardPaymentOptions {
    auto_capture: bool,
    three_ds_action: Option<AirwallexThreeDsAction>,
    external_three_ds: Option<AirwallexExternalThreeDs>,
}

#[derive(Debug, Serialize)]
pub enum AirwallexThreeDsAction {
    #[serde(rename = "FORCE_3DS")]
    Force3ds,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct AirwallexExternalThreeDs {
    version: Option<String>,
    authentication_value: Option<Secret<String>>,
    ds_transaction_id: Option<String>,
    eci: Option<String>,
    three_ds_server_transaction_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AirwallexRecurringData {
    merchant_trigger_reason: AirwallexTriggerReason,
    // null on the initial transaction
    original_transaction_id: Option<String>,
    triggered_by: AirwallexTriggeredBy,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AirwallexTriggerReason {
    Scheduled,
    Unscheduled,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AirwallexTriggeredBy {
    Customer,
    Merchant,
}

impl From<&StoredCredential> for AirwallexRecurringData {
    fn from(stored_credential: &StoredCredential) -> Self {
        let merchant_trigger_reason = if stored_credential.reason_type.is_scheduled() {
            AirwallexTriggerReason::Scheduled
        } else {
            AirwallexTriggerReason::Unscheduled
        };
        let triggered_by = match stored_credential.initiator {
            StoredCredentialInitiator::Cardholder => AirwallexTriggeredBy::Customer,
            StoredCredentialInitiator::Merchant => AirwallexTriggeredBy::Merchant,
        };
        let original_transaction_id = if stored_credential.initial_transaction {
            None
        } else {
            stored_credential.network_transaction_id.clone()
        };
        Self {
            merchant_trigger_reason,
            original_transaction_id,
            triggered_by,
        }
    }
}

impl From<&ThreeDSecure> for AirwallexExternalThreeDs {
    fn from(three_d_secure: &ThreeDSecure) -> Self {
        Self {
            version: three_d_secure.normalized_version(),
            authentication_value: three_d_secure.cavv.clone(),
            ds_transaction_id: three_d_secure.ds_transaction_id.clone(),
            eci: three_d_secure.eci.clone(),
            three_ds_server_transaction_id: three_d_secure.three_ds_server_trans_id.clone(),
        }
    }
}

fn get_billing(options: &TransactionOptions) -> Option<AirwallexBilling> {
    let address: &Address = options.get_billing_address()?;
    Some(AirwallexBilling {
        first_name: address.get_optional_first_name(),
        last_name: address.get_optional_last_name(),
        email: options.email.clone(),
        phone_number: address.phone.clone(),
        address: address.country.clone().map(|country_code| AirwallexAddress {
            country_code,
            city: address.city.clone(),
            street: address.address1.clone(),
            postcode: address.zip.clone(),
            state: address.state.clone(),
        }),
    })
}

fn get_card(card: &Card, options: &TransactionOptions) -> Result<AirwallexCard, Error> {
    let expiration = card.expiration()?;
    Ok(AirwallexCard {
        number: card.number.clone(),
        expiry_month: expiration.two_digit_month(),
        expiry_year: expiration.four_digit_year(),
        cvc: if options.should_send_cvv() {
            card.get_verification_value()
        } else {
            None
        },
        name: card.name.clone(),
        billing: get_billing(options),
    })
}

impl
    TryFrom<
        AirwallexRouterData<
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>,
        >,
    > for AirwallexPaymentsRequest
{
    type Error = Error;

    fn try_from(
        item: AirwallexRouterData<
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let options = &router_data.request.options;
        let return_url = options.get_return_url()?.clone();
        let card = match &router_data.request.payment_method {
            PaymentMethod::CreditCard(card) => get_card(card, options)?,
            payment_method @ (PaymentMethod::Check(_)
            | PaymentMethod::NetworkToken(_)
            | PaymentMethod::StoredToken(_)) => Err(payment_method.not_supported(CONNECTOR))?,
        };
        let three_ds_action = options
            .execute_threed
            .unwrap_or(false)
            .then_some(AirwallexThreeDsAction::Force3ds);

        Ok(Self {
            request_id: router_data
                .resource_common_data
                .suffixed_request_id("purchase"),
            payment_method: AirwallexPaymentMethod {
                payment_type: AirwallexPaymentType::Card,
                card,
            },
            payment_method_options: AirwallexPaymentOptions {
                card: AirwallexCardPaymentOptions {
                    auto_capture: router_data.request.is_auto_capture(),
                    three_ds_action,
                    external_three_ds: options
                        .three_d_secure
                        .as_ref()
                        .map(AirwallexExternalThreeDs::from),
                },
            },
            return_url,
            external_recurring_data: options
                .stored_credential
                .as_ref()
                .map(AirwallexRecurringData::from),
        })
    }
}

// PaymentsResponse
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AirwallexPaymentStatus {
    Succeeded,
    Failed,
    Pending,
    RequiresPaymentMethod,
    RequiresCustomerAction,
    RequiresCapture,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Intent statuses that count as success for each flow sharing the payment intent response.
pub trait AirwallexIntentFlow {
    const SUCCESS_STATUSES: &'static [AirwallexPaymentStatus];
}

impl AirwallexIntentFlow for Authorize {
    const SUCCESS_STATUSES: &'static [AirwallexPaymentStatus] = &[
        AirwallexPaymentStatus::Succeeded,
        AirwallexPaymentStatus::RequiresCapture,
    ];
}

impl AirwallexIntentFlow for Capture {
    const SUCCESS_STATUSES: &'static [AirwallexPaymentStatus] = &[
        AirwallexPaymentStatus::Succeeded,
        AirwallexPaymentStatus::RequiresCapture,
    ];
}

impl AirwallexIntentFlow for Void {
    const SUCCESS_STATUSES: &'static [AirwallexPaymentStatus] =
        &[AirwallexPaymentStatus::Cancelled];
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AirwallexPaymentAttempt {
    pub id: Option<String>,
    pub status: Option<String>,
    pub provider_transaction_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AirwallexPaymentsResponse {
    pub id: Option<String>,
    pub status: Option<AirwallexPaymentStatus>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub provider_original_response_code: Option<String>,
    pub latest_payment_attempt: Option<AirwallexPaymentAttempt>,
}

pub type AirwallexCaptureResponse = AirwallexPaymentsResponse;
pub type AirwallexVoidResponse = AirwallexPaymentsResponse;

impl AirwallexPaymentsResponse {
    fn into_gateway_response(
        self,
        params: serde_json::Value,
        success_statuses: &[AirwallexPaymentStatus],
        test_mode: bool,
    ) -> GatewayResponse {
        let success = self
            .status
            .as_ref()
            .is_some_and(|status| success_statuses.contains(status));
        let status = self.status.as_ref().map(ToString::to_string);
        let error_code = if success {
            None
        } else {
            self.provider_original_response_code
                .or(self.code)
                .or_else(|| status.clone())
        };
        let message = self.message.or(status).unwrap_or_default();
        GatewayResponse {
            success,
            message: Message::Text(message),
            authorization: self.id,
            params,
            test_mode,
            error_code,
            network_transaction_id: self
                .latest_payment_attempt
                .and_then(|attempt| attempt.provider_transaction_id),
            ..Default::default()
        }
    }
}

impl<F: AirwallexIntentFlow, Req>
    TryFrom<
        ResponseRouterData<
            AirwallexPaymentsResponse,
            RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>,
        >,
    > for RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            AirwallexPaymentsResponse,
            RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            params,
            router_data,
            ..
        } = item;
        let gateway_response = response.into_gateway_response(
            params,
            F::SUCCESS_STATUSES,
            router_data.resource_common_data.test_mode,
        );
        Ok(Self {
            response: Ok(gateway_response),
            ..router_data
        })
    }
}

// Capture
#[derive(Debug, Serialize)]
pub struct AirwallexCaptureRequest {
    request_id: String,
    amount: StringMajorUnit,
}

impl
    TryFrom<
        AirwallexRouterData<
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>,
        >,
    > for AirwallexCaptureRequest
{
    type Error = Error;

    fn try_from(
        item: AirwallexRouterData<
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        require_authorization(&router_data.request.authorization)?;
        Ok(Self {
            request_id: router_data
                .resource_common_data
                .suffixed_request_id("capture"),
            amount: convert_amount(
                item.connector.amount_converter,
                router_data.request.amount,
                router_data.request.options.get_currency(),
            )?,
        })
    }
}

// Void
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct AirwallexVoidRequest {
    request_id: String,
    cancellation_reason: Option<String>,
}

impl
    TryFrom<
        AirwallexRouterData<
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>,
        >,
    > for AirwallexVoidRequest
{
    type Error = Error;

    fn try_from(
        item: AirwallexRouterData<
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        require_authorization(&router_data.request.authorization)?;
        Ok(Self {
            request_id: router_data.resource_common_data.suffixed_request_id("void"),
            cancellation_reason: router_data.request.options.reason.clone(),
        })
    }
}

// Refund
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct AirwallexRefundRequest {
    request_id: String,
    //Identifier for the PaymentIntent for which Refund is requested
    payment_intent_id: String,
    amount: StringMajorUnit,
    reason: Option<String>,
}

impl
    TryFrom<
        AirwallexRouterData<RouterDataV2<domain_types::connector_flow::Refund, PaymentFlowData, RefundsData, GatewayResponse>>,
    > for AirwallexRefundRequest
{
    type Error = Error;

    fn try_from(
        item: AirwallexRouterData<
            RouterDataV2<domain_types::connector_flow::Refund, PaymentFlowData, RefundsData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let payment_intent_id = require_authorization(&router_data.request.authorization)?;
        Ok(Self {
            request_id: router_data
                .resource_common_data
                .suffixed_request_id("refund"),
            payment_intent_id: payment_intent_id.to_string(),
            amount: convert_amount(
                item.connector.amount_converter,
                router_data.request.amount,
                router_data.request.options.get_currency(),
            )?,
            reason: router_data.request.options.reason.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AirwallexRefundStatus {
    Received,
    Accepted,
    Settled,
    Failed,
    #[serde(other)]
    Unknown,
}

impl AirwallexRefundStatus {
    fn is_success(&self) -> bool {
        matches!(self, Self::Received | Self::Accepted | Self::Settled)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AirwallexRefundResponse {
    //Unique identifier for the Refund
    pub id: Option<String>,
    pub status: Option<AirwallexRefundStatus>,
    pub payment_intent_id: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub provider_original_response_code: Option<String>,
}

impl
    TryFrom<
        ResponseRouterData<
            AirwallexRefundResponse,
            RouterDataV2<domain_types::connector_flow::Refund, PaymentFlowData, RefundsData, GatewayResponse>,
        >,
    > for RouterDataV2<domain_types::connector_flow::Refund, PaymentFlowData, RefundsData, GatewayResponse>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            AirwallexRefundResponse,
            RouterDataV2<domain_types::connector_flow::Refund, PaymentFlowData, RefundsData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            params,
            router_data,
            ..
        } = item;
        let success = response
            .status
            .as_ref()
            .is_some_and(AirwallexRefundStatus::is_success);
        let status = response.status.as_ref().map(ToString::to_string);
        let error_code = if success {
            None
        } else {
            response
                .provider_original_response_code
                .or(response.code)
                .or_else(|| status.clone())
        };
        let gateway_response = GatewayResponse {
            success,
            message: Message::Text(response.message.or(status).unwrap_or_default()),
            authorization: response.id,
            params,
            test_mode: router_data.resource_common_data.test_mode,
            error_code,
            ..Default::default()
        };
        Ok(Self {
            response: Ok(gateway_response),
            ..router_data
        })
    }
}

#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AirwallexErrorResponse {
    pub code: Option<String>,
    pub message: Option<String>,
    pub source: Option<String>,
    pub provider_original_response_code: Option<String>,
}
