use std::str::FromStr;

use common_enums::{Currency, StoredCredentialInitiator, StoredCredentialReason, TokenSource};
use common_utils::{pii::Email, CustomResult, MinorUnit};
use domain_types::{
    connector_flow::{Authorize, Capture, Refund, Void},
    connector_types::PaymentFlowData,
    errors::ConnectorError,
    payment_address::Address,
    payment_method_data::PaymentMethod,
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    router_request_types::{
        PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, RefundsData,
        StoredCredential, ThreeDSecure, TransactionOptions,
    },
    router_response_types::{AvsResult, CvvResult, GatewayResponse, Message},
    utils::{convert_amount, Error},
};
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::WorldpayRouterData;
use crate::{types::ResponseRouterData, utils};

const CONNECTOR: &str = "worldpay";
const API_VERSION: &str = "1.4";
const DOC_TYPE: &str = r#"<!DOCTYPE paymentService PUBLIC "-//Worldpay//DTD Worldpay PaymentService v1//EN" "http://dtd.worldpay.com/paymentService_v1.dtd">"#;
const DEFAULT_DESCRIPTION: &str = "Purchase";
const SUCCESS_MESSAGE: &str = "SUCCESS";
const AUTHORIZATION_DELIMITER: char = '|';

pub struct WorldpayAuthType {
    pub(super) username: Secret<String>,
    pub(super) password: Secret<String>,
    pub(super) merchant_code: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for WorldpayAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            // Without an explicit merchant code the login doubles as one.
            ConnectorAuthType::BodyKey { api_key, key1 } => Ok(Self {
                username: api_key.clone(),
                password: key1.clone(),
                merchant_code: api_key.clone(),
            }),
            ConnectorAuthType::SignatureKey {
                api_key,
                key1,
                api_secret,
            } => Ok(Self {
                username: api_key.clone(),
                password: key1.clone(),
                merchant_code: api_secret.clone(),
            }),
            _ => Err(ConnectorError::FailedToObtainAuthType)?,
        }
    }
}

/// `order_code|amount|currency` of an authorized order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReference {
    pub order_code: String,
    pub amount: MinorUnit,
    pub currency: Currency,
}

impl OrderReference {
    pub fn parse(authorization: &str) -> Result<Self, Error> {
        let invalid = || ConnectorError::InvalidAuthorization {
            authorization: authorization.to_string(),
            connector: CONNECTOR,
        };
        match utils::split_authorization(authorization, AUTHORIZATION_DELIMITER, 3, CONNECTOR)?
            .as_slice()
        {
            [order_code, amount, currency] => Ok(Self {
                order_code: (*order_code).to_string(),
                amount: MinorUnit::new(amount.parse::<i64>().map_err(|_| invalid())?),
                currency: Currency::from_str(currency).map_err(|_| invalid())?,
            }),
            _ => Err(invalid())?,
        }
    }
}

impl std::fmt::Display for OrderReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{AUTHORIZATION_DELIMITER}{}{AUTHORIZATION_DELIMITER}{}",
            self.order_code,
            self.amount.get_amount_as_i64(),
            self.currency
        )
    }
}

// Requests

#[derive(Debug, Serialize)]
pub struct Amount {
    #[serde(rename = "@value")]
    value: MinorUnit,
    #[serde(rename = "@currencyCode")]
    currency_code: Currency,
    #[serde(rename = "@exponent")]
    exponent: u8,
}

impl Amount {
    fn new(value: MinorUnit, currency: Currency) -> Self {
        Self {
            value,
            currency_code: currency,
            exponent: currency.number_of_digits_after_decimal_point(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExpiryDate {
    date: Date,
}

#[derive(Debug, Serialize)]
pub struct Date {
    #[serde(rename = "@month")]
    month: Secret<String>,
    #[serde(rename = "@year")]
    year: Secret<String>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldpayAddress {
    first_name: Option<Secret<String>>,
    last_name: Option<Secret<String>>,
    address1: Option<Secret<String>>,
    address2: Option<Secret<String>>,
    postal_code: Option<Secret<String>>,
    city: Option<String>,
    state: Option<Secret<String>>,
    country_code: Option<String>,
    telephone_number: Option<Secret<String>>,
}

impl From<&Address> for WorldpayAddress {
    fn from(address: &Address) -> Self {
        Self {
            first_name: address.get_optional_first_name(),
            last_name: address.get_optional_last_name(),
            address1: address.address1.clone(),
            address2: address.address2.clone(),
            postal_code: address.zip.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            country_code: address.country.clone(),
            telephone_number: address.phone.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CardAddress {
    address: WorldpayAddress,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSsl {
    card_number: Secret<String>,
    expiry_date: ExpiryDate,
    card_holder_name: Secret<String>,
    cvc: Option<Secret<String>>,
    card_address: Option<CardAddress>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenType {
    Networktoken,
    Applepay,
    Googlepay,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmvcoToken {
    #[serde(rename = "@type")]
    token_type: TokenType,
    token_number: Secret<String>,
    expiry_date: ExpiryDate,
    card_holder_name: Option<Secret<String>>,
    cryptogram: Secret<String>,
    eci_indicator: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CredentialUsage {
    First,
    Used,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CredentialReason {
    Recurring,
    Instalment,
    Unscheduled,
}

impl From<StoredCredentialReason> for CredentialReason {
    fn from(reason: StoredCredentialReason) -> Self {
        match reason {
            StoredCredentialReason::Recurring => Self::Recurring,
            StoredCredentialReason::Installment => Self::Instalment,
            StoredCredentialReason::Unscheduled => Self::Unscheduled,
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct StoredCredentials {
    #[serde(rename = "@usage")]
    usage: CredentialUsage,
    #[serde(rename = "@customerInitiatedReason")]
    customer_initiated_reason: Option<CredentialReason>,
    #[serde(rename = "@merchantInitiatedReason")]
    merchant_initiated_reason: Option<CredentialReason>,
    #[serde(rename = "schemeTransactionIdentifier")]
    scheme_transaction_identifier: Option<String>,
}

impl From<&StoredCredential> for StoredCredentials {
    fn from(stored_credential: &StoredCredential) -> Self {
        let reason = Some(CredentialReason::from(stored_credential.reason_type));
        let (customer_initiated_reason, merchant_initiated_reason) =
            match stored_credential.initiator {
                StoredCredentialInitiator::Cardholder => (reason, None),
                StoredCredentialInitiator::Merchant => (None, reason),
            };
        let initial = stored_credential.initial_transaction;
        Self {
            usage: if initial {
                CredentialUsage::First
            } else {
                CredentialUsage::Used
            },
            customer_initiated_reason,
            merchant_initiated_reason,
            scheme_transaction_identifier: stored_credential
                .network_transaction_id
                .clone()
                .filter(|_| !initial),
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Info3DSecure {
    #[serde(rename = "threeDSVersion")]
    three_ds_version: Option<String>,
    ds_transaction_id: Option<String>,
    xid: Option<String>,
    cavv: Option<Secret<String>>,
    eci: Option<String>,
}

impl From<&ThreeDSecure> for Info3DSecure {
    fn from(three_d_secure: &ThreeDSecure) -> Self {
        let version = three_d_secure.normalized_version();
        let is_v2 = version.as_deref().is_some_and(|v| v.starts_with('2'));
        Self {
            three_ds_version: version,
            ds_transaction_id: three_d_secure
                .ds_transaction_id
                .clone()
                .filter(|_| is_v2),
            xid: three_d_secure.xid.clone().filter(|_| !is_v2),
            cavv: three_d_secure.cavv.clone(),
            eci: three_d_secure.eci.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Authorise,
    Sale,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct PaymentDetails {
    #[serde(rename = "@action")]
    action: Action,
    #[serde(rename = "CARD-SSL")]
    card: Option<CardSsl>,
    #[serde(rename = "EMVCO_TOKEN-SSL")]
    token: Option<EmvcoToken>,
    #[serde(rename = "storedCredentials")]
    stored_credentials: Option<StoredCredentials>,
    #[serde(rename = "info3DSecure")]
    info_3d_secure: Option<Info3DSecure>,
}

impl PaymentDetails {
    fn try_from_request(request: &PaymentsAuthorizeData) -> Result<Self, Error> {
        let options = &request.options;
        let mut details = Self {
            action: if request.is_auto_capture() {
                Action::Sale
            } else {
                Action::Authorise
            },
            card: None,
            token: None,
            stored_credentials: options.stored_credential.as_ref().map(StoredCredentials::from),
            info_3d_secure: None,
        };
        match &request.payment_method {
            PaymentMethod::CreditCard(card) => {
                let expiration = card.expiration()?;
                details.card = Some(CardSsl {
                    card_number: Secret::new(card.number.get_card_no()),
                    expiry_date: ExpiryDate {
                        date: Date {
                            month: expiration.two_digit_month(),
                            year: expiration.four_digit_year(),
                        },
                    },
                    card_holder_name: card.name.clone(),
                    cvc: options
                        .should_send_cvv()
                        .then(|| card.get_verification_value())
                        .flatten(),
                    card_address: options.get_billing_address().map(|address| CardAddress {
                        address: WorldpayAddress::from(address),
                    }),
                });
                details.info_3d_secure = options.three_d_secure.as_ref().map(Info3DSecure::from);
            }
            PaymentMethod::NetworkToken(token) => {
                let expiration = token.expiration()?;
                details.token = Some(EmvcoToken {
                    token_type: match token.source {
                        TokenSource::ApplePay => TokenType::Applepay,
                        TokenSource::GooglePay => TokenType::Googlepay,
                        TokenSource::NetworkToken => TokenType::Networktoken,
                    },
                    token_number: Secret::new(token.number.get_network_token()),
                    expiry_date: ExpiryDate {
                        date: Date {
                            month: expiration.two_digit_month(),
                            year: expiration.four_digit_year(),
                        },
                    },
                    card_holder_name: token.name.clone(),
                    cryptogram: token.payment_cryptogram.clone(),
                    eci_indicator: token.eci.clone(),
                });
            }
            payment_method @ (PaymentMethod::Check(_) | PaymentMethod::StoredToken(_)) => {
                Err(payment_method.not_supported(CONNECTOR))?
            }
        }
        Ok(details)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shopper {
    shopper_email_address: Email,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "@orderCode")]
    order_code: String,
    description: String,
    amount: Amount,
    payment_details: PaymentDetails,
    shopper: Option<Shopper>,
}

#[derive(Debug, Serialize)]
pub struct Submit {
    order: Order,
}

#[derive(Debug, Serialize)]
pub struct Empty {}

#[derive(Debug, Serialize)]
pub struct AmountModification {
    amount: Amount,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Modification {
    Capture(AmountModification),
    Refund(AmountModification),
    Cancel(Empty),
}

#[derive(Debug, Serialize)]
pub struct OrderModification {
    #[serde(rename = "@orderCode")]
    order_code: String,
    #[serde(rename = "$value")]
    modification: Modification,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Modify {
    order_modification: OrderModification,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct PaymentService {
    #[serde(rename = "@version")]
    version: &'static str,
    #[serde(rename = "@merchantCode")]
    merchant_code: Secret<String>,
    submit: Option<Submit>,
    modify: Option<Modify>,
}

impl PaymentService {
    fn new(connector_auth_type: &ConnectorAuthType) -> Result<Self, Error> {
        let auth = WorldpayAuthType::try_from(connector_auth_type)?;
        Ok(Self {
            version: API_VERSION,
            merchant_code: auth.merchant_code,
            submit: None,
            modify: None,
        })
    }

    fn modification(
        connector_auth_type: &ConnectorAuthType,
        order_code: String,
        modification: Modification,
    ) -> Result<Self, Error> {
        Ok(Self {
            modify: Some(Modify {
                order_modification: OrderModification {
                    order_code,
                    modification,
                },
            }),
            ..Self::new(connector_auth_type)?
        })
    }
}

/// A `paymentService` document. Every flow posts the same root element.
#[derive(Debug)]
pub struct WorldpayRequest {
    service: PaymentService,
}

impl utils::XmlRequestBody for WorldpayRequest {
    fn render_xml(&self) -> CustomResult<Secret<String>, ConnectorError> {
        let body = utils::to_xml_with_root("paymentService", &self.service)?;
        Ok(Secret::new(format!(
            "{}{DOC_TYPE}{body}",
            utils::XML_DECLARATION
        )))
    }
}

pub type WorldpayPaymentsRequest = WorldpayRequest;
pub type WorldpayCaptureRequest = WorldpayRequest;
pub type WorldpayRefundRequest = WorldpayRequest;
pub type WorldpayVoidRequest = WorldpayRequest;

impl
    TryFrom<
        WorldpayRouterData<
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>,
        >,
    > for WorldpayPaymentsRequest
{
    type Error = Error;

    fn try_from(
        item: WorldpayRouterData<
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let request = &router_data.request;
        let currency = request.currency();
        let value = convert_amount(item.connector.amount_converter, request.amount, currency)?;
        let order = Order {
            order_code: order_code(&request.options)?,
            description: request
                .options
                .description
                .clone()
                .filter(|description| !description.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            amount: Amount::new(value, currency),
            payment_details: PaymentDetails::try_from_request(request)?,
            shopper: request.options.email.clone().map(|email| Shopper {
                shopper_email_address: email,
            }),
        };

        Ok(Self {
            service: PaymentService {
                submit: Some(Submit { order }),
                ..PaymentService::new(&router_data.connector_auth_type)?
            },
        })
    }
}

/// The order code leads the composite authorization, so it may not contain its delimiter.
pub fn order_code(options: &TransactionOptions) -> Result<String, Error> {
    let order_id = options.get_order_id()?;
    if order_id.contains(AUTHORIZATION_DELIMITER) {
        return Err(ConnectorError::InvalidDataFormat {
            field_name: "order_id",
        }
        .into());
    }
    Ok(order_id.clone())
}

impl
    TryFrom<
        WorldpayRouterData<
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>,
        >,
    > for WorldpayCaptureRequest
{
    type Error = Error;

    fn try_from(
        item: WorldpayRouterData<
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let reference = OrderReference::parse(&router_data.request.authorization)?;
        let currency = router_data.request.options.currency.unwrap_or(reference.currency);
        let value = convert_amount(
            item.connector.amount_converter,
            router_data.request.amount,
            currency,
        )?;
        Ok(Self {
            service: PaymentService::modification(
                &router_data.connector_auth_type,
                reference.order_code,
                Modification::Capture(AmountModification {
                    amount: Amount::new(value, currency),
                }),
            )?,
        })
    }
}

impl TryFrom<WorldpayRouterData<RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>>>
    for WorldpayRefundRequest
{
    type Error = Error;

    fn try_from(
        item: WorldpayRouterData<RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>>,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let reference = OrderReference::parse(&router_data.request.authorization)?;
        let currency = router_data.request.options.currency.unwrap_or(reference.currency);
        let value = convert_amount(
            item.connector.amount_converter,
            router_data.request.amount,
            currency,
        )?;
        Ok(Self {
            service: PaymentService::modification(
                &router_data.connector_auth_type,
                reference.order_code,
                Modification::Refund(AmountModification {
                    amount: Amount::new(value, currency),
                }),
            )?,
        })
    }
}

impl TryFrom<WorldpayRouterData<RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>>>
    for WorldpayVoidRequest
{
    type Error = Error;

    fn try_from(
        item: WorldpayRouterData<RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>>,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let reference = OrderReference::parse(&router_data.request.authorization)?;
        Ok(Self {
            service: PaymentService::modification(
                &router_data.connector_auth_type,
                reference.order_code,
                Modification::Cancel(Empty {}),
            )?,
        })
    }
}

// Responses

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DescribedCode {
    #[serde(rename = "@code")]
    pub code: Option<String>,
    #[serde(rename = "@description")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReplyError {
    #[serde(rename = "@code")]
    pub code: Option<String>,
    #[serde(rename = "$text")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SchemeResponse {
    #[serde(rename = "transactionIdentifier")]
    pub transaction_identifier: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthorisationId {
    #[serde(rename = "@id")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LastEvent {
    Authorised,
    Captured,
    SentForAuthorisation,
    Settled,
    Refused,
    Cancelled,
    Error,
    Expired,
    SentForRefund,
    Refunded,
    #[serde(other)]
    Unknown,
}

impl LastEvent {
    pub fn is_successful(self) -> bool {
        matches!(
            self,
            Self::Authorised | Self::Captured | Self::SentForAuthorisation | Self::Settled
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub payment_method: Option<String>,
    pub last_event: Option<LastEvent>,
    #[serde(rename = "AuthorisationId")]
    pub authorisation_id: Option<AuthorisationId>,
    #[serde(rename = "CVCResultCode")]
    pub cvc_result_code: Option<DescribedCode>,
    #[serde(rename = "AVSResultCode")]
    pub avs_result_code: Option<DescribedCode>,
    #[serde(rename = "ISO8583ReturnCode")]
    pub iso8583_return_code: Option<DescribedCode>,
    pub scheme_response: Option<SchemeResponse>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrderStatus {
    #[serde(rename = "@orderCode")]
    pub order_code: Option<String>,
    pub payment: Option<Payment>,
    pub error: Option<ReplyError>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OkReply {
    pub capture_received: Option<serde_json::Value>,
    pub refund_received: Option<serde_json::Value>,
    pub cancel_received: Option<serde_json::Value>,
}

impl OkReply {
    fn is_received(&self) -> bool {
        self.capture_received.is_some()
            || self.refund_received.is_some()
            || self.cancel_received.is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub order_status: Option<OrderStatus>,
    pub error: Option<ReplyError>,
    pub ok: Option<OkReply>,
}

impl Reply {
    /// The document-level error, else the one nested in `orderStatus`.
    pub fn error(&self) -> Option<&ReplyError> {
        self.error.as_ref().or_else(|| {
            self.order_status
                .as_ref()
                .and_then(|status| status.error.as_ref())
        })
    }

    fn payment(&self) -> Option<&Payment> {
        self.order_status
            .as_ref()
            .and_then(|status| status.payment.as_ref())
    }

    pub fn is_successful(&self) -> bool {
        if self.error().is_some() {
            return false;
        }
        let authorised = self
            .payment()
            .and_then(|payment| payment.last_event)
            .is_some_and(LastEvent::is_successful);
        let received = self.ok.as_ref().is_some_and(OkReply::is_received);
        authorised || received
    }

    fn refusal(&self) -> Option<&DescribedCode> {
        self.payment()
            .and_then(|payment| payment.iso8583_return_code.as_ref())
    }

    pub fn error_code(&self) -> Option<String> {
        self.error()
            .and_then(|error| error.code.clone())
            .or_else(|| self.refusal().and_then(|refusal| refusal.code.clone()))
    }

    pub fn error_message(&self) -> Option<String> {
        self.error()
            .and_then(|error| error.message.clone())
            .or_else(|| {
                self.refusal()
                    .and_then(|refusal| refusal.description.clone())
            })
            .or_else(|| {
                self.payment()
                    .and_then(|payment| payment.last_event)
                    .map(|event| event.to_string())
            })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PaymentServiceReply {
    pub reply: Option<Reply>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorldpayResponse {
    #[serde(rename = "paymentService")]
    pub payment_service: PaymentServiceReply,
}

pub type WorldpayPaymentsResponse = WorldpayResponse;
pub type WorldpayCaptureResponse = WorldpayResponse;
pub type WorldpayRefundResponse = WorldpayResponse;
pub type WorldpayVoidResponse = WorldpayResponse;

fn avs_code(description: &str) -> Option<&'static str> {
    match description {
        "A" => Some("M"),
        "B" => Some("P"),
        "C" => Some("Z"),
        "D" => Some("B"),
        "E" | "H" => Some("I"),
        "F" => Some("A"),
        "G" | "I" | "J" => Some("C"),
        _ => None,
    }
}

fn cvc_code(description: &str) -> Option<&'static str> {
    match description {
        "A" | "MATCHED" => Some("M"),
        "B" | "C" | "NOT CHECKED BY ACQUIRER" | "NOT SUPPLIED BY SHOPPER" => Some("P"),
        "D" | "FAILED" | "NOT MATCHED" => Some("N"),
        "UNKNOWN" | "NO RESPONSE FROM ACQUIRER" => Some("U"),
        _ => None,
    }
}

/// How each flow reports the authorization of a successful reply.
pub trait WorldpayAuthorization {
    fn authorization(&self, reply: &Reply) -> Option<String>;
}

impl WorldpayAuthorization for PaymentsAuthorizeData {
    fn authorization(&self, reply: &Reply) -> Option<String> {
        let order_code = reply
            .order_status
            .as_ref()
            .and_then(|status| status.order_code.clone())
            .filter(|code| !code.is_empty())?;
        Some(
            OrderReference {
                order_code,
                amount: self.amount,
                currency: self.currency(),
            }
            .to_string(),
        )
    }
}

macro_rules! follow_up_authorization {
    ($($request:ty),+) => {
        $(
            impl WorldpayAuthorization for $request {
                fn authorization(&self, _reply: &Reply) -> Option<String> {
                    Some(self.authorization.clone())
                }
            }
        )+
    };
}

follow_up_authorization!(PaymentsCaptureData, RefundsData, PaymentVoidData);

impl<F, Req: WorldpayAuthorization>
    TryFrom<ResponseRouterData<WorldpayResponse, RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>>>
    for RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            WorldpayResponse,
            RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            params,
            router_data,
            ..
        } = item;
        let reply = response.payment_service.reply.unwrap_or_default();
        let success = reply.is_successful();
        let payment = reply.payment().cloned().unwrap_or_default();
        let message = if success {
            SUCCESS_MESSAGE.to_string()
        } else {
            reply.error_message().unwrap_or_default()
        };

        Ok(Self {
            response: Ok(GatewayResponse {
                success,
                message: Message::Text(message),
                authorization: if success {
                    router_data.request.authorization(&reply)
                } else {
                    None
                },
                params,
                test_mode: router_data.resource_common_data.test_mode,
                error_code: if success { None } else { reply.error_code() },
                avs_result: payment
                    .avs_result_code
                    .and_then(|code| code.description)
                    .as_deref()
                    .and_then(avs_code)
                    .and_then(AvsResult::from_code),
                cvv_result: payment
                    .cvc_result_code
                    .and_then(|code| code.description)
                    .as_deref()
                    .and_then(cvc_code)
                    .and_then(CvvResult::from_code),
                network_transaction_id: payment
                    .scheme_response
                    .and_then(|scheme| scheme.transaction_identifier)
                    .filter(|id| !id.is_empty()),
                ..Default::default()
            }),
            ..router_data
        })
    }
}
