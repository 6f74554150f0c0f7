use std::str::FromStr;

use common_enums::{BankAccountType, BankHolderType, StoredCredentialInitiator, StoredCredentialReason};
use common_utils::{pii::Email, CustomResult, StringMajorUnit};
use domain_types::{
    connector_flow::{Authorize, Capture, Refund, Store, Unstore, Void},
    connector_types::PaymentFlowData,
    errors::ConnectorError,
    payment_address::Address,
    payment_method_data::{Check, PaymentMethod},
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    router_request_types::{
        PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, RefundsData, StoreData,
        TransactionOptions, UnstoreData,
    },
    router_response_types::{AvsResult, CvvResult, GatewayResponse, Message},
    utils::{convert_amount, missing_field_err, require_authorization, Error},
};
use hyperswitch_masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;

use super::AuthorizeDotNetRouterData;
use crate::{
    types::ResponseRouterData,
    utils::{self, deserialize_xml_optional, OneOrMany, XmlRequestBody},
};

const CONNECTOR: &str = "authorizedotnet";
const XMLNS: &str = "AnetApi/xml/v1/schema/AnetApiSchema.xsd";
const CIM_STORE: &str = "cim_store";
// refId, invoiceNumber and merchantCustomerId are capped at 20 characters
const MAX_ID_LENGTH: usize = 20;

fn truncate(value: &str, length: usize) -> String {
    value.chars().take(length).collect()
}

pub struct AuthorizeDotNetAuthType {
    pub name: Secret<String>,
    pub transaction_key: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for AuthorizeDotNetAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::BodyKey { api_key, key1 } => Ok(Self {
                name: api_key.clone(),
                transaction_key: key1.clone(),
            }),
            _ => Err(ConnectorError::FailedToObtainAuthType)?,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantAuthentication {
    name: Secret<String>,
    transaction_key: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for MerchantAuthentication {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        let auth = AuthorizeDotNetAuthType::try_from(auth_type)?;
        Ok(Self {
            name: auth.name,
            transaction_key: auth.transaction_key,
        })
    }
}

/// Kind of payment an authorization was made with, the last component of the authorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum PaymentKind {
    CreditCard,
    Echeck,
}

/// `transId#last4#credit_card|echeck`
///
/// `last4` is empty when the gateway echoed no account number; only refunds need it.
#[derive(Debug, PartialEq, Eq)]
pub struct TransactionAuthorization {
    pub trans_id: String,
    pub last4: String,
    pub kind: PaymentKind,
}

impl TransactionAuthorization {
    pub fn parse(authorization: &str) -> Result<Self, Error> {
        let authorization = require_authorization(authorization)?;
        let invalid = || ConnectorError::InvalidAuthorization {
            authorization: authorization.to_string(),
            connector: CONNECTOR,
        };
        match authorization.split('#').collect::<Vec<_>>().as_slice() {
            [trans_id, last4, kind] if !trans_id.is_empty() => Ok(Self {
                trans_id: (*trans_id).to_string(),
                last4: (*last4).to_string(),
                kind: PaymentKind::from_str(kind).map_err(|_| invalid())?,
            }),
            _ => Err(invalid())?,
        }
    }
}

impl std::fmt::Display for TransactionAuthorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}#{}", self.trans_id, self.last4, self.kind)
    }
}

/// `customerProfileId#customerPaymentProfileId#cim_store`
#[derive(Debug, PartialEq, Eq)]
pub struct ProfileAuthorization {
    pub customer_profile_id: String,
    pub payment_profile_id: String,
}

impl ProfileAuthorization {
    pub fn parse(authorization: &str) -> Result<Self, Error> {
        match utils::split_authorization(authorization, '#', 3, CONNECTOR)?.as_slice() {
            [customer_profile_id, payment_profile_id, CIM_STORE] => Ok(Self {
                customer_profile_id: (*customer_profile_id).to_string(),
                payment_profile_id: (*payment_profile_id).to_string(),
            }),
            _ => Err(ConnectorError::InvalidAuthorization {
                authorization: authorization.to_string(),
                connector: CONNECTOR,
            })?,
        }
    }
}

impl std::fmt::Display for ProfileAuthorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}#{}#{CIM_STORE}",
            self.customer_profile_id, self.payment_profile_id
        )
    }
}

// Requests

#[derive(Debug, Clone, Copy, strum::Display, serde_with::SerializeDisplay)]
#[strum(serialize_all = "camelCase")]
pub enum TransactionType {
    AuthCaptureTransaction,
    AuthOnlyTransaction,
    PriorAuthCaptureTransaction,
    RefundTransaction,
    VoidTransaction,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardDetails {
    card_number: Secret<String>,
    expiration_date: Secret<String>,
    card_code: Option<Secret<String>>,
    is_payment_token: Option<bool>,
    cryptogram: Option<Secret<String>>,
}

#[derive(Debug, Clone, Copy, strum::Display, serde_with::SerializeDisplay)]
#[strum(serialize_all = "camelCase")]
pub enum AccountType {
    Checking,
    Savings,
    BusinessChecking,
}

impl From<&Check> for AccountType {
    fn from(check: &Check) -> Self {
        match (check.account_type, check.account_holder_type) {
            (BankAccountType::Savings, _) => Self::Savings,
            (BankAccountType::Checking, BankHolderType::Business) => Self::BusinessChecking,
            (BankAccountType::Checking, BankHolderType::Personal) => Self::Checking,
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountDetails {
    account_type: Option<AccountType>,
    routing_number: Secret<String>,
    account_number: Secret<String>,
    name_on_account: Option<Secret<String>>,
    echeck_type: &'static str,
    check_number: Option<String>,
}

impl From<&Check> for BankAccountDetails {
    fn from(check: &Check) -> Self {
        Self {
            account_type: Some(AccountType::from(check)),
            routing_number: check.routing_number.clone(),
            account_number: check.account_number.clone(),
            name_on_account: Some(Secret::new(truncate(check.name.peek(), 22))),
            echeck_type: "WEB",
            check_number: check.check_number.clone(),
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    credit_card: Option<CreditCardDetails>,
    bank_account: Option<BankAccountDetails>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProfileReference {
    payment_profile_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetails {
    customer_profile_id: String,
    payment_profile: PaymentProfileReference,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    invoice_number: Option<String>,
    description: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct CustomerDetails {
    id: Option<String>,
    email: Option<Email>,
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillTo {
    first_name: Option<Secret<String>>,
    last_name: Option<Secret<String>>,
    company: Option<String>,
    address: Option<Secret<String>>,
    city: Option<String>,
    state: Option<Secret<String>>,
    zip: Option<Secret<String>>,
    country: Option<String>,
    phone_number: Option<Secret<String>>,
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipTo {
    first_name: Option<Secret<String>>,
    last_name: Option<Secret<String>>,
    company: Option<String>,
    address: Option<Secret<String>>,
    city: Option<String>,
    state: Option<Secret<String>>,
    zip: Option<Secret<String>>,
    country: Option<String>,
}

impl From<&Address> for BillTo {
    fn from(address: &Address) -> Self {
        Self {
            first_name: address.get_optional_first_name(),
            last_name: address.get_optional_last_name(),
            company: address.company.clone(),
            address: address.get_combined_address_line(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip: address.zip.clone(),
            country: address.country.clone(),
            phone_number: address.phone.clone(),
        }
    }
}

impl From<&Address> for ShipTo {
    fn from(address: &Address) -> Self {
        Self {
            first_name: address.get_optional_first_name(),
            last_name: address.get_optional_last_name(),
            company: address.company.clone(),
            address: address.get_combined_address_line(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip: address.zip.clone(),
            country: address.country.clone(),
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardholderAuthentication {
    authentication_indicator: Option<String>,
    cardholder_authentication_value: Option<Secret<String>>,
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingOptions {
    is_first_recurring_payment: Option<bool>,
    is_first_subsequent_auth: Option<bool>,
    is_subsequent_auth: Option<bool>,
    is_stored_credentials: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsequentAuthInformation {
    original_network_trans_id: String,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    transaction_type: TransactionType,
    amount: Option<StringMajorUnit>,
    payment: Option<PaymentDetails>,
    profile: Option<ProfileDetails>,
    ref_trans_id: Option<String>,
    order: Option<Order>,
    customer: Option<CustomerDetails>,
    bill_to: Option<BillTo>,
    ship_to: Option<ShipTo>,
    #[serde(rename = "customerIP")]
    customer_ip: Option<Secret<String>>,
    cardholder_authentication: Option<CardholderAuthentication>,
    processing_options: Option<ProcessingOptions>,
    subsequent_auth_information: Option<SubsequentAuthInformation>,
}

impl TransactionRequest {
    fn follow_up(transaction_type: TransactionType, ref_trans_id: String) -> Self {
        Self {
            transaction_type,
            amount: None,
            payment: None,
            profile: None,
            ref_trans_id: Some(ref_trans_id),
            order: None,
            customer: None,
            bill_to: None,
            ship_to: None,
            customer_ip: None,
            cardholder_authentication: None,
            processing_options: None,
            subsequent_auth_information: None,
        }
    }
}

/// Body of every `createTransactionRequest` call.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeDotNetPaymentsRequest {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    merchant_authentication: MerchantAuthentication,
    ref_id: Option<String>,
    transaction_request: TransactionRequest,
}

pub type AuthorizeDotNetCaptureRequest = AuthorizeDotNetPaymentsRequest;
pub type AuthorizeDotNetVoidRequest = AuthorizeDotNetPaymentsRequest;
pub type AuthorizeDotNetRefundRequest = AuthorizeDotNetPaymentsRequest;

impl XmlRequestBody for AuthorizeDotNetPaymentsRequest {
    fn render_xml(&self) -> CustomResult<Secret<String>, ConnectorError> {
        let body = utils::to_xml_with_root("createTransactionRequest", self)?;
        Ok(Secret::new(format!("{}{body}", utils::XML_DECLARATION)))
    }
}

fn card_payment(
    card: &domain_types::payment_method_data::Card,
    send_cvv: bool,
) -> Result<PaymentDetails, Error> {
    Ok(PaymentDetails {
        credit_card: Some(CreditCardDetails {
            card_number: Secret::new(card.number.get_card_no()),
            expiration_date: card.expiration()?.year_month_iso(),
            card_code: send_cvv
                .then(|| card.get_verification_value())
                .flatten(),
            is_payment_token: None,
            cryptogram: None,
        }),
        bank_account: None,
    })
}

fn payment_source(
    payment_method: &PaymentMethod,
    options: &TransactionOptions,
) -> Result<(Option<PaymentDetails>, Option<ProfileDetails>), Error> {
    match payment_method {
        PaymentMethod::CreditCard(card) => {
            Ok((Some(card_payment(card, options.should_send_cvv())?), None))
        }
        PaymentMethod::NetworkToken(token) => Ok((
            Some(PaymentDetails {
                credit_card: Some(CreditCardDetails {
                    card_number: Secret::new(token.number.get_network_token()),
                    expiration_date: token.expiration()?.year_month_iso(),
                    card_code: None,
                    is_payment_token: Some(true),
                    cryptogram: Some(token.payment_cryptogram.clone()),
                }),
                bank_account: None,
            }),
            None,
        )),
        PaymentMethod::Check(check) => Ok((
            Some(PaymentDetails {
                credit_card: None,
                bank_account: Some(BankAccountDetails::from(check)),
            }),
            None,
        )),
        PaymentMethod::StoredToken(token) => {
            let profile = ProfileAuthorization::parse(token.peek())?;
            Ok((
                None,
                Some(ProfileDetails {
                    customer_profile_id: profile.customer_profile_id,
                    payment_profile: PaymentProfileReference {
                        payment_profile_id: profile.payment_profile_id,
                    },
                }),
            ))
        }
    }
}

fn processing_options(options: &TransactionOptions) -> Option<ProcessingOptions> {
    let stored_credential = options.stored_credential.as_ref()?;
    let mut processing = ProcessingOptions::default();
    if stored_credential.initial_transaction {
        if stored_credential.reason_type == StoredCredentialReason::Recurring {
            processing.is_first_recurring_payment = Some(true);
        } else {
            processing.is_first_subsequent_auth = Some(true);
        }
    } else if stored_credential.initiator == StoredCredentialInitiator::Cardholder {
        processing.is_stored_credentials = Some(true);
    } else {
        processing.is_subsequent_auth = Some(true);
    }
    Some(processing)
}

fn subsequent_auth_information(options: &TransactionOptions) -> Option<SubsequentAuthInformation> {
    let stored_credential = options.stored_credential.as_ref()?;
    if stored_credential.initial_transaction || !stored_credential.is_merchant_initiated() {
        return None;
    }
    stored_credential
        .network_transaction_id
        .clone()
        .map(|original_network_trans_id| SubsequentAuthInformation {
            original_network_trans_id,
        })
}

impl
    TryFrom<
        AuthorizeDotNetRouterData<
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>,
        >,
    > for AuthorizeDotNetPaymentsRequest
{
    type Error = Error;

    fn try_from(
        item: AuthorizeDotNetRouterData<
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let request = &router_data.request;
        let options = &request.options;
        let (payment, profile) = payment_source(&request.payment_method, options)?;
        let transaction_type = if request.is_auto_capture() {
            TransactionType::AuthCaptureTransaction
        } else {
            TransactionType::AuthOnlyTransaction
        };
        let cardholder_authentication =
            options
                .three_d_secure
                .as_ref()
                .map(|three_ds| CardholderAuthentication {
                    authentication_indicator: three_ds.eci.clone(),
                    cardholder_authentication_value: three_ds.cavv.clone(),
                });
        let customer = (options.customer_id.is_some() || options.email.is_some()).then(|| {
            CustomerDetails {
                id: options.customer_id.clone(),
                email: options.email.clone(),
            }
        });

        Ok(Self {
            xmlns: XMLNS,
            merchant_authentication: MerchantAuthentication::try_from(
                &router_data.connector_auth_type,
            )?,
            ref_id: Some(truncate(
                &router_data.resource_common_data.connector_request_reference_id,
                MAX_ID_LENGTH,
            )),
            transaction_request: TransactionRequest {
                transaction_type,
                amount: Some(convert_amount(
                    item.connector.amount_converter,
                    request.amount,
                    request.currency(),
                )?),
                payment,
                profile,
                ref_trans_id: None,
                order: Some(Order {
                    invoice_number: options
                        .order_id
                        .as_deref()
                        .map(|order_id| truncate(order_id, MAX_ID_LENGTH)),
                    description: options.description.clone(),
                }),
                customer,
                bill_to: options.billing_address.as_ref().map(BillTo::from),
                ship_to: options.shipping_address.as_ref().map(ShipTo::from),
                customer_ip: options.ip.as_ref().map(|ip| Secret::new(ip.peek().clone())),
                cardholder_authentication,
                processing_options: processing_options(options),
                subsequent_auth_information: subsequent_auth_information(options),
            },
        })
    }
}

impl
    TryFrom<
        AuthorizeDotNetRouterData<
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>,
        >,
    > for AuthorizeDotNetPaymentsRequest
{
    type Error = Error;

    fn try_from(
        item: AuthorizeDotNetRouterData<
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let authorization = TransactionAuthorization::parse(&router_data.request.authorization)?;
        let mut transaction_request = TransactionRequest::follow_up(
            TransactionType::PriorAuthCaptureTransaction,
            authorization.trans_id,
        );
        transaction_request.amount = Some(convert_amount(
            item.connector.amount_converter,
            router_data.request.amount,
            router_data.request.options.get_currency(),
        )?);
        Ok(Self {
            xmlns: XMLNS,
            merchant_authentication: MerchantAuthentication::try_from(
                &router_data.connector_auth_type,
            )?,
            ref_id: None,
            transaction_request,
        })
    }
}

impl
    TryFrom<
        AuthorizeDotNetRouterData<
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>,
        >,
    > for AuthorizeDotNetPaymentsRequest
{
    type Error = Error;

    fn try_from(
        item: AuthorizeDotNetRouterData<
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let authorization = TransactionAuthorization::parse(&router_data.request.authorization)?;
        Ok(Self {
            xmlns: XMLNS,
            merchant_authentication: MerchantAuthentication::try_from(
                &router_data.connector_auth_type,
            )?,
            ref_id: None,
            transaction_request: TransactionRequest::follow_up(
                TransactionType::VoidTransaction,
                authorization.trans_id,
            ),
        })
    }
}

impl
    TryFrom<
        AuthorizeDotNetRouterData<
            RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>,
        >,
    > for AuthorizeDotNetPaymentsRequest
{
    type Error = Error;

    fn try_from(
        item: AuthorizeDotNetRouterData<
            RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let authorization = TransactionAuthorization::parse(&router_data.request.authorization)?;
        if authorization.last4.is_empty() {
            return Err(missing_field_err("authorization.last4")());
        }
        // Only the masked account is known at refund time.
        let masked_account = Secret::new(format!("XXXX{}", authorization.last4));
        let payment = match authorization.kind {
            PaymentKind::CreditCard => PaymentDetails {
                credit_card: Some(CreditCardDetails {
                    card_number: masked_account,
                    expiration_date: Secret::new("XXXX".to_string()),
                    card_code: None,
                    is_payment_token: None,
                    cryptogram: None,
                }),
                bank_account: None,
            },
            PaymentKind::Echeck => PaymentDetails {
                credit_card: None,
                bank_account: Some(BankAccountDetails {
                    account_type: None,
                    routing_number: Secret::new("XXXX".to_string()),
                    account_number: masked_account,
                    name_on_account: None,
                    echeck_type: "WEB",
                    check_number: None,
                }),
            },
        };
        let mut transaction_request = TransactionRequest::follow_up(
            TransactionType::RefundTransaction,
            authorization.trans_id,
        );
        transaction_request.amount = Some(convert_amount(
            item.connector.amount_converter,
            router_data.request.amount,
            router_data.request.options.get_currency(),
        )?);
        transaction_request.payment = Some(payment);
        Ok(Self {
            xmlns: XMLNS,
            merchant_authentication: MerchantAuthentication::try_from(
                &router_data.connector_auth_type,
            )?,
            ref_id: None,
            transaction_request,
        })
    }
}

// Customer profiles

#[derive(Debug, Clone, Copy, strum::Display, serde_with::SerializeDisplay)]
#[strum(serialize_all = "camelCase")]
pub enum ValidationMode {
    TestMode,
    LiveMode,
}

#[derive(Debug, Clone, Copy, strum::Display, serde_with::SerializeDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum CustomerType {
    Individual,
    Business,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProfile {
    customer_type: CustomerType,
    bill_to: Option<BillTo>,
    payment: PaymentDetails,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    merchant_customer_id: String,
    description: Option<String>,
    email: Option<Email>,
    payment_profiles: PaymentProfile,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeDotNetStoreRequest {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    merchant_authentication: MerchantAuthentication,
    profile: CustomerProfile,
    validation_mode: ValidationMode,
}

impl XmlRequestBody for AuthorizeDotNetStoreRequest {
    fn render_xml(&self) -> CustomResult<Secret<String>, ConnectorError> {
        let body = utils::to_xml_with_root("createCustomerProfileRequest", self)?;
        Ok(Secret::new(format!("{}{body}", utils::XML_DECLARATION)))
    }
}

impl
    TryFrom<
        AuthorizeDotNetRouterData<RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>>,
    > for AuthorizeDotNetStoreRequest
{
    type Error = Error;

    fn try_from(
        item: AuthorizeDotNetRouterData<
            RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let options = &router_data.request.options;
        let (payment, customer_type) = match &router_data.request.payment_method {
            PaymentMethod::CreditCard(card) => (card_payment(card, true)?, CustomerType::Individual),
            PaymentMethod::Check(check) => (
                PaymentDetails {
                    credit_card: None,
                    bank_account: Some(BankAccountDetails::from(check)),
                },
                match check.account_holder_type {
                    BankHolderType::Business => CustomerType::Business,
                    BankHolderType::Personal => CustomerType::Individual,
                },
            ),
            payment_method @ (PaymentMethod::NetworkToken(_) | PaymentMethod::StoredToken(_)) => {
                Err(payment_method.not_supported(CONNECTOR))?
            }
        };
        let merchant_customer_id = options
            .customer_id
            .as_ref()
            .or(options.order_id.as_ref())
            .unwrap_or(&router_data.resource_common_data.connector_request_reference_id);
        let validation_mode = if router_data.resource_common_data.test_mode {
            ValidationMode::TestMode
        } else {
            ValidationMode::LiveMode
        };

        Ok(Self {
            xmlns: XMLNS,
            merchant_authentication: MerchantAuthentication::try_from(
                &router_data.connector_auth_type,
            )?,
            profile: CustomerProfile {
                merchant_customer_id: truncate(merchant_customer_id, MAX_ID_LENGTH),
                description: options.description.clone(),
                email: options.email.clone(),
                payment_profiles: PaymentProfile {
                    customer_type,
                    bill_to: options.billing_address.as_ref().map(BillTo::from),
                    payment,
                },
            },
            validation_mode,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeDotNetUnstoreRequest {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    merchant_authentication: MerchantAuthentication,
    customer_profile_id: String,
}

impl XmlRequestBody for AuthorizeDotNetUnstoreRequest {
    fn render_xml(&self) -> CustomResult<Secret<String>, ConnectorError> {
        let body = utils::to_xml_with_root("deleteCustomerProfileRequest", self)?;
        Ok(Secret::new(format!("{}{body}", utils::XML_DECLARATION)))
    }
}

impl
    TryFrom<
        AuthorizeDotNetRouterData<
            RouterDataV2<Unstore, PaymentFlowData, UnstoreData, GatewayResponse>,
        >,
    > for AuthorizeDotNetUnstoreRequest
{
    type Error = Error;

    fn try_from(
        item: AuthorizeDotNetRouterData<
            RouterDataV2<Unstore, PaymentFlowData, UnstoreData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let profile = ProfileAuthorization::parse(&router_data.request.authorization)?;
        Ok(Self {
            xmlns: XMLNS,
            merchant_authentication: MerchantAuthentication::try_from(
                &router_data.connector_auth_type,
            )?,
            customer_profile_id: profile.customer_profile_id,
        })
    }
}

// Responses

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResponseMessage {
    pub code: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessages {
    pub result_code: Option<String>,
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub message: Option<OneOrMany<ResponseMessage>>,
}

impl ResponseMessages {
    fn is_ok(&self) -> bool {
        self.result_code.as_deref() == Some("Ok")
    }

    fn first(&self) -> Option<&ResponseMessage> {
        self.message.as_ref().and_then(OneOrMany::first)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransactionMessage {
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransactionMessages {
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub message: Option<OneOrMany<TransactionMessage>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionError {
    pub error_code: Option<String>,
    pub error_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransactionErrors {
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub error: Option<OneOrMany<TransactionError>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub response_code: Option<String>,
    pub auth_code: Option<String>,
    pub avs_result_code: Option<String>,
    pub cvv_result_code: Option<String>,
    pub trans_id: Option<String>,
    #[serde(rename = "refTransID")]
    pub ref_trans_id: Option<String>,
    pub account_number: Option<String>,
    pub account_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub messages: Option<TransactionMessages>,
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub errors: Option<TransactionErrors>,
    pub network_trans_id: Option<String>,
}

impl TransactionResponse {
    fn first_error(&self) -> Option<&TransactionError> {
        self.errors
            .as_ref()
            .and_then(|errors| errors.error.as_ref())
            .and_then(OneOrMany::first)
    }

    fn first_message(&self) -> Option<&TransactionMessage> {
        self.messages
            .as_ref()
            .and_then(|messages| messages.message.as_ref())
            .and_then(OneOrMany::first)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponseBody {
    pub ref_id: Option<String>,
    #[serde(default)]
    pub messages: ResponseMessages,
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub transaction_response: Option<TransactionResponse>,
}

/// `<createTransactionResponse>`, or the `<ErrorResponse>` sent for a malformed request.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthorizeDotNetPaymentsResponse {
    #[serde(rename = "createTransactionResponse", alias = "ErrorResponse", default)]
    pub body: TransactionResponseBody,
}

pub type AuthorizeDotNetCaptureResponse = AuthorizeDotNetPaymentsResponse;
pub type AuthorizeDotNetVoidResponse = AuthorizeDotNetPaymentsResponse;
pub type AuthorizeDotNetRefundResponse = AuthorizeDotNetPaymentsResponse;

const APPROVED: &str = "1";
const HELD_FOR_REVIEW: &str = "4";

/// What a transaction flow knows about the payment it runs on, used to complete the
/// authorization when the response leaves out the account.
pub trait AuthorizeDotNetTransactionFlow {
    fn payment_kind(&self) -> Option<PaymentKind> {
        None
    }

    fn prior_authorization(&self) -> Option<&str> {
        None
    }
}

impl AuthorizeDotNetTransactionFlow for PaymentsAuthorizeData {
    fn payment_kind(&self) -> Option<PaymentKind> {
        match self.payment_method {
            PaymentMethod::Check(_) => Some(PaymentKind::Echeck),
            PaymentMethod::CreditCard(_)
            | PaymentMethod::NetworkToken(_)
            | PaymentMethod::StoredToken(_) => Some(PaymentKind::CreditCard),
        }
    }
}

impl AuthorizeDotNetTransactionFlow for PaymentsCaptureData {
    fn prior_authorization(&self) -> Option<&str> {
        Some(&self.authorization)
    }
}

impl AuthorizeDotNetTransactionFlow for PaymentVoidData {
    fn prior_authorization(&self) -> Option<&str> {
        Some(&self.authorization)
    }
}

impl AuthorizeDotNetTransactionFlow for RefundsData {
    fn prior_authorization(&self) -> Option<&str> {
        Some(&self.authorization)
    }
}

fn compose_authorization<Req: AuthorizeDotNetTransactionFlow>(
    transaction: &TransactionResponse,
    request: &Req,
) -> Option<String> {
    let trans_id = transaction
        .trans_id
        .clone()
        .filter(|trans_id| !trans_id.is_empty())?;
    let prior = request
        .prior_authorization()
        .and_then(|authorization| TransactionAuthorization::parse(authorization).ok());
    let last4 = transaction
        .account_number
        .as_deref()
        .map(|account| account.trim_start_matches('X').to_string())
        .filter(|last4| !last4.is_empty())
        .or_else(|| prior.as_ref().map(|prior| prior.last4.clone()))
        .unwrap_or_default();
    let kind = match transaction.account_type.as_deref() {
        Some("eCheck") => PaymentKind::Echeck,
        Some(account_type) if !account_type.is_empty() => PaymentKind::CreditCard,
        _ => request
            .payment_kind()
            .or_else(|| prior.as_ref().map(|prior| prior.kind))
            .unwrap_or(PaymentKind::CreditCard),
    };
    Some(
        TransactionAuthorization {
            trans_id,
            last4,
            kind,
        }
        .to_string(),
    )
}

impl AuthorizeDotNetPaymentsResponse {
    fn into_gateway_response<Req: AuthorizeDotNetTransactionFlow>(
        self,
        params: Value,
        request: &Req,
        test_mode: bool,
    ) -> GatewayResponse {
        let body = self.body;
        let transaction = body.transaction_response.unwrap_or_default();
        let response_code = transaction.response_code.as_deref();
        let success = matches!(response_code, Some(APPROVED | HELD_FOR_REVIEW));
        let first_error = transaction.first_error();

        let message = first_error
            .and_then(|error| error.error_text.clone())
            .or_else(|| {
                transaction
                    .first_message()
                    .and_then(|message| message.description.clone())
            })
            .or_else(|| body.messages.first().and_then(|message| message.text.clone()))
            .unwrap_or_default();
        let error_code = if success {
            None
        } else {
            first_error
                .and_then(|error| error.error_code.clone())
                .or_else(|| body.messages.first().and_then(|message| message.code.clone()))
        };

        GatewayResponse {
            success,
            message: Message::Text(message),
            authorization: compose_authorization(&transaction, request),
            params,
            test_mode,
            error_code,
            avs_result: transaction
                .avs_result_code
                .as_deref()
                .and_then(AvsResult::from_code),
            cvv_result: transaction
                .cvv_result_code
                .as_deref()
                .and_then(CvvResult::from_code),
            network_transaction_id: transaction
                .network_trans_id
                .clone()
                .filter(|id| !id.is_empty()),
            fraud_review: response_code == Some(HELD_FOR_REVIEW),
        }
    }
}

impl<F, Req: AuthorizeDotNetTransactionFlow>
    TryFrom<
        ResponseRouterData<
            AuthorizeDotNetPaymentsResponse,
            RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>,
        >,
    > for RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            AuthorizeDotNetPaymentsResponse,
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
            &router_data.request,
            router_data.resource_common_data.test_mode,
        );
        Ok(Self {
            response: Ok(gateway_response),
            ..router_data
        })
    }
}

/// Field names of the comma separated direct response, by position. Unlisted positions
/// are reserved and dropped.
const DIRECT_RESPONSE_FIELDS: &[(usize, &str)] = &[
    (0, "response_code"),
    (1, "response_subcode"),
    (2, "response_reason_code"),
    (3, "response_reason_text"),
    (4, "approval_code"),
    (5, "avs_result_code"),
    (6, "transaction_id"),
    (7, "invoice_number"),
    (8, "order_description"),
    (9, "amount"),
    (10, "method"),
    (11, "transaction_type"),
    (12, "customer_id"),
    (13, "first_name"),
    (14, "last_name"),
    (15, "company"),
    (16, "address"),
    (17, "city"),
    (18, "state"),
    (19, "zip_code"),
    (20, "country"),
    (21, "phone"),
    (22, "fax"),
    (23, "email_address"),
    (24, "ship_to_first_name"),
    (25, "ship_to_last_name"),
    (26, "ship_to_company"),
    (27, "ship_to_address"),
    (28, "ship_to_city"),
    (29, "ship_to_state"),
    (30, "ship_to_zip_code"),
    (31, "ship_to_country"),
    (32, "tax"),
    (33, "duty"),
    (34, "freight"),
    (35, "tax_exempt"),
    (36, "purchase_order_number"),
    (37, "md5_hash"),
    (38, "card_code_response"),
    (39, "cardholder_authentication_verification_response"),
    (50, "account_number"),
    (51, "card_type"),
    (52, "split_tender_id"),
    (53, "requested_amount"),
    (54, "balance_on_card"),
];

/// Maps a `validationDirectResponse` onto named fields. Missing trailing positions and empty
/// positions both read as `""`.
pub fn parse_direct_response(raw: &str) -> Map<String, Value> {
    let values: Vec<&str> = raw.split(',').collect();
    DIRECT_RESPONSE_FIELDS
        .iter()
        .map(|(position, name)| {
            let value = values.get(*position).copied().unwrap_or_default();
            ((*name).to_string(), Value::String(value.to_string()))
        })
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericStringList {
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub numeric_string: Option<OneOrMany<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StringList {
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub string: Option<OneOrMany<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfileResponseBody {
    #[serde(default)]
    pub messages: ResponseMessages,
    pub customer_profile_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub customer_payment_profile_id_list: Option<NumericStringList>,
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub validation_direct_response_list: Option<StringList>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthorizeDotNetStoreResponse {
    #[serde(
        rename = "createCustomerProfileResponse",
        alias = "ErrorResponse",
        default
    )]
    pub body: CustomerProfileResponseBody,
}

impl
    TryFrom<
        ResponseRouterData<
            AuthorizeDotNetStoreResponse,
            RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>,
        >,
    > for RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            AuthorizeDotNetStoreResponse,
            RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            params,
            router_data,
            ..
        } = item;
        let body = response.body;
        let success = body.messages.is_ok();
        let first_message = body.messages.first().cloned().unwrap_or_default();
        let direct_response = body
            .validation_direct_response_list
            .as_ref()
            .and_then(|list| list.string.as_ref())
            .and_then(OneOrMany::first)
            .map(|raw| parse_direct_response(raw));
        let payment_profile_id = body
            .customer_payment_profile_id_list
            .as_ref()
            .and_then(|list| list.numeric_string.as_ref())
            .and_then(OneOrMany::first)
            .cloned();
        let authorization = match (success, body.customer_profile_id, payment_profile_id) {
            (true, Some(customer_profile_id), Some(payment_profile_id)) => Some(
                ProfileAuthorization {
                    customer_profile_id,
                    payment_profile_id,
                }
                .to_string(),
            ),
            _ => None,
        };
        let message = match direct_response {
            Some(fields) => Message::Structured(fields),
            None => Message::Text(first_message.text.unwrap_or_default()),
        };

        Ok(Self {
            response: Ok(GatewayResponse {
                success,
                message,
                authorization,
                params,
                test_mode: router_data.resource_common_data.test_mode,
                error_code: if success { None } else { first_message.code },
                ..Default::default()
            }),
            ..router_data
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProfileMessagesBody {
    #[serde(default)]
    pub messages: ResponseMessages,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthorizeDotNetUnstoreResponse {
    #[serde(
        rename = "deleteCustomerProfileResponse",
        alias = "ErrorResponse",
        default
    )]
    pub body: ProfileMessagesBody,
}

impl
    TryFrom<
        ResponseRouterData<
            AuthorizeDotNetUnstoreResponse,
            RouterDataV2<Unstore, PaymentFlowData, UnstoreData, GatewayResponse>,
        >,
    > for RouterDataV2<Unstore, PaymentFlowData, UnstoreData, GatewayResponse>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            AuthorizeDotNetUnstoreResponse,
            RouterDataV2<Unstore, PaymentFlowData, UnstoreData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            params,
            router_data,
            ..
        } = item;
        let success = response.body.messages.is_ok();
        let first_message = response.body.messages.first().cloned().unwrap_or_default();
        Ok(Self {
            response: Ok(GatewayResponse {
                success,
                message: Message::Text(first_message.text.unwrap_or_default()),
                authorization: Some(router_data.request.authorization.clone()),
                params,
                test_mode: router_data.resource_common_data.test_mode,
                error_code: if success { None } else { first_message.code },
                ..Default::default()
            }),
            ..router_data
        })
    }
}

/// Code and text of the first `messages/message` under the document root.
pub fn first_root_message(params: &Value) -> Option<ResponseMessage> {
    let root = params.as_object()?.values().next()?;
    let messages: ResponseMessages = serde_json::from_value(root.get("messages")?.clone()).ok()?;
    messages.first().cloned()
}
