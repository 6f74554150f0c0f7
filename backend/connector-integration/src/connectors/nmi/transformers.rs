use common_enums::{
    BankAccountType, BankHolderType, Currency, StoredCredentialInitiator, StoredCredentialReason,
};
use common_utils::{
    pii::{Email, IpAddressValue},
    MinorUnit, StringMajorUnit,
};
use domain_types::{
    connector_flow::{Authorize, Capture, Refund, Store, Unstore, Verify, Void},
    connector_types::PaymentFlowData,
    errors::ConnectorError,
    payment_address::Address,
    payment_method_data::{Card, Check, NetworkTokenCard, PaymentMethod},
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    router_request_types::{
        PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, RefundsData, StoreData,
        StoredCredential, TransactionOptions, UnstoreData, VerifyData,
    },
    router_response_types::{AvsResult, CvvResult, GatewayResponse, Message},
    utils::{convert_amount, require_authorization, Error},
};
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::NmiRouterData;
use crate::types::ResponseRouterData;

const CONNECTOR: &str = "nmi";

/// Merchants authenticate with a `security_key`, or with legacy `username`/`password`.
pub enum NmiAuthType {
    SecurityKey(Secret<String>),
    Login {
        username: Secret<String>,
        password: Secret<String>,
    },
}

impl TryFrom<&ConnectorAuthType> for NmiAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::HeaderKey { api_key } => Ok(Self::SecurityKey(api_key.clone())),
            ConnectorAuthType::BodyKey { api_key, key1 } => Ok(Self::Login {
                username: api_key.clone(),
                password: key1.clone(),
            }),
            _ => Err(ConnectorError::FailedToObtainAuthType)?,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Sale,
    Auth,
    Capture,
    Refund,
    Void,
    Validate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerVaultAction {
    AddCustomer,
    DeleteCustomer,
}

/// Second half of an NMI authorization, `transactionid#credit_card`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NmiPaymentType {
    CreditCard,
    Check,
}

impl NmiPaymentType {
    fn of(payment_method: &PaymentMethod) -> Self {
        match payment_method {
            PaymentMethod::Check(_) => Self::Check,
            _ => Self::CreditCard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NmiInitiator {
    Customer,
    Merchant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoredCredentialIndicator {
    Stored,
    Used,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingMethod {
    Recurring,
    Installment,
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct NmiTransactRequest {
    #[serde(rename = "type")]
    transaction_type: Option<TransactionType>,
    security_key: Option<Secret<String>>,
    username: Option<Secret<String>>,
    password: Option<Secret<String>>,
    amount: Option<StringMajorUnit>,
    currency: Option<Currency>,
    transactionid: Option<String>,
    payment: Option<NmiPaymentType>,
    customer_vault: Option<CustomerVaultAction>,
    customer_vault_id: Option<Secret<String>>,
    ccnumber: Option<Secret<String>>,
    ccexp: Option<Secret<String>>,
    cvv: Option<Secret<String>>,
    cavv: Option<Secret<String>>,
    eci: Option<String>,
    xid: Option<String>,
    three_ds_version: Option<String>,
    directory_server_id: Option<String>,
    checkname: Option<Secret<String>>,
    checkaba: Option<Secret<String>>,
    checkaccount: Option<Secret<String>>,
    account_holder_type: Option<String>,
    account_type: Option<String>,
    sec_code: Option<String>,
    first_name: Option<Secret<String>>,
    last_name: Option<Secret<String>>,
    company: Option<String>,
    address1: Option<Secret<String>>,
    address2: Option<Secret<String>>,
    city: Option<String>,
    state: Option<Secret<String>>,
    zip: Option<Secret<String>>,
    country: Option<String>,
    phone: Option<Secret<String>>,
    email: Option<Email>,
    ipaddress: Option<IpAddressValue>,
    customer_id: Option<String>,
    orderid: Option<String>,
    orderdescription: Option<String>,
    descriptor: Option<String>,
    initiated_by: Option<NmiInitiator>,
    stored_credential_indicator: Option<StoredCredentialIndicator>,
    initial_transaction_id: Option<String>,
    billing_method: Option<BillingMethod>,
    void_reason: Option<String>,
}

impl NmiTransactRequest {
    fn new(auth: NmiAuthType, transaction_type: Option<TransactionType>) -> Self {
        let mut request = Self {
            transaction_type,
            ..Default::default()
        };
        match auth {
            NmiAuthType::SecurityKey(key) => request.security_key = Some(key),
            NmiAuthType::Login { username, password } => {
                request.username = Some(username);
                request.password = Some(password);
            }
        }
        request
    }

    fn add_card(&mut self, card: &Card, options: &TransactionOptions) -> Result<(), Error> {
        self.ccnumber = Some(Secret::new(card.number.get_card_no()));
        self.ccexp = Some(card.expiration()?.month_year_short());
        if options.should_send_cvv() {
            self.cvv = card.get_verification_value();
        }
        self.first_name = Some(card.first_name());
        self.last_name = Some(card.last_name());
        if let Some(three_d_secure) = &options.three_d_secure {
            self.cavv = three_d_secure.cavv.clone();
            self.eci = three_d_secure.eci.clone();
            self.xid = three_d_secure.xid.clone();
            self.three_ds_version = three_d_secure.normalized_version();
            self.directory_server_id = three_d_secure.ds_transaction_id.clone();
        }
        Ok(())
    }

    fn add_network_token(&mut self, token: &NetworkTokenCard) -> Result<(), Error> {
        self.ccnumber = Some(Secret::new(token.number.get_network_token()));
        self.ccexp = Some(token.expiration()?.month_year_short());
        self.cavv = Some(token.payment_cryptogram.clone());
        self.eci = token.eci.clone();
        self.first_name = token.first_name();
        self.last_name = token.last_name();
        Ok(())
    }

    fn add_check(&mut self, check: &Check) {
        self.payment = Some(NmiPaymentType::Check);
        self.checkname = Some(check.name.clone());
        self.checkaba = Some(check.routing_number.clone());
        self.checkaccount = Some(check.account_number.clone());
        self.account_holder_type = Some(
            match check.account_holder_type {
                BankHolderType::Personal => "personal",
                BankHolderType::Business => "business",
            }
            .to_string(),
        );
        self.account_type = Some(
            match check.account_type {
                BankAccountType::Checking => "checking",
                BankAccountType::Savings => "savings",
            }
            .to_string(),
        );
        self.sec_code = Some("WEB".to_string());
        self.first_name = Some(check.first_name());
        self.last_name = Some(check.last_name());
    }

    fn add_payment_method(
        &mut self,
        payment_method: &PaymentMethod,
        options: &TransactionOptions,
    ) -> Result<(), Error> {
        match payment_method {
            PaymentMethod::CreditCard(card) => self.add_card(card, options),
            PaymentMethod::NetworkToken(token) => self.add_network_token(token),
            PaymentMethod::Check(check) => {
                self.add_check(check);
                Ok(())
            }
            PaymentMethod::StoredToken(vault_id) => {
                self.customer_vault_id = Some(vault_id.clone());
                Ok(())
            }
        }
    }

    fn add_address(&mut self, address: &Address) {
        self.company = address.company.clone();
        self.address1 = address.address1.clone();
        self.address2 = address.address2.clone();
        self.city = address.city.clone();
        self.state = address.state.clone();
        self.zip = address.zip.clone();
        self.country = address.country.clone();
        self.phone = address.phone.clone();
    }

    fn add_customer_data(&mut self, options: &TransactionOptions) {
        if let Some(address) = options.get_billing_address() {
            self.add_address(address);
        }
        self.email = options.email.clone();
        self.ipaddress = options.ip.clone();
        self.customer_id = options.customer_id.clone();
    }

    fn add_invoice(&mut self, options: &TransactionOptions) {
        self.orderid = options.order_id.clone();
        self.orderdescription = options.description.clone();
        self.descriptor = options.soft_descriptor.clone();
    }

    fn add_stored_credential(&mut self, stored_credential: &StoredCredential) {
        self.initiated_by = Some(match stored_credential.initiator {
            StoredCredentialInitiator::Cardholder => NmiInitiator::Customer,
            StoredCredentialInitiator::Merchant => NmiInitiator::Merchant,
        });
        self.billing_method = match stored_credential.reason_type {
            StoredCredentialReason::Recurring => Some(BillingMethod::Recurring),
            StoredCredentialReason::Installment => Some(BillingMethod::Installment),
            StoredCredentialReason::Unscheduled => None,
        };
        if stored_credential.initial_transaction {
            self.stored_credential_indicator = Some(StoredCredentialIndicator::Stored);
        } else {
            self.stored_credential_indicator = Some(StoredCredentialIndicator::Used);
            self.initial_transaction_id = stored_credential.network_transaction_id.clone();
        }
    }

    /// Targets the transaction named by a follow-up authorization.
    fn add_reference(&mut self, authorization: &str) -> Result<(), Error> {
        let (transaction_id, payment_type) = split_authorization(authorization)?;
        self.transactionid = Some(transaction_id);
        self.payment = payment_type.filter(|payment_type| *payment_type == NmiPaymentType::Check);
        Ok(())
    }
}

/// Splits `transactionid#payment_type`. A bare transaction id is accepted.
pub(super) fn split_authorization(
    authorization: &str,
) -> Result<(String, Option<NmiPaymentType>), Error> {
    let authorization = require_authorization(authorization)?;
    let invalid = || ConnectorError::InvalidAuthorization {
        authorization: authorization.to_string(),
        connector: CONNECTOR,
    };
    match authorization.split_once('#') {
        None => Ok((authorization.to_string(), None)),
        Some((transaction_id, _)) if transaction_id.is_empty() => Err(invalid())?,
        Some((transaction_id, payment_type)) => {
            let payment_type = payment_type.parse::<NmiPaymentType>().map_err(|_| invalid())?;
            Ok((transaction_id.to_string(), Some(payment_type)))
        }
    }
}

pub type NmiPaymentsRequest = NmiTransactRequest;
pub type NmiCaptureRequest = NmiTransactRequest;
pub type NmiRefundRequest = NmiTransactRequest;
pub type NmiVoidRequest = NmiTransactRequest;
pub type NmiVerifyRequest = NmiTransactRequest;
pub type NmiStoreRequest = NmiTransactRequest;
pub type NmiUnstoreRequest = NmiTransactRequest;

fn amount(
    connector: &super::Nmi,
    amount: MinorUnit,
    currency: Currency,
) -> Result<StringMajorUnit, Error> {
    convert_amount(connector.amount_converter, amount, currency)
}

impl
    TryFrom<
        NmiRouterData<
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>,
        >,
    > for NmiPaymentsRequest
{
    type Error = Error;

    fn try_from(
        item: NmiRouterData<
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let options = &request.options;
        let auth = NmiAuthType::try_from(&item.router_data.connector_auth_type)?;
        let transaction_type = if request.is_auto_capture() {
            TransactionType::Sale
        } else {
            TransactionType::Auth
        };

        let mut body = Self::new(auth, Some(transaction_type));
        body.amount = Some(amount(&item.connector, request.amount, options.get_currency())?);
        body.currency = Some(options.get_currency());
        body.add_payment_method(&request.payment_method, options)?;
        body.add_invoice(options);
        body.add_customer_data(options);
        if let Some(stored_credential) = &options.stored_credential {
            body.add_stored_credential(stored_credential);
        }
        Ok(body)
    }
}

impl TryFrom<NmiRouterData<RouterDataV2<Verify, PaymentFlowData, VerifyData, GatewayResponse>>>
    for NmiVerifyRequest
{
    type Error = Error;

    fn try_from(
        item: NmiRouterData<RouterDataV2<Verify, PaymentFlowData, VerifyData, GatewayResponse>>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let auth = NmiAuthType::try_from(&item.router_data.connector_auth_type)?;
        let mut body = Self::new(auth, Some(TransactionType::Validate));
        if let PaymentMethod::Check(_) = request.payment_method {
            return Err(request.payment_method.not_supported(CONNECTOR));
        }
        body.add_payment_method(&request.payment_method, &request.options)?;
        body.add_customer_data(&request.options);
        Ok(body)
    }
}

impl TryFrom<NmiRouterData<RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>>>
    for NmiStoreRequest
{
    type Error = Error;

    fn try_from(
        item: NmiRouterData<RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let auth = NmiAuthType::try_from(&item.router_data.connector_auth_type)?;
        let mut body = Self::new(auth, None);
        body.customer_vault = Some(CustomerVaultAction::AddCustomer);
        match &request.payment_method {
            PaymentMethod::StoredToken(_) => Err(request.payment_method.not_supported(CONNECTOR))?,
            payment_method => body.add_payment_method(payment_method, &request.options)?,
        }
        body.add_customer_data(&request.options);
        Ok(body)
    }
}

impl TryFrom<NmiRouterData<RouterDataV2<Unstore, PaymentFlowData, UnstoreData, GatewayResponse>>>
    for NmiUnstoreRequest
{
    type Error = Error;

    fn try_from(
        item: NmiRouterData<RouterDataV2<Unstore, PaymentFlowData, UnstoreData, GatewayResponse>>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let auth = NmiAuthType::try_from(&item.router_data.connector_auth_type)?;
        let mut body = Self::new(auth, None);
        body.customer_vault = Some(CustomerVaultAction::DeleteCustomer);
        body.customer_vault_id = Some(Secret::new(
            require_authorization(&request.authorization)?.to_string(),
        ));
        Ok(body)
    }
}

impl
    TryFrom<
        NmiRouterData<RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>>,
    > for NmiCaptureRequest
{
    type Error = Error;

    fn try_from(
        item: NmiRouterData<
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let auth = NmiAuthType::try_from(&item.router_data.connector_auth_type)?;
        let mut body = Self::new(auth, Some(TransactionType::Capture));
        body.add_reference(&request.authorization)?;
        body.amount = Some(amount(
            &item.connector,
            request.amount,
            request.options.currency.unwrap_or_default(),
        )?);
        Ok(body)
    }
}

impl TryFrom<NmiRouterData<RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>>>
    for NmiRefundRequest
{
    type Error = Error;

    fn try_from(
        item: NmiRouterData<RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let auth = NmiAuthType::try_from(&item.router_data.connector_auth_type)?;
        let mut body = Self::new(auth, Some(TransactionType::Refund));
        body.add_reference(&request.authorization)?;
        body.amount = Some(amount(
            &item.connector,
            request.amount,
            request.options.currency.unwrap_or_default(),
        )?);
        Ok(body)
    }
}

impl TryFrom<NmiRouterData<RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>>>
    for NmiVoidRequest
{
    type Error = Error;

    fn try_from(
        item: NmiRouterData<RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let auth = NmiAuthType::try_from(&item.router_data.connector_auth_type)?;
        let mut body = Self::new(auth, Some(TransactionType::Void));
        body.add_reference(&request.authorization)?;
        body.void_reason = request.options.reason.clone();
        Ok(body)
    }
}

/// `response=1&responsetext=SUCCESS&...` reply of every transact call.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NmiResponse {
    pub response: Option<String>,
    pub responsetext: Option<String>,
    pub authcode: Option<String>,
    pub transactionid: Option<String>,
    pub avsresponse: Option<String>,
    pub cvvresponse: Option<String>,
    pub orderid: Option<String>,
    pub response_code: Option<String>,
    pub customer_vault_id: Option<String>,
}

pub type NmiPaymentsResponse = NmiResponse;
pub type NmiCaptureResponse = NmiResponse;
pub type NmiRefundResponse = NmiResponse;
pub type NmiVoidResponse = NmiResponse;
pub type NmiVerifyResponse = NmiResponse;
pub type NmiStoreResponse = NmiResponse;
pub type NmiUnstoreResponse = NmiResponse;

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// How a request's reply is turned into an authorization string.
pub trait NmiAuthorization {
    fn authorization(&self, response: &NmiResponse) -> Option<String>;
}

fn transaction_authorization(response: &NmiResponse, payment_type: NmiPaymentType) -> Option<String> {
    filled(&response.transactionid).map(|transaction_id| format!("{transaction_id}#{payment_type}"))
}

impl NmiAuthorization for PaymentsAuthorizeData {
    fn authorization(&self, response: &NmiResponse) -> Option<String> {
        transaction_authorization(response, NmiPaymentType::of(&self.payment_method))
    }
}

impl NmiAuthorization for VerifyData {
    fn authorization(&self, response: &NmiResponse) -> Option<String> {
        transaction_authorization(response, NmiPaymentType::of(&self.payment_method))
    }
}

impl NmiAuthorization for StoreData {
    fn authorization(&self, response: &NmiResponse) -> Option<String> {
        filled(&response.customer_vault_id).map(str::to_string)
    }
}

impl NmiAuthorization for UnstoreData {
    fn authorization(&self, response: &NmiResponse) -> Option<String> {
        filled(&response.customer_vault_id).map(str::to_string)
    }
}

// Follow-ups keep the payment type of the transaction they act on.
macro_rules! follow_up_authorization {
    ($($request:ty),+) => {
        $(
            impl NmiAuthorization for $request {
                fn authorization(&self, response: &NmiResponse) -> Option<String> {
                    let payment_type = split_authorization(&self.authorization)
                        .ok()
                        .and_then(|(_, payment_type)| payment_type)
                        .unwrap_or(NmiPaymentType::CreditCard);
                    transaction_authorization(response, payment_type)
                }
            }
        )+
    };
}

follow_up_authorization!(PaymentsCaptureData, RefundsData, PaymentVoidData);

impl<F, Req: NmiAuthorization>
    TryFrom<ResponseRouterData<NmiResponse, RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>>>
    for RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            NmiResponse,
            RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            params,
            router_data,
            ..
        } = item;
        let success = response.response.as_deref() == Some("1");

        Ok(Self {
            response: Ok(GatewayResponse {
                success,
                message: Message::Text(response.responsetext.clone().unwrap_or_default()),
                authorization: router_data.request.authorization(&response),
                params,
                test_mode: router_data.resource_common_data.test_mode,
                error_code: if success {
                    None
                } else {
                    filled(&response.response_code).map(str::to_string)
                },
                avs_result: filled(&response.avsresponse).and_then(AvsResult::from_code),
                cvv_result: filled(&response.cvvresponse).and_then(CvvResult::from_code),
                ..Default::default()
            }),
            ..router_data
        })
    }
}
