use common_enums::{BankAccountType, Currency, StoredCredentialReason};
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
        StoredCredential, ThreeDSecure, TransactionOptions, UnstoreData, VerifyData,
    },
    router_response_types::{AvsResult, CvvResult, GatewayResponse, Message},
    utils::{convert_amount, require_authorization, Error},
};
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;

use super::ElavonRouterData;
use crate::{
    types::ResponseRouterData,
    utils::{self, deserialize_xml_optional},
};

const CONNECTOR: &str = "elavon";

pub struct ElavonAuthType {
    pub(super) ssl_merchant_id: Secret<String>,
    pub(super) ssl_user_id: Secret<String>,
    pub(super) ssl_pin: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for ElavonAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::SignatureKey {
                api_key,
                key1,
                api_secret,
            } => Ok(Self {
                ssl_merchant_id: api_key.clone(),
                ssl_user_id: key1.clone(),
                ssl_pin: api_secret.clone(),
            }),
            _ => Err(ConnectorError::FailedToObtainAuthType)?,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, strum::Display)]
pub enum TransactionType {
    #[default]
    #[serde(rename = "ccsale")]
    #[strum(serialize = "ccsale")]
    CcSale,
    #[serde(rename = "ccauthonly")]
    #[strum(serialize = "ccauthonly")]
    CcAuthOnly,
    #[serde(rename = "cccomplete")]
    #[strum(serialize = "cccomplete")]
    CcComplete,
    #[serde(rename = "ccreturn")]
    #[strum(serialize = "ccreturn")]
    CcReturn,
    #[serde(rename = "ccvoid")]
    #[strum(serialize = "ccvoid")]
    CcVoid,
    #[serde(rename = "ccverify")]
    #[strum(serialize = "ccverify")]
    CcVerify,
    #[serde(rename = "ccgettoken")]
    #[strum(serialize = "ccgettoken")]
    CcGetToken,
    #[serde(rename = "ccdeletetoken")]
    #[strum(serialize = "ccdeletetoken")]
    CcDeleteToken,
    #[serde(rename = "ecspurchase")]
    #[strum(serialize = "ecspurchase")]
    EcsPurchase,
}

/// The `<txn>` document. Converge accepts the fields in any order.
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct ElavonTxn {
    ssl_merchant_id: Secret<String>,
    ssl_user_id: Secret<String>,
    ssl_pin: Secret<String>,
    ssl_transaction_type: TransactionType,
    ssl_txn_id: Option<String>,
    ssl_amount: Option<StringMajorUnit>,
    ssl_transaction_currency: Option<Currency>,
    ssl_card_number: Option<Secret<String>>,
    ssl_exp_date: Option<Secret<String>>,
    ssl_cvv2cvc2: Option<Secret<String>>,
    ssl_cvv2cvc2_indicator: Option<u8>,
    ssl_token: Option<Secret<String>>,
    ssl_add_token: Option<String>,
    ssl_aba_number: Option<Secret<String>>,
    ssl_bank_account_number: Option<Secret<String>>,
    ssl_bank_account_type: Option<String>,
    ssl_check_number: Option<String>,
    ssl_agree: Option<u8>,
    ssl_eci_ind: Option<String>,
    ssl_3dsecure_value: Option<Secret<String>>,
    ssl_3ds_version: Option<String>,
    ssl_dir_server_tran_id: Option<String>,
    ssl_first_name: Option<Secret<String>>,
    ssl_last_name: Option<Secret<String>>,
    ssl_company: Option<String>,
    ssl_avs_address: Option<Secret<String>>,
    ssl_address2: Option<Secret<String>>,
    ssl_city: Option<String>,
    ssl_state: Option<Secret<String>>,
    ssl_avs_zip: Option<Secret<String>>,
    ssl_country: Option<String>,
    ssl_phone: Option<Secret<String>>,
    ssl_email: Option<Email>,
    ssl_cardholder_ip: Option<IpAddressValue>,
    ssl_invoice_number: Option<String>,
    ssl_description: Option<String>,
    ssl_customer_code: Option<String>,
    ssl_recurring_flag: Option<u8>,
    ssl_merchant_initiated_unscheduled: Option<String>,
    ssl_entry_mode: Option<String>,
    ssl_oar_data: Option<String>,
    ssl_ps2000_data: Option<String>,
}

impl ElavonTxn {
    fn new(auth: ElavonAuthType, transaction_type: TransactionType) -> Self {
        Self {
            ssl_merchant_id: auth.ssl_merchant_id,
            ssl_user_id: auth.ssl_user_id,
            ssl_pin: auth.ssl_pin,
            ssl_transaction_type: transaction_type,
            ..Default::default()
        }
    }

    fn add_card(&mut self, card: &Card, options: &TransactionOptions) -> Result<(), Error> {
        let expiration = card.expiration()?;
        self.ssl_card_number = Some(Secret::new(card.number.get_card_no()));
        self.ssl_exp_date = Some(expiration.month_year_short());
        if options.should_send_cvv() {
            if let Some(cvv) = card.get_verification_value() {
                self.ssl_cvv2cvc2 = Some(cvv);
                self.ssl_cvv2cvc2_indicator = Some(1);
            }
        }
        self.ssl_first_name = Some(card.first_name());
        self.ssl_last_name = Some(card.last_name());
        if let Some(three_d_secure) = &options.three_d_secure {
            self.add_three_d_secure(three_d_secure);
        }
        Ok(())
    }

    fn add_network_token(&mut self, token: &NetworkTokenCard) -> Result<(), Error> {
        let expiration = token.expiration()?;
        self.ssl_card_number = Some(Secret::new(token.number.get_network_token()));
        self.ssl_exp_date = Some(expiration.month_year_short());
        self.ssl_eci_ind = token.eci.clone();
        self.ssl_3dsecure_value = Some(token.payment_cryptogram.clone());
        self.ssl_first_name = token.first_name();
        self.ssl_last_name = token.last_name();
        Ok(())
    }

    fn add_three_d_secure(&mut self, three_d_secure: &ThreeDSecure) {
        self.ssl_eci_ind = three_d_secure.eci.clone();
        self.ssl_3dsecure_value = three_d_secure.cavv.clone();
        self.ssl_3ds_version = three_d_secure.normalized_version();
        self.ssl_dir_server_tran_id = three_d_secure.ds_transaction_id.clone();
    }

    fn add_check(&mut self, check: &Check) {
        self.ssl_aba_number = Some(check.routing_number.clone());
        self.ssl_bank_account_number = Some(check.account_number.clone());
        self.ssl_bank_account_type = Some(
            match check.account_type {
                BankAccountType::Checking => "CHECKING",
                BankAccountType::Savings => "SAVINGS",
            }
            .to_string(),
        );
        self.ssl_check_number = check.check_number.clone();
        self.ssl_agree = Some(1);
        self.ssl_first_name = Some(check.first_name());
        self.ssl_last_name = Some(check.last_name());
    }

    fn add_payment_method(
        &mut self,
        payment_method: &PaymentMethod,
        options: &TransactionOptions,
    ) -> Result<(), Error> {
        match payment_method {
            PaymentMethod::CreditCard(card) => self.add_card(card, options),
            PaymentMethod::NetworkToken(token) => self.add_network_token(token),
            PaymentMethod::StoredToken(token) => {
                self.ssl_token = Some(token.clone());
                Ok(())
            }
            PaymentMethod::Check(check) => {
                self.add_check(check);
                Ok(())
            }
        }
    }

    fn add_address(&mut self, address: &Address) {
        self.ssl_avs_address = address.address1.clone();
        self.ssl_address2 = address.address2.clone();
        self.ssl_city = address.city.clone();
        self.ssl_state = address.state.clone();
        self.ssl_avs_zip = address.zip.clone();
        self.ssl_country = address.country.clone();
        self.ssl_phone = address.phone.clone();
        self.ssl_company = address.company.clone();
    }

    fn add_customer_data(&mut self, options: &TransactionOptions) {
        if let Some(address) = options.get_billing_address() {
            self.add_address(address);
        }
        self.ssl_email = options.email.clone();
        self.ssl_cardholder_ip = options.ip.clone();
        self.ssl_customer_code = options.customer_id.clone();
    }

    fn add_invoice(&mut self, options: &TransactionOptions) {
        self.ssl_invoice_number = options.order_id.clone();
        self.ssl_description = options.description.clone();
    }

    fn add_stored_credential(
        &mut self,
        stored_credential: &StoredCredential,
        payment_method: &PaymentMethod,
    ) {
        self.ssl_recurring_flag = match stored_credential.reason_type {
            StoredCredentialReason::Recurring => Some(1),
            StoredCredentialReason::Installment => Some(2),
            StoredCredentialReason::Unscheduled => None,
        };
        let unscheduled = stored_credential.reason_type == StoredCredentialReason::Unscheduled;
        if unscheduled && stored_credential.is_merchant_initiated() {
            self.ssl_merchant_initiated_unscheduled = Some("Y".to_string());
        }
        if unscheduled && !matches!(payment_method, PaymentMethod::StoredToken(_)) {
            self.ssl_entry_mode = Some("12".to_string());
        }
        if stored_credential.initial_transaction {
            return;
        }
        // Subsequent transactions echo the `oar_data|ps2000_data` pair of the initial one.
        if let Some(network_transaction_id) = &stored_credential.network_transaction_id {
            match network_transaction_id.split_once('|') {
                Some((oar_data, ps2000_data)) => {
                    self.ssl_oar_data = non_empty(oar_data);
                    self.ssl_ps2000_data = non_empty(ps2000_data);
                }
                None => self.ssl_ps2000_data = non_empty(network_transaction_id),
            }
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Transaction id half of an `approval_code;txn_id` authorization.
pub(super) fn transaction_id(authorization: &str) -> Result<String, Error> {
    let authorization = require_authorization(authorization)?;
    authorization
        .rsplit(';')
        .next()
        .filter(|txn_id| !txn_id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ConnectorError::InvalidAuthorization {
                authorization: authorization.to_string(),
                connector: CONNECTOR,
            }
            .into()
        })
}

/// Form body carrying the rendered `<txn>` document.
#[derive(Debug, Serialize)]
pub struct ElavonRequest {
    xmldata: Secret<String>,
}

impl TryFrom<ElavonTxn> for ElavonRequest {
    type Error = Error;

    fn try_from(txn: ElavonTxn) -> Result<Self, Self::Error> {
        let xmldata = utils::to_xml_with_root("txn", &txn)?;
        Ok(Self {
            xmldata: Secret::new(xmldata),
        })
    }
}

pub type ElavonPaymentsRequest = ElavonRequest;
pub type ElavonCaptureRequest = ElavonRequest;
pub type ElavonRefundRequest = ElavonRequest;
pub type ElavonVoidRequest = ElavonRequest;
pub type ElavonVerifyRequest = ElavonRequest;
pub type ElavonStoreRequest = ElavonRequest;
pub type ElavonUnstoreRequest = ElavonRequest;

fn payment_transaction_type(request: &PaymentsAuthorizeData) -> Result<TransactionType, Error> {
    match (&request.payment_method, request.is_auto_capture()) {
        (PaymentMethod::Check(_), true) => Ok(TransactionType::EcsPurchase),
        (PaymentMethod::Check(_), false) => Err(ConnectorError::NotSupported {
            message: "Authorizing a check".to_string(),
            connector: CONNECTOR,
        })?,
        (_, true) => Ok(TransactionType::CcSale),
        (_, false) => Ok(TransactionType::CcAuthOnly),
    }
}

impl
    TryFrom<
        ElavonRouterData<
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>,
        >,
    > for ElavonPaymentsRequest
{
    type Error = Error;

    fn try_from(
        item: ElavonRouterData<
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let options = &request.options;
        let auth = ElavonAuthType::try_from(&item.router_data.connector_auth_type)?;

        let mut txn = ElavonTxn::new(auth, payment_transaction_type(request)?);
        txn.ssl_amount = Some(convert_amount(
            item.connector.amount_converter,
            request.amount,
            options.get_currency(),
        )?);
        txn.ssl_transaction_currency = options.currency;
        txn.add_payment_method(&request.payment_method, options)?;
        txn.add_invoice(options);
        txn.add_customer_data(options);
        if let Some(stored_credential) = &options.stored_credential {
            txn.add_stored_credential(stored_credential, &request.payment_method);
        }
        Self::try_from(txn)
    }
}

impl
    TryFrom<ElavonRouterData<RouterDataV2<Verify, PaymentFlowData, VerifyData, GatewayResponse>>>
    for ElavonVerifyRequest
{
    type Error = Error;

    fn try_from(
        item: ElavonRouterData<RouterDataV2<Verify, PaymentFlowData, VerifyData, GatewayResponse>>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let auth = ElavonAuthType::try_from(&item.router_data.connector_auth_type)?;
        let mut txn = ElavonTxn::new(auth, TransactionType::CcVerify);
        match &request.payment_method {
            PaymentMethod::CreditCard(card) => txn.add_card(card, &request.options)?,
            PaymentMethod::NetworkToken(token) => txn.add_network_token(token)?,
            PaymentMethod::StoredToken(_) | PaymentMethod::Check(_) => {
                Err(request.payment_method.not_supported(CONNECTOR))?
            }
        }
        txn.add_customer_data(&request.options);
        Self::try_from(txn)
    }
}

impl TryFrom<ElavonRouterData<RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>>>
    for ElavonStoreRequest
{
    type Error = Error;

    fn try_from(
        item: ElavonRouterData<RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let auth = ElavonAuthType::try_from(&item.router_data.connector_auth_type)?;
        let mut txn = ElavonTxn::new(auth, TransactionType::CcGetToken);
        match &request.payment_method {
            PaymentMethod::CreditCard(card) => txn.add_card(card, &request.options)?,
            _ => Err(request.payment_method.not_supported(CONNECTOR))?,
        }
        txn.ssl_add_token = Some("Y".to_string());
        txn.add_customer_data(&request.options);
        Self::try_from(txn)
    }
}

impl
    TryFrom<
        ElavonRouterData<
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>,
        >,
    > for ElavonCaptureRequest
{
    type Error = Error;

    fn try_from(
        item: ElavonRouterData<
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let auth = ElavonAuthType::try_from(&item.router_data.connector_auth_type)?;
        let mut txn = ElavonTxn::new(auth, TransactionType::CcComplete);
        txn.ssl_txn_id = Some(transaction_id(&request.authorization)?);
        txn.ssl_amount = Some(follow_up_amount(
            &item.connector,
            request.amount,
            request.options.currency,
        )?);
        Self::try_from(txn)
    }
}

impl
    TryFrom<ElavonRouterData<RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>>>
    for ElavonRefundRequest
{
    type Error = Error;

    fn try_from(
        item: ElavonRouterData<
            RouterDataV2<Refund, PaymentFlowData, RefundsData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let auth = ElavonAuthType::try_from(&item.router_data.connector_auth_type)?;
        let mut txn = ElavonTxn::new(auth, TransactionType::CcReturn);
        txn.ssl_txn_id = Some(transaction_id(&request.authorization)?);
        txn.ssl_amount = Some(follow_up_amount(
            &item.connector,
            request.amount,
            request.options.currency,
        )?);
        Self::try_from(txn)
    }
}

impl
    TryFrom<ElavonRouterData<RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>>>
    for ElavonVoidRequest
{
    type Error = Error;

    fn try_from(
        item: ElavonRouterData<
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let auth = ElavonAuthType::try_from(&item.router_data.connector_auth_type)?;
        let mut txn = ElavonTxn::new(auth, TransactionType::CcVoid);
        txn.ssl_txn_id = Some(transaction_id(&request.authorization)?);
        Self::try_from(txn)
    }
}

impl
    TryFrom<ElavonRouterData<RouterDataV2<Unstore, PaymentFlowData, UnstoreData, GatewayResponse>>>
    for ElavonUnstoreRequest
{
    type Error = Error;

    fn try_from(
        item: ElavonRouterData<
            RouterDataV2<Unstore, PaymentFlowData, UnstoreData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let auth = ElavonAuthType::try_from(&item.router_data.connector_auth_type)?;
        let mut txn = ElavonTxn::new(auth, TransactionType::CcDeleteToken);
        txn.ssl_token = Some(Secret::new(
            require_authorization(&request.authorization)?.to_string(),
        ));
        Self::try_from(txn)
    }
}

fn follow_up_amount(
    connector: &super::Elavon,
    amount: MinorUnit,
    currency: Option<Currency>,
) -> Result<StringMajorUnit, Error> {
    convert_amount(
        connector.amount_converter,
        amount,
        currency.unwrap_or_default(),
    )
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ElavonTxnResult {
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub ssl_result: Option<String>,
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub ssl_result_message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub ssl_txn_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub ssl_approval_code: Option<String>,
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub ssl_avs_response: Option<String>,
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub ssl_cvv2_response: Option<String>,
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub ssl_token: Option<String>,
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub ssl_token_response: Option<String>,
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub ssl_oar_data: Option<String>,
    #[serde(default, deserialize_with = "deserialize_xml_optional")]
    pub ssl_ps2000_data: Option<String>,
    #[serde(
        rename = "errorCode",
        default,
        deserialize_with = "deserialize_xml_optional"
    )]
    pub error_code: Option<String>,
    #[serde(
        rename = "errorName",
        default,
        deserialize_with = "deserialize_xml_optional"
    )]
    pub error_name: Option<String>,
    #[serde(
        rename = "errorMessage",
        default,
        deserialize_with = "deserialize_xml_optional"
    )]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ElavonResponse {
    pub txn: ElavonTxnResult,
}

pub type ElavonPaymentsResponse = ElavonResponse;
pub type ElavonCaptureResponse = ElavonResponse;
pub type ElavonRefundResponse = ElavonResponse;
pub type ElavonVoidResponse = ElavonResponse;
pub type ElavonVerifyResponse = ElavonResponse;
pub type ElavonStoreResponse = ElavonResponse;
pub type ElavonUnstoreResponse = ElavonResponse;

/// Flat `<txn>` params with the `ssl_` prefix dropped from each key.
pub(super) fn response_params(params: &Value) -> Value {
    let fields = params
        .get("txn")
        .and_then(Value::as_object)
        .map(|txn| {
            txn.iter()
                .map(|(key, value)| {
                    let key = key.strip_prefix("ssl_").unwrap_or(key);
                    (key.to_string(), value.clone())
                })
                .collect::<Map<_, _>>()
        })
        .unwrap_or_default();
    Value::Object(fields)
}

/// Request types whose reply authorizes with the vault token instead of the transaction.
pub trait ElavonAuthorizationKind {
    const TOKEN_AUTHORIZATION: bool = false;
}

impl ElavonAuthorizationKind for PaymentsAuthorizeData {}
impl ElavonAuthorizationKind for PaymentsCaptureData {}
impl ElavonAuthorizationKind for RefundsData {}
impl ElavonAuthorizationKind for PaymentVoidData {}
impl ElavonAuthorizationKind for VerifyData {}
impl ElavonAuthorizationKind for UnstoreData {}
impl ElavonAuthorizationKind for StoreData {
    const TOKEN_AUTHORIZATION: bool = true;
}

fn network_transaction_id(txn: &ElavonTxnResult) -> Option<String> {
    match (&txn.ssl_oar_data, &txn.ssl_ps2000_data) {
        (None, None) => None,
        (oar_data, ps2000_data) => Some(format!(
            "{}|{}",
            oar_data.as_deref().unwrap_or_default(),
            ps2000_data.as_deref().unwrap_or_default()
        )),
    }
}

fn transaction_authorization(txn: &ElavonTxnResult) -> Option<String> {
    if txn.ssl_approval_code.is_none() && txn.ssl_txn_id.is_none() {
        return None;
    }
    Some(format!(
        "{};{}",
        txn.ssl_approval_code.as_deref().unwrap_or_default(),
        txn.ssl_txn_id.as_deref().unwrap_or_default()
    ))
}

impl<F, Req: ElavonAuthorizationKind>
    TryFrom<ResponseRouterData<ElavonResponse, RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>>>
    for RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            ElavonResponse,
            RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            params,
            router_data,
            ..
        } = item;
        let txn = response.txn;
        let success = txn.error_code.is_none() && txn.ssl_result.as_deref() == Some("0");
        let message = txn
            .ssl_result_message
            .clone()
            .or_else(|| txn.error_message.clone())
            .or_else(|| txn.error_name.clone())
            .unwrap_or_default();
        let authorization = if Req::TOKEN_AUTHORIZATION {
            txn.ssl_token.clone()
        } else {
            transaction_authorization(&txn)
        };

        Ok(Self {
            response: Ok(GatewayResponse {
                success,
                message: Message::Text(message),
                authorization,
                params: response_params(&params),
                test_mode: router_data.resource_common_data.test_mode,
                error_code: if success { None } else { txn.error_code.clone() },
                avs_result: txn.ssl_avs_response.as_deref().and_then(AvsResult::from_code),
                cvv_result: txn.ssl_cvv2_response.as_deref().and_then(CvvResult::from_code),
                network_transaction_id: network_transaction_id(&txn),
                ..Default::default()
            }),
            ..router_data
        })
    }
}
