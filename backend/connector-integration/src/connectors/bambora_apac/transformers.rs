use common_utils::{CustomResult, MinorUnit};
use domain_types::{
    connector_flow::Store,
    connector_types::PaymentFlowData,
    errors::ConnectorError,
    payment_method_data::PaymentMethod,
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    router_request_types::{
        PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, RefundsData, StoreData,
    },
    router_response_types::{GatewayResponse, Message},
    utils::{convert_amount, require_authorization, Error},
};
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::BamboraApacRouterData;
use crate::{types::ResponseRouterData, utils};

const CONNECTOR: &str = "bambora_apac";
const SOAP_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const API_NAMESPACE: &str = "http://www.ippayments.com.au/interface/api";
const SUCCEEDED: &str = "Succeeded";

pub struct BamboraApacAuthType {
    pub username: Secret<String>,
    pub password: Secret<String>,
    pub account_number: Option<Secret<String>>,
}

impl TryFrom<&ConnectorAuthType> for BamboraApacAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::BodyKey { api_key, key1 } => Ok(Self {
                username: api_key.clone(),
                password: key1.clone(),
                account_number: None,
            }),
            ConnectorAuthType::SignatureKey {
                api_key,
                key1,
                api_secret,
            } => Ok(Self {
                username: api_key.clone(),
                password: key1.clone(),
                account_number: Some(api_secret.clone()),
            }),
            _ => Err(ConnectorError::FailedToObtainAuthType)?,
        }
    }
}

/// The web service an operation belongs to. Payments go to `dts`, customer registration to `sipp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Service {
    Dts,
    Sipp,
}

#[derive(Debug, Clone, Copy)]
pub struct SoapOperation {
    pub action: &'static str,
    pub service: Service,
    parameter: &'static str,
}

impl SoapOperation {
    pub fn soap_action(&self) -> String {
        format!("{API_NAMESPACE}/{}/{}", self.service, self.action)
    }

    pub fn endpoint(&self) -> String {
        format!("{}.asmx", self.service)
    }

    fn envelope(&self, inner: &str) -> String {
        let Self {
            action,
            service,
            parameter,
        } = self;
        format!(
            r#"{declaration}<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:soap="{SOAP_NAMESPACE}"><soap:Body><{action} xmlns="{API_NAMESPACE}/{service}"><{parameter}><![CDATA[{inner}]]></{parameter}></{action}></soap:Body></soap:Envelope>"#,
            declaration = utils::XML_DECLARATION,
        )
    }
}

/// Ties each request to the SOAP operation that carries it.
pub trait BamboraApacOperation {
    const OPERATION: SoapOperation;
}

impl BamboraApacOperation for PaymentsAuthorizeData {
    const OPERATION: SoapOperation = SoapOperation {
        action: "SubmitSinglePayment",
        service: Service::Dts,
        parameter: "trnXML",
    };
}

impl BamboraApacOperation for PaymentsCaptureData {
    const OPERATION: SoapOperation = SoapOperation {
        action: "SubmitSingleCapture",
        service: Service::Dts,
        parameter: "trnXML",
    };
}

impl BamboraApacOperation for RefundsData {
    const OPERATION: SoapOperation = SoapOperation {
        action: "SubmitSingleRefund",
        service: Service::Dts,
        parameter: "trnXML",
    };
}

impl BamboraApacOperation for PaymentVoidData {
    const OPERATION: SoapOperation = SoapOperation {
        action: "SubmitSingleVoid",
        service: Service::Dts,
        parameter: "trnXML",
    };
}

impl BamboraApacOperation for StoreData {
    const OPERATION: SoapOperation = SoapOperation {
        action: "RegisterSingleCustomer",
        service: Service::Sipp,
        parameter: "registerSingleCustomerXML",
    };
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Security {
    user_name: Secret<String>,
    password: Secret<String>,
}

impl From<&BamboraApacAuthType> for Security {
    fn from(auth: &BamboraApacAuthType) -> Self {
        Self {
            user_name: auth.username.clone(),
            password: auth.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, strum::Display, serde_with::SerializeDisplay)]
pub enum TransactionType {
    #[strum(serialize = "1")]
    Purchase,
    #[strum(serialize = "2")]
    PreAuth,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct CreditCard {
    #[serde(rename = "@Registered")]
    registered: &'static str,
    #[serde(rename = "CardNumber")]
    card_number: Secret<String>,
    #[serde(rename = "ExpM")]
    exp_month: Option<Secret<String>>,
    #[serde(rename = "ExpY")]
    exp_year: Option<Secret<String>>,
    #[serde(rename = "CVN")]
    cvn: Option<Secret<String>>,
    #[serde(rename = "CardHolderName")]
    card_holder_name: Option<Secret<String>>,
}

impl CreditCard {
    fn try_from_payment_method(
        payment_method: &PaymentMethod,
        send_cvv: bool,
    ) -> Result<Self, Error> {
        match payment_method {
            PaymentMethod::CreditCard(card) => {
                let expiration = card.expiration()?;
                Ok(Self {
                    registered: "False",
                    card_number: Secret::new(card.number.get_card_no()),
                    exp_month: Some(expiration.two_digit_month()),
                    exp_year: Some(expiration.four_digit_year()),
                    cvn: send_cvv.then(|| card.get_verification_value()).flatten(),
                    card_holder_name: Some(card.name.clone()),
                })
            }
            // A registered customer is charged by its customer number.
            PaymentMethod::StoredToken(token) => Ok(Self {
                registered: "True",
                card_number: token.clone(),
                exp_month: None,
                exp_year: None,
                cvn: None,
                card_holder_name: None,
            }),
            payment_method @ (PaymentMethod::Check(_) | PaymentMethod::NetworkToken(_)) => {
                Err(payment_method.not_supported(CONNECTOR))?
            }
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    cust_ref: Option<String>,
    amount: MinorUnit,
    trn_type: TransactionType,
    account_number: Option<Secret<String>>,
    credit_card: CreditCard,
    security: Security,
}

/// `SubmitSinglePayment` call, used for purchase and authorize.
#[derive(Debug)]
pub struct BamboraApacPaymentsRequest {
    transaction: Transaction,
}

impl utils::XmlRequestBody for BamboraApacPaymentsRequest {
    fn render_xml(&self) -> CustomResult<Secret<String>, ConnectorError> {
        let inner = utils::to_xml_with_root("Transaction", &self.transaction)?;
        Ok(Secret::new(
            PaymentsAuthorizeData::OPERATION.envelope(&inner),
        ))
    }
}

impl
    TryFrom<
        BamboraApacRouterData<
            RouterDataV2<
                domain_types::connector_flow::Authorize,
                PaymentFlowData,
                PaymentsAuthorizeData,
                GatewayResponse,
            >,
        >,
    > for BamboraApacPaymentsRequest
{
    type Error = Error;

    fn try_from(
        item: BamboraApacRouterData<
            RouterDataV2<
                domain_types::connector_flow::Authorize,
                PaymentFlowData,
                PaymentsAuthorizeData,
                GatewayResponse,
            >,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let request = &router_data.request;
        let auth = BamboraApacAuthType::try_from(&router_data.connector_auth_type)?;
        let trn_type = if request.is_auto_capture() {
            TransactionType::Purchase
        } else {
            TransactionType::PreAuth
        };

        Ok(Self {
            transaction: Transaction {
                cust_ref: request.options.order_id.clone(),
                amount: convert_amount(
                    item.connector.amount_converter,
                    request.amount,
                    request.currency(),
                )?,
                trn_type,
                account_number: auth.account_number.clone(),
                credit_card: CreditCard::try_from_payment_method(
                    &request.payment_method,
                    request.options.should_send_cvv(),
                )?,
                security: Security::from(&auth),
            },
        })
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReceiptReference {
    receipt: String,
    amount: Option<MinorUnit>,
    security: Security,
}

/// Follow-up call naming the original `Receipt`. The inner root element is the operation's noun.
#[derive(Debug)]
pub struct BamboraApacFollowUpRequest<Req> {
    root: &'static str,
    reference: ReceiptReference,
    _request: std::marker::PhantomData<Req>,
}

impl<Req: BamboraApacOperation> utils::XmlRequestBody for BamboraApacFollowUpRequest<Req> {
    fn render_xml(&self) -> CustomResult<Secret<String>, ConnectorError> {
        let inner = utils::to_xml_with_root(self.root, &self.reference)?;
        Ok(Secret::new(Req::OPERATION.envelope(&inner)))
    }
}

fn follow_up<Req>(
    root: &'static str,
    connector_auth_type: &ConnectorAuthType,
    authorization: &str,
    amount: Option<MinorUnit>,
) -> Result<BamboraApacFollowUpRequest<Req>, Error> {
    let auth = BamboraApacAuthType::try_from(connector_auth_type)?;
    Ok(BamboraApacFollowUpRequest {
        root,
        reference: ReceiptReference {
            receipt: require_authorization(authorization)?.to_string(),
            amount,
            security: Security::from(&auth),
        },
        _request: std::marker::PhantomData,
    })
}

pub type BamboraApacCaptureRequest = BamboraApacFollowUpRequest<PaymentsCaptureData>;
pub type BamboraApacRefundRequest = BamboraApacFollowUpRequest<RefundsData>;
pub type BamboraApacVoidRequest = BamboraApacFollowUpRequest<PaymentVoidData>;

impl
    TryFrom<
        BamboraApacRouterData<
            RouterDataV2<
                domain_types::connector_flow::Capture,
                PaymentFlowData,
                PaymentsCaptureData,
                GatewayResponse,
            >,
        >,
    > for BamboraApacCaptureRequest
{
    type Error = Error;

    fn try_from(
        item: BamboraApacRouterData<
            RouterDataV2<
                domain_types::connector_flow::Capture,
                PaymentFlowData,
                PaymentsCaptureData,
                GatewayResponse,
            >,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let amount = convert_amount(
            item.connector.amount_converter,
            router_data.request.amount,
            router_data.request.options.get_currency(),
        )?;
        follow_up(
            "Capture",
            &router_data.connector_auth_type,
            &router_data.request.authorization,
            Some(amount),
        )
    }
}

impl
    TryFrom<
        BamboraApacRouterData<
            RouterDataV2<domain_types::connector_flow::Refund, PaymentFlowData, RefundsData, GatewayResponse>,
        >,
    > for BamboraApacRefundRequest
{
    type Error = Error;

    fn try_from(
        item: BamboraApacRouterData<
            RouterDataV2<domain_types::connector_flow::Refund, PaymentFlowData, RefundsData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let amount = convert_amount(
            item.connector.amount_converter,
            router_data.request.amount,
            router_data.request.options.get_currency(),
        )?;
        follow_up(
            "Refund",
            &router_data.connector_auth_type,
            &router_data.request.authorization,
            Some(amount),
        )
    }
}

impl
    TryFrom<
        BamboraApacRouterData<
            RouterDataV2<domain_types::connector_flow::Void, PaymentFlowData, PaymentVoidData, GatewayResponse>,
        >,
    > for BamboraApacVoidRequest
{
    type Error = Error;

    fn try_from(
        item: BamboraApacRouterData<
            RouterDataV2<domain_types::connector_flow::Void, PaymentFlowData, PaymentVoidData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        follow_up(
            "Void",
            &router_data.connector_auth_type,
            &router_data.request.authorization,
            router_data.request.options.amount,
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Customer {
    cust_number: String,
    credit_card: CreditCard,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Register {
    customer: Customer,
    security: Security,
}

/// `RegisterSingleCustomer` call on the `sipp` service.
#[derive(Debug)]
pub struct BamboraApacStoreRequest {
    register: Register,
}

impl utils::XmlRequestBody for BamboraApacStoreRequest {
    fn render_xml(&self) -> CustomResult<Secret<String>, ConnectorError> {
        let inner = utils::to_xml_with_root("Register", &self.register)?;
        Ok(Secret::new(StoreData::OPERATION.envelope(&inner)))
    }
}

impl
    TryFrom<
        BamboraApacRouterData<RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>>,
    > for BamboraApacStoreRequest
{
    type Error = Error;

    fn try_from(
        item: BamboraApacRouterData<
            RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let router_data = &item.router_data;
        let request = &router_data.request;
        if !matches!(request.payment_method, PaymentMethod::CreditCard(_)) {
            return Err(request.payment_method.not_supported(CONNECTOR));
        }
        let auth = BamboraApacAuthType::try_from(&router_data.connector_auth_type)?;
        let cust_number = request
            .options
            .customer_id
            .clone()
            .unwrap_or_else(|| router_data.resource_common_data.connector_request_reference_id.clone());

        Ok(Self {
            register: Register {
                customer: Customer {
                    cust_number,
                    credit_card: CreditCard::try_from_payment_method(&request.payment_method, false)?,
                },
                security: Security::from(&auth),
            },
        })
    }
}

// Responses. Bodies arrive with the envelope already removed.

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionResult {
    pub response_code: Option<String>,
    pub timestamp: Option<String>,
    pub receipt: Option<String>,
    pub settlement_date: Option<String>,
    pub declined_code: Option<String>,
    pub declined_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BamboraApacPaymentsResponse {
    #[serde(rename = "Response")]
    pub body: TransactionResult,
}

pub type BamboraApacCaptureResponse = BamboraApacPaymentsResponse;
pub type BamboraApacRefundResponse = BamboraApacPaymentsResponse;
pub type BamboraApacVoidResponse = BamboraApacPaymentsResponse;

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl<F, Req>
    TryFrom<
        ResponseRouterData<
            BamboraApacPaymentsResponse,
            RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>,
        >,
    > for RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            BamboraApacPaymentsResponse,
            RouterDataV2<F, PaymentFlowData, Req, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            params,
            router_data,
            ..
        } = item;
        let result = response.body;
        let success = result.response_code.as_deref() == Some("0");
        let message = if success {
            SUCCEEDED.to_string()
        } else {
            non_empty(result.declined_message).unwrap_or_default()
        };

        Ok(Self {
            response: Ok(GatewayResponse {
                success,
                message: Message::Text(message),
                authorization: non_empty(result.receipt),
                params,
                test_mode: router_data.resource_common_data.test_mode,
                error_code: if success {
                    None
                } else {
                    non_empty(result.declined_code)
                },
                ..Default::default()
            }),
            ..router_data
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterResult {
    pub return_value: Option<String>,
    pub return_message: Option<String>,
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BamboraApacStoreResponse {
    #[serde(rename = "Response")]
    pub body: RegisterResult,
}

impl
    TryFrom<
        ResponseRouterData<
            BamboraApacStoreResponse,
            RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>,
        >,
    > for RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            BamboraApacStoreResponse,
            RouterDataV2<Store, PaymentFlowData, StoreData, GatewayResponse>,
        >,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            params,
            router_data,
            ..
        } = item;
        let result = response.body;
        let success = result.return_value.as_deref() == Some("0");
        let message = if success {
            SUCCEEDED.to_string()
        } else {
            non_empty(result.return_message).unwrap_or_default()
        };

        Ok(Self {
            response: Ok(GatewayResponse {
                success,
                message: Message::Text(message),
                authorization: non_empty(result.customer_id),
                params,
                test_mode: router_data.resource_common_data.test_mode,
                error_code: if success { None } else { result.return_value },
                ..Default::default()
            }),
            ..router_data
        })
    }
}

/// `faultcode` and `faultstring` of a SOAP fault.
#[derive(Debug, Default, Deserialize)]
pub struct SoapFault {
    #[serde(rename = "faultcode")]
    pub code: Option<String>,
    #[serde(rename = "faultstring")]
    pub message: Option<String>,
}

pub fn soap_fault(params: &serde_json::Value) -> Option<SoapFault> {
    let fault = params.get("Envelope")?.get("Body")?.get("Fault")?;
    serde_json::from_value(fault.clone()).ok()
}
