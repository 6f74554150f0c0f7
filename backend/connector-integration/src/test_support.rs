//! Fixtures shared by the connector test modules.
#![allow(clippy::unwrap_used)]

use std::str::FromStr;

use common_enums::{BankAccountType, BankHolderType, CaptureMethod, CardBrand, TokenSource};
use common_utils::{request::RequestContent, MinorUnit};
use domain_types::{
    connector_types::PaymentFlowData,
    payment_address::Address,
    payment_method_data::{Card, Check, NetworkTokenCard, PaymentMethod},
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    router_request_types::{
        FollowUpOptions, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, RefundsData,
        StoreData, TransactionOptions, UnstoreData, VerifyData,
    },
    router_response_types::{GatewayResponse, Response},
    types::{ConnectorParams, Connectors},
};
use hyperswitch_masking::{ExposeInterface, Secret};

pub(crate) const REQUEST_ID: &str = "req_8f2c";

fn params(base_url: &str, test_base_url: &str) -> ConnectorParams {
    ConnectorParams {
        base_url: base_url.to_string(),
        test_base_url: Some(test_base_url.to_string()),
    }
}

pub(crate) fn connectors() -> Connectors {
    Connectors {
        airwallex: params("https://api.airwallex.com/", "https://api-demo.airwallex.com/"),
        authorizedotnet: params(
            "https://api.authorize.net/xml/v1/request.api",
            "https://apitest.authorize.net/xml/v1/request.api",
        ),
        bambora_apac: params(
            "https://www.bambora.co.nz/interface/api/",
            "https://demo.bambora.co.nz/interface/api/",
        ),
        checkout: params("https://api.checkout.com/", "https://api.sandbox.checkout.com/"),
        elavon: params(
            "https://api.convergepay.com/VirtualMerchant/",
            "https://api.demo.convergepay.com/VirtualMerchantDemo/",
        ),
        nmi: params("https://secure.nmi.com/", "https://secure.nmi.com/"),
        worldpay: params(
            "https://secure.worldpay.com/jsp/merchant/xml/paymentService.jsp",
            "https://secure-test.worldpay.com/jsp/merchant/xml/paymentService.jsp",
        ),
    }
}

pub(crate) fn flow_data() -> PaymentFlowData {
    PaymentFlowData::new(REQUEST_ID.to_string(), true, connectors())
}

pub(crate) fn secret(value: &str) -> Secret<String> {
    Secret::new(value.to_string())
}

pub(crate) fn visa() -> Card {
    Card {
        number: cards::CardNumber::from_str("4111111111111111").unwrap(),
        month: secret("9"),
        year: secret("2030"),
        verification_value: Some(secret("123")),
        name: secret("Longbob Longsen"),
        brand: Some(CardBrand::Visa),
    }
}

pub(crate) fn credit_card() -> PaymentMethod {
    PaymentMethod::CreditCard(visa())
}

pub(crate) fn check() -> PaymentMethod {
    PaymentMethod::Check(Check {
        account_number: secret("15378535"),
        routing_number: secret("244183602"),
        account_type: BankAccountType::Checking,
        account_holder_type: BankHolderType::Personal,
        name: secret("Jim Smith"),
        check_number: Some("1".to_string()),
    })
}

pub(crate) fn network_token() -> PaymentMethod {
    PaymentMethod::NetworkToken(NetworkTokenCard {
        number: cards::NetworkToken::from_str("4111111111111111").unwrap(),
        month: secret("9"),
        year: secret("2030"),
        eci: Some("05".to_string()),
        payment_cryptogram: secret("EHuWW9PiBkWvqE5juRwDzAUFBAk="),
        source: TokenSource::ApplePay,
        name: Some(secret("Longbob Longsen")),
        brand: Some(CardBrand::Visa),
    })
}

pub(crate) fn billing_address() -> Address {
    Address {
        name: Some(secret("Jim Smith")),
        company: Some("Widgets Inc".to_string()),
        address1: Some(secret("456 My Street")),
        address2: Some(secret("Apt 1")),
        city: Some("Ottawa".to_string()),
        state: Some(secret("ON")),
        zip: Some(secret("K1C2N6")),
        country: Some("CA".to_string()),
        phone: Some(secret("(555)555-5555")),
        ..Default::default()
    }
}

pub(crate) fn options() -> TransactionOptions {
    TransactionOptions {
        order_id: Some("order-1001".to_string()),
        description: Some("Store purchase".to_string()),
        billing_address: Some(billing_address()),
        return_url: Some("https://example.com/return".to_string()),
        capture_method: Some(CaptureMethod::Automatic),
        ..Default::default()
    }
}

pub(crate) fn router_data<F, Req>(
    auth: &ConnectorAuthType,
    request: Req,
) -> RouterDataV2<F, PaymentFlowData, Req, GatewayResponse> {
    RouterDataV2::new(flow_data(), auth.clone(), request)
}

pub(crate) fn authorize(
    amount: i64,
    payment_method: PaymentMethod,
    options: TransactionOptions,
) -> PaymentsAuthorizeData {
    PaymentsAuthorizeData {
        amount: MinorUnit::new(amount),
        payment_method,
        options,
    }
}

pub(crate) fn capture(amount: i64, authorization: &str) -> PaymentsCaptureData {
    PaymentsCaptureData {
        amount: MinorUnit::new(amount),
        authorization: authorization.to_string(),
        options: FollowUpOptions::default(),
    }
}

pub(crate) fn refund(amount: i64, authorization: &str) -> RefundsData {
    RefundsData {
        amount: MinorUnit::new(amount),
        authorization: authorization.to_string(),
        options: FollowUpOptions {
            reason: Some("customer request".to_string()),
            ..Default::default()
        },
    }
}

pub(crate) fn void(authorization: &str) -> PaymentVoidData {
    PaymentVoidData {
        authorization: authorization.to_string(),
        options: FollowUpOptions::default(),
    }
}

pub(crate) fn verify(payment_method: PaymentMethod) -> VerifyData {
    VerifyData {
        payment_method,
        options: options(),
    }
}

pub(crate) fn store(payment_method: PaymentMethod) -> StoreData {
    StoreData {
        payment_method,
        options: options(),
    }
}

pub(crate) fn unstore(authorization: &str) -> UnstoreData {
    UnstoreData {
        authorization: authorization.to_string(),
        options: FollowUpOptions::default(),
    }
}

pub(crate) fn http_response(status_code: u16, body: &str) -> Response {
    Response {
        headers: None,
        response: bytes::Bytes::from(body.to_string()),
        status_code,
    }
}

/// The unmasked wire body of a built request.
pub(crate) fn body_text(content: Option<RequestContent>) -> String {
    content.unwrap().get_inner_value().expose()
}

pub(crate) fn body_json(content: Option<RequestContent>) -> serde_json::Value {
    serde_json::from_str(&body_text(content)).unwrap()
}

/// Decoded `key=value` pairs of a form body.
pub(crate) fn body_form(content: Option<RequestContent>) -> serde_json::Map<String, serde_json::Value> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(&body_text(content)).unwrap();
    pairs
        .into_iter()
        .map(|(key, value)| (key, serde_json::Value::String(value)))
        .collect()
}
