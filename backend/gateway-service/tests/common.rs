#![allow(clippy::unwrap_used, dead_code)]

use std::{
    collections::{BTreeMap, VecDeque},
    str::FromStr,
    sync::{Arc, Mutex},
};

use common_utils::{request::Request, CustomResult};
use domain_types::{
    errors::ApiClientError,
    payment_method_data::{Card, PaymentMethod},
    router_request_types::TransactionOptions,
    router_response_types::Response,
    types::{ConnectorParams, Connectors},
};
use error_stack::report;
use gateway_service::GatewayConfig;
use hyperswitch_masking::{ExposeInterface, Secret};
use interfaces::transport::ConnectorTransport;

/// A request as it reached the transport, with unmasked headers.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Answers each request with the next canned `(status, body)` and records what was sent.
///
/// Running out of canned responses fails the call like a refused connection.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<(u16, String)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn with_responses<I, S>(responses: I) -> Arc<Self>
    where
        I: IntoIterator<Item = (u16, S)>,
        S: Into<String>,
    {
        Arc::new(Self {
            responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|(status, body)| (status, body.into()))
                    .collect(),
            ),
            requests: Mutex::default(),
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|request| request.url).collect()
    }
}

#[async_trait::async_trait]
impl ConnectorTransport for MockTransport {
    async fn send(
        &self,
        request: Request,
    ) -> CustomResult<Result<Response, Response>, ApiClientError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method.to_string(),
            url: request.url.clone(),
            headers: request.get_headers_map(),
            body: request
                .body
                .as_ref()
                .map(|body| body.get_inner_value().expose())
                .unwrap_or_default(),
        });

        let Some((status_code, body)) = self.responses.lock().unwrap().pop_front() else {
            return Err(report!(ApiClientError::RequestNotSent(
                "connection refused".to_string()
            )));
        };
        let response = Response {
            headers: None,
            response: bytes::Bytes::from(body),
            status_code,
        };
        Ok(if (200..300).contains(&status_code) {
            Ok(response)
        } else {
            Err(response)
        })
    }
}

fn params(base_url: &str, test_base_url: &str) -> ConnectorParams {
    ConnectorParams {
        base_url: base_url.to_string(),
        test_base_url: Some(test_base_url.to_string()),
    }
}

pub fn gateway_config() -> GatewayConfig {
    GatewayConfig {
        connectors: Connectors {
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
        },
        test_mode: true,
        log_transcripts: true,
        ..Default::default()
    }
}

pub fn secret(value: &str) -> Secret<String> {
    Secret::new(value.to_string())
}

pub fn credit_card() -> PaymentMethod {
    PaymentMethod::CreditCard(Card {
        number: cards::CardNumber::from_str("4111111111111111").unwrap(),
        month: secret("9"),
        year: secret("2030"),
        verification_value: Some(secret("123")),
        name: secret("Longbob Longsen"),
        brand: None,
    })
}

pub fn options() -> TransactionOptions {
    TransactionOptions {
        order_id: Some("order-1001".to_string()),
        description: Some("Store purchase".to_string()),
        return_url: Some("https://example.com/return".to_string()),
        request_id: Some("req_8f2c".to_string()),
        ..Default::default()
    }
}
