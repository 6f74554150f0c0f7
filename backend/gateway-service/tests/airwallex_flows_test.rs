#![allow(clippy::unwrap_used)]

use common_utils::MinorUnit;
use connector_integration::types::ConnectorEnum;
use domain_types::{
    errors::ConnectorError,
    router_data::ConnectorAuthType,
    router_request_types::{FollowUpOptions, TransactionOptions},
};
use gateway_service::GatewayClient;

mod common;
use common::{credit_card, gateway_config, options, secret, MockTransport};

const LOGIN: &str = r#"{"token":"bearer_token_123","expires_at":"2026-10-14T10:30:00+0000"}"#;
const INTENT: &str = r#"{"id":"int_hkdm8skd1h5b","status":"REQUIRES_PAYMENT_METHOD"}"#;
const SUCCEEDED: &str = r#"{"id":"int_hkdm8skd1h5b","status":"SUCCEEDED","latest_payment_attempt":{"id":"att_1","status":"AUTHORIZED","provider_transaction_id":"123456789012345"}}"#;
const REQUIRES_CAPTURE: &str = r#"{"id":"int_hkdm8skd1h5b","status":"REQUIRES_CAPTURE"}"#;
const CANCELLED: &str = r#"{"id":"int_hkdm8skd1h5b","status":"CANCELLED"}"#;

fn client(transport: std::sync::Arc<MockTransport>) -> GatewayClient {
    GatewayClient::new(
        ConnectorEnum::Airwallex,
        ConnectorAuthType::BodyKey {
            api_key: secret("api_key_7a9c1d"),
            key1: secret("client_id_c4d2"),
        },
        gateway_config(),
    )
    .with_transport(transport)
}

#[tokio::test]
async fn purchase_logs_in_creates_intent_then_confirms() {
    let transport = MockTransport::with_responses([(200, LOGIN), (201, INTENT), (200, SUCCEEDED)]);
    let response = client(transport.clone())
        .purchase(MinorUnit::new(1000), credit_card(), options())
        .await
        .unwrap();

    assert!(response.is_success());
    assert!(response.is_test());
    assert_eq!(response.authorization(), Some("int_hkdm8skd1h5b"));
    assert_eq!(response.network_transaction_id(), Some("123456789012345"));

    assert_eq!(
        transport.urls(),
        [
            "https://api-demo.airwallex.com/api/v1/authentication/login",
            "https://api-demo.airwallex.com/api/v1/pa/payment_intents/create",
            "https://api-demo.airwallex.com/api/v1/pa/payment_intents/int_hkdm8skd1h5b/confirm",
        ]
    );

    let requests = transport.requests();
    let login = requests.first().unwrap();
    assert_eq!(login.headers["x-client-id"], "client_id_c4d2");
    assert_eq!(login.headers["x-api-key"], "api_key_7a9c1d");

    let create: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
    assert_eq!(create["request_id"], "req_8f2c");
    assert_eq!(create["amount"], "10.00");
    assert_eq!(create["merchant_order_id"], "order-1001");

    let confirm = &requests[2];
    assert_eq!(confirm.headers["Authorization"], "Bearer bearer_token_123");
    let body: serde_json::Value = serde_json::from_str(&confirm.body).unwrap();
    assert_eq!(body["request_id"], "req_8f2c_purchase");
    assert_eq!(body["payment_method_options"]["card"]["auto_capture"], true);
}

#[tokio::test]
async fn authorize_does_not_auto_capture() {
    let transport =
        MockTransport::with_responses([(200, LOGIN), (201, INTENT), (200, REQUIRES_CAPTURE)]);
    let response = client(transport.clone())
        .authorize(MinorUnit::new(1000), credit_card(), options())
        .await
        .unwrap();

    assert!(response.is_success());
    let requests = transport.requests();
    let body: serde_json::Value = serde_json::from_str(&requests[2].body).unwrap();
    assert_eq!(body["payment_method_options"]["card"]["auto_capture"], false);
}

#[tokio::test]
async fn missing_return_url_fails_before_any_request() {
    let transport = MockTransport::with_responses([(200, LOGIN)]);
    let options = TransactionOptions {
        return_url: None,
        ..options()
    };
    let error = client(transport.clone())
        .purchase(MinorUnit::new(1000), credit_card(), options)
        .await
        .unwrap_err();

    assert!(error.current_context().is_validation_error());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn blank_return_url_fails_before_any_request() {
    let transport = MockTransport::with_responses([(200, LOGIN)]);
    let options = TransactionOptions {
        return_url: Some(" ".to_string()),
        ..options()
    };
    let error = client(transport.clone())
        .authorize(MinorUnit::new(1000), credit_card(), options)
        .await
        .unwrap_err();

    assert!(error.current_context().is_validation_error());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn rejected_login_stops_the_operation() {
    let transport = MockTransport::with_responses([(
        401,
        r#"{"code":"credentials_invalid","message":"Access denied, authentication failed"}"#,
    )]);
    let response = client(transport.clone())
        .purchase(MinorUnit::new(1000), credit_card(), options())
        .await
        .unwrap();

    assert!(!response.is_success());
    assert!(response.is_test());
    assert_eq!(response.error_code(), Some("credentials_invalid"));
    assert_eq!(
        response.message().to_string(),
        "Access denied, authentication failed"
    );
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn issuer_decline_surfaces_provider_code() {
    let transport = MockTransport::with_responses([
        (200, LOGIN),
        (201, INTENT),
        (
            400,
            r#"{"code":"issuer_declined","message":"The card issuer declined this transaction. Please refer to the original response code.","provider_original_response_code":"14"}"#,
        ),
    ]);
    let response = client(transport)
        .purchase(MinorUnit::new(1000), credit_card(), options())
        .await
        .unwrap();

    assert!(!response.is_success());
    assert_eq!(response.error_code(), Some("14"));
    assert_eq!(
        response.message().to_string(),
        "The card issuer declined this transaction. Please refer to the original response code."
    );
}

#[tokio::test]
async fn verify_authorizes_then_voids_the_intent() {
    let transport = MockTransport::with_responses([
        (200, LOGIN),
        (201, INTENT),
        (200, REQUIRES_CAPTURE),
        (200, CANCELLED),
    ]);
    let response = client(transport.clone())
        .verify(credit_card(), options())
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(response.authorization(), Some("int_hkdm8skd1h5b"));

    let requests = transport.requests();
    assert_eq!(requests.len(), 4);
    let create: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
    assert_eq!(create["amount"], "1.00");
    let void = requests.last().unwrap();
    assert_eq!(
        void.url,
        "https://api-demo.airwallex.com/api/v1/pa/payment_intents/int_hkdm8skd1h5b/cancel"
    );
    assert_eq!(void.headers["Authorization"], "Bearer bearer_token_123");
}

#[tokio::test]
async fn failed_void_does_not_fail_verify() {
    let transport = MockTransport::with_responses([
        (200, LOGIN),
        (201, INTENT),
        (200, REQUIRES_CAPTURE),
        (500, "upstream unavailable"),
    ]);
    let response = client(transport.clone())
        .verify(credit_card(), options())
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(transport.requests().len(), 4);
}

#[tokio::test]
async fn declined_verify_is_not_voided() {
    let transport = MockTransport::with_responses([
        (200, LOGIN),
        (201, INTENT),
        (
            400,
            r#"{"code":"issuer_declined","message":"Declined","provider_original_response_code":"05"}"#,
        ),
    ]);
    let response = client(transport.clone())
        .verify(credit_card(), options())
        .await
        .unwrap();

    assert!(!response.is_success());
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn capture_fetches_a_token_first() {
    let transport = MockTransport::with_responses([(200, LOGIN), (200, SUCCEEDED)]);
    let response = client(transport.clone())
        .capture(
            MinorUnit::new(1000),
            "int_hkdm8skd1h5b",
            FollowUpOptions {
                request_id: Some("req_8f2c".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(response.is_success());
    let requests = transport.requests();
    assert_eq!(
        requests[1].url,
        "https://api-demo.airwallex.com/api/v1/pa/payment_intents/int_hkdm8skd1h5b/capture"
    );
    let body: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
    assert_eq!(body["request_id"], "req_8f2c_capture");
}

#[tokio::test]
async fn blank_authorization_fails_before_login() {
    let transport = MockTransport::with_responses([(200, LOGIN), (200, SUCCEEDED)]);
    let client = client(transport.clone());

    let error = client
        .capture(MinorUnit::new(1000), "  ", FollowUpOptions::default())
        .await
        .unwrap_err();
    assert!(error.current_context().is_validation_error());

    let error = client
        .refund(MinorUnit::new(1000), "", FollowUpOptions::default())
        .await
        .unwrap_err();
    assert!(error.current_context().is_validation_error());

    let error = client
        .void("", FollowUpOptions::default())
        .await
        .unwrap_err();
    assert!(error.current_context().is_validation_error());

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn connection_failure_is_a_processing_error() {
    let transport = MockTransport::with_responses([(200, LOGIN), (201, INTENT)]);
    let error = client(transport)
        .purchase(MinorUnit::new(1000), credit_card(), options())
        .await
        .unwrap_err();

    assert!(matches!(
        error.current_context(),
        ConnectorError::ProcessingStepFailed(None)
    ));
}
