use common_enums::{CaptureMethod, Currency, StoredCredentialInitiator, StoredCredentialReason};
use common_utils::{
    pii::{Email, IpAddressValue},
    MinorUnit,
};
use hyperswitch_masking::Secret;

use crate::{
    payment_address::Address,
    payment_method_data::PaymentMethod,
    utils::{missing_field_err, Error},
};

/// Credential-on-file data for the initial and subsequent transactions of a stored card.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoredCredential {
    pub initial_transaction: bool,
    pub initiator: StoredCredentialInitiator,
    pub reason_type: StoredCredentialReason,
    /// Scheme transaction id of the initial transaction, set on subsequent ones.
    pub network_transaction_id: Option<String>,
}

impl StoredCredential {
    pub fn is_recurring(&self) -> bool {
        self.reason_type == StoredCredentialReason::Recurring
    }

    pub fn is_merchant_initiated(&self) -> bool {
        self.initiator == StoredCredentialInitiator::Merchant
    }
}

/// Externally performed 3-D Secure authentication results.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
pub struct ThreeDSecure {
    pub version: Option<String>,
    pub cavv: Option<Secret<String>>,
    pub eci: Option<String>,
    pub xid: Option<String>,
    pub ds_transaction_id: Option<String>,
    pub three_ds_server_trans_id: Option<String>,
    pub authentication_response_status: Option<String>,
}

impl ThreeDSecure {
    pub fn normalized_version(&self) -> Option<String> {
        self.version.as_deref().map(normalize_three_ds_version)
    }
}

/// Right-pads a 3DS protocol version with `0` components up to `major.minor.patch`.
pub fn normalize_three_ds_version(version: &str) -> String {
    let mut parts: Vec<&str> = version.trim().split('.').filter(|p| !p.is_empty()).collect();
    if parts.is_empty() {
        return version.to_string();
    }
    while parts.len() < 3 {
        parts.push("0");
    }
    parts.join(".")
}

/// Options accepted by purchase, authorize, verify and store.
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionOptions {
    pub order_id: Option<String>,
    pub description: Option<String>,
    pub invoice: Option<String>,
    pub currency: Option<Currency>,
    pub billing_address: Option<Address>,
    pub shipping_address: Option<Address>,
    pub email: Option<Email>,
    pub ip: Option<IpAddressValue>,
    pub customer_id: Option<String>,
    pub return_url: Option<String>,
    pub stored_credential: Option<StoredCredential>,
    pub three_d_secure: Option<ThreeDSecure>,
    pub execute_threed: Option<bool>,
    pub idempotency_key: Option<String>,
    pub request_id: Option<String>,
    pub merchant_reference_id: Option<String>,
    pub soft_descriptor: Option<String>,
    pub capture_method: Option<CaptureMethod>,
}

impl TransactionOptions {
    pub fn get_order_id(&self) -> Result<&String, Error> {
        self.order_id
            .as_ref()
            .filter(|order_id| !order_id.trim().is_empty())
            .ok_or_else(missing_field_err("order_id"))
    }

    pub fn get_return_url(&self) -> Result<&String, Error> {
        self.return_url
            .as_ref()
            .filter(|return_url| !return_url.trim().is_empty())
            .ok_or_else(missing_field_err("return_url"))
    }

    pub fn get_currency(&self) -> Currency {
        self.currency.unwrap_or_default()
    }

    pub fn is_auto_capture(&self) -> bool {
        self.capture_method.unwrap_or_default() == CaptureMethod::Automatic
    }

    /// CVV is not sent on recurring stored-credential transactions.
    pub fn should_send_cvv(&self) -> bool {
        !self
            .stored_credential
            .as_ref()
            .is_some_and(StoredCredential::is_recurring)
    }

    pub fn wants_three_ds(&self) -> bool {
        self.three_d_secure.is_some() || self.execute_threed.unwrap_or(false)
    }

    pub fn get_billing_address(&self) -> Option<&Address> {
        self.billing_address.as_ref()
    }
}

/// Options accepted by capture, refund, void and unstore.
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
pub struct FollowUpOptions {
    pub description: Option<String>,
    pub idempotency_key: Option<String>,
    pub request_id: Option<String>,
    pub reason: Option<String>,
    /// Currency of the follow-up amount.
    #[serde(alias = "amount_currency")]
    pub currency: Option<Currency>,
    /// Amount of the original transaction, restated by gateways whose void requires it.
    pub amount: Option<MinorUnit>,
}

impl FollowUpOptions {
    pub fn get_currency(&self) -> Currency {
        self.currency.unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct PaymentsAuthorizeData {
    pub amount: MinorUnit,
    pub payment_method: PaymentMethod,
    pub options: TransactionOptions,
}

impl PaymentsAuthorizeData {
    pub fn currency(&self) -> Currency {
        self.options.get_currency()
    }

    pub fn is_auto_capture(&self) -> bool {
        self.options.is_auto_capture()
    }
}

#[derive(Debug, Clone)]
pub struct PaymentsCaptureData {
    pub amount: MinorUnit,
    /// Authorization string returned by the authorize call.
    pub authorization: String,
    pub options: FollowUpOptions,
}

#[derive(Debug, Clone)]
pub struct RefundsData {
    pub amount: MinorUnit,
    pub authorization: String,
    pub options: FollowUpOptions,
}

#[derive(Debug, Clone)]
pub struct PaymentVoidData {
    pub authorization: String,
    pub options: FollowUpOptions,
}

#[derive(Debug, Clone)]
pub struct VerifyData {
    pub payment_method: PaymentMethod,
    pub options: TransactionOptions,
}

#[derive(Debug, Clone)]
pub struct StoreData {
    pub payment_method: PaymentMethod,
    pub options: TransactionOptions,
}

#[derive(Debug, Clone)]
pub struct UnstoreData {
    pub authorization: String,
    pub options: FollowUpOptions,
}

#[derive(Debug, Clone, Default)]
pub struct AccessTokenRequestData {}

#[derive(Debug, Clone)]
pub struct AccessTokenResponseData {
    pub access_token: Secret<String>,
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PaymentCreateOrderData {
    pub amount: MinorUnit,
    pub currency: Currency,
    pub options: TransactionOptions,
}

#[derive(Debug, Clone)]
pub struct PaymentCreateOrderResponse {
    /// Gateway-side id of the created order or payment intent.
    pub order_id: String,
}

/// Follow-up data common to every flow that references an earlier authorization.
pub trait FollowUpRequest {
    fn authorization(&self) -> &str;
}

impl FollowUpRequest for PaymentsCaptureData {
    fn authorization(&self) -> &str {
        &self.authorization
    }
}

impl FollowUpRequest for RefundsData {
    fn authorization(&self) -> &str {
        &self.authorization
    }
}

impl FollowUpRequest for PaymentVoidData {
    fn authorization(&self) -> &str {
        &self.authorization
    }
}

impl FollowUpRequest for UnstoreData {
    fn authorization(&self) -> &str {
        &self.authorization
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn three_ds_versions_are_padded() {
        assert_eq!(normalize_three_ds_version("1"), "1.0.0");
        assert_eq!(normalize_three_ds_version("2.0"), "2.0.0");
        assert_eq!(normalize_three_ds_version("2.2.0"), "2.2.0");
    }

    #[test]
    fn unknown_option_keys_are_rejected() {
        let parsed = serde_json::from_str::<TransactionOptions>(r#"{"order_id":"1","colour":"red"}"#);
        assert!(parsed.is_err());
        let parsed = serde_json::from_str::<FollowUpOptions>(r#"{"reason":"dup","amount_currency":"EUR"}"#)
            .unwrap();
        assert_eq!(parsed.get_currency(), Currency::EUR);
    }

    #[test]
    fn cvv_is_skipped_for_recurring_only() {
        let mut options = TransactionOptions {
            stored_credential: Some(StoredCredential {
                initial_transaction: false,
                initiator: StoredCredentialInitiator::Merchant,
                reason_type: StoredCredentialReason::Recurring,
                network_transaction_id: Some("abc".to_string()),
            }),
            ..Default::default()
        };
        assert!(!options.should_send_cvv());
        if let Some(stored) = options.stored_credential.as_mut() {
            stored.reason_type = StoredCredentialReason::Unscheduled;
        }
        assert!(options.should_send_cvv());
    }

    #[test]
    fn missing_order_id_is_reported_by_name() {
        let err = TransactionOptions::default().get_order_id().unwrap_err();
        assert_eq!(
            err.current_context(),
            &crate::errors::ConnectorError::MissingRequiredField {
                field_name: "order_id"
            }
        );
    }

    #[test]
    fn blank_required_options_count_as_missing() {
        let options = TransactionOptions {
            order_id: Some(" ".to_string()),
            return_url: Some(String::new()),
            ..Default::default()
        };
        assert!(options.get_order_id().is_err());
        assert_eq!(
            options.get_return_url().unwrap_err().current_context(),
            &crate::errors::ConnectorError::MissingRequiredField {
                field_name: "return_url"
            }
        );

        let options = TransactionOptions {
            order_id: Some("order-1001".to_string()),
            return_url: Some("https://example.com/return".to_string()),
            ..Default::default()
        };
        assert_eq!(options.get_order_id().unwrap(), "order-1001");
        assert_eq!(options.get_return_url().unwrap(), "https://example.com/return");
    }
}
