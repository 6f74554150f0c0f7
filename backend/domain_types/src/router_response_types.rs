use std::fmt;

use serde::Serialize;

#[derive(Clone, Debug)]
pub struct Response {
    /// headers
    pub headers: Option<http::HeaderMap>,
    /// response
    pub response: bytes::Bytes,
    /// status code
    pub status_code: u16,
}

/// Human readable outcome of a gateway call.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Message {
    Text(String),
    /// A field map, e.g. a parsed authorize.net direct response.
    Structured(serde_json::Map<String, serde_json::Value>),
    List(Vec<serde_json::Value>),
}

impl Default for Message {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl Message {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Structured(_) | Self::List(_) => None,
        }
    }

    pub fn as_structured(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        match self {
            Self::Structured(map) => Some(map),
            Self::Text(_) | Self::List(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Structured(map) => map.is_empty(),
            Self::List(list) => list.is_empty(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Structured(map) => {
                let joined = map
                    .iter()
                    .map(|(key, value)| match value {
                        serde_json::Value::String(value) => format!("{key}: {value}"),
                        other => format!("{key}: {other}"),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                f.write_str(&joined)
            }
            Self::List(items) => {
                let joined = items
                    .iter()
                    .map(|item| match item {
                        serde_json::Value::String(value) => value.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                f.write_str(&joined)
            }
        }
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Message {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Address verification outcome, decoded from the single letter code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AvsResult {
    pub code: Option<String>,
    pub message: Option<String>,
    /// `Y`, `N` or `X` (not supported); `None` when the street was not checked.
    pub street_match: Option<String>,
    pub postal_match: Option<String>,
}

const AVS_MESSAGES: &[(char, &str)] = &[
    ('A', "Street address matches, but postal code does not match."),
    ('B', "Street address matches, but postal code not verified."),
    ('C', "Street address and postal code do not match."),
    ('D', "Street address and postal code match."),
    ('E', "AVS data is invalid or AVS is not allowed for this card type."),
    ('F', "Card member's name does not match, but billing postal code matches."),
    ('G', "Non-U.S. issuing bank does not support AVS."),
    ('H', "Card member's name does not match. Street address and postal code match."),
    ('I', "Address not verified."),
    ('J', "Card member's name, billing address, and postal code match. Shipping information verified and chargeback protection guaranteed through the Fraud Protection Program."),
    ('K', "Card member's name matches but billing address and billing postal code do not match."),
    ('L', "Card member's name and billing postal code match, but billing address does not match."),
    ('M', "Street address and postal code match."),
    ('N', "Street address and postal code do not match."),
    ('O', "Card member's name and billing address match, but billing postal code does not match."),
    ('P', "Postal code matches, but street address not verified."),
    ('Q', "Card member's name, billing address, and postal code match. Shipping information verified but chargeback protection not guaranteed."),
    ('R', "System unavailable."),
    ('S', "U.S.-issuing bank does not support AVS."),
    ('T', "Card member's name does not match, but street address matches."),
    ('U', "Address information unavailable."),
    ('V', "Card member's name, billing address, and billing postal code match."),
    ('W', "Street address does not match, but 9-digit postal code matches."),
    ('X', "Street address and 9-digit postal code match."),
    ('Y', "Street address and 5-digit postal code match."),
    ('Z', "Street address does not match, but 5-digit postal code matches."),
];

const POSTAL_MATCH: &[(&str, &str)] = &[("Y", "DHFJLMPQVWXYZ"), ("N", "ACKNO"), ("X", "GS")];
const STREET_MATCH: &[(&str, &str)] = &[("Y", "ABDHJMOQTVXY"), ("N", "CKLNWZ"), ("X", "GS")];

fn lookup_match(table: &[(&str, &str)], code: char) -> Option<String> {
    table
        .iter()
        .find(|(_, codes)| codes.contains(code))
        .map(|(result, _)| (*result).to_string())
}

impl AvsResult {
    /// `None` for a blank code.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_uppercase();
        let letter = code.chars().next()?;
        Some(Self {
            message: AVS_MESSAGES
                .iter()
                .find(|(key, _)| *key == letter)
                .map(|(_, message)| (*message).to_string()),
            street_match: lookup_match(STREET_MATCH, letter),
            postal_match: lookup_match(POSTAL_MATCH, letter),
            code: Some(code),
        })
    }
}

/// Card verification value outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CvvResult {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl CvvResult {
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_uppercase();
        if code.is_empty() {
            return None;
        }
        let message = match code.as_str() {
            "D" => Some("CVV check flagged transaction as suspicious"),
            "I" => Some("CVV failed data validation check"),
            "M" => Some("CVV matches"),
            "N" => Some("CVV does not match"),
            "P" => Some("CVV not processed"),
            "S" => Some("CVV should have been present"),
            "U" => Some("CVV request unable to be processed by issuer"),
            "X" => Some("Card does not support verification"),
            _ => None,
        };
        Some(Self {
            code: Some(code),
            message: message.map(str::to_string),
        })
    }
}

/// The normalized result of every gateway operation.
#[derive(Clone, Debug, Default, Serialize)]
pub struct GatewayResponse {
    pub success: bool,
    pub message: Message,
    pub authorization: Option<String>,
    /// The parsed gateway response.
    pub params: serde_json::Value,
    pub test_mode: bool,
    pub error_code: Option<String>,
    pub avs_result: Option<AvsResult>,
    pub cvv_result: Option<CvvResult>,
    pub network_transaction_id: Option<String>,
    /// Transaction accepted but held for manual review by the gateway.
    pub fraud_review: bool,
}

impl GatewayResponse {
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    pub fn params(&self) -> &serde_json::Value {
        &self.params
    }

    pub fn is_test(&self) -> bool {
        self.test_mode
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    pub fn avs_result(&self) -> Option<&AvsResult> {
        self.avs_result.as_ref()
    }

    pub fn cvv_result(&self) -> Option<&CvvResult> {
        self.cvv_result.as_ref()
    }

    pub fn network_transaction_id(&self) -> Option<&str> {
        self.network_transaction_id.as_deref()
    }

    pub fn is_fraud_review(&self) -> bool {
        self.fraud_review
    }
}

impl From<crate::router_data::ErrorResponse> for GatewayResponse {
    fn from(error: crate::router_data::ErrorResponse) -> Self {
        Self {
            success: false,
            message: Message::Text(error.reason.unwrap_or(error.message)),
            authorization: error.connector_transaction_id,
            params: error.params,
            test_mode: false,
            error_code: Some(error.code),
            avs_result: None,
            cvv_result: None,
            network_transaction_id: None,
            fraud_review: false,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn avs_code_maps_to_street_and_postal_match() {
        let avs = AvsResult::from_code("A").unwrap();
        assert_eq!(avs.street_match.as_deref(), Some("Y"));
        assert_eq!(avs.postal_match.as_deref(), Some("N"));

        let avs = AvsResult::from_code("y").unwrap();
        assert_eq!(avs.code.as_deref(), Some("Y"));
        assert_eq!(
            avs.message.as_deref(),
            Some("Street address and 5-digit postal code match.")
        );

        let avs = AvsResult::from_code("U").unwrap();
        assert_eq!(avs.street_match, None);
        assert_eq!(avs.postal_match, None);
        assert!(AvsResult::from_code(" ").is_none());
    }

    #[test]
    fn cvv_code_maps_to_message() {
        let cvv = CvvResult::from_code("M").unwrap();
        assert_eq!(cvv.message.as_deref(), Some("CVV matches"));
        assert_eq!(CvvResult::from_code("Q").unwrap().message, None);
    }

    #[test]
    fn structured_message_displays_fields() {
        let mut map = serde_json::Map::new();
        map.insert("response_code".to_string(), "1".into());
        map.insert("response_reason_text".to_string(), "Approved".into());
        let message = Message::Structured(map);
        assert_eq!(
            message.to_string(),
            "response_code: 1, response_reason_text: Approved"
        );
        assert!(message.as_text().is_none());
    }

    #[test]
    fn error_response_becomes_failed_result() {
        let error = crate::router_data::ErrorResponse {
            code: "500".to_string(),
            message: "500".to_string(),
            ..Default::default()
        };
        let response = GatewayResponse::from(error);
        assert!(!response.is_success());
        assert_eq!(response.error_code(), Some("500"));
        assert_eq!(response.message().to_string(), "500");
    }
}
