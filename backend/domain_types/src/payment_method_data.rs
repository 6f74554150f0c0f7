use cards::CardExpiration;
use common_enums::{BankAccountType, BankHolderType, CardBrand, TokenSource};
use error_stack::ResultExt;
use hyperswitch_masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};

use crate::{errors::ConnectorError, utils::Error};

/// A payment card. The number is Luhn checked when it is built or deserialized.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Card {
    pub number: cards::CardNumber,
    pub month: Secret<String>,
    pub year: Secret<String>,
    pub verification_value: Option<Secret<String>>,
    pub name: Secret<String>,
    pub brand: Option<CardBrand>,
}

impl Card {
    pub fn expiration(&self) -> Result<CardExpiration, Error> {
        CardExpiration::new(&self.month, &self.year)
            .change_context(ConnectorError::InvalidDataFormat {
                field_name: "card.expiration",
            })
    }

    pub fn last4(&self) -> String {
        self.number.get_last4()
    }

    pub fn first_name(&self) -> Secret<String> {
        Secret::new(split_name(self.name.peek()).0)
    }

    pub fn last_name(&self) -> Secret<String> {
        Secret::new(split_name(self.name.peek()).1)
    }

    /// The CVV, or `None` when absent or blank.
    pub fn get_verification_value(&self) -> Option<Secret<String>> {
        self.verification_value
            .clone()
            .filter(|cvv| !cvv.peek().trim().is_empty())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Check {
    pub account_number: Secret<String>,
    pub routing_number: Secret<String>,
    pub account_type: BankAccountType,
    pub account_holder_type: BankHolderType,
    pub name: Secret<String>,
    pub check_number: Option<String>,
}

impl Check {
    pub fn last4(&self) -> String {
        let number = self.account_number.peek();
        let skip = number.chars().count().saturating_sub(4);
        number.chars().skip(skip).collect()
    }

    pub fn first_name(&self) -> Secret<String> {
        Secret::new(split_name(self.name.peek()).0)
    }

    pub fn last_name(&self) -> Secret<String> {
        Secret::new(split_name(self.name.peek()).1)
    }
}

/// A network token (Apple Pay, Google Pay or scheme token) with its cryptogram.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkTokenCard {
    pub number: cards::NetworkToken,
    pub month: Secret<String>,
    pub year: Secret<String>,
    pub eci: Option<String>,
    pub payment_cryptogram: Secret<String>,
    pub source: TokenSource,
    pub name: Option<Secret<String>>,
    pub brand: Option<CardBrand>,
}

impl NetworkTokenCard {
    pub fn expiration(&self) -> Result<CardExpiration, Error> {
        CardExpiration::new(&self.month, &self.year)
            .change_context(ConnectorError::InvalidDataFormat {
                field_name: "network_token.expiration",
            })
    }

    pub fn last4(&self) -> String {
        self.number.get_last4()
    }

    pub fn first_name(&self) -> Option<Secret<String>> {
        self.name
            .as_ref()
            .map(|name| Secret::new(split_name(name.peek()).0))
    }

    pub fn last_name(&self) -> Option<Secret<String>> {
        self.name
            .as_ref()
            .map(|name| Secret::new(split_name(name.peek()).1))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard(Card),
    Check(Check),
    NetworkToken(NetworkTokenCard),
    /// A gateway-side token or vault id returned by an earlier `store`.
    StoredToken(Secret<String>),
}

impl PaymentMethod {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreditCard(_) => "credit_card",
            Self::Check(_) => "check",
            Self::NetworkToken(_) => "network_token",
            Self::StoredToken(_) => "stored_token",
        }
    }

    pub fn not_supported(&self, connector: &'static str) -> Error {
        ConnectorError::NotSupported {
            message: format!("Payment method {}", self.kind()),
            connector,
        }
        .into()
    }
}

/// Splits a holder name into first and last name: the last word is the last name.
pub fn split_name(full_name: &str) -> (String, String) {
    let mut words: Vec<&str> = full_name.split_whitespace().collect();
    match words.pop() {
        None => (String::new(), String::new()),
        Some(only) if words.is_empty() => (only.to_string(), String::new()),
        Some(last) => (words.join(" "), last.to_string()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::str::FromStr;

    use super::*;

    fn card(name: &str) -> Card {
        Card {
            number: cards::CardNumber::from_str("4111111111111111").unwrap(),
            month: Secret::new("9".to_string()),
            year: Secret::new("2030".to_string()),
            verification_value: Some(Secret::new(" ".to_string())),
            name: Secret::new(name.to_string()),
            brand: Some(CardBrand::Visa),
        }
    }

    #[test]
    fn names_split_on_last_word() {
        let card = card("Jane Q Public");
        assert_eq!(card.first_name().peek(), "Jane Q");
        assert_eq!(card.last_name().peek(), "Public");
        assert_eq!(split_name("Cher"), ("Cher".to_string(), String::new()));
    }

    #[test]
    fn blank_cvv_is_treated_as_missing() {
        assert!(card("Jane Doe").get_verification_value().is_none());
    }

    #[test]
    fn card_expiration_helpers() {
        let expiration = card("Jane Doe").expiration().unwrap();
        assert_eq!(expiration.month_year_short().peek(), "0930");
        assert_eq!(expiration.year_month_iso().peek(), "2030-09");
    }

    #[test]
    fn card_number_is_luhn_checked_on_deserialize() {
        let body = r#"{"number":"4111111111111112","month":"1","year":"2030","verification_value":null,"name":"A B","brand":null}"#;
        assert!(serde_json::from_str::<Card>(body).is_err());
    }
}
