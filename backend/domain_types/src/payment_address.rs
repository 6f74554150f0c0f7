use hyperswitch_masking::{PeekInterface, Secret};

use crate::utils::{missing_field_err, Error};

/// Billing or shipping address attached to a transaction.
#[derive(Clone, Default, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
pub struct Address {
    /// Full name on the address. Used when first and last name are absent.
    pub name: Option<Secret<String>>,
    pub first_name: Option<Secret<String>>,
    pub last_name: Option<Secret<String>>,
    pub company: Option<String>,
    /// The first line of the street address or P.O. Box.
    pub address1: Option<Secret<String>>,
    pub address2: Option<Secret<String>>,
    pub city: Option<String>,
    pub state: Option<Secret<String>>,
    pub zip: Option<Secret<String>>,
    /// The two-letter ISO 3166-1 alpha-2 country code (e.g., US, GB).
    pub country: Option<String>,
    pub phone: Option<Secret<String>>,
    pub fax: Option<Secret<String>>,
}

impl Address {
    pub fn get_optional_full_name(&self) -> Option<Secret<String>> {
        match (self.first_name.as_ref(), self.last_name.as_ref()) {
            (Some(first_name), Some(last_name)) => Some(Secret::new(format!(
                "{} {}",
                first_name.peek(),
                last_name.peek()
            ))),
            (Some(name), None) | (None, Some(name)) => Some(name.to_owned()),
            _ => self.name.clone(),
        }
    }

    /// First name, else the leading words of `name`.
    pub fn get_optional_first_name(&self) -> Option<Secret<String>> {
        self.first_name.clone().or_else(|| {
            self.name
                .as_ref()
                .map(|name| Secret::new(crate::payment_method_data::split_name(name.peek()).0))
        })
    }

    /// Last name, else the last word of `name`.
    pub fn get_optional_last_name(&self) -> Option<Secret<String>> {
        self.last_name.clone().or_else(|| {
            self.name
                .as_ref()
                .map(|name| Secret::new(crate::payment_method_data::split_name(name.peek()).1))
        })
    }

    pub fn get_zip(&self) -> Result<&Secret<String>, Error> {
        self.zip
            .as_ref()
            .ok_or_else(missing_field_err("address.zip"))
    }

    pub fn get_combined_address_line(&self) -> Option<Secret<String>> {
        match (self.address1.as_ref(), self.address2.as_ref()) {
            (Some(line1), Some(line2)) if !line2.peek().is_empty() => Some(Secret::new(format!(
                "{} {}",
                line1.peek(),
                line2.peek()
            ))),
            (Some(line1), _) => Some(line1.clone()),
            (None, line2) => line2.cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn full_name_falls_back_to_name() {
        let address = Address {
            name: Some(Secret::new("Jim Smith".to_string())),
            ..Default::default()
        };
        assert_eq!(address.get_optional_full_name().unwrap().peek(), "Jim Smith");
        assert_eq!(address.get_optional_first_name().unwrap().peek(), "Jim");
        assert_eq!(address.get_optional_last_name().unwrap().peek(), "Smith");
    }

    #[test]
    fn unknown_address_keys_are_rejected() {
        let err = serde_json::from_str::<Address>(r#"{"city":"Ottawa","province":"ON"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn missing_zip_is_a_missing_field() {
        let err = Address::default().get_zip().unwrap_err();
        assert_eq!(
            err.current_context(),
            &crate::errors::ConnectorError::MissingRequiredField {
                field_name: "address.zip"
            }
        );
    }
}
