pub mod validate;

use common_utils::errors;
use error_stack::report;
use hyperswitch_masking::{PeekInterface, Secret};
use time::{util::days_in_year_month, Date, Month, OffsetDateTime};

pub use crate::validate::{CCValError, CardNumber, CardNumberStrategy, NetworkToken};

/// Expiry month and year of a card or network token, held as secrets.
#[derive(Clone, Debug)]
pub struct CardExpiration {
    month: Secret<String>,
    year: Secret<String>,
}

impl CardExpiration {
    /// Accepts a month `1..=12` (with or without a leading zero) and a two or four digit year.
    pub fn new(
        month: &Secret<String>,
        year: &Secret<String>,
    ) -> errors::CustomResult<Self, errors::ValidationError> {
        let parsed_month = month
            .peek()
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or(report!(errors::ValidationError::InvalidValue {
                message: "invalid card expiration month".to_string()
            }))?;

        let year = year.peek().trim();
        let four_digit_year = match year.len() {
            2 => format!("20{year}"),
            4 => year.to_string(),
            _ => {
                return Err(report!(errors::ValidationError::InvalidValue {
                    message: "invalid card expiration year".to_string()
                }))
            }
        };
        if four_digit_year.parse::<u16>().is_err() {
            return Err(report!(errors::ValidationError::InvalidValue {
                message: "invalid card expiration year".to_string()
            }));
        }

        Ok(Self {
            month: Secret::new(format!("{parsed_month:02}")),
            year: Secret::new(four_digit_year),
        })
    }

    /// `MM`
    pub fn two_digit_month(&self) -> Secret<String> {
        self.month.clone()
    }

    /// `YYYY`
    pub fn four_digit_year(&self) -> Secret<String> {
        self.year.clone()
    }

    /// `YY`
    pub fn two_digit_year(&self) -> Secret<String> {
        Secret::new(self.year.peek().chars().skip(2).collect())
    }

    /// `MMYY`
    pub fn month_year_short(&self) -> Secret<String> {
        Secret::new(format!(
            "{}{}",
            self.month.peek(),
            self.two_digit_year().peek()
        ))
    }

    /// `YYYY-MM`
    pub fn year_month_iso(&self) -> Secret<String> {
        Secret::new(format!("{}-{}", self.year.peek(), self.month.peek()))
    }

    /// A card stays valid through the last day of its expiry month.
    pub fn is_expired(&self) -> bool {
        let year = self.year.peek().parse::<i32>().unwrap_or_default();
        let month = self
            .month
            .peek()
            .parse::<u8>()
            .ok()
            .and_then(|m| Month::try_from(m).ok());
        let Some(month) = month else {
            return true;
        };
        let last_day = days_in_year_month(year, month);
        match Date::from_calendar_date(year, month, last_day) {
            Ok(expiry) => OffsetDateTime::now_utc().date() > expiry,
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn secret(value: &str) -> Secret<String> {
        Secret::new(value.to_string())
    }

    #[test]
    fn expiration_formats() {
        let expiry = CardExpiration::new(&secret("9"), &secret("2030")).unwrap();
        assert_eq!(expiry.two_digit_month().peek(), "09");
        assert_eq!(expiry.two_digit_year().peek(), "30");
        assert_eq!(expiry.month_year_short().peek(), "0930");
        assert_eq!(expiry.year_month_iso().peek(), "2030-09");
        assert!(!expiry.is_expired());
    }

    #[test]
    fn two_digit_year_is_expanded() {
        let expiry = CardExpiration::new(&secret("12"), &secret("29")).unwrap();
        assert_eq!(expiry.four_digit_year().peek(), "2029");
    }

    #[test]
    fn rejects_bad_month_and_year() {
        assert!(CardExpiration::new(&secret("13"), &secret("2030")).is_err());
        assert!(CardExpiration::new(&secret("0"), &secret("2030")).is_err());
        assert!(CardExpiration::new(&secret("05"), &secret("203")).is_err());
        assert!(CardExpiration::new(&secret("05"), &secret("20ab")).is_err());
    }

    #[test]
    fn past_expiry_is_expired() {
        let expiry = CardExpiration::new(&secret("01"), &secret("2001")).unwrap();
        assert!(expiry.is_expired());
    }
}
