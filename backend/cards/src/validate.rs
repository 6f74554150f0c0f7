use std::{fmt, ops::Deref, str::FromStr};

use common_utils::consts::{MAX_CARD_NUMBER_LENGTH, MIN_CARD_NUMBER_LENGTH};
use hyperswitch_masking::{PeekInterface, Strategy, StrongSecret, WithType};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Deserialize, Serialize, Error)]
#[error("not a valid credit card number")]
pub struct CCValError;

impl From<core::convert::Infallible> for CCValError {
    fn from(_: core::convert::Infallible) -> Self {
        Self
    }
}

/// Card number
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CardNumber(StrongSecret<String, CardNumberStrategy>);

/// Network token (DPAN). Same shape as a card number, issued by a token service.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct NetworkToken(StrongSecret<String, CardNumberStrategy>);

impl CardNumber {
    pub fn get_card_isin(&self) -> String {
        self.0.peek().chars().take(6).collect::<String>()
    }

    pub fn get_last4(&self) -> String {
        last4(self.0.peek())
    }

    pub fn get_card_no(&self) -> String {
        self.0.peek().clone()
    }
}

impl NetworkToken {
    pub fn get_last4(&self) -> String {
        last4(self.0.peek())
    }

    pub fn get_network_token(&self) -> String {
        self.0.peek().clone()
    }
}

fn last4(number: &str) -> String {
    let skip = number.chars().count().saturating_sub(4);
    number.chars().skip(skip).collect()
}

fn sanitize(s: &str) -> Result<String, CCValError> {
    let digits: String = s.split_whitespace().collect();
    let valid = (MIN_CARD_NUMBER_LENGTH..=MAX_CARD_NUMBER_LENGTH).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit());
    if valid {
        Ok(digits)
    } else {
        Err(CCValError)
    }
}

/// Luhn mod-10 check over an all-digit string.
pub fn luhn(number: &str) -> bool {
    let sum = number
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(index, digit)| {
            if index % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum::<u32>();
    sum % 10 == 0
}

impl FromStr for CardNumber {
    type Err = CCValError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = sanitize(s)?;
        if luhn(&digits) {
            Ok(Self(StrongSecret::from_str(&digits)?))
        } else {
            Err(CCValError)
        }
    }
}

impl FromStr for NetworkToken {
    type Err = CCValError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = sanitize(s)?;
        Ok(Self(StrongSecret::from_str(&digits)?))
    }
}

impl TryFrom<String> for CardNumber {
    type Error = CCValError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl Deref for CardNumber {
    type Target = StrongSecret<String, CardNumberStrategy>;

    fn deref(&self) -> &StrongSecret<String, CardNumberStrategy> {
        &self.0
    }
}

impl Deref for NetworkToken {
    type Target = StrongSecret<String, CardNumberStrategy>;

    fn deref(&self) -> &StrongSecret<String, CardNumberStrategy> {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CardNumber {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for NetworkToken {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

pub enum CardNumberStrategy {}

impl<T> Strategy<T> for CardNumberStrategy
where
    T: AsRef<str>,
{
    fn fmt(val: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val_str: &str = val.as_ref();

        if val_str.len() < 15 || val_str.len() > 19 {
            return WithType::fmt(val, f);
        }

        if let Some(value) = val_str.get(..6) {
            write!(f, "{}{}", value, "*".repeat(val_str.len() - 6))
        } else {
            WithType::fmt(val, f)
        }
    }
}
