//! Amount types shared by every connector

use std::{
    fmt::Display,
    ops::{Add, Sub},
    str::FromStr,
};

use common_enums::enums;
use error_stack::ResultExt;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};

use crate::errors::ParsingError;

/// Converts an amount held in minor units into the representation a connector expects.
pub trait AmountConvertor: Send {
    type Output;

    fn convert(
        &self,
        amount: MinorUnit,
        currency: enums::Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>>;

    fn convert_back(
        &self,
        amount: Self::Output,
        currency: enums::Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>>;
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct MinorUnitForConnector;

impl AmountConvertor for MinorUnitForConnector {
    type Output = MinorUnit;

    fn convert(
        &self,
        amount: MinorUnit,
        _currency: enums::Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        Ok(amount)
    }

    fn convert_back(
        &self,
        amount: MinorUnit,
        _currency: enums::Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        Ok(amount)
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct StringMinorUnitForConnector;

impl AmountConvertor for StringMinorUnitForConnector {
    type Output = StringMinorUnit;

    fn convert(
        &self,
        amount: MinorUnit,
        _currency: enums::Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        Ok(StringMinorUnit(amount.0.to_string()))
    }

    fn convert_back(
        &self,
        amount: Self::Output,
        _currency: enums::Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        amount
            .0
            .parse::<i64>()
            .map(MinorUnit)
            .change_context(ParsingError::StringToDecimalConversionFailure {
                error: amount.0.clone(),
            })
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct StringMajorUnitForConnector;

impl AmountConvertor for StringMajorUnitForConnector {
    type Output = StringMajorUnit;

    fn convert(
        &self,
        amount: MinorUnit,
        currency: enums::Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        amount.to_major_unit_as_string(currency)
    }

    fn convert_back(
        &self,
        amount: StringMajorUnit,
        currency: enums::Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        amount.to_minor_unit(currency)
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct FloatMajorUnitForConnector;

impl AmountConvertor for FloatMajorUnitForConnector {
    type Output = FloatMajorUnit;

    fn convert(
        &self,
        amount: MinorUnit,
        currency: enums::Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        amount
            .to_major_unit_as_decimal(currency)
            .to_f64()
            .map(FloatMajorUnit)
            .ok_or(ParsingError::FloatToDecimalConversionFailure.into())
    }

    fn convert_back(
        &self,
        amount: FloatMajorUnit,
        currency: enums::Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        let decimal = Decimal::try_from(amount.0)
            .change_context(ParsingError::FloatToDecimalConversionFailure)?;
        MinorUnit::from_major_unit_decimal(decimal, currency)
    }
}

/// Amount in the smallest unit of its currency (cents for USD, yen for JPY).
#[derive(
    Default, Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct MinorUnit(pub i64);

impl MinorUnit {
    pub fn get_amount_as_i64(self) -> i64 {
        self.0
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn new(value: i64) -> Self {
        Self(value)
    }

    fn to_major_unit_as_decimal(self, currency: enums::Currency) -> Decimal {
        Decimal::new(
            self.0,
            u32::from(currency.number_of_digits_after_decimal_point()),
        )
    }

    fn to_major_unit_as_string(
        self,
        currency: enums::Currency,
    ) -> Result<StringMajorUnit, error_stack::Report<ParsingError>> {
        Ok(StringMajorUnit(
            self.to_major_unit_as_decimal(currency).to_string(),
        ))
    }

    fn from_major_unit_decimal(
        amount: Decimal,
        currency: enums::Currency,
    ) -> Result<Self, error_stack::Report<ParsingError>> {
        let scale = Decimal::from(
            10_i64.pow(u32::from(currency.number_of_digits_after_decimal_point())),
        );
        amount
            .checked_mul(scale)
            .map(|minor| minor.round())
            .and_then(|minor| minor.to_i64())
            .map(Self)
            .ok_or(ParsingError::DecimalToI64ConversionFailure.into())
    }
}

impl Display for MinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for MinorUnit {
    type Output = Self;
    fn add(self, a2: Self) -> Self {
        Self(self.0 + a2.0)
    }
}

impl Sub for MinorUnit {
    type Output = Self;
    fn sub(self, a2: Self) -> Self {
        Self(self.0 - a2.0)
    }
}

#[derive(Default, Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct StringMinorUnit(String);

impl StringMinorUnit {
    pub fn get_amount_as_string(&self) -> String {
        self.0.clone()
    }
}

impl Display for StringMinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Major unit amount rendered with exactly the currency's number of decimals (`"10.00"`).
#[derive(Default, Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct StringMajorUnit(String);

impl StringMajorUnit {
    pub fn zero() -> Self {
        Self("0".to_string())
    }

    pub fn get_amount_as_string(&self) -> String {
        self.0.clone()
    }

    fn to_minor_unit(
        &self,
        currency: enums::Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        let decimal = Decimal::from_str(&self.0).map_err(|e| {
            ParsingError::StringToDecimalConversionFailure {
                error: e.to_string(),
            }
        })?;
        MinorUnit::from_major_unit_decimal(decimal, currency)
    }
}

impl Display for StringMajorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Default, Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(transparent)]
pub struct FloatMajorUnit(pub f64);

#[cfg(test)]
mod amount_conversion_tests {
    use super::*;

    #[test]
    fn major_unit_string_follows_currency_exponent() {
        let usd = StringMajorUnitForConnector
            .convert(MinorUnit::new(1000), enums::Currency::USD)
            .unwrap();
        assert_eq!(usd.to_string(), "10.00");

        let jpy = StringMajorUnitForConnector
            .convert(MinorUnit::new(1000), enums::Currency::JPY)
            .unwrap();
        assert_eq!(jpy.to_string(), "1000");

        let kwd = StringMajorUnitForConnector
            .convert(MinorUnit::new(1005), enums::Currency::KWD)
            .unwrap();
        assert_eq!(kwd.to_string(), "1.005");
    }

    #[test]
    fn major_unit_converts_back() {
        let minor = StringMajorUnitForConnector
            .convert_back(StringMajorUnit("12.34".to_string()), enums::Currency::EUR)
            .unwrap();
        assert_eq!(minor, MinorUnit::new(1234));
    }

    #[test]
    fn float_major_unit() {
        let amount = FloatMajorUnitForConnector
            .convert(MinorUnit::new(250), enums::Currency::USD)
            .unwrap();
        assert!((amount.0 - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn string_minor_unit() {
        let amount = StringMinorUnitForConnector
            .convert(MinorUnit::new(100), enums::Currency::AUD)
            .unwrap();
        assert_eq!(amount.to_string(), "100");
    }
}
