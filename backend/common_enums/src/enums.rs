#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::VariantNames,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Currency {
    AED,
    AUD,
    BHD,
    BRL,
    CAD,
    CHF,
    CLF,
    CLP,
    CNY,
    CZK,
    DKK,
    EUR,
    GBP,
    HKD,
    HUF,
    IDR,
    ILS,
    INR,
    JOD,
    JPY,
    KRW,
    KWD,
    MXN,
    MYR,
    NOK,
    NZD,
    OMR,
    PHP,
    PLN,
    SAR,
    SEK,
    SGD,
    THB,
    TND,
    TRY,
    TWD,
    #[default]
    USD,
    VND,
    XAF,
    XOF,
    ZAR,
}

impl Currency {
    pub fn is_zero_decimal_currency(self) -> bool {
        matches!(
            self,
            Self::CLP | Self::JPY | Self::KRW | Self::VND | Self::XAF | Self::XOF
        )
    }

    pub fn is_three_decimal_currency(self) -> bool {
        matches!(
            self,
            Self::BHD | Self::JOD | Self::KWD | Self::OMR | Self::TND
        )
    }

    pub fn is_four_decimal_currency(self) -> bool {
        matches!(self, Self::CLF)
    }

    pub fn number_of_digits_after_decimal_point(self) -> u8 {
        if self.is_zero_decimal_currency() {
            0
        } else if self.is_three_decimal_currency() {
            3
        } else if self.is_four_decimal_currency() {
            4
        } else {
            2
        }
    }
}

/// Unit in which a gateway expects amounts on the wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CurrencyUnit {
    Base,
    Minor,
}

/// Specifies how the payment is captured.
/// - `automatic`: funds are captured together with the authorization (a purchase).
/// - `manual`: funds are only authorized and a later capture is required.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaptureMethod {
    #[default]
    Automatic,
    Manual,
}

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CardBrand {
    #[serde(alias = "VISA")]
    Visa,
    #[serde(alias = "MASTERCARD", alias = "master")]
    Mastercard,
    #[serde(alias = "AMEX", alias = "american_express")]
    AmericanExpress,
    #[serde(alias = "DISCOVER")]
    Discover,
    #[serde(alias = "JCB")]
    Jcb,
    #[serde(alias = "DINERSCLUB", alias = "diners_club")]
    DinersClub,
    #[serde(alias = "MAESTRO")]
    Maestro,
    #[serde(alias = "UNIONPAY")]
    UnionPay,
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BankAccountType {
    #[default]
    Checking,
    Savings,
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BankHolderType {
    #[default]
    Personal,
    Business,
}

/// Party that started a stored-credential transaction.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StoredCredentialInitiator {
    Cardholder,
    Merchant,
}

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StoredCredentialReason {
    Recurring,
    Unscheduled,
    Installment,
}

impl StoredCredentialReason {
    /// Recurring and installment plans follow a schedule agreed with the cardholder.
    pub fn is_scheduled(self) -> bool {
        matches!(self, Self::Recurring | Self::Installment)
    }
}

/// Wallet or network that produced a network token.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TokenSource {
    ApplePay,
    GooglePay,
    #[default]
    NetworkToken,
}

/// Wire encoding of a gateway response body.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
pub enum ResponseFormat {
    #[strum(serialize = "JSON")]
    Json,
    #[strum(serialize = "XML")]
    Xml,
    #[strum(serialize = "form")]
    FormUrlEncoded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_exponents() {
        assert_eq!(Currency::USD.number_of_digits_after_decimal_point(), 2);
        assert_eq!(Currency::JPY.number_of_digits_after_decimal_point(), 0);
        assert_eq!(Currency::KWD.number_of_digits_after_decimal_point(), 3);
        assert_eq!(Currency::CLF.number_of_digits_after_decimal_point(), 4);
    }

    #[test]
    fn card_brand_accepts_upper_case_aliases() {
        let brand: CardBrand = serde_json::from_str("\"VISA\"").unwrap();
        assert_eq!(brand, CardBrand::Visa);
        let brand: CardBrand = serde_json::from_str("\"master\"").unwrap();
        assert_eq!(brand, CardBrand::Mastercard);
    }

    #[test]
    fn scheduled_reasons() {
        assert!(StoredCredentialReason::Recurring.is_scheduled());
        assert!(StoredCredentialReason::Installment.is_scheduled());
        assert!(!StoredCredentialReason::Unscheduled.is_scheduled());
    }
}
