use common_utils::{AmountConvertor, MinorUnit};
use error_stack::ResultExt;

use crate::errors;

pub type Error = error_stack::Report<errors::ConnectorError>;

pub fn missing_field_err(
    message: &'static str,
) -> Box<dyn Fn() -> error_stack::Report<errors::ConnectorError> + 'static> {
    Box::new(move || {
        errors::ConnectorError::MissingRequiredField {
            field_name: message,
        }
        .into()
    })
}

pub fn convert_amount<T>(
    amount_convertor: &dyn AmountConvertor<Output = T>,
    amount: MinorUnit,
    currency: common_enums::Currency,
) -> Result<T, Error> {
    amount_convertor
        .convert(amount, currency)
        .change_context(errors::ConnectorError::AmountConversionFailed)
}

/// Rejects an empty or whitespace-only authorization before a follow-up is built.
pub fn require_authorization(authorization: &str) -> Result<&str, Error> {
    if authorization.trim().is_empty() {
        Err(missing_field_err("authorization")())
    } else {
        Ok(authorization)
    }
}
