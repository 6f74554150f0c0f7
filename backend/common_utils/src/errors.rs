//! Errors and error specific types for universal use

/// Custom Result
/// A custom datatype that wraps the error variant <E> into a report, allowing
/// error_stack::Report<E> specific extendability
///
/// Effectively, equivalent to `Result<T, error_stack::Report<E>>`
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ParsingError {
    #[error("Failed to parse struct: {0}")]
    StructParseFailure(&'static str),
    #[error("Failed to serialize to {0} format")]
    EncodeError(&'static str),
    #[error("Unknown error while parsing")]
    UnknownError,
    #[error("Failed to parse email")]
    EmailParsingError,
    #[error("Failed to parse IP address")]
    IpAddressParsingError,
    #[error("Failed to convert i64 to a decimal value")]
    I64ToDecimalConversionFailure,
    #[error("Failed to convert string `{error}` to a decimal value")]
    StringToDecimalConversionFailure { error: String },
    #[error("Failed to convert decimal value to i64")]
    DecimalToI64ConversionFailure,
    #[error("Failed to convert between float and decimal")]
    FloatToDecimalConversionFailure,
    #[error("Failed to parse XML document")]
    XmlParseFailure,
}

/// Validation errors.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided input is missing a required field.
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: String },

    /// An incorrect value was provided for the field specified by `field_name`.
    #[error("Incorrect value provided for field: {field_name}")]
    IncorrectValueProvided { field_name: &'static str },

    /// An invalid input was provided.
    #[error("{message}")]
    InvalidValue { message: String },
}
