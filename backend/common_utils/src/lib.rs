pub mod consts;
pub mod errors;
pub mod fp_utils;
pub mod pii;
pub mod request;
pub mod types;

pub use errors::{CustomResult, ParsingError, ValidationError};
pub use request::{Method, Request, RequestBuilder, RequestContent};
pub use types::{
    AmountConvertor, FloatMajorUnit, FloatMajorUnitForConnector, MinorUnit,
    MinorUnitForConnector, StringMajorUnit, StringMajorUnitForConnector, StringMinorUnit,
    StringMinorUnitForConnector,
};
