#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ApiClientError {
    #[error("Header map construction failed")]
    HeaderMapConstructionFailed,
    #[error("Invalid proxy configuration")]
    InvalidProxyConfiguration,
    #[error("Client construction failed")]
    ClientConstructionFailed,
    #[error("Request body serialization failed")]
    BodySerializationFailed,
    #[error("Unexpected state reached/Invariants conflicted")]
    UnexpectedState,

    #[error("URL encoding of request payload failed")]
    UrlEncodingFailed,
    #[error("Failed to send request to connector {0}")]
    RequestNotSent(String),
    #[error("Failed to decode response")]
    ResponseDecodingFailed,

    #[error("Server responded with Request Timeout")]
    RequestTimeoutReceived,

    #[error("connection closed before a message could complete")]
    ConnectionClosedIncompleteMessage,

    #[error("Server responded with unexpected response")]
    UnexpectedServerResponse,
}

#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ConnectorError {
    #[error("Error while obtaining URL for the integration")]
    FailedToObtainIntegrationUrl,
    #[error("Failed to encode connector request")]
    RequestEncodingFailed,
    #[error("Request encoding failed : {0}")]
    RequestEncodingFailedWithReason(String),
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
    #[error("Failed to handle connector response")]
    ResponseHandlingFailed,
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: &'static str },
    #[error("Invalid data format for field: {field_name}")]
    InvalidDataFormat { field_name: &'static str },
    #[error("Failed to obtain authentication type")]
    FailedToObtainAuthType,
    #[error("Invalid connector configuration: {config}")]
    InvalidConnectorConfig { config: &'static str },
    #[error("This step has not been implemented for: {0}")]
    NotImplemented(String),
    #[error("{message} is not supported by {connector}")]
    NotSupported {
        message: String,
        connector: &'static str,
    },
    #[error("Failed to convert amount to required type")]
    AmountConversionFailed,
    #[error("Authorization `{authorization}` cannot be used for a follow-up with {connector}")]
    InvalidAuthorization {
        authorization: String,
        connector: &'static str,
    },
    #[error("Error while performing the processing step")]
    ProcessingStepFailed(Option<bytes::Bytes>),
}

impl ConnectorError {
    /// Validation failures are raised before any request leaves the process.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredField { .. }
                | Self::InvalidDataFormat { .. }
                | Self::FailedToObtainAuthType
                | Self::InvalidConnectorConfig { .. }
                | Self::NotSupported { .. }
                | Self::InvalidAuthorization { .. }
        )
    }
}
