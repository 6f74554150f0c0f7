use common_utils::{request::Request, CustomResult};
use domain_types::{errors::ApiClientError, router_response_types::Response};

/// Sends one request to a gateway.
///
/// `Ok(Ok(_))` carries a 2xx response and `Ok(Err(_))` any other status. `Err` is reserved for
/// failures where no response was received.
#[async_trait::async_trait]
pub trait ConnectorTransport: Send + Sync {
    async fn send(&self, request: Request) -> CustomResult<Result<Response, Response>, ApiClientError>;
}
