use std::{str::FromStr, time::Duration};

use common_utils::{
    request::{Method, Request},
    CustomResult,
};
use domain_types::{
    connector_types::PaymentFlowData,
    errors::{ApiClientError, ConnectorError},
    router_data_v2::RouterDataV2,
    router_request_types::{AccessTokenResponseData, PaymentCreateOrderResponse},
    router_response_types::{GatewayResponse, Message, Response},
    types::Proxy,
};
use error_stack::{report, ResultExt};
use hyperswitch_masking::{ExposeInterface, Maskable};
use interfaces::{
    api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2,
    scrubbing::TranscriptScrubber, transport::ConnectorTransport,
};
use once_cell::sync::OnceCell;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{field::Empty, Instrument};

pub type Headers = std::collections::HashSet<(String, Maskable<String>)>;

const MASKED_HEADER_VALUE: &str = "*** alloc::string::String ***";

/// What a flow's response becomes when a 2xx body cannot be parsed.
///
/// Flows returning a [`GatewayResponse`] turn it into a failed result; internal steps such as
/// access token and order creation have no such result and keep the error.
pub trait InvalidResponseFallback: Sized {
    fn from_invalid_response(_message: String, _test_mode: bool) -> Option<Self> {
        None
    }
}

impl InvalidResponseFallback for GatewayResponse {
    fn from_invalid_response(message: String, test_mode: bool) -> Option<Self> {
        Some(Self {
            success: false,
            message: Message::Text(message),
            test_mode,
            ..Default::default()
        })
    }
}

impl InvalidResponseFallback for AccessTokenResponseData {}
impl InvalidResponseFallback for PaymentCreateOrderResponse {}

pub async fn execute_connector_processing_step<C, F, Req, Resp>(
    transport: &dyn ConnectorTransport,
    connector: &C,
    router_data: RouterDataV2<F, PaymentFlowData, Req, Resp>,
    log_transcripts: bool,
) -> CustomResult<RouterDataV2<F, PaymentFlowData, Req, Resp>, ConnectorError>
where
    C: ConnectorIntegrationV2<F, PaymentFlowData, Req, Resp>
        + ConnectorCommon
        + TranscriptScrubber
        + ?Sized,
    F: Clone,
    Req: Clone,
    Resp: Clone + InvalidResponseFallback,
{
    let span = tracing::info_span!(
        "gateway_outgoing_request",
        connector = connector.id(),
        flow = short_type_name::<F>(),
        request_headers = Empty,
        request_body = Empty,
        response_body = Empty,
        status_code = Empty,
        latency = Empty,
        url = Empty,
        method = Empty,
    );

    async move {
        let start = tokio::time::Instant::now();
        let Some(request) = connector.build_request_v2(&router_data)? else {
            return Ok(router_data);
        };

        let current = tracing::Span::current();
        current.record("url", tracing::field::display(&request.url));
        current.record("method", tracing::field::display(request.method));
        current.record(
            "request_headers",
            tracing::field::display(masked_headers(&request.headers)),
        );
        if let Some(body) = request.body.as_ref() {
            current.record("request_body", tracing::field::display(body.masked_value()));
        }

        let request_line = log_transcripts.then(|| request_transcript(&request));
        let response = transport.send(request).await;
        current.record("latency", start.elapsed().as_millis());

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                info_log(
                    "NETWORK_ERROR",
                    &json!(format!(
                        "Failed getting response from connector. Error: {:?}",
                        err
                    )),
                );
                return Err(err.change_context(ConnectorError::ProcessingStepFailed(None)));
            }
        };

        let body = match &response {
            Ok(body) | Err(body) => body,
        };
        current.record("status_code", body.status_code);
        current.record(
            "response_body",
            tracing::field::display(connector.scrub(&String::from_utf8_lossy(&body.response))),
        );
        if let Some(request_line) = request_line {
            let transcript = format!(
                "{request_line}\n\nHTTP {}\n{}",
                body.status_code,
                String::from_utf8_lossy(&body.response)
            );
            tracing::debug!(transcript = %connector.scrub(&transcript), "connector transcript");
        }

        let mut router_data = router_data;
        let result = match response {
            Ok(body) => match connector.handle_response_v2(&router_data, body.clone()) {
                Ok(data) => data,
                Err(err)
                    if matches!(
                        err.current_context(),
                        ConnectorError::ResponseDeserializationFailed
                    ) =>
                {
                    let raw = String::from_utf8_lossy(&body.response);
                    let Some(fallback) = Resp::from_invalid_response(
                        connector.invalid_response_message(&raw),
                        router_data.resource_common_data.test_mode,
                    ) else {
                        return Err(err);
                    };
                    tracing::warn!(error = ?err, "connector returned an unparsable body");
                    router_data.response = Ok(fallback);
                    router_data
                }
                Err(err) => return Err(err),
            },
            Err(body) => {
                let error = match body.status_code {
                    500..=511 => connector.get_5xx_error_response(body)?,
                    _ => connector.get_error_response_v2(body)?,
                };
                router_data.response = Err(error);
                router_data
            }
        };
        tracing::info!(tag = %Tag::OutgoingApi, log_type = "api", "Outgoing Request completed");
        Ok(result)
    }
    .instrument(span)
    .await
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let name = std::any::type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}

fn masked_headers(headers: &Headers) -> Value {
    let masked = headers
        .iter()
        .fold(serde_json::Map::new(), |mut acc, (k, v)| {
            let value = match v {
                Maskable::Masked(_) => Value::String(MASKED_HEADER_VALUE.to_string()),
                Maskable::Normal(iv) => Value::String(iv.to_owned()),
            };
            acc.insert(k.clone(), value);
            acc
        });
    Value::Object(masked)
}

/// Unmasked request line, headers and body. Only ever logged after scrubbing.
fn request_transcript(request: &Request) -> String {
    let headers = request
        .get_headers_map()
        .into_iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join("\n");
    let body = request
        .body
        .as_ref()
        .map(|body| body.get_inner_value().expose())
        .unwrap_or_default();
    format!("{} {}\n{headers}\n\n{body}", request.method, request.url)
}

/// [`ConnectorTransport`] over a shared reqwest client.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    proxy: Proxy,
}

impl HttpTransport {
    pub fn new(proxy: Proxy) -> Self {
        Self { proxy }
    }
}

#[async_trait::async_trait]
impl ConnectorTransport for HttpTransport {
    async fn send(
        &self,
        request: Request,
    ) -> CustomResult<Result<Response, Response>, ApiClientError> {
        call_connector_api(&self.proxy, request).await
    }
}

pub async fn call_connector_api(
    proxy: &Proxy,
    request: Request,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let url =
        reqwest::Url::parse(&request.url).change_context(ApiClientError::UrlEncodingFailed)?;

    let should_bypass_proxy = proxy.bypass_proxy_urls.contains(&url.to_string());

    let client = get_base_client(proxy, should_bypass_proxy)?;

    let headers = request.headers.construct_header_map()?;

    let builder = match request.method {
        Method::Get => client.get(url),
        Method::Post => client.post(url),
        Method::Put => client.put(url),
        Method::Delete => client.delete(url),
        Method::Patch => client.patch(url),
    }
    .add_headers(headers);

    let builder = match request.body {
        Some(body) => builder.body(body.get_body_bytes()),
        None => builder,
    };

    let builder = match proxy.request_timeout_secs {
        Some(timeout) => builder.timeout(Duration::from_secs(timeout)),
        None => builder,
    };

    let response = builder.send().await.map_err(|error| {
        let api_error = match error {
            error if error.is_timeout() => ApiClientError::RequestTimeoutReceived,
            error if error.is_connect() => ApiClientError::RequestNotSent(error.to_string()),
            error if error.to_string().contains("connection closed before message completed") => {
                ApiClientError::ConnectionClosedIncompleteMessage
            }
            _ => ApiClientError::RequestNotSent(error.to_string()),
        };
        info_log(
            "REQUEST_FAILURE",
            &json!("Unable to send request to connector."),
        );
        report!(api_error)
    })?;

    handle_response(response).await
}

static NON_PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();
static PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();

fn get_base_client(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<Client, ApiClientError> {
    Ok(if should_bypass_proxy
        || (proxy_config.http_url.is_none() && proxy_config.https_url.is_none())
    {
        &NON_PROXIED_CLIENT
    } else {
        &PROXIED_CLIENT
    }
    .get_or_try_init(|| {
        get_client_builder(proxy_config, should_bypass_proxy)?
            .build()
            .change_context(ApiClientError::ClientConstructionFailed)
            .inspect_err(|err| {
                info_log(
                    "ERROR",
                    &json!(format!("Failed to construct base client. Error: {:?}", err)),
                );
            })
    })?
    .clone())
}

fn get_client_builder(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<reqwest::ClientBuilder, ApiClientError> {
    let mut client_builder = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_idle_timeout(Duration::from_secs(
            proxy_config
                .idle_pool_connection_timeout
                .unwrap_or_default(),
        ));

    if should_bypass_proxy {
        return Ok(client_builder);
    }

    if let Some(url) = proxy_config.https_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::https(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTPS proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    if let Some(url) = proxy_config.http_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::http(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTP proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    Ok(client_builder)
}

async fn handle_response(
    resp: reqwest::Response,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let status_code = resp.status().as_u16();
    let headers = Some(convert_headers(resp.headers()));
    match status_code {
        200..=299 | 302 => {
            let response = resp
                .bytes()
                .await
                .change_context(ApiClientError::ResponseDecodingFailed)?;
            Ok(Ok(Response {
                headers,
                response,
                status_code,
            }))
        }
        400..=599 => {
            let response = resp
                .bytes()
                .await
                .change_context(ApiClientError::ResponseDecodingFailed)?;
            Ok(Err(Response {
                headers,
                response,
                status_code,
            }))
        }
        _ => {
            info_log(
                "UNEXPECTED_RESPONSE",
                &json!("Unexpected response from server."),
            );
            Err(report!(ApiClientError::UnexpectedServerResponse))
        }
    }
}

/// Copies reqwest's header map into the `http` version used by [`Response`].
fn convert_headers(headers: &reqwest::header::HeaderMap) -> http::HeaderMap {
    headers
        .iter()
        .filter_map(|(name, value)| {
            Some((
                http::HeaderName::from_bytes(name.as_str().as_bytes()).ok()?,
                http::HeaderValue::from_bytes(value.as_bytes()).ok()?,
            ))
        })
        .collect()
}

pub(super) trait HeaderExt {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError>;
}

impl HeaderExt for Headers {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        self.into_iter().try_fold(
            HeaderMap::new(),
            |mut header_map, (header_name, header_value)| {
                let header_name = HeaderName::from_str(&header_name)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                let header_value = header_value.into_inner();
                let header_value = HeaderValue::from_str(&header_value)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                header_map.append(header_name, header_value);
                Ok(header_map)
            },
        )
    }
}

pub(super) trait RequestBuilderExt {
    fn add_headers(self, headers: reqwest::header::HeaderMap) -> Self;
}

impl RequestBuilderExt for reqwest::RequestBuilder {
    fn add_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self = self.headers(headers);
        self
    }
}

#[derive(Debug, Default, Clone, strum::Display)]
pub enum Tag {
    /// General.
    #[default]
    General,
    /// Api Outgoing Request
    OutgoingApi,
}

#[inline]
pub fn info_log(action: &str, message: &Value) {
    tracing::info!(tags = %action, json_value= %message);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use common_utils::request::RequestContent;

    use super::*;

    #[test]
    fn masked_headers_hide_secret_values() {
        let headers: Headers = [
            ("Content-Type".to_string(), "text/xml".to_string().into()),
            (
                "Authorization".to_string(),
                Maskable::new_masked("Basic c2VjcmV0".to_string().into()),
            ),
        ]
        .into_iter()
        .collect();

        let value = masked_headers(&headers);
        assert_eq!(value["Content-Type"], "text/xml");
        assert_eq!(value["Authorization"], MASKED_HEADER_VALUE);
    }

    #[test]
    fn header_map_is_built_from_maskable_values() {
        let headers: Headers = [(
            "X-Api-Key".to_string(),
            Maskable::new_masked("key".to_string().into()),
        )]
        .into_iter()
        .collect();

        let map = headers.construct_header_map().unwrap();
        assert_eq!(map.get("x-api-key").unwrap(), "key");
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let headers: Headers = [("bad header".to_string(), "v".to_string().into())]
            .into_iter()
            .collect();
        let error = headers.construct_header_map().unwrap_err();
        assert_eq!(
            error.current_context(),
            &ApiClientError::HeaderMapConstructionFailed
        );
    }

    #[test]
    fn transcript_carries_the_unmasked_request() {
        let mut request = Request::new(Method::Post, "https://gateway.test/pay");
        request.add_header("Authorization", Maskable::new_masked("Basic abc".to_string().into()));
        request.set_body(RequestContent::Xml("<cvc>123</cvc>".to_string().into()));

        let transcript = request_transcript(&request);
        assert!(transcript.starts_with("POST https://gateway.test/pay\n"));
        assert!(transcript.contains("Authorization: Basic abc"));
        assert!(transcript.ends_with("\n\n<cvc>123</cvc>"));
    }

    #[test]
    fn flow_name_is_the_last_path_segment() {
        assert_eq!(short_type_name::<domain_types::connector_flow::Authorize>(), "Authorize");
    }

    #[test]
    fn unparsable_body_becomes_a_failed_result() {
        let response =
            GatewayResponse::from_invalid_response("Invalid".to_string(), true).unwrap();
        assert!(!response.is_success());
        assert!(response.is_test());
        assert_eq!(response.message().to_string(), "Invalid");
        assert!(
            AccessTokenResponseData::from_invalid_response("Invalid".to_string(), true).is_none()
        );
    }
}
