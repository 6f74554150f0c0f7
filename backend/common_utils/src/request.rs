use hyperswitch_masking::{ErasedMaskSerialize, ExposeInterface, Maskable, PeekInterface, Secret};
use serde::{Deserialize, Serialize};

pub type Headers = std::collections::HashSet<(String, Maskable<String>)>;

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

fn default_request_headers() -> [(String, Maskable<String>); 1] {
    use http::header;

    [(header::VIA.to_string(), "payment-gateway-adapters".to_string().into())]
}

#[derive(Debug)]
pub struct Request {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
}

impl std::fmt::Debug for RequestContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Json(_) => "JsonRequestBody",
            Self::FormUrlEncoded(_) => "FormUrlEncodedRequestBody",
            Self::Xml(_) => "XmlRequestBody",
            Self::RawBytes(_) => "RawBytesRequestBody",
        })
    }
}

pub enum RequestContent {
    Json(Box<dyn ErasedMaskSerialize + Send>),
    FormUrlEncoded(Box<dyn ErasedMaskSerialize + Send>),
    /// An XML document that was already rendered, root element included.
    Xml(Secret<String>),
    RawBytes(Vec<u8>),
}

impl RequestContent {
    /// The unmasked wire body. Never log this without scrubbing it first.
    pub fn get_inner_value(&self) -> Secret<String> {
        match self {
            Self::Json(i) => serde_json::to_string(&i).unwrap_or_default().into(),
            Self::FormUrlEncoded(i) => serde_urlencoded::to_string(i).unwrap_or_default().into(),
            Self::Xml(document) => document.clone(),
            Self::RawBytes(bytes) => String::from_utf8_lossy(bytes).into_owned().into(),
        }
    }

    pub fn get_body_bytes(&self) -> Vec<u8> {
        match self {
            Self::RawBytes(bytes) => bytes.clone(),
            Self::Json(_) | Self::FormUrlEncoded(_) | Self::Xml(_) => {
                self.get_inner_value().expose().into_bytes()
            }
        }
    }

    /// A serde_json rendering with every secret replaced by its masked `Debug` form.
    pub fn masked_value(&self) -> serde_json::Value {
        match self {
            Self::Json(i) | Self::FormUrlEncoded(i) => i
                .masked_serialize()
                .unwrap_or(serde_json::json!({ "error": "failed to mask serialize connector request"})),
            Self::Xml(_) => serde_json::json!({"request_type": "XML"}),
            Self::RawBytes(_) => serde_json::json!({"request_type": "RAW_BYTES"}),
        }
    }
}

impl Request {
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: String::from(url),
            headers: std::collections::HashSet::new(),
            body: None,
        }
    }

    pub fn get_headers_map(&self) -> std::collections::BTreeMap<String, String> {
        self.headers
            .iter()
            .map(|(k, v)| {
                let val = match v {
                    Maskable::Masked(s) => s.peek().to_string(),
                    Maskable::Normal(s) => s.to_string(),
                };
                (k.clone(), val)
            })
            .collect()
    }

    pub fn set_body<T: Into<RequestContent>>(&mut self, body: T) {
        self.body.replace(body.into());
    }

    pub fn add_header(&mut self, header: &str, value: Maskable<String>) {
        self.headers.insert((String::from(header), value));
    }
}

#[derive(Debug)]
pub struct RequestBuilder {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: Method::Get,
            url: String::with_capacity(1024),
            headers: std::collections::HashSet::new(),
            body: None,
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.into();
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn attach_default_headers(mut self) -> Self {
        self.headers.extend(default_request_headers());
        self
    }

    pub fn header(mut self, header: &str, value: &str) -> Self {
        self.headers.insert((header.into(), value.into()));
        self
    }

    pub fn headers(mut self, headers: Vec<(String, Maskable<String>)>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn set_optional_body<T: Into<RequestContent>>(mut self, body: Option<T>) -> Self {
        body.map(|body| self.body.replace(body.into()));
        self
    }

    pub fn set_body<T: Into<RequestContent>>(mut self, body: T) -> Self {
        self.body.replace(body.into());
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
