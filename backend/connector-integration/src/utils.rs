use common_enums::ResponseFormat;
use common_utils::CustomResult;
use domain_types::{errors, utils::Error};
use error_stack::{report, ResultExt};
use hyperswitch_masking::Secret;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub mod xml_utils;
pub use xml_utils::{strip_xml_declaration, unescape_xml_entities, unwrap_soap_result, xml_to_value};

/// Decodes a response body into a value tree according to the connector's wire format.
pub fn parse_response(
    format: ResponseFormat,
    body: &[u8],
) -> CustomResult<Value, errors::ConnectorError> {
    match format {
        ResponseFormat::Json => {
            if body.iter().all(u8::is_ascii_whitespace) {
                Ok(Value::Object(Map::new()))
            } else {
                serde_json::from_slice(body)
                    .change_context(errors::ConnectorError::ResponseDeserializationFailed)
            }
        }
        ResponseFormat::Xml => {
            let raw = std::str::from_utf8(body)
                .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;
            xml_to_value(raw)
        }
        ResponseFormat::FormUrlEncoded => {
            let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
                .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;
            if pairs.is_empty() {
                return Err(report!(errors::ConnectorError::ResponseDeserializationFailed))
                    .attach_printable("Form response has no fields");
            }
            Ok(Value::Object(
                pairs
                    .into_iter()
                    .map(|(key, value)| (key, Value::String(value)))
                    .collect(),
            ))
        }
    }
}

/// Request bodies that are sent as a rendered XML document.
pub trait XmlRequestBody {
    fn render_xml(&self) -> CustomResult<Secret<String>, errors::ConnectorError>;
}

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

pub fn to_xml_with_root<T: Serialize>(
    root: &str,
    value: &T,
) -> CustomResult<String, errors::ConnectorError> {
    quick_xml::se::to_string_with_root(root, value)
        .change_context(errors::ConnectorError::RequestEncodingFailed)
        .attach_printable_lazy(|| format!("Failed to serialize <{root}> request"))
}

/// An XML element that may repeat. A single occurrence decodes as `One`.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn first(&self) -> Option<&T> {
        match self {
            Self::Many(items) => items.first(),
            Self::One(item) => Some(item),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Self::Many(items) => items.iter(),
            Self::One(item) => std::slice::from_ref(item).iter(),
        }
    }
}

/// Reads an optional XML child, treating an empty element (`<errors/>`) as absent.
pub fn deserialize_xml_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Compiles a connector's scrub table. A pattern that fails to compile is logged and skipped.
pub fn compile_scrub_patterns(patterns: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    patterns
        .iter()
        .filter_map(|(pattern, replacement)| match Regex::new(pattern) {
            Ok(regex) => Some((regex, *replacement)),
            Err(error) => {
                tracing::error!(%pattern, %error, "invalid scrub pattern");
                None
            }
        })
        .collect()
}

/// Applies ordered `(pattern, replacement)` substitutions to a transcript.
pub fn scrub_transcript(transcript: &str, patterns: &[(Regex, &str)]) -> String {
    patterns
        .iter()
        .fold(transcript.to_string(), |scrubbed, (pattern, replacement)| {
            pattern.replace_all(&scrubbed, *replacement).into_owned()
        })
}

/// Splits a composite authorization into exactly `parts` components.
pub fn split_authorization<'a>(
    authorization: &'a str,
    delimiter: char,
    parts: usize,
    connector: &'static str,
) -> Result<Vec<&'a str>, Error> {
    let authorization = domain_types::utils::require_authorization(authorization)?;
    let components: Vec<&str> = authorization.split(delimiter).collect();
    if components.len() == parts && components.iter().all(|part| !part.is_empty()) {
        Ok(components)
    } else {
        Err(errors::ConnectorError::InvalidAuthorization {
            authorization: authorization.to_string(),
            connector,
        }
        .into())
    }
}

/// Reads a scalar at `path`, rendering numbers and booleans as strings.
pub fn value_at(params: &Value, path: &[&str]) -> Option<String> {
    let target = path
        .iter()
        .try_fold(params, |current, key| current.get(*key))?;
    match target {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Object(map) => map
            .get(xml_utils::TEXT_KEY)
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::Array(_) | Value::Null => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn form_bodies_become_string_maps() {
        let value = parse_response(
            ResponseFormat::FormUrlEncoded,
            b"response=1&responsetext=SUCCESS&authcode=123456&transactionid=7",
        )
        .unwrap();
        assert_eq!(value["responsetext"], "SUCCESS");
        assert!(parse_response(ResponseFormat::FormUrlEncoded, b"").is_err());
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(parse_response(ResponseFormat::Json, b"<html>oops</html>").is_err());
        assert_eq!(
            parse_response(ResponseFormat::Json, b"").unwrap(),
            Value::Object(Map::new())
        );
    }

    #[test]
    fn composite_authorization_needs_every_part() {
        assert_eq!(
            split_authorization("123#1111#credit_card", '#', 3, "authorizedotnet").unwrap(),
            vec!["123", "1111", "credit_card"]
        );
        assert!(split_authorization("123##credit_card", '#', 3, "authorizedotnet").is_err());
        assert!(split_authorization("  ", '#', 3, "authorizedotnet").is_err());
    }

    #[test]
    fn repeated_and_empty_xml_children() {
        #[derive(Deserialize)]
        struct Messages {
            message: OneOrMany<String>,
            #[serde(default, deserialize_with = "deserialize_xml_optional")]
            errors: Option<Map<String, Value>>,
        }
        let single: Messages =
            serde_json::from_value(serde_json::json!({"message": "a", "errors": ""})).unwrap();
        assert_eq!(single.message.first().map(String::as_str), Some("a"));
        assert!(single.errors.is_none());
        let many: Messages =
            serde_json::from_value(serde_json::json!({"message": ["a", "b"]})).unwrap();
        assert_eq!(many.message.iter().count(), 2);
    }

    #[test]
    fn value_at_reads_nested_scalars() {
        let params = serde_json::json!({"a": {"b": 14, "c": {"$text": "x", "@k": "v"}}});
        assert_eq!(value_at(&params, &["a", "b"]).as_deref(), Some("14"));
        assert_eq!(value_at(&params, &["a", "c"]).as_deref(), Some("x"));
        assert_eq!(value_at(&params, &["a", "missing"]), None);
    }
}
