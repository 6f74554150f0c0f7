use std::borrow::Cow;

use bytes::Bytes;
use common_utils::CustomResult;
use domain_types::errors;
use error_stack::{report, ResultExt};
use quick_xml::{events::Event, Reader};
use serde_json::{Map, Value};

/// Key under which the text of an element that also has attributes or children is kept.
pub const TEXT_KEY: &str = "$text";

#[derive(Debug, Default)]
struct Node {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<(String, Value)>,
    text: String,
}

impl Node {
    fn into_value(self) -> Value {
        if self.attributes.is_empty() && self.children.is_empty() {
            return Value::String(self.text);
        }

        let mut map = Map::new();
        for (key, value) in self.attributes {
            map.insert(format!("@{key}"), Value::String(value));
        }
        for (key, value) in self.children {
            match map.get_mut(&key) {
                Some(Value::Array(siblings)) => siblings.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(key, value);
                }
            }
        }
        if !self.text.trim().is_empty() {
            map.insert(TEXT_KEY.to_string(), Value::String(self.text));
        }
        Value::Object(map)
    }
}

fn local_name(raw: &[u8]) -> String {
    let name = String::from_utf8_lossy(raw);
    match name.rsplit_once(':') {
        Some((_, local)) => local.to_string(),
        None => name.into_owned(),
    }
}

fn start_node(
    element: &quick_xml::events::BytesStart<'_>,
) -> CustomResult<Node, errors::ConnectorError> {
    let mut node = Node {
        name: local_name(element.name().as_ref()),
        ..Default::default()
    };
    for attribute in element.attributes() {
        let attribute =
            attribute.change_context(errors::ConnectorError::ResponseDeserializationFailed)?;
        let key = attribute.key.as_ref();
        if key.starts_with(b"xmlns") {
            continue;
        }
        let value = attribute
            .unescape_value()
            .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;
        node.attributes
            .push((local_name(key), value.into_owned()));
    }
    Ok(node)
}

/// Parses an XML document into `{ root_name: value }`.
///
/// Element text becomes a string, attributes become `@name` keys, repeated siblings become an
/// array and an empty element becomes `""`. Namespace prefixes are dropped from names.
pub fn xml_to_value(xml: &str) -> CustomResult<Value, errors::ConnectorError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let event = reader
            .read_event()
            .change_context(errors::ConnectorError::ResponseDeserializationFailed)
            .attach_printable_lazy(|| {
                format!("Malformed XML at position {}", reader.buffer_position())
            })?;
        match event {
            Event::Start(element) => stack.push(start_node(&element)?),
            Event::Empty(element) => {
                let node = start_node(&element)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;
                match stack.last_mut() {
                    Some(node) => node.text.push_str(&text),
                    None => {
                        return Err(report!(errors::ConnectorError::ResponseDeserializationFailed))
                            .attach_printable("Text outside of the root element")
                    }
                }
            }
            Event::CData(data) => {
                if let Some(node) = stack.last_mut() {
                    node.text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or(errors::ConnectorError::ResponseDeserializationFailed)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) => {}
        }
    }

    match (root, stack.is_empty()) {
        (Some((name, value)), true) => {
            let mut map = Map::new();
            map.insert(name, value);
            Ok(Value::Object(map))
        }
        _ => Err(report!(errors::ConnectorError::ResponseDeserializationFailed))
            .attach_printable("XML document has no complete root element"),
    }
}

fn attach(
    stack: &mut [Node],
    root: &mut Option<(String, Value)>,
    node: Node,
) -> CustomResult<(), errors::ConnectorError> {
    let name = node.name.clone();
    let value = node.into_value();
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push((name, value));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some((name, value));
            Ok(())
        }
        None => Err(report!(errors::ConnectorError::ResponseDeserializationFailed))
            .attach_printable("XML document has more than one root element"),
    }
}

/// Reverses XML entity escaping until the text opens with markup.
///
/// Entities inside the unescaped document belong to it and are left alone.
pub fn unescape_xml_entities(input: &str) -> CustomResult<String, errors::ConnectorError> {
    let mut current: Cow<'_, str> = Cow::Borrowed(input);
    for _ in 0..4 {
        if current.trim_start().starts_with('<') {
            break;
        }
        let unescaped = quick_xml::escape::unescape(&current)
            .change_context(errors::ConnectorError::ResponseDeserializationFailed)?
            .into_owned();
        if unescaped == current {
            break;
        }
        current = Cow::Owned(unescaped);
    }
    Ok(current.into_owned())
}

/// Pulls the `*Result` payload out of `Envelope/Body/*Response` and unescapes it.
pub fn unwrap_soap_result(body: &[u8]) -> CustomResult<Bytes, errors::ConnectorError> {
    let raw = std::str::from_utf8(body)
        .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;
    let envelope = xml_to_value(raw)?;
    let result = envelope
        .get("Envelope")
        .and_then(|envelope| envelope.get("Body"))
        .and_then(Value::as_object)
        .and_then(|body| body.values().next())
        .and_then(Value::as_object)
        .and_then(|response| {
            response
                .iter()
                .find(|(key, _)| key.ends_with("Result"))
                .map(|(_, value)| value)
        })
        .and_then(Value::as_str)
        .ok_or(errors::ConnectorError::ResponseDeserializationFailed)
        .attach_printable("SOAP envelope carries no *Result element")?;

    Ok(Bytes::from(unescape_xml_entities(result)?))
}

/// Drops a leading `<?xml ...?>` declaration.
pub fn strip_xml_declaration(xml: &str) -> &str {
    let trimmed = xml.trim();
    if trimmed.starts_with("<?xml") {
        trimmed
            .find("?>")
            .and_then(|position| trimmed.get(position + 2..))
            .map(str::trim)
            .unwrap_or(trimmed)
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn elements_attributes_and_repeats() {
        let value = xml_to_value(
            r#"<?xml version="1.0"?><reply><error code="5">Bad &amp; wrong</error><item>1</item><item>2</item><empty/><blank></blank></reply>"#,
        )
        .unwrap();
        let reply = &value["reply"];
        assert_eq!(reply["error"]["@code"], "5");
        assert_eq!(reply["error"][TEXT_KEY], "Bad & wrong");
        assert_eq!(reply["item"], serde_json::json!(["1", "2"]));
        assert_eq!(reply["empty"], "");
        assert_eq!(reply["blank"], "");
    }

    #[test]
    fn namespaces_are_dropped() {
        let value = xml_to_value(
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><Ping/></soap:Body></soap:Envelope>"#,
        )
        .unwrap();
        assert_eq!(value["Envelope"]["Body"]["Ping"], "");
    }

    #[test]
    fn plain_text_is_not_xml() {
        assert!(xml_to_value("Internal Server Error").is_err());
        assert!(xml_to_value("<open><inner>1</inner>").is_err());
    }

    #[test]
    fn soap_result_is_unwrapped_and_unescaped() {
        let body = br#"<?xml version="1.0" encoding="utf-8"?><soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><SubmitSinglePaymentResponse xmlns="http://www.ippayments.com.au/interface/api/dts"><SubmitSinglePaymentResult>&amp;lt;Response&amp;gt;&amp;lt;ResponseCode&amp;gt;0&amp;lt;/ResponseCode&amp;gt;&amp;lt;/Response&amp;gt;</SubmitSinglePaymentResult></SubmitSinglePaymentResponse></soap:Body></soap:Envelope>"#;
        let inner = unwrap_soap_result(body).unwrap();
        assert_eq!(&inner[..], b"<Response><ResponseCode>0</ResponseCode></Response>");
        let parsed = xml_to_value(std::str::from_utf8(&inner).unwrap()).unwrap();
        assert_eq!(parsed["Response"]["ResponseCode"], "0");
    }

    #[test]
    fn entities_inside_the_inner_document_survive() {
        let single = unescape_xml_entities(
            "<Response><DeclinedMessage>Refer &amp; retain</DeclinedMessage></Response>",
        )
        .unwrap();
        assert_eq!(
            single,
            "<Response><DeclinedMessage>Refer &amp; retain</DeclinedMessage></Response>"
        );

        let double = unescape_xml_entities(
            "&lt;Response&gt;&lt;DeclinedMessage&gt;Refer &amp;amp; retain&lt;/DeclinedMessage&gt;&lt;/Response&gt;",
        )
        .unwrap();
        assert_eq!(single, double);
        let parsed = xml_to_value(&double).unwrap();
        assert_eq!(
            parsed["Response"]["DeclinedMessage"],
            "Refer & retain"
        );
    }
}
