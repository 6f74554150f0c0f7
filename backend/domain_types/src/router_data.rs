use hyperswitch_masking::{ExposeInterface, Secret};

pub type Error = error_stack::Report<crate::errors::ConnectorError>;

/// Gateway credentials, supplied when an adapter client is constructed and never persisted.
#[derive(Default, Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(tag = "auth_type")]
pub enum ConnectorAuthType {
    HeaderKey {
        api_key: Secret<String>,
    },
    BodyKey {
        api_key: Secret<String>,
        key1: Secret<String>,
    },
    SignatureKey {
        api_key: Secret<String>,
        key1: Secret<String>,
        api_secret: Secret<String>,
    },
    MultiAuthKey {
        api_key: Secret<String>,
        key1: Secret<String>,
        api_secret: Secret<String>,
        key2: Secret<String>,
    },
    #[default]
    NoKey,
}

impl ConnectorAuthType {
    // show only first and last two characters of the key and mask others with *
    // mask the entire key if it's length is less than or equal to 4
    fn mask_key(&self, key: String) -> Secret<String> {
        let key_len = key.chars().count();
        let masked_key = if key_len <= 4 {
            "*".repeat(key_len)
        } else {
            key.chars()
                .enumerate()
                .map(|(index, character)| {
                    if index < 2 || index >= key_len - 2 {
                        character
                    } else {
                        '*'
                    }
                })
                .collect()
        };
        Secret::new(masked_key)
    }

    // Mask the keys in the auth_type
    pub fn get_masked_keys(&self) -> Self {
        match self {
            Self::NoKey => Self::NoKey,
            Self::HeaderKey { api_key } => Self::HeaderKey {
                api_key: self.mask_key(api_key.clone().expose()),
            },
            Self::BodyKey { api_key, key1 } => Self::BodyKey {
                api_key: self.mask_key(api_key.clone().expose()),
                key1: self.mask_key(key1.clone().expose()),
            },
            Self::SignatureKey {
                api_key,
                key1,
                api_secret,
            } => Self::SignatureKey {
                api_key: self.mask_key(api_key.clone().expose()),
                key1: self.mask_key(key1.clone().expose()),
                api_secret: self.mask_key(api_secret.clone().expose()),
            },
            Self::MultiAuthKey {
                api_key,
                key1,
                api_secret,
                key2,
            } => Self::MultiAuthKey {
                api_key: self.mask_key(api_key.clone().expose()),
                key1: self.mask_key(key1.clone().expose()),
                api_secret: self.mask_key(api_secret.clone().expose()),
                key2: self.mask_key(key2.clone().expose()),
            },
        }
    }
}

/// Failure reported by a gateway over a non-2xx HTTP status.
#[derive(Clone, Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub reason: Option<String>,
    pub status_code: u16,
    pub connector_transaction_id: Option<String>,
    /// Parsed body of the error response, `Null` when the body could not be parsed.
    pub params: serde_json::Value,
}

impl Default for ErrorResponse {
    fn default() -> Self {
        Self {
            code: "HE_00".to_string(),
            message: "Something went wrong".to_string(),
            reason: None,
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            connector_transaction_id: None,
            params: serde_json::Value::Null,
        }
    }
}

impl ErrorResponse {
    /// Fallback when nothing readable could be pulled out of the body: the status code is both
    /// the code and the message.
    pub fn from_status_code(status_code: u16) -> Self {
        Self {
            code: status_code.to_string(),
            message: status_code.to_string(),
            reason: None,
            status_code,
            connector_transaction_id: None,
            params: serde_json::Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use hyperswitch_masking::PeekInterface;

    use super::*;

    #[test]
    fn masked_keys_keep_outer_characters() {
        let auth = ConnectorAuthType::BodyKey {
            api_key: Secret::new("login123456".to_string()),
            key1: Secret::new("abc".to_string()),
        };
        match auth.get_masked_keys() {
            ConnectorAuthType::BodyKey { api_key, key1 } => {
                assert_eq!(api_key.peek(), "lo*******56");
                assert_eq!(key1.peek(), "***");
            }
            _ => panic!("auth type changed while masking"),
        }
    }

    #[test]
    fn auth_type_is_tagged() {
        let auth: ConnectorAuthType = serde_json::from_str(
            r#"{"auth_type":"HeaderKey","api_key":"sk_test"}"#,
        )
        .unwrap();
        assert!(matches!(auth, ConnectorAuthType::HeaderKey { .. }));
    }
}
