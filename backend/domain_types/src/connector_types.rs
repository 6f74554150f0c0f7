use crate::{router_request_types::AccessTokenResponseData, types::Connectors};

/// Data shared by every flow of one logical payment operation.
#[derive(Debug, Clone)]
pub struct PaymentFlowData {
    /// Base id of the operation. Multi-step flows suffix it per sub-request.
    pub connector_request_reference_id: String,
    pub test_mode: bool,
    pub connectors: Connectors,
    pub access_token: Option<AccessTokenResponseData>,
    /// Gateway-side order or intent id created by an earlier step.
    pub reference_id: Option<String>,
}

impl PaymentFlowData {
    pub fn new(connector_request_reference_id: String, test_mode: bool, connectors: Connectors) -> Self {
        Self {
            connector_request_reference_id,
            test_mode,
            connectors,
            access_token: None,
            reference_id: None,
        }
    }

    pub fn get_access_token(&self) -> Result<&AccessTokenResponseData, crate::utils::Error> {
        self.access_token
            .as_ref()
            .ok_or_else(crate::utils::missing_field_err("access_token"))
    }

    pub fn get_reference_id(&self) -> Result<&String, crate::utils::Error> {
        self.reference_id
            .as_ref()
            .ok_or_else(crate::utils::missing_field_err("reference_id"))
    }

    /// `<base>_<suffix>`, the request id of one sub-request.
    pub fn suffixed_request_id(&self, suffix: &str) -> String {
        format!("{}_{suffix}", self.connector_request_reference_id)
    }
}
