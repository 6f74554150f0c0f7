use interfaces::connector_types::BoxedConnector;

use crate::connectors::{Airwallex, AuthorizeDotNet, BamboraApac, Checkout, Elavon, Nmi, Worldpay};

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConnectorEnum {
    Airwallex,
    #[serde(alias = "authorize_net")]
    #[strum(serialize = "authorizedotnet", serialize = "authorize_net")]
    Authorizedotnet,
    BamboraApac,
    #[serde(alias = "checkout_v2")]
    #[strum(serialize = "checkout", serialize = "checkout_v2")]
    Checkout,
    Elavon,
    Nmi,
    Worldpay,
}

#[derive(Clone)]
pub struct ConnectorData {
    pub connector: BoxedConnector,
    pub connector_name: ConnectorEnum,
}

impl ConnectorData {
    pub fn get_connector_by_name(connector_name: &ConnectorEnum) -> Self {
        let connector = Self::convert_connector(*connector_name);
        Self {
            connector,
            connector_name: *connector_name,
        }
    }

    fn convert_connector(connector_name: ConnectorEnum) -> BoxedConnector {
        match connector_name {
            ConnectorEnum::Airwallex => Box::new(Airwallex::new()),
            ConnectorEnum::Authorizedotnet => Box::new(AuthorizeDotNet::new()),
            ConnectorEnum::BamboraApac => Box::new(BamboraApac::new()),
            ConnectorEnum::Checkout => Box::new(Checkout::new()),
            ConnectorEnum::Elavon => Box::new(Elavon::new()),
            ConnectorEnum::Nmi => Box::new(Nmi::new()),
            ConnectorEnum::Worldpay => Box::new(Worldpay::new()),
        }
    }
}

pub struct ResponseRouterData<Response, RouterData> {
    pub response: Response,
    /// The decoded body the typed `response` was read from.
    pub params: serde_json::Value,
    pub router_data: RouterData,
    pub http_code: u16,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::str::FromStr;

    use interfaces::api::ConnectorCommon;

    use super::*;

    #[test]
    fn connector_names_parse_with_aliases() {
        assert_eq!(
            ConnectorEnum::from_str("authorize_net").unwrap(),
            ConnectorEnum::Authorizedotnet
        );
        assert_eq!(
            ConnectorEnum::from_str("checkout_v2").unwrap(),
            ConnectorEnum::Checkout
        );
        assert_eq!(
            ConnectorEnum::from_str("bambora_apac").unwrap(),
            ConnectorEnum::BamboraApac
        );
        assert!(ConnectorEnum::from_str("stripe").is_err());
    }

    #[test]
    fn connector_data_reports_its_id() {
        let data = ConnectorData::get_connector_by_name(&ConnectorEnum::Nmi);
        assert_eq!(data.connector.id(), "nmi");
    }
}
