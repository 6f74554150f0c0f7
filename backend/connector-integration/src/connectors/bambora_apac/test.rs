#![allow(clippy::unwrap_used)]

use common_utils::MinorUnit;
use domain_types::{
    connector_flow::{Authorize, Capture, Refund, Store, Void},
    errors::ConnectorError,
    payment_method_data::PaymentMethod,
    router_data::ConnectorAuthType,
    router_request_types::FollowUpOptions,
    router_response_types::Message,
};
use hyperswitch_masking::Maskable;
use interfaces::{
    api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2,
    scrubbing::TranscriptScrubber,
};

use crate::{connectors::BamboraApac, test_support::*};

fn auth() -> ConnectorAuthType {
    ConnectorAuthType::BodyKey {
        api_key: secret("nmi.api"),
        key1: secret("qwerty123"),
    }
}

/// Wraps an inner `<Response>` document the way the service returns it.
fn soap_response(action: &str, namespace: &str, inner: &str) -> String {
    let escaped = inner
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema"><soap:Body><{action}Response xmlns="http://www.ippayments.com.au/interface/api/{namespace}"><{action}Result>{escaped}</{action}Result></{action}Response></soap:Body></soap:Envelope>"#
    )
}

const APPROVED: &str = "<Response><ResponseCode>0</ResponseCode><Timestamp>20-Oct-2026 10:14:22</Timestamp><Receipt>89435577</Receipt><SettlementDate>21-Oct-2026</SettlementDate><DeclinedCode></DeclinedCode><DeclinedMessage></DeclinedMessage></Response>";

const DECLINED: &str = "<Response><ResponseCode>1</ResponseCode><Timestamp>20-Oct-2026 10:15:01</Timestamp><Receipt>89435578</Receipt><SettlementDate>21-Oct-2026</SettlementDate><DeclinedCode>05</DeclinedCode><DeclinedMessage>Do Not Honour</DeclinedMessage></Response>";

mod purchase {
    use super::*;

    #[test]
    fn payment_is_wrapped_in_soap_envelope() {
        let connector = BamboraApac::new();
        let router_data =
            router_data::<Authorize, _>(&auth(), authorize(1000, credit_card(), options()));

        let body = body_text(connector.get_request_body(&router_data).unwrap());
        assert!(body.contains(
            r#"<soap:Body><SubmitSinglePayment xmlns="http://www.ippayments.com.au/interface/api/dts"><trnXML><![CDATA[<Transaction>"#
        ));
        assert!(body.contains("<CustRef>order-1001</CustRef><Amount>1000</Amount><TrnType>1</TrnType>"));
        assert!(body.contains(
            r#"<CreditCard Registered="False"><CardNumber>4111111111111111</CardNumber><ExpM>09</ExpM><ExpY>2030</ExpY><CVN>123</CVN><CardHolderName>Longbob Longsen</CardHolderName></CreditCard>"#
        ));
        assert!(body.contains(
            "<Security><UserName>nmi.api</UserName><Password>qwerty123</Password></Security></Transaction>]]></trnXML>"
        ));
        assert!(!body.contains("<AccountNumber>"));

        assert_eq!(
            connector.get_url(&router_data).unwrap(),
            "https://demo.bambora.co.nz/interface/api/dts.asmx"
        );
        let headers = connector.get_headers(&router_data).unwrap();
        assert!(headers.iter().any(|(name, value)| name == "SOAPAction"
            && matches!(value, Maskable::Normal(action)
                if action == "http://www.ippayments.com.au/interface/api/dts/SubmitSinglePayment")));
    }

    #[test]
    fn authorize_uses_pre_auth_type_and_account_number() {
        let connector = BamboraApac::new();
        let mut opts = options();
        opts.capture_method = Some(common_enums::CaptureMethod::Manual);
        let router_data = router_data::<Authorize, _>(
            &ConnectorAuthType::SignatureKey {
                api_key: secret("nmi.api"),
                key1: secret("qwerty123"),
                api_secret: secret("9999"),
            },
            authorize(1000, credit_card(), opts),
        );

        let body = body_text(connector.get_request_body(&router_data).unwrap());
        assert!(body.contains("<TrnType>2</TrnType><AccountNumber>9999</AccountNumber>"));
    }

    #[test]
    fn registered_customer_is_charged_by_number() {
        let connector = BamboraApac::new();
        let router_data = router_data::<Authorize, _>(
            &auth(),
            authorize(1000, PaymentMethod::StoredToken(secret("cust-4471")), options()),
        );

        let body = body_text(connector.get_request_body(&router_data).unwrap());
        assert!(body.contains(
            r#"<CreditCard Registered="True"><CardNumber>cust-4471</CardNumber></CreditCard>"#
        ));
    }

    #[test]
    fn checks_are_not_supported() {
        let connector = BamboraApac::new();
        let router_data = router_data::<Authorize, _>(&auth(), authorize(1000, check(), options()));

        let error = connector.get_request_body(&router_data).unwrap_err();
        assert!(matches!(
            error.current_context(),
            ConnectorError::NotSupported { .. }
        ));
    }

    #[test]
    fn approved_payment_returns_receipt() {
        let connector = BamboraApac::new();
        let router_data =
            router_data::<Authorize, _>(&auth(), authorize(1000, credit_card(), options()));
        let body = soap_response("SubmitSinglePayment", "dts", APPROVED);

        let response = connector
            .handle_response_v2(&router_data, http_response(200, &body))
            .unwrap()
            .response
            .unwrap();
        assert!(response.success);
        assert_eq!(response.authorization.as_deref(), Some("89435577"));
        assert_eq!(response.message, Message::Text("Succeeded".to_string()));
        assert_eq!(response.error_code, None);
        assert_eq!(response.params["Response"]["SettlementDate"], "21-Oct-2026");
    }

    #[test]
    fn declined_payment_reports_declined_fields() {
        let connector = BamboraApac::new();
        let router_data =
            router_data::<Authorize, _>(&auth(), authorize(1000, credit_card(), options()));
        let body = soap_response("SubmitSinglePayment", "dts", DECLINED);

        let response = connector
            .handle_response_v2(&router_data, http_response(200, &body))
            .unwrap()
            .response
            .unwrap();
        assert!(!response.success);
        assert_eq!(response.message, Message::Text("Do Not Honour".to_string()));
        assert_eq!(response.error_code.as_deref(), Some("05"));
    }

    #[test]
    fn escaped_ampersand_in_inner_document_is_kept() {
        let connector = BamboraApac::new();
        let router_data =
            router_data::<Authorize, _>(&auth(), authorize(1000, credit_card(), options()));
        let inner = DECLINED.replace("Do Not Honour", "Refer &amp; retain");
        let body = soap_response("SubmitSinglePayment", "dts", &inner);

        let response = connector
            .handle_response_v2(&router_data, http_response(200, &body))
            .unwrap()
            .response
            .unwrap();
        assert!(!response.success);
        assert_eq!(
            response.message,
            Message::Text("Refer & retain".to_string())
        );
    }

    #[test]
    fn envelope_without_result_fails_to_parse() {
        let connector = BamboraApac::new();
        let router_data =
            router_data::<Authorize, _>(&auth(), authorize(1000, credit_card(), options()));
        let body = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><Other/></soap:Body></soap:Envelope>"#;

        let error = connector
            .handle_response_v2(&router_data, http_response(200, body))
            .unwrap_err();
        assert!(matches!(
            error.current_context(),
            ConnectorError::ResponseDeserializationFailed
        ));
    }
}

mod follow_ups {
    use super::*;

    #[test]
    fn capture_names_receipt_and_amount() {
        let connector = BamboraApac::new();
        let router_data = router_data::<Capture, _>(&auth(), capture(1000, "89435577"));

        let body = body_text(connector.get_request_body(&router_data).unwrap());
        assert!(body.contains(r#"<SubmitSingleCapture xmlns="http://www.ippayments.com.au/interface/api/dts">"#));
        assert!(body.contains(
            "<![CDATA[<Capture><Receipt>89435577</Receipt><Amount>1000</Amount><Security>"
        ));

        let response_body = soap_response("SubmitSingleCapture", "dts", APPROVED);
        let response = connector
            .handle_response_v2(&router_data, http_response(200, &response_body))
            .unwrap()
            .response
            .unwrap();
        assert!(response.success);
    }

    #[test]
    fn refund_names_receipt() {
        let connector = BamboraApac::new();
        let router_data = router_data::<Refund, _>(&auth(), refund(500, "89435577"));

        let body = body_text(connector.get_request_body(&router_data).unwrap());
        assert!(body.contains("<SubmitSingleRefund "));
        assert!(body.contains("<Refund><Receipt>89435577</Receipt><Amount>500</Amount>"));
        let headers = connector.get_headers(&router_data).unwrap();
        assert!(headers.iter().any(|(_, value)| matches!(value, Maskable::Normal(action)
            if action == "http://www.ippayments.com.au/interface/api/dts/SubmitSingleRefund")));
    }

    #[test]
    fn void_restates_original_amount_when_known() {
        let connector = BamboraApac::new();
        let mut data = void("89435577");
        data.options = FollowUpOptions {
            amount: Some(MinorUnit::new(100)),
            ..Default::default()
        };
        let router_data = router_data::<Void, _>(&auth(), data);

        let body = body_text(connector.get_request_body(&router_data).unwrap());
        assert!(body.contains("<Void><Receipt>89435577</Receipt><Amount>100</Amount><Security>"));
    }

    #[test]
    fn void_without_amount_sends_receipt_only() {
        let connector = BamboraApac::new();
        let router_data = router_data::<Void, _>(&auth(), void("89435577"));

        let body = body_text(connector.get_request_body(&router_data).unwrap());
        assert!(body.contains("<Void><Receipt>89435577</Receipt><Security>"));
    }

    #[test]
    fn blank_receipt_is_rejected() {
        let connector = BamboraApac::new();
        let router_data = router_data::<Capture, _>(&auth(), capture(1000, " "));

        let error = connector.get_request_body(&router_data).unwrap_err();
        assert!(matches!(
            error.current_context(),
            ConnectorError::MissingRequiredField { .. }
        ));
    }
}

mod store {
    use super::*;

    #[test]
    fn register_goes_to_sipp_service() {
        let connector = BamboraApac::new();
        let router_data = router_data::<Store, _>(&auth(), store(credit_card()));

        let body = body_text(connector.get_request_body(&router_data).unwrap());
        assert!(body.contains(
            r#"<RegisterSingleCustomer xmlns="http://www.ippayments.com.au/interface/api/sipp"><registerSingleCustomerXML><![CDATA[<Register><Customer><CustNumber>req_8f2c</CustNumber>"#
        ));
        assert!(!body.contains("<CVN>"));
        assert_eq!(
            connector.get_url(&router_data).unwrap(),
            "https://demo.bambora.co.nz/interface/api/sipp.asmx"
        );
    }

    #[test]
    fn registered_customer_id_is_the_authorization() {
        let connector = BamboraApac::new();
        let router_data = router_data::<Store, _>(&auth(), store(credit_card()));
        let body = soap_response(
            "RegisterSingleCustomer",
            "sipp",
            "<Response><ReturnValue>0</ReturnValue><ReturnMessage></ReturnMessage><CustomerId>1877001</CustomerId></Response>",
        );

        let response = connector
            .handle_response_v2(&router_data, http_response(200, &body))
            .unwrap()
            .response
            .unwrap();
        assert!(response.success);
        assert_eq!(response.authorization.as_deref(), Some("1877001"));
    }

    #[test]
    fn failed_registration_reports_return_message() {
        let connector = BamboraApac::new();
        let router_data = router_data::<Store, _>(&auth(), store(credit_card()));
        let body = soap_response(
            "RegisterSingleCustomer",
            "sipp",
            "<Response><ReturnValue>1</ReturnValue><ReturnMessage>Invalid card number</ReturnMessage></Response>",
        );

        let response = connector
            .handle_response_v2(&router_data, http_response(200, &body))
            .unwrap()
            .response
            .unwrap();
        assert!(!response.success);
        assert_eq!(response.message, Message::Text("Invalid card number".to_string()));
        assert_eq!(response.error_code.as_deref(), Some("1"));
    }
}

mod errors {
    use super::*;

    #[test]
    fn soap_fault_is_read() {
        let connector = BamboraApac::new();
        let body = r#"<?xml version="1.0" encoding="utf-8"?><soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><soap:Fault><faultcode>soap:Client</faultcode><faultstring>Server was unable to read request.</faultstring></soap:Fault></soap:Body></soap:Envelope>"#;

        let error = connector
            .build_error_response(http_response(500, body))
            .unwrap();
        assert_eq!(error.code, "soap:Client");
        assert_eq!(error.message, "Server was unable to read request.");
    }
}

mod scrubbing {
    use super::*;

    #[test]
    fn scrub_masks_card_and_password() {
        let connector = BamboraApac::new();
        let router_data =
            router_data::<Authorize, _>(&auth(), authorize(1000, credit_card(), options()));
        let transcript = body_text(connector.get_request_body(&router_data).unwrap());

        let scrubbed = connector.scrub(&transcript);
        assert!(scrubbed.contains("<CardNumber>[FILTERED]</CardNumber>"));
        assert!(scrubbed.contains("<CVN>[FILTERED]</CVN>"));
        assert!(scrubbed.contains("<Password>[FILTERED]</Password>"));
        assert!(scrubbed.contains("<UserName>nmi.api</UserName>"));
        assert!(!scrubbed.contains("4111111111111111"));
        assert_eq!(connector.scrub(&scrubbed), scrubbed);
    }

    #[test]
    fn scrub_masks_empty_and_blank_values() {
        let connector = BamboraApac::new();
        let transcript = "<CardNumber> </CardNumber><CVN></CVN><ExpM>12</ExpM><Password>  </Password><UserName>nmi.api</UserName>";

        assert_eq!(
            connector.scrub(transcript),
            "<CardNumber>[FILTERED]</CardNumber><CVN>[FILTERED]</CVN><ExpM>12</ExpM><Password>[FILTERED]</Password><UserName>nmi.api</UserName>"
        );
    }
}
