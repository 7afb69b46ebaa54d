// SOAP envelope rendering shared by all request builders
use chrono::{SecondsFormat, Utc};
use quick_xml::escape::escape;

use crate::actions::Action;
use crate::config::Credentials;
use crate::session::{AuthPayload, SessionContext};

pub const FROM_PARTY: &str = "legacy-sabre";
pub const TO_PARTY: &str = "webservices.sabre.com";

// Namespace of the LLS request payloads
pub const SABRE_XML_NS: &str = "http://webservices.sabre.com/sabreXML/2011/10";

#[derive(Debug, Clone, Copy)]
pub enum Security<'a> {
    Token(&'a str),
    UsernameToken(&'a Credentials),
}

#[derive(Debug, Clone)]
pub struct Envelope<'a> {
    pub action: Action,
    pub conversation_id: &'a str,
    pub cpa_id: Option<&'a str>,
    pub security: Security<'a>,
    // Already serialized payload, inserted as-is
    pub body: &'a str,
}

impl<'a> Envelope<'a> {
    pub fn protected(action: Action, context: &SessionContext<'a>, body: &'a str) -> Self {
        Self {
            action,
            conversation_id: context.conversation_id,
            cpa_id: None,
            security: Security::Token(context.authorization),
            body,
        }
    }

    pub fn authenticating(action: Action, payload: &AuthPayload<'a>, body: &'a str) -> Self {
        Self {
            action,
            conversation_id: payload.conversation_id,
            cpa_id: Some(&payload.credentials.organization),
            security: Security::UsernameToken(payload.credentials),
            body,
        }
    }

    pub fn with_cpa_id(mut self, cpa_id: &'a str) -> Self {
        self.cpa_id = Some(cpa_id);
        self
    }

    pub fn render(&self) -> String {
        let mut xml = String::with_capacity(1024 + self.body.len());
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push_str(r#"<soap-env:Envelope xmlns:soap-env="http://schemas.xmlsoap.org/soap/envelope/">"#);
        xml.push_str("<soap-env:Header>");
        self.write_message_header(&mut xml);
        self.write_security(&mut xml);
        xml.push_str("</soap-env:Header>");
        xml.push_str("<soap-env:Body>");
        xml.push_str(self.body);
        xml.push_str("</soap-env:Body>");
        xml.push_str("</soap-env:Envelope>");
        xml
    }

    fn write_message_header(&self, xml: &mut String) {
        let action = self.action.as_str();
        let message_id = format!("mid:{:016x}@{}", rand::random::<u64>(), FROM_PARTY);
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        xml.push_str(r#"<eb:MessageHeader xmlns:eb="http://www.ebxml.org/namespaces/messageHeader" soap-env:mustUnderstand="1" eb:version="1.0">"#);
        xml.push_str(&format!("<eb:From><eb:PartyId>{FROM_PARTY}</eb:PartyId></eb:From>"));
        xml.push_str(&format!("<eb:To><eb:PartyId>{TO_PARTY}</eb:PartyId></eb:To>"));
        if let Some(cpa_id) = self.cpa_id {
            xml.push_str(&format!("<eb:CPAId>{}</eb:CPAId>", escape(cpa_id)));
        }
        xml.push_str(&format!(
            "<eb:ConversationId>{}</eb:ConversationId>",
            escape(self.conversation_id)
        ));
        xml.push_str(&format!("<eb:Service>{action}</eb:Service>"));
        xml.push_str(&format!("<eb:Action>{action}</eb:Action>"));
        xml.push_str(&format!(
            "<eb:MessageData><eb:MessageId>{message_id}</eb:MessageId><eb:Timestamp>{timestamp}</eb:Timestamp></eb:MessageData>"
        ));
        xml.push_str("</eb:MessageHeader>");
    }

    fn write_security(&self, xml: &mut String) {
        xml.push_str(r#"<wsse:Security xmlns:wsse="http://schemas.xmlsoap.org/ws/2002/12/secext" xmlns:wsu="http://schemas.xmlsoap.org/ws/2002/12/utility">"#);
        match self.security {
            Security::Token(token) => {
                xml.push_str(&format!(
                    r#"<wsse:BinarySecurityToken valueType="String" EncodingType="wsse:Base64Binary">{}</wsse:BinarySecurityToken>"#,
                    escape(token)
                ));
            }
            Security::UsernameToken(credentials) => {
                xml.push_str(&format!(
                    "<wsse:UsernameToken><wsse:Username>{}</wsse:Username><wsse:Password>{}</wsse:Password><Organization>{}</Organization><Domain>{}</Domain></wsse:UsernameToken>",
                    escape(&credentials.username),
                    escape(&credentials.password),
                    escape(&credentials.organization),
                    escape(&credentials.domain)
                ));
            }
        }
        xml.push_str("</wsse:Security>");
    }
}

// Payload root opening tag in the LLS namespace
pub fn lls_root(name: &str, version: &str) -> String {
    format!(r#"<{name} Version="{version}" xmlns="{SABRE_XML_NS}">"#)
}
