// Per-client header set, rebuilt ahead of every dispatch
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_ENCODING, CONTENT_TYPE, USER_AGENT,
};

use crate::actions::Action;
use crate::error::SabreError;
use crate::session::Transition;

pub const SOAP_ACTION: HeaderName = HeaderName::from_static("soapaction");
pub const XML_CONTENT_TYPE: &str = r#"text/xml; charset="utf-8""#;

#[derive(Debug, Clone)]
pub struct ActionHeaders {
    map: HeaderMap,
    action: Option<Action>,
}

impl ActionHeaders {
    pub fn new(user_agent: &str) -> Result<Self, SabreError> {
        let mut map = HeaderMap::new();
        map.insert(USER_AGENT, header_value(user_agent)?);
        map.insert(CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE));
        map.insert(CONTENT_ENCODING, HeaderValue::from_static("deflate"));
        Ok(Self { map, action: None })
    }

    pub fn action(&self) -> Option<Action> {
        self.action
    }

    pub fn get(&self, name: impl reqwest::header::AsHeaderName) -> Option<&str> {
        self.map.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn snapshot(&self) -> HeaderMap {
        self.map.clone()
    }

    // Overwrites SOAPAction, everything else is carried over
    pub fn with_action(&self, action: Action) -> Self {
        let mut next = self.clone();
        next.map
            .insert(SOAP_ACTION, HeaderValue::from_static(action.as_str()));
        next.action = Some(action);
        next
    }

    pub fn with_authorization(&self, token: &str) -> Result<Self, SabreError> {
        let mut next = self.clone();
        let mut value = header_value(&format!("Bearer {token}"))?;
        value.set_sensitive(true);
        next.map.insert(AUTHORIZATION, value);
        Ok(next)
    }

    pub fn without_authorization(&self) -> Self {
        let mut next = self.clone();
        next.map.remove(AUTHORIZATION);
        next
    }

    // Header delta of a session transition
    pub fn apply(&self, transition: &Transition) -> Result<Self, SabreError> {
        match transition {
            Transition::Authenticate(token) => self.with_authorization(token),
            Transition::Deauthenticate => Ok(self.without_authorization()),
            Transition::Unchanged => Ok(self.clone()),
        }
    }
}

fn header_value(value: &str) -> Result<HeaderValue, SabreError> {
    HeaderValue::from_str(value)
        .map_err(|e| SabreError::Other(format!("invalid header value: {e}")))
}
