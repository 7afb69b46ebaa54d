// Session state and the action-keyed authentication state machine
use tracing::warn;

use crate::actions::Action;
use crate::config::Credentials;
use crate::extract::security_token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    // Empty while unauthenticated
    pub authorization_token: String,
    pub conversation_id: String,
}

impl SessionState {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            authorization_token: String::new(),
            conversation_id: conversation_id.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.authorization_token.is_empty()
    }

    pub fn apply(&mut self, transition: &Transition) {
        match transition {
            Transition::Authenticate(token) => self.authorization_token = token.clone(),
            Transition::Deauthenticate => self.authorization_token.clear(),
            Transition::Unchanged => {}
        }
    }

    pub fn context(&self) -> SessionContext<'_> {
        SessionContext {
            authorization: &self.authorization_token,
            conversation_id: &self.conversation_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Authenticate(String),
    Deauthenticate,
    Unchanged,
}

/// Computes the session transition for a successfully completed action.
///
/// `raw` is the full response text, before the SOAP body is isolated, because the
/// security token travels in the envelope header.
pub fn transition(action: Option<Action>, raw: &str) -> Transition {
    match action {
        Some(action) if action.is_session_opening() => {
            let token = security_token(raw);
            if token.is_empty() {
                warn!(%action, "session opening response carried no security token");
                Transition::Deauthenticate
            } else {
                Transition::Authenticate(token.to_string())
            }
        }
        Some(action) if action.is_session_closing() => Transition::Deauthenticate,
        _ => Transition::Unchanged,
    }
}

// Handed to protected body builders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext<'a> {
    pub authorization: &'a str,
    pub conversation_id: &'a str,
}

// Handed to authentication body builders; carries credentials, never the token
#[derive(Debug, Clone, Copy)]
pub struct AuthPayload<'a> {
    pub conversation_id: &'a str,
    pub credentials: &'a Credentials,
}
