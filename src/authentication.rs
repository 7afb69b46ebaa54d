// Session lifecycle: SessionCreateRQ, TokenCreateRQ, SessionCloseRQ
use tracing::info;

use crate::actions::Action;
use crate::client::{PostOptions, SabreClient};
use crate::error::Result;
use crate::session::{AuthPayload, SessionContext};
use crate::soap::Envelope;
use crate::transport::Transport;

pub struct Authentication<'a, T: Transport> {
    client: &'a mut SabreClient<T>,
}

impl<'a, T: Transport> Authentication<'a, T> {
    pub(crate) fn new(client: &'a mut SabreClient<T>) -> Self {
        Self { client }
    }

    /// Opens a session; the returned security token is kept by the client.
    pub async fn session_create(&mut self) -> Result<()> {
        self.client.set_action(Action::SessionCreate);
        self.client
            .auth(session_create_request, PostOptions::default())
            .await?;
        info!(conversation_id = %self.client.conversation_id(), "session created");
        Ok(())
    }

    // Stateless token, no host session behind it
    pub async fn token_create(&mut self) -> Result<()> {
        self.client.set_action(Action::TokenCreate);
        self.client
            .auth(token_create_request, PostOptions::default())
            .await?;
        info!(conversation_id = %self.client.conversation_id(), "token created");
        Ok(())
    }

    pub async fn session_close(&mut self) -> Result<()> {
        let pcc = self.client.credentials().organization.clone();
        self.client.set_action(Action::SessionClose);
        self.client
            .post(
                |ctx| session_close_request(ctx, &pcc),
                PostOptions::default(),
            )
            .await?;
        info!(conversation_id = %self.client.conversation_id(), "session closed");
        Ok(())
    }
}

pub fn session_create_request(payload: &AuthPayload<'_>) -> String {
    let body = format!(
        r#"<SessionCreateRQ><POS><Source PseudoCityCode="{}"/></POS></SessionCreateRQ>"#,
        quick_xml::escape::escape(&payload.credentials.organization)
    );
    Envelope::authenticating(Action::SessionCreate, payload, &body).render()
}

pub fn token_create_request(payload: &AuthPayload<'_>) -> String {
    let body = r#"<sws:TokenCreateRQ xmlns:sws="http://webservices.sabre.com" Version="1.0.0"/>"#;
    Envelope::authenticating(Action::TokenCreate, payload, body).render()
}

pub fn session_close_request(context: &SessionContext<'_>, pcc: &str) -> String {
    let body = format!(
        r#"<SessionCloseRQ><POS><Source PseudoCityCode="{}"/></POS></SessionCloseRQ>"#,
        quick_xml::escape::escape(pcc)
    );
    Envelope::protected(Action::SessionClose, context, &body)
        .with_cpa_id(pcc)
        .render()
}
