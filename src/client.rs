// Session/action dispatch engine for the Sabre SOAP API
use reqwest::header::HeaderMap;
use reqwest::Method;
use tracing::{debug, instrument, warn};

use crate::actions::Action;
use crate::authentication::Authentication;
use crate::config::{env_lookup, ClientConfig, Credentials, SabreOptions};
use crate::currency::Currency;
use crate::daily_sales::DailySales;
use crate::error::{ConfigError, Result, SabreError};
use crate::extract::{error_block, error_message, fault_string, soap_body};
use crate::headers::ActionHeaders;
use crate::queue::{Queue, QueueMeta};
use crate::session::{transition, AuthPayload, SessionContext, SessionState};
use crate::transport::{FetchRequestOptions, HttpTransport, Transport, TransportResponse};

// Caller overrides merged over the assembled request
#[derive(Debug, Clone, Default)]
pub struct PostOptions {
    pub method: Option<Method>,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// Stateful Sabre client.
///
/// Every dispatching method takes `&mut self`, so a client has at most one action in
/// flight. Share a client across tasks behind a mutex if calls can overlap.
pub struct SabreClient<T: Transport = HttpTransport> {
    transport: T,
    config: ClientConfig,
    credentials: Credentials,
    session: SessionState,
    headers: ActionHeaders,
    last_request: Option<FetchRequestOptions>,
    pub(crate) queue_meta: QueueMeta,
}

impl SabreClient<HttpTransport> {
    /// Creates a client against the default endpoint, with configuration overrides
    /// taken from the environment.
    ///
    /// # Errors
    ///
    /// Fails when username, password or organization is neither passed nor set in
    /// the environment.
    pub fn new(options: SabreOptions) -> Result<Self> {
        Self::with_config(options, ClientConfig::from_env())
    }

    pub fn with_config(options: SabreOptions, config: ClientConfig) -> Result<Self> {
        Self::with_transport(options, config, HttpTransport::default())
    }
}

impl<T: Transport> SabreClient<T> {
    pub fn with_transport(options: SabreOptions, config: ClientConfig, transport: T) -> Result<Self> {
        let credentials = Credentials::resolve(&options, &config.domain, env_lookup)?;
        Self::from_parts(credentials, config, transport)
    }

    pub fn from_parts(credentials: Credentials, config: ClientConfig, transport: T) -> Result<Self> {
        let headers = ActionHeaders::new(&config.user_agent)?;
        let session = SessionState::new(config.conversation_id.clone());
        Ok(Self {
            transport,
            config,
            credentials,
            session,
            headers,
            last_request: None,
            queue_meta: QueueMeta::default(),
        })
    }

    pub fn authentication(&mut self) -> Authentication<'_, T> {
        Authentication::new(self)
    }

    pub fn queue(&mut self) -> Queue<'_, T> {
        Queue::new(self)
    }

    pub fn currency(&mut self) -> Currency<'_, T> {
        Currency::new(self)
    }

    pub fn daily_sales(&mut self) -> DailySales<'_, T> {
        DailySales::new(self)
    }

    pub fn set_action(&mut self, action: Action) {
        self.headers = self.headers.with_action(action);
    }

    pub fn authorization(&self) -> &str {
        &self.session.authorization_token
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn conversation_id(&self) -> &str {
        &self.session.conversation_id
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn headers(&self) -> &ActionHeaders {
        &self.headers
    }

    // Diagnostics only
    pub fn last_request(&self) -> Option<&FetchRequestOptions> {
        self.last_request.as_ref()
    }

    /// Dispatches a protected action. `build` receives the current session context
    /// and returns the full SOAP envelope.
    ///
    /// # Errors
    ///
    /// Fails with `ConfigError::MissingAuthorization`, before anything is sent, when
    /// no session is open. Otherwise see [`SabreClient::fetch_request`].
    pub async fn post<F>(&mut self, build: F, options: PostOptions) -> Result<String>
    where
        F: FnOnce(&SessionContext<'_>) -> String,
    {
        if !self.session.is_authenticated() {
            return Err(ConfigError::MissingAuthorization.into());
        }
        let body = build(&self.session.context());
        let request = self.assemble(body, options);
        self.fetch_request(request).await
    }

    /// Dispatches an authentication action. `build` receives the conversation id
    /// and the full credential set.
    pub async fn auth<F>(&mut self, build: F, options: PostOptions) -> Result<String>
    where
        F: FnOnce(&AuthPayload<'_>) -> String,
    {
        if !self.credentials.is_complete() {
            let missing = [
                ("username", self.credentials.username.is_empty()),
                ("password", self.credentials.password.is_empty()),
                ("organization", self.credentials.organization.is_empty()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            return Err(ConfigError::MissingCredentials { missing }.into());
        }
        let payload = AuthPayload {
            conversation_id: &self.session.conversation_id,
            credentials: &self.credentials,
        };
        let body = build(&payload);
        let request = self.assemble(body, options);
        self.fetch_request(request).await
    }

    fn assemble(&self, body: String, options: PostOptions) -> FetchRequestOptions {
        let mut headers = self.headers.snapshot();
        headers.extend(options.headers);
        FetchRequestOptions {
            method: options.method.unwrap_or(Method::POST),
            headers,
            body: options.body.unwrap_or(body),
        }
    }

    /// Performs one exchange and classifies the response.
    ///
    /// # Errors
    ///
    /// - `SabreError::Fault` for a non-2xx status or a SOAP `<faultstring>`
    /// - `SabreError::Application` for an `<stl:Error>` block in the body
    /// - `SabreError::Transport` when the request could not be completed
    #[instrument(skip_all, fields(action = ?self.headers.action(), url = %self.config.base_url))]
    pub async fn fetch_request(&mut self, request: FetchRequestOptions) -> Result<String> {
        let action = self.headers.action();
        self.last_request = Some(request.clone());

        let response = self.transport.send(&self.config.base_url, &request).await?;
        debug!(status = response.status, bytes = response.body.len(), "response received");

        let body = classify(&response)?;

        let transition = transition(action, &response.body);
        self.headers = self.headers.apply(&transition)?;
        self.session.apply(&transition);
        debug!(?transition, "session updated");

        Ok(body.to_string())
    }
}

// Success body or one of the two typed failure kinds
fn classify(response: &TransportResponse) -> Result<&str> {
    let raw = response.body.as_str();
    let fault = fault_string(raw);

    if !response.is_success() {
        let message = if fault.is_empty() {
            format!("HTTP status {}", response.status)
        } else {
            fault.to_string()
        };
        warn!(status = response.status, %message, "fault response");
        return Err(SabreError::Fault {
            message,
            status: Some(response.status),
        });
    }

    if !fault.is_empty() {
        warn!(message = %fault, "fault in successful response");
        return Err(SabreError::Fault {
            message: fault.to_string(),
            status: Some(response.status),
        });
    }

    let body = soap_body(raw);
    let error = error_block(body);
    if !error.is_empty() {
        let message = error_message(error);
        warn!(%message, "error block in response body");
        return Err(SabreError::Application {
            message: message.to_string(),
        });
    }

    Ok(body)
}


// Dispatcher against a real HTTP server
#[cfg(test)]
mod http_tests {
    use super::*;
    use crate::extract::{TOKEN_CLOSE, TOKEN_OPEN};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> SabreClient {
        let config = ClientConfig::default().with_base_url(format!("{}/websvc", server.uri()));
        SabreClient::with_config(SabreOptions::new("agent", "secret", "AB12"), config).unwrap()
    }

    #[tokio::test]
    async fn test_session_round_trip_over_http() {
        let server = MockServer::start().await;
        let token_body = format!(
            "<soap-env:Envelope><soap-env:Header><wsse:Security>{TOKEN_OPEN}Shared/IDL:IceSess\\/SessMgr:1\\.0.IDL/Common/!ICESMS\\/RESC!{TOKEN_CLOSE}</wsse:Security></soap-env:Header><soap-env:Body><SessionCreateRS status=\"Approved\"/></soap-env:Body></soap-env:Envelope>"
        );
        Mock::given(method("POST"))
            .and(path("/websvc"))
            .and(header("soapaction", "SessionCreateRQ"))
            .and(header("content-type", crate::headers::XML_CONTENT_TYPE))
            .respond_with(ResponseTemplate::new(200).set_body_string(token_body))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = client(&server);
        client.set_action(Action::SessionCreate);
        let body = client
            .auth(|_| "<SessionCreateRQ/>".to_string(), PostOptions::default())
            .await
            .unwrap();

        assert_eq!(body, "<SessionCreateRS status=\"Approved\"/>");
        assert!(client.authorization().starts_with("Shared/IDL"));
    }

    #[tokio::test]
    async fn test_http_fault() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string(
                "<soap-env:Envelope><soap-env:Body><soap-env:Fault><faultcode>soap-env:Client.InvalidSecurityToken</faultcode><faultstring>BAD</faultstring></soap-env:Fault></soap-env:Body></soap-env:Envelope>",
            ))
            .mount(&server)
            .await;

        let mut client = client(&server);
        client.set_action(Action::TokenCreate);
        let err = client
            .auth(|_| String::new(), PostOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SabreError::Fault { ref message, status: Some(500) } if message == "BAD"));
    }

    #[tokio::test]
    async fn test_protected_call_without_session_sends_nothing() {
        let server = MockServer::start().await;
        let mut client = client(&server);
        client.set_action(Action::QueueCount);

        let result = client.post(|_| String::new(), PostOptions::default()).await;
        assert!(matches!(
            result,
            Err(SabreError::Config(ConfigError::MissingAuthorization))
        ));
        assert_eq!(server.received_requests().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let config = ClientConfig::default().with_base_url("http://127.0.0.1:1/websvc");
        let mut client =
            SabreClient::with_config(SabreOptions::new("agent", "secret", "AB12"), config).unwrap();
        client.set_action(Action::SessionCreate);

        let err = client
            .auth(|_| String::new(), PostOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SabreError::Transport(_)));
    }
}
