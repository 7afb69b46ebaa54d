// HTTP seam between the dispatcher and the network
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;

use crate::error::SabreError;

// Fully assembled request, kept as the client's "last request"
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    // One request, one full response body; no retries
    async fn send(
        &self,
        url: &str,
        request: &FetchRequestOptions,
    ) -> Result<TransportResponse, SabreError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        url: &str,
        request: &FetchRequestOptions,
    ) -> Result<TransportResponse, SabreError> {
        let response = self
            .client
            .request(request.method.clone(), url)
            .headers(request.headers.clone())
            .body(request.body.clone())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

// Scripted transport for unit tests
#[cfg(test)]
pub mod mock_transport {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<TransportResponse>>,
        sent: Mutex<Vec<(String, FetchRequestOptions)>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
            self.responses.lock().unwrap().push_back(TransportResponse {
                status,
                body: body.into(),
            });
            self
        }

        pub fn sent(&self) -> Vec<(String, FetchRequestOptions)> {
            self.sent.lock().unwrap().clone()
        }

        pub fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(
            &self,
            url: &str,
            request: &FetchRequestOptions,
        ) -> Result<TransportResponse, SabreError> {
            self.sent
                .lock()
                .unwrap()
                .push((url.to_string(), request.clone()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| SabreError::Other("no scripted response left".to_string()))
        }
    }

    // Shared handle so tests can inspect what was sent after the client used it
    #[async_trait]
    impl Transport for std::sync::Arc<MockTransport> {
        async fn send(
            &self,
            url: &str,
            request: &FetchRequestOptions,
        ) -> Result<TransportResponse, SabreError> {
            (**self).send(url, request).await
        }
    }
}
