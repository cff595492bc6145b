//! HTTP collaborator used by the auth flow and the fetchers.
//!
//! Calls are plain request/response: the status and the body text come back
//! to the caller, which decides what counts as success. Only failures that
//! prevent a response altogether are errors here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::TransportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST an `application/x-www-form-urlencoded` body.
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError>;

    /// GET with an `Authorization: Bearer` header.
    async fn get_with_bearer(&self, url: &str, token: &str)
    -> Result<HttpResponse, TransportError>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        let res = self.client.post(url).form(form).send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;
        Ok(HttpResponse { status, body })
    }

    async fn get_with_bearer(
        &self,
        url: &str,
        token: &str,
    ) -> Result<HttpResponse, TransportError> {
        let res = self.client.get(url).bearer_auth(token).send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;
        Ok(HttpResponse { status, body })
    }
}
