//! The transport seam between the client and the server.
//!
//! [`CloudClient`](crate::CloudClient) never talks HTTP itself: it hands a
//! resource path, a method and parameters to a [`Fetch`] implementation and
//! gets back either a successful body or a classified error.

use crate::config::{ClientConfig, Credentials};
use crate::error::{Result, TransportError};
use crate::fault;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use tracing::{debug, warn};

/// HTTP methods used by the device API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Whether parameters travel as a form body rather than the query string.
    pub fn sends_form(&self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Executes one request and returns the raw response body.
///
/// Implementations resolve transport and authentication concerns and must
/// report every non-success outcome as an error.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, path: &str, method: Method, params: &[(String, String)])
        -> Result<String>;
}

/// [`Fetch`] over HTTP(S) using reqwest.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            credentials: config.credentials.clone(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(
        &self,
        path: &str,
        method: Method,
        params: &[(String, String)],
    ) -> Result<String> {
        let url = self.url(path);
        debug!("{} {} ({} params)", method, url, params.len());

        let mut request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        request = match &self.credentials {
            Credentials::Token { token } => request.bearer_auth(token),
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
        };

        if !params.is_empty() {
            request = if method.sends_form() {
                request.form(params)
            } else {
                request.query(params)
            };
        }

        send(request, &url).await.map_err(|e| {
            warn!("{} {} failed: {}", method, url, e);
            e.into()
        })
    }
}

/// Send a prepared request and classify the response.
async fn send(
    request: reqwest::RequestBuilder,
    url: &str,
) -> std::result::Result<String, TransportError> {
    let unreachable = |e: reqwest::Error| TransportError::Unreachable {
        url: url.to_string(),
        message: e.to_string(),
    };
    let resp = request.send().await.map_err(unreachable)?;
    let status = resp.status().as_u16();
    let body = resp.text().await.map_err(unreachable)?;
    fault::classify(url, status, body)
}
