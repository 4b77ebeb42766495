//! HTTP exchanges with the service.
//!
//! [`Transport`] is the seam between the session and the network: the session
//! hands it URLs and serialized documents and gets raw bytes back. The real
//! implementation, [`HttpTransport`], wraps a blocking reqwest client.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, ACCEPT_CHARSET, CONTENT_TYPE};
use tracing::debug;

use crate::errors::TransportError;
use crate::types::Response;
use crate::Configuration;

/// Account credentials sent as HTTP basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth
{
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicAuth
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Blocking request/response exchanges used by a session.
pub trait Transport
{
    /// Fetches `url` and returns the response body of a 2xx answer.
    fn get(&self, url: &str, auth: Option<&BasicAuth>) -> Result<Vec<u8>, TransportError>;

    /// Posts a JSON `body` to `url`.
    ///
    /// Implementations send `Accept: application/json`, `Content-Type: application/json`
    /// and `Accept-Charset: utf-8`, and map non-2xx answers to
    /// [`TransportError::NonSuccessStatus`].
    fn post_json(&self, url: &str, body: Vec<u8>, auth: Option<&BasicAuth>) -> Result<Response, TransportError>;
}

/// [`Transport`] over a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport
{
    client: Client,
}

impl HttpTransport
{
    /// Creates a client with the configured request and connect timeouts.
    pub fn new(config: &Configuration) -> Result<Self, TransportError>
    {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| TransportError::ConnectFailed {
                url: config.base_url.clone(),
                details: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self { client })
    }

    fn send(&self, url: &str, request: RequestBuilder, auth: Option<&BasicAuth>) -> Result<Response, TransportError>
    {
        let request = match auth {
            Some(auth) => request.basic_auth(&auth.username, Some(&auth.password)),
            None => request,
        };

        let response = request.send().map_err(|e| classify(url, e))?;
        let status = response.status();
        let body = response.bytes().map_err(|e| classify(url, e))?.to_vec();

        debug!("{} answered HTTP {} with {} bytes", url, status.as_u16(), body.len());

        if !status.is_success() {
            return Err(TransportError::NonSuccessStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(Response {
            status: status.as_u16(),
            body,
        })
    }
}

impl Transport for HttpTransport
{
    fn get(&self, url: &str, auth: Option<&BasicAuth>) -> Result<Vec<u8>, TransportError>
    {
        debug!("GET {}", url);
        let request = self.client.get(url).header(ACCEPT, "application/json");
        self.send(url, request, auth).map(|response| response.body)
    }

    fn post_json(&self, url: &str, body: Vec<u8>, auth: Option<&BasicAuth>) -> Result<Response, TransportError>
    {
        debug!("POST {} ({} bytes)", url, body.len());
        let request = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT_CHARSET, "utf-8")
            .body(body);
        self.send(url, request, auth)
    }
}

fn classify(url: &str, error: reqwest::Error) -> TransportError
{
    if error.is_timeout() {
        TransportError::Timeout { url: url.to_string() }
    } else {
        TransportError::ConnectFailed {
            url: url.to_string(),
            details: error.to_string(),
        }
    }
}
