use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use isense_client::errors::TransportError;
use isense_client::{BasicAuth, Response, Transport};

/// A request seen by [`FakeTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest
{
    pub method: &'static str,
    pub url: String,
    pub body: Option<Vec<u8>>,
    pub auth: Option<BasicAuth>,
}

/// In-memory [`Transport`] for tests.
///
/// GET answers come from bodies registered per URL; unknown URLs answer 404.
/// POSTs answer 200 with the configured body. Any URL can be made to fail.
/// Clones share state, so a test can keep one handle after moving another
/// into a session.
#[derive(Clone, Default)]
pub struct FakeTransport
{
    bodies: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    failures: Arc<Mutex<HashMap<String, TransportError>>>,
    post_response: Arc<Mutex<Vec<u8>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeTransport
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Answer GETs of `url` with `body`.
    pub fn fake_body(&self, url: &str, body: &str)
    {
        self.bodies.lock().unwrap().insert(url.to_string(), body.as_bytes().to_vec());
    }

    /// Answer POSTs with `body`.
    pub fn fake_post_response(&self, body: &str)
    {
        *self.post_response.lock().unwrap() = body.as_bytes().to_vec();
    }

    /// Fail every request to `url` with `error`.
    pub fn fake_fail_url(&self, url: &str, error: TransportError)
    {
        self.failures.lock().unwrap().insert(url.to_string(), error);
    }

    /// Stop failing requests to `url`.
    pub fn fake_reset_url(&self, url: &str)
    {
        self.failures.lock().unwrap().remove(url);
    }

    pub fn requests(&self) -> Vec<RecordedRequest>
    {
        self.requests.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<RecordedRequest>
    {
        self.requests().into_iter().filter(|r| r.method == "POST").collect()
    }

    fn record(&self, method: &'static str, url: &str, body: Option<Vec<u8>>, auth: Option<&BasicAuth>)
    {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.to_string(),
            body,
            auth: auth.cloned(),
        });
    }

    fn failure(&self, url: &str) -> Option<TransportError>
    {
        self.failures.lock().unwrap().get(url).cloned()
    }
}

impl Transport for FakeTransport
{
    fn get(&self, url: &str, auth: Option<&BasicAuth>) -> Result<Vec<u8>, TransportError>
    {
        self.record("GET", url, None, auth);
        if let Some(error) = self.failure(url) {
            return Err(error);
        }

        self.bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::NonSuccessStatus {
                url: url.to_string(),
                status: 404,
                body: "Not Found".to_string(),
            })
    }

    fn post_json(&self, url: &str, body: Vec<u8>, auth: Option<&BasicAuth>) -> Result<Response, TransportError>
    {
        self.record("POST", url, Some(body), auth);
        if let Some(error) = self.failure(url) {
            return Err(error);
        }

        Ok(Response {
            status: 200,
            body: self.post_response.lock().unwrap().clone(),
        })
    }
}
