//! Blocking HTTP client for the pricing API.
//!
//! Holds the base URL and a lazily built `reqwest` client that is reused for
//! every request. Non-2xx responses become [`PricerError::Api`] carrying the
//! status and response body.

use crate::error::{PricerError, Result};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::time::Duration;

/// Shared HTTP plumbing for the endpoint wrappers.
pub struct ApiClient {
    /// Base URL without a trailing slash, e.g. `https://host/prod`.
    pub base_url: String,
    timeout: Duration,
    client: RefCell<Option<Client>>,
}

impl ApiClient {
    /// Create a client for the given base URL. No connection is made yet.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(PricerError::InvalidArgument(format!(
                "API base URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
            timeout,
            client: RefCell::new(None),
        })
    }

    /// Lazy HTTP client, created on first use.
    fn client(&self) -> Result<Client> {
        let mut slot = self.client.borrow_mut();
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Join an endpoint path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST a JSON body and return the response text.
    pub fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let resp = self.client()?.post(&url).json(body).send()?;
        read_body(resp)
    }

    /// GET with query parameters and return the response text.
    pub fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let resp = self.client()?.get(&url).query(query).send()?;
        read_body(resp)
    }

    /// GET and deserialize a JSON response.
    pub fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let body = self.get_text(path, query)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Drop the HTTP client; the next request builds a fresh one.
    pub fn close(&self) {
        self.client.borrow_mut().take();
    }
}

fn read_body(resp: Response) -> Result<String> {
    let status = resp.status();
    let body = resp.text()?;
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "API request failed");
        return Err(PricerError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}
