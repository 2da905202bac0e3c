//! HTTP client capability for status polling

use std::time::Duration;
use tracing::debug;

use crate::error::PollResult;

/// Synchronous HEAD request returning the response status
pub trait HeadClient {
    fn head(&self, url: &str) -> PollResult<u16>;
}

impl<H: HeadClient + ?Sized> HeadClient for &H {
    fn head(&self, url: &str) -> PollResult<u16> {
        (**self).head(url)
    }
}

/// Blocking `reqwest` client. Redirects are followed, so the status is that of
/// the final response.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new() -> PollResult<Self> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { client })
    }

    /// Client with a per-request timeout
    pub fn with_timeout(timeout: Duration) -> PollResult<Self> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl HeadClient for HttpClient {
    fn head(&self, url: &str) -> PollResult<u16> {
        let resp = self.client.head(url).send()?;
        let status = resp.status().as_u16();
        debug!(url, status, "HEAD");
        Ok(status)
    }
}
