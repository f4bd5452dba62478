//! Blocking HTTP client used by tracker backends.

use std::time::Duration;

use reqwest::blocking::{Client, Response};

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("autoissues v", env!("CARGO_PKG_VERSION"));

/// HTTP client with a bounded timeout and the autoissues user agent.
///
/// Uses the blocking reqwest client. Do not create or drop it inside an
/// async runtime.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

/// Builder for HttpClient.
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: String,
}

impl HttpClient {
    /// Create a new builder for HttpClient.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder {
            timeout: DEFAULT_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends a GET request.
    pub fn get(&self, url: &str) -> Result<Response, reqwest::Error> {
        self.client.get(url).send()
    }
}

impl HttpClientBuilder {
    /// Set timeout for HTTP requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the HttpClient.
    pub fn build(self) -> Result<HttpClient, reqwest::Error> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()?;
        Ok(HttpClient {
            client,
            timeout: self.timeout,
        })
    }
}
