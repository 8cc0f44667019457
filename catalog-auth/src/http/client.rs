//! HTTP client builder with middleware.

use std::time::Duration;

use reqwest_middleware::ClientBuilder;

use super::RequestLogger;
use crate::error::Error;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Overall timeout of a single request, including the refresh call.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Whether to install [`RequestLogger`].
    pub log_requests: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("catalogai/{}", env!("CARGO_PKG_VERSION")),
            log_requests: true,
        }
    }
}

/// HTTP client with middleware, used by [`super::ReqwestTransport`].
pub type AuthenticatedClient = reqwest_middleware::ClientWithMiddleware;

/// Builder for the backend HTTP client.
///
/// Failed requests are never retried here; recovery from expired access
/// tokens is the gateway's job and every other failure goes back to the
/// caller untouched.
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    /// Create a new client builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: HttpClientConfig::default(),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.config.user_agent = user_agent;
        self
    }

    /// Enable or disable request logging.
    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.config.log_requests = enabled;
        self
    }

    /// Build the configured HTTP client.
    pub fn build(self) -> Result<AuthenticatedClient, Error> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(self.config.timeout)
            .user_agent(self.config.user_agent)
            .build()?;

        let mut builder = ClientBuilder::new(client);
        if self.config.log_requests {
            builder = builder.with(RequestLogger);
        }

        Ok(builder.build())
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default() {
        let builder = HttpClientBuilder::new();
        assert_eq!(builder.config.timeout, Duration::from_secs(30));
        assert!(builder.config.log_requests);
        assert!(builder.config.user_agent.starts_with("catalogai/"));
    }

    #[test]
    fn test_builder_with_timeout() {
        let builder = HttpClientBuilder::new().with_timeout(Duration::from_secs(5));
        assert_eq!(builder.config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_builder_without_logging() {
        let builder = HttpClientBuilder::new().with_request_logging(false);
        assert!(!builder.config.log_requests);
    }

    #[tokio::test]
    async fn test_build_client() {
        let result = HttpClientBuilder::new().build();
        assert!(result.is_ok());
    }
}
