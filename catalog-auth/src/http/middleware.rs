//! Request logging middleware.

use std::time::Instant;

use async_trait::async_trait;
use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};
use tracing::{debug, warn};

/// Logs method, path, status and latency of every outbound call.
///
/// Headers, query strings and bodies are never logged so tokens stay out of
/// the output.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestLogger;

#[async_trait]
impl Middleware for RequestLogger {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let method = req.method().clone();
        let path = req.url().path().to_string();
        let started = Instant::now();

        let result = next.run(req, extensions).await;

        match &result {
            Ok(response) => debug!(
                "{} {} -> {} in {:?}",
                method,
                path,
                response.status(),
                started.elapsed()
            ),
            Err(e) => warn!("{} {} failed after {:?}: {}", method, path, started.elapsed(), e),
        }

        result
    }
}
