//! HTTP transport: client building, request descriptors and the network seam.

mod client;
mod middleware;
mod request;
mod transport;

pub use client::{AuthenticatedClient, HttpClientBuilder, HttpClientConfig};
pub use middleware::RequestLogger;
pub use request::{ApiRequest, ApiResponse, FormPart, RequestBody};
pub use transport::{ReqwestTransport, Transport};
