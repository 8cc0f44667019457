//! # catalog-auth
//!
//! Authenticated access to the CatalogAI backend:
//! - Credential storage (in memory, or an encrypted file) for the access/refresh token pair
//! - HTTP transport built on `reqwest` with request logging middleware
//! - The request [`Gateway`], which attaches the bearer token and recovers from
//!   expired access tokens with a single coordinated refresh
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_auth::{
//!     credentials::FileStore,
//!     http::{HttpClientBuilder, ReqwestTransport},
//!     Gateway,
//! };
//!
//! let client = HttpClientBuilder::new().build()?;
//! let transport = ReqwestTransport::new(client, "http://localhost:8080/api/v1")?;
//! let gateway = Gateway::new(Arc::new(transport), Arc::new(FileStore::new(path)));
//! ```

pub mod credentials;
pub mod error;
pub mod gateway;
pub mod http;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
pub use gateway::{Gateway, GatewayBuilder, GatewayConfig, SessionExpiry, SessionListener};
