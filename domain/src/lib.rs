//! Typed operations on the CatalogAI backend.
//!
//! Every operation takes the shared [`Gateway`], so all of them get the bearer token attached
//! and take part in the coordinated token refresh. Consumers of the `domain` crate get the
//! response types re-exported here and do not need to depend on `entity` directly.
pub use catalog_auth::Gateway;
pub use entity::{
    api, catalogs, link_analysis, products, reports, subscriptions, users, Id,
};

pub mod auth;
pub mod catalog;
pub mod error;
pub mod link_analyzer;
pub mod product;
pub mod report;
pub mod subscription;

/// Joins path segments, percent-encoding each one.
pub(crate) fn path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|segment| urlencoding::encode(segment))
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
pub(crate) mod test_support {
    use catalog_auth::credentials::{CredentialPair, MemoryStore};
    use catalog_auth::http::{HttpClientBuilder, ReqwestTransport};
    use catalog_auth::Gateway;
    use mockito::ServerGuard;
    use secrecy::SecretString;
    use std::sync::Arc;

    pub const ACCESS_TOKEN: &str = "access-1";

    pub fn signed_in_store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::with_pair(CredentialPair::new(
            SecretString::from(ACCESS_TOKEN.to_string()),
            SecretString::from("refresh-1".to_string()),
        )))
    }

    pub fn gateway_with_store(server: &ServerGuard, store: Arc<MemoryStore>) -> Gateway {
        let client = HttpClientBuilder::new()
            .with_request_logging(false)
            .build()
            .unwrap();
        let transport = ReqwestTransport::new(client, &server.url()).unwrap();
        Gateway::new(Arc::new(transport), store)
    }

    pub fn signed_in_gateway(server: &ServerGuard) -> Gateway {
        gateway_with_store(server, signed_in_store())
    }

    pub fn bearer() -> String {
        format!("Bearer {ACCESS_TOKEN}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_encodes_each_segment() {
        assert_eq!(path(&["catalogs", "a/b c", "logs"]), "catalogs/a%2Fb%20c/logs");
    }
}
