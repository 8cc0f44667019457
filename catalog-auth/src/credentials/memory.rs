//! In-process credential store.

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use super::{CredentialPair, Store};
use crate::error::Error;

/// Credential store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pair: RwLock<Option<CredentialPair>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts signed in with `pair`.
    pub fn with_pair(pair: CredentialPair) -> Self {
        Self {
            pair: RwLock::new(Some(pair)),
        }
    }

    /// Snapshot of the stored pair.
    pub async fn pair(&self) -> Option<CredentialPair> {
        self.pair.read().await.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn access_token(&self) -> Result<Option<SecretString>, Error> {
        Ok(self
            .pair
            .read()
            .await
            .as_ref()
            .map(|pair| pair.access_token.clone()))
    }

    async fn refresh_token(&self) -> Result<Option<SecretString>, Error> {
        Ok(self
            .pair
            .read()
            .await
            .as_ref()
            .map(|pair| pair.refresh_token.clone()))
    }

    async fn replace(&self, pair: CredentialPair) -> Result<(), Error> {
        *self.pair.write().await = Some(pair);
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        *self.pair.write().await = None;
        Ok(())
    }
}
