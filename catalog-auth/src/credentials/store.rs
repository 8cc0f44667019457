//! Credential store trait.

use async_trait::async_trait;
use secrecy::SecretString;

use super::CredentialPair;
use crate::error::Error;

/// Fixed key of the access token entry.
pub const ACCESS_TOKEN_KEY: &str = "catalogai_access_token";

/// Fixed key of the refresh token entry.
pub const REFRESH_TOKEN_KEY: &str = "catalogai_refresh_token";

/// Process-wide store of the current [`CredentialPair`].
///
/// Holds exactly two entries, [`ACCESS_TOKEN_KEY`] and [`REFRESH_TOKEN_KEY`].
/// Implementations must make `replace` and `clear` atomic: readers observe
/// either the whole old pair, the whole new pair, or nothing.
#[async_trait]
pub trait Store: Send + Sync {
    /// Current access token, if signed in.
    async fn access_token(&self) -> Result<Option<SecretString>, Error>;

    /// Current refresh token, if signed in.
    async fn refresh_token(&self) -> Result<Option<SecretString>, Error>;

    /// Replace both entries with `pair`.
    async fn replace(&self, pair: CredentialPair) -> Result<(), Error>;

    /// Erase both entries.
    async fn clear(&self) -> Result<(), Error>;
}
