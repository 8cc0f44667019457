//! Access/refresh credential types.

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::SecretString;
use serde::Deserialize;

/// Token type assumed when the backend does not send one.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Access token lifetime assumed when the backend does not send one.
pub const DEFAULT_EXPIRES_IN_SECONDS: i64 = 900;

/// The access/refresh pair for one signed-in user.
///
/// Replaced as a whole on login, registration and refresh; never stored
/// partially.
#[derive(Debug, Clone)]
pub struct CredentialPair {
    /// Short-lived token attached to every API request.
    pub access_token: SecretString,
    /// Longer-lived token exchanged for a new pair on expiry.
    pub refresh_token: SecretString,
    /// Token type (usually "Bearer").
    pub token_type: String,
    /// Lifetime of the access token at issue time.
    pub expires_in_seconds: i64,
    /// When this pair was received.
    pub issued_at: DateTime<Utc>,
}

impl CredentialPair {
    pub fn new(access_token: SecretString, refresh_token: SecretString) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: DEFAULT_TOKEN_TYPE.to_string(),
            expires_in_seconds: DEFAULT_EXPIRES_IN_SECONDS,
            issued_at: Utc::now(),
        }
    }

    /// When the access token is expected to expire.
    ///
    /// Lifetimes past the representable range saturate at the end of time
    /// (or its start, for negative ones).
    pub fn expires_at(&self) -> DateTime<Utc> {
        TimeDelta::try_seconds(self.expires_in_seconds)
            .and_then(|lifetime| self.issued_at.checked_add_signed(lifetime))
            .unwrap_or(if self.expires_in_seconds < 0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            })
    }
}

/// Token half of the backend's login, registration and refresh responses.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl From<TokenResponse> for CredentialPair {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            token_type: response
                .token_type
                .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string()),
            expires_in_seconds: response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECONDS),
            issued_at: Utc::now(),
        }
    }
}
