//! Notification of unrecoverable session failures.

use std::fmt;

use tracing::warn;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExpiry {
    /// A 401 arrived and there was no refresh token to exchange.
    RefreshTokenMissing,
    /// The refresh call failed or timed out.
    RefreshFailed,
}

impl fmt::Display for SessionExpiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionExpiry::RefreshTokenMissing => write!(f, "no refresh token stored"),
            SessionExpiry::RefreshFailed => write!(f, "token refresh failed"),
        }
    }
}

/// Receives the terminal "send the user back to login" signal.
///
/// Called exactly once per failed refresh, after credentials were cleared,
/// regardless of how many requests were waiting on that refresh.
#[cfg_attr(test, mockall::automock)]
pub trait SessionListener: Send + Sync {
    fn session_expired(&self, reason: SessionExpiry);
}

/// Default listener: tells the user where to sign in again.
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    login_path: String,
}

impl LoginRedirect {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }
}

impl Default for LoginRedirect {
    fn default() -> Self {
        Self::new("/login")
    }
}

impl SessionListener for LoginRedirect {
    fn session_expired(&self, reason: SessionExpiry) {
        warn!(
            "Session expired ({}); sign in again via {}",
            reason, self.login_path
        );
    }
}
