//! Error types for the `catalog-auth` crate.
//!
//! Follows the same pattern as domain::error with a root Error struct and error kind enums.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

/// Top-level error type for catalog-auth crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in catalog-auth.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    Session(SessionErrorKind),
    Http(HttpErrorKind),
    Credential(CredentialErrorKind),
    Config,
}

/// Terminal authentication failures surfaced by the gateway.
///
/// An expired access token on the first attempt is recovered inside the
/// gateway and never appears here.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionErrorKind {
    /// The backend answered 401 again after the request was retried with a
    /// refreshed token.
    StillUnauthorized,
    /// A 401 arrived but no refresh token was stored. Credentials were cleared.
    RefreshTokenMissing,
    /// The refresh call failed. Credentials were cleared.
    RefreshFailed,
}

/// Errors from HTTP client operations.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpErrorKind {
    BuilderFailed,
    RequestFailed,
    Network,
    Timeout,
    /// Non-success status other than a recoverable 401.
    Status(u16),
    Decode,
}

/// Errors from credential storage operations.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialErrorKind {
    Storage,
    EncryptionFailed,
    DecryptionFailed,
}

/// Error body returned by the backend on failed requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for ApiErrorBody {}

impl Error {
    pub fn new(error_kind: ErrorKind) -> Self {
        Error {
            source: None,
            error_kind,
        }
    }

    /// The kind of the error that actually caused this one.
    ///
    /// For `RefreshFailed` this is the kind of the shared refresh error, so a
    /// queued request can tell a refresh timeout from a rejected refresh token.
    pub fn underlying_kind(&self) -> &ErrorKind {
        if self.error_kind == ErrorKind::Session(SessionErrorKind::RefreshFailed) {
            if let Some(shared) = self
                .source
                .as_ref()
                .and_then(|source| source.downcast_ref::<Arc<Error>>())
            {
                return shared.underlying_kind();
            }
        }
        &self.error_kind
    }

    pub fn is_timeout(&self) -> bool {
        *self.underlying_kind() == ErrorKind::Http(HttpErrorKind::Timeout)
    }

    /// True for any failure that ended the session and cleared credentials.
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self.error_kind,
            ErrorKind::Session(SessionErrorKind::RefreshFailed)
                | ErrorKind::Session(SessionErrorKind::RefreshTokenMissing)
        )
    }

    /// HTTP status carried by a status error, if any.
    pub fn status(&self) -> Option<u16> {
        match self.underlying_kind() {
            ErrorKind::Http(HttpErrorKind::Status(code)) => Some(*code),
            _ => None,
        }
    }

    /// The backend's `message` field for failed requests, when it sent one.
    pub fn api_message(&self) -> Option<&str> {
        let mut current: Option<&(dyn StdError + 'static)> = self
            .source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static));
        while let Some(err) = current {
            if let Some(body) = err.downcast_ref::<ApiErrorBody>() {
                return Some(&body.message);
            }
            if let Some(shared) = err.downcast_ref::<Arc<Error>>() {
                return shared.api_message();
            }
            current = err.source();
        }
        None
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Session(kind) => write!(f, "Session error: {:?}", kind),
            ErrorKind::Http(HttpErrorKind::Status(code)) => match self.api_message() {
                Some(message) => write!(f, "HTTP error: status {}: {}", code, message),
                None => write!(f, "HTTP error: status {}", code),
            },
            ErrorKind::Http(kind) => write!(f, "HTTP error: {:?}", kind),
            ErrorKind::Credential(kind) => write!(f, "Credential error: {:?}", kind),
            ErrorKind::Config => write!(f, "Configuration error"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let error_kind = if err.is_timeout() {
            ErrorKind::Http(HttpErrorKind::Timeout)
        } else if err.is_builder() {
            ErrorKind::Http(HttpErrorKind::BuilderFailed)
        } else if err.is_decode() {
            ErrorKind::Http(HttpErrorKind::Decode)
        } else if err.is_request() {
            ErrorKind::Http(HttpErrorKind::RequestFailed)
        } else {
            ErrorKind::Http(HttpErrorKind::Network)
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<reqwest_middleware::Error> for Error {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(err) => err.into(),
            other => Error {
                source: Some(Box::new(other)),
                error_kind: ErrorKind::Http(HttpErrorKind::Network),
            },
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Credential(CredentialErrorKind::Storage),
        }
    }
}

/// Helper function to create session errors.
pub fn session_error(kind: SessionErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Session(kind),
    }
}

/// Helper function to create HTTP errors.
pub fn http_error(kind: HttpErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Http(kind),
    }
}

/// Helper function to create credential errors.
pub fn credential_error(kind: CredentialErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Credential(kind),
    }
}

/// Builds the error for a non-success response, keeping the backend's
/// `{message}` body as the source when it parses.
pub fn status_error(status: u16, body: &[u8]) -> Error {
    let source: Box<dyn StdError + Send + Sync> =
        match serde_json::from_slice::<ApiErrorBody>(body) {
            Ok(api_error) => Box::new(api_error),
            Err(_) => String::from_utf8_lossy(body).into_owned().into(),
        };
    Error {
        source: Some(source),
        error_kind: ErrorKind::Http(HttpErrorKind::Status(status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_keeps_api_message() {
        let err = status_error(422, br#"{"message":"tax_rate must be positive"}"#);
        assert_eq!(err.error_kind, ErrorKind::Http(HttpErrorKind::Status(422)));
        assert_eq!(err.api_message(), Some("tax_rate must be positive"));
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_status_error_without_json_body() {
        let err = status_error(502, b"Bad Gateway");
        assert_eq!(err.api_message(), None);
        assert_eq!(err.to_string(), "HTTP error: status 502");
    }

    #[test]
    fn test_refresh_failed_exposes_underlying_timeout() {
        let timeout = Arc::new(http_error(HttpErrorKind::Timeout, "refresh timed out"));
        let err = Error {
            source: Some(Box::new(timeout)),
            error_kind: ErrorKind::Session(SessionErrorKind::RefreshFailed),
        };

        assert!(err.is_timeout());
        assert!(err.is_session_expired());
        assert_eq!(
            err.underlying_kind(),
            &ErrorKind::Http(HttpErrorKind::Timeout)
        );
    }

    #[test]
    fn test_refresh_failed_exposes_shared_api_message() {
        let rejected = Arc::new(status_error(401, br#"{"message":"refresh token revoked"}"#));
        let err = Error {
            source: Some(Box::new(rejected)),
            error_kind: ErrorKind::Session(SessionErrorKind::RefreshFailed),
        };

        assert_eq!(err.api_message(), Some("refresh token revoked"));
        assert_eq!(err.status(), Some(401));
    }
}
