//! Error types for the `domain` layer.
use catalog_auth::error::{
    Error as CatalogAuthError, ErrorKind as CatalogAuthErrorKind, HttpErrorKind,
};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field holds the original error that caused
/// the domain error, so callers can still reach the backend's message through it.
/// `service` and the command line front end depend on `domain` only and never match on
/// `catalog_auth` error kinds directly.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    /// Input rejected before any request was made.
    Invalid(String),
    /// Reading or writing stored credentials failed.
    Credential,
    Config,
    Other(String),
}

/// Enum representing the various kinds of errors reported by, or on the way to, the backend.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    /// The session is gone; the user has to sign in again.
    Unauthenticated,
    /// The backend answered with a non-success status.
    Status(u16),
    Network,
    Other(String),
}

impl Error {
    pub(crate) fn invalid(message: &str) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Invalid(message.to_string())),
        }
    }

    /// The backend's explanation of a failed request, when it sent one.
    pub fn api_message(&self) -> Option<&str> {
        self.source
            .as_ref()
            .and_then(|source| source.downcast_ref::<CatalogAuthError>())
            .and_then(|err| err.api_message())
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.error_kind == DomainErrorKind::External(ExternalErrorKind::Unauthenticated)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.error_kind, self.api_message()) {
            (DomainErrorKind::External(ExternalErrorKind::Unauthenticated), _) => {
                write!(f, "Not signed in or session expired, please log in again")
            }
            (DomainErrorKind::External(ExternalErrorKind::Status(code)), Some(message)) => {
                write!(f, "Request failed with status {code}: {message}")
            }
            (DomainErrorKind::Internal(InternalErrorKind::Invalid(message)), _) => {
                write!(f, "Invalid input: {message}")
            }
            _ => write!(f, "Domain Error: {self:?}"),
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

// This is where we translate errors from the `catalog_auth` layer to the `domain` layer.
impl From<CatalogAuthError> for Error {
    fn from(err: CatalogAuthError) -> Self {
        let error_kind = match &err.error_kind {
            CatalogAuthErrorKind::Session(_) => {
                DomainErrorKind::External(ExternalErrorKind::Unauthenticated)
            }
            CatalogAuthErrorKind::Http(HttpErrorKind::Status(code)) => {
                DomainErrorKind::External(ExternalErrorKind::Status(*code))
            }
            CatalogAuthErrorKind::Http(
                HttpErrorKind::Network | HttpErrorKind::Timeout | HttpErrorKind::RequestFailed,
            ) => DomainErrorKind::External(ExternalErrorKind::Network),
            CatalogAuthErrorKind::Http(HttpErrorKind::Decode) => DomainErrorKind::External(
                ExternalErrorKind::Other("Unexpected response body".to_string()),
            ),
            CatalogAuthErrorKind::Http(HttpErrorKind::BuilderFailed) => DomainErrorKind::Internal(
                InternalErrorKind::Other("Failed to build request".to_string()),
            ),
            CatalogAuthErrorKind::Credential(_) => {
                DomainErrorKind::Internal(InternalErrorKind::Credential)
            }
            CatalogAuthErrorKind::Config => DomainErrorKind::Internal(InternalErrorKind::Config),
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}
