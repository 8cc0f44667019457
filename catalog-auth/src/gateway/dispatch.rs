//! Authenticated request gateway with transparent token refresh.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{LoginRedirect, RefreshCoordinator, SessionExpiry, SessionListener};
use crate::credentials::{CredentialPair, Store, TokenResponse};
use crate::error::{
    http_error, session_error, status_error, Error, ErrorKind, HttpErrorKind, SessionErrorKind,
};
use crate::http::{ApiRequest, ApiResponse, Transport};

/// Gateway settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Refresh endpoint, relative to the API base URL.
    pub refresh_path: String,
    /// Upper bound on one refresh call. Queued requests wait at most this long.
    pub refresh_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            refresh_path: "auth/refresh".to_string(),
            refresh_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// One logical request: the caller's descriptor plus whether it has already
/// been resent after a refresh.
#[derive(Debug)]
struct Attempt {
    request: ApiRequest,
    retried: bool,
}

struct Inner {
    transport: Arc<dyn Transport>,
    store: Arc<dyn Store>,
    coordinator: Arc<RefreshCoordinator>,
    listener: Arc<dyn SessionListener>,
    config: GatewayConfig,
}

/// Sends backend requests with the current access token attached.
///
/// A 401 on the first attempt of a request triggers one coordinated refresh:
/// the first caller to hit it starts the refresh, everyone else who hits a 401
/// meanwhile waits for the same result, and all of them are resent with the
/// new token in the order they arrived. A second 401 for the same request is
/// returned to the caller. When the refresh cannot succeed the stored
/// credentials are cleared and the [`SessionListener`] is told once.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<Inner>,
}

/// Builder for [`Gateway`].
pub struct GatewayBuilder {
    transport: Arc<dyn Transport>,
    store: Arc<dyn Store>,
    coordinator: Option<Arc<RefreshCoordinator>>,
    listener: Option<Arc<dyn SessionListener>>,
    config: GatewayConfig,
}

impl GatewayBuilder {
    /// Share a coordinator with other gateways over the same store.
    pub fn coordinator(mut self, coordinator: Arc<RefreshCoordinator>) -> Self {
        self.coordinator = Some(coordinator);
        self
    }

    pub fn session_listener(mut self, listener: Arc<dyn SessionListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn refresh_timeout(mut self, timeout: Duration) -> Self {
        self.config.refresh_timeout = timeout;
        self
    }

    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.config.refresh_path = path.into();
        self
    }

    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Gateway {
        Gateway {
            inner: Arc::new(Inner {
                transport: self.transport,
                store: self.store,
                coordinator: self
                    .coordinator
                    .unwrap_or_else(|| Arc::new(RefreshCoordinator::new())),
                listener: self
                    .listener
                    .unwrap_or_else(|| Arc::new(LoginRedirect::default())),
                config: self.config,
            }),
        }
    }
}

impl Gateway {
    pub fn builder(transport: Arc<dyn Transport>, store: Arc<dyn Store>) -> GatewayBuilder {
        GatewayBuilder {
            transport,
            store,
            coordinator: None,
            listener: None,
            config: GatewayConfig::default(),
        }
    }

    /// Gateway with its own coordinator and the default login redirect.
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn Store>) -> Self {
        Self::builder(transport, store).build()
    }

    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.inner.coordinator
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// Sends `request`, recovering once from an expired access token.
    ///
    /// Successful responses come back unchanged. Other failure statuses become
    /// `HttpErrorKind::Status` errors and transport failures are returned as
    /// they are; neither is retried.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        let mut attempt = Attempt {
            request,
            retried: false,
        };
        let mut bearer = self.inner.store.access_token().await?;

        loop {
            let response = self
                .inner
                .transport
                .execute(&attempt.request, bearer.as_ref())
                .await?;

            if response.status != StatusCode::UNAUTHORIZED {
                return into_result(response);
            }

            if attempt.retried {
                warn!(
                    "{} {} rejected again after token refresh",
                    attempt.request.method, attempt.request.path
                );
                return Err(Error {
                    source: Some(Box::new(status_error(401, &response.body))),
                    error_kind: ErrorKind::Session(SessionErrorKind::StillUnauthorized),
                });
            }

            debug!(
                "{} {} unauthorized, waiting for token refresh",
                attempt.request.method, attempt.request.path
            );
            attempt.retried = true;
            bearer = Some(self.recover(bearer.as_ref()).await?);
        }
    }

    /// Sends `request` and decodes a JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, Error> {
        self.send(request).await?.json()
    }

    /// Sends a request outside the refresh protocol, without credentials.
    ///
    /// Used for the sign-in endpoints, whose 401 means bad credentials rather
    /// than an expired token.
    pub async fn send_anonymous(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        let response = self.inner.transport.execute(&request, None).await?;
        into_result(response)
    }

    /// Replaces the stored credentials after a login or registration.
    pub async fn sign_in(&self, pair: CredentialPair) -> Result<(), Error> {
        self.inner.store.replace(pair).await?;
        info!("Signed in");
        Ok(())
    }

    /// Erases the stored credentials.
    pub async fn sign_out(&self) -> Result<(), Error> {
        self.inner.store.clear().await?;
        info!("Signed out");
        Ok(())
    }

    pub async fn is_signed_in(&self) -> Result<bool, Error> {
        Ok(self.inner.store.access_token().await?.is_some())
    }

    /// Waits for a usable access token after `rejected` drew a 401.
    ///
    /// Joins the coordinator; the leader spawns the refresh so it runs to
    /// completion, and drains the queue, even if the leading caller is
    /// dropped. The refresh itself runs in a nested task so a panic in it
    /// still settles the queue as a failed refresh.
    pub(crate) async fn recover(
        &self,
        rejected: Option<&SecretString>,
    ) -> Result<SecretString, Error> {
        let ticket = self.inner.coordinator.join().await;

        if ticket.is_leader() {
            let inner = Arc::clone(&self.inner);
            let rejected = rejected.cloned();
            tokio::spawn(async move {
                let refresh = tokio::spawn({
                    let inner = Arc::clone(&inner);
                    async move { inner.refresh(rejected.as_ref()).await }
                });
                let result = match refresh.await {
                    Ok(result) => result,
                    Err(join_err) => Err(session_error(
                        SessionErrorKind::RefreshFailed,
                        &format!("Token refresh task failed: {join_err}"),
                    )),
                };
                inner.finish_refresh(result).await;
            });
        }

        ticket.outcome().await.map_err(waiter_error)
    }
}

impl Inner {
    async fn finish_refresh(&self, result: Result<SecretString, Error>) {
        let outcome = match result {
            Ok(token) => Ok(token),
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                let reason = match e.error_kind {
                    ErrorKind::Session(SessionErrorKind::RefreshTokenMissing) => {
                        SessionExpiry::RefreshTokenMissing
                    }
                    _ => SessionExpiry::RefreshFailed,
                };
                if let Err(clear_err) = self.store.clear().await {
                    warn!("Failed to clear credentials: {}", clear_err);
                }
                self.listener.session_expired(reason);
                Err(Arc::new(e))
            }
        };

        let woken = self.coordinator.settle(outcome).await;
        debug!("Token refresh settled for {} waiting request(s)", woken);
    }

    async fn refresh(&self, rejected: Option<&SecretString>) -> Result<SecretString, Error> {
        // The request may have been sent before another caller's refresh
        // stored a new token.
        if let Some(current) = self.store.access_token().await? {
            let superseded = match rejected {
                Some(rejected) => rejected.expose_secret() != current.expose_secret(),
                None => true,
            };
            if superseded {
                debug!("Access token already replaced, skipping refresh");
                return Ok(current);
            }
        }

        let refresh_token = self.store.refresh_token().await?.ok_or_else(|| {
            session_error(
                SessionErrorKind::RefreshTokenMissing,
                "No refresh token stored",
            )
        })?;

        let request = ApiRequest::post(self.config.refresh_path.as_str()).json(&RefreshRequest {
            refresh_token: refresh_token.expose_secret(),
        })?;

        let response = tokio::time::timeout(
            self.config.refresh_timeout,
            self.transport.execute(&request, None),
        )
        .await
        .map_err(|_| {
            http_error(
                HttpErrorKind::Timeout,
                &format!(
                    "Token refresh timed out after {:?}",
                    self.config.refresh_timeout
                ),
            )
        })??;

        let response = into_result(response)?;
        let pair = CredentialPair::from(response.json::<TokenResponse>()?);
        let access_token = pair.access_token.clone();
        let expires_at = pair.expires_at();

        self.store.replace(pair).await?;
        info!("Access token refreshed, valid until {}", expires_at);

        Ok(access_token)
    }
}

fn into_result(response: ApiResponse) -> Result<ApiResponse, Error> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(status_error(response.status.as_u16(), &response.body))
    }
}

/// Error handed to each caller that waited on a failed refresh.
fn waiter_error(shared: Arc<Error>) -> Error {
    let error_kind = match shared.error_kind {
        ErrorKind::Session(SessionErrorKind::RefreshTokenMissing) => {
            ErrorKind::Session(SessionErrorKind::RefreshTokenMissing)
        }
        _ => ErrorKind::Session(SessionErrorKind::RefreshFailed),
    };
    Error {
        source: Some(Box::new(shared)),
        error_kind,
    }
}
