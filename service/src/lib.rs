use catalog_auth::credentials::{Cipher, FileStore};
use catalog_auth::gateway::{LoginRedirect, RefreshCoordinator};
use catalog_auth::http::{HttpClientBuilder, ReqwestTransport};
use catalog_auth::{Error, Gateway};
use config::Config;
use log::info;
use std::sync::Arc;

pub mod config;
pub mod logging;

/// Builds the gateway every command talks to the backend through.
///
/// Tokens live in the file at `credentials_path`, encrypted when a key is
/// configured. All requests of the process share one refresh coordinator.
pub fn init_client(config: &Config) -> Result<AppState, Error> {
    info!(
        "API client config: base_url={}, request_timeout={}s, refresh_timeout={}s, credentials={}",
        config.api_base_url(),
        config.request_timeout_secs,
        config.refresh_timeout_secs,
        config.credentials_path().display(),
    );

    let mut client_builder = HttpClientBuilder::new().with_timeout(config.request_timeout());
    if let Some(user_agent) = config.user_agent() {
        client_builder = client_builder.with_user_agent(user_agent);
    }
    let transport = ReqwestTransport::new(client_builder.build()?, config.api_base_url())?;

    let store = match config.credentials_encryption_key() {
        Some(key) => FileStore::encrypted(config.credentials_path(), Cipher::from_hex(&key)?),
        None => FileStore::new(config.credentials_path()),
    };

    let gateway = Gateway::builder(Arc::new(transport), Arc::new(store))
        .coordinator(Arc::new(RefreshCoordinator::new()))
        .session_listener(Arc::new(LoginRedirect::default()))
        .refresh_timeout(config.refresh_timeout())
        .build();

    Ok(AppState::new(config.clone(), gateway))
}

// Process-wide state handed to every command
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub config: Config,
}

impl AppState {
    pub fn new(app_config: Config, gateway: Gateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            config: app_config,
        }
    }

    pub fn gateway_ref(&self) -> &Gateway {
        self.gateway.as_ref()
    }
}
