use crate::error::Error;
use crate::users::{AuthResponse, LoginCredentials, RegisterData, User};
use crate::Gateway;
use catalog_auth::credentials::CredentialPair;
use catalog_auth::http::ApiRequest;
use log::*;
use secrecy::SecretString;

/// Signs in with email and password and stores the returned token pair.
pub async fn login(gateway: &Gateway, credentials: &LoginCredentials) -> Result<User, Error> {
    debug!("Logging in as {}", credentials.email);
    let request = ApiRequest::post("auth/login").json(credentials)?;
    authenticate(gateway, request).await
}

/// Creates an account and signs in with it.
pub async fn register(gateway: &Gateway, data: &RegisterData) -> Result<User, Error> {
    debug!("Registering {}", data.email);
    let request = ApiRequest::post("auth/register").json(data)?;
    authenticate(gateway, request).await
}

async fn authenticate(gateway: &Gateway, request: ApiRequest) -> Result<User, Error> {
    let response: AuthResponse = gateway.send_anonymous(request).await?.json()?;

    gateway
        .sign_in(CredentialPair::new(
            SecretString::from(response.access_token),
            SecretString::from(response.refresh_token),
        ))
        .await?;

    info!("Signed in as {}", response.user.email);
    Ok(response.user)
}

/// Forgets the stored credentials. The backend keeps no session to end.
pub async fn logout(gateway: &Gateway) -> Result<(), Error> {
    Ok(gateway.sign_out().await?)
}

pub async fn current_user(gateway: &Gateway) -> Result<User, Error> {
    Ok(gateway.send_json(ApiRequest::get("users/me")).await?)
}

/// Whether an access token is stored. Says nothing about whether it is still valid.
pub async fn is_authenticated(gateway: &Gateway) -> Result<bool, Error> {
    Ok(gateway.is_signed_in().await?)
}
