//! Transport seam between the gateway and the network.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{ApiRequest, ApiResponse, AuthenticatedClient, FormPart, RequestBody};
use crate::error::{Error, ErrorKind, HttpErrorKind};

/// Sends one request to the backend.
///
/// Returns `Ok` for every HTTP status, including 401; `Err` only when no
/// response was received (connect failure, timeout, body read failure).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<&SecretString>,
    ) -> Result<ApiResponse, Error>;
}

/// [`Transport`] over the middleware-wrapped reqwest client.
pub struct ReqwestTransport {
    client: AuthenticatedClient,
    base_url: Url,
}

impl ReqwestTransport {
    /// `base_url` is the API root, e.g. `http://localhost:8080/api/v1`.
    pub fn new(client: AuthenticatedClient, base_url: &str) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Config,
        })?;
        // Relative joins replace the last segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error {
                source: Some(Box::new(e)),
                error_kind: ErrorKind::Http(HttpErrorKind::BuilderFailed),
            })
    }
}

fn multipart_form(parts: &[FormPart]) -> Result<Form, Error> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File {
                name,
                file_name,
                mime,
                bytes,
            } => {
                let file = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime)?;
                form.part(name.clone(), file)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<&SecretString>,
    ) -> Result<ApiResponse, Error> {
        let url = self.endpoint(&request.path)?;
        let mut builder = self.client.request(request.method.clone(), url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in request.headers.iter() {
            if bearer.is_some() && name == AUTHORIZATION {
                continue;
            }
            builder = builder.header(name, value);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(parts) => builder.multipart(multipart_form(parts)?),
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpClientBuilder;
    use mockito::{Matcher, Server};
    use reqwest::StatusCode;

    fn transport(base_url: &str) -> ReqwestTransport {
        let client = HttpClientBuilder::new().build().unwrap();
        ReqwestTransport::new(client, base_url).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let transport = transport("http://localhost:8080/api/v1");
        let url = transport.endpoint("/catalogs/abc/start").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/catalogs/abc/start");
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let client = HttpClientBuilder::new().build().unwrap();
        let result = ReqwestTransport::new(client, "not a url");
        assert!(matches!(
            result,
            Err(Error {
                error_kind: ErrorKind::Config,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_execute_sends_bearer_query_and_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/products/bulk-favorite")
            .match_header("authorization", "Bearer t1")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .match_body(Matcher::Json(serde_json::json!({ "is_favorite": true })))
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let transport = transport(&format!("{}/api/v1", server.url()));
        let request = ApiRequest::post("products/bulk-favorite")
            .query(&serde_json::json!({ "page": 2 }))
            .unwrap()
            .json(&serde_json::json!({ "is_favorite": true }))
            .unwrap();
        let token = SecretString::from("t1".to_string());

        let response = transport.execute(&request, Some(&token)).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.text(), r#"{"ok":true}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_execute_returns_unauthorized_as_response() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/catalogs")
            .match_header("authorization", Matcher::Missing)
            .with_status(401)
            .create_async()
            .await;

        let transport = transport(&server.url());
        let response = transport
            .execute(&ApiRequest::get("catalogs"), None)
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_execute_connection_refused_is_network_error() {
        // Port 9 (discard) is not listening on test hosts.
        let transport = transport("http://127.0.0.1:9");
        let err = transport
            .execute(&ApiRequest::get("catalogs"), None)
            .await
            .unwrap_err();

        assert!(matches!(err.error_kind, ErrorKind::Http(_)));
    }
}
