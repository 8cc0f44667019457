use crate::api::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::catalogs::{Catalog, CatalogLog, CatalogUpload};
use crate::error::Error;
use crate::{path, Gateway, Id};
use catalog_auth::http::{ApiRequest, FormPart};
use log::*;

const DEFAULT_UPLOAD_MIME: &str = "application/octet-stream";

/// Lifecycle commands accepted by `catalogs/{id}/{command}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Cancel,
    Reanalyze,
}

impl Command {
    fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Cancel => "cancel",
            Command::Reanalyze => "reanalyze",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub async fn find_all(
    gateway: &Gateway,
    pagination: &PaginationParams,
) -> Result<PaginatedResponse<Catalog>, Error> {
    let request = ApiRequest::get("catalogs").query(pagination)?;
    Ok(gateway.send_json(request).await?)
}

pub async fn find_by_id(gateway: &Gateway, id: Id) -> Result<Catalog, Error> {
    let request = ApiRequest::get(path(&["catalogs", &id.to_string()]));
    let response: ApiResponse<Catalog> = gateway.send_json(request).await?;
    Ok(response.data)
}

/// Uploads a supplier catalog file for analysis.
pub async fn upload(gateway: &Gateway, upload: CatalogUpload) -> Result<Catalog, Error> {
    info!(
        "Uploading catalog {} ({} bytes)",
        upload.file_name,
        upload.contents.len()
    );
    let request = ApiRequest::post("catalogs/upload").multipart(upload_form(upload)?);
    let response: ApiResponse<Catalog> = gateway.send_json(request).await?;
    Ok(response.data)
}

fn upload_form(upload: CatalogUpload) -> Result<Vec<FormPart>, Error> {
    let mut parts = vec![
        FormPart::File {
            name: "file".to_string(),
            file_name: upload.file_name,
            mime: upload
                .mime
                .unwrap_or_else(|| DEFAULT_UPLOAD_MIME.to_string()),
            bytes: upload.contents,
        },
        FormPart::Text {
            name: "tax_rate".to_string(),
            value: upload.tax_rate.to_string(),
        },
        FormPart::Text {
            name: "extra_costs".to_string(),
            value: upload.extra_costs.to_string(),
        },
    ];

    if !upload.ml_links.is_empty() {
        let links = serde_json::to_string(&upload.ml_links).map_err(|err| {
            warn!("Failed to encode marketplace links: {err:?}");
            Error::invalid("marketplace links could not be encoded")
        })?;
        parts.push(FormPart::Text {
            name: "ml_links".to_string(),
            value: links,
        });
    }

    Ok(parts)
}

/// Sends a lifecycle command to a catalog's analysis.
pub async fn run(gateway: &Gateway, id: Id, command: Command) -> Result<(), Error> {
    debug!("Sending {command} to catalog {id}");
    let request = ApiRequest::post(path(&["catalogs", &id.to_string(), command.as_str()]));
    gateway.send(request).await?;
    Ok(())
}

pub async fn start(gateway: &Gateway, id: Id) -> Result<(), Error> {
    run(gateway, id, Command::Start).await
}

pub async fn pause(gateway: &Gateway, id: Id) -> Result<(), Error> {
    run(gateway, id, Command::Pause).await
}

pub async fn resume(gateway: &Gateway, id: Id) -> Result<(), Error> {
    run(gateway, id, Command::Resume).await
}

pub async fn cancel(gateway: &Gateway, id: Id) -> Result<(), Error> {
    run(gateway, id, Command::Cancel).await
}

pub async fn reanalyze(gateway: &Gateway, id: Id) -> Result<(), Error> {
    run(gateway, id, Command::Reanalyze).await
}

pub async fn delete(gateway: &Gateway, id: Id) -> Result<(), Error> {
    let request = ApiRequest::delete(path(&["catalogs", &id.to_string()]));
    gateway.send(request).await?;
    Ok(())
}

pub async fn logs(gateway: &Gateway, id: Id) -> Result<Vec<CatalogLog>, Error> {
    let request = ApiRequest::get(path(&["catalogs", &id.to_string(), "logs"]));
    let response: ApiResponse<Vec<CatalogLog>> = gateway.send_json(request).await?;
    Ok(response.data)
}
