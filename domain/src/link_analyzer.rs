use crate::api::ApiResponse;
use crate::error::Error;
use crate::link_analysis::{LinkAnalysisRequest, LinkAnalysisResult};
use crate::Gateway;
use catalog_auth::http::ApiRequest;
use log::*;

/// Prices a batch of marketplace links without uploading a catalog.
///
/// An empty batch is rejected here without contacting the backend.
pub async fn analyze(
    gateway: &Gateway,
    request: &LinkAnalysisRequest,
) -> Result<Vec<LinkAnalysisResult>, Error> {
    if request.links.iter().all(|link| link.trim().is_empty()) {
        warn!("Link analysis requested without any links");
        return Err(Error::invalid("at least one link is required"));
    }

    info!("Analyzing {} links", request.links.len());
    let request = ApiRequest::post("link-analyzer/analyze").json(request)?;
    let response: ApiResponse<Vec<LinkAnalysisResult>> = gateway.send_json(request).await?;
    Ok(response.data)
}
