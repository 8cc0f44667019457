use crate::api::ApiResponse;
use crate::error::Error;
use crate::products::ProductFilters;
use crate::reports::{DashboardStats, ReportStats};
use crate::Gateway;
use catalog_auth::http::ApiRequest;

pub async fn dashboard_stats(gateway: &Gateway) -> Result<DashboardStats, Error> {
    let response: ApiResponse<DashboardStats> =
        gateway.send_json(ApiRequest::get("dashboard/stats")).await?;
    Ok(response.data)
}

pub async fn report_stats(gateway: &Gateway, filters: &ProductFilters) -> Result<ReportStats, Error> {
    let request = ApiRequest::get("reports/stats").query(filters)?;
    let response: ApiResponse<ReportStats> = gateway.send_json(request).await?;
    Ok(response.data)
}

/// Downloads the full report for `filters` as a file.
pub async fn export(gateway: &Gateway, filters: &ProductFilters) -> Result<Vec<u8>, Error> {
    let request = ApiRequest::get("reports/export").query(filters)?;
    Ok(gateway.send(request).await?.into_bytes())
}
