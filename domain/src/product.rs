use crate::api::{ApiResponse, PaginationParams};
use crate::error::Error;
use crate::products::{Product, ProductFilters, ProductsResponse};
use crate::{path, Gateway, Id};
use catalog_auth::http::ApiRequest;
use log::*;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct FavoriteUpdate {
    is_favorite: bool,
}

#[derive(Debug, Serialize)]
struct BulkUpdate<'a> {
    product_ids: &'a [Id],
    #[serde(skip_serializing_if = "Option::is_none")]
    is_favorite: Option<bool>,
}

/// Lists products matching `filters`, one page at a time.
pub async fn find_by(
    gateway: &Gateway,
    filters: &ProductFilters,
    pagination: &PaginationParams,
) -> Result<ProductsResponse, Error> {
    let request = ApiRequest::get("products")
        .query(filters)?
        .query(pagination)?;
    Ok(gateway.send_json(request).await?)
}

pub async fn find_by_id(gateway: &Gateway, id: Id) -> Result<Product, Error> {
    let request = ApiRequest::get(path(&["products", &id.to_string()]));
    let response: ApiResponse<Product> = gateway.send_json(request).await?;
    Ok(response.data)
}

/// Marks or unmarks a product as favorite and returns the updated product.
pub async fn set_favorite(gateway: &Gateway, id: Id, is_favorite: bool) -> Result<Product, Error> {
    let request = ApiRequest::patch(path(&["products", &id.to_string(), "favorite"]))
        .json(&FavoriteUpdate { is_favorite })?;
    let response: ApiResponse<Product> = gateway.send_json(request).await?;
    Ok(response.data)
}

pub async fn delete(gateway: &Gateway, id: Id) -> Result<(), Error> {
    let request = ApiRequest::delete(path(&["products", &id.to_string()]));
    gateway.send(request).await?;
    Ok(())
}

pub async fn delete_many(gateway: &Gateway, ids: &[Id]) -> Result<(), Error> {
    debug!("Deleting {} products", ids.len());
    let request = ApiRequest::post("products/bulk-delete").json(&BulkUpdate {
        product_ids: ids,
        is_favorite: None,
    })?;
    gateway.send(request).await?;
    Ok(())
}

pub async fn set_favorite_many(gateway: &Gateway, ids: &[Id], is_favorite: bool) -> Result<(), Error> {
    debug!("Setting favorite={} on {} products", is_favorite, ids.len());
    let request = ApiRequest::post("products/bulk-favorite").json(&BulkUpdate {
        product_ids: ids,
        is_favorite: Some(is_favorite),
    })?;
    gateway.send(request).await?;
    Ok(())
}

/// Downloads the products matching `filters` as CSV.
pub async fn export(gateway: &Gateway, filters: &ProductFilters) -> Result<Vec<u8>, Error> {
    let request = ApiRequest::get("products/export").query(filters)?;
    Ok(gateway.send(request).await?.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::Recommendation;
    use crate::test_support::signed_in_gateway;
    use mockito::{Matcher, Server};

    const PRODUCT_ID: &str = "3c2b1a09-8f7e-4d6c-9b5a-4e3d2c1b0a99";

    fn product_json(is_favorite: bool) -> serde_json::Value {
        serde_json::json!({
            "id": PRODUCT_ID,
            "catalog_id": "0d7f5bb6-3b0e-4a55-9f5f-3f0c8e3a9a01",
            "sku": "MUG-01",
            "name": "Ceramic mug",
            "supplier_cost": 3.5,
            "status": "completed",
            "market_price": 12.9,
            "net_margin": 31.2,
            "recommendation": "buy",
            "competition_level": "medium",
            "is_favorite": is_favorite,
            "created_at": "2024-03-01T12:00:00Z"
        })
    }

    fn product_id() -> Id {
        PRODUCT_ID.parse().unwrap()
    }

    #[tokio::test]
    async fn test_find_by_merges_filters_and_pagination() {
        let mut server = Server::new_async().await;
        let gateway = signed_in_gateway(&server);

        let _mock = server
            .mock("GET", "/products")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("recommendation".into(), "buy".into()),
                Matcher::UrlEncoded("favorites_only".into(), "true".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "products": [product_json(true)],
                    "total": 1,
                    "page": 1,
                    "limit": 20
                })
                .to_string(),
            )
            .create_async()
            .await;

        let filters = ProductFilters {
            recommendation: Some(Recommendation::Buy),
            favorites_only: Some(true),
            ..Default::default()
        };
        let page = find_by(
            &gateway,
            &filters,
            &PaginationParams {
                page: Some(1),
                limit: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].recommendation, Some(Recommendation::Buy));
    }

    #[tokio::test]
    async fn test_set_favorite_patches_product() {
        let mut server = Server::new_async().await;
        let gateway = signed_in_gateway(&server);

        let _mock = server
            .mock("PATCH", format!("/products/{PRODUCT_ID}/favorite").as_str())
            .match_body(Matcher::Json(serde_json::json!({"is_favorite": true})))
            .with_status(200)
            .with_body(serde_json::json!({"data": product_json(true)}).to_string())
            .create_async()
            .await;

        let product = set_favorite(&gateway, product_id(), true).await.unwrap();
        assert!(product.is_favorite);
    }

    #[tokio::test]
    async fn test_bulk_operations_send_ids() {
        let mut server = Server::new_async().await;
        let gateway = signed_in_gateway(&server);

        let delete_mock = server
            .mock("POST", "/products/bulk-delete")
            .match_body(Matcher::Json(serde_json::json!({"product_ids": [PRODUCT_ID]})))
            .with_status(204)
            .create_async()
            .await;
        let favorite_mock = server
            .mock("POST", "/products/bulk-favorite")
            .match_body(Matcher::Json(serde_json::json!({
                "product_ids": [PRODUCT_ID],
                "is_favorite": false
            })))
            .with_status(204)
            .create_async()
            .await;

        delete_many(&gateway, &[product_id()]).await.unwrap();
        set_favorite_many(&gateway, &[product_id()], false)
            .await
            .unwrap();

        delete_mock.assert_async().await;
        favorite_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_export_returns_raw_bytes() {
        let mut server = Server::new_async().await;
        let gateway = signed_in_gateway(&server);

        let _mock = server
            .mock("GET", "/products/export")
            .match_query(Matcher::UrlEncoded("search".into(), "mug".into()))
            .with_status(200)
            .with_header("content-type", "text/csv")
            .with_body("sku,name\nMUG-01,Ceramic mug\n")
            .create_async()
            .await;

        let filters = ProductFilters {
            search: Some("mug".to_string()),
            ..Default::default()
        };
        let csv = export(&gateway, &filters).await.unwrap();

        assert_eq!(csv, b"sku,name\nMUG-01,Ceramic mug\n");
    }

    #[tokio::test]
    async fn test_delete_product() {
        let mut server = Server::new_async().await;
        let gateway = signed_in_gateway(&server);

        let mock = server
            .mock("DELETE", format!("/products/{PRODUCT_ID}").as_str())
            .with_status(204)
            .create_async()
            .await;

        delete(&gateway, product_id()).await.unwrap();
        mock.assert_async().await;
    }
}
