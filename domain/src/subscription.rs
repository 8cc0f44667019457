use crate::error::Error;
use crate::subscriptions::{
    CheckoutRequest, CheckoutSession, Plan, PlansResponse, Subscription, UsageStats,
};
use crate::Gateway;
use catalog_auth::http::ApiRequest;
use log::*;

/// Plans on offer.
pub async fn plans(gateway: &Gateway) -> Result<Vec<Plan>, Error> {
    let response: PlansResponse = gateway
        .send_json(ApiRequest::get("subscriptions/plans"))
        .await?;
    Ok(response.plans)
}

pub async fn current(gateway: &Gateway) -> Result<Subscription, Error> {
    Ok(gateway
        .send_json(ApiRequest::get("subscriptions/current"))
        .await?)
}

pub async fn usage(gateway: &Gateway) -> Result<UsageStats, Error> {
    Ok(gateway
        .send_json(ApiRequest::get("subscriptions/usage"))
        .await?)
}

/// Opens a hosted checkout for `request.plan_id`. Payment itself happens on
/// the page behind `checkout_url`.
pub async fn create_checkout(
    gateway: &Gateway,
    request: &CheckoutRequest,
) -> Result<CheckoutSession, Error> {
    info!("Creating checkout session for plan {}", request.plan_id);
    let request = ApiRequest::post("subscriptions/checkout").json(request)?;
    Ok(gateway.send_json(request).await?)
}

pub async fn cancel(gateway: &Gateway) -> Result<(), Error> {
    warn!("Cancelling subscription");
    gateway.send(ApiRequest::post("subscription/cancel")).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriptions::{Limit, SubscriptionPlan};
    use crate::test_support::signed_in_gateway;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_plans_reads_plans_field() {
        let mut server = Server::new_async().await;
        let gateway = signed_in_gateway(&server);

        let _mock = server
            .mock("GET", "/subscriptions/plans")
            .with_status(200)
            .with_body(
                serde_json::json!({"plans": [{
                    "id": "pro",
                    "name": "Pro",
                    "price": 99.0,
                    "currency": "BRL",
                    "catalogs_limit": "unlimited",
                    "products_limit": 5000,
                    "features": ["Unlimited catalogs"]
                }]})
                .to_string(),
            )
            .create_async()
            .await;

        let plans = plans(&gateway).await.unwrap();

        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].catalogs_limit, Limit::Unlimited);
        assert_eq!(plans[0].products_limit, Limit::Count(5000));
    }

    #[tokio::test]
    async fn test_usage() {
        let mut server = Server::new_async().await;
        let gateway = signed_in_gateway(&server);

        let _mock = server
            .mock("GET", "/subscriptions/usage")
            .with_status(200)
            .with_body(
                r#"{"plan":"pro","status":"active","catalogs_used":2,"catalogs_limit":10,"products_per_catalog_limit":"unlimited"}"#,
            )
            .create_async()
            .await;

        let usage = usage(&gateway).await.unwrap();

        assert_eq!(usage.plan, SubscriptionPlan::Pro);
        assert!(usage.can_upload_catalog());
    }

    #[tokio::test]
    async fn test_create_checkout() {
        let mut server = Server::new_async().await;
        let gateway = signed_in_gateway(&server);

        let _mock = server
            .mock("POST", "/subscriptions/checkout")
            .match_body(Matcher::Json(serde_json::json!({
                "plan_id": "pro",
                "success_url": "https://app.example.com/ok",
                "cancel_url": "https://app.example.com/cancel"
            })))
            .with_status(200)
            .with_body(r#"{"checkout_url":"https://pay.example.com/s/1","session_id":"cs_1"}"#)
            .create_async()
            .await;

        let session = create_checkout(
            &gateway,
            &CheckoutRequest {
                plan_id: "pro".to_string(),
                success_url: "https://app.example.com/ok".to_string(),
                cancel_url: "https://app.example.com/cancel".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(session.session_id, "cs_1");
    }

    #[tokio::test]
    async fn test_cancel_uses_singular_path() {
        let mut server = Server::new_async().await;
        let gateway = signed_in_gateway(&server);

        let mock = server
            .mock("POST", "/subscription/cancel")
            .with_status(200)
            .create_async()
            .await;

        cancel(&gateway).await.unwrap();
        mock.assert_async().await;
    }
}
