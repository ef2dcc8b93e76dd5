/// Pricing loader and service against a mocked PostgREST
mod common;

use common::*;
use miraidev::error::AppError;
use miraidev::pricing::{load_pricing_snapshot, PricingService, QuoteRequest};
use serde_json::json;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn test_loader_reads_all_six_tables() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_pricing_tables(&server).await;

    let snapshot = load_pricing_snapshot(&supabase_client(&server)).await?;

    assert_eq!(snapshot.project_types.len(), 2);
    assert_eq!(snapshot.page_prices.len(), 2);
    assert_eq!(snapshot.feature_prices.len(), 2);
    assert_eq!(snapshot.complexity_prices.len(), 2);
    assert_eq!(snapshot.timeline_prices.len(), 2);
    assert_eq!(snapshot.packages.len(), 1);
    assert_eq!(snapshot.packages[0].features.len(), 3);
    assert_eq!(snapshot.page_prices[0].id, "1");

    Ok(())
}

#[tokio::test]
async fn test_loader_sends_filters_and_credentials() -> anyhow::Result<()> {
    let server = MockServer::start().await;

    // Only a request with the expected filters gets a body
    Mock::given(method("GET"))
        .and(path("/rest/v1/page_prices"))
        .and(query_param("is_active", "eq.true"))
        .and(query_param("order", "page_count.asc"))
        .and(header("apikey", "service-role-test"))
        .and(header("Authorization", "Bearer service-role-test"))
        .and(header("Accept-Profile", "public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_prices()))
        .expect(1)
        .mount(&server)
        .await;
    mount_table(&server, "project_types", project_types()).await;
    mount_table(&server, "feature_prices", feature_prices()).await;
    mount_table(&server, "complexity_prices", complexity_prices()).await;
    mount_table(&server, "timeline_prices", timeline_prices()).await;
    mount_table(&server, "pricing_packages", pricing_packages()).await;

    let snapshot = load_pricing_snapshot(&supabase_client(&server)).await?;
    assert_eq!(snapshot.page_prices.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_loader_is_all_or_nothing() {
    let server = MockServer::start().await;
    mount_table(&server, "project_types", project_types()).await;
    mount_table(&server, "page_prices", page_prices()).await;
    mount_table_error(&server, "feature_prices", 404, "relation \"public.feature_prices\" does not exist").await;
    mount_table(&server, "complexity_prices", complexity_prices()).await;
    mount_table(&server, "timeline_prices", timeline_prices()).await;
    mount_table(&server, "pricing_packages", pricing_packages()).await;

    let err = load_pricing_snapshot(&supabase_client(&server))
        .await
        .unwrap_err();

    match &err {
        AppError::DataFetch { table, message } => {
            assert_eq!(table, "feature_prices");
            assert!(message.contains("does not exist"));
        }
        other => panic!("expected DataFetch, got {:?}", other),
    }
    assert!(err.to_string().starts_with("Failed to fetch feature_prices"));
}

#[tokio::test]
async fn test_malformed_rows_fail_the_load() {
    let server = MockServer::start().await;
    // base_price and name missing
    mount_table(&server, "project_types", json!([{"id": "x"}])).await;
    mount_table(&server, "page_prices", page_prices()).await;
    mount_table(&server, "feature_prices", feature_prices()).await;
    mount_table(&server, "complexity_prices", complexity_prices()).await;
    mount_table(&server, "timeline_prices", timeline_prices()).await;
    mount_table(&server, "pricing_packages", pricing_packages()).await;

    match load_pricing_snapshot(&supabase_client(&server)).await {
        Err(AppError::DataFetch { table, message }) => {
            assert_eq!(table, "project_types");
            assert!(message.contains("invalid response body"));
        }
        other => panic!("expected DataFetch, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_quote_scenario_through_service() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_pricing_tables(&server).await;

    let service = PricingService::new(supabase_client(&server));
    assert!(matches!(
        service.quote(&QuoteRequest::default()),
        Err(AppError::NotReady(_))
    ));

    service.load().await?;
    let breakdown = service.quote(&QuoteRequest {
        project_type_id: "company-profile".to_string(),
        page_count: 12,
        feature_ids: vec!["seo".to_string(), "blog".to_string()],
        complexity_id: Some("complex".to_string()),
        timeline_id: Some("fast".to_string()),
    })?;

    assert_eq!(breakdown.subtotal, 2_550_000.0);
    assert_eq!(breakdown.total, 3_366_000);
    assert!(breakdown.unresolved.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_snapshot() -> anyhow::Result<()> {
    let server = MockServer::start().await;

    // First read of project_types succeeds, every later one fails
    Mock::given(method("GET"))
        .and(path("/rest/v1/project_types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_types()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_table_error(&server, "project_types", 503, "upstream unavailable").await;
    mount_table(&server, "page_prices", page_prices()).await;
    mount_table(&server, "feature_prices", feature_prices()).await;
    mount_table(&server, "complexity_prices", complexity_prices()).await;
    mount_table(&server, "timeline_prices", timeline_prices()).await;
    mount_table(&server, "pricing_packages", pricing_packages()).await;

    let service = PricingService::new(supabase_client(&server));
    service.load().await?;

    let reload = service.load().await;
    assert!(matches!(reload, Err(AppError::DataFetch { .. })));

    assert!(service.is_loaded());
    let snapshot = service.snapshot()?;
    assert_eq!(snapshot.project_types.len(), 2);
    assert_eq!(service.package("starter")?.name, "Paket Starter");

    Ok(())
}
