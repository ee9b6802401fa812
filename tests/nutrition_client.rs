//! `OpenFoodFactsClient` against an in-process fake of the search endpoint.

mod common;

use std::sync::Arc;

use common::fake_db::FakeNutritionDb;
use common::fixtures::{empty_body, product_body, resolver_with};
use labelscore::resolver::{NutritionSource, OpenFoodFactsClient, ProductSummary};
use labelscore::{ExternalSourceError, ResolutionSource};

#[tokio::test]
async fn test_search_sends_expected_query() {
    let db = FakeNutritionDb::always(200, product_body("b", &["en:e330"]));
    let server = db.spawn().await;
    let client = OpenFoodFactsClient::new(format!("{}/", server.base_url)).unwrap();

    let product = client.search("salt & vinegar crisps").await.unwrap();
    assert_eq!(
        product,
        Some(ProductSummary {
            nutrition_grade: Some("b".to_string()),
            additives_tags: vec!["en:e330".to_string()],
        })
    );

    let queries = db.queries();
    assert_eq!(queries.len(), 1);
    let query = &queries[0];
    assert_eq!(query["search_terms"], "salt & vinegar crisps");
    assert_eq!(query["json"], "1");
    assert_eq!(query["page_size"], "1");
    assert_eq!(query["fields"], "nutrition_grades,additives_tags");
}

#[tokio::test]
async fn test_search_without_products_is_none() {
    let db = FakeNutritionDb::always(200, empty_body());
    let server = db.spawn().await;
    let client = OpenFoodFactsClient::new(server.base_url.clone()).unwrap();

    assert_eq!(client.search("nothing").await.unwrap(), None);
}

#[tokio::test]
async fn test_search_missing_fields_default() {
    let db = FakeNutritionDb::always(200, r#"{"products": [{}]}"#);
    let server = db.spawn().await;
    let client = OpenFoodFactsClient::new(server.base_url.clone()).unwrap();

    assert_eq!(
        client.search("bare").await.unwrap(),
        Some(ProductSummary::default())
    );
}

#[tokio::test]
async fn test_search_reports_status_and_malformed_bodies() {
    let db = FakeNutritionDb::always(200, "<html>not json</html>").respond_next(503, "");
    let server = db.spawn().await;
    let client = OpenFoodFactsClient::new(server.base_url.clone()).unwrap();

    let first = client.search("x").await.unwrap_err();
    assert!(matches!(first, ExternalSourceError::Status { status: 503 }));
    assert!(first.is_retryable());

    let second = client.search("x").await.unwrap_err();
    assert!(matches!(second, ExternalSourceError::Malformed { .. }));
    assert!(!second.is_retryable());
}

#[tokio::test]
async fn test_resolver_retries_server_errors_over_http() {
    let db = FakeNutritionDb::always(200, product_body("a", &[]))
        .respond_next(503, "")
        .respond_next(429, "");
    let server = db.spawn().await;
    let client = OpenFoodFactsClient::new(server.base_url.clone()).unwrap();
    let resolver = resolver_with(Arc::new(client));

    let record = resolver.resolve("Plain Oat Drink").await.unwrap();
    assert_eq!(record.source(), ResolutionSource::External);
    assert_eq!(record.nutrition_score(), Some(90));
    assert_eq!(db.request_count(), 3);

    let again = resolver.resolve("plain oat drink").await.unwrap();
    assert_eq!(again.source(), ResolutionSource::Cache);
    assert_eq!(db.request_count(), 3);
}

#[tokio::test]
async fn test_resolver_does_not_retry_client_errors_over_http() {
    let db = FakeNutritionDb::always(404, "");
    let server = db.spawn().await;
    let client = OpenFoodFactsClient::new(server.base_url.clone()).unwrap();
    let resolver = resolver_with(Arc::new(client));

    let record = resolver.resolve("calcium propionate").await.unwrap();
    assert_eq!(record.source(), ResolutionSource::Heuristic);
    assert_eq!(db.request_count(), 1);
}

#[tokio::test]
async fn test_unreachable_database_falls_through() {
    // Nothing listens on port 9 of localhost in test environments.
    let client = OpenFoodFactsClient::new("http://127.0.0.1:9").unwrap();
    let resolver = resolver_with(Arc::new(client));

    let record = resolver.resolve("mystery syrup").await.unwrap();
    assert_eq!(record.source(), ResolutionSource::Heuristic);
}
