//! Integration tests for `SupabaseClient` using wiremock HTTP mocks.

use foodlink_core::RetailCategory;
use foodlink_supabase::{SupabaseClient, SupabaseError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> SupabaseClient {
    SupabaseClient::with_base_url(base_url, "anon-key", "find_food", 30, "foodlink-test")
        .expect("client construction should not fail")
}

fn mock_table() -> MockBuilder {
    Mock::given(method("GET"))
        .and(path("/rest/v1/find_food"))
        .and(query_param("select", "*"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
}

#[tokio::test]
async fn fetch_stores_parses_rows() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "id": 1,
            "Store_Name": "Mountain Grocery",
            "Address": "12 High St",
            "City": "Morgantown",
            "State": "WV",
            "County": "Monongalia",
            "Latitude": "39.63",
            "Longitude": -79.95,
            "Retail Category": "Grocery Store",
            "Fresh Produce": "Yes",
            "SNAP": "Yes",
            "WIC": "No",
            "Ownership": "Independent",
            "New Ownership Since 2019": "No",
            "New Location Since 2019": "No",
            "2020 SNAP Redemption Estimate": "$1,250.50"
        },
        {
            "id": 2,
            "Store_Name": "Saturday Market",
            "Latitude": "N/A",
            "Longitude": "N/A",
            "Retail Category": "Farmers Market",
            "SNAP": "No"
        }
    ]);

    mock_table()
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let dataset = client.fetch_stores().await.expect("should parse stores");

    assert_eq!(dataset.len(), 2);
    let grocery = dataset.get(1).expect("store 1");
    assert_eq!(grocery.name, "Mountain Grocery");
    assert_eq!(grocery.category, RetailCategory::Grocery);
    assert!(grocery.snap);
    assert!(grocery.fresh_produce);
    assert!(grocery.coordinate().is_some());
    assert_eq!(grocery.snap_redemption_estimate.to_string(), "1250.50");

    let market = dataset.get(2).expect("store 2");
    assert_eq!(market.category, RetailCategory::FarmersMarket);
    assert!(market.coordinate().is_none());
}

#[tokio::test]
async fn duplicate_ids_keep_first_row() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        { "id": 7, "Store_Name": "First" },
        { "id": 7, "Store_Name": "Second" }
    ]);

    mock_table()
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let dataset = test_client(&server.uri())
        .fetch_stores()
        .await
        .expect("should parse stores");

    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.get(7).map(|s| s.name.as_str()), Some("First"));
}

#[tokio::test]
async fn rows_without_id_are_skipped() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        { "Store_Name": "No Id" },
        { "id": 3, "Store_Name": "Has Id" }
    ]);

    mock_table()
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let dataset = test_client(&server.uri())
        .fetch_stores()
        .await
        .expect("should parse stores");

    assert_eq!(dataset.len(), 1);
    assert!(dataset.get(3).is_some());
}

#[tokio::test]
async fn non_success_status_is_reported_without_retry() {
    let server = MockServer::start().await;

    mock_table()
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_stores()
        .await
        .expect_err("401 should fail");

    assert!(
        matches!(err, SupabaseError::UnexpectedStatus { status: 401, .. }),
        "expected UnexpectedStatus(401), got: {err:?}"
    );
}

#[tokio::test]
async fn non_array_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    mock_table()
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "message": "relation does not exist" })),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_stores()
        .await
        .expect_err("object body should fail");

    assert!(
        matches!(err, SupabaseError::Deserialize { .. }),
        "expected Deserialize, got: {err:?}"
    );
}

#[tokio::test]
async fn empty_table_gives_empty_dataset() {
    let server = MockServer::start().await;

    mock_table()
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let dataset = test_client(&server.uri())
        .fetch_stores()
        .await
        .expect("empty array is valid");

    assert!(dataset.is_empty());
}
