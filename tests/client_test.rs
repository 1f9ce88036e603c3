//! sonnenBatterie client tests
//!
//! Exercises the REST client against a mock appliance.

mod common;

use common::{client_for, mock_endpoint, mock_failure, TEST_TOKEN};
use mockito::{Matcher, Server};
use serde_json::json;
use sonnenbatterie_exporter::config::SonnenConfig;
use sonnenbatterie_exporter::error::ExporterError;
use sonnenbatterie_exporter::sonnen::client::USER_AGENT;
use sonnenbatterie_exporter::sonnen::SonnenClient;
use std::time::Duration;

#[tokio::test]
async fn test_get_status_sends_expected_headers() {
    // Given: A mock appliance that only answers requests with the right headers
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/status")
        .match_header("accept", "application/json")
        .match_header("user-agent", USER_AGENT)
        .match_header("auth-token", TEST_TOKEN)
        .with_status(200)
        .with_body(common::status_json().to_string())
        .create_async()
        .await;

    // When: Fetching the status with a token configured
    let client = client_for(&server, Some(TEST_TOKEN));
    let status = client.get_status().await.expect("Failed to get status");

    // Then: The request matched and the body was decoded
    assert_eq!(status.rsoc, 62);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_client_from_config_sends_single_user_agent() {
    // Given: An appliance that echoes how many user agent headers it received
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v2/status")
        .with_status(200)
        .with_body_from_request(|request| {
            let agents = request.header("user-agent");
            let first = agents
                .first()
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            json!({"RSOC": agents.len(), "OperatingMode": first})
                .to_string()
                .into_bytes()
        })
        .create_async()
        .await;

    // When: Fetching the status through a client built from config
    let config = SonnenConfig {
        url: server.url(),
        ..Default::default()
    };
    let client = SonnenClient::new(&config).expect("Failed to create client");
    let status = client.get_status().await.expect("Failed to get status");

    // Then: Exactly one user agent header carrying the exporter's name
    assert_eq!(status.rsoc, 1);
    assert_eq!(status.operating_mode, USER_AGENT);
}

#[tokio::test]
async fn test_get_status_without_token_omits_auth_header() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/status")
        .match_header("auth-token", Matcher::Missing)
        .with_status(200)
        .with_body(common::status_json().to_string())
        .create_async()
        .await;

    let client = client_for(&server, None);
    assert!(!client.supports_authenticated_endpoints());
    assert!(client.get_status().await.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_200_status_is_error_with_status_text() {
    // Given: An appliance that rejects the request
    let mut server = Server::new_async().await;
    let _mock = mock_failure(&mut server, "status", 401).await;

    // When: Fetching the status
    let client = client_for(&server, None);
    let err = client.get_status().await.unwrap_err();

    // Then: The error carries the HTTP status text
    assert!(matches!(err, ExporterError::UnexpectedStatus(_)));
    assert_eq!(err.to_string(), "unexpected http status: 401 Unauthorized");
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v2/battery")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let client = client_for(&server, Some(TEST_TOKEN));
    let err = client.get_battery_module_data().await.unwrap_err();

    match err {
        ExporterError::Decode { endpoint, .. } => assert_eq!(endpoint, "battery"),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_power_meters_assigned_by_direction() {
    // Given: The consumption meter listed before the production meter
    let mut server = Server::new_async().await;
    let body = json!([
        common::power_meter_json("consumption", 200.0),
        common::power_meter_json("production", 100.0)
    ]);
    let _mock = mock_endpoint(&mut server, "powermeter", &body).await;

    // When: Fetching the power meters
    let client = client_for(&server, Some(TEST_TOKEN));
    let meters = client.get_power_meters().await.expect("Failed to get meters");

    // Then: Each meter lands in its own slot regardless of order
    assert_eq!(meters.production.direction, "production");
    assert_eq!(meters.production.w_l1, 101.0);
    assert_eq!(meters.consumption.direction, "consumption");
    assert_eq!(meters.consumption.w_l1, 201.0);
}

#[tokio::test]
async fn test_missing_consumption_meter() {
    let mut server = Server::new_async().await;
    let body = json!([common::power_meter_json("production", 100.0)]);
    let _mock = mock_endpoint(&mut server, "powermeter", &body).await;

    let client = client_for(&server, Some(TEST_TOKEN));
    let err = client.get_power_meters().await.unwrap_err();

    assert!(matches!(err, ExporterError::MissingConsumptionMeter));
}

#[tokio::test]
async fn test_missing_production_meter() {
    let mut server = Server::new_async().await;
    let body = json!([
        common::power_meter_json("consumption", 200.0),
        common::power_meter_json("grid", 300.0)
    ]);
    let _mock = mock_endpoint(&mut server, "powermeter", &body).await;

    let client = client_for(&server, Some(TEST_TOKEN));
    let err = client.get_power_meters().await.unwrap_err();

    assert!(matches!(err, ExporterError::MissingProductionMeter));
}

#[tokio::test]
async fn test_get_latest_data() {
    let mut server = Server::new_async().await;
    let _mock = mock_endpoint(&mut server, "latestdata", &common::latest_data_json(7200)).await;

    let client = client_for(&server, Some(TEST_TOKEN));
    let data = client.get_latest_data().await.expect("Failed to get latest data");

    assert_eq!(data.full_charge_capacity, 10171);
    assert_eq!(data.ic_status.seconds_since_full_charge, 7200);
}

#[tokio::test]
async fn test_connection_refused_is_http_error() {
    // Given: A port nothing is listening on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    drop(listener);

    let client = SonnenClient::with_http_client(
        &format!("http://{addr}"),
        None,
        Duration::from_secs(5),
        reqwest::Client::new(),
    )
    .expect("Failed to create client");

    // When / Then: The transport error surfaces as an HTTP error
    let err = client.get_status().await.unwrap_err();
    assert!(matches!(err, ExporterError::Http(_)));
}
