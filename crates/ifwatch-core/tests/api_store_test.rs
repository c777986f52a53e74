#![allow(clippy::unwrap_used)]
// End-to-end `Monitor` tests over `ApiStore`, backed by wiremock.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ifwatch_core::{
    ApiStore, CoreError, CounterFamily, EngineConfig, InterfaceId, InterfaceQuery, Monitor,
    SampleStore, StoreConfig, ThresholdLevel, TlsVerification,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

async fn setup() -> (MockServer, Monitor<ApiStore>) {
    let server = MockServer::start().await;
    let config = StoreConfig {
        url: Url::parse(&server.uri()).unwrap(),
        api_key: Some(SecretString::from("s3cret")),
        tls: TlsVerification::SystemDefaults,
        timeout: Duration::from_secs(5),
    };
    let store = ApiStore::connect(&config).unwrap();
    (server, Monitor::new(store, EngineConfig::default()))
}

fn interface_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "interface_name": format!("ge-0/0/{id}"),
        "description": "core uplink",
        "hostname": "edge-1",
        "ip_address": "192.0.2.1",
        "vendor": "juniper"
    })
}

async fn mount_ids(server: &MockServer, ids: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/v1/interfaces/ids"))
        .and(header("X-API-KEY", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ids))
        .mount(server)
        .await;
}

// ── Rankings ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_ranking_over_http() {
    let (server, monitor) = setup().await;
    mount_ids(&server, json!([1, 2])).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/samples/latest"))
        .and(body_json(json!({
            "interface_ids": [1, 2],
            "limit": 5,
            "since": "2024-06-12T12:00:00Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "interface_id": 1, "timestamp": "2024-06-15T11:50:00Z", "in_errors": 100, "out_errors": 50 },
            { "interface_id": 2, "timestamp": "2024-06-15T11:55:00Z", "in_errors": "9", "out_errors": "0" },
            { "interface_id": 1, "timestamp": "2024-06-15T11:55:00Z", "in_errors": 150, "out_errors": 70 },
            { "interface_id": 1, "timestamp": "2024-06-15T12:00:00Z", "in_errors": 140, "out_errors": 90 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/interfaces/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(interface_json(1)))
        .expect(1)
        .mount(&server)
        .await;

    let ranked = monitor.top_error_rates_as_of(None, now()).await.unwrap();

    // Interface 2 has a single sample and no history.
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].interface.name, "ge-0/0/1");
    assert_eq!(ranked[0].interface.vendor.as_deref(), Some("juniper"));
    assert!((ranked[0].metric.combined_rate - 70.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_utilization_ranking_drops_unknown_interfaces() {
    let (server, monitor) = setup().await;
    mount_ids(&server, json!([1, 2])).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/samples/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "interface_id": 1, "timestamp": "2024-06-15T11:55:00Z", "in_uti": 30.0, "out_uti": 5.0 },
            { "interface_id": 2, "timestamp": "2024-06-15T11:55:00Z", "in_uti": 80.0, "out_uti": 0.0 }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/interfaces/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(interface_json(1)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/interfaces/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let ranked = monitor.top_utilization_as_of(None, now()).await.unwrap();

    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].interface.id, InterfaceId::new(1).unwrap());
    assert!((ranked[0].metric.max_utilization - 30.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_batch_failure_fails_the_request() {
    let (server, monitor) = setup().await;
    mount_ids(&server, json!([1])).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/samples/latest"))
        .respond_with(ResponseTemplate::new(503).set_body_string("database offline"))
        .mount(&server)
        .await;

    let err = monitor.top_error_rates_as_of(None, now()).await.unwrap_err();
    match err {
        CoreError::StoreUnavailable {
            status, transient, ..
        } => {
            assert_eq!(status, Some(503));
            assert!(transient);
        }
        other => panic!("expected StoreUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_id_listing_is_store_failure() {
    let (server, monitor) = setup().await;
    mount_ids(&server, json!([1, -4])).await;

    let err = monitor.store().interface_ids().await.unwrap_err();
    assert!(err.is_store_unavailable());
}

// ── Series ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_series_over_http() {
    let (server, monitor) = setup().await;
    let start = Utc.with_ymd_and_hms(2024, 6, 15, 11, 0, 0).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v1/interfaces/4/samples"))
        .and(query_param("from", "2024-06-15T11:00:00.000Z"))
        .and(query_param("to", "2024-06-15T12:00:00.000Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "interface_id": 4, "timestamp": "2024-06-15T11:00:00Z", "in_octets": "0", "in_errors": 0 },
            { "interface_id": 4, "timestamp": "2024-06-15T11:01:00Z", "in_octets": "7500000", "in_errors": 6 }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/interfaces/4/readings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "interface_id": 4, "timestamp": "2024-06-15T11:00:30Z", "rx_power": -9.1 }
        ])))
        .mount(&server)
        .await;

    let series = monitor
        .series(InterfaceId::new(4).unwrap(), start, now())
        .await
        .unwrap();

    let points = series.points();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].gauges.rx_power, Some(-9.1));
    assert!((points[1].rate(CounterFamily::InOctets).unwrap() - 1.0).abs() < 1e-9);
    assert!((points[1].rate(CounterFamily::InErrors).unwrap() - 0.1).abs() < 1e-9);
    assert!(points[1].rate(CounterFamily::OutOctets).is_none());
}

#[tokio::test]
async fn test_series_fails_when_readings_fail() {
    let (server, monitor) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/interfaces/4/samples"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/interfaces/4/readings"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = monitor
        .series(InterfaceId::new(4).unwrap(), now(), now())
        .await
        .unwrap_err();
    assert!(err.is_store_unavailable());
}

// ── Inventory ───────────────────────────────────────────────────────

fn status_json(id: i64) -> serde_json::Value {
    json!({
        "interface_id": id,
        "sample": { "interface_id": id, "timestamp": "2024-06-15T11:55:00Z", "in_errors": "3" },
        "reading": { "interface_id": id, "timestamp": "2024-06-15T11:58:00Z", "rx_power": "-15.2" },
        "module": {
            "interface_id": id,
            "timestamp": "2024-06-14T00:00:00Z",
            "vendor_name": "FINISAR CORP",
            "vendor_part_number": "FTLX1471D3BCL",
            "serial_number": format!("SN{id}"),
            "rx_power_high": "2.0",
            "rx_power_low": "-14.4",
            "rx_power_low_warning": "-10.0"
        }
    })
}

#[tokio::test]
async fn test_search_interfaces_over_http() {
    let (server, monitor) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/interfaces"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([interface_json(1), interface_json(2)])),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/interfaces/status"))
        .and(body_json(json!({ "interface_ids": [1, 2] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            status_json(2),
            { "interface_id": 1 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = monitor
        .search_interfaces(&InterfaceQuery {
            search: Some("sn2".into()),
            ..InterfaceQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].interface.id.get(), 2);
    assert_eq!(
        rows[0].status.latest_sample.as_ref().unwrap().counters.in_errors,
        Some(3)
    );
}

#[tokio::test]
async fn test_interface_overview_over_http() {
    let (server, monitor) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/interfaces/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(interface_json(5)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/interfaces/status"))
        .and(body_json(json!({ "interface_ids": [5] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([status_json(5)])))
        .mount(&server)
        .await;

    let overview = monitor.interface(InterfaceId::new(5).unwrap()).await.unwrap();

    let module = overview.status.module.as_ref().unwrap();
    assert_eq!(module.vendor_name.as_deref(), Some("FINISAR CORP"));
    assert_eq!(module.thresholds.rx_power_low, Some(-14.4));
    assert_eq!(overview.status.rx_power_level(), Some(ThresholdLevel::Alarm));
}

#[tokio::test]
async fn test_unknown_interface_over_http_is_not_found() {
    let (server, monitor) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/interfaces/77"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = monitor
        .interface(InterfaceId::new(77).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}
