#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use climadesk_api::{
    ApiClient, CheckInRequest, CheckOutRequest, Error, ErrorKind, FanSpeed, Occupancy,
    PowerState, RoomNumber, TemperatureBounds, TimeRange, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url).unwrap();
    (server, client)
}

fn room(n: &str) -> RoomNumber {
    RoomNumber::new(n).unwrap()
}

fn ac_state(power: &str, speed: &str, target: f64) -> serde_json::Value {
    json!({ "roomId": "203", "power": power, "fanSpeed": speed, "targetTemperature": target })
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "account": "front_desk", "password": "pw123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account": "front_desk",
            "role": "reception",
            "token": "tok-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let secret: SecretString = "pw123".to_string().into();
    let session = client.login("front_desk", &secret).await.unwrap();

    assert_eq!(session.account, "front_desk");
    assert_eq!(session.role.as_deref(), Some("reception"));
    assert!(session.token().is_some());
}

#[tokio::test]
async fn test_login_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "账号或密码错误" })),
        )
        .mount(&server)
        .await;

    let secret: SecretString = "wrong".to_string().into();
    let result = client.login("front_desk", &secret).await;

    match result {
        Err(Error::Unauthorized { ref message }) => assert_eq!(message, "账号或密码错误"),
        other => panic!("expected Unauthorized, got: {other:?}"),
    }
}

// ── Room status ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_room_status_matches_all_rooms_entry() {
    let (server, client) = setup().await;

    let r203 = json!({ "roomId": "203", "status": "occupied", "guest": "Alice" });
    Mock::given(method("GET"))
        .and(path("/api/rooms/203/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&r203))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/rooms/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "roomId": "201", "status": "vacant" },
            r203,
            { "roomId": "301", "status": "out-of-service" }
        ])))
        .mount(&server)
        .await;

    let single = client.room_status(&room("203")).await.unwrap();
    let all = client.all_rooms_status().await.unwrap();

    assert_eq!(all.len(), 3);
    let entry = all.iter().find(|s| s.room_id == single.room_id).unwrap();
    assert_eq!(entry, &single);
    assert_eq!(all[2].status, Occupancy::OutOfService);
}

#[tokio::test]
async fn test_unknown_room_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/rooms/999/status"))
        .respond_with(ResponseTemplate::new(404).set_body_string("room 999 does not exist"))
        .mount(&server)
        .await;

    let err = client.room_status(&room("999")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.message(), "room 999 does not exist");
}

// ── Bills ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_bill_summary_and_detail_use_distinct_endpoints() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/rooms/203/bill"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "roomId": "203",
            "totalFee": 42.5,
            "acFee": 12.5,
            "roomFee": 30.0
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/rooms/203/detail_bill"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "roomId": "203",
            "items": [
                { "startTime": "2025-06-01T10:00:00Z", "endTime": "2025-06-01T10:30:00Z",
                  "fanSpeed": "high", "rate": 1.0, "fee": 10.0 },
                { "startTime": "2025-06-01 11:00:00", "fanSpeed": "low", "fee": 2.5 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let summary = client.bill_summary(&room("203")).await.unwrap();
    let detail = client.bill_detail(&room("203")).await.unwrap();

    assert!((summary.total - 42.5).abs() < f64::EPSILON);
    assert_eq!(summary.ac_fee, Some(12.5));
    assert_eq!(detail.items.len(), 2);
    assert_eq!(detail.items[0].fan_speed, Some(FanSpeed::High));
    assert!(detail.items[1].end_time.is_none());
    assert!(detail.total.is_none(), "detail total is never derived from items");
}

// ── Stays ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_check_in_on_occupied_room_is_conflict() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/check-in"))
        .and(body_json(json!({ "roomId": "203", "guest": "Bob" })))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "status": 409,
            "error": "Conflict",
            "message": "room 203 already has an open stay"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .check_in(&CheckInRequest::new(room("203"), "Bob"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.message(), "room 203 already has an open stay");
}

#[tokio::test]
async fn test_check_in_rejects_blank_guest_without_request() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client
        .check_in(&CheckInRequest::new(room("203"), "   "))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_check_out_without_open_stay_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/check-out"))
        .and(body_json(json!({ "roomId": "204", "stayId": "77" })))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "no open stay" })))
        .mount(&server)
        .await;

    let err = client
        .check_out(&CheckOutRequest::new(room("204")).with_stay("77"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_front_desk_stay_lifecycle() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "role": "reception" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/check-in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "roomId": "203", "guest": "Alice", "checkInTime": "2025-06-01T14:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/check-out"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "roomId": "203", "guest": "Alice",
            "checkInTime": "2025-06-01T14:00:00Z", "checkOutTime": "2025-06-02T11:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;
    // First status read sees the stay; later reads see the room vacated.
    Mock::given(method("GET"))
        .and(path("/api/rooms/203/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "roomId": "203", "status": "occupied", "guest": "Alice"
        })))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/rooms/203/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "roomId": "203", "status": "vacant" })),
        )
        .with_priority(2)
        .mount(&server)
        .await;

    let secret: SecretString = "pw123".to_string().into();
    let session = client.login("front_desk", &secret).await.unwrap();
    assert_eq!(session.account, "front_desk");

    let stay = client
        .check_in(&CheckInRequest::new(room("203"), "Alice"))
        .await
        .unwrap();
    assert!(stay.is_open());
    assert_eq!(
        client.room_status(&room("203")).await.unwrap().status,
        Occupancy::Occupied
    );

    let closed = client
        .check_out(&CheckOutRequest::new(room("203")))
        .await
        .unwrap();
    assert!(!closed.is_open());
    assert_eq!(
        client.room_status(&room("203")).await.unwrap().status,
        Occupancy::Vacant
    );
}

// ── AC commands ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_ac_commands_address_room_in_path_only() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/ac/203/set-speed"))
        .and(body_json(json!({ "speed": "high" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ac_state("on", "high", 24.0)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ac/203/set-temperature"))
        .and(body_json(json!({ "temperature": 22.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ac_state("on", "high", 22.0)))
        .expect(1)
        .mount(&server)
        .await;

    let state = client.set_ac_speed(&room("203"), FanSpeed::High).await.unwrap();
    assert_eq!(state.fan_speed, Some(FanSpeed::High));

    let state = client.set_ac_temperature(&room("203"), 22.0).await.unwrap();
    assert_eq!(state.target_temperature, Some(22.0));
}

#[tokio::test]
async fn test_out_of_range_temperature_sends_nothing() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ac_state("on", "low", 22.0)))
        .expect(0)
        .mount(&server)
        .await;

    for t in [10.0, 35.0, f64::NAN, f64::INFINITY] {
        let err = client.set_ac_temperature(&room("203"), t).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "temperature {t}");
    }
}

#[tokio::test]
async fn test_custom_temperature_bounds() {
    let (server, client) = setup().await;
    let client = client.with_temperature_bounds(TemperatureBounds::new(18.0, 25.0).unwrap());

    Mock::given(method("POST"))
        .and(path("/api/ac/203/set-temperature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ac_state("on", "low", 25.0)))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.set_ac_temperature(&room("203"), 26.0).await.is_err());
    assert!(client.set_ac_temperature(&room("203"), 25.0).await.is_ok());
}

#[tokio::test]
async fn test_turn_off_then_on_ends_on() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/ac/203/turn-off"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "isOn": false })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ac/203/turn-on"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "isOn": true, "fanSpeed": "medium", "targetTemperature": 25 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let off = client.turn_off_ac(&room("203")).await.unwrap();
    let on = client.turn_on_ac(&room("203")).await.unwrap();

    assert_eq!(off.power, PowerState::Off);
    assert_eq!(on.power, PowerState::On);
}

#[tokio::test]
async fn test_commands_for_different_rooms_run_concurrently() {
    let (server, client) = setup().await;

    for n in ["101", "102"] {
        Mock::given(method("POST"))
            .and(path(format!("/api/ac/{n}/turn-on")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(200))
                    .set_body_json(json!({ "roomId": n, "power": "on" })),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let (r101, r102) = (room("101"), room("102"));
    let started = std::time::Instant::now();
    let (a, b) = tokio::join!(client.turn_on_ac(&r101), client.turn_on_ac(&r102));

    assert_eq!(a.unwrap().room_id, Some(r101));
    assert_eq!(b.unwrap().room_id, Some(r102));
    assert!(started.elapsed() < Duration::from_millis(390));
}

#[tokio::test]
async fn test_out_of_service_room_is_conflict() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/ac/301/turn-on"))
        .respond_with(ResponseTemplate::new(409).set_body_string("room 301 is out of service"))
        .mount(&server)
        .await;

    let err = client.turn_on_ac(&room("301")).await.unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
}

// ── Reports ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_usage_report_sends_range_as_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/usage"))
        .and(query_param("startTime", "2025-06-01T00:00:00Z"))
        .and(query_param("endTime", "2025-06-02T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "startTime": "2025-06-01T00:00:00Z",
            "endTime": "2025-06-02T00:00:00Z",
            "rooms": [
                { "roomId": "101", "onOffCount": 4, "dispatchCount": 7, "totalDuration": 3600, "totalFee": 18.0 },
                { "roomId": "102", "onOffCount": 1, "totalFee": 2.0 }
            ],
            "totalFee": 20.0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let range = TimeRange::new(
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap(),
    )
    .unwrap();
    let report = client.usage_report(&range).await.unwrap();

    assert_eq!(report.rooms.len(), 2);
    assert_eq!(report.rooms[0].totals.power_cycles, 4);
    assert_eq!(report.rooms[0].totals.schedule_count, 7);
    assert_eq!(report.rooms[0].totals.duration_secs, 3600);
    assert_eq!(report.rooms[1].totals.schedule_count, 0);
}

#[tokio::test]
async fn test_zero_width_usage_report_is_empty_without_request() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let report = client
        .usage_report(&TimeRange::new(at, at).unwrap())
        .await
        .unwrap();

    assert!(report.is_empty());
    assert!(report.total_fee.abs() < f64::EPSILON);
    assert_eq!(report.start_time, Some(at));
}

#[tokio::test]
async fn test_room_report_reflects_speed_change() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/ac/203/set-speed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ac_state("on", "high", 24.0)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/reports/rooms/203"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "roomId": "203",
            "speedChangeCount": 1,
            "ac": ac_state("on", "high", 24.0)
        })))
        .mount(&server)
        .await;

    client.set_ac_speed(&room("203"), FanSpeed::High).await.unwrap();
    let report = client.room_report(&room("203")).await.unwrap();

    assert_eq!(report.totals.speed_changes, 1);
    assert_eq!(report.ac.unwrap().fan_speed, Some(FanSpeed::High));
}

// ── Envelope and failure classification ─────────────────────────────

#[tokio::test]
async fn test_result_envelope_is_unwrapped() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/rooms/203/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "success",
            "data": { "roomId": "203", "status": "vacant" }
        })))
        .mount(&server)
        .await;

    let status = client.room_status(&room("203")).await.unwrap();
    assert_eq!(status.status, Occupancy::Vacant);
}

#[tokio::test]
async fn test_envelope_failure_code_on_http_200() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/check-in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 409,
            "message": "房间已入住",
            "data": null
        })))
        .mount(&server)
        .await;

    let err = client
        .check_in(&CheckInRequest::new(room("203"), "Alice"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.message(), "房间已入住");
}

#[tokio::test]
async fn test_server_error_is_unavailable() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.all_rooms_status().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert!(err.message().contains("503"), "got: {}", err.message());
}

#[tokio::test]
async fn test_undecodable_body_is_unavailable() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/rooms/203/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client.room_status(&room("203")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
}

#[tokio::test]
async fn test_timeout_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_json(json!([])),
        )
        .mount(&server)
        .await;

    let transport = TransportConfig::default().with_timeout(Duration::from_millis(100));
    let client = ApiClient::new(Url::parse(&server.uri()).unwrap(), &transport).unwrap();

    let err = client.all_rooms_status().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
}

#[tokio::test]
async fn test_unreachable_backend_is_unavailable() {
    // Bind then release a port so nothing is listening on it.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base = Url::parse(&format!("http://127.0.0.1:{port}/api")).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base).unwrap();

    let err = client.all_rooms_status().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
}

#[tokio::test]
async fn test_configured_bearer_token_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/rooms/status"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let transport = TransportConfig::default().with_bearer_token("tok-1".to_string().into());
    let base = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = ApiClient::new(base, &transport).unwrap();

    assert!(client.all_rooms_status().await.unwrap().is_empty());
}
