use std::sync::Arc;

use beacon_core::IceServerConfig;
use beacon_server::{CloudflareTurn, StaticIceServers, TurnConfig};
use reqwest::StatusCode;
use serde_json::{Value, json};

use crate::integration::init_tracing;
use crate::utils::{GOOD_TOKEN, KEY_ID, TestServer, spawn_mock_turn_api};

#[tokio::test]
async fn test_static_servers_are_served_with_cors() {
    init_tracing();

    let servers = vec![IceServerConfig::stun("stun:stun.example.org:3478")];
    let server = TestServer::start(Arc::new(StaticIceServers::new(servers))).await;

    let res = reqwest::get(server.http_url("/rooms/lobby/turn"))
        .await
        .expect("Request failed");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    let body: Value = res.json().await.expect("Body is not JSON");
    assert_eq!(
        body,
        json!({ "iceServers": [{ "urls": ["stun:stun.example.org:3478"] }] })
    );

    server.stop().await;
}

#[tokio::test]
async fn test_minted_credentials_are_relayed() {
    init_tracing();

    let api = spawn_mock_turn_api().await;
    let turn = TurnConfig::new(KEY_ID, GOOD_TOKEN).with_endpoint(format!("http://{api}/keys"));
    let server = TestServer::start(Arc::new(CloudflareTurn::new(turn))).await;

    let res = reqwest::get(server.http_url("/rooms/lobby/turn"))
        .await
        .expect("Request failed");
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.expect("Body is not JSON");
    let servers: Vec<IceServerConfig> =
        serde_json::from_value(body["iceServers"].clone()).expect("Unexpected iceServers shape");

    assert_eq!(servers.len(), 1);
    assert_eq!(servers[0].username.as_deref(), Some("minted-user"));
    assert_eq!(servers[0].credential.as_deref(), Some("minted-secret"));
    assert_eq!(servers[0].urls.len(), 2);

    server.stop().await;
}

#[tokio::test]
async fn test_upstream_failure_is_passed_through() {
    init_tracing();

    let api = spawn_mock_turn_api().await;
    let turn = TurnConfig::new(KEY_ID, "wrong-token").with_endpoint(format!("http://{api}/keys"));
    let server = TestServer::start(Arc::new(CloudflareTurn::new(turn))).await;

    let res = reqwest::get(server.http_url("/rooms/lobby/turn"))
        .await
        .expect("Request failed");

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.text().await.expect("No body"), "invalid token");

    server.stop().await;
}

#[tokio::test]
async fn test_unreachable_service_is_bad_gateway() {
    init_tracing();

    // Port 9 (discard) is closed on loopback in test environments.
    let turn = TurnConfig::new(KEY_ID, GOOD_TOKEN).with_endpoint("http://127.0.0.1:9/keys");
    let server = TestServer::start(Arc::new(CloudflareTurn::new(turn))).await;

    let res = reqwest::get(server.http_url("/rooms/lobby/turn"))
        .await
        .expect("Request failed");
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    server.stop().await;
}
