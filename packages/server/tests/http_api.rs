//! HTTP API integration tests.
//!
//! Tests for REST API endpoints (health check, room creation, pre-join
//! check, room details).

mod fixtures;
use fixtures::TestServer;

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let port = 19080;
    let server = TestServer::start(port).await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_room_endpoint() {
    // テスト項目: /api/rooms/create でルームが作成され詳細を取得できる
    // given (前提条件):
    let port = 19081;
    let server = TestServer::start(port).await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .post(format!("{}/api/rooms/create", server.base_url()))
        .json(&serde_json::json!({"name": "My Project", "language": "python"}))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let room_id = body["room_id"].as_str().expect("room_id should be a string");
    assert_eq!(room_id.len(), 12);

    // 作成したルームの詳細を取得できる
    let response = client
        .get(format!("{}/api/rooms/{}", server.base_url(), room_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let detail: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(detail["id"], room_id);
    assert_eq!(detail["name"], "My Project");
    assert_eq!(detail["active_language"], "python");
    assert!(detail["participants"].as_array().unwrap().is_empty());
    assert!(detail["created_at"].is_string());
}

#[tokio::test]
async fn test_create_room_defaults() {
    // テスト項目: name / language を省略するとデフォルト値が使われる
    // given (前提条件):
    let port = 19082;
    let server = TestServer::start(port).await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .post(format!("{}/api/rooms/create", server.base_url()))
        .json(&serde_json::json!({}))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let room_id = body["room_id"].as_str().unwrap();

    let detail: serde_json::Value = client
        .get(format!("{}/api/rooms/{}", server.base_url(), room_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(detail["name"], "Untitled Project");
    assert_eq!(detail["active_language"], "javascript");
}

#[tokio::test]
async fn test_join_endpoint_validation_and_not_found() {
    // テスト項目: /api/rooms/join が欠落フィールドに 400、未知のルームに 404 を返す
    // given (前提条件):
    let port = 19083;
    let server = TestServer::start(port).await;
    let client = reqwest::Client::new();

    // when (操作): username なし
    let response = client
        .post(format!("{}/api/rooms/join", server.base_url()))
        .json(&serde_json::json!({"room_id": "abc123abc123"}))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Username and room_id required");

    // when (操作): 存在しないルーム
    let response = client
        .post(format!("{}/api/rooms/join", server.base_url()))
        .json(&serde_json::json!({"room_id": "abc123abc123", "username": "alice"}))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Room not found");
}

#[tokio::test]
async fn test_join_endpoint_success() {
    // テスト項目: /api/rooms/join がルーム詳細とアバター色を返す
    // given (前提条件):
    let port = 19084;
    let server = TestServer::start(port).await;
    let client = reqwest::Client::new();

    let created: serde_json::Value = client
        .post(format!("{}/api/rooms/create", server.base_url()))
        .json(&serde_json::json!({"name": "Pairing"}))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    let room_id = created["room_id"].as_str().unwrap();

    // when (操作):
    let response = client
        .post(format!("{}/api/rooms/join", server.base_url()))
        .json(&serde_json::json!({"room_id": room_id, "username": "alice"}))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["room"]["id"], room_id);
    assert_eq!(body["room"]["name"], "Pairing");

    let avatar_color = body["avatar_color"].as_str().unwrap();
    let palette = ["#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD"];
    assert!(palette.contains(&avatar_color));
}

#[tokio::test]
async fn test_room_detail_endpoint_not_found() {
    // テスト項目: /api/rooms/:room_id が存在しないルームに対して 404 を返す
    // given (前提条件):
    let port = 19085;
    let server = TestServer::start(port).await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/rooms/nonexistent", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 404);
}
