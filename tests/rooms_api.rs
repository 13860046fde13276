//! End-to-end tests against a real PostgreSQL database.
//!
//! Skipped unless `BOOKING_TEST_DATABASE_URL` points at a disposable database.
//! Each test creates its own hotel or user, so tests can share the database.

use std::sync::OnceLock;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use booking_rs::AppState;
use booking_rs::api::routes::create_router;
use booking_rs::config::{DatabaseConfig, JwtConfig};
use booking_rs::db;
use booking_rs::error::AppError;
use booking_rs::repositories::{RoomFilter, RoomsRepository};
use diesel_async::scoped_futures::ScopedFutureExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const DATABASE_URL_ENV: &str = "BOOKING_TEST_DATABASE_URL";

static MIGRATED: OnceLock<()> = OnceLock::new();

async fn state() -> Option<AppState> {
    let Ok(url) = std::env::var(DATABASE_URL_ENV) else {
        eprintln!("{DATABASE_URL_ENV} not set, skipping");
        return None;
    };

    let migrate_url = url.clone();
    tokio::task::spawn_blocking(move || {
        MIGRATED.get_or_init(|| {
            db::run_pending_migrations(&migrate_url).expect("migrations apply");
        });
    })
    .await
    .unwrap();

    let pool = db::establish_async_connection_pool(&DatabaseConfig {
        url,
        max_connections: 4,
        min_connections: 1,
        ..Default::default()
    })
    .await
    .expect("test database reachable");

    let jwt = JwtConfig {
        secret: "integration-secret-with-at-least-32-chars".to_string(),
        access_token_expire_minutes: 5,
    };
    Some(AppState::new(pool, jwt))
}

async fn app() -> Option<Router> {
    let state = state().await?;
    Some(create_router(state, Duration::from_secs(30)))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_hotel(app: &Router) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/hotels",
        Some(json!({ "title": "Test Hotel", "location": "Testville" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

async fn create_room(app: &Router, hotel_id: i64, room: Value) -> i64 {
    let (status, body) = send(app, "POST", &format!("/hotel/{hotel_id}/rooms"), Some(room)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "ok");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_created_room_is_fetched_unchanged() {
    let Some(app) = app().await else { return };
    let hotel_id = create_hotel(&app).await;

    let room_id = create_room(
        &app,
        hotel_id,
        json!({ "name": "A", "description": "Corner room", "price": 100, "quantity": 2 }),
    )
    .await;

    let (status, room) = send(&app, "GET", &format!("/hotel/{hotel_id}/rooms/{room_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        room,
        json!({
            "id": room_id,
            "hotel_id": hotel_id,
            "name": "A",
            "description": "Corner room",
            "price": 100,
            "quantity": 2
        })
    );
}

#[tokio::test]
async fn test_patch_leaves_other_fields_alone() {
    let Some(app) = app().await else { return };
    let hotel_id = create_hotel(&app).await;
    let room_id = create_room(
        &app,
        hotel_id,
        json!({ "name": "B", "description": "Quiet", "price": 100, "quantity": 4 }),
    )
    .await;
    let uri = format!("/hotel/{hotel_id}/rooms/{room_id}");

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "price": 150 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (_, room) = send(&app, "GET", &uri, None).await;
    assert_eq!(room["price"], 150);
    assert_eq!(room["name"], "B");
    assert_eq!(room["description"], "Quiet");
    assert_eq!(room["quantity"], 4);
}

#[tokio::test]
async fn test_put_overwrites_omitted_fields() {
    let Some(app) = app().await else { return };
    let hotel_id = create_hotel(&app).await;
    let room_id = create_room(
        &app,
        hotel_id,
        json!({ "name": "C", "description": "Balcony", "price": 100, "quantity": 1 }),
    )
    .await;
    let uri = format!("/hotel/{hotel_id}/rooms/{room_id}");

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "name": "C2", "price": 90, "quantity": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, room) = send(&app, "GET", &uri, None).await;
    assert_eq!(room["name"], "C2");
    assert_eq!(room["description"], Value::Null);
    assert_eq!(room["price"], 90);
}

#[tokio::test]
async fn test_patch_null_clears_description() {
    let Some(app) = app().await else { return };
    let hotel_id = create_hotel(&app).await;
    let room_id = create_room(
        &app,
        hotel_id,
        json!({ "name": "D", "description": "Temporary", "price": 10, "quantity": 1 }),
    )
    .await;
    let uri = format!("/hotel/{hotel_id}/rooms/{room_id}");

    send(&app, "PATCH", &uri, Some(json!({ "description": null }))).await;

    let (_, room) = send(&app, "GET", &uri, None).await;
    assert_eq!(room["description"], Value::Null);
    assert_eq!(room["name"], "D");
}

#[tokio::test]
async fn test_missing_rooms_are_404() {
    let Some(app) = app().await else { return };
    let hotel_id = create_hotel(&app).await;
    let uri = format!("/hotel/{hotel_id}/rooms/{}", i32::MAX);

    for (method, body) in [
        ("GET", None),
        ("DELETE", None),
        ("PATCH", Some(json!({ "price": 1 }))),
        ("PUT", Some(json!({ "name": "X", "price": 1, "quantity": 1 }))),
    ] {
        let (status, body) = send(&app, method, &uri, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(body["message"], "Room not found", "{method}");
    }
}

#[tokio::test]
async fn test_room_is_scoped_to_its_hotel() {
    let Some(app) = app().await else { return };
    let owner = create_hotel(&app).await;
    let other = create_hotel(&app).await;
    let room_id = create_room(&app, owner, json!({ "name": "E", "price": 1, "quantity": 1 })).await;

    let (status, _) = send(&app, "GET", &format!("/hotel/{other}/rooms/{room_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/hotel/{other}/rooms/{room_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", &format!("/hotel/{owner}/rooms/{room_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_room_for_missing_hotel_is_404() {
    let Some(app) = app().await else { return };

    let (status, body) = send(
        &app,
        "POST",
        &format!("/hotel/{}/rooms", i32::MAX),
        Some(json!({ "name": "F", "price": 1, "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Hotel not found");
}

#[tokio::test]
async fn test_delete_then_fetch() {
    let Some(app) = app().await else { return };
    let hotel_id = create_hotel(&app).await;
    let room_id = create_room(&app, hotel_id, json!({ "name": "G", "price": 1, "quantity": 1 })).await;
    let uri = format!("/hotel/{hotel_id}/rooms/{room_id}");

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pagination_windows() {
    let Some(app) = app().await else { return };
    let hotel_id = create_hotel(&app).await;

    let mut ids = Vec::new();
    for n in 0..7 {
        let room = json!({ "name": format!("R{n}"), "price": 10 * n, "quantity": 1 });
        ids.push(create_room(&app, hotel_id, room).await);
    }

    let list = |query: &'static str| {
        let app = app.clone();
        async move {
            let (status, body) =
                send(&app, "GET", &format!("/hotel/{hotel_id}/rooms?{query}"), None).await;
            assert_eq!(status, StatusCode::OK);
            body.as_array()
                .unwrap()
                .iter()
                .map(|room| room["id"].as_i64().unwrap())
                .collect::<Vec<_>>()
        }
    };

    assert_eq!(list("").await, ids[..5]);
    assert_eq!(list("page=1&per_page=3").await, ids[..3]);
    assert_eq!(list("page=2&per_page=3").await, ids[3..6]);
    assert_eq!(list("page=3&per_page=3").await, ids[6..]);
    assert!(list("page=4&per_page=3").await.is_empty());
}

#[tokio::test]
async fn test_hotel_search_is_case_insensitive_substring() {
    let Some(app) = app().await else { return };
    let marker = uuid::Uuid::new_v4().simple().to_string();
    let title = format!("Seaside {marker}");

    let (status, created) = send(
        &app,
        "POST",
        "/hotels",
        Some(json!({ "title": title, "location": "Sochi" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let query = format!("/hotels?title={}", marker.to_uppercase());
    let (status, found) = send(&app, "GET", &query, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, json!([created["data"]]));
}

#[tokio::test]
async fn test_register_login_me_logout() {
    let Some(app) = app().await else { return };
    let email = format!("{}@example.com", uuid::Uuid::new_v4().simple());
    let credentials = json!({ "email": email, "password": "correct-horse" });

    let (status, _) = send(&app, "POST", "/auth/register", Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", "/auth/register", Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_ENTRY");

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        Some(json!({ "email": email, "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let login = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(credentials.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);
    let set_cookie = login.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(set_cookie.starts_with("access_token="));
    assert!(set_cookie.contains("HttpOnly"));
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let me = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(me.into_body(), usize::MAX).await.unwrap();
    let me: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(me["email"], email);

    let logout = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let cleared = logout.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.starts_with("access_token="));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_health_reports_database() {
    let Some(app) = app().await else { return };

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"]["status"], "healthy");

    let (status, _) = send(&app, "GET", "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_one_or_none_rejects_two_matches() {
    let Some(state) = state().await else { return };
    let app = create_router(state.clone(), Duration::from_secs(30));
    let hotel_id = create_hotel(&app).await;
    for name in ["Twin A", "Twin B"] {
        create_room(&app, hotel_id, json!({ "name": name, "price": 80, "quantity": 1 })).await;
    }

    let filter = RoomFilter::new().hotel_id(i32::try_from(hotel_id).unwrap());
    let result = state
        .db
        .scoped(|conn| {
            async move { RoomsRepository::new(conn).get_one_or_none(&filter).await }.scope_boxed()
        })
        .await;

    match result {
        Err(AppError::AmbiguousMatch { entity, found }) => {
            assert_eq!(entity, "Room");
            assert_eq!(found, 2);
        }
        other => panic!("expected an ambiguous match, got {other:?}"),
    }
}
