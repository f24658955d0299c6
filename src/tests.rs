// Router tests for the People & Books API
// Drive the full router (auth middleware, policy, handlers) against in-memory stores

use super::*;
use axum::http::{HeaderName, StatusCode};
use axum_test::TestServer;
use serde_json::json;

use crate::auth::models::TokenResponse;
use crate::test_support::{
    test_token_service, InMemoryBookStore, InMemoryPersonStore, InMemoryUserStore,
};

// ============================================================================
// Test Helpers
// ============================================================================

struct TestApp {
    server: TestServer,
    users: Arc<InMemoryUserStore>,
}

/// Router over in-memory stores with an admin (`leandro`) and a
/// common user (`flavio`)
fn create_test_app() -> TestApp {
    let users = Arc::new(InMemoryUserStore::new());
    users.add_user("leandro", "admin123", &["ADMIN", "MANAGER"]);
    users.add_user("flavio", "user1234", &["COMMON_USER"]);

    let tokens = Arc::new(test_token_service());
    let state = AppState {
        auth: Arc::new(AuthService::new(users.clone(), tokens.clone())),
        tokens,
        people: PersonService::new(Arc::new(InMemoryPersonStore::new())),
        books: BookService::new(Arc::new(InMemoryBookStore::new())),
    };

    TestApp {
        server: TestServer::new(create_router(state, &[])).unwrap(),
        users,
    }
}

fn authorization() -> HeaderName {
    HeaderName::from_static("authorization")
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

async fn sign_in(server: &TestServer, username: &str, password: &str) -> TokenResponse {
    let response = server
        .post("/auth/signin")
        .json(&json!({ "username": username, "password": password }))
        .await;
    response.assert_status_ok();
    response.json::<TokenResponse>()
}

async fn admin_token(server: &TestServer) -> HeaderValue {
    bearer(&sign_in(server, "leandro", "admin123").await.access_token)
}

fn person_payload(first_name: &str) -> serde_json::Value {
    json!({
        "firstName": first_name,
        "lastName": "Senna",
        "address": "São Paulo - Brasil",
        "gender": "Male"
    })
}

fn book_payload(author: &str) -> serde_json::Value {
    json!({
        "author": author,
        "launchDate": "2017-11-29T13:50:05Z",
        "price": "49.90",
        "title": "Working effectively with legacy code"
    })
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let app = create_test_app();

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok" }));
}

// ============================================================================
// Sign-in (POST /auth/signin)
// ============================================================================

/// Successful sign-in returns a token pair for the user
#[tokio::test]
async fn test_signin_success() {
    let app = create_test_app();

    let tokens = sign_in(&app.server, "leandro", "admin123").await;

    assert!(tokens.authenticated);
    assert_eq!(tokens.username, "leandro");
    assert!(!tokens.access_token.is_empty());
    assert!(!tokens.refresh_token.is_empty());
    assert!(tokens.expiration > tokens.created);
}

/// Wrong password and unknown username produce the same 401 body
#[tokio::test]
async fn test_signin_failures_are_indistinguishable() {
    let app = create_test_app();

    let wrong_password = app
        .server
        .post("/auth/signin")
        .json(&json!({ "username": "leandro", "password": "nope" }))
        .await;
    let unknown_user = app
        .server
        .post("/auth/signin")
        .json(&json!({ "username": "ghost", "password": "admin123" }))
        .await;

    wrong_password.assert_status(StatusCode::UNAUTHORIZED);
    unknown_user.assert_status(StatusCode::UNAUTHORIZED);

    let first: serde_json::Value = wrong_password.json();
    let second: serde_json::Value = unknown_user.json();
    assert_eq!(first["error_code"], "AUTHENTICATION_FAILED");
    assert_eq!(first["error_code"], second["error_code"]);
    assert_eq!(first["message"], second["message"]);
}

#[tokio::test]
async fn test_signin_disabled_account() {
    let app = create_test_app();
    app.users.update_user("flavio", |u| u.enabled = false);

    let response = app
        .server
        .post("/auth/signin")
        .json(&json!({ "username": "flavio", "password": "user1234" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signin_blank_fields() {
    let app = create_test_app();

    let response = app
        .server
        .post("/auth/signin")
        .json(&json!({ "username": "", "password": "admin123" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
}

/// Bodies that do not deserialize get the shared JSON error body
#[tokio::test]
async fn test_signin_malformed_body() {
    let app = create_test_app();

    let response = app
        .server
        .post("/auth/signin")
        .json(&json!({ "username": "leandro" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error_code"], "BAD_REQUEST");
    assert!(body["timestamp"].is_string());
}

// ============================================================================
// Refresh (PUT /auth/refresh/:username)
// ============================================================================

#[tokio::test]
async fn test_refresh_success() {
    let app = create_test_app();
    let original = sign_in(&app.server, "leandro", "admin123").await;

    let response = app
        .server
        .put("/auth/refresh/leandro")
        .add_header(authorization(), bearer(&original.refresh_token))
        .await;

    response.assert_status_ok();
    let refreshed: TokenResponse = response.json();
    assert_eq!(refreshed.username, "leandro");
    assert!(refreshed.expiration >= original.expiration);
    assert_ne!(refreshed.access_token, original.access_token);

    // The new access token opens protected routes
    app.server
        .get("/auth/me")
        .add_header(authorization(), bearer(&refreshed.access_token))
        .await
        .assert_status_ok();
}

/// The refresh token is accepted without the `Bearer ` prefix
#[tokio::test]
async fn test_refresh_without_bearer_prefix() {
    let app = create_test_app();
    let original = sign_in(&app.server, "leandro", "admin123").await;

    let response = app
        .server
        .put("/auth/refresh/leandro")
        .add_header(
            authorization(),
            HeaderValue::from_str(&original.refresh_token).unwrap(),
        )
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_refresh_rejections() {
    let app = create_test_app();
    let leandro = sign_in(&app.server, "leandro", "admin123").await;

    // Access token in place of a refresh token
    app.server
        .put("/auth/refresh/leandro")
        .add_header(authorization(), bearer(&leandro.access_token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    // Token issued to someone else
    app.server
        .put("/auth/refresh/flavio")
        .add_header(authorization(), bearer(&leandro.refresh_token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    // No header at all
    app.server
        .put("/auth/refresh/leandro")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_for_removed_user() {
    let app = create_test_app();
    let original = sign_in(&app.server, "flavio", "user1234").await;
    app.users.remove_user("flavio");

    let response = app
        .server
        .put("/auth/refresh/flavio")
        .add_header(authorization(), bearer(&original.refresh_token))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Authentication failed");
}

// ============================================================================
// Token gate and role policy
// ============================================================================

#[tokio::test]
async fn test_me_returns_identity() {
    let app = create_test_app();
    let token = admin_token(&app.server).await;

    let response = app
        .server
        .get("/auth/me")
        .add_header(authorization(), token)
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "username": "leandro",
        "roles": ["ADMIN", "MANAGER"]
    }));
}

#[tokio::test]
async fn test_protected_routes_need_a_valid_token() {
    let app = create_test_app();

    app.server
        .get("/api/person/v1")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.server
        .get("/api/books/v1")
        .add_header(authorization(), bearer("not.a.token"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let refresh = sign_in(&app.server, "leandro", "admin123").await.refresh_token;
    app.server
        .get("/api/books/v1")
        .add_header(authorization(), bearer(&refresh))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

/// COMMON_USER may read but not write
#[tokio::test]
async fn test_common_user_is_read_only() {
    let app = create_test_app();
    let token = bearer(&sign_in(&app.server, "flavio", "user1234").await.access_token);

    app.server
        .get("/api/person/v1")
        .add_header(authorization(), token.clone())
        .await
        .assert_status_ok();

    let denied = app
        .server
        .post("/api/person/v1")
        .add_header(authorization(), token.clone())
        .json(&person_payload("Ayrton"))
        .await;
    denied.assert_status(StatusCode::FORBIDDEN);
    let body: serde_json::Value = denied.json();
    assert_eq!(body["error_code"], "FORBIDDEN");

    app.server
        .delete("/api/books/v1/1")
        .add_header(authorization(), token)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

// ============================================================================
// People (/api/person/v1)
// ============================================================================

#[tokio::test]
async fn test_person_lifecycle() {
    let app = create_test_app();
    let token = admin_token(&app.server).await;

    // Create
    let created = app
        .server
        .post("/api/person/v1")
        .add_header(authorization(), token.clone())
        .json(&person_payload("Ayrton"))
        .await;
    created.assert_status(StatusCode::CREATED);
    let person: serde_json::Value = created.json();
    let id = person["id"].as_i64().unwrap();
    assert_eq!(person["firstName"], "Ayrton");
    assert_eq!(person["enabled"], true);

    // Read
    app.server
        .get(&format!("/api/person/v1/{}", id))
        .add_header(authorization(), token.clone())
        .await
        .assert_json(&person);

    // Update
    let mut update = person_payload("Ayrton Senna");
    update["id"] = json!(id);
    let updated = app
        .server
        .put("/api/person/v1")
        .add_header(authorization(), token.clone())
        .json(&update)
        .await;
    updated.assert_status_ok();
    let body: serde_json::Value = updated.json();
    assert_eq!(body["firstName"], "Ayrton Senna");

    // Disable
    let disabled = app
        .server
        .patch(&format!("/api/person/v1/{}", id))
        .add_header(authorization(), token.clone())
        .await;
    disabled.assert_status_ok();
    let body: serde_json::Value = disabled.json();
    assert_eq!(body["enabled"], false);

    // Delete
    app.server
        .delete(&format!("/api/person/v1/{}", id))
        .add_header(authorization(), token.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let gone = app
        .server
        .get(&format!("/api/person/v1/{}", id))
        .add_header(authorization(), token)
        .await;
    gone.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = gone.json();
    assert_eq!(body["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_person_list_and_search() {
    let app = create_test_app();
    let token = admin_token(&app.server).await;

    for name in ["Nikola", "Leonardo", "Ayrton", "Leandro"] {
        app.server
            .post("/api/person/v1")
            .add_header(authorization(), token.clone())
            .json(&person_payload(name))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let listed = app
        .server
        .get("/api/person/v1")
        .add_query_param("page", 0)
        .add_query_param("size", 3)
        .add_query_param("direction", "desc")
        .add_header(authorization(), token.clone())
        .await;
    listed.assert_status_ok();
    let body: serde_json::Value = listed.json();
    let names: Vec<&str> = body["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["firstName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Nikola", "Leonardo", "Leandro"]);
    assert_eq!(
        body["page"],
        json!({ "size": 3, "totalElements": 4, "totalPages": 2, "number": 0 })
    );

    let found = app
        .server
        .get("/api/person/v1/findPersonByName/le")
        .add_header(authorization(), token)
        .await;
    found.assert_status_ok();
    let body: serde_json::Value = found.json();
    assert_eq!(body["page"]["totalElements"], 2);
    assert_eq!(body["content"][0]["firstName"], "Leandro");
    assert_eq!(body["content"][1]["firstName"], "Leonardo");
}

#[tokio::test]
async fn test_person_invalid_requests() {
    let app = create_test_app();
    let token = admin_token(&app.server).await;

    // Page size out of range
    app.server
        .get("/api/person/v1")
        .add_query_param("size", 0)
        .add_header(authorization(), token.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Blank first name
    app.server
        .post("/api/person/v1")
        .add_header(authorization(), token.clone())
        .json(&person_payload("  "))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Update of an id that does not exist
    let mut update = person_payload("Ghost");
    update["id"] = json!(404);
    app.server
        .put("/api/person/v1")
        .add_header(authorization(), token.clone())
        .json(&update)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .patch("/api/person/v1/404")
        .add_header(authorization(), token.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .delete("/api/person/v1/404")
        .add_header(authorization(), token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// Unparsable path and query values get the shared JSON error body
#[tokio::test]
async fn test_unparsable_path_and_query_values() {
    let app = create_test_app();
    let token = admin_token(&app.server).await;

    let bad_id = app
        .server
        .get("/api/person/v1/abc")
        .add_header(authorization(), token.clone())
        .await;
    bad_id.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = bad_id.json();
    assert_eq!(body["error_code"], "BAD_REQUEST");

    let bad_size = app
        .server
        .get("/api/books/v1")
        .add_query_param("size", "many")
        .add_header(authorization(), token.clone())
        .await;
    bad_size.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = bad_size.json();
    assert_eq!(body["error_code"], "BAD_REQUEST");

    let bad_price = app
        .server
        .post("/api/books/v1")
        .add_header(authorization(), token)
        .json(&json!({ "author": "Michael C. Feathers", "price": "cheap" }))
        .await;
    bad_price.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = bad_price.json();
    assert_eq!(body["error_code"], "BAD_REQUEST");
}

/// The Authorization scheme is matched case-insensitively
#[tokio::test]
async fn test_lowercase_bearer_scheme() {
    let app = create_test_app();
    let signed_in = sign_in(&app.server, "leandro", "admin123").await;

    let header = HeaderValue::from_str(&format!("bearer {}", signed_in.access_token)).unwrap();
    app.server
        .get("/auth/me")
        .add_header(authorization(), header)
        .await
        .assert_status_ok();
}

// ============================================================================
// Books (/api/books/v1)
// ============================================================================

#[tokio::test]
async fn test_book_lifecycle() {
    let app = create_test_app();
    let token = admin_token(&app.server).await;

    let created = app
        .server
        .post("/api/books/v1")
        .add_header(authorization(), token.clone())
        .json(&book_payload("Michael C. Feathers"))
        .await;
    created.assert_status(StatusCode::CREATED);
    let book: serde_json::Value = created.json();
    let id = book["id"].as_i64().unwrap();
    assert_eq!(book["price"], "49.90");
    assert_eq!(book["launchDate"], "2017-11-29T13:50:05Z");

    let mut update = book_payload("Michael C. Feathers");
    update["id"] = json!(id);
    update["price"] = json!("54.00");
    let updated = app
        .server
        .put("/api/books/v1")
        .add_header(authorization(), token.clone())
        .json(&update)
        .await;
    updated.assert_status_ok();
    let body: serde_json::Value = updated.json();
    assert_eq!(body["price"], "54.00");

    app.server
        .delete(&format!("/api/books/v1/{}", id))
        .add_header(authorization(), token.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .get(&format!("/api/books/v1/{}", id))
        .add_header(authorization(), token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_list_sorted_by_author() {
    let app = create_test_app();
    let token = admin_token(&app.server).await;

    for author in ["Ralph Johnson", "Crockford", "Eric Freeman"] {
        app.server
            .post("/api/books/v1")
            .add_header(authorization(), token.clone())
            .json(&book_payload(author))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = app
        .server
        .get("/api/books/v1")
        .add_header(authorization(), token)
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let authors: Vec<&str> = body["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["author"].as_str().unwrap())
        .collect();

    assert_eq!(authors, vec!["Crockford", "Eric Freeman", "Ralph Johnson"]);
    assert_eq!(body["page"]["size"], 12);
    assert_eq!(body["page"]["totalPages"], 1);
}

#[tokio::test]
async fn test_book_update_without_id() {
    let app = create_test_app();
    let token = admin_token(&app.server).await;

    let response = app
        .server
        .put("/api/books/v1")
        .add_header(authorization(), token)
        .json(&book_payload("Nobody"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
