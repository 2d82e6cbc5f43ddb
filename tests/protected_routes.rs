use auth_server::auth::store::User;
use auth_server::auth::{JwtService, Role};
use auth_server::test_support::{TestRocketBuilder, test_config};
use chrono::Utc;
use rocket::http::{ContentType, Header, Status};
use rocket::local::blocking::Client;
use serde_json::{Value, json};
use uuid::Uuid;

const GOOD_PASSWORD: &str = "Str0ng!Passw0rd";

fn register(client: &Client, email: &str, name: &str, role: Option<&str>) -> String {
    let mut payload = json!({"email": email, "password": GOOD_PASSWORD, "name": name});
    if let Some(role) = role {
        payload["role"] = json!(role);
    }

    let response = client
        .post("/api/auth/register")
        .header(ContentType::JSON)
        .body(payload.to_string())
        .dispatch();
    assert_eq!(response.status(), Status::Created);

    let body: Value = response.into_json().expect("valid JSON payload");
    body["token"].as_str().expect("token present").to_string()
}

fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {token}"))
}

fn phantom_user(role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        email: "ghost@example.com".into(),
        password_hash: String::new(),
        name: "Ghost".into(),
        role,
        created_at: Utc::now(),
    }
}

#[test]
fn me_echoes_the_trusted_identity() {
    let client = TestRocketBuilder::new().blocking_client();
    let token = register(&client, "ana@example.com", "Ana", None);

    let response = client.get("/api/auth/me").header(bearer(&token)).dispatch();
    assert_eq!(response.status(), Status::Ok);

    let body: Value = response.into_json().expect("valid JSON payload");
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert_eq!(body["user"]["name"], "Ana");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"]["id"].as_str().is_some());
}

#[test]
fn me_without_a_header_is_rejected() {
    let client = TestRocketBuilder::new().blocking_client();

    let response = client.get("/api/auth/me").dispatch();
    assert_eq!(response.status(), Status::Unauthorized);

    let body: Value = response.into_json().expect("valid JSON payload");
    assert_eq!(body["message"], "Authorization token is required.");
}

#[test]
fn malformed_authorization_headers_read_as_missing() {
    let client = TestRocketBuilder::new().blocking_client();
    let token = register(&client, "ana@example.com", "Ana", None);

    for header in [
        Header::new("Authorization", token.clone()),
        Header::new("Authorization", "Bearer"),
        Header::new("Authorization", format!("Basic {token}")),
    ] {
        let response = client.get("/api/auth/me").header(header).dispatch();
        assert_eq!(response.status(), Status::Unauthorized);
        let body: Value = response.into_json().expect("valid JSON payload");
        assert_eq!(body["message"], "Authorization token is required.");
    }
}

#[test]
fn garbage_tokens_are_rejected_with_the_undifferentiated_message() {
    let client = TestRocketBuilder::new().blocking_client();

    let response = client
        .get("/api/auth/me")
        .header(bearer("not.a.token"))
        .dispatch();
    assert_eq!(response.status(), Status::Unauthorized);

    let body: Value = response.into_json().expect("valid JSON payload");
    assert_eq!(body["message"], "Invalid or expired token.");
}

#[test]
fn expired_tokens_are_rejected() {
    let client = TestRocketBuilder::new().blocking_client();

    let mut config = test_config();
    config.token_ttl_secs = -120;
    let jwt = JwtService::from_config(&config).expect("jwt service");
    let token = jwt.issue(&phantom_user(Role::User)).expect("issue token");

    let response = client
        .get("/api/auth/me")
        .header(bearer(&token.token))
        .dispatch();
    assert_eq!(response.status(), Status::Unauthorized);

    let body: Value = response.into_json().expect("valid JSON payload");
    assert_eq!(body["message"], "Invalid or expired token.");
}

#[test]
fn tokens_signed_with_a_foreign_secret_are_rejected() {
    let client = TestRocketBuilder::new().blocking_client();

    let mut config = test_config();
    config.jwt_secret = "some-other-signing-secret".into();
    let jwt = JwtService::from_config(&config).expect("jwt service");
    let token = jwt.issue(&phantom_user(Role::Admin)).expect("issue token");

    let response = client
        .get("/api/auth/admin/overview")
        .header(bearer(&token.token))
        .dispatch();
    assert_eq!(response.status(), Status::Unauthorized);

    let body: Value = response.into_json().expect("valid JSON payload");
    assert_eq!(body["message"], "Invalid or expired token.");
}

#[test]
fn admin_route_is_gated_by_role() {
    let client = TestRocketBuilder::new().blocking_client();
    let user_token = register(&client, "ana@example.com", "Ana", None);
    let admin_token = register(&client, "root@example.com", "Root", Some("admin"));

    let response = client
        .get("/api/auth/admin/overview")
        .header(bearer(&user_token))
        .dispatch();
    assert_eq!(response.status(), Status::Forbidden);
    let body: Value = response.into_json().expect("valid JSON payload");
    assert_eq!(body["message"], "Insufficient permissions.");

    let response = client
        .get("/api/auth/admin/overview")
        .header(bearer(&admin_token))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().expect("valid JSON payload");
    assert_eq!(body["message"], "Hello Root, you have admin access.");
    assert_eq!(body["user"]["role"], "admin");
}

#[test]
fn admin_route_unauthenticated_is_401() {
    let client = TestRocketBuilder::new().blocking_client();

    let response = client.get("/api/auth/admin/overview").dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
}
