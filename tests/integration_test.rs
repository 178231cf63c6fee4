// Integration tests for the job portal client
//
// These tests drive the fully wired client (error routing, authentication,
// reqwest transport) against a mock backend.

use mockito::{Matcher, Server};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio_test::{assert_err, assert_ok};

use jobportal_client::{
    auth::{CredentialStore, MemoryCredentialStore, Navigator, SqliteCredentialStore},
    config::Config,
    middleware::PublicEndpoints,
    models::LoginRequest,
    ClientError, PortalClient, RefreshFailure,
};

// ==================================================================================================
// Test Helpers
// ==================================================================================================

#[derive(Default)]
struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

fn test_config(server: &Server) -> Config {
    Config {
        api_url: format!("{}/api", server.url()),
        credentials_db: std::path::PathBuf::from("/tmp/unused.sqlite3"),
        http_connect_timeout: 5,
        http_request_timeout: 10,
        public_endpoints: PublicEndpoints::default(),
        login_route: "/auth/login".to_string(),
        log_level: "debug".to_string(),
    }
}

fn build_client(
    server: &Server,
    store: Arc<dyn CredentialStore>,
) -> (PortalClient, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::default());
    let client = PortalClient::new(&test_config(server), store, navigator.clone())
        .expect("Failed to build client");
    (client, navigator)
}

// ==================================================================================================
// Token Refresh Tests
// ==================================================================================================

#[tokio::test]
async fn test_expired_token_is_refreshed_and_request_retried() {
    let mut server = Server::new_async().await;

    let stale = server
        .mock("GET", "/api/jobs")
        .match_header("authorization", "Bearer stale")
        .match_query(Matcher::UrlEncoded("page".into(), "0".into()))
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/auth/refresh-token")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::Json(json!({ "refreshToken": "r1" })))
        .with_status(200)
        .with_body(r#"{"accessToken":"fresh"}"#)
        .expect(1)
        .create_async()
        .await;
    let fresh = server
        .mock("GET", "/api/jobs")
        .match_header("authorization", "Bearer fresh")
        .match_query(Matcher::UrlEncoded("page".into(), "0".into()))
        .with_status(200)
        .with_body(r#"[{"id":1,"title":"Rust Engineer"}]"#)
        .expect(1)
        .create_async()
        .await;

    let store = Arc::new(MemoryCredentialStore::with_tokens(Some("stale"), Some("r1")));
    let (client, navigator) = build_client(&server, store.clone());

    let jobs: Value = assert_ok!(
        client
            .api()
            .get("/jobs", vec![("page".to_string(), "0".to_string())])
            .await
    );

    assert_eq!(jobs[0]["title"], "Rust Engineer");
    assert_eq!(store.access_token().as_deref(), Some("fresh"));
    assert_eq!(store.refresh_token().as_deref(), Some("r1"));
    assert!(navigator.routes().is_empty());
    assert!(!client.is_refreshing());

    stale.assert_async().await;
    refresh.assert_async().await;
    fresh.assert_async().await;
}

#[tokio::test]
async fn test_refresh_rejection_terminates_session() {
    let mut server = Server::new_async().await;

    let _jobs = server
        .mock("GET", "/api/applications")
        .with_status(401)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/auth/refresh-token")
        .with_status(401)
        .with_body("refresh token expired")
        .expect(1)
        .create_async()
        .await;

    let store = Arc::new(MemoryCredentialStore::with_tokens(Some("stale"), Some("old")));
    let (client, navigator) = build_client(&server, store.clone());

    let err = assert_err!(client.api().get::<Value>("/applications", Vec::new()).await);

    assert!(err.is_session_terminated());
    assert!(matches!(
        err,
        ClientError::Refresh(RefreshFailure::Endpoint(_))
    ));
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
    assert_eq!(navigator.routes(), vec!["/auth/login"]);
    refresh.assert_async().await;
}

#[tokio::test]
async fn test_unauthenticated_without_token() {
    let mut server = Server::new_async().await;

    let jobs = server
        .mock("GET", "/api/me")
        .match_header("authorization", Matcher::Missing)
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/auth/refresh-token")
        .expect(0)
        .create_async()
        .await;

    let (client, _navigator) = build_client(&server, Arc::new(MemoryCredentialStore::new()));

    let err = assert_err!(client.api().get::<Value>("/me", Vec::new()).await);
    assert!(matches!(err, ClientError::Unauthenticated));

    jobs.assert_async().await;
    refresh.assert_async().await;
}

// ==================================================================================================
// Session Flow Tests
// ==================================================================================================

#[tokio::test]
async fn test_login_uses_public_endpoint_and_persists_session() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("session.sqlite3");

    let login = server
        .mock("POST", "/api/auth/login")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(
            r#"{
                "accessToken": "a1",
                "refreshToken": "r1",
                "user": {"id": 5, "fullName": "Jo", "email": "jo@example.com", "role": "EMPLOYER"}
            }"#,
        )
        .expect(1)
        .create_async()
        .await;
    let me = server
        .mock("GET", "/api/users/5")
        .match_header("authorization", "Bearer a1")
        .with_status(200)
        .with_body(r#"{"id": 5, "fullName": "Jo", "email": "jo@example.com"}"#)
        .create_async()
        .await;

    {
        let store = Arc::new(SqliteCredentialStore::open(&db_path).unwrap());
        // a leftover token must not leak into the public login call
        store.set_access_token("leftover").unwrap();
        let (client, _navigator) = build_client(&server, store);

        assert_ok!(
            client
                .auth()
                .login(&LoginRequest {
                    email: "jo@example.com".to_string(),
                    password: "pw".to_string(),
                })
                .await
        );
    }

    // A fresh process sees the persisted session
    let store = Arc::new(SqliteCredentialStore::open(&db_path).unwrap());
    let (client, _navigator) = build_client(&server, store);
    assert!(client.auth().is_logged_in());
    let user: Value = assert_ok!(client.api().get("/users/5", Vec::new()).await);
    assert_eq!(user["fullName"], "Jo");

    login.assert_async().await;
    me.assert_async().await;
}

#[tokio::test]
async fn test_logout_clears_session_even_when_backend_unreachable() {
    let server = Server::new_async().await;
    let store = Arc::new(MemoryCredentialStore::with_tokens(Some("a"), Some("r")));
    let (client, _navigator) = build_client(&server, store.clone());

    // no mock registered: the backend answers 501
    client.auth().logout().await;

    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
    assert!(!client.auth().is_logged_in());
}

// ==================================================================================================
// Error Routing Tests
// ==================================================================================================

#[tokio::test]
async fn test_not_found_navigates_and_propagates() {
    let mut server = Server::new_async().await;
    let _missing = server
        .mock("GET", "/api/jobs/999")
        .with_status(404)
        .with_body("job not found")
        .create_async()
        .await;

    let store = Arc::new(MemoryCredentialStore::with_tokens(Some("a"), Some("r")));
    let (client, navigator) = build_client(&server, store.clone());

    let err = assert_err!(client.api().get::<Value>("/jobs/999", Vec::new()).await);

    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("job not found"));
    assert_eq!(navigator.routes(), vec!["/404"]);
    // a 404 does not touch the session
    assert_eq!(store.access_token().as_deref(), Some("a"));
}

#[tokio::test]
async fn test_forbidden_navigates() {
    let mut server = Server::new_async().await;
    let _forbidden = server
        .mock("DELETE", "/api/jobs/3")
        .with_status(403)
        .create_async()
        .await;

    let store = Arc::new(MemoryCredentialStore::with_tokens(Some("a"), Some("r")));
    let (client, navigator) = build_client(&server, store);

    let err = assert_err!(client.api().delete::<Value>("/jobs/3", Vec::new()).await);
    assert_eq!(err.status(), Some(403));
    assert_eq!(navigator.routes(), vec!["/403"]);
}
