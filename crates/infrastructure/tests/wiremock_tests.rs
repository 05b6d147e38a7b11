//! Integration tests for infrastructure crate
//!
//! Tests cover:
//! - Reqwest transport against a mock backend
//! - Cookie session round-trip
//! - End-to-end client flows through the endpoint registry

use std::time::Duration;

use application::{
    ApiClient, ApplicationError, CredentialsMode, HttpMethod, TransportPort, TransportRequest,
    names,
};
use domain::{
    CreateProjectRequest, LoginRequest, ProjectId, Role, UserId, UserListQuery,
};
use infrastructure::{
    AppConfig, HttpClientConfig, ReqwestTransport, X_REQUEST_ID, create_api_client,
};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

fn create_transport(server: &MockServer) -> ReqwestTransport {
    ReqwestTransport::new(
        HttpClientConfig::default()
            .with_base_url(server.uri())
            .with_timeout(Duration::from_secs(5)),
    )
    .unwrap()
}

fn create_test_client(server: &MockServer) -> ApiClient {
    let mut config = AppConfig::default();
    config.api.base_url = server.uri();
    config.api.timeout_secs = 5;
    create_api_client(&config).unwrap()
}

fn principal(id: i64, name: &str, role: &str) -> Value {
    json!({
        "id": id,
        "fullName": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "role": role,
    })
}

fn admin_user(id: i64, role: &str) -> Value {
    json!({
        "id": id,
        "fullName": format!("User {id}"),
        "email": format!("user{id}@example.com"),
        "role": role,
        "created_at": "2024-05-01T10:00:00",
        "updated_at": "2024-05-01T10:00:00",
    })
}

fn project(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "title": "The Fox",
        "story_text": "A fox jumps over the fence.",
        "duration_sec": 25,
        "status": status,
        "created_at": "2024-05-01T10:00:00.123456",
        "scenes": [],
    })
}

/// Matches requests without a cookie header
struct WithoutCookie;

impl Match for WithoutCookie {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("cookie")
    }
}

// ============================================================================
// Transport Tests
// ============================================================================

mod transport_tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([project(1, "draft")])))
            .expect(1)
            .mount(&server)
            .await;

        let body = create_transport(&server)
            .send(TransportRequest::new(HttpMethod::Get, "/projects"))
            .await
            .unwrap();
        assert_eq!(body[0]["id"], 1);
    }

    #[tokio::test]
    async fn request_carries_correlation_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(header_exists(X_REQUEST_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
            .expect(1)
            .mount(&server)
            .await;

        create_transport(&server)
            .send(TransportRequest::new(HttpMethod::Get, "/auth/me"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn query_and_json_body_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/admin/users/7/role"))
            .and(query_param("dry", "1"))
            .and(body_json(json!({"role": "admin"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": admin_user(7, "admin")})))
            .expect(1)
            .mount(&server)
            .await;

        let request = TransportRequest::new(HttpMethod::Patch, "/admin/users/7/role")
            .with_query(vec![("dry".into(), "1".into())])
            .with_body(json!({"role": "admin"}));
        let body = create_transport(&server).send(request).await.unwrap();
        assert_eq!(body["data"]["role"], "admin");
    }

    #[tokio::test]
    async fn empty_success_body_is_null() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let body = create_transport(&server)
            .send(TransportRequest::new(HttpMethod::Post, "/auth/logout"))
            .await
            .unwrap();
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = create_transport(&server)
            .send(TransportRequest::new(HttpMethod::Get, "/projects"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Decode(_)));
    }

    #[tokio::test]
    async fn error_status_carries_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"detail": "Email already registered"})),
            )
            .mount(&server)
            .await;

        let err = create_transport(&server)
            .send(TransportRequest::new(HttpMethod::Post, "/auth/register").with_body(json!({})))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApplicationError::HttpStatus {
                status: 400,
                detail: "Email already registered".into()
            }
        );
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn validation_error_list_is_joined() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "detail": [
                    {"loc": ["body", "title"], "msg": "field required", "type": "missing"},
                    {"loc": ["body", "duration_sec"], "msg": "must be at most 30", "type": "le"}
                ]
            })))
            .mount(&server)
            .await;

        let err = create_transport(&server)
            .send(TransportRequest::new(HttpMethod::Post, "/projects").with_body(json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.user_message("Failed"), "field required; must be at most 30");
    }

    #[tokio::test]
    async fn server_errors_are_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = create_transport(&server)
            .send(TransportRequest::new(HttpMethod::Get, "/projects"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn timeout_is_a_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(
            HttpClientConfig::default()
                .with_base_url(server.uri())
                .with_timeout(Duration::from_millis(200)),
        )
        .unwrap();
        let err = transport
            .send(TransportRequest::new(HttpMethod::Get, "/projects"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Network(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let transport = ReqwestTransport::new(
            HttpClientConfig::default()
                .with_base_url("http://127.0.0.1:9")
                .with_connect_timeout(Duration::from_secs(1)),
        )
        .unwrap();
        let err = transport
            .send(TransportRequest::new(HttpMethod::Get, "/projects"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Network(_)));
    }
}

// ============================================================================
// Cookie Session Tests
// ============================================================================

mod cookie_tests {
    use super::*;

    #[tokio::test]
    async fn session_cookie_is_sent_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "access_token=abc123; Path=/; HttpOnly")
                    .set_body_json(json!({"data": principal(1, "Ada", "user")})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .and(header("cookie", "access_token=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_transport(&server);
        transport
            .send(
                TransportRequest::new(HttpMethod::Post, "/auth/login")
                    .with_body(json!({"email": "ada@example.com", "password": "Secret1!"})),
            )
            .await
            .unwrap();
        transport
            .send(TransportRequest::new(HttpMethod::Get, "/projects"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn omitted_credentials_send_no_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "access_token=abc123; Path=/")
                    .set_body_json(json!({"data": principal(1, "Ada", "user")})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .and(WithoutCookie)
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_transport(&server);
        transport
            .send(TransportRequest::new(HttpMethod::Post, "/auth/login").with_body(json!({})))
            .await
            .unwrap();
        transport
            .send(
                TransportRequest::new(HttpMethod::Get, "/projects")
                    .with_credentials(CredentialsMode::Omit),
            )
            .await
            .unwrap();
    }
}

// ============================================================================
// End-to-end Client Tests
// ============================================================================

mod client_flow_tests {
    use super::*;

    #[tokio::test]
    async fn bootstrap_restores_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "access_token=fresh; Path=/")
                    .set_body_json(json!({"message": "Token refreshed"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(header("cookie", "access_token=fresh"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": principal(1, "Ada", "user")})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = create_test_client(&server);
        let outcome = client.bootstrap().await;

        assert!(outcome.token_refreshed);
        assert_eq!(outcome.user.as_ref().map(|u| u.id), Some(UserId::new(1)));
        assert!(client.sessions().user().is_authenticated());
        assert!(client.is_ready());

        // Second call returns the stored outcome without new requests
        assert_eq!(client.bootstrap().await, outcome);
    }

    #[tokio::test]
    async fn bootstrap_without_session_stays_anonymous() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Missing token"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Not authenticated"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_test_client(&server);
        let outcome = client.bootstrap().await;

        assert!(!outcome.token_refreshed);
        assert_eq!(outcome.user, None);
        assert!(!client.sessions().user().is_authenticated());
    }

    #[tokio::test]
    async fn admin_role_change_refetches_listing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/auth/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": principal(99, "Root", "admin")})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/admin/users"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"items": [admin_user(7, "user")], "total": 45, "page": 1, "limit": 10}
            })))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/admin/users/7/role"))
            .and(body_json(json!({"role": "admin"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": admin_user(7, "admin")})))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_test_client(&server);
        let admin = client
            .admin_auth()
            .login_admin(&LoginRequest::new("root@example.com", "Admin123"))
            .await
            .unwrap();
        assert!(admin.is_admin());
        assert!(client.sessions().admin().is_authenticated());

        let users = client.admin_users();
        let query = UserListQuery::page(1, 10);
        let page = users.list_users(&query).await.unwrap();
        assert_eq!(page.total_pages(), 5);
        assert!(!page.is_page_available(6));

        // cached
        users.list_users(&query).await.unwrap();

        let updated = users.toggle_user_role(&page.items[0]).await.unwrap();
        assert_eq!(updated.role, Role::Admin);

        // stale after the role change
        users.list_users(&query).await.unwrap();
    }

    #[tokio::test]
    async fn project_creation_and_segmentation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/projects"))
            .and(body_json(json!({
                "title": "The Fox",
                "story_text": "A fox jumps over the fence.",
                "duration_sec": 25
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(project(3, "draft")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/projects/segment"))
            .and(body_json(json!({"projectId": 3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "description": "A fox in a field", "background_prompt": "sunny meadow"},
                {"id": 2, "description": "The fence", "background_prompt": "wooden fence"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_test_client(&server);
        let projects = client.projects();

        assert!(projects.list_projects().await.unwrap().is_empty());
        let created = projects
            .create_project(&CreateProjectRequest::new("The Fox", "A fox jumps over the fence."))
            .await
            .unwrap();
        assert_eq!(created.id, ProjectId::new(3));

        // the list was invalidated by the create
        projects.list_projects().await.unwrap();

        let segments = projects.generate_segments(created.id).await.unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].background_prompt, "wooden fence");
    }

    #[tokio::test]
    async fn logout_failure_clears_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": principal(1, "Ada", "user")})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = create_test_client(&server);
        client
            .auth()
            .login(&LoginRequest::new("ada@example.com", "Secret1!"))
            .await
            .unwrap();
        assert!(client.auth().session().is_authenticated());

        let err = client.auth().logout().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(!client.auth().session().is_authenticated());
    }

    #[tokio::test]
    async fn raw_query_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(project(3, "segmented")))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_test_client(&server);
        let first = client.query(names::GET_PROJECT, json!(3)).await.unwrap();
        let second = client.query(names::GET_PROJECT, json!(3)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(client.cache().stats().hits, 1);
    }
}
