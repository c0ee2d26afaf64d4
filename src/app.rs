use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::PersonRepository;
use crate::handlers::{person, protected, public};
use crate::middleware::{jwt_auth_middleware, options_short_circuit};
use crate::services::{AuthService, PersonService};

/// Shared handler state; cheap to clone per request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub people: PersonService,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(config: AppConfig, repo: Arc<dyn PersonRepository>) -> Self {
        let auth = AuthService::new(&config.security.jwt_secret);
        Self {
            config: Arc::new(config),
            people: PersonService::new(repo),
            auth,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/login", post(public::login))
        .merge(person_routes(&state))
        .merge(protected_routes(&state))
        .fallback(public::not_found)
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    let router = if state.config.security.enable_cors {
        router.layer(cors_layer(&state.config.security))
    } else {
        router.layer(middleware::from_fn(options_short_circuit))
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

fn person_routes(state: &AppState) -> Router<AppState> {
    let routes = Router::new()
        .route("/api/v1/person/create", post(person::person_create))
        .route("/api/v1/person", get(person::person_list))
        .route(
            "/api/v1/person/:id",
            get(person::person_get)
                .put(person::person_update)
                .delete(person::person_delete),
        );

    if state.config.security.require_auth {
        routes.route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
    } else {
        routes
    }
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/whoami", get(protected::whoami))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let any_origin = security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*");

    let origins = if any_origin {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            security
                .cors_origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RequestContext;
    use crate::database::{InMemoryPersonRepository, Page, Person, StorageError};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    const ADMIN_EMAIL: &str = "admin@example.com";
    const ADMIN_PASSWORD: &str = "hunter2";

    fn test_config(require_auth: bool) -> AppConfig {
        let mut config = AppConfig::development();
        config.database.store = crate::config::StoreBackend::Memory;
        config.security.jwt_secret = "test-secret".to_string();
        config.security.admin_email = ADMIN_EMAIL.to_string();
        config.security.admin_password = ADMIN_PASSWORD.to_string();
        config.security.require_auth = require_auth;
        config.api.max_page_size = 50;
        config
    }

    fn test_app(require_auth: bool) -> Router {
        app(AppState::new(test_config(require_auth), Arc::new(InMemoryPersonRepository::new())))
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_person(app: &Router, body: Value) -> String {
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/v1/person/create", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        body["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn create_then_get_returns_person() {
        let app = test_app(false);
        let id = create_person(&app, json!({ "name": "Ana", "age": 30, "hobbies": ["chess"] })).await;

        let response = app
            .oneshot(empty_request(Method::GET, &format!("/api/v1/person/{}", id)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Person retrieved successfully");
        assert_eq!(body["data"], json!({ "id": id, "name": "Ana", "age": 30, "hobbies": ["chess"] }));
    }

    #[tokio::test]
    async fn create_rejects_bad_bodies() {
        let app = test_app(false);

        let malformed = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/person/create")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(malformed).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "success": false, "message": "Invalid request body" })
        );

        let blank_name = json_request(Method::POST, "/api/v1/person/create", json!({ "name": "", "age": 3 }));
        let response = app.clone().oneshot(blank_name).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let negative_age = json_request(Method::POST, "/api/v1/person/create", json!({ "name": "Ana", "age": -1 }));
        let response = app.oneshot(negative_age).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_pages_and_clamps() {
        let app = test_app(false);
        for i in 0..5 {
            create_person(&app, json!({ "name": format!("p{}", i), "age": i, "hobbies": [] })).await;
        }

        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, "/api/v1/person?limit=2&offset=0"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["name"], "p4");

        let response = app
            .oneshot(empty_request(Method::GET, "/api/v1/person?limit=junk&offset=-1"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn update_and_delete_lifecycle() {
        let app = test_app(false);
        let id = create_person(&app, json!({ "name": "Ana", "age": 30, "hobbies": ["chess"] })).await;
        let uri = format!("/api/v1/person/{}", id);

        let response = app
            .clone()
            .oneshot(json_request(Method::PUT, &uri, json!({ "name": "Ana Maria", "age": 31, "hobbies": [] })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"], json!({ "id": id, "name": "Ana Maria", "age": 31, "hobbies": [] }));

        let response = app.clone().oneshot(empty_request(Method::DELETE, &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body.get("data").is_none());
        assert_eq!(body["message"], format!("Successfully deleted person with ID: {}", id));

        let response = app.clone().oneshot(empty_request(Method::GET, &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["success"], false);

        let response = app.oneshot(empty_request(Method::DELETE, &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_missing_person_is_not_found() {
        let app = test_app(false);
        let uri = format!("/api/v1/person/{}", uuid::Uuid::new_v4());

        let response = app
            .oneshot(json_request(Method::PUT, &uri, json!({ "name": "Ghost", "age": 1, "hobbies": [] })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_id_is_bad_request() {
        let app = test_app(false);
        let response = app
            .oneshot(empty_request(Method::GET, "/api/v1/person/not-a-uuid"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found_envelope() {
        let app = test_app(false);
        let response = app.oneshot(empty_request(Method::GET, "/api/v1/unknown")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "success": false, "message": "404 Not Found" }));
    }

    #[tokio::test]
    async fn login_checks_admin_credentials() {
        let app = test_app(false);

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/login", json!({ "email": ADMIN_EMAIL, "password": "wrong" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["success"], false);

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/login", json!({ "email": "", "password": "" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(json_request(Method::POST, "/login", json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
    }

    async fn login_token(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/login", json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })))
            .await
            .unwrap();
        body_json(response).await["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn person_routes_require_token_when_enabled() {
        let app = test_app(true);

        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, "/api/v1/person"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["success"], false);

        let token = login_token(&app).await;
        let request = Request::builder()
            .uri("/api/v1/person")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Unmatched routes still fall through to the 404 envelope
        let response = app.oneshot(empty_request(Method::GET, "/api/v1/unknown")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn whoami_echoes_token_subject() {
        let app = test_app(false);

        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, "/api/v1/auth/whoami"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let token = login_token(&app).await;
        let request = Request::builder()
            .uri("/api/v1/auth/whoami")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["subject"], ADMIN_EMAIL);
    }

    #[tokio::test]
    async fn options_short_circuits_with_cors_headers() {
        let app = test_app(true);
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/v1/person")
            .header(header::ORIGIN, "http://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn health_reports_backend() {
        let app = test_app(false);
        let response = app.oneshot(empty_request(Method::GET, "/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["backend"], "memory");
    }

    #[tokio::test]
    async fn create_accepts_json_without_content_type() {
        let app = test_app(false);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/person/create")
            .body(Body::from(r#"{"name":"Ana","age":30,"hobbies":["chess"]}"#))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let id = body_json(response).await["data"]["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(empty_request(Method::GET, &format!("/api/v1/person/{}", id)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["data"]["hobbies"], json!(["chess"]));
    }

    #[tokio::test]
    async fn null_hobbies_are_stored_as_empty() {
        let app = test_app(false);
        let id = create_person(&app, json!({ "name": "Ana", "age": 30, "hobbies": null })).await;
        let uri = format!("/api/v1/person/{}", id);

        let response = app.clone().oneshot(empty_request(Method::GET, &uri)).await.unwrap();
        assert_eq!(body_json(response).await["data"]["hobbies"], json!([]));

        let response = app
            .oneshot(json_request(Method::PUT, &uri, json!({ "name": "Ana", "age": 31, "hobbies": null })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["hobbies"], json!([]));
    }

    #[tokio::test]
    async fn login_accepts_json_without_content_type() {
        let app = test_app(false);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/login")
            .body(Body::from(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }).to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_list_returns_empty_array() {
        let app = test_app(false);
        let response = app.oneshot(empty_request(Method::GET, "/api/v1/person")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"], json!([]));
    }

    #[tokio::test]
    async fn options_answers_empty_200_without_cors() {
        let mut config = test_config(true);
        config.security.enable_cors = false;
        let app = app(AppState::new(config, Arc::new(InMemoryPersonRepository::new())));

        let response = app.oneshot(empty_request(Method::OPTIONS, "/api/v1/person")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    /// Store whose every call fails the way an unreachable database does
    struct UnreachableRepository;

    #[async_trait::async_trait]
    impl PersonRepository for UnreachableRepository {
        fn backend(&self) -> &'static str {
            "postgres"
        }

        async fn create(&self, _ctx: &RequestContext, _person: Person) -> Result<(), StorageError> {
            Err(StorageError::DeadlineExceeded { op: "create person" })
        }

        async fn get_all(&self, _ctx: &RequestContext, _page: Page) -> Result<Vec<Person>, StorageError> {
            Err(StorageError::Database { op: "list persons", source: sqlx::Error::PoolTimedOut })
        }

        async fn update(&self, _ctx: &RequestContext, _person: Person) -> Result<(), StorageError> {
            Err(StorageError::DeadlineExceeded { op: "update person" })
        }

        async fn delete(&self, _ctx: &RequestContext, _id: Uuid) -> Result<(), StorageError> {
            Err(StorageError::DeadlineExceeded { op: "delete person" })
        }

        async fn get_by_id(&self, _ctx: &RequestContext, _id: Uuid) -> Result<Person, StorageError> {
            Err(StorageError::DeadlineExceeded { op: "get person" })
        }

        async fn health_check(&self, _ctx: &RequestContext) -> Result<(), StorageError> {
            Err(StorageError::Database { op: "ping database", source: sqlx::Error::PoolTimedOut })
        }
    }

    fn unreachable_app() -> Router {
        app(AppState::new(test_config(false), Arc::new(UnreachableRepository)))
    }

    #[tokio::test]
    async fn health_is_unavailable_when_store_is_down() {
        let response = unreachable_app()
            .oneshot(empty_request(Method::GET, "/health"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body_json(response).await,
            json!({ "success": false, "message": "database unavailable" })
        );
    }

    #[tokio::test]
    async fn storage_failures_hide_details() {
        let response = unreachable_app()
            .oneshot(empty_request(Method::GET, "/api/v1/person"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let message = body_json(response).await["message"].as_str().unwrap().to_string();
        assert!(!message.contains("pool"), "leaked storage detail: {}", message);
        assert!(!message.contains("list persons"), "leaked storage detail: {}", message);
    }
}
