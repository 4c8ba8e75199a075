//! HTTP API for the toolbox service.
//!
//! This module provides the REST API endpoints for:
//! - Liveness and store diagnostics
//! - Tool creation and listing
//! - Tool recommendation

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::service::ToolboxService;

pub mod diagnostics;
pub mod tools;
use diagnostics::{diagnostics_handler, root_handler};
use tools::{create_tool_handler, list_tools_handler, recommend_handler};

/// Application state
pub struct AppState {
    pub service: Arc<ToolboxService>,
}

/// Build the API router
pub fn router(service: Arc<ToolboxService>) -> Router {
    let state = Arc::new(AppState { service });

    // Fully open CORS. Origins and headers are mirrored rather than
    // wildcarded because a `*` origin cannot be combined with credentials.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let api_routes = Router::new()
        .route("/tools", get(list_tools_handler).post(create_tool_handler))
        .route("/recommend", get(recommend_handler));

    Router::new()
        .route("/", get(root_handler))
        .route("/test", get(diagnostics_handler))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        extract::Request,
        http::{StatusCode, header},
        response::Response,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::config::ServiceConfig;
    use crate::db::Database;
    use crate::error::{DatabaseError, ServiceResult};
    use crate::store::{DocumentStore, MemoryStore, RawDocument, StoreFilter};

    fn config() -> Arc<ServiceConfig> {
        Arc::new(ServiceConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            database_url: None,
            database_name: Some("toolbox".to_string()),
        })
    }

    fn app() -> Router {
        app_with(Arc::new(MemoryStore::new(Some("toolbox".to_string()))))
    }

    fn app_with(store: Arc<dyn DocumentStore>) -> Router {
        router(Arc::new(ToolboxService::new(store, config())))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn get(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_tool(app: &Router, payload: &Value) -> Response {
        let req = Request::builder()
            .method("POST")
            .uri("/api/tools")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(payload).unwrap()))
            .unwrap();
        app.clone().oneshot(req).await.unwrap()
    }

    fn names(body: &Value) -> Vec<&str> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect()
    }

    async fn seed(app: &Router) {
        let tools = [
            json!({"name": "Figma AI", "description": "design assistant", "tags": ["ui"],
                   "categories": ["design"], "pricing": "freemium"}),
            json!({"name": "Copilot", "description": "code completion", "tags": ["ide"],
                   "categories": ["coding"], "pricing": "paid"}),
            json!({"name": "Codeium", "description": "code completion", "tags": ["ide"],
                   "categories": ["coding"], "pricing": "free"}),
            json!({"name": "PDF Summarizer", "description": "summarize pdf documents",
                   "tags": ["pdf", "summary"], "categories": ["productivity"],
                   "pricing": "freemium"}),
            json!({"name": "Generic Chatbot", "description": "talks with you",
                   "categories": ["chat"], "pricing": "free"}),
        ];
        for tool in &tools {
            let response = post_tool(app, tool).await;
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    struct FailingStore;

    impl DocumentStore for FailingStore {
        fn create_document(&self, _kind: &str, _payload: RawDocument) -> ServiceResult<String> {
            Err(DatabaseError::Migration {
                message: "store offline".to_string(),
            }
            .into())
        }

        fn get_documents(
            &self,
            _kind: &str,
            _filter: &StoreFilter,
            _limit: usize,
        ) -> ServiceResult<Vec<RawDocument>> {
            Err(DatabaseError::Migration {
                message: "store offline".to_string(),
            }
            .into())
        }

        fn name(&self) -> Option<&str> {
            None
        }

        fn list_collections(&self) -> ServiceResult<Vec<String>> {
            Err(DatabaseError::Migration {
                message: "store offline".to_string(),
            }
            .into())
        }
    }

    #[tokio::test]
    async fn test_root_message() {
        let response = get(&app(), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"message": "AI Toolbox Backend Running"})
        );
    }

    #[tokio::test]
    async fn test_diagnostics_without_database() {
        let app = app();
        seed(&app).await;

        let response = get(&app, "/test").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["backend"], "✅ Running");
        assert_eq!(body["database"], "⚠️  Available but not initialized");
        assert_eq!(body["database_url"], "❌ Not Set");
        assert_eq!(body["database_name"], "✅ Set");
        assert_eq!(body["connection_status"], "Not Connected");
        assert_eq!(body["collections"], json!([]));
    }

    #[tokio::test]
    async fn test_diagnostics_lists_collections() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("toolbox.db"), None).unwrap();
        let app = app_with(Arc::new(db));
        seed(&app).await;

        let body = body_json(get(&app, "/test").await).await;
        assert_eq!(body["database"], "✅ Connected & Working");
        assert_eq!(body["connection_status"], "Connected");
        assert_eq!(body["collections"], json!(["tool"]));
    }

    #[tokio::test]
    async fn test_diagnostics_never_fails() {
        let response = get(&app_with(Arc::new(FailingStore)), "/test").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(
            body["database"],
            "⚠️  Connected but Error: Migration failed: store offline"
        );
        assert_eq!(body["collections"], json!([]));
    }

    #[tokio::test]
    async fn test_create_round_trip() {
        let app = app();
        let payload = json!({
            "name": "PDF Summarizer",
            "description": "summarize pdf documents",
            "tags": ["pdf", "summary"],
            "categories": ["productivity"],
            "pricing": "freemium",
            "use_cases": ["research papers"]
        });

        let response = post_tool(&app, &payload).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(!body["id"].as_str().unwrap().is_empty());

        let body = body_json(get(&app, "/api/tools").await).await;
        assert_eq!(body, json!([payload]));
    }

    #[tokio::test]
    async fn test_create_fills_missing_sequences() {
        let app = app();
        let response = post_tool(
            &app,
            &json!({"name": "Bare", "description": "nothing else", "pricing": "free"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(get(&app, "/api/tools").await).await;
        assert_eq!(body[0]["tags"], json!([]));
        assert_eq!(body[0]["categories"], json!([]));
        assert_eq!(body[0]["use_cases"], json!([]));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payloads() {
        let app = app();

        let response = post_tool(&app, &json!({"name": "No description", "pricing": "free"})).await;
        assert!(response.status().is_client_error());

        let response = post_tool(
            &app,
            &json!({"name": "", "description": "blank", "pricing": "free"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["detail"], "Tool name must not be empty");

        // Nothing was stored
        let body = body_json(get(&app, "/api/tools").await).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_list_filters_compose() {
        let app = app();
        seed(&app).await;

        let body = body_json(get(&app, "/api/tools?category=coding").await).await;
        assert_eq!(names(&body), vec!["Copilot", "Codeium"]);

        let body = body_json(get(&app, "/api/tools?category=coding&pricing=free").await).await;
        assert_eq!(names(&body), vec!["Codeium"]);

        let body = body_json(get(&app, "/api/tools?category=Coding").await).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_list_text_search() {
        let app = app();
        seed(&app).await;

        let body = body_json(get(&app, "/api/tools?q=PDF").await).await;
        assert_eq!(names(&body), vec!["PDF Summarizer"]);

        // Matches the "ide" tag
        let body = body_json(get(&app, "/api/tools?q=IDE&pricing=paid").await).await;
        assert_eq!(names(&body), vec!["Copilot"]);
    }

    #[tokio::test]
    async fn test_list_limit_bounds() {
        let app = app();
        seed(&app).await;

        let body = body_json(get(&app, "/api/tools?limit=1").await).await;
        assert_eq!(names(&body), vec!["Figma AI"]);

        // Text search runs after truncation
        let body = body_json(get(&app, "/api/tools?limit=1&q=pdf").await).await;
        assert_eq!(body, json!([]));

        for uri in ["/api/tools?limit=0", "/api/tools?limit=201"] {
            let response = get(&app, uri).await;
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        }

        let response = get(&app, "/api/tools?limit=lots").await;
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_recommend_requires_task() {
        let response = get(&app(), "/api/recommend?budget=free").await;
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_recommend_ranks_matching_tool_first() {
        let app = app();
        seed(&app).await;

        let body =
            body_json(get(&app, "/api/recommend?task=summarize+pdf+documents+quickly").await)
                .await;
        let ranked = names(&body);
        assert_eq!(ranked[0], "PDF Summarizer");
        assert_eq!(ranked.len(), 5);
    }

    #[tokio::test]
    async fn test_recommend_repeated_categories_and_budget() {
        let app = app();
        seed(&app).await;

        // No keyword overlap: category boost and budget decide
        let body = body_json(
            get(
                &app,
                "/api/recommend?task=zzz&categories=CODING&categories=chat&budget=free",
            )
            .await,
        )
        .await;
        assert_eq!(
            names(&body),
            vec![
                "Codeium",
                "Generic Chatbot",
                "Copilot",
                "Figma AI",
                "PDF Summarizer"
            ]
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let app = app_with(Arc::new(FailingStore));

        let response = get(&app, "/api/tools").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["detail"], "Migration failed: store offline");

        let response = post_tool(
            &app,
            &json!({"name": "X", "description": "y", "pricing": "free"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = get(&app, "/api/recommend?task=anything").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_with_credentials() {
        let request = Request::builder()
            .uri("/api/tools")
            .header(header::ORIGIN, "https://toolbox.example")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://toolbox.example"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }
}
