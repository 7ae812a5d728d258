pub mod generate;
pub mod health;
pub mod identity;
pub mod layouts;
pub mod resumes;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Record store
        .route(
            "/api/v1/resumes",
            post(resumes::handle_create).get(resumes::handle_list),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get)
                .patch(resumes::handle_update)
                .delete(resumes::handle_delete),
        )
        .route(
            "/api/v1/resumes/:id/sections/:section",
            put(resumes::handle_write_section),
        )
        .route("/api/v1/resumes/:id/preview", get(resumes::handle_preview))
        .route("/api/v1/layouts", get(layouts::handle_list_layouts))
        // Text generation
        .route("/api/v1/generate", post(generate::handle_generate))
        // Share view
        .route("/my-resume/:id/view", get(resumes::handle_view))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use rstest::rstest;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::Config;
    use crate::store::MemoryStore;
    use crate::test_support::ScriptedGenerator;

    fn app_with(store: Arc<MemoryStore>) -> Router {
        build_router(AppState {
            store,
            generator: Arc::new(ScriptedGenerator::new(["  Generated copy.  "])),
            config: Config {
                database_url: None,
                anthropic_api_key: "test".into(),
                port: 0,
                rust_log: "info".into(),
                public_base_url: "https://cv.example.com".into(),
            },
        })
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        request_as("ada@example.com", method, uri, body)
    }

    fn request_as(email: &str, method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-user-email", email)
            .header("x-user-name", "Ada Lovelace");
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router, title: &str) -> Uuid {
        let response = app
            .clone()
            .oneshot(request("POST", "/api/v1/resumes", Some(json!({ "title": title }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        body["documentId"].as_str().unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_signed_out_requests_are_rejected() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let response = app
            .oneshot(Request::get("/api/v1/resumes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_create_then_list_and_get() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store);
        let id = create(&app, "  Backend Engineer ").await;

        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/resumes", None))
            .await
            .unwrap();
        let list = json_body(response).await;
        assert_eq!(list[0]["title"], "Backend Engineer");

        let response = app
            .oneshot(request("GET", &format!("/api/v1/resumes/{id}"), None))
            .await
            .unwrap();
        let doc = json_body(response).await;
        assert_eq!(doc["documentId"], id.to_string());
        assert_eq!(doc["themeColor"], "#1E293B");
        assert_eq!(doc["layout"], "default");
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let response = app
            .oneshot(request("POST", "/api/v1/resumes", Some(json!({ "title": "  " }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_section_write_stores_encoded_list() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone());
        let id = create(&app, "Backend").await;

        let body = json!({ "skills": [{ "name": "Go" }, { "name": "Rust" }] });
        let response = app
            .oneshot(request(
                "PUT",
                &format!("/api/v1/resumes/{id}/sections/skills"),
                Some(body),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["skills"][1]["name"], "Rust");
        assert_eq!(
            store.raw_field(id, "skills").await.as_deref(),
            Some(r#"[{"name":"Go"},{"name":"Rust"}]"#)
        );
    }

    #[rstest]
    #[case("experience", json!({ "experience": [{ "title": "Engineer" }] }), StatusCode::BAD_REQUEST)]
    #[case("skills", json!({ "skills": [] }), StatusCode::BAD_REQUEST)]
    #[case("awards", json!({}), StatusCode::NOT_FOUND)]
    #[case("summary", json!({ "summary": "Ships things." }), StatusCode::OK)]
    #[tokio::test]
    async fn test_section_write_outcomes(
        #[case] section: &str,
        #[case] body: Value,
        #[case] status: StatusCode,
    ) {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone());
        let id = create(&app, "Backend").await;
        let writes = store.write_count();

        let response = app
            .oneshot(request(
                "PUT",
                &format!("/api/v1/resumes/{id}/sections/{section}"),
                Some(body),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), status);
        if status != StatusCode::OK {
            assert_eq!(store.write_count(), writes);
        }
    }

    #[tokio::test]
    async fn test_patch_validates_presentation() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let id = create(&app, "Backend").await;
        let uri = format!("/api/v1/resumes/{id}");

        let bad = app
            .clone()
            .oneshot(request("PATCH", &uri, Some(json!({ "themeColor": "teal" }))))
            .await
            .unwrap();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let unknown = app
            .clone()
            .oneshot(request("PATCH", &uri, Some(json!({ "layout": "layout-zigzag" }))))
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

        let ok = app
            .oneshot(request(
                "PATCH",
                &uri,
                Some(json!({ "layout": "layout-clean-sectioned", "enableHrLines": true })),
            ))
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
        let doc = json_body(ok).await;
        assert_eq!(doc["layout"], "layout-clean-sectioned");
        assert_eq!(doc["enableHrLines"], true);
    }

    #[tokio::test]
    async fn test_preview_and_share_view() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone());
        let id = create(&app, "Backend").await;
        let personal = json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "jobTitle": "Engineer",
            "address": "London",
            "phone": "555-0100",
            "email": "ada@example.com"
        });
        app.clone()
            .oneshot(request(
                "PUT",
                &format!("/api/v1/resumes/{id}/sections/personal"),
                Some(personal),
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(request("GET", &format!("/api/v1/resumes/{id}/preview"), None))
            .await
            .unwrap();
        let preview = json_body(response).await;
        assert_eq!(
            preview["shareUrl"],
            format!("https://cv.example.com/my-resume/{id}/view")
        );
        assert_eq!(preview["tree"]["layout"], "default");

        let response = app
            .oneshot(Request::get(format!("/my-resume/{id}/view")).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("<title>Ada Lovelace</title>"));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let id = create(&app, "Backend").await;
        let uri = format!("/api/v1/resumes/{id}");

        let response = app.clone().oneshot(request("DELETE", &uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = app.oneshot(request("GET", &uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[case("PATCH", "", Some(json!({ "title": "Mine now" })))]
    #[case("PUT", "/sections/summary", Some(json!({ "summary": "Overwritten." })))]
    #[case("DELETE", "", None)]
    #[tokio::test]
    async fn test_other_users_cannot_modify_resume(
        #[case] method: &str,
        #[case] suffix: &str,
        #[case] body: Option<Value>,
    ) {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone());
        let id = create(&app, "Backend").await;
        let writes = store.write_count();
        let uri = format!("/api/v1/resumes/{id}{suffix}");

        let response = app
            .clone()
            .oneshot(request_as("mallory@example.com", method, &uri, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.write_count(), writes);

        let response = app
            .oneshot(request("GET", &format!("/api/v1/resumes/{id}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let doc = json_body(response).await;
        assert_eq!(doc["title"], "Backend");
        assert_eq!(doc["summary"], "");
    }

    #[tokio::test]
    async fn test_owner_email_match_ignores_case() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let id = create(&app, "Backend").await;
        let response = app
            .oneshot(request_as(
                "ADA@Example.com",
                "DELETE",
                &format!("/api/v1/resumes/{id}"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_generate_returns_trimmed_text() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let response = app
            .oneshot(request(
                "POST",
                "/api/v1/generate",
                Some(json!({ "prompt": "Write a summary" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["text"], "Generated copy.");
    }

    #[tokio::test]
    async fn test_layout_catalogue() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let response = app
            .oneshot(Request::get("/api/v1/layouts").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["layouts"].as_array().unwrap().len(), 7);
        assert_eq!(body["layouts"][0]["id"], "default");
        assert_eq!(body["themePalette"].as_array().unwrap().len(), 20);
    }
}
