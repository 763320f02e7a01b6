pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::render::handlers as render;
use crate::state::AppState;
use crate::summary::handlers as summary;

async fn method_not_allowed() -> Result<(), AppError> {
    Err(AppError::MethodNotAllowed)
}

async fn not_found(uri: Uri) -> Result<(), AppError> {
    Err(AppError::NotFound(format!("No route for {uri}")))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume rendering
        .route("/api/v1/resume/blocks", post(render::handle_blocks))
        .route("/api/v1/resume/preview", post(render::handle_preview))
        .route("/api/v1/resume/export", post(render::handle_export))
        .route("/api/v1/resume/summary", post(summary::handle_summarize_record))
        // Summary proxy used by the form
        .route(
            "/api/generate-summary",
            post(summary::handle_generate_summary).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::layout::a4_page_config;
    use crate::render::test_support::full_record;
    use crate::summary::fallback::FixedPicker;
    use crate::summary::service::UnconfiguredBackend;
    use crate::summary::SummaryService;

    fn app() -> Router {
        build_router(AppState {
            config: Config {
                port: 0,
                rust_log: "info".to_string(),
                groq_api_key: None,
            },
            summaries: SummaryService::new(Arc::new(UnconfiguredBackend), Arc::new(FixedPicker(0))),
            page_config: a4_page_config(),
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn record_json() -> Value {
        serde_json::to_value(full_record()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["llmConfigured"], false);
    }

    #[tokio::test]
    async fn test_blocks_endpoint_returns_sections_in_order() {
        let response = app()
            .oneshot(post_json("/api/v1/resume/blocks", record_json()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(
            body["selectedSections"],
            json!([
                "summary",
                "experience",
                "education",
                "skills",
                "projects",
                "achievements",
                "certifications"
            ])
        );
        assert_eq!(body["header"][0]["type"], "heading");
        assert_eq!(body["header"][0]["text"], "JANE DOE");
    }

    #[tokio::test]
    async fn test_blocks_accepts_camel_case_and_missing_fields() {
        let body = json!({
            "personalInfo": { "name": "Jane Doe", "email": "j@x.com" },
            "skills": "A\nB\n\nC"
        });
        let response = app()
            .oneshot(post_json("/api/v1/resume/blocks", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["selectedSections"], json!(["skills"]));
        assert_eq!(body["sections"][0]["blocks"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_blank_name_rejected_with_validation_error() {
        let mut record = record_json();
        record["personalInfo"]["name"] = json!("  ");

        for uri in [
            "/api/v1/resume/blocks",
            "/api/v1/resume/preview",
            "/api/v1/resume/export",
        ] {
            let response = app().oneshot(post_json(uri, record.clone())).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_preview_endpoint() {
        let response = app()
            .oneshot(post_json("/api/v1/resume/preview", record_json()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert!(body["html"].as_str().unwrap().contains("JANE DOE"));
        assert!(body["estimatedHeight"].as_f64().unwrap() > 0.0);
        assert!(body["advisory"].is_null());
    }

    #[tokio::test]
    async fn test_export_endpoint_returns_pdf_attachment() {
        let response = app()
            .oneshot(post_json("/api/v1/resume/export", record_json()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .starts_with("attachment; filename=\"Jane_Doe_Resume.pdf\""));
        assert_eq!(response.headers()[&render::OVERFLOW_HEADER], "false");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[tokio::test]
    async fn test_record_summary_uses_fallback_without_key() {
        let response = app()
            .oneshot(post_json("/api/v1/resume/summary", record_json()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["source"], "fallback");
        assert!(body["summary"]
            .as_str()
            .unwrap()
            .starts_with("Dedicated professional with expertise in Rust, PostgreSQL, Kubernetes."));
    }

    #[tokio::test]
    async fn test_generate_summary_requires_prompt() {
        let response = app()
            .oneshot(post_json("/api/generate-summary", json!({ "prompt": "" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["message"], "Prompt is required");

        let response = app()
            .oneshot(post_json("/api/generate-summary", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_summary_with_prompt() {
        let response = app()
            .oneshot(post_json(
                "/api/generate-summary",
                json!({ "prompt": "Skills: Go, SQL" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(json_body(response).await["summary"]
            .as_str()
            .unwrap()
            .contains("expertise in Go, SQL."));
    }

    #[tokio::test]
    async fn test_generate_summary_rejects_other_methods() {
        let response = app()
            .oneshot(
                Request::get("/api/generate-summary")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json_body(response).await["error"]["code"], "METHOD_NOT_ALLOWED");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = app()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }
}
