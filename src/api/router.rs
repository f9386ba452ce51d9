//! HTTP router.
//!
//! Returns a composable `Router` with every endpoint nested under `/api/`.
//!
//! Layers (outermost → innermost): CORS → body limit → access log → handler.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::{ApiContext, MAX_UPLOAD_BYTES};

/// Build the API router over a prepared context.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/symptoms", get(endpoints::symptoms::catalog))
        .route("/predict", post(endpoints::predict::predict))
        .route("/analyze-report", post(endpoints::reports::analyze))
        .route("/predictions/history", get(endpoints::history::predictions))
        .route("/predictions/stats", get(endpoints::history::stats))
        .route("/predictions/:id", get(endpoints::history::prediction_detail))
        .route("/reports/history", get(endpoints::history::reports))
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .layer(axum::middleware::from_fn(middleware::access_log::log_access))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    use crate::engine::{AssessmentService, Predictor, LOCAL_MODEL_TAG};
    use crate::history::HistoryStore;
    use crate::upstream::client::MockCompletionClient;
    use crate::upstream::RemoteModel;

    const BOUNDARY: &str = "----medipredict-test-boundary";

    fn local_ctx() -> ApiContext {
        ApiContext::new(AssessmentService::local_only(), HistoryStore::new(100))
    }

    fn ctx_with_remote(remote: impl Predictor + 'static) -> ApiContext {
        ApiContext::new(
            AssessmentService::with_remote(Box::new(remote)),
            HistoryStore::new(100),
        )
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    /// Multipart body: `(field name, Some(file name) for file parts, content)`.
    fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, file_name, content) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match file_name {
                Some(f) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri("/api/analyze-report")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_reports_upstream_state() {
        let app = api_router(local_ctx());
        let response = app.oneshot(get_request("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["upstream_enabled"], false);
    }

    #[tokio::test]
    async fn symptom_catalog_lists_categories() {
        let app = api_router(local_ctx());
        let response = app.oneshot(get_request("/api/symptoms")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["dermatological"], serde_json::json!(["rash"]));
    }

    #[tokio::test]
    async fn predict_returns_flattened_result() {
        let app = api_router(local_ctx());
        let req = json_request(
            "POST",
            "/api/predict",
            serde_json::json!({"symptoms": ["Rash"], "additionalInfo": "itchy"}),
        );
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["diseases"][0]["name"], "Allergic Reaction");
        assert_eq!(json["diseases"][0]["probability"], 79.0);
        assert_eq!(json["urgency"], "medium");
        assert_eq!(json["confidence_score"], 100);
        assert_eq!(json["aiModel"], LOCAL_MODEL_TAG);
        assert_eq!(json["savedToHistory"], true);
        assert!(json["id"].is_string());
    }

    #[tokio::test]
    async fn predict_unknown_symptoms_uses_generic_fallback() {
        let app = api_router(local_ctx());
        let req = json_request(
            "POST",
            "/api/predict",
            serde_json::json!({"symptoms": ["hiccups"]}),
        );
        let json = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(json["diseases"].as_array().unwrap().len(), 3);
        assert_eq!(json["confidence_score"], 70);
        assert_eq!(json["urgency"], "low");
    }

    #[tokio::test]
    async fn predict_rejects_empty_symptoms() {
        let app = api_router(local_ctx());
        let req = json_request("POST", "/api/predict", serde_json::json!({"symptoms": ["  "]}));
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn predict_rejects_too_many_symptoms() {
        let app = api_router(local_ctx());
        let symptoms: Vec<String> = (0..51).map(|i| format!("symptom {i}")).collect();
        let req = json_request("POST", "/api/predict", serde_json::json!({"symptoms": symptoms}));
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn predict_uses_remote_model_when_it_answers() {
        let reply = r#"{"diseases":[{"name":"Influenza","probability":82,"description":"Viral"}],
            "medications":[],"recommendations":["Rest"],"urgency":"medium","confidence_score":80}"#;
        let remote = RemoteModel::new(MockCompletionClient::new(reply), "groq-llama3");
        let app = api_router(ctx_with_remote(remote));
        let req = json_request("POST", "/api/predict", serde_json::json!({"symptoms": ["fever"]}));
        let json = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(json["aiModel"], "groq-llama3");
        assert_eq!(json["diseases"][0]["name"], "Influenza");
    }

    #[tokio::test]
    async fn predict_degrades_when_remote_fails() {
        let remote = RemoteModel::new(MockCompletionClient::failing(), "groq-llama3");
        let app = api_router(ctx_with_remote(remote));
        let req = json_request("POST", "/api/predict", serde_json::json!({"symptoms": ["rash"]}));
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["aiModel"], LOCAL_MODEL_TAG);
        assert_eq!(json["diseases"][0]["name"], "Allergic Reaction");
    }

    #[tokio::test]
    async fn analyze_xray_tuberculosis_is_critical() {
        let app = api_router(local_ctx());
        let req = multipart_request(&[
            ("report_type", None, "xray"),
            ("additional_notes", None, "Suspected tuberculosis, night sweats"),
            ("file_0", Some("chest.png"), "\u{89}PNG fake bytes"),
        ]);
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["urgency"], "high");
        assert_eq!(json["findings"][0]["severity"], "critical");
        assert!(json["reportType"].as_str().unwrap().contains("Tuberculosis"));
        assert_eq!(json["aiModel"], LOCAL_MODEL_TAG);
        assert_eq!(json["savedToHistory"], true);
    }

    #[tokio::test]
    async fn analyze_unknown_type_returns_document_review() {
        let app = api_router(local_ctx());
        let req = multipart_request(&[
            ("report_type", None, "dental_scan"),
            ("file_0", Some("a.pdf"), "x"),
            ("file_1", Some("b.pdf"), "y"),
        ]);
        let json = body_json(app.oneshot(req).await.unwrap()).await;
        let findings = json["findings"].as_array().unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0]["category"], "Document Review");
        assert_eq!(json["urgency"], "low");
    }

    #[tokio::test]
    async fn analyze_without_files_is_rejected() {
        let app = api_router(local_ctx());
        let req = multipart_request(&[("report_type", None, "xray")]);
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn analyze_rejects_too_many_files() {
        let app = api_router(local_ctx());
        let names: Vec<String> = (0..21).map(|i| format!("file_{i}")).collect();
        let mut parts: Vec<(&str, Option<&str>, &str)> = vec![("report_type", None, "ecg")];
        parts.extend(names.iter().map(|n| (n.as_str(), Some("trace.pdf"), "data")));
        let response = app.oneshot(multipart_request(&parts)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn history_lists_stores_and_fetches() {
        let ctx = local_ctx();

        for symptoms in [vec!["rash"], vec!["headache"]] {
            let app = api_router(ctx.clone());
            let req =
                json_request("POST", "/api/predict", serde_json::json!({"symptoms": symptoms}));
            assert_eq!(app.oneshot(req).await.unwrap().status(), StatusCode::OK);
        }

        let app = api_router(ctx.clone());
        let json = body_json(
            app.oneshot(get_request("/api/predictions/history?page=1&page_size=1"))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(json["count"], 2);
        assert_eq!(json["page_size"], 1);
        assert_eq!(json["results"][0]["symptoms"][0], "headache");
        assert_eq!(json["results"][0]["top_disease"]["name"], "Tension Headache");

        let id = json["results"][0]["id"].as_str().unwrap().to_string();
        let app = api_router(ctx.clone());
        let response = app
            .oneshot(get_request(&format!("/api/predictions/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let record = body_json(response).await;
        assert_eq!(record["ai_model"], LOCAL_MODEL_TAG);

        let app = api_router(ctx);
        let stats = body_json(app.oneshot(get_request("/api/predictions/stats")).await.unwrap()).await;
        assert_eq!(stats["total_predictions"], 2);
        assert_eq!(stats["urgency_breakdown"]["medium"], 1);
        assert_eq!(stats["urgency_breakdown"]["low"], 1);
    }

    #[tokio::test]
    async fn unknown_prediction_is_404() {
        let app = api_router(local_ctx());
        let uri = format!("/api/predictions/{}", uuid::Uuid::new_v4());
        let response = app.oneshot(get_request(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_prediction_id_is_400() {
        let app = api_router(local_ctx());
        let response = app
            .oneshot(get_request("/api/predictions/not-a-uuid"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn report_history_lists_analyses() {
        let ctx = local_ctx();
        let app = api_router(ctx.clone());
        let req = multipart_request(&[
            ("report_type", None, "blood_test"),
            ("additional_notes", None, "low hemoglobin"),
            ("file_0", Some("cbc.pdf"), "x"),
        ]);
        assert_eq!(app.oneshot(req).await.unwrap().status(), StatusCode::OK);

        let app = api_router(ctx);
        let json = body_json(app.oneshot(get_request("/api/reports/history")).await.unwrap()).await;
        assert_eq!(json["count"], 1);
        assert_eq!(json["results"][0]["report_type"], "blood_test");
        assert_eq!(json["results"][0]["file_count"], 1);
    }

    #[tokio::test]
    async fn zero_capacity_history_is_not_saved() {
        let ctx = ApiContext::new(AssessmentService::local_only(), HistoryStore::new(0));
        let app = api_router(ctx);
        let req = json_request("POST", "/api/predict", serde_json::json!({"symptoms": ["rash"]}));
        let json = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(json["savedToHistory"], false);
        assert!(json.get("id").is_none());
    }

    #[tokio::test]
    async fn huge_history_page_returns_empty_results() {
        let ctx = local_ctx();
        let app = api_router(ctx.clone());
        let req = json_request("POST", "/api/predict", serde_json::json!({"symptoms": ["rash"]}));
        assert_eq!(app.oneshot(req).await.unwrap().status(), StatusCode::OK);

        let app = api_router(ctx);
        let uri = format!("/api/predictions/history?page={}", usize::MAX);
        let response = app.oneshot(get_request(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["count"], 1);
        assert!(json["results"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_field_without_filename_is_not_an_attachment() {
        let app = api_router(local_ctx());
        let req = multipart_request(&[
            ("report_type", None, "xray"),
            ("file_0", None, "not a file"),
        ]);
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "No files uploaded");
    }

    #[tokio::test]
    async fn text_file_field_is_ignored_next_to_real_file() {
        let ctx = local_ctx();
        let app = api_router(ctx.clone());
        let req = multipart_request(&[
            ("report_type", None, "ecg"),
            ("file_0", None, "not a file"),
            ("file_1", Some("trace.pdf"), "data"),
        ]);
        assert_eq!(app.oneshot(req).await.unwrap().status(), StatusCode::OK);

        let app = api_router(ctx);
        let json = body_json(app.oneshot(get_request("/api/reports/history")).await.unwrap()).await;
        assert_eq!(json["results"][0]["file_count"], 1);
    }

    #[tokio::test]
    async fn long_inputs_are_stored_bounded() {
        let ctx = local_ctx();
        let app = api_router(ctx.clone());
        let req = json_request(
            "POST",
            "/api/predict",
            serde_json::json!({
                "symptoms": ["rash", "x".repeat(10_000)],
                "additionalInfo": "a".repeat(100_000),
            }),
        );
        let json = body_json(app.oneshot(req).await.unwrap()).await;
        let id = uuid::Uuid::parse_str(json["id"].as_str().unwrap()).unwrap();

        let record = ctx.history.prediction(&id).unwrap().unwrap();
        assert_eq!(
            record.additional_info.chars().count(),
            crate::upstream::MAX_NOTES_CHARS
        );
        assert!(record
            .symptoms
            .iter()
            .all(|s| s.chars().count() <= crate::api::types::MAX_SYMPTOM_CHARS));
        assert_eq!(record.symptoms[0], "rash");
    }
}
