//! Tests for the inspector server API
//!
//! Test categories:
//! - Endpoint tests against the full router (axum-test)
//! - Page fetching against a loopback site
//! - Property tests for request parsing and text extraction

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use compliance_engine::report::OutputFormat;
    use shared_types::MaterialType;

    use crate::source::extract_text;

    /// Tags that should vanish from extracted text
    fn tag() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("<p>"),
            Just("</p>"),
            Just("<div class=\"ad\">"),
            Just("<br/>"),
            Just("<span style=\"color:red\">"),
            Just("<!-- промо -->"),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: markup between words never survives extraction
        #[test]
        fn extract_text_keeps_words_only(
            words in prop::collection::vec("[а-яa-z0-9]{1,12}", 1..20),
            tags in prop::collection::vec(tag(), 20)
        ) {
            let html: String = words
                .iter()
                .zip(tags.iter())
                .map(|(w, t)| format!("{}{}", t, w))
                .collect();

            prop_assert_eq!(extract_text(&html), words.join(" "));
        }

        /// Property: material types parse regardless of case
        #[test]
        fn material_type_parse_ignores_case(
            kind in prop_oneof![Just("site"), Just("text"), Just("card")],
            upper in any::<bool>()
        ) {
            let input = if upper { kind.to_uppercase() } else { kind.to_string() };
            let parsed: MaterialType = input.parse().unwrap();
            prop_assert_eq!(parsed.as_str(), kind);
        }

        /// Property: unknown format names are rejected
        #[test]
        fn unknown_formats_rejected(name in "[a-z]{3,10}") {
            prop_assume!(!matches!(name.as_str(), "markdown" | "html" | "json"));
            prop_assert!(name.parse::<OutputFormat>().is_err());
        }
    }
}

#[cfg(test)]
mod api_tests {
    use std::sync::Arc;

    use axum::{
        http::StatusCode,
        response::{Html, IntoResponse},
        routing::get,
        Router,
    };
    use axum_test::TestServer;
    use compliance_engine::{AnalysisEngine, REQUIRED_DISCLAIMER};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::source::PageFetcher;
    use crate::{build_router, AppState};

    /// Create a test server with the full router
    fn create_test_server() -> TestServer {
        let state = AppState {
            engine: Arc::new(AnalysisEngine::builtin().unwrap()),
            fetcher: Arc::new(PageFetcher::direct()),
        };
        TestServer::new(build_router(state)).unwrap()
    }

    /// Serve a few advertising pages on a loopback port
    async fn spawn_site() -> String {
        let landing = format!(
            "<html><head><title>Банкротство &laquo;Под ключ&raquo;</title>\
             <script>track('спишем долги')</script></head>\
             <body><h1>Гарантируем списание долгов!</h1><footer>{}</footer></body></html>",
            REQUIRED_DISCLAIMER
        );
        let app = Router::new()
            .route("/landing", get(move || async move { Html(landing) }))
            .route(
                "/blank",
                get(|| async { Html("<html><script>var a = 1;</script></html>") }),
            )
            .route(
                "/missing",
                get(|| async { (StatusCode::NOT_FOUND, "not found").into_response() }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_health_returns_200() {
        let server = create_test_server();
        let response = server.get("/health").await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "inspector-server");
    }

    #[tokio::test]
    async fn test_categories_lists_catalog() {
        let server = create_test_server();
        let response = server.get("/api/categories").await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert!(json["success"].as_bool().unwrap());
        assert_eq!(json["count"], 8);
        assert_eq!(json["catalog_version"], "2026.1");
        assert_eq!(json["categories"][0]["id"], "guarantees");
        assert_eq!(json["categories"][0]["rule_count"], 7);
        assert_eq!(json["categories"][7]["id"], "any_cases");
    }

    #[tokio::test]
    async fn test_analyze_compliant_text() {
        let server = create_test_server();
        let response = server
            .post("/api/analyze")
            .json(&json!({ "text": REQUIRED_DISCLAIMER }))
            .await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert!(json["success"].as_bool().unwrap());
        assert_eq!(json["result"]["verdict"], "COMPLIANT");
        assert_eq!(json["result"]["material_type"], "text");
        assert_eq!(json["result"]["total_violations"], 0);
    }

    #[tokio::test]
    async fn test_analyze_reports_evidence() {
        let server = create_test_server();
        let text = format!("{} Гарантируем списание долгов", REQUIRED_DISCLAIMER);
        let response = server
            .post("/api/analyze")
            .json(&json!({ "text": text, "material_type": "card", "metadata": { "campaign": "spring" } }))
            .await;
        response.assert_status_ok();

        let result = &response.json::<serde_json::Value>()["result"];
        assert_eq!(result["verdict"], "NON_COMPLIANT");
        assert_eq!(result["material_type"], "card");
        assert_eq!(result["metadata"]["campaign"], "spring");
        assert_eq!(result["violations"]["guarantees"][0]["phrase"], "Гарантируем");
        assert_eq!(result["violations"]["money_back"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_analyze_empty_text_is_critical() {
        let server = create_test_server();
        let response = server.post("/api/analyze").json(&json!({ "text": "" })).await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["result"]["verdict"], "CRITICAL_VIOLATION");
    }

    #[tokio::test]
    async fn test_analyze_rejects_invalid_material_type() {
        let server = create_test_server();
        let response = server
            .post("/api/analyze")
            .json(&json!({ "text": "текст", "material_type": "billboard" }))
            .await;

        response.assert_status_bad_request();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["code"], "INVALID_REQUEST");
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_analyze_requires_exactly_one_source() {
        let server = create_test_server();

        let response = server.post("/api/analyze").json(&json!({})).await;
        response.assert_status_bad_request();

        let response = server
            .post("/api/analyze")
            .json(&json!({ "text": "текст", "url": "https://bankrot.example" }))
            .await;
        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_analyze_rejects_invalid_url() {
        let server = create_test_server();
        let response = server
            .post("/api/analyze")
            .json(&json!({ "url": "file:///etc/passwd" }))
            .await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<serde_json::Value>()["code"], "INVALID_URL");
    }

    #[tokio::test]
    async fn test_analyze_fetches_page() {
        let site = spawn_site().await;
        let server = create_test_server();
        let url = format!("{}/landing", site);

        let response = server.post("/api/analyze").json(&json!({ "url": url })).await;
        response.assert_status_ok();

        let result = &response.json::<serde_json::Value>()["result"];
        assert_eq!(result["material_type"], "site");
        assert_eq!(result["url"], url.as_str());
        assert_eq!(result["metadata"]["title"], "Банкротство «Под ключ»");
        assert_eq!(result["disclaimer"]["exact_match"], true);
        // Script content is not visible text
        assert_eq!(result["total_violations"], 2);
        assert_eq!(result["verdict"], "NON_COMPLIANT");
    }

    #[tokio::test]
    async fn test_unavailable_page_is_not_a_verdict() {
        let site = spawn_site().await;
        let server = create_test_server();

        let response = server
            .post("/api/analyze")
            .json(&json!({ "url": format!("{}/missing", site) }))
            .await;
        response.assert_status(StatusCode::BAD_GATEWAY);
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["code"], "SOURCE_UNAVAILABLE");
        assert!(json.get("result").is_none());

        let response = server
            .post("/api/analyze")
            .json(&json!({ "url": format!("{}/blank", site) }))
            .await;
        response.assert_status(StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_report_markdown() {
        let server = create_test_server();
        let response = server
            .post("/api/report")
            .json(&json!({ "text": "Деньги назад!" }))
            .await;
        response.assert_status_ok();

        assert_eq!(
            response.header("content-type").to_str().unwrap(),
            "text/markdown; charset=utf-8"
        );
        let body = response.text();
        assert!(body.contains("РЕКЛАМНЫЙ ИНСПЕКТОР"));
        assert!(body.contains("КРИТИЧЕСКИЕ НАРУШЕНИЯ"));
    }

    #[tokio::test]
    async fn test_report_html() {
        let server = create_test_server();
        let response = server
            .post("/api/report")
            .json(&json!({ "text": REQUIRED_DISCLAIMER, "format": "html" }))
            .await;
        response.assert_status_ok();

        assert_eq!(
            response.header("content-type").to_str().unwrap(),
            "text/html; charset=utf-8"
        );
        assert!(response.text().starts_with("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn test_report_json() {
        let server = create_test_server();
        let response = server
            .post("/api/report")
            .json(&json!({ "text": "Возьмите кредит", "format": "json" }))
            .await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["verdict"], "CRITICAL_VIOLATION");
        assert_eq!(json["violations"]["take_loans"][0]["phrase"], "Возьмите кредит");
    }

    #[tokio::test]
    async fn test_report_rejects_invalid_format() {
        let server = create_test_server();
        let response = server
            .post("/api/report")
            .json(&json!({ "text": "текст", "format": "pdf" }))
            .await;

        response.assert_status_bad_request();
    }
}
