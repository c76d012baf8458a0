//! API handlers for the inspector server
//!
//! Provides REST endpoints for:
//! - Material analysis (pasted text or a page URL)
//! - Rendered reports
//! - Catalog listing

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use compliance_engine::report::{OutputFormat, Report, Reporter};
use serde::{Deserialize, Serialize};
use shared_types::{AnalysisResult, MaterialType};
use tracing::info;

use crate::error::ServerError;
use crate::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "inspector-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Catalog listing response
#[derive(Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub catalog_version: String,
    pub categories: Vec<CategoryInfo>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct CategoryInfo {
    pub id: &'static str,
    pub title: String,
    pub rule_count: usize,
}

/// Handler: GET /api/categories
pub async fn handle_list_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    let catalog = state.engine.catalog();
    let categories: Vec<CategoryInfo> = catalog
        .categories()
        .iter()
        .map(|c| CategoryInfo {
            id: c.category.as_str(),
            title: c.title.clone(),
            rule_count: c.rules().len(),
        })
        .collect();

    let count = categories.len();

    Json(CategoriesResponse {
        success: true,
        catalog_version: catalog.version().to_string(),
        categories,
        count,
    })
}

/// Material to analyze: exactly one of `text` or `url`
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: Option<String>,

    /// Page to fetch; implies material type `site`
    pub url: Option<String>,

    /// `site`, `text` or `card`
    pub material_type: Option<String>,

    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Analysis response
#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub result: AnalysisResult,
}

/// Report request body
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(flatten)]
    pub material: AnalyzeRequest,

    /// "markdown", "html", "json" or "json-pretty"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "markdown".to_string()
}

/// Text ready for the engine
struct Material {
    text: String,
    material_type: MaterialType,
    metadata: BTreeMap<String, String>,
}

async fn load_material(state: &AppState, req: AnalyzeRequest) -> Result<Material, ServerError> {
    let requested_type = req
        .material_type
        .as_deref()
        .map(str::parse::<MaterialType>)
        .transpose()
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
    let mut metadata = req.metadata;

    match (req.text, req.url) {
        (Some(text), None) => Ok(Material {
            text,
            material_type: requested_type.unwrap_or_default(),
            metadata,
        }),
        (None, Some(url)) => {
            let page = state.fetcher.fetch(&url).await?;
            metadata.insert("url".to_string(), page.url);
            if let Some(title) = page.title {
                metadata.entry("title".to_string()).or_insert(title);
            }
            Ok(Material {
                text: page.text,
                material_type: requested_type.unwrap_or(MaterialType::Site),
                metadata,
            })
        }
        (Some(_), Some(_)) => Err(ServerError::InvalidRequest(
            "Provide either 'text' or 'url', not both".to_string(),
        )),
        (None, None) => Err(ServerError::InvalidRequest(
            "Either 'text' or 'url' is required".to_string(),
        )),
    }
}

/// Handler: POST /api/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ServerError> {
    let material = load_material(&state, req).await?;
    let result = state
        .engine
        .analyze(&material.text, material.material_type, material.metadata);

    info!(
        "Analysis: type={}, verdict={}, violations={}",
        result.material_type, result.verdict, result.total_violations
    );

    Ok(Json(AnalyzeResponse {
        success: true,
        result,
    }))
}

/// Handler: POST /api/report
pub async fn handle_report(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> Result<Response, ServerError> {
    let format: OutputFormat = req.format.parse().map_err(ServerError::InvalidRequest)?;
    let material = load_material(&state, req.material).await?;
    let result = state
        .engine
        .analyze(&material.text, material.material_type, material.metadata);

    let report = Report::new(&result, &material.text, Local::now().date_naive());
    let body = Reporter::for_engine(format, &state.engine).format(&report)?;

    info!(
        "Report: format={:?}, verdict={}, bytes={}",
        format,
        result.verdict,
        body.len()
    );

    Ok(([(header::CONTENT_TYPE, format.content_type())], body).into_response())
}
