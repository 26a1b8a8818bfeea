// JMA Forecast Viewer - Web Server
// REST API over the area catalog and forecast extractor

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Local};
use jma_forecast::{
    load_catalog, load_forecast, telemetry, AreaCatalog, AreaEntry, Config, DisplayRecord,
    FetchError, JmaClient, RenderedLine,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
struct AppState {
    client: Arc<JmaClient>,
    catalog: Arc<AreaCatalog>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    fn failed(data: T, error: String) -> Self {
        Self {
            success: false,
            data,
            error: Some(error),
        }
    }
}

#[derive(Deserialize)]
struct AreaQuery {
    q: Option<String>,
}

/// Forecast response: structured records plus their rendered lines
#[derive(Serialize, Default)]
struct ForecastResponse {
    code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    area: Option<AreaEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fetched_at: Option<DateTime<Local>>,
    records: Vec<DisplayRecord>,
    lines: Vec<RenderedLine>,
}

impl ForecastResponse {
    fn new(code: String, area: Option<AreaEntry>, records: Vec<DisplayRecord>) -> Self {
        let lines = records.iter().map(RenderedLine::from).collect();
        Self {
            code,
            area,
            fetched_at: None,
            records,
            lines,
        }
    }

    fn fetched_now(mut self) -> Self {
        self.fetched_at = Some(Local::now());
        self
    }
}

fn status_for(err: &FetchError) -> StatusCode {
    match err {
        FetchError::InvalidCode(_) => StatusCode::BAD_REQUEST,
        FetchError::Status { status: 404, .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/areas?q= - Sorted area list, optionally filtered
async fn get_areas(State(state): State<AppState>, Query(query): Query<AreaQuery>) -> impl IntoResponse {
    let areas: Vec<AreaEntry> = state
        .catalog
        .search(query.q.as_deref().unwrap_or_default())
        .into_iter()
        .cloned()
        .collect();

    Json(ApiResponse::ok(areas))
}

/// GET /api/forecast/:code - Display records for one area
async fn get_forecast(State(state): State<AppState>, Path(code): Path<String>) -> impl IntoResponse {
    let area = state.catalog.find(&code).cloned();
    let client = state.client.clone();
    let lookup_code = code.clone();

    let result = tokio::task::spawn_blocking(move || load_forecast(&*client, &lookup_code)).await;

    match result {
        Ok(Ok(records)) => (
            StatusCode::OK,
            Json(ApiResponse::ok(ForecastResponse::new(code, area, records).fetched_now())),
        )
            .into_response(),
        Ok(Err(err)) => {
            error!(code = %code, error = %err, "forecast fetch failed");
            (
                status_for(&err),
                Json(ApiResponse::failed(
                    ForecastResponse::new(code, area, Vec::new()),
                    format!("[ERROR] FAILED TO LOAD WEATHER DATA: {}", err),
                )),
            )
                .into_response()
        }
        Err(join_err) => {
            error!(code = %code, error = %join_err, "forecast task panicked");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failed(
                    ForecastResponse::default(),
                    "internal error".to_string(),
                )),
            )
                .into_response()
        }
    }
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/areas", get(get_areas))
        .route("/forecast/:code", get(get_forecast))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init("info").context("Failed to install log subscriber")?;

    println!("🌐 JMA Forecast Viewer - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = Config::from_env()?;
    let addr = config.server_addr.clone();
    let client = Arc::new(JmaClient::new(config));

    // Area list is fetched once and shared by every request
    let catalog_client = client.clone();
    let catalog = match tokio::task::spawn_blocking(move || load_catalog(&*catalog_client)).await? {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("❌ [ERROR] FAILED TO LOAD AREA LIST: {}", err);
            std::process::exit(1);
        }
    };
    println!("✓ Area list loaded: {} areas", catalog.len());

    let state = AppState {
        client,
        catalog: Arc::new(catalog),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/areas", addr);
    println!("        http://{}/api/forecast/130000", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&FetchError::InvalidCode("x/y".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&FetchError::Status { url: "u".into(), status: 404 }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&FetchError::Status { url: "u".into(), status: 500 }),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_forecast_response_carries_lines() {
        let response = ForecastResponse::new(
            "130000".to_string(),
            None,
            vec![DisplayRecord::AreaHeader { name: "東京都".to_string() }, DisplayRecord::Separator],
        );

        assert_eq!(response.lines.len(), 2);
        assert_eq!(response.lines[0].text, ">> 東京都 <<");

        let json = serde_json::to_value(ApiResponse::ok(response)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["records"][1]["kind"], "separator");
        assert!(json.get("error").is_none());
        assert!(json["data"].get("fetched_at").is_none());
    }

    #[test]
    fn test_fetched_forecast_carries_timestamp() {
        let response = ForecastResponse::new("130000".to_string(), None, Vec::new()).fetched_now();

        let json = serde_json::to_value(&response).unwrap();
        let stamp = json["fetched_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    }
}
