//! HTTP Server for the sheetview API.
//!
//! Provides REST endpoints that fetch the configured sheets and return
//! rendered display tables. Rendering to HTML is left to the client.
//!
//! # API Endpoints
//!
//! | Method | Path                   | Description                       |
//! |--------|------------------------|-----------------------------------|
//! | GET    | `/health`              | Health check                      |
//! | GET    | `/api/views`           | Render every configured view      |
//! | GET    | `/api/views/{id}`      | Render one view                   |
//! | GET    | `/api/views/{id}/csv`  | Render one view as CSV            |
//! | GET    | `/api/records/{key}`   | Detail record lookup              |
//! | GET    | `/api/logs`            | SSE stream for real-time logs     |

use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::get,
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, LOG_BROADCASTER};
use super::types::{error_response, RecordResponse, ViewResponse, ViewsResponse};
use crate::config::AppConfig;
use crate::error::{PipelineError, ServerResult};
use crate::export::to_csv;
use crate::fetch::SheetClient;
use crate::transform::pipeline::{
    load_record, load_view, load_views, LOAD_FAILED_MESSAGE, RECORD_NOT_FOUND_MESSAGE,
};

/// Shared, read-only server state.
pub struct AppState {
    pub config: AppConfig,
    pub client: SheetClient,
}

type SharedState = Arc<AppState>;
type ApiError = (StatusCode, Json<Value>);

/// Build the router without binding a socket.
pub fn router(config: AppConfig) -> Router {
    let state = Arc::new(AppState {
        config,
        client: SheetClient::new(),
    });

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/views", get(list_views))
        .route("/api/views/{id}", get(get_view))
        .route("/api/views/{id}/csv", get(get_view_csv))
        .route("/api/records/{key}", get(get_record))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(config: AppConfig, port: u16) -> ServerResult<()> {
    let view_count = config.views.len();
    let app = router(config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Sheetview server running on http://localhost:{}", port);
    println!("   GET  /api/views          - Render {} views", view_count);
    println!("   GET  /api/views/:id      - Render one view");
    println!("   GET  /api/views/:id/csv  - Render one view as CSV");
    println!("   GET  /api/records/:key   - Detail record");
    println!("   GET  /api/logs           - SSE log stream");
    println!("   GET  /health             - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// HTTP status for a failed render or lookup.
fn status_for(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::UnknownView(_) => StatusCode::NOT_FOUND,
        PipelineError::Fetch(_) | PipelineError::Csv(_) => StatusCode::BAD_GATEWAY,
        PipelineError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(error: PipelineError) -> ApiError {
    log_error(error.to_string());
    let status = status_for(&error);
    let message = if status == StatusCode::BAD_GATEWAY {
        LOAD_FAILED_MESSAGE.to_string()
    } else {
        error.to_string()
    };
    (status, Json(error_response(&message)))
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<Value> {
    let views: Vec<&str> = state.config.views.iter().map(|v| v.id.as_str()).collect();
    Json(json!({
        "status": "ok",
        "service": "sheetview",
        "version": env!("CARGO_PKG_VERSION"),
        "views": views,
        "records": state.config.record.is_some(),
    }))
}

async fn list_views(State(state): State<SharedState>) -> Result<Json<ViewsResponse>, ApiError> {
    let tables = load_views(&state.client, &state.config)
        .await
        .map_err(api_error)?;
    Ok(Json(ViewsResponse::from(tables)))
}

async fn get_view(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ViewResponse>, ApiError> {
    let table = load_view(&state.client, &state.config, &id)
        .await
        .map_err(api_error)?;
    Ok(Json(ViewResponse::from(table)))
}

async fn get_view_csv(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let table = load_view(&state.client, &state.config, &id)
        .await
        .map_err(api_error)?;
    let body = to_csv(&table).map_err(|e| {
        log_error(e.to_string());
        (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response(&e.to_string())))
    })?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body).into_response())
}

async fn get_record(
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> Result<Json<RecordResponse>, ApiError> {
    let record = load_record(&state.client, &state.config, &key)
        .await
        .map_err(api_error)?;

    match record {
        Some(record) => Ok(Json(RecordResponse::from(record))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(error_response(RECORD_NOT_FOUND_MESSAGE)),
        )),
    }
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, FetchError};

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&PipelineError::UnknownView("x".into())),
            StatusCode::NOT_FOUND
        );
        let fetch = PipelineError::Fetch(FetchError::Status {
            url: "u".into(),
            status: 500,
        });
        assert_eq!(status_for(&fetch), StatusCode::BAD_GATEWAY);
        let config = PipelineError::Config(ConfigError::Invalid("x".into()));
        assert_eq!(status_for(&config), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_fetch_failure_uses_localized_message() {
        let (status, Json(body)) = api_error(PipelineError::Fetch(FetchError::Body("eof".into())));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], LOAD_FAILED_MESSAGE);
    }

    #[test]
    fn test_router_builds() {
        let config = AppConfig::from_json(include_str!("../../configs/results.json")).unwrap();
        let _ = router(config);
    }

    #[tokio::test]
    async fn test_record_routes() {
        let sheet = crate::fetch::serve_sheet("Serial,Name,Class,Roll\n1,Rina Das,8,101\n").await;
        let config = AppConfig::from_value(json!({
            "tableUrl": format!("{}/sheet.csv", sheet),
            "recordUrl": format!("{}/sheet.csv", sheet),
            "views": [{ "id": "table1", "rowStart": 1, "rowEnd": 1, "columns": [1] }],
            "record": { "keyColumn": 3, "fields": ["serial", "name", "class", "roll"] }
        }))
        .unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(config)).await.unwrap();
        });

        let missing = reqwest::get(format!("http://{}/api/records/999", addr)).await.unwrap();
        assert_eq!(missing.status().as_u16(), 404);
        let body: Value = missing.json().await.unwrap();
        assert_eq!(body["error"], RECORD_NOT_FOUND_MESSAGE);

        let found = reqwest::get(format!("http://{}/api/records/101", addr)).await.unwrap();
        assert_eq!(found.status().as_u16(), 200);
    }
}
