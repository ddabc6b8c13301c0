//! HTTP client for published spreadsheet CSV exports.
//!
//! This is the only place that performs I/O against the network. Every
//! failure surfaces as a [`FetchError`]; there is no retry and no cache,
//! each call goes to the server again.

use crate::error::{FetchError, FetchResult, PipelineResult};
use crate::models::Grid;
use crate::parser::{decode_bytes, parse_grid};

/// Thin wrapper around a shared `reqwest::Client`.
#[derive(Clone, Default)]
pub struct SheetClient {
    http: reqwest::Client,
}

impl SheetClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Reuse an existing client (connection pool, proxy settings, ...).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// GET `url` and return the raw body.
    ///
    /// Non-2xx responses are errors, the body is not read.
    pub async fn fetch_bytes(&self, url: &str) -> FetchResult<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;
        Ok(body.to_vec())
    }

    /// GET `url` and decode the body as text, detecting its encoding.
    pub async fn fetch_text(&self, url: &str) -> PipelineResult<String> {
        let bytes = self.fetch_bytes(url).await?;
        Ok(decode_bytes(&bytes)?)
    }

    /// GET `url` and parse it as a CSV grid.
    pub async fn fetch_grid(&self, url: &str) -> PipelineResult<Grid> {
        let text = self.fetch_text(url).await?;
        Ok(parse_grid(&text))
    }
}

/// Serve `body` at `/sheet.csv` on a loopback port; any other path is a 404.
///
/// Returns the base URL.
#[cfg(test)]
pub(crate) async fn serve_sheet(body: &'static str) -> String {
    use axum::{routing::get, Router};

    let app = Router::new().route("/sheet.csv", get(move || async move { body }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
