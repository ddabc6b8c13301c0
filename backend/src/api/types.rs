//! REST API types for presentation clients.
//!
//! Every response carries a fresh `renderId` and the time it was produced,
//! so a client can tell two refreshes of the same view apart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::lookup::DetailRecord;
use crate::models::DisplayTable;

/// All configured views of one render pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewsResponse {
    /// Unique render identifier
    pub render_id: String,

    pub generated_at: DateTime<Utc>,

    /// Status: "ready" or "empty"
    pub status: String,

    pub views: Vec<DisplayTable>,
}

impl From<Vec<DisplayTable>> for ViewsResponse {
    fn from(views: Vec<DisplayTable>) -> Self {
        let status = if views.is_empty() { "empty" } else { "ready" };
        Self {
            render_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            status: status.to_string(),
            views,
        }
    }
}

/// One rendered view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    pub render_id: String,
    pub generated_at: DateTime<Utc>,
    pub view: DisplayTable,
}

impl From<DisplayTable> for ViewResponse {
    fn from(view: DisplayTable) -> Self {
        Self {
            render_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            view,
        }
    }
}

/// A found detail record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub render_id: String,
    pub generated_at: DateTime<Utc>,
    pub record: DetailRecord,
}

impl From<DetailRecord> for RecordResponse {
    fn from(record: DetailRecord) -> Self {
        Self {
            render_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            record,
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "renderId": Uuid::new_v4().to_string(),
        "generatedAt": Utc::now(),
        "status": "error",
        "error": error,
    })
}
