//! Shared types for the HTTP layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::AssessmentService;
use crate::history::HistoryStore;

/// Maximum symptom labels accepted per prediction.
pub const MAX_SYMPTOMS: usize = 50;
/// Longer symptom labels are cut to this many characters.
pub const MAX_SYMPTOM_CHARS: usize = 100;
/// Maximum attachments accepted per report analysis.
pub const MAX_FILES: usize = 20;
/// Request body ceiling for multipart uploads (25 MB).
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub service: Arc<AssessmentService>,
    pub history: Arc<HistoryStore>,
}

impl ApiContext {
    pub fn new(service: AssessmentService, history: HistoryStore) -> Self {
        Self {
            service: Arc::new(service),
            history: Arc::new(history),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Wire types
// ═══════════════════════════════════════════════════════════

/// `POST /api/predict` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

/// An engine result plus the metadata the client needs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse<T: Serialize> {
    #[serde(flatten)]
    pub result: T,
    pub ai_model: String,
    pub saved_to_history: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

/// `?page=&page_size=` on history listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}
