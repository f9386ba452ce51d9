//! Symptom vocabulary endpoint.

use std::collections::BTreeMap;

use axum::Json;

use crate::engine::rules::symptom_catalog;

/// `GET /api/symptoms` — recognized symptom labels grouped by rule category.
pub async fn catalog() -> Json<BTreeMap<&'static str, Vec<&'static str>>> {
    Json(symptom_catalog())
}
