//! Symptom prediction endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{
    ApiContext, AssessmentResponse, PredictRequest, MAX_SYMPTOMS, MAX_SYMPTOM_CHARS,
};
use crate::engine::{PredictionResult, SymptomQuery};
use crate::upstream::{truncate_chars, truncate_notes};

/// `POST /api/predict` — rank likely conditions for a symptom list.
///
/// Blank labels are dropped before validation; labels and notes are cut to
/// bounded length before anything is stored. The assessment runs on the
/// blocking pool because the remote strategy uses a blocking HTTP client.
pub async fn predict(
    State(ctx): State<ApiContext>,
    Json(payload): Json<PredictRequest>,
) -> Result<Json<AssessmentResponse<PredictionResult>>, ApiError> {
    let symptoms: Vec<String> = payload
        .symptoms
        .into_iter()
        .map(|s| truncate_chars(s.trim(), MAX_SYMPTOM_CHARS).to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if symptoms.is_empty() {
        return Err(ApiError::BadRequest("No symptoms provided".into()));
    }
    if symptoms.len() > MAX_SYMPTOMS {
        return Err(ApiError::BadRequest(format!(
            "Maximum {MAX_SYMPTOMS} symptoms per request"
        )));
    }

    let additional_info = payload
        .additional_info
        .map(|info| truncate_notes(&info).to_string());
    let query = SymptomQuery::new(symptoms, additional_info);
    tracing::info!(count = query.raw_symptoms.len(), "Symptom prediction requested");

    let service = ctx.service.clone();
    let (query, assessment) = tokio::task::spawn_blocking(move || {
        let assessment = service.predict(&query);
        (query, assessment)
    })
    .await?;

    let id = ctx.history.record_prediction(
        query.raw_symptoms,
        query.additional_info,
        assessment.result.clone(),
        assessment.ai_model.clone(),
    )?;

    Ok(Json(AssessmentResponse {
        result: assessment.result,
        ai_model: assessment.ai_model,
        saved_to_history: id.is_some(),
        id,
    }))
}
