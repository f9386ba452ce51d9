//! Report analysis endpoint.
//!
//! `POST /api/analyze-report` — multipart form with `report_type`,
//! `additional_notes`, and one `file_<n>` part per attachment. Only file
//! names and count reach the engine; attachment bytes are drained and
//! dropped.

use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AssessmentResponse, MAX_FILES};
use crate::engine::{AnalysisResult, ReportQuery};
use crate::upstream::truncate_chars;

const FILE_FIELD_PREFIX: &str = "file_";
/// Longer report type labels are cut to this many characters.
const MAX_REPORT_TYPE_CHARS: usize = 50;

#[derive(Debug, Default)]
struct ReportForm {
    report_type: String,
    notes: String,
    file_names: Vec<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<ReportForm, ApiError> {
    let mut form = ReportForm::default();

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "report_type" => {
                let raw = field.text().await?;
                form.report_type = truncate_chars(raw.trim(), MAX_REPORT_TYPE_CHARS).to_string();
            }
            "additional_notes" => form.notes = field.text().await?,
            n if n.starts_with(FILE_FIELD_PREFIX) && field.file_name().is_some() => {
                if form.file_names.len() == MAX_FILES {
                    return Err(ApiError::BadRequest(format!(
                        "Maximum {MAX_FILES} files per analysis"
                    )));
                }
                let file_name = field.file_name().unwrap_or_default().to_string();
                while field.chunk().await?.is_some() {}
                form.file_names.push(file_name);
            }
            other => {
                tracing::debug!(field = other, "Ignoring multipart field");
                while field.chunk().await?.is_some() {}
            }
        }
    }

    Ok(form)
}

pub async fn analyze(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<Json<AssessmentResponse<AnalysisResult>>, ApiError> {
    let form = read_form(multipart).await?;

    if form.file_names.is_empty() {
        return Err(ApiError::BadRequest("No files uploaded".into()));
    }
    if form.report_type.is_empty() {
        return Err(ApiError::BadRequest("Report type is required".into()));
    }

    let query = ReportQuery {
        report_type: form.report_type,
        notes: form.notes,
        file_names: form.file_names,
    };
    tracing::info!(
        report_type = %query.report_type,
        files = query.file_names.len(),
        "Report analysis requested"
    );

    let service = ctx.service.clone();
    let (query, assessment) = tokio::task::spawn_blocking(move || {
        let assessment = service.analyze(&query);
        (query, assessment)
    })
    .await?;

    let id = ctx.history.record_report(
        query.report_type,
        query.file_names.len(),
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
