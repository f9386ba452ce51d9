use serde::Deserialize;

use super::UpstreamError;
use crate::engine::types::{
    AnalysisResult, DiseaseScore, Finding, Medication, PredictionResult, Urgency,
};

/// Slice from the first `{` to the last `}` of a completion.
pub fn extract_json_object(text: &str) -> Result<&str, UpstreamError> {
    let start = text.find('{').ok_or(UpstreamError::NoJsonObject)?;
    let end = text.rfind('}').ok_or(UpstreamError::NoJsonObject)?;
    if end < start {
        return Err(UpstreamError::NoJsonObject);
    }
    Ok(&text[start..=end])
}

fn percent(value: f64, field: &str) -> Result<f64, UpstreamError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(UpstreamError::InvalidResult(format!(
            "{field} out of range: {value}"
        )))
    }
}

/// Upstream prediction as sent; numeric fields accepted as floats.
#[derive(Deserialize)]
struct RawPrediction {
    diseases: Vec<DiseaseScore>,
    #[serde(default)]
    medications: Vec<Medication>,
    #[serde(default)]
    recommendations: Vec<String>,
    urgency: Urgency,
    confidence_score: f64,
}

/// Parse and validate a symptom prediction from completion text.
pub fn parse_prediction(text: &str) -> Result<PredictionResult, UpstreamError> {
    let json = extract_json_object(text)?;
    let raw: RawPrediction =
        serde_json::from_str(json).map_err(|e| UpstreamError::JsonParsing(e.to_string()))?;

    if raw.diseases.is_empty() {
        return Err(UpstreamError::InvalidResult("no diseases".into()));
    }
    for d in &raw.diseases {
        percent(d.probability, "probability")?;
    }
    let confidence = percent(raw.confidence_score, "confidence_score")?;

    Ok(PredictionResult {
        diseases: raw.diseases,
        medications: raw.medications,
        recommendations: raw.recommendations,
        urgency: raw.urgency,
        confidence_score: confidence.round() as u8,
    })
}

#[derive(Deserialize)]
struct RawAnalysis {
    #[serde(rename = "reportType")]
    report_type: String,
    findings: Vec<Finding>,
    #[serde(default)]
    recommendations: Vec<String>,
    urgency: Urgency,
    #[serde(default)]
    summary: String,
    confidence: f64,
}

/// Parse and validate a report analysis from completion text.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, UpstreamError> {
    let json = extract_json_object(text)?;
    let raw: RawAnalysis =
        serde_json::from_str(json).map_err(|e| UpstreamError::JsonParsing(e.to_string()))?;

    if raw.findings.is_empty() {
        return Err(UpstreamError::InvalidResult("no findings".into()));
    }
    let confidence = percent(raw.confidence, "confidence")?;

    Ok(AnalysisResult {
        report_type: raw.report_type,
        findings: raw.findings,
        recommendations: raw.recommendations,
        urgency: raw.urgency,
        summary: raw.summary,
        confidence: confidence.round() as u8,
    })
}
