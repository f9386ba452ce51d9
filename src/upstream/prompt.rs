use crate::engine::types::{ReportQuery, SymptomQuery};

/// Notes longer than this are truncated before prompt building.
pub const MAX_NOTES_CHARS: usize = 2000;

pub const SYMPTOM_SYSTEM_PROMPT: &str = "You are a medical AI assistant specializing in symptom analysis. \
Provide accurate disease predictions based on specific symptom combinations, not generic responses.";

pub const REPORT_SYSTEM_PROMPT: &str = "You are an expert medical AI assistant specializing in medical report analysis. \
Provide accurate, detailed medical interpretations while emphasizing the importance of professional medical consultation.";

/// Keep at most `max_chars` characters, cutting on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn truncate_notes(notes: &str) -> &str {
    truncate_chars(notes, MAX_NOTES_CHARS)
}

/// Build the user prompt for symptom prediction.
pub fn build_symptom_prompt(query: &SymptomQuery) -> String {
    format!(
        r#"You are an expert medical AI analyzing symptoms to predict possible diseases.

Patient Symptoms: {symptoms}
Additional Information: {info}

Analyze these specific symptoms and provide accurate disease predictions. Do NOT default to common cold unless respiratory symptoms are present.

Provide response in JSON format:
{{
  "diseases": [
    {{
      "name": "Disease Name",
      "probability": 85,
      "description": "Medical description"
    }}
  ],
  "medications": [
    {{
      "name": "Medication",
      "dosage": "Dosage info",
      "instructions": "Instructions"
    }}
  ],
  "recommendations": ["recommendation1", "recommendation2"],
  "urgency": "low|medium|high",
  "confidence_score": 85
}}

IMPORTANT GUIDELINES:
- Match diseases to actual symptoms presented
- If chest pain + shortness of breath → consider cardiac/anxiety
- If nausea + vomiting + diarrhea → consider GI conditions
- If headache + dizziness → consider neurological
- If joint pain + muscle aches → consider musculoskeletal
- If rash + fever → consider infectious/allergic
- Only suggest common cold if respiratory symptoms present
- Be specific and accurate based on symptom combination
"#,
        symptoms = query.raw_symptoms.join(", "),
        info = truncate_notes(&query.additional_info),
    )
}

/// Build the user prompt for report analysis.
pub fn build_report_prompt(query: &ReportQuery) -> String {
    format!(
        r#"Analyze this medical report with the following details:

Report Type: {report_type}
Additional Notes: {notes}
Number of files: {count}
File names: {names}

Based on the report type and additional notes, provide a realistic medical analysis in JSON format:

{{
  "reportType": "specific medical report name",
  "findings": [
    {{
      "category": "anatomical/test category",
      "finding": "specific medical finding",
      "severity": "normal|abnormal|critical",
      "description": "detailed medical explanation"
    }}
  ],
  "recommendations": ["medical recommendation 1", "medical recommendation 2"],
  "urgency": "low|medium|high",
  "summary": "comprehensive medical summary",
  "confidence": 85
}}

IMPORTANT ANALYSIS GUIDELINES:
- If X-ray + TB/tuberculosis context: Focus on lung findings, cavitations, infiltrates
- If blood test + cancer context: Focus on CBC, tumor markers, abnormal counts
- If pathology + cancer context: Focus on histology, malignant cells, grading
- If ECG: Focus on rhythm, intervals, ST changes
- If MRI/CT: Focus on anatomical findings, masses, abnormalities
- Make findings medically realistic and appropriate for the report type
- Adjust urgency based on severity (TB = high, normal findings = low)
- Use proper medical terminology
"#,
        report_type = query.report_type,
        notes = truncate_notes(&query.notes),
        count = query.file_names.len(),
        names = query.file_names.join(", "),
    )
}
