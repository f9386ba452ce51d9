use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════
// Shared enums
// ═══════════════════════════════════════════════════════════

/// Triage level attached to every result. Ordered: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Severity of a single report finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Abnormal,
    Critical,
}

// ═══════════════════════════════════════════════════════════
// Inputs
// ═══════════════════════════════════════════════════════════

/// Normalized symptom labels: trimmed, lower-cased, deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymptomSet(BTreeSet<String>);

impl SymptomSet {
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            labels
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.0.contains(symptom)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Everything the symptom predictor needs for one request.
#[derive(Debug, Clone)]
pub struct SymptomQuery {
    /// Labels exactly as the caller sent them (used for prompts and history).
    pub raw_symptoms: Vec<String>,
    pub symptoms: SymptomSet,
    pub additional_info: String,
}

impl SymptomQuery {
    pub fn new(raw_symptoms: Vec<String>, additional_info: Option<String>) -> Self {
        let symptoms = SymptomSet::from_labels(&raw_symptoms);
        Self {
            raw_symptoms,
            symptoms,
            additional_info: additional_info.unwrap_or_default(),
        }
    }
}

/// Everything the report analyzer needs for one request.
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub report_type: String,
    pub notes: String,
    pub file_names: Vec<String>,
}

// ═══════════════════════════════════════════════════════════
// Symptom prediction output
// ═══════════════════════════════════════════════════════════

/// Canonical output of the symptom predictor. Field names are a wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub diseases: Vec<DiseaseScore>,
    pub medications: Vec<Medication>,
    pub recommendations: Vec<String>,
    pub urgency: Urgency,
    pub confidence_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseScore {
    pub name: String,
    /// Percentage in [0, 100]. Fractional when derived from a partial match.
    pub probability: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub instructions: String,
}

// ═══════════════════════════════════════════════════════════
// Report analysis output
// ═══════════════════════════════════════════════════════════

/// Canonical output of the report analyzer. Field names are a wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "reportType")]
    pub report_type: String,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
    pub urgency: Urgency,
    pub summary: String,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub category: String,
    pub finding: String,
    pub severity: Severity,
    pub description: String,
}
