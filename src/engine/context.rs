use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Clinical concepts detectable in free-text notes and file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Concept {
    Tuberculosis,
    Pneumonia,
    Asthma,
    Cancer,
    Biopsy,
    HeartProblem,
    Fever,
    Cough,
    Pain,
    Urgent,
    FollowUp,
}

/// A compiled concept detector.
struct ConceptPattern {
    regex: Regex,
    concept: Concept,
}

static CONCEPT_PATTERNS: LazyLock<Vec<ConceptPattern>> = LazyLock::new(|| {
    vec![
        // Respiratory
        pattern(r"(?i)(?-u:\b)(?:tb|tuberculosis|tubercular|mycobacterium)(?-u:\b)", Concept::Tuberculosis),
        pattern(r"(?i)(?-u:\b)(?:pneumonia|lung infection|chest infection)(?-u:\b)", Concept::Pneumonia),
        pattern(r"(?i)(?-u:\b)(?:asthma|bronchial|wheezing)(?-u:\b)", Concept::Asthma),
        // Oncology
        pattern(
            r"(?i)(?-u:\b)(?:cancer|tumor|tumour|malignant|oncology|carcinoma|adenocarcinoma|lymphoma|leukemia)(?-u:\b)",
            Concept::Cancer,
        ),
        pattern(r"(?i)(?-u:\b)(?:biopsy|tissue sample|histology)(?-u:\b)", Concept::Biopsy),
        // Cardiac
        pattern(r"(?i)(?-u:\b)(?:heart|cardiac|chest pain|angina|myocardial)(?-u:\b)", Concept::HeartProblem),
        // Symptom severity
        pattern(r"(?i)(?-u:\b)(?:fever|temperature|pyrexia)(?-u:\b)", Concept::Fever),
        pattern(r"(?i)(?-u:\b)(?:cough|coughing|sputum)(?-u:\b)", Concept::Cough),
        pattern(r"(?i)(?-u:\b)(?:pain|ache|discomfort)(?-u:\b)", Concept::Pain),
        // Urgency wording
        pattern(r"(?i)(?-u:\b)(?:urgent|emergency|immediate|critical|severe)(?-u:\b)", Concept::Urgent),
        pattern(r"(?i)(?-u:\b)(?:follow.?up|routine|check.?up)(?-u:\b)", Concept::FollowUp),
    ]
});

/// Word boundaries are ASCII-only (`(?-u:\b)`): accented letters next to a
/// keyword do not suppress the match.
fn pattern(regex_str: &str, concept: Concept) -> ConceptPattern {
    ConceptPattern {
        regex: Regex::new(regex_str).expect("Invalid concept regex pattern"),
        concept,
    }
}

/// Concept flags for one request. Computed once, never mutated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContextFlags {
    pub tuberculosis: bool,
    pub pneumonia: bool,
    pub asthma: bool,
    pub cancer: bool,
    pub biopsy: bool,
    pub heart_problem: bool,
    pub fever: bool,
    pub cough: bool,
    pub pain: bool,
    pub urgent: bool,
    pub follow_up: bool,
    pub has_multiple_files: bool,
}

impl ContextFlags {
    pub fn has(&self, concept: Concept) -> bool {
        match concept {
            Concept::Tuberculosis => self.tuberculosis,
            Concept::Pneumonia => self.pneumonia,
            Concept::Asthma => self.asthma,
            Concept::Cancer => self.cancer,
            Concept::Biopsy => self.biopsy,
            Concept::HeartProblem => self.heart_problem,
            Concept::Fever => self.fever,
            Concept::Cough => self.cough,
            Concept::Pain => self.pain,
            Concept::Urgent => self.urgent,
            Concept::FollowUp => self.follow_up,
        }
    }

    fn set(&mut self, concept: Concept) {
        let slot = match concept {
            Concept::Tuberculosis => &mut self.tuberculosis,
            Concept::Pneumonia => &mut self.pneumonia,
            Concept::Asthma => &mut self.asthma,
            Concept::Cancer => &mut self.cancer,
            Concept::Biopsy => &mut self.biopsy,
            Concept::HeartProblem => &mut self.heart_problem,
            Concept::Fever => &mut self.fever,
            Concept::Cough => &mut self.cough,
            Concept::Pain => &mut self.pain,
            Concept::Urgent => &mut self.urgent,
            Concept::FollowUp => &mut self.follow_up,
        };
        *slot = true;
    }
}

/// Build the lower-cased search buffer: notes, then file names.
fn search_buffer<S: AsRef<str>>(notes: &str, file_names: &[S]) -> String {
    let names = file_names
        .iter()
        .map(|n| n.as_ref().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    format!("{} {}", notes.to_lowercase(), names)
}

/// Detect clinical concepts in notes and file names.
pub fn extract_context<S: AsRef<str>>(notes: &str, file_names: &[S]) -> ContextFlags {
    let buffer = search_buffer(notes, file_names);
    let mut flags = ContextFlags {
        has_multiple_files: file_names.len() > 1,
        ..ContextFlags::default()
    };

    for cp in CONCEPT_PATTERNS.iter() {
        if cp.regex.is_match(&buffer) {
            flags.set(cp.concept);
        }
    }

    flags
}
