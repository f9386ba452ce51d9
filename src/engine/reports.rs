//! Report analyzer: pick a pre-authored finding set keyed by report type and
//! context flags.
//!
//! Each report type owns an ordered rule list. The first rule whose predicate
//! accepts the context wins; the last rule of every list accepts anything and
//! carries that type's normal result.

use std::fmt;

use super::context::ContextFlags;
use super::types::{AnalysisResult, Finding, Severity, Urgency};

/// Closed set of report categories the analyzer knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportType {
    Xray,
    BloodTest,
    Pathology,
    Mri,
    CtScan,
    Ecg,
    Ultrasound,
    Prescription,
    Other(String),
}

impl ReportType {
    /// Parse a form label. Exact, case-sensitive match on the wire names.
    pub fn parse(label: &str) -> Self {
        match label {
            "xray" => Self::Xray,
            "blood_test" => Self::BloodTest,
            "pathology" => Self::Pathology,
            "mri" => Self::Mri,
            "ct_scan" => Self::CtScan,
            "ecg" => Self::Ecg,
            "ultrasound" => Self::Ultrasound,
            "prescription" => Self::Prescription,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Xray => "xray",
            Self::BloodTest => "blood_test",
            Self::Pathology => "pathology",
            Self::Mri => "mri",
            Self::CtScan => "ct_scan",
            Self::Ecg => "ecg",
            Self::Ultrasound => "ultrasound",
            Self::Prescription => "prescription",
            Self::Other(raw) => raw,
        }
    }

    fn rules(&self) -> Option<&'static [ReportRule]> {
        match self {
            Self::Xray => Some(XRAY_RULES),
            Self::BloodTest => Some(BLOOD_TEST_RULES),
            Self::Pathology => Some(PATHOLOGY_RULES),
            Self::Mri => Some(MRI_RULES),
            Self::CtScan => Some(CT_SCAN_RULES),
            Self::Ecg => Some(ECG_RULES),
            Self::Ultrasound => Some(ULTRASOUND_RULES),
            Self::Prescription => Some(PRESCRIPTION_RULES),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════
// Static fragments
// ═══════════════════════════════════════════════════════════

struct FindingSpec {
    category: &'static str,
    finding: &'static str,
    severity: Severity,
    description: &'static str,
}

struct Fragment {
    report_type: &'static str,
    findings: &'static [FindingSpec],
    recommendations: &'static [&'static str],
    urgency: Urgency,
    summary: &'static str,
    confidence: u8,
}

impl Fragment {
    fn to_result(&self) -> AnalysisResult {
        AnalysisResult {
            report_type: self.report_type.to_string(),
            findings: self
                .findings
                .iter()
                .map(|f| Finding {
                    category: f.category.to_string(),
                    finding: f.finding.to_string(),
                    severity: f.severity,
                    description: f.description.to_string(),
                })
                .collect(),
            recommendations: self.recommendations.iter().map(|r| r.to_string()).collect(),
            urgency: self.urgency,
            summary: self.summary.to_string(),
            confidence: self.confidence,
        }
    }
}

/// Context predicate → fragment.
struct ReportRule {
    applies: fn(&ContextFlags) -> bool,
    fragment: Fragment,
}

const fn finding(
    category: &'static str,
    finding: &'static str,
    severity: Severity,
    description: &'static str,
) -> FindingSpec {
    FindingSpec {
        category,
        finding,
        severity,
        description,
    }
}

fn always(_: &ContextFlags) -> bool {
    true
}

static XRAY_RULES: &[ReportRule] = &[
    ReportRule {
        applies: |c| c.tuberculosis,
        fragment: Fragment {
            report_type: "Chest X-Ray - Tuberculosis Screening",
            findings: &[
                finding(
                    "Pulmonary Findings",
                    "Bilateral upper lobe infiltrates with cavitation",
                    Severity::Critical,
                    "Multiple cavitary lesions visible in both upper lobes, highly suggestive of pulmonary tuberculosis. Cavitations show thick walls with surrounding consolidation.",
                ),
                finding(
                    "Pleural Assessment",
                    "Pleural thickening noted",
                    Severity::Abnormal,
                    "Bilateral pleural thickening consistent with chronic inflammatory process.",
                ),
                finding(
                    "Cardiac Silhouette",
                    "Heart size within normal limits",
                    Severity::Normal,
                    "Cardiac borders are clearly defined with normal cardiothoracic ratio.",
                ),
            ],
            recommendations: &[
                "URGENT: Immediate isolation and contact tracing required",
                "Start anti-tuberculosis therapy immediately",
                "Sputum culture and sensitivity testing",
                "HIV testing recommended",
                "Contact public health authorities",
                "Follow-up chest X-ray in 2 months",
            ],
            urgency: Urgency::High,
            summary: "Chest X-ray shows findings highly suggestive of active pulmonary tuberculosis with bilateral cavitary disease. Immediate medical intervention and isolation protocols required.",
            confidence: 94,
        },
    },
    ReportRule {
        applies: |c| c.pneumonia,
        fragment: Fragment {
            report_type: "Chest X-Ray - Pneumonia Assessment",
            findings: &[
                finding(
                    "Lung Parenchyma",
                    "Right lower lobe consolidation",
                    Severity::Abnormal,
                    "Dense consolidation in the right lower lobe with air bronchograms, consistent with bacterial pneumonia.",
                ),
                finding(
                    "Pleural Space",
                    "Small right pleural effusion",
                    Severity::Abnormal,
                    "Small amount of pleural fluid in the right costophrenic angle.",
                ),
            ],
            recommendations: &[
                "Start appropriate antibiotic therapy",
                "Monitor oxygen saturation",
                "Follow-up X-ray in 48-72 hours",
                "Consider blood cultures if febrile",
            ],
            urgency: Urgency::Medium,
            summary: "Chest X-ray demonstrates right lower lobe pneumonia with small pleural effusion. Antibiotic treatment indicated.",
            confidence: 91,
        },
    },
    ReportRule {
        applies: always,
        fragment: Fragment {
            report_type: "Chest X-Ray Analysis",
            findings: &[
                finding(
                    "Lung Fields",
                    "Clear lung fields bilaterally",
                    Severity::Normal,
                    "Both lungs are well-expanded with clear parenchyma. No evidence of consolidation, masses, or infiltrates.",
                ),
                finding(
                    "Heart and Mediastinum",
                    "Normal cardiac silhouette and mediastinal contours",
                    Severity::Normal,
                    "Heart size is normal with clear cardiac borders. Mediastinal structures are within normal limits.",
                ),
                finding(
                    "Bony Structures",
                    "No acute bony abnormalities",
                    Severity::Normal,
                    "Visible ribs, spine, and shoulder structures appear intact.",
                ),
            ],
            recommendations: &[
                "No acute pulmonary abnormalities detected",
                "Continue routine health maintenance",
                "Follow-up as clinically indicated",
            ],
            urgency: Urgency::Low,
            summary: "Chest X-ray is normal with clear lung fields and normal cardiac silhouette. No acute abnormalities identified.",
            confidence: 88,
        },
    },
];

static BLOOD_TEST_RULES: &[ReportRule] = &[
    ReportRule {
        applies: |c| c.cancer,
        fragment: Fragment {
            report_type: "Oncology Blood Panel",
            findings: &[
                finding(
                    "Complete Blood Count",
                    "Severe leukopenia (WBC: 2,100/μL)",
                    Severity::Critical,
                    "White blood cell count significantly below normal range (4,000-11,000/μL), indicating possible bone marrow suppression or hematologic malignancy.",
                ),
                finding(
                    "Tumor Markers",
                    "Markedly elevated CEA and CA 19-9",
                    Severity::Critical,
                    "Carcinoembryonic antigen (CEA) and CA 19-9 levels significantly elevated, suggesting active malignancy.",
                ),
                finding(
                    "Blood Chemistry",
                    "Elevated LDH and low albumin",
                    Severity::Abnormal,
                    "Lactate dehydrogenase elevation with hypoalbuminemia consistent with tumor burden and metabolic stress.",
                ),
            ],
            recommendations: &[
                "URGENT: Immediate oncology consultation required",
                "Consider hospitalization for further evaluation",
                "Bone marrow biopsy may be indicated",
                "Imaging studies for staging",
                "Monitor for signs of infection due to low WBC",
            ],
            urgency: Urgency::High,
            summary: "Blood work shows significant abnormalities consistent with hematologic malignancy or advanced solid tumor. Immediate oncology evaluation required.",
            confidence: 96,
        },
    },
    ReportRule {
        applies: always,
        fragment: Fragment {
            report_type: "Comprehensive Metabolic Panel",
            findings: &[
                finding(
                    "Complete Blood Count",
                    "All parameters within normal limits",
                    Severity::Normal,
                    "WBC: 6,800/μL, RBC: 4.5M/μL, Hemoglobin: 14.2 g/dL, Platelets: 285,000/μL - all within normal ranges.",
                ),
                finding(
                    "Basic Metabolic Panel",
                    "Normal electrolytes and kidney function",
                    Severity::Normal,
                    "Sodium, potassium, chloride, and creatinine levels are normal. eGFR >60 indicates normal kidney function.",
                ),
            ],
            recommendations: &[
                "Blood work is normal",
                "Continue current health maintenance",
                "Routine follow-up in 6-12 months",
            ],
            urgency: Urgency::Low,
            summary: "Complete blood panel shows all parameters within normal limits. No abnormalities detected.",
            confidence: 92,
        },
    },
];

static PATHOLOGY_RULES: &[ReportRule] = &[
    ReportRule {
        applies: |c| c.cancer || c.biopsy,
        fragment: Fragment {
            report_type: "Histopathology Report - Tissue Biopsy",
            findings: &[
                finding(
                    "Microscopic Examination",
                    "Invasive adenocarcinoma identified",
                    Severity::Critical,
                    "Malignant glandular epithelium with invasion into surrounding stroma. Tumor shows moderate differentiation (Grade 2).",
                ),
                finding(
                    "Immunohistochemistry",
                    "Positive for cytokeratin and CEA",
                    Severity::Critical,
                    "Tumor cells show positive staining for epithelial markers, confirming adenocarcinoma diagnosis.",
                ),
                finding(
                    "Margins",
                    "Margins involved by tumor",
                    Severity::Critical,
                    "Malignant cells extend to the surgical resection margin, indicating incomplete excision.",
                ),
            ],
            recommendations: &[
                "URGENT: Immediate oncology consultation",
                "Multidisciplinary tumor board review",
                "Consider re-excision for clear margins",
                "Staging studies including CT and PET scan",
                "Genetic counseling evaluation",
            ],
            urgency: Urgency::High,
            summary: "Pathology confirms invasive adenocarcinoma with positive margins. Immediate oncology consultation and staging required.",
            confidence: 98,
        },
    },
    ReportRule {
        applies: always,
        fragment: Fragment {
            report_type: "Histopathology Report",
            findings: &[finding(
                "Microscopic Findings",
                "Benign tissue with chronic inflammation",
                Severity::Normal,
                "No malignant cells identified. Mild chronic inflammatory infiltrate present.",
            )],
            recommendations: &[
                "Benign findings - no malignancy detected",
                "Clinical correlation recommended",
                "Routine follow-up as indicated",
            ],
            urgency: Urgency::Low,
            summary: "Pathology shows benign tissue with no evidence of malignancy.",
            confidence: 89,
        },
    },
];

static ECG_RULES: &[ReportRule] = &[
    ReportRule {
        applies: |c| c.heart_problem,
        fragment: Fragment {
            report_type: "12-Lead Electrocardiogram",
            findings: &[
                finding(
                    "Rhythm Analysis",
                    "Atrial fibrillation with rapid ventricular response",
                    Severity::Abnormal,
                    "Irregularly irregular rhythm with absent P waves and ventricular rate of 140 bpm.",
                ),
                finding(
                    "ST Segment",
                    "ST depression in lateral leads",
                    Severity::Abnormal,
                    "Horizontal ST depression in leads V4-V6, suggesting possible ischemia.",
                ),
            ],
            recommendations: &[
                "Immediate cardiology consultation",
                "Rate control with beta-blockers or calcium channel blockers",
                "Anticoagulation assessment",
                "Echocardiogram to evaluate cardiac function",
            ],
            urgency: Urgency::Medium,
            summary: "ECG shows atrial fibrillation with rapid rate and possible ischemic changes. Cardiology evaluation needed.",
            confidence: 93,
        },
    },
    ReportRule {
        applies: always,
        fragment: Fragment {
            report_type: "12-Lead Electrocardiogram",
            findings: &[finding(
                "Rhythm and Rate",
                "Normal sinus rhythm at 68 bpm",
                Severity::Normal,
                "Regular rhythm with normal P waves, PR interval, and QRS duration.",
            )],
            recommendations: &["ECG is normal", "Continue heart-healthy lifestyle"],
            urgency: Urgency::Low,
            summary: "Normal ECG with regular sinus rhythm and no abnormalities.",
            confidence: 91,
        },
    },
];

static MRI_RULES: &[ReportRule] = &[ReportRule {
    applies: always,
    fragment: Fragment {
        report_type: "MRI Scan Analysis",
        findings: &[finding(
            "Brain Parenchyma",
            "No acute intracranial abnormalities",
            Severity::Normal,
            "Brain tissue appears normal with no evidence of mass, hemorrhage, or acute infarction.",
        )],
        recommendations: &["MRI is normal", "Clinical correlation recommended"],
        urgency: Urgency::Low,
        summary: "MRI shows normal findings with no significant abnormalities.",
        confidence: 87,
    },
}];

static CT_SCAN_RULES: &[ReportRule] = &[ReportRule {
    applies: always,
    fragment: Fragment {
        report_type: "CT Scan Analysis",
        findings: &[finding(
            "Abdominal Organs",
            "Normal enhancement of liver, kidneys, and pancreas",
            Severity::Normal,
            "All abdominal organs show normal size, shape, and enhancement patterns.",
        )],
        recommendations: &["CT scan is normal", "No acute findings requiring intervention"],
        urgency: Urgency::Low,
        summary: "CT scan demonstrates normal findings.",
        confidence: 86,
    },
}];

static ULTRASOUND_RULES: &[ReportRule] = &[ReportRule {
    applies: always,
    fragment: Fragment {
        report_type: "Ultrasound Examination",
        findings: &[finding(
            "Sonographic Findings",
            "Normal organ echogenicity and size",
            Severity::Normal,
            "All visualized structures show normal ultrasound characteristics.",
        )],
        recommendations: &["Ultrasound is normal", "Routine follow-up as needed"],
        urgency: Urgency::Low,
        summary: "Ultrasound examination shows normal findings.",
        confidence: 84,
    },
}];

static PRESCRIPTION_RULES: &[ReportRule] = &[ReportRule {
    applies: always,
    fragment: Fragment {
        report_type: "Prescription Review",
        findings: &[finding(
            "Medication Assessment",
            "Appropriate prescribing practices",
            Severity::Normal,
            "Medications and dosages appear appropriate for indicated conditions.",
        )],
        recommendations: &["Take medications as prescribed", "Monitor for side effects"],
        urgency: Urgency::Low,
        summary: "Prescription review shows appropriate medication management.",
        confidence: 88,
    },
}];

// ═══════════════════════════════════════════════════════════
// Analysis
// ═══════════════════════════════════════════════════════════

/// Title used for unrecognized report types: first `_` becomes a space, then uppercased.
fn generic_title(raw: &str) -> String {
    format!("{} Analysis", raw.replacen('_', " ", 1).to_uppercase())
}

/// Neutral single-finding result for report types without a rule list.
pub fn generic_analysis(raw_type: &str) -> AnalysisResult {
    AnalysisResult {
        report_type: generic_title(raw_type),
        findings: vec![Finding {
            category: "Document Review".into(),
            finding: "Medical report processed successfully".into(),
            severity: Severity::Normal,
            description: "Report has been analyzed and contains relevant medical information.".into(),
        }],
        recommendations: vec![
            "Discuss results with your healthcare provider".into(),
            "Follow any specific instructions in the report".into(),
        ],
        urgency: Urgency::Low,
        summary: "Medical report has been processed. Professional interpretation recommended.".into(),
        confidence: 78,
    }
}

/// Run the local report pipeline for already-extracted context. Never fails.
pub fn analyze_report(report_type: &ReportType, context: &ContextFlags) -> AnalysisResult {
    let Some(rules) = report_type.rules() else {
        tracing::info!(report_type = %report_type, "Unrecognized report type, using document review");
        return generic_analysis(report_type.as_str());
    };

    match rules.iter().find(|r| (r.applies)(context)) {
        Some(rule) => rule.fragment.to_result(),
        None => generic_analysis(report_type.as_str()),
    }
}
