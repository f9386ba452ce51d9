//! Symptom rule tables: category vocabularies and their candidate conditions.
//!
//! Declaration order matters. Categories tied on match percentage keep the
//! order they appear in `CONDITION_RULES`, and the first condition of the
//! winning category supplies medications, recommendations, and urgency.

use std::collections::BTreeMap;

use super::types::{Medication, Urgency};

/// Symptom category a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleCategory {
    Cardiac,
    Gastrointestinal,
    Neurological,
    Respiratory,
    Musculoskeletal,
    Dermatological,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cardiac => "cardiac",
            Self::Gastrointestinal => "gastrointestinal",
            Self::Neurological => "neurological",
            Self::Respiratory => "respiratory",
            Self::Musculoskeletal => "musculoskeletal",
            Self::Dermatological => "dermatological",
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static medication record.
#[derive(Debug)]
pub struct MedicationSpec {
    pub name: &'static str,
    pub dosage: &'static str,
    pub instructions: &'static str,
}

impl MedicationSpec {
    pub fn to_medication(&self) -> Medication {
        Medication {
            name: self.name.to_string(),
            dosage: self.dosage.to_string(),
            instructions: self.instructions.to_string(),
        }
    }
}

/// One candidate condition within a category.
#[derive(Debug)]
pub struct Condition {
    pub name: &'static str,
    pub base_probability: f64,
    pub description: &'static str,
    pub urgency: Urgency,
    pub medications: Option<&'static [MedicationSpec]>,
    pub recommendations: Option<&'static [&'static str]>,
}

/// A category, the symptoms that define it, and its ordered conditions.
#[derive(Debug)]
pub struct ConditionRule {
    pub category: RuleCategory,
    pub symptoms: &'static [&'static str],
    pub conditions: &'static [Condition],
}

const fn med(name: &'static str, dosage: &'static str, instructions: &'static str) -> MedicationSpec {
    MedicationSpec {
        name,
        dosage,
        instructions,
    }
}

/// All symptom rules, in precedence order.
pub static CONDITION_RULES: &[ConditionRule] = &[
    ConditionRule {
        category: RuleCategory::Cardiac,
        symptoms: &["chest pain", "shortness of breath", "rapid heartbeat", "dizziness", "fatigue"],
        conditions: &[
            Condition {
                name: "Anxiety/Panic Attack",
                base_probability: 78.0,
                description: "Anxiety disorder causing physical symptoms including chest discomfort and breathing difficulties",
                urgency: Urgency::Medium,
                medications: Some(&[
                    med("Deep Breathing Exercises", "As needed", "Practice slow, controlled breathing"),
                    med("Lorazepam (if prescribed)", "0.5-1mg", "Only if prescribed by doctor for anxiety"),
                ]),
                recommendations: Some(&[
                    "Practice relaxation techniques and deep breathing",
                    "Avoid caffeine and stimulants",
                    "Consider counseling or therapy for anxiety management",
                    "Seek immediate care if chest pain is severe or persistent",
                ]),
            },
            Condition {
                name: "Heart Palpitations",
                base_probability: 65.0,
                description: "Irregular or rapid heartbeat, often benign but requires evaluation",
                urgency: Urgency::Medium,
                medications: None,
                recommendations: None,
            },
        ],
    },
    ConditionRule {
        category: RuleCategory::Gastrointestinal,
        symptoms: &["nausea", "vomiting", "diarrhea", "abdominal pain", "loss of appetite"],
        conditions: &[
            Condition {
                name: "Gastroenteritis",
                base_probability: 89.0,
                description: "Stomach flu causing inflammation of the digestive tract",
                urgency: Urgency::Medium,
                medications: Some(&[
                    med("Oral Rehydration Solution", "As needed", "Drink small amounts frequently"),
                    med("Loperamide", "2mg after each loose stool", "For diarrhea control, max 8mg/day"),
                    med("Ondansetron", "4mg every 8 hours", "For nausea relief if prescribed"),
                ]),
                recommendations: Some(&[
                    "Stay hydrated with clear fluids and electrolyte solutions",
                    "Follow BRAT diet (Bananas, Rice, Applesauce, Toast)",
                    "Rest and avoid solid foods initially",
                    "Seek medical attention if symptoms persist >48 hours or signs of dehydration",
                ]),
            },
            Condition {
                name: "Food Poisoning",
                base_probability: 76.0,
                description: "Illness caused by contaminated food or beverages",
                urgency: Urgency::Medium,
                medications: None,
                recommendations: None,
            },
        ],
    },
    ConditionRule {
        category: RuleCategory::Neurological,
        symptoms: &["headache", "dizziness", "fatigue"],
        conditions: &[
            Condition {
                name: "Tension Headache",
                base_probability: 82.0,
                description: "Most common type of headache caused by muscle tension and stress",
                urgency: Urgency::Low,
                medications: Some(&[
                    med("Ibuprofen", "400mg every 6-8 hours", "Take with food, max 1200mg/day"),
                    med("Acetaminophen", "500mg every 6 hours", "Max 3000mg/day"),
                ]),
                recommendations: Some(&[
                    "Apply cold or warm compress to head and neck",
                    "Practice stress management and relaxation techniques",
                    "Maintain regular sleep schedule",
                    "Stay hydrated and avoid known triggers",
                ]),
            },
            Condition {
                name: "Migraine",
                base_probability: 68.0,
                description: "Severe headache often accompanied by nausea and light sensitivity",
                urgency: Urgency::Medium,
                medications: None,
                recommendations: None,
            },
        ],
    },
    ConditionRule {
        category: RuleCategory::Respiratory,
        symptoms: &["fever", "cough", "sore throat", "runny nose", "congestion"],
        conditions: &[Condition {
            name: "Common Cold",
            base_probability: 87.0,
            description: "Viral upper respiratory infection with typical cold symptoms",
            urgency: Urgency::Low,
            medications: Some(&[
                med("Acetaminophen", "500mg every 6 hours", "For fever and aches"),
                med("Throat Lozenges", "As needed", "For sore throat relief"),
                med("Decongestant", "As directed", "For nasal congestion"),
            ]),
            recommendations: Some(&[
                "Get plenty of rest and stay hydrated",
                "Use humidifier or breathe steam",
                "Gargle with warm salt water for sore throat",
                "Avoid contact with others to prevent spread",
            ]),
        }],
    },
    ConditionRule {
        category: RuleCategory::Musculoskeletal,
        symptoms: &["muscle aches", "joint pain", "fatigue"],
        conditions: &[Condition {
            name: "Muscle Strain/Overuse",
            base_probability: 84.0,
            description: "Muscle pain and stiffness from physical activity or poor posture",
            urgency: Urgency::Low,
            medications: Some(&[
                med("Ibuprofen", "400mg every 8 hours", "Anti-inflammatory for muscle pain"),
                med("Topical Pain Relief", "Apply 3-4 times daily", "Menthol or capsaicin cream"),
            ]),
            recommendations: Some(&[
                "Rest affected muscles and avoid overexertion",
                "Apply ice for acute injuries, heat for chronic pain",
                "Gentle stretching and light movement",
                "Consider physical therapy if pain persists",
            ]),
        }],
    },
    ConditionRule {
        category: RuleCategory::Dermatological,
        symptoms: &["rash"],
        conditions: &[Condition {
            name: "Allergic Reaction",
            base_probability: 79.0,
            description: "Skin reaction to allergens causing rash and possible itching",
            urgency: Urgency::Medium,
            medications: Some(&[
                med("Antihistamine (Benadryl)", "25mg every 6 hours", "For allergic reactions"),
                med("Hydrocortisone Cream", "Apply twice daily", "Topical steroid for rash"),
            ]),
            recommendations: Some(&[
                "Identify and avoid potential allergens",
                "Keep skin clean and moisturized",
                "Avoid scratching to prevent infection",
                "Seek immediate care if breathing difficulties occur",
            ]),
        }],
    },
];

/// Used when the winning condition carries no medications.
pub static DEFAULT_MEDICATIONS: &[MedicationSpec] = &[med(
    "Symptomatic Treatment",
    "As needed",
    "Treat symptoms as they arise",
)];

/// Used when the winning condition carries no recommendations.
pub static DEFAULT_RECOMMENDATIONS: &[&str] = &[
    "Monitor symptoms closely",
    "Rest and stay hydrated",
    "Consult healthcare provider if symptoms worsen",
];

/// Recognized symptom vocabulary grouped by category, sorted within each group.
pub fn symptom_catalog() -> BTreeMap<&'static str, Vec<&'static str>> {
    let mut catalog: BTreeMap<&'static str, Vec<&'static str>> = BTreeMap::new();
    for rule in CONDITION_RULES {
        let entry = catalog.entry(rule.category.as_str()).or_default();
        entry.extend(rule.symptoms.iter().copied());
        entry.sort_unstable();
        entry.dedup();
    }
    catalog
}
