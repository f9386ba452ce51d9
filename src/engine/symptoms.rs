//! Symptom predictor: score rule categories against a symptom set and
//! synthesize a `PredictionResult` from the best one.

use super::rules::{
    ConditionRule, MedicationSpec, RuleCategory, CONDITION_RULES, DEFAULT_MEDICATIONS,
    DEFAULT_RECOMMENDATIONS,
};
use super::types::{DiseaseScore, Medication, PredictionResult, SymptomSet, Urgency};

/// Minimum match percentage for a category to be trusted.
pub const CONFIDENT_MATCH_THRESHOLD: f64 = 20.0;
/// Reported disease probabilities never fall below this.
pub const PROBABILITY_FLOOR: f64 = 60.0;
/// Added to the match percentage to form the confidence score.
const CONFIDENCE_BONUS: f64 = 20.0;
/// Confidence reported by the generic fallback.
pub const GENERIC_CONFIDENCE: u8 = 70;

/// How well one rule category matched a symptom set.
#[derive(Debug, Clone)]
pub struct CategoryMatch {
    pub rule: &'static ConditionRule,
    pub match_count: usize,
    pub match_percentage: f64,
}

impl CategoryMatch {
    pub fn category(&self) -> RuleCategory {
        self.rule.category
    }
}

/// Outcome of scoring a symptom set against the rule tables.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    Confident(CategoryMatch),
    NoConfidentMatch,
}

/// Score every rule; returns candidates (`match_count > 0`), best first.
///
/// Sorting is stable, so equal percentages keep declaration order.
pub fn rank_categories(symptoms: &SymptomSet) -> Vec<CategoryMatch> {
    let mut matches: Vec<CategoryMatch> = CONDITION_RULES
        .iter()
        .filter_map(|rule| {
            let match_count = rule.symptoms.iter().filter(|s| symptoms.contains(s)).count();
            if match_count == 0 {
                return None;
            }
            Some(CategoryMatch {
                rule,
                match_count,
                match_percentage: match_count as f64 * 100.0 / rule.symptoms.len() as f64,
            })
        })
        .collect();

    matches.sort_by(|a, b| b.match_percentage.total_cmp(&a.match_percentage));
    matches
}

/// Pick the top category if it clears the confidence threshold.
pub fn best_match(symptoms: &SymptomSet) -> MatchOutcome {
    let ranked = rank_categories(symptoms);

    tracing::debug!(
        matches = ?ranked
            .iter()
            .map(|m| format!("{}: {}/{:.1}%", m.category(), m.match_count, m.match_percentage))
            .collect::<Vec<_>>(),
        "Symptom pattern matches"
    );

    match ranked.into_iter().next() {
        Some(top) if top.match_percentage >= CONFIDENT_MATCH_THRESHOLD => MatchOutcome::Confident(top),
        _ => MatchOutcome::NoConfidentMatch,
    }
}

/// Discount a base probability by how incomplete the match was, floored at 60.
pub fn discounted_probability(base: f64, match_percentage: f64) -> f64 {
    (base - (100.0 - match_percentage)).max(PROBABILITY_FLOOR)
}

/// Confidence for a confident match, clamped to [0, 100].
pub fn confidence_for(match_percentage: f64) -> u8 {
    (match_percentage + CONFIDENCE_BONUS).round().clamp(0.0, 100.0) as u8
}

fn medications_from(specs: &[MedicationSpec]) -> Vec<Medication> {
    specs.iter().map(MedicationSpec::to_medication).collect()
}

/// Build the result for a confident category match.
pub fn synthesize(matched: &CategoryMatch) -> PredictionResult {
    let conditions = matched.rule.conditions;

    let diseases = conditions
        .iter()
        .map(|c| DiseaseScore {
            name: c.name.to_string(),
            probability: discounted_probability(c.base_probability, matched.match_percentage),
            description: c.description.to_string(),
        })
        .collect();

    let top = conditions.first();
    let medications = medications_from(
        top.and_then(|c| c.medications).unwrap_or(DEFAULT_MEDICATIONS),
    );
    let recommendations = top
        .and_then(|c| c.recommendations)
        .unwrap_or(DEFAULT_RECOMMENDATIONS)
        .iter()
        .map(|r| r.to_string())
        .collect();

    PredictionResult {
        diseases,
        medications,
        recommendations,
        urgency: top.map(|c| c.urgency).unwrap_or(Urgency::Low),
        confidence_score: confidence_for(matched.match_percentage),
    }
}

/// Fixed low-confidence result for symptom sets no category explains.
pub fn generic_fallback() -> PredictionResult {
    let disease = |name: &str, probability: f64, description: &str| DiseaseScore {
        name: name.to_string(),
        probability,
        description: description.to_string(),
    };

    PredictionResult {
        diseases: vec![
            disease(
                "Non-Specific Symptoms",
                65.0,
                "Combination of symptoms that may indicate various conditions requiring further evaluation",
            ),
            disease(
                "Stress-Related Symptoms",
                55.0,
                "Physical symptoms that may be related to stress, anxiety, or lifestyle factors",
            ),
            disease(
                "Viral Syndrome",
                45.0,
                "General viral infection with non-specific symptoms",
            ),
        ],
        medications: vec![
            Medication {
                name: "Symptomatic Relief".into(),
                dosage: "As needed".into(),
                instructions: "Treat individual symptoms appropriately".into(),
            },
            Medication {
                name: "Rest and Hydration".into(),
                dosage: "Adequate amounts".into(),
                instructions: "Support body's natural healing".into(),
            },
        ],
        recommendations: vec![
            "Monitor symptoms and note any changes or patterns".into(),
            "Ensure adequate rest, nutrition, and hydration".into(),
            "Consider stress management if symptoms may be stress-related".into(),
            "Consult healthcare provider for proper evaluation and diagnosis".into(),
            "Keep a symptom diary to help identify triggers or patterns".into(),
        ],
        urgency: Urgency::Low,
        confidence_score: GENERIC_CONFIDENCE,
    }
}

/// Run the full local symptom pipeline. Never fails.
pub fn predict_symptoms(symptoms: &SymptomSet) -> PredictionResult {
    match best_match(symptoms) {
        MatchOutcome::Confident(matched) => {
            tracing::info!(
                category = %matched.category(),
                match_percentage = matched.match_percentage,
                "Confident symptom match"
            );
            synthesize(&matched)
        }
        MatchOutcome::NoConfidentMatch => {
            tracing::info!(symptom_count = symptoms.len(), "No confident match, using generic fallback");
            generic_fallback()
        }
    }
}
