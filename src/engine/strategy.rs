//! Prediction strategies: an optional remote model in front of the local
//! rule engine.
//!
//! `AssessmentService` tries the remote strategy when one is configured and
//! degrades to `LocalRuleEngine` on any failure. The local engine is
//! infallible, so the service always returns a fully-shaped result.

use super::context::extract_context;
use super::reports::{analyze_report, ReportType};
use super::symptoms::predict_symptoms;
use super::types::{AnalysisResult, PredictionResult, ReportQuery, SymptomQuery};
use crate::upstream::UpstreamError;

/// Tag reported for results produced by the local rule engine.
pub const LOCAL_MODEL_TAG: &str = "enhanced-local";

/// A source of predictions and report analyses.
pub trait Predictor: Send + Sync {
    /// Identifier reported to clients as `aiModel`.
    fn tag(&self) -> &str;

    fn predict(&self, query: &SymptomQuery) -> Result<PredictionResult, UpstreamError>;

    fn analyze(&self, query: &ReportQuery) -> Result<AnalysisResult, UpstreamError>;
}

/// Deterministic keyword engine. Never returns `Err`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalRuleEngine;

impl LocalRuleEngine {
    pub fn predict_local(&self, query: &SymptomQuery) -> PredictionResult {
        predict_symptoms(&query.symptoms)
    }

    pub fn analyze_local(&self, query: &ReportQuery) -> AnalysisResult {
        let context = extract_context(&query.notes, &query.file_names);
        tracing::debug!(?context, report_type = %query.report_type, "Detected report context");
        analyze_report(&ReportType::parse(&query.report_type), &context)
    }
}

impl Predictor for LocalRuleEngine {
    fn tag(&self) -> &str {
        LOCAL_MODEL_TAG
    }

    fn predict(&self, query: &SymptomQuery) -> Result<PredictionResult, UpstreamError> {
        Ok(self.predict_local(query))
    }

    fn analyze(&self, query: &ReportQuery) -> Result<AnalysisResult, UpstreamError> {
        Ok(self.analyze_local(query))
    }
}

/// A result plus the tag of the strategy that produced it.
#[derive(Debug, Clone)]
pub struct Assessment<T> {
    pub result: T,
    pub ai_model: String,
}

/// Entry point for both engines.
pub struct AssessmentService {
    remote: Option<Box<dyn Predictor>>,
    local: LocalRuleEngine,
}

impl AssessmentService {
    /// Local rule engine only.
    pub fn local_only() -> Self {
        Self {
            remote: None,
            local: LocalRuleEngine,
        }
    }

    /// Remote strategy first, local rule engine on failure.
    pub fn with_remote(remote: Box<dyn Predictor>) -> Self {
        Self {
            remote: Some(remote),
            local: LocalRuleEngine,
        }
    }

    pub fn remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    pub fn predict(&self, query: &SymptomQuery) -> Assessment<PredictionResult> {
        if let Some(remote) = &self.remote {
            match remote.predict(query) {
                Ok(result) => {
                    tracing::info!(model = remote.tag(), "Symptom prediction from remote model");
                    return Assessment {
                        result,
                        ai_model: remote.tag().to_string(),
                    };
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Remote prediction failed, using local rule engine");
                }
            }
        }

        Assessment {
            result: self.local.predict_local(query),
            ai_model: LOCAL_MODEL_TAG.to_string(),
        }
    }

    pub fn analyze(&self, query: &ReportQuery) -> Assessment<AnalysisResult> {
        if let Some(remote) = &self.remote {
            match remote.analyze(query) {
                Ok(result) => {
                    tracing::info!(model = remote.tag(), "Report analysis from remote model");
                    return Assessment {
                        result,
                        ai_model: remote.tag().to_string(),
                    };
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Remote analysis failed, using local rule engine");
                }
            }
        }

        Assessment {
            result: self.local.analyze_local(query),
            ai_model: LOCAL_MODEL_TAG.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine::symptoms::generic_fallback;
    use crate::engine::types::Urgency;

    struct FailingPredictor;

    impl Predictor for FailingPredictor {
        fn tag(&self) -> &str {
            "broken-remote"
        }
        fn predict(&self, _: &SymptomQuery) -> Result<PredictionResult, UpstreamError> {
            Err(UpstreamError::Timeout(10))
        }
        fn analyze(&self, _: &ReportQuery) -> Result<AnalysisResult, UpstreamError> {
            Err(UpstreamError::NoJsonObject)
        }
    }

    struct FixedPredictor;

    impl Predictor for FixedPredictor {
        fn tag(&self) -> &str {
            "fixed-remote"
        }
        fn predict(&self, _: &SymptomQuery) -> Result<PredictionResult, UpstreamError> {
            Ok(generic_fallback())
        }
        fn analyze(&self, _: &ReportQuery) -> Result<AnalysisResult, UpstreamError> {
            Ok(crate::engine::reports::generic_analysis("remote"))
        }
    }

    fn xray(notes: &str) -> ReportQuery {
        ReportQuery {
            report_type: "xray".into(),
            notes: notes.into(),
            file_names: vec!["scan.png".into()],
        }
    }

    #[test]
    fn local_only_tags_results() {
        let service = AssessmentService::local_only();
        assert!(!service.remote_enabled());
        let out = service.predict(&SymptomQuery::new(vec!["rash".into()], None));
        assert_eq!(out.ai_model, LOCAL_MODEL_TAG);
        assert_eq!(out.result.diseases[0].name, "Allergic Reaction");
    }

    #[test]
    fn remote_failure_degrades_to_local() {
        let service = AssessmentService::with_remote(Box::new(FailingPredictor));
        let out = service.predict(&SymptomQuery::new(vec!["headache".into()], None));
        assert_eq!(out.ai_model, LOCAL_MODEL_TAG);
        assert_eq!(out.result.diseases[0].name, "Tension Headache");

        let out = service.analyze(&xray("tuberculosis"));
        assert_eq!(out.ai_model, LOCAL_MODEL_TAG);
        assert_eq!(out.result.urgency, Urgency::High);
    }

    #[test]
    fn remote_success_is_used() {
        let service = AssessmentService::with_remote(Box::new(FixedPredictor));
        let out = service.predict(&SymptomQuery::new(vec!["headache".into()], None));
        assert_eq!(out.ai_model, "fixed-remote");
        assert_eq!(out.result, generic_fallback());
    }

    #[test]
    fn local_report_uses_file_names() {
        let engine = LocalRuleEngine;
        let query = ReportQuery {
            report_type: "xray".into(),
            notes: String::new(),
            file_names: vec!["pneumonia.png".into()],
        };
        assert_eq!(engine.analyze_local(&query).report_type, "Chest X-Ray - Pneumonia Assessment");
    }

    #[test]
    fn concurrent_requests_do_not_leak_state() {
        let service = Arc::new(AssessmentService::local_only());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        let out = service.predict(&SymptomQuery::new(vec!["rash".into()], None));
                        assert_eq!(out.result.diseases[0].name, "Allergic Reaction");
                        assert_eq!(out.result.diseases.len(), 1);
                    } else {
                        let out = service.predict(&SymptomQuery::new(
                            vec!["nausea".into(), "vomiting".into(), "diarrhea".into()],
                            None,
                        ));
                        assert_eq!(out.result.diseases[0].name, "Gastroenteritis");
                        assert_eq!(out.result.diseases.len(), 2);
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }
    }
}
