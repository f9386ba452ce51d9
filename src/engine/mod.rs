//! Rule-based assessment engine.
//!
//! Context extraction → pattern matching → result synthesis → generic
//! fallback. Rule tables are process-wide statics; every request builds its
//! result fresh, so concurrent callers share nothing mutable.

pub mod context;
pub mod reports;
pub mod rules;
pub mod strategy;
pub mod symptoms;
pub mod types;

pub use context::{extract_context, ContextFlags};
pub use reports::{analyze_report, ReportType};
pub use strategy::{Assessment, AssessmentService, LocalRuleEngine, Predictor, LOCAL_MODEL_TAG};
pub use symptoms::predict_symptoms;
pub use types::*;
