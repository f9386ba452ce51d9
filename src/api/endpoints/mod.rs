//! API endpoint handlers.
//!
//! Handlers validate input, hand the work to `AssessmentService`, and
//! record what they return in the history store.

pub mod health;
pub mod history;
pub mod predict;
pub mod reports;
pub mod symptoms;
