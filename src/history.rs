//! In-memory assessment history.
//!
//! The engine persists nothing; this store is the API layer's record of
//! what it returned. Bounded: once `capacity` records of a kind exist, the
//! oldest is evicted. Uses `RwLock` so history reads never block each other.

use std::collections::VecDeque;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::engine::types::{AnalysisResult, PredictionResult, Urgency};

/// Default page size for history listings.
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Upper bound on requested page size.
pub const MAX_PAGE_SIZE: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Internal lock error")]
    LockPoisoned,
}

/// A stored symptom prediction.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord {
    pub id: Uuid,
    pub symptoms: Vec<String>,
    pub additional_info: String,
    #[serde(flatten)]
    pub result: PredictionResult,
    pub ai_model: String,
    pub created_at: DateTime<Utc>,
}

/// A stored report analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRecord {
    pub id: Uuid,
    pub report_type: String,
    pub file_count: usize,
    pub analysis: AnalysisResult,
    pub ai_model: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopDisease {
    pub name: String,
    pub probability: f64,
}

/// Compact listing row for prediction history.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionSummary {
    pub id: Uuid,
    pub symptoms: Vec<String>,
    pub top_disease: Option<TopDisease>,
    pub urgency: Urgency,
    pub confidence_score: u8,
    pub created_at: DateTime<Utc>,
}

impl From<&PredictionRecord> for PredictionSummary {
    fn from(record: &PredictionRecord) -> Self {
        Self {
            id: record.id,
            symptoms: record.symptoms.clone(),
            top_disease: record.result.diseases.first().map(|d| TopDisease {
                name: d.name.clone(),
                probability: d.probability,
            }),
            urgency: record.result.urgency,
            confidence_score: record.result.confidence_score,
            created_at: record.created_at,
        }
    }
}

/// Compact listing row for report history.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub id: Uuid,
    pub report_type: String,
    pub title: String,
    pub urgency: Urgency,
    pub confidence: u8,
    pub file_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&ReportRecord> for ReportSummary {
    fn from(record: &ReportRecord) -> Self {
        Self {
            id: record.id,
            report_type: record.report_type.clone(),
            title: record.analysis.report_type.clone(),
            urgency: record.analysis.urgency,
            confidence: record.analysis.confidence,
            file_count: record.file_count,
            created_at: record.created_at,
        }
    }
}

/// One page of summaries, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: usize,
    pub page: usize,
    pub page_size: usize,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UrgencyBreakdown {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Aggregate statistics over stored predictions.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionStats {
    pub total_predictions: usize,
    pub avg_confidence: f64,
    pub last_prediction: Option<DateTime<Utc>>,
    pub urgency_breakdown: UrgencyBreakdown,
}

#[derive(Default)]
struct Records {
    // Oldest at the front.
    predictions: VecDeque<PredictionRecord>,
    reports: VecDeque<ReportRecord>,
}

pub struct HistoryStore {
    records: RwLock<Records>,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: RwLock::new(Records::default()),
            capacity,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Records>, HistoryError> {
        self.records.read().map_err(|_| HistoryError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Records>, HistoryError> {
        self.records.write().map_err(|_| HistoryError::LockPoisoned)
    }

    /// Store a prediction. Returns `None` when the store has zero capacity.
    pub fn record_prediction(
        &self,
        symptoms: Vec<String>,
        additional_info: String,
        result: PredictionResult,
        ai_model: String,
    ) -> Result<Option<Uuid>, HistoryError> {
        if self.capacity == 0 {
            return Ok(None);
        }
        let id = Uuid::new_v4();
        let mut records = self.write()?;
        if records.predictions.len() >= self.capacity {
            records.predictions.pop_front();
        }
        records.predictions.push_back(PredictionRecord {
            id,
            symptoms,
            additional_info,
            result,
            ai_model,
            created_at: Utc::now(),
        });
        Ok(Some(id))
    }

    /// Store a report analysis. Returns `None` when the store has zero capacity.
    pub fn record_report(
        &self,
        report_type: String,
        file_count: usize,
        analysis: AnalysisResult,
        ai_model: String,
    ) -> Result<Option<Uuid>, HistoryError> {
        if self.capacity == 0 {
            return Ok(None);
        }
        let id = Uuid::new_v4();
        let mut records = self.write()?;
        if records.reports.len() >= self.capacity {
            records.reports.pop_front();
        }
        records.reports.push_back(ReportRecord {
            id,
            report_type,
            file_count,
            analysis,
            ai_model,
            created_at: Utc::now(),
        });
        Ok(Some(id))
    }

    pub fn prediction(&self, id: &Uuid) -> Result<Option<PredictionRecord>, HistoryError> {
        let records = self.read()?;
        Ok(records.predictions.iter().find(|r| &r.id == id).cloned())
    }

    pub fn prediction_page(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<Page<PredictionSummary>, HistoryError> {
        let records = self.read()?;
        Ok(paginate(records.predictions.iter().rev(), records.predictions.len(), page, page_size))
    }

    pub fn report_page(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<Page<ReportSummary>, HistoryError> {
        let records = self.read()?;
        Ok(paginate(records.reports.iter().rev(), records.reports.len(), page, page_size))
    }

    pub fn prediction_stats(&self) -> Result<PredictionStats, HistoryError> {
        let records = self.read()?;
        let total = records.predictions.len();

        let mut breakdown = UrgencyBreakdown::default();
        let mut confidence_sum = 0.0;
        for r in &records.predictions {
            confidence_sum += f64::from(r.result.confidence_score);
            match r.result.urgency {
                Urgency::Low => breakdown.low += 1,
                Urgency::Medium => breakdown.medium += 1,
                Urgency::High => breakdown.high += 1,
            }
        }

        let avg_confidence = if total == 0 {
            0.0
        } else {
            (confidence_sum / total as f64 * 10.0).round() / 10.0
        };

        Ok(PredictionStats {
            total_predictions: total,
            avg_confidence,
            last_prediction: records.predictions.back().map(|r| r.created_at),
            urgency_breakdown: breakdown,
        })
    }
}

/// Largest page number honored; keeps the skip offset from overflowing.
const MAX_PAGE: usize = usize::MAX / MAX_PAGE_SIZE;

/// Clamp paging input: pages are 1-based, size within `1..=MAX_PAGE_SIZE`.
pub fn normalize_paging(page: Option<usize>, page_size: Option<usize>) -> (usize, usize) {
    let page = page.unwrap_or(1).clamp(1, MAX_PAGE);
    let page_size = page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    (page, page_size)
}

fn paginate<'a, R, T>(
    newest_first: impl Iterator<Item = &'a R>,
    count: usize,
    page: usize,
    page_size: usize,
) -> Page<T>
where
    R: 'a,
    T: From<&'a R>,
{
    let (page, page_size) = normalize_paging(Some(page), Some(page_size));
    let results = newest_first
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .map(T::from)
        .collect();
    Page {
        count,
        page,
        page_size,
        results,
    }
}
