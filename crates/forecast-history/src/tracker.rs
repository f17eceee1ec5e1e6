use crate::ForecastStore;
use chrono::{Datelike, Weekday};
use dashboard_core::{DashboardError, ForecastRecord};

/// Result of an append attempt. The skip variants are intentional no-ops,
/// distinguishable from failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    AlreadyRecorded,
    Weekend,
}

/// Sole writer of the persisted forecast history. Appends are guarded by
/// the per-day idempotence check; the driving loop is single-threaded.
pub struct ForecastTracker {
    store: Box<dyn ForecastStore>,
}

impl ForecastTracker {
    pub fn new(store: Box<dyn ForecastStore>) -> Self {
        Self { store }
    }

    /// Appends the record unless its date is a weekend or already present.
    /// Calling twice on the same day is a no-op after the first append.
    pub fn append_if_new(
        &self,
        record: ForecastRecord,
    ) -> Result<AppendOutcome, DashboardError> {
        if matches!(record.date.weekday(), Weekday::Sat | Weekday::Sun) {
            return Ok(AppendOutcome::Weekend);
        }

        let existing = self.store.load()?;
        if existing.iter().any(|r| r.date == record.date) {
            return Ok(AppendOutcome::AlreadyRecorded);
        }

        self.store.append(&record)?;
        tracing::debug!(date = %record.date, price = record.forecast_price, "forecast recorded");
        Ok(AppendOutcome::Appended)
    }

    /// Full history, ordered by date.
    pub fn load(&self) -> Result<Vec<ForecastRecord>, DashboardError> {
        Ok(self.store.load()?)
    }
}
