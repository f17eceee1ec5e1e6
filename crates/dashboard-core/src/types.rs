use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Ordered, timestamp-unique sequence of bars. Built once per fetch and
/// treated as immutable afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSeries(Vec<Bar>);

impl PriceSeries {
    /// Sorts ascending and drops duplicate timestamps.
    pub fn new(mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        Self(bars)
    }

    pub fn bars(&self) -> &[Bar] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.0.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.0.iter().map(|b| b.close).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.0.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.0.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.0.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.0.iter().map(|b| b.volume).collect()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.0.iter().map(|b| b.timestamp).collect()
    }
}

/// A named numeric series aligned 1:1 by index to the PriceSeries it was
/// derived from. Warm-up points carry `f64::NAN`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub name: String,
    pub values: Vec<f64>,
}

impl IndicatorSeries {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when no point of the series is defined (e.g. the input was
    /// shorter than the indicator's window).
    pub fn is_all_undefined(&self) -> bool {
        self.values.iter().all(|v| v.is_nan())
    }
}

/// Quote snapshot. Every field is optional so that a missing upstream value
/// renders as "--" instead of failing the whole panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: Option<f64>,
    pub previous_close: Option<f64>,
    pub open: Option<f64>,
    pub volume: Option<f64>,
    pub average_volume: Option<f64>,
    pub day_low: Option<f64>,
    pub day_high: Option<f64>,
    pub bid: Option<f64>,
    pub bid_size: Option<i64>,
    pub ask: Option<f64>,
    pub ask_size: Option<i64>,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub eps_ttm: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub earnings_start: Option<DateTime<Utc>>,
    pub earnings_end: Option<DateTime<Utc>>,
}

/// Market session state. Recomputed on every query, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Closed,
    Pre,
    Open,
    Post,
}

impl SessionState {
    /// Maps upstream status strings ("PRE", "REGULAR", "POST", "POSTPOST",
    /// "CLOSED", ...) onto the session enum. Unknown strings are Closed.
    pub fn from_status(status: &str) -> Self {
        match status.trim().to_ascii_uppercase().as_str() {
            "PRE" => SessionState::Pre,
            "REGULAR" | "OPEN" => SessionState::Open,
            "POST" | "POSTPOST" => SessionState::Post,
            _ => SessionState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, SessionState::Open)
    }
}

/// One day's forecast vs. confidence bounds. Append-only, keyed by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub date: NaiveDate,
    pub min_confidence: f64,
    pub max_confidence: f64,
    pub forecast_price: f64,
}

/// Forecast service output for a single symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub forecast_price: f64,
    pub confidence_min: f64,
    pub confidence_max: f64,
}

/// News headline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsHeadline {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
}

/// ESG risk scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsgScores {
    pub total: f64,
    pub percentile: Option<f64>,
    pub environment: Option<f64>,
    pub social: Option<f64>,
    pub governance: Option<f64>,
}

/// Trailing-twelve-month fundamental ratios
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundamentalRatios {
    pub quick_ratio: Option<f64>,
    pub price_to_earnings: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub gross_margin: Option<f64>,
    pub net_profit_margin: Option<f64>,
    pub inventory_turnover: Option<f64>,
}

/// Analyst consensus on a 1.0 (strong buy) to 5.0 (sell) scale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalystRating {
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(secs: i64, close: f64) -> Bar {
        Bar {
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        }
    }

    #[test]
    fn series_sorts_and_dedups() {
        let series = PriceSeries::new(vec![bar(120, 2.0), bar(60, 1.0), bar(120, 3.0)]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![1.0, 2.0]);
    }

    #[test]
    fn session_from_status_strings() {
        assert_eq!(SessionState::from_status("PRE"), SessionState::Pre);
        assert_eq!(SessionState::from_status("REGULAR"), SessionState::Open);
        assert_eq!(SessionState::from_status("POST"), SessionState::Post);
        assert_eq!(SessionState::from_status("POSTPOST"), SessionState::Post);
        assert_eq!(SessionState::from_status("CLOSED"), SessionState::Closed);
        assert_eq!(SessionState::from_status("whatever"), SessionState::Closed);
    }

    #[test]
    fn all_undefined_detects_nan_series() {
        let s = IndicatorSeries::new("RSI(14)", vec![f64::NAN, f64::NAN]);
        assert!(s.is_all_undefined());
        let s = IndicatorSeries::new("RSI(14)", vec![f64::NAN, 51.2]);
        assert!(!s.is_all_undefined());
    }
}
