use chart_composer::ChartSpec;
use dashboard_core::{
    AnalystRating, DashboardError, EsgScores, FundamentalRatios, NewsHeadline, Quote,
};
use session_clock::StatusLine;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A state slot guarded by a monotonic request sequence. A refresh takes a
/// token before its fetch and the result is accepted only while that token
/// is still current, so a superseded refresh is discarded instead of being
/// applied out of order.
pub struct Versioned<T> {
    seq: AtomicU64,
    value: RwLock<T>,
}

impl<T: Clone> Versioned<T> {
    pub fn new(initial: T) -> Self {
        Self {
            seq: AtomicU64::new(0),
            value: RwLock::new(initial),
        }
    }

    /// Starts a refresh, superseding any in-flight one.
    pub fn begin(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Stores the value if `token` is still the latest refresh.
    pub async fn publish(&self, token: u64, value: T) -> Result<(), DashboardError> {
        if self.seq.load(Ordering::SeqCst) != token {
            return Err(DashboardError::Stale);
        }
        *self.value.write().await = value;
        Ok(())
    }

    pub async fn get(&self) -> T {
        self.value.read().await.clone()
    }
}

/// ESG / ratios / analyst-rating side panel. Each slot degrades to a
/// "feature not available" placeholder independently.
#[derive(Debug, Clone, Default)]
pub struct CompanyPanel {
    pub esg: Option<EsgScores>,
    pub ratios: Option<FundamentalRatios>,
    pub rating: Option<AnalystRating>,
}

/// Pre/post-market price tile: scraped spot price against a reference close.
#[derive(Debug, Clone, Default)]
pub struct SpotTile {
    pub price: Option<f64>,
    pub reference: Option<f64>,
}

/// Forecast modal state.
#[derive(Debug, Clone)]
pub enum ForecastPanel {
    /// Provider failed or the symbol has no model; `message` is shown inline.
    Unavailable { message: String },
    Ready {
        /// Next-day price tile (forecast vs. reference close).
        tile: ChartSpec,
        /// Forecast-history comparison chart.
        history_chart: ChartSpec,
    },
}

impl Default for ForecastPanel {
    fn default() -> Self {
        ForecastPanel::Unavailable {
            message: "forecasting unavailable".to_string(),
        }
    }
}

/// Latest composed artifacts, read by the presentation layer.
pub struct DashboardState {
    pub main_chart: Versioned<ChartSpec>,
    pub realtime_chart: Versioned<ChartSpec>,
    pub status: Versioned<StatusLine>,
    pub quote_panel: Versioned<Option<Quote>>,
    pub news: Versioned<Vec<NewsHeadline>>,
    pub company_panel: Versioned<CompanyPanel>,
    pub spot: Versioned<SpotTile>,
    pub forecast: Versioned<ForecastPanel>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            main_chart: Versioned::new(ChartSpec::empty()),
            realtime_chart: Versioned::new(ChartSpec::empty()),
            status: Versioned::new(StatusLine::unavailable()),
            quote_panel: Versioned::new(None),
            news: Versioned::new(Vec::new()),
            company_panel: Versioned::new(CompanyPanel::default()),
            spot: Versioned::new(SpotTile::default()),
            forecast: Versioned::new(ForecastPanel::default()),
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_with_current_token_lands() {
        let slot = Versioned::new(0u32);
        let token = slot.begin();
        slot.publish(token, 7).await.unwrap();
        assert_eq!(slot.get().await, 7);
    }

    #[tokio::test]
    async fn superseded_refresh_is_discarded() {
        let slot = Versioned::new(0u32);
        let stale = slot.begin();
        let fresh = slot.begin();

        // The newer request completes first
        slot.publish(fresh, 2).await.unwrap();
        let result = slot.publish(stale, 1).await;

        assert!(matches!(result, Err(DashboardError::Stale)));
        assert_eq!(slot.get().await, 2);
    }
}
