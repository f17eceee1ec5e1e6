use crate::{
    AnalystRating, DashboardError, EsgScores, Forecast, FundamentalRatios, NewsHeadline,
    PriceSeries, Quote, SessionState,
};
use async_trait::async_trait;

/// Market data capability: quotes, history, news and company panels.
/// Any network/parse error surfaces as DataUnavailable, never a crash.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn history(
        &self,
        symbol: &str,
        range: &str,
        interval: &str,
    ) -> Result<PriceSeries, DashboardError>;

    async fn quote(&self, symbol: &str) -> Result<Quote, DashboardError>;

    async fn market_status(&self) -> Result<SessionState, DashboardError>;

    async fn news(&self, symbol: &str) -> Result<Vec<NewsHeadline>, DashboardError>;

    async fn esg_scores(&self, symbol: &str) -> Result<EsgScores, DashboardError>;

    async fn fundamental_ratios(&self, symbol: &str)
        -> Result<FundamentalRatios, DashboardError>;

    async fn analyst_rating(&self, symbol: &str) -> Result<AnalystRating, DashboardError>;
}

/// Forecasting capability reached over HTTP. Non-success status means
/// "unavailable", reported to the user inline rather than propagated.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn predict(&self, symbol: &str) -> Result<Forecast, DashboardError>;

    /// Asks the service to refit its model after the session close.
    /// Providers without a refit step accept the default no-op.
    async fn refit(&self, _symbol: &str) -> Result<(), DashboardError> {
        Ok(())
    }
}

/// Single current price point scraped from a known page structure.
/// A structural mismatch yields Ok(None), not an error.
#[async_trait]
pub trait SpotPriceScraper: Send + Sync {
    async fn spot_price(
        &self,
        symbol: &str,
        session: SessionState,
    ) -> Result<Option<f64>, DashboardError>;
}
