//! Wire formats for the quote/chart/summary endpoints. Every field is
//! optional: a missing value degrades to a placeholder downstream.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    pub result: Option<Vec<ChartData>>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
pub struct ChartIndicators {
    pub quote: Vec<OhlcvArrays>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OhlcvArrays {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteResponse {
    #[serde(rename = "quoteResponse")]
    pub quote_response: QuoteEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct QuoteEnvelope {
    #[serde(default)]
    pub result: Vec<QuoteDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteDto {
    pub symbol: Option<String>,
    pub market_state: Option<String>,
    pub regular_market_price: Option<f64>,
    pub regular_market_previous_close: Option<f64>,
    pub regular_market_open: Option<f64>,
    pub regular_market_volume: Option<f64>,
    pub average_daily_volume3_month: Option<f64>,
    pub regular_market_day_low: Option<f64>,
    pub regular_market_day_high: Option<f64>,
    pub bid: Option<f64>,
    pub bid_size: Option<i64>,
    pub ask: Option<f64>,
    pub ask_size: Option<i64>,
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    pub eps_trailing_twelve_months: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub earnings_timestamp_start: Option<i64>,
    pub earnings_timestamp_end: Option<i64>,
    pub average_analyst_rating: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub news: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    #[serde(rename = "providerPublishTime")]
    pub provider_publish_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    pub quote_summary: QuoteSummaryEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummaryEnvelope {
    #[serde(default)]
    pub result: Vec<QuoteSummaryResult>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummaryResult {
    #[serde(rename = "esgScores")]
    pub esg_scores: Option<EsgScoresDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsgScoresDto {
    pub total_esg: Option<RawValue>,
    pub percentile: Option<RawValue>,
    pub environment_score: Option<RawValue>,
    pub social_score: Option<RawValue>,
    pub governance_score: Option<RawValue>,
}

/// Yahoo wraps numeric summary fields as `{"raw": ..., "fmt": ...}`.
#[derive(Debug, Deserialize)]
pub struct RawValue {
    pub raw: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatiosTtmDto {
    #[serde(rename = "quickRatioTTM")]
    pub quick_ratio_ttm: Option<f64>,
    #[serde(rename = "priceEarningsRatioTTM")]
    pub price_earnings_ratio_ttm: Option<f64>,
    #[serde(rename = "debtEquityRatioTTM")]
    pub debt_equity_ratio_ttm: Option<f64>,
    #[serde(rename = "grossProfitMarginTTM")]
    pub gross_profit_margin_ttm: Option<f64>,
    #[serde(rename = "netProfitMarginTTM")]
    pub net_profit_margin_ttm: Option<f64>,
    #[serde(rename = "inventoryTurnoverTTM")]
    pub inventory_turnover_ttm: Option<f64>,
}
