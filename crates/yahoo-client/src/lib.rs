pub mod dto;
pub mod scraper;

pub use scraper::SpotScraper;

use async_trait::async_trait;
use chrono::DateTime;
use dashboard_core::{
    AnalystRating, Bar, DashboardError, EsgScores, FundamentalRatios, MarketDataProvider,
    NewsHeadline, PriceSeries, Quote, SessionState,
};
use dto::{ChartResponse, QuoteDto, QuoteResponse, QuoteSummaryResponse, RatiosTtmDto, SearchResponse};
use reqwest::Client;
use std::time::Duration;

const BASE_URL: &str = "https://query1.finance.yahoo.com";
const RATIOS_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// Symbol whose quote supplies the exchange-wide market state.
const STATUS_SYMBOL: &str = "SPY";

fn unavailable(e: impl ToString) -> DashboardError {
    DashboardError::DataUnavailable(e.to_string())
}

/// Market data adapter over the public quote/chart/summary endpoints.
/// Fundamental ratios come from a separate ratios API and need its key.
#[derive(Clone)]
pub struct YahooClient {
    client: Client,
    ratios_api_key: Option<String>,
}

impl YahooClient {
    pub fn new(ratios_api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            ratios_api_key,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, DashboardError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(unavailable)?;

        if !response.status().is_success() {
            return Err(DashboardError::DataUnavailable(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response.json::<T>().await.map_err(unavailable)
    }

    async fn quote_dto(&self, symbol: &str) -> Result<QuoteDto, DashboardError> {
        let url = format!("{BASE_URL}/v7/finance/quote");
        let parsed: QuoteResponse = self.get_json(&url, &[("symbols", symbol)]).await?;
        parsed
            .quote_response
            .result
            .into_iter()
            .next()
            .ok_or_else(|| unavailable(format!("no quote returned for {symbol}")))
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn history(
        &self,
        symbol: &str,
        range: &str,
        interval: &str,
    ) -> Result<PriceSeries, DashboardError> {
        let url = format!("{BASE_URL}/v8/finance/chart/{symbol}");
        let parsed: ChartResponse = self
            .get_json(&url, &[("range", range), ("interval", interval)])
            .await?;

        let data = parsed
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| unavailable(format!("no chart data for {symbol}")))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .unwrap_or_default();

        let mut bars = Vec::with_capacity(data.timestamp.len());
        for (i, ts) in data.timestamp.iter().enumerate() {
            let point = (
                quote.open.get(i).copied().flatten(),
                quote.high.get(i).copied().flatten(),
                quote.low.get(i).copied().flatten(),
                quote.close.get(i).copied().flatten(),
            );
            // Null points (halts, padding) are dropped rather than zeroed
            if let (Some(open), Some(high), Some(low), Some(close)) = point {
                if let Some(timestamp) = DateTime::from_timestamp(*ts, 0) {
                    bars.push(Bar {
                        timestamp,
                        open,
                        high,
                        low,
                        close,
                        volume: quote.volume.get(i).copied().flatten().unwrap_or(0.0),
                    });
                }
            }
        }

        tracing::debug!(symbol, range, interval, bars = bars.len(), "history fetched");
        Ok(PriceSeries::new(bars))
    }

    async fn quote(&self, symbol: &str) -> Result<Quote, DashboardError> {
        let dto = self.quote_dto(symbol).await?;
        Ok(Quote {
            symbol: dto.symbol.unwrap_or_else(|| symbol.to_string()),
            price: dto.regular_market_price,
            previous_close: dto.regular_market_previous_close,
            open: dto.regular_market_open,
            volume: dto.regular_market_volume,
            average_volume: dto.average_daily_volume3_month,
            day_low: dto.regular_market_day_low,
            day_high: dto.regular_market_day_high,
            bid: dto.bid,
            bid_size: dto.bid_size,
            ask: dto.ask,
            ask_size: dto.ask_size,
            market_cap: dto.market_cap,
            trailing_pe: dto.trailing_pe,
            eps_ttm: dto.eps_trailing_twelve_months,
            fifty_two_week_low: dto.fifty_two_week_low,
            fifty_two_week_high: dto.fifty_two_week_high,
            earnings_start: dto
                .earnings_timestamp_start
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
            earnings_end: dto
                .earnings_timestamp_end
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    async fn market_status(&self) -> Result<SessionState, DashboardError> {
        let dto = self.quote_dto(STATUS_SYMBOL).await?;
        let state = dto
            .market_state
            .ok_or_else(|| unavailable("quote carried no market state"))?;
        Ok(SessionState::from_status(&state))
    }

    async fn news(&self, symbol: &str) -> Result<Vec<NewsHeadline>, DashboardError> {
        let url = format!("{BASE_URL}/v1/finance/search");
        let parsed: SearchResponse = self.get_json(&url, &[("q", symbol)]).await?;

        Ok(parsed
            .news
            .into_iter()
            .map(|item| NewsHeadline {
                title: item.title,
                link: item.link,
                published: item
                    .provider_publish_time
                    .and_then(|ts| DateTime::from_timestamp(ts, 0)),
            })
            .collect())
    }

    async fn esg_scores(&self, symbol: &str) -> Result<EsgScores, DashboardError> {
        let url = format!("{BASE_URL}/v10/finance/quoteSummary/{symbol}");
        let parsed: QuoteSummaryResponse =
            self.get_json(&url, &[("modules", "esgScores")]).await?;

        let esg = parsed
            .quote_summary
            .result
            .into_iter()
            .next()
            .and_then(|r| r.esg_scores)
            .ok_or_else(|| unavailable(format!("no ESG scores for {symbol}")))?;

        let total = esg
            .total_esg
            .and_then(|v| v.raw)
            .ok_or_else(|| unavailable(format!("no total ESG score for {symbol}")))?;

        Ok(EsgScores {
            total,
            percentile: esg.percentile.and_then(|v| v.raw),
            environment: esg.environment_score.and_then(|v| v.raw),
            social: esg.social_score.and_then(|v| v.raw),
            governance: esg.governance_score.and_then(|v| v.raw),
        })
    }

    async fn fundamental_ratios(
        &self,
        symbol: &str,
    ) -> Result<FundamentalRatios, DashboardError> {
        let api_key = self
            .ratios_api_key
            .as_deref()
            .ok_or_else(|| unavailable("ratios API key not configured"))?;

        let url = format!("{RATIOS_BASE_URL}/ratios-ttm/{symbol}");
        let parsed: Vec<RatiosTtmDto> = self.get_json(&url, &[("apikey", api_key)]).await?;
        let dto = parsed
            .into_iter()
            .next()
            .ok_or_else(|| unavailable(format!("no ratios returned for {symbol}")))?;

        Ok(FundamentalRatios {
            quick_ratio: dto.quick_ratio_ttm,
            price_to_earnings: dto.price_earnings_ratio_ttm,
            debt_to_equity: dto.debt_equity_ratio_ttm,
            gross_margin: dto.gross_profit_margin_ttm,
            net_profit_margin: dto.net_profit_margin_ttm,
            inventory_turnover: dto.inventory_turnover_ttm,
        })
    }

    async fn analyst_rating(&self, symbol: &str) -> Result<AnalystRating, DashboardError> {
        let dto = self.quote_dto(symbol).await?;
        let rating = dto
            .average_analyst_rating
            .ok_or_else(|| unavailable(format!("no analyst rating for {symbol}")))?;

        // Wire format is "2.0 - Buy": the leading number is the score
        let score = rating
            .split(" - ")
            .next()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .ok_or_else(|| unavailable(format!("unparseable analyst rating '{rating}'")))?;

        Ok(AnalystRating { score })
    }
}
