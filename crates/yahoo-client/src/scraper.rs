use async_trait::async_trait;
use dashboard_core::{DashboardError, SessionState, SpotPriceScraper};
use rand::seq::SliceRandom;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::time::Duration;

const QUOTE_PAGE_URL: &str = "https://finance.yahoo.com/quote";

/// Price span class during regular hours.
const REGULAR_MARKER: &str = r#"<span class="Trsdu(0.3s) Fw(b) Fz(36px) Mb(-4px) D(ib)""#;
/// Price span class shown pre/post market.
const EXTENDED_MARKER: &str = r#"<span class="C($primaryColor) Fz(24px) Fw(b)""#;

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.3 Safari/605.1.15",
];

/// Scrapes the single current price off the public quote page. The page
/// structure shifts between regular and extended hours; a structural
/// mismatch yields Ok(None), never an error.
pub struct SpotScraper {
    client: Client,
}

impl Default for SpotScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl SpotScraper {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

#[async_trait]
impl SpotPriceScraper for SpotScraper {
    async fn spot_price(
        &self,
        symbol: &str,
        session: SessionState,
    ) -> Result<Option<f64>, DashboardError> {
        let url = format!("{QUOTE_PAGE_URL}/{symbol}?p={symbol}");
        let agent = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);

        let body = self
            .client
            .get(&url)
            .header(USER_AGENT, agent)
            .send()
            .await
            .map_err(|e| DashboardError::DataUnavailable(e.to_string()))?
            .text()
            .await
            .map_err(|e| DashboardError::DataUnavailable(e.to_string()))?;

        let marker = match session {
            SessionState::Open | SessionState::Closed => REGULAR_MARKER,
            SessionState::Pre | SessionState::Post => EXTENDED_MARKER,
        };

        let price = extract_price(&body, marker);
        if price.is_none() {
            tracing::debug!(symbol, "price span not found on quote page");
        }
        Ok(price)
    }
}

/// Pulls the text content of the first span matching `marker` and parses
/// it as a price ("1,234.56" included).
fn extract_price(body: &str, marker: &str) -> Option<f64> {
    let at = body.find(marker)?;
    let rest = &body[at..];
    let start = rest.find('>')? + 1;
    let end = rest[start..].find('<')? + start;
    rest[start..end].replace(',', "").trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_regular_hours_price() {
        let body = format!("<html>{REGULAR_MARKER} data-reactid=\"32\">1,234.56</span></html>");
        assert_eq!(extract_price(&body, REGULAR_MARKER), Some(1234.56));
    }

    #[test]
    fn extracts_extended_hours_price() {
        let body = format!("<html>{EXTENDED_MARKER}>189.04</span></html>");
        assert_eq!(extract_price(&body, EXTENDED_MARKER), Some(189.04));
    }

    #[test]
    fn structural_mismatch_yields_none() {
        assert_eq!(extract_price("<html><body/></html>", REGULAR_MARKER), None);
        let body = format!("<html>{REGULAR_MARKER}>not a price</span></html>");
        assert_eq!(extract_price(&body, REGULAR_MARKER), None);
    }
}
