use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    // Tracked companies
    pub companies: Vec<String>,
    pub default_company: String,
    // Symbols the forecasting service has a model for
    pub forecast_symbols: Vec<String>,

    // External services
    pub forecast_base_url: String,
    pub ratios_api_key: Option<String>,

    // Forecast history persistence
    pub history_path: PathBuf,

    // Refresh periods, one per refresh class
    pub news_refresh_seconds: u64,        // 300
    pub quote_refresh_seconds: u64,       // 30
    pub status_refresh_seconds: u64,      // 20
    pub realtime_refresh_seconds: u64,    // 40
    pub main_chart_refresh_seconds: u64,  // effectively static
    pub spot_refresh_seconds: u64,        // 3
    pub forecast_check_seconds: u64,      // 30

    // HTTP
    pub http_timeout_seconds: u64,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            companies: env::var("DASHBOARD_COMPANIES")
                .unwrap_or_else(|_| "AAPL,FB,TSLA,AMZN,GOOG,TWTR,NFLX".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            default_company: env::var("DASHBOARD_DEFAULT_COMPANY")
                .unwrap_or_else(|_| "AAPL".to_string()),
            forecast_symbols: env::var("FORECAST_SYMBOLS")
                .unwrap_or_else(|_| "AAPL".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),

            forecast_base_url: env::var("FORECAST_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8050".to_string()),
            ratios_api_key: env::var("RATIOS_API_KEY").ok(),

            history_path: env::var("FORECAST_HISTORY_PATH")
                .unwrap_or_else(|_| "history.csv".to_string())
                .into(),

            news_refresh_seconds: env::var("NEWS_REFRESH_SECONDS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()?,
            quote_refresh_seconds: env::var("QUOTE_REFRESH_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            status_refresh_seconds: env::var("STATUS_REFRESH_SECONDS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,
            realtime_refresh_seconds: env::var("REALTIME_REFRESH_SECONDS")
                .unwrap_or_else(|_| "40".to_string())
                .parse()?,
            main_chart_refresh_seconds: env::var("MAIN_CHART_REFRESH_SECONDS")
                .unwrap_or_else(|_| "40000".to_string())
                .parse()?,
            spot_refresh_seconds: env::var("SPOT_REFRESH_SECONDS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()?,
            forecast_check_seconds: env::var("FORECAST_CHECK_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,

            http_timeout_seconds: env::var("HTTP_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
        };

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_tracked_universe() {
        // Only read env defaults; the test must not depend on ambient vars
        let config = DashboardConfig::from_env().unwrap();

        assert!(config.companies.contains(&"AAPL".to_string()));
        assert_eq!(config.companies.len(), 7);
        assert_eq!(config.news_refresh_seconds, 300);
        assert_eq!(config.quote_refresh_seconds, 30);
        assert_eq!(config.spot_refresh_seconds, 3);
    }
}
