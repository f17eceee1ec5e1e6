use async_trait::async_trait;
use dashboard_core::{DashboardError, Forecast, ForecastProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    ticker: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    forecast: f64,
    #[serde(rename = "CI")]
    ci: ConfidenceInterval,
}

#[derive(Debug, Deserialize)]
struct ConfidenceInterval {
    min: f64,
    max: f64,
}

/// HTTP client for the external forecasting service.
#[derive(Clone)]
pub struct ForecastClient {
    client: reqwest::Client,
    base_url: String,
}

impl ForecastClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client, base_url }
    }

    /// Check service health
    pub async fn health(&self) -> Result<bool, DashboardError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| DashboardError::DataUnavailable(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

#[async_trait]
impl ForecastProvider for ForecastClient {
    async fn predict(&self, symbol: &str) -> Result<Forecast, DashboardError> {
        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(&PredictRequest { ticker: symbol })
            .send()
            .await
            .map_err(|e| DashboardError::DataUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DashboardError::DataUnavailable(format!(
                "forecast service returned {}",
                response.status()
            )));
        }

        let parsed = response
            .json::<PredictResponse>()
            .await
            .map_err(|e| DashboardError::DataUnavailable(e.to_string()))?;

        Ok(Forecast {
            forecast_price: parsed.forecast,
            confidence_min: parsed.ci.min,
            confidence_max: parsed.ci.max,
        })
    }

    async fn refit(&self, symbol: &str) -> Result<(), DashboardError> {
        let response = self
            .client
            .post(format!("{}/update", self.base_url))
            .json(&PredictRequest { ticker: symbol })
            .send()
            .await
            .map_err(|e| DashboardError::DataUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DashboardError::DataUnavailable(format!(
                "model update returned {}",
                response.status()
            )));
        }
        tracing::info!(symbol, "forecast model updated");
        Ok(())
    }
}
