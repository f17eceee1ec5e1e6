use crate::config::DashboardConfig;
use crate::state::{CompanyPanel, DashboardState, ForecastPanel, SpotTile};
use chart_composer::{
    compose_forecast_history_chart, compose_main_chart, compose_realtime_chart, ChartSpec,
    ChartStyle, Layout, LineStyle, Panel, Trace, TraceKind,
};
use chrono::NaiveDate;
use dashboard_core::{
    DashboardError, Forecast, ForecastProvider, ForecastRecord, MarketDataProvider, PriceSeries,
    SessionState, SpotPriceScraper,
};
use forecast_history::ForecastTracker;
use indicators::Study;
use session_clock::{derive_session, market_close, status_line, venue_now, StatusLine};
use std::sync::Arc;
use tokio::sync::RwLock;

const NEWS_MAX_ROWS: usize = 10;

/// User selection bound to the main chart. Studies keep the insertion
/// order of the current selection; deselecting and reselecting a study
/// moves it to the end.
#[derive(Debug, Clone)]
pub struct Selection {
    pub company: String,
    pub duration: String,
    pub style: ChartStyle,
    pub studies: Vec<Study>,
}

impl Selection {
    pub fn initial(company: &str) -> Self {
        Selection {
            company: company.to_string(),
            duration: "1mo".to_string(),
            style: ChartStyle::Ohlc,
            studies: Vec::new(),
        }
    }
}

/// Binds user selection and refresh triggers to the chart composers and
/// provider adapters, publishing results into DashboardState. Provider
/// failures stay local to their slot; a superseded refresh is discarded.
pub struct DashboardController {
    config: DashboardConfig,
    market: Arc<dyn MarketDataProvider>,
    forecaster: Arc<dyn ForecastProvider>,
    scraper: Arc<dyn SpotPriceScraper>,
    tracker: ForecastTracker,
    pub state: DashboardState,
    selection: RwLock<Selection>,
    last_model_refit: RwLock<Option<NaiveDate>>,
}

impl DashboardController {
    pub fn new(
        config: DashboardConfig,
        market: Arc<dyn MarketDataProvider>,
        forecaster: Arc<dyn ForecastProvider>,
        scraper: Arc<dyn SpotPriceScraper>,
        tracker: ForecastTracker,
    ) -> Self {
        let selection = Selection::initial(&config.default_company);
        Self {
            config,
            market,
            forecaster,
            scraper,
            tracker,
            state: DashboardState::new(),
            selection: RwLock::new(selection),
            last_model_refit: RwLock::new(None),
        }
    }

    pub async fn selection(&self) -> Selection {
        self.selection.read().await.clone()
    }

    /// Applies a new user selection and recomposes everything bound to it.
    /// Each refresh fails independently; a slow previous refresh of the
    /// same slot is superseded by the sequence check.
    pub async fn apply_selection(&self, selection: Selection) {
        *self.selection.write().await = selection;

        if let Err(e) = self.refresh_main_chart().await {
            tracing::warn!("main chart refresh failed: {e}");
        }
        if let Err(e) = self.refresh_realtime_chart(true).await {
            tracing::warn!("realtime chart refresh failed: {e}");
        }
        if let Err(e) = self.refresh_news().await {
            tracing::warn!("news refresh failed: {e}");
        }
        self.refresh_quote_panel(true).await;
        self.refresh_company_panel().await;
        if let Err(e) = self.refresh_forecast().await {
            tracing::warn!("forecast refresh failed: {e}");
        }
    }

    /// Session state: provider ground truth, local clock as fallback.
    pub async fn current_session(&self) -> SessionState {
        match self.market.market_status().await {
            Ok(state) => state,
            Err(e) => {
                tracing::debug!("market status unavailable, deriving locally: {e}");
                derive_session(venue_now().naive_local())
            }
        }
    }

    /// Recomposes the main chart from the current selection.
    pub async fn refresh_main_chart(&self) -> Result<(), DashboardError> {
        let selection = self.selection().await;
        let token = self.state.main_chart.begin();

        let series = self
            .market
            .history(&selection.company, &selection.duration, "1d")
            .await?;
        let spec = compose_main_chart(&series, &selection.studies, selection.style);

        self.state.main_chart.publish(token, spec).await
    }

    /// Recomposes the intraday chart. Timer-driven refreshes are skipped
    /// outside regular hours; selection changes pass `forced`.
    pub async fn refresh_realtime_chart(&self, forced: bool) -> Result<(), DashboardError> {
        let session = self.current_session().await;
        if !forced && session != SessionState::Open {
            return Ok(());
        }

        let company = self.selection().await.company;
        let token = self.state.realtime_chart.begin();

        let series = self.market.history(&company, "1d", "1m").await?;
        let quote = self.market.quote(&company).await?;
        let spec = compose_realtime_chart(
            &series,
            quote.price,
            quote.previous_close,
            venue_now().naive_local(),
        );

        self.state.realtime_chart.publish(token, spec).await
    }

    /// Market-status banner. Provider failure renders the "--" banner.
    pub async fn refresh_status(&self) {
        let token = self.state.status.begin();
        let line = match self.market.market_status().await {
            Ok(state) => status_line(state, venue_now().time()),
            Err(e) => {
                tracing::debug!("market status unavailable: {e}");
                StatusLine::unavailable()
            }
        };
        if self.state.status.publish(token, line).await.is_err() {
            tracing::debug!("stale status refresh discarded");
        }
    }

    /// Quote side panel. A failed fetch shows "--" placeholders.
    /// Timer-driven refreshes are skipped outside regular hours.
    pub async fn refresh_quote_panel(&self, forced: bool) {
        if !forced && self.current_session().await != SessionState::Open {
            return;
        }

        let company = self.selection().await.company;
        let token = self.state.quote_panel.begin();
        let quote = match self.market.quote(&company).await {
            Ok(quote) => Some(quote),
            Err(e) => {
                tracing::warn!("quote unavailable for {company}: {e}");
                None
            }
        };
        if self.state.quote_panel.publish(token, quote).await.is_err() {
            tracing::debug!("stale quote refresh discarded");
        }
    }

    pub async fn refresh_news(&self) -> Result<(), DashboardError> {
        let company = self.selection().await.company;
        let token = self.state.news.begin();

        let mut headlines = self.market.news(&company).await?;
        headlines.truncate(NEWS_MAX_ROWS);

        self.state.news.publish(token, headlines).await
    }

    /// ESG / ratios / analyst-rating panel. Each sub-fetch degrades to its
    /// own "feature not available" placeholder without touching the others.
    pub async fn refresh_company_panel(&self) {
        let company = self.selection().await.company;
        let token = self.state.company_panel.begin();

        let panel = CompanyPanel {
            esg: self
                .market
                .esg_scores(&company)
                .await
                .map_err(|e| tracing::debug!("ESG unavailable for {company}: {e}"))
                .ok(),
            ratios: self
                .market
                .fundamental_ratios(&company)
                .await
                .map_err(|e| tracing::debug!("ratios unavailable for {company}: {e}"))
                .ok(),
            rating: self
                .market
                .analyst_rating(&company)
                .await
                .map_err(|e| tracing::debug!("rating unavailable for {company}: {e}"))
                .ok(),
        };

        if self.state.company_panel.publish(token, panel).await.is_err() {
            tracing::debug!("stale company panel refresh discarded");
        }
    }

    /// Pre/post-market price tile from the page scraper. During regular
    /// hours the reference is the quoted previous close; outside them it
    /// is the last settled daily close.
    pub async fn refresh_spot(&self) {
        let company = self.selection().await.company;
        let session = self.current_session().await;
        let token = self.state.spot.begin();

        let price = match self.scraper.spot_price(&company, session).await {
            Ok(price) => price,
            Err(e) => {
                tracing::debug!("spot price unavailable for {company}: {e}");
                None
            }
        };

        let reference = if session == SessionState::Open {
            self.market
                .quote(&company)
                .await
                .ok()
                .and_then(|q| q.previous_close)
        } else {
            self.market
                .history(&company, "1d", "1d")
                .await
                .ok()
                .and_then(|s| s.last().map(|b| b.close))
        };

        let tile = SpotTile { price, reference };
        if self.state.spot.publish(token, tile).await.is_err() {
            tracing::debug!("stale spot refresh discarded");
        }
    }

    /// Forecast modal: next-day price tile plus the forecast-history
    /// comparison chart. Provider failure (or a symbol without a model)
    /// publishes the inline "unavailable" message and appends nothing.
    pub async fn refresh_forecast(&self) -> Result<(), DashboardError> {
        let company = self.selection().await.company;
        let token = self.state.forecast.begin();

        if !self.config.forecast_symbols.contains(&company) {
            return self
                .state
                .forecast
                .publish(token, unavailable_panel(&company))
                .await;
        }

        let forecast = match self.forecaster.predict(&company).await {
            Ok(forecast) => forecast,
            Err(e) => {
                tracing::warn!("forecast unavailable for {company}: {e}");
                return self
                    .state
                    .forecast
                    .publish(token, unavailable_panel(&company))
                    .await;
            }
        };

        let today = venue_now().date_naive();
        let outcome = self.tracker.append_if_new(ForecastRecord {
            date: today,
            min_confidence: forecast.confidence_min,
            max_confidence: forecast.confidence_max,
            forecast_price: forecast.forecast_price,
        })?;
        tracing::debug!(?outcome, "forecast history append");

        let history = self.tracker.load()?;
        let session = self.current_session().await;
        let actual = self
            .market
            .history(&company, "ytd", "1d")
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("actual price history unavailable for {company}: {e}");
                PriceSeries::default()
            });

        let reference = self
            .market
            .quote(&company)
            .await
            .ok()
            .and_then(|q| q.previous_close);

        let panel = ForecastPanel::Ready {
            tile: forecast_tile(&forecast, reference),
            history_chart: compose_forecast_history_chart(&history, &actual, session),
        };
        self.state.forecast.publish(token, panel).await
    }

    /// Refits the forecast model once per day after the 16:01 close
    /// boundary, while the session reports Post.
    pub async fn maybe_refit_model(&self) {
        let now = venue_now();
        if now.time() < market_close() {
            return;
        }

        let today = now.date_naive();
        if *self.last_model_refit.read().await == Some(today) {
            return;
        }

        if self.current_session().await != SessionState::Post {
            return;
        }

        for symbol in &self.config.forecast_symbols {
            if let Err(e) = self.forecaster.refit(symbol).await {
                tracing::warn!("model refit failed for {symbol}: {e}");
                return;
            }
        }
        *self.last_model_refit.write().await = Some(today);
    }
}

fn unavailable_panel(company: &str) -> ForecastPanel {
    ForecastPanel::Unavailable {
        message: format!("forecasting unavailable for {company}"),
    }
}

/// Big-number tile for the next-day forecast against the reference close.
fn forecast_tile(forecast: &Forecast, reference: Option<f64>) -> ChartSpec {
    ChartSpec {
        panels: vec![Panel {
            traces: vec![Trace {
                name: "Forecast Price".to_string(),
                kind: TraceKind::PriceTile {
                    value: Some(forecast.forecast_price),
                    reference,
                },
                x: vec![],
                show_legend: false,
                line: LineStyle::solid(),
                fill_to_previous: false,
                hover: None,
                text: None,
            }],
        }],
        layout: Layout::compact(),
    }
}
