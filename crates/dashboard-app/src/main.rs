use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use forecast_client::ForecastClient;
use forecast_history::{CsvHistoryStore, ForecastTracker};
use tokio::signal::unix::SignalKind;
use tokio::sync::watch;
use yahoo_client::{SpotScraper, YahooClient};

mod config;
mod controller;
mod scheduler;
mod state;


use config::DashboardConfig;
use controller::{DashboardController, Selection};
use scheduler::{log_refresh, spawn_periodic};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env, init tracing
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    tracing::info!("Starting Marketdeck dashboard");

    // 2. Load configuration
    let config = DashboardConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Companies: {}", config.companies.join(", "));
    tracing::info!("  Forecast service: {}", config.forecast_base_url);
    tracing::info!("  History file: {}", config.history_path.display());
    tracing::info!(
        "  Refresh periods: news {}s, quotes {}s, status {}s, realtime {}s, spot {}s",
        config.news_refresh_seconds,
        config.quote_refresh_seconds,
        config.status_refresh_seconds,
        config.realtime_refresh_seconds,
        config.spot_refresh_seconds
    );

    // 3. Build provider adapters and the forecast tracker
    let market = Arc::new(YahooClient::new(config.ratios_api_key.clone()));
    let forecaster = Arc::new(ForecastClient::new(
        config.forecast_base_url.clone(),
        Duration::from_secs(config.http_timeout_seconds),
    ));
    let scraper = Arc::new(SpotScraper::new());
    let tracker = ForecastTracker::new(Box::new(CsvHistoryStore::new(
        config.history_path.clone(),
    )));

    // 4. Forecast service check (warn-only, not fatal)
    match forecaster.health().await {
        Ok(true) => tracing::info!("Startup check: forecast service OK"),
        Ok(false) => tracing::warn!(
            "Startup check: forecast service unhealthy — forecasts will show as unavailable"
        ),
        Err(e) => tracing::warn!(
            "Startup check: forecast service unreachable ({e}) — forecasts will show as unavailable"
        ),
    }

    let controller = Arc::new(DashboardController::new(
        config.clone(),
        market,
        forecaster,
        scraper,
        tracker,
    ));

    // 5. Initial population: everything bound to the default selection
    controller
        .apply_selection(Selection::initial(&config.default_company))
        .await;
    controller.refresh_status().await;
    controller.refresh_spot().await;
    tracing::info!("Initial dashboard state composed");

    // 6. Independent periodic refresh tasks, one per refresh class
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut tasks = Vec::new();

    let c = Arc::clone(&controller);
    tasks.push(spawn_periodic(
        "status",
        Duration::from_secs(config.status_refresh_seconds),
        shutdown_rx.clone(),
        move || {
            let c = Arc::clone(&c);
            async move { c.refresh_status().await }
        },
    ));

    let c = Arc::clone(&controller);
    tasks.push(spawn_periodic(
        "quotes",
        Duration::from_secs(config.quote_refresh_seconds),
        shutdown_rx.clone(),
        move || {
            let c = Arc::clone(&c);
            async move { c.refresh_quote_panel(false).await }
        },
    ));

    let c = Arc::clone(&controller);
    tasks.push(spawn_periodic(
        "news",
        Duration::from_secs(config.news_refresh_seconds),
        shutdown_rx.clone(),
        move || {
            let c = Arc::clone(&c);
            async move { log_refresh("news", c.refresh_news().await) }
        },
    ));

    let c = Arc::clone(&controller);
    tasks.push(spawn_periodic(
        "realtime-chart",
        Duration::from_secs(config.realtime_refresh_seconds),
        shutdown_rx.clone(),
        move || {
            let c = Arc::clone(&c);
            async move { log_refresh("realtime-chart", c.refresh_realtime_chart(false).await) }
        },
    ));

    let c = Arc::clone(&controller);
    tasks.push(spawn_periodic(
        "main-chart",
        Duration::from_secs(config.main_chart_refresh_seconds),
        shutdown_rx.clone(),
        move || {
            let c = Arc::clone(&c);
            async move { log_refresh("main-chart", c.refresh_main_chart().await) }
        },
    ));

    let c = Arc::clone(&controller);
    tasks.push(spawn_periodic(
        "spot-price",
        Duration::from_secs(config.spot_refresh_seconds),
        shutdown_rx.clone(),
        move || {
            let c = Arc::clone(&c);
            async move { c.refresh_spot().await }
        },
    ));

    let c = Arc::clone(&controller);
    tasks.push(spawn_periodic(
        "forecast-sync",
        Duration::from_secs(config.forecast_check_seconds),
        shutdown_rx.clone(),
        move || {
            let c = Arc::clone(&c);
            async move { c.maybe_refit_model().await }
        },
    ));

    tracing::info!("Dashboard is running. Press Ctrl+C to stop.");

    // 7. Graceful shutdown on SIGINT/SIGTERM
    let mut sigterm = tokio::signal::unix::signal(SignalKind::terminate())?;
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received SIGINT");
        }
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM");
        }
    }

    shutdown_tx.send(true).ok();
    for task in tasks {
        task.await.ok();
    }

    tracing::info!("Dashboard shut down.");
    Ok(())
}
