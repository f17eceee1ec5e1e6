use dashboard_core::DashboardError;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Spawns one independent periodic refresh task. Each refresh class runs
/// on its own fixed period and stops when the shutdown flag flips.
pub fn spawn_periodic<F, Fut>(
    name: &'static str,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
    task: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => task().await,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::debug!(task = name, "periodic task stopped");
                        break;
                    }
                }
            }
        }
    })
}

/// Logs a refresh outcome: stale discards are expected and quiet, real
/// failures are surfaced.
pub fn log_refresh(name: &'static str, result: Result<(), DashboardError>) {
    match result {
        Ok(()) => {}
        Err(DashboardError::Stale) => {
            tracing::debug!(task = name, "stale refresh discarded");
        }
        Err(e) => tracing::warn!(task = name, "refresh failed: {e}"),
    }
}
