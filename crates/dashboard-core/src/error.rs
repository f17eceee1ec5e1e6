use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// Upstream provider/scraper failed or returned malformed data.
    /// Always recovered locally with a placeholder, never a crash.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] std::io::Error),

    /// A superseded refresh whose result must be discarded silently.
    #[error("stale refresh discarded")]
    Stale,
}

pub type Result<T> = std::result::Result<T, DashboardError>;
