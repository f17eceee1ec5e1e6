use crate::countdown::countdown;
use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use dashboard_core::SessionState;
use serde::Serialize;

/// Countdown window before a session boundary, in hours. Carried over
/// unchanged from the upstream dashboard behavior.
pub const COUNTDOWN_WINDOW_HOURS: i64 = 2;

/// The venue's local timezone.
pub const VENUE_TZ: Tz = chrono_tz::America::New_York;

pub fn market_open() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 31, 0).unwrap()
}

pub fn market_close() -> NaiveTime {
    NaiveTime::from_hms_opt(16, 1, 0).unwrap()
}

pub fn post_market_end() -> NaiveTime {
    NaiveTime::from_hms_opt(20, 0, 0).unwrap()
}

/// Current wall-clock time at the venue.
pub fn venue_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&VENUE_TZ)
}

/// Derives the session from a venue-local timestamp. The market-status
/// provider is ground truth when reachable (it knows holidays); this is
/// the local fallback.
pub fn derive_session(local: NaiveDateTime) -> SessionState {
    if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
        return SessionState::Closed;
    }

    let time = local.time();
    if time < market_open() {
        SessionState::Pre
    } else if time < market_close() {
        SessionState::Open
    } else if time < post_market_end() {
        SessionState::Post
    } else {
        SessionState::Closed
    }
}

pub fn time_until(now: NaiveTime, boundary: NaiveTime) -> chrono::Duration {
    boundary.signed_duration_since(now)
}

/// Rendered market-status banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub label: String,
    pub color: &'static str,
    /// Present only within COUNTDOWN_WINDOW_HOURS of the next boundary.
    pub countdown: Option<String>,
}

impl StatusLine {
    /// Placeholder banner when the status provider is unreachable.
    pub fn unavailable() -> Self {
        StatusLine {
            label: "Market Status : --".to_string(),
            color: "yellow",
            countdown: None,
        }
    }
}

/// Builds the status banner for a session state at a venue-local time.
pub fn status_line(state: SessionState, local: NaiveTime) -> StatusLine {
    match state {
        SessionState::Closed => StatusLine {
            label: "Market Status : Closed".to_string(),
            color: "red",
            countdown: None,
        },
        SessionState::Pre => StatusLine {
            label: "Market Status : Pre-Market".to_string(),
            color: "yellow",
            countdown: boundary_countdown(local, market_open())
                .map(|c| format!("markets open in {c}")),
        },
        SessionState::Open => StatusLine {
            label: "Market Status : Open".to_string(),
            color: "green",
            countdown: boundary_countdown(local, market_close())
                .map(|c| format!("markets close in {c}")),
        },
        SessionState::Post => StatusLine {
            label: "Market Status : Post-Market".to_string(),
            color: "yellow",
            countdown: None,
        },
    }
}

fn boundary_countdown(now: NaiveTime, boundary: NaiveTime) -> Option<String> {
    let until = time_until(now, boundary);
    if until > chrono::Duration::zero() && until.num_hours() <= COUNTDOWN_WINDOW_HOURS {
        Some(countdown(until))
    } else {
        None
    }
}
