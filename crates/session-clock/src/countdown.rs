use chrono::Duration;

/// Formats a duration as a pluralization-aware countdown clause.
/// Singular "hour"/"minute" only at exactly 1; the minutes clause is
/// omitted when minutes == 0 (leaving the bare hour's trailing space).
pub fn countdown(dur: Duration) -> String {
    let total = dur.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;

    match hours {
        1 => match minutes {
            0 => "1 hour ".to_string(),
            1 => "1 hour 1 minute".to_string(),
            m => format!("1 hour {m} minutes"),
        },
        2 => match minutes {
            0 => "2 hours ".to_string(),
            1 => "2 hours 1 minute".to_string(),
            m => format!("2 hours {m} minutes"),
        },
        _ => {
            if minutes > 1 {
                format!("{minutes} minutes")
            } else {
                format!("{minutes} minute")
            }
        }
    }
}
