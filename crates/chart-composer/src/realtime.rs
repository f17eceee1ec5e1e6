use crate::spec::{gaps, ChartSpec, Layout, LineStyle, Panel, Trace, TraceKind};
use crate::style;
use chrono::{Duration, NaiveDateTime, NaiveTime};
use dashboard_core::PriceSeries;

/// Intraday series are only resampled when they carry more than this many
/// observed bars; near the open the handful of raw points is kept as-is.
/// Carried over unchanged from the upstream dashboard behavior.
pub const REALTIME_RESAMPLE_MIN_BARS: usize = 3;

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Resamples intraday bars onto a fixed 60-second grid, forward-filling
/// gaps with the latest observed bar. Series at or below
/// REALTIME_RESAMPLE_MIN_BARS points are returned unchanged.
pub fn resample_minutes(series: &PriceSeries) -> PriceSeries {
    if series.len() <= REALTIME_RESAMPLE_MIN_BARS {
        return series.clone();
    }

    let bars = series.bars();
    let first = bars[0].timestamp;
    let last = bars[bars.len() - 1].timestamp;

    let mut out = Vec::new();
    let mut idx = 0;
    let mut slot = first;
    while slot <= last {
        while idx + 1 < bars.len() && bars[idx + 1].timestamp <= slot {
            idx += 1;
        }
        let mut bar = bars[idx].clone();
        bar.timestamp = slot;
        out.push(bar);
        slot += Duration::seconds(60);
    }
    PriceSeries::new(out)
}

/// Composes the one-panel realtime chart: the intraday close line plus a
/// live price/delta tile. The line is green when the live price sits above
/// the previous close, red otherwise.
pub fn compose_realtime_chart(
    series: &PriceSeries,
    live_price: Option<f64>,
    previous_close: Option<f64>,
    now_venue: NaiveDateTime,
) -> ChartSpec {
    let data = resample_minutes(series);
    let x: Vec<String> = data
        .bars()
        .iter()
        .map(|b| b.timestamp.format(TIMESTAMP_FMT).to_string())
        .collect();

    let rising = matches!((live_price, previous_close), (Some(p), Some(c)) if p - c > 0.0);
    let color = if rising {
        style::UP_COLOR
    } else {
        style::DOWN_COLOR
    };

    let mut line = Trace::line("Line", x, gaps(&data.closes()));
    line.line = LineStyle::colored(color);
    line.hover = Some(
        "Open: %{customdata[0]:.3f} <br>High: %{customdata[1]:.3f} \
         <br>Low: %{customdata[2]:.3f} <br>Close: %{customdata[3]:.3f} \
         <br>Volume: %{customdata[4]}"
            .to_string(),
    );

    let tile = Trace {
        name: "Close Price".to_string(),
        kind: TraceKind::PriceTile {
            value: live_price,
            reference: previous_close,
        },
        x: vec![],
        show_legend: false,
        line: LineStyle::solid(),
        fill_to_previous: false,
        hover: None,
        text: None,
    };

    let mut layout = Layout::standard();
    layout.x_range = x_axis_range(&data, now_venue);

    ChartSpec {
        panels: vec![Panel {
            traces: vec![line, tile],
        }],
        layout,
    }
}

/// Pins the x-axis span: from the first observed bar up to the venue's
/// 20:01 close boundary while the series is same-day, or up to the last
/// observed bar once the fetch spans into a new calendar day.
fn x_axis_range(data: &PriceSeries, now_venue: NaiveDateTime) -> Option<(String, String)> {
    let first = data.first()?.timestamp.naive_utc();
    let last = data.last()?.timestamp.naive_utc();

    let boundary = now_venue
        .date()
        .and_time(NaiveTime::from_hms_opt(20, 1, 0).unwrap());

    let upper = if boundary.signed_duration_since(first) >= Duration::days(1) {
        last
    } else {
        boundary
    };

    Some((
        first.format(TIMESTAMP_FMT).to_string(),
        upper.format(TIMESTAMP_FMT).to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dashboard_core::Bar;

    fn bar(secs_from_open: i64, close: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2024, 6, 5, 13, 30, 0).unwrap()
            + Duration::seconds(secs_from_open);
        Bar {
            timestamp: ts,
            open: close,
            high: close + 0.5,
            low: close - 0.5,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn few_bars_are_not_resampled() {
        let series = PriceSeries::new(vec![bar(0, 10.0), bar(180, 11.0)]);
        let resampled = resample_minutes(&series);

        assert_eq!(resampled.len(), 2);
        assert_eq!(resampled.closes(), series.closes());
    }

    #[test]
    fn gapped_bars_forward_fill_each_minute_slot() {
        let series = PriceSeries::new(vec![
            bar(0, 10.0),
            bar(60, 11.0),
            bar(120, 12.0),
            bar(300, 13.0),
            bar(360, 14.0),
        ]);
        let resampled = resample_minutes(&series);

        // One bar per 60-second slot across the full observed range
        assert_eq!(resampled.len(), 7);
        assert_eq!(
            resampled.closes(),
            vec![10.0, 11.0, 12.0, 12.0, 12.0, 13.0, 14.0]
        );
        let stamps = resampled.timestamps();
        for pair in stamps.windows(2) {
            assert_eq!((pair[1] - pair[0]).num_seconds(), 60);
        }
    }

    #[test]
    fn line_color_tracks_delta_sign() {
        let series = PriceSeries::new(vec![bar(0, 10.0), bar(60, 11.0)]);
        let now = NaiveDateTime::parse_from_str("2024-06-05 10:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();

        let up = compose_realtime_chart(&series, Some(11.0), Some(10.5), now);
        assert_eq!(up.panels[0].traces[0].line.color, Some("green"));

        let down = compose_realtime_chart(&series, Some(10.0), Some(10.5), now);
        assert_eq!(down.panels[0].traces[0].line.color, Some("red"));

        // Unknown live price falls back to red
        let unknown = compose_realtime_chart(&series, None, Some(10.5), now);
        assert_eq!(unknown.panels[0].traces[0].line.color, Some("red"));
    }

    #[test]
    fn same_day_axis_ends_at_close_boundary() {
        let series = PriceSeries::new(vec![bar(0, 10.0), bar(60, 11.0)]);
        let now = NaiveDateTime::parse_from_str("2024-06-05 15:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();

        let spec = compose_realtime_chart(&series, Some(11.0), Some(10.0), now);
        let (lower, upper) = spec.layout.x_range.unwrap();
        assert_eq!(lower, "2024-06-05 13:30:00");
        assert_eq!(upper, "2024-06-05 20:01:00");
    }

    #[test]
    fn day_spanning_axis_ends_at_last_bar() {
        let series = PriceSeries::new(vec![bar(0, 10.0), bar(3600, 11.0)]);
        // A boundary a full day past the first bar: the fetch crossed
        // into a new calendar day
        let now = NaiveDateTime::parse_from_str("2024-06-06 15:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();

        let spec = compose_realtime_chart(&series, Some(11.0), Some(10.0), now);
        let (_, upper) = spec.layout.x_range.unwrap();
        assert_eq!(upper, "2024-06-05 14:30:00");
    }

    #[test]
    fn tile_carries_live_price_and_reference() {
        let series = PriceSeries::new(vec![bar(0, 10.0), bar(60, 11.0)]);
        let now = NaiveDateTime::parse_from_str("2024-06-05 10:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();

        let spec = compose_realtime_chart(&series, Some(11.25), Some(10.5), now);
        match &spec.panels[0].traces[1].kind {
            TraceKind::PriceTile { value, reference } => {
                assert_eq!(*value, Some(11.25));
                assert_eq!(*reference, Some(10.5));
            }
            other => panic!("expected price tile, got {other:?}"),
        }
    }
}
