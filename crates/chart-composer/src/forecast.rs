use crate::spec::{gaps, ChartSpec, Dash, Layout, LineStyle, Mode, Panel, Trace, TraceKind};
use dashboard_core::{ForecastRecord, PriceSeries, SessionState};

/// Composes the forecast-history comparison chart: actual closes against
/// forecast points, with the confidence interval drawn as two bounding
/// traces filled between.
///
/// The actual-price window is trimmed against the history length; the
/// most recent bar is dropped while the session is Open so the live,
/// incomplete bar never shows.
pub fn compose_forecast_history_chart(
    history: &[ForecastRecord],
    actual: &PriceSeries,
    session: SessionState,
) -> ChartSpec {
    let len = actual.len();
    let start = (len + 1).saturating_sub(history.len()).min(len);
    let end = if session.is_open() {
        len.saturating_sub(1)
    } else {
        len
    };
    let window = &actual.bars()[start.min(end)..end];

    let x_actual: Vec<String> = window
        .iter()
        .map(|b| b.timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
        .collect();
    let closes: Vec<f64> = window.iter().map(|b| b.close).collect();

    let x_history: Vec<String> = history
        .iter()
        .map(|r| r.date.format("%Y-%m-%d").to_string())
        .collect();
    let forecasts: Vec<f64> = history.iter().map(|r| r.forecast_price).collect();
    let min_conf: Vec<f64> = history.iter().map(|r| r.min_confidence).collect();
    let max_conf: Vec<f64> = history.iter().map(|r| r.max_confidence).collect();

    let market = marker_trace("MP", x_actual, gaps(&closes));
    let forecast = marker_trace("FP", x_history.clone(), gaps(&forecasts));

    let mut low = Trace::line("Min Confidence", x_history.clone(), gaps(&min_conf));
    low.show_legend = false;
    low.line = band_line();
    low.hover = Some("Min Confidence: %{y:.4f}".to_string());

    let mut high = Trace::line("Max Confidence", x_history, gaps(&max_conf));
    high.show_legend = false;
    high.line = band_line();
    high.fill_to_previous = true;
    high.hover = Some("Max Confidence: %{y:.4f}".to_string());

    ChartSpec {
        panels: vec![Panel {
            traces: vec![market, forecast, low, high],
        }],
        layout: Layout::compact(),
    }
}

fn marker_trace(name: &str, x: Vec<String>, y: Vec<Option<f64>>) -> Trace {
    let mut trace = Trace::line(name, x, y);
    trace.kind = match trace.kind {
        TraceKind::Line { y, .. } => TraceKind::Line {
            y,
            mode: Mode::LinesMarkers,
        },
        other => other,
    };
    trace.hover = Some(format!("{name}: %{{y:.4f}}"));
    trace
}

fn band_line() -> LineStyle {
    LineStyle {
        shape: crate::spec::Shape::Spline,
        smoothing: 0.5,
        ..LineStyle::band(Dash::LongDash)
    }
}
