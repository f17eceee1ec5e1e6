use crate::spec::{gaps, ChartSpec, ChartStyle, Dash, Layout, LineStyle, Panel, Trace, TraceKind};
use dashboard_core::{human_format, PriceSeries};
use indicators::{Placement, Study, StudyOutput};

/// Composes the main multi-panel chart: a base price trace plus the
/// selected studies. Overlay studies share the price panel; every other
/// study gets its own stacked panel beneath, in selection order.
///
/// A study that cannot be computed over the series (input shorter than
/// its window) contributes an all-gap trace for its panel only; the rest
/// of the chart is unaffected.
pub fn compose_main_chart(
    series: &PriceSeries,
    studies: &[Study],
    style: ChartStyle,
) -> ChartSpec {
    let x: Vec<String> = series
        .bars()
        .iter()
        .map(|b| b.timestamp.format("%Y-%m-%d").to_string())
        .collect();

    let mut price_panel = Panel::default();
    price_panel.traces.push(base_trace(series, style, &x));
    for study in studies.iter().filter(|s| s.placement() == Placement::Overlay) {
        price_panel.traces.extend(study_traces(study, series, &x));
    }

    let mut panels = vec![price_panel];
    for study in studies.iter().filter(|s| s.placement() == Placement::Panel) {
        panels.push(Panel {
            traces: study_traces(study, series, &x),
        });
    }

    ChartSpec {
        panels,
        layout: Layout::standard(),
    }
}

fn base_trace(series: &PriceSeries, style: ChartStyle, x: &[String]) -> Trace {
    let volume_text: Vec<String> = series
        .bars()
        .iter()
        .map(|b| human_format(b.volume))
        .collect();

    match style {
        ChartStyle::Ohlc => Trace {
            name: "OHLC".to_string(),
            kind: TraceKind::Ohlc {
                open: series.opens(),
                high: series.highs(),
                low: series.lows(),
                close: series.closes(),
            },
            x: x.to_vec(),
            show_legend: true,
            line: LineStyle::solid(),
            fill_to_previous: false,
            hover: None,
            text: Some(volume_text),
        },
        ChartStyle::Candlestick => Trace {
            name: "Candlestick".to_string(),
            kind: TraceKind::Candlestick {
                open: series.opens(),
                high: series.highs(),
                low: series.lows(),
                close: series.closes(),
            },
            x: x.to_vec(),
            show_legend: true,
            line: LineStyle::solid(),
            fill_to_previous: false,
            hover: None,
            text: Some(volume_text),
        },
        ChartStyle::Line => {
            let mut trace = Trace::line("Prices", x.to_vec(), gaps(&series.closes()));
            trace.hover = Some(
                "Open: %{customdata[0]:.3f} <br>High: %{customdata[1]:.3f} \
                 <br>Low: %{customdata[2]:.3f} <br>Close: %{customdata[3]:.3f} \
                 <br>Volume: %{customdata[4]}"
                    .to_string(),
            );
            trace.text = Some(volume_text);
            trace
        }
    }
}

fn study_traces(study: &Study, series: &PriceSeries, x: &[String]) -> Vec<Trace> {
    match study.compute(series) {
        StudyOutput::Single(s) => {
            let short = s.name.split('(').next().unwrap_or(&s.name).to_string();
            let mut trace = Trace::line(s.name.clone(), x.to_vec(), gaps(&s.values));
            trace.hover = Some(format!("{short}: %{{y:.4f}}"));
            vec![trace]
        }
        StudyOutput::Bands {
            upper,
            lower,
            middle,
        } => {
            let mut high = Trace::line(upper.name.clone(), x.to_vec(), gaps(&upper.values));
            high.show_legend = false;
            high.line = LineStyle::band(Dash::LongDash);
            high.hover = Some("High Band: %{y:.4f}".to_string());

            let mut low = Trace::line(lower.name.clone(), x.to_vec(), gaps(&lower.values));
            low.show_legend = false;
            low.line = LineStyle::band(Dash::LongDash);
            low.fill_to_previous = true;
            low.hover = Some("Low Band: %{y:.4f}".to_string());

            let mut mid = Trace::line(middle.name.clone(), x.to_vec(), gaps(&middle.values));
            mid.line = LineStyle::band(Dash::DashDot);
            mid.hover = Some("Middle Band: %{y:.4f}".to_string());

            vec![high, low, mid]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use dashboard_core::Bar;

    fn series(count: usize) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        PriceSeries::new(
            (0..count)
                .map(|i| {
                    let base = 100.0 + i as f64;
                    Bar {
                        timestamp: start + Duration::days(i as i64),
                        open: base,
                        high: base + 2.0,
                        low: base - 1.0,
                        close: base + 1.0,
                        volume: 2_500_000.0,
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn panel_count_is_one_plus_panel_studies() {
        let s = series(40);
        let studies = [Study::sma(), Study::rsi(), Study::obv(), Study::ema()];
        let spec = compose_main_chart(&s, &studies, ChartStyle::Ohlc);

        // SMA and EMA overlay the price panel; RSI and OBV stack below
        assert_eq!(spec.panel_count(), 3);
        assert_eq!(spec.panels[1].traces[0].name, "RSI(14)");
        assert_eq!(spec.panels[2].traces[0].name, "OBV");
    }

    #[test]
    fn overlay_studies_never_add_panels() {
        let s = series(40);
        let studies = [Study::sma(), Study::ema(), Study::bollinger()];
        let spec = compose_main_chart(&s, &studies, ChartStyle::Candlestick);

        assert_eq!(spec.panel_count(), 1);
        // base + SMA + EMA + three Bollinger traces
        assert_eq!(spec.panels[0].traces.len(), 6);
    }

    #[test]
    fn panel_order_follows_selection_order() {
        let s = series(40);
        let studies = [Study::obv(), Study::atr(), Study::rsi()];
        let spec = compose_main_chart(&s, &studies, ChartStyle::Line);

        assert_eq!(spec.panels[1].traces[0].name, "OBV");
        assert_eq!(spec.panels[2].traces[0].name, "ATR(14)");
        assert_eq!(spec.panels[3].traces[0].name, "RSI(14)");
    }

    #[test]
    fn style_switch_only_changes_base_trace() {
        let s = series(40);
        let studies = [Study::rsi()];
        let ohlc = compose_main_chart(&s, &studies, ChartStyle::Ohlc);
        let line = compose_main_chart(&s, &studies, ChartStyle::Line);

        assert!(matches!(
            ohlc.panels[0].traces[0].kind,
            TraceKind::Ohlc { .. }
        ));
        assert!(matches!(
            line.panels[0].traces[0].kind,
            TraceKind::Line { .. }
        ));
        assert_eq!(ohlc.panels[1], line.panels[1]);
    }

    #[test]
    fn bollinger_band_traces_in_draw_order() {
        let s = series(40);
        let spec = compose_main_chart(&s, &[Study::bollinger()], ChartStyle::Ohlc);
        let traces = &spec.panels[0].traces;

        assert_eq!(traces[1].name, "Bollinger High Band");
        assert!(!traces[1].show_legend);
        assert_eq!(traces[2].name, "Bollinger Low Band");
        assert!(traces[2].fill_to_previous);
        assert_eq!(traces[3].name, "Bollinger Middle Band");
        assert!(traces[3].show_legend);
    }

    #[test]
    fn short_series_yields_empty_study_trace_not_failure() {
        let s = series(3);
        let spec = compose_main_chart(&s, &[Study::rsi()], ChartStyle::Ohlc);

        assert_eq!(spec.panel_count(), 2);
        assert!(spec.panels[1].traces[0].is_empty());
    }

    #[test]
    fn volume_hover_text_is_human_formatted() {
        let s = series(5);
        let spec = compose_main_chart(&s, &[], ChartStyle::Ohlc);
        let text = spec.panels[0].traces[0].text.as_ref().unwrap();

        assert_eq!(text[0], "2.50M");
    }

    #[test]
    fn shared_x_axis_across_panels() {
        let s = series(40);
        let spec = compose_main_chart(&s, &[Study::rsi()], ChartStyle::Ohlc);

        assert!(spec.layout.shared_x_axes);
        assert_eq!(spec.panels[0].traces[0].x, spec.panels[1].traces[0].x);
    }
}
