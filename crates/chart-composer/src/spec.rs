use crate::style;
use serde::{Deserialize, Serialize};

/// Base trace style for the main chart's price panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartStyle {
    Ohlc,
    Candlestick,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dash {
    Solid,
    LongDash,
    DashDot,
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shape {
    Linear,
    Spline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
    Lines,
    LinesMarkers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub width: f64,
    pub color: Option<&'static str>,
    pub dash: Dash,
    pub shape: Shape,
    pub smoothing: f64,
}

impl LineStyle {
    pub fn solid() -> Self {
        LineStyle {
            width: 1.0,
            color: None,
            dash: Dash::Solid,
            shape: Shape::Linear,
            smoothing: 0.0,
        }
    }

    pub fn colored(color: &'static str) -> Self {
        LineStyle {
            color: Some(color),
            ..LineStyle::solid()
        }
    }

    /// Gray long-dashed style shared by confidence/Bollinger bands.
    pub fn band(dash: Dash) -> Self {
        LineStyle {
            color: Some(style::BAND_COLOR),
            dash,
            ..LineStyle::solid()
        }
    }
}

/// Payload of a single trace. Undefined points are `None`, rendered as
/// gaps; an all-`None` trace draws as empty rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TraceKind {
    Ohlc {
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    },
    Candlestick {
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    },
    Line {
        y: Vec<Option<f64>>,
        mode: Mode,
    },
    /// Big-number tile: current value with a delta against a reference.
    PriceTile {
        value: Option<f64>,
        reference: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub kind: TraceKind,
    /// Shared-axis labels, one per point (empty for tiles).
    pub x: Vec<String>,
    pub show_legend: bool,
    pub line: LineStyle,
    /// Fill the area between this trace and the previous one in the panel.
    pub fill_to_previous: bool,
    /// Hover template, e.g. "RSI: %{y:.4f}".
    pub hover: Option<String>,
    /// Optional per-point hover text (e.g. human-formatted volume).
    pub text: Option<Vec<String>>,
}

impl Trace {
    pub fn line(name: impl Into<String>, x: Vec<String>, y: Vec<Option<f64>>) -> Self {
        Trace {
            name: name.into(),
            kind: TraceKind::Line {
                y,
                mode: Mode::Lines,
            },
            x,
            show_legend: true,
            line: LineStyle::solid(),
            fill_to_previous: false,
            hover: None,
            text: None,
        }
    }

    /// True when the trace has no defined point.
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            TraceKind::Ohlc { close, .. } | TraceKind::Candlestick { close, .. } => {
                close.is_empty()
            }
            TraceKind::Line { y, .. } => y.iter().all(|v| v.is_none()),
            TraceKind::PriceTile { value, .. } => value.is_none(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Panel {
    pub traces: Vec<Trace>,
}

/// Layout/style metadata. Colors and fonts are fixed constants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub shared_x_axes: bool,
    pub vertical_spacing: f64,
    pub paper_color: &'static str,
    pub plot_color: &'static str,
    pub grid_color: &'static str,
    pub spike_color: &'static str,
    pub tick_color: &'static str,
    pub tick_size: u8,
    /// Explicit x-axis range (lower, upper) when the chart pins its span.
    pub x_range: Option<(String, String)>,
}

impl Layout {
    pub fn standard() -> Self {
        Layout {
            shared_x_axes: true,
            vertical_spacing: style::VERTICAL_SPACING,
            paper_color: style::PAPER_BG,
            plot_color: style::PAPER_BG,
            grid_color: style::GRID_COLOR,
            spike_color: style::SPIKE_COLOR,
            tick_color: style::TICK_COLOR,
            tick_size: style::TICK_SIZE,
            x_range: None,
        }
    }

    /// Darker compact variant used by the forecast-history panel.
    pub fn compact() -> Self {
        Layout {
            paper_color: style::COMPACT_BG,
            plot_color: style::COMPACT_BG,
            ..Layout::standard()
        }
    }
}

/// A renderable chart: one or more stacked panels over a shared x-axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub panels: Vec<Panel>,
    pub layout: Layout,
}

impl ChartSpec {
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Placeholder spec with a single empty panel.
    pub fn empty() -> Self {
        ChartSpec {
            panels: vec![Panel::default()],
            layout: Layout::standard(),
        }
    }
}

/// Maps NaN warm-up points to gaps.
pub fn gaps(values: &[f64]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|v| if v.is_nan() { None } else { Some(*v) })
        .collect()
}
