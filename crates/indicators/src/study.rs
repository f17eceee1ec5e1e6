use crate::indicators;
use dashboard_core::{IndicatorSeries, PriceSeries};
use serde::{Deserialize, Serialize};

/// Where a study is drawn: on the price panel or in its own stacked panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Overlay,
    Panel,
}

/// A selected technical study with its parameters. One variant per
/// indicator; the computation is resolved through `compute`, replacing
/// name-keyed dispatch with a tagged variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Study {
    Rsi { window: usize },
    Roc { window: usize },
    Macd { slow: usize, fast: usize },
    Obv,
    Tsi { slow: usize, fast: usize },
    Atr { window: usize },
    Cci { window: usize, constant: f64 },
    Ema { window: usize },
    Sma { window: usize },
    Bollinger { window: usize, std_dev: f64 },
}

/// Output of a study: most produce one series, Bollinger produces three.
#[derive(Debug, Clone)]
pub enum StudyOutput {
    Single(IndicatorSeries),
    Bands {
        upper: IndicatorSeries,
        lower: IndicatorSeries,
        middle: IndicatorSeries,
    },
}

impl Study {
    pub fn rsi() -> Self {
        Study::Rsi { window: 14 }
    }

    pub fn roc() -> Self {
        Study::Roc { window: 12 }
    }

    pub fn macd() -> Self {
        Study::Macd { slow: 26, fast: 12 }
    }

    pub fn obv() -> Self {
        Study::Obv
    }

    pub fn tsi() -> Self {
        Study::Tsi { slow: 25, fast: 13 }
    }

    pub fn atr() -> Self {
        Study::Atr { window: 14 }
    }

    pub fn cci() -> Self {
        Study::Cci {
            window: 14,
            constant: 0.015,
        }
    }

    pub fn ema() -> Self {
        Study::Ema { window: 12 }
    }

    pub fn sma() -> Self {
        Study::Sma { window: 12 }
    }

    pub fn bollinger() -> Self {
        Study::Bollinger {
            window: 20,
            std_dev: 2.0,
        }
    }

    /// Moving averages and bands share the price panel; oscillators get
    /// their own stacked panel.
    pub fn placement(&self) -> Placement {
        match self {
            Study::Sma { .. } | Study::Ema { .. } | Study::Bollinger { .. } => Placement::Overlay,
            _ => Placement::Panel,
        }
    }

    /// Legend label, e.g. "RSI(14)".
    pub fn label(&self) -> String {
        match self {
            Study::Rsi { window } => format!("RSI({window})"),
            Study::Roc { window } => format!("ROC({window})"),
            Study::Macd { slow, fast } => format!("MACD({fast},{slow})"),
            Study::Obv => "OBV".to_string(),
            Study::Tsi { slow, fast } => format!("TSI({slow},{fast})"),
            Study::Atr { window } => format!("ATR({window})"),
            Study::Cci { window, .. } => format!("CCI({window})"),
            Study::Ema { window } => format!("EMA({window})"),
            Study::Sma { window } => format!("SMA({window})"),
            Study::Bollinger { .. } => "Bollinger Bands".to_string(),
        }
    }

    /// Computes the study against a price series. The output is always
    /// aligned 1:1 with the input; degenerate inputs produce all-NaN
    /// series rather than failures.
    pub fn compute(&self, series: &PriceSeries) -> StudyOutput {
        match *self {
            Study::Rsi { window } => {
                single(self, indicators::rsi(&series.closes(), window))
            }
            Study::Roc { window } => {
                single(self, indicators::roc(&series.closes(), window))
            }
            Study::Macd { slow, fast } => {
                single(self, indicators::macd(&series.closes(), slow, fast))
            }
            Study::Obv => single(self, indicators::obv(&series.closes(), &series.volumes())),
            Study::Tsi { slow, fast } => {
                single(self, indicators::tsi(&series.highs(), slow, fast))
            }
            Study::Atr { window } => single(
                self,
                indicators::atr(&series.highs(), &series.lows(), &series.closes(), window),
            ),
            Study::Cci { window, constant } => single(
                self,
                indicators::cci(
                    &series.highs(),
                    &series.lows(),
                    &series.closes(),
                    window,
                    constant,
                ),
            ),
            Study::Ema { window } => {
                single(self, indicators::ema(&series.closes(), window))
            }
            Study::Sma { window } => {
                single(self, indicators::sma(&series.closes(), window))
            }
            Study::Bollinger { window, std_dev } => {
                let bands = indicators::bollinger_bands(&series.closes(), window, std_dev);
                StudyOutput::Bands {
                    upper: IndicatorSeries::new("Bollinger High Band", bands.upper),
                    lower: IndicatorSeries::new("Bollinger Low Band", bands.lower),
                    middle: IndicatorSeries::new("Bollinger Middle Band", bands.middle),
                }
            }
        }
    }
}

fn single(study: &Study, values: Vec<f64>) -> StudyOutput {
    StudyOutput::Single(IndicatorSeries::new(study.label(), values))
}
