//! Pure indicator computations.
//!
//! Every function returns a series of exactly the same length as its input,
//! with `f64::NAN` marking the warm-up window. An input shorter than the
//! required window yields an all-NaN series, never an error.

/// Simple Moving Average
pub fn sma(data: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; data.len()];
    if window == 0 || data.len() < window {
        return out;
    }

    for i in window - 1..data.len() {
        let sum: f64 = data[i + 1 - window..=i].iter().sum();
        out[i] = sum / window as f64;
    }
    out
}

/// Exponential Moving Average, seeded with the SMA of the first window
pub fn ema(data: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; data.len()];
    if window == 0 || data.len() < window {
        return out;
    }

    let multiplier = 2.0 / (window as f64 + 1.0);
    let seed: f64 = data[..window].iter().sum::<f64>() / window as f64;
    out[window - 1] = seed;

    for i in window..data.len() {
        out[i] = (data[i] - out[i - 1]) * multiplier + out[i - 1];
    }
    out
}

/// Relative Strength Index (Wilder smoothing), bounded [0, 100]
pub fn rsi(data: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; data.len()];
    if window == 0 || data.len() < window + 1 {
        return out;
    }

    let mut gains = Vec::with_capacity(data.len() - 1);
    let mut losses = Vec::with_capacity(data.len() - 1);
    for pair in data.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    let mut avg_gain = gains[..window].iter().sum::<f64>() / window as f64;
    let mut avg_loss = losses[..window].iter().sum::<f64>() / window as f64;
    out[window] = rsi_point(avg_gain, avg_loss);

    for i in window..gains.len() {
        avg_gain = (avg_gain * (window - 1) as f64 + gains[i]) / window as f64;
        avg_loss = (avg_loss * (window - 1) as f64 + losses[i]) / window as f64;
        out[i + 1] = rsi_point(avg_gain, avg_loss);
    }
    out
}

fn rsi_point(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Rate of Change: percent change vs. `window` bars ago
pub fn roc(data: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; data.len()];
    if window == 0 || data.len() < window + 1 {
        return out;
    }

    for i in window..data.len() {
        let base = data[i - window];
        if base != 0.0 {
            out[i] = (data[i] - base) / base * 100.0;
        }
    }
    out
}

/// MACD line: EMA(fast) - EMA(slow). NaN until the slow EMA is defined.
pub fn macd(data: &[f64], slow: usize, fast: usize) -> Vec<f64> {
    let ema_fast = ema(data, fast);
    let ema_slow = ema(data, slow);

    ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect()
}

/// On-Balance Volume: cumulative signed-volume running total
pub fn obv(close: &[f64], volume: &[f64]) -> Vec<f64> {
    let len = close.len().min(volume.len());
    if len == 0 {
        return vec![];
    }

    let mut out = Vec::with_capacity(len);
    out.push(volume[0]);
    for i in 1..len {
        let prev = out[i - 1];
        let next = if close[i] > close[i - 1] {
            prev + volume[i]
        } else if close[i] < close[i - 1] {
            prev - volume[i]
        } else {
            prev
        };
        out.push(next);
    }
    out
}

/// True Strength Index: double-smoothed momentum oscillator
pub fn tsi(data: &[f64], slow: usize, fast: usize) -> Vec<f64> {
    let n = data.len();
    let mut out = vec![f64::NAN; n];
    if slow == 0 || fast == 0 || n < slow + fast {
        return out;
    }

    let momentum: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();
    let momentum_abs: Vec<f64> = momentum.iter().map(|v| v.abs()).collect();

    let first = ema(&momentum, slow);
    let first_abs = ema(&momentum_abs, slow);

    // Second smoothing runs over the defined tail of the first pass.
    let second = ema(&first[slow - 1..], fast);
    let second_abs = ema(&first_abs[slow - 1..], fast);

    for (j, (num, den)) in second.iter().zip(&second_abs).enumerate() {
        if num.is_nan() || den.is_nan() || *den == 0.0 {
            continue;
        }
        // momentum index (slow - 1 + j) belongs to the bar one past it
        out[slow + j] = 100.0 * num / den;
    }
    out
}

/// Average True Range (Wilder smoothing)
pub fn atr(high: &[f64], low: &[f64], close: &[f64], window: usize) -> Vec<f64> {
    let n = close.len().min(high.len()).min(low.len());
    let mut out = vec![f64::NAN; close.len()];
    if window == 0 || n < window + 1 {
        return out;
    }

    let mut true_ranges = Vec::with_capacity(n - 1);
    for i in 1..n {
        let high_low = high[i] - low[i];
        let high_close = (high[i] - close[i - 1]).abs();
        let low_close = (low[i] - close[i - 1]).abs();
        true_ranges.push(high_low.max(high_close).max(low_close));
    }

    let mut value = true_ranges[..window].iter().sum::<f64>() / window as f64;
    out[window] = value;
    for i in window..true_ranges.len() {
        value = (value * (window - 1) as f64 + true_ranges[i]) / window as f64;
        out[i + 1] = value;
    }
    out
}

/// Commodity Channel Index: typical-price deviation scaled by `constant`
pub fn cci(high: &[f64], low: &[f64], close: &[f64], window: usize, constant: f64) -> Vec<f64> {
    let n = close.len().min(high.len()).min(low.len());
    let mut out = vec![f64::NAN; close.len()];
    if window == 0 || n < window {
        return out;
    }

    let typical: Vec<f64> = (0..n).map(|i| (high[i] + low[i] + close[i]) / 3.0).collect();

    for i in window - 1..n {
        let slice = &typical[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let mad = slice.iter().map(|v| (v - mean).abs()).sum::<f64>() / window as f64;
        out[i] = if mad > 0.0 {
            (typical[i] - mean) / (constant * mad)
        } else {
            0.0
        };
    }
    out
}

/// Bollinger Bands
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger_bands(data: &[f64], window: usize, std_dev: f64) -> BollingerBands {
    let middle = sma(data, window);
    let mut upper = vec![f64::NAN; data.len()];
    let mut lower = vec![f64::NAN; data.len()];

    if window > 0 && data.len() >= window {
        for i in window - 1..data.len() {
            let slice = &data[i + 1 - window..=i];
            let mean = middle[i];
            let variance =
                slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / window as f64;
            let std = variance.sqrt();
            upper[i] = mean + std_dev * std;
            lower[i] = mean - std_dev * std;
        }
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}
