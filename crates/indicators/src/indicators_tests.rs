#[cfg(test)]
mod tests {
    use super::super::indicators::*;
    use super::super::study::{Placement, Study, StudyOutput};
    use chrono::{Duration, TimeZone, Utc};
    use dashboard_core::{Bar, PriceSeries};

    // Helper function to create sample price data
    fn sample_prices() -> Vec<f64> {
        vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ]
    }

    // Helper function to create sample bars
    fn sample_series(count: usize) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = (0..count)
            .map(|i| {
                let base = 100.0 + i as f64;
                Bar {
                    timestamp: start + Duration::days(i as i64),
                    open: base,
                    high: base + 2.0,
                    low: base - 1.0,
                    close: base + 1.0,
                    volume: 1_000_000.0,
                }
            })
            .collect();
        PriceSeries::new(bars)
    }

    fn defined(values: &[f64]) -> Vec<f64> {
        values.iter().copied().filter(|v| !v.is_nan()).collect()
    }

    #[test]
    fn test_sma_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3);

        assert_eq!(result.len(), data.len());
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!((result[2] - 2.0).abs() < 0.001); // (1+2+3)/3 = 2
        assert!((result[3] - 3.0).abs() < 0.001); // (2+3+4)/3 = 3
        assert!((result[4] - 4.0).abs() < 0.001); // (3+4+5)/3 = 4
    }

    #[test]
    fn test_sma_insufficient_data_is_all_undefined() {
        let data = vec![1.0, 2.0];
        let result = sma(&data, 5);

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_sma_uptrend_last_value_is_mean_of_tail() {
        // 30-bar uptrend: SMA(12) last value == mean of the last 12 closes
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64 * 1.5).collect();
        let result = sma(&closes, 12);

        let expected: f64 = closes[18..].iter().sum::<f64>() / 12.0;
        assert!((result[29] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_ema_basic() {
        let data = vec![22.0, 24.0, 23.0, 25.0, 26.0];
        let result = ema(&data, 3);

        assert_eq!(result.len(), data.len());
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        // EMA is seeded with the SMA of the first window
        let first_sma = (22.0 + 24.0 + 23.0) / 3.0;
        assert!((result[2] - first_sma).abs() < 0.01);
    }

    #[test]
    fn test_ema_empty_data() {
        let data: Vec<f64> = vec![];
        let result = ema(&data, 5);

        assert_eq!(result.len(), 0);
    }

    #[test]
    fn test_ema_increases_with_uptrend() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let result = ema(&data, 3);

        let values = defined(&result);
        for pair in values.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_rsi_warmup_and_bounds() {
        let prices = sample_prices();
        let result = rsi(&prices, 14);

        assert_eq!(result.len(), prices.len());
        // Undefined for the first `window` points
        for value in &result[..14] {
            assert!(value.is_nan());
        }
        for value in &result[14..] {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let data = vec![1.0, 2.0, 3.0];
        let result = rsi(&data, 14);

        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_rsi_overbought_on_pure_uptrend() {
        let mut uptrend = vec![100.0];
        for i in 1..20 {
            uptrend.push(100.0 + i as f64);
        }

        let result = rsi(&uptrend, 14);
        assert!(*result.last().unwrap() > 70.0);
    }

    #[test]
    fn test_roc_percent_change() {
        let data = vec![100.0, 101.0, 102.0, 103.0, 110.0];
        let result = roc(&data, 4);

        assert_eq!(result.len(), data.len());
        assert!(result[3].is_nan());
        assert!((result[4] - 10.0).abs() < 1e-9); // (110-100)/100 * 100
    }

    #[test]
    fn test_macd_is_fast_minus_slow() {
        let prices = sample_prices();
        let result = macd(&prices, 26, 12);

        assert_eq!(result.len(), prices.len());
        // Slow window exceeds the series length: everything undefined
        assert!(result.iter().all(|v| v.is_nan()));

        let closes: Vec<f64> = (0..40).map(|i| 50.0 + (i as f64 * 0.7).sin()).collect();
        let line = macd(&closes, 26, 12);
        let fast = ema(&closes, 12);
        let slow = ema(&closes, 26);
        for i in 25..closes.len() {
            assert!((line[i] - (fast[i] - slow[i])).abs() < 1e-9);
        }
    }

    #[test]
    fn test_obv_starts_at_first_volume() {
        let series = sample_series(15);
        let result = obv(&series.closes(), &series.volumes());

        assert_eq!(result.len(), series.len());
        assert_eq!(result[0], 1_000_000.0);
    }

    #[test]
    fn test_obv_tracks_close_direction() {
        let up: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let down: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
        let volume = vec![10.0; 10];

        let rising = obv(&up, &volume);
        let falling = obv(&down, &volume);
        for i in 1..10 {
            assert!(rising[i] > rising[i - 1]);
            assert!(falling[i] < falling[i - 1]);
        }
    }

    #[test]
    fn test_tsi_positive_in_steady_uptrend() {
        let data: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let result = tsi(&data, 25, 13);

        assert_eq!(result.len(), data.len());
        let values = defined(&result);
        assert!(!values.is_empty());
        // Constant positive momentum: fully saturated oscillator
        for value in values {
            assert!((value - 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_tsi_insufficient_data() {
        let data: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let result = tsi(&data, 25, 13);

        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_atr_positive_and_aligned() {
        let series = sample_series(15);
        let result = atr(&series.highs(), &series.lows(), &series.closes(), 5);

        assert_eq!(result.len(), series.len());
        for value in &result[..5] {
            assert!(value.is_nan());
        }
        for value in &result[5..] {
            assert!(*value > 0.0);
        }
    }

    #[test]
    fn test_atr_insufficient_data() {
        let series = sample_series(5);
        let result = atr(&series.highs(), &series.lows(), &series.closes(), 14);

        assert_eq!(result.len(), 5);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_atr_increases_with_volatility() {
        let series = sample_series(12);
        let normal = atr(&series.highs(), &series.lows(), &series.closes(), 5);

        let wide_highs: Vec<f64> = series.highs().iter().map(|h| h + 10.0).collect();
        let wide_lows: Vec<f64> = series.lows().iter().map(|l| l - 10.0).collect();
        let volatile = atr(&wide_highs, &wide_lows, &series.closes(), 5);

        assert!(volatile[5] > normal[5]);
    }

    #[test]
    fn test_cci_constant_prices_are_zero() {
        let flat = vec![100.0; 20];
        let result = cci(&flat, &flat, &flat, 14, 0.015);

        assert_eq!(result.len(), 20);
        for value in &result[13..] {
            assert_eq!(*value, 0.0);
        }
    }

    #[test]
    fn test_cci_sign_follows_deviation() {
        let series = sample_series(20);
        let result = cci(
            &series.highs(),
            &series.lows(),
            &series.closes(),
            14,
            0.015,
        );

        // Steady uptrend: the latest typical price sits above its window mean
        assert!(*result.last().unwrap() > 0.0);
    }

    #[test]
    fn test_bollinger_alignment_and_ordering() {
        let prices = sample_prices();
        let result = bollinger_bands(&prices, 10, 2.0);

        assert_eq!(result.upper.len(), prices.len());
        assert_eq!(result.middle.len(), prices.len());
        assert_eq!(result.lower.len(), prices.len());
        for i in 9..prices.len() {
            assert!(result.upper[i] > result.middle[i]);
            assert!(result.middle[i] > result.lower[i]);
        }
    }

    #[test]
    fn test_bollinger_narrow_bands_on_constant_prices() {
        let prices = vec![100.0; 20];
        let result = bollinger_bands(&prices, 10, 2.0);

        for i in 9..prices.len() {
            let width = result.upper[i] - result.lower[i];
            assert!(width < 1.0);
        }
    }

    #[test]
    fn test_every_study_output_is_aligned() {
        let series = sample_series(30);
        let studies = [
            Study::rsi(),
            Study::roc(),
            Study::macd(),
            Study::obv(),
            Study::tsi(),
            Study::atr(),
            Study::cci(),
            Study::ema(),
            Study::sma(),
            Study::bollinger(),
        ];

        for study in studies {
            match study.compute(&series) {
                StudyOutput::Single(s) => assert_eq!(s.len(), series.len(), "{}", s.name),
                StudyOutput::Bands {
                    upper,
                    lower,
                    middle,
                } => {
                    assert_eq!(upper.len(), series.len());
                    assert_eq!(lower.len(), series.len());
                    assert_eq!(middle.len(), series.len());
                }
            }
        }
    }

    #[test]
    fn test_every_study_tolerates_short_input() {
        let series = sample_series(3);
        let studies = [
            Study::rsi(),
            Study::roc(),
            Study::macd(),
            Study::tsi(),
            Study::atr(),
            Study::cci(),
            Study::ema(),
            Study::sma(),
            Study::bollinger(),
        ];

        for study in studies {
            match study.compute(&series) {
                StudyOutput::Single(s) => {
                    assert_eq!(s.len(), series.len());
                    assert!(s.is_all_undefined(), "{}", s.name);
                }
                StudyOutput::Bands { upper, lower, .. } => {
                    assert!(upper.is_all_undefined());
                    assert!(lower.is_all_undefined());
                }
            }
        }
    }

    #[test]
    fn test_study_placement_partition() {
        assert_eq!(Study::sma().placement(), Placement::Overlay);
        assert_eq!(Study::ema().placement(), Placement::Overlay);
        assert_eq!(Study::bollinger().placement(), Placement::Overlay);
        assert_eq!(Study::rsi().placement(), Placement::Panel);
        assert_eq!(Study::obv().placement(), Placement::Panel);
        assert_eq!(Study::macd().placement(), Placement::Panel);
    }
}
