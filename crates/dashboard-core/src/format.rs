/// Scales a magnitude into a base-1000 suffixed string:
/// 500 -> "500.00", 1500 -> "1.50K", 2_500_000 -> "2.50M".
pub fn human_format(num: f64) -> String {
    const SUFFIXES: [&str; 6] = ["", "K", "M", "G", "T", "P"];
    let mut num = num;
    let mut magnitude = 0;
    while num.abs() >= 1000.0 && magnitude < SUFFIXES.len() - 1 {
        magnitude += 1;
        num /= 1000.0;
    }
    format!("{:.2}{}", num, SUFFIXES[magnitude])
}

/// Renders an optional value with fixed precision, "--" when missing.
pub fn fmt_or_dash(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_format_magnitudes() {
        assert_eq!(human_format(500.0), "500.00");
        assert_eq!(human_format(1500.0), "1.50K");
        assert_eq!(human_format(2_500_000.0), "2.50M");
        assert_eq!(human_format(3_000_000_000.0), "3.00G");
        assert_eq!(human_format(-1500.0), "-1.50K");
        assert_eq!(human_format(0.0), "0.00");
    }

    #[test]
    fn dash_placeholder() {
        assert_eq!(fmt_or_dash(Some(3.14159), 4), "3.1416");
        assert_eq!(fmt_or_dash(None, 2), "--");
    }
}
