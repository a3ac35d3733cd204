//! Human-readable durations and percentages.

/// Unit suffix to seconds, largest first.
const UNITS: &[(&str, u64)] = &[("d", 86_400), ("h", 3_600), ("m", 60), ("s", 1)];

/// Decimal places kept when rendering an uptime percentage.
pub const PERCENT_DECIMALS: usize = 2;

/// Format a duration in seconds, largest unit first: `5400` → `"1h 30m"`.
///
/// Zero components are omitted; a zero duration renders as `"0s"`.
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return "0s".to_string();
    }

    let mut remaining = seconds;
    let mut parts = Vec::with_capacity(UNITS.len());
    for (suffix, size) in UNITS {
        let count = remaining / size;
        if count > 0 {
            parts.push(format!("{}{}", count, suffix));
            remaining %= size;
        }
    }

    parts.join(" ")
}

/// Format a percentage with a fixed number of decimals: `99.999` → `"99.99%"`.
///
/// Values are truncated rather than rounded so a day that was not fully up
/// never renders as `100.00%`.
pub fn format_percent(value: f64) -> String {
    let scale = 10f64.powi(PERCENT_DECIMALS as i32);
    // Absorb representation error such as 99.99 * 100 = 9998.999...
    let mut truncated = ((value * scale) + 1e-9).floor() / scale;
    if value < 100.0 {
        truncated = truncated.min(100.0 - 1.0 / scale);
    }
    format!("{:.*}%", PERCENT_DECIMALS, truncated)
}
