//! Minute/second formatting for trip durations.

/// Formats fractional minutes as `"M:SS min"` with seconds kept in `0..60`.
///
/// The value is rounded to the millisecond first and the seconds component is
/// then truncated, so `15.999` renders as `15:59 min`.
pub fn format_duration(minutes: f64) -> String {
    let millis = (minutes * 60_000.0).round() as i64;
    let sign = if millis < 0 { "-" } else { "" };
    let total_secs = millis.abs() / 1000;
    format!("{}{}:{:02} min", sign, total_secs / 60, total_secs % 60)
}

/// Parses a value produced by [`format_duration`] back into minutes.
///
/// The trailing `min` suffix is optional. Returns `None` for anything that is
/// not `M:SS` with seconds below 60.
pub fn parse_duration(text: &str) -> Option<f64> {
    let text = text.trim();
    let text = text.strip_suffix("min").unwrap_or(text).trim_end();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (mins, secs) = body.split_once(':')?;
    let mins: u64 = mins.parse().ok()?;
    let secs: u64 = secs.parse().ok()?;
    if secs >= 60 {
        return None;
    }

    let value = mins as f64 + secs as f64 / 60.0;
    Some(if negative { -value } else { value })
}
