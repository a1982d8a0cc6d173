use serde::{Deserialize, Deserializer};

/// Falls back to `T::default()` when a settings field fails to deserialize,
/// so one bad value does not discard the whole file.
pub fn ok_or_default<'a, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Deserialize<'a> + Default,
    D: Deserializer<'a>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Parses a decimal field, coercing anything unparseable or non-finite to `0.0`.
pub fn lenient_f32(raw: &str) -> f32 {
    match raw.trim().parse::<f32>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Parses a whole-day count. Fractional values truncate, negatives and
/// garbage become `0`.
pub fn lenient_days(raw: &str) -> u32 {
    let raw = raw.trim();
    if let Ok(days) = raw.parse::<u32>() {
        return days;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value.min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}
