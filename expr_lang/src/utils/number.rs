//! Numeric display helpers shared by tokens, AST rendering and values.

/// Largest magnitude at which every integer is exactly representable in f64
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Whether a number carries no fractional part and fits an i64 exactly
pub fn as_integer(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        Some(value as i64)
    } else {
        None
    }
}

/// Format a number the way expressions display it: integral values
/// without a trailing `.0`, everything else in shortest round-trip form.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    match as_integer(value) {
        Some(int) => int.to_string(),
        None => value.to_string(),
    }
}
