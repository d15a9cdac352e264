//! Scalar formatting shared by every normalizer.

use chrono::DateTime;
use serde_json::{Number, Value};

use cubelytics_protocol::TIMESTAMP_MILLIS_THRESHOLD;

/// Date layout used for every rendered timestamp, e.g. `Mar 5, 2024`.
pub const DATE_FORMAT: &str = "%b %-d, %Y";

/// Text for a value inside a key/value block.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Text for a table cell; missing and `null` cells are empty.
pub fn cell_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(v) => display_value(v),
    }
}

fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Loose truthiness: `null`, `false`, `0`, `""` and absent are false.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Whether a value is a scalar (anything but an object or array).
pub fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

pub fn format_date_secs(secs: f64) -> Option<String> {
    DateTime::from_timestamp(secs as i64, 0).map(|dt| dt.format(DATE_FORMAT).to_string())
}

pub fn format_date_millis(millis: f64) -> Option<String> {
    DateTime::from_timestamp_millis(millis as i64).map(|dt| dt.format(DATE_FORMAT).to_string())
}

/// Heuristic date detection for schema-less stat blocks: any number strictly
/// above [`TIMESTAMP_MILLIS_THRESHOLD`] is read as epoch milliseconds.
pub fn epoch_millis_date(value: &Value) -> Option<String> {
    let millis = value.as_f64()?;
    if millis > TIMESTAMP_MILLIS_THRESHOLD {
        format_date_millis(millis)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_print_like_counters() {
        assert_eq!(display_value(&json!(42)), "42");
        assert_eq!(display_value(&json!(-7)), "-7");
        assert_eq!(display_value(&json!(3.0)), "3");
        assert_eq!(display_value(&json!(2.5)), "2.5");
    }

    #[test]
    fn composite_values_stay_readable() {
        assert_eq!(display_value(&json!(["a", 1, true])), "a, 1, true");
        assert_eq!(display_value(&json!({"k": 1})), r#"{"k":1}"#);
        assert_eq!(display_value(&Value::Null), "null");
        assert_eq!(cell_value(Some(&Value::Null)), "");
        assert_eq!(cell_value(None), "");
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(is_truthy(Some(&json!("0"))));
        assert!(is_truthy(Some(&json!({}))));
        assert!(is_truthy(Some(&json!(5))));
    }

    #[test]
    fn timestamp_threshold_is_exclusive() {
        assert_eq!(epoch_millis_date(&json!(1_000_000_000_000u64)), None);
        assert_eq!(
            epoch_millis_date(&json!(1_000_000_000_001u64)).as_deref(),
            Some("Sep 9, 2001")
        );
        assert_eq!(epoch_millis_date(&json!(999_999)), None);
        assert_eq!(epoch_millis_date(&json!("1700000000000")), None);
    }

    #[test]
    fn date_formats() {
        assert_eq!(format_date_secs(1_709_596_800.0).as_deref(), Some("Mar 5, 2024"));
        assert_eq!(format_date_millis(1_709_596_800_000.0).as_deref(), Some("Mar 5, 2024"));
    }
}
