use serde_json::Value;

/// Every key of `expected` must come back with the same value;
/// numbers compare numerically.
pub(crate) fn assert_covers(expected: &Value, actual: &Value, path: &str) {
    match (expected, actual) {
        (Value::Object(want), Value::Object(got)) => {
            for (key, value) in want {
                let next = format!("{path}.{key}");
                let other = got.get(key).unwrap_or_else(|| panic!("missing {next}"));
                assert_covers(value, other, &next);
            }
        }
        (Value::Array(want), Value::Array(got)) => {
            assert_eq!(want.len(), got.len(), "length of {path}");
            for (i, (w, g)) in want.iter().zip(got).enumerate() {
                assert_covers(w, g, &format!("{path}[{i}]"));
            }
        }
        (Value::Number(want), Value::Number(got)) => {
            assert_eq!(want.as_f64(), got.as_f64(), "value of {path}");
        }
        _ => assert_eq!(expected, actual, "value of {path}"),
    }
}
