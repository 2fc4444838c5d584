use serde_json::Value;

/// Form-text to number coercion with `parseFloat` rules: leading whitespace is
/// skipped, the longest numeric prefix wins, and anything unparseable is `0`.
/// Values beyond `f64` range clamp to `±f64::MAX`, since JSON has no infinity.
pub fn parse_float(input: &str) -> f64 {
    let text = input.trim_start();
    let end = numeric_prefix_len(text, true);
    match text[..end].parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        Ok(v) if v.is_sign_negative() => f64::MIN,
        Ok(_) => f64::MAX,
        Err(_) => 0.0,
    }
}

/// Same as [`parse_float`] but stops at the decimal point (`parseInt`).
/// Out-of-range input saturates at `i64::MIN`/`i64::MAX`.
pub fn parse_int(input: &str) -> i64 {
    let text = input.trim_start();
    let end = numeric_prefix_len(text, false);
    if end == 0 {
        return 0;
    }
    text[..end].parse::<i64>().unwrap_or(if text.starts_with('-') { i64::MIN } else { i64::MAX })
}

fn numeric_prefix_len(text: &str, allow_fraction: bool) -> usize {
    let bytes = text.as_bytes();
    let mut pos = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        pos += 1;
    }
    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let mut digits = pos - int_start;

    if allow_fraction && pos + 1 < bytes.len() && bytes[pos] == b'.' && bytes[pos + 1].is_ascii_digit() {
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return 0;
    }

    if allow_fraction && pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_digits_start = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_digits_start {
            pos = exp;
        }
    }
    pos
}

/// Accepts `true`, `"true"`, `1` and `"1"`; every other value is `false`.
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => flag_from_text(s),
        _ => false,
    }
}

pub fn flag_from_text(text: &str) -> bool {
    matches!(text, "true" | "1")
}

/// Renders a JSON scalar as the text a numeric input would hold.
pub fn number_text(value: &Value) -> String {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| "0".to_string()),
        },
        Value::String(s) => s.trim().to_string(),
        _ => "0".to_string(),
    }
}

pub fn integer_text(value: &Value) -> String {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => (n.as_f64().unwrap_or(0.0).trunc() as i64).to_string(),
        },
        Value::String(s) => s.trim().to_string(),
        _ => "0".to_string(),
    }
}

pub fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Numeric value of a JSON scalar, with the same rules as form text.
pub fn to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_float(s),
        _ => 0.0,
    }
}

/// Id fields arrive as numbers, numeric strings or `{ "id": .. }` objects.
pub fn id_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let id = parse_int(s);
            (id != 0).then_some(id)
        }
        Value::Object(map) => map.get("id").and_then(id_from_value),
        _ => None,
    }
}

/// Form text holding an id; blank or `0` means "nothing selected".
pub fn id_from_text(text: &str) -> Option<i64> {
    let id = parse_int(text);
    (id > 0).then_some(id)
}
