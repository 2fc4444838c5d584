use serde_json::Value;

/// List endpoints answer with either a bare array or a paginated
/// `{ "results": [...] }` envelope.
pub fn unwrap_list(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
