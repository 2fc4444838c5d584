use std::collections::BTreeMap;

use serde_json::Value;

use crate::coerce::{integer_text, number_text, plain_text, to_bool};
use crate::dates::{date_text, form_datetime_text};

/// How a picked value is rendered into form state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Integer,
    Text,
    Flag,
    Date,
    DateTime,
}

/// One canonical form field and the backend keys it may arrive under,
/// highest precedence first. Keys may be dotted paths (`airline.id`,
/// `hotel_details.0.hotel`).
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub canonical: &'static str,
    pub kind: FieldKind,
    pub sources: &'static [&'static str],
}

impl FieldRule {
    pub const fn new(canonical: &'static str, kind: FieldKind, sources: &'static [&'static str]) -> Self {
        Self { canonical, kind, sources }
    }

    /// The key the payload builder writes back to.
    pub fn output_key(&self) -> &'static str {
        self.sources.first().copied().unwrap_or(self.canonical)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    Flag(bool),
}

/// Flat form state: exactly one value per canonical field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    fields: BTreeMap<&'static str, FormValue>,
}

impl FlatRecord {
    pub fn insert(&mut self, key: &'static str, value: FormValue) {
        self.fields.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.fields.get(key)
    }

    /// Text of a field, `""` when absent or not a text field.
    pub fn text(&self, key: &str) -> &str {
        match self.fields.get(key) {
            Some(FormValue::Text(s)) => s.as_str(),
            _ => "",
        }
    }

    pub fn owned(&self, key: &str) -> String {
        self.text(key).to_string()
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.fields.get(key), Some(FormValue::Flag(true)))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub fn lookup<'a>(resource: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(resource, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// First candidate that is present and not `null`. Empty strings count as present.
pub fn pick<'a>(resource: &'a Value, sources: &[&str]) -> Option<&'a Value> {
    sources
        .iter()
        .filter_map(|path| lookup(resource, path))
        .find(|value| !value.is_null())
}

fn render(kind: FieldKind, picked: Option<&Value>) -> FormValue {
    match (kind, picked) {
        (FieldKind::Flag, value) => FormValue::Flag(value.map(to_bool).unwrap_or(false)),
        (FieldKind::Number, Some(value)) => FormValue::Text(number_text(value)),
        (FieldKind::Integer, Some(value)) => FormValue::Text(integer_text(value)),
        (FieldKind::Number | FieldKind::Integer, None) => FormValue::Text("0".to_string()),
        (FieldKind::Text, value) => FormValue::Text(value.map(plain_text).unwrap_or_default()),
        (FieldKind::Date, value) => {
            FormValue::Text(value.and_then(Value::as_str).map(date_text).unwrap_or_default())
        }
        (FieldKind::DateTime, value) => {
            FormValue::Text(value.and_then(Value::as_str).map(form_datetime_text).unwrap_or_default())
        }
    }
}

/// Maps a backend resource onto flat form state using a rule table.
pub fn normalize(resource: &Value, rules: &[FieldRule]) -> FlatRecord {
    let mut record = FlatRecord::default();
    for rule in rules {
        record.insert(rule.canonical, render(rule.kind, pick(resource, rule.sources)));
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ADULT: FieldRule = FieldRule::new(
        "adult_selling",
        FieldKind::Number,
        &["adult_price", "adault_price", "adult_fare"],
    );
    const AIRLINE: FieldRule = FieldRule::new("airline", FieldKind::Integer, &["airline.id", "airline_id", "airline"]);
    const RESELL: FieldRule = FieldRule::new("reselling_allowed", FieldKind::Flag, &["reselling_allowed"]);
    const DEPARTS: FieldRule = FieldRule::new("departs_on", FieldKind::Date, &["departure_date"]);

    #[test]
    fn test_first_non_null_alternate_wins() {
        let cases = [
            (json!({"adult_price": 100, "adault_price": 200, "adult_fare": 300}), "100"),
            (json!({"adault_price": 200, "adult_fare": 300}), "200"),
            (json!({"adult_price": null, "adault_price": null, "adult_fare": 300}), "300"),
            (json!({"adult_fare": "250.5"}), "250.5"),
            (json!({}), "0"),
            (json!({"adult_price": null}), "0"),
        ];
        for (resource, expected) in cases {
            let flat = normalize(&resource, &[ADULT]);
            assert_eq!(flat.text("adult_selling"), expected, "resource {resource}");
        }
    }

    #[test]
    fn test_dotted_paths_and_object_ids() {
        let flat = normalize(&json!({"airline": {"id": 4, "name": "Saudia"}}), &[AIRLINE]);
        assert_eq!(flat.text("airline"), "4");

        let flat = normalize(&json!({"airline": 9}), &[AIRLINE]);
        assert_eq!(flat.text("airline"), "9");

        let nested = json!({"hotel_details": [{"hotel": 11}, {"hotel": 12}]});
        assert_eq!(lookup(&nested, "hotel_details.1.hotel"), Some(&json!(12)));
        assert_eq!(lookup(&nested, "hotel_details.5.hotel"), None);
    }

    #[test]
    fn test_defaults_and_malformed_dates() {
        let flat = normalize(&json!({"departure_date": "not a date"}), &[RESELL, DEPARTS]);
        assert!(!flat.flag("reselling_allowed"));
        assert_eq!(flat.text("departs_on"), "");
        assert_eq!(flat.text("missing"), "");
    }

    #[test]
    fn test_output_key_is_first_source() {
        assert_eq!(ADULT.output_key(), "adult_price");
    }
}
