//! Selector options for the editors, built from reference list rows.

use serde_json::Value;

use safar_core::reference::{Airline, City, HotelOption, PriceOption, TransportSector};
use safar_shared::coerce::{id_from_value, plain_text, to_f64};
use safar_shared::field_map::pick;

fn id(row: &Value) -> Option<i64> {
    pick(row, &["id"]).and_then(id_from_value).filter(|id| *id > 0)
}

fn text(row: &Value, sources: &[&str]) -> String {
    pick(row, sources).map(plain_text).unwrap_or_default()
}

fn number(row: &Value, sources: &[&str]) -> f64 {
    pick(row, sources).map(to_f64).unwrap_or(0.0)
}

/// Rows without a usable id cannot be selected and are dropped.
fn collect<T>(rows: &[Value], build: impl Fn(i64, &Value) -> T) -> Vec<T> {
    rows.iter().filter_map(|row| id(row).map(|id| build(id, row))).collect()
}

pub fn airlines(rows: &[Value]) -> Vec<Airline> {
    collect(rows, |id, row| Airline {
        id,
        name: text(row, &["name", "airline_name"]),
        code: text(row, &["code", "iata_code", "airline_code"]),
    })
}

pub fn cities(rows: &[Value]) -> Vec<City> {
    collect(rows, |id, row| City {
        id,
        name: text(row, &["name", "city_name"]),
        code: text(row, &["code", "city_code"]),
    })
}

pub fn hotels(rows: &[Value]) -> Vec<HotelOption> {
    collect(rows, |id, row| HotelOption {
        id,
        name: text(row, &["name", "hotel_name"]),
        city: pick(row, &["city.id", "city_id", "city"]).and_then(id_from_value),
        category: text(row, &["category", "star_rating", "stars"]),
    })
}

/// Food and ziyarat prices. A bare `price` is the selling price only when no
/// explicit `selling_price` is given, and never the purchase price.
pub fn price_options(rows: &[Value]) -> Vec<PriceOption> {
    collect(rows, |id, row| PriceOption {
        id,
        title: text(row, &["title", "name", "description"]),
        selling_price: number(row, &["selling_price", "price"]),
        purchase_price: number(row, &["purchase_price"]),
    })
}

pub fn transport_sectors(rows: &[Value]) -> Vec<TransportSector> {
    collect(rows, |id, row| TransportSector {
        id,
        name: text(row, &["name", "sector", "sector_name", "title"]),
        vehicle_type: text(row, &["vehicle_type", "vehicle"]),
        selling_price: number(row, &["selling_price", "price"]),
        purchase_price: number(row, &["purchase_price"]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_without_id_are_dropped() {
        let rows = vec![
            json!({"id": 1, "name": "Saudia", "code": "SV"}),
            json!({"name": "orphan"}),
            json!({"id": 0, "name": "placeholder"}),
            json!({"id": "7", "airline_name": "PIA", "iata_code": "PK"}),
        ];
        let options = airlines(&rows);
        assert_eq!(options.len(), 2);
        assert_eq!(options[1], Airline { id: 7, name: "PIA".to_string(), code: "PK".to_string() });
    }

    #[test]
    fn test_ambiguous_price_key() {
        let rows = vec![
            json!({"id": 1, "title": "Full board", "price": 1500}),
            json!({"id": 2, "title": "Half board", "price": 900, "selling_price": 1000, "purchase_price": 800}),
        ];
        let options = price_options(&rows);
        assert_eq!(options[0].selling_price, 1500.0);
        assert_eq!(options[0].purchase_price, 0.0);
        assert_eq!(options[1].selling_price, 1000.0);
        assert_eq!(options[1].purchase_price, 800.0);
    }

    #[test]
    fn test_hotel_city_from_object() {
        let rows = vec![json!({"id": 3, "name": "Anjum", "city": {"id": 2, "name": "Makkah"}, "category": "5"})];
        let options = hotels(&rows);
        assert_eq!(options[0].city, Some(2));
        assert_eq!(options[0].category, "5");
    }
}
