use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Airline {
    pub id: i64,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HotelOption {
    pub id: i64,
    pub name: String,
    pub city: Option<i64>,
    pub category: String,
}

/// Food and ziyarat price options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PriceOption {
    pub id: i64,
    pub title: String,
    pub selling_price: f64,
    pub purchase_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TransportSector {
    pub id: i64,
    pub name: String,
    pub vehicle_type: String,
    pub selling_price: f64,
    pub purchase_price: f64,
}
