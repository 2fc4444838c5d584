use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TripKind {
    #[default]
    #[serde(rename = "One-way")]
    OneWay,
    #[serde(rename = "Round-trip")]
    RoundTrip,
}

impl TripKind {
    /// Backends spell this "One-way", "one_way", "Round trip", "Return"...
    pub fn parse(text: &str) -> Option<Self> {
        let lowered = text.trim().to_ascii_lowercase();
        if lowered.is_empty() {
            None
        } else if lowered.contains("round") || lowered.contains("return") {
            Some(TripKind::RoundTrip)
        } else if lowered.contains("one") {
            Some(TripKind::OneWay)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum FlightKind {
    #[default]
    #[serde(rename = "Non-Stop")]
    NonStop,
    #[serde(rename = "One-Stop")]
    OneStop,
}

impl FlightKind {
    pub fn parse(text: &str) -> Option<Self> {
        let lowered = text.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        match lowered.as_str() {
            "nonstop" | "direct" => Some(FlightKind::NonStop),
            "onestop" | "1stop" | "stopover" => Some(FlightKind::OneStop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LegKind {
    Departure,
    Return,
}

/// One flight leg as the tickets endpoint expects it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripLeg {
    pub trip_type: LegKind,
    pub departure_date_time: String,
    pub arrival_date_time: String,
    pub departure_city: i64,
    pub arrival_city: i64,
    pub flight_number: String,
}

/// Onward segment of a one-stop itinerary. `departure_date_time` leaves the
/// stopover city; the leg it belongs to arrives there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stopover {
    pub trip_type: LegKind,
    pub stopover_city: i64,
    pub departure_date_time: String,
    pub arrival_date_time: String,
    pub flight_number: String,
    pub stopover_duration: String,
}

/// Request body for `POST/PUT /api/tickets/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketPayload {
    pub organization: i64,
    pub airline: i64,
    pub pnr: String,
    pub adult_price: f64,
    pub adult_purchase_price: f64,
    pub child_price: f64,
    pub child_purchase_price: f64,
    pub infant_price: f64,
    pub infant_purchase_price: f64,
    pub total_seats: i64,
    pub left_seats: i64,
    pub weight: f64,
    pub pieces: i64,
    pub reselling_allowed: bool,
    pub is_umrah_seat: bool,
    pub trip_type: TripKind,
    pub flight_type: FlightKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    pub trip_details: Vec<TripLeg>,
    pub stopover_details: Vec<Stopover>,
}
