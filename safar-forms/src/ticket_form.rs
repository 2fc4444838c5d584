use serde_json::Value;

use safar_core::ticket::{FlightKind, LegKind, Stopover, TicketPayload, TripKind, TripLeg};
use safar_shared::coerce::{id_from_text, parse_float, parse_int};
use safar_shared::dates::{api_datetime_text, parse_datetime};
use safar_shared::field_map::{normalize, pick, FieldKind, FieldRule, FlatRecord};

use crate::derived::{set_if_changed, wait_time};
use crate::FormError;

const TICKET_RULES: &[FieldRule] = &[
    FieldRule::new("airline", FieldKind::Integer, &["airline.id", "airline_id", "airline"]),
    FieldRule::new("pnr", FieldKind::Text, &["pnr", "PNR", "pnr_number"]),
    FieldRule::new(
        "adult_selling",
        FieldKind::Number,
        &["adult_price", "adault_price", "adult_fare", "adult_selling_price"],
    ),
    FieldRule::new(
        "adult_purchase",
        FieldKind::Number,
        &["adult_purchase_price", "adault_purchase_price", "adult_purchase_fare"],
    ),
    FieldRule::new("child_selling", FieldKind::Number, &["child_price", "child_fare", "child_selling_price"]),
    FieldRule::new("child_purchase", FieldKind::Number, &["child_purchase_price", "child_purchase_fare"]),
    FieldRule::new("infant_selling", FieldKind::Number, &["infant_price", "infant_fare", "infant_selling_price"]),
    FieldRule::new("infant_purchase", FieldKind::Number, &["infant_purchase_price", "infant_purchase_fare"]),
    FieldRule::new("total_seats", FieldKind::Integer, &["total_seats", "seats", "no_of_seats"]),
    FieldRule::new("left_seats", FieldKind::Integer, &["left_seats", "available_seats", "remaining_seats"]),
    FieldRule::new("baggage_weight", FieldKind::Number, &["weight", "baggage_weight"]),
    FieldRule::new("baggage_pieces", FieldKind::Integer, &["pieces", "baggage_pieces"]),
    FieldRule::new(
        "reselling_allowed",
        FieldKind::Flag,
        &["reselling_allowed", "is_reselling_allowed", "reselling"],
    ),
    FieldRule::new("is_umrah_seat", FieldKind::Flag, &["is_umrah_seat", "umrah_seat"]),
    FieldRule::new("trip_type", FieldKind::Text, &["trip_type", "trip_kind"]),
    FieldRule::new("flight_type", FieldKind::Text, &["flight_type", "stop_type"]),
    FieldRule::new("status", FieldKind::Text, &["status"]),
];

const DEPARTURE_AT: &[&str] = &["departure_date_time", "departure_datetime", "departure_time"];
const ARRIVAL_AT: &[&str] = &["arrival_date_time", "arrival_datetime", "arrival_time"];
const FLIGHT_NUMBER: &[&str] = &["flight_number", "flight_no"];

const LEG_RULES: &[FieldRule] = &[
    FieldRule::new("departure_at", FieldKind::DateTime, DEPARTURE_AT),
    FieldRule::new("arrival_at", FieldKind::DateTime, ARRIVAL_AT),
    FieldRule::new(
        "departure_city",
        FieldKind::Integer,
        &["departure_city.id", "departure_city_id", "departure_city"],
    ),
    FieldRule::new("arrival_city", FieldKind::Integer, &["arrival_city.id", "arrival_city_id", "arrival_city"]),
    FieldRule::new("flight_number", FieldKind::Text, FLIGHT_NUMBER),
];

const STOP_RULES: &[FieldRule] = &[
    FieldRule::new("city", FieldKind::Integer, &["stopover_city.id", "stopover_city_id", "stopover_city"]),
    FieldRule::new("departure_at", FieldKind::DateTime, DEPARTURE_AT),
    FieldRule::new("arrival_at", FieldKind::DateTime, ARRIVAL_AT),
    FieldRule::new("flight_number", FieldKind::Text, FLIGHT_NUMBER),
    FieldRule::new("wait_time", FieldKind::Text, &["stopover_duration", "wait_time"]),
];

const TRIP_ARRAYS: &[&str] = &["trip_details", "trips", "legs"];
const STOP_ARRAYS: &[&str] = &["stopover_details", "stopovers"];
const LEG_TYPE: &[&str] = &["trip_type", "type"];

static NULL: Value = Value::Null;

/// One trip leg as the editor shows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegForm {
    pub departure_at: String,
    pub arrival_at: String,
    pub departure_city: String,
    pub arrival_city: String,
    pub flight_number: String,
}

impl LegForm {
    fn from_flat(flat: &FlatRecord) -> Self {
        Self {
            departure_at: flat.owned("departure_at"),
            arrival_at: flat.owned("arrival_at"),
            departure_city: flat.owned("departure_city"),
            arrival_city: flat.owned("arrival_city"),
            flight_number: flat.owned("flight_number"),
        }
    }

    fn validate(&self, label: &str) -> Result<(), FormError> {
        if parse_datetime(&self.departure_at).is_none() {
            return Err(FormError::Required(format!("{label} departure date and time is required")));
        }
        if parse_datetime(&self.arrival_at).is_none() {
            return Err(FormError::Required(format!("{label} arrival date and time is required")));
        }
        if id_from_text(&self.departure_city).is_none() {
            return Err(FormError::Required(format!("{label} departure city is required")));
        }
        if id_from_text(&self.arrival_city).is_none() {
            return Err(FormError::Required(format!("{label} arrival city is required")));
        }
        if self.flight_number.trim().is_empty() {
            return Err(FormError::Required(format!("{label} flight number is required")));
        }
        Ok(())
    }

    fn to_leg(&self, trip_type: LegKind) -> TripLeg {
        TripLeg {
            trip_type,
            departure_date_time: api_datetime_text(&self.departure_at).unwrap_or_default(),
            arrival_date_time: api_datetime_text(&self.arrival_at).unwrap_or_default(),
            departure_city: parse_int(&self.departure_city),
            arrival_city: parse_int(&self.arrival_city),
            flight_number: self.flight_number.trim().to_string(),
        }
    }
}

/// The onward segment of a one-stop itinerary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopForm {
    pub city: String,
    pub departure_at: String,
    pub arrival_at: String,
    pub flight_number: String,
    pub wait_time: String,
}

/// Flat editable state of the ticket editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketForm {
    pub airline: String,
    pub pnr: String,
    pub adult_selling: String,
    pub adult_purchase: String,
    pub child_selling: String,
    pub child_purchase: String,
    pub infant_selling: String,
    pub infant_purchase: String,
    pub total_seats: String,
    pub left_seats: String,
    pub baggage_weight: String,
    pub baggage_pieces: String,
    pub reselling_allowed: bool,
    pub is_umrah_seat: bool,
    pub trip_kind: TripKind,
    pub flight_kind: FlightKind,
    pub status: String,
    pub departure: LegForm,
    pub return_leg: LegForm,
    pub stop: StopForm,
}

fn leg_type_is(item: &Value, wanted: &str) -> bool {
    pick(item, LEG_TYPE)
        .and_then(Value::as_str)
        .is_some_and(|t| t.trim().eq_ignore_ascii_case(wanted))
}

/// The leg typed `wanted`, else the one at `fallback`.
fn select<'a>(items: &'a [Value], wanted: &str, fallback: usize) -> Option<&'a Value> {
    items
        .iter()
        .find(|item| leg_type_is(item, wanted))
        .or_else(|| {
            let typed_elsewhere = items.get(fallback).is_some_and(|item| {
                pick(item, LEG_TYPE).and_then(Value::as_str).is_some_and(|t| !t.trim().is_empty())
            });
            if typed_elsewhere {
                None
            } else {
                items.get(fallback)
            }
        })
}

fn array<'a>(resource: &'a Value, sources: &[&str]) -> &'a [Value] {
    pick(resource, sources)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

impl TicketForm {
    /// Load path: a `/api/tickets/` resource into editor state.
    pub fn from_resource(resource: &Value) -> Self {
        let flat = normalize(resource, TICKET_RULES);
        let legs = array(resource, TRIP_ARRAYS);
        let stops = array(resource, STOP_ARRAYS);

        let departure = select(legs, "departure", 0).unwrap_or(&NULL);
        let return_leg = select(legs, "return", 1);
        let stop = select(stops, "departure", 0);

        let trip_kind = TripKind::parse(flat.text("trip_type")).unwrap_or(if return_leg.is_some() {
            TripKind::RoundTrip
        } else {
            TripKind::OneWay
        });
        let flight_kind = FlightKind::parse(flat.text("flight_type")).unwrap_or(if stop.is_some() {
            FlightKind::OneStop
        } else {
            FlightKind::NonStop
        });

        let stop_flat = normalize(stop.unwrap_or(&NULL), STOP_RULES);

        let mut form = Self {
            airline: flat.owned("airline"),
            pnr: flat.owned("pnr"),
            adult_selling: flat.owned("adult_selling"),
            adult_purchase: flat.owned("adult_purchase"),
            child_selling: flat.owned("child_selling"),
            child_purchase: flat.owned("child_purchase"),
            infant_selling: flat.owned("infant_selling"),
            infant_purchase: flat.owned("infant_purchase"),
            total_seats: flat.owned("total_seats"),
            left_seats: flat.owned("left_seats"),
            baggage_weight: flat.owned("baggage_weight"),
            baggage_pieces: flat.owned("baggage_pieces"),
            reselling_allowed: flat.flag("reselling_allowed"),
            is_umrah_seat: flat.flag("is_umrah_seat"),
            trip_kind,
            flight_kind,
            status: flat.owned("status"),
            departure: LegForm::from_flat(&normalize(departure, LEG_RULES)),
            return_leg: LegForm::from_flat(&normalize(return_leg.unwrap_or(&NULL), LEG_RULES)),
            stop: StopForm {
                city: stop_flat.owned("city"),
                departure_at: stop_flat.owned("departure_at"),
                arrival_at: stop_flat.owned("arrival_at"),
                flight_number: stop_flat.owned("flight_number"),
                wait_time: stop_flat.owned("wait_time"),
            },
        };
        if form.stop.wait_time.is_empty() {
            form.recompute_wait_time();
        }
        form
    }

    pub fn set_departure_arrival(&mut self, value: String) -> bool {
        self.departure.arrival_at = value;
        self.recompute_wait_time()
    }

    pub fn set_stop_departure(&mut self, value: String) -> bool {
        self.stop.departure_at = value;
        self.recompute_wait_time()
    }

    /// Wait at the stopover = onward departure minus arrival of the departure leg.
    pub fn recompute_wait_time(&mut self) -> bool {
        if self.flight_kind != FlightKind::OneStop {
            return false;
        }
        match wait_time(&self.departure.arrival_at, &self.stop.departure_at) {
            Some(wait) => set_if_changed(&mut self.stop.wait_time, wait),
            None => false,
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if id_from_text(&self.airline).is_none() {
            return Err(FormError::Required("Please select an airline".to_string()));
        }
        if self.pnr.trim().is_empty() {
            return Err(FormError::Required("PNR is required".to_string()));
        }
        if parse_int(&self.total_seats) <= 0 {
            return Err(FormError::Required("Total seats must be greater than zero".to_string()));
        }
        self.departure.validate("Departure")?;
        if self.trip_kind == TripKind::RoundTrip {
            self.return_leg.validate("Return")?;
        }
        if self.flight_kind == FlightKind::OneStop {
            if id_from_text(&self.stop.city).is_none() {
                return Err(FormError::Required("Stopover city is required".to_string()));
            }
            if parse_datetime(&self.stop.departure_at).is_none() {
                return Err(FormError::Required("Stopover departure date and time is required".to_string()));
            }
            if parse_datetime(&self.stop.arrival_at).is_none() {
                return Err(FormError::Required("Stopover arrival date and time is required".to_string()));
            }
        }
        Ok(())
    }

    /// Submit path: validated editor state into the request body.
    pub fn to_payload(&self, organization: i64) -> Result<TicketPayload, FormError> {
        self.validate()?;

        let total_seats = parse_int(&self.total_seats);
        let left_seats = if self.left_seats.trim().is_empty() {
            total_seats
        } else {
            parse_int(&self.left_seats)
        };
        if left_seats > total_seats {
            return Err(FormError::Invalid("Left seats cannot exceed total seats".to_string()));
        }

        let mut trip_details = vec![self.departure.to_leg(LegKind::Departure)];
        if self.trip_kind == TripKind::RoundTrip {
            trip_details.push(self.return_leg.to_leg(LegKind::Return));
        }

        let stopover_details = match self.flight_kind {
            FlightKind::NonStop => Vec::new(),
            FlightKind::OneStop => {
                let duration = wait_time(&self.departure.arrival_at, &self.stop.departure_at)
                    .unwrap_or_else(|| self.stop.wait_time.clone());
                vec![Stopover {
                    trip_type: LegKind::Departure,
                    stopover_city: parse_int(&self.stop.city),
                    departure_date_time: api_datetime_text(&self.stop.departure_at).unwrap_or_default(),
                    arrival_date_time: api_datetime_text(&self.stop.arrival_at).unwrap_or_default(),
                    flight_number: self.stop.flight_number.trim().to_string(),
                    stopover_duration: duration,
                }]
            }
        };

        Ok(TicketPayload {
            organization,
            airline: parse_int(&self.airline),
            pnr: self.pnr.trim().to_string(),
            adult_price: parse_float(&self.adult_selling),
            adult_purchase_price: parse_float(&self.adult_purchase),
            child_price: parse_float(&self.child_selling),
            child_purchase_price: parse_float(&self.child_purchase),
            infant_price: parse_float(&self.infant_selling),
            infant_purchase_price: parse_float(&self.infant_purchase),
            total_seats,
            left_seats,
            weight: parse_float(&self.baggage_weight),
            pieces: parse_int(&self.baggage_pieces),
            reselling_allowed: self.reselling_allowed,
            is_umrah_seat: self.is_umrah_seat,
            trip_type: self.trip_kind,
            flight_type: self.flight_kind,
            status: self.status.trim().to_string(),
            trip_details,
            stopover_details,
        })
    }
}
