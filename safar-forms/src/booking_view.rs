//! Read model for the order-delivery screen. Bookings come back in several
//! shapes depending on which agency screen created them.

use serde_json::Value;

use safar_core::booking::{BookedHotel, BookedTicket, BookedTransport, BookingStatus, BookingTotals, Passenger};
use safar_core::BookingView;
use safar_shared::coerce::{id_from_value, parse_float, parse_int, to_f64};
use safar_shared::field_map::{normalize, pick, FieldKind, FieldRule, FlatRecord};

const BOOKING_RULES: &[FieldRule] = &[
    FieldRule::new("booking_number", FieldKind::Text, &["booking_number", "booking_no", "reference"]),
    FieldRule::new("status", FieldKind::Text, &["status", "booking_status"]),
    FieldRule::new(
        "agency_name",
        FieldKind::Text,
        &["agency.name", "agency_name", "agency_details.name"],
    ),
    FieldRule::new("created_on", FieldKind::Date, &["created_at", "created_on", "date"]),
];

const PASSENGER_RULES: &[FieldRule] = &[
    FieldRule::new("first_name", FieldKind::Text, &["first_name", "firstname", "name"]),
    FieldRule::new("last_name", FieldKind::Text, &["last_name", "lastname", "surname"]),
    FieldRule::new("passport_number", FieldKind::Text, &["passport_number", "passport_no", "passport"]),
    FieldRule::new("person_type", FieldKind::Text, &["person_type", "type", "age_group"]),
    FieldRule::new("visa_price", FieldKind::Number, &["visa_price", "visa_rate", "visa_amount"]),
];

const HOTEL_RULES: &[FieldRule] = &[
    FieldRule::new("hotel_name", FieldKind::Text, &["hotel.name", "hotel_name", "hotel"]),
    FieldRule::new("check_in", FieldKind::Date, &["check_in_date", "check_in"]),
    FieldRule::new("check_out", FieldKind::Date, &["check_out_date", "check_out"]),
    FieldRule::new("nights", FieldKind::Integer, &["number_of_nights", "nights", "no_of_nights"]),
    FieldRule::new("room_type", FieldKind::Text, &["room_type", "bed_type"]),
    FieldRule::new("quantity", FieldKind::Integer, &["quantity", "rooms", "qty"]),
    FieldRule::new("price", FieldKind::Number, &["price", "rate", "selling_price"]),
];

const TRANSPORT_RULES: &[FieldRule] = &[
    FieldRule::new("vehicle_type", FieldKind::Text, &["vehicle_type", "vehicle"]),
    FieldRule::new("sector", FieldKind::Text, &["sector.name", "transport_sector.name", "sector_name", "sector"]),
    FieldRule::new("quantity", FieldKind::Integer, &["quantity", "vehicles", "qty"]),
    FieldRule::new("price", FieldKind::Number, &["price", "rate", "selling_price"]),
];

const TICKET_RULES: &[FieldRule] = &[
    FieldRule::new("pnr", FieldKind::Text, &["ticket.pnr", "pnr"]),
    FieldRule::new("airline", FieldKind::Text, &["ticket.airline.name", "airline.name", "airline_name"]),
    FieldRule::new("seats", FieldKind::Integer, &["seats", "quantity", "total_seats"]),
    FieldRule::new("price", FieldKind::Number, &["price", "ticket_price", "adult_price"]),
];

const TOTAL_KEYS: &[&str] = &["total_amount", "grand_total", "total"];
const PAID_KEYS: &[&str] = &["paid_amount", "paid", "amount_paid"];
const TICKET_TOTAL_KEYS: &[&str] = &["total_ticket_amount", "ticket_total"];
const HOTEL_TOTAL_KEYS: &[&str] = &["total_hotel_amount", "hotel_total"];
const TRANSPORT_TOTAL_KEYS: &[&str] = &["total_transport_amount", "transport_total"];
const VISA_TOTAL_KEYS: &[&str] = &["total_visa_amount", "visa_total"];

fn items<'a>(resource: &'a Value, sources: &[&str]) -> &'a [Value] {
    pick(resource, sources)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn amount(resource: &Value, sources: &[&str]) -> Option<f64> {
    pick(resource, sources).map(to_f64)
}

/// Row total from the resource if given, otherwise price times its multipliers.
fn row_total(item: &Value, price: f64, multipliers: &[i64]) -> f64 {
    amount(item, &["total", "total_price", "amount"])
        .unwrap_or_else(|| multipliers.iter().fold(price, |acc, m| acc * (*m).max(1) as f64))
}

fn passenger(flat: FlatRecord) -> Passenger {
    Passenger {
        first_name: flat.owned("first_name"),
        last_name: flat.owned("last_name"),
        passport_number: flat.owned("passport_number"),
        person_type: flat.owned("person_type"),
        visa_price: parse_float(flat.text("visa_price")),
    }
}

fn hotel(item: &Value) -> BookedHotel {
    let flat = normalize(item, HOTEL_RULES);
    let nights = parse_int(flat.text("nights"));
    let quantity = parse_int(flat.text("quantity"));
    let price = parse_float(flat.text("price"));
    BookedHotel {
        hotel_name: flat.owned("hotel_name"),
        check_in: flat.owned("check_in"),
        check_out: flat.owned("check_out"),
        nights,
        room_type: flat.owned("room_type"),
        quantity,
        price,
        total: row_total(item, price, &[quantity, nights]),
    }
}

fn transport(item: &Value) -> BookedTransport {
    let flat = normalize(item, TRANSPORT_RULES);
    let quantity = parse_int(flat.text("quantity"));
    let price = parse_float(flat.text("price"));
    BookedTransport {
        vehicle_type: flat.owned("vehicle_type"),
        sector: flat.owned("sector"),
        quantity,
        price,
        total: row_total(item, price, &[quantity]),
    }
}

fn ticket(item: &Value) -> BookedTicket {
    let flat = normalize(item, TICKET_RULES);
    let seats = parse_int(flat.text("seats"));
    let price = parse_float(flat.text("price"));
    BookedTicket {
        pnr: flat.owned("pnr"),
        airline: flat.owned("airline"),
        seats,
        total: row_total(item, price, &[seats]),
    }
}

pub fn booking_view(resource: &Value) -> BookingView {
    let flat = normalize(resource, BOOKING_RULES);

    let passengers: Vec<Passenger> = items(resource, &["passengers", "person_details", "persons"])
        .iter()
        .map(|item| passenger(normalize(item, PASSENGER_RULES)))
        .collect();
    let hotels: Vec<BookedHotel> = items(resource, &["hotel_details", "hotels"]).iter().map(hotel).collect();
    let transports: Vec<BookedTransport> = items(resource, &["transport_details", "transports"])
        .iter()
        .map(transport)
        .collect();
    let tickets: Vec<BookedTicket> = items(resource, &["ticket_details", "tickets"]).iter().map(ticket).collect();

    let ticket_total = amount(resource, TICKET_TOTAL_KEYS).unwrap_or_else(|| tickets.iter().map(|t| t.total).sum());
    let hotel_total = amount(resource, HOTEL_TOTAL_KEYS).unwrap_or_else(|| hotels.iter().map(|h| h.total).sum());
    let transport_total =
        amount(resource, TRANSPORT_TOTAL_KEYS).unwrap_or_else(|| transports.iter().map(|t| t.total).sum());
    let visa_total = amount(resource, VISA_TOTAL_KEYS).unwrap_or_else(|| passengers.iter().map(|p| p.visa_price).sum());
    let total = amount(resource, TOTAL_KEYS).unwrap_or(ticket_total + hotel_total + transport_total + visa_total);
    let paid = amount(resource, PAID_KEYS).unwrap_or(0.0);

    BookingView {
        id: pick(resource, &["id"]).and_then(id_from_value).unwrap_or(0),
        booking_number: flat.owned("booking_number"),
        status: BookingStatus::parse(flat.text("status")),
        agency_name: flat.owned("agency_name"),
        created_on: flat.owned("created_on"),
        passengers,
        hotels,
        transports,
        tickets,
        totals: BookingTotals {
            ticket: ticket_total,
            hotel: hotel_total,
            transport: transport_total,
            visa: visa_total,
            total,
            paid,
            pending: (total - paid).max(0.0),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_totals_recomputed_from_rows() {
        let resource = json!({
            "id": 88,
            "booking_number": "BK-2025-0088",
            "status": "under_process",
            "agency": {"id": 4, "name": "Al Noor Travels"},
            "created_at": "2025-02-11T09:15:00Z",
            "person_details": [
                {"first_name": "Amina", "last_name": "Khan", "passport_number": "AB1234567", "person_type": "adult", "visa_price": 500},
                {"first_name": "Yusuf", "last_name": "Khan", "person_type": "child", "visa_price": "300"}
            ],
            "hotel_details": [
                {"hotel": {"name": "Swissotel Makkah"}, "check_in_date": "2025-03-01", "number_of_nights": 4, "quantity": 2, "price": 100}
            ],
            "transport_details": [{"vehicle_type": "Bus", "sector": "JED-MAK", "quantity": 1, "price": 250}],
            "ticket_details": [{"ticket": {"pnr": "XK12PL", "airline": {"name": "Saudia"}}, "seats": 2, "price": 1200}],
            "paid_amount": 1000
        });

        let view = booking_view(&resource);
        assert_eq!(view.id, 88);
        assert_eq!(view.status, BookingStatus::UnderProcess);
        assert_eq!(view.agency_name, "Al Noor Travels");
        assert_eq!(view.created_on, "2025-02-11");
        assert_eq!(view.passengers[0].full_name(), "Amina Khan");
        assert_eq!(view.tickets[0].airline, "Saudia");

        assert_eq!(view.totals.hotel, 800.0);
        assert_eq!(view.totals.transport, 250.0);
        assert_eq!(view.totals.ticket, 2400.0);
        assert_eq!(view.totals.visa, 800.0);
        assert_eq!(view.totals.total, 4250.0);
        assert_eq!(view.totals.pending, 3250.0);
    }

    #[test]
    fn test_resource_totals_take_precedence() {
        let resource = json!({
            "status": "approved",
            "hotels": [{"hotel_name": "Dar Al Tawhid", "nights": 2, "quantity": 1, "price": 100, "total": 180}],
            "total_hotel_amount": 175,
            "total_amount": 5000,
            "paid": 6000
        });

        let view = booking_view(&resource);
        assert_eq!(view.hotels[0].total, 180.0);
        assert_eq!(view.totals.hotel, 175.0);
        assert_eq!(view.totals.total, 5000.0);
        assert_eq!(view.totals.pending, 0.0);
    }

    #[test]
    fn test_sparse_booking() {
        let view = booking_view(&json!({"status": "on-hold"}));
        assert_eq!(view.status, BookingStatus::Unknown);
        assert!(view.passengers.is_empty());
        assert_eq!(view.totals, BookingTotals::default());
    }
}
