use serde_json::Value;

use safar_core::package::{DiscountTier, PackageHotel, PackagePayload, PackageTicket, PackageTransport};
use safar_shared::coerce::{id_from_text, parse_float, parse_int, to_bool};
use safar_shared::dates::{parse_date, DATE_FORMAT};
use safar_shared::field_map::{normalize, pick, FieldKind, FieldRule, FlatRecord};

use crate::derived::{checkout_date, reconcile_stay, StayEdit};
use crate::FormError;

const PACKAGE_RULES: &[FieldRule] = &[
    FieldRule::new("title", FieldKind::Text, &["title", "name", "package_name"]),
    FieldRule::new("rules", FieldKind::Text, &["rules", "terms", "description"]),
    FieldRule::new("total_seats", FieldKind::Integer, &["total_seats", "seats"]),
    FieldRule::new(
        "adult_visa_selling",
        FieldKind::Number,
        &["adult_visa_price", "adault_visa_price", "adult_visa_selling_price"],
    ),
    FieldRule::new(
        "adult_visa_purchase",
        FieldKind::Number,
        &["adult_visa_purchase_price", "adault_visa_purchase_price"],
    ),
    FieldRule::new("child_visa_selling", FieldKind::Number, &["child_visa_price", "child_visa_selling_price"]),
    FieldRule::new("child_visa_purchase", FieldKind::Number, &["child_visa_purchase_price"]),
    FieldRule::new("infant_visa_selling", FieldKind::Number, &["infant_visa_price", "infant_visa_selling_price"]),
    FieldRule::new("infant_visa_purchase", FieldKind::Number, &["infant_visa_purchase_price"]),
    FieldRule::new("food_selling", FieldKind::Number, &["food_price", "food_selling_price"]),
    FieldRule::new("food_purchase", FieldKind::Number, &["food_purchase_price"]),
    FieldRule::new(
        "ziyarat_selling",
        FieldKind::Number,
        &["ziarat_price", "ziyarat_price", "ziarat_selling_price"],
    ),
    FieldRule::new("ziyarat_purchase", FieldKind::Number, &["ziarat_purchase_price", "ziyarat_purchase_price"]),
    FieldRule::new("transport_selling", FieldKind::Number, &["transport_price", "transport_selling_price"]),
    FieldRule::new("transport_purchase", FieldKind::Number, &["transport_purchase_price"]),
    FieldRule::new("reselling_allowed", FieldKind::Flag, &["reselling_allowed", "is_reselling_allowed"]),
    FieldRule::new(
        "ticket",
        FieldKind::Integer,
        &[
            "ticket_details.0.ticket.id",
            "ticket_details.0.ticket",
            "ticket.id",
            "ticket_id",
            "ticket",
        ],
    ),
];

const ACTIVE: &[&str] = &["is_active", "active"];

const HOTEL_RULES: &[FieldRule] = &[
    FieldRule::new("hotel", FieldKind::Integer, &["hotel.id", "hotel_id", "hotel"]),
    FieldRule::new("check_in", FieldKind::Date, &["check_in_date", "check_in", "checkin_date"]),
    FieldRule::new("nights", FieldKind::Integer, &["number_of_nights", "nights", "no_of_nights"]),
    FieldRule::new("check_out", FieldKind::Date, &["check_out_date", "check_out", "checkout_date"]),
    FieldRule::new(
        "sharing_selling",
        FieldKind::Number,
        &["sharing_bed_price", "sharing_price", "sharing_bed_selling_price"],
    ),
    FieldRule::new("sharing_purchase", FieldKind::Number, &["sharing_bed_purchase_price", "sharing_purchase_price"]),
    FieldRule::new("quint_selling", FieldKind::Number, &["quint_bed_price", "quaint_bed_price", "quint_price"]),
    FieldRule::new("quint_purchase", FieldKind::Number, &["quint_bed_purchase_price", "quaint_bed_purchase_price"]),
    FieldRule::new("quad_selling", FieldKind::Number, &["quad_bed_price", "quad_price"]),
    FieldRule::new("quad_purchase", FieldKind::Number, &["quad_bed_purchase_price"]),
    FieldRule::new("triple_selling", FieldKind::Number, &["triple_bed_price", "triple_price"]),
    FieldRule::new("triple_purchase", FieldKind::Number, &["triple_bed_purchase_price"]),
    FieldRule::new("double_selling", FieldKind::Number, &["double_bed_price", "double_price"]),
    FieldRule::new("double_purchase", FieldKind::Number, &["double_bed_purchase_price"]),
];

const TRANSPORT_RULES: &[FieldRule] = &[
    FieldRule::new(
        "sector",
        FieldKind::Integer,
        &["transport_sector.id", "transport_sector_id", "transport_sector"],
    ),
    FieldRule::new("vehicle_type", FieldKind::Text, &["vehicle_type", "vehicle"]),
    FieldRule::new("self_transport", FieldKind::Flag, &["self_transport", "is_self_transport"]),
];

const DISCOUNT_RULES: &[FieldRule] = &[
    FieldRule::new("adult_from", FieldKind::Integer, &["adult_from", "adault_from", "from_pax"]),
    FieldRule::new("adult_to", FieldKind::Integer, &["adult_to", "adault_to", "to_pax"]),
    FieldRule::new("max_discount", FieldKind::Number, &["max_discount", "discount", "discount_amount"]),
];

const HOTEL_ARRAYS: &[&str] = &["hotel_details", "hotels"];
const TRANSPORT_ARRAYS: &[&str] = &["transport_details", "transports"];
const DISCOUNT_ARRAYS: &[&str] = &["discount_details", "discounts"];

/// One repeated hotel group of the package editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelRowForm {
    pub hotel: String,
    pub check_in: String,
    pub nights: String,
    pub check_out: String,
    pub sharing_selling: String,
    pub sharing_purchase: String,
    pub quint_selling: String,
    pub quint_purchase: String,
    pub quad_selling: String,
    pub quad_purchase: String,
    pub triple_selling: String,
    pub triple_purchase: String,
    pub double_selling: String,
    pub double_purchase: String,
}

impl HotelRowForm {
    fn from_flat(flat: &FlatRecord) -> Self {
        let mut row = Self {
            hotel: flat.owned("hotel"),
            check_in: flat.owned("check_in"),
            nights: flat.owned("nights"),
            check_out: flat.owned("check_out"),
            sharing_selling: flat.owned("sharing_selling"),
            sharing_purchase: flat.owned("sharing_purchase"),
            quint_selling: flat.owned("quint_selling"),
            quint_purchase: flat.owned("quint_purchase"),
            quad_selling: flat.owned("quad_selling"),
            quad_purchase: flat.owned("quad_purchase"),
            triple_selling: flat.owned("triple_selling"),
            triple_purchase: flat.owned("triple_purchase"),
            double_selling: flat.owned("double_selling"),
            double_purchase: flat.owned("double_purchase"),
        };
        if parse_int(&row.nights) <= 0 && !row.check_out.is_empty() {
            row.set_check_out(row.check_out.clone());
        } else if row.check_out.is_empty() {
            row.set_nights(row.nights.clone());
        }
        row
    }

    pub fn set_check_in(&mut self, value: String) -> bool {
        self.check_in = value;
        reconcile_stay(&self.check_in, &mut self.nights, &mut self.check_out, StayEdit::CheckIn)
    }

    pub fn set_nights(&mut self, value: String) -> bool {
        self.nights = value;
        reconcile_stay(&self.check_in, &mut self.nights, &mut self.check_out, StayEdit::Nights)
    }

    pub fn set_check_out(&mut self, value: String) -> bool {
        self.check_out = value;
        reconcile_stay(&self.check_in, &mut self.nights, &mut self.check_out, StayEdit::CheckOut)
    }

    fn validate(&self, position: usize) -> Result<(), FormError> {
        if id_from_text(&self.hotel).is_none() {
            return Err(FormError::Required(format!("Hotel {position}: select a hotel")));
        }
        if parse_date(&self.check_in).is_none() {
            return Err(FormError::Required(format!("Hotel {position}: check-in date is required")));
        }
        if self.nights.trim().is_empty() || parse_int(&self.nights) <= 0 {
            return Err(FormError::Required(format!("Hotel {position}: number of nights is required")));
        }
        // A blank check-out is derived on submit; a typed one must agree.
        if !self.check_out.trim().is_empty() {
            let typed = parse_date(&self.check_out).map(|d| d.format(DATE_FORMAT).to_string());
            if typed.is_none() || typed != checkout_date(&self.check_in, &self.nights) {
                return Err(FormError::Invalid(format!(
                    "Hotel {position}: check-out must be {} nights after check-in",
                    parse_int(&self.nights)
                )));
            }
        }
        Ok(())
    }

    fn to_payload(&self) -> PackageHotel {
        let check_out = parse_date(&self.check_out)
            .map(|d| d.format(DATE_FORMAT).to_string())
            .or_else(|| checkout_date(&self.check_in, &self.nights))
            .unwrap_or_default();
        PackageHotel {
            hotel: parse_int(&self.hotel),
            check_in_date: parse_date(&self.check_in)
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            check_out_date: check_out,
            number_of_nights: parse_int(&self.nights),
            sharing_bed_price: parse_float(&self.sharing_selling),
            sharing_bed_purchase_price: parse_float(&self.sharing_purchase),
            quint_bed_price: parse_float(&self.quint_selling),
            quint_bed_purchase_price: parse_float(&self.quint_purchase),
            quad_bed_price: parse_float(&self.quad_selling),
            quad_bed_purchase_price: parse_float(&self.quad_purchase),
            triple_bed_price: parse_float(&self.triple_selling),
            triple_bed_purchase_price: parse_float(&self.triple_purchase),
            double_bed_price: parse_float(&self.double_selling),
            double_bed_purchase_price: parse_float(&self.double_purchase),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportRowForm {
    pub sector: String,
    pub vehicle_type: String,
    pub self_transport: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscountRowForm {
    pub adult_from: String,
    pub adult_to: String,
    pub max_discount: String,
}

/// Flat editable state of the package editor.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageForm {
    pub title: String,
    pub rules: String,
    pub total_seats: String,
    pub adult_visa_selling: String,
    pub adult_visa_purchase: String,
    pub child_visa_selling: String,
    pub child_visa_purchase: String,
    pub infant_visa_selling: String,
    pub infant_visa_purchase: String,
    pub food_selling: String,
    pub food_purchase: String,
    pub ziyarat_selling: String,
    pub ziyarat_purchase: String,
    pub transport_selling: String,
    pub transport_purchase: String,
    pub reselling_allowed: bool,
    pub is_active: bool,
    pub with_flight: bool,
    pub ticket: String,
    pub hotels: Vec<HotelRowForm>,
    pub transports: Vec<TransportRowForm>,
    pub discounts: Vec<DiscountRowForm>,
}

impl Default for PackageForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            rules: String::new(),
            total_seats: String::new(),
            adult_visa_selling: String::new(),
            adult_visa_purchase: String::new(),
            child_visa_selling: String::new(),
            child_visa_purchase: String::new(),
            infant_visa_selling: String::new(),
            infant_visa_purchase: String::new(),
            food_selling: String::new(),
            food_purchase: String::new(),
            ziyarat_selling: String::new(),
            ziyarat_purchase: String::new(),
            transport_selling: String::new(),
            transport_purchase: String::new(),
            reselling_allowed: false,
            is_active: true,
            with_flight: false,
            ticket: String::new(),
            hotels: vec![HotelRowForm::default()],
            transports: Vec::new(),
            discounts: Vec::new(),
        }
    }
}

fn rows<'a>(resource: &'a Value, sources: &[&str], rules: &[FieldRule]) -> impl Iterator<Item = FlatRecord> + 'a {
    let items = pick(resource, sources).and_then(Value::as_array);
    let rules = rules.to_vec();
    items
        .into_iter()
        .flatten()
        .map(move |item| normalize(item, &rules))
}

impl PackageForm {
    /// Load path: a `/api/umrah-packages/` resource into editor state.
    pub fn from_resource(resource: &Value) -> Self {
        let flat = normalize(resource, PACKAGE_RULES);
        let ticket = flat.owned("ticket");

        Self {
            title: flat.owned("title"),
            rules: flat.owned("rules"),
            total_seats: flat.owned("total_seats"),
            adult_visa_selling: flat.owned("adult_visa_selling"),
            adult_visa_purchase: flat.owned("adult_visa_purchase"),
            child_visa_selling: flat.owned("child_visa_selling"),
            child_visa_purchase: flat.owned("child_visa_purchase"),
            infant_visa_selling: flat.owned("infant_visa_selling"),
            infant_visa_purchase: flat.owned("infant_visa_purchase"),
            food_selling: flat.owned("food_selling"),
            food_purchase: flat.owned("food_purchase"),
            ziyarat_selling: flat.owned("ziyarat_selling"),
            ziyarat_purchase: flat.owned("ziyarat_purchase"),
            transport_selling: flat.owned("transport_selling"),
            transport_purchase: flat.owned("transport_purchase"),
            reselling_allowed: flat.flag("reselling_allowed"),
            // An absent flag on a stored package means it was never deactivated.
            is_active: pick(resource, ACTIVE).map_or(true, to_bool),
            with_flight: id_from_text(&ticket).is_some(),
            ticket,
            hotels: rows(resource, HOTEL_ARRAYS, HOTEL_RULES)
                .map(|flat| HotelRowForm::from_flat(&flat))
                .collect(),
            transports: rows(resource, TRANSPORT_ARRAYS, TRANSPORT_RULES)
                .map(|flat| TransportRowForm {
                    sector: flat.owned("sector"),
                    vehicle_type: flat.owned("vehicle_type"),
                    self_transport: flat.flag("self_transport"),
                })
                .collect(),
            discounts: rows(resource, DISCOUNT_ARRAYS, DISCOUNT_RULES)
                .map(|flat| DiscountRowForm {
                    adult_from: flat.owned("adult_from"),
                    adult_to: flat.owned("adult_to"),
                    max_discount: flat.owned("max_discount"),
                })
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::Required("Package title is required".to_string()));
        }
        if self.hotels.is_empty() {
            return Err(FormError::Required("Add at least one hotel".to_string()));
        }
        for (index, row) in self.hotels.iter().enumerate() {
            row.validate(index + 1)?;
        }
        for (index, row) in self.transports.iter().enumerate() {
            if !row.self_transport && id_from_text(&row.sector).is_none() {
                return Err(FormError::Required(format!("Transport {}: select a sector", index + 1)));
            }
        }
        for (index, tier) in self.discounts.iter().enumerate() {
            if parse_int(&tier.adult_to) < parse_int(&tier.adult_from) {
                return Err(FormError::Invalid(format!(
                    "Discount tier {}: 'to' must not be less than 'from'",
                    index + 1
                )));
            }
        }
        if self.with_flight && id_from_text(&self.ticket).is_none() {
            return Err(FormError::Required("Select a ticket for a package with flight".to_string()));
        }
        Ok(())
    }

    /// Submit path: validated editor state into the request body.
    pub fn to_payload(&self, organization: i64) -> Result<PackagePayload, FormError> {
        self.validate()?;

        let ticket_details = match (self.with_flight, id_from_text(&self.ticket)) {
            (true, Some(ticket)) => vec![PackageTicket { ticket }],
            _ => Vec::new(),
        };

        Ok(PackagePayload {
            organization,
            title: self.title.trim().to_string(),
            rules: self.rules.clone(),
            total_seats: parse_int(&self.total_seats),
            adult_visa_price: parse_float(&self.adult_visa_selling),
            adult_visa_purchase_price: parse_float(&self.adult_visa_purchase),
            child_visa_price: parse_float(&self.child_visa_selling),
            child_visa_purchase_price: parse_float(&self.child_visa_purchase),
            infant_visa_price: parse_float(&self.infant_visa_selling),
            infant_visa_purchase_price: parse_float(&self.infant_visa_purchase),
            food_price: parse_float(&self.food_selling),
            food_purchase_price: parse_float(&self.food_purchase),
            ziarat_price: parse_float(&self.ziyarat_selling),
            ziarat_purchase_price: parse_float(&self.ziyarat_purchase),
            transport_price: parse_float(&self.transport_selling),
            transport_purchase_price: parse_float(&self.transport_purchase),
            reselling_allowed: self.reselling_allowed,
            is_active: self.is_active,
            hotel_details: self.hotels.iter().map(HotelRowForm::to_payload).collect(),
            transport_details: self
                .transports
                .iter()
                .map(|row| PackageTransport {
                    transport_sector: parse_int(&row.sector),
                    vehicle_type: row.vehicle_type.trim().to_string(),
                    self_transport: row.self_transport,
                })
                .collect(),
            discount_details: self
                .discounts
                .iter()
                .map(|tier| DiscountTier {
                    adult_from: parse_int(&tier.adult_from),
                    adult_to: parse_int(&tier.adult_to),
                    max_discount: parse_float(&tier.max_discount),
                })
                .collect(),
            ticket_details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::assert_covers;
    use serde_json::json;

    fn package_resource() -> Value {
        json!({
            "title": "Ramadan Umrah 21 days",
            "rules": "Passport must be valid for 6 months",
            "total_seats": 45,
            "adult_visa_price": 55000,
            "adult_visa_purchase_price": 52000,
            "child_visa_price": 45000,
            "child_visa_purchase_price": 42000,
            "infant_visa_price": 20000,
            "infant_visa_purchase_price": 18000,
            "food_price": 15000,
            "food_purchase_price": 12000,
            "ziarat_price": 8000,
            "ziarat_purchase_price": 6500,
            "transport_price": 10000,
            "transport_purchase_price": 9000,
            "reselling_allowed": false,
            "is_active": true,
            "hotel_details": [
                {
                    "hotel": 14,
                    "check_in_date": "2025-03-01",
                    "check_out_date": "2025-03-11",
                    "number_of_nights": 10,
                    "sharing_bed_price": 4000,
                    "sharing_bed_purchase_price": 3500,
                    "quint_bed_price": 5000,
                    "quint_bed_purchase_price": 4500,
                    "quad_bed_price": 6000,
                    "quad_bed_purchase_price": 5500,
                    "triple_bed_price": 7000,
                    "triple_bed_purchase_price": 6500,
                    "double_bed_price": 9000,
                    "double_bed_purchase_price": 8000
                }
            ],
            "transport_details": [
                {"transport_sector": 3, "vehicle_type": "Bus", "self_transport": false}
            ],
            "discount_details": [
                {"adult_from": 10, "adult_to": 20, "max_discount": 2500}
            ],
            "ticket_details": [{"ticket": 31}]
        })
    }

    #[test]
    fn test_round_trip_reproduces_canonical_fields() {
        let resource = package_resource();
        let form = PackageForm::from_resource(&resource);
        assert!(form.with_flight);

        let body = serde_json::to_value(form.to_payload(2).unwrap()).unwrap();
        assert_covers(&resource, &body, "package");
    }

    #[test]
    fn test_alternate_spellings_on_load() {
        let resource = json!({
            "name": "Economy",
            "adault_visa_price": "51000",
            "ziyarat_price": 700,
            "hotels": [
                {"hotel": {"id": 8, "name": "Hilton Makkah"}, "check_in": "2025-01-10", "nights": 3, "quaint_bed_price": 4100}
            ],
            "ticket": {"id": 77, "pnr": "QW12"}
        });
        let form = PackageForm::from_resource(&resource);

        assert_eq!(form.title, "Economy");
        assert_eq!(form.adult_visa_selling, "51000");
        assert_eq!(form.ziyarat_selling, "700");
        assert_eq!(form.food_selling, "0");
        assert!(form.is_active);
        assert_eq!(form.ticket, "77");
        assert!(form.with_flight);

        let hotel = &form.hotels[0];
        assert_eq!(hotel.hotel, "8");
        assert_eq!(hotel.quint_selling, "4100");
        assert_eq!(hotel.check_out, "2025-01-13");
    }

    #[test]
    fn test_nights_recovered_from_dates() {
        let resource = json!({
            "title": "Short stay",
            "hotel_details": [{"hotel": 1, "check_in_date": "2025-01-10", "check_out_date": "2025-01-13"}]
        });
        let form = PackageForm::from_resource(&resource);
        assert_eq!(form.hotels[0].nights, "3");
    }

    #[test]
    fn test_hotel_row_edits_keep_dates_consistent() {
        let mut row = HotelRowForm::default();
        assert!(!row.set_check_in("2025-01-10".to_string()));
        assert!(row.set_nights("3".to_string()));
        assert_eq!(row.check_out, "2025-01-13");
        assert!(row.set_check_out("2025-01-15".to_string()));
        assert_eq!(row.nights, "5");
        assert!(!row.set_nights("5".to_string()));
    }

    #[test]
    fn test_hotel_rows_missing_check_in_or_nights_rejected() {
        let mut form = PackageForm::from_resource(&package_resource());
        form.hotels[0].check_in.clear();
        assert_eq!(
            form.to_payload(1),
            Err(FormError::Required("Hotel 1: check-in date is required".to_string()))
        );

        let mut form = PackageForm::from_resource(&package_resource());
        form.hotels.push(HotelRowForm {
            hotel: "2".to_string(),
            check_in: "2025-03-11".to_string(),
            ..HotelRowForm::default()
        });
        assert_eq!(
            form.to_payload(1),
            Err(FormError::Required("Hotel 2: number of nights is required".to_string()))
        );
    }

    #[test]
    fn test_check_out_before_check_in_rejected() {
        let mut form = PackageForm::from_resource(&package_resource());
        assert!(!form.hotels[0].set_check_out("2025-02-20".to_string()));
        assert_eq!(form.hotels[0].nights, "10");
        assert_eq!(
            form.to_payload(1),
            Err(FormError::Invalid("Hotel 1: check-out must be 10 nights after check-in".to_string()))
        );

        form.hotels[0].check_out.clear();
        let payload = form.to_payload(1).unwrap();
        assert_eq!(payload.hotel_details[0].check_out_date, "2025-03-11");
    }

    #[test]
    fn test_without_flight_drops_ticket() {
        let mut form = PackageForm::from_resource(&package_resource());
        form.with_flight = false;
        let payload = form.to_payload(1).unwrap();
        assert!(payload.ticket_details.is_empty());

        form.with_flight = true;
        form.ticket = String::new();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_discount_tier_bounds() {
        let mut form = PackageForm::from_resource(&package_resource());
        form.discounts[0].adult_to = "5".to_string();
        assert!(matches!(form.validate(), Err(FormError::Invalid(_))));
    }

    #[test]
    fn test_new_form_requires_title_and_hotel() {
        let form = PackageForm::default();
        assert_eq!(form.validate(), Err(FormError::Required("Package title is required".to_string())));

        let form = PackageForm { title: "Gold".to_string(), ..PackageForm::default() };
        assert_eq!(form.validate(), Err(FormError::Required("Hotel 1: select a hotel".to_string())));
    }
}
