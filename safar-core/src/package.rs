use serde::{Deserialize, Serialize};

/// A hotel stay inside a package, with per-bed-type prices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageHotel {
    pub hotel: i64,
    pub check_in_date: String,
    pub check_out_date: String,
    pub number_of_nights: i64,
    pub sharing_bed_price: f64,
    pub sharing_bed_purchase_price: f64,
    pub quint_bed_price: f64,
    pub quint_bed_purchase_price: f64,
    pub quad_bed_price: f64,
    pub quad_bed_purchase_price: f64,
    pub triple_bed_price: f64,
    pub triple_bed_purchase_price: f64,
    pub double_bed_price: f64,
    pub double_bed_purchase_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageTransport {
    pub transport_sector: i64,
    pub vehicle_type: String,
    pub self_transport: bool,
}

/// Group discount for a range of adult passengers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountTier {
    pub adult_from: i64,
    pub adult_to: i64,
    pub max_discount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageTicket {
    pub ticket: i64,
}

/// Request body for `POST/PUT /api/umrah-packages/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackagePayload {
    pub organization: i64,
    pub title: String,
    pub rules: String,
    pub total_seats: i64,
    pub adult_visa_price: f64,
    pub adult_visa_purchase_price: f64,
    pub child_visa_price: f64,
    pub child_visa_purchase_price: f64,
    pub infant_visa_price: f64,
    pub infant_visa_purchase_price: f64,
    pub food_price: f64,
    pub food_purchase_price: f64,
    pub ziarat_price: f64,
    pub ziarat_purchase_price: f64,
    pub transport_price: f64,
    pub transport_purchase_price: f64,
    pub reselling_allowed: bool,
    pub is_active: bool,
    pub hotel_details: Vec<PackageHotel>,
    pub transport_details: Vec<PackageTransport>,
    pub discount_details: Vec<DiscountTier>,
    pub ticket_details: Vec<PackageTicket>,
}
