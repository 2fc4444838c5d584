use serde::{Deserialize, Serialize};

/// Delivery status of a booking, in processing order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    #[default]
    UnApproved,
    UnderProcess,
    Approved,
    Delivered,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    pub fn parse(text: &str) -> Self {
        let key = text.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match key.as_str() {
            "un-approved" | "unapproved" => BookingStatus::UnApproved,
            "under-process" | "underprocess" => BookingStatus::UnderProcess,
            "approved" => BookingStatus::Approved,
            "delivered" => BookingStatus::Delivered,
            "canceled" | "cancelled" => BookingStatus::Canceled,
            _ => BookingStatus::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::UnApproved => "un-approved",
            BookingStatus::UnderProcess => "under-process",
            BookingStatus::Approved => "approved",
            BookingStatus::Delivered => "delivered",
            BookingStatus::Canceled => "canceled",
            BookingStatus::Unknown => "unknown",
        }
    }

    fn rank(self) -> Option<u8> {
        match self {
            BookingStatus::UnApproved => Some(0),
            BookingStatus::UnderProcess => Some(1),
            BookingStatus::Approved => Some(2),
            BookingStatus::Delivered => Some(3),
            BookingStatus::Canceled | BookingStatus::Unknown => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Delivered | BookingStatus::Canceled)
    }

    /// Forward moves only; cancel from anything still open. A record with an
    /// unrecognised status may be moved to any known one.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        if next == BookingStatus::Unknown || next == self || self.is_terminal() {
            return false;
        }
        if next == BookingStatus::Canceled {
            return true;
        }
        match (self.rank(), next.rank()) {
            (Some(from), Some(to)) => to > from,
            (None, Some(_)) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Passenger {
    pub first_name: String,
    pub last_name: String,
    pub passport_number: String,
    pub person_type: String,
    pub visa_price: f64,
}

impl Passenger {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BookedHotel {
    pub hotel_name: String,
    pub check_in: String,
    pub check_out: String,
    pub nights: i64,
    pub room_type: String,
    pub quantity: i64,
    pub price: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BookedTransport {
    pub vehicle_type: String,
    pub sector: String,
    pub quantity: i64,
    pub price: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BookedTicket {
    pub pnr: String,
    pub airline: String,
    pub seats: i64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BookingTotals {
    pub ticket: f64,
    pub hotel: f64,
    pub transport: f64,
    pub visa: f64,
    pub total: f64,
    pub paid: f64,
    pub pending: f64,
}

/// Read model behind the order-delivery screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BookingView {
    pub id: i64,
    pub booking_number: String,
    pub status: BookingStatus,
    pub agency_name: String,
    pub created_on: String,
    pub passengers: Vec<Passenger>,
    pub hotels: Vec<BookedHotel>,
    pub transports: Vec<BookedTransport>,
    pub tickets: Vec<BookedTicket>,
    pub totals: BookingTotals,
}

/// Body of the single PATCH that moves a booking along.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusPatch {
    pub status: BookingStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_spellings() {
        assert_eq!(BookingStatus::parse("un-approved"), BookingStatus::UnApproved);
        assert_eq!(BookingStatus::parse("Under Process"), BookingStatus::UnderProcess);
        assert_eq!(BookingStatus::parse("cancelled"), BookingStatus::Canceled);
        assert_eq!(BookingStatus::parse("on-hold"), BookingStatus::Unknown);
    }

    #[test]
    fn test_transitions() {
        use BookingStatus::*;
        assert!(UnApproved.can_transition_to(UnderProcess));
        assert!(UnApproved.can_transition_to(Approved));
        assert!(UnderProcess.can_transition_to(Delivered));
        assert!(Approved.can_transition_to(Canceled));
        assert!(Unknown.can_transition_to(UnApproved));

        assert!(!UnderProcess.can_transition_to(UnApproved));
        assert!(!Delivered.can_transition_to(Canceled));
        assert!(!Canceled.can_transition_to(UnApproved));
        assert!(!Approved.can_transition_to(Approved));
        assert!(!Approved.can_transition_to(Unknown));
    }

    #[test]
    fn test_patch_wire_format() {
        let body = serde_json::to_value(StatusPatch { status: BookingStatus::UnderProcess }).unwrap();
        assert_eq!(body, serde_json::json!({"status": "under-process"}));
    }
}
