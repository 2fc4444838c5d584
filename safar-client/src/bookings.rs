use serde_json::Value;
use tracing::{info, warn};

use safar_core::booking::StatusPatch;
use safar_core::{ApiError, ApiResult, BookingStatus, BookingView, Endpoint};
use safar_forms::booking_view;

use crate::context::{to_body, AppState};

/// Bookings change under the operator's feet, so they are never cached.
pub async fn list_bookings(state: &AppState, status: Option<BookingStatus>) -> ApiResult<Vec<BookingView>> {
    let query: Vec<(&str, String)> = status.map(|s| ("status", s.to_string())).into_iter().collect();
    let rows = state.backend.list(Endpoint::Bookings, &query).await?;
    Ok(rows.iter().map(booking_view).collect())
}

pub async fn fetch_booking(state: &AppState, id: i64) -> ApiResult<BookingView> {
    let resource = state.backend.fetch(Endpoint::Bookings, id).await?;
    Ok(booking_view(&resource))
}

/// Moves a booking along with a single PATCH. Backward moves and moves out of
/// a finished booking are refused locally.
pub async fn set_status(state: &AppState, booking: &BookingView, next: BookingStatus) -> ApiResult<BookingView> {
    if !booking.status.can_transition_to(next) {
        warn!("Refusing booking {} move from {} to {}", booking.id, booking.status, next);
        return Err(ApiError::Validation(format!(
            "A {} booking cannot be marked {}",
            booking.status, next
        )));
    }

    let body = to_body(&StatusPatch { status: next })?;
    let updated = state.backend.patch(Endpoint::Bookings, booking.id, &body).await?;
    info!("Booking {} is now {}", booking.id, next);

    Ok(if is_full_booking(&updated) {
        booking_view(&updated)
    } else {
        BookingView { status: next, ..booking.clone() }
    })
}

/// Some backends answer a PATCH with only `{id, status}`; that must not
/// replace the booking already on screen.
fn is_full_booking(body: &Value) -> bool {
    body.as_object()
        .is_some_and(|map| map.keys().any(|key| key != "id" && key != "status"))
}
