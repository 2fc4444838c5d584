use serde_json::Value;
use tracing::{info, warn};

use safar_core::{ApiResult, Endpoint};
use safar_forms::{FormMode, TicketForm};

use crate::context::{to_body, AppState};

pub async fn list_tickets(state: &AppState) -> ApiResult<Vec<Value>> {
    state.cached_list(Endpoint::Tickets, state.listing_ttl).await
}

pub async fn load_ticket(state: &AppState, id: i64) -> ApiResult<TicketForm> {
    let resource = state.backend.fetch(Endpoint::Tickets, id).await?;
    Ok(TicketForm::from_resource(&resource))
}

/// Validates, builds the body and writes it. The form is left as is on error.
pub async fn submit_ticket(state: &AppState, form: &TicketForm, mode: FormMode) -> ApiResult<Value> {
    let payload = form.to_payload(state.organization).map_err(|e| {
        warn!("Ticket form rejected: {}", e);
        e
    })?;
    let saved = state.write(Endpoint::Tickets, mode, &to_body(&payload)?).await?;
    info!("Ticket {} saved", payload.pnr);
    Ok(saved)
}

pub async fn delete_ticket(state: &AppState, id: i64) -> ApiResult<()> {
    state.remove(Endpoint::Tickets, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{state_with, FakeBackend};
    use safar_core::ApiError;
    use serde_json::json;

    #[tokio::test]
    async fn test_incomplete_ticket_is_not_sent() {
        let backend = FakeBackend::new();
        let state = state_with(backend.clone());

        let err = submit_ticket(&state, &TicketForm::default(), FormMode::Add).await.unwrap_err();
        assert_eq!(err, ApiError::Validation("Please select an airline".to_string()));
        assert!(err.user_message().contains("airline"));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_loaded_ticket_posts_back() {
        let backend = FakeBackend::new();
        backend.seed(
            Endpoint::Tickets,
            vec![json!({
                "id": 9,
                "airline": {"id": 2, "name": "PIA"},
                "pnr": "AB12CD",
                "adult_price": 120000,
                "total_seats": 30,
                "left_seats": 12,
                "trip_type": "One-way",
                "flight_type": "Non-Stop",
                "trip_details": [{
                    "trip_type": "Departure",
                    "departure_date_time": "2025-03-01T10:30:00",
                    "arrival_date_time": "2025-03-01T14:45:00",
                    "departure_city": 1,
                    "arrival_city": 6,
                    "flight_number": "PK741"
                }]
            })],
        );
        let state = state_with(backend.clone());

        let form = load_ticket(&state, 9).await.unwrap();
        submit_ticket(&state, &form, FormMode::Add).await.unwrap();

        let writes = backend.writes();
        let body = &writes[0].2;
        assert_eq!(body["airline"], 2);
        assert_eq!(body["left_seats"], 12);
        assert_eq!(body["organization"], 1);
        assert_eq!(body["trip_details"][0]["flight_number"], "PK741");
    }
}
