//! Selector data for the editors, read through the cache with the longer
//! reference TTL.

use safar_core::reference::{Airline, City, HotelOption, PriceOption, TransportSector};
use safar_core::{ApiResult, Endpoint};
use safar_forms::options;

use crate::context::AppState;

pub async fn airlines(state: &AppState) -> ApiResult<Vec<Airline>> {
    let rows = state.cached_list(Endpoint::Airlines, state.reference_ttl).await?;
    Ok(options::airlines(&rows))
}

pub async fn cities(state: &AppState) -> ApiResult<Vec<City>> {
    let rows = state.cached_list(Endpoint::Cities, state.reference_ttl).await?;
    Ok(options::cities(&rows))
}

pub async fn hotels(state: &AppState) -> ApiResult<Vec<HotelOption>> {
    let rows = state.cached_list(Endpoint::Hotels, state.reference_ttl).await?;
    Ok(options::hotels(&rows))
}

pub async fn food_prices(state: &AppState) -> ApiResult<Vec<PriceOption>> {
    let rows = state.cached_list(Endpoint::FoodPrices, state.reference_ttl).await?;
    Ok(options::price_options(&rows))
}

pub async fn ziarat_prices(state: &AppState) -> ApiResult<Vec<PriceOption>> {
    let rows = state.cached_list(Endpoint::ZiaratPrices, state.reference_ttl).await?;
    Ok(options::price_options(&rows))
}

pub async fn transport_sectors(state: &AppState) -> ApiResult<Vec<TransportSector>> {
    let rows = state.cached_list(Endpoint::TransportSectorPrices, state.reference_ttl).await?;
    Ok(options::transport_sectors(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use safar_store::{ListCache, ManualClock, MemoryStore};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_reference_lists_use_longer_ttl() {
        let backend = FakeBackend::new();
        backend.seed(Endpoint::Airlines, vec![json!({"id": 1, "name": "Saudia", "code": "SV"})]);
        backend.seed(Endpoint::Tickets, vec![json!({"id": 9, "pnr": "AB12CD"})]);
        let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
        let cache = ListCache::new(Arc::new(MemoryStore::new()), clock.clone());
        let state = crate::AppState::new(backend.clone(), cache, 1);

        assert_eq!(airlines(&state).await.unwrap()[0].code, "SV");
        crate::tickets::list_tickets(&state).await.unwrap();
        assert_eq!(backend.calls(), 2);

        clock.advance(chrono::Duration::minutes(10));
        airlines(&state).await.unwrap();
        crate::tickets::list_tickets(&state).await.unwrap();
        assert_eq!(backend.calls(), 3);

        clock.advance(chrono::Duration::minutes(25));
        airlines(&state).await.unwrap();
        assert_eq!(backend.calls(), 4);
    }
}
