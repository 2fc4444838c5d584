use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiResult;

/// REST collections the back office talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    UmrahPackages,
    Tickets,
    Hotels,
    Airlines,
    Cities,
    FoodPrices,
    ZiaratPrices,
    TransportSectorPrices,
    Bookings,
    Agencies,
    Organizations,
    Groups,
    DiscountGroups,
    Users,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::UmrahPackages => "/api/umrah-packages/",
            Endpoint::Tickets => "/api/tickets/",
            Endpoint::Hotels => "/api/hotels/",
            Endpoint::Airlines => "/api/airlines/",
            Endpoint::Cities => "/api/cities/",
            Endpoint::FoodPrices => "/api/food-prices/",
            Endpoint::ZiaratPrices => "/api/ziarat-prices/",
            Endpoint::TransportSectorPrices => "/api/transport-sector-prices/",
            Endpoint::Bookings => "/api/bookings/",
            Endpoint::Agencies => "/api/agencies/",
            Endpoint::Organizations => "/api/organizations/",
            Endpoint::Groups => "/api/groups/",
            Endpoint::DiscountGroups => "/api/discount-groups/",
            Endpoint::Users => "/api/users/",
        }
    }

    pub fn item_path(self, id: i64) -> String {
        format!("{}{}/", self.path(), id)
    }

    /// Cached lists are keyed per collection and organization.
    pub fn cache_key(self, organization: i64) -> String {
        let name = self.path().trim_start_matches("/api/").trim_end_matches('/');
        format!("{name}:{organization}")
    }
}

/// Data access seam used by every screen. The HTTP client implements it;
/// tests swap in an in-memory double.
#[async_trait]
pub trait RestBackend: Send + Sync {
    async fn list(&self, endpoint: Endpoint, query: &[(&str, String)]) -> ApiResult<Vec<Value>>;

    async fn fetch(&self, endpoint: Endpoint, id: i64) -> ApiResult<Value>;

    async fn create(&self, endpoint: Endpoint, body: &Value) -> ApiResult<Value>;

    async fn update(&self, endpoint: Endpoint, id: i64, body: &Value) -> ApiResult<Value>;

    async fn patch(&self, endpoint: Endpoint, id: i64, body: &Value) -> ApiResult<Value>;

    async fn delete(&self, endpoint: Endpoint, id: i64) -> ApiResult<()>;
}
