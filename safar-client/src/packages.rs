use serde_json::Value;
use tracing::{info, warn};

use safar_core::{ApiResult, Endpoint};
use safar_forms::{FormMode, PackageForm};

use crate::context::{to_body, AppState};

pub async fn list_packages(state: &AppState) -> ApiResult<Vec<Value>> {
    state.cached_list(Endpoint::UmrahPackages, state.listing_ttl).await
}

pub async fn load_package(state: &AppState, id: i64) -> ApiResult<PackageForm> {
    let resource = state.backend.fetch(Endpoint::UmrahPackages, id).await?;
    Ok(PackageForm::from_resource(&resource))
}

pub async fn submit_package(state: &AppState, form: &PackageForm, mode: FormMode) -> ApiResult<Value> {
    let payload = form.to_payload(state.organization).map_err(|e| {
        warn!("Package form rejected: {}", e);
        e
    })?;
    let saved = state.write(Endpoint::UmrahPackages, mode, &to_body(&payload)?).await?;
    info!("Package '{}' saved", payload.title);
    Ok(saved)
}

pub async fn delete_package(state: &AppState, id: i64) -> ApiResult<()> {
    state.remove(Endpoint::UmrahPackages, id).await
}
