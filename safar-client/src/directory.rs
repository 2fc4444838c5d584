use tracing::{info, warn};

use safar_core::{ApiError, ApiResult, DirectoryRecord};
use safar_forms::FormMode;

use crate::context::{to_body, AppState};

/// Cached list of a directory collection. Rows that do not decode are skipped.
pub async fn list<R: DirectoryRecord>(state: &AppState) -> ApiResult<Vec<R>> {
    let rows = state.cached_list(R::ENDPOINT, state.listing_ttl).await?;
    Ok(rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<R>(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping unreadable {} row: {}", R::LABEL, e);
                None
            }
        })
        .collect())
}

/// Creates the record when it has no id yet, otherwise updates it.
pub async fn save<R: DirectoryRecord>(state: &AppState, mut record: R) -> ApiResult<R> {
    record.validate().map_err(ApiError::Validation)?;
    record.scope_to(state.organization);

    let mode = record.id().map_or(FormMode::Add, FormMode::Edit);
    let saved = state.write(R::ENDPOINT, mode, &to_body(&record)?).await?;
    info!("{} '{}' saved", R::LABEL, record.display_name());

    if saved.is_object() {
        serde_json::from_value(saved).map_err(|e| ApiError::Decode(e.to_string()))
    } else {
        Ok(record)
    }
}

pub async fn delete<R: DirectoryRecord>(state: &AppState, id: i64) -> ApiResult<()> {
    state.remove(R::ENDPOINT, id).await?;
    info!("{} {} deleted", R::LABEL, id);
    Ok(())
}
