use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

use crate::api::{Created, DataResponse, RecordId};
use crate::app::AppState;
use crate::domain::CreateContactRequest;
use crate::error::{ApiError, ApiResult};
use crate::services::notifications::{dispatch, NotificationKind};

/// POST /contact
pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(req), _): WithRejection<Json<CreateContactRequest>, ApiError>,
) -> ApiResult<Created<DataResponse<RecordId>>> {
    let contact = req.validate()?;

    let id = state.storage.insert_contact(&contact).await?;
    tracing::info!(contact_id = %id, "Contact request stored");

    dispatch(state.notifier.clone(), NotificationKind::Contact, (&contact).into());

    Ok(Created(DataResponse::new(RecordId { id })))
}
