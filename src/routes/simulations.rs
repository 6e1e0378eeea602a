//! Simulation routes
//!
//! "Be contacted" submissions from the simulator, and a client's own history.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

use crate::api::{Created, DataResponse, Paginated, PaginationParams};
use crate::app::AppState;
use crate::auth::{MaybeAuth, RequireAuth};
use crate::domain::{SimulationCreated, SimulationRecord, SubmitSimulationRequest};
use crate::error::{ApiError, ApiResult};
use crate::middleware::RequestIdExt;

/// POST /simulations
///
/// Anonymous submissions are accepted; a valid token links the record to the caller.
pub async fn submit_simulation(
    auth: MaybeAuth,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    WithRejection(Json(req), _): WithRejection<Json<SubmitSimulationRequest>, ApiError>,
) -> ApiResult<Created<DataResponse<SimulationCreated>>> {
    tracing::info!(
        request_id = headers.request_id().unwrap_or("-"),
        client_id = ?auth.user_id(),
        project_type = %req.project_type,
        "Recording simulation"
    );

    let id = state.recorder.record(&req, auth.user_id()).await?;

    Ok(Created(DataResponse::new(SimulationCreated::new(id))))
}

/// GET /me/simulations
pub async fn list_my_simulations(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Paginated<SimulationRecord>> {
    let page = state
        .storage
        .list_simulations(Some(auth.user_id), params.window())
        .await?;

    Ok(Paginated::from_page(page, &params))
}
