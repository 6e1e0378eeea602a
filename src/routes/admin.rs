//! Back-office routes, restricted to the `admin` role

use axum::extract::{Path, Query, State};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{NoContent, Paginated, PaginationParams};
use crate::app::AppState;
use crate::auth::RequireAdmin;
use crate::domain::{ContactRequest, Lead, Project, SimulationRecord};
use crate::error::{ApiError, ApiResult};

/// GET /admin/simulations
pub async fn list_simulations(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Paginated<SimulationRecord>> {
    let page = state.storage.list_simulations(None, params.window()).await?;
    Ok(Paginated::from_page(page, &params))
}

/// GET /admin/projects
pub async fn list_projects(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Paginated<Project>> {
    let page = state.storage.list_projects(None, params.window()).await?;
    Ok(Paginated::from_page(page, &params))
}

/// GET /admin/leads
pub async fn list_leads(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Paginated<Lead>> {
    let page = state.storage.list_leads(params.window()).await?;
    Ok(Paginated::from_page(page, &params))
}

/// DELETE /admin/leads/:id
pub async fn delete_lead(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<NoContent> {
    if !state.storage.delete_lead(id).await? {
        return Err(ApiError::not_found("Lead not found"));
    }

    tracing::info!(admin_id = %admin.user_id, lead_id = %id, "Lead deleted");
    Ok(NoContent)
}

/// GET /admin/contacts
pub async fn list_contacts(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Paginated<ContactRequest>> {
    let page = state.storage.list_contacts(params.window()).await?;
    Ok(Paginated::from_page(page, &params))
}

/// DELETE /admin/contacts/:id
pub async fn delete_contact(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<NoContent> {
    if !state.storage.delete_contact(id).await? {
        return Err(ApiError::not_found("Contact request not found"));
    }

    tracing::info!(admin_id = %admin.user_id, contact_id = %id, "Contact request deleted");
    Ok(NoContent)
}
