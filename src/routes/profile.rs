//! Client area: who am I, and joining as a client after sign-up

use axum::extract::State;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::auth::{AppRole, AuthContext, RequireAuth};
use crate::domain::Profile;
use crate::error::ApiResult;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    /// `false` when built from the token because no `profiles` row exists yet
    pub stored: bool,
    pub is_admin: bool,
    pub is_client: bool,
}

impl ProfileResponse {
    fn new(auth: &AuthContext, profile: Option<Profile>) -> Self {
        match profile {
            Some(p) => Self {
                user_id: p.user_id,
                email: p.email.or_else(|| auth.email.clone()),
                first_name: p.first_name,
                last_name: p.last_name,
                phone: p.phone,
                avatar_url: p.avatar_url,
                stored: true,
                is_admin: false,
                is_client: false,
            },
            None => Self {
                user_id: auth.user_id,
                email: auth.email.clone(),
                first_name: auth.first_name.clone(),
                last_name: auth.last_name.clone(),
                phone: None,
                avatar_url: None,
                stored: false,
                is_admin: false,
                is_client: false,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoleGrant {
    pub role: AppRole,
    /// `false` when the caller already held the role
    pub granted: bool,
}

/// GET /me/profile
pub async fn get_my_profile(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> ApiResult<DataResponse<ProfileResponse>> {
    let profile = state.storage.get_profile(auth.user_id).await?;

    let mut response = ProfileResponse::new(&auth, profile);
    response.is_admin = state.storage.has_role(auth.user_id, AppRole::Admin).await?;
    response.is_client = state.storage.has_role(auth.user_id, AppRole::Client).await?;

    Ok(DataResponse::new(response))
}

/// POST /me/roles/client
///
/// Called once after sign-up; repeating it is harmless.
pub async fn join_as_client(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> ApiResult<DataResponse<RoleGrant>> {
    let granted = state.storage.grant_role(auth.user_id, AppRole::Client).await?;
    if granted {
        tracing::info!(user_id = %auth.user_id, "Client role granted");
    }

    Ok(DataResponse::new(RoleGrant {
        role: AppRole::Client,
        granted,
    }))
}
