use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::sync::Arc;

use super::{AppRole, AuthContext};
use crate::app::AppState;
use crate::error::{ApiError, ErrorResponse};

/// Extractor that requires a valid Supabase access token
///
/// ```ignore
/// async fn my_simulations(auth: RequireAuth) -> impl IntoResponse {
///     format!("Hello, user {}", auth.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthContext);

impl std::ops::Deref for RequireAuth {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Anonymous callers pass through as `None`; a present but invalid token is still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuth(pub Option<AuthContext>);

impl MaybeAuth {
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|ctx| ctx.user_id)
    }
}

/// Authenticated caller holding the `admin` role in `user_roles`
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthContext);

impl std::ops::Deref for RequireAdmin {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidFormat,
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match &self {
            AuthError::MissingToken => "Missing authorization token",
            AuthError::InvalidFormat => "Invalid authorization format",
            AuthError::InvalidToken(reason) => {
                tracing::debug!(reason = %reason, "Rejected token");
                "Invalid or expired token"
            }
        };

        ErrorResponse {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            request_id: None,
            errors: None,
        }
        .into_response_with(StatusCode::UNAUTHORIZED)
    }
}

/// Bearer token from the request, `None` when the header is absent
async fn bearer_token(parts: &mut Parts, state: &Arc<AppState>) -> Result<Option<String>, AuthError> {
    match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
        Ok(TypedHeader(Authorization(bearer))) => {
            let token = bearer.token().trim();
            if token.is_empty() {
                return Err(AuthError::MissingToken);
            }
            Ok(Some(token.to_string()))
        }
        Err(rejection) if rejection.is_missing() => Ok(None),
        Err(_) => Err(AuthError::InvalidFormat),
    }
}

async fn authenticate(token: &str, state: &AppState) -> Result<AuthContext, AuthError> {
    let claims = state.verifier.verify(token).await.map_err(|e| {
        tracing::warn!(error = %e, "JWT verification failed");
        AuthError::InvalidToken(e.to_string())
    })?;

    AuthContext::from_claims(&claims).map_err(|e| {
        tracing::warn!(error = %e, "Failed to build auth context");
        AuthError::InvalidToken(e.to_string())
    })
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state)
            .await?
            .ok_or(AuthError::MissingToken)?;

        Ok(RequireAuth(authenticate(&token, state).await?))
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts, state).await? {
            Some(token) => Ok(MaybeAuth(Some(authenticate(&token, state).await?))),
            None => Ok(MaybeAuth(None)),
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(context) = RequireAuth::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let is_admin = state
            .storage
            .has_role(context.user_id, AppRole::Admin)
            .await
            .map_err(|e| ApiError::from(e).into_response())?;

        if !is_admin {
            tracing::warn!(user_id = %context.user_id, "Admin route refused");
            return Err(ApiError::forbidden("Accès réservé aux administrateurs").into_response());
        }

        Ok(RequireAdmin(context))
    }
}
