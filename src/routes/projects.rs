//! Construction projects: a client's own builds and the public portfolio

use axum::extract::{Query, State};
use std::sync::Arc;

use crate::api::{Paginated, PaginationParams};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::{PortfolioFilter, PortfolioProject, Project};
use crate::error::ApiResult;

/// GET /me/projects
pub async fn list_my_projects(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Paginated<Project>> {
    let page = state
        .storage
        .list_projects(Some(auth.user_id), params.window())
        .await?;

    Ok(Paginated::from_page(page, &params))
}

/// GET /portfolio
pub async fn list_portfolio(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<PortfolioFilter>,
) -> ApiResult<Paginated<PortfolioProject>> {
    let page = state
        .storage
        .list_portfolio(filter.project_type(), params.window())
        .await?;

    Ok(Paginated::from_page(page, &params))
}


#[cfg(test)]
mod tests {
    use super::fixtures::{project, showcase};
    use crate::routes::test_support::{token_for, TestApp};
    use axum::http::StatusCode;
    use uuid::Uuid;

    #[tokio::test]
    async fn client_sees_only_own_projects() {
        let app = TestApp::new();
        let me = Uuid::new_v4();
        app.storage.add_project(project(me, "Villa Riviera"));
        app.storage.add_project(project(me, "Annexe"));
        app.storage.add_project(project(Uuid::new_v4(), "Autre chantier"));

        let (status, body) = app.get("/me/projects", Some(&token_for(me))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total_items"], 2);
        assert_eq!(body["data"][0]["title"], "Annexe");
        assert_eq!(body["data"][1]["construction_progress"], 40);
    }

    #[tokio::test]
    async fn my_projects_requires_token() {
        let app = TestApp::new();
        let (status, _) = app.get("/me/projects", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn portfolio_is_public_and_filterable() {
        let app = TestApp::new();
        app.storage.add_portfolio(showcase("Villa Bingerville", "Villa"));
        app.storage.add_portfolio(showcase("Duplex Angré", "Duplex"));

        let (status, body) = app.get("/portfolio", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total_items"], 2);

        let (_, body) = app.get("/portfolio?project_type=Duplex&per_page=5", None).await;
        assert_eq!(body["pagination"]["total_items"], 1);
        assert_eq!(body["data"][0]["title"], "Duplex Angré");

        let (_, body) = app.get("/portfolio?project_type=Tous", None).await;
        assert_eq!(body["pagination"]["total_items"], 2);
    }

    #[tokio::test]
    async fn portfolio_outage_is_503() {
        let app = TestApp::new();
        app.storage.set_outage(true);

        let (status, body) = app.get("/portfolio", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "STORAGE_UNAVAILABLE");
    }
}
