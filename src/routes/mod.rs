pub mod admin;
pub mod assistant;
pub mod contacts;
pub mod health;
pub mod leads;
pub mod profile;
pub mod projects;
pub mod simulations;
pub mod simulator;

#[cfg(test)]
pub(crate) mod test_support;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        .route("/simulator/catalog", get(simulator::get_catalog))
        .route("/simulator/estimate", post(simulator::compute_estimate))
        .route("/portfolio", get(projects::list_portfolio))
        // Submissions (auth optional)
        .route("/simulations", post(simulations::submit_simulation))
        .route("/assistant/step", post(assistant::assistant_step))
        .route("/leads", post(leads::create_lead))
        .route("/contact", post(contacts::create_contact))
        // Authenticated
        .route("/me/simulations", get(simulations::list_my_simulations))
        .route("/me/projects", get(projects::list_my_projects))
        .route("/me/profile", get(profile::get_my_profile))
        .route("/me/roles/client", post(profile::join_as_client))
        // Admin
        .route("/admin/simulations", get(admin::list_simulations))
        .route("/admin/projects", get(admin::list_projects))
        .route("/admin/leads", get(admin::list_leads))
        .route("/admin/leads/:id", delete(admin::delete_lead))
        .route("/admin/contacts", get(admin::list_contacts))
        .route("/admin/contacts/:id", delete(admin::delete_contact))
}
