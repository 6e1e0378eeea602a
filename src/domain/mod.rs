//! Domain types and DTOs
//!
//! Request DTOs carry their own validation; the persisted entities mirror
//! the `simulations`, `leads`, `contact_requests`, `projects`, `profiles`
//! and `portfolio_projects` tables.

pub mod assistant;
pub mod contacts;
pub mod leads;
pub mod profiles;
pub mod projects;
pub mod simulations;
pub mod validation;

pub use contacts::{ContactRequest, CreateContactRequest, NewContactRequest};
pub use leads::{CreateLeadRequest, Lead, NewLead};
pub use profiles::Profile;
pub use projects::{PortfolioFilter, PortfolioProject, Project};
pub use simulations::{
    EstimateRequest, EstimateResponse, NewSimulation, SimulationCreated, SimulationRecord,
    SubmitSimulationRequest,
};
pub use validation::{FieldError, ValidationErrors};
