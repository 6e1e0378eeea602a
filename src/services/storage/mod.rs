//! Persistence contract
//!
//! Route handlers and the submission recorder talk to the datastore through
//! [`Storage`]; production uses [`PgStorage`].

mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgStorage;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::AppRole;
use crate::domain::{
    ContactRequest, Lead, NewContactRequest, NewLead, NewSimulation, PortfolioProject, Profile,
    Project, SimulationRecord,
};

/// Generic "could not reach or write the datastore" condition.
/// The source is kept for logs and never shown to clients.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// One window of a newest-first listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// LIMIT/OFFSET pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: u32,
    pub offset: u32,
}

#[async_trait]
pub trait Storage: Send + Sync {
    /// Single-row insert; every call creates a new record.
    async fn insert_simulation(&self, simulation: &NewSimulation) -> Result<Uuid, StorageError>;

    /// Simulations, optionally restricted to one client
    async fn list_simulations(
        &self,
        client_id: Option<Uuid>,
        window: Window,
    ) -> Result<Page<SimulationRecord>, StorageError>;

    async fn insert_lead(&self, lead: &NewLead) -> Result<Uuid, StorageError>;

    async fn list_leads(&self, window: Window) -> Result<Page<Lead>, StorageError>;

    /// `false` when no row matched
    async fn delete_lead(&self, id: Uuid) -> Result<bool, StorageError>;

    async fn insert_contact(&self, contact: &NewContactRequest) -> Result<Uuid, StorageError>;

    async fn list_contacts(&self, window: Window) -> Result<Page<ContactRequest>, StorageError>;

    async fn delete_contact(&self, id: Uuid) -> Result<bool, StorageError>;

    /// Client projects, optionally restricted to one client
    async fn list_projects(
        &self,
        client_id: Option<Uuid>,
        window: Window,
    ) -> Result<Page<Project>, StorageError>;

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StorageError>;

    /// Public showcase, optionally restricted to one project type
    async fn list_portfolio(
        &self,
        project_type: Option<&str>,
        window: Window,
    ) -> Result<Page<PortfolioProject>, StorageError>;

    async fn has_role(&self, user_id: Uuid, role: AppRole) -> Result<bool, StorageError>;

    /// `false` when the user already held the role
    async fn grant_role(&self, user_id: Uuid, role: AppRole) -> Result<bool, StorageError>;

    async fn health_check(&self) -> bool;
}
