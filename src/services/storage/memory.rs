//! In-process storage for tests, with a switch to simulate an outage.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use super::{Page, Storage, StorageError, Window};
use crate::auth::AppRole;
use crate::domain::contacts::STATUS_NEW;
use crate::domain::simulations::STATUS_PENDING;
use crate::domain::{
    ContactRequest, Lead, NewContactRequest, NewLead, NewSimulation, PortfolioProject, Profile,
    Project, SimulationRecord,
};

#[derive(Default)]
pub struct MemoryStorage {
    simulations: Mutex<Vec<SimulationRecord>>,
    leads: Mutex<Vec<Lead>>,
    contacts: Mutex<Vec<ContactRequest>>,
    projects: Mutex<Vec<Project>>,
    profiles: Mutex<Vec<Profile>>,
    portfolio: Mutex<Vec<PortfolioProject>>,
    roles: Mutex<HashSet<(Uuid, AppRole)>>,
    outage: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_outage(&self, down: bool) {
        self.outage.store(down, Ordering::SeqCst);
    }

    pub fn grant(&self, user_id: Uuid, role: AppRole) {
        self.roles.lock().insert((user_id, role));
    }

    pub fn add_project(&self, project: Project) {
        self.projects.lock().push(project);
    }

    pub fn add_profile(&self, profile: Profile) {
        self.profiles.lock().push(profile);
    }

    pub fn add_portfolio(&self, entry: PortfolioProject) {
        self.portfolio.lock().push(entry);
    }

    pub fn simulations(&self) -> Vec<SimulationRecord> {
        self.simulations.lock().clone()
    }

    pub fn leads(&self) -> Vec<Lead> {
        self.leads.lock().clone()
    }

    pub fn contacts(&self) -> Vec<ContactRequest> {
        self.contacts.lock().clone()
    }

    fn available(&self) -> Result<(), StorageError> {
        if self.outage.load(Ordering::SeqCst) {
            Err(StorageError::Unavailable("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Newest first, like the SQL listings
fn window_of<T: Clone>(rows: &[T], window: Window) -> Page<T> {
    let items = rows
        .iter()
        .rev()
        .skip(window.offset as usize)
        .take(window.limit as usize)
        .cloned()
        .collect();

    Page {
        items,
        total: rows.len() as u64,
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn insert_simulation(&self, sim: &NewSimulation) -> Result<Uuid, StorageError> {
        self.available()?;
        let id = Uuid::new_v4();
        self.simulations.lock().push(SimulationRecord {
            id,
            client_id: sim.client_id,
            lead_id: sim.lead_id,
            project_type: sim.project_type.label().to_string(),
            surface_area: sim.surface_area,
            location: sim.location.clone(),
            quality_level: sim.quality_level.label().to_string(),
            estimated_budget: sim.estimated_budget,
            estimated_construction_months: sim.estimated_construction_months,
            loan_amount: sim.loan_amount,
            loan_duration_months: sim.loan_duration_months,
            monthly_payment: sim.monthly_payment,
            status: Some(STATUS_PENDING.to_string()),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_simulations(
        &self,
        client_id: Option<Uuid>,
        window: Window,
    ) -> Result<Page<SimulationRecord>, StorageError> {
        self.available()?;
        let rows: Vec<_> = self
            .simulations
            .lock()
            .iter()
            .filter(|s| client_id.is_none() || s.client_id == client_id)
            .cloned()
            .collect();
        Ok(window_of(&rows, window))
    }

    async fn insert_lead(&self, lead: &NewLead) -> Result<Uuid, StorageError> {
        self.available()?;
        let id = Uuid::new_v4();
        self.leads.lock().push(Lead {
            id,
            first_name: lead.first_name.clone(),
            last_name: lead.last_name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            region: lead.region.clone(),
            country: lead.country.clone(),
            source: lead.source.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_leads(&self, window: Window) -> Result<Page<Lead>, StorageError> {
        self.available()?;
        Ok(window_of(&self.leads.lock(), window))
    }

    async fn delete_lead(&self, id: Uuid) -> Result<bool, StorageError> {
        self.available()?;
        let mut leads = self.leads.lock();
        let before = leads.len();
        leads.retain(|l| l.id != id);
        Ok(leads.len() < before)
    }

    async fn insert_contact(&self, contact: &NewContactRequest) -> Result<Uuid, StorageError> {
        self.available()?;
        let id = Uuid::new_v4();
        self.contacts.lock().push(ContactRequest {
            id,
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            subject: contact.subject.clone(),
            message: contact.message.clone(),
            status: Some(STATUS_NEW.to_string()),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_contacts(&self, window: Window) -> Result<Page<ContactRequest>, StorageError> {
        self.available()?;
        Ok(window_of(&self.contacts.lock(), window))
    }

    async fn delete_contact(&self, id: Uuid) -> Result<bool, StorageError> {
        self.available()?;
        let mut contacts = self.contacts.lock();
        let before = contacts.len();
        contacts.retain(|c| c.id != id);
        Ok(contacts.len() < before)
    }

    async fn list_projects(
        &self,
        client_id: Option<Uuid>,
        window: Window,
    ) -> Result<Page<Project>, StorageError> {
        self.available()?;
        let rows: Vec<_> = self
            .projects
            .lock()
            .iter()
            .filter(|p| client_id.map_or(true, |id| p.client_id == id))
            .cloned()
            .collect();
        Ok(window_of(&rows, window))
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StorageError> {
        self.available()?;
        Ok(self
            .profiles
            .lock()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn list_portfolio(
        &self,
        project_type: Option<&str>,
        window: Window,
    ) -> Result<Page<PortfolioProject>, StorageError> {
        self.available()?;
        let rows: Vec<_> = self
            .portfolio
            .lock()
            .iter()
            .filter(|p| project_type.map_or(true, |t| p.project_type == t))
            .cloned()
            .collect();
        Ok(window_of(&rows, window))
    }

    async fn has_role(&self, user_id: Uuid, role: AppRole) -> Result<bool, StorageError> {
        self.available()?;
        Ok(self.roles.lock().contains(&(user_id, role)))
    }

    async fn grant_role(&self, user_id: Uuid, role: AppRole) -> Result<bool, StorageError> {
        self.available()?;
        Ok(self.roles.lock().insert((user_id, role)))
    }

    async fn health_check(&self) -> bool {
        self.available().is_ok()
    }
}
