use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::*;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Page, Storage, StorageError, Window};
use crate::auth::AppRole;
use crate::domain::simulations::STATUS_PENDING;
use crate::domain::contacts::STATUS_NEW;
use crate::domain::{
    ContactRequest, Lead, NewContactRequest, NewLead, NewSimulation, PortfolioProject, Profile,
    Project, SimulationRecord,
};

/// Postgres-backed storage (Supabase database)
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row for simulation
#[derive(Debug, sqlx::FromRow)]
struct SimulationRow {
    id: Uuid,
    client_id: Option<Uuid>,
    lead_id: Option<Uuid>,
    project_type: String,
    surface_area: i32,
    location: String,
    quality_level: String,
    estimated_budget: Option<Decimal>,
    estimated_construction_months: Option<i32>,
    loan_amount: Option<Decimal>,
    loan_duration_months: Option<i32>,
    monthly_payment: Option<Decimal>,
    status: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<SimulationRow> for SimulationRecord {
    fn from(row: SimulationRow) -> Self {
        Self {
            id: row.id,
            client_id: row.client_id,
            lead_id: row.lead_id,
            project_type: row.project_type,
            surface_area: row.surface_area,
            location: row.location,
            quality_level: row.quality_level,
            estimated_budget: row.estimated_budget.and_then(|d| d.to_f64()),
            estimated_construction_months: row.estimated_construction_months,
            loan_amount: row.loan_amount.and_then(|d| d.to_f64()),
            loan_duration_months: row.loan_duration_months,
            monthly_payment: row.monthly_payment.and_then(|d| d.to_f64()),
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Database row for lead
#[derive(Debug, sqlx::FromRow)]
struct LeadRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    region: String,
    country: String,
    source: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<LeadRow> for Lead {
    fn from(row: LeadRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            region: row.region,
            country: row.country,
            source: row.source,
            created_at: row.created_at,
        }
    }
}

/// Database row for contact request
#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    subject: String,
    message: String,
    status: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ContactRow> for ContactRequest {
    fn from(row: ContactRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            subject: row.subject,
            message: row.message,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Database row for client project
#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    client_id: Uuid,
    title: String,
    description: Option<String>,
    project_type: String,
    surface_area: i32,
    location: String,
    quality_level: String,
    estimated_budget: Option<Decimal>,
    construction_status: Option<String>,
    construction_progress: Option<i32>,
    start_date: Option<NaiveDate>,
    estimated_completion_date: Option<NaiveDate>,
    actual_completion_date: Option<NaiveDate>,
    expert_validation_status: Option<String>,
    expert_validation_date: Option<NaiveDate>,
    escrow_account_status: Option<String>,
    escrow_amount: Option<Decimal>,
    escrow_bank: Option<String>,
    keys_delivered_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            client_id: row.client_id,
            title: row.title,
            description: row.description,
            project_type: row.project_type,
            surface_area: row.surface_area,
            location: row.location,
            quality_level: row.quality_level,
            estimated_budget: row.estimated_budget.and_then(|d| d.to_f64()),
            construction_status: row.construction_status,
            construction_progress: row.construction_progress,
            start_date: row.start_date,
            estimated_completion_date: row.estimated_completion_date,
            actual_completion_date: row.actual_completion_date,
            expert_validation_status: row.expert_validation_status,
            expert_validation_date: row.expert_validation_date,
            escrow_account_status: row.escrow_account_status,
            escrow_amount: row.escrow_amount.and_then(|d| d.to_f64()),
            escrow_bank: row.escrow_bank,
            keys_delivered_date: row.keys_delivered_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for portfolio project
#[derive(Debug, sqlx::FromRow)]
struct PortfolioRow {
    id: Uuid,
    title: String,
    description: String,
    project_type: String,
    location: String,
    surface_area: Option<i32>,
    duration_months: Option<i32>,
    budget_range: Option<String>,
    completion_date: Option<NaiveDate>,
    image_url: Option<String>,
    status: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<PortfolioRow> for PortfolioProject {
    fn from(row: PortfolioRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            project_type: row.project_type,
            location: row.location,
            surface_area: row.surface_area,
            duration_months: row.duration_months,
            budget_range: row.budget_range,
            completion_date: row.completion_date,
            image_url: row.image_url,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Database row for profile
#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    user_id: Uuid,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            avatar_url: row.avatar_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn money(value: Option<f64>) -> Option<Decimal> {
    value.and_then(Decimal::from_f64).map(|d| d.round_dp(2))
}

#[async_trait]
impl Storage for PgStorage {
    async fn insert_simulation(&self, sim: &NewSimulation) -> Result<Uuid, StorageError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO simulations (
                client_id, lead_id, project_type, surface_area, location, quality_level,
                estimated_budget, estimated_construction_months,
                loan_amount, loan_duration_months, monthly_payment, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(sim.client_id)
        .bind(sim.lead_id)
        .bind(sim.project_type.label())
        .bind(sim.surface_area)
        .bind(&sim.location)
        .bind(sim.quality_level.label())
        .bind(money(sim.estimated_budget))
        .bind(sim.estimated_construction_months)
        .bind(money(sim.loan_amount))
        .bind(sim.loan_duration_months)
        .bind(money(sim.monthly_payment))
        .bind(STATUS_PENDING)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_simulations(
        &self,
        client_id: Option<Uuid>,
        window: Window,
    ) -> Result<Page<SimulationRecord>, StorageError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM simulations WHERE ($1::uuid IS NULL OR client_id = $1)",
        )
        .bind(client_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, SimulationRow>(
            r#"
            SELECT id, client_id, lead_id, project_type, surface_area, location, quality_level,
                   estimated_budget, estimated_construction_months,
                   loan_amount, loan_duration_months, monthly_payment, status, created_at
            FROM simulations
            WHERE ($1::uuid IS NULL OR client_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(client_id)
        .bind(window.limit as i64)
        .bind(window.offset as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total: total as u64,
        })
    }

    async fn insert_lead(&self, lead: &NewLead) -> Result<Uuid, StorageError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO leads (first_name, last_name, email, phone, region, country, source)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&lead.first_name)
        .bind(&lead.last_name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.region)
        .bind(&lead.country)
        .bind(&lead.source)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_leads(&self, window: Window) -> Result<Page<Lead>, StorageError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leads")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, LeadRow>(
            r#"
            SELECT id, first_name, last_name, email, phone, region, country, source, created_at
            FROM leads
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(window.limit as i64)
        .bind(window.offset as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total: total as u64,
        })
    }

    async fn delete_lead(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_contact(&self, contact: &NewContactRequest) -> Result<Uuid, StorageError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO contact_requests (name, email, phone, subject, message, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.subject)
        .bind(&contact.message)
        .bind(STATUS_NEW)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_contacts(&self, window: Window) -> Result<Page<ContactRequest>, StorageError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_requests")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, name, email, phone, subject, message, status, created_at
            FROM contact_requests
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(window.limit as i64)
        .bind(window.offset as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total: total as u64,
        })
    }

    async fn delete_contact(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM contact_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_projects(
        &self,
        client_id: Option<Uuid>,
        window: Window,
    ) -> Result<Page<Project>, StorageError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM projects WHERE ($1::uuid IS NULL OR client_id = $1)",
        )
        .bind(client_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, client_id, title, description, project_type, surface_area, location,
                   quality_level, estimated_budget, construction_status, construction_progress,
                   start_date, estimated_completion_date, actual_completion_date,
                   expert_validation_status, expert_validation_date,
                   escrow_account_status, escrow_amount, escrow_bank,
                   keys_delivered_date, created_at, updated_at
            FROM projects
            WHERE ($1::uuid IS NULL OR client_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(client_id)
        .bind(window.limit as i64)
        .bind(window.offset as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total: total as u64,
        })
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StorageError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, user_id, email, first_name, last_name, phone, avatar_url,
                   created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_portfolio(
        &self,
        project_type: Option<&str>,
        window: Window,
    ) -> Result<Page<PortfolioProject>, StorageError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM portfolio_projects WHERE ($1::text IS NULL OR project_type = $1)",
        )
        .bind(project_type)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, PortfolioRow>(
            r#"
            SELECT id, title, description, project_type, location, surface_area,
                   duration_months, budget_range, completion_date, image_url, status, created_at
            FROM portfolio_projects
            WHERE ($1::text IS NULL OR project_type = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(project_type)
        .bind(window.limit as i64)
        .bind(window.offset as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total: total as u64,
        })
    }

    async fn has_role(&self, user_id: Uuid, role: AppRole) -> Result<bool, StorageError> {
        let granted: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_roles WHERE user_id = $1 AND role = $2::app_role)",
        )
        .bind(user_id)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(granted)
    }

    async fn grant_role(&self, user_id: Uuid, role: AppRole) -> Result<bool, StorageError> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role)
            SELECT $1, $2::app_role
            WHERE NOT EXISTS (
                SELECT 1 FROM user_roles WHERE user_id = $1 AND role = $2::app_role
            )
            "#,
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }
}
